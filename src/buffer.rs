use core::ops::{Deref, DerefMut};

/// A fixed-capacity vector backed by an array, never allocating.
///
/// Values past the capacity are rejected by [`FixedVec::push`] instead of
/// overwriting older entries.
#[derive(Clone, Copy, Debug)]
pub struct FixedVec<T, const N: usize> {
    buffer: [T; N],
    len: usize,
}

impl<T, const N: usize> Default for FixedVec<T, N>
where
    T: Default + Copy,
{
    fn default() -> Self {
        Self {
            buffer: [T::default(); N],
            len: 0,
        }
    }
}

impl<T, const N: usize> FixedVec<T, N>
where
    T: Default + Copy,
{
    /// Creates an empty FixedVec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value. Hands the value back when the buffer is full.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        self.buffer[self.len] = value;
        self.len += 1;
        Ok(())
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Checks if the buffer is full.
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Checks if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buffer[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buffer[..self.len]
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T, const N: usize> Deref for FixedVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buffer[..self.len]
    }
}

impl<T, const N: usize> DerefMut for FixedVec<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buffer[..self.len]
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a FixedVec<T, N>
where
    T: Default + Copy,
{
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, const N: usize> FromIterator<T> for FixedVec<T, N>
where
    T: Default + Copy,
{
    /// Collects at most `N` values; the rest are dropped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        for value in iter.into_iter().take(N) {
            let _ = out.push(value);
        }
        out
    }
}
