//! Closed-form roots of low-order polynomials and helpers for the
//! higher-order ones.
//!
//! Polynomials are coefficient slices ordered from the highest power down,
//! so `[a, b, c]` is `a·x² + b·x + c`. Degenerate leading coefficients
//! reduce the degree instead of dividing by zero. Roots that do not exist
//! over the reals are either omitted or returned as NaN; callers filter them
//! through profile validation.

use crate::buffer::FixedVec;
use crate::tolerance::{EPS, ROOT_TOLERANCE};

/// Up to four real roots.
pub type Roots = FixedVec<f64, 4>;
/// Coefficients of a polynomial of degree six or lower.
pub type Coefficients = FixedVec<f64, 7>;

const COS_120: f64 = -0.5;
const SIN_120: f64 = 0.866_025_403_784_438_6;
const MAX_SHRINK_ITERATIONS: usize = 128;

#[inline]
fn push(roots: &mut Roots, x: f64) {
    // capacity 4 is never exceeded by the solvers below
    let _ = roots.push(x);
}

/// Real roots of `a·x³ + b·x² + c·x + d`.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    let mut roots = Roots::new();
    let (mut a, mut b, mut c, mut d) = (a, b, c, d);

    if d.abs() < EPS {
        // x = 0 is a root, continue with the quadratic left over
        push(&mut roots, 0.0);
        d = c;
        c = b;
        b = a;
        a = 0.0;
    }

    if a.abs() < EPS {
        if b.abs() < EPS {
            if c.abs() > EPS {
                push(&mut roots, -d / c);
            }
        } else {
            let discriminant = c * c - 4.0 * b * d;
            if discriminant >= 0.0 {
                let inv_2b = 1.0 / (2.0 * b);
                let y = discriminant.sqrt();
                push(&mut roots, (-c + y) * inv_2b);
                push(&mut roots, (-c - y) * inv_2b);
            }
        }
        return roots;
    }

    let inv_a = 1.0 / a;
    let inv_aa = inv_a * inv_a;
    let bb = b * b;
    let b_over_3a = b * inv_a / 3.0;
    let p = (a * c - bb / 3.0) * inv_aa;
    let half_q = (2.0 * bb * b - 9.0 * a * b * c + 27.0 * a * a * d) / 54.0 * inv_aa * inv_a;
    let yy = p * p * p / 27.0 + half_q * half_q;

    if yy > EPS {
        // one real root
        let y = yy.sqrt();
        let uuu = -half_q + y;
        let vvv = -half_q - y;
        let www = if uuu.abs() > vvv.abs() { uuu } else { vvv };
        let w = www.cbrt();
        push(&mut roots, w - p / (3.0 * w) - b_over_3a);
    } else if yy < -EPS {
        // three distinct real roots
        let x = -half_q;
        let y = (-yy).sqrt();
        let (theta, r) = if x.abs() > EPS {
            let theta = if x > 0.0 {
                (y / x).atan()
            } else {
                (y / x).atan() + core::f64::consts::PI
            };
            (theta, (x * x - yy).sqrt())
        } else {
            (core::f64::consts::FRAC_PI_2, y)
        };
        let theta = theta / 3.0;
        let r = 2.0 * r.cbrt();
        let ux = theta.cos() * r;
        let uyi = theta.sin() * r;
        push(&mut roots, ux - b_over_3a);
        push(&mut roots, ux * COS_120 - uyi * SIN_120 - b_over_3a);
        push(&mut roots, ux * COS_120 + uyi * SIN_120 - b_over_3a);
    } else {
        // a double root and a simple one
        let w = 2.0 * (-half_q).cbrt();
        push(&mut roots, w - b_over_3a);
        push(&mut roots, w * COS_120 - b_over_3a);
    }
    roots
}

/// Real roots of the monic resolvent cubic `x³ + a·x² + b·x + c`.
fn solve_resolvent(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::new();
    let a2 = a * a;
    let q = (a2 - 3.0 * b) / 9.0;
    let r = (a * (2.0 * a2 - 9.0 * b) + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;

    if r2 < q3 {
        let q_sqrt = q.sqrt();
        let t = (r / (q * q_sqrt)).clamp(-1.0, 1.0);
        let q = -2.0 * q_sqrt;
        let theta = t.acos() / 3.0;
        let ux = theta.cos() * q;
        let uyi = theta.sin() * q;
        push(&mut roots, ux - a / 3.0);
        push(&mut roots, ux * COS_120 - uyi * SIN_120 - a / 3.0);
        push(&mut roots, ux * COS_120 + uyi * SIN_120 - a / 3.0);
        return roots;
    }

    let mut big_a = -(r.abs() + (r2 - q3).sqrt()).cbrt();
    if r < 0.0 {
        big_a = -big_a;
    }
    let big_b = if big_a == 0.0 { 0.0 } else { q / big_a };
    let a = a / 3.0;
    push(&mut roots, (big_a + big_b) - a);
    let imaginary = 0.5 * 3.0_f64.sqrt() * (big_a - big_b);
    if imaginary.abs() < EPS {
        push(&mut roots, -0.5 * (big_a + big_b) - a);
    }
    roots
}

/// Real roots of the monic quartic `x⁴ + a·x³ + b·x² + c·x + d`, unsorted.
pub fn solve_quart_monic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    let mut roots = Roots::new();

    if d.abs() < EPS {
        if c.abs() < EPS {
            push(&mut roots, 0.0);
            let discriminant = a * a - 4.0 * b;
            if discriminant.abs() < EPS {
                push(&mut roots, -a / 2.0);
            } else if discriminant > 0.0 {
                let s = discriminant.sqrt();
                push(&mut roots, (-a - s) / 2.0);
                push(&mut roots, (-a + s) / 2.0);
            }
            return roots;
        }
        if a.abs() < EPS && b.abs() < EPS {
            push(&mut roots, 0.0);
            push(&mut roots, -c.cbrt());
            return roots;
        }
    }

    let resolvent = solve_resolvent(-b, a * c - 4.0 * d, -a * a * d - c * c + 4.0 * b * d);
    let y = resolvent
        .iter()
        .copied()
        .fold(f64::NAN, |best, x| if best.is_nan() || x.abs() > best.abs() { x } else { best });

    let (p1, p2, q1, q2);
    let discriminant = y * y - 4.0 * d;
    if discriminant.abs() < EPS {
        q1 = y / 2.0;
        q2 = q1;
        let discriminant = a * a - 4.0 * (b - y);
        if discriminant.abs() < EPS {
            p1 = a / 2.0;
            p2 = p1;
        } else {
            let s = discriminant.sqrt();
            p1 = (a + s) / 2.0;
            p2 = (a - s) / 2.0;
        }
    } else {
        let s = discriminant.sqrt();
        q1 = (y + s) / 2.0;
        q2 = (y - s) / 2.0;
        p1 = (a * q1 - c) / (q1 - q2);
        p2 = (c - a * q2) / (q1 - q2);
    }

    let eps = 16.0 * EPS;
    for (p, q) in [(p1, q1), (p2, q2)] {
        let discriminant = p * p - 4.0 * q;
        if discriminant.abs() < eps {
            push(&mut roots, -p / 2.0);
        } else if discriminant > 0.0 {
            let s = discriminant.sqrt();
            push(&mut roots, (-p - s) / 2.0);
            push(&mut roots, (-p + s) / 2.0);
        }
    }
    roots
}

/// Real roots of `a·x² + b·x + c`.
///
/// A discriminant that is negative only by rounding counts as a double
/// root.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> FixedVec<f64, 2> {
    let mut roots = FixedVec::new();
    if a.abs() < EPS {
        if b.abs() > EPS {
            let _ = roots.push(-c / b);
        }
        return roots;
    }

    let mut discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        if discriminant > -1e-9 * (b * b + (4.0 * a * c).abs()) {
            discriminant = 0.0;
        } else {
            return roots;
        }
    }
    let y = discriminant.sqrt();
    let _ = roots.push((-b + y) / (2.0 * a));
    let _ = roots.push((-b - y) / (2.0 * a));
    roots
}

/// [`solve_quart_monic`] with the roots in ascending order.
pub fn solve_quart_monic_sorted(a: f64, b: f64, c: f64, d: f64) -> Roots {
    let mut roots = solve_quart_monic(a, b, c, d);
    roots.as_mut_slice().sort_unstable_by(f64::total_cmp);
    roots
}

/// Evaluates a polynomial with Horner's scheme.
pub fn poly_eval(p: &[f64], x: f64) -> f64 {
    p.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Derivative of a polynomial.
pub fn poly_deri(p: &[f64]) -> Coefficients {
    let n = p.len().saturating_sub(1);
    p.iter()
        .take(n)
        .enumerate()
        .map(|(i, c)| c * (n - i) as f64)
        .collect()
}

/// Derivative of a polynomial, scaled so the result is monic when `p` is.
pub fn poly_monic_deri(p: &[f64]) -> Coefficients {
    let n = p.len().saturating_sub(1);
    p.iter()
        .take(n)
        .enumerate()
        .map(|(i, c)| c * (n - i) as f64 / n as f64)
        .collect()
}

/// Root of `p` inside a sign-changing interval `[l, h]`, by safeguarded
/// Newton iteration falling back to bisection.
pub fn shrink_interval(p: &[f64], l: f64, h: f64) -> f64 {
    let fl = poly_eval(p, l);
    let fh = poly_eval(p, h);
    if fl == 0.0 {
        return l;
    }
    if fh == 0.0 {
        return h;
    }
    let (mut l, mut h) = if fl > 0.0 { (h, l) } else { (l, h) };

    let deri = poly_deri(p);
    let deri = deri.as_slice();
    let mut rts = (l + h) / 2.0;
    let mut dx_old = (h - l).abs();
    let mut dx = dx_old;
    let mut f = poly_eval(p, rts);
    let mut df = poly_eval(deri, rts);

    for _ in 0..MAX_SHRINK_ITERATIONS {
        let newton_leaves = ((rts - h) * df - f) * ((rts - l) * df - f) > 0.0;
        let too_slow = (2.0 * f).abs() > (dx_old * df).abs();
        if newton_leaves || too_slow {
            dx_old = dx;
            dx = (h - l) / 2.0;
            rts = l + dx;
            if l == rts {
                break;
            }
        } else {
            dx_old = dx;
            dx = f / df;
            let previous = rts;
            rts -= dx;
            if previous == rts {
                break;
            }
        }
        if dx.abs() < ROOT_TOLERANCE {
            break;
        }
        f = poly_eval(p, rts);
        df = poly_eval(deri, rts);
        if f < 0.0 {
            l = rts;
        } else {
            h = rts;
        }
    }
    rts
}

/// Newton refinement of an approximate root, keeping a step only if it
/// improves the residual.
pub fn polish(p: &[f64], x: f64, iterations: usize) -> f64 {
    let deri = poly_deri(p);
    let mut x = x;
    for _ in 0..iterations {
        let df = poly_eval(deri.as_slice(), x);
        if df.abs() > EPS {
            let next = x - poly_eval(p, x) / df;
            if poly_eval(p, next).abs() < poly_eval(p, x).abs() {
                x = next;
            }
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roots(found: &Roots, expected: &[f64]) {
        let mut found: Vec<f64> = found.iter().copied().filter(|x| x.is_finite()).collect();
        found.sort_by(f64::total_cmp);
        found.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        assert_eq!(found.len(), expected.len(), "roots {found:?}, expected {expected:?}");
        for (f, e) in found.iter().zip(expected) {
            assert!((f - e).abs() < 1e-9, "root {f} != {e}");
        }
    }

    #[test]
    fn cubic_three_real_roots() {
        // (x - 1)(x - 2)(x + 3) = x³ - 7x + 6
        assert_roots(&solve_cubic(1.0, 0.0, -7.0, 6.0), &[-3.0, 1.0, 2.0]);
    }

    #[test]
    fn cubic_single_real_root() {
        // (x - 2)(x² + 1)
        assert_roots(&solve_cubic(1.0, -2.0, 1.0, -2.0), &[2.0]);
    }

    #[test]
    fn cubic_reduces_to_quadratic_and_linear() {
        assert_roots(&solve_cubic(0.0, 1.0, -3.0, 2.0), &[1.0, 2.0]);
        assert_roots(&solve_cubic(0.0, 0.0, 2.0, -4.0), &[2.0]);
        // zero constant term: x·(x - 1)(x - 4)
        assert_roots(&solve_cubic(1.0, -5.0, 4.0, 0.0), &[0.0, 1.0, 4.0]);
    }

    #[test]
    fn quadratic_tolerates_rounding_in_discriminant() {
        let roots = solve_quadratic(1.0, -3.0, 2.0);
        assert_eq!(roots.as_slice(), &[2.0, 1.0]);
        // (x - 0.1)² with the constant nudged just above 0.01
        let roots = solve_quadratic(1.0, -0.2, 0.01 + 1e-12);
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - 0.1).abs() < 1e-9);
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
        assert_eq!(solve_quadratic(0.0, 2.0, -4.0).as_slice(), &[2.0]);
    }

    #[test]
    fn quartic_four_real_roots() {
        // (x - 1)(x + 1)(x - 2)(x + 3) = x⁴ + x³ - 7x² - x + 6
        assert_roots(&solve_quart_monic(1.0, -7.0, -1.0, 6.0), &[-3.0, -1.0, 1.0, 2.0]);
    }

    #[test]
    fn quartic_two_real_roots() {
        // (x - 1)(x - 3)(x² + 1) = x⁴ - 4x³ + 4x² - 4x + 3
        assert_roots(&solve_quart_monic(-4.0, 4.0, -4.0, 3.0), &[1.0, 3.0]);
    }

    #[test]
    fn quartic_with_zero_roots() {
        // x²(x - 2)(x - 5)
        assert_roots(&solve_quart_monic(-7.0, 10.0, 0.0, 0.0), &[0.0, 2.0, 5.0]);
    }

    #[test]
    fn sorted_quartic_is_ascending() {
        let roots = solve_quart_monic_sorted(1.0, -7.0, -1.0, 6.0);
        assert!(roots.as_slice().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn derivatives() {
        let p = [2.0, -3.0, 0.0, 5.0];
        assert_eq!(poly_deri(&p).as_slice(), &[6.0, -6.0, 0.0]);
        assert_eq!(poly_monic_deri(&[1.0, 3.0, 3.0, 1.0]).as_slice(), &[1.0, 2.0, 1.0]);
        assert_eq!(poly_eval(&p, 2.0), 9.0);
    }

    #[test]
    fn shrink_finds_bracketed_root() {
        // x⁵ - 2 has a single real root at 2^(1/5)
        let p = [1.0, 0.0, 0.0, 0.0, 0.0, -2.0];
        let root = shrink_interval(&p, 0.0, 2.0);
        assert!((root - 2.0_f64.powf(0.2)).abs() < 1e-12);
        let root = shrink_interval(&p, 2.0, 0.0);
        assert!((root - 2.0_f64.powf(0.2)).abs() < 1e-12);
    }

    #[test]
    fn polish_improves_residual() {
        let p = [1.0, 0.0, -2.0];
        let x = polish(&p, 1.4, 3);
        assert!((x - 2.0_f64.sqrt()).abs() < 1e-10);
    }
}
