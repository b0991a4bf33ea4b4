use tracing::trace;

use crate::buffer::FixedVec;
use crate::limits::{DirectedLimits, Direction, KinematicLimits, KinematicState, Order};
use crate::profile::{ControlSigns, Profile, ReachedLimits};
use crate::roots::{poly_deri, poly_eval, poly_monic_deri, shrink_interval, solve_cubic, solve_quart_monic_sorted};
use crate::tolerance::{EPS, ROOT_TOLERANCE, T_PRECISION};

type Shape = fn(&Step2, &DirectedLimits) -> Option<Profile>;

/// Fixed-time jerk-limited solve: finds a profile of exactly `tf` seconds.
#[derive(Clone, Copy, Debug)]
pub struct Step2 {
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,
    tf: f64,

    v0: f64,
    a0: f64,
    vf: f64,
    af: f64,
    pd: f64,
    tf_tf: f64,
    tf_p3: f64,
    tf_p4: f64,
    vd: f64,
    vd_vd: f64,
    vf_vf: f64,
    ad: f64,
    ad_ad: f64,
    a0_a0: f64,
    af_af: f64,
    a0_p3: f64,
    a0_p4: f64,
    a0_p5: f64,
    a0_p6: f64,
    af_p3: f64,
    af_p4: f64,
    af_p5: f64,
    af_p6: f64,
    j_max_j_max: f64,
    // position offsets of constant-velocity motions over tf
    g1: f64,
    g2: f64,
}

impl Step2 {
    /// Shapes in priority order, the first valid one wins.
    const SHAPES: [Shape; 9] = [
        Self::time_acc0_acc1_vel,
        Self::time_vel,
        Self::time_acc0_vel,
        Self::time_acc1_vel,
        Self::time_acc0_acc1,
        Self::time_acc0,
        Self::time_acc1,
        Self::time_none_smooth,
        Self::time_none,
    ];

    pub fn new(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits, tf: f64) -> Self {
        let (v0, a0, vf, af) = (start.vel, start.acc, goal.vel, goal.acc);
        let pd = goal.pos - start.pos;
        let (vd, ad) = (vf - v0, af - a0);
        let (tf_tf, a0_a0, af_af) = (tf * tf, a0 * a0, af * af);
        let (a0_p3, af_p3) = (a0_a0 * a0, af_af * af);
        let (a0_p4, af_p4) = (a0_a0 * a0_a0, af_af * af_af);
        Self {
            start: *start,
            goal: *goal,
            limits: *limits,
            tf,
            v0,
            a0,
            vf,
            af,
            pd,
            tf_tf,
            tf_p3: tf_tf * tf,
            tf_p4: tf_tf * tf_tf,
            vd,
            vd_vd: vd * vd,
            vf_vf: vf * vf,
            ad,
            ad_ad: ad * ad,
            a0_a0,
            af_af,
            a0_p3,
            a0_p4,
            a0_p5: a0_p3 * a0_a0,
            a0_p6: a0_p4 * a0_a0,
            af_p3,
            af_p4,
            af_p5: af_p3 * af_af,
            af_p6: af_p4 * af_af,
            j_max_j_max: limits.j_max * limits.j_max,
            g1: -pd + tf * v0,
            g2: -2.0 * pd + tf * (v0 + vf),
        }
    }

    /// A profile of duration `tf`, or `None` if no shape fits.
    pub fn get_profile(&self) -> Option<Profile> {
        if self.tf < T_PRECISION {
            return self.time_standstill(&self.limits.directed(Direction::Up));
        }
        let first = if self.pd > self.tf * self.v0 {
            Direction::Up
        } else {
            Direction::Down
        };
        let directions = [first, first.reversed()].map(|d| self.limits.directed(d));

        // From rest the smooth shape is preferred over the plateau shapes.
        let from_rest = self.v0.abs() < EPS && self.a0.abs() < EPS && self.af.abs() < EPS;
        if from_rest && (self.pd.abs() < EPS || self.vd.abs() < EPS) {
            if let Some(profile) = directions.iter().find_map(|lim| self.time_none_smooth(lim)) {
                return Some(profile);
            }
        }

        for lim in &directions {
            for shape in Self::SHAPES {
                if let Some(profile) = shape(self, lim) {
                    trace!(tf = self.tf, limits = ?profile.limits, "third order step 2 done");
                    return Some(profile);
                }
            }
        }
        trace!(tf = self.tf, "third order step 2 found no profile");
        None
    }

    fn new_profile(&self) -> Profile {
        Profile::new(Order::Third, &self.start, &self.goal)
    }

    /// No time at all, when the goal already equals the start.
    fn time_standstill(&self, lim: &DirectedLimits) -> Option<Profile> {
        if self.pd.abs() >= EPS || self.vd.abs() >= EPS || self.ad.abs() >= EPS {
            return None;
        }
        let mut profile = self.new_profile();
        profile
            .check_with_timing(ControlSigns::Uddu, ReachedLimits::None, self.tf, lim.j_max, lim)
            .then_some(profile)
    }

    /// Both acceleration plateaus and a cruise.
    fn time_acc0_acc1_vel(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { a0, vf, af, tf, pd, vd, vd_vd, ad, a0_a0, af_af, a0_p3, a0_p4, af_p3, af_p4, j_max_j_max, g1, .. } = *self;
        let DirectedLimits { a_max, a_min, j_max, .. } = *lim;

        let mut profile = self.new_profile();
        if (2.0 * (a_max - a_min) + ad) / j_max < tf {
            let h1 = ((a0_p4 + af_p4 - 4.0 * a0_p3 * (2.0 * a_max + a_min) / 3.0 - 4.0 * af_p3 * (a_max + 2.0 * a_min) / 3.0 + 2.0 * (a0_a0 - af_af) * a_max * a_max + (4.0 * a0 * a_max - 2.0 * a0_a0) * (af_af - 2.0 * af * a_min + (a_min - a_max) * a_min + 2.0 * j_max * (a_min * tf - vd)) + 2.0 * af_af * (a_min * a_min + 2.0 * j_max * (a_max * tf - vd)) + 4.0 * j_max * (2.0 * a_min * (af * vd + j_max * g1) + (a_max * a_max - a_min * a_min) * vd + j_max * vd_vd) + 8.0 * a_max * j_max_j_max * (pd - tf * vf)) / (a_max * a_min) + 4.0 * af_af + 2.0 * a0_a0 + (4.0 * af + a_max - a_min) * (a_max - a_min) + 4.0 * j_max * (a_min - a_max + j_max * tf - 2.0 * af) * tf).sqrt() * j_max.abs() / j_max;
            profile.t[0] = (-a0 + a_max) / j_max;
            profile.t[1] = (-(af_af - a0_a0 + 2.0 * a_max * a_max + a_min * (a_min - 2.0 * ad - 3.0 * a_max) + 2.0 * j_max * (a_min * tf - vd)) + a_min * h1) / (2.0 * (a_max - a_min) * j_max);
            profile.t[2] = a_max / j_max;
            profile.t[3] = (a_min - a_max + h1) / (2.0 * j_max);
            profile.t[4] = -a_min / j_max;
            profile.t[5] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + profile.t[3] + 2.0 * profile.t[4] + af / j_max);
            profile.t[6] = profile.t[4] + af / j_max;
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc0Acc1Vel, tf, j_max, lim) {
                return Some(profile);
            }
        }
        if (-a0 + 4.0 * a_max - af) / j_max < tf {
            profile.t[0] = (-a0 + a_max) / j_max;
            profile.t[1] = (3.0 * (a0_p4 + af_p4) - 4.0 * (a0_p3 + af_p3) * a_max - 4.0 * af_p3 * a_max + 24.0 * (a0 + af) * a_max * a_max * a_max - 6.0 * (af_af + a0_a0) * (a_max * a_max - 2.0 * j_max * vd) + 6.0 * a0_a0 * (af_af - 2.0 * af * a_max - 2.0 * a_max * j_max * tf) - 12.0 * a_max * a_max * (2.0 * a_max * a_max - 2.0 * a_max * j_max * tf + j_max * vd) - 24.0 * af * a_max * j_max * vd + 12.0 * j_max_j_max * (2.0 * a_max * g1 + vd_vd)) / (12.0 * a_max * j_max * (a0_a0 + af_af - 2.0 * (a0 + af) * a_max + 2.0 * (a_max * a_max - a_max * j_max * tf + j_max * vd)));
            profile.t[2] = a_max / j_max;
            profile.t[3] = (-a0_a0 - af_af + 2.0 * a_max * (a0 + af - 2.0 * a_max) - 2.0 * j_max * vd) / (2.0 * a_max * j_max) + tf;
            profile.t[4] = profile.t[2];
            profile.t[5] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + profile.t[3] + 2.0 * profile.t[4] - af / j_max);
            profile.t[6] = profile.t[4] - af / j_max;
            if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::Acc0Acc1Vel, tf, j_max, lim) {
                return Some(profile);
            }
        }
        None
    }

    /// Cruise without acceleration plateaus.
    fn time_vel(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { v0, a0, vf, af, tf, pd, tf_tf, vd, vd_vd, ad, a0_a0, af_af, a0_p3, a0_p4, a0_p5, a0_p6, af_p3, af_p4, af_p6, j_max_j_max, g1, .. } = *self;
        let DirectedLimits { a_max, j_max, .. } = *lim;

        let mut profile = self.new_profile();
        let tz_min = (-a0 / j_max).max(0.0);
        let tz_max = ((tf - a0 / j_max) / 2.0).min((a_max - a0) / j_max);
        if v0.abs() < EPS && a0.abs() < EPS && vf.abs() < EPS && af.abs() < EPS {
            let polynom = [
                1.0,
                -tf / 2.0,
                0.0,
                pd / (2.0 * j_max),
            ];
            let roots = solve_cubic(polynom[0], polynom[1], polynom[2], polynom[3]);
            for mut t in roots.iter().copied() {
                if t > tf / 4.0 {
                    continue;
                }
                if t > EPS {
                    let orig = -pd + j_max * t * t * (tf - 2.0 * t);
                    let deriv = 2.0 * j_max * t * (tf - 3.0 * t);
                    t -= orig / deriv;
                }
                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = t;
                profile.t[3] = tf - 4.0 * t;
                profile.t[4] = t;
                profile.t[5] = 0.0;
                profile.t[6] = t;
                if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Vel, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        } else {
            let p1 = af_af - 2.0 * j_max * (-2.0 * af * tf + j_max * tf_tf + 3.0 * vd);
            let ph1 = af_p3 - 3.0 * j_max_j_max * g1 - 3.0 * af * j_max * vd;
            let ph2 = af_p4 + 8.0 * af_p3 * j_max * tf + 12.0 * j_max * (3.0 * j_max * vd_vd - af_af * vd + 2.0 * af * j_max * (g1 - tf * vd) - 2.0 * j_max_j_max * tf * g1);
            let ph3 = a0 * (af - j_max * tf);
            let ph4 = j_max * (-ad + j_max * tf);
            let polynom = [
                1.0,
                (15.0 * a0_a0 + af_af + 4.0 * af * j_max * tf - 16.0 * ph3 - 2.0 * j_max * (j_max * tf_tf + 3.0 * vd)) / (4.0 * ph4),
                (29.0 * a0_p3 - 2.0 * af_p3 - 33.0 * a0 * ph3 + 6.0 * j_max_j_max * g1 + 6.0 * af * j_max * vd + 6.0 * a0 * p1) / (6.0 * j_max * ph4),
                (61.0 * a0_p4 - 76.0 * a0_a0 * ph3 - 16.0 * a0 * ph1 + 30.0 * a0_a0 * p1 + ph2) / (24.0 * j_max_j_max * ph4),
                a0 * (7.0 * a0_p4 - 10.0 * a0_a0 * ph3 - 4.0 * a0 * ph1 + 6.0 * a0_a0 * p1 + ph2) / (12.0 * j_max_j_max * j_max * ph4),
                (7.0 * a0_p6 + af_p6 - 12.0 * a0_p4 * ph3 + 48.0 * af_p3 * j_max_j_max * g1 - 8.0 * a0_p3 * ph1 - 72.0 * j_max_j_max * j_max * (j_max * g1 * g1 + vd_vd * vd + 2.0 * af * g1 * vd) - 6.0 * af_p4 * j_max * vd + 36.0 * af_af * j_max_j_max * vd_vd + 9.0 * a0_p4 * p1 + 3.0 * a0_a0 * ph2) / (144.0 * j_max_j_max * j_max_j_max * ph4),
            ];
            let deriv = poly_monic_deri(&polynom);
            let d_extremas = solve_quart_monic_sorted(deriv[1], deriv[2], deriv[3], deriv[4]);
            let mut roots: FixedVec<f64, 6> = FixedVec::new();
            let mut tz_current = tz_min;
            for mut tz in d_extremas.iter().copied() {
                if tz >= tz_max {
                    continue;
                }
                let orig = poly_eval(&deriv, tz);
                if orig.abs() > ROOT_TOLERANCE {
                    tz -= orig / poly_eval(&poly_deri(&deriv), tz);
                }
                let val_new = poly_eval(&polynom, tz);
                if val_new.abs() < 64.0 * poly_eval(&poly_deri(&deriv), tz).abs() * ROOT_TOLERANCE {
                    let _ = roots.push(tz);
                } else if poly_eval(&polynom, tz_current) * val_new < 0.0 {
                    let _ = roots.push(shrink_interval(&polynom, tz_current, tz));
                }
                tz_current = tz;
            }
            if poly_eval(&polynom, tz_current) * poly_eval(&polynom, tz_max) < 0.0 {
                let _ = roots.push(shrink_interval(&polynom, tz_current, tz_max));
            }
            for mut t in roots.iter().copied() {
                {
                    let h1 = ((a0_a0 + af_af) / (2.0 * j_max_j_max) + (2.0 * a0 * t + j_max * t * t - vd) / j_max).sqrt();
                    let orig = -pd - (2.0 * a0_p3 + 4.0 * af_p3 + 24.0 * a0 * j_max * t * (af + j_max * (h1 + t - tf)) + 6.0 * a0_a0 * (af + j_max * (2.0 * t - tf)) + 6.0 * (a0_a0 + af_af) * j_max * h1 + 12.0 * af * j_max * (j_max * t * t - vd) + 12.0 * j_max_j_max * (j_max * t * t * (h1 + t - tf) - tf * v0 - h1 * vd)) / (12.0 * j_max_j_max);
                    let deriv_newton = -(a0 + j_max * t) * (3.0 * (h1 + t) - 2.0 * tf + (a0 + 2.0 * af) / j_max);
                    t -= orig / deriv_newton;
                }
                if t > tf || t.is_nan() {
                    continue;
                }
                let h1 = ((a0_a0 + af_af) / (2.0 * j_max_j_max) + (t * (2.0 * a0 + j_max * t) - vd) / j_max).sqrt();
                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = t + a0 / j_max;
                profile.t[3] = tf - 2.0 * (t + h1) - (a0 + af) / j_max;
                profile.t[4] = h1;
                profile.t[5] = 0.0;
                profile.t[6] = h1 + af / j_max;
                if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Vel, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        {
            let ph1 = af_af - 2.0 * j_max * (2.0 * af * tf + j_max * tf_tf - 3.0 * vd);
            let ph2 = af_p3 - 3.0 * j_max_j_max * g1 + 3.0 * af * j_max * vd;
            let ph3 = 2.0 * j_max * tf * g1 + 3.0 * vd_vd;
            let ph4 = af_p4 - 8.0 * af_p3 * j_max * tf + 12.0 * j_max * (j_max * ph3 + af_af * vd + 2.0 * af * j_max * (g1 - tf * vd));
            let ph5 = af + j_max * tf;
            let polynom = [
                1.0,
                (5.0 * a0 - ph5) / j_max,
                (39.0 * a0_a0 - ph1 - 16.0 * a0 * ph5) / (4.0 * j_max_j_max),
                (55.0 * a0_p3 - 33.0 * a0_a0 * ph5 - 6.0 * a0 * ph1 + 2.0 * ph2) / (6.0 * j_max_j_max * j_max),
                (101.0 * a0_p4 + ph4 - 76.0 * a0_p3 * ph5 - 30.0 * a0_a0 * ph1 + 16.0 * a0 * ph2) / (24.0 * j_max_j_max * j_max_j_max),
                a0 * (11.0 * a0_p4 + ph4 - 10.0 * a0_p3 * ph5 - 6.0 * a0_a0 * ph1 + 4.0 * a0 * ph2) / (12.0 * j_max_j_max * j_max_j_max * j_max),
                (11.0 * a0_p6 - af_p6 - 12.0 * a0_p5 * ph5 - 48.0 * af_p3 * j_max_j_max * g1 - 9.0 * a0_p4 * ph1 + 72.0 * j_max_j_max * j_max * (j_max * g1 * g1 - vd_vd * vd - 2.0 * af * g1 * vd) - 6.0 * af_p4 * j_max * vd - 36.0 * af_af * j_max_j_max * vd_vd + 8.0 * a0_p3 * ph2 + 3.0 * a0_a0 * ph4) / (144.0 * j_max_j_max * j_max_j_max * j_max_j_max),
            ];
            let deriv = poly_monic_deri(&polynom);
            let dderiv = poly_monic_deri(&deriv);
            let mut dd_tz_current = tz_min;
            let mut dd_tz_intervals: FixedVec<(f64, f64), 6> = FixedVec::new();
            let dd_extremas = solve_quart_monic_sorted(dderiv[1], dderiv[2], dderiv[3], dderiv[4]);
            for mut tz in dd_extremas.iter().copied() {
                if tz >= tz_max {
                    continue;
                }
                let orig = poly_eval(&dderiv, tz);
                if orig.abs() > ROOT_TOLERANCE {
                    tz -= orig / poly_eval(&poly_deri(&dderiv), tz);
                }
                if poly_eval(&deriv, dd_tz_current) * poly_eval(&deriv, tz) < 0.0 {
                    let _ = dd_tz_intervals.push((dd_tz_current, tz));
                }
                dd_tz_current = tz;
            }
            if poly_eval(&deriv, dd_tz_current) * poly_eval(&deriv, tz_max) < 0.0 {
                let _ = dd_tz_intervals.push((dd_tz_current, tz_max));
            }
            let mut roots: FixedVec<f64, 6> = FixedVec::new();
            let mut tz_current = tz_min;
            for &(left, right) in dd_tz_intervals.iter() {
                let tz = shrink_interval(&deriv, left, right);
                if tz >= tz_max {
                    continue;
                }
                let p_val = poly_eval(&polynom, tz);
                if p_val.abs() < 64.0 * poly_eval(&dderiv, tz).abs() * ROOT_TOLERANCE {
                    let _ = roots.push(tz);
                } else if poly_eval(&polynom, tz_current) * p_val < 0.0 {
                    let _ = roots.push(shrink_interval(&polynom, tz_current, tz));
                }
                tz_current = tz;
            }
            if poly_eval(&polynom, tz_current) * poly_eval(&polynom, tz_max) < 0.0 {
                let _ = roots.push(shrink_interval(&polynom, tz_current, tz_max));
            }
            for mut t in roots.iter().copied() {
                {
                    let mut h1 = ((af_af - a0_a0) / (2.0 * j_max_j_max) - ((2.0 * a0 + j_max * t) * t - vd) / j_max).sqrt();
                    let mut orig = -pd + (af_p3 - a0_p3 + 3.0 * a0_a0 * j_max * (tf - 2.0 * t)) / (6.0 * j_max_j_max) + (2.0 * a0 + j_max * t) * t * (tf - t) + (j_max * h1 - af) * h1 * h1 + tf * v0;
                    let mut deriv_newton = (a0 + j_max * t) * (2.0 * (af + j_max * tf) - 3.0 * j_max * (h1 + t) - a0) / j_max;
                    t -= orig / deriv_newton;
                    h1 = ((af_af - a0_a0) / (2.0 * j_max_j_max) - ((2.0 * a0 + j_max * t) * t - vd) / j_max).sqrt();
                    orig = -pd + (af_p3 - a0_p3 + 3.0 * a0_a0 * j_max * (tf - 2.0 * t)) / (6.0 * j_max_j_max) + (2.0 * a0 + j_max * t) * t * (tf - t) + (j_max * h1 - af) * h1 * h1 + tf * v0;
                    if orig.abs() > 1e-9 {
                        deriv_newton = (a0 + j_max * t) * (2.0 * (af + j_max * tf) - 3.0 * j_max * (h1 + t) - a0) / j_max;
                        t -= orig / deriv_newton;
                    }
                }
                let h1 = ((af_af - a0_a0) / (2.0 * j_max_j_max) - ((2.0 * a0 + j_max * t) * t - vd) / j_max).sqrt();
                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = t + a0 / j_max;
                profile.t[3] = tf - 2.0 * (t + h1) + ad / j_max;
                profile.t[4] = h1;
                profile.t[5] = 0.0;
                profile.t[6] = h1 - af / j_max;
                if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::Vel, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        None
    }

    fn time_acc0_vel(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { a0, vf, af, tf, pd, vd, vd_vd, ad, a0_a0, af_af, a0_p3, a0_p4, af_p3, af_p4, j_max_j_max, .. } = *self;
        let DirectedLimits { a_max, a_min, j_max, .. } = *lim;

        let mut profile = self.new_profile();
        if tf < ((-a0 + a_max) / j_max).max(0.0) + (a_max / j_max).max(0.0) {
            return None;
        }
        let ph1 = 12.0 * j_max * (-a_max * a_max * vd - j_max * vd_vd + 2.0 * a_max * j_max * (-pd + tf * vf));
        {
            let polynom = [
                2.0 * a_max / j_max,
                (a0_a0 - af_af + 2.0 * ad * a_max + a_max * a_max + 2.0 * j_max * (vd - a_max * tf)) / j_max_j_max,
                0.0,
                -(-3.0 * (a0_p4 + af_p4) + 4.0 * (af_p3 + 2.0 * a0_p3) * a_max - 12.0 * a0 * a_max * (af_af - 2.0 * j_max * vd) + 6.0 * a0_a0 * (af_af - a_max * a_max - 2.0 * j_max * vd) + 6.0 * af_af * (a_max * a_max - 2.0 * a_max * j_max * tf + 2.0 * j_max * vd) + ph1) / (12.0 * j_max_j_max * j_max_j_max),
            ];
            let t_min = -af / j_max;
            let t_max = (tf - (2.0 * a_max - a0) / j_max).min(-a_min / j_max);
            let roots = solve_quart_monic_sorted(polynom[0], polynom[1], polynom[2], polynom[3]);
            for mut t in roots.iter().copied() {
                if t < t_min || t > t_max {
                    continue;
                }
                if t > EPS {
                    let h1 = j_max * t * t + vd;
                    let orig = (-3.0 * (a0_p4 + af_p4) + 4.0 * (af_p3 + 2.0 * a0_p3) * a_max - 24.0 * af * a_max * j_max_j_max * t * t - 12.0 * a0 * a_max * (af_af - 2.0 * j_max * h1) + 6.0 * a0_a0 * (af_af - a_max * a_max - 2.0 * j_max * h1) + 6.0 * af_af * (a_max * a_max - 2.0 * a_max * j_max * tf + 2.0 * j_max * h1) - 12.0 * j_max * (a_max * a_max * h1 + j_max * h1 * h1 + 2.0 * a_max * j_max * (pd + j_max * t * t * (t - tf) - tf * vf))) / (24.0 * a_max * j_max_j_max);
                    let deriv = -t * (a0_a0 - af_af + 2.0 * a_max * (ad - j_max * tf) + a_max * a_max + 3.0 * a_max * j_max * t + 2.0 * j_max * h1) / a_max;
                    t -= orig / deriv;
                }
                let h1 = ((a0_a0 - af_af) / 2.0 + j_max * (j_max * t * t + vd)) / a_max;
                profile.t[0] = (-a0 + a_max) / j_max;
                profile.t[1] = (h1 - a_max) / j_max;
                profile.t[2] = a_max / j_max;
                profile.t[3] = tf - (h1 + ad + a_max) / j_max - 2.0 * t;
                profile.t[4] = t;
                profile.t[5] = 0.0;
                profile.t[6] = af / j_max + t;
                if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc0Vel, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        {
            let polynom = [
                -2.0 * a_max / j_max,
                -(a0_a0 + af_af - 2.0 * (a0 + af) * a_max + a_max * a_max + 2.0 * j_max * (vd - a_max * tf)) / j_max_j_max,
                0.0,
                (3.0 * (a0_p4 + af_p4) - 4.0 * (af_p3 + 2.0 * a0_p3) * a_max + 6.0 * a0_a0 * (af_af + a_max * a_max + 2.0 * j_max * vd) - 12.0 * a0 * a_max * (af_af + 2.0 * j_max * vd) + 6.0 * af_af * (a_max * a_max - 2.0 * a_max * j_max * tf + 2.0 * j_max * vd) - ph1) / (12.0 * j_max_j_max * j_max_j_max),
            ];
            let t_min = af / j_max;
            let t_max = (tf - a_max / j_max).min(a_max / j_max);
            let roots = solve_quart_monic_sorted(polynom[0], polynom[1], polynom[2], polynom[3]);
            for mut t in roots.iter().copied() {
                if t < t_min || t > t_max {
                    continue;
                }
                {
                    let h1 = j_max * t * t - vd;
                    let orig = -(3.0 * (a0_p4 + af_p4) - 4.0 * (2.0 * a0_p3 + af_p3) * a_max + 24.0 * af * a_max * j_max_j_max * t * t - 12.0 * a0 * a_max * (af_af - 2.0 * j_max * h1) + 6.0 * a0_a0 * (af_af + a_max * a_max - 2.0 * j_max * h1) + 6.0 * af_af * (a_max * a_max - 2.0 * j_max * (tf * a_max + h1)) + 12.0 * j_max * (-a_max * a_max * h1 + j_max * h1 * h1 - 2.0 * a_max * j_max * (-pd + j_max * t * t * (t - tf) + tf * vf))) / (24.0 * a_max * j_max_j_max);
                    let deriv = t * (a0_a0 + af_af - 2.0 * j_max * h1 - 2.0 * (a0 + af + j_max * tf) * a_max + a_max * a_max + 3.0 * a_max * j_max * t) / a_max;
                    t -= orig / deriv;
                }
                let h1 = ((a0_a0 + af_af) / 2.0 + j_max * (vd - j_max * t * t)) / a_max;
                profile.t[0] = (-a0 + a_max) / j_max;
                profile.t[1] = (h1 - a_max) / j_max;
                profile.t[2] = a_max / j_max;
                profile.t[3] = tf - (h1 - a0 - af + a_max) / j_max - 2.0 * t;
                profile.t[4] = t;
                profile.t[5] = 0.0;
                profile.t[6] = -(af / j_max) + t;
                if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::Acc0Vel, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        None
    }

    fn time_acc1_vel(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { v0, a0, af, tf, pd, vd, vd_vd, ad, a0_a0, af_af, a0_p3, a0_p4, af_p3, af_p4, j_max_j_max, g1, .. } = *self;
        let DirectedLimits { a_max, a_min, j_max, .. } = *lim;

        let mut profile = self.new_profile();
        {
            let ph1 = a0_a0 + af_af - a_min * (a0 + 2.0 * af - a_min) - 2.0 * j_max * (vd - a_min * tf);
            let ph2 = 2.0 * a_min * (j_max * g1 + af * vd) - a_min * a_min * vd + j_max * vd_vd;
            let ph3 = af_af + a_min * (a_min - 2.0 * af) - 2.0 * j_max * (vd - a_min * tf);
            let polynom = [
                2.0 * (2.0 * a0 - a_min) / j_max,
                (4.0 * a0_a0 + ph1 - 3.0 * a0 * a_min) / j_max_j_max,
                2.0 * a0 * ph1 / (j_max_j_max * j_max),
                (3.0 * (a0_p4 + af_p4) - 4.0 * (a0_p3 + 2.0 * af_p3) * a_min + 6.0 * af_af * (a_min * a_min - 2.0 * j_max * vd) + 12.0 * j_max * ph2 + 6.0 * a0_a0 * ph3) / (12.0 * j_max_j_max * j_max_j_max),
            ];
            let t_min = -a0 / j_max;
            let t_max = ((tf + 2.0 * a_min / j_max - (a0 + af) / j_max) / 2.0).min((a_max - a0) / j_max);
            let roots = solve_quart_monic_sorted(polynom[0], polynom[1], polynom[2], polynom[3]);
            for mut t in roots.iter().copied() {
                if t < t_min || t > t_max {
                    continue;
                }
                if (a0 + j_max * t).abs() > 16.0 * EPS {
                    let h0 = j_max * t * t;
                    let orig = -pd + (3.0 * (a0_p4 + af_p4) - 8.0 * af_p3 * a_min - 4.0 * a0_p3 * a_min + 6.0 * af_af * (a_min * a_min + 2.0 * j_max * (h0 - vd)) + 6.0 * a0_a0 * (af_af - 2.0 * af * a_min + a_min * a_min + 2.0 * a_min * j_max * (-2.0 * t + tf) + 2.0 * j_max * (5.0 * h0 - vd)) + 24.0 * a0 * j_max * t * (a0_a0 + af_af - 2.0 * af * a_min + a_min * a_min + 2.0 * j_max * (a_min * (-t + tf) + h0 - vd)) - 24.0 * af * a_min * j_max * (h0 - vd) + 12.0 * j_max * (a_min * a_min * (h0 - vd) + j_max * (h0 - vd) * (h0 - vd))) / (24.0 * a_min * j_max_j_max) + h0 * (tf - t) + tf * v0;
                    let deriv = (a0 + j_max * t) * ((a0_a0 + af_af) / (a_min * j_max) + (a_min - a0 - 2.0 * af) / j_max + (4.0 * a0 * t + 2.0 * h0 - 2.0 * vd) / a_min + 2.0 * tf - 3.0 * t);
                    t -= orig / deriv;
                }
                let h1 = -((a0_a0 + af_af) / 2.0 + j_max * (-vd + 2.0 * a0 * t + j_max * t * t)) / a_min;
                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = a0 / j_max + t;
                profile.t[3] = tf - (h1 - a_min + a0 + af) / j_max - 2.0 * t;
                profile.t[4] = -a_min / j_max;
                profile.t[5] = (h1 + a_min) / j_max;
                profile.t[6] = profile.t[4] + af / j_max;
                if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc1Vel, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        {
            let ph1 = a0_a0 - af_af + (2.0 * af - a0) * a_max - a_max * a_max - 2.0 * j_max * (vd - a_max * tf);
            let ph2 = a_max * a_max + 2.0 * j_max * vd;
            let ph3 = af_af + ph2 - 2.0 * a_max * (af + j_max * tf);
            let ph4 = 2.0 * a_max * j_max * g1 + a_max * a_max * vd + j_max * vd_vd;
            let polynom = [
                (4.0 * a0 - 2.0 * a_max) / j_max,
                (4.0 * a0_a0 - 3.0 * a0 * a_max + ph1) / j_max_j_max,
                2.0 * a0 * ph1 / (j_max_j_max * j_max),
                (3.0 * (a0_p4 + af_p4) - 4.0 * (a0_p3 + 2.0 * af_p3) * a_max - 24.0 * af * a_max * j_max * vd + 12.0 * j_max * ph4 - 6.0 * a0_a0 * ph3 + 6.0 * af_af * ph2) / (12.0 * j_max_j_max * j_max_j_max),
            ];
            let t_min = -a0 / j_max;
            let t_max = ((tf + ad / j_max - 2.0 * a_max / j_max) / 2.0).min((a_max - a0) / j_max);
            let roots = solve_quart_monic_sorted(polynom[0], polynom[1], polynom[2], polynom[3]);
            for t in roots.iter().copied() {
                if t > t_max || t < t_min {
                    continue;
                }
                let h1 = ((a0_a0 - af_af) / 2.0 + j_max_j_max * t * t - j_max * (vd - 2.0 * a0 * t)) / a_max;
                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = t + a0 / j_max;
                profile.t[3] = tf + (h1 + ad - a_max) / j_max - 2.0 * t;
                profile.t[4] = a_max / j_max;
                profile.t[5] = -(h1 + a_max) / j_max;
                profile.t[6] = profile.t[4] - af / j_max;
                if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::Acc1Vel, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        None
    }

    /// Both plateaus, no cruise. The jerk is reduced to stretch the profile
    /// to the requested duration.
    fn time_acc0_acc1(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { v0, a0, vf, af, tf, pd, tf_tf, vd, vd_vd, ad, a0_a0, af_af, a0_p3, af_p3, g1, g2, .. } = *self;
        let DirectedLimits { a_max, a_min, j_max, .. } = *lim;

        let mut profile = self.new_profile();
        if a0.abs() < EPS && af.abs() < EPS {
            let h1 = 2.0 * a_min * g1 + vd_vd + a_max * (2.0 * pd + a_min * tf_tf - 2.0 * tf * vf);
            let h2 = (a_max - a_min) * (-a_min * vd + a_max * (a_min * tf - vd));
            let jf = h2 / h1;
            profile.t[0] = a_max / jf;
            profile.t[1] = (-2.0 * a_max * h1 + a_min * a_min * g2) / h2;
            profile.t[2] = profile.t[0];
            profile.t[3] = 0.0;
            profile.t[4] = -a_min / jf;
            profile.t[5] = tf - (2.0 * profile.t[0] + profile.t[1] + 2.0 * profile.t[4]);
            profile.t[6] = profile.t[4];
            return profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc0Acc1, tf, jf, lim).then_some(profile);
        }
        // Full jerk: at the minimal duration the reduced jerk of the root below
        // loses the limit to cancellation.
        {
            profile.t[0] = (a_max - a0) / j_max;
            profile.t[1] = -((af_af - a0_a0) / 2.0 + a_max * a_max + a_min * a_min - ad * a_min - 2.0 * a_max * a_min + j_max * (a_min * tf - vd)) / ((a_max - a_min) * j_max);
            profile.t[2] = a_max / j_max;
            profile.t[3] = 0.0;
            profile.t[4] = -a_min / j_max;
            profile.t[5] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + 2.0 * profile.t[4] + af / j_max);
            profile.t[6] = profile.t[4] + af / j_max;
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc0Acc1, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let h1 = (144.0 * ((a_max - a_min) * (-a_min * vd + a_max * (a_min * tf - vd)) - af_af * (a_max * tf - vd) + 2.0 * af * a_min * (a_max * tf - vd) + a0_a0 * (a_min * tf + v0 - vf) - 2.0 * a0 * a_max * (a_min * tf - vd)).powi(2) + 48.0 * ad * (3.0 * a0_p3 - 3.0 * af_p3 + 12.0 * a_max * a_min * (-a_max + a_min) + 4.0 * af_af * (a_max + 2.0 * a_min) + a0 * (-3.0 * af_af + 8.0 * af * (a_min - a_max) + 6.0 * (a_max * a_max + 2.0 * a_max * a_min - a_min * a_min)) + 6.0 * af * (a_max * a_max - 2.0 * a_max * a_min - a_min * a_min) + a0_a0 * (3.0 * af - 4.0 * (2.0 * a_max + a_min))) * (2.0 * a_min * g1 + vd * vd + a_max * (2.0 * pd + a_min * tf * tf - 2.0 * tf * vf))).sqrt();
            let jf = -(3.0 * af_af * a_max * tf - 3.0 * a0_a0 * a_min * tf - 6.0 * ad * a_max * a_min * tf + 3.0 * a_max * a_min * (a_min - a_max) * tf + 3.0 * (a0_a0 - af_af) * vd + 6.0 * vd * (af * a_min - a0 * a_max) + 3.0 * (a_max * a_max - a_min * a_min) * vd + h1 / 4.0) / (6.0 * (2.0 * a_min * g1 + vd * vd + a_max * (2.0 * pd + a_min * tf_tf - 2.0 * tf * vf)));
            profile.t[0] = (a_max - a0) / jf;
            profile.t[1] = (a0_a0 - af_af + 2.0 * ad * a_min - 2.0 * (a_max * a_max - 2.0 * a_max * a_min + a_min * a_min + a_min * jf * tf - jf * vd)) / (2.0 * (a_max - a_min) * jf);
            profile.t[2] = a_max / jf;
            profile.t[3] = 0.0;
            profile.t[4] = -a_min / jf;
            profile.t[5] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + 2.0 * profile.t[4] + af / jf);
            profile.t[6] = profile.t[4] + af / jf;
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc0Acc1, tf, jf, lim) {
                return Some(profile);
            }
        }
        None
    }

    fn time_acc0(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { v0, a0, af, tf, pd, tf_tf, vd, ad, ad_ad, a0_a0, af_af, a0_p3, af_p3, j_max_j_max, g1, g2, .. } = *self;
        let DirectedLimits { a_max, j_max, .. } = *lim;

        let mut profile = self.new_profile();
        {
            let h1 = (ad_ad / (2.0 * j_max_j_max) - ad * (a_max - a0) / j_max_j_max + (a_max * tf - vd) / j_max).sqrt();
            profile.t[0] = (a_max - a0) / j_max;
            profile.t[1] = tf - ad / j_max - 2.0 * h1;
            profile.t[2] = h1;
            profile.t[3] = 0.0;
            profile.t[4] = (af - a_max) / j_max + h1;
            profile.t[5] = 0.0;
            profile.t[6] = 0.0;
            if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::None, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let h0a = -a0_a0 + af_af - 2.0 * ad * a_max + 2.0 * j_max * (a_max * tf - vd);
            let h0b = a0_p3 + 2.0 * af_p3 - 6.0 * af_af * a_max - 3.0 * a0_a0 * (af - j_max * tf) - 3.0 * a0 * a_max * (a_max - 2.0 * af + 2.0 * j_max * tf) - 3.0 * j_max * (j_max * (-2.0 * pd + a_max * tf_tf + 2.0 * tf * v0) + a_max * (a_max * tf - 2.0 * vd)) + 3.0 * af * (a_max * a_max + 2.0 * a_max * j_max * tf - 2.0 * j_max * vd);
            let h0 = j_max.abs() * (4.0 * h0b * h0b - 18.0 * h0a * h0a * h0a).sqrt();
            let h1 = 3.0 * j_max * h0a;
            profile.t[0] = (-a0 + a_max) / j_max;
            profile.t[1] = (-a0_p3 + af_p3 + af_af * (-6.0 * a_max + 3.0 * j_max * tf) + a0_a0 * (-3.0 * af + 6.0 * a_max + 3.0 * j_max * tf) + 6.0 * af * (a_max * a_max - j_max * vd) + 3.0 * a0 * (af_af - 2.0 * (a_max * a_max + j_max * vd)) - 6.0 * j_max * (a_max * (a_max * tf - 2.0 * vd) + j_max * g2)) / h1;
            profile.t[2] = -(ad + h0 / h1) / (2.0 * j_max) + tf / 2.0 - profile.t[1] / 2.0;
            profile.t[3] = h0 / (j_max * h1);
            profile.t[4] = 0.0;
            profile.t[5] = 0.0;
            profile.t[6] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + profile.t[3]);
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let h0a = a0_p3 + 2.0 * af_p3 - 6.0 * (af_af + a_max * a_max) * a_max - 6.0 * (a0 + af) * a_max * j_max * tf + 9.0 * a_max * a_max * (af + j_max * tf) + 3.0 * a0 * a_max * (-2.0 * af + 3.0 * a_max) + 3.0 * a0_a0 * (af - 2.0 * a_max + j_max * tf) - 6.0 * j_max_j_max * g1 + 6.0 * (af - a_max) * j_max * vd - 3.0 * a_max * j_max_j_max * tf_tf;
            let h0b = a0_a0 + af_af + 2.0 * (a_max * a_max - (a0 + af) * a_max + j_max * (vd - a_max * tf));
            let h1 = j_max.abs() / j_max * (4.0 * h0a * h0a - 18.0 * h0b * h0b * h0b).sqrt();
            let h2 = 6.0 * j_max * h0b;
            profile.t[0] = (-a0 + a_max) / j_max;
            profile.t[1] = ad / j_max - 2.0 * profile.t[0] - (2.0 * h0a - h1) / h2 + tf;
            profile.t[2] = -(2.0 * h0a + h1) / h2;
            profile.t[3] = (2.0 * h0a - h1) / h2;
            profile.t[4] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + profile.t[3]);
            profile.t[5] = 0.0;
            profile.t[6] = 0.0;
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc0, tf, j_max, lim) {
                return Some(profile);
            }
        }
        None
    }

    fn time_acc1(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { a0, vf, af, tf, pd, tf_tf, vd, vd_vd, ad, a0_a0, af_af, a0_p3, a0_p4, af_p3, af_p4, j_max_j_max, g1, g2, .. } = *self;
        let DirectedLimits { a_max, a_min, j_max, .. } = *lim;

        let mut profile = self.new_profile();
        {
            let h0 = (j_max_j_max * (a0_p4 + af_p4 - 4.0 * af_p3 * j_max * tf + 6.0 * af_af * j_max_j_max * tf_tf - 4.0 * a0_p3 * (af - j_max * tf) + 6.0 * a0_a0 * (af - j_max * tf) * (af - j_max * tf) + 24.0 * af * j_max_j_max * g1 - 4.0 * a0 * (af_p3 - 3.0 * af_af * j_max * tf + 6.0 * j_max_j_max * (-pd + tf * vf)) - 12.0 * j_max_j_max * (-vd_vd + j_max * tf * g2)) / 3.0).sqrt() / j_max;
            let h1 = ((a0_a0 + af_af - 2.0 * a0 * af - 2.0 * ad * j_max * tf + 2.0 * h0) / j_max_j_max + tf_tf).sqrt();
            profile.t[0] = -(a0_a0 + af_af + 2.0 * a0 * (j_max * tf - af) - 2.0 * j_max * vd + h0) / (2.0 * j_max * (-ad + j_max * tf));
            profile.t[1] = 0.0;
            profile.t[2] = (tf - h1) / 2.0 - ad / (2.0 * j_max);
            profile.t[3] = 0.0;
            profile.t[4] = 0.0;
            profile.t[5] = h1;
            profile.t[6] = tf - (profile.t[0] + profile.t[2] + profile.t[5]);
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc1, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let h0 = (j_max_j_max * (a0_p4 + af_p4 + 4.0 * (af_p3 - a0_p3) * j_max * tf + 6.0 * af_af * j_max_j_max * tf_tf + 6.0 * a0_a0 * (af + j_max * tf) * (af + j_max * tf) + 24.0 * af * j_max_j_max * g1 - 4.0 * a0 * (a0_a0 * af + af_p3 + 3.0 * af_af * j_max * tf + 6.0 * j_max_j_max * (-pd + tf * vf)) + 12.0 * j_max_j_max * (vd_vd + j_max * tf * g2)) / 3.0).sqrt() / j_max;
            let h1 = ((a0_a0 + af_af - 2.0 * a0 * af + 2.0 * ad * j_max * tf + 2.0 * h0) / j_max_j_max + tf_tf).sqrt();
            profile.t[0] = 0.0;
            profile.t[1] = 0.0;
            profile.t[2] = -(a0_a0 + af_af - 2.0 * a0 * af + 2.0 * j_max * (vd - a0 * tf) + h0) / (2.0 * j_max * (ad + j_max * tf));
            profile.t[3] = 0.0;
            profile.t[4] = ad / (2.0 * j_max) + (tf - h1) / 2.0;
            profile.t[5] = h1;
            profile.t[6] = tf - (profile.t[5] + profile.t[4] + profile.t[2]);
            if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::Acc1, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let h0a = a0_p3 - af_p3 - 3.0 * a0_a0 * a_min + 3.0 * a_min * a_min * (a0 + j_max * tf) + 3.0 * af * a_min * (-a_min - 2.0 * j_max * tf) - 3.0 * af_af * (-a_min - j_max * tf) - 3.0 * j_max_j_max * (-2.0 * pd - a_min * tf_tf + 2.0 * tf * vf);
            let h0b = a0_a0 + af_af - 2.0 * (a0 + af) * a_min + 2.0 * (a_min * a_min - j_max * (-a_min * tf + vd));
            let h0c = a0_p4 + 3.0 * af_p4 - 4.0 * (a0_p3 + 2.0 * af_p3) * a_min + 6.0 * a0_a0 * a_min * a_min + 6.0 * af_af * (a_min * a_min - 2.0 * j_max * vd) + 12.0 * j_max * (2.0 * a_min * j_max * g1 - a_min * a_min * vd + j_max * vd_vd) + 24.0 * af * a_min * j_max * vd - 4.0 * a0 * (af_p3 - 3.0 * af * a_min * (-a_min - 2.0 * j_max * tf) + 3.0 * af_af * (-a_min - j_max * tf) + 3.0 * j_max * (-a_min * a_min * tf + j_max * (-2.0 * pd - a_min * tf_tf + 2.0 * tf * vf)));
            let h1 = j_max.abs() / j_max * (4.0 * h0a * h0a - 6.0 * h0b * h0c).sqrt();
            let h2 = 6.0 * j_max * h0b;
            profile.t[0] = 0.0;
            profile.t[1] = 0.0;
            profile.t[2] = (2.0 * h0a + h1) / h2;
            profile.t[3] = -(a0_a0 + af_af - 2.0 * (a0 + af) * a_min + 2.0 * (a_min * a_min + a_min * j_max * tf - j_max * vd)) / (2.0 * j_max * (a0 - a_min - j_max * profile.t[2]));
            profile.t[4] = (a0 - a_min) / j_max - profile.t[2];
            profile.t[5] = tf - (profile.t[2] + profile.t[3] + profile.t[4] + (af - a_min) / j_max);
            profile.t[6] = (af - a_min) / j_max;
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::Acc1, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let h0a = -a0_p3 + af_p3 + 3.0 * (a0_a0 - af_af) * a_max - 3.0 * ad * a_max * a_max - 6.0 * af * a_max * j_max * tf + 3.0 * af_af * j_max * tf + 3.0 * j_max * (a_max * a_max * tf + j_max * (-2.0 * pd - a_max * tf_tf + 2.0 * tf * vf));
            let h0b = a0_a0 - af_af + 2.0 * ad * a_max + 2.0 * j_max * (a_max * tf - vd);
            let h0c = a0_p4 + 3.0 * af_p4 - 4.0 * (a0_p3 + 2.0 * af_p3) * a_max + 6.0 * a0_a0 * a_max * a_max - 24.0 * af * a_max * j_max * vd + 12.0 * j_max * (2.0 * a_max * j_max * g1 + j_max * vd_vd + a_max * a_max * vd) + 6.0 * af_af * (a_max * a_max + 2.0 * j_max * vd) - 4.0 * a0 * (af_p3 + 3.0 * af * a_max * (a_max - 2.0 * j_max * tf) - 3.0 * af_af * (a_max - j_max * tf) + 3.0 * j_max * (a_max * a_max * tf + j_max * (-2.0 * pd - a_max * tf_tf + 2.0 * tf * vf)));
            let h1 = j_max.abs() / j_max * (4.0 * h0a * h0a - 6.0 * h0b * h0c).sqrt();
            let h2 = 6.0 * j_max * h0b;
            profile.t[0] = 0.0;
            profile.t[1] = 0.0;
            profile.t[2] = -(2.0 * h0a + h1) / h2;
            profile.t[3] = 2.0 * h1 / h2;
            profile.t[4] = (a_max - a0) / j_max + profile.t[2];
            profile.t[5] = tf - (profile.t[2] + profile.t[3] + profile.t[4] + (-af + a_max) / j_max);
            profile.t[6] = (-af + a_max) / j_max;
            if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::Acc1, tf, j_max, lim) {
                return Some(profile);
            }
        }
        None
    }

    /// Symmetric profile of quarter-duration jerk phases from rest.
    fn time_none_smooth(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { v0, a0, vf, af, tf, pd, tf_tf, tf_p3, vf_vf, .. } = *self;
        let DirectedLimits { j_max, .. } = *lim;

        let mut profile = self.new_profile();
        if v0.abs() < EPS && a0.abs() < EPS && af.abs() < EPS {
            let h1 = (tf_tf * vf_vf + (4.0 * pd - tf * vf) * (4.0 * pd - tf * vf)).sqrt();
            let jf = 4.0 * (4.0 * pd - 2.0 * tf * vf + j_max.signum() * h1) / tf_p3;
            profile.t[0] = tf / 4.0;
            profile.t[1] = 0.0;
            profile.t[2] = 2.0 * profile.t[0];
            profile.t[3] = 0.0;
            profile.t[4] = 0.0;
            profile.t[5] = 0.0;
            profile.t[6] = profile.t[0];
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, jf, lim) {
                return Some(profile);
            }
        }
        None
    }

    /// No limit reached. Tries the remaining two and three phase forms.
    fn time_none(&self, lim: &DirectedLimits) -> Option<Profile> {
        let Self { v0, a0, vf, af, tf, pd, tf_tf, tf_p3, tf_p4, vd, vd_vd, ad, ad_ad, a0_a0, af_af, a0_p3, a0_p4, a0_p5, a0_p6, af_p3, af_p4, af_p5, af_p6, j_max_j_max, g1, g2, .. } = *self;
        let DirectedLimits { a_max, a_min, j_max, .. } = *lim;

        let mut profile = self.new_profile();
        if a0.abs() < EPS && af.abs() < EPS {
            let polynom = [
                -2.0 * tf,
                2.0 * vd / j_max + tf_tf,
                4.0 * (pd - tf * vf) / j_max,
                (vd_vd + j_max * tf * g2) / j_max_j_max,
            ];
            let roots = solve_quart_monic_sorted(polynom[0], polynom[1], polynom[2], polynom[3]);
            for mut t in roots.iter().copied() {
                if t > tf / 2.0 || t > (a_max - a0) / j_max {
                    continue;
                }
                {
                    let h1 = (j_max * t * (t - tf) + vd) / (j_max * (2.0 * t - tf));
                    let h2 = (2.0 * j_max * t * (t - tf) + j_max * tf_tf - 2.0 * vd) / (j_max * (2.0 * t - tf) * (2.0 * t - tf));
                    let orig = (-2.0 * pd + 2.0 * tf * v0 + h1 * h1 * j_max * (tf - 2.0 * t) + j_max * tf * (2.0 * h1 * t - t * t - (h1 - t) * tf)) / 2.0;
                    let deriv = j_max * tf * (2.0 * t - tf) * (h2 - 1.0) / 2.0 + h1 * j_max * (tf - (2.0 * t - tf) * h2 - h1);
                    t -= orig / deriv;
                }
                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = (j_max * t * (t - tf) + vd) / (j_max * (2.0 * t - tf));
                profile.t[3] = tf - 2.0 * t;
                profile.t[4] = t - profile.t[2];
                profile.t[5] = 0.0;
                profile.t[6] = 0.0;
                if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        {
            let h0 = (2.0 * j_max_j_max * (2.0 * (a0_p3 - af_p3 - 3.0 * af_af * j_max * tf + 9.0 * af * j_max_j_max * tf_tf - 3.0 * a0_a0 * (af + j_max * tf) + 3.0 * a0 * (af + j_max * tf).powi(2) + 3.0 * j_max_j_max * (8.0 * pd + j_max * tf_tf * tf - 8.0 * tf * vf)).powi(2) - 3.0 * (a0_a0 + af_af - 2.0 * af * j_max * tf - 2.0 * a0 * (af + j_max * tf) - j_max * (j_max * tf_tf + 4.0 * v0 - 4.0 * vf)) * (a0_p4 + af_p4 + 4.0 * af_p3 * j_max * tf + 6.0 * af_af * j_max_j_max * tf_tf - 3.0 * j_max_j_max * j_max_j_max * tf_tf * tf_tf - 4.0 * a0_p3 * (af + j_max * tf) + 6.0 * a0_a0 * (af + j_max * tf).powi(2) - 12.0 * af * j_max_j_max * (8.0 * pd + j_max * tf_tf * tf - 8.0 * tf * v0) + 48.0 * j_max_j_max * vd_vd + 48.0 * j_max_j_max * j_max * tf * g2 - 4.0 * a0 * (af_p3 + 3.0 * af_af * j_max * tf - 9.0 * af * j_max_j_max * tf_tf - 3.0 * j_max_j_max * (8.0 * pd + j_max * tf_tf * tf - 8.0 * tf * vf))))).sqrt() / j_max;
            let h1 = 12.0 * j_max * (-a0_a0 - af_af + 2.0 * af * j_max * tf + 2.0 * a0 * (af + j_max * tf) + j_max * (j_max * tf_tf + 4.0 * v0 - 4.0 * vf));
            let h2 = -4.0 * a0_p3 + 4.0 * af_p3 + 12.0 * a0_a0 * af - 12.0 * a0 * af_af + 48.0 * j_max_j_max * pd + 12.0 * (a0_a0 - af_af) * j_max * tf - 24.0 * j_max_j_max * tf * (v0 + vf) + 24.0 * ad * j_max * vd;
            let h3 = 2.0 * a0_p3 - 2.0 * af_p3 - 6.0 * a0_a0 * af + 6.0 * a0 * af_af;
            profile.t[0] = (h3 - 48.0 * j_max_j_max * (tf * vf - pd) - 6.0 * (a0_a0 + af_af) * j_max * tf + 12.0 * a0 * af * j_max * tf + 6.0 * (a0 + 3.0 * af + j_max * tf) * tf_tf * j_max_j_max - h0) / h1;
            profile.t[1] = 0.0;
            profile.t[2] = (h2 + h0) / h1;
            profile.t[3] = 0.0;
            profile.t[4] = (-h2 + h0) / h1;
            profile.t[5] = 0.0;
            profile.t[6] = (-h3 + 48.0 * j_max_j_max * (tf * v0 - pd) - 6.0 * (a0_a0 + af_af) * j_max * tf + 12.0 * a0 * af * j_max * tf + 6.0 * (af + 3.0 * a0 + j_max * tf) * tf_tf * j_max_j_max - h0) / h1;
            if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::None, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let ph1 = af + j_max * tf;
            let polynom = [
                -2.0 * (ad + j_max * tf) / j_max,
                2.0 * (a0_a0 + af_af + j_max * (af * tf + vd) - 2.0 * a0 * ph1) / j_max_j_max + tf_tf,
                2.0 * (a0_p3 - af_p3 - 3.0 * af_af * j_max * tf + 3.0 * a0 * ph1 * (ph1 - a0) - 6.0 * j_max_j_max * (-pd + tf * vf)) / (3.0 * j_max_j_max * j_max),
                (a0_p4 + af_p4 + 4.0 * af_p3 * j_max * tf - 4.0 * a0_p3 * ph1 + 6.0 * a0_a0 * ph1 * ph1 + 24.0 * j_max_j_max * af * g1 - 4.0 * a0 * (af_p3 + 3.0 * af_af * j_max * tf + 6.0 * j_max_j_max * (-pd + tf * vf)) + 6.0 * j_max_j_max * af_af * tf_tf + 12.0 * j_max_j_max * (vd_vd + j_max * tf * g2)) / (12.0 * j_max_j_max * j_max_j_max),
            ];
            let t_min = ad / j_max;
            let t_max = ((a_max - a0) / j_max).min((ad / j_max + tf) / 2.0);
            let roots = solve_quart_monic_sorted(polynom[0], polynom[1], polynom[2], polynom[3]);
            for mut t in roots.iter().copied() {
                if t < t_min || t > t_max {
                    continue;
                }
                {
                    let h0 = j_max * (2.0 * t - tf) - ad;
                    let h1 = (ad_ad - 2.0 * af * j_max * t + 2.0 * a0 * j_max * (t - tf) + 2.0 * j_max * (j_max * t * (t - tf) + vd)) / (2.0 * j_max * h0);
                    let h2 = (-ad_ad + 2.0 * j_max_j_max * (tf_tf + t * (t - tf)) + (a0 + af) * j_max * tf - ad * h0 - 2.0 * j_max * vd) / (h0 * h0);
                    let orig = (-a0_p3 + af_p3 + 3.0 * ad_ad * j_max * (h1 - t) + 3.0 * ad * j_max_j_max * (h1 - t) * (h1 - t) - 3.0 * a0 * af * ad + 3.0 * j_max_j_max * (a0 * tf_tf - 2.0 * pd + 2.0 * tf * v0 + h1 * h1 * j_max * (tf - 2.0 * t) + j_max * tf * (2.0 * h1 * t - t * t - (h1 - t) * tf))) / (6.0 * j_max_j_max);
                    let deriv = h0 * (-ad + j_max * tf) * (h2 - 1.0) / (2.0 * j_max) + h1 * (-ad + j_max * (tf - h1) - h0 * h2);
                    t -= orig / deriv;
                }
                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = (ad_ad + 2.0 * j_max * (-a0 * tf - ad * t + j_max * t * (t - tf) + vd)) / (2.0 * j_max * (-ad + j_max * (2.0 * t - tf)));
                profile.t[3] = ad / j_max + tf - 2.0 * t;
                profile.t[4] = tf - (t + profile.t[2] + profile.t[3]);
                profile.t[5] = 0.0;
                profile.t[6] = 0.0;
                if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        {
            let h1 = 3.0 * j_max * (ad_ad + 2.0 * j_max * (a0 * tf - vd));
            let h2 = ad_ad + 2.0 * j_max * (a0 * tf - vd);
            let h0 = (4.0 * (2.0 * (a0_p3 - af_p3) - 6.0 * a0_a0 * (af - j_max * tf) + 6.0 * j_max_j_max * g1 + 3.0 * a0 * (2.0 * af_af - 2.0 * j_max * af * tf + j_max_j_max * tf_tf) + 6.0 * ad * j_max * vd).powi(2) - 18.0 * h2 * h2 * h2).sqrt() / h1 * j_max.abs() / j_max;
            profile.t[0] = 0.0;
            profile.t[1] = 0.0;
            profile.t[2] = 0.0;
            profile.t[3] = (af_p3 - a0_p3 + 3.0 * (af_af - a0_a0) * j_max * tf - 3.0 * ad * (a0 * af + 2.0 * j_max * vd) - 6.0 * j_max_j_max * g2) / h1;
            profile.t[4] = (tf - profile.t[3] - h0) / 2.0 - ad / (2.0 * j_max);
            profile.t[5] = h0;
            profile.t[6] = (tf - profile.t[3] + ad / j_max - h0) / 2.0;
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let ph1 = ad_ad + 2.0 * (af + a0) * j_max * tf - j_max * (j_max * tf_tf + 4.0 * vd);
            let ph2 = j_max * tf_tf * g1 - vd * (-2.0 * pd - tf * v0 + 3.0 * tf * vf);
            let ph3 = 5.0 * af_af - 8.0 * af * j_max * tf + 2.0 * j_max * (2.0 * j_max * tf_tf - vd);
            let ph4 = j_max_j_max * tf_p4 - 2.0 * vd_vd + 8.0 * j_max * tf * (-pd + tf * vf);
            let ph5 = 5.0 * af_p4 - 8.0 * af_p3 * j_max * tf - 12.0 * af_af * j_max * (j_max * tf_tf + vd) + 24.0 * af * j_max_j_max * (-2.0 * pd + j_max * tf_p3 + 2.0 * tf * vf) - 6.0 * j_max_j_max * ph4;
            let ph6 = -vd_vd + j_max * tf * (-2.0 * pd + 3.0 * tf * v0 - tf * vf) - af * g2;
            let polynom = [
                -(4.0 * (a0_p3 - af_p3) - 12.0 * a0_a0 * (af - j_max * tf) + 6.0 * a0 * (2.0 * af_af - 2.0 * af * j_max * tf + j_max * (j_max * tf_tf - 2.0 * vd)) + 6.0 * af * j_max * (3.0 * j_max * tf_tf + 2.0 * vd) - 6.0 * j_max_j_max * (-4.0 * pd + j_max * tf_p3 - 2.0 * tf * v0 + 6.0 * tf * vf)) / (3.0 * j_max * ph1),
                -(-a0_p4 - af_p4 + 4.0 * a0_p3 * (af - j_max * tf) + a0_a0 * (-6.0 * af_af + 8.0 * af * j_max * tf - 4.0 * j_max * (j_max * tf_tf - vd)) + 2.0 * af_af * j_max * (j_max * tf_tf + 2.0 * vd) - 4.0 * af * j_max_j_max * (-3.0 * pd + j_max * tf_p3 + 2.0 * tf * v0 + tf * vf) + j_max_j_max * (j_max_j_max * tf_p4 - 8.0 * vd_vd + 4.0 * j_max * tf * (-3.0 * pd + tf * v0 + 2.0 * tf * vf)) + 2.0 * a0 * (2.0 * af_p3 - 2.0 * af_af * j_max * tf + af * j_max * (-3.0 * j_max * tf_tf - 4.0 * vd) + j_max_j_max * (-6.0 * pd + j_max * tf_p3 - 4.0 * tf * v0 + 10.0 * tf * vf))) / (j_max_j_max * ph1),
                -(a0_p5 - af_p5 + af_p4 * j_max * tf - 5.0 * a0_p4 * (af - j_max * tf) + 2.0 * a0_p3 * ph3 + 4.0 * af_p3 * j_max * (j_max * tf_tf + vd) + 12.0 * j_max_j_max * af * ph6 - 2.0 * a0_a0 * (5.0 * af_p3 - 9.0 * af_af * j_max * tf - 6.0 * af * j_max * vd + 6.0 * j_max_j_max * (-2.0 * pd - tf * v0 + 3.0 * tf * vf)) - 12.0 * j_max_j_max * j_max * ph2 + a0 * ph5) / (3.0 * j_max_j_max * j_max * ph1),
                -(-a0_p6 - af_p6 + 6.0 * a0_p5 * (af - j_max * tf) - 48.0 * af_p3 * j_max_j_max * g1 + 72.0 * j_max_j_max * j_max * (j_max * g1 * g1 + vd_vd * vd + 2.0 * af * g1 * vd) - 3.0 * a0_p4 * ph3 - 36.0 * af_af * j_max_j_max * vd_vd + 6.0 * af_p4 * j_max * vd + 4.0 * a0_p3 * (5.0 * af_p3 - 9.0 * af_af * j_max * tf - 6.0 * af * j_max * vd + 6.0 * j_max_j_max * (-2.0 * pd - tf * v0 + 3.0 * tf * vf)) - 3.0 * a0_a0 * ph5 + 6.0 * a0 * (af_p5 - af_p4 * j_max * tf - 4.0 * af_p3 * j_max * (j_max * tf_tf + vd) + 12.0 * j_max_j_max * (-af * ph6 + j_max * ph2))) / (18.0 * j_max_j_max * j_max_j_max * ph1),
            ];
            let t_max = (a0 - a_min) / j_max;
            let roots = solve_quart_monic_sorted(polynom[0], polynom[1], polynom[2], polynom[3]);
            for mut t in roots.iter().copied() {
                if t > t_max {
                    continue;
                }
                {
                    let h1 = ad_ad / 2.0 + j_max * (af * t + (j_max * t - a0) * (t - tf) - vd);
                    let h2 = -ad + j_max * (tf - 2.0 * t);
                    let h3 = h1.sqrt();
                    let orig = (af_p3 - a0_p3 + 3.0 * af * j_max * t * (af + j_max * t) + 3.0 * a0_a0 * (af + j_max * t) - 3.0 * a0 * (af_af + 2.0 * af * j_max * t + j_max_j_max * (t * t - tf_tf)) + 3.0 * j_max_j_max * (-2.0 * pd + j_max * t * (t - tf) * tf + 2.0 * tf * v0)) / (6.0 * j_max_j_max) - h3 * h3 * h3 / (j_max * j_max.abs()) + (-ad - j_max * t) * h1 / j_max_j_max;
                    let deriv = (6.0 * j_max * h2 * h3 / j_max.abs() + 2.0 * (-ad - j_max * tf) * h2 - 2.0 * (3.0 * ad_ad + af * j_max * (8.0 * t - 2.0 * tf) + 4.0 * a0 * j_max * (-2.0 * t + tf) + 2.0 * j_max * (j_max * t * (3.0 * t - 2.0 * tf) - vd))) / (4.0 * j_max);
                    t -= orig / deriv;
                }
                let h1 = (2.0 * ad_ad + 4.0 * j_max * (ad * t + a0 * tf + j_max * t * (t - tf) - vd)).sqrt() / j_max.abs();
                profile.t[0] = 0.0;
                profile.t[1] = 0.0;
                profile.t[2] = t;
                profile.t[3] = tf - 2.0 * t - ad / j_max - h1;
                profile.t[4] = h1 / 2.0;
                profile.t[5] = 0.0;
                profile.t[6] = tf - (t + profile.t[3] + profile.t[4]);
                if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        {
            let ph0 = -2.0 * pd - tf * v0 + 3.0 * tf * vf;
            let ph1 = -ad + j_max * tf;
            let ph2 = j_max * tf_tf * g1 - vd * ph0;
            let ph3 = 5.0 * af_af + 2.0 * j_max * (2.0 * j_max * tf_tf - vd - 4.0 * af * tf);
            let ph4 = j_max_j_max * tf_p4 - 2.0 * vd_vd + 8.0 * j_max * tf * (-pd + tf * vf);
            let ph5 = 5.0 * af_p4 - 8.0 * af_p3 * j_max * tf - 12.0 * af_af * j_max * (j_max * tf_tf + vd) + 24.0 * af * j_max_j_max * (-2.0 * pd + j_max * tf_p3 + 2.0 * tf * vf) - 6.0 * j_max_j_max * ph4;
            let ph6 = -vd_vd + j_max * tf * (-2.0 * pd + 3.0 * tf * v0 - tf * vf);
            let ph7 = 3.0 * j_max_j_max * ph1 * ph1;
            let polynom = [
                (4.0 * af * tf - 2.0 * j_max * tf_tf - 4.0 * vd) / ph1,
                (-2.0 * (a0_p4 + af_p4) + 8.0 * af_p3 * j_max * tf + 6.0 * af_af * j_max_j_max * tf_tf + 8.0 * a0_p3 * (af - j_max * tf) - 12.0 * a0_a0 * (af - j_max * tf) * (af - j_max * tf) - 12.0 * af * j_max_j_max * (-pd + j_max * tf_p3 - 2.0 * tf * v0 + 3.0 * tf * vf) + 2.0 * a0 * (4.0 * af_p3 - 12.0 * af_af * j_max * tf + 9.0 * af * j_max_j_max * tf_tf - 3.0 * j_max_j_max * (2.0 * pd + j_max * tf_p3 - 2.0 * tf * vf)) + 3.0 * j_max_j_max * (j_max_j_max * tf_p4 + 4.0 * vd_vd - 4.0 * j_max * tf * (pd + tf * v0 - 2.0 * tf * vf))) / ph7,
                (-a0_p5 + af_p5 - af_p4 * j_max * tf + 5.0 * a0_p4 * (af - j_max * tf) - 2.0 * a0_p3 * ph3 - 4.0 * af_p3 * j_max * (j_max * tf_tf + vd) + 12.0 * af_af * j_max_j_max * g2 - 12.0 * af * j_max_j_max * ph6 + 2.0 * a0_a0 * (5.0 * af_p3 - 9.0 * af_af * j_max * tf - 6.0 * af * j_max * vd + 6.0 * j_max_j_max * ph0) + 12.0 * j_max_j_max * j_max * ph2 + a0 * (-5.0 * af_p4 + 8.0 * af_p3 * j_max * tf + 12.0 * af_af * j_max * (j_max * tf_tf + vd) - 24.0 * af * j_max_j_max * (-2.0 * pd + j_max * tf_p3 + 2.0 * tf * vf) + 6.0 * j_max_j_max * ph4)) / (j_max * ph7),
                -(a0_p6 + af_p6 - 6.0 * a0_p5 * (af - j_max * tf) + 48.0 * af_p3 * j_max_j_max * g1 - 72.0 * j_max_j_max * j_max * (j_max * g1 * g1 + vd_vd * vd + 2.0 * af * g1 * vd) + 3.0 * a0_p4 * ph3 - 6.0 * af_p4 * j_max * vd + 36.0 * af_af * j_max_j_max * vd_vd - 4.0 * a0_p3 * (5.0 * af_p3 - 9.0 * af_af * j_max * tf - 6.0 * af * j_max * vd + 6.0 * j_max_j_max * ph0) + 3.0 * a0_a0 * ph5 - 6.0 * a0 * (af_p5 - af_p4 * j_max * tf - 4.0 * af_p3 * j_max * (j_max * tf_tf + vd) + 12.0 * j_max_j_max * (af_af * g2 - af * ph6 + j_max * ph2))) / (6.0 * j_max_j_max * ph7),
            ];
            let roots = solve_quart_monic_sorted(polynom[0], polynom[1], polynom[2], polynom[3]);
            for t in roots.iter().copied() {
                if t > tf || t > (a_max - a0) / j_max {
                    continue;
                }
                let h1 = (ad_ad / (2.0 * j_max_j_max) + (a0 * (t + tf) - af * t + j_max * t * tf - vd) / j_max).sqrt();
                profile.t[0] = t;
                profile.t[1] = tf - ad / j_max - 2.0 * h1;
                profile.t[2] = h1;
                profile.t[3] = 0.0;
                profile.t[4] = ad / j_max + h1 - t;
                profile.t[5] = 0.0;
                profile.t[6] = 0.0;
                if profile.check_with_timing(ControlSigns::Udud, ReachedLimits::None, tf, j_max, lim) {
                    return Some(profile);
                }
            }
        }
        if (af - a0).abs() < EPS {
            let h1 = (4.0 * (a0 * tf - vd) / j_max + tf_tf).sqrt();
            profile.t[0] = (tf - h1) / 2.0;
            profile.t[1] = h1;
            profile.t[2] = profile.t[0];
            profile.t[3] = 0.0;
            profile.t[4] = 0.0;
            profile.t[5] = 0.0;
            profile.t[6] = 0.0;
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, j_max, lim) {
                return Some(profile);
            }
        }
        {
            let polynom = [
                ad_ad,
                ad_ad * tf,
                (a0_a0 + af_af + 10.0 * a0 * af) * tf_tf + 24.0 * (tf * (af * v0 - a0 * vf) - pd * ad) + 12.0 * vd_vd,
                -3.0 * tf * ((a0_a0 + af_af + 2.0 * a0 * af) * tf_tf - 4.0 * vd * (a0 + af) * tf + 4.0 * vd_vd),
            ];
            let roots = solve_cubic(polynom[0], polynom[1], polynom[2], polynom[3]);
            for t in roots.iter().copied() {
                if t > tf {
                    continue;
                }
                let jf = ad / (tf - t);
                profile.t[0] = (2.0 * (vd - a0 * tf) + ad * (t - tf)) / (2.0 * jf * t);
                profile.t[1] = t;
                profile.t[2] = 0.0;
                profile.t[3] = 0.0;
                profile.t[4] = 0.0;
                profile.t[5] = 0.0;
                profile.t[6] = tf - (profile.t[0] + profile.t[1]);
                if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, jf, lim) {
                    return Some(profile);
                }
            }
        }
        {
            profile.t[0] = (ad_ad / j_max + 2.0 * (a0 + af) * tf - j_max * tf_tf - 4.0 * vd) / (4.0 * (ad - j_max * tf));
            profile.t[1] = 0.0;
            profile.t[2] = -ad / (2.0 * j_max) + tf / 2.0;
            profile.t[3] = 0.0;
            profile.t[4] = 0.0;
            profile.t[5] = 0.0;
            profile.t[6] = tf - (profile.t[0] + profile.t[2]);
            if profile.check_with_timing(ControlSigns::Uddu, ReachedLimits::None, tf, j_max, lim) {
                return Some(profile);
            }
        }
        None
    }
}
