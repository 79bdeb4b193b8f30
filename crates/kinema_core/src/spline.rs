//! Cubic Bezier segment math.
//!
//! Every animated curve in the engine is a chain of cubic Bezier segments,
//! each described by four control values `P1..P4`. Two curves are sampled
//! together: a *time* curve `X(t)` and a *data* curve `Y(t)` sharing the same
//! local parameter `t ∈ [0, 1]`. Sampling at a wall-clock time `x` therefore
//! means inverting `X(t) = x` first ([`find_zero`]) and then evaluating the
//! data curve at the recovered parameter ([`eval_bezier`]).
//!
//! Both operations use the power-basis form of the Bezier polynomial:
//!
//! ```text
//! c0 = P1
//! c1 = 3 (P2 - P1)
//! c2 = 3 (P1 - 2 P2 + P3)
//! c3 = P4 - P1 + 3 (P2 - P3)
//! B(t) = c0 + c1 t + c2 t² + c3 t³
//! ```

use smallvec::SmallVec;

/// Tolerance used when the sampled time sits on a segment border.
///
/// Adjacent segments share their border control point, so round-off can push
/// the exact root just outside `[0, 1]`. Inputs this close to `X1` or `X4`
/// snap to `t = 0` or `t = 1` without solving.
pub const INVERSION_EPSILON: f32 = 1e-4;

/// Coefficients smaller than this fraction of the remaining ones are treated
/// as zero, so near-linear time curves are solved with the lower-degree
/// formula instead of dividing by round-off noise.
const DEGENERATE_RATIO: f64 = 1e-6;

/// Real roots of a polynomial, in ascending order.
pub type Roots = SmallVec<[f32; 3]>;

/// Solves `c3·t³ + c2·t² + c1·t + c0 = 0` for its real roots.
///
/// Returns between zero and three roots sorted ascending. Falls back to the
/// quadratic and linear formulas when the leading coefficients vanish. An
/// identically zero polynomial yields no roots.
#[must_use]
pub fn solve_cubic(c3: f32, c2: f32, c1: f32, c0: f32) -> Roots {
    let (a, b, c, d) = (
        f64::from(c3),
        f64::from(c2),
        f64::from(c1),
        f64::from(c0),
    );

    let lower = b.abs() + c.abs() + d.abs();
    let mut roots: SmallVec<[f64; 3]> = if a.abs() <= DEGENERATE_RATIO * lower {
        solve_quadratic(b, c, d)
    } else {
        solve_normalized_cubic(b / a, c / a, d / a)
    };

    // One Newton step per root recovers the precision lost in the
    // trigonometric / cube-root branches.
    for root in &mut roots {
        let t = *root;
        let f = ((a * t + b) * t + c) * t + d;
        let df = (3.0 * a * t + 2.0 * b) * t + c;
        if df.abs() > f64::EPSILON {
            *root = t - f / df;
        }
    }

    roots.sort_by(f64::total_cmp);
    roots.into_iter().map(|r| r as f32).collect()
}

/// Roots of `t³ + a·t² + b·t + c = 0` (Cardano / trigonometric form).
fn solve_normalized_cubic(a: f64, b: f64, c: f64) -> SmallVec<[f64; 3]> {
    let mut out = SmallVec::new();

    // Depressed cubic: t = s - a/3  =>  s³ + p·s + q = 0
    let shift = -a / 3.0;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let discriminant = half_q * half_q + third_p * third_p * third_p;

    let scale = 1.0 + a.abs() + b.abs() + c.abs();
    let tiny = f64::EPSILON * scale * scale * scale;

    if discriminant.abs() <= tiny {
        if p.abs() <= f64::EPSILON * scale {
            // Triple root.
            out.push(shift);
        } else {
            // One single and one double root.
            let u = (-half_q).cbrt();
            out.push(2.0 * u + shift);
            out.push(-u + shift);
        }
    } else if discriminant > 0.0 {
        let sqrt_d = discriminant.sqrt();
        let u = (-half_q + sqrt_d).cbrt();
        let v = (-half_q - sqrt_d).cbrt();
        out.push(u + v + shift);
    } else {
        // Three distinct real roots; p < 0 here.
        let r = (-third_p).sqrt();
        let cos_arg = (-half_q / (r * r * r)).clamp(-1.0, 1.0);
        let phi = cos_arg.acos();
        for k in 0..3 {
            let angle = (phi - 2.0 * std::f64::consts::PI * f64::from(k)) / 3.0;
            out.push(2.0 * r * angle.cos() + shift);
        }
    }

    out
}

/// Roots of `a·t² + b·t + c = 0`, degrading to the linear case.
fn solve_quadratic(a: f64, b: f64, c: f64) -> SmallVec<[f64; 3]> {
    let mut out = SmallVec::new();

    if a.abs() <= DEGENERATE_RATIO * (b.abs() + c.abs()) {
        if b != 0.0 {
            out.push(-c / b);
        }
        return out;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return out;
    }
    if discriminant == 0.0 {
        out.push(-b / (2.0 * a));
        return out;
    }

    // Numerically stable form, avoids cancellation between b and sqrt(disc).
    let sqrt_d = discriminant.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_d);
    out.push(q / a);
    if q != 0.0 {
        out.push(c / q);
    }
    out
}

/// Inverts the Bezier curve `X(t)` for `X(t) = x` with `t ∈ [0, 1]`.
///
/// Uses [`INVERSION_EPSILON`] as border tolerance. See
/// [`find_zero_with_tolerance`].
#[must_use]
pub fn find_zero(x1: f32, x2: f32, x3: f32, x4: f32, x: f32) -> Option<f32> {
    find_zero_with_tolerance(x1, x2, x3, x4, x, INVERSION_EPSILON)
}

/// Inverts the Bezier curve `X(t)` for `X(t) = x` with `t ∈ [0, 1]`.
///
/// Inputs within `epsilon` of the first or last control value return `0` or
/// `1` directly. Otherwise the cubic is solved and the *last* root that lies
/// in `[0, 1]` wins, which keeps a stable mapping for non-monotonic time
/// curves. Returns `None` when no root lies in range.
#[must_use]
pub fn find_zero_with_tolerance(
    x1: f32,
    x2: f32,
    x3: f32,
    x4: f32,
    x: f32,
    epsilon: f32,
) -> Option<f32> {
    if (x - x1).abs() < epsilon {
        return Some(0.0);
    }
    if (x - x4).abs() < epsilon {
        return Some(1.0);
    }

    let c0 = x1 - x;
    let c1 = 3.0 * (x2 - x1);
    let c2 = 3.0 * (x1 - 2.0 * x2 + x3);
    let c3 = x4 - x1 + 3.0 * (x2 - x3);

    solve_cubic(c3, c2, c1, c0)
        .into_iter()
        .rev()
        .find(|t| (0.0..=1.0).contains(t))
}

/// Evaluates the cubic Bezier with control values `p1..p4` at `t`.
#[inline]
#[must_use]
pub fn eval_bezier(p1: f32, p2: f32, p3: f32, p4: f32, t: f32) -> f32 {
    let c0 = p1;
    let c1 = 3.0 * (p2 - p1);
    let c2 = 3.0 * (p1 - 2.0 * p2 + p3);
    let c3 = p4 - p1 + 3.0 * (p2 - p3);

    c0 + t * (c1 + t * (c2 + t * c3))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn eval_poly(c3: f32, c2: f32, c1: f32, c0: f32, t: f32) -> f32 {
        ((c3 * t + c2) * t + c1) * t + c0
    }

    #[test]
    fn cubic_three_distinct_roots() {
        // (t - 1)(t - 2)(t - 3) = t³ - 6t² + 11t - 6
        let roots = solve_cubic(1.0, -6.0, 11.0, -6.0);
        assert_eq!(roots.len(), 3);
        assert!(approx(roots[0], 1.0));
        assert!(approx(roots[1], 2.0));
        assert!(approx(roots[2], 3.0));
    }

    #[test]
    fn cubic_single_real_root() {
        // t³ + t + 1 has one real root near -0.6823
        let roots = solve_cubic(1.0, 0.0, 1.0, 1.0);
        assert_eq!(roots.len(), 1);
        assert!(approx(eval_poly(1.0, 0.0, 1.0, 1.0, roots[0]), 0.0));
    }

    #[test]
    fn cubic_double_root() {
        // (t - 1)²(t + 2) = t³ - 3t + 2
        let roots = solve_cubic(1.0, 0.0, -3.0, 2.0);
        assert!(!roots.is_empty() && roots.len() <= 3);
        for r in &roots {
            assert!(approx(eval_poly(1.0, 0.0, -3.0, 2.0, *r), 0.0));
        }
        assert!(roots.iter().any(|r| approx(*r, 1.0)));
        assert!(roots.iter().any(|r| approx(*r, -2.0)));
    }

    #[test]
    fn cubic_degrades_to_quadratic_and_linear() {
        // t² - 1
        let roots = solve_cubic(0.0, 1.0, 0.0, -1.0);
        assert_eq!(roots.len(), 2);
        assert!(approx(roots[0], -1.0));
        assert!(approx(roots[1], 1.0));

        // 2t - 1
        let roots = solve_cubic(0.0, 0.0, 2.0, -1.0);
        assert_eq!(roots.len(), 1);
        assert!(approx(roots[0], 0.5));

        // constant, no roots
        assert!(solve_cubic(0.0, 0.0, 0.0, 3.0).is_empty());
    }

    #[test]
    fn find_zero_snaps_to_borders() {
        assert_eq!(find_zero(2.0, 2.5, 3.0, 4.0, 2.00005), Some(0.0));
        assert_eq!(find_zero(2.0, 2.5, 3.0, 4.0, 3.99995), Some(1.0));
    }

    #[test]
    fn find_zero_inverts_linear_time_curve() {
        let third = 1.0 / 3.0;
        let t = find_zero(0.0, third, 2.0 * third, 1.0, 0.25).unwrap();
        assert!(approx(t, 0.25), "got {t}");
    }

    #[test]
    fn find_zero_out_of_range_fails() {
        assert_eq!(find_zero(0.0, 1.0, 2.0, 3.0, 7.0), None);
    }

    #[test]
    fn find_zero_prefers_last_root() {
        // X(t) overshoots and comes back: 0, 2, -1, 1 crosses 0.5 three times.
        let (x1, x2, x3, x4) = (0.0, 2.0, -1.0, 1.0);
        let t = find_zero(x1, x2, x3, x4, 0.5).unwrap();
        assert!(approx(eval_bezier(x1, x2, x3, x4, t), 0.5));

        let c0 = x1 - 0.5;
        let c1 = 3.0 * (x2 - x1);
        let c2 = 3.0 * (x1 - 2.0 * x2 + x3);
        let c3 = x4 - x1 + 3.0 * (x2 - x3);
        let in_range: Vec<f32> = solve_cubic(c3, c2, c1, c0)
            .into_iter()
            .filter(|r| (0.0..=1.0).contains(r))
            .collect();
        assert!(in_range.len() > 1);
        assert!(approx(t, *in_range.last().unwrap()));
    }

    #[test]
    fn eval_bezier_constant_curve() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!(approx(eval_bezier(4.2, 4.2, 4.2, 4.2, t), 4.2));
        }
    }

    #[test]
    fn eval_bezier_endpoints() {
        assert!(approx(eval_bezier(1.0, 5.0, -3.0, 2.0, 0.0), 1.0));
        assert!(approx(eval_bezier(1.0, 5.0, -3.0, 2.0, 1.0), 2.0));
    }
}
