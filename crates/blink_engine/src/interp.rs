//! 1-D interpolants fitted over the valid samples around a blink.
//!
//! All interpolants refuse to extrapolate: evaluation outside the anchor
//! range is an error, never a silently clamped value.

use contracts::InterpKind;
use thiserror::Error;

use crate::banded::BandedMatrix;

/// Interpolation failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpError {
    /// Not enough valid samples for the requested kind
    #[error("{kind} interpolation needs at least {required} valid samples, found {available}")]
    TooFewAnchors {
        kind: InterpKind,
        required: usize,
        available: usize,
    },

    /// Evaluation point outside the anchors
    #[error("x = {x} lies outside the valid samples [{first}, {last}]; extrapolation is not supported")]
    OutOfRange { x: f64, first: f64, last: f64 },

    /// Anchor abscissae not strictly increasing
    #[error("anchor positions must be strictly increasing")]
    UnsortedAnchors,

    /// Collocation matrix could not be factorised
    #[error("spline collocation system of degree {degree} is singular")]
    Singular { degree: usize },

    /// NaN masking has no interpolant
    #[error("'nan' correction does not fit an interpolant")]
    NotAnInterpolant,
}

/// Fitted interpolant
#[derive(Debug, Clone)]
pub enum Interpolant {
    Linear(Anchors),
    Nearest(Anchors),
    Previous(Anchors),
    Spline(BSpline),
}

/// Valid `(x, y)` pairs, `x` strictly increasing
#[derive(Debug, Clone)]
pub struct Anchors {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Anchors {
    fn new(xs: &[f64], ys: &[f64]) -> Result<Self, InterpError> {
        debug_assert_eq!(xs.len(), ys.len());
        if xs.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(InterpError::UnsortedAnchors);
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    fn first(&self) -> f64 {
        self.xs[0]
    }

    fn last(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

impl Interpolant {
    /// Fit an interpolant of `kind` through `(xs, ys)`
    pub fn fit(kind: InterpKind, xs: &[f64], ys: &[f64]) -> Result<Self, InterpError> {
        let required = kind.min_anchors();
        if kind.is_nan_mask() {
            return Err(InterpError::NotAnInterpolant);
        }
        if xs.len() < required {
            return Err(InterpError::TooFewAnchors {
                kind,
                required,
                available: xs.len(),
            });
        }

        let anchors = Anchors::new(xs, ys)?;
        match kind {
            InterpKind::Linear | InterpKind::Spline(1) => Ok(Self::Linear(anchors)),
            InterpKind::Nearest => Ok(Self::Nearest(anchors)),
            InterpKind::ZeroOrderHold | InterpKind::Spline(0) => Ok(Self::Previous(anchors)),
            InterpKind::Spline(degree) => {
                BSpline::interpolate(&anchors.xs, &anchors.ys, degree as usize).map(Self::Spline)
            }
            InterpKind::NanMask => Err(InterpError::NotAnInterpolant),
        }
    }

    /// Closed range of `x` the interpolant can be evaluated on
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(a) | Self::Nearest(a) | Self::Previous(a) => (a.first(), a.last()),
            Self::Spline(s) => s.domain(),
        }
    }

    /// Evaluate at `x`
    pub fn eval(&self, x: f64) -> Result<f64, InterpError> {
        let (first, last) = self.domain();
        if !(first <= x && x <= last) {
            return Err(InterpError::OutOfRange { x, first, last });
        }

        Ok(match self {
            Self::Linear(a) => eval_linear(a, x),
            Self::Nearest(a) => eval_nearest(a, x),
            Self::Previous(a) => eval_previous(a, x),
            Self::Spline(s) => s.eval(x),
        })
    }
}

fn eval_linear(a: &Anchors, x: f64) -> f64 {
    let n = a.xs.len();
    let i = a
        .xs
        .partition_point(|&v| v <= x)
        .saturating_sub(1)
        .min(n - 2);
    let (x0, x1) = (a.xs[i], a.xs[i + 1]);
    let (y0, y1) = (a.ys[i], a.ys[i + 1]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Exact midpoints resolve to the lower anchor
fn eval_nearest(a: &Anchors, x: f64) -> f64 {
    let hi = a.xs.partition_point(|&v| v < x);
    if hi == 0 {
        return a.ys[0];
    }
    if hi == a.xs.len() {
        return a.ys[hi - 1];
    }
    let lo = hi - 1;
    if x - a.xs[lo] <= a.xs[hi] - x {
        a.ys[lo]
    } else {
        a.ys[hi]
    }
}

fn eval_previous(a: &Anchors, x: f64) -> f64 {
    let i = a.xs.partition_point(|&v| v <= x).saturating_sub(1);
    a.ys[i]
}

/// Interpolating B-spline
///
/// Knots follow the usual interpolation convention: anchors with repeated
/// ends for odd degree (not-a-knot), anchor midpoints for even degree.
/// The collocation matrix is banded, so fitting is linear in the anchor count.
#[derive(Debug, Clone)]
pub struct BSpline {
    knots: Vec<f64>,
    coeffs: Vec<f64>,
    degree: usize,
}

impl BSpline {
    /// Solve the collocation system so the spline passes through every anchor
    pub fn interpolate(xs: &[f64], ys: &[f64], degree: usize) -> Result<Self, InterpError> {
        let n = xs.len();
        if degree == 0 || n < degree + 1 {
            return Err(InterpError::TooFewAnchors {
                kind: InterpKind::Spline(degree as u8),
                required: degree + 1,
                available: n,
            });
        }

        let knots = interpolation_knots(xs, degree);
        let spans: Vec<usize> = xs
            .iter()
            .map(|&x| find_span(&knots, degree, n, x))
            .collect();

        // row i is non-zero on columns [span - degree, span]
        let (kl, ku) = spans
            .iter()
            .enumerate()
            .fold((0, 0), |(kl, ku), (row, &span)| {
                (kl.max(row.saturating_sub(span - degree)), ku.max(span.saturating_sub(row)))
            });

        let mut collocation = BandedMatrix::zeros(n, kl, ku);
        for (row, (&x, &span)) in xs.iter().zip(&spans).enumerate() {
            for (r, b) in basis_functions(&knots, degree, span, x).into_iter().enumerate() {
                collocation.set(row, span - degree + r, b);
            }
        }

        let coeffs = collocation
            .solve(ys)
            .ok_or(InterpError::Singular { degree })?;

        Ok(Self {
            knots,
            coeffs,
            degree,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.coeffs.len()])
    }

    /// Evaluate inside the domain (de Boor basis, no range check)
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.coeffs.len();
        let span = find_span(&self.knots, self.degree, n, x);
        basis_functions(&self.knots, self.degree, span, x)
            .into_iter()
            .enumerate()
            .map(|(r, b)| b * self.coeffs[span - self.degree + r])
            .sum()
    }
}

/// `n + degree + 1` knots for `n` anchors
fn interpolation_knots(xs: &[f64], degree: usize) -> Vec<f64> {
    let n = xs.len();
    let (first, last) = (xs[0], xs[n - 1]);

    let interior: Vec<f64> = if degree % 2 == 1 {
        let skip = (degree + 1) / 2;
        xs[skip..n - skip].to_vec()
    } else {
        let skip = degree / 2;
        let mids: Vec<f64> = xs.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        mids[skip..mids.len() - skip].to_vec()
    };

    let mut knots = Vec::with_capacity(n + degree + 1);
    knots.extend(std::iter::repeat(first).take(degree + 1));
    knots.extend(interior);
    knots.extend(std::iter::repeat(last).take(degree + 1));
    debug_assert_eq!(knots.len(), n + degree + 1);
    knots
}

/// Index `l` with `knots[l] <= x < knots[l + 1]`, right end folded into the
/// last non-empty span
fn find_span(knots: &[f64], degree: usize, n_coeffs: usize, x: f64) -> usize {
    if x >= knots[n_coeffs] {
        return n_coeffs - 1;
    }
    knots
        .partition_point(|&k| k <= x)
        .saturating_sub(1)
        .clamp(degree, n_coeffs - 1)
}

/// The `degree + 1` non-zero basis functions on `span` (Cox-de Boor)
fn basis_functions(knots: &[f64], degree: usize, span: usize, x: f64) -> Vec<f64> {
    let mut basis = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    basis[0] = 1.0;

    for j in 1..=degree {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = basis[r] / (right[r + 1] + left[j - r]);
            basis[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        basis[j] = saved;
    }
    basis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(xs: &[f64], f: impl Fn(f64) -> f64) -> Vec<f64> {
        xs.iter().map(|&x| f(x)).collect()
    }

    #[test]
    fn test_linear_midpoint() {
        let f = Interpolant::fit(InterpKind::Linear, &[0.0, 2.0, 4.0], &[0.0, 4.0, 0.0]).unwrap();
        assert!((f.eval(1.0).unwrap() - 2.0).abs() < 1e-12);
        assert!((f.eval(3.0).unwrap() - 2.0).abs() < 1e-12);
        assert!((f.eval(4.0).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_tie_goes_low() {
        let f = Interpolant::fit(InterpKind::Nearest, &[0.0, 2.0], &[1.0, 9.0]).unwrap();
        assert_eq!(f.eval(1.0).unwrap(), 1.0);
        assert_eq!(f.eval(1.5).unwrap(), 9.0);
    }

    #[test]
    fn test_previous_holds_value() {
        let f = Interpolant::fit(InterpKind::ZeroOrderHold, &[0.0, 3.0, 5.0], &[1.0, 2.0, 3.0])
            .unwrap();
        assert_eq!(f.eval(2.9).unwrap(), 1.0);
        assert_eq!(f.eval(3.0).unwrap(), 2.0);
        assert_eq!(f.eval(5.0).unwrap(), 3.0);
    }

    #[test]
    fn test_out_of_range_is_error() {
        let f = Interpolant::fit(InterpKind::Linear, &[1.0, 2.0], &[0.0, 1.0]).unwrap();
        assert!(matches!(
            f.eval(0.0),
            Err(InterpError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_too_few_anchors() {
        let err = Interpolant::fit(InterpKind::Spline(3), &[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0])
            .unwrap_err();
        assert_eq!(
            err,
            InterpError::TooFewAnchors {
                kind: InterpKind::Spline(3),
                required: 4,
                available: 3
            }
        );
        assert!(Interpolant::fit(InterpKind::Linear, &[0.0], &[1.0]).is_err());
    }

    #[test]
    fn test_cubic_reproduces_cubic_polynomial() {
        let xs = [0.0, 1.0, 2.0, 5.0, 6.0, 7.0, 9.0];
        let poly = |x: f64| 0.5 * x * x * x - 2.0 * x * x + x - 3.0;
        let f = Interpolant::fit(InterpKind::Spline(3), &xs, &grid(&xs, poly)).unwrap();
        for x in [0.0, 0.5, 3.0, 3.7, 4.2, 8.5, 9.0] {
            let got = f.eval(x).unwrap();
            assert!((got - poly(x)).abs() < 1e-8, "x={x}: {got} vs {}", poly(x));
        }
    }

    #[test]
    fn test_quadratic_reproduces_quadratic_polynomial() {
        let xs = [0.0, 1.0, 2.0, 6.0, 7.0, 8.0];
        let poly = |x: f64| 3.0 * x * x - x + 2.0;
        let f = Interpolant::fit(InterpKind::Spline(2), &xs, &grid(&xs, poly)).unwrap();
        for x in [0.25, 3.0, 4.5, 7.9] {
            assert!((f.eval(x).unwrap() - poly(x)).abs() < 1e-8);
        }
    }

    #[test]
    fn test_spline_passes_through_anchors() {
        let xs = [0.0, 1.0, 2.0, 3.0, 8.0, 9.0, 10.0];
        let ys = [4.0, 4.2, 3.9, 4.1, 4.4, 4.3, 4.5];
        for degree in 2..=5u8 {
            let f = Interpolant::fit(InterpKind::Spline(degree), &xs, &ys).unwrap();
            for (x, y) in xs.iter().zip(ys) {
                assert!(
                    (f.eval(*x).unwrap() - y).abs() < 1e-8,
                    "degree {degree} misses anchor at {x}"
                );
            }
        }
    }

    #[test]
    fn test_slinear_matches_linear() {
        let xs = [0.0, 1.0, 4.0];
        let ys = [1.0, 3.0, 0.0];
        let a = Interpolant::fit(InterpKind::Spline(1), &xs, &ys).unwrap();
        let b = Interpolant::fit(InterpKind::Linear, &xs, &ys).unwrap();
        for x in [0.0, 0.5, 2.5, 4.0] {
            assert_eq!(a.eval(x).unwrap(), b.eval(x).unwrap());
        }
    }

    #[test]
    fn test_unsorted_anchors_rejected() {
        assert_eq!(
            Interpolant::fit(InterpKind::Linear, &[0.0, 0.0], &[1.0, 2.0]).unwrap_err(),
            InterpError::UnsortedAnchors
        );
    }
}
