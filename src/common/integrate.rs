//! Integration of sampled distributions. A natural cubic spline is passed through the samples and
//! each spline segment is integrated with Simpson's rule, which is exact for a cubic, so the result
//! is the exact integral of the interpolating spline.

use crate::Result;
use crate::errors::GeometryError;
use itertools::Itertools;

/// Compute the second derivatives of the natural cubic spline which passes through the points
/// `(x[i], y[i])`. The end moments are zero. The `x` values must be strictly increasing.
///
/// # Arguments
///
/// * `x`: the strictly increasing abscissae of the samples
/// * `y`: the sample values, one per abscissa
///
/// returns: Result<Vec<f64>, GeometryError>
pub fn natural_spline_moments(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    check_samples(x, y)?;
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return Ok(m);
    }

    let h = x.iter().tuple_windows().map(|(a, b)| b - a).collect::<Vec<_>>();

    // Tridiagonal system for the interior moments, solved with the Thomas algorithm
    let k = n - 2;
    let mut diag = vec![0.0; k];
    let mut upper = vec![0.0; k];
    let mut rhs = vec![0.0; k];
    for j in 0..k {
        let i = j + 1;
        diag[j] = 2.0 * (h[i - 1] + h[i]);
        upper[j] = h[i];
        rhs[j] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
    }

    for j in 1..k {
        let lower = h[j];
        let w = lower / diag[j - 1];
        diag[j] -= w * upper[j - 1];
        rhs[j] -= w * rhs[j - 1];
    }

    m[k] = rhs[k - 1] / diag[k - 1];
    for j in (0..k - 1).rev() {
        m[j + 1] = (rhs[j] - upper[j] * m[j + 2]) / diag[j];
    }

    Ok(m)
}

/// Integrate sampled values over their full abscissa range using Simpson's rule on each segment of
/// the natural cubic spline through the samples. Two samples reduce to the trapezoid rule.
///
/// # Arguments
///
/// * `x`: the strictly increasing abscissae of the samples, at least two
/// * `y`: the sample values, one per abscissa
///
/// returns: Result<f64, GeometryError>
///
/// # Examples
///
/// ```
/// use liftgeom::common::integrate_spline;
/// let area = integrate_spline(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap();
/// assert!((area - 4.0).abs() < 1e-12);
/// ```
pub fn integrate_spline(x: &[f64], y: &[f64]) -> Result<f64> {
    let m = natural_spline_moments(x, y)?;

    let total = (0..x.len() - 1)
        .map(|i| {
            let h = x[i + 1] - x[i];
            let mid = 0.5 * (y[i] + y[i + 1]) - h * h * (m[i] + m[i + 1]) / 16.0;
            h / 6.0 * (y[i] + 4.0 * mid + y[i + 1])
        })
        .sum();

    Ok(total)
}

fn check_samples(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(GeometryError::degenerate(format!(
            "sample abscissae ({}) and values ({}) differ in length",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(GeometryError::NotEnoughStations { found: x.len() });
    }
    if x.iter().tuple_windows().any(|(a, b)| b <= a) {
        return Err(GeometryError::degenerate(
            "sample abscissae must be strictly increasing",
        ));
    }
    Ok(())
}
