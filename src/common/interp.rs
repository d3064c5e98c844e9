use crate::Result;
use crate::errors::GeometryError;

/// Find the index of the last element in an ascending `slice` which is less than or equal to
/// `test_value`. Values below the first element resolve to index 0 and values at or beyond the
/// last element resolve to the last index.
pub fn preceding_index_search(slice: &[f64], test_value: f64) -> usize {
    if slice.len() <= 1 || slice[1] > test_value {
        return 0;
    }

    let mut a = 1;
    let mut b = slice.len() - 1;
    if slice[b] <= test_value {
        return b;
    }

    while b > a + 1 {
        let check = (a + b) / 2;
        if test_value >= slice[check] {
            a = check;
        } else {
            b = check;
        }
    }
    a
}

/// Linearly interpolate the sampled distribution `(xs, ys)` at `x`. The value must lie inside the
/// closed range of `xs`, which must be ascending.
///
/// # Arguments
///
/// * `xs`: ascending sample positions
/// * `ys`: sample values, one per position
/// * `x`: the position at which to evaluate the distribution
///
/// returns: Result<f64, GeometryError>
pub fn interpolate_linear(xs: &[f64], ys: &[f64], x: f64) -> Result<f64> {
    let (Some(&min), Some(&max)) = (xs.first(), xs.last()) else {
        return Err(GeometryError::NotEnoughStations { found: 0 });
    };
    if xs.len() != ys.len() {
        return Err(GeometryError::degenerate(
            "interpolation positions and values differ in length",
        ));
    }
    if !(min..=max).contains(&x) {
        return Err(GeometryError::OutOfRange { value: x, min, max });
    }

    let i = preceding_index_search(xs, x);
    if i + 1 == xs.len() {
        return Ok(ys[i]);
    }

    let dx = xs[i + 1] - xs[i];
    if dx <= 0.0 {
        return Ok(ys[i]);
    }
    let f = (x - xs[i]) / dx;
    Ok(ys[i] + f * (ys[i + 1] - ys[i]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;
    use test_case::test_case;

    fn naive(slice: &[f64], test_value: f64) -> usize {
        if slice.len() <= 1 || slice[1] > test_value {
            return 0;
        }

        if slice[slice.len() - 1] <= test_value {
            return slice.len() - 1;
        }

        for (i, v) in slice.iter().enumerate().skip(1) {
            if *v > test_value {
                return i - 1;
            }
        }
        slice.len() - 1
    }

    #[test_case(-1.0, 0)]
    #[test_case(0.0, 0)]
    #[test_case(0.5, 0)]
    #[test_case(1.0, 1)]
    #[test_case(2.5, 2)]
    #[test_case(4.0, 4)]
    #[test_case(5.0, 4)]
    fn preceding_index_cases(v: f64, e: usize) {
        let test = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(e, preceding_index_search(&test, v));
    }

    #[test]
    fn preceding_index_random() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let count: usize = rng.random_range(2..200);
            let mut values: Vec<f64> = (0..count).map(|_| rng.random_range(-10.0..10.0)).collect();
            values.sort_by(f64::total_cmp);

            for _ in 0..100 {
                let test = rng.random_range(-11.0..11.0);
                assert_eq!(naive(&values, test), preceding_index_search(&values, test));
            }
        }
    }

    #[test_case(0.0, 2.0)]
    #[test_case(0.5, 1.5)]
    #[test_case(1.0, 1.0)]
    #[test_case(1.5, 3.0)]
    #[test_case(2.0, 5.0)]
    fn interpolate_piecewise(x: f64, e: f64) {
        let xs = [0.0, 1.0, 2.0];
        let ys = [2.0, 1.0, 5.0];
        assert_relative_eq!(interpolate_linear(&xs, &ys, x).unwrap(), e, epsilon = 1e-12);
    }

    #[test]
    fn interpolate_outside_is_error() {
        let r = interpolate_linear(&[0.0, 1.0], &[0.0, 1.0], 1.5);
        assert!(matches!(r, Err(GeometryError::OutOfRange { .. })));
    }
}
