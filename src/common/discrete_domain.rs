//! Ordered sets of finite scalar stations. The normalized spanwise grid of a surface is one of
//! these, merged with the breakpoint stations before the panels are sampled.

use crate::Result;
use crate::errors::GeometryError;
use itertools::Itertools;
use serde::Serialize;

/// Generate a discrete domain of values which are linearly spaced between `start` and `end` and
/// which have a total count of `n`. The first value will be `start` and the last value will be
/// `end`. A count of zero produces an empty domain and a count of one produces a domain holding
/// only `start`.
///
/// # Arguments
///
/// * `start`: the starting value of the domain, inclusive
/// * `end`: the ending value of the domain, inclusive
/// * `n`: the total number of discrete, evenly spaced values in the domain
///
/// returns: DiscreteDomain
///
/// # Examples
///
/// ```
/// use liftgeom::common::linear_space;
/// let domain = linear_space(0.0, 1.0, 3);
/// assert_eq!(domain.values(), vec![0.0, 0.5, 1.0]);
/// ```
pub fn linear_space(start: f64, end: f64, n: usize) -> DiscreteDomain {
    match n {
        0 => DiscreteDomain::default(),
        1 => DiscreteDomain {
            values: vec![start],
        },
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values = (0..n).map(|i| start + i as f64 * step).collect::<Vec<_>>();
            // Pin the final value so that accumulated rounding never overshoots `end`
            values[n - 1] = end;
            DiscreteDomain { values }
        }
    }
}

fn are_all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// A discrete domain of scalar f64 values, in which all values are guaranteed to be finite and
/// in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscreteDomain {
    values: Vec<f64>,
}

impl DiscreteDomain {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Merge a set of anchor values into this domain, producing a new sorted and de-duplicated
    /// domain. Anchors always survive the merge exactly as given, while any value of this domain
    /// that lies within `tol` of an anchor is dropped in favor of the anchor.
    ///
    /// # Arguments
    ///
    /// * `anchors`: finite values which must appear verbatim in the merged domain
    /// * `tol`: absolute distance under which a domain value is considered a duplicate of an
    ///   anchor
    ///
    /// returns: Result<DiscreteDomain, GeometryError>
    ///
    /// # Examples
    ///
    /// ```
    /// use liftgeom::common::linear_space;
    /// let merged = linear_space(0.0, 1.0, 3).merged_with(&[0.25, 0.5], 1e-9).unwrap();
    /// assert_eq!(merged.values(), vec![0.0, 0.25, 0.5, 1.0]);
    /// ```
    pub fn merged_with(&self, anchors: &[f64], tol: f64) -> Result<DiscreteDomain> {
        if !are_all_finite(anchors) {
            return Err(GeometryError::degenerate(
                "cannot merge non-finite anchor values into a discrete domain",
            ));
        }

        let values = self
            .values
            .iter()
            .copied()
            .filter(|v| anchors.iter().all(|a| (a - v).abs() > tol))
            .chain(anchors.iter().copied())
            .sorted_by(f64::total_cmp)
            .dedup()
            .collect();

        Ok(DiscreteDomain { values })
    }
}
