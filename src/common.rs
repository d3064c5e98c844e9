//! Numerical building blocks shared by the surface geometry pipeline: ordered station domains,
//! spline integration, interpolation over sampled distributions, and the unit helpers used to
//! move between `uom` quantities and raw SI values.

mod discrete_domain;
mod estimate;
mod integrate;
mod interp;
pub mod units;

pub use discrete_domain::{DiscreteDomain, linear_space};
pub use estimate::Estimate;
pub use integrate::{integrate_spline, natural_spline_moments};
pub use interp::{interpolate_linear, preceding_index_search};

/// Relative tolerance used when comparing values that should agree at a shared panel boundary
pub const CONTINUITY_TOL: f64 = 1.0e-6;

/// Returns true if `a` and `b` agree within a relative tolerance `tol`, falling back to an
/// absolute comparison when both values are close to zero.
pub fn nearly_equal(a: f64, b: f64, tol: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tol * scale
}
