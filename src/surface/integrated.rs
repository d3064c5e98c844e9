//! Area-weighted reference quantities obtained by integrating the discretized distributions.

use super::{Discretization, Station};
use crate::Result;
use crate::common::{Estimate, integrate_spline};
use crate::errors::GeometryError;
use serde::Serialize;
use tracing::debug;

/// Tolerance tag attached to every integrated quantity
pub const INTEGRATION_TOL: f64 = 1.0e-9;

/// Integrate a station quantity over the semispan. The integral is split at the panel boundaries
/// so that the kinks in the distributions fall on segment ends, where the spline is allowed to
/// change slope.
///
/// # Arguments
///
/// * `discretization`: the spanwise station sequence of the surface
/// * `f`: the integrand, evaluated at every station
///
/// returns: Result<f64, GeometryError>
pub fn integrate_stations(
    discretization: &Discretization,
    f: impl Fn(&Station) -> f64,
) -> Result<f64> {
    let found = discretization.len();
    if found < 2 {
        return Err(GeometryError::NotEnoughStations { found });
    }

    let mut total = 0.0;
    for panel in discretization.panels() {
        let segment = panel.segment();
        let x = segment.iter().map(|s| s.y).collect::<Vec<_>>();
        let y = segment.iter().map(&f).collect::<Vec<_>>();
        total += integrate_spline(&x, &y)?;
    }
    Ok(total)
}

/// The mean aerodynamic chord and the position of its leading edge. Values are in metres and
/// carry the integration tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanAerodynamicChord {
    pub chord: Estimate<f64>,
    pub x_le: Estimate<f64>,
    pub y_le: Estimate<f64>,
    pub z_le: Estimate<f64>,
}

impl MeanAerodynamicChord {
    /// Compute the MAC of a surface from its station sequence.
    ///
    /// # Arguments
    ///
    /// * `discretization`: the spanwise station sequence of one half of the surface
    /// * `planform_area`: the reference area of the surface in square metres, counting both
    ///   halves when the surface is mirrored
    /// * `mirrored`: whether the stations describe one of two symmetric halves
    ///
    /// returns: Result<MeanAerodynamicChord, GeometryError>
    pub fn from_discretization(
        discretization: &Discretization,
        planform_area: f64,
        mirrored: bool,
    ) -> Result<Self> {
        if !planform_area.is_finite() || planform_area <= 0.0 {
            return Err(GeometryError::degenerate(format!(
                "planform area must be positive to compute the MAC, got {planform_area} m^2"
            )));
        }
        let k = (if mirrored { 2.0 } else { 1.0 }) / planform_area;

        let chord = k * integrate_stations(discretization, |s| s.chord * s.chord)?;
        let x_le = k * integrate_stations(discretization, |s| s.x_le * s.chord)?;
        let y_le = k * integrate_stations(discretization, |s| s.y * s.chord)?;
        let z_le = k * integrate_stations(discretization, |s| s.z_le * s.chord)?;
        debug!(mac_m = chord, x_le_m = x_le, y_le_m = y_le, "integrated MAC");

        Ok(Self {
            chord: Estimate::new(chord, INTEGRATION_TOL),
            x_le: Estimate::new(x_le, INTEGRATION_TOL),
            y_le: Estimate::new(y_le, INTEGRATION_TOL),
            z_le: Estimate::new(z_le, INTEGRATION_TOL),
        })
    }
}
