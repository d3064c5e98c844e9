use crate::Result;
use crate::errors::GeometryError;
use serde::{Deserialize, Serialize};
use uom::si::f64::Angle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlSurfaceKind {
    SymmetricFlap,
    AsymmetricFlap,
    Slat,
    Spoiler,
}

/// A movable device attached to a lifting surface. The geometry engine only uses its spanwise
/// extent and chord ratios to report its planform area; everything else is carried through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSurface {
    pub id: String,
    pub kind: ControlSurfaceKind,
    pub inner_eta: f64,
    pub outer_eta: f64,

    /// Device chord as a fraction of the local surface chord at the inner and outer stations
    pub inner_chord_ratio: f64,
    pub outer_chord_ratio: f64,
    pub min_deflection: Angle,
    pub max_deflection: Angle,
}

impl ControlSurface {
    /// A spoiler described by the chordwise band it occupies, as fractions of the local chord
    /// measured from the leading edge. The band is the same at the inner and outer stations, so
    /// its width becomes the chord ratio at both.
    ///
    /// # Arguments
    ///
    /// * `id`: identifier of the spoiler
    /// * `inner_eta`, `outer_eta`: the normalized spanwise extent
    /// * `forward`, `aft`: chordwise positions of the hinge line and of the trailing edge of the
    ///   spoiler panel
    /// * `min_deflection`, `max_deflection`: the deflection limits
    ///
    /// returns: Result<ControlSurface, GeometryError>
    pub fn spoiler(
        id: impl Into<String>,
        (inner_eta, outer_eta): (f64, f64),
        (forward, aft): (f64, f64),
        (min_deflection, max_deflection): (Angle, Angle),
    ) -> Result<Self> {
        let id = id.into();
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(forward) || !in_unit(aft) || forward >= aft {
            return Err(GeometryError::degenerate(format!(
                "spoiler '{id}' must occupy an increasing chordwise band inside [0, 1], got \
                 [{forward}, {aft}]"
            )));
        }
        let spoiler = Self {
            id,
            kind: ControlSurfaceKind::Spoiler,
            inner_eta,
            outer_eta,
            inner_chord_ratio: aft - forward,
            outer_chord_ratio: aft - forward,
            min_deflection,
            max_deflection,
        };
        spoiler.validate()?;
        Ok(spoiler)
    }

    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.inner_eta) || !in_unit(self.outer_eta) || self.inner_eta >= self.outer_eta
        {
            return Err(GeometryError::degenerate(format!(
                "control surface '{}' must span an increasing range inside [0, 1], got [{}, {}]",
                self.id, self.inner_eta, self.outer_eta
            )));
        }
        if !in_unit(self.inner_chord_ratio) || !in_unit(self.outer_chord_ratio) {
            return Err(GeometryError::degenerate(format!(
                "control surface '{}' chord ratios must lie in [0, 1]",
                self.id
            )));
        }
        Ok(())
    }

    /// The planform area of the device in square metres.
    ///
    /// # Arguments
    ///
    /// * `chord_at`: the local chord of the surface at a spanwise position, both in metres
    /// * `semi_span`: the semispan of the surface in metres
    /// * `mirrored`: whether the device is repeated on the symmetric half of the surface
    ///
    /// returns: Result<f64, GeometryError>
    pub fn area(
        &self,
        chord_at: impl Fn(f64) -> Result<f64>,
        semi_span: f64,
        mirrored: bool,
    ) -> Result<f64> {
        let c_in = chord_at(self.inner_eta * semi_span)?;
        let c_out = chord_at(self.outer_eta * semi_span)?;
        let both_halves = (self.inner_chord_ratio * c_in + self.outer_chord_ratio * c_out)
            * (self.outer_eta - self.inner_eta)
            * semi_span;
        Ok(if mirrored {
            both_halves
        } else {
            both_halves / 2.0
        })
    }
}
