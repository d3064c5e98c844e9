//! A single trapezoidal panel of a lifting surface, and the closed-form quantities derived from it.

use crate::Result;
use crate::common::units::{in_meters, in_radians, meters, radians, square_meters};
use crate::errors::GeometryError;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use uom::si::f64::{Angle, Area, Length};

/// An opaque reference to an airfoil section by name. The geometry engine never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AirfoilRef(pub String);

impl AirfoilRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// The defining parameters of a panel in raw SI values: chords and semispan in metres, angles in
/// radians. The semispan is measured along the panel, before any dihedral projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelParams {
    pub chord_root: f64,
    pub chord_tip: f64,
    pub semi_span: f64,
    pub sweep_le: f64,
    pub dihedral: f64,
    pub twist_tip: f64,
}

impl PanelParams {
    fn validate(&self) -> Result<()> {
        let values = [
            self.chord_root,
            self.chord_tip,
            self.semi_span,
            self.sweep_le,
            self.dihedral,
            self.twist_tip,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::degenerate("panel parameters must be finite"));
        }
        if self.chord_root <= 0.0 {
            return Err(GeometryError::degenerate(format!(
                "root chord must be positive, got {} m",
                self.chord_root
            )));
        }
        if self.chord_tip <= 0.0 {
            return Err(GeometryError::degenerate(format!(
                "tip chord must be positive, got {} m",
                self.chord_tip
            )));
        }
        if self.semi_span <= 0.0 {
            return Err(GeometryError::degenerate(format!(
                "semispan must be positive, got {} m",
                self.semi_span
            )));
        }
        if self.sweep_le.abs() >= FRAC_PI_2 || self.dihedral.abs() >= FRAC_PI_2 {
            return Err(GeometryError::degenerate(
                "sweep and dihedral must lie strictly between -90 and 90 degrees",
            ));
        }
        Ok(())
    }
}

/// Quantities derived from the panel parameters with the standard trapezoid formulas. Lengths
/// are in metres, areas in square metres and angles in radians. Areas and span count both
/// mirrored halves of the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PanelGeometry {
    pub taper_ratio: f64,
    pub planform_area: f64,
    pub wetted_area: f64,
    pub span: f64,
    pub aspect_ratio: f64,
    pub sweep_quarter_chord: f64,
    pub sweep_half_chord: f64,
    pub sweep_te: f64,
    pub mac: f64,
    pub mac_le_x: f64,
    pub mac_le_y: f64,
    pub mac_le_z: f64,
}

/// One trapezoidal segment of a lifting surface. A panel is always valid: construction and every
/// mutation check that chords and semispan are positive and finite, and the derived geometry is
/// recomputed exactly once per accepted change.
#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    id: String,
    params: PanelParams,
    airfoil_root: Option<AirfoilRef>,
    airfoil_tip: Option<AirfoilRef>,
    geometry: PanelGeometry,
}

impl Panel {
    /// Create a panel directly from raw SI parameters. Most callers will prefer `PanelBuilder`,
    /// which accepts physical quantities.
    pub fn new(id: impl Into<String>, params: PanelParams) -> Result<Self> {
        params.validate()?;
        let mut panel = Self {
            id: id.into(),
            params,
            airfoil_root: None,
            airfoil_tip: None,
            geometry: PanelGeometry::default(),
        };
        panel.calculate_geometry();
        Ok(panel)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn params(&self) -> &PanelParams {
        &self.params
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    pub fn chord_root(&self) -> Length {
        meters(self.params.chord_root)
    }

    pub fn chord_tip(&self) -> Length {
        meters(self.params.chord_tip)
    }

    pub fn semi_span(&self) -> Length {
        meters(self.params.semi_span)
    }

    pub fn sweep_le(&self) -> Angle {
        radians(self.params.sweep_le)
    }

    pub fn dihedral(&self) -> Angle {
        radians(self.params.dihedral)
    }

    pub fn twist_tip(&self) -> Angle {
        radians(self.params.twist_tip)
    }

    pub fn airfoil_root(&self) -> Option<&AirfoilRef> {
        self.airfoil_root.as_ref()
    }

    pub fn airfoil_tip(&self) -> Option<&AirfoilRef> {
        self.airfoil_tip.as_ref()
    }

    pub fn taper_ratio(&self) -> f64 {
        self.geometry.taper_ratio
    }

    pub fn planform_area(&self) -> Area {
        square_meters(self.geometry.planform_area)
    }

    pub fn wetted_area(&self) -> Area {
        square_meters(self.geometry.wetted_area)
    }

    pub fn span(&self) -> Length {
        meters(self.geometry.span)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.geometry.aspect_ratio
    }

    pub fn mean_aerodynamic_chord(&self) -> Length {
        meters(self.geometry.mac)
    }

    /// The leading edge of the panel MAC as `[x, y, z]`, measured from the panel's own root
    /// leading edge.
    pub fn mean_aerodynamic_chord_le(&self) -> [Length; 3] {
        [
            meters(self.geometry.mac_le_x),
            meters(self.geometry.mac_le_y),
            meters(self.geometry.mac_le_z),
        ]
    }

    pub fn sweep_quarter_chord(&self) -> Angle {
        radians(self.geometry.sweep_quarter_chord)
    }

    pub fn sweep_half_chord(&self) -> Angle {
        radians(self.geometry.sweep_half_chord)
    }

    pub fn sweep_te(&self) -> Angle {
        radians(self.geometry.sweep_te)
    }

    /// Compute the sweep angle of the line joining the points at the same chord fraction `x` on
    /// the root and tip sections.
    ///
    /// # Arguments
    ///
    /// * `x`: the chord fraction, 0.0 at the leading edge and 1.0 at the trailing edge
    ///
    /// returns: Angle
    ///
    /// # Examples
    ///
    /// ```
    /// use liftgeom::PanelBuilder;
    /// use liftgeom::common::units::{meters, degrees, in_radians};
    /// let panel = PanelBuilder::new("p")
    ///     .chords(meters(2.0), meters(2.0))
    ///     .semi_span(meters(5.0))
    ///     .sweep_le(degrees(20.0))
    ///     .build()
    ///     .unwrap();
    /// let sweep = in_radians(panel.sweep_at(0.5));
    /// assert!((sweep - 20f64.to_radians()).abs() < 1e-12);
    /// ```
    pub fn sweep_at(&self, x: f64) -> Angle {
        radians(sweep_at_fraction(&self.params, &self.geometry, x))
    }

    /// Recompute every derived quantity from the current parameters.
    pub fn calculate_geometry(&mut self) {
        let p = &self.params;
        let mut g = PanelGeometry {
            taper_ratio: p.chord_tip / p.chord_root,
            planform_area: (p.chord_root + p.chord_tip) * p.semi_span,
            span: 2.0 * p.semi_span,
            ..PanelGeometry::default()
        };
        let l = g.taper_ratio;
        g.wetted_area = 2.0 * g.planform_area;
        g.aspect_ratio = g.span * g.span / g.planform_area;
        g.mac = (2.0 / 3.0) * p.chord_root * (1.0 + l + l * l) / (1.0 + l);
        g.mac_le_y = (p.semi_span / 3.0) * (1.0 + 2.0 * l) / (1.0 + l);
        g.mac_le_x = g.mac_le_y * p.sweep_le.tan();
        g.mac_le_z = g.mac_le_y * p.dihedral.tan();
        g.sweep_quarter_chord = sweep_at_fraction(p, &g, 0.25);
        g.sweep_half_chord = sweep_at_fraction(p, &g, 0.5);
        g.sweep_te = sweep_at_fraction(p, &g, 1.0);
        self.geometry = g;
    }

    /// Apply any number of parameter edits and re-derive the geometry once. If the edited
    /// parameters are invalid the panel is left unchanged and the error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use liftgeom::PanelBuilder;
    /// use liftgeom::common::units::meters;
    /// let mut panel = PanelBuilder::new("p")
    ///     .chords(meters(2.0), meters(1.0))
    ///     .semi_span(meters(5.0))
    ///     .build()
    ///     .unwrap();
    /// panel.modify(|p| {
    ///     p.chord_root = 3.0;
    ///     p.chord_tip = 1.5;
    /// }).unwrap();
    /// assert_eq!(panel.taper_ratio(), 0.5);
    /// ```
    pub fn modify(&mut self, f: impl FnOnce(&mut PanelParams)) -> Result<()> {
        let mut params = self.params;
        f(&mut params);
        params.validate()?;
        self.params = params;
        self.calculate_geometry();
        Ok(())
    }

    pub fn set_chord_root(&mut self, value: Length) -> Result<()> {
        self.modify(|p| p.chord_root = in_meters(value))
    }

    pub fn set_chord_tip(&mut self, value: Length) -> Result<()> {
        self.modify(|p| p.chord_tip = in_meters(value))
    }

    pub fn set_semi_span(&mut self, value: Length) -> Result<()> {
        self.modify(|p| p.semi_span = in_meters(value))
    }

    pub fn set_sweep_le(&mut self, value: Angle) -> Result<()> {
        self.modify(|p| p.sweep_le = in_radians(value))
    }

    pub fn set_dihedral(&mut self, value: Angle) -> Result<()> {
        self.modify(|p| p.dihedral = in_radians(value))
    }

    pub fn set_twist_tip(&mut self, value: Angle) -> Result<()> {
        self.modify(|p| p.twist_tip = in_radians(value))
    }

    pub fn set_airfoil_root(&mut self, airfoil: Option<AirfoilRef>) {
        self.airfoil_root = airfoil;
    }

    pub fn set_airfoil_tip(&mut self, airfoil: Option<AirfoilRef>) {
        self.airfoil_tip = airfoil;
    }
}

fn sweep_at_fraction(p: &PanelParams, g: &PanelGeometry, x: f64) -> f64 {
    debug_assert!(
        (0.0..=1.0).contains(&x),
        "chord fraction {x} is outside of [0, 1]"
    );
    let l = g.taper_ratio;
    (p.sweep_le.tan() - (4.0 / g.aspect_ratio) * x * (1.0 - l) / (1.0 + l)).atan()
}

/// Assembles a `Panel` from physical quantities in a single step. Chords and semispan have no
/// sensible default and must be provided; angles default to zero.
#[derive(Debug, Clone)]
pub struct PanelBuilder {
    id: String,
    chord_root: Option<Length>,
    chord_tip: Option<Length>,
    semi_span: Option<Length>,
    sweep_le: Angle,
    dihedral: Angle,
    twist_tip: Angle,
    airfoil_root: Option<AirfoilRef>,
    airfoil_tip: Option<AirfoilRef>,
}

impl PanelBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chord_root: None,
            chord_tip: None,
            semi_span: None,
            sweep_le: radians(0.0),
            dihedral: radians(0.0),
            twist_tip: radians(0.0),
            airfoil_root: None,
            airfoil_tip: None,
        }
    }

    pub fn chord_root(mut self, value: Length) -> Self {
        self.chord_root = Some(value);
        self
    }

    pub fn chord_tip(mut self, value: Length) -> Self {
        self.chord_tip = Some(value);
        self
    }

    pub fn chords(self, root: Length, tip: Length) -> Self {
        self.chord_root(root).chord_tip(tip)
    }

    pub fn semi_span(mut self, value: Length) -> Self {
        self.semi_span = Some(value);
        self
    }

    pub fn sweep_le(mut self, value: Angle) -> Self {
        self.sweep_le = value;
        self
    }

    pub fn dihedral(mut self, value: Angle) -> Self {
        self.dihedral = value;
        self
    }

    pub fn twist_tip(mut self, value: Angle) -> Self {
        self.twist_tip = value;
        self
    }

    pub fn airfoil_root(mut self, airfoil: Option<AirfoilRef>) -> Self {
        self.airfoil_root = airfoil;
        self
    }

    pub fn airfoil_tip(mut self, airfoil: Option<AirfoilRef>) -> Self {
        self.airfoil_tip = airfoil;
        self
    }

    pub(crate) fn has_chord_root(&self) -> bool {
        self.chord_root.is_some()
    }

    pub(crate) fn has_airfoil_root(&self) -> bool {
        self.airfoil_root.is_some()
    }

    pub fn build(self) -> Result<Panel> {
        let missing = |name: &str| {
            GeometryError::degenerate(format!("panel '{}' has no {name}", self.id))
        };
        let params = PanelParams {
            chord_root: in_meters(self.chord_root.ok_or_else(|| missing("root chord"))?),
            chord_tip: in_meters(self.chord_tip.ok_or_else(|| missing("tip chord"))?),
            semi_span: in_meters(self.semi_span.ok_or_else(|| missing("semispan"))?),
            sweep_le: in_radians(self.sweep_le),
            dihedral: in_radians(self.dihedral),
            twist_tip: in_radians(self.twist_tip),
        };
        let mut panel = Panel::new(self.id, params)?;
        panel.airfoil_root = self.airfoil_root;
        panel.airfoil_tip = self.airfoil_tip;
        Ok(panel)
    }
}
