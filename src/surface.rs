//! Lifting surfaces as ordered chains of trapezoidal panels, and the pipeline which derives their
//! geometry: breakpoints, spanwise discretization, integrated reference quantities, the
//! equivalent wing and the top view outline.

mod adjust;
mod breakpoints;
mod control;
mod discretize;
mod equivalent;
mod integrated;
mod panel;

pub use adjust::{AdjustCriterion, Trapezoid};
pub use breakpoints::Breakpoints;
pub use control::{ControlSurface, ControlSurfaceKind};
pub use discretize::{BOUNDARY_TOL, BREAKPOINT_TOL, Discretization, PanelStations, Station};
pub use equivalent::{EquivalentWing, EquivalentWingParams, ReferenceSweep};
pub use integrated::{INTEGRATION_TOL, MeanAerodynamicChord, integrate_stations};
pub use panel::{AirfoilRef, Panel, PanelBuilder, PanelGeometry, PanelParams};

use crate::Result;
use crate::common::units::{in_meters, meters, radians, square_meters};
use crate::common::{CONTINUITY_TOL, Estimate, interpolate_linear, nearly_equal};
use crate::errors::GeometryError;
use crate::geom2::TopView;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::{debug, debug_span, warn};
use uom::si::f64::{Angle, Area, Length};

/// Number of uniform spanwise stations used when a query has to build the geometry itself
pub const DEFAULT_STATIONS: usize = 15;

/// The index of a panel within its surface, counted from the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PanelId(pub usize);

impl Display for PanelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "panel {}", self.0)
    }
}

/// How the panels of a surface were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Definition {
    /// Panels were given one by one, and the equivalent wing is derived from them
    Panels,

    /// Panels were reconstructed from equivalent-wing parameters, which remain authoritative
    Equivalent,
}

/// Everything derived from the panel chain by one run of the geometry pipeline. Lengths are in
/// metres and areas in square metres.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceGeometry {
    pub semi_span: f64,
    pub span: f64,
    pub planform_area: f64,
    pub wetted_area: f64,
    pub aspect_ratio: f64,
    pub taper_ratio: f64,
    pub mac: MeanAerodynamicChord,
    pub breakpoints: Breakpoints,
    pub discretization: Discretization,
    pub top_view: TopView,
}

/// A lifting surface made of an ordered chain of panels. Derived geometry is cached and rebuilt
/// as a whole, either on request or by the first query after a mutation.
#[derive(Debug, Clone)]
pub struct Surface {
    id: String,
    mirrored: bool,
    panels: Vec<Panel>,
    control_surfaces: Vec<ControlSurface>,
    definition: Definition,
    equivalent: Option<EquivalentWing>,
    geometry: Option<SurfaceGeometry>,
    stations: usize,
}

impl Surface {
    /// Create an empty, mirrored surface. Panels must be added before any geometry is queried.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mirrored: true,
            panels: Vec::new(),
            control_surfaces: Vec::new(),
            definition: Definition::Panels,
            equivalent: None,
            geometry: None,
            stations: DEFAULT_STATIONS,
        }
    }

    /// Create a surface from a complete panel chain, checking continuity between neighbors.
    pub fn with_panels(id: impl Into<String>, panels: Vec<Panel>) -> Result<Self> {
        let mut surface = Self::new(id);
        for panel in panels {
            surface.add_panel(panel)?;
        }
        Ok(surface)
    }

    /// Create a surface whose panels are reconstructed from an equivalent wing. The equivalent
    /// wing is kept as given and is never replaced by recomputing the geometry.
    ///
    /// # Arguments
    ///
    /// * `id`: identifier of the surface
    /// * `equivalent`: the equivalent wing describing the surface
    ///
    /// returns: Result<Surface, GeometryError>
    pub fn from_equivalent_wing(id: impl Into<String>, equivalent: EquivalentWing) -> Result<Self> {
        let mut surface = Self::new(id);
        surface.panels = equivalent.reconstruct()?;
        surface.definition = Definition::Equivalent;
        surface.equivalent = Some(equivalent);
        Ok(surface)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn definition(&self) -> Definition {
        self.definition
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Set whether the surface has a symmetric twin across the symmetry plane (a wing or
    /// horizontal tail) or stands alone (a vertical tail).
    pub fn set_mirrored(&mut self, mirrored: bool) {
        if self.mirrored != mirrored {
            self.mirrored = mirrored;
            self.geometry = None;
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn panel(&self, id: PanelId) -> Result<&Panel> {
        self.panels.get(id.0).ok_or(GeometryError::UnknownPanel(id.0))
    }

    pub fn control_surfaces(&self) -> &[ControlSurface] {
        &self.control_surfaces
    }

    /// Append a panel at the tip of the surface. Its root chord must match the tip chord of the
    /// current last panel.
    ///
    /// # Arguments
    ///
    /// * `panel`: the panel to append
    ///
    /// returns: Result<PanelId, GeometryError>
    pub fn add_panel(&mut self, panel: Panel) -> Result<PanelId> {
        let id = PanelId(self.panels.len());
        if let Some(previous) = self.panels.last() {
            check_continuity(previous, &panel, id.0)?;
        }
        self.panels.push(panel);
        self.invalidate();
        Ok(id)
    }

    /// Append a panel whose root section is taken from the tip of the current last panel. A root
    /// chord or root airfoil already set on the builder is replaced.
    pub fn add_linked_panel(&mut self, builder: PanelBuilder) -> Result<PanelId> {
        let previous = self.panels.last().ok_or(GeometryError::NoPanels)?;
        if builder.has_chord_root() || builder.has_airfoil_root() {
            debug!(surface = %self.id, "linked panel root section taken from previous tip");
        }
        let panel = builder
            .chord_root(previous.chord_tip())
            .airfoil_root(previous.airfoil_tip().cloned())
            .build()?;
        self.add_panel(panel)
    }

    /// Edit the parameters of one panel. The edit is rejected, leaving the surface unchanged, if
    /// the panel becomes invalid or no longer matches its neighbors.
    pub fn modify_panel(
        &mut self,
        id: PanelId,
        f: impl FnOnce(&mut PanelParams),
    ) -> Result<()> {
        let mut panel = self.panel(id)?.clone();
        panel.modify(f)?;
        if let Some(previous) = id.0.checked_sub(1).and_then(|i| self.panels.get(i)) {
            check_continuity(previous, &panel, id.0)?;
        }
        if let Some(next) = self.panels.get(id.0 + 1) {
            check_continuity(&panel, next, id.0 + 1)?;
        }
        self.panels[id.0] = panel;
        self.invalidate();
        Ok(())
    }

    pub fn add_control_surface(&mut self, control: ControlSurface) -> Result<()> {
        control.validate()?;
        self.control_surfaces.push(control);
        Ok(())
    }

    fn invalidate(&mut self) {
        self.geometry = None;
        if self.definition == Definition::Equivalent {
            debug!(surface = %self.id, "panels edited, equivalent wing no longer authoritative");
            self.definition = Definition::Panels;
        }
        self.equivalent = None;
    }

    /// Resize the surface to three prescribed planform dimensions. The equivalent wing is resized
    /// and the panels are rebuilt from it, keeping its sweep, dihedral, tip twist, crank station,
    /// root offsets and airfoils. The surface is defined by its equivalent wing afterwards.
    ///
    /// # Arguments
    ///
    /// * `criterion`: the three dimensions to impose
    ///
    /// returns: Result<&SurfaceGeometry, GeometryError>
    pub fn adjust_dimensions(&mut self, criterion: AdjustCriterion) -> Result<&SurfaceGeometry> {
        let target = criterion.resolve()?;
        if self.equivalent.is_none() {
            self.compute_equivalent_wing()?;
        }
        let base = self.equivalent_wing()?;
        let p = base.panel();
        let (area, aspect_ratio) = target.two_sided(self.mirrored);
        let params = EquivalentWingParams {
            area: square_meters(area),
            aspect_ratio,
            taper_ratio: target.taper_ratio(),
            kink_eta: base.kink_eta(),
            sweep: ReferenceSweep::LeadingEdge(radians(p.params().sweep_le)),
            twist_tip: radians(p.params().twist_tip),
            dihedral: radians(p.params().dihedral),
            x_offset_le_ratio: base.x_offset_le_ratio(),
            x_offset_te_ratio: base.x_offset_te_ratio(),
            airfoil_root: p.airfoil_root().cloned(),
            airfoil_kink: base.airfoil_kink().cloned(),
            airfoil_tip: p.airfoil_tip().cloned(),
        };

        let equivalent = EquivalentWing::from_params(&params)?;
        self.panels = equivalent.reconstruct()?;
        self.definition = Definition::Equivalent;
        self.equivalent = Some(equivalent);
        self.geometry = None;
        debug!(
            surface = %self.id,
            span_m = target.span,
            area_m2 = target.area,
            ?criterion,
            "adjusted surface dimensions"
        );
        self.compute_geometry(self.stations)
    }

    /// Rebuild all derived geometry from the panel chain, using `n` uniform spanwise stations in
    /// addition to the breakpoints. When the surface is defined by its panels the equivalent wing
    /// is derived again as part of the pipeline.
    ///
    /// # Arguments
    ///
    /// * `n`: the number of uniform stations over the normalized span
    ///
    /// returns: Result<&SurfaceGeometry, GeometryError>
    pub fn compute_geometry(&mut self, n: usize) -> Result<&SurfaceGeometry> {
        let _span = debug_span!("compute_geometry", surface = %self.id, stations = n).entered();
        if self.panels.is_empty() {
            return Err(GeometryError::NoPanels);
        }

        let breakpoints = Breakpoints::from_panels(&self.panels)?;
        let semi_span = breakpoints.semi_span();
        let both_halves: f64 = self.panels.iter().map(|p| p.geometry().planform_area).sum();
        let (span, planform_area) = if self.mirrored {
            (2.0 * semi_span, both_halves)
        } else {
            (semi_span, both_halves / 2.0)
        };
        if planform_area <= 0.0 {
            return Err(GeometryError::degenerate("surface planform area is not positive"));
        }

        let discretization = Discretization::new(&self.panels, &breakpoints, n)?;
        let mac = MeanAerodynamicChord::from_discretization(
            &discretization,
            planform_area,
            self.mirrored,
        )?;
        let top_view = TopView::from_stations(discretization.stations());

        let first = &self.panels[0];
        let last = &self.panels[self.panels.len() - 1];
        let taper_ratio = last.params().chord_tip / first.params().chord_root;

        if self.definition == Definition::Panels {
            self.equivalent =
                match EquivalentWing::from_actual(&self.panels, &breakpoints, &discretization) {
                    Ok(eq) => Some(eq),
                    Err(e) => {
                        warn!(surface = %self.id, error = %e, "no equivalent wing for surface");
                        None
                    }
                };
        }

        debug!(
            span_m = span,
            area_m2 = planform_area,
            mac_m = mac.chord.value,
            "surface geometry computed"
        );

        self.stations = n;
        Ok(&*self.geometry.insert(SurfaceGeometry {
            semi_span,
            span,
            planform_area,
            wetted_area: 2.0 * planform_area,
            aspect_ratio: span * span / planform_area,
            taper_ratio,
            mac,
            breakpoints,
            discretization,
            top_view,
        }))
    }

    /// Rebuild the geometry with `n` uniform stations and return the resulting station sequence.
    pub fn discretize(&mut self, n: usize) -> Result<&Discretization> {
        Ok(&self.compute_geometry(n)?.discretization)
    }

    /// The cached geometry, rebuilt first if `recompute` is set or nothing is cached.
    pub fn geometry(&mut self, recompute: bool) -> Result<&SurfaceGeometry> {
        if recompute || self.geometry.is_none() {
            self.compute_geometry(self.stations)?;
        }
        self.geometry
            .as_ref()
            .ok_or(GeometryError::NotComputedYet("surface geometry"))
    }

    pub fn semi_span(&mut self, recompute: bool) -> Result<Length> {
        Ok(meters(self.geometry(recompute)?.semi_span))
    }

    pub fn span(&mut self, recompute: bool) -> Result<Length> {
        Ok(meters(self.geometry(recompute)?.span))
    }

    pub fn planform_area(&mut self, recompute: bool) -> Result<Area> {
        Ok(square_meters(self.geometry(recompute)?.planform_area))
    }

    pub fn wetted_area(&mut self, recompute: bool) -> Result<Area> {
        Ok(square_meters(self.geometry(recompute)?.wetted_area))
    }

    pub fn aspect_ratio(&mut self, recompute: bool) -> Result<f64> {
        Ok(self.geometry(recompute)?.aspect_ratio)
    }

    pub fn taper_ratio(&mut self, recompute: bool) -> Result<f64> {
        Ok(self.geometry(recompute)?.taper_ratio)
    }

    pub fn mean_aerodynamic_chord(&mut self, recompute: bool) -> Result<Estimate<Length>> {
        Ok(self.geometry(recompute)?.mac.chord.map(meters))
    }

    /// The leading edge of the MAC as `[x, y, z]`
    pub fn mean_aerodynamic_chord_le(&mut self, recompute: bool) -> Result<[Estimate<Length>; 3]> {
        let mac = self.geometry(recompute)?.mac;
        Ok([mac.x_le.map(meters), mac.y_le.map(meters), mac.z_le.map(meters)])
    }

    pub fn breakpoints(&mut self, recompute: bool) -> Result<&Breakpoints> {
        Ok(&self.geometry(recompute)?.breakpoints)
    }

    pub fn discretized_ys(&mut self) -> Result<Vec<Length>> {
        Ok(self.station_values(|s| s.y)?.into_iter().map(meters).collect())
    }

    pub fn discretized_chords(&mut self) -> Result<Vec<Length>> {
        Ok(self.station_values(|s| s.chord)?.into_iter().map(meters).collect())
    }

    pub fn discretized_x_le(&mut self) -> Result<Vec<Length>> {
        Ok(self.station_values(|s| s.x_le)?.into_iter().map(meters).collect())
    }

    pub fn discretized_z_le(&mut self) -> Result<Vec<Length>> {
        Ok(self.station_values(|s| s.z_le)?.into_iter().map(meters).collect())
    }

    pub fn discretized_twists(&mut self) -> Result<Vec<Angle>> {
        Ok(self.station_values(|s| s.twist)?.into_iter().map(radians).collect())
    }

    fn station_values(&mut self, f: impl Fn(&Station) -> f64) -> Result<Vec<f64>> {
        Ok(self.geometry(false)?.discretization.stations().map(f).collect())
    }

    pub fn top_view(&mut self) -> Result<&TopView> {
        Ok(&self.geometry(false)?.top_view)
    }

    /// The equivalent wing, which exists once the geometry has been computed for a surface defined
    /// by panels, or from the start for a surface built from an equivalent wing.
    pub fn equivalent_wing(&self) -> Result<&EquivalentWing> {
        self.equivalent
            .as_ref()
            .ok_or(GeometryError::NotComputedYet("equivalent wing"))
    }

    /// Derive the equivalent wing from the current panel chain, replacing any existing one.
    pub fn compute_equivalent_wing(&mut self) -> Result<&EquivalentWing> {
        self.geometry(false)?;
        let g = self
            .geometry
            .as_ref()
            .ok_or(GeometryError::NotComputedYet("surface geometry"))?;
        let eq = EquivalentWing::from_actual(&self.panels, &g.breakpoints, &g.discretization)?;
        Ok(&*self.equivalent.insert(eq))
    }

    /// Check that `y` lies on the semispan, snapping values within rounding distance of either end
    fn check_y(&mut self, y: f64) -> Result<f64> {
        let semi_span = self.geometry(false)?.semi_span;
        let slack = BREAKPOINT_TOL * semi_span;
        if (-slack..=semi_span + slack).contains(&y) {
            Ok(y.clamp(0.0, semi_span))
        } else {
            Err(GeometryError::OutOfRange {
                value: y,
                min: 0.0,
                max: semi_span,
            })
        }
    }

    fn interpolate_at(&mut self, y: Length, f: impl Fn(&Station) -> f64) -> Result<f64> {
        let y = self.check_y(in_meters(y))?;
        let d = &self.geometry(false)?.discretization;
        let ys = d.ys();
        let values = d.stations().map(f).collect::<Vec<_>>();
        interpolate_linear(&ys, &values, y)
    }

    /// The local chord at spanwise position `y`, interpolated over the discretized stations
    pub fn chord_at_y(&mut self, y: Length) -> Result<Length> {
        Ok(meters(self.interpolate_at(y, |s| s.chord)?))
    }

    /// The leading edge X at spanwise position `y`, interpolated over the discretized stations
    pub fn x_le_at_y(&mut self, y: Length) -> Result<Length> {
        Ok(meters(self.interpolate_at(y, |s| s.x_le)?))
    }

    /// The dihedral of the panel which owns spanwise position `y`. A breakpoint belongs to the
    /// panel which ends there.
    pub fn dihedral_at_y(&mut self, y: Length) -> Result<Angle> {
        let y = self.check_y(in_meters(y))?;
        let bp = &self.geometry(false)?.breakpoints;
        let i = bp.y[1..]
            .iter()
            .position(|&tip| y <= tip)
            .unwrap_or(bp.y.len() - 2);
        Ok(radians(self.panels[i].params().dihedral))
    }

    /// The chord of the equivalent trapezoid at spanwise position `y`
    pub fn equivalent_chord_at_y(&mut self, y: Length) -> Result<Length> {
        let y = self.check_y(in_meters(y))?;
        Ok(meters(self.equivalent_wing()?.chord_at(y)))
    }

    /// The arithmetic mean of the panel dihedral angles
    pub fn mean_dihedral(&self) -> Result<Angle> {
        if self.panels.is_empty() {
            return Err(GeometryError::NoPanels);
        }
        let sum = self.panels.iter().map(|p| p.params().dihedral).sum::<f64>();
        Ok(radians(sum / self.panels.len() as f64))
    }

    /// The summed planform area of all control surfaces of one kind
    pub fn control_surface_area(&mut self, kind: ControlSurfaceKind) -> Result<Area> {
        self.control_area_where(|c| c.kind == kind)
    }

    /// The summed planform area of all control surfaces
    pub fn control_surfaces_area(&mut self) -> Result<Area> {
        self.control_area_where(|_| true)
    }

    fn control_area_where(&mut self, keep: impl Fn(&ControlSurface) -> bool) -> Result<Area> {
        let mirrored = self.mirrored;
        let g = self.geometry(false)?;
        let semi_span = g.semi_span;
        let ys = g.discretization.ys();
        let chords = g.discretization.chords();
        let chord_at = |y: f64| interpolate_linear(&ys, &chords, y.clamp(0.0, semi_span));

        let mut total = 0.0;
        for control in self.control_surfaces.iter().filter(|c| keep(c)) {
            total += control.area(&chord_at, semi_span, mirrored)?;
        }
        Ok(square_meters(total))
    }
}

fn check_continuity(previous: &Panel, next: &Panel, index: usize) -> Result<()> {
    let expected = previous.params().chord_tip;
    let found = next.params().chord_root;
    if !nearly_equal(expected, found, CONTINUITY_TOL) {
        return Err(GeometryError::Discontinuous {
            panel: index,
            expected,
            found,
        });
    }
    if previous.airfoil_tip() != next.airfoil_root() {
        warn!(
            panel = index,
            tip = ?previous.airfoil_tip(),
            root = ?next.airfoil_root(),
            "panel root airfoil differs from the previous tip airfoil"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::units::{degrees, in_degrees, in_square_meters};
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn cranked() -> Surface {
        let mut s = Surface::new("wing");
        s.add_panel(
            PanelBuilder::new("inner")
                .chords(meters(2.5759), meters(2.5759))
                .semi_span(meters(4.7))
                .dihedral(degrees(0.0))
                .build()
                .unwrap(),
        )
        .unwrap();
        s.add_linked_panel(
            PanelBuilder::new("outer")
                .chord_tip(meters(1.5906))
                .semi_span(meters(4.13))
                .sweep_le(degrees(4.3)),
        )
        .unwrap();
        s
    }

    fn single(cr: f64, ct: f64, s: f64) -> Surface {
        Surface::with_panels(
            "single",
            vec![
                PanelBuilder::new("p")
                    .chords(meters(cr), meters(ct))
                    .semi_span(meters(s))
                    .build()
                    .unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn scenario_two_panel_wing() {
        let mut s = cranked();
        let ys = s.discretized_ys().unwrap();
        let chords = s.discretized_chords().unwrap();
        let kink = ys
            .iter()
            .enumerate()
            .filter(|(_, y)| (in_meters(**y) - 4.7).abs() < 1e-9)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        assert_eq!(kink.len(), 1);
        assert_relative_eq!(in_meters(chords[kink[0]]), 2.5759, epsilon = 1e-12);
        assert_relative_eq!(in_meters(s.semi_span(false).unwrap()), 8.83, epsilon = 1e-12);
        assert_relative_eq!(in_meters(s.span(false).unwrap()), 17.66, epsilon = 1e-12);
    }

    #[test]
    fn aspect_ratio_is_span_squared_over_area() {
        let mut s = cranked();
        let g = s.geometry(true).unwrap();
        assert_eq!(g.aspect_ratio, g.span * g.span / g.planform_area);
        assert_eq!(g.wetted_area, 2.0 * g.planform_area);
    }

    #[test]
    fn breakpoint_lists_have_one_more_entry_than_panels() {
        let mut s = cranked();
        let semi = in_meters(s.semi_span(true).unwrap());
        let bp = s.breakpoints(false).unwrap();
        assert_eq!(bp.len(), 3);
        assert_eq!(bp.y[0], 0.0);
        assert_eq!(bp.y[2], semi);
    }

    #[test]
    fn discretize_is_idempotent() {
        let mut s = cranked();
        let a = s.discretize(15).unwrap().clone();
        let b = s.discretize(15).unwrap().clone();
        assert_eq!(a, b);
        let bits = |d: &Discretization| d.ys().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(7)]
    #[test_case(15)]
    #[test_case(64)]
    fn breakpoints_are_preserved(n: usize) {
        let mut s = cranked();
        let d = s.discretize(n).unwrap().clone();
        let bp = s.breakpoints(false).unwrap();
        let ys = d.ys();
        for y in bp.y.iter() {
            assert_eq!(ys.iter().filter(|v| *v == y).count(), 1);
        }
    }

    #[test]
    fn rectangular_mac_is_chord() {
        let mut s = single(1.5, 1.5, 6.0);
        let mac = s.mean_aerodynamic_chord(true).unwrap();
        assert_relative_eq!(in_meters(mac.value), 1.5, epsilon = 1e-12);
        assert_eq!(mac.tol, INTEGRATION_TOL);
    }

    #[test]
    fn trapezoid_mac_matches_closed_form() {
        let mut s = single(2.0, 1.0, 5.0);
        let mac = s.mean_aerodynamic_chord(false).unwrap();
        assert_relative_eq!(in_meters(mac.value), 14.0 / 9.0, epsilon = 1e-3);
        let [_, y, _] = s.mean_aerodynamic_chord_le(false).unwrap();
        assert_relative_eq!(in_meters(y.value), 5.0 / 3.0 * 2.0 / 1.5, epsilon = 1e-3);
    }

    #[test]
    fn non_mirrored_surface_counts_one_side() {
        let mut fin = single(2.0, 1.0, 3.0);
        fin.set_mirrored(false);
        assert_relative_eq!(in_meters(fin.span(false).unwrap()), 3.0, epsilon = 1e-12);
        assert_relative_eq!(
            in_square_meters(fin.planform_area(false).unwrap()),
            4.5,
            epsilon = 1e-12
        );
        assert_relative_eq!(fin.aspect_ratio(false).unwrap(), 2.0, epsilon = 1e-12);
        let mac = fin.mean_aerodynamic_chord(false).unwrap();
        assert_relative_eq!(in_meters(mac.value), 14.0 / 9.0, epsilon = 1e-3);
    }

    #[test]
    fn taper_ratio_spans_whole_chain() {
        let mut s = cranked();
        assert_relative_eq!(s.taper_ratio(false).unwrap(), 1.5906 / 2.5759, epsilon = 1e-12);
    }

    #[test]
    fn top_view_area_is_half_planform() {
        let mut s = cranked();
        let stations = s.discretize(15).unwrap().len();
        let area = in_square_meters(s.planform_area(false).unwrap());
        let tv = s.top_view().unwrap();
        assert_eq!(tv.len(), 2 * stations);
        assert_relative_eq!(tv.area(), area / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn discontinuous_panel_is_rejected() {
        let mut s = cranked();
        let r = s.add_panel(
            PanelBuilder::new("bad")
                .chords(meters(1.0), meters(0.5))
                .semi_span(meters(1.0))
                .build()
                .unwrap(),
        );
        assert!(matches!(r, Err(GeometryError::Discontinuous { panel: 2, .. })));
        assert_eq!(s.panel_count(), 2);
    }

    #[test]
    fn linked_panel_takes_previous_tip() {
        let s = cranked();
        let outer = s.panel(PanelId(1)).unwrap();
        assert_relative_eq!(in_meters(outer.chord_root()), 2.5759, epsilon = 1e-12);
        assert!(s.panel(PanelId(2)).is_err());
    }

    #[test]
    fn linked_panel_needs_a_previous_panel() {
        let mut s = Surface::new("empty");
        let r = s.add_linked_panel(PanelBuilder::new("p").chord_tip(meters(1.0)));
        assert!(matches!(r, Err(GeometryError::NoPanels)));
        assert!(matches!(s.geometry(false), Err(GeometryError::NoPanels)));
    }

    #[test]
    fn modify_panel_checks_neighbors() {
        let mut s = cranked();
        let r = s.modify_panel(PanelId(0), |p| p.chord_tip = 2.0);
        assert!(matches!(r, Err(GeometryError::Discontinuous { .. })));
        s.modify_panel(PanelId(1), |p| p.chord_tip = 1.2).unwrap();
        assert_relative_eq!(s.taper_ratio(false).unwrap(), 1.2 / 2.5759, epsilon = 1e-12);
    }

    #[test]
    fn equivalent_wing_requires_computation() {
        let mut s = cranked();
        assert!(matches!(
            s.equivalent_wing(),
            Err(GeometryError::NotComputedYet(_))
        ));
        s.compute_geometry(15).unwrap();
        let eq = s.equivalent_wing().unwrap();
        assert_relative_eq!(in_meters(eq.panel().chord_tip()), 1.5906, epsilon = 1e-12);

        // Any mutation drops the derived state
        s.set_mirrored(false);
        s.modify_panel(PanelId(1), |p| p.twist_tip = -0.05).unwrap();
        assert!(s.equivalent_wing().is_err());
        assert!(s.compute_equivalent_wing().is_ok());
    }

    #[test]
    fn surface_from_equivalent_wing_keeps_it() {
        let params = EquivalentWingParams {
            area: square_meters(40.0),
            aspect_ratio: 8.0,
            taper_ratio: 0.4,
            kink_eta: 0.4,
            sweep: ReferenceSweep::LeadingEdge(degrees(20.0)),
            twist_tip: degrees(-3.0),
            dihedral: degrees(4.0),
            x_offset_le_ratio: 0.0,
            x_offset_te_ratio: 0.15,
            airfoil_root: None,
            airfoil_kink: None,
            airfoil_tip: None,
        };
        let eq = EquivalentWing::from_params(&params).unwrap();
        let mut s = Surface::from_equivalent_wing("wing", eq).unwrap();
        assert_eq!(s.definition(), Definition::Equivalent);
        assert_eq!(s.panel_count(), 2);

        s.compute_geometry(21).unwrap();
        let eq = s.equivalent_wing().unwrap();
        assert_relative_eq!(eq.x_offset_te_ratio(), 0.15);
        assert_relative_eq!(in_degrees(s.mean_dihedral().unwrap()), 4.0, epsilon = 1e-9);
        // Dihedral projects the 40 m^2 onto a slightly smaller span
        let span = in_meters(s.span(false).unwrap());
        assert_relative_eq!(span, (320f64).sqrt() * 4f64.to_radians().cos(), epsilon = 1e-9);
    }

    #[test]
    fn queries_along_span() {
        let mut s = cranked();
        let c = s.chord_at_y(meters(4.7 + 4.13 / 2.0)).unwrap();
        assert_relative_eq!(in_meters(c), (2.5759 + 1.5906) / 2.0, epsilon = 1e-9);
        let x = s.x_le_at_y(meters(2.0)).unwrap();
        assert_relative_eq!(in_meters(x), 0.0, epsilon = 1e-12);
        assert_relative_eq!(in_degrees(s.dihedral_at_y(meters(8.83)).unwrap()), 0.0);
        assert!(matches!(
            s.chord_at_y(meters(9.5)),
            Err(GeometryError::OutOfRange { .. })
        ));
        assert!(s.chord_at_y(meters(-0.1)).is_err());

        s.compute_geometry(15).unwrap();
        let ce = s.equivalent_chord_at_y(meters(8.83)).unwrap();
        assert_relative_eq!(in_meters(ce), 1.5906, epsilon = 1e-9);
    }

    #[test]
    fn dihedral_belongs_to_the_panel_ending_at_a_breakpoint() {
        let mut s = Surface::new("w");
        s.add_panel(
            PanelBuilder::new("a")
                .chords(meters(2.0), meters(2.0))
                .semi_span(meters(3.0))
                .dihedral(degrees(2.0))
                .build()
                .unwrap(),
        )
        .unwrap();
        s.add_linked_panel(
            PanelBuilder::new("b")
                .chord_tip(meters(1.0))
                .semi_span(meters(3.0))
                .dihedral(degrees(6.0)),
        )
        .unwrap();
        let kink = s.breakpoints(true).unwrap().y[1];
        let at_kink = s.dihedral_at_y(meters(kink)).unwrap();
        assert_relative_eq!(in_degrees(at_kink), 2.0, epsilon = 1e-9);
        let past_kink = s.dihedral_at_y(meters(kink + 0.1)).unwrap();
        assert_relative_eq!(in_degrees(past_kink), 6.0, epsilon = 1e-9);
        assert_relative_eq!(in_degrees(s.mean_dihedral().unwrap()), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn control_surface_areas() {
        let mut s = single(2.0, 2.0, 10.0);
        let flap = ControlSurface {
            id: "flap".into(),
            kind: ControlSurfaceKind::SymmetricFlap,
            inner_eta: 0.1,
            outer_eta: 0.6,
            inner_chord_ratio: 0.25,
            outer_chord_ratio: 0.25,
            min_deflection: degrees(0.0),
            max_deflection: degrees(40.0),
        };
        let slat = ControlSurface {
            id: "slat".into(),
            kind: ControlSurfaceKind::Slat,
            inner_eta: 0.2,
            outer_eta: 0.9,
            inner_chord_ratio: 0.1,
            outer_chord_ratio: 0.1,
            min_deflection: degrees(0.0),
            max_deflection: degrees(25.0),
        };
        s.add_control_surface(flap).unwrap();
        s.add_control_surface(slat).unwrap();

        let area_of =
            |s: &mut Surface, kind| in_square_meters(s.control_surface_area(kind).unwrap());
        let flaps = area_of(&mut s, ControlSurfaceKind::SymmetricFlap);
        assert_relative_eq!(flaps, 2.0 * 0.25 * 2.0 * 0.5 * 10.0, epsilon = 1e-9);
        assert_eq!(area_of(&mut s, ControlSurfaceKind::Spoiler), 0.0);
        let total = in_square_meters(s.control_surfaces_area().unwrap());
        assert_relative_eq!(total, flaps + 2.0 * 0.1 * 2.0 * 0.7 * 10.0, epsilon = 1e-9);
    }

    #[test]
    fn discretized_distributions_follow_the_panel() {
        let mut s = Surface::with_panels(
            "w",
            vec![
                PanelBuilder::new("p")
                    .chords(meters(2.0), meters(1.0))
                    .semi_span(meters(4.0))
                    .sweep_le(degrees(10.0))
                    .dihedral(degrees(5.0))
                    .twist_tip(degrees(-2.0))
                    .build()
                    .unwrap(),
            ],
        )
        .unwrap();
        s.compute_geometry(5).unwrap();
        let ys = s.discretized_ys().unwrap();
        let x_le = s.discretized_x_le().unwrap();
        let z_le = s.discretized_z_le().unwrap();
        let twists = s.discretized_twists().unwrap();
        assert_eq!(ys.len(), 5);
        assert_eq!(x_le.len(), 5);
        assert_eq!(z_le.len(), 5);
        assert_eq!(twists.len(), 5);

        let tan_sweep = 10f64.to_radians().tan();
        let tan_dihedral = 5f64.to_radians().tan();
        for i in 0..5 {
            let y = in_meters(ys[i]);
            assert_relative_eq!(in_meters(x_le[i]), y * tan_sweep, epsilon = 1e-12);
            assert_relative_eq!(in_meters(z_le[i]), y * tan_dihedral, epsilon = 1e-12);
        }
        assert_eq!(in_degrees(twists[0]), 0.0);
        assert_relative_eq!(in_degrees(twists[4]), -2.0, epsilon = 1e-12);
        assert_relative_eq!(in_degrees(twists[2]), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn adjust_single_panel_to_aspect_ratio_span_and_taper() {
        let mut s = Surface::with_panels(
            "w",
            vec![
                PanelBuilder::new("p")
                    .chords(meters(2.0), meters(1.0))
                    .semi_span(meters(5.0))
                    .sweep_le(degrees(10.0))
                    .build()
                    .unwrap(),
            ],
        )
        .unwrap();
        let criterion = AdjustCriterion::AspectRatioSpanTaper {
            aspect_ratio: 8.0,
            span: meters(16.0),
            taper_ratio: 0.4,
        };
        let g = s.adjust_dimensions(criterion).unwrap();
        assert_relative_eq!(g.span, 16.0, epsilon = 1e-9);
        assert_relative_eq!(g.planform_area, 32.0, epsilon = 1e-9);
        assert_relative_eq!(g.aspect_ratio, 8.0, epsilon = 1e-9);

        assert_eq!(s.definition(), Definition::Equivalent);
        assert_eq!(s.panel_count(), 1);
        let p = &s.panels()[0];
        assert_relative_eq!(in_meters(p.chord_root()), 20.0 / 7.0, epsilon = 1e-9);
        assert_relative_eq!(in_meters(p.chord_tip()), 8.0 / 7.0, epsilon = 1e-9);
        assert_relative_eq!(in_degrees(p.sweep_le()), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn adjust_cranked_wing_keeps_the_kink() {
        let mut s = cranked();
        let kink = 4.7 / 8.83;
        let criterion = AdjustCriterion::SpanAreaTaper {
            span: meters(20.0),
            area: square_meters(40.0),
            taper_ratio: 0.5,
        };
        s.adjust_dimensions(criterion).unwrap();
        assert_eq!(s.panel_count(), 2);
        assert_relative_eq!(in_meters(s.span(false).unwrap()), 20.0, epsilon = 1e-9);
        assert_relative_eq!(
            in_square_meters(s.planform_area(false).unwrap()),
            40.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(s.breakpoints(false).unwrap().eta[1], kink, epsilon = 1e-9);

        let eq = s.equivalent_wing().unwrap();
        assert_relative_eq!(eq.panel().taper_ratio(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(in_meters(eq.panel().chord_root()), 8.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(in_meters(s.panels()[1].chord_tip()), 4.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn adjust_one_sided_surface() {
        let mut fin = single(2.0, 1.0, 3.0);
        fin.set_mirrored(false);
        let criterion = AdjustCriterion::SpanAreaTaper {
            span: meters(5.0),
            area: square_meters(10.0),
            taper_ratio: 0.5,
        };
        let g = fin.adjust_dimensions(criterion).unwrap();
        assert_relative_eq!(g.span, 5.0, epsilon = 1e-9);
        assert_relative_eq!(g.planform_area, 10.0, epsilon = 1e-9);
        assert_relative_eq!(in_meters(fin.panels()[0].chord_root()), 8.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn failed_adjustment_leaves_surface_unchanged() {
        let mut s = cranked();
        let params = |s: &Surface| s.panels().iter().map(|p| *p.params()).collect::<Vec<_>>();
        let before = params(&s);
        let criterion = AdjustCriterion::AreaChords {
            area: square_meters(40.0),
            chord_root: meters(-1.0),
            chord_tip: meters(1.0),
        };
        let r = s.adjust_dimensions(criterion);
        assert!(matches!(r, Err(GeometryError::DegenerateGeometry(_))));
        assert_eq!(s.definition(), Definition::Panels);
        assert_eq!(params(&s), before);
    }
}
