//! Spanwise discretization of a panel chain. The station grid is the union of a uniform grid over
//! the normalized span and the breakpoint stations, so that every panel boundary is sampled
//! exactly. Each station is claimed by exactly one panel and its distributions are interpolated
//! linearly within that panel.

use super::{Breakpoints, Panel, PanelId};
use crate::Result;
use crate::common::{DiscreteDomain, linear_space, nearly_equal};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Normalized stations closer than this to a breakpoint station are merged into the breakpoint
pub const BREAKPOINT_TOL: f64 = 1.0e-9;

/// Relative tolerance within which a panel root must reproduce the previous panel tip
pub const BOUNDARY_TOL: f64 = 1.0e-9;

/// The sampled surface distributions at one spanwise station. Positions are in metres and twist
/// is in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub y: f64,
    pub chord: f64,
    pub x_le: f64,
    pub z_le: f64,
    pub twist: f64,
}

impl Station {
    /// The X coordinate of the trailing edge at this station
    pub fn x_te(&self) -> f64 {
        self.x_le + self.chord
    }
}

/// The stations claimed by a single panel, together with the panel's root station evaluated from
/// its own interpolation formulas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelStations {
    pub panel: PanelId,
    pub root: Station,
    pub stations: Vec<Station>,
}

impl PanelStations {
    /// The stations spanning the whole panel, from its root to its tip. For every panel but the
    /// first the root station is owned by the panel before it, so it is prepended here.
    pub fn segment(&self) -> Vec<Station> {
        match self.stations.first() {
            Some(s) if s.y <= self.root.y => self.stations.clone(),
            _ => std::iter::once(self.root)
                .chain(self.stations.iter().copied())
                .collect(),
        }
    }
}

/// The complete spanwise station sequence of a surface, grouped by owning panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discretization {
    etas: DiscreteDomain,
    panels: Vec<PanelStations>,
    mismatched_boundaries: Vec<usize>,
}

impl Discretization {
    /// Build the station grid for a panel chain.
    ///
    /// # Arguments
    ///
    /// * `panels`: the ordered panel chain the breakpoints were computed from
    /// * `breakpoints`: the breakpoints of the panel chain
    /// * `n`: the number of uniform stations over the normalized span
    ///
    /// returns: Result<Discretization, GeometryError>
    pub fn new(panels: &[Panel], breakpoints: &Breakpoints, n: usize) -> Result<Self> {
        let semi_span = breakpoints.semi_span();
        let etas = linear_space(0.0, 1.0, n).merged_with(&breakpoints.eta, BREAKPOINT_TOL)?;

        let ys = etas
            .values()
            .iter()
            .map(|&eta| {
                breakpoints
                    .eta
                    .iter()
                    .position(|&e| (e - eta).abs() <= BREAKPOINT_TOL)
                    .map_or(eta * semi_span, |j| breakpoints.y[j])
            })
            .collect::<Vec<_>>();

        let mut result = Vec::with_capacity(panels.len());
        let mut mismatched_boundaries = Vec::new();

        for (i, panel) in panels.iter().enumerate() {
            let y0 = breakpoints.y[i];
            let y1 = breakpoints.y[i + 1];
            let stations = ys
                .iter()
                .filter(|&&y| (i == 0 || y > y0) && y <= y1)
                .map(|&y| interpolate_in_panel(panel, breakpoints, i, y))
                .collect::<Vec<_>>();
            let root = interpolate_in_panel(panel, breakpoints, i, y0);

            if let Some(previous_tip) = result
                .last()
                .and_then(|p: &PanelStations| p.stations.last())
            {
                if !stations_agree(previous_tip, &root) {
                    warn!(
                        panel = i,
                        y_m = y0,
                        tip_chord_m = previous_tip.chord,
                        root_chord_m = root.chord,
                        "panel root does not match the tip of the panel before it"
                    );
                    mismatched_boundaries.push(i);
                }
            }

            result.push(PanelStations {
                panel: PanelId(i),
                root,
                stations,
            });
        }

        debug!(
            uniform = n,
            stations = ys.len(),
            panels = panels.len(),
            "discretized surface"
        );

        Ok(Self {
            etas,
            panels: result,
            mismatched_boundaries,
        })
    }

    /// The normalized station values, sorted and de-duplicated
    pub fn etas(&self) -> &[f64] {
        self.etas.values()
    }

    pub fn panels(&self) -> &[PanelStations] {
        &self.panels
    }

    /// Indices of the panels whose recomputed root disagreed with the previous panel's tip
    pub fn mismatched_boundaries(&self) -> &[usize] {
        &self.mismatched_boundaries
    }

    /// All stations in increasing spanwise order
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.panels.iter().flat_map(|p| p.stations.iter())
    }

    pub fn len(&self) -> usize {
        self.panels.iter().map(|p| p.stations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ys(&self) -> Vec<f64> {
        self.stations().map(|s| s.y).collect()
    }

    pub fn chords(&self) -> Vec<f64> {
        self.stations().map(|s| s.chord).collect()
    }

    pub fn x_le(&self) -> Vec<f64> {
        self.stations().map(|s| s.x_le).collect()
    }

    pub fn z_le(&self) -> Vec<f64> {
        self.stations().map(|s| s.z_le).collect()
    }

    pub fn twists(&self) -> Vec<f64> {
        self.stations().map(|s| s.twist).collect()
    }
}

fn interpolate_in_panel(panel: &Panel, bp: &Breakpoints, i: usize, y: f64) -> Station {
    let p = panel.params();
    let y0 = bp.y[i];
    let width = bp.y[i + 1] - y0;
    let dy = y - y0;
    let f = if width > 0.0 { dy / width } else { 0.0 };

    Station {
        y,
        chord: p.chord_root + f * (p.chord_tip - p.chord_root),
        x_le: bp.x_le[i] + dy * p.sweep_le.tan(),
        z_le: bp.z_le[i] + dy * p.dihedral.tan(),
        twist: bp.twist[i] + f * (p.twist_tip - bp.twist[i]),
    }
}

fn stations_agree(a: &Station, b: &Station) -> bool {
    nearly_equal(a.y, b.y, BOUNDARY_TOL)
        && nearly_equal(a.chord, b.chord, BOUNDARY_TOL)
        && nearly_equal(a.x_le, b.x_le, BOUNDARY_TOL)
        && nearly_equal(a.z_le, b.z_le, BOUNDARY_TOL)
        && nearly_equal(a.twist, b.twist, BOUNDARY_TOL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PanelBuilder;
    use crate::common::units::{degrees, meters};
    use approx::assert_relative_eq;
    use rand::Rng;
    use test_case::test_case;

    fn cranked() -> Vec<Panel> {
        vec![
            PanelBuilder::new("inner")
                .chords(meters(2.5759), meters(2.5759))
                .semi_span(meters(4.7))
                .build()
                .unwrap(),
            PanelBuilder::new("outer")
                .chords(meters(2.5759), meters(1.5906))
                .semi_span(meters(4.13))
                .sweep_le(degrees(4.3))
                .build()
                .unwrap(),
        ]
    }

    fn discretize(panels: &[Panel], n: usize) -> Discretization {
        let bp = Breakpoints::from_panels(panels).unwrap();
        Discretization::new(panels, &bp, n).unwrap()
    }

    #[test]
    fn kink_station_present_once_with_matching_chord() {
        let panels = cranked();
        let d = discretize(&panels, 15);
        let ys = d.ys();
        let at_kink = ys.iter().filter(|y| (*y - 4.7).abs() < 1e-9).count();
        assert_eq!(at_kink, 1);

        // The inner panel owns the kink, the outer panel recomputes it as its root
        let tip = d.panels()[0].stations.last().unwrap();
        assert_relative_eq!(tip.y, 4.7, epsilon = 1e-12);
        assert_relative_eq!(tip.chord, 2.5759, epsilon = 1e-12);
        assert_relative_eq!(d.panels()[1].root.chord, 2.5759, epsilon = 1e-12);
        assert!(d.mismatched_boundaries().is_empty());
    }

    #[test]
    fn stations_are_sorted_and_unique() {
        let d = discretize(&cranked(), 15);
        let ys = d.ys();
        assert!(ys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ys.len(), d.etas().len());
        assert_eq!(ys[0], 0.0);
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(2)]
    #[test_case(3)]
    #[test_case(15)]
    #[test_case(101)]
    fn every_breakpoint_appears_exactly_once(n: usize) {
        let panels = cranked();
        let bp = Breakpoints::from_panels(&panels).unwrap();
        let d = Discretization::new(&panels, &bp, n).unwrap();
        let ys = d.ys();
        for y in bp.y.iter() {
            assert_eq!(ys.iter().filter(|v| *v == y).count(), 1, "breakpoint {y}");
        }
    }

    #[test]
    fn random_chains_keep_breakpoints() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let count = rng.random_range(1..6);
            let mut chord = rng.random_range(1.0..5.0);
            let mut panels = Vec::new();
            for i in 0..count {
                let tip = chord * rng.random_range(0.3..1.0);
                panels.push(
                    PanelBuilder::new(format!("p{i}"))
                        .chords(meters(chord), meters(tip))
                        .semi_span(meters(rng.random_range(0.2..6.0)))
                        .sweep_le(degrees(rng.random_range(-10.0..40.0)))
                        .dihedral(degrees(rng.random_range(-5.0..10.0)))
                        .build()
                        .unwrap(),
                );
                chord = tip;
            }
            let n = rng.random_range(0..60);
            let bp = Breakpoints::from_panels(&panels).unwrap();
            let d = Discretization::new(&panels, &bp, n).unwrap();
            let ys = d.ys();
            assert!(ys.windows(2).all(|w| w[0] < w[1]));
            for y in bp.y.iter() {
                assert_eq!(ys.iter().filter(|v| *v == y).count(), 1);
            }
            assert!(d.mismatched_boundaries().is_empty());
        }
    }

    #[test]
    fn repeated_discretization_is_identical() {
        let panels = cranked();
        let a = discretize(&panels, 15);
        let b = discretize(&panels, 15);
        assert_eq!(a, b);
    }

    #[test]
    fn interpolates_along_panels() {
        let panels = cranked();
        let d = discretize(&panels, 3);
        // Stations are 0, 4.7 (kink), 4.415 (eta 0.5) and 8.83
        let mid = d
            .stations()
            .find(|s| (s.y - 0.5 * 8.83).abs() < 1e-9)
            .copied()
            .unwrap();
        assert_relative_eq!(mid.chord, 2.5759, epsilon = 1e-12);

        let tip = d.stations().last().copied().unwrap();
        assert_relative_eq!(tip.chord, 1.5906, epsilon = 1e-12);
        assert_relative_eq!(tip.x_le, 4.13 * 4.3f64.to_radians().tan(), epsilon = 1e-9);
        assert_relative_eq!(tip.x_te(), tip.x_le + 1.5906, epsilon = 1e-12);
    }

    #[test]
    fn segment_prepends_root_for_outer_panels() {
        let d = discretize(&cranked(), 5);
        let inner = d.panels()[0].segment();
        let outer = d.panels()[1].segment();
        assert_eq!(inner.len(), d.panels()[0].stations.len());
        assert_eq!(outer.len(), d.panels()[1].stations.len() + 1);
        assert_relative_eq!(outer[0].y, 4.7, epsilon = 1e-12);
    }

    #[test]
    fn discontinuous_chord_is_reported_not_fatal() {
        let panels = vec![
            PanelBuilder::new("a")
                .chords(meters(2.0), meters(2.0))
                .semi_span(meters(2.0))
                .build()
                .unwrap(),
            PanelBuilder::new("b")
                .chords(meters(1.0), meters(1.0))
                .semi_span(meters(2.0))
                .build()
                .unwrap(),
        ];
        let d = discretize(&panels, 5);
        assert_eq!(d.mismatched_boundaries(), &[1]);
    }

    #[test]
    fn small_root_mismatch_is_reported() {
        // Close enough to pass the insertion continuity check, but not the boundary check
        let tip = 2.0;
        let panels = vec![
            PanelBuilder::new("a")
                .chords(meters(3.0), meters(tip))
                .semi_span(meters(2.0))
                .build()
                .unwrap(),
            PanelBuilder::new("b")
                .chords(meters(tip * (1.0 + 1e-7)), meters(1.0))
                .semi_span(meters(2.0))
                .build()
                .unwrap(),
        ];
        let d = discretize(&panels, 5);
        assert_eq!(d.mismatched_boundaries(), &[1]);
    }
}
