//! The equivalent wing: a single trapezoidal panel that carries the same area, span, tip chord and
//! tip leading edge as a multi-panel surface. There are two transforms. One derives the equivalent
//! wing from the integrals of an actual panel chain, the other builds a cranked two-panel chain
//! from equivalent-wing parameters. A two-panel chain survives a reduction followed by a rebuild.

use super::integrated::integrate_stations;
use super::{AirfoilRef, BREAKPOINT_TOL, Breakpoints, Discretization, Panel, PanelParams};
use crate::Result;
use crate::common::units::{in_radians, in_square_meters};
use crate::errors::GeometryError;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uom::si::f64::{Angle, Area};

/// The sweep angle that an equivalent wing is specified with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReferenceSweep {
    LeadingEdge(Angle),
    QuarterChord(Angle),
}

impl ReferenceSweep {
    /// The tangent of the leading edge sweep of a trapezoid with the given aspect ratio and taper
    fn tan_le(&self, aspect_ratio: f64, taper_ratio: f64) -> f64 {
        match self {
            ReferenceSweep::LeadingEdge(a) => in_radians(*a).tan(),
            ReferenceSweep::QuarterChord(a) => {
                in_radians(*a).tan()
                    + (1.0 / aspect_ratio) * (1.0 - taper_ratio) / (1.0 + taper_ratio)
            }
        }
    }
}

/// The parameters which define a surface through its equivalent wing.
#[derive(Debug, Clone)]
pub struct EquivalentWingParams {
    /// Planform area of both halves
    pub area: Area,
    pub aspect_ratio: f64,
    pub taper_ratio: f64,

    /// Normalized spanwise station of the crank, in (0, 1]. A value of 1 describes a simply
    /// tapered wing.
    pub kink_eta: f64,
    pub sweep: ReferenceSweep,
    pub twist_tip: Angle,
    pub dihedral: Angle,

    /// Root leading edge extension forward of the linear trapezoid, as a fraction of its root
    /// chord
    pub x_offset_le_ratio: f64,

    /// Root trailing edge extension aft of the linear trapezoid, as a fraction of its root chord
    pub x_offset_te_ratio: f64,
    pub airfoil_root: Option<AirfoilRef>,
    pub airfoil_kink: Option<AirfoilRef>,
    pub airfoil_tip: Option<AirfoilRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquivalentWing {
    panel: Panel,
    kink_eta: f64,
    x_offset_le_ratio: f64,
    x_offset_te_ratio: f64,
    airfoil_kink: Option<AirfoilRef>,
}

impl EquivalentWing {
    /// Reduce an actual panel chain to its equivalent wing using the leading and trailing edge
    /// integrals over the discretized stations.
    ///
    /// # Arguments
    ///
    /// * `panels`: the ordered panel chain
    /// * `breakpoints`: the breakpoints of the chain
    /// * `discretization`: the spanwise stations of the chain
    ///
    /// returns: Result<EquivalentWing, GeometryError>
    pub fn from_actual(
        panels: &[Panel],
        breakpoints: &Breakpoints,
        discretization: &Discretization,
    ) -> Result<Self> {
        let (Some(first), Some(last)) = (panels.first(), panels.last()) else {
            return Err(GeometryError::NoPanels);
        };
        let s = breakpoints.semi_span();
        let x_tip = breakpoints.x_le_tip();
        let chord_root = first.params().chord_root;
        let chord_tip = last.params().chord_tip;

        let int_le = integrate_stations(discretization, |st| st.x_le)?;
        let int_te = integrate_stations(discretization, |st| st.x_te())?;

        let x_offset_le = 2.0 * int_le / s - x_tip;
        let x_offset_te = chord_root + x_tip + chord_tip - 2.0 * int_te / s;
        let chord_root_eq = chord_root - x_offset_le - x_offset_te;
        if chord_root_eq <= 0.0 {
            return Err(GeometryError::degenerate(format!(
                "equivalent root chord is not positive ({chord_root_eq} m)"
            )));
        }
        let kink_eta = breakpoints.eta.get(1).copied().unwrap_or(1.0);
        let (x_offset_le_ratio, x_offset_te_ratio) =
            offset_ratios(chord_root, chord_root_eq, x_offset_le, x_offset_te, kink_eta)?;

        let dihedral =
            panels.iter().map(|p| p.params().dihedral).sum::<f64>() / panels.len() as f64;
        let params = PanelParams {
            chord_root: chord_root_eq,
            chord_tip,
            semi_span: s,
            // The equivalent leading edge starts at the root offset, not at the actual root
            sweep_le: ((x_tip - x_offset_le) / s).atan(),
            dihedral,
            twist_tip: last.params().twist_tip,
        };
        let mut panel = Panel::new("equivalent", params)?;
        panel.set_airfoil_root(first.airfoil_root().cloned());
        panel.set_airfoil_tip(last.airfoil_tip().cloned());

        debug!(
            chord_root_m = chord_root_eq,
            x_offset_le_m = x_offset_le,
            x_offset_te_m = x_offset_te,
            kink_eta,
            "derived equivalent wing from panels"
        );

        Ok(Self {
            panel,
            kink_eta,
            x_offset_le_ratio,
            x_offset_te_ratio,
            airfoil_kink: first.airfoil_tip().cloned(),
        })
    }

    /// Build the equivalent trapezoid described by area, aspect ratio and taper ratio.
    ///
    /// # Arguments
    ///
    /// * `params`: the equivalent-wing parameters
    ///
    /// returns: Result<EquivalentWing, GeometryError>
    pub fn from_params(params: &EquivalentWingParams) -> Result<Self> {
        let area = in_square_meters(params.area);
        let ar = params.aspect_ratio;
        let taper = params.taper_ratio;
        let checks = [
            (area, "area"),
            (ar, "aspect ratio"),
            (taper, "taper ratio"),
        ];
        for (value, name) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::degenerate(format!(
                    "equivalent wing {name} must be positive, got {value}"
                )));
            }
        }
        check_kink(params.kink_eta)?;

        let span = (area * ar).sqrt();
        let chord_root = 2.0 * area / (span * (1.0 + taper));
        let panel_params = PanelParams {
            chord_root,
            chord_tip: taper * chord_root,
            semi_span: span / 2.0,
            sweep_le: params.sweep.tan_le(ar, taper).atan(),
            dihedral: in_radians(params.dihedral),
            twist_tip: in_radians(params.twist_tip),
        };
        let mut panel = Panel::new("equivalent", panel_params)?;
        panel.set_airfoil_root(params.airfoil_root.clone());
        panel.set_airfoil_tip(params.airfoil_tip.clone());

        Ok(Self {
            panel,
            kink_eta: params.kink_eta,
            x_offset_le_ratio: params.x_offset_le_ratio,
            x_offset_te_ratio: params.x_offset_te_ratio,
            airfoil_kink: params.airfoil_kink.clone(),
        })
    }

    /// The single trapezoidal panel of the equivalent wing
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn kink_eta(&self) -> f64 {
        self.kink_eta
    }

    pub fn x_offset_le_ratio(&self) -> f64 {
        self.x_offset_le_ratio
    }

    pub fn x_offset_te_ratio(&self) -> f64 {
        self.x_offset_te_ratio
    }

    pub fn airfoil_kink(&self) -> Option<&AirfoilRef> {
        self.airfoil_kink.as_ref()
    }

    /// The chord of the equivalent trapezoid at spanwise position `y`, in metres
    pub fn chord_at(&self, y: f64) -> f64 {
        let p = self.panel.params();
        p.chord_root * (1.0 - (1.0 - self.panel.taper_ratio()) * y / p.semi_span)
    }

    /// Build the cranked panel chain described by this equivalent wing. The inner panel runs from
    /// the root to the kink and the outer panel from the kink to the tip. When the kink sits at
    /// the tip the outer panel has no span and only the inner panel is returned.
    ///
    /// returns: Result<Vec<Panel>, GeometryError>
    pub fn reconstruct(&self) -> Result<Vec<Panel>> {
        let eq = self.panel.params();
        let eta = self.kink_eta;
        check_kink(eta)?;

        let area = self.panel.geometry().planform_area;
        let half_span = eq.semi_span;
        let chord_tip = eq.chord_tip;
        let f_le = self.x_offset_le_ratio;
        let f_te = self.x_offset_te_ratio;
        let simply_tapered = eta >= 1.0;

        let s_in = eta * half_span;
        let s_out = if simply_tapered { 0.0 } else { half_span - s_in };
        let chord_linear = (area - chord_tip * half_span) / ((f_le + f_te) * s_in + half_span);
        let x_le_tip = eq.sweep_le.tan() * half_span + chord_linear * f_le * (1.0 - eta);

        let (chord_root, chord_kink, x_le_kink, sweep_in) =
            if f_le != 0.0 || f_te != 0.0 || simply_tapered {
                let chord_kink = chord_linear * (1.0 - eta) + chord_tip * eta;
                let x_le_kink = chord_linear * f_le + eta * (x_le_tip - chord_linear * f_le);
                (
                    chord_linear * (1.0 + f_le + f_te),
                    chord_kink,
                    x_le_kink,
                    (x_le_kink / s_in).atan(),
                )
            } else {
                // Constant chord inboard of the kink, tapered outboard
                let chord = (area - chord_tip * s_out) / (half_span + s_in);
                (chord, chord, 0.0, 0.0)
            };

        let sweep_out = if simply_tapered {
            sweep_in
        } else {
            ((x_le_tip - x_le_kink) / s_out).atan()
        };

        debug!(
            chord_root_m = chord_root,
            chord_kink_m = chord_kink,
            inner_m = s_in,
            outer_m = s_out,
            "reconstructed panels from equivalent wing"
        );

        let inner_params = PanelParams {
            chord_root,
            chord_tip: if simply_tapered { chord_tip } else { chord_kink },
            semi_span: s_in,
            sweep_le: sweep_in,
            dihedral: eq.dihedral,
            twist_tip: eta * eq.twist_tip,
        };
        let mut inner = Panel::new("inner", inner_params)?;
        inner.set_airfoil_root(self.panel.airfoil_root().cloned());

        if simply_tapered {
            inner.set_airfoil_tip(self.panel.airfoil_tip().cloned());
            return Ok(vec![inner]);
        }
        inner.set_airfoil_tip(self.airfoil_kink.clone());

        let outer_params = PanelParams {
            chord_root: chord_kink,
            chord_tip,
            semi_span: s_out,
            sweep_le: sweep_out,
            dihedral: eq.dihedral,
            twist_tip: eq.twist_tip,
        };
        let mut outer = Panel::new("outer", outer_params)?;
        outer.set_airfoil_root(self.airfoil_kink.clone());
        outer.set_airfoil_tip(self.panel.airfoil_tip().cloned());

        Ok(vec![inner, outer])
    }
}

/// Express the root offsets of the equivalent trapezoid as fractions of the linear root chord,
/// the root chord the surface would have if the outboard taper continued in to the root. These
/// are the ratios `reconstruct` consumes, so that reducing a cranked chain and rebuilding it
/// returns the same chords.
///
/// # Arguments
///
/// * `chord_root`: root chord of the actual surface
/// * `chord_root_eq`: root chord of the equivalent trapezoid
/// * `x_offset_le`: leading edge offset of the equivalent root behind the actual root
/// * `x_offset_te`: trailing edge offset of the equivalent root ahead of the actual root
/// * `kink_eta`: normalized station of the first breakpoint past the root
///
/// returns: Result<(f64, f64), GeometryError>
fn offset_ratios(
    chord_root: f64,
    chord_root_eq: f64,
    x_offset_le: f64,
    x_offset_te: f64,
    kink_eta: f64,
) -> Result<(f64, f64)> {
    // A simply tapered surface has no glove to describe
    if kink_eta >= 1.0 - BREAKPOINT_TOL {
        return Ok((0.0, 0.0));
    }
    let outboard = 1.0 - kink_eta;
    let chord_linear = (chord_root_eq - chord_root * kink_eta) / outboard;
    if !chord_linear.is_finite() || chord_linear <= 0.0 {
        return Err(GeometryError::degenerate(format!(
            "linear root chord of the equivalent wing is not positive ({chord_linear} m)"
        )));
    }
    let scale = outboard * chord_linear;
    Ok((x_offset_le / scale, x_offset_te / scale))
}

fn check_kink(eta: f64) -> Result<()> {
    if eta.is_finite() && eta > 0.0 && eta <= 1.0 {
        Ok(())
    } else {
        Err(GeometryError::degenerate(format!(
            "kink station must lie in (0, 1], got {eta}"
        )))
    }
}
