use super::Panel;
use crate::Result;
use crate::errors::GeometryError;
use serde::Serialize;
use tracing::debug;

/// The values of the surface distributions at every panel boundary, from the root (index 0) to
/// the tip (index `panel_count`). Positions are in metres and twist in radians.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakpoints {
    pub y: Vec<f64>,
    pub x_le: Vec<f64>,
    pub z_le: Vec<f64>,
    pub chord: Vec<f64>,
    pub twist: Vec<f64>,

    /// The breakpoint positions normalized by the semispan
    pub eta: Vec<f64>,
}

impl Breakpoints {
    /// Walk the panel chain once, accumulating the projected spanwise position and the leading
    /// edge coordinates of each boundary.
    ///
    /// # Arguments
    ///
    /// * `panels`: the ordered panel chain, root panel first
    ///
    /// returns: Result<Breakpoints, GeometryError>
    pub fn from_panels(panels: &[Panel]) -> Result<Self> {
        let first = panels.first().ok_or(GeometryError::NoPanels)?;
        let semi_span: f64 = panels
            .iter()
            .map(|p| p.params().semi_span * p.params().dihedral.cos())
            .sum();
        if semi_span <= 0.0 {
            return Err(GeometryError::degenerate("surface semispan is not positive"));
        }

        let n = panels.len() + 1;
        let mut y = Vec::with_capacity(n);
        let mut x_le = Vec::with_capacity(n);
        let mut z_le = Vec::with_capacity(n);
        let mut chord = Vec::with_capacity(n);
        let mut twist = Vec::with_capacity(n);

        y.push(0.0);
        x_le.push(0.0);
        z_le.push(0.0);
        chord.push(first.params().chord_root);
        twist.push(0.0);

        for (i, panel) in panels.iter().enumerate() {
            let p = panel.params();
            let dy = p.semi_span * p.dihedral.cos();
            y.push(y[i] + dy);
            x_le.push(x_le[i] + dy * p.sweep_le.tan());
            z_le.push(z_le[i] + dy * p.dihedral.tan());
            chord.push(p.chord_tip);
            twist.push(p.twist_tip);
        }

        // The accumulated tip position can drift from the summed semispan by rounding
        y[n - 1] = semi_span;

        let eta = y.iter().map(|v| v / semi_span).collect::<Vec<_>>();
        debug!(panels = panels.len(), semi_span_m = semi_span, "computed breakpoints");

        Ok(Self {
            y,
            x_le,
            z_le,
            chord,
            twist,
            eta,
        })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn semi_span(&self) -> f64 {
        self.y.last().copied().unwrap_or(0.0)
    }

    /// The leading edge X at the tip of the surface
    pub fn x_le_tip(&self) -> f64 {
        self.x_le.last().copied().unwrap_or(0.0)
    }
}
