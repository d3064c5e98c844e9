//! Serializable description of a lifting surface. Lengths are given in metres and angles in
//! degrees, and a description is turned into a `Surface` with `SurfaceConfig::build`.

use crate::Result;
use crate::common::units::{degrees, meters, square_meters};
use crate::surface::{
    AirfoilRef, ControlSurface, ControlSurfaceKind, EquivalentWing, EquivalentWingParams,
    PanelBuilder, ReferenceSweep, Surface, DEFAULT_STATIONS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

fn default_mirrored() -> bool {
    true
}

fn default_stations() -> usize {
    DEFAULT_STATIONS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub id: String,

    /// Whether the surface has a symmetric twin, true for wings and horizontal tails
    #[serde(default = "default_mirrored")]
    pub mirrored: bool,

    /// Number of uniform spanwise stations used for the first geometry computation
    #[serde(default = "default_stations")]
    pub spanwise_stations: usize,

    #[serde(default)]
    pub panels: Vec<PanelConfig>,

    /// When present, the surface is built from these parameters and `panels` is ignored
    #[serde(default)]
    pub equivalent_wing: Option<EquivalentWingConfig>,

    #[serde(default)]
    pub control_surfaces: Vec<ControlSurfaceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    pub id: String,

    /// Take the root chord and airfoil from the tip of the previous panel
    #[serde(default)]
    pub linked: bool,

    /// Required unless the panel is linked
    #[serde(default)]
    pub chord_root: Option<f64>,
    pub chord_tip: f64,
    pub semi_span: f64,
    #[serde(default)]
    pub sweep_le: f64,
    #[serde(default)]
    pub dihedral: f64,
    #[serde(default)]
    pub twist_tip: f64,
    #[serde(default)]
    pub airfoil_root: Option<String>,
    #[serde(default)]
    pub airfoil_tip: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepReference {
    LeadingEdge,
    QuarterChord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalentWingConfig {
    /// Planform area of both halves, in square metres
    pub area: f64,
    pub aspect_ratio: f64,
    pub taper_ratio: f64,
    #[serde(default = "default_kink")]
    pub kink_eta: f64,
    pub sweep: f64,
    #[serde(default = "default_sweep_reference")]
    pub sweep_reference: SweepReference,
    #[serde(default)]
    pub twist_tip: f64,
    #[serde(default)]
    pub dihedral: f64,
    #[serde(default)]
    pub x_offset_le_ratio: f64,
    #[serde(default)]
    pub x_offset_te_ratio: f64,
    #[serde(default)]
    pub airfoil_root: Option<String>,
    #[serde(default)]
    pub airfoil_kink: Option<String>,
    #[serde(default)]
    pub airfoil_tip: Option<String>,
}

fn default_kink() -> f64 {
    1.0
}

fn default_sweep_reference() -> SweepReference {
    SweepReference::QuarterChord
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSurfaceConfig {
    pub id: String,
    pub kind: ControlSurfaceKind,
    pub inner_eta: f64,
    pub outer_eta: f64,
    pub inner_chord_ratio: f64,
    pub outer_chord_ratio: f64,
    #[serde(default)]
    pub min_deflection: f64,
    #[serde(default)]
    pub max_deflection: f64,
}

fn airfoil(name: &Option<String>) -> Option<AirfoilRef> {
    name.as_ref().map(AirfoilRef::new)
}

impl PanelConfig {
    fn to_builder(&self) -> PanelBuilder {
        let mut builder = PanelBuilder::new(self.id.clone())
            .chord_tip(meters(self.chord_tip))
            .semi_span(meters(self.semi_span))
            .sweep_le(degrees(self.sweep_le))
            .dihedral(degrees(self.dihedral))
            .twist_tip(degrees(self.twist_tip))
            .airfoil_tip(airfoil(&self.airfoil_tip));
        if let Some(c) = self.chord_root {
            builder = builder.chord_root(meters(c));
        }
        if self.airfoil_root.is_some() {
            builder = builder.airfoil_root(airfoil(&self.airfoil_root));
        }
        builder
    }
}

impl EquivalentWingConfig {
    pub fn to_params(&self) -> EquivalentWingParams {
        let sweep = match self.sweep_reference {
            SweepReference::LeadingEdge => ReferenceSweep::LeadingEdge(degrees(self.sweep)),
            SweepReference::QuarterChord => ReferenceSweep::QuarterChord(degrees(self.sweep)),
        };
        EquivalentWingParams {
            area: square_meters(self.area),
            aspect_ratio: self.aspect_ratio,
            taper_ratio: self.taper_ratio,
            kink_eta: self.kink_eta,
            sweep,
            twist_tip: degrees(self.twist_tip),
            dihedral: degrees(self.dihedral),
            x_offset_le_ratio: self.x_offset_le_ratio,
            x_offset_te_ratio: self.x_offset_te_ratio,
            airfoil_root: airfoil(&self.airfoil_root),
            airfoil_kink: airfoil(&self.airfoil_kink),
            airfoil_tip: airfoil(&self.airfoil_tip),
        }
    }
}

impl From<&ControlSurfaceConfig> for ControlSurface {
    fn from(c: &ControlSurfaceConfig) -> Self {
        ControlSurface {
            id: c.id.clone(),
            kind: c.kind,
            inner_eta: c.inner_eta,
            outer_eta: c.outer_eta,
            inner_chord_ratio: c.inner_chord_ratio,
            outer_chord_ratio: c.outer_chord_ratio,
            min_deflection: degrees(c.min_deflection),
            max_deflection: degrees(c.max_deflection),
        }
    }
}

impl SurfaceConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a surface description from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path`: path to the JSON file
    ///
    /// returns: Result<SurfaceConfig, GeometryError>
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the described surface and compute its geometry with the configured number of
    /// spanwise stations.
    ///
    /// returns: Result<Surface, GeometryError>
    pub fn build(&self) -> Result<Surface> {
        let mut surface = match &self.equivalent_wing {
            Some(eq) => {
                let wing = EquivalentWing::from_params(&eq.to_params())?;
                Surface::from_equivalent_wing(self.id.clone(), wing)?
            }
            None => {
                let mut surface = Surface::new(self.id.clone());
                for panel in &self.panels {
                    if panel.linked {
                        surface.add_linked_panel(panel.to_builder())?;
                    } else {
                        surface.add_panel(panel.to_builder().build()?)?;
                    }
                }
                surface
            }
        };
        surface.set_mirrored(self.mirrored);

        for control in &self.control_surfaces {
            surface.add_control_surface(control.into())?;
        }

        surface.compute_geometry(self.spanwise_stations)?;
        debug!(surface = %self.id, panels = surface.panel_count(), "built surface from config");
        Ok(surface)
    }
}
