//! Planform geometry of aircraft lifting surfaces. A surface is described as a chain of
//! trapezoidal panels, from which the crate derives breakpoints, spanwise station grids, areas,
//! the mean aerodynamic chord, and the single-trapezoid equivalent wing (in both directions).

pub mod common;
pub mod config;
pub mod errors;
pub mod geom2;
pub mod surface;

pub use errors::GeometryError;
pub use geom2::{Point2, TopView};
pub use surface::{
    AdjustCriterion, AirfoilRef, Breakpoints, ControlSurface, ControlSurfaceKind, Definition,
    Discretization, EquivalentWing, EquivalentWingParams, Panel, PanelBuilder, PanelId,
    PanelStations, ReferenceSweep, Station, Surface, SurfaceGeometry,
};

pub type Result<T> = std::result::Result<T, GeometryError>;
