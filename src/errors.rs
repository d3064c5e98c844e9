use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    /// A zero, negative or non-finite chord, span, area or aspect ratio, or any other input that
    /// would make the derived geometry undefined
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("{0} has not been computed yet")]
    NotComputedYet(&'static str),

    #[error("a lifting surface needs at least one panel")]
    NoPanels,

    #[error("at least 2 spanwise stations are needed, found {found}")]
    NotEnoughStations { found: usize },

    #[error(
        "root chord of panel {panel} ({found} m) does not match the tip chord before it \
         ({expected} m)"
    )]
    Discontinuous {
        panel: usize,
        expected: f64,
        found: f64,
    },

    #[error("value {value} is outside of the range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("no panel with index {0}")]
    UnknownPanel(usize),

    #[error("invalid surface configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GeometryError {
    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        GeometryError::DegenerateGeometry(msg.into())
    }
}
