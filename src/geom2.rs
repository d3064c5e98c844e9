//! Planar (top view) geometry of a lifting surface.

mod top_view;

pub type Point2 = parry2d_f64::na::Point2<f64>;
pub type Polyline2 = parry2d_f64::shape::Polyline;

pub use self::top_view::TopView;
