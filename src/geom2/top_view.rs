use super::{Point2, Polyline2};
use crate::surface::Station;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The closed planform outline of one half of a surface seen from above. Point `x` is the
/// chordwise coordinate and `y` the spanwise coordinate, both in metres. The leading edge is
/// stored from root to tip, followed by the trailing edge from tip to root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopView {
    points: Vec<Point2>,
}

impl TopView {
    pub fn from_stations<'a>(stations: impl IntoIterator<Item = &'a Station>) -> Self {
        let stations = stations.into_iter().collect::<Vec<_>>();
        let leading = stations.iter().map(|s| Point2::new(s.x_le, s.y));
        let trailing = stations.iter().rev().map(|s| Point2::new(s.x_te(), s.y));
        Self {
            points: leading.chain(trailing).collect(),
        }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn leading_edge(&self) -> &[Point2] {
        &self.points[..self.points.len() / 2]
    }

    pub fn trailing_edge(&self) -> &[Point2] {
        &self.points[self.points.len() / 2..]
    }

    /// The outline as `[x, y]` pairs
    pub fn as_array(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.x, p.y]).collect()
    }

    /// The outline as a closed polyline, with a final segment joining the trailing edge root back
    /// to the leading edge root
    pub fn as_polyline(&self) -> Polyline2 {
        let n = self.points.len() as u32;
        let indices = (0..n).map(|i| [i, (i + 1) % n]).collect();
        Polyline2::new(self.points.clone(), Some(indices))
    }

    /// The enclosed area of the outline in square metres, by the shoelace formula
    pub fn area(&self) -> f64 {
        let twice = self
            .points
            .iter()
            .circular_tuple_windows()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>();
        twice.abs() / 2.0
    }
}
