//! Conversions between `uom` quantities and the raw SI values (metres, radians, square metres)
//! that the geometry algorithms operate on internally.

use uom::si::angle::{degree, radian};
use uom::si::area::square_meter;
use uom::si::f64::{Angle, Area, Length};
use uom::si::length::meter;

pub fn meters(v: f64) -> Length {
    Length::new::<meter>(v)
}

pub fn square_meters(v: f64) -> Area {
    Area::new::<square_meter>(v)
}

pub fn degrees(v: f64) -> Angle {
    Angle::new::<degree>(v)
}

pub fn radians(v: f64) -> Angle {
    Angle::new::<radian>(v)
}

pub fn in_meters(l: Length) -> f64 {
    l.get::<meter>()
}

pub fn in_square_meters(a: Area) -> f64 {
    a.get::<square_meter>()
}

pub fn in_radians(a: Angle) -> f64 {
    a.get::<radian>()
}

pub fn in_degrees(a: Angle) -> f64 {
    a.get::<degree>()
}
