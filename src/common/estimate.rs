//! A numerically estimated value tagged with the tolerance of the method that produced it. The
//! tag is carried through unit conversions for reporting and is not an error bound.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate<Q> {
    /// The estimated value
    pub value: Q,

    /// The nominal relative tolerance of the numerical method that produced the value
    pub tol: f64,
}

impl<Q: Copy> Estimate<Q> {
    pub fn new(value: Q, tol: f64) -> Self {
        Self { value, tol }
    }

    pub fn value(&self) -> Q {
        self.value
    }

    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Transform the estimated value while keeping the tolerance tag
    pub fn map<R: Copy>(self, f: impl FnOnce(Q) -> R) -> Estimate<R> {
        Estimate {
            value: f(self.value),
            tol: self.tol,
        }
    }
}
