use crate::grid::Mesh;
use ndarray::{Array2, Zip};
use std::f64::consts::PI;

/// Horizontal wind component at (x, y)
pub fn wind_u(x: f64, y: f64) -> f64 {
    4.0 * (2.0 * PI * y).sin() * (PI * x / 2.0).cos()
}

/// Vertical wind component at (x, y)
pub fn wind_v(x: f64, y: f64) -> f64 {
    -(2.0 * PI * y).cos() * (PI * x / 2.0).sin()
}

pub struct WindField {
    pub u: Array2<f64>,
    pub v: Array2<f64>,
}

impl WindField {
    /// Sample the wind at every mesh point
    pub fn evaluate(mesh: &Mesh) -> Self {
        WindField {
            u: Zip::from(&mesh.x).and(&mesh.y).map_collect(|&x, &y| wind_u(x, y)),
            v: Zip::from(&mesh.x).and(&mesh.y).map_collect(|&x, &y| wind_v(x, y)),
        }
    }

    pub fn compute_magnitude(&self) -> Array2<f64> {
        // |w| = sqrt(u² + v²)
        Zip::from(&self.u)
            .and(&self.v)
            .map_collect(|&u, &v| (u * u + v * v).sqrt())
    }

    /// Components as displayed: (su·u, sv·v)
    pub fn scaled(&self, su: f64, sv: f64) -> WindField {
        WindField {
            u: self.u.mapv(|u| su * u),
            v: self.v.mapv(|v| sv * v),
        }
    }
}
