use crate::config::GridConfig;
use ndarray::{Array1, Array2};

/// Evenly spaced samples over [start, stop], last sample pinned to `stop`
pub fn linspace(start: f64, stop: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut samples = Array1::from_shape_fn(n, |k| start + k as f64 * step);
            samples[n - 1] = stop;
            samples
        }
    }
}

/// Coordinate mesh, rows follow y and columns follow x
pub struct Mesh {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
}

impl Mesh {
    /// Broadcast `xs` along rows and `ys` along columns
    pub fn from_axes(xs: &Array1<f64>, ys: &Array1<f64>) -> Self {
        let shape = (ys.len(), xs.len());
        Mesh {
            x: Array2::from_shape_fn(shape, |(_, j)| xs[j]),
            y: Array2::from_shape_fn(shape, |(i, _)| ys[i]),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.x.dim()
    }

    pub fn point_count(&self) -> usize {
        self.x.len()
    }

    /// Data extent as ((x_min, x_max), (y_min, y_max))
    pub fn extent(&self) -> ((f64, f64), (f64, f64)) {
        let bounds = |a: &Array2<f64>| {
            a.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        (bounds(&self.x), bounds(&self.y))
    }
}

pub fn generate_grid(config: &GridConfig) -> Mesh {
    let xs = linspace(config.x_min, config.x_max, config.nx);
    let ys = linspace(config.y_min, config.y_max, config.ny);
    Mesh::from_axes(&xs, &ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_edge_counts() {
        assert_eq!(linspace(0.0, 1.0, 0).len(), 0);
        assert_eq!(linspace(3.0, 7.0, 1).to_vec(), vec![3.0]);
        assert_eq!(linspace(0.0, 1.0, 5).to_vec(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn linspace_is_evenly_spaced() {
        let xs = linspace(0.0, 10.0, 80);
        let step = 10.0 / 79.0;
        for k in 1..xs.len() {
            assert_relative_eq!(xs[k] - xs[k - 1], step, epsilon = 1e-12);
        }
    }

    #[test]
    fn default_grid_shape() {
        let mesh = generate_grid(&GridConfig::default());
        assert_eq!(mesh.x.dim(), (20, 80));
        assert_eq!(mesh.y.dim(), (20, 80));
        assert_eq!(mesh.point_count(), 1600);
    }

    #[test]
    fn default_grid_endpoints_are_exact() {
        let mesh = generate_grid(&GridConfig::default());
        for i in 0..20 {
            assert_eq!(mesh.x[[i, 0]], 0.0);
            assert_eq!(mesh.x[[i, 79]], 10.0);
        }
        for j in 0..80 {
            assert_eq!(mesh.y[[0, j]], 0.0);
            assert_eq!(mesh.y[[19, j]], 1.0);
        }
    }

    #[test]
    fn mesh_broadcasts_axes() {
        let mesh = generate_grid(&GridConfig::default());
        for i in 0..20 {
            for j in 0..80 {
                assert_eq!(mesh.x[[i, j]], mesh.x[[0, j]]);
                assert_eq!(mesh.y[[i, j]], mesh.y[[i, 0]]);
            }
        }
    }

    #[test]
    fn extent_covers_ranges() {
        let mesh = generate_grid(&GridConfig::default());
        assert_eq!(mesh.extent(), ((0.0, 10.0), (0.0, 1.0)));
    }
}
