use crate::wavefield::WindField;
use ndarray::Zip;

/// Autoscale constants of the classic quiver layout.
const AUTOSCALE_FACTOR: f64 = 1.8;
const SHAFT_WIDTH_FACTOR: f64 = 0.06;
const MIN_SN: f64 = 10.0;
/// Fraction of the data span added to each side of the axes.
pub const AXIS_MARGIN: f64 = 0.05;

/// Arrow head proportions, in shaft widths
#[derive(Debug, Clone, Copy)]
pub struct ArrowStyle {
    pub head_width: f64,
    pub head_length: f64,
    pub head_axis_length: f64,
    pub min_shaft: f64,
    pub min_length: f64,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            head_width: 3.0,
            head_length: 5.0,
            head_axis_length: 4.5,
            min_shaft: 1.0,
            min_length: 1.0,
        }
    }
}

/// Arrow sizing, both fields measured in axes widths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuiverScale {
    pub scale: f64,       // Vector magnitude drawn one axes width long
    pub shaft_width: f64, // Arrow line width
}

impl QuiverScale {
    pub fn autoscale(field: &WindField) -> Self {
        let n = field.u.len();
        let sn = (n as f64).sqrt().max(MIN_SN);
        let amean = if n == 0 {
            0.0
        } else {
            Zip::from(&field.u)
                .and(&field.v)
                .fold(0.0, |acc, &u, &v| acc + u.hypot(v))
                / n as f64
        };
        let scale = if amean > 0.0 {
            AUTOSCALE_FACTOR * amean * sn
        } else {
            1.0
        };
        Self {
            scale,
            shaft_width: SHAFT_WIDTH_FACTOR / sn,
        }
    }

    /// Arrow length in axes widths
    pub fn length(&self, u: f64, v: f64) -> f64 {
        u.hypot(v) / self.scale
    }

    /// Arrow length in shaft widths
    pub fn length_in_widths(&self, u: f64, v: f64) -> f64 {
        self.length(u, v) / self.shaft_width
    }
}

/// Axis limits for a data range, padded on both sides
pub fn padded_limits((lo, hi): (f64, f64)) -> (f64, f64) {
    let pad = (hi - lo) * AXIS_MARGIN;
    (lo - pad, hi + pad)
}

/// Outline of an arrow `length` shaft widths long, tail at the origin, pointing along +x
pub fn arrow_outline(length: f64, style: &ArrowStyle) -> Vec<(f64, f64)> {
    if length < style.min_length {
        // Too short for a shaft: hexagonal dot
        let radius = 0.5 * style.min_length;
        return (0..6)
            .map(|k| {
                let th = k as f64 * std::f64::consts::PI / 3.0;
                (radius * th.cos(), radius * th.sin())
            })
            .collect();
    }

    let min_full = style.min_shaft * style.head_length;
    let full = length.max(min_full);
    let hw = 0.5 * style.head_width;
    let outline = vec![
        (0.0, -0.5),
        (full - style.head_axis_length, -0.5),
        (full - style.head_length, -hw),
        (full, 0.0),
        (full - style.head_length, hw),
        (full - style.head_axis_length, 0.5),
        (0.0, 0.5),
    ];
    if length < min_full {
        let shrink = length / min_full;
        outline
            .into_iter()
            .map(|(x, y)| (x * shrink, y * shrink))
            .collect()
    } else {
        outline
    }
}

/// Rotate an outline toward (u, v) and place it at `tail` on a y-down device
pub fn place_outline(
    outline: &[(f64, f64)],
    tail: (f64, f64),
    u: f64,
    v: f64,
    width_px: f64,
) -> Vec<(f64, f64)> {
    let (sin, cos) = v.atan2(u).sin_cos();
    outline
        .iter()
        .map(|&(x, y)| {
            let dx = (x * cos - y * sin) * width_px;
            let dy = (x * sin + y * cos) * width_px;
            (tail.0 + dx, tail.1 - dy)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    fn uniform_field(u: f64, v: f64, shape: (usize, usize)) -> WindField {
        WindField {
            u: Array2::from_elem(shape, u),
            v: Array2::from_elem(shape, v),
        }
    }

    #[test]
    fn autoscale_uses_sqrt_count_above_ten() {
        // 1600 arrows: sn = 40
        let field = uniform_field(3.0, 4.0, (20, 80));
        let scale = QuiverScale::autoscale(&field);
        assert_abs_diff_eq!(scale.scale, 1.8 * 5.0 * 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(scale.shaft_width, 0.06 / 40.0, epsilon = 1e-15);
        // Mean arrow spans 1/72 of the axes width
        assert_abs_diff_eq!(scale.length(3.0, 4.0), 1.0 / 72.0, epsilon = 1e-12);
    }

    #[test]
    fn autoscale_floors_sn_for_small_counts() {
        let field = uniform_field(1.0, 0.0, (2, 2));
        let scale = QuiverScale::autoscale(&field);
        assert_abs_diff_eq!(scale.scale, 18.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scale.shaft_width, 0.006, epsilon = 1e-15);
    }

    #[test]
    fn autoscale_handles_still_air() {
        let field = uniform_field(0.0, 0.0, (3, 3));
        let scale = QuiverScale::autoscale(&field);
        assert_eq!(scale.scale, 1.0);
        assert_eq!(scale.length(0.0, 0.0), 0.0);
    }

    #[test]
    fn limits_gain_five_percent() {
        let (lo, hi) = padded_limits((0.0, 10.0));
        assert_abs_diff_eq!(lo, -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(hi, 10.5, epsilon = 1e-12);
        let (lo, hi) = padded_limits((0.0, 1.0));
        assert_abs_diff_eq!(lo, -0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(hi, 1.05, epsilon = 1e-12);
    }

    #[test]
    fn long_arrow_tip_and_symmetry() {
        let style = ArrowStyle::default();
        let outline = arrow_outline(20.0, &style);
        assert_eq!(outline.len(), 7);
        assert_eq!(outline[3], (20.0, 0.0));
        assert_eq!(outline[2], (15.0, -1.5));
        for k in 0..3 {
            let (xa, ya) = outline[k];
            let (xb, yb) = outline[6 - k];
            assert_eq!(xa, xb);
            assert_eq!(ya, -yb);
        }
    }

    #[test]
    fn short_arrow_shrinks_uniformly() {
        let style = ArrowStyle::default();
        let outline = arrow_outline(2.5, &style);
        assert_eq!(outline.len(), 7);
        assert_abs_diff_eq!(outline[3].0, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(outline[4].1, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn tiny_arrow_is_a_dot() {
        let style = ArrowStyle::default();
        let outline = arrow_outline(0.0, &style);
        assert_eq!(outline.len(), 6);
        for &(x, y) in &outline {
            assert_abs_diff_eq!(x.hypot(y), 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn placement_flips_y_for_device() {
        let outline = arrow_outline(10.0, &ArrowStyle::default());
        // Pointing straight up: tip lands above the tail on a y-down device
        let placed = place_outline(&outline, (100.0, 100.0), 0.0, 1.0, 2.0);
        assert_abs_diff_eq!(placed[3].0, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(placed[3].1, 80.0, epsilon = 1e-9);

        let placed = place_outline(&outline, (0.0, 0.0), 1.0, 0.0, 1.0);
        assert_abs_diff_eq!(placed[3].0, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(placed[3].1, 0.0, epsilon = 1e-9);
    }
}
