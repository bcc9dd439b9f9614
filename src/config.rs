use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Points per inch in PDF user space.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Sampling of the coordinate grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub x_min: f64,
    pub x_max: f64,
    pub nx: usize,
    pub y_min: f64,
    pub y_max: f64,
    pub ny: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 10.0,
            nx: 80,
            y_min: 0.0,
            y_max: 1.0,
            ny: 20,
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(anyhow!(
                "Grid sample counts must be positive (nx={}, ny={})",
                self.nx,
                self.ny
            ));
        }
        if self.x_max <= self.x_min || self.y_max <= self.y_min {
            return Err(anyhow!(
                "Grid ranges must be increasing (x=[{}, {}], y=[{}, {}])",
                self.x_min,
                self.x_max,
                self.y_min,
                self.y_max
            ));
        }
        Ok(())
    }
}

/// Figure layout and export options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub label_font_pt: f64,
    pub tick_font_pt: f64,
    pub u_scale: f64, // Display-only factor on the x-component
    pub v_scale: f64,
    pub output: String,
    pub transparent: bool,
    pub landscape: bool,
    pub pad_in: f64,
    pub render_scale: f64, // Device units per point
    // Axes box as fractions of the figure, before the tight crop
    pub axes_left: f64,
    pub axes_right: f64,
    pub axes_bottom: f64,
    pub axes_top: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 2.0,
            label_font_pt: 14.0,
            tick_font_pt: 10.0,
            u_scale: 0.25,
            v_scale: 1.0,
            output: "wind-field.pdf".to_string(),
            transparent: true,
            landscape: true,
            pad_in: 0.1,
            render_scale: 10.0,
            axes_left: 0.125,
            axes_right: 0.9,
            axes_bottom: 0.11,
            axes_top: 0.88,
        }
    }
}

impl FigureConfig {
    fn validate(&self) -> Result<()> {
        if self.width_in <= 0.0 || self.height_in <= 0.0 {
            return Err(anyhow!(
                "Figure size must be positive (width={} in, height={} in)",
                self.width_in,
                self.height_in
            ));
        }
        if self.label_font_pt <= 0.0 || self.tick_font_pt <= 0.0 {
            return Err(anyhow!(
                "Font sizes must be positive (label={} pt, tick={} pt)",
                self.label_font_pt,
                self.tick_font_pt
            ));
        }
        if self.u_scale <= 0.0 || self.v_scale <= 0.0 {
            return Err(anyhow!(
                "Arrow component scales must be positive (u={}, v={})",
                self.u_scale,
                self.v_scale
            ));
        }
        if self.pad_in < 0.0 {
            return Err(anyhow!("pad_in must be non-negative, got {}", self.pad_in));
        }
        if self.render_scale <= 0.0 {
            return Err(anyhow!(
                "render_scale must be positive, got {}",
                self.render_scale
            ));
        }
        let in_unit = |f: f64| (0.0..=1.0).contains(&f);
        if ![self.axes_left, self.axes_right, self.axes_bottom, self.axes_top]
            .into_iter()
            .all(in_unit)
            || self.axes_left >= self.axes_right
            || self.axes_bottom >= self.axes_top
        {
            return Err(anyhow!(
                "Axes fractions must be ordered within [0, 1] (left={}, right={}, bottom={}, top={})",
                self.axes_left,
                self.axes_right,
                self.axes_bottom,
                self.axes_top
            ));
        }
        if self.output.trim().is_empty() {
            return Err(anyhow!("Output path must not be empty"));
        }
        Ok(())
    }

    /// Page size in inches, long side horizontal when landscape
    pub fn page_size_in(&self) -> (f64, f64) {
        if self.landscape && self.height_in > self.width_in {
            (self.height_in, self.width_in)
        } else {
            (self.width_in, self.height_in)
        }
    }

    /// Axes box in device units; the tight page grows around it
    pub fn axes_size_px(&self) -> (u32, u32) {
        let (w, h) = self.page_size_in();
        (
            self.inches_to_px((self.axes_right - self.axes_left) * w),
            self.inches_to_px((self.axes_top - self.axes_bottom) * h),
        )
    }

    /// Points in device units
    pub fn pt_to_px(&self, pt: f64) -> u32 {
        (pt * self.render_scale).round() as u32
    }

    /// Device units per inch, handed to the PDF converter
    pub fn dpi(&self) -> f32 {
        (POINTS_PER_INCH * self.render_scale) as f32
    }

    pub fn pad_px(&self) -> u32 {
        self.inches_to_px(self.pad_in)
    }

    pub fn label_font_px(&self) -> f64 {
        self.label_font_pt * self.render_scale
    }

    pub fn tick_font_px(&self) -> f64 {
        self.tick_font_pt * self.render_scale
    }

    fn inches_to_px(&self, inches: f64) -> u32 {
        (inches * POINTS_PER_INCH * self.render_scale).round() as u32
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlotConfig {
    pub grid: GridConfig,
    pub figure: FigureConfig,
}

impl PlotConfig {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.figure.validate()?;
        Ok(())
    }

    /// Configuration rendered as TOML for the debug log
    pub fn summary(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialise config: {}", e))
    }
}
