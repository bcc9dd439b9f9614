use crate::config::FigureConfig;
use crate::grid::Mesh;
use crate::quiver::{arrow_outline, padded_limits, place_outline, ArrowStyle, QuiverScale};
use crate::wavefield::WindField;
use anyhow::{anyhow, Context, Result};
use ndarray::Zip;
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::path::Path;
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};
use tracing::{debug, info, warn};

/// plotters-svg writes `font-size` as the requested size divided by this.
const SVG_FONT_SCALE: f64 = 1.24;

const SERIF_FAMILIES: &[&str] = &["DejaVu Serif", "Liberation Serif", "Noto Serif", "Times New Roman"];
const SANS_FAMILIES: &[&str] = &["DejaVu Sans", "Liberation Sans", "Noto Sans", "Arial"];

/// Tight page layout in device units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub canvas: (u32, u32),
    pub axes: (u32, u32),
    pub x_label_area: u32, // Below the axes: ticks, tick labels, "x"
    pub y_label_area: u32, // Left of the axes: ticks, tick labels, "y"
    pub top_overhang: u32,
    pub right_overhang: u32,
}

pub struct QuiverPlotter {
    figure: FigureConfig,
    style: ArrowStyle,
    // Colormap for arrow magnitude
    gradient: Box<dyn colorgrad::Gradient>,
}

impl QuiverPlotter {
    pub fn new(figure: &FigureConfig) -> Self {
        Self {
            figure: figure.clone(),
            style: ArrowStyle::default(),
            gradient: Box::new(colorgrad::preset::viridis()),
        }
    }

    /// Draw the quiver figure and export it as PDF to `path`
    pub fn render(&self, mesh: &Mesh, field: &WindField, path: &Path) -> Result<()> {
        let svg = self.render_svg(mesh, field)?;
        let pdf = svg_to_pdf(&svg, self.figure.dpi())?;
        std::fs::write(path, &pdf)
            .with_context(|| format!("Failed to write figure to '{}'", path.display()))?;
        info!(path = %path.display(), bytes = pdf.len(), "Saved figure");
        Ok(())
    }

    fn axis_font(&self) -> FontDesc<'static> {
        ("serif", self.figure.label_font_px() * SVG_FONT_SCALE)
            .into_font()
            .style(FontStyle::Italic)
    }

    fn tick_font(&self) -> FontDesc<'static> {
        ("sans-serif", self.figure.tick_font_px() * SVG_FONT_SCALE).into_font()
    }

    /// Page cropped to the axes plus their label artists and the pad
    pub fn layout(&self, mesh: &Mesh) -> Result<Layout> {
        let ((_, x_max), (y_min, y_max)) = mesh.extent();
        let measure = |font: &FontDesc, text: &str| {
            font.box_size(text)
                .map_err(|e| anyhow!("Failed to measure '{}': {:?}", text, e))
        };

        let tick_font = self.tick_font();
        let (last_x_tick, _) = measure(&tick_font, &format_x_tick(x_max))?;
        let widest_y_tick = [y_min, y_max]
            .iter()
            .map(|&y| measure(&tick_font, &format_y_tick(y)).map(|(w, _)| w))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .max()
            .unwrap_or(0);

        let tick_len = self.figure.pt_to_px(3.5);
        let gap = self.figure.pt_to_px(3.5);
        let tick_h = self.figure.tick_font_px().ceil() as u32;
        let label_h = self.figure.label_font_px().ceil() as u32;

        let axes = self.figure.axes_size_px();
        let x_label_area = tick_len + gap + tick_h + gap + label_h;
        let y_label_area = tick_len + gap + widest_y_tick + gap + label_h;
        let top_overhang = tick_h / 2;
        let right_overhang = last_x_tick / 2;
        let pad = self.figure.pad_px();

        let canvas = (
            pad + y_label_area + axes.0 + right_overhang + pad,
            pad + top_overhang + axes.1 + x_label_area + pad,
        );
        Ok(Layout {
            canvas,
            axes,
            x_label_area,
            y_label_area,
            top_overhang,
            right_overhang,
        })
    }

    /// Draw the figure into an SVG document sized in device units
    pub fn render_svg(&self, mesh: &Mesh, field: &WindField) -> Result<String> {
        let layout = self.layout(mesh)?;
        let magnitude = field.compute_magnitude();
        let shown = field.scaled(self.figure.u_scale, self.figure.v_scale);
        let scale = QuiverScale::autoscale(&shown);
        debug!(
            scale = scale.scale,
            shaft_width = scale.shaft_width,
            canvas = ?layout.canvas,
            "Quiver layout"
        );

        let (min_mag, max_mag) = magnitude
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| {
                (lo.min(m), hi.max(m))
            });
        let ((x_min, x_max), (y_min, y_max)) = mesh.extent();
        let (x_lo, x_hi) = padded_limits((x_min, x_max));
        let (y_lo, y_hi) = padded_limits((y_min, y_max));

        let line_px = self.figure.pt_to_px(0.8);
        let tick_len = self.figure.pt_to_px(3.5) as i32;
        let pad = self.figure.pad_px();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, layout.canvas).into_drawing_area();
            if !self.figure.transparent {
                root.fill(&WHITE)?;
            }

            let mut chart = ChartBuilder::on(&root)
                .margin_top(pad + layout.top_overhang)
                .margin_right(pad + layout.right_overhang)
                .margin_bottom(pad)
                .margin_left(pad)
                .x_label_area_size(layout.x_label_area)
                .y_label_area_size(layout.y_label_area)
                .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
                .context("Failed to lay out axes")?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("x")
                .y_desc("y")
                .axis_desc_style(self.axis_font())
                .label_style(self.tick_font())
                .axis_style(BLACK.stroke_width(line_px))
                .set_all_tick_mark_size(tick_len)
                .x_labels(11)
                .y_labels(6)
                .x_label_formatter(&|v| format_x_tick(*v))
                .y_label_formatter(&|v| format_y_tick(*v))
                .draw()
                .context("Failed to draw axes")?;

            let plot = chart.plotting_area();
            let (px, py) = plot.get_pixel_range();
            let width_px = scale.shaft_width * (px.end - px.start) as f64;

            let mut arrows = Vec::with_capacity(mesh.point_count());
            Zip::from(&mesh.x)
                .and(&mesh.y)
                .and(&shown.u)
                .and(&shown.v)
                .and(&magnitude)
                .for_each(|&x, &y, &u, &v, &m| {
                    let (tx, ty) = plot.map_coordinate(&(x, y));
                    let outline = arrow_outline(scale.length_in_widths(u, v), &self.style);
                    let points: Vec<(i32, i32)> =
                        place_outline(&outline, (tx as f64, ty as f64), u, v, width_px)
                            .into_iter()
                            .map(|(ax, ay)| (ax.round() as i32, ay.round() as i32))
                            .collect();
                    arrows.push((points, self.value_to_color(m, min_mag, max_mag)));
                });

            for (points, color) in arrows {
                root.draw(&Polygon::new(points, color.filled()))?;
            }

            // Axes frame as a full box
            root.draw(&Rectangle::new(
                [(px.start, py.start), (px.end, py.end)],
                BLACK.stroke_width(line_px),
            ))?;

            root.present().context("Failed to finish SVG document")?;
        }
        debug!(bytes = svg.len(), "Rendered SVG");
        Ok(svg)
    }

    fn value_to_color(&self, value: f64, min_val: f64, max_val: f64) -> RGBColor {
        let normalized = if max_val > min_val {
            (value - min_val) / (max_val - min_val)
        } else {
            0.5
        };
        let normalized = normalized.clamp(0.0, 1.0);
        let color_rgba = self.gradient.at(normalized as f32).to_rgba8();
        RGBColor(color_rgba[0], color_rgba[1], color_rgba[2])
    }
}

fn format_x_tick(v: f64) -> String {
    format!("{:.0}", v)
}

fn format_y_tick(v: f64) -> String {
    format!("{:.1}", v)
}

/// First candidate family with an installed face, else any installed family
fn installed_family(db: &usvg::fontdb::Database, candidates: &[&str]) -> Option<String> {
    let has_family =
        |name: &str| db.faces().into_iter().any(|face| face.families.iter().any(|(f, _)| f == name));
    candidates
        .iter()
        .find(|&&name| has_family(name))
        .map(|name| name.to_string())
        .or_else(|| {
            db.faces()
                .into_iter()
                .find_map(|face| face.families.first().map(|(f, _)| f.clone()))
        })
}

/// Parse SVG with system fonts, mapping the generic families to installed faces
fn parse_svg(svg: &str) -> Result<usvg::Tree> {
    let mut options = usvg::Options::default();
    let db = options.fontdb_mut();
    db.load_system_fonts();
    match (
        installed_family(db, SERIF_FAMILIES),
        installed_family(db, SANS_FAMILIES),
    ) {
        (Some(serif), Some(sans)) => {
            debug!(serif = %serif, sans = %sans, "Resolved font families");
            db.set_serif_family(serif);
            db.set_sans_serif_family(sans);
        }
        _ => warn!("No system fonts found, labels will be missing"),
    }
    usvg::Tree::from_str(svg, &options).context("Failed to parse rendered SVG")
}

/// Convert an SVG document to a one-page PDF, `dpi` device units per inch
fn svg_to_pdf(svg: &str, dpi: f32) -> Result<Vec<u8>> {
    let tree = parse_svg(svg)?;
    let mut page = PageOptions::default();
    page.dpi = dpi;
    Ok(svg2pdf::to_pdf(&tree, ConversionOptions::default(), page))
}
