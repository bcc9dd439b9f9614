mod config;
mod grid;
mod quiver;
mod visualisation;
mod wavefield;

use anyhow::Result;
use config::PlotConfig;
use grid::generate_grid;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};
use visualisation::QuiverPlotter;
use wavefield::WindField;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let config = PlotConfig::default();
    config.validate()?;
    debug!("Configuration:\n{}", config.summary()?);

    let mesh = generate_grid(&config.grid);
    info!(rows = mesh.dim().0, cols = mesh.dim().1, "Generated grid");

    let field = WindField::evaluate(&mesh);
    let magnitude = field.compute_magnitude();
    let max_mag = magnitude.iter().fold(0.0_f64, |acc, &m| acc.max(m));
    info!(max_magnitude = max_mag, "Evaluated wind field");

    let plotter = QuiverPlotter::new(&config.figure);
    plotter.render(&mesh, &field, Path::new(&config.figure.output))?;

    Ok(())
}
