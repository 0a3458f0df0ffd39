//! quadric CLI - inspect quadric surfaces and trace lines through models.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use quadric_kernel::{surface_from_spec, Line, Model, Surface, V3D};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quadric")]
#[command(about = "Quadric surface and region track tools", long_about = None)]
struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a surface and print its normalised form and coefficients
    Surface {
        /// Specification line, e.g. "c/y 0 0 1"
        #[arg(allow_hyphen_values = true)]
        spec: String,
    },
    /// Classify a point against a surface
    Classify {
        /// Specification line
        #[arg(allow_hyphen_values = true)]
        spec: String,
        /// Point as x,y,z
        #[arg(allow_hyphen_values = true, value_parser = parse_v3d)]
        point: V3D,
    },
    /// Intersect a line with a surface
    Intersect {
        /// Specification line
        #[arg(allow_hyphen_values = true)]
        spec: String,
        /// Line origin as x,y,z
        #[arg(long, allow_hyphen_values = true, value_parser = parse_v3d, default_value = "0,0,0")]
        origin: V3D,
        /// Line direction as x,y,z
        #[arg(long, allow_hyphen_values = true, value_parser = parse_v3d)]
        direction: V3D,
    },
    /// Trace a line through a TOML model and print its segments
    Trace {
        /// Model file
        model: PathBuf,
        /// Line origin as x,y,z
        #[arg(long, allow_hyphen_values = true, value_parser = parse_v3d, default_value = "0,0,0")]
        origin: V3D,
        /// Line direction as x,y,z
        #[arg(long, allow_hyphen_values = true, value_parser = parse_v3d)]
        direction: V3D,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Surface { spec } => show_surface(&spec, cli.json)?,
        Commands::Classify { spec, point } => classify(&spec, &point, cli.json)?,
        Commands::Intersect {
            spec,
            origin,
            direction,
        } => intersect(&spec, origin, direction, cli.json)?,
        Commands::Trace {
            model,
            origin,
            direction,
        } => trace(&model, origin, direction, cli.json)?,
    }

    Ok(())
}

fn parse_v3d(text: &str) -> std::result::Result<V3D, String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{text}'"));
    }
    let mut v = [0.0; 3];
    for (slot, part) in v.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid coordinate '{part}'"))?;
    }
    Ok(V3D::from(v))
}

fn parse_surface(spec: &str) -> Result<Box<dyn Surface>> {
    surface_from_spec(spec).with_context(|| format!("Cannot parse surface '{spec}'"))
}

fn show_surface(spec: &str, as_json: bool) -> Result<()> {
    let surface = parse_surface(spec)?;
    let coeffs = surface.equation().coefficients();

    if as_json {
        let out = json!({
            "class": surface.class_name(),
            "spec": surface.spec_string(),
            "coefficients": coeffs,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} ({})", surface.spec_string(), surface.class_name());
    for (name, value) in ["A", "B", "C", "D", "E", "F", "G", "H", "J", "K"]
        .iter()
        .zip(coeffs)
    {
        println!("  {name} = {value}");
    }
    Ok(())
}

fn classify(spec: &str, point: &V3D, as_json: bool) -> Result<()> {
    let surface = parse_surface(spec)?;
    let side = surface.side(point);
    let distance = surface.distance(point);
    let distance_true = surface.distance_true(point);
    let normal = surface.surface_normal(point);

    if as_json {
        let out = json!({
            "side": side,
            "distance": distance,
            "distance_true": distance_true,
            "normal": normal,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("side          {:?} ({})", side, side.value());
    println!("distance      {distance}");
    println!("distance_true {distance_true}");
    println!("normal        {normal}");
    Ok(())
}

fn intersect(spec: &str, origin: V3D, direction: V3D, as_json: bool) -> Result<()> {
    let surface = parse_surface(spec)?;
    let line = Line::new(origin, direction)?;
    let points = line.intersect(surface.as_ref());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    if points.is_empty() {
        println!("no intersection");
    }
    for p in &points {
        println!("{p}");
    }
    Ok(())
}

fn trace(path: &Path, origin: V3D, direction: V3D, as_json: bool) -> Result<()> {
    let model = Model::from_path(path)
        .with_context(|| format!("Cannot load model {}", path.display()))?;
    let line = Line::new(origin, direction)?;
    let track = model.trace(&line)?;

    if as_json {
        let out = json!({
            "init_region": track.init_region(),
            "units": track.units(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{:>8} {:>14} {:>14}", "region", "length", "distance");
        for unit in &track {
            println!(
                "{:>8} {:>14.6} {:>14.6}",
                unit.region, unit.length, unit.distance
            );
        }
    }

    let gap = track.non_complete();
    if gap != 0 {
        bail!("Track has a gap before segment {}", gap);
    }
    Ok(())
}
