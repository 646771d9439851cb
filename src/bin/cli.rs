// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! polyscad CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use polyscad::config::ProjectConfig;
use polyscad::geometry::{resolve_axis, AxisSpec, Bounded};
use polyscad::io::{self, Renderer};
use polyscad::NodeKind;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "polyscad")]
#[command(about = "polyscad - OpenSCAD source generation with exact bounding boxes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a serialized model tree to OpenSCAD source
    Render {
        /// Input tree file (JSON)
        input: String,

        /// Output .scad file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Write to the configured output directory
        #[arg(long, conflicts_with = "output")]
        save: bool,

        /// Configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print the bounding box of a serialized model tree
    Bbox {
        /// Input tree file (JSON)
        input: String,
    },

    /// Solve an axis span from two of its parameters
    Solve {
        #[arg(long, allow_hyphen_values = true)]
        from: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        center: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        to: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        distance: Option<f64>,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "polyscad=debug" } else { "polyscad=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Render {
            input,
            output,
            save,
            config,
        } => render_command(input, output.as_deref(), *save, config.as_deref())?,
        Commands::Bbox { input } => bbox_command(input)?,
        Commands::Solve {
            from,
            center,
            to,
            distance,
        } => solve_command(AxisSpec {
            from: *from,
            center: *center,
            to: *to,
            distance: *distance,
        })?,
        Commands::Version => {
            println!("polyscad v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn render_command(input: &str, output: Option<&str>, save: bool, config: Option<&str>) -> Result<()> {
    let config = match config {
        Some(path) => ProjectConfig::from_file(path)?,
        None => ProjectConfig::load()?,
    };

    let node = io::import_tree_file(input)?;
    let start = std::time::Instant::now();
    let source = Renderer::new(config.render.clone())
        .render(&node)
        .with_context(|| format!("Failed to render {}", input))?;
    info!(input, elapsed = ?start.elapsed(), "rendered model");

    let target = match (output, save) {
        (Some(path), _) => Some(Path::new(path).to_path_buf()),
        (None, true) => {
            let stem = match &node.kind {
                NodeKind::Part(part) => part.file_name(),
                _ => Path::new(input)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "model".to_string()),
            };
            Some(config.output_path(&stem))
        }
        (None, false) => None,
    };

    match target {
        Some(path) => {
            let written = io::export_scad(&source, &path)?;
            println!("{} {} -> {}", "Rendered".green(), input, written.display());
        }
        None => println!("{}", source),
    }

    Ok(())
}

fn bbox_command(input: &str) -> Result<()> {
    let node = io::import_tree_file(input)?;
    let bbox = node
        .bounding_box()
        .with_context(|| format!("Failed to measure {}", input))?;
    let size = bbox.size();
    let center = bbox.center();

    println!("{}", input.bold());
    println!("  {} {:>12} {:>12}", "x:".bright_black(), bbox.min.x, bbox.max.x);
    println!("  {} {:>12} {:>12}", "y:".bright_black(), bbox.min.y, bbox.max.y);
    println!("  {} {:>12} {:>12}", "z:".bright_black(), bbox.min.z, bbox.max.z);
    println!("  {} [{}, {}, {}]", "size:".bright_black(), size.x, size.y, size.z);
    println!("  {} [{}, {}, {}]", "center:".bright_black(), center.x, center.y, center.z);
    Ok(())
}

fn solve_command(spec: AxisSpec) -> Result<()> {
    let solution = resolve_axis(&spec).context("Failed to solve axis")?;
    println!(
        "{} from={} center={} to={} distance={}",
        "Solved:".green(),
        solution.from,
        solution.center,
        solution.to,
        solution.distance
    );
    Ok(())
}
