//! grbl-post - CLI tool to post-process tool path trees into GRBL G-code.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use grbl_post::{
    load_path_tree, validate_tree, write_program, ExternalEditor, MachineConfig, Passthrough,
    PostConfig, Review, Units,
};

/// Post-process tool path trees into G-code for GRBL controllers.
#[derive(Parser, Debug)]
#[command(name = "grbl-post")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input path tree (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output G-code file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Post-processor arguments, e.g. "--no-header --precision 4"
    #[arg(short = 'a', long = "post-args", default_value = "", allow_hyphen_values = true)]
    post_args: String,

    /// Machine units (metric or imperial)
    #[arg(short, long, default_value = "metric")]
    units: String,

    /// Validate only, don't generate output
    #[arg(long)]
    validate: bool,

    /// Output the parsed path tree as JSON
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let units = Units::from_name(&args.units)
        .with_context(|| format!("Unknown units '{}'", args.units))?;
    let machine = MachineConfig::new(units);

    let config = PostConfig::from_args(&args.post_args, &machine)
        .context("Invalid post-processor arguments")?;

    info!("Processing: {} ({} units)", args.input.display(), units);

    let nodes = load_path_tree(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    info!("Loaded {} path object(s)", nodes.len());

    // Validate
    let validation = validate_tree(&nodes, &config)?;

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    if !validation.passed {
        anyhow::bail!("Validation failed");
    }

    // Debug output
    if args.debug {
        let json = serde_json::to_string_pretty(&nodes)?;
        println!("{}", json);
        return Ok(());
    }

    // Validate-only mode
    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    let output_path = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("nc");
        path
    });

    let reviewer = reviewer_from_env();

    if let Err(err) = write_program(&nodes, &output_path, &config, reviewer.as_ref()) {
        if err.is_malformed_input() {
            error!("Malformed path data, nothing was written");
        }
        return Err(err).with_context(|| format!("Failed to write {}", output_path.display()));
    }

    info!("Generated: {}", output_path.display());

    Ok(())
}

/// Editor review only makes sense with a terminal attached.
fn reviewer_from_env() -> Box<dyn Review> {
    if !std::io::stdin().is_terminal() {
        return Box::new(Passthrough);
    }
    match std::env::var("VISUAL").or_else(|_| std::env::var("EDITOR")) {
        Ok(editor) if !editor.trim().is_empty() => Box::new(ExternalEditor::new(editor)),
        _ => Box::new(Passthrough),
    }
}
