mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};
use terrafuse_world::{
    generate_color_scheme, Archetype, RawTerritorySpec, TerritoryGenerator, TerritoryModel,
    TerritorySpec,
};
use tracing::{info, warn};

use crate::config::TerrafuseConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deterministic territory generator", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one territory from a token on a network
    Generate {
        #[arg(long)]
        token: String,
        #[arg(long)]
        network: String,
        #[arg(long, default_value_t = 1)]
        fusion: u32,
        /// Override the archetype derived from the seed
        #[arg(long)]
        archetype: Option<Archetype>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the color scheme for a seed
    Palette {
        #[arg(long)]
        seed: u32,
        #[arg(long, default_value_t = 1)]
        fusion: u32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        palette: i32,
    },
    /// Generate every spec in a JSON list
    Batch {
        /// JSON array of territory specs
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Summary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TerrafuseConfig::load_from_path(path),
        None => TerrafuseConfig::load(),
    };
    let generator = TerritoryGenerator::new(config.generation.clone());
    let pretty = config.output.pretty;

    match cli.command {
        Command::Generate {
            token,
            network,
            fusion,
            archetype,
            format,
            output,
        } => {
            let mut spec = TerritorySpec::from_token(&token, &network, fusion);
            if let Some(archetype) = archetype {
                spec = spec.with_archetype(archetype);
            }
            info!(id = %spec.id, archetype = %spec.archetype, "generating");
            let model = generator.generate(&spec);
            let rendered = match format {
                Format::Json => to_json(&model, pretty)?,
                Format::Summary => summary(&model),
            };
            emit(&rendered, output.as_deref())
        }
        Command::Palette {
            seed,
            fusion,
            palette,
        } => {
            let scheme = generate_color_scheme(seed, fusion, palette);
            emit(&to_json(&scheme, pretty)?, None)
        }
        Command::Batch { input, output } => {
            let contents = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let raw: Vec<RawTerritorySpec> = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse specs in {}", input.display()))?;

            let default_size = generator.settings().default_size;
            let specs: Vec<TerritorySpec> = raw
                .iter()
                .map(|raw| {
                    let (spec, issues) = raw.sanitize(default_size);
                    if !issues.is_empty() {
                        warn!(id = %spec.id, corrections = issues.len(), "spec corrected");
                    }
                    spec
                })
                .collect();

            let models = generator.generate_batch(&specs);
            info!(territories = models.len(), "batch complete");
            emit(&to_json(&models, pretty)?, output.as_deref())
        }
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}

fn emit(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

fn summary(model: &TerritoryModel) -> String {
    let spec = &model.spec;
    let mut out = String::new();
    let _ = writeln!(out, "territory   {}", spec.id);
    let _ = writeln!(
        out,
        "archetype   {} (size {:.1}, seed {}, fusion {})",
        spec.archetype, spec.size, spec.visual_seed, spec.fusion_level
    );
    let colors = model.colors;
    let _ = writeln!(
        out,
        "colors      {} {} {} {} {}",
        colors.primary, colors.secondary, colors.accent, colors.outline, colors.specular
    );
    let _ = writeln!(
        out,
        "surface     {} landmass(es), depth {:.2}",
        model.surface.landmasses.len(),
        model.surface.extrusion_depth
    );
    for (name, instances) in model.ornaments.iter() {
        let _ = writeln!(out, "  {:<10} {}", name.as_str(), instances.len());
    }
    if let Ok(structures) = model.config.special_structures() {
        for structure in structures {
            let _ = writeln!(out, "special     {}", structure.kind());
        }
    }
    let _ = write!(
        out,
        "placement   {} placed, {} degraded, {} skipped",
        model.report.placed, model.report.degraded, model.report.skipped
    );
    out
}
