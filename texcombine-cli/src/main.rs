//! Texture channel packer CLI

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use texcombine_core::{ColorChannel, Pipeline, RunReport, Settings, TextureSet};

/// Plan output entry (matches the `channels` layout of run reports)
#[derive(Debug, Serialize)]
struct PlanEntry {
    name: String,
    folder: Option<String>,
    dimensions: Option<(u32, u32)>,
    channels: [Option<String>; 4],
}

impl From<&TextureSet> for PlanEntry {
    fn from(set: &TextureSet) -> Self {
        Self {
            name: set.name.clone(),
            folder: set.folder.as_ref().map(|f| f.display().to_string()),
            dimensions: set.dimensions,
            channels: set.input_names(),
        }
    }
}

#[derive(Parser)]
#[command(name = "texcombine")]
#[command(about = "Pack metallic, occlusion and roughness maps into one texture and rebind materials.")]
#[command(version = concat!("v", env!("CARGO_PKG_VERSION")))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Shader assigned to rebound materials
    #[arg(long, global = true)]
    shader: Option<String>,

    /// Texture property that receives the packed texture
    #[arg(long, global = true)]
    shader_property: Option<String>,

    /// Folder with materials to rebind (repeatable, replaces configured folders)
    #[arg(long = "material-folder", global = true)]
    material_folders: Vec<PathBuf>,

    /// Channel for metallic maps (R, G, B, A)
    #[arg(long, global = true)]
    metallic_channel: Option<ColorChannel>,

    /// Channel for occlusion maps (R, G, B, A)
    #[arg(long, global = true)]
    occlusion_channel: Option<ColorChannel>,

    /// Channel for roughness maps (R, G, B, A)
    #[arg(long, global = true)]
    roughness_channel: Option<ColorChannel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack all texture sets found in folders (default: configured texture folders)
    Folders {
        #[arg(value_name = "FOLDER")]
        folders: Vec<PathBuf>,
    },
    /// Pack texture sets from specific texture files
    Textures {
        #[arg(value_name = "FILE", num_args = 1..)]
        files: Vec<PathBuf>,
    },
    /// List the texture sets folders would produce, without writing anything
    Plan {
        #[arg(value_name = "FOLDER")]
        folders: Vec<PathBuf>,
    },
    /// Print default settings as TOML
    InitConfig {
        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(log::LevelFilter::Info),
    };
    builder.init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = build_settings(&cli)?;

    match cli.command {
        Commands::Folders { ref folders } => cmd_folders(settings, folders, cli.json),
        Commands::Textures { ref files } => cmd_textures(settings, files, cli.json),
        Commands::Plan { ref folders } => cmd_plan(settings, folders, cli.json),
        Commands::InitConfig { ref output } => cmd_init_config(output.as_deref()),
    }
}

/// Settings file (if any) with command-line overrides applied.
fn build_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(shader) = &cli.shader {
        settings.shader = Some(shader.clone());
    }
    if let Some(property) = &cli.shader_property {
        settings.shader_property = property.clone();
    }
    if !cli.material_folders.is_empty() {
        settings.material_folders = cli.material_folders.clone();
    }
    if let Some(channel) = cli.metallic_channel {
        settings.metallic_channel = channel;
    }
    if let Some(channel) = cli.occlusion_channel {
        settings.occlusion_channel = channel;
    }
    if let Some(channel) = cli.roughness_channel {
        settings.roughness_channel = channel;
    }
    Ok(settings)
}

/// Folders from the command line, or the configured texture folders.
fn resolve_folders(settings: &Settings, folders: &[PathBuf]) -> Vec<PathBuf> {
    if folders.is_empty() {
        settings.texture_folders.clone()
    } else {
        folders.to_vec()
    }
}

fn print_report(report: &RunReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text());
    }
    Ok(())
}

fn cmd_folders(settings: Settings, folders: &[PathBuf], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let folders = resolve_folders(&settings, folders);
    let report = Pipeline::new(settings).process_folders(&folders)?;
    print_report(&report, json)
}

fn cmd_textures(settings: Settings, files: &[PathBuf], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = Pipeline::new(settings).process_textures(files)?;
    print_report(&report, json)
}

fn cmd_plan(settings: Settings, folders: &[PathBuf], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let folders = resolve_folders(&settings, folders);
    let sets = Pipeline::new(settings).plan_folders(&folders)?;

    if json {
        let entries: Vec<PlanEntry> = sets.iter().map(PlanEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if sets.is_empty() {
        println!("No texture sets found");
        return Ok(());
    }
    for set in &sets {
        let entry = PlanEntry::from(set);
        let channels: Vec<String> = ColorChannel::ALL
            .iter()
            .zip(&entry.channels)
            .map(|(c, name)| format!("{}={}", c, name.as_deref().unwrap_or("-")))
            .collect();
        println!("{} {}", entry.name, channels.join(" "));
    }
    Ok(())
}

fn cmd_init_config(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = Settings::default().to_toml()?;
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            println!("Settings written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
