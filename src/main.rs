//! Locobj CLI - Command-line tool for Locomotion object files.
//!
//! This is the main entry point for the locobj command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use locobj::prelude::*;

/// Locobj - Locomotion object file tool
#[derive(Parser)]
#[command(name = "locobj")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the installed `.DAT` files
    #[arg(short = 'd', long, env = "LOCOBJ_OBJECTS_DIR", default_value = "objdata", global = true)]
    objects_dir: PathBuf,

    /// Index cache file (defaults to objindex.dat inside the objects directory)
    #[arg(long, env = "LOCOBJ_INDEX", global = true)]
    index: Option<PathBuf>,

    /// Preferred string table language
    #[arg(short, long, env = "LOCOBJ_LANGUAGE", default_value = "english_uk", global = true)]
    language: LanguageId,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load or rebuild the object index and print a summary
    Index,

    /// List installed objects in index order
    List {
        /// Only objects of this type (e.g. vehicle, track, competitor)
        #[arg(short, long)]
        r#type: Option<ObjectType>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the header, checksum verdict and preview of an object file
    Inspect {
        /// Object file
        file: PathBuf,
    },

    /// Install an object file into the objects directory
    Install {
        /// Object file
        file: PathBuf,
    },

    /// Load every installed object and report the ones that fail
    Verify,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ObjectManagerConfig::new(&cli.objects_dir).with_language(cli.language);
    if let Some(index) = &cli.index {
        config = config.with_index_path(index);
    }

    match cli.command {
        Commands::Index => cmd_index(config)?,
        Commands::List { r#type, json } => cmd_list(config, r#type, json)?,
        Commands::Inspect { file } => cmd_inspect(config, &file)?,
        Commands::Install { file } => cmd_install(config, &file)?,
        Commands::Verify => cmd_verify(config)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Host hooks drawing an indicatif bar on stderr.
#[derive(Default)]
struct ProgressHooks {
    bar: Option<ProgressBar>,
}

impl HostHooks for ProgressHooks {
    fn progress_begin(&mut self, caption: &str) {
        let bar = ProgressBar::new(255);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {percent}%") {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(caption.to_owned());
        self.bar = Some(bar);
    }

    fn progress_set(&mut self, value: u8) {
        if let Some(bar) = &self.bar {
            bar.set_position(u64::from(value));
        }
    }

    fn progress_end(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn show_fatal_error(&mut self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }
}

fn open_manager(config: ObjectManagerConfig) -> Result<ObjectManager> {
    let dir = config.objects_dir().display().to_string();
    let mut manager = ObjectManager::with_hooks(config, Box::new(ProgressHooks::default()));
    manager
        .load_index()
        .with_context(|| format!("Failed to load the object index for {dir}"))?;
    Ok(manager)
}

fn cmd_index(config: ObjectManagerConfig) -> Result<()> {
    let start = Instant::now();
    let manager = open_manager(config)?;
    let index = manager.index();

    println!(
        "Indexed {} objects ({} bytes) in {:?}",
        index.len(),
        index.as_bytes().len(),
        start.elapsed()
    );
    if manager.has_custom_objects_in_index() {
        println!("Index contains custom objects");
    }
    Ok(())
}

#[derive(Serialize)]
struct ListedObject {
    id: usize,
    object_type: String,
    header: String,
    filename: String,
    name: String,
    images: u32,
    custom: bool,
    required: Vec<String>,
}

fn cmd_list(config: ObjectManagerConfig, object_type: Option<ObjectType>, json: bool) -> Result<()> {
    let manager = open_manager(config)?;

    let listed: Vec<ListedObject> = manager
        .index()
        .entries()
        .enumerate()
        .filter(|(_, entry)| object_type.map_or(true, |ty| entry.header.object_type() == Some(ty)))
        .map(|(id, entry)| ListedObject {
            id,
            object_type: entry
                .header
                .object_type()
                .map_or_else(|| entry.header.type_tag().to_string(), |ty| ty.to_string()),
            header: entry.header.name().into_owned(),
            filename: entry.filename_lossy().into_owned(),
            name: entry.name_lossy().into_owned(),
            images: entry.num_images,
            custom: entry.header.is_custom(),
            required: entry.required.iter().map(ToString::to_string).collect(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    for object in &listed {
        println!(
            "{:>5} {:<14} {:<8} {:<14} {:>6} {}",
            object.id, object.object_type, object.header, object.filename, object.images, object.name
        );
    }
    println!("\nTotal: {} objects", listed.len());
    Ok(())
}

fn cmd_inspect(config: ObjectManagerConfig, path: &Path) -> Result<()> {
    let file = ObjectFile::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let header = file.header;
    let checksum = header.checksum;

    println!("Header:   {header}");
    println!("Source:   {:?}", header.source_game());
    println!(
        "Checksum: {checksum:#010x} ({})",
        if file.is_checksum_valid() { "ok" } else { "MISMATCH" }
    );
    println!("Payload:  {} bytes", file.payload.len());

    let manager = ObjectManager::new(config);
    let preview = manager
        .preview_object_file(file)
        .context("Object did not pass validation")?;

    println!("Name:     {}", preview.name());
    println!("Images:   {}", preview.num_images());
    if let Some((intelligence, aggressiveness, competitiveness)) = preview.ratings() {
        println!("Ratings:  intelligence {intelligence}, aggressiveness {aggressiveness}, competitiveness {competitiveness}");
    }
    let dependencies = preview.dependencies();
    for required in &dependencies.required {
        println!("Requires: {required}");
    }
    for will_load in &dependencies.will_load {
        println!("Loads:    {will_load}");
    }
    Ok(())
}

fn cmd_install(config: ObjectManagerConfig, path: &Path) -> Result<()> {
    let file = ObjectFile::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let header = file.header;

    let mut manager = open_manager(config)?;
    let installed = manager
        .try_install_object(file)
        .with_context(|| format!("Failed to install {header}"))?;

    println!("Installed {header} as {}", installed.display());
    Ok(())
}

fn cmd_verify(config: ObjectManagerConfig) -> Result<()> {
    let mut manager = open_manager(config)?;
    let headers: Vec<ObjectHeader> = manager.index().entries().map(|entry| entry.header).collect();

    let pb = ProgressBar::new(headers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut failures = Vec::new();
    for header in &headers {
        match manager.load(header) {
            Ok(handle) => {
                debug!(object = %header, slot = %handle, "verified");
                manager.unload(header);
            }
            Err(err) => failures.push((*header, err)),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for (header, err) in &failures {
        eprintln!("{header}: {err}");
    }
    println!("Verified {} objects, {} failed", headers.len(), failures.len());

    if !failures.is_empty() {
        anyhow::bail!("{} objects failed verification", failures.len());
    }
    Ok(())
}
