//! sidecat - Browse a media library through its sidecar meta files.
//!
//! Usage:
//!   sidecat [ROOTS...]           Print the category tree
//!   sidecat tree [ROOTS...]      Print the category tree
//!   sidecat list [ROOTS...]      List every categorized resource
//!   sidecat stats [ROOTS...]     Per-kind index statistics
//!   sidecat export [ROOTS...]    Export the tree and scan report to JSON
//!   sidecat reveal PATH          Open the folder containing PATH
//!   sidecat --help               Show help

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sidecat_core::{LibraryConfig, MediaKind};
use sidecat_index::{Folder, Node};
use sidecat_scan::{Library, LibraryBuilder, ScanReport};

#[derive(Parser)]
#[command(
    name = "sidecat",
    version,
    about = "Categorized media library built from sidecar meta files",
    long_about = "sidecat reads `<file>.meta` and `folder.meta` sidecar files beside your \
                  media and arranges the media into a browsable category tree.\n\n\
                  Run `sidecat [ROOTS...]` to print the tree, or use subcommands for \
                  other views."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Directories to scan (defaults to the configured shared directories)
    roots: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Alternate folder searched for `<file>.meta`
    #[arg(long = "alt-meta", global = true)]
    alt_meta: Option<PathBuf>,

    /// Increase log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the category tree
    Tree {
        /// Directories to scan
        roots: Vec<PathBuf>,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// List every categorized resource with its path
    List {
        /// Directories to scan
        roots: Vec<PathBuf>,

        /// Also show each resource's thumbnail, when one exists
        #[arg(short, long)]
        thumbnails: bool,
    },

    /// Show per-kind index statistics
    Stats {
        /// Directories to scan
        roots: Vec<PathBuf>,
    },

    /// Export the category tree and scan report to JSON
    Export {
        /// Directories to scan
        roots: Vec<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the folder containing a file
    Reveal {
        /// File or folder to reveal
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.global);

    match cli.command {
        Some(Command::Tree { roots, depth }) => {
            let library = build_library(&cli.global, roots)?;
            run_tree(&library, depth);
        }
        Some(Command::List { roots, thumbnails }) => {
            let config = load_config(&cli.global, roots)?;
            let thumbnail_folder = config.alternate_thumbnail_folder.clone();
            let library = scan(config)?;
            run_list(&library, thumbnails, thumbnail_folder.as_deref());
        }
        Some(Command::Stats { roots }) => {
            let library = build_library(&cli.global, roots)?;
            run_stats(&library);
        }
        Some(Command::Export { roots, output }) => {
            let library = build_library(&cli.global, roots)?;
            run_export(&library, output)?;
        }
        Some(Command::Reveal { path }) => {
            run_reveal(&path)?;
        }
        None => {
            let library = build_library(&cli.global, cli.roots)?;
            run_tree(&library, None);
        }
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` takes precedence over flags.
fn init_logging(args: &GlobalArgs) {
    let default_level = match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the config file and apply command-line overrides.
fn load_config(args: &GlobalArgs, roots: Vec<PathBuf>) -> Result<LibraryConfig> {
    let mut config = match &args.config {
        Some(path) => LibraryConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LibraryConfig::load_default().context("Failed to load config")?,
    };

    if !roots.is_empty() {
        config.shared_directories = roots;
    }
    if let Some(alt_meta) = &args.alt_meta {
        config.alternate_meta_folder = Some(alt_meta.clone());
    }
    config.validate().context("Invalid configuration")?;
    debug!(?config, "Loaded configuration");

    Ok(config)
}

fn scan(config: LibraryConfig) -> Result<Library> {
    for root in config.scan_roots() {
        eprintln!("Scanning {}...", root.display());
    }
    LibraryBuilder::new(config).build().context("Scan failed")
}

fn build_library(args: &GlobalArgs, roots: Vec<PathBuf>) -> Result<Library> {
    scan(load_config(args, roots)?)
}

/// Print the rendered category tree.
fn run_tree(library: &Library, max_depth: Option<usize>) {
    let tree = library.render();

    print_summary(&library.report);
    if tree.is_empty() {
        println!(" No categorized media found.");
    } else {
        print_folder(&tree, 0, max_depth.unwrap_or(usize::MAX));
    }
    print_warning_count(&library.report);
}

/// List every resource leaf, one per line.
fn run_list(library: &Library, thumbnails: bool, thumbnail_folder: Option<&Path>) {
    let tree = library.render();

    for resource in tree.unique_resources() {
        let marker = if resource.is_dir() { "/" } else { "" };
        println!("{}{}\t{}", resource.name, marker, resource.path.display());
        if !thumbnails {
            continue;
        }
        if let Some(thumbnail) = resource.find_thumbnail(thumbnail_folder) {
            println!("\t  thumbnail: {}", thumbnail.display());
        }
    }
}

/// Print per-kind statistics.
fn run_stats(library: &Library) {
    print_summary(&library.report);

    println!(
        " {:<10} {:>8} {:>8} {:>8} {:>10} {:>8}",
        "Kind", "Files", "Masters", "Types", "Values", "Entries"
    );
    for kind in MediaKind::INDEXABLE {
        let stats = library.index.stats(kind);
        println!(
            " {:<10} {:>8} {:>8} {:>8} {:>10} {:>8}",
            kind.display_name(),
            library.report.stats.files_of(kind),
            stats.masters,
            stats.category_types,
            stats.category_values,
            stats.resources
        );
    }
    println!();
    println!(
        " {} meta files applied, {} facts registered, {} files of unknown type",
        library.report.stats.meta_files_parsed(),
        library.report.stats.facts_registered,
        library.report.stats.unknown_files
    );
    print_warning_count(&library.report);
}

#[derive(Serialize)]
struct Export<'a> {
    tree: Folder,
    report: &'a ScanReport,
}

/// Export the rendered tree and scan report to JSON.
fn run_export(library: &Library, output: Option<PathBuf>) -> Result<()> {
    let export = Export {
        tree: library.render(),
        report: &library.report,
    };
    let json = serde_json::to_string_pretty(&export)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

/// Open the folder containing `path` with the system file manager.
fn run_reveal(path: &Path) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;
    let folder = path
        .parent()
        .ok_or_else(|| eyre!("{} has no containing folder", path.display()))?;

    open::that(folder).with_context(|| format!("Failed to open {}", folder.display()))?;
    eprintln!("Opened {}", folder.display());
    Ok(())
}

fn print_summary(report: &ScanReport) {
    println!();
    println!("{}", "─".repeat(60));
    for root in &report.roots {
        println!(" {}", root.display());
    }
    println!(
        " {} videos, {} songs, {} photos in {} directories",
        report.stats.video_files,
        report.stats.audio_files,
        report.stats.image_files,
        report.stats.dirs_scanned
    );
    println!(" Scanned in {}", report.duration_text());
    println!("{}", "─".repeat(60));
    println!();
}

fn print_warning_count(report: &ScanReport) {
    if report.has_warnings() {
        println!();
        println!("{} warning(s) during scan", report.warnings.len());
    }
}

/// Print a folder and its children.
fn print_folder(folder: &Folder, depth: usize, max_depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}▼ {}", indent, folder.name);

    if depth >= max_depth {
        if !folder.is_empty() {
            println!("{}    ... {} more", indent, folder.children.len());
        }
        return;
    }

    for child in &folder.children {
        match child {
            Node::Folder(child) => print_folder(child, depth + 1, max_depth),
            Node::Resource(resource) => {
                let marker = if resource.is_dir() { "/" } else { "" };
                println!("{}    {}{}", indent, resource.name, marker);
            }
        }
    }
}
