use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use apinotes_core::config::{ApiNotesConfig, CliOverrides, StrictLevel};
use apinotes_core::diagnostics::{ConsoleDiagnosticHandler, DiagnosticHandler};
use apinotes_core::fs::RealFileSystem;
use apinotes_core::{ApiNotesManager, Module, NotesReader, SourceManager, Statistics};

/// Configuration file picked up from the current directory when no
/// `--project` is given
const DEFAULT_CONFIG_FILE: &str = "apinotes.yaml";

/// apinotes - Find the API notes that govern C and Objective-C headers
#[derive(Parser, Debug, Clone)]
#[command(name = "apinotes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Header files to resolve
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to an apinotes.yaml or .json configuration file
    #[arg(short, long, value_name = "FILE")]
    project: Option<PathBuf>,

    /// Name of the module being compiled
    #[arg(long, value_name = "NAME", requires = "module_dir")]
    module: Option<String>,

    /// Directory of the module being compiled (the bundle root for frameworks)
    #[arg(long, value_name = "DIR")]
    module_dir: Option<PathBuf>,

    /// The module is a framework bundle
    #[arg(long)]
    framework: bool,

    /// The module is defined in a private module map
    #[arg(long)]
    private_module_map: bool,

    /// Name of a submodule defined in a private module map (repeatable)
    #[arg(long, value_name = "NAME")]
    private_submodule: Vec<String>,

    /// The module is part of the system headers
    #[arg(long)]
    system: bool,

    /// Only use the search paths for the current module's notes
    #[arg(long)]
    no_search_in_module: bool,

    /// API notes search paths (comma-separated)
    #[arg(long, value_name = "PATHS")]
    api_notes_path: Option<String>,

    /// Disable lookup of notes next to headers
    #[arg(long)]
    no_implicit: bool,

    /// Swift version used to select versioned notes
    #[arg(long, value_name = "VERSION")]
    swift_version: Option<String>,

    /// Severity for misnamed private notes files (error, warning, off)
    #[arg(long, value_name = "LEVEL")]
    private_notes_naming: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Print lookup statistics
    #[arg(long)]
    stats: bool,

    /// Create a default apinotes.yaml in the current directory
    #[arg(long)]
    init: bool,

    /// Plain (uncolored) diagnostics
    #[arg(long)]
    no_pretty: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotesSummary {
    module: String,
    source: Option<PathBuf>,
}

impl From<&NotesReader> for NotesSummary {
    fn from(reader: &NotesReader) -> Self {
        Self {
            module: reader.module_name().to_string(),
            source: reader.source_path().map(Path::to_path_buf),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeaderReport {
    header: PathBuf,
    notes: Vec<NotesSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    current_module: Option<CurrentModuleReport>,
    headers: Vec<HeaderReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<Statistics>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrentModuleReport {
    name: String,
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug to trace every directory probe
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.init {
        init_project()?;
        return Ok(());
    }

    if cli.files.is_empty() && cli.module.is_none() {
        eprintln!("Error: No headers or module specified. Use --help for usage information.");
        std::process::exit(1);
    }

    let config = load_config(&cli)?;
    let mut options = config.api_notes_options;
    options.module_search_paths = options
        .module_search_paths
        .iter()
        .map(|p| absolute(p))
        .collect::<anyhow::Result<_>>()?;
    debug!("Options: {:?}", options);

    let diagnostics = Arc::new(ConsoleDiagnosticHandler::new(options.pretty));
    let sources = SourceManager::new(Arc::new(RealFileSystem::new()));
    let mut manager = ApiNotesManager::new(sources, options.clone(), diagnostics.clone())?;

    let mut report = Report {
        current_module: None,
        headers: Vec::with_capacity(cli.files.len()),
        statistics: None,
    };

    if let Some(module) = current_module(&cli)? {
        manager.load_current_module_api_notes(
            &module,
            options.search_in_module,
            &options.module_search_paths,
        );
        let files = manager.current_module_api_notes_files().to_vec();
        info!("Module '{}' uses {} API notes file(s)", module.name, files.len());
        report.current_module = Some(CurrentModuleReport {
            name: module.name,
            files,
        });
    }

    let mut missing = false;
    for header in &cli.files {
        if !header.is_file() {
            eprintln!("Error: header not found: {}", header.display());
            missing = true;
            continue;
        }
        let notes = manager
            .find_api_notes_for_file(absolute(header)?)
            .into_iter()
            .map(NotesSummary::from)
            .collect();
        report.headers.push(HeaderReport {
            header: header.clone(),
            notes,
        });
    }

    if cli.stats {
        report.statistics = Some(manager.statistics());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if missing || diagnostics.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

/// Write a default configuration file
fn init_project() -> anyhow::Result<()> {
    let path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("{} already exists", DEFAULT_CONFIG_FILE);
    }
    ApiNotesConfig::init_file(&path)?;
    println!("Created {}", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Load configuration from file (if any) and apply command-line overrides
fn load_config(cli: &Cli) -> anyhow::Result<ApiNotesConfig> {
    let mut config = if let Some(ref project_path) = cli.project {
        ApiNotesConfig::from_file(project_path)
            .map_err(|e| anyhow::anyhow!("Failed to load config file: {}", e))?
    } else {
        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            ApiNotesConfig::from_file(&default_path)
                .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", DEFAULT_CONFIG_FILE, e))?
        } else {
            ApiNotesConfig::default()
        }
    };

    let mut overrides = CliOverrides::default();
    if cli.no_implicit {
        overrides.implicit_api_notes = Some(false);
    }
    if let Some(ref version) = cli.swift_version {
        overrides.swift_version = Some(version.clone());
    }
    if let Some(ref paths) = cli.api_notes_path {
        overrides.module_search_paths = Some(
            paths
                .split(',')
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect(),
        );
    }
    if cli.no_search_in_module {
        overrides.search_in_module = Some(false);
    }
    if let Some(ref naming) = cli.private_notes_naming {
        overrides.private_notes_naming = Some(parse_strict_level(naming)?);
    }
    if cli.no_pretty {
        overrides.pretty = Some(false);
    }

    config.merge_with_cli(overrides);
    Ok(config)
}

fn parse_strict_level(level: &str) -> anyhow::Result<StrictLevel> {
    match level {
        "error" => Ok(StrictLevel::Error),
        "warning" => Ok(StrictLevel::Warning),
        "off" => Ok(StrictLevel::Off),
        _ => Err(anyhow::anyhow!(
            "Invalid level '{}'. Supported levels: error, warning, off",
            level
        )),
    }
}

/// Anchor a command-line path at the working directory so the parent walk
/// reaches the filesystem root
fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| anyhow::anyhow!("Failed to resolve {}: {}", path.display(), e))
}

/// Describe the module being compiled from the command line
fn current_module(cli: &Cli) -> anyhow::Result<Option<Module>> {
    let (Some(name), Some(directory)) = (cli.module.clone(), cli.module_dir.as_deref()) else {
        return Ok(None);
    };
    let directory = absolute(directory)?;

    let mut module = if cli.framework {
        Module::framework(name, directory)
    } else {
        Module::new(name, directory)
    };
    if cli.private_module_map {
        module = module.with_private_module_map();
    }
    if cli.system {
        module = module.system();
    }
    let directory = module.directory().to_path_buf();
    for submodule in &cli.private_submodule {
        module = module
            .with_submodule(Module::new(submodule.clone(), &directory).with_private_module_map());
    }
    Ok(Some(module))
}

fn print_report(report: &Report) {
    if let Some(ref module) = report.current_module {
        if module.files.is_empty() {
            println!("module {}: no API notes", module.name);
        } else {
            for file in &module.files {
                println!("module {}: {}", module.name, file.display());
            }
        }
    }

    for header in &report.headers {
        if header.notes.is_empty() {
            println!("{}: no API notes", header.header.display());
            continue;
        }
        for notes in &header.notes {
            match notes.source {
                Some(ref source) => println!(
                    "{}: {} ({})",
                    header.header.display(),
                    notes.module,
                    source.display()
                ),
                None => println!("{}: {}", header.header.display(), notes.module),
            }
        }
    }

    if let Some(ref stats) = report.statistics {
        println!();
        println!("Statistics:");
        println!("  header notes loaded:            {}", stats.header_notes_loaded);
        println!(
            "  public framework notes loaded:  {}",
            stats.public_framework_notes_loaded
        );
        println!(
            "  private framework notes loaded: {}",
            stats.private_framework_notes_loaded
        );
        println!("  frameworks searched:            {}", stats.frameworks_searched);
        println!("  directories searched:           {}", stats.directories_searched);
        println!("  directory cache hits:           {}", stats.directory_cache_hits);
        println!("  directory cache misses:         {}", stats.directory_cache_misses);
    }
}
