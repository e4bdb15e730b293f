//! Command-line interface for visualdocs.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::pipeline::{AnalysisService, AnalysisStatus, ProgressEvent, ProgressSink};
use crate::report;
use crate::source::DirectoryFileSource;
use crate::store::{AnalysisStore, JsonFileStore, MemoryStore};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// User id recorded on progress events for local runs.
const LOCAL_USER: &str = "local";

/// Config file template written by `init`.
const CONFIG_TEMPLATE: &str = include_str!("templates/visualdocs.yaml");

/// Source analyzer for VisualDocs project documentation.
///
/// Scans a project once, line by line, and reports functions, classes,
/// interfaces, imports, complexity and lines of code per project.
#[derive(Parser)]
#[command(name = "visualdocs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a project directory and store the result
    Analyze(AnalyzeArgs),
    /// Summarize a project for documentation, splitting internal and external imports
    Docs(DocsArgs),
    /// Show the stored result of a previous analysis
    Show(ShowArgs),
    /// Create a visualdocs.yaml config from the template
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Project directory to analyze
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover in the project)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Project id to store the result under (default: directory name)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Directory holding stored results (overrides the config)
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the docs command.
#[derive(Parser)]
pub struct DocsArgs {
    /// Project directory to summarize
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover in the project)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the show command.
#[derive(Parser)]
pub struct ShowArgs {
    /// Project id used when the result was stored
    pub project_id: String,

    /// Path to config YAML file (default: auto-discover in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding stored results (overrides the config)
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "visualdocs.yaml")]
    pub output: PathBuf,
}

/// Progress sink drawing a terminal progress bar.
pub struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );
        Self { bar }
    }
}

impl Default for ProgressBarSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressBarSink {
    fn emit(&self, event: &ProgressEvent) {
        self.bar.set_position(u64::from(event.progress));
        match (event.completed_files, event.total_files) {
            (Some(done), Some(total)) => self.bar.set_message(format!("{}/{} files", done, total)),
            _ => self.bar.set_message(event.status.to_string()),
        }
        if matches!(
            event.status,
            AnalysisStatus::Completed | AnalysisStatus::Failed
        ) {
            self.bar.finish_and_clear();
        }
    }
}

fn validate_format(format: &str) -> bool {
    if format != "pretty" && format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            format
        );
        return false;
    }
    true
}

/// Load the explicit config, or the one discovered in `root`, and validate it.
fn load_config(
    explicit: Option<&Path>,
    root: &Path,
) -> anyhow::Result<(AnalyzerConfig, Option<PathBuf>)> {
    let (config, path) = match explicit {
        Some(p) => (AnalyzerConfig::parse_file(p)?, Some(p.to_path_buf())),
        None => AnalyzerConfig::load_or_default(root)?,
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid config: {}", e))?;
    Ok((config, path))
}

/// Resolve where stored results live: flag, then config, then platform dir.
fn resolve_store_dir(flag: Option<&Path>, config: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag.or(config) {
        return Ok(dir.to_path_buf());
    }
    JsonFileStore::default_dir()
        .ok_or_else(|| anyhow::anyhow!("cannot determine a data directory, pass --store-dir"))
}

fn default_project_id(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}

/// Canonicalize `path` and require it to be a directory.
fn resolve_project_dir(path: &Path) -> Result<PathBuf, String> {
    let abs_path = path
        .canonicalize()
        .map_err(|e| format!("cannot access path {:?}: {}", path, e))?;
    if !abs_path.is_dir() {
        return Err(format!("{} is not a directory", abs_path.display()));
    }
    Ok(abs_path)
}

/// Run the analyze command.
pub async fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if !validate_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let root = match resolve_project_dir(&args.path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let (config, config_path) = match load_config(args.config.as_deref(), &root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let project_id = args
        .project_id
        .clone()
        .unwrap_or_else(|| default_project_id(&root));
    let store_dir = resolve_store_dir(args.store_dir.as_deref(), config.store_dir.as_deref())?;
    debug!(project_id = %project_id, store = %store_dir.display(), "resolved analysis target");

    let source = DirectoryFileSource::new(project_id.clone(), &root, &config.excluded_paths)?;
    let mut service = AnalysisService::new(Arc::new(source), Arc::new(JsonFileStore::new(store_dir)))
        .with_config(&config);
    if !args.quiet && args.format == "pretty" {
        service = service.with_progress(Arc::new(ProgressBarSink::new()));
    }

    let result = match service.analyze_project(&project_id, LOCAL_USER).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let path_str = args.path.to_string_lossy().to_string();
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());
    match args.format.as_str() {
        "json" => report::write_json(&path_str, config_str.as_deref(), &result)?,
        _ => report::write_pretty(&path_str, config_str.as_deref(), &result),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the docs command.
pub async fn run_docs(args: &DocsArgs) -> anyhow::Result<i32> {
    if !validate_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let root = match resolve_project_dir(&args.path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let (config, config_path) = match load_config(args.config.as_deref(), &root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let project_id = default_project_id(&root);
    let source = DirectoryFileSource::new(project_id.clone(), &root, &config.excluded_paths)?;
    // The documentation path never writes, so any store will do.
    let store = Arc::new(MemoryStore::new());
    let service = AnalysisService::new(Arc::new(source), store).with_config(&config);

    let summary = match service
        .generate_documentation_summary(&project_id, LOCAL_USER)
        .await
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let path_str = args.path.to_string_lossy().to_string();
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());
    match args.format.as_str() {
        "json" => report::write_json(&path_str, config_str.as_deref(), &summary)?,
        _ => report::write_pretty(&path_str, config_str.as_deref(), &summary),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the show command.
pub async fn run_show(args: &ShowArgs) -> anyhow::Result<i32> {
    if !validate_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let (config, _) = match load_config(args.config.as_deref(), Path::new(".")) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let store_dir = resolve_store_dir(args.store_dir.as_deref(), config.store_dir.as_deref())?;
    let store = JsonFileStore::new(store_dir);

    let result = match store.get(&args.project_id).await? {
        Some(r) => r,
        None => {
            eprintln!("Error: no stored analysis for project {:?}", args.project_id);
            eprintln!("Run 'visualdocs analyze <path>' first");
            return Ok(EXIT_ERROR);
        }
    };

    match args.format.as_str() {
        "json" => report::write_json(&args.project_id, None, &result)?,
        _ => report::write_pretty(&args.project_id, None, &result),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: visualdocs analyze . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
