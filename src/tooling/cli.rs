//! CLI Tooling
//!
//! Command-line front end over the parsers, the session and the collaborator
//! formats. Every command reads model output from files and prints a result.

use crate::action::vocabulary::VocabularyPreset;
use crate::action::Step;
use crate::config::{ConfigLoader, StudioConfig};
use crate::deploy::{ProjectId, UploadManifest};
use crate::error::ApiError;
use crate::session::{BatchDisposition, Session, SessionSnapshot};
use crate::tree::builder::BatchReport;
use crate::tree::mount::to_mount;
use crate::tree::{render_tree, FileTree};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Code Studio CLI - build project trees from model output
#[derive(Parser)]
#[command(name = "codestudio")]
#[command(about = "Turn streamed model output into a project file tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tag vocabulary preset (overrides parser.vocabulary)
    #[arg(long, value_enum)]
    pub vocabulary: Option<VocabularyPreset>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line overrides into a loaded configuration.
    pub fn apply_overrides(&self, config: &mut StudioConfig) {
        if let Some(vocabulary) = self.vocabulary {
            config.parser.vocabulary = vocabulary;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a response for actions and list them as steps
    Parse {
        /// File holding the model response
        file: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Apply responses as ordered batches and print the resulting tree
    Build {
        /// Response files, one batch each, applied in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Build a tree from a well-formed XML document
    Ingest {
        /// XML document
        file: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the runtime mount description of the built tree
    Mount {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the upload manifest of the built tree
    Manifest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Project id (generated when omitted)
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Show the effective configuration as TOML
    Config,
}

/// CLI context holding the effective configuration
pub struct CliContext {
    config: StudioConfig,
}

impl CliContext {
    /// Load configuration from `config_path`, or from the current directory's layers.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&std::env::current_dir()?)?,
        };
        Ok(Self { config })
    }

    /// Context over an already-resolved configuration.
    pub fn with_config(config: StudioConfig) -> Result<Self, ApiError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut StudioConfig {
        &mut self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::Parse { file, format } => self.handle_parse(file, format),
            Commands::Build { files, format } => self.handle_build(files, format),
            Commands::Ingest { file, format } => self.handle_ingest(file, format),
            Commands::Mount { files } => {
                let (snapshot, _) = self.build_session(files)?;
                Ok(serde_json::to_string_pretty(&to_mount(&snapshot.tree))?)
            }
            Commands::Manifest { files, project_id } => {
                self.handle_manifest(files, project_id.as_deref())
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn handle_parse(&self, file: &Path, format: &str) -> Result<String, ApiError> {
        let text = std::fs::read_to_string(file)?;
        let steps = self.config.parser.scanner()?.scan_steps(&text);
        match format {
            "text" => Ok(format_steps_text(&steps)),
            "json" => Ok(serde_json::to_string_pretty(&steps)?),
            _ => Err(invalid_format(format)),
        }
    }

    fn handle_build(&self, files: &[PathBuf], format: &str) -> Result<String, ApiError> {
        let (snapshot, report) = self.build_session(files)?;
        match format {
            "text" => Ok(format_build_text(&snapshot.tree, &report)),
            "json" => Ok(serde_json::to_string_pretty(&json!({
                "snapshot": &*snapshot,
                "conflicts": report.conflicts,
                "rejected": report.rejected,
            }))?),
            _ => Err(invalid_format(format)),
        }
    }

    fn handle_ingest(&self, file: &Path, format: &str) -> Result<String, ApiError> {
        let xml = std::fs::read_to_string(file)?;
        let (tree, report) = self.config.parser.ingestor()?.ingest_with_report(&xml)?;
        match format {
            "text" => Ok(format_build_text(&tree, &report)),
            "json" => Ok(serde_json::to_string_pretty(&tree)?),
            _ => Err(invalid_format(format)),
        }
    }

    fn handle_manifest(
        &self,
        files: &[PathBuf],
        project_id: Option<&str>,
    ) -> Result<String, ApiError> {
        let (snapshot, _) = self.build_session(files)?;
        let project_id = match project_id {
            Some(id) => ProjectId::parse(id)?,
            None => ProjectId::generate(&snapshot.tree),
        };
        let manifest = UploadManifest::from_tree(project_id, &snapshot.tree);
        Ok(serde_json::to_string_pretty(&manifest)?)
    }

    /// Feed each file through a fresh session as one batch, in argument order.
    fn build_session(
        &self,
        files: &[PathBuf],
    ) -> Result<(std::sync::Arc<SessionSnapshot>, BatchReport), ApiError> {
        let scanner = self.config.parser.scanner()?;
        let session = Session::new(self.config.session.clone());
        let mut report = BatchReport::default();
        for file in files {
            let text = std::fs::read_to_string(file)?;
            let request = session.begin_request();
            match session.ingest_response(request, &scanner, &text) {
                BatchDisposition::Applied(batch) => report.merge(batch),
                other => {
                    return Err(ApiError::Session(format!(
                        "Batch from {} was not applied: {:?}",
                        file.display(),
                        other
                    )))
                }
            }
        }
        Ok((session.snapshot(), report))
    }
}

fn invalid_format(format: &str) -> ApiError {
    ApiError::ConfigError(format!(
        "Invalid format: '{}'. Must be 'text' or 'json'.",
        format
    ))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Parse { .. } => "parse",
        Commands::Build { .. } => "build",
        Commands::Ingest { .. } => "ingest",
        Commands::Mount { .. } => "mount",
        Commands::Manifest { .. } => "manifest",
        Commands::Config => "config",
    }
}

fn format_steps_text(steps: &[Step]) -> String {
    if steps.is_empty() {
        return "No actions found.".to_string();
    }
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}: {}", i + 1, step.title(), step.detail()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_build_text(tree: &FileTree, report: &BatchReport) -> String {
    let mut out = render_tree(tree);
    out.push_str(&format!(
        "\n{} files, {} created, {} updated",
        tree.file_count(),
        report.created.len(),
        report.updated.len()
    ));
    for command in &report.commands {
        out.push_str(&format!("\nRun: {}", command));
    }
    for conflict in &report.conflicts {
        out.push_str(&format!("\nConflict: {}: {}", conflict.path, conflict.reason));
    }
    for rejected in &report.rejected {
        out.push_str(&format!("\nRejected: {}: {}", rejected.path, rejected.reason));
    }
    out
}
