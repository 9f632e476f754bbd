//! Collaborator interfaces
//!
//! The preview runtime and the build/deploy service live outside this crate.
//! These traits describe what the session hands them; the driver functions
//! feed a published snapshot through them.

use crate::deploy::{ProjectId, UploadManifest};
use crate::error::ApiError;
use crate::session::SessionSnapshot;
use crate::tree::mount::{to_mount, MountTree};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

/// Sandboxed runtime that serves the live preview
#[async_trait]
pub trait PreviewRuntime: Send + Sync {
    /// Replace the runtime's file system with `tree`.
    async fn mount(&self, tree: &MountTree) -> anyhow::Result<()>;

    /// Run a shell command to completion and return its exit code.
    async fn run(&self, command: &str) -> anyhow::Result<i32>;
}

/// Service that builds and hosts an uploaded project
#[async_trait]
pub trait DeployService: Send + Sync {
    /// Upload and deploy; returns the public URL.
    async fn deploy(&self, manifest: &UploadManifest) -> anyhow::Result<String>;
}

/// Exit status of one forwarded command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub exit_code: i32,
}

/// Outcome of syncing a snapshot into the preview runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewReport {
    pub files_mounted: usize,
    pub commands: Vec<CommandResult>,
    /// Commands not run because an earlier one failed
    pub skipped: Vec<String>,
}

impl PreviewReport {
    pub fn succeeded(&self) -> bool {
        self.skipped.is_empty() && self.commands.iter().all(|c| c.exit_code == 0)
    }
}

/// Mount `snapshot` and run `commands` in order, stopping after the first non-zero exit.
pub async fn sync_preview(
    runtime: &dyn PreviewRuntime,
    snapshot: &SessionSnapshot,
    commands: &[String],
) -> Result<PreviewReport, ApiError> {
    let mount = to_mount(&snapshot.tree);
    runtime
        .mount(&mount)
        .await
        .map_err(|e| ApiError::Runtime(format!("Mount failed: {:#}", e)))?;

    let mut report = PreviewReport {
        files_mounted: snapshot.tree.file_count(),
        ..PreviewReport::default()
    };
    for (index, command) in commands.iter().enumerate() {
        let exit_code = runtime
            .run(command)
            .await
            .map_err(|e| ApiError::Runtime(format!("Command '{}' failed to start: {:#}", command, e)))?;
        report.commands.push(CommandResult {
            command: command.clone(),
            exit_code,
        });
        if exit_code != 0 {
            warn!(command = %command, exit_code, "Preview command failed");
            report.skipped = commands[index + 1..].to_vec();
            break;
        }
    }
    Ok(report)
}

/// A finished deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
    pub project_id: ProjectId,
    pub url: String,
    pub files: usize,
}

/// Upload `snapshot` under `project_id` (generated when absent) and deploy it.
pub async fn deploy_snapshot(
    service: &dyn DeployService,
    snapshot: &SessionSnapshot,
    project_id: Option<ProjectId>,
) -> Result<Deployment, ApiError> {
    let project_id = project_id.unwrap_or_else(|| ProjectId::generate(&snapshot.tree));
    let manifest = UploadManifest::from_tree(project_id.clone(), &snapshot.tree);
    if manifest.is_empty() {
        return Err(ApiError::Deploy("Nothing to deploy: tree has no file content".to_string()));
    }

    let url = service
        .deploy(&manifest)
        .await
        .map_err(|e| ApiError::Deploy(format!("{:#}", e)))?;
    info!(project_id = %project_id, url = %url, files = manifest.len(), "Deployed");
    Ok(Deployment {
        project_id,
        url,
        files: manifest.len(),
    })
}
