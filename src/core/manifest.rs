//! Repository list parsing and validation
//!
//! The config file (`repos.jsonc` by default) is a top-level array of
//! repository entries. JSON with comments is the native format; files ending
//! in `.yaml`/`.yml` are read as YAML instead.

use json_comments::{strip_comments_in_place, CommentSettings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::repo::{Remote, RemoteRole, RepoRecord, RepoTable};

/// Errors that can occur when loading or validating the repository list
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// One repository entry as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    /// Short project name (defaults to the folder's last component)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Top-level folder of the working copy, `~` allowed
    pub folder: String,
    /// Remotes; the `sym` field marks upstream and mine
    #[serde(default)]
    pub remotes: Vec<Remote>,
    /// Role of the remote to sync against by default
    pub remote_default: RemoteRole,
    /// Branch followed upstream
    pub branch_main: String,
    /// Branch used locally (defaults to `branchMain`)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch_use: String,
    /// Not a submodule; cloned on its own
    #[serde(default, rename = "isYolo", alias = "isStandalone")]
    pub standalone: bool,
}

impl RepoConfig {
    /// Entry for `folder` following `branch_main`, default remote `upstream`
    pub fn new(folder: &str, branch_main: &str) -> Self {
        Self {
            name: String::new(),
            folder: folder.to_string(),
            remotes: Vec::new(),
            remote_default: RemoteRole::Upstream,
            branch_main: branch_main.to_string(),
            branch_use: String::new(),
            standalone: false,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn remote(mut self, sym: &str, alias: &str, url: &str) -> Self {
        self.remotes.push(Remote {
            sym: RemoteRole::from(sym),
            alias: alias.to_string(),
            url: url.to_string(),
        });
        self
    }

    pub fn remote_default(mut self, sym: &str) -> Self {
        self.remote_default = RemoteRole::from(sym);
        self
    }

    pub fn branch_use(mut self, branch: &str) -> Self {
        self.branch_use = branch.to_string();
        self
    }

    pub fn standalone(mut self) -> Self {
        self.standalone = true;
        self
    }
}

/// The parsed repository list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub repos: Vec<RepoConfig>,
}

impl Manifest {
    /// Load the list from a file, choosing the format by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        debug!(path = %path.display(), is_yaml, "loading repository list");
        if is_yaml {
            Self::parse_yaml(&content)
        } else {
            Self::parse_jsonc(&content)
        }
    }

    /// Parse JSON that may contain comments and trailing commas
    pub fn parse_jsonc(jsonc: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(&strip_jsonc(jsonc)?)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse the YAML form
    pub fn parse_yaml(yaml: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate every entry
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.repos.is_empty() {
            return Err(ManifestError::ValidationError(
                "Config must list at least one repository".to_string(),
            ));
        }

        for (index, repo) in self.repos.iter().enumerate() {
            validate_repo_config(index, repo)?;
        }

        Ok(())
    }

    /// Resolve folders against `home` and freeze the list into a shared table.
    ///
    /// Two entries resolving to the same folder would let two tasks mutate one
    /// working copy at once, so that is rejected here.
    pub fn resolve(&self, home: &Path) -> Result<RepoTable, ManifestError> {
        let records: Vec<RepoRecord> = self
            .repos
            .iter()
            .enumerate()
            .map(|(index, config)| RepoRecord::from_config(index, config, home))
            .collect();

        let mut seen = HashMap::new();
        for record in &records {
            if let Some(first) = seen.insert(record.path.clone(), record.index) {
                return Err(ManifestError::ValidationError(format!(
                    "Entries {} and {} both use folder {}",
                    first,
                    record.index,
                    record.path.display()
                )));
            }
        }

        Ok(Arc::from(records))
    }
}

fn validate_repo_config(index: usize, repo: &RepoConfig) -> Result<(), ManifestError> {
    let label = if repo.name.is_empty() {
        format!("#{}", index)
    } else {
        format!("#{} ({})", index, repo.name)
    };

    if repo.folder.is_empty() {
        return Err(ManifestError::ValidationError(format!(
            "Repository {} must have a folder",
            label
        )));
    }

    if repo.branch_main.is_empty() {
        return Err(ManifestError::ValidationError(format!(
            "Repository {} must have a branchMain",
            label
        )));
    }

    if matches!(&repo.remote_default, RemoteRole::AdHoc(sym) if sym.is_empty()) {
        return Err(ManifestError::ValidationError(format!(
            "Repository {} must have a remoteDefault",
            label
        )));
    }

    for remote in &repo.remotes {
        if remote.alias.is_empty() || remote.url.is_empty() {
            return Err(ManifestError::ValidationError(format!(
                "Repository {} has a {} remote with empty alias or url",
                label, remote.sym
            )));
        }
    }

    // Lookups take the first match, so duplicates only shadow; not fatal.
    for role in [RemoteRole::Upstream, RemoteRole::Mine] {
        let count = repo.remotes.iter().filter(|r| r.sym == role).count();
        if count > 1 {
            warn!(repo = %label, %role, count, "duplicate remote role, using the first");
        }
    }

    Ok(())
}

/// Blank out `//` and `/* */` comments and trailing commas outside strings.
///
/// Everything removed becomes whitespace, so parse errors still point at the
/// right line and column of the file as written.
pub fn strip_jsonc(input: &str) -> Result<String, ManifestError> {
    let mut out = input.to_string();
    strip_comments_in_place(&mut out, CommentSettings::c_style(), true)
        .map_err(|e| ManifestError::ValidationError(format!("malformed comment: {}", e)))?;
    Ok(out)
}
