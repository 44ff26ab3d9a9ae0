//! Table generation and document sync operations for defaults-table.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use defaults_table_catalog::{OptionEntry, TSCONFIG_DEFAULTS};
use defaults_table_config::Config;
use defaults_table_format::{render_json, OutputFormat};
use defaults_table_utils::{atomic_write, detect_line_ending};
use thiserror::Error;
use tracing::{debug, info};

pub mod block;
pub mod diff;
pub mod references;
pub mod registry;
pub mod rewrite;
pub mod table;

pub use block::{locate_block, MarkerBlock};
pub use references::render_references;
pub use registry::LinkRegistry;
pub use rewrite::rewrite_cross_references;
pub use table::{align_columns, build_table, GeneratedTable};

/// Errors surfaced by generation and sync operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("no '{start}' / '{end}' block found in {path}")]
    MarkersNotFound {
        path: PathBuf,
        start: String,
        end: String,
    },
    #[error("failed to serialise JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for rendering the table.
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    pub format: OutputFormat,
    /// Write the rendered text here instead of returning it for printing.
    pub output_path: Option<PathBuf>,
}

/// Result of a render.
#[derive(Clone, Debug)]
pub struct GenerateOutcome {
    pub rendered: String,
    pub table: GeneratedTable,
    pub written_to: Option<PathBuf>,
}

/// How `sync` treats an out-of-date block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SyncMode {
    #[default]
    Check,
    Update,
    Diff,
}

#[derive(Clone, Debug)]
pub struct SyncOptions {
    pub path: PathBuf,
    pub mode: SyncMode,
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncStatus {
    InSync,
    OutOfSync,
    Updated,
}

#[derive(Clone, Debug)]
pub struct SyncOutcome {
    pub rendered: String,
    pub exit_code: i32,
    pub status: SyncStatus,
    pub diff: Option<String>,
}

/// Operation bundle bound to a configuration and an entry set.
pub struct Operations {
    config: Config,
    entries: &'static [OptionEntry],
}

impl Operations {
    /// Operations over the built-in tsconfig defaults.
    pub fn new(config: Config) -> Self {
        Self::with_entries(config, TSCONFIG_DEFAULTS)
    }

    pub fn with_entries(config: Config, entries: &'static [OptionEntry]) -> Self {
        Self { config, entries }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn entries(&self) -> &[OptionEntry] {
        self.entries
    }

    /// Build the table and render it in the requested format.
    pub fn generate(&self, options: GenerateOptions) -> Result<GenerateOutcome, OperationError> {
        let table = build_table(self.entries, &self.config);
        let prefix = &self.config.links.label_prefix;

        let rendered = match options.format {
            OutputFormat::Markdown => render_markdown(&table, prefix),
            OutputFormat::Json => render_json(
                &table.rows,
                &references::reference_records(&table.references, prefix),
            )?,
        };

        let written_to = match options.output_path {
            Some(path) => {
                let target = self.resolve_path(&path);
                atomic_write(&target, &rendered).map_err(|source| OperationError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path.display(), "wrote defaults table");
                Some(path)
            }
            None => None,
        };

        Ok(GenerateOutcome {
            rendered,
            table,
            written_to,
        })
    }

    /// Compare, rewrite, or diff the generated block embedded in a document.
    pub fn sync(&self, options: SyncOptions) -> Result<SyncOutcome, OperationError> {
        let SyncOptions { path, mode, quiet } = options;
        let target = self.resolve_path(&path);
        let contents = fs::read_to_string(&target).map_err(|source| OperationError::Io {
            path: path.clone(),
            source,
        })?;

        let settings = &self.config.sync;
        let block =
            locate_block(&contents, settings).ok_or_else(|| OperationError::MarkersNotFound {
                path: path.clone(),
                start: settings.start_marker.clone(),
                end: settings.end_marker.clone(),
            })?;

        let table = build_table(self.entries, &self.config);
        let generated = render_markdown(&table, &self.config.links.label_prefix);
        let body = block::normalize_body(&generated, detect_line_ending(&contents));
        let shown = path.display().to_string();

        if block.body(&contents) == body {
            debug!(path = %shown, "block already in sync");
            let rendered = if quiet {
                String::new()
            } else {
                format!("{shown}: defaults table is up to date\n")
            };
            return Ok(SyncOutcome {
                rendered,
                exit_code: 0,
                status: SyncStatus::InSync,
                diff: None,
            });
        }

        match mode {
            SyncMode::Check => Ok(SyncOutcome {
                rendered: format!(
                    "{shown}: defaults table is out of date (lines {}-{})\n",
                    block.start_line, block.end_line
                ),
                exit_code: 1,
                status: SyncStatus::OutOfSync,
                diff: None,
            }),
            SyncMode::Diff => {
                let updated = block::replace_block(&contents, &block, &body);
                let diff = diff::build_unified_diff(&contents, &updated, &shown);
                Ok(SyncOutcome {
                    rendered: diff.clone().unwrap_or_default(),
                    exit_code: 1,
                    status: SyncStatus::OutOfSync,
                    diff,
                })
            }
            SyncMode::Update => {
                let updated = block::replace_block(&contents, &block, &body);
                atomic_write(&target, &updated).map_err(|source| OperationError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %shown, "updated defaults table block");
                let rendered = if quiet {
                    String::new()
                } else {
                    format!("updated {shown}\n")
                };
                Ok(SyncOutcome {
                    rendered,
                    exit_code: 0,
                    status: SyncStatus::Updated,
                    diff: None,
                })
            }
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.sources.working_directory.join(path)
        }
    }
}

/// Join the aligned table, a blank line, and the reference definitions.
pub fn render_markdown(table: &GeneratedTable, label_prefix: &str) -> String {
    let mut output = table.lines.join("\n");
    output.push_str("\n\n");
    output.push_str(&render_references(&table.references, label_prefix));
    output
}
