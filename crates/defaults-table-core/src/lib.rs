//! Core orchestration layer for defaults-table.

use defaults_table_config::Config;
use defaults_table_ops::Operations;

/// Table generator bound to a resolved configuration, shared by the CLI and
/// any docs build that embeds it.
pub struct DefaultsTable {
    ops: Operations,
}

impl DefaultsTable {
    /// Bootstrap the generator from configuration.
    pub fn bootstrap(config: Config) -> Self {
        Self {
            ops: Operations::new(config),
        }
    }

    /// Access the operation bundle.
    pub fn operations(&self) -> &Operations {
        &self.ops
    }
}
