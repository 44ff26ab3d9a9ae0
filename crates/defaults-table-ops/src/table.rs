use defaults_table_catalog::OptionEntry;
use defaults_table_config::Config;
use defaults_table_format::RowRecord;
use tracing::debug;

use crate::registry::LinkRegistry;
use crate::rewrite::rewrite_cross_references;

/// Number of leading lines (titles + separator) that alignment never touches.
pub const HEADER_LINES: usize = 2;

/// Result of a single table build: aligned lines plus the links they reference.
#[derive(Clone, Debug)]
pub struct GeneratedTable {
    pub lines: Vec<String>,
    pub rows: Vec<RowRecord>,
    pub references: Vec<String>,
}

/// Build the aligned defaults table for `entries`, in declared order.
pub fn build_table(entries: &[OptionEntry], config: &Config) -> GeneratedTable {
    let mut registry = LinkRegistry::new(&config.links);
    let mut lines = Vec::with_capacity(entries.len() + HEADER_LINES);
    lines.push(format!(
        "| {} | {} |",
        config.table.option_title, config.table.default_title
    ));
    lines.push("| - | - |".to_owned());

    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        let normalized = entry.default.normalize();
        // Links inside the value are registered before the option's own link.
        let default = rewrite_cross_references(&normalized, &mut registry);
        let link = registry.linkify(entry.name);
        lines.push(format!("| {link} | {default} |"));

        let index = registry.resolve(entry.name);
        rows.push(RowRecord {
            option: entry.name.to_owned(),
            label: registry.label(index),
            default,
        });
    }

    align_columns(&mut lines);
    debug!(
        rows = rows.len(),
        links = registry.links().len(),
        "built defaults table"
    );

    GeneratedTable {
        lines,
        rows,
        references: registry.into_links(),
    }
}

/// Locate the second `|` of a line, searching from the third character.
///
/// Returns the character column alongside its byte offset.
pub fn second_pipe(line: &str) -> Option<(usize, usize)> {
    line.char_indices()
        .enumerate()
        .skip(2)
        .find(|(_, (_, ch))| *ch == '|')
        .map(|(column, (byte, _))| (column, byte))
}

/// Pad rows so the boundary between the first and second column lines up.
pub fn align_columns(lines: &mut [String]) {
    let Some(target) = lines
        .iter()
        .filter_map(|line| second_pipe(line))
        .map(|(column, _)| column)
        .max()
    else {
        return;
    };

    for line in lines.iter_mut().skip(HEADER_LINES) {
        if let Some((column, byte)) = second_pipe(line) {
            if column < target {
                line.insert_str(byte, &" ".repeat(target - column));
            }
        }
    }
}
