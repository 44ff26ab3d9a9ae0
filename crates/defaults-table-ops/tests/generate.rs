use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use defaults_table_catalog::TSCONFIG_DEFAULTS;
use defaults_table_format::OutputFormat;
use defaults_table_ops::{GenerateOptions, Operations};
use defaults_table_test_support::{test_config, test_config_in, SAMPLE_ENTRIES};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BASE: &str = "https://www.typescriptlang.org/tsconfig/";

fn sample_ops() -> Operations {
    Operations::with_entries(test_config(), SAMPLE_ENTRIES)
}

#[test]
fn renders_aligned_table_and_references() {
    let outcome = sample_ops()
        .generate(GenerateOptions::default())
        .expect("generate markdown");

    let table = [
        "| Option | Default |".to_string(),
        "| - | - |".to_string(),
        format!("| [`strict`](d0){} | `false` |", " ".repeat(22)),
        format!(
            "| [`alwaysStrict`](d1){} | `true` if [`strict`](d0); `false` otherwise. |",
            " ".repeat(16)
        ),
        "| [`allowSyntheticDefaultImports`](d4) | `true` if [`module`](d2) is `system`, or [`moduleResolution`](d3) is `bundler`; `false` otherwise. |".to_string(),
        format!("| [`module`](d2){} | `CommonJS` |", " ".repeat(22)),
    ]
    .join("\n");
    let references = [
        "strict",
        "alwaysStrict",
        "module",
        "moduleResolution",
        "allowSyntheticDefaultImports",
    ]
    .iter()
    .enumerate()
    .map(|(index, name)| format!("[d{index}]: {BASE}#{name}\n"))
    .collect::<String>();

    assert_eq!(outcome.rendered, format!("{table}\n\n{references}"));
    assert!(outcome.written_to.is_none());
}

#[test]
fn table_has_one_row_per_entry_plus_headers() {
    let ops = Operations::new(test_config());
    let outcome = ops.generate(GenerateOptions::default()).expect("generate");
    assert_eq!(outcome.table.lines.len(), TSCONFIG_DEFAULTS.len() + 2);
    assert_eq!(outcome.table.rows.len(), TSCONFIG_DEFAULTS.len());
}

#[test]
fn references_are_unique() {
    let outcome = Operations::new(test_config())
        .generate(GenerateOptions::default())
        .expect("generate");
    let unique: HashSet<_> = outcome.table.references.iter().collect();
    assert_eq!(unique.len(), outcome.table.references.len());
}

#[test]
fn shared_option_links_reuse_first_index() {
    let outcome = Operations::new(test_config())
        .generate(GenerateOptions::default())
        .expect("generate");

    let strict = format!("{BASE}#strict");
    let index = outcome
        .table
        .references
        .iter()
        .position(|link| *link == strict)
        .expect("strict registered");
    let marker = format!("[`strict`](d{index})");

    for name in ["alwaysStrict", "noImplicitAny", "strictNullChecks"] {
        let row = outcome
            .table
            .rows
            .iter()
            .find(|row| row.option == name)
            .expect("row present");
        assert!(row.default.contains(&marker), "{name}: {}", row.default);
    }
}

#[test]
fn value_links_are_registered_before_option_link() {
    let outcome = Operations::new(test_config())
        .generate(GenerateOptions::default())
        .expect("generate");

    let first_four: Vec<_> = outcome.table.references.iter().take(4).cloned().collect();
    assert_eq!(
        first_four,
        vec![
            format!("{BASE}#esModuleInterop"),
            format!("{BASE}#module"),
            format!("{BASE}#moduleResolution"),
            format!("{BASE}#allowSyntheticDefaultImports"),
        ]
    );
    assert_eq!(outcome.table.rows[0].label, "d3");
}

#[test]
fn every_row_shares_the_same_column_boundary() {
    let outcome = Operations::new(test_config())
        .generate(GenerateOptions::default())
        .expect("generate");

    let columns: HashSet<_> = outcome
        .table
        .lines
        .iter()
        .skip(2)
        .filter_map(|line| defaults_table_ops::table::second_pipe(line))
        .map(|(column, _)| column)
        .collect();
    assert_eq!(columns.len(), 1);
}

#[test]
fn rendering_is_deterministic() {
    let ops = Operations::new(test_config());
    let first = ops.generate(GenerateOptions::default()).expect("first run");
    let second = ops.generate(GenerateOptions::default()).expect("second run");
    assert_eq!(first.rendered, second.rendered);
}

#[test]
fn json_format_reports_rows_and_references() {
    let outcome = sample_ops()
        .generate(GenerateOptions {
            format: OutputFormat::Json,
            output_path: None,
        })
        .expect("generate json");

    let value: serde_json::Value = serde_json::from_str(&outcome.rendered).expect("valid json");
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["rows"][1]["option"], "alwaysStrict");
    assert_eq!(value["rows"][1]["label"], "d1");
    assert_eq!(
        value["rows"][1]["default"],
        "`true` if [`strict`](d0); `false` otherwise."
    );
    assert_eq!(value["references"][4]["label"], "d4");
    assert_eq!(
        value["references"][4]["url"],
        format!("{BASE}#allowSyntheticDefaultImports")
    );
}

#[test]
fn output_path_writes_relative_to_working_directory() {
    let temp = TempDir::new().expect("tempdir");
    let ops = Operations::with_entries(test_config_in(temp.path()), SAMPLE_ENTRIES);

    let outcome = ops
        .generate(GenerateOptions {
            format: OutputFormat::Markdown,
            output_path: Some("docs/defaults.md".into()),
        })
        .expect("generate to file");

    let written = fs::read_to_string(temp.path().join("docs/defaults.md")).expect("read output");
    assert_eq!(written, outcome.rendered);
    assert_eq!(outcome.written_to, Some(PathBuf::from("docs/defaults.md")));
}

#[test]
fn custom_label_prefix_and_titles_flow_through() {
    let mut config = test_config();
    config.links.label_prefix = "ref".into();
    config.table.option_title = "Setting".into();
    let outcome = Operations::with_entries(config, SAMPLE_ENTRIES)
        .generate(GenerateOptions::default())
        .expect("generate");

    assert!(outcome.rendered.starts_with("| Setting | Default |\n"));
    assert!(outcome.rendered.contains("[`alwaysStrict`](ref1)"));
    assert!(outcome.rendered.contains(&format!("[ref0]: {BASE}#strict\n")));
}
