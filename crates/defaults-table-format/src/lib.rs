//! Output formats for the generated defaults table.

use serde::Serialize;

/// Supported render targets.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// Aligned markdown table followed by the reference definitions.
    #[default]
    Markdown,
    /// Structured rows and references for tooling.
    Json,
}

/// One generated table row in structured form.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RowRecord {
    pub option: String,
    pub label: String,
    pub default: String,
}

/// A numbered reference definition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReferenceRecord {
    pub label: String,
    pub url: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    rows: &'a [RowRecord],
    references: &'a [ReferenceRecord],
}

/// Serialise rows and references as pretty-printed JSON.
pub fn render_json(rows: &[RowRecord], references: &[ReferenceRecord]) -> serde_json::Result<String> {
    let mut rendered = serde_json::to_string_pretty(&JsonReport { rows, references })?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn json_report_lists_rows_and_references() {
        let rows = vec![RowRecord {
            option: "strict".into(),
            label: "d0".into(),
            default: "`false`".into(),
        }];
        let references = vec![ReferenceRecord {
            label: "d0".into(),
            url: "https://www.typescriptlang.org/tsconfig/#strict".into(),
        }];

        let rendered = render_json(&rows, &references).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["rows"][0]["option"], "strict");
        assert_eq!(value["rows"][0]["label"], "d0");
        assert_eq!(
            value["references"][0]["url"],
            "https://www.typescriptlang.org/tsconfig/#strict"
        );
        assert!(rendered.ends_with('\n'));
    }
}
