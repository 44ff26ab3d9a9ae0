use defaults_table_format::ReferenceRecord;

/// Render `[<prefix><index>]: <link>` definitions in registration order.
pub fn render_references(links: &[String], label_prefix: &str) -> String {
    let mut output = String::new();
    for (index, link) in links.iter().enumerate() {
        output.push_str(&format!("[{label_prefix}{index}]: {link}\n"));
    }
    output
}

pub fn reference_records(links: &[String], label_prefix: &str) -> Vec<ReferenceRecord> {
    links
        .iter()
        .enumerate()
        .map(|(index, link)| ReferenceRecord {
            label: format!("{label_prefix}{index}"),
            url: link.clone(),
        })
        .collect()
}
