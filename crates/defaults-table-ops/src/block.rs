use defaults_table_config::SyncSettings;

/// Region of a host document delimited by the start and end markers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkerBlock {
    pub start_line: usize,
    pub end_line: usize,
    /// Byte offset just past the start marker line.
    pub start_offset: usize,
    /// Byte offset of the first byte of the end marker line.
    pub end_offset: usize,
}

impl MarkerBlock {
    pub fn body<'a>(&self, contents: &'a str) -> &'a str {
        &contents[self.start_offset..self.end_offset]
    }
}

/// Find the first start marker line and the next end marker line after it.
pub fn locate_block(contents: &str, settings: &SyncSettings) -> Option<MarkerBlock> {
    let mut start: Option<(usize, usize)> = None;
    let mut offset = 0usize;

    for (idx, segment) in contents.split_inclusive('\n').enumerate() {
        let line_number = idx + 1;
        let trimmed = segment.trim();

        match start {
            None if trimmed == settings.start_marker => {
                start = Some((line_number, offset + segment.len()));
            }
            Some((start_line, start_offset)) if trimmed == settings.end_marker => {
                return Some(MarkerBlock {
                    start_line,
                    end_line: line_number,
                    start_offset,
                    end_offset: offset,
                });
            }
            _ => {}
        }

        offset += segment.len();
    }

    None
}

/// Convert generated text to the document's line ending, ending with a terminator.
pub fn normalize_body(generated: &str, line_ending: &str) -> String {
    let mut body = String::with_capacity(generated.len());
    for line in generated.lines() {
        body.push_str(line);
        body.push_str(line_ending);
    }
    body
}

/// Splice `body` into `contents` between the block's markers.
pub fn replace_block(contents: &str, block: &MarkerBlock, body: &str) -> String {
    let mut output = String::with_capacity(contents.len() + body.len());
    output.push_str(&contents[..block.start_offset]);
    output.push_str(body);
    output.push_str(&contents[block.end_offset..]);
    output
}
