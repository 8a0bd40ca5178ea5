//! Coffee-run files: one order per line, optionally prefixed by a name.
//!
//! ```text
//! # Friday run
//! alice: large cap 2 sugars
//! bob: yfw
//! SC
//! ```

/// One order line of a run file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEntry {
    /// 1-based line number in the file.
    pub line: usize,
    pub name: Option<String>,
    pub text: String,
}

/// Split a run file into entries, skipping blank lines and `#` comments.
pub fn read_run(content: &str) -> Vec<RunEntry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let (name, text) = match line.split_once(':') {
                Some((name, text)) if !name.trim().is_empty() => {
                    (Some(name.trim().to_owned()), text.trim())
                }
                _ => (None, line),
            };
            Some(RunEntry {
                line: i + 1,
                name,
                text: text.to_owned(),
            })
        })
        .collect()
}
