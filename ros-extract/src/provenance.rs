/// Name written into every generated document.
pub const GENERATOR: &str = "MikroTik Config Extractor";

/// Where a document's data came from and when it was rendered.
///
/// The timestamp is supplied by the caller so rendering stays a pure function of
/// its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub host: String,
    pub generated_at: String,
}

impl Provenance {
    pub fn new(host: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            generated_at: generated_at.into(),
        }
    }

    /// Leading comment block for a document titled `title`.
    pub fn comment_lines(&self, title: &str) -> Vec<String> {
        vec![
            format!("# {title}"),
            format!("# Extracted from {} on {}", self.host, self.generated_at),
            format!("# Generated by {GENERATOR}"),
        ]
    }
}
