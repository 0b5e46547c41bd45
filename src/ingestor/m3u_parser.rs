use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::models::PlaylistEntry;

/// Directive that carries an entry's duration, attributes and title
pub const EXTINF_DIRECTIVE: &str = "#EXTINF";

// Title is everything after the first comma. Attribute values containing a
// comma before the real separator end up in the title.
const TITLE_PATTERN: &str = r"^#EXTINF[^,]*,(.*)$";
const ATTRIBUTE_PATTERN: &str = r#"([a-zA-Z0-9-]+)="([^"]*)""#;

/// Line-oriented M3U indexer.
///
/// Parsing is total: malformed metadata degrades to fewer entries, never to
/// an error.
#[derive(Debug, Clone)]
pub struct M3uParser {
    title_re: Regex,
    attribute_re: Regex,
}

/// Metadata waiting for its URL line
#[derive(Debug)]
struct PendingEntry {
    title: String,
    attributes: BTreeMap<String, String>,
}

impl Default for M3uParser {
    fn default() -> Self {
        Self::new()
    }
}

impl M3uParser {
    pub fn new() -> Self {
        Self {
            title_re: Regex::new(TITLE_PATTERN).expect("title pattern is valid"),
            attribute_re: Regex::new(ATTRIBUTE_PATTERN).expect("attribute pattern is valid"),
        }
    }

    /// Shared parser instance with the patterns compiled once
    pub fn shared() -> &'static M3uParser {
        static PARSER: OnceLock<M3uParser> = OnceLock::new();
        PARSER.get_or_init(M3uParser::new)
    }

    /// Parse playlist text into entries, in the order their URL lines appear
    pub fn parse(&self, content: &str) -> Vec<PlaylistEntry> {
        let mut entries = Vec::new();
        let mut pending: Option<PendingEntry> = None;
        let mut dropped_metadata = 0usize;
        // A UTF-8 byte order mark would otherwise hide the first directive
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        // `lines` splits on both "\n" and "\r\n"
        for raw_line in content.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with(EXTINF_DIRECTIVE) {
                if pending.replace(self.parse_metadata(line)).is_some() {
                    dropped_metadata += 1;
                }
            } else if !line.starts_with('#') {
                if let Some(meta) = pending.take() {
                    entries.push(PlaylistEntry {
                        title: meta.title,
                        attributes: meta.attributes,
                        url: line.to_string(),
                    });
                }
            }
        }

        if pending.is_some() {
            dropped_metadata += 1;
        }

        debug!(
            "M3U indexing completed: {} entries, {} metadata lines without a URL",
            entries.len(),
            dropped_metadata
        );

        entries
    }

    fn parse_metadata(&self, line: &str) -> PendingEntry {
        let title = self
            .title_re
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        PendingEntry {
            title,
            attributes: self.parse_attributes(line),
        }
    }

    /// Collect every `key="value"` pair on the line. Later keys overwrite
    /// earlier ones; values are taken verbatim.
    pub fn parse_attributes(&self, line: &str) -> BTreeMap<String, String> {
        self.attribute_re
            .captures_iter(line)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect()
    }
}

/// Parse playlist text with the shared parser
pub fn parse_playlist(content: &str) -> Vec<PlaylistEntry> {
    M3uParser::shared().parse(content)
}
