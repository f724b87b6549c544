//! Page manifest extraction from chapter page scripts.
//!
//! Chapter pages carry their page list and mirror hosts as two inline script
//! statements:
//!
//! ```text
//! rm_h.init( [['x','https://h1.example.org/','auto/01.jpg',800,1200], ...], 0, false);
//! var servers = ['https://h2.example.org/','https://h3.example.org/'];
//! ```
//!
//! The payloads are JavaScript array literals, so they are normalized to JSON
//! before being decoded.

use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::config::MarkerTieBreak;
use crate::error::{Error, Result};
use crate::manifest::item::{Manifest, MirrorSet};

/// Marker of the page list statement.
pub const MANIFEST_MARKER: &str = "rm_h.init";

/// Marker of the mirror list statement.
pub const MIRROR_MARKER: &str = "var servers";

/// Extracts a chapter's manifest from its raw page text.
pub trait PageManifestParser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Manifest>;
}

/// Parser for manifests embedded as inline script assignments.
#[derive(Debug, Clone)]
pub struct ScriptManifestParser {
    tie_break: MarkerTieBreak,
    init_pattern: Regex,
    servers_pattern: Regex,
}

impl ScriptManifestParser {
    pub fn new(tie_break: MarkerTieBreak) -> Self {
        Self {
            tie_break,
            init_pattern: Regex::new(r"rm_h\.init\s*\(\s*(\[.*\])\s*,.*\)").unwrap(),
            servers_pattern: Regex::new(r"var\s+servers\s*=\s*(\[.*\])").unwrap(),
        }
    }

    /// Pick the single line carrying `marker` according to the tie-break mode.
    fn select_line<'a>(&self, lines: &[&'a str], marker: &str) -> Result<&'a str> {
        let matches: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|line| line.contains(marker))
            .collect();

        match matches.as_slice() {
            [] => Err(Error::MissingManifest(format!(
                "no line contains '{}'",
                marker
            ))),
            [line] => Ok(*line),
            [first, .., last] => match self.tie_break {
                MarkerTieBreak::First => {
                    tracing::warn!(
                        "{} lines contain '{}', using the first",
                        matches.len(),
                        marker
                    );
                    Ok(*first)
                }
                MarkerTieBreak::Last => {
                    tracing::warn!(
                        "{} lines contain '{}', using the last",
                        matches.len(),
                        marker
                    );
                    Ok(*last)
                }
                MarkerTieBreak::Reject => Err(Error::Decode(format!(
                    "{} lines contain '{}'",
                    matches.len(),
                    marker
                ))),
            },
        }
    }

    fn payload<'a>(pattern: &Regex, line: &'a str, marker: &str) -> Result<&'a str> {
        pattern
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::Decode(format!("'{}' line has no array payload", marker)))
    }
}

impl Default for ScriptManifestParser {
    fn default() -> Self {
        Self::new(MarkerTieBreak::default())
    }
}

impl PageManifestParser for ScriptManifestParser {
    fn parse(&self, raw: &str) -> Result<Manifest> {
        let lines: Vec<&str> = raw.lines().map(str::trim).collect();

        let init_line = self.select_line(&lines, MANIFEST_MARKER)?;
        let servers_line = self.select_line(&lines, MIRROR_MARKER)?;

        let pages = decode_pages(Self::payload(
            &self.init_pattern,
            init_line,
            MANIFEST_MARKER,
        )?)?;
        let mirrors = decode_mirrors(Self::payload(
            &self.servers_pattern,
            servers_line,
            MIRROR_MARKER,
        )?)?;

        Ok(Manifest { pages, mirrors })
    }
}

/// Decode the page list; each entry's 2nd and 3rd fields form the page URL.
fn decode_pages(payload: &str) -> Result<Vec<Url>> {
    let entries: Vec<Vec<Value>> = serde_json::from_str(&js_to_json(payload))
        .map_err(|e| Error::Decode(format!("page list: {}", e)))?;

    if entries.is_empty() {
        return Err(Error::Decode("page list is empty".into()));
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let base = entry.get(1).and_then(Value::as_str);
            let path = entry.get(2).and_then(Value::as_str);
            match (base, path) {
                (Some(base), Some(path)) => {
                    let joined = format!("{}{}", base, path);
                    Url::parse(&joined).map_err(|e| {
                        Error::Decode(format!("page {} URL '{}': {}", i + 1, joined, e))
                    })
                }
                _ => Err(Error::Decode(format!(
                    "page {} entry lacks string fields: {}",
                    i + 1,
                    Value::Array(entry.clone())
                ))),
            }
        })
        .collect()
}

/// Decode the mirror list into host URLs.
fn decode_mirrors(payload: &str) -> Result<MirrorSet> {
    let servers: Vec<String> = serde_json::from_str(&js_to_json(payload))
        .map_err(|e| Error::Decode(format!("mirror list: {}", e)))?;

    let hosts = servers
        .iter()
        .map(|s| {
            Url::parse(s).map_err(|e| Error::Decode(format!("mirror '{}': {}", s, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    MirrorSet::new(hosts)
}

/// Rewrite a JavaScript array literal as JSON.
///
/// Single-quoted strings become double-quoted and trailing commas are dropped.
fn js_to_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    out.push('"');
                }
                ']' | '}' => {
                    let trimmed = out.trim_end().len();
                    out.truncate(trimmed);
                    if out.ends_with(',') {
                        out.pop();
                    }
                    out.push(c);
                }
                _ => out.push(c),
            },
            Some(q) => match c {
                '\\' => match chars.next() {
                    Some('\'') => out.push('\''),
                    Some(next) => {
                        out.push('\\');
                        out.push(next);
                    }
                    None => out.push('\\'),
                },
                '"' if q == '\'' => out.push_str("\\\""),
                c if c == q => {
                    quote = None;
                    out.push('"');
                }
                _ => out.push(c),
            },
        }
    }

    out
}
