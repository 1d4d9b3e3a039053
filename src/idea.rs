//! The idea record and its on-disk text form.
//!
//! An idea file is a YAML metadata block between two `---` marker lines,
//! a blank line, then the free-text body:
//!
//! ```text
//! ---
//! id: 241025154736
//! title: My First Idea
//! modified: 241025154736
//! tags:
//! - rust
//! - storage
//! ---
//!
//! Body text.
//! ```
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::{IdeaError, Result};

/// Marker line opening and closing the metadata block.
pub const METADATA_MARKER: &str = "---";

/// A single tracked idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    /// `YYMMDDHHMMSS` timestamp assigned at creation
    pub id: u64,
    pub title: String,
    /// Last modification, same format as `id`
    pub modified: u64,
    pub tags: Vec<String>,
    /// Free-text body, kept trimmed
    pub content: String,
}

/// Field order of the emitted metadata block.
#[derive(Serialize)]
struct Metadata<'a> {
    id: u64,
    title: &'a str,
    modified: u64,
    tags: &'a [String],
}

impl Idea {
    /// Creates an idea whose `modified` equals its `id`.
    pub fn new(id: u64, title: impl Into<String>, tags: Vec<String>, content: &str) -> Self {
        Idea {
            id,
            title: title.into(),
            modified: id,
            tags,
            content: content.trim().to_string(),
        }
    }

    /// Parses the text of an idea file.
    ///
    /// `id`, `title` and `modified` are required; `tags` defaults to empty.
    /// `id` and `modified` may be written as YAML integers or as digit
    /// strings. Unknown metadata keys are ignored.
    pub fn parse(text: &str) -> Result<Idea> {
        let (metadata, body) = split_metadata(text)?;

        let value: Value = serde_yaml::from_str(metadata)
            .map_err(|e| IdeaError::format(format!("metadata block is not valid YAML: {}", e)))?;
        let map = match value {
            Value::Mapping(map) => map,
            _ => return Err(IdeaError::format("metadata block is not a key-value mapping")),
        };

        Ok(Idea {
            id: required_u64(&map, "id")?,
            title: required_text(&map, "title")?,
            modified: required_u64(&map, "modified")?,
            tags: optional_tags(&map)?,
            content: body.trim().to_string(),
        })
    }

    /// Renders the idea as file text. The output always parses back to an
    /// equal idea.
    pub fn render(&self) -> Result<String> {
        let metadata = serde_yaml::to_string(&Metadata {
            id: self.id,
            title: &self.title,
            modified: self.modified,
            tags: &self.tags,
        })?;

        let content = self.content.trim();
        if content.is_empty() {
            Ok(format!("{METADATA_MARKER}\n{metadata}{METADATA_MARKER}\n\n"))
        } else {
            Ok(format!(
                "{METADATA_MARKER}\n{metadata}{METADATA_MARKER}\n\n{content}\n"
            ))
        }
    }
}

impl FromStr for Idea {
    type Err = IdeaError;

    fn from_str(s: &str) -> Result<Self> {
        Idea::parse(s)
    }
}

/// Splits file text into the metadata block and the body that follows the
/// closing marker.
fn split_metadata(text: &str) -> Result<(&str, &str)> {
    let text = text.trim_start_matches('\u{feff}').trim_start();

    let Some(after_open) = text.strip_prefix(METADATA_MARKER) else {
        return Err(IdeaError::format("missing opening `---` marker"));
    };
    let (marker_rest, rest) = after_open.split_once('\n').unwrap_or((after_open, ""));
    if !marker_rest.trim().is_empty() {
        return Err(IdeaError::format(
            "opening marker line must contain only `---`",
        ));
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == METADATA_MARKER {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(IdeaError::format("missing closing `---` marker"))
}

fn required<'a>(map: &'a Mapping, key: &str) -> Result<&'a Value> {
    match map.get(key) {
        None | Some(Value::Null) => Err(IdeaError::format(format!(
            "missing required key `{}`",
            key
        ))),
        Some(value) => Ok(value),
    }
}

fn required_u64(map: &Mapping, key: &str) -> Result<u64> {
    let value = required(map, key)?;
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        IdeaError::format(format!(
            "`{}` must be a non-negative integer, found {}",
            key,
            describe(value)
        ))
    })
}

fn required_text(map: &Mapping, key: &str) -> Result<String> {
    let value = required(map, key)?;
    scalar_text(value).ok_or_else(|| {
        IdeaError::format(format!("`{}` must be text, found {}", key, describe(value)))
    })
}

/// A missing or null `tags` key is an empty list; a lone scalar is a single tag.
fn optional_tags(map: &Mapping) -> Result<Vec<String>> {
    match map.get("tags") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| {
                scalar_text(item).ok_or_else(|| {
                    IdeaError::format(format!("tags must be text, found {}", describe(item)))
                })
            })
            .collect(),
        Some(value) => scalar_text(value).map(|tag| vec![tag]).ok_or_else(|| {
            IdeaError::format(format!("`tags` must be a list, found {}", describe(value)))
        }),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
