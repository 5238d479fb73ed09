//! Parsing service replies into enhancements.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::error::{EnhanceError, EnhanceResult};

/// Suggested content for one named node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Enhancement {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Label to URL. Blank URLs are dropped on parse.
    #[serde(default, alias = "suggested_links", deserialize_with = "deserialize_links")]
    pub links: IndexMap<String, String>,
}

impl Enhancement {
    /// The description, if it carries any text.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// A reply must carry an `enhancements` list; an empty list is valid.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnhancementReply {
    pub enhancements: Vec<Enhancement>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLinks {
    Labelled(IndexMap<String, Option<String>>),
    Listed(Vec<Option<String>>),
}

fn deserialize_links<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let non_blank = |url: Option<String>| url.filter(|u| !u.trim().is_empty());

    Ok(match Option::<RawLinks>::deserialize(deserializer)? {
        None => IndexMap::new(),
        Some(RawLinks::Labelled(map)) => map
            .into_iter()
            .filter_map(|(label, url)| non_blank(url).map(|u| (label, u)))
            .collect(),
        Some(RawLinks::Listed(list)) => list
            .into_iter()
            .filter_map(non_blank)
            .enumerate()
            .map(|(i, url)| (format!("Link {}", i + 1), url))
            .collect(),
    })
}

/// Length of the balanced `{...}` at the start of `text`, ignoring braces
/// inside JSON strings. `None` when it never closes.
fn balanced_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Every top-level balanced `{...}` in `text`, in order.
pub fn json_objects(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let start = rest.find('{')?;
        let candidate = &rest[start..];
        let len = balanced_len(candidate)?;
        rest = &candidate[len..];
        Some(&candidate[..len])
    })
}

/// Parse a reply as JSON, falling back to the first embedded object that
/// has the reply shape. Objects without `enhancements` are skipped.
pub fn parse_reply(text: &str) -> EnhanceResult<EnhancementReply> {
    let direct = serde_json::from_str::<EnhancementReply>(text.trim());
    let first_error = match direct {
        Ok(reply) => return Ok(reply),
        Err(e) => e,
    };

    let mut last_error = None;
    for object in json_objects(text) {
        match serde_json::from_str(object) {
            Ok(reply) => return Ok(reply),
            Err(e) => last_error = Some(e),
        }
    }

    let reason = match last_error {
        Some(e) => e.to_string(),
        None if text.contains('{') => first_error.to_string(),
        None => "no JSON object in reply".to_string(),
    };
    Err(EnhanceError::malformed(reason, text))
}
