//! Platform payload models
//!
//! Submissions and comments keep the original JSON object next to the few
//! fields the archive needs, so both the normalized projection and the raw
//! archival copy can be produced from one value.

use crate::sources::{SourceError, SourceResult};
use serde_json::{Map, Value};

const REDDIT_ORIGIN: &str = "https://www.reddit.com";

/// A forum submission as returned by the search API
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: String,
    pub created_utc: i64,
    pub title: String,
    /// Absent for link posts and for some archived entries
    pub selftext: Option<String>,
    /// Full link to the submission page
    pub permalink: String,
    /// The original payload
    pub raw: Map<String, Value>,
}

impl Submission {
    /// Decodes a search API entry
    pub fn from_payload(payload: Value) -> SourceResult<Self> {
        let raw = into_object(payload, "submission")?;

        let id = required_str(&raw, "id")?;
        let created_utc = required_timestamp(&raw, "created_utc")?;
        let title = optional_str(&raw, "title").unwrap_or_default();
        let selftext = optional_str(&raw, "selftext");
        let permalink = optional_str(&raw, "full_link")
            .or_else(|| optional_str(&raw, "permalink").map(|p| absolute_link(&p)))
            .unwrap_or_else(|| format!("{}/comments/{}", REDDIT_ORIGIN, id));

        Ok(Self {
            id,
            created_utc,
            title,
            selftext,
            permalink,
            raw,
        })
    }
}

/// A single comment of a submission's tree
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    /// Fullname of the parent: `t3_` for the submission, `t1_` for a comment
    pub parent_id: String,
    pub body: String,
    pub created_utc: i64,
    pub permalink: String,
    /// The original payload without its nested `replies` listing
    pub raw: Map<String, Value>,
}

impl Comment {
    /// Decodes the `data` object of a `t1` thing
    pub fn from_payload(payload: Value) -> SourceResult<Self> {
        let mut raw = into_object(payload, "comment")?;
        raw.remove("replies");

        let id = required_str(&raw, "id")?;
        let parent_id = required_str(&raw, "parent_id")?;
        let created_utc = required_timestamp(&raw, "created_utc")?;
        let body = optional_str(&raw, "body").unwrap_or_default();
        let permalink = optional_str(&raw, "permalink").unwrap_or_default();

        Ok(Self {
            id,
            parent_id,
            body,
            created_utc,
            permalink,
            raw,
        })
    }
}

/// The comments of one submission, flattened in breadth-first order
///
/// Parent links are preserved through `Comment::parent_id`, so the tree can be
/// rebuilt from the flat list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentForest {
    pub comments: Vec<Comment>,
    /// Placeholder nodes left unexpanded because of the cap
    pub collapsed: usize,
}

impl CommentForest {
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

fn into_object(payload: Value, what: &str) -> SourceResult<Map<String, Value>> {
    match payload {
        Value::Object(map) => Ok(map),
        other => Err(SourceError::Decode(format!(
            "{} payload is not an object: {}",
            what, other
        ))),
    }
}

fn optional_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn required_str(map: &Map<String, Value>, key: &str) -> SourceResult<String> {
    optional_str(map, key).ok_or_else(|| SourceError::Decode(format!("missing string field `{}`", key)))
}

/// Timestamps arrive as integers from Pushshift and as floats from Reddit
fn required_timestamp(map: &Map<String, Value>, key: &str) -> SourceResult<i64> {
    let value = map
        .get(key)
        .ok_or_else(|| SourceError::Decode(format!("missing timestamp field `{}`", key)))?;

    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .ok_or_else(|| SourceError::Decode(format!("field `{}` is not a timestamp: {}", key, value)))
}

fn absolute_link(permalink: &str) -> String {
    if permalink.starts_with("http") {
        permalink.to_string()
    } else {
        format!("{}{}", REDDIT_ORIGIN, permalink)
    }
}
