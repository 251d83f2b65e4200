//! Note record type definitions.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One row of the `notes` table.
///
/// `metadata` is the column exactly as stored and is what gets exported.
/// The typed view used for rendering is derived from it leniently: a field
/// of unexpected type reads as absent without touching the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub character_id: i64,
    pub note_id: i64,
    pub created_at: String,
    metadata: Option<Value>,
    #[serde(skip)]
    view: Option<NoteMetadata>,
}

impl NoteRecord {
    pub fn new(
        character_id: i64,
        note_id: i64,
        created_at: impl Into<String>,
        metadata: Option<Value>,
    ) -> Self {
        let view = metadata.as_ref().and_then(NoteMetadata::from_value);
        Self {
            character_id,
            note_id,
            created_at: created_at.into(),
            metadata,
            view,
        }
    }

    /// `<characterId>-<noteId>`, the stem used for every per-note entry.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.character_id, self.note_id)
    }

    /// The stored metadata, `None` when absent or not JSON.
    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// Typed view of the `content` object, if any.
    pub fn content(&self) -> Option<&NoteContent> {
        self.view.as_ref().and_then(|m| m.content.as_ref())
    }

    /// The stored `content` object with its original keys, order and values.
    pub fn raw_content(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()?.get("content")?.as_object()
    }
}

/// Typed view of the `metadata` column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteMetadata {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content: Option<NoteContent>,
}

impl NoteMetadata {
    /// `None` only when `value` is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}

/// Note body and its publishing metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteContent {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body text in Markdown.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,

    #[serde(
        rename = "_xlog_slug",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

/// A file attached to a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Attachment {
    /// Where the attachment lives; `address` wins over inline `content`.
    pub fn locator(&self) -> Option<&str> {
        self.address
            .as_deref()
            .or(self.content.as_deref())
            .filter(|l| !l.is_empty())
    }
}

/// Read a field as `T`, or as absent when it has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Read an array keeping only the elements that fit `T`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}
