use serde::{Deserialize, Deserializer, Serialize};

use super::errors::LeafError;

/// A scalar the backend sends either as a number or as text.
///
/// Timestamps arrive as epoch millis or date strings, and the edit form
/// posts numeric fields as whatever the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// One bookmarked item as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: u64,
    #[serde(default)]
    pub created_at: Option<FieldValue>,
    #[serde(flatten)]
    pub fields: LeafFields,
}

/// The editable part of a [`Leaf`]: everything except the backend-assigned
/// identifier and creation time. Used as the body of create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafFields {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub preview_picture: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub updated_at: Option<FieldValue>,
    #[serde(deserialize_with = "null_as_default")]
    pub wallabag_is_archived: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub published_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_email: String,
    pub user_id: Option<FieldValue>,
    pub http_status: Option<FieldValue>,
    #[serde(deserialize_with = "null_as_default")]
    pub mimetype: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    pub wallabag_created_at: Option<FieldValue>,
    pub wallabag_updated_at: Option<FieldValue>,
    pub last_sourced_from_wallabag: Option<FieldValue>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Leaf {
    /// Returns this record with its editable fields replaced.
    /// Identifier and creation time are preserved.
    pub fn apply(&self, fields: &LeafFields) -> Leaf {
        Leaf {
            id: self.id,
            created_at: self.created_at.clone(),
            fields: fields.clone(),
        }
    }
}

impl LeafFields {
    /// Editing snapshot of an existing record.
    pub fn from_leaf(leaf: &Leaf) -> Self {
        leaf.fields.clone()
    }

    /// Required-field check run before anything is sent to the backend.
    pub fn validate(&self) -> Result<(), LeafError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.domain_name.trim().is_empty() {
            missing.push("domain_name");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LeafError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Parses the comma-separated tag input of the edit form.
/// Each tag is trimmed; empty pieces are dropped.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins tags back into the edit form's text representation.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
