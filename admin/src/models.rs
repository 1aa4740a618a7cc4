//! Backend records
//!
//! The admin client does not interpret content fields; it only needs the
//! backend identifier (`_id`) to reconcile lists. Every record is kept as its
//! identifier plus the remaining JSON fields, so nothing the backend sends is
//! lost on the way to the CLI output.

use folio_core::{Identified, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A backend document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Backend identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Every other field
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// A record with an identifier and no fields.
    #[must_use]
    pub fn with_id(id: impl Into<RecordId>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Map::new(),
        }
    }

    /// Add a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// A field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Identified for Record {
    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// About section content
pub type About = Record;
/// Hero banner content
pub type Hero = Record;
/// Public contact details
pub type ContactDetails = Record;
/// Message left through the public contact form
pub type ContactMessage = Record;
/// Education entry
pub type Education = Record;
/// Portfolio project
pub type Project = Record;
/// Offered service
pub type Service = Record;
/// Skill category with its embedded skills
pub type SkillCategory = Record;
/// One skill inside a category
pub type Skill = Record;
/// Logged-in admin account
pub type AdminUser = Record;

/// Payload of login and session checks: `{ user }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    /// The admin, when the backend returned one
    #[serde(default)]
    pub user: Option<AdminUser>,
}

/// A payload the backend sends either as a list or as a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A list of documents
    Many(Vec<T>),
    /// One bare document
    One(T),
}

impl<T> OneOrMany<T> {
    /// The documents as a list.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}
