//! Operation inputs
//!
//! Each input travels with every lifecycle phase of its operation, so the
//! reducer can reconcile from the original argument (delete removes the id
//! that was asked for, not whatever the server echoed back).

use crate::form::FormData;
use crate::thunk::{Payload, ThunkInput};
use folio_core::RecordId;
use serde_json::{Value, json};

impl ThunkInput for () {}

/// Identifier of the record to read or delete.
impl ThunkInput for RecordId {
    fn path_param(&self, name: &str) -> Option<String> {
        (name == "id").then(|| self.to_string())
    }
}

/// Fields for an add/update form without identifier.
impl ThunkInput for FormData {
    fn payload(&self) -> Payload {
        Payload::Form(self.clone())
    }
}

/// Raw JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl ThunkInput for JsonBody {
    fn payload(&self) -> Payload {
        Payload::Json(self.0.clone())
    }
}

/// Admin credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginInput {
    /// Admin email
    pub email: String,
    /// Admin password
    pub password: String,
}

impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ThunkInput for LoginInput {
    fn payload(&self) -> Payload {
        Payload::Json(json!({ "email": self.email, "password": self.password }))
    }
}

/// Replace the record `id` with the fields of `form`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInput {
    /// Record to update
    pub id: RecordId,
    /// New field values
    pub form: FormData,
}

impl ThunkInput for UpdateInput {
    fn path_param(&self, name: &str) -> Option<String> {
        (name == "id").then(|| self.id.to_string())
    }

    fn payload(&self) -> Payload {
        Payload::Form(self.form.clone())
    }
}

/// Add a skill to category `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillInput {
    /// Category receiving the skill
    pub id: RecordId,
    /// Skill fields
    pub skill: Value,
}

impl ThunkInput for SkillInput {
    fn path_param(&self, name: &str) -> Option<String> {
        (name == "id").then(|| self.id.to_string())
    }

    fn payload(&self) -> Payload {
        Payload::Json(self.skill.clone())
    }
}

/// A skill inside a category, with new fields for updates.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillRef {
    /// Owning category
    pub category_id: RecordId,
    /// The skill
    pub skill_id: RecordId,
    /// New skill fields (updates only)
    pub skill: Option<Value>,
}

impl ThunkInput for SkillRef {
    fn path_param(&self, name: &str) -> Option<String> {
        match name {
            "categoryId" => Some(self.category_id.to_string()),
            "skillId" => Some(self.skill_id.to_string()),
            _ => None,
        }
    }

    fn payload(&self) -> Payload {
        self.skill.clone().map_or(Payload::None, Payload::Json)
    }
}

/// Projects to show as featured, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeaturedSelection {
    /// Selected project identifiers
    pub project_ids: Vec<RecordId>,
}

impl ThunkInput for FeaturedSelection {
    fn payload(&self) -> Payload {
        let ids = self
            .project_ids
            .iter()
            .map(|id| Value::String(id.to_string()))
            .collect();
        Payload::Json(json!({ "projectIds": Value::Array(ids) }))
    }
}
