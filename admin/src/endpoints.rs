//! Backend REST paths
//!
//! Paths are relative to the configured base URL. Templates name their
//! parameters in braces (`{id}`, `{categoryId}`) and are rendered from the
//! operation input. Templates are followed literally: several backend routes
//! glue the identifier straight onto the path without a separator.

use crate::error::RequestError;

/// A backend path, possibly with `{name}` placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint(&'static str);

impl Endpoint {
    /// Wrap a path template.
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// The raw template.
    #[must_use]
    pub const fn template(self) -> &'static str {
        self.0
    }

    /// Whether the path has placeholders.
    #[must_use]
    pub fn is_template(self) -> bool {
        self.0.contains('{')
    }

    /// Substitute every placeholder with the value `param` returns for its name.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Construction`] if a parameter is missing or a
    /// placeholder is not closed.
    pub fn render<F>(self, param: F) -> Result<String, RequestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rendered = String::with_capacity(self.0.len() + 24);
        let mut rest = self.0;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                RequestError::Construction(format!("Unclosed placeholder in path {}", self.0))
            })?;
            let name = &after[..close];
            let value = param(name).ok_or_else(|| {
                RequestError::Construction(format!("Missing path parameter `{name}` for {}", self.0))
            })?;
            rendered.push_str(&value);
            rest = &after[close + 1..];
        }

        rendered.push_str(rest);
        Ok(rendered)
    }
}

/// Admin account and session
pub mod auth {
    use super::Endpoint;

    /// `POST` credentials, sets the session cookie
    pub const LOGIN: Endpoint = Endpoint::new("/api/v1/admin/login");
    /// `GET` the logged-in admin
    pub const GET_ADMIN_USER: Endpoint = Endpoint::new("/api/v1/admin/get-admin-user");
    /// `POST` end the session
    pub const LOGOUT: Endpoint = Endpoint::new("/api/v1/admin/logout");
    /// `POST` create the first admin account
    pub const INITIALIZE: Endpoint = Endpoint::new("/api/v1/admin/initialize");
    /// `POST` send a one-time password
    pub const GENERATE_OTP: Endpoint = Endpoint::new("/api/v1/admin/generate-otp");
    /// `POST` verify OTP and change email
    pub const VERIFY_OTP_UPDATE_EMAIL: Endpoint =
        Endpoint::new("/api/v1/admin/verify-otp-update-email");
    /// `POST` verify OTP and change password
    pub const VERIFY_OTP_UPDATE_PASSWORD: Endpoint =
        Endpoint::new("/api/v1/admin/verify-otp-update-password");
}

/// About section
#[allow(missing_docs)]
pub mod about {
    use super::Endpoint;

    pub const GET_CONTENT: Endpoint = Endpoint::new("/api/v1/about/get-about-content");
    pub const ADD_UPDATE_CONTENT: Endpoint =
        Endpoint::new("/api/v1/about/add-and-update-about-content");
}

/// Hero banner
#[allow(missing_docs)]
pub mod hero {
    use super::Endpoint;

    pub const GET_CONTENT: Endpoint = Endpoint::new("/api/v1/hero/get-hero-content");
    pub const ADD_UPDATE_CONTENT: Endpoint =
        Endpoint::new("/api/v1/hero/add-and-update-hero-content");
}

/// Contact details and visitor messages
///
/// The backend mounts these under `conatct`.
#[allow(missing_docs)]
pub mod contact {
    use super::Endpoint;

    pub const GET_DETAILS: Endpoint = Endpoint::new("/api/v1/conatct/get-contact-details");
    pub const ADD_UPDATE_DETAILS: Endpoint =
        Endpoint::new("/api/v1/conatct/add-update-contact-details");
    pub const SEND_MESSAGE: Endpoint = Endpoint::new("/api/v1/conatct/send-message");
    pub const GET_ALL_MESSAGES: Endpoint = Endpoint::new("/api/v1/conatct/get-all-messages");
    pub const GET_MESSAGE: Endpoint = Endpoint::new("/api/v1/conatct/get-message/{id}");
    pub const DELETE_MESSAGE: Endpoint = Endpoint::new("/api/v1/conatct/delete-message/{id}");
}

/// Education entries
#[allow(missing_docs)]
pub mod education {
    use super::Endpoint;

    pub const CREATE: Endpoint = Endpoint::new("/api/v1/education/create-education-details");
    pub const GET_ALL: Endpoint = Endpoint::new("/api/v1/education/get-all-education-details");
    pub const GET: Endpoint = Endpoint::new("/api/v1/education/get-education-details{id}");
    pub const UPDATE: Endpoint = Endpoint::new("/api/v1/education/update-education-details{id}");
    pub const DELETE: Endpoint = Endpoint::new("/api/v1/education/delete-education-details{id}");
}

/// Portfolio projects
#[allow(missing_docs)]
pub mod projects {
    use super::Endpoint;

    pub const GET_ALL: Endpoint = Endpoint::new("/api/v1/projects/get-all-projects");
    pub const GET: Endpoint = Endpoint::new("/api/v1/projects/get-project{id}");
    pub const CREATE: Endpoint = Endpoint::new("/api/v1/projects/add-project");
    pub const UPDATE: Endpoint = Endpoint::new("/api/v1/projects/update-project{id}");
    pub const DELETE: Endpoint = Endpoint::new("/api/v1/projects/delete-project{id}");
    pub const GET_FEATURED: Endpoint = Endpoint::new("/api/v1/projects/get-featured-projects");
    pub const SET_FEATURED: Endpoint = Endpoint::new("/api/v1/projects/set-featured-projects");
}

/// Offered services
#[allow(missing_docs)]
pub mod services {
    use super::Endpoint;

    pub const GET_ALL: Endpoint = Endpoint::new("/api/v1/services/get-all-services");
    pub const GET: Endpoint = Endpoint::new("/api/v1/services/get-service{id}");
    pub const CREATE: Endpoint = Endpoint::new("/api/v1/services/create-services");
    pub const UPDATE: Endpoint = Endpoint::new("/api/v1/services/update-services{id}");
    pub const DELETE: Endpoint = Endpoint::new("/api/v1/services/delete-services{id}");
}

/// Skill categories and the skills inside them
#[allow(missing_docs)]
pub mod skills {
    use super::Endpoint;

    pub const CREATE_CATEGORY: Endpoint = Endpoint::new("/api/v1/skills/create-skill-category");
    pub const GET_ALL_CATEGORIES: Endpoint =
        Endpoint::new("/api/v1/skills/get-all-skill-categories");
    pub const GET_CATEGORY: Endpoint = Endpoint::new("/api/v1/skills/get-skill-categories{id}");
    pub const DELETE_CATEGORY: Endpoint = Endpoint::new("/api/v1/skills/delete-skill-category{id}");
    pub const ADD_SKILL: Endpoint = Endpoint::new("/api/v1/skills/add-skill-to-category{id}");
    pub const UPDATE_SKILL: Endpoint =
        Endpoint::new("/api/v1/skills/update-skill-in-category{categoryId}/{skillId}");
    pub const DELETE_SKILL: Endpoint =
        Endpoint::new("/api/v1/skills/delete-skill-from-category{categoryId}/{skillId}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn fixed_paths_render_unchanged() {
        assert!(!projects::GET_ALL.is_template());
        assert_eq!(
            projects::GET_ALL.render(|_| None).unwrap(),
            "/api/v1/projects/get-all-projects"
        );
    }

    #[test]
    fn templates_are_rendered_literally() {
        let path = projects::DELETE
            .render(|name| (name == "id").then(|| "abc123".to_string()))
            .unwrap();
        assert_eq!(path, "/api/v1/projects/delete-projectabc123");

        let path = contact::DELETE_MESSAGE
            .render(|_| Some("m1".to_string()))
            .unwrap();
        assert_eq!(path, "/api/v1/conatct/delete-message/m1");
    }

    #[test]
    fn several_parameters() {
        let path = skills::UPDATE_SKILL
            .render(|name| match name {
                "categoryId" => Some("c1".to_string()),
                "skillId" => Some("s9".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(path, "/api/v1/skills/update-skill-in-categoryc1/s9");
    }

    #[test]
    fn missing_parameter_is_construction_error() {
        let error = skills::DELETE_SKILL
            .render(|name| (name == "categoryId").then(|| "c1".to_string()))
            .unwrap_err();
        assert_eq!(
            error,
            RequestError::Construction(
                "Missing path parameter `skillId` for /api/v1/skills/delete-skill-from-category{categoryId}/{skillId}"
                    .to_string()
            )
        );
    }

    #[test]
    fn unclosed_placeholder_is_construction_error() {
        let error = Endpoint::new("/broken/{id").render(|_| Some("x".to_string())).unwrap_err();
        assert!(matches!(error, RequestError::Construction(_)));
    }
}
