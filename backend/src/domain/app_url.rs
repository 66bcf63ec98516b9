//! Front-end URL construction.
//!
//! The back end never renders pages itself; it hands out URLs into the
//! single-page front end, optionally carrying a registration key and an
//! entity type. Builders here produce either a relative URL (for redirects
//! served from the same origin) or an absolute one (for links that leave the
//! origin, such as the join link in a welcome email).

use std::fmt;

use url::Url;
use url::form_urlencoded::Serializer;

/// Path of the front-end course join page.
pub const JOIN_PAGE: &str = "/web/join";
/// Path of the front-end landing page.
pub const HOME_PAGE: &str = "/web/front/home";

/// Query parameter carrying the registration key.
pub const PARAM_REGKEY: &str = "key";
/// Query parameter distinguishing instructors from students.
pub const PARAM_ENTITY_TYPE: &str = "entitytype";

/// Kind of participant a front-end link is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    /// Course instructor.
    Instructor,
    /// Course student.
    Student,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instructor => f.write_str("instructor"),
            Self::Student => f.write_str("student"),
        }
    }
}

/// Builder for URLs into the front-end application.
///
/// # Examples
/// ```
/// use backend::domain::app_url::{AppUrl, EntityType, JOIN_PAGE};
///
/// let url = AppUrl::new(JOIN_PAGE)
///     .with_registration_key("reg-1")
///     .with_entity_type(EntityType::Student)
///     .to_relative();
/// assert_eq!(url, "/web/join?key=reg-1&entitytype=student");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUrl {
    path: String,
    params: Vec<(String, String)>,
}

impl AppUrl {
    /// Start a builder for the given front-end path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Append an arbitrary query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Append the registration key parameter.
    #[must_use]
    pub fn with_registration_key(self, key: impl Into<String>) -> Self {
        self.with_param(PARAM_REGKEY, key)
    }

    /// Append the entity type parameter.
    #[must_use]
    pub fn with_entity_type(self, entity_type: EntityType) -> Self {
        self.with_param(PARAM_ENTITY_TYPE, entity_type.to_string())
    }

    /// Render as a relative URL suitable for a same-origin redirect.
    #[must_use]
    pub fn to_relative(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let mut query = Serializer::new(String::new());
        for (name, value) in &self.params {
            query.append_pair(name, value);
        }
        format!("{}?{}", self.path, query.finish())
    }

    /// Render as an absolute URL rooted at the front-end base.
    ///
    /// Query parameters already present on `base` are preserved.
    #[must_use]
    pub fn to_absolute(&self, base: &Url) -> String {
        let mut url = base.clone();
        {
            let mut path = url.path().trim_end_matches('/').to_owned();
            path.push_str(&self.path);
            url.set_path(&path);
        }
        if !self.params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &self.params {
                query.append_pair(name, value);
            }
        }
        url.to_string()
    }
}
