// Console routes - navigation targets handed back to the front-end
use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Overview,
    Identities,
    CreateIdentity,
    ViewIdentity(String),
    EditIdentity(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Overview => "/overview".to_string(),
            Route::Identities => "/identities".to_string(),
            Route::CreateIdentity => "/identities/create".to_string(),
            Route::ViewIdentity(id) => format!("/identities/{}/view", id),
            Route::EditIdentity(id) => format!("/identities/{}/edit", id),
        }
    }

    /// Parse a front-end path. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["login"] => Some(Route::Login),
            ["overview"] => Some(Route::Overview),
            ["identities"] => Some(Route::Identities),
            ["identities", "create"] => Some(Route::CreateIdentity),
            ["identities", id, "view"] => Some(Route::ViewIdentity(id.to_string())),
            ["identities", id, "edit"] => Some(Route::EditIdentity(id.to_string())),
            _ => None,
        }
    }

    /// Everything except the login page requires a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
