use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Anonymous,
    #[serde(alias = "student", alias = "authenticated")]
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Anonymous => "anonymous",
            Role::User => "user",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// The verified caller of a single request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityContext {
    pub user_id: Option<String>,
    pub role: Role,
}

impl IdentityContext {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            role: Role::Anonymous,
        }
    }

    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.role == Role::Anonymous
    }

    pub fn display_name(&self) -> &str {
        self.user_id.as_deref().unwrap_or("anonymous")
    }
}

/// Turns a bearer credential into a verified identity.
pub trait IdentityProvider: Send + Sync {
    fn verify(&self, credential: &str) -> AppResult<IdentityContext>;
}
