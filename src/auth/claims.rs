use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::identity::{IdentityContext, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    #[serde(default)]
    pub role: Role,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user_id: &str, role: Role, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}

impl From<Claims> for IdentityContext {
    fn from(claims: Claims) -> Self {
        // A token without a role claim still proves the caller signed in.
        let role = match claims.role {
            Role::Anonymous => Role::User,
            role => role,
        };
        IdentityContext::new(claims.sub, role)
    }
}
