use std::fmt;

use crate::{
    auth::identity::{IdentityContext, Role},
    errors::{AppError, AppResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
    BulkImport,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Read,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::BulkImport,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Read => "read questions",
            Operation::Create => "create questions",
            Operation::Update => "update questions",
            Operation::Delete => "delete questions",
            Operation::BulkImport => "bulk import questions",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Role-based decision table for catalog operations. Pure: the answer depends
/// only on the operation, the caller's role and the anonymous-read switch.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessPolicy {
    allow_anonymous_read: bool,
}

impl AccessPolicy {
    pub fn new(allow_anonymous_read: bool) -> Self {
        Self {
            allow_anonymous_read,
        }
    }

    pub fn decide(&self, operation: Operation, identity: &IdentityContext) -> Decision {
        match (operation, identity.role) {
            (Operation::Read, Role::Anonymous) if self.allow_anonymous_read => Decision::Allow,
            (Operation::Read, Role::Anonymous) => Decision::Deny,
            (Operation::Read, Role::User | Role::Admin) => Decision::Allow,
            (
                Operation::Create | Operation::Update | Operation::Delete | Operation::BulkImport,
                Role::Admin,
            ) => Decision::Allow,
            (
                Operation::Create | Operation::Update | Operation::Delete | Operation::BulkImport,
                Role::Anonymous | Role::User,
            ) => Decision::Deny,
        }
    }

    /// Like [`AccessPolicy::decide`], but turns a denial into the error the
    /// boundary reports: 401 for anonymous callers, 403 for everyone else.
    pub fn authorize(&self, operation: Operation, identity: &IdentityContext) -> AppResult<()> {
        match self.decide(operation, identity) {
            Decision::Allow => Ok(()),
            Decision::Deny if identity.is_anonymous() => Err(AppError::Unauthorized(format!(
                "Authentication required to {}",
                operation
            ))),
            Decision::Deny => Err(AppError::Forbidden(format!(
                "Role '{}' is not allowed to {}",
                identity.role, operation
            ))),
        }
    }
}
