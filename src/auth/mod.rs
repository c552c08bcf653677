pub mod claims;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod policy;

pub use claims::Claims;
pub use identity::{IdentityContext, IdentityProvider, Role};
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, CallerIdentity};
pub use policy::{AccessPolicy, Decision, Operation};
