//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`rbac::RequireAuth`] -- any authenticated caller.
//! - [`rbac::RequireAdmin`] -- a caller whose profile has the `admin` role.

pub mod auth;
pub mod rbac;
