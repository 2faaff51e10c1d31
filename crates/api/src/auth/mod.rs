//! Authentication primitives.
//!
//! Accounts live with the external identity provider; this service only
//! verifies the HS256 access tokens it issues. See [`jwt`].

pub mod jwt;
