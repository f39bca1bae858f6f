//! Authentication primitives: signed session tokens and password hashing.
//!
//! The rest of the crate treats these as opaque services; handlers only see
//! the typed identity the HTTP middleware extracts from a verified token.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, AuthConfig, Claims};
