//! Credential handling.
//!
//! - [`password`] -- Argon2id hashing plus the registration password policy.
//! - [`jwt`] -- signed access tokens and opaque, hashed refresh tokens.

pub mod jwt;
pub mod password;
