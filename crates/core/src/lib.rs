//! Domain core for the crowdfunding platform.
//!
//! Holds the pure business rules (funding progress, cancellation
//! eligibility, input validation) shared by the persistence and HTTP layers.
//! Nothing in this crate performs I/O.

pub mod comment;
pub mod donation;
pub mod error;
pub mod funding;
pub mod project;
pub mod rating;
pub mod roles;
pub mod search;
pub mod store;
pub mod taxonomy;
pub mod types;
