pub mod admin;
pub mod auth;
pub mod donation;
pub mod feedback;
pub mod project;
pub mod taxonomy;
