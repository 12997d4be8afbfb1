//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod comment_repo;
pub mod donation_repo;
pub mod project_repo;
pub mod rating_repo;
pub mod refresh_token_repo;
pub mod report_repo;
pub mod tag_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use donation_repo::DonationRepo;
pub use project_repo::ProjectRepo;
pub use rating_repo::RatingRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use report_repo::ReportRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
