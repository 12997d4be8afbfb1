//! Donation entity model and DTOs. Donations are immutable once created.

use crowdfund_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `donations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donation {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub amount: Amount,
    pub created_at: Timestamp,
}

/// Request body for a new donation. Project and donor come from the route
/// and the authenticated caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDonation {
    pub amount: Amount,
}
