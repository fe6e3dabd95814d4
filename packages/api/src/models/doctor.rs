use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A seeded care provider. Read-only from the application's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
}
