use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Intake checklist entry. Every active item must be acknowledged before an
/// application can be submitted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChecklistItem {
    pub id: i32,
    pub label: String,
    pub description: String,
    pub active: bool,
    pub ord: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistInsert {
    pub label: String,
    pub description: String,
    pub ord: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecklistPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub ord: Option<i32>,
}
