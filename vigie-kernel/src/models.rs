use serde::{Deserialize, Serialize};

/// Ligne brute de `servicestateevents` jointe à `services`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StateEvent {
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub state: i64,
    pub description: String,
}

/// Ligne prête à afficher, produite par le formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRow {
    pub service: String,
    pub status: String,
    pub bs_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}
