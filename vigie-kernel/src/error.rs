/// Erreurs possibles lors de la construction des lignes du dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Unknown status code: {0}")]
    UnknownStatusCode(i64),
    #[error("Invalid unix timestamp: {0}")]
    InvalidTimestamp(i64),
    #[error("Date formatting error: {0}")]
    Format(#[from] time::error::Format),
    /// Échec d'un rafraîchissement concurrent, relayé aux appels qui l'attendaient
    #[error("Shared refresh failed: {message}")]
    SharedRefresh { database: bool, message: String },
}

impl DashboardError {
    /// Vrai si l'erreur vient de la base (connexion ou requête)
    pub fn is_database(&self) -> bool {
        matches!(
            self,
            DashboardError::Database(_) | DashboardError::SharedRefresh { database: true, .. }
        )
    }
}
