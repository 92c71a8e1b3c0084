/**
 * QUERY LAYER - Lecture seule sur centreon_storage
 *
 * RÔLE :
 * Deux requêtes paramétrées contre le schéma de supervision :
 * - fetch_history        : 100 dernières transitions, tous services sauf la sentinelle
 * - fetch_current_status : dernier état (last_update = 1) des services en check actif
 *
 * FONCTIONNEMENT :
 * - EventSource trait = interface commune (MySQL en prod, stub en test)
 * - MySqlEventSource ouvre une connexion neuve par appel puis la ferme
 * - Aucune retry : une erreur de connexion ou de requête remonte telle quelle
 *
 * Les colonnes entières sont castées en SIGNED pour décoder en i64 quelle que
 * soit leur largeur déclarée dans le schéma.
 */

use crate::config::DatabaseConf;
use crate::error::DashboardError;
use crate::models::StateEvent;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::debug;

/// Nombre max de transitions affichées dans l'historique
pub const HISTORY_LIMIT: i64 = 100;

pub const SQL_HISTORY: &str = "\
SELECT
  CAST(sse.start_time AS SIGNED) AS start_time,
  CAST(sse.end_time AS SIGNED) AS end_time,
  CAST(sse.state AS SIGNED) AS state,
  s.description
FROM servicestateevents sse
JOIN services s ON sse.service_id = s.service_id
WHERE sse.service_id <> ?
ORDER BY sse.start_time DESC
LIMIT ?";

pub const SQL_CURRENT_STATUS: &str = "\
SELECT
  CAST(sse.start_time AS SIGNED) AS start_time,
  CAST(sse.end_time AS SIGNED) AS end_time,
  CAST(sse.state AS SIGNED) AS state,
  s.description
FROM servicestateevents sse
JOIN services s ON sse.service_id = s.service_id
WHERE sse.last_update = 1
  AND s.active_checks = 1
  AND sse.service_id <> ?
ORDER BY s.description ASC";

/// Interface de lecture des événements d'état
/// Implémentée par MySqlEventSource en prod et par les stubs du devkit
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Dernières transitions (HISTORY_LIMIT max), start_time décroissant
    async fn fetch_history(&self) -> Result<Vec<StateEvent>, DashboardError>;

    /// État courant de chaque service en check actif
    async fn fetch_current_status(&self) -> Result<Vec<StateEvent>, DashboardError>;
}

pub struct MySqlEventSource {
    options: MySqlConnectOptions,
    excluded_service_id: i64,
}

impl MySqlEventSource {
    pub fn new(conf: &DatabaseConf, excluded_service_id: i64) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&conf.host)
            .port(conf.port)
            .username(&conf.username)
            .password(&conf.password)
            .database(&conf.name)
            .disable_statement_logging();

        Self {
            options,
            excluded_service_id,
        }
    }

    async fn run(&self, sql: &'static str, limit: Option<i64>) -> Result<Vec<StateEvent>, DashboardError> {
        let mut conn = MySqlConnection::connect_with(&self.options).await?;

        let mut query = sqlx::query_as::<_, StateEvent>(sql).bind(self.excluded_service_id);
        if let Some(limit) = limit {
            query = query.bind(limit);
        }
        let fetched = query.fetch_all(&mut conn).await;

        // fermeture propre même si la requête a échoué
        if let Err(e) = conn.close().await {
            debug!("mysql connection close failed: {e}");
        }

        let rows = fetched?;
        debug!(rows = rows.len(), "state events fetched");
        Ok(rows)
    }
}

#[async_trait]
impl EventSource for MySqlEventSource {
    async fn fetch_history(&self) -> Result<Vec<StateEvent>, DashboardError> {
        self.run(SQL_HISTORY, Some(HISTORY_LIMIT)).await
    }

    async fn fetch_current_status(&self) -> Result<Vec<StateEvent>, DashboardError> {
        self.run(SQL_CURRENT_STATUS, None).await
    }
}
