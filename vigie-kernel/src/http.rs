/**
 * SERVEUR HTTP VIGIE - Pages du dashboard
 *
 * ROUTES :
 * - GET /               → statut courant des lignes (servi par le cache 10 min)
 * - GET /most-recent    → historique des 100 dernières transitions (sans cache,
 *                          une requête par affichage ; alias GET /history)
 * - GET /health         → "ok" (liveness)
 * - GET /system/health  → état du kernel en JSON (uptime, cache, mémoire)
 *
 * ERREURS :
 * - Base injoignable / requête en échec → 503 + page d'erreur
 * - Donnée invalide (code d'état inconnu, timestamp hors plage) → 500
 * Aucune authentification : lecture seule, réseau interne.
 */

use crate::dashboard::Dashboard;
use crate::error::DashboardError;
use crate::health::{HealthTracker, KernelHealth};
use crate::pages;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub health_tracker: HealthTracker,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(current_status))
        // historique, pas le statut courant : ne passe jamais par le cache
        .route("/most-recent", get(history))
        .route("/history", get(history))
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .with_state(app_state)
}

/// Erreur du dashboard rendue en page HTML
pub struct PageError(DashboardError);

impl From<DashboardError> for PageError {
    fn from(e: DashboardError) -> Self {
        Self(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (code, message) = if self.0.is_database() {
            (StatusCode::SERVICE_UNAVAILABLE, "The monitoring database is unreachable.")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "The monitoring data could not be displayed.")
        };
        tracing::error!(status = code.as_u16(), "request failed: {}", self.0);
        (code, Html(pages::render_error(code.as_u16(), message))).into_response()
    }
}

// GET / (statut courant)
async fn current_status(State(app): State<AppState>) -> Result<Html<String>, PageError> {
    let rows = app.dashboard.current_status_rows().await?;
    Ok(Html(pages::render_current_status(&rows)))
}

// GET /most-recent, GET /history
async fn history(State(app): State<AppState>) -> Result<Html<String>, PageError> {
    let rows = app.dashboard.history_rows().await?;
    Ok(Html(pages::render_history(&rows)))
}

// GET /system/health
async fn get_system_health(State(app): State<AppState>) -> Json<KernelHealth> {
    Json(app.health_tracker.get_health(&app.dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::db::EventSource;
    use crate::format::RowFormatter;
    use crate::models::StateEvent;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct StaticSource {
        events: Vec<StateEvent>,
        down: bool,
    }

    #[async_trait]
    impl EventSource for StaticSource {
        async fn fetch_history(&self) -> Result<Vec<StateEvent>, DashboardError> {
            if self.down {
                return Err(DashboardError::Database(sqlx::Error::PoolClosed));
            }
            Ok(self.events.clone())
        }

        async fn fetch_current_status(&self) -> Result<Vec<StateEvent>, DashboardError> {
            self.fetch_history().await
        }
    }

    fn app(events: Vec<StateEvent>, down: bool) -> Router {
        let source = Arc::new(StaticSource { events, down });
        let dashboard = Dashboard::new(source, Arc::new(SystemClock), RowFormatter::default());
        build_router(AppState {
            dashboard: Arc::new(dashboard),
            health_tracker: HealthTracker::new(),
        })
    }

    fn line(state: i64) -> StateEvent {
        StateEvent {
            start_time: 1_700_000_000,
            end_time: Some(1_700_003_661),
            state,
            description: "Line 1".into(),
        }
    }

    async fn fetch_page(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_history_page() {
        let (status, body) = fetch_page(app(vec![line(0)], false), "/most-recent").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<td>14 November 2023, 22:13:20 +00:00</td><td>Line 1</td>"));
        assert!(body.contains("label-success"));
        assert!(body.contains("<td>an hour</td>"));
    }

    #[tokio::test]
    async fn test_current_status_page() {
        let (status, body) = fetch_page(app(vec![line(1)], false), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("SOME ISSUES"));
        assert!(body.contains(" ago</td>"));
    }

    #[tokio::test]
    async fn test_database_down_is_503() {
        let (status, body) = fetch_page(app(vec![], true), "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("unreachable"));
    }

    #[tokio::test]
    async fn test_unknown_state_is_500() {
        let (status, body) = fetch_page(app(vec![line(5)], false), "/most-recent").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("undefined"));
    }

    #[tokio::test]
    async fn test_health_routes() {
        let (status, body) = fetch_page(app(vec![], false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");

        let (status, body) = fetch_page(app(vec![], false), "/system/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(health["cache_state"], "empty");
        assert_eq!(health["cache"]["refreshes"], 0);
    }

    #[tokio::test]
    async fn test_history_routes_bypass_cache() {
        let router = app(vec![line(0)], false);

        for uri in ["/most-recent", "/history"] {
            let (status, body) = fetch_page(router.clone(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("<td>an hour</td>"));
        }

        let (_, body) = fetch_page(router, "/system/health").await;
        let health: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(health["cache_state"], "empty");
        assert_eq!(health["cache"]["refreshes"], 0);
    }
}
