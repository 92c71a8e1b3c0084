/*!
Stub de source d'événements pour développer sans MySQL

Remplace MySqlEventSource : renvoie des événements programmés, enregistre
chaque requête reçue et permet de simuler une base injoignable.
*/

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vigie_kernel::{DashboardError, EventSource, StateEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    History,
    CurrentStatus,
}

#[derive(Debug, Default)]
struct StubData {
    history: Vec<StateEvent>,
    current_status: Vec<StateEvent>,
    calls: Vec<QueryKind>,
    down: bool,
    delay: Option<Duration>,
}

/// EventSource programmable, clonable (les clones partagent le même état)
#[derive(Clone, Default)]
pub struct StubEventSource {
    data: Arc<Mutex<StubData>>,
}

impl StubEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Événements renvoyés par fetch_history
    pub fn set_history(&self, events: Vec<StateEvent>) {
        self.data.lock().unwrap().history = events;
    }

    /// Événements renvoyés par fetch_current_status
    pub fn set_current_status(&self, events: Vec<StateEvent>) {
        self.data.lock().unwrap().current_status = events;
    }

    /// Simule une base injoignable (ou la rétablit)
    pub fn set_down(&self, down: bool) {
        self.data.lock().unwrap().down = down;
        log::info!("🔌 [STUB] database {}", if down { "down" } else { "up" });
    }

    /// Latence artificielle par requête (tests de concurrence)
    pub fn set_delay(&self, delay: Duration) {
        self.data.lock().unwrap().delay = Some(delay);
    }

    /// Requêtes reçues, dans l'ordre
    pub fn calls(&self) -> Vec<QueryKind> {
        self.data.lock().unwrap().calls.clone()
    }

    pub fn count(&self, kind: QueryKind) -> usize {
        self.data
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| **call == kind)
            .count()
    }

    /// Oublie les requêtes enregistrées (les événements programmés restent)
    pub fn clear_calls(&self) {
        self.data.lock().unwrap().calls.clear();
    }

    async fn answer(&self, kind: QueryKind) -> Result<Vec<StateEvent>, DashboardError> {
        let delay = {
            let mut data = self.data.lock().unwrap();
            data.calls.push(kind);
            data.delay
        };
        log::info!("📥 [STUB] {:?} query", kind);

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let data = self.data.lock().unwrap();
        if data.down {
            return Err(unreachable_database());
        }
        Ok(match kind {
            QueryKind::History => data.history.clone(),
            QueryKind::CurrentStatus => data.current_status.clone(),
        })
    }
}

#[async_trait]
impl EventSource for StubEventSource {
    async fn fetch_history(&self) -> Result<Vec<StateEvent>, DashboardError> {
        self.answer(QueryKind::History).await
    }

    async fn fetch_current_status(&self) -> Result<Vec<StateEvent>, DashboardError> {
        self.answer(QueryKind::CurrentStatus).await
    }
}

/// Erreur équivalente à un refus de connexion MySQL
pub fn unreachable_database() -> DashboardError {
    DashboardError::Database(sqlx::Error::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "stub database is down",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::EventBuilder;

    #[tokio::test]
    async fn test_stub_records_calls() {
        let stub = StubEventSource::new();
        stub.set_history(vec![EventBuilder::new("Line 1").build()]);

        assert_eq!(stub.fetch_history().await.unwrap().len(), 1);
        assert!(stub.fetch_current_status().await.unwrap().is_empty());
        assert_eq!(stub.calls(), vec![QueryKind::History, QueryKind::CurrentStatus]);
        assert_eq!(stub.count(QueryKind::History), 1);

        stub.clear_calls();
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_stub_down() {
        let stub = StubEventSource::new();
        let shared = stub.clone();
        shared.set_down(true);

        let err = stub.fetch_current_status().await.unwrap_err();
        assert!(err.is_database());
        // la requête compte même quand elle échoue
        assert_eq!(stub.count(QueryKind::CurrentStatus), 1);
    }
}
