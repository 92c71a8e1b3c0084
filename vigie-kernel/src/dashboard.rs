use crate::cache::{CacheEntry, RecencyCache};
use crate::clock::Clock;
use crate::db::EventSource;
use crate::error::DashboardError;
use crate::format::RowFormatter;
use crate::models::ViewRow;
use std::sync::Arc;

/// Point d'assemblage : une source d'événements, une horloge, un cache.
/// C'est ce que consomment les handlers HTTP.
pub struct Dashboard {
    source: Arc<dyn EventSource>,
    formatter: RowFormatter,
    cache: RecencyCache,
}

impl Dashboard {
    pub fn new(source: Arc<dyn EventSource>, clock: Arc<dyn Clock>, formatter: RowFormatter) -> Self {
        let cache = RecencyCache::new(source.clone(), clock, formatter);
        Self {
            source,
            formatter,
            cache,
        }
    }

    /// Historique des transitions, jamais mis en cache
    pub async fn history_rows(&self) -> Result<Vec<ViewRow>, DashboardError> {
        let events = self.source.fetch_history().await?;
        self.formatter.history(&events)
    }

    /// Statut courant, servi par le cache de récence
    pub async fn current_status_rows(&self) -> Result<Vec<ViewRow>, DashboardError> {
        Ok(self.current_status_entry().await?.rows.clone())
    }

    pub async fn current_status_entry(&self) -> Result<Arc<CacheEntry>, DashboardError> {
        self.cache.read().await
    }

    pub fn cache(&self) -> &RecencyCache {
        &self.cache
    }
}
