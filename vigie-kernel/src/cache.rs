/**
 * RECENCY CACHE - Cache mono-entrée devant la requête "statut courant"
 *
 * RÔLE :
 * Évite d'interroger centreon_storage à chaque affichage de la page statut.
 * Une seule entrée, remplacée en entier à chaque rafraîchissement.
 *
 * ÉTATS :
 * - Empty : aucune entrée, ou entrée expirée (now > expires_at)
 * - Fresh : entrée présente et non expirée → servie sans accès base
 * L'expiration est paresseuse : simple prédicat évalué à chaque lecture.
 *
 * RAFRAÎCHISSEMENT :
 * - Requête + formatage, puis expires_at = now + 10 min
 * - Échec (base ou donnée invalide) → rien n'est installé, l'erreur remonte
 * - Single-flight : un mutex tokio sérialise les rafraîchissements. Un appel
 *   qui a attendu le verrou revérifie la fraîcheur, et si une tentative s'est
 *   terminée en échec pendant son attente, il reçoit cette erreur sans requêter.
 *   Une lecture ultérieure retente normalement.
 */

use crate::clock::Clock;
use crate::db::EventSource;
use crate::error::DashboardError;
use crate::format::RowFormatter;
use crate::models::ViewRow;
use crate::state::Slot;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Durée de vie fixe d'une entrée
pub const CACHE_TTL: Duration = Duration::minutes(10);

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub expires_at: OffsetDateTime,
    pub rows: Vec<ViewRow>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: OffsetDateTime) -> bool {
        now <= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    Empty,
    Fresh,
}

/// Compteurs exposés par /system/health
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub refreshes: u64,
    pub refresh_failures: u64,
}

pub struct RecencyCache {
    source: Arc<dyn EventSource>,
    clock: Arc<dyn Clock>,
    formatter: RowFormatter,
    slot: Slot<CacheEntry>,
    refresh_lock: Mutex<RefreshRecord>,
    generation: AtomicU64,
    hits: AtomicU64,
    refreshes: AtomicU64,
    refresh_failures: AtomicU64,
}

impl RecencyCache {
    pub fn new(source: Arc<dyn EventSource>, clock: Arc<dyn Clock>, formatter: RowFormatter) -> Self {
        Self {
            source,
            clock,
            formatter,
            slot: Slot::empty(),
            refresh_lock: Mutex::new(RefreshRecord::default()),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
            refresh_failures: AtomicU64::new(0),
        }
    }

    /// Lecture read-through : entrée fraîche, sinon rafraîchissement synchrone
    pub async fn read(&self) -> Result<Arc<CacheEntry>, DashboardError> {
        if let Some(entry) = self.fresh_entry() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry);
        }

        let seen = self.generation.load(Ordering::Acquire);
        let mut record = self.refresh_lock.lock().await;

        // un autre appel a pu rafraîchir pendant qu'on attendait le verrou
        if let Some(entry) = self.fresh_entry() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry);
        }
        if record.generation != seen {
            if let Some(failure) = &record.failure {
                debug!("reusing outcome of the refresh we waited on");
                return Err(failure.to_error());
            }
        }

        let now = self.clock.now();
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        let outcome = self.refresh_at(now).await;

        record.generation += 1;
        record.failure = outcome.as_ref().err().map(RefreshFailure::from_error);
        self.generation.store(record.generation, Ordering::Release);

        match outcome {
            Ok(entry) => {
                info!(rows = entry.rows.len(), "current status cache refreshed");
                Ok(entry)
            }
            Err(e) => {
                self.refresh_failures.fetch_add(1, Ordering::Relaxed);
                warn!("current status refresh failed: {e}");
                Err(e)
            }
        }
    }

    /// Entrée courante, fraîche ou non, sans déclencher de requête
    pub fn peek(&self) -> Option<Arc<CacheEntry>> {
        self.slot.load()
    }

    pub fn state(&self) -> CacheState {
        match self.fresh_entry() {
            Some(_) => CacheState::Fresh,
            None => CacheState::Empty,
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            refresh_failures: self.refresh_failures.load(Ordering::Relaxed),
        }
    }

    fn fresh_entry(&self) -> Option<Arc<CacheEntry>> {
        let now = self.clock.now();
        self.slot.load().filter(|entry| entry.is_fresh(now))
    }

    async fn refresh_at(&self, now: OffsetDateTime) -> Result<Arc<CacheEntry>, DashboardError> {
        debug!("querying current status");
        let events = self.source.fetch_current_status().await?;
        let rows = self.formatter.current_status(&events, now)?;

        let entry = Arc::new(CacheEntry {
            expires_at: now + CACHE_TTL,
            rows,
        });
        self.slot.store(entry.clone());
        Ok(entry)
    }
}
