/*!
# Vigie Kernel - Dashboard de supervision Centreon

Lecture seule sur `centreon_storage` :
- statut courant des services en check actif (cache de récence 10 min)
- historique des 100 dernières transitions d'état
- rendu HTML + health JSON via Axum
*/

pub mod cache;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod format;
pub mod health;
pub mod http;
pub mod models;
pub mod pages;
pub mod state;
pub mod status;

pub use cache::{CacheEntry, CacheState, RecencyCache, CACHE_TTL};
pub use clock::{Clock, SystemClock};
pub use dashboard::Dashboard;
pub use db::{EventSource, MySqlEventSource};
pub use error::DashboardError;
pub use format::RowFormatter;
pub use models::{StateEvent, ViewRow};
pub use status::{StatusCode, Vocabulary};
