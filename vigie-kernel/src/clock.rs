use time::OffsetDateTime;

/// Source de l'instant courant (expiration du cache + temps relatif)
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Horloge système, toujours en UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
