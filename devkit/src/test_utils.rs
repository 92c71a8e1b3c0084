/*!
Test Harness pour le dashboard Vigie

Assemble un vrai Dashboard sur un StubEventSource et une ManualClock :
- avance du temps à la main pour tester l'expiration du cache
- expectations sur le nombre de requêtes envoyées à la "base"
- statistiques des requêtes pour le debug
*/

use crate::clock_stub::ManualClock;
use crate::fixtures::FIXTURE_EPOCH;
use crate::source_stub::{QueryKind, StubEventSource};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use time::{Duration, UtcOffset};
use vigie_kernel::{Dashboard, RowFormatter};

pub struct TestHarness {
    pub source: StubEventSource,
    pub clock: ManualClock,
    pub dashboard: Dashboard,
    expectations: Vec<Expectation>,
}

#[derive(Debug)]
struct Expectation {
    kind: QueryKind,
    expected_count: usize,
}

impl TestHarness {
    /// Harness en UTC, horloge à FIXTURE_EPOCH
    pub fn new() -> Self {
        Self::with_offset(UtcOffset::UTC)
    }

    pub fn with_offset(offset: UtcOffset) -> Self {
        env_logger::try_init().ok();

        let source = StubEventSource::new();
        let clock = ManualClock::at_unix(FIXTURE_EPOCH);
        let dashboard = Dashboard::new(
            Arc::new(source.clone()),
            Arc::new(clock.clone()),
            RowFormatter::new(offset),
        );

        Self {
            source,
            clock,
            dashboard,
            expectations: Vec::new(),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// On s'attend à exactement N requêtes de ce type au total
    pub fn expect_queries(&mut self, kind: QueryKind, count: usize) -> &mut Self {
        self.expectations.push(Expectation {
            kind,
            expected_count: count,
        });
        self
    }

    pub fn verify_expectations(&self) -> Result<()> {
        log::info!("🔍 Verifying {} expectations...", self.expectations.len());

        for expectation in &self.expectations {
            let actual = self.source.count(expectation.kind);
            if actual != expectation.expected_count {
                anyhow::bail!(
                    "Expectation failed for {:?}: expected {} queries, got {}",
                    expectation.kind,
                    expectation.expected_count,
                    actual
                );
            }
            log::info!("✅ {:?}: {} queries as expected", expectation.kind, actual);
        }
        Ok(())
    }

    pub fn get_stats(&self) -> TestStats {
        let calls = self.source.calls();
        let mut query_counts = HashMap::new();
        for call in &calls {
            *query_counts.entry(*call).or_insert(0) += 1;
        }
        TestStats {
            total_queries: calls.len(),
            query_counts,
        }
    }

    /// Reset des requêtes et expectations (le cache du dashboard est conservé)
    pub fn reset(&mut self) {
        self.source.clear_calls();
        self.expectations.clear();
        log::info!("🧹 Test harness reset");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct TestStats {
    pub total_queries: usize,
    pub query_counts: HashMap<QueryKind, usize>,
}

impl TestStats {
    pub fn print(&self) {
        println!("📊 Test Statistics:");
        println!("  Total queries: {}", self.total_queries);
        for (kind, count) in &self.query_counts {
            println!("    {:?}: {}", kind, count);
        }
    }
}
