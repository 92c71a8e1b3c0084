/*!
# Vigie DevKit - Stubs et Utilitaires pour Développement

Bibliothèque facilitant le développement du dashboard sans base MySQL:
- Stub de source d'événements (réponses programmées, base "down")
- Horloge manuelle pour tester l'expiration du cache
- Builders et fixtures JSON d'événements d'état
- Harness de test autour d'un vrai Dashboard
*/

pub mod clock_stub;
pub mod fixtures;
pub mod source_stub;
pub mod test_utils;

pub use clock_stub::ManualClock;
pub use fixtures::{EventBuilder, FixtureLoader};
pub use source_stub::{QueryKind, StubEventSource};
pub use test_utils::TestHarness;
