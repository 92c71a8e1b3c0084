/*!
Fixtures d'événements d'état

- EventBuilder : construction fluide d'un StateEvent
- FixtureLoader : charge des jeux d'événements JSON depuis un répertoire
  (un fichier `nom.json` = un tableau de StateEvent), pratique pour faire
  tourner le dashboard sur des données réalistes sans base
*/

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use vigie_kernel::{StateEvent, StatusCode};

/// Instant de référence des fixtures : 2023-11-14 22:13:20 UTC
pub const FIXTURE_EPOCH: i64 = 1_700_000_000;

#[derive(Debug, Clone)]
pub struct EventBuilder {
    event: StateEvent,
}

impl EventBuilder {
    /// Événement OK, ouvert à FIXTURE_EPOCH, sans fin
    pub fn new<S: Into<String>>(service: S) -> Self {
        Self {
            event: StateEvent {
                start_time: FIXTURE_EPOCH,
                end_time: None,
                state: StatusCode::Ok.into(),
                description: service.into(),
            },
        }
    }

    pub fn status(mut self, code: StatusCode) -> Self {
        self.event.state = code.into();
        self
    }

    /// Code brut, y compris hors de l'ensemble connu
    pub fn raw_state(mut self, state: i64) -> Self {
        self.event.state = state;
        self
    }

    pub fn starting_at(mut self, start_time: i64) -> Self {
        self.event.start_time = start_time;
        self
    }

    /// Ferme l'événement `seconds` secondes après son début
    pub fn lasting(mut self, seconds: i64) -> Self {
        self.event.end_time = Some(self.event.start_time + seconds);
        self
    }

    pub fn build(self) -> StateEvent {
        self.event
    }
}

/// Charge et garde en mémoire des jeux d'événements
pub struct FixtureLoader {
    sets: HashMap<String, Vec<StateEvent>>,
    fixtures_dir: PathBuf,
}

impl FixtureLoader {
    pub fn new<P: AsRef<Path>>(fixtures_dir: P) -> Self {
        Self {
            sets: HashMap::new(),
            fixtures_dir: fixtures_dir.as_ref().to_path_buf(),
        }
    }

    /// Charge tous les `*.json` du répertoire, retourne le nombre de jeux chargés
    pub fn load_all(&mut self) -> Result<usize> {
        if !self.fixtures_dir.exists() {
            log::warn!("Fixtures directory not found: {}", self.fixtures_dir.display());
            return Ok(0);
        }

        let mut count = 0;
        for entry in std::fs::read_dir(&self.fixtures_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
                continue;
            };
            match load_events(&path) {
                Ok(events) => {
                    log::info!("📜 Loaded fixture: {} ({} events)", name, events.len());
                    self.sets.insert(name, events);
                    count += 1;
                }
                Err(e) => log::warn!("⚠️ Failed to load fixture {}: {:#}", path.display(), e),
            }
        }
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&[StateEvent]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

pub fn load_events(path: &Path) -> Result<Vec<StateEvent>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
