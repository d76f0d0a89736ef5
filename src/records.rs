//! Best stage / best score records
//!
//! Two integers, stored as decimal strings under fixed keys.

use crate::persistence::KeyValueStore;

/// Which records a finished level beat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub new_best_stage: bool,
    pub new_best_score: bool,
}

impl RecordOutcome {
    pub fn any(&self) -> bool {
        self.new_best_stage || self.new_best_score
    }
}

/// Persisted bests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestRecords {
    pub best_stage: u32,
    pub best_score: u64,
}

impl BestRecords {
    const STAGE_KEY: &'static str = "maze_runner_best_stage";
    const SCORE_KEY: &'static str = "maze_runner_best_score";

    /// Load from the store; missing or unreadable values count as zero
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let records = Self {
            best_stage: read_number(store, Self::STAGE_KEY)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
            best_score: read_number(store, Self::SCORE_KEY).unwrap_or(0),
        };
        log::info!(
            "Loaded records: best stage {}, best score {}",
            records.best_stage,
            records.best_score
        );
        records
    }

    /// Compare a result against the bests, persisting whichever improved.
    ///
    /// Write failures are logged; the in-memory bests still update.
    pub fn submit(&mut self, stage: u32, score: u64, store: &mut dyn KeyValueStore) -> RecordOutcome {
        let mut outcome = RecordOutcome::default();

        if stage > self.best_stage {
            self.best_stage = stage;
            outcome.new_best_stage = true;
            persist(store, Self::STAGE_KEY, u64::from(stage));
        }
        if score > self.best_score {
            self.best_score = score;
            outcome.new_best_score = true;
            persist(store, Self::SCORE_KEY, score);
        }

        if outcome.any() {
            log::info!("New record: stage {}, score {}", self.best_stage, self.best_score);
        }
        outcome
    }
}

fn read_number(store: &dyn KeyValueStore, key: &str) -> Option<u64> {
    match store.get(key) {
        Ok(Some(raw)) => match raw.trim().parse() {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("Ignoring unreadable {key}={raw:?}: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read {key}: {e}");
            None
        }
    }
}

fn persist(store: &mut dyn KeyValueStore, key: &str, value: u64) {
    if let Err(e) = store.set(key, &value.to_string()) {
        log::warn!("Failed to save {key}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FailingStore, MemoryStore};

    #[test]
    fn test_load_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(BestRecords::load(&store), BestRecords::default());
    }

    #[test]
    fn test_submit_updates_independently() {
        let mut store = MemoryStore::new();
        let mut records = BestRecords::load(&store);

        let first = records.submit(1, 500, &mut store);
        assert!(first.new_best_stage && first.new_best_score);

        // Higher stage, lower score
        let second = records.submit(2, 300, &mut store);
        assert!(second.new_best_stage);
        assert!(!second.new_best_score);

        // Same stage, higher score
        let third = records.submit(2, 900, &mut store);
        assert!(!third.new_best_stage);
        assert!(third.new_best_score);

        assert_eq!(store.get("maze_runner_best_stage").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("maze_runner_best_score").unwrap().as_deref(), Some("900"));
        assert_eq!(
            BestRecords::load(&store),
            BestRecords {
                best_stage: 2,
                best_score: 900
            }
        );
    }

    #[test]
    fn test_garbage_values_ignored() {
        let mut store = MemoryStore::new();
        store.set("maze_runner_best_stage", "lots").unwrap();
        store.set("maze_runner_best_score", " 1234 ").unwrap();
        let records = BestRecords::load(&store);
        assert_eq!(records.best_stage, 0);
        assert_eq!(records.best_score, 1234);
    }

    #[test]
    fn test_broken_store_degrades() {
        let mut store = FailingStore;
        let mut records = BestRecords::load(&store);
        assert_eq!(records, BestRecords::default());
        let outcome = records.submit(3, 100, &mut store);
        assert!(outcome.any());
        assert_eq!(records.best_stage, 3);
    }
}
