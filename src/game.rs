//! Game session
//!
//! Wraps a `GameState` with the things that outlive a single run: settings,
//! best records, storage and the feedback sink.

use crate::feedback::FeedbackSink;
use crate::persistence::KeyValueStore;
use crate::records::{BestRecords, RecordOutcome};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameMode, GamePhase, GameState, LevelResult, TickInput, tick};
use crate::view::{FrameView, Hud};

pub struct Game {
    state: GameState,
    settings: Settings,
    records: BestRecords,
    store: Box<dyn KeyValueStore>,
    sink: Box<dyn FeedbackSink>,
}

impl Game {
    /// Load settings and records, then build stage 1 on the start screen
    pub fn new(store: Box<dyn KeyValueStore>, sink: Box<dyn FeedbackSink>) -> Self {
        let settings = Settings::load(store.as_ref());
        let state = GameState::new(settings.mode);
        Self::assemble(state, settings, store, sink)
    }

    /// Same as [`Game::new`] with a fixed level seed
    pub fn with_seed(store: Box<dyn KeyValueStore>, sink: Box<dyn FeedbackSink>, seed: u64) -> Self {
        let settings = Settings::load(store.as_ref());
        let state = GameState::with_seed(settings.mode, seed);
        Self::assemble(state, settings, store, sink)
    }

    fn assemble(
        state: GameState,
        settings: Settings,
        store: Box<dyn KeyValueStore>,
        mut sink: Box<dyn FeedbackSink>,
    ) -> Self {
        let records = BestRecords::load(store.as_ref());
        sink.set_muted(!settings.sound_enabled);
        Self {
            state,
            settings,
            records,
            store,
            sink,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn records(&self) -> &BestRecords {
        &self.records
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Breakdown of the level just completed
    pub fn last_result(&self) -> Option<&LevelResult> {
        self.state.last_result.as_ref()
    }

    /// Fresh run from stage 1 with the saved mode
    pub fn start_game(&mut self) {
        self.state.mode = self.settings.mode;
        self.state.start();
        log::info!("New {} run", self.state.mode.as_str());
    }

    /// Continue after a completed level
    pub fn next_level(&mut self) -> bool {
        self.state.next_level()
    }

    /// Back to the start screen from a finished or paused run
    pub fn restart(&mut self) -> bool {
        match self.state.phase {
            GamePhase::GameOver | GamePhase::LevelComplete | GamePhase::Paused => {
                self.state.to_menu();
                true
            }
            GamePhase::Ready | GamePhase::Playing => false,
        }
    }

    /// Pick a rule set on the start screen
    pub fn set_mode(&mut self, mode: GameMode) -> bool {
        if !self.state.set_mode(mode) {
            return false;
        }
        if self.settings.mode != mode {
            self.settings.mode = mode;
            self.settings.save(self.store.as_mut());
        }
        true
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        self.sink.set_muted(!self.settings.sound_enabled);
        self.settings.save(self.store.as_mut());
        self.settings.sound_enabled
    }

    pub fn toggle_minimap(&mut self) -> bool {
        self.settings.show_minimap = !self.settings.show_minimap;
        self.settings.save(self.store.as_mut());
        self.settings.show_minimap
    }

    /// Run one tick and route its events; returns them for the host
    pub fn frame(&mut self, raw_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        let mut events = tick(&mut self.state, input, raw_dt);

        if events.contains(&GameEvent::LevelComplete) {
            let outcome = self.record_completion();
            if outcome.any() {
                events.push(GameEvent::NewRecord {
                    stage: outcome.new_best_stage,
                    score: outcome.new_best_score,
                });
            }
        }

        for event in &events {
            if let Err(e) = self.sink.notify(event) {
                log::warn!("Feedback for {event:?} failed: {e}");
            }
        }
        events
    }

    fn record_completion(&mut self) -> RecordOutcome {
        let outcome = self
            .records
            .submit(self.state.stage, self.state.score, self.store.as_mut());
        if let Some(result) = self.state.last_result.as_mut() {
            result.new_best = outcome.any();
        }
        outcome
    }

    pub fn hud(&self) -> Hud {
        Hud::new(&self.state, &self.settings, &self.records)
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView::new(&self.state, &self.settings, &self.records)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::feedback::{FeedbackError, NullFeedback};
    use crate::persistence::MemoryStore;

    /// Sink that keeps every event and can be told to fail
    #[derive(Clone, Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<GameEvent>>>,
        fail: bool,
    }

    impl FeedbackSink for Recorder {
        fn notify(&mut self, event: &GameEvent) -> Result<(), FeedbackError> {
            self.events.borrow_mut().push(*event);
            if self.fail {
                return Err(FeedbackError::Unavailable("test".into()));
            }
            Ok(())
        }
    }

    fn game() -> Game {
        Game::with_seed(Box::new(MemoryStore::new()), Box::new(NullFeedback), 11)
    }

    /// Teleport onto every key, then onto the exit
    fn finish_level(game: &mut Game) -> Vec<GameEvent> {
        let keys: Vec<Vec2> = game
            .state
            .level
            .items
            .iter()
            .filter(|item| item.kind == crate::sim::ItemKind::Key)
            .map(|item| item.pos)
            .collect();
        let mut events = Vec::new();
        for pos in keys {
            game.state.player.pos = pos;
            events.extend(game.frame(0.016, &TickInput::default()));
        }
        game.state.player.pos = game.state.exit_pos();
        events.extend(game.frame(0.016, &TickInput::default()));
        events
    }

    #[test]
    fn test_starts_on_menu_with_saved_mode() {
        let mut store = MemoryStore::new();
        Settings {
            mode: GameMode::Fog,
            ..Settings::default()
        }
        .save(&mut store);
        let mut game = Game::with_seed(Box::new(store), Box::new(NullFeedback), 1);
        assert_eq!(game.phase(), GamePhase::Ready);
        assert_eq!(game.state().mode, GameMode::Fog);

        game.start_game();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().stage, 1);
    }

    #[test]
    fn test_level_complete_sets_records() {
        let mut game = game();
        game.start_game();
        let events = finish_level(&mut game);

        assert!(events.contains(&GameEvent::ExitUnlocked));
        assert!(events.contains(&GameEvent::LevelComplete));
        assert!(events.contains(&GameEvent::NewRecord {
            stage: true,
            score: true
        }));
        assert_eq!(game.phase(), GamePhase::LevelComplete);
        assert!(game.last_result().is_some_and(|r| r.new_best));
        assert_eq!(game.records().best_stage, 1);
        assert_eq!(game.records().best_score, game.state().score);

        assert!(game.next_level());
        assert_eq!(game.state().stage, 2);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_no_record_when_bests_hold() {
        let mut store = MemoryStore::new();
        store.set("maze_runner_best_stage", "9").unwrap();
        store.set("maze_runner_best_score", "999999").unwrap();
        let mut game = Game::with_seed(Box::new(store), Box::new(NullFeedback), 12);
        game.start_game();
        let events = finish_level(&mut game);
        assert!(events.contains(&GameEvent::LevelComplete));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewRecord { .. })));
        assert!(game.last_result().is_some_and(|r| !r.new_best));
    }

    #[test]
    fn test_events_reach_sink_even_when_it_fails() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let seen = recorder.events.clone();
        let mut game = Game::with_seed(Box::new(MemoryStore::new()), Box::new(recorder), 13);
        game.start_game();
        let events = finish_level(&mut game);
        assert_eq!(*seen.borrow(), events);
        assert_eq!(game.phase(), GamePhase::LevelComplete);
    }

    #[test]
    fn test_restart_rules() {
        let mut game = game();
        assert!(!game.restart());
        game.start_game();
        assert!(!game.restart());

        game.frame(0.016, &TickInput {
            pause: true,
            ..Default::default()
        });
        assert_eq!(game.phase(), GamePhase::Paused);
        assert!(game.restart());
        assert_eq!(game.phase(), GamePhase::Ready);
        assert_eq!(game.state().score, 0);
    }

    #[test]
    fn test_mode_and_toggles_persist() {
        let mut game = game();
        assert!(game.set_mode(GameMode::Timed));
        assert!(!game.toggle_sound());
        assert!(!game.toggle_minimap());
        assert!(game.toggle_minimap());

        let saved = Settings::load(game.store.as_ref());
        assert_eq!(saved.mode, GameMode::Timed);
        assert!(!saved.sound_enabled);
        assert!(saved.show_minimap);

        game.start_game();
        assert!(game.state().is_timed());
        assert!(!game.set_mode(GameMode::Normal));
        assert_eq!(game.settings().mode, GameMode::Timed);
    }

    #[test]
    fn test_view_matches_state() {
        let mut game = game();
        game.start_game();
        let view = game.view();
        assert_eq!(view.player_pos, Vec2::new(1.5, 1.5));
        assert_eq!(view.items.len(), game.state().level.items.len());
        assert!(view.hint_path.is_empty());
        assert_eq!(view.hud, game.hud());
    }
}
