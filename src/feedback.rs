//! Feedback cues for game events
//!
//! The core never produces sound itself. It hands each `GameEvent` to a
//! `FeedbackSink`; the browser host can map cues to Web Audio, the native
//! host just logs them.

use thiserror::Error;

use crate::sim::GameEvent;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback backend unavailable: {0}")]
    Unavailable(String),
}

/// Named cue a sink can map to a sound or vibration pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Key collected
    Key,
    /// Bonus item collected
    Coin,
    /// Speed boost or time freeze collected
    PowerUp,
    /// Combo chain grew
    Combo,
    /// Stepped on a trap
    Trap,
    /// Last key collected
    Unlock,
    /// Hint path shown
    Hint,
    /// Exit reached
    Victory,
    /// Timer ran out
    Defeat,
    /// A best record was beaten
    Fanfare,
}

impl Cue {
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::PickupKey => Cue::Key,
            GameEvent::PickupBonus => Cue::Coin,
            GameEvent::SpeedBoost | GameEvent::TimeFreeze => Cue::PowerUp,
            GameEvent::ComboReached(_) => Cue::Combo,
            GameEvent::TrapTriggered => Cue::Trap,
            GameEvent::ExitUnlocked => Cue::Unlock,
            GameEvent::HintShown => Cue::Hint,
            GameEvent::LevelComplete => Cue::Victory,
            GameEvent::GameOver => Cue::Defeat,
            GameEvent::NewRecord { .. } => Cue::Fanfare,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Key => "key",
            Cue::Coin => "coin",
            Cue::PowerUp => "powerup",
            Cue::Combo => "combo",
            Cue::Trap => "trap",
            Cue::Unlock => "unlock",
            Cue::Hint => "hint",
            Cue::Victory => "victory",
            Cue::Defeat => "defeat",
            Cue::Fanfare => "fanfare",
        }
    }
}

/// Receiver of game events (audio, haptics, analytics)
pub trait FeedbackSink {
    fn notify(&mut self, event: &GameEvent) -> Result<(), FeedbackError>;

    /// Mute/unmute; sinks without audio can ignore this
    fn set_muted(&mut self, _muted: bool) {}
}

/// Sink that writes cues to the log
#[derive(Debug, Default)]
pub struct LogFeedback {
    muted: bool,
}

impl LogFeedback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackSink for LogFeedback {
    fn notify(&mut self, event: &GameEvent) -> Result<(), FeedbackError> {
        if !self.muted {
            log::debug!("cue {} ({event:?})", Cue::for_event(event).as_str());
        }
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// Sink that drops everything
#[derive(Debug, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&mut self, _event: &GameEvent) -> Result<(), FeedbackError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_ups_share_a_cue() {
        assert_eq!(Cue::for_event(&GameEvent::SpeedBoost), Cue::PowerUp);
        assert_eq!(Cue::for_event(&GameEvent::TimeFreeze), Cue::PowerUp);
        assert_eq!(Cue::for_event(&GameEvent::ComboReached(4)), Cue::Combo);
        assert_eq!(
            Cue::for_event(&GameEvent::NewRecord {
                stage: true,
                score: false
            })
            .as_str(),
            "fanfare"
        );
    }

    #[test]
    fn test_log_feedback_never_fails() {
        let mut sink = LogFeedback::new();
        assert!(sink.notify(&GameEvent::PickupKey).is_ok());
        sink.set_muted(true);
        assert!(sink.notify(&GameEvent::GameOver).is_ok());
    }

    #[test]
    fn test_error_message() {
        let err = FeedbackError::Unavailable("audio context suspended".into());
        assert_eq!(err.to_string(), "feedback backend unavailable: audio context suspended");
    }
}
