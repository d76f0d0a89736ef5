//! Level-complete scoring and star rating

use serde::{Deserialize, Serialize};

use super::clock::Timers;
use super::state::Progress;
use crate::consts::*;

/// Score breakdown shown on the result screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub stage: u32,
    pub time_bonus: u64,
    pub key_score: u64,
    pub bonus_score: u64,
    pub combo_bonus: u64,
    /// Sum of the above; added to the running score
    pub total: u64,
    /// 1 to 3
    pub stars: u8,
    /// Time spent in the level (ms)
    pub time_used: f32,
    /// Set by the session when this run beat a stored best
    pub new_best: bool,
}

/// Score a completed level
pub fn evaluate(stage: u32, timed: bool, progress: &Progress, timers: &Timers) -> LevelResult {
    let spare_secs = ((timers.max_time - timers.time_used) / 1000.0).floor().max(0.0) as u64;
    let time_bonus = spare_secs * u64::from(stage);
    let key_score = u64::from(progress.keys_collected) * KEY_POINTS;
    let bonus_score = u64::from(progress.bonus_collected) * BONUS_POINTS;
    let combo_bonus = if progress.max_combo >= COMBO_BONUS_THRESHOLD {
        u64::from(progress.max_combo) * COMBO_BONUS_POINTS
    } else {
        0
    };

    LevelResult {
        stage,
        time_bonus,
        key_score,
        bonus_score,
        combo_bonus,
        total: time_bonus + key_score + bonus_score + combo_bonus,
        stars: star_rating(timers.remaining_fraction(timed), progress),
        time_used: timers.time_used,
        new_best: false,
    }
}

/// 1 for finishing, 2 for a decent time or half the keys, 3 for a fast full clear
pub fn star_rating(time_fraction: f32, progress: &Progress) -> u8 {
    let all_keys = progress.keys_collected >= progress.keys_total;
    let all_bonus = progress.bonus_collected >= progress.bonus_total;
    let half_keys = progress.keys_collected * 2 >= progress.keys_total;

    if time_fraction >= 0.7 && all_keys && all_bonus {
        3
    } else if time_fraction >= 0.4 || half_keys {
        2
    } else {
        1
    }
}
