use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::Vector3;

/// Player progression and vitals. Health and energy are signed and carry no
/// floor; nothing clamps them.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStats {
    pub level: u32,
    pub experience: i64,
    pub experience_to_next: i64,
    pub credits: i64,
    pub energy: i64,
    pub max_energy: i64,
    pub health: i64,
    pub max_health: i64,
    pub position: Vector3,
    pub rotation: Vector3,
    /// Experience earned over the whole career; used when sharing a score.
    pub score: i64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        PlayerStats {
            level: 1,
            experience: 0,
            experience_to_next: EXPERIENCE_PER_LEVEL,
            credits: STARTING_CREDITS,
            energy: MAX_ENERGY,
            max_energy: MAX_ENERGY,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            position: Vector3::ZERO,
            rotation: Vector3::ZERO,
            score: 0,
        }
    }
}

impl PlayerStats {
    /// Adds experience and returns the new level when the threshold was
    /// crossed. Only one level is granted per call even if `amount` covers
    /// several thresholds.
    pub fn add_experience(&mut self, amount: i64) -> Option<u32> {
        self.experience += amount;
        self.score += amount;
        if self.experience >= self.experience_to_next {
            Some(self.level_up())
        } else {
            None
        }
    }

    pub fn add_credits(&mut self, amount: i64) {
        self.credits += amount;
    }

    fn level_up(&mut self) -> u32 {
        self.level += 1;
        self.experience = 0;
        self.experience_to_next = self.level as i64 * EXPERIENCE_PER_LEVEL;
        info!("Level up! Now level {}", self.level);
        self.level
    }

    pub fn progress(&self, inventory: Vec<String>) -> Progress {
        Progress {
            level: self.level,
            experience: self.experience,
            experience_to_next: self.experience_to_next,
            credits: self.credits,
            score: self.score,
            inventory,
        }
    }

    pub fn restore(&mut self, progress: &Progress) {
        self.level = progress.level.max(1);
        self.experience = progress.experience;
        self.experience_to_next = progress.experience_to_next;
        self.credits = progress.credits;
        self.score = progress.score;
    }
}

/// Persisted snapshot of progression. Inventory entries are shop item ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    pub experience: i64,
    pub experience_to_next: i64,
    pub credits: i64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub inventory: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_threshold_levels_up_once_and_resets_experience() {
        let mut stats = PlayerStats::default();
        stats.experience = 95;
        assert_eq!(stats.add_experience(10), Some(2));
        assert_eq!(stats.level, 2);
        assert_eq!(stats.experience, 0);
        assert_eq!(stats.experience_to_next, 200);
    }

    #[test]
    fn large_gain_does_not_cascade() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.add_experience(450), Some(2));
        assert_eq!(stats.level, 2);
        assert_eq!(stats.experience, 0);
        assert_eq!(stats.score, 450);
    }

    #[test]
    fn below_threshold_keeps_level() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.add_experience(99), None);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.experience, 99);
    }

    #[test]
    fn restore_round_trips_progress() {
        let mut stats = PlayerStats::default();
        stats.add_experience(120);
        stats.add_credits(50);
        let progress = stats.progress(vec!["engine_boost_1".to_string()]);

        let mut fresh = PlayerStats::default();
        fresh.restore(&progress);
        assert_eq!(fresh.level, 2);
        assert_eq!(fresh.credits, 1050);
        assert_eq!(fresh.score, 120);
    }
}
