//! Score accumulation and the level/speed ladder
//!
//! Levels derive from the running score and only ever announce strict
//! increases; the derived speed feeds the gravity interval but is
//! suppressed, not clamped, once it would exceed the configured maximum.

use crate::config::GameConfig;

/// Level for a given score, floored at the starting level
pub fn calculate_level(score: u64, config: &GameConfig) -> u32 {
    ((score / config.points_per_level) as u32).max(config.start_level)
}

/// Speed for a given level; each level above the first adds the coefficient
pub fn calculate_speed(level: u32, config: &GameConfig) -> f32 {
    config.start_speed + level.saturating_sub(1) as f32 * config.speed_coefficient
}

/// What a points feed changed, if anything
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressDelta {
    /// Newly announced level, strictly above every earlier announcement
    pub level: Option<u32>,
    /// New speed, present only when the level rose and the cap allows it
    pub speed: Option<f32>,
}

/// Running score with the last announced level and active speed
#[derive(Debug, Clone)]
pub struct Progression {
    score: u64,
    level: u32,
    speed: f32,
}

impl Progression {
    /// Starts at zero score; the level stays unannounced until the first feed
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            level: 0,
            speed: config.start_speed,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Add points (negative feeds count as zero) and derive the level.
    ///
    /// The very first feed announces the start level even for zero points,
    /// which is what arms gravity at the base interval.
    pub fn receive_points(&mut self, points: i64, config: &GameConfig) -> ProgressDelta {
        self.score += points.max(0) as u64;
        let level = calculate_level(self.score, config);
        let mut delta = ProgressDelta::default();
        if level > self.level {
            self.level = level;
            delta.level = Some(level);
            let speed = calculate_speed(level, config);
            if speed <= config.max_speed {
                self.speed = speed;
                delta.speed = Some(speed);
            }
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_the_floored_score_ratio_with_a_minimum() {
        let config = GameConfig::default();
        assert_eq!(calculate_level(0, &config), 1);
        assert_eq!(calculate_level(1000, &config), 1);
        assert_eq!(calculate_level(1999, &config), 1);
        assert_eq!(calculate_level(2000, &config), 2);
        assert_eq!(calculate_level(3500, &config), 3);
    }

    #[test]
    fn test_speed_is_linear_in_level() {
        let config = GameConfig::default();
        assert_eq!(calculate_speed(1, &config), 1.0);
        assert_eq!(calculate_speed(2, &config), 1.25);
        assert_eq!(calculate_speed(5, &config), 2.0);
    }

    #[test]
    fn test_first_feed_announces_the_start_level() {
        let config = GameConfig::default();
        let mut progression = Progression::new(&config);
        let delta = progression.receive_points(0, &config);
        assert_eq!(delta.level, Some(1));
        assert_eq!(delta.speed, Some(1.0));
        assert_eq!(progression.score(), 0);
    }

    #[test]
    fn test_level_stays_quiet_below_the_threshold() {
        let config = GameConfig::default();
        let mut progression = Progression::new(&config);
        progression.receive_points(0, &config);
        assert_eq!(
            progression.receive_points(1999, &config),
            ProgressDelta::default()
        );
        let delta = progression.receive_points(1, &config);
        assert_eq!(delta.level, Some(2));
        assert_eq!(delta.speed, Some(1.25));
        assert_eq!(progression.score(), 2000);
    }

    #[test]
    fn test_skipping_thresholds_announces_once_with_the_top_level() {
        let config = GameConfig::default();
        let mut progression = Progression::new(&config);
        progression.receive_points(0, &config);
        let delta = progression.receive_points(5000, &config);
        assert_eq!(delta.level, Some(5));
        assert_eq!(delta.speed, Some(2.0));
    }

    #[test]
    fn test_negative_feeds_count_as_zero() {
        let config = GameConfig::default();
        let mut progression = Progression::new(&config);
        progression.receive_points(0, &config);
        progression.receive_points(-50, &config);
        assert_eq!(progression.score(), 0);
    }

    #[test]
    fn test_speed_past_the_cap_is_suppressed_but_the_level_advances() {
        let config = GameConfig {
            points_per_level: 10,
            speed_coefficient: 100.0,
            ..GameConfig::default()
        };
        let mut progression = Progression::new(&config);
        progression.receive_points(0, &config);
        let delta = progression.receive_points(20, &config);
        assert_eq!(delta.level, Some(2));
        assert_eq!(delta.speed, None);
        assert_eq!(progression.speed(), 1.0);
        assert_eq!(progression.level(), 2);
    }
}
