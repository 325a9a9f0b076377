//! Counters for one K-determinized search and the summary of its root pick.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The root child a search settled on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootChoice {
    pub visits: u32,
    /// Mean reward, or the max-child value when that policy picked it.
    pub reward: f64,
    /// UCB1 score minus mean reward. Zero for terminal children.
    pub confidence: f64,
    /// Expanded root children the visits were shared between.
    pub siblings: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u32,
    /// Walks whose frontier was evaluated. The rest ended on a terminal node.
    pub simulations: u32,
    pub nodes_expanded: u32,
    /// Fresh chance resolutions stored in a slot.
    pub determinizations: u32,
    /// Walks that reused a stored resolution.
    pub replays: u32,
    pub max_depth: u16,
    pub time_us: u64,
    pub chosen: Option<RootChoice>,
}

impl SearchStats {
    pub(crate) fn record_walk(&mut self, depth: u16, evaluated: bool) {
        self.iterations += 1;
        self.max_depth = self.max_depth.max(depth);
        if evaluated {
            self.simulations += 1;
        }
    }

    pub(crate) fn record_chance(&mut self, fresh: bool) {
        if fresh {
            self.determinizations += 1;
        } else {
            self.replays += 1;
        }
    }

    pub(crate) fn finish(&mut self, elapsed: Duration) {
        self.time_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    }

    #[must_use]
    pub fn terminal_walks(&self) -> u32 {
        self.iterations - self.simulations
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            return 0.0;
        }
        f64::from(self.iterations) * 1e6 / self.time_us as f64
    }

    /// Share of chance-node passes served from a stored resolution. Climbs
    /// toward 1 as nodes fill their K slots.
    #[must_use]
    pub fn replay_fraction(&self) -> f64 {
        let passes = self.determinizations + self.replays;
        if passes == 0 {
            0.0
        } else {
            f64::from(self.replays) / f64::from(passes)
        }
    }

    /// How far the chosen child's visits exceed an even split across its
    /// siblings, as a fraction of all iterations.
    #[must_use]
    pub fn visit_excess(&self) -> Option<f64> {
        let chosen = self.chosen?;
        if self.iterations == 0 {
            return None;
        }
        let iterations = f64::from(self.iterations);
        let fair_share = iterations / chosen.siblings.max(1) as f64;
        Some((f64::from(chosen.visits) - fair_share) / iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_split_into_evaluated_and_terminal() {
        let mut stats = SearchStats::default();
        stats.record_walk(3, true);
        stats.record_walk(7, false);
        stats.record_walk(2, true);

        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.simulations, 2);
        assert_eq!(stats.terminal_walks(), 1);
        assert_eq!(stats.max_depth, 7);
    }

    #[test]
    fn test_replay_fraction() {
        let mut stats = SearchStats::default();
        assert_eq!(stats.replay_fraction(), 0.0);
        stats.record_chance(true);
        for _ in 0..3 {
            stats.record_chance(false);
        }
        assert_eq!(stats.determinizations, 1);
        assert_eq!(stats.replay_fraction(), 0.75);
    }

    #[test]
    fn test_visit_excess_against_even_split() {
        let mut stats = SearchStats::default();
        assert_eq!(stats.visit_excess(), None);

        for _ in 0..100 {
            stats.record_walk(1, true);
        }
        stats.chosen = Some(RootChoice { visits: 50, reward: 0.5, confidence: 0.1, siblings: 4 });
        let excess = stats.visit_excess().unwrap();
        assert!((excess - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_rate_from_elapsed() {
        let mut stats = SearchStats::default();
        assert_eq!(stats.iterations_per_second(), 0.0);
        for _ in 0..500 {
            stats.record_walk(1, false);
        }
        stats.finish(Duration::from_millis(250));
        assert_eq!(stats.time_us, 250_000);
        assert_eq!(stats.iterations_per_second(), 2000.0);
    }

    #[test]
    fn test_choice_survives_json() {
        let mut stats = SearchStats::default();
        stats.chosen = Some(RootChoice { visits: 9, reward: 0.25, confidence: 0.125, siblings: 3 });

        let json = serde_json::to_string(&stats).unwrap();
        let back: SearchStats = serde_json::from_str(&json).unwrap();

        assert_eq!(back.chosen, stats.chosen);
    }
}
