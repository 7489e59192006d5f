#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave planning: roster composition, spawn cadence and difficulty scaling.

use rand::{seq::SliceRandom, Rng};
use tower_defence_core::{EnemyKind, WaveConfig, WaveScaling};

/// Enemies per archetype block before the roster moves to the next archetype.
const ROSTER_BLOCK: u32 = 3;

/// Everything the world needs to start one wave.
#[derive(Clone, Debug, PartialEq)]
pub struct WavePlan {
    /// One-based wave index.
    pub wave: u32,
    /// Enemy archetypes in spawn order.
    pub roster: Vec<EnemyKind>,
    /// Ticks between successive spawns.
    pub spawn_interval: u32,
    /// Health and speed multipliers for every enemy of the wave.
    pub scaling: WaveScaling,
}

/// Pure system that derives [`WavePlan`] values from the wave curve.
#[derive(Clone, Copy, Debug)]
pub struct WavePlanner {
    config: WaveConfig,
}

impl WavePlanner {
    /// Creates a planner for the provided curve.
    #[must_use]
    pub const fn new(config: WaveConfig) -> Self {
        Self { config }
    }

    /// Number of enemies enqueued for the wave.
    #[must_use]
    pub fn enemy_count(&self, wave: u32) -> u32 {
        self.config
            .base_enemy_count
            .saturating_add(self.config.enemies_per_wave.saturating_mul(wave))
    }

    /// Spawn interval for the wave, shortening by one tick per wave down to the floor.
    #[must_use]
    pub fn spawn_interval(&self, wave: u32) -> u32 {
        self.config
            .base_spawn_interval
            .saturating_sub(wave)
            .max(self.config.min_spawn_interval)
    }

    /// Health and speed multipliers for the wave; wave one is unscaled.
    #[must_use]
    pub fn scaling(&self, wave: u32) -> WaveScaling {
        let steps = wave.saturating_sub(1) as f32;
        WaveScaling {
            health: 1.0 + self.config.health_growth * steps,
            speed: 1.0 + self.config.speed_growth * steps,
        }
    }

    /// Builds the wave's roster in blocks of three per archetype, then shuffles it.
    ///
    /// The blocks climb from the weakest archetype and saturate at the
    /// strongest, so the multiset of archetypes depends only on the wave while
    /// the spawn order comes from `rng`.
    pub fn roster<R>(&self, wave: u32, rng: &mut R) -> Vec<EnemyKind>
    where
        R: Rng + ?Sized,
    {
        let strongest = EnemyKind::ALL.len() - 1;
        let mut roster: Vec<EnemyKind> = (0..self.enemy_count(wave))
            .map(|index| {
                let block = usize::try_from(index / ROSTER_BLOCK).unwrap_or(strongest);
                EnemyKind::ALL[block.min(strongest)]
            })
            .collect();
        roster.shuffle(rng);
        roster
    }

    /// Plans the complete wave.
    pub fn plan<R>(&self, wave: u32, rng: &mut R) -> WavePlan
    where
        R: Rng + ?Sized,
    {
        WavePlan {
            wave,
            roster: self.roster(wave, rng),
            spawn_interval: self.spawn_interval(wave),
            scaling: self.scaling(wave),
        }
    }
}

impl Default for WavePlanner {
    fn default() -> Self {
        Self::new(WaveConfig::default())
    }
}
