//! Enemy movement along the pixel path and damage bookkeeping.

use glam::Vec2;
use tower_defence_core::{EnemyId, EnemyKind, EnemySnapshot, WaveScaling};

/// Absorbs float error so that e.g. `25 × 1.32` truncates to 33 rather than 32.
const HEALTH_ROUNDING_SLACK: f64 = 1e-4;

/// Authoritative state of a single enemy.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    path_index: usize,
    speed: f32,
    max_health: u32,
    health: u32,
    bounty: u32,
    alive: bool,
    reached_end: bool,
}

impl Enemy {
    /// Creates an enemy with wave scaling baked into its health and speed.
    pub(crate) fn new(id: EnemyId, kind: EnemyKind, scaling: WaveScaling) -> Self {
        let stats = kind.stats();
        let max_health = scaled_health(stats.max_health, scaling.health);
        Self {
            id,
            kind,
            position: Vec2::ZERO,
            path_index: 0,
            speed: stats.speed * scaling.speed,
            max_health,
            health: max_health,
            bounty: stats.bounty,
            alive: true,
            reached_end: false,
        }
    }

    /// Places the enemy on the first point of the path.
    pub(crate) fn enter(&mut self, start: Vec2) {
        self.position = start;
        self.path_index = 0;
    }

    /// Consumes `speed` pixels of travel along `path`, crossing as many points as needed.
    ///
    /// Once the cursor rests on the final point, the next call flags the enemy
    /// as having reached the end.
    pub(crate) fn advance(&mut self, path: &[Vec2]) {
        if self.path_index + 1 >= path.len() {
            self.reached_end = true;
            self.alive = false;
            return;
        }

        let mut budget = self.speed;
        while budget > 0.0 && self.path_index + 1 < path.len() {
            let next = path[self.path_index + 1];
            let delta = next - self.position;
            let distance = delta.length();

            if distance == 0.0 {
                self.path_index += 1;
                continue;
            }

            if distance <= budget {
                self.position = next;
                self.path_index += 1;
                budget -= distance;
            } else {
                self.position += delta / distance * budget;
                budget = 0.0;
            }
        }
    }

    /// Applies damage and returns the bounty on the killing blow, zero otherwise.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        if !self.alive {
            return 0;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return self.bounty;
        }
        0
    }

    pub(crate) const fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) const fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) const fn reached_end(&self) -> bool {
        self.reached_end
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            path_index: self.path_index,
            health: self.health,
            max_health: self.max_health,
        }
    }
}

fn scaled_health(base: u32, multiplier: f32) -> u32 {
    let scaled = f64::from(base) * f64::from(multiplier) + HEALTH_ROUNDING_SLACK;
    scaled.max(1.0).floor() as u32
}
