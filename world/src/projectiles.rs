//! Homing projectiles fired by towers.

use glam::Vec2;
use tower_defence_core::{EnemyId, ProjectileId, ProjectileSnapshot};

use crate::enemies::Enemy;

/// Result of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProjectileOutcome {
    /// The projectile is still travelling.
    InFlight,
    /// The projectile reached its target and applied its damage.
    Impact {
        /// Enemy that was struck.
        target: EnemyId,
        /// Damage applied.
        damage: u32,
        /// Bounty returned by the killing blow, zero when the target survived.
        reward: u32,
    },
    /// The target disappeared or died first; the projectile is discarded without effect.
    Orphaned,
}

/// A projectile homing onto one enemy.
///
/// The projectile refers to its target by identifier only, so an enemy killed
/// or removed by other means simply orphans it.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    position: Vec2,
    target: EnemyId,
    damage: u32,
    speed: f32,
    heading: f32,
}

impl Projectile {
    pub(crate) fn new(
        id: ProjectileId,
        position: Vec2,
        target: EnemyId,
        damage: u32,
        speed: f32,
    ) -> Self {
        Self {
            id,
            position,
            target,
            damage,
            speed,
            heading: 0.0,
        }
    }

    pub(crate) const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Moves one step toward the target's current position, striking it when within reach.
    pub(crate) fn advance(&mut self, enemies: &mut [Enemy]) -> ProjectileOutcome {
        let Some(target) = enemies
            .iter_mut()
            .find(|enemy| enemy.id() == self.target)
        else {
            return ProjectileOutcome::Orphaned;
        };

        if !target.is_alive() {
            return ProjectileOutcome::Orphaned;
        }

        let delta = target.position() - self.position;
        let distance = delta.length();
        if distance <= self.speed {
            self.position = target.position();
            let reward = target.take_damage(self.damage);
            return ProjectileOutcome::Impact {
                target: self.target,
                damage: self.damage,
                reward,
            };
        }

        self.position += delta / distance * self.speed;
        self.heading = delta.y.atan2(delta.x);
        ProjectileOutcome::InFlight
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            target: self.target,
            heading: self.heading,
        }
    }
}
