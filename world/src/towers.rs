//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::Vec2;
use tower_defence_core::{EnemyId, Tile, TowerId, TowerKind, TowerSnapshot, TowerStats};

use crate::enemies::Enemy;

/// A placed tower and its firing state.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    id: TowerId,
    kind: TowerKind,
    tile: Tile,
    position: Vec2,
    cooldown: u32,
    facing: f32,
}

impl Tower {
    pub(crate) fn new(id: TowerId, kind: TowerKind, tile: Tile, position: Vec2) -> Self {
        Self {
            id,
            kind,
            tile,
            position,
            cooldown: 0,
            facing: 0.0,
        }
    }

    pub(crate) const fn id(&self) -> TowerId {
        self.id
    }

    pub(crate) const fn kind(&self) -> TowerKind {
        self.kind
    }

    pub(crate) const fn tile(&self) -> Tile {
        self.tile
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) const fn stats(&self) -> TowerStats {
        self.kind.stats()
    }

    /// Advances the cooldown and, when it expires, picks a target.
    ///
    /// The cooldown restarts whenever it expires, whether or not an enemy was
    /// in range. Targets are chosen in iteration order: the first live enemy
    /// within range wins.
    pub(crate) fn shoot(&mut self, enemies: &[Enemy]) -> Option<EnemyId> {
        let stats = self.stats();
        self.cooldown += 1;
        if self.cooldown < stats.fire_period {
            return None;
        }
        self.cooldown = 0;

        let target = first_in_range(self.position, stats.range, enemies)?;
        let delta = target.position() - self.position;
        self.facing = delta.y.atan2(delta.x);
        Some(target.id())
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            position: self.position,
            facing: self.facing,
        }
    }
}

fn first_in_range(origin: Vec2, range: f32, enemies: &[Enemy]) -> Option<&Enemy> {
    let range_sq = range * range;
    enemies
        .iter()
        .filter(|enemy| enemy.is_alive())
        .find(|enemy| enemy.position().distance_squared(origin) <= range_sq)
}

/// Registry that stores towers, allocates identifiers and logs placement order.
///
/// The history stack is a log used only for undo; the `entries` map is the
/// source of truth for which towers are standing. Removal by identity keeps
/// both consistent.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    history: Vec<TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            history: Vec::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a new tower and pushes it onto the history stack.
    pub(crate) fn insert(&mut self, kind: TowerKind, tile: Tile, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, Tower::new(id, kind, tile, position));
        self.history.push(id);
        id
    }

    /// Removes a tower by identity, excising it from the history stack as well.
    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        let tower = self.entries.remove(&id)?;
        self.history.retain(|entry| *entry != id);
        Some(tower)
    }

    /// Pops the most recent placement and removes it if it is still standing.
    pub(crate) fn undo(&mut self) -> Option<Tower> {
        let id = self.history.pop()?;
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn at(&self, tile: Tile) -> Option<&Tower> {
        self.entries.values().find(|tower| tower.tile() == tile)
    }

    /// Towers in placement order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Towers in placement order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    pub(crate) fn history(&self) -> &[TowerId] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defence_core::{EnemyKind, WaveScaling};

    fn enemy_at(id: u32, position: Vec2) -> Enemy {
        let mut enemy = Enemy::new(EnemyId::new(id), EnemyKind::Scout, WaveScaling::IDENTITY);
        enemy.enter(position);
        enemy
    }

    #[test]
    fn fires_once_per_period_while_enemies_stay_in_range() {
        let mut tower =
            Tower::new(TowerId::new(0), TowerKind::Bazooka, Tile::new(0, 0), Vec2::ZERO);
        let enemies = [
            enemy_at(1, Vec2::new(10.0, 0.0)),
            enemy_at(2, Vec2::new(20.0, 0.0)),
        ];

        let shots: Vec<u32> = (1..=150)
            .filter(|_| tower.shoot(&enemies).is_some())
            .collect();

        assert_eq!(shots, vec![60, 120]);
    }

    #[test]
    fn targets_first_enemy_in_iteration_order_not_nearest() {
        let mut tower =
            Tower::new(TowerId::new(0), TowerKind::Bazooka, Tile::new(0, 0), Vec2::ZERO);
        tower.cooldown = tower.stats().fire_period - 1;
        let enemies = [
            enemy_at(1, Vec2::new(500.0, 0.0)),
            enemy_at(2, Vec2::new(0.0, 90.0)),
            enemy_at(3, Vec2::new(5.0, 0.0)),
        ];

        assert_eq!(tower.shoot(&enemies), Some(EnemyId::new(2)));
        assert!((tower.facing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn expired_cooldown_restarts_without_target() {
        let mut tower =
            Tower::new(TowerId::new(0), TowerKind::Bazooka, Tile::new(0, 0), Vec2::ZERO);
        tower.cooldown = tower.stats().fire_period - 1;
        let far = [enemy_at(1, Vec2::new(101.0, 0.0))];

        assert_eq!(tower.shoot(&far), None);
        assert_eq!(tower.cooldown, 0);
    }

    #[test]
    fn dead_enemies_are_not_targeted() {
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Sniper, Tile::new(0, 0), Vec2::ZERO);
        tower.cooldown = tower.stats().fire_period - 1;
        let mut dead = enemy_at(1, Vec2::new(1.0, 0.0));
        let _ = dead.take_damage(1_000);
        let enemies = [dead, enemy_at(2, Vec2::new(2.0, 0.0))];

        assert_eq!(tower.shoot(&enemies), Some(EnemyId::new(2)));
    }

    #[test]
    fn undo_pops_latest_and_sale_excises_history() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::Bazooka, Tile::new(1, 1), Vec2::ZERO);
        let second = registry.insert(TowerKind::Sniper, Tile::new(2, 1), Vec2::ZERO);
        let third = registry.insert(TowerKind::Shotgun, Tile::new(3, 1), Vec2::ZERO);

        let sold = registry.remove(third).map(|tower| tower.id());
        assert_eq!(sold, Some(third));
        assert_eq!(registry.history(), &[first, second]);

        let undone = registry.undo().map(|tower| tower.id());
        assert_eq!(undone, Some(second));
        let undone = registry.undo().map(|tower| tower.id());
        assert_eq!(undone, Some(first));
        assert!(registry.undo().is_none());
        assert!(registry.iter().next().is_none());
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::Bazooka, Tile::new(1, 1), Vec2::ZERO);
        let second = registry.insert(TowerKind::Bazooka, Tile::new(1, 2), Vec2::ZERO);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(
            registry.at(Tile::new(1, 2)).map(Tower::id),
            Some(second)
        );
    }
}
