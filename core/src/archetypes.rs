//! Static archetype tables for enemies and towers.
//!
//! Stats are looked up by indexing the tables with the kind's discriminant.
//! [`validate_archetypes`] confirms once at startup that every table row lines
//! up with its kind and carries usable stats.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Enemy archetypes that can appear in a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile enemy.
    Scout,
    /// Balanced enemy.
    Soldier,
    /// Slow, heavily armoured enemy.
    Trooper,
}

impl EnemyKind {
    /// Every enemy archetype in table order.
    pub const ALL: [EnemyKind; 3] = [Self::Scout, Self::Soldier, Self::Trooper];

    /// Resolves a numeric archetype tag (1-based) into an enemy kind.
    pub fn from_tag(tag: u8) -> Result<Self, ArchetypeError> {
        ENEMY_ARCHETYPES
            .iter()
            .find(|archetype| archetype.tag == tag)
            .map(|archetype| archetype.kind)
            .ok_or(ArchetypeError::UnknownEnemyTag(tag))
    }

    /// Numeric tag identifying the archetype.
    #[must_use]
    pub const fn tag(self) -> u8 {
        ENEMY_ARCHETYPES[self as usize].tag
    }

    /// Base stats before wave scaling.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        ENEMY_ARCHETYPES[self as usize].stats
    }
}

/// Tower archetypes that can be purchased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap all-rounder.
    Bazooka,
    /// Long range, slow, hard-hitting.
    Sniper,
    /// Short range, rapid, weak.
    Shotgun,
}

impl TowerKind {
    /// Every tower archetype in table order.
    pub const ALL: [TowerKind; 3] = [Self::Bazooka, Self::Sniper, Self::Shotgun];

    /// Resolves a display name into a tower kind.
    pub fn from_name(name: &str) -> Result<Self, ArchetypeError> {
        TOWER_ARCHETYPES
            .iter()
            .find(|archetype| archetype.name == name)
            .map(|archetype| archetype.kind)
            .ok_or_else(|| ArchetypeError::UnknownTowerName(name.to_owned()))
    }

    /// Display name of the archetype.
    #[must_use]
    pub const fn name(self) -> &'static str {
        TOWER_ARCHETYPES[self as usize].name
    }

    /// Static stats of the archetype.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        TOWER_ARCHETYPES[self as usize].stats
    }
}

/// Base stats shared by every enemy of one archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health before wave scaling.
    pub max_health: u32,
    /// Pixels travelled per tick before wave scaling.
    pub speed: f32,
    /// Coins and score granted for the killing blow.
    pub bounty: u32,
}

/// Static stats shared by every tower of one archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Targeting radius in pixels.
    pub range: f32,
    /// Ticks between shots.
    pub fire_period: u32,
    /// Purchase price in coins.
    pub cost: u32,
}

/// Row of the enemy archetype table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyArchetype {
    /// Numeric tag used by external data.
    pub tag: u8,
    /// Kind described by the row.
    pub kind: EnemyKind,
    /// Base stats of the kind.
    pub stats: EnemyStats,
}

/// Row of the tower archetype table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerArchetype {
    /// Display name used by menus and external data.
    pub name: &'static str,
    /// Kind described by the row.
    pub kind: TowerKind,
    /// Static stats of the kind.
    pub stats: TowerStats,
}

/// Enemy archetypes indexed by [`EnemyKind`] discriminant.
pub const ENEMY_ARCHETYPES: [EnemyArchetype; 3] = [
    EnemyArchetype {
        tag: 1,
        kind: EnemyKind::Scout,
        stats: EnemyStats {
            max_health: 25,
            speed: 1.2,
            bounty: 10,
        },
    },
    EnemyArchetype {
        tag: 2,
        kind: EnemyKind::Soldier,
        stats: EnemyStats {
            max_health: 45,
            speed: 0.9,
            bounty: 15,
        },
    },
    EnemyArchetype {
        tag: 3,
        kind: EnemyKind::Trooper,
        stats: EnemyStats {
            max_health: 70,
            speed: 0.7,
            bounty: 25,
        },
    },
];

/// Tower archetypes indexed by [`TowerKind`] discriminant.
pub const TOWER_ARCHETYPES: [TowerArchetype; 3] = [
    TowerArchetype {
        name: "Bazooka",
        kind: TowerKind::Bazooka,
        stats: TowerStats {
            damage: 10,
            range: 100.0,
            fire_period: 60,
            cost: 50,
        },
    },
    TowerArchetype {
        name: "Sniper",
        kind: TowerKind::Sniper,
        stats: TowerStats {
            damage: 25,
            range: 200.0,
            fire_period: 90,
            cost: 100,
        },
    },
    TowerArchetype {
        name: "Shotgun",
        kind: TowerKind::Shotgun,
        stats: TowerStats {
            damage: 5,
            range: 80.0,
            fire_period: 45,
            cost: 150,
        },
    },
];

/// Errors raised while resolving or validating archetypes.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ArchetypeError {
    /// No enemy archetype carries the provided tag.
    #[error("unknown enemy archetype tag {0}")]
    UnknownEnemyTag(u8),
    /// No tower archetype carries the provided name.
    #[error("unknown tower archetype `{0}`")]
    UnknownTowerName(String),
    /// A table row does not line up with the kind it is indexed by.
    #[error("archetype table row {index} describes {found} instead of {expected}")]
    Misaligned {
        /// Row index within the table.
        index: usize,
        /// Kind expected at the row.
        expected: String,
        /// Kind found at the row.
        found: String,
    },
    /// Two rows share the same lookup key.
    #[error("archetype key `{0}` appears more than once")]
    DuplicateKey(String),
    /// A row carries stats the simulation cannot use.
    #[error("archetype {kind} has invalid stats: {reason}")]
    InvalidStats {
        /// Kind carrying the invalid stats.
        kind: String,
        /// Description of the problem.
        reason: &'static str,
    },
}

/// Confirms that both archetype tables are exhaustive, aligned and usable.
pub fn validate_archetypes() -> Result<(), ArchetypeError> {
    for (index, (archetype, expected)) in ENEMY_ARCHETYPES.iter().zip(EnemyKind::ALL).enumerate() {
        if archetype.kind != expected {
            return Err(ArchetypeError::Misaligned {
                index,
                expected: format!("{expected:?}"),
                found: format!("{:?}", archetype.kind),
            });
        }
        if ENEMY_ARCHETYPES[..index]
            .iter()
            .any(|earlier| earlier.tag == archetype.tag)
        {
            return Err(ArchetypeError::DuplicateKey(archetype.tag.to_string()));
        }
        let stats = archetype.stats;
        if stats.max_health == 0 {
            return Err(invalid(expected, "maximum health must be positive"));
        }
        if !(stats.speed > 0.0) {
            return Err(invalid(expected, "speed must be positive"));
        }
    }

    for (index, (archetype, expected)) in TOWER_ARCHETYPES.iter().zip(TowerKind::ALL).enumerate() {
        if archetype.kind != expected {
            return Err(ArchetypeError::Misaligned {
                index,
                expected: format!("{expected:?}"),
                found: format!("{:?}", archetype.kind),
            });
        }
        if TOWER_ARCHETYPES[..index]
            .iter()
            .any(|earlier| earlier.name == archetype.name)
        {
            return Err(ArchetypeError::DuplicateKey(archetype.name.to_owned()));
        }
        let stats = archetype.stats;
        if stats.fire_period == 0 {
            return Err(invalid(expected, "fire period must be at least one tick"));
        }
        if !(stats.range > 0.0) {
            return Err(invalid(expected, "range must be positive"));
        }
    }

    Ok(())
}

fn invalid(kind: impl std::fmt::Debug, reason: &'static str) -> ArchetypeError {
    ArchetypeError::InvalidStats {
        kind: format!("{kind:?}"),
        reason,
    }
}
