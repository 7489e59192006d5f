//! Sprite lookup with deterministic placeholders for missing assets.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use tower_defence_core::{EnemyKind, TowerKind};
use tracing::warn;

use crate::Color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Identifies one drawable sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Body of an enemy archetype.
    Enemy(EnemyKind),
    /// Turret of a tower archetype.
    Tower(TowerKind),
    /// Projectile fired by any tower.
    Projectile,
}

impl SpriteKey {
    /// Every sprite a complete asset set provides.
    pub const ALL: [SpriteKey; 7] = [
        SpriteKey::Enemy(EnemyKind::Scout),
        SpriteKey::Enemy(EnemyKind::Soldier),
        SpriteKey::Enemy(EnemyKind::Trooper),
        SpriteKey::Tower(TowerKind::Bazooka),
        SpriteKey::Tower(TowerKind::Sniper),
        SpriteKey::Tower(TowerKind::Shotgun),
        SpriteKey::Projectile,
    ];

    /// Name used for the sprite in asset manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enemy(EnemyKind::Scout) => "Scout",
            Self::Enemy(EnemyKind::Soldier) => "Soldier",
            Self::Enemy(EnemyKind::Trooper) => "Trooper",
            Self::Tower(kind) => kind.name(),
            Self::Projectile => "Projectile",
        }
    }

    fn from_name(name: &str) -> Result<Self> {
        match Self::ALL.into_iter().find(|key| key.name() == name) {
            Some(key) => Ok(key),
            None => bail!("unknown sprite key `{name}`"),
        }
    }
}

/// Solid stand-in drawn when a sprite is missing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placeholder {
    /// Fill color.
    pub color: Color,
    /// Diameter in pixels.
    pub size: f32,
    /// Character used by text backends.
    pub glyph: char,
}

impl Placeholder {
    /// The placeholder for `key`; always identical for the same key.
    #[must_use]
    pub const fn for_key(key: SpriteKey) -> Self {
        match key {
            SpriteKey::Enemy(EnemyKind::Scout) => {
                Self::new(Color::from_rgb_u8(230, 80, 80), 16.0, 's')
            }
            SpriteKey::Enemy(EnemyKind::Soldier) => {
                Self::new(Color::from_rgb_u8(200, 60, 160), 20.0, 'o')
            }
            SpriteKey::Enemy(EnemyKind::Trooper) => {
                Self::new(Color::from_rgb_u8(140, 40, 40), 24.0, 't')
            }
            SpriteKey::Tower(TowerKind::Bazooka) => {
                Self::new(Color::from_rgb_u8(80, 160, 80), 30.0, 'B')
            }
            SpriteKey::Tower(TowerKind::Sniper) => {
                Self::new(Color::from_rgb_u8(80, 120, 220), 30.0, 'N')
            }
            SpriteKey::Tower(TowerKind::Shotgun) => {
                Self::new(Color::from_rgb_u8(220, 180, 60), 30.0, 'G')
            }
            SpriteKey::Projectile => Self::new(Color::from_rgb_u8(255, 255, 255), 6.0, '*'),
        }
    }

    const fn new(color: Color, size: f32, glyph: char) -> Self {
        Self { color, size, glyph }
    }
}

/// Outcome of resolving a sprite.
#[derive(Clone, Debug, PartialEq)]
pub enum SpriteAsset {
    /// The asset set provides the sprite under this reference.
    Loaded(String),
    /// The asset set lacks the sprite; draw the placeholder instead.
    Placeholder(Placeholder),
}

/// Read-only asset service consulted by rendering backends.
pub trait AssetLookup {
    /// Asset reference registered for the sprite, if any.
    fn sprite(&self, key: SpriteKey) -> Option<&str>;

    /// Asset reference for the sprite, substituting its placeholder when missing.
    fn resolve(&self, key: SpriteKey) -> SpriteAsset {
        match self.sprite(key) {
            Some(asset) => SpriteAsset::Loaded(asset.to_owned()),
            None => SpriteAsset::Placeholder(Placeholder::for_key(key)),
        }
    }
}

/// Asset set with no sprites; every lookup resolves to a placeholder.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl AssetLookup for NoAssets {
    fn sprite(&self, _key: SpriteKey) -> Option<&str> {
        None
    }
}

/// Sprite references loaded from a TOML manifest.
///
/// ```toml
/// version = 1
///
/// [sprites]
/// Scout = "enemies/scout.png"
/// Sniper = "towers/sniper.png"
/// ```
///
/// Names outside the known sprite set are rejected; known sprites the
/// manifest omits resolve to placeholders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetManifest {
    sprites: HashMap<SpriteKey, String>,
}

impl AssetManifest {
    /// Loads a manifest from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read asset manifest at {}",
                manifest_path.display()
            )
        })?;
        Self::parse(&contents)
    }

    /// Parses manifest contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: ManifestFile =
            toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported asset manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut sprites = HashMap::with_capacity(manifest.sprites.len());
        for (name, asset) in manifest.sprites {
            let key = SpriteKey::from_name(&name)
                .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
            let _ = sprites.insert(key, asset);
        }

        for key in SpriteKey::ALL {
            if !sprites.contains_key(&key) {
                warn!(sprite = key.name(), "sprite missing from manifest, using placeholder");
            }
        }

        Ok(Self { sprites })
    }

    /// Number of sprites the manifest provides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Reports whether the manifest provides no sprites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl AssetLookup for AssetManifest {
    fn sprite(&self, key: SpriteKey) -> Option<&str> {
        self.sprites.get(&key).map(String::as_str)
    }
}

#[derive(Debug, serde::Deserialize)]
struct ManifestFile {
    version: u32,
    #[serde(default)]
    sprites: HashMap<String, String>,
}
