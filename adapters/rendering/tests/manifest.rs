use std::fs;

use tower_defence_core::{EnemyKind, TowerKind};
use tower_defence_rendering::{AssetLookup, AssetManifest, Placeholder, SpriteAsset, SpriteKey};

#[test]
fn manifest_on_disk_resolves_listed_sprites() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("assets.toml");
    fs::write(
        &path,
        "version = 1\n\n[sprites]\nScout = \"s\"\nBazooka = \"B\"\nProjectile = \".\"\n",
    )
    .expect("write manifest");

    let assets = AssetManifest::from_path(&path).expect("manifest should load");

    assert_eq!(assets.len(), 3);
    assert_eq!(
        assets.resolve(SpriteKey::Enemy(EnemyKind::Scout)),
        SpriteAsset::Loaded("s".to_owned())
    );
    assert_eq!(
        assets.resolve(SpriteKey::Tower(TowerKind::Shotgun)),
        SpriteAsset::Placeholder(Placeholder::for_key(SpriteKey::Tower(TowerKind::Shotgun)))
    );
}

#[test]
fn missing_manifest_file_is_an_error_with_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = AssetManifest::from_path(dir.path().join("absent.toml"))
        .expect_err("absent manifest must fail");
    assert!(error.to_string().contains("failed to read asset manifest"));
}

#[test]
fn manifest_without_sprite_table_is_all_placeholders() {
    let assets = AssetManifest::parse("version = 1\n").expect("manifest should parse");
    assert!(assets.is_empty());
    for key in SpriteKey::ALL {
        assert!(matches!(assets.resolve(key), SpriteAsset::Placeholder(_)));
    }
}
