//! Sprite assets shared by every entity.
//!
//! Assets are loaded once at startup; a missing or malformed file is fatal.
//! Entities hold cheap `Rc` handles to the shared images.

use std::path::Path;
use std::rc::Rc;

use crate::error::GameResult;
use crate::sprite::{Mask, Sprite};

const PLAYER_SRC: &str = include_str!("../assets/images/player.txt");
const STAR_SRC: &str = include_str!("../assets/images/star.txt");
const LASER_SRC: &str = include_str!("../assets/images/laser.txt");
const METEOR_SRC: &str = include_str!("../assets/images/meteor.txt");
const EXPLOSION_SRC: &str = include_str!("../assets/images/explosion.txt");

#[derive(Clone, Debug)]
pub struct Assets {
    pub player: Rc<Sprite>,
    pub player_mask: Rc<Mask>,
    pub star: Rc<Sprite>,
    pub laser: Rc<Sprite>,
    pub meteor: Rc<Sprite>,
    pub explosion: Rc<[Sprite]>,
}

impl Assets {
    /// Load every sprite from `<dir>/images/`.
    pub fn load(dir: &Path) -> GameResult<Self> {
        let images = dir.join("images");
        let assets = Self::from_sprites(
            Sprite::load(&images.join("player.txt"))?,
            Sprite::load(&images.join("star.txt"))?,
            Sprite::load(&images.join("laser.txt"))?,
            Sprite::load(&images.join("meteor.txt"))?,
            Sprite::load_frames(&images.join("explosion.txt"))?,
        );
        tracing::info!(dir = %dir.display(), "loaded assets");
        Ok(assets)
    }

    /// The sprites shipped in `assets/images`, compiled into the binary.
    pub fn builtin() -> GameResult<Self> {
        Ok(Self::from_sprites(
            Sprite::parse(PLAYER_SRC)?,
            Sprite::parse(STAR_SRC)?,
            Sprite::parse(LASER_SRC)?,
            Sprite::parse(METEOR_SRC)?,
            Sprite::parse_frames(EXPLOSION_SRC)?,
        ))
    }

    pub fn from_sprites(
        player: Sprite,
        star: Sprite,
        laser: Sprite,
        meteor: Sprite,
        explosion: Vec<Sprite>,
    ) -> Self {
        Self {
            player_mask: Rc::new(player.mask()),
            player: Rc::new(player),
            star: Rc::new(star),
            laser: Rc::new(laser),
            meteor: Rc::new(meteor),
            explosion: explosion.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn builtin_assets_parse() {
        let a = Assets::builtin().unwrap();
        assert_eq!((a.player.width(), a.player.height()), (7, 8));
        assert_eq!((a.laser.width(), a.laser.height()), (1, 4));
        assert_eq!(a.explosion.len(), 5);
        assert_eq!(a.player_mask.count(), a.player.mask().count());
    }

    #[test]
    fn missing_directory_is_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Assets::load(dir.path()).unwrap_err();
        match err {
            GameError::AssetLoad { path, .. } => assert!(path.ends_with("player.txt")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn load_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir(&images).unwrap();
        for (name, src) in [
            ("player.txt", "WW\nWW"),
            ("star.txt", "w"),
            ("laser.txt", "P\nP"),
            ("meteor.txt", "BBB\nBBB"),
            ("explosion.txt", "Y\n---\nO"),
        ] {
            std::fs::write(images.join(name), src).unwrap();
        }
        let a = Assets::load(dir.path()).unwrap();
        assert_eq!(a.meteor.width(), 3);
        assert_eq!(a.explosion.len(), 2);
    }
}
