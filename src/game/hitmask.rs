//! Sprite opacity masks for the collision oracle.
//!
//! The store carries one mask per player animation frame and one per pipe
//! orientation. Masks can be loaded from a MessagePack dump of the real
//! sprite sheet or synthesized as fully-opaque boxes when no asset file is
//! available (headless training does not need artwork, only geometry).

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    game::collision::Hitmask,
    game::physics::{PIPE_HEIGHT, PIPE_WIDTH, PLAYER_FRAME_COUNT, PLAYER_HEIGHT, PLAYER_WIDTH},
};

/// Opacity masks for every sprite the crash check consults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitmaskStore {
    /// One mask per player animation frame (upflap, midflap, downflap).
    player: Vec<Hitmask>,
    /// Upper and lower pipe masks, in that order.
    pipe: Vec<Hitmask>,
}

impl HitmaskStore {
    /// Fully-opaque masks matching the sprite bounding boxes.
    ///
    /// Slightly stricter than the real sprites (no transparent corners), and
    /// sufficient for training runs without asset files.
    pub fn solid() -> Self {
        Self {
            player: (0..PLAYER_FRAME_COUNT)
                .map(|_| Hitmask::solid(PLAYER_WIDTH as usize, PLAYER_HEIGHT as usize))
                .collect(),
            pipe: (0..2)
                .map(|_| Hitmask::solid(PIPE_WIDTH as usize, PIPE_HEIGHT as usize))
                .collect(),
        }
    }

    /// Load masks from a MessagePack file produced from the sprite sheet.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let reader = BufReader::new(file);

        let store: Self =
            rmp_serde::from_read(reader).map_err(|e| Error::SerializationContext {
                operation: "deserialize hitmasks from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        store.validate()?;
        Ok(store)
    }

    /// Write masks as MessagePack, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let bytes = rmp_serde::to_vec(self).map_err(|e| Error::SerializationContext {
            operation: "serialize hitmasks to MessagePack".to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, bytes).map_err(|source| Error::Io {
            operation: format!("write file {path:?}"),
            source,
        })?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.player.len() != PLAYER_FRAME_COUNT {
            return Err(Error::InvalidHitmasks {
                message: format!(
                    "expected {PLAYER_FRAME_COUNT} player masks, found {}",
                    self.player.len()
                ),
            });
        }
        if self.pipe.len() != 2 {
            return Err(Error::InvalidHitmasks {
                message: format!("expected 2 pipe masks, found {}", self.pipe.len()),
            });
        }
        Ok(())
    }

    /// Mask for the given player animation frame.
    pub fn player_frame(&self, frame: usize) -> &Hitmask {
        &self.player[frame % self.player.len()]
    }

    pub fn pipe_upper(&self) -> &Hitmask {
        &self.pipe[0]
    }

    pub fn pipe_lower(&self) -> &Hitmask {
        &self.pipe[1]
    }
}
