//! Level catalog loading

use super::Level;
use anyhow::{bail, Context, Result};
use tracing::info;

/// Level definitions shipped with the binary.
const LEVELS_JSON: &str = include_str!("levels.json");

/// The immutable, ordered list of game levels.
///
/// Loaded once at process start, before the server accepts requests.
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Parse and validate the embedded level data.
    ///
    /// A malformed catalog is a startup error, not something to limp
    /// along with.
    pub fn load() -> Result<Self> {
        let levels: Vec<Level> =
            serde_json::from_str(LEVELS_JSON).context("Failed to parse embedded level data")?;

        if levels.is_empty() {
            bail!("Level catalog is empty");
        }
        for (index, level) in levels.iter().enumerate() {
            let expected_id = index as u32 + 1;
            if level.id != expected_id {
                bail!(
                    "Level ids must be contiguous starting at 1, found id {} at position {}",
                    level.id,
                    index
                );
            }
        }

        info!("Loaded {} game levels", levels.len());
        Ok(LevelCatalog { levels })
    }

    /// All levels, in play order 1..N.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Look up a level by id. Ids outside [1, N] are a client error.
    pub fn get(&self, id: u32) -> Option<&Level> {
        if id == 0 {
            return None;
        }
        self.levels.get(id as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
