//! Numeric log levels and their display names

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapping from numeric level to a human readable label
pub type LevelNames = BTreeMap<u32, String>;

pub const CRITICAL: Level = Level::At(0);
pub const ERROR: Level = Level::At(1);
pub const WARNING: Level = Level::At(2);
pub const INFO: Level = Level::At(3);
pub const DEBUG: Level = Level::At(4);

/// A record level or a threshold
///
/// Lower numbers are more severe. `Unbounded` sorts above every numeric level:
/// as a record level it is only surfaced by an unbounded threshold, and as a
/// threshold it lets every record through.
///
/// Serialized as a number, with `Unbounded` written as `null`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Level {
    At(u32),
    #[default]
    Unbounded,
}

impl Level {
    /// Whether a record at `level` passes this threshold
    pub fn admits(self, level: Level) -> bool {
        self >= level
    }

    /// Label for this level, falling back to the number itself
    pub fn name(self, names: &LevelNames) -> String {
        match self {
            Level::At(n) => names.get(&n).cloned().unwrap_or_else(|| n.to_string()),
            Level::Unbounded => self.to_string(),
        }
    }
}

impl From<u32> for Level {
    fn from(n: u32) -> Self {
        Level::At(n)
    }
}

impl From<Option<u32>> for Level {
    fn from(n: Option<u32>) -> Self {
        n.map_or(Level::Unbounded, Level::At)
    }
}

impl From<Level> for Option<u32> {
    fn from(level: Level) -> Self {
        match level {
            Level::At(n) => Some(n),
            Level::Unbounded => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::At(n) => write!(f, "{}", n),
            Level::Unbounded => write!(f, "Infinity"),
        }
    }
}

/// The built-in level labels
pub fn default_level_names() -> LevelNames {
    [
        (0, "CRITICAL"),
        (1, "ERROR"),
        (2, "WARNING"),
        (3, "INFO"),
        (4, "DEBUG"),
    ]
    .into_iter()
    .map(|(n, name)| (n, name.to_string()))
    .collect()
}
