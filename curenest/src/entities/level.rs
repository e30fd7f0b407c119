use anyhow::{Result, bail};
use std::fmt::Display;

/// Vertical plane of an autoclave on which a tool can be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// The floor of the autoclave (level 0)
    Base,
    /// The plane resting on support fixtures above the base plane (level 1)
    Elevated,
}

impl Level {
    pub const ALL: [Level; 2] = [Level::Base, Level::Elevated];

    pub fn index(self) -> usize {
        match self {
            Level::Base => 0,
            Level::Elevated => 1,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Level::Base),
            1 => Ok(Level::Elevated),
            _ => bail!("unknown level {value}, only 0 (base) and 1 (elevated) exist"),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.index() as u8
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}
