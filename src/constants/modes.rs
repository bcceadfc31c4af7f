use rosu_v2::model::GameMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Standard,
    Taiko,
    Catch,
    Mania,
}

impl Mode {
    pub fn from_db(value: i16) -> Self {
        Self::try_from(i32::from(value)).unwrap_or_default()
    }

    pub fn as_db(self) -> i16 {
        match self {
            Self::Standard => 0,
            Self::Taiko => 1,
            Self::Catch => 2,
            Self::Mania => 3,
        }
    }

    pub fn from_name(mode: &str) -> Option<Self> {
        match mode.to_lowercase().as_str() {
            "osu" | "standard" | "std" | "osu!" => Some(Self::Standard),
            "taiko" | "osu!taiko" => Some(Self::Taiko),
            "mania" | "keys" | "osu!mania" => Some(Self::Mania),
            "catch" | "ctb" | "fruits" | "osu!catch" => Some(Self::Catch),
            _ => None,
        }
    }
}

impl TryFrom<i32> for Mode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Standard),
            1 => Ok(Self::Taiko),
            2 => Ok(Self::Catch),
            3 => Ok(Self::Mania),
            other => Err(other),
        }
    }
}

impl From<GameMode> for Mode {
    fn from(mode: GameMode) -> Self {
        match mode {
            GameMode::Osu => Self::Standard,
            GameMode::Taiko => Self::Taiko,
            GameMode::Catch => Self::Catch,
            GameMode::Mania => Self::Mania,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gamemode {
    #[default]
    Vanilla,
    Relax,
}

impl Gamemode {
    pub fn as_db(self) -> i16 {
        match self {
            Self::Vanilla => 0,
            Self::Relax => 1,
        }
    }

    pub fn from_name(gamemode: &str) -> Option<Self> {
        match gamemode.to_lowercase().as_str() {
            "vanilla" | "vn" => Some(Self::Vanilla),
            "relax" | "rx" => Some(Self::Relax),
            _ => None,
        }
    }

    pub fn stats_table(self) -> &'static str {
        match self {
            Self::Vanilla => "stats",
            Self::Relax => "stats_rx",
        }
    }
}

impl TryFrom<i32> for Gamemode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Vanilla),
            1 => Ok(Self::Relax),
            other => Err(other),
        }
    }
}

/// A validated mode/gamemode pair as accepted from query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeAndGamemode {
    pub mode: Mode,
    pub gamemode: Gamemode,
}

impl ModeAndGamemode {
    /// Relax has no mania variant; that pair resets to standard vanilla.
    pub fn normalize(mode: Mode, gamemode: Gamemode) -> Self {
        match (mode, gamemode) {
            (Mode::Mania, Gamemode::Relax) => Self::default(),
            (mode, gamemode) => Self { mode, gamemode },
        }
    }
}
