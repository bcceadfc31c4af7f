use rosu_v2::prelude::RankStatus;
use serde::{Deserialize, Serialize};

/// Ranked status in the numbering the server stores, which differs from the
/// osu! API for everything above pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approved {
    Graveyard,
    Wip,
    Pending,
    Ranked,
    Approved,
    Qualified,
    Loved,
}

impl Approved {
    /// Unknown values fall back to `Pending`.
    pub fn from_db(value: i16) -> Self {
        match value {
            -2 => Self::Graveyard,
            -1 => Self::Wip,
            2 => Self::Ranked,
            3 => Self::Approved,
            4 => Self::Qualified,
            5 => Self::Loved,
            _ => Self::Pending,
        }
    }

    pub fn as_db(self) -> i16 {
        match self {
            Self::Graveyard => -2,
            Self::Wip => -1,
            Self::Pending => 0,
            Self::Ranked => 2,
            Self::Approved => 3,
            Self::Qualified => 4,
            Self::Loved => 5,
        }
    }

    pub fn has_leaderboard(self) -> bool {
        matches!(
            self,
            Self::Ranked | Self::Approved | Self::Qualified | Self::Loved
        )
    }
}

impl From<RankStatus> for Approved {
    fn from(status: RankStatus) -> Self {
        match status {
            RankStatus::Graveyard => Self::Graveyard,
            RankStatus::WIP => Self::Wip,
            RankStatus::Pending => Self::Pending,
            RankStatus::Ranked => Self::Ranked,
            RankStatus::Approved => Self::Approved,
            RankStatus::Qualified => Self::Qualified,
            RankStatus::Loved => Self::Loved,
        }
    }
}
