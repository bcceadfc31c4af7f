use crate::schema::scores;
use diesel::{Identifiable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

/// A submitted score. Counts and combo are stored at the widths the legacy
/// replay format writes them with.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    PartialEq,
    Queryable,
    Selectable,
    Identifiable,
)]
#[diesel(table_name=scores, primary_key(id))]
pub struct Score {
    pub id: i64,
    pub user_id: i64,
    pub map_md5: String,
    pub score: i32,
    pub pp: f32,
    pub accuracy: f32,
    pub count_300: i16,
    pub count_100: i16,
    pub count_50: i16,
    pub count_geki: i16,
    pub count_katu: i16,
    pub count_miss: i16,
    pub max_combo: i16,
    pub perfect: bool,
    pub rank: String,
    pub mods: i32,
    pub mode: i16,
    pub gamemode: i16,
    pub status: i16,
    pub submitted: i64,
}

/// One row of a map leaderboard.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LeaderboardEntry {
    pub username: String,
    pub country: String,
    #[serde(flatten)]
    pub score: Score,
}
