use crate::constants::approved::Approved;
use crate::constants::modes::Mode;
use crate::schema::beatmaps;
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

/// One difficulty of a mirrored beatmap set.
///
/// Rows are keyed by `map_id` and identified by content through `map_md5`; a
/// checksum change is handled by replacing the whole row, never by patching it.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    PartialEq,
    Queryable,
    Selectable,
    Insertable,
    Identifiable,
)]
#[diesel(table_name=beatmaps, primary_key(map_id))]
pub struct Beatmap {
    pub server: String,
    pub set_id: i64,
    pub map_id: i64,
    pub map_md5: String,
    pub title: String,
    pub title_unicode: String,
    pub version: String,
    pub artist: String,
    pub artist_unicode: String,
    pub creator: String,
    pub creator_id: i64,
    pub stars: f32,
    pub od: f32,
    pub ar: f32,
    pub hp: f32,
    pub cs: f32,
    pub mode: i16,
    pub bpm: f32,
    pub max_combo: i32,
    pub submit_date: Option<DateTime<Utc>>,
    pub approved_date: Option<DateTime<Utc>>,
    pub latest_update: DateTime<Utc>,
    pub length: i32,
    pub drain: i32,
    pub plays: i32,
    pub passes: i32,
    pub favorites: i32,
    pub rating: f32,
    pub approved: i16,
    pub full_set_present: bool,
}

impl Beatmap {
    pub fn status(&self) -> Approved {
        Approved::from_db(self.approved)
    }

    pub fn game_mode(&self) -> Mode {
        Mode::from_db(self.mode)
    }

    /// Standard difficulties convert to every mode; the others only exist in
    /// their own.
    pub fn playable_in(&self, mode: Mode) -> bool {
        let own = self.game_mode();
        own == mode || own == Mode::Standard
    }
}
