use crate::constants::modes::Mode;
use crate::schema::users;
use diesel::{Identifiable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name=users, primary_key(id))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub country: String,
    pub privileges: i32,
}

/// A full row of `stats` or `stats_rx`; both tables share this column layout.
#[derive(Debug, Serialize, Deserialize, Clone, Queryable)]
pub struct Stats {
    pub id: i64,
    pub pp_std: f32,
    pub pp_taiko: f32,
    pub pp_catch: f32,
    pub pp_mania: f32,
    pub accuracy_std: f32,
    pub accuracy_taiko: f32,
    pub accuracy_catch: f32,
    pub accuracy_mania: f32,
    pub playcount_std: i32,
    pub playcount_taiko: i32,
    pub playcount_catch: i32,
    pub playcount_mania: i32,
    pub max_combo_std: i32,
    pub max_combo_taiko: i32,
    pub max_combo_catch: i32,
    pub max_combo_mania: i32,
}

/// The columns of one mode, projected out of a [`Stats`] row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ModeStats {
    pub pp: f32,
    pub accuracy: f32,
    pub playcount: i32,
    pub max_combo: i32,
}

impl Stats {
    pub fn for_mode(&self, mode: Mode) -> ModeStats {
        match mode {
            Mode::Standard => ModeStats {
                pp: self.pp_std,
                accuracy: self.accuracy_std,
                playcount: self.playcount_std,
                max_combo: self.max_combo_std,
            },
            Mode::Taiko => ModeStats {
                pp: self.pp_taiko,
                accuracy: self.accuracy_taiko,
                playcount: self.playcount_taiko,
                max_combo: self.max_combo_taiko,
            },
            Mode::Catch => ModeStats {
                pp: self.pp_catch,
                accuracy: self.accuracy_catch,
                playcount: self.playcount_catch,
                max_combo: self.max_combo_catch,
            },
            Mode::Mania => ModeStats {
                pp: self.pp_mania,
                accuracy: self.accuracy_mania,
                playcount: self.playcount_mania,
                max_combo: self.max_combo_mania,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_the_requested_mode() {
        let stats = Stats {
            id: 3,
            pp_std: 1.0,
            pp_taiko: 2.0,
            pp_catch: 3.0,
            pp_mania: 4.0,
            accuracy_std: 91.0,
            accuracy_taiko: 92.0,
            accuracy_catch: 93.0,
            accuracy_mania: 94.0,
            playcount_std: 10,
            playcount_taiko: 20,
            playcount_catch: 30,
            playcount_mania: 40,
            max_combo_std: 100,
            max_combo_taiko: 200,
            max_combo_catch: 300,
            max_combo_mania: 400,
        };

        assert_eq!(
            stats.for_mode(Mode::Catch),
            ModeStats {
                pp: 3.0,
                accuracy: 93.0,
                playcount: 30,
                max_combo: 300,
            }
        );
        assert_eq!(stats.for_mode(Mode::Mania).max_combo, 400);
    }
}
