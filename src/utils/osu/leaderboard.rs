use crate::constants::modes::ModeAndGamemode;
use crate::models::scores::{LeaderboardEntry, Score};
use crate::models::users::User;
use crate::utils::db::{beatmaps, scores};
use crate::{ApiError, Data};

pub const LEADERBOARD_SIZE: i64 = 50;

/// Best scores on a stored difficulty. Difficulties whose status has no
/// leaderboard, or that cannot be played in the requested mode, answer with an
/// empty list.
pub async fn map_leaderboard(
    data: &Data,
    map_id: i64,
    info: ModeAndGamemode,
) -> Result<Vec<LeaderboardEntry>, ApiError> {
    let mut connection = data.db_pool.get().await?;

    let Some(beatmap) = beatmaps::read(&mut connection, map_id).await? else {
        return Err(ApiError::NotFound(format!("beatmap {map_id}")));
    };

    if !beatmap.status().has_leaderboard() || !beatmap.playable_in(info.mode) {
        return Ok(Vec::new());
    }

    let rows = scores::leaderboard(&mut connection, &beatmap.map_md5, info, LEADERBOARD_SIZE)
        .await?;

    Ok(to_entries(rows))
}

fn to_entries(rows: Vec<(Score, User)>) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .map(|(score, user)| LeaderboardEntry {
            username: user.username,
            country: user.country,
            score,
        })
        .collect()
}
