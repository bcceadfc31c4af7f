use crate::constants::modes::ModeAndGamemode;
use crate::constants::privileges;
use crate::models::users::{ModeStats, User};
use crate::utils::db::users;
use crate::{ApiError, Data};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub id: i64,
    pub username: String,
    pub country: String,
    /// Restricted users are hidden from leaderboards.
    pub restricted: bool,
    #[serde(flatten)]
    pub stats: ModeStats,
}

impl UserStats {
    fn new(user: User, stats: ModeStats) -> Self {
        Self {
            id: user.id,
            restricted: !privileges::has(user.privileges, privileges::LEADERBOARD_VISIBLE),
            username: user.username,
            country: user.country,
            stats,
        }
    }
}

pub async fn user_stats(
    data: &Data,
    user_id: i64,
    info: ModeAndGamemode,
) -> Result<UserStats, ApiError> {
    let mut connection = data.db_pool.get().await?;

    let Some(user) = users::read(&mut connection, user_id).await? else {
        return Err(ApiError::NotFound(format!("user {user_id}")));
    };

    let Some(stats) = users::read_stats(&mut connection, user_id, info.gamemode).await? else {
        return Err(ApiError::NotFound(format!(
            "{} row for user {}",
            info.gamemode.stats_table(),
            user_id
        )));
    };

    Ok(UserStats::new(user, stats.for_mode(info.mode)))
}
