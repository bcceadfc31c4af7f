pub mod encoder;
pub mod storage;

use crate::models::scores::Score;
use crate::models::users::User;
use crate::utils::db::{scores, users};
use crate::utils::replay::storage::ReplayStore;
use crate::{ApiError, Data};
use diesel::QueryResult;
use diesel_async::AsyncPgConnection;
use std::future::Future;

/// Rows a replay file is assembled from.
pub trait ReplayRecords {
    fn score(&mut self, score_id: i64) -> impl Future<Output = QueryResult<Option<Score>>> + Send;

    fn user(&mut self, user_id: i64) -> impl Future<Output = QueryResult<Option<User>>> + Send;
}

impl ReplayRecords for AsyncPgConnection {
    async fn score(&mut self, score_id: i64) -> QueryResult<Option<Score>> {
        scores::read(self, score_id).await
    }

    async fn user(&mut self, user_id: i64) -> QueryResult<Option<User>> {
        users::read(self, user_id).await
    }
}

/// Suggested download name for a replay.
pub fn replay_file_name(score_id: i64) -> String {
    format!("{score_id}.osr")
}

/// Assembles the downloadable replay of a score. The stored frames are
/// checked first so scores without a replay never touch the database.
pub async fn build_replay<R, S>(
    records: &mut R,
    replays: &S,
    score_id: i64,
) -> Result<Vec<u8>, ApiError>
where
    R: ReplayRecords,
    S: ReplayStore,
{
    let Some(raw_replay) = replays.read(score_id).await? else {
        return Err(ApiError::NotFound(format!("replay of score {score_id}")));
    };

    let Some(score) = records.score(score_id).await? else {
        return Err(ApiError::NotFound(format!("score {score_id}")));
    };

    let Some(user) = records.user(score.user_id).await? else {
        return Err(ApiError::NotFound(format!("user {}", score.user_id)));
    };

    Ok(encoder::encode(&score, &user, &raw_replay)?)
}

pub async fn write_replay(data: &Data, score_id: i64) -> Result<Vec<u8>, ApiError> {
    let mut connection = data.db_pool.get().await?;

    build_replay(&mut *connection, &data.replays, score_id).await
}
