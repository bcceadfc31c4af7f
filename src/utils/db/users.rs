use crate::constants::modes::Gamemode;
use crate::models::users::{Stats, User};
use crate::schema::{stats, stats_rx, users};
use diesel::prelude::{OptionalExtension, QueryDsl, QueryResult, SelectableHelper};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

pub async fn read(db: &mut AsyncPgConnection, param_id: i64) -> QueryResult<Option<User>> {
    users::table
        .find(param_id)
        .select(User::as_select())
        .first::<User>(db)
        .await
        .optional()
}

/// Reads the user's row from the stats table backing `gamemode`.
pub async fn read_stats(
    db: &mut AsyncPgConnection,
    param_id: i64,
    gamemode: Gamemode,
) -> QueryResult<Option<Stats>> {
    let row = match gamemode {
        Gamemode::Vanilla => stats::table.find(param_id).first::<Stats>(db).await,
        Gamemode::Relax => stats_rx::table.find(param_id).first::<Stats>(db).await,
    };

    row.optional()
}
