use crate::constants::modes::ModeAndGamemode;
use crate::constants::privileges;
use crate::models::scores::Score;
use crate::models::users::User;
use crate::schema::{scores, users};
use diesel::dsl::sql;
use diesel::prelude::{
    ExpressionMethods, OptionalExtension, QueryDsl, QueryResult, SelectableHelper,
};
use diesel::sql_types::{Bool, Integer};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

/// `scores.status` of a user's best score on a map.
pub const STATUS_BEST: i16 = 3;

pub async fn read(db: &mut AsyncPgConnection, param_id: i64) -> QueryResult<Option<Score>> {
    scores::table
        .find(param_id)
        .select(Score::as_select())
        .first::<Score>(db)
        .await
        .optional()
}

/// Best scores on a map for one mode/gamemode pair, highest pp first.
/// Users without the leaderboard privilege are left out.
pub async fn leaderboard(
    db: &mut AsyncPgConnection,
    map_md5: &str,
    info: ModeAndGamemode,
    limit: i64,
) -> QueryResult<Vec<(Score, User)>> {
    scores::table
        .inner_join(users::table)
        .filter(scores::map_md5.eq(map_md5))
        .filter(scores::status.eq(STATUS_BEST))
        .filter(scores::mode.eq(info.mode.as_db()))
        .filter(scores::gamemode.eq(info.gamemode.as_db()))
        .filter(
            sql::<Bool>("(users.privileges & ")
                .bind::<Integer, _>(privileges::LEADERBOARD_VISIBLE)
                .sql(") <> 0"),
        )
        .order(scores::pp.desc())
        .limit(limit)
        .select((Score::as_select(), User::as_select()))
        .load::<(Score, User)>(db)
        .await
}
