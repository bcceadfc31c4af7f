use crate::models::beatmaps::Beatmap;
use crate::schema::beatmaps;
use crate::utils::osu::caching::BeatmapCache;
use crate::utils::osu::reconcile::BeatmapStore;
use crate::utils::osu::upstream::MapLookup;
use diesel::insert_into;
use diesel::prelude::{
    ExpressionMethods, OptionalExtension, QueryDsl, QueryResult, SelectableHelper,
};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

/// Inserts a difficulty unless its id is already stored. Returns whether a row
/// was written, so callers can tell a concurrent insert from their own. Only the
/// id conflict is ignored; another difficulty holding the same checksum is a
/// unique violation and comes back as an error.
pub async fn create(db: &mut AsyncPgConnection, beatmap: &Beatmap) -> QueryResult<bool> {
    let inserted = insert_into(beatmaps::table)
        .values(beatmap)
        .on_conflict(beatmaps::map_id)
        .do_nothing()
        .execute(db)
        .await?;

    Ok(inserted > 0)
}

pub async fn create_many(db: &mut AsyncPgConnection, items: &[Beatmap]) -> QueryResult<usize> {
    insert_into(beatmaps::table)
        .values(items)
        .on_conflict(beatmaps::map_id)
        .do_nothing()
        .execute(db)
        .await
}

pub async fn read(db: &mut AsyncPgConnection, param_id: i64) -> QueryResult<Option<Beatmap>> {
    beatmaps::table
        .find(param_id)
        .select(Beatmap::as_select())
        .first::<Beatmap>(db)
        .await
        .optional()
}

pub async fn read_by_checksum(
    db: &mut AsyncPgConnection,
    checksum: &str,
) -> QueryResult<Option<Beatmap>> {
    beatmaps::table
        .filter(beatmaps::map_md5.eq(checksum))
        .select(Beatmap::as_select())
        .first::<Beatmap>(db)
        .await
        .optional()
}

/// All stored difficulties of a set, easiest first.
pub async fn read_set(db: &mut AsyncPgConnection, set_id: i64) -> QueryResult<Vec<Beatmap>> {
    beatmaps::table
        .filter(beatmaps::set_id.eq(set_id))
        .order(beatmaps::stars.asc())
        .select(Beatmap::as_select())
        .load::<Beatmap>(db)
        .await
}

/// Swaps the stored row for `beatmap` in one transaction. Rows are never
/// patched in place because a new checksum means every column may be stale.
/// A checksum conflict fails the insert and rolls the delete back.
pub async fn replace(db: &mut AsyncPgConnection, beatmap: &Beatmap) -> QueryResult<bool> {
    db.transaction::<_, diesel::result::Error, _>(|db| {
        async move {
            diesel::delete(beatmaps::table.find(beatmap.map_id))
                .execute(db)
                .await?;

            let inserted = insert_into(beatmaps::table)
                .values(beatmap)
                .on_conflict(beatmaps::map_id)
                .do_nothing()
                .execute(db)
                .await?;

            Ok(inserted > 0)
        }
        .scope_boxed()
    })
    .await
}

/// Flags every difficulty of the set that is not flagged yet.
pub async fn mark_full_set(db: &mut AsyncPgConnection, set_id: i64) -> QueryResult<usize> {
    diesel::update(
        beatmaps::table
            .filter(beatmaps::set_id.eq(set_id))
            .filter(beatmaps::full_set_present.eq(false)),
    )
    .set(beatmaps::full_set_present.eq(true))
    .execute(db)
    .await
}

impl BeatmapStore for AsyncPgConnection {
    async fn read_set(&mut self, set_id: i64) -> QueryResult<Vec<Beatmap>> {
        read_set(self, set_id).await
    }

    async fn insert(&mut self, beatmap: &Beatmap) -> QueryResult<bool> {
        create(self, beatmap).await
    }

    async fn replace(&mut self, beatmap: &Beatmap) -> QueryResult<bool> {
        replace(self, beatmap).await
    }

    async fn mark_full_set(&mut self, set_id: i64) -> QueryResult<usize> {
        mark_full_set(self, set_id).await
    }
}

impl BeatmapCache for AsyncPgConnection {
    async fn read_map(&mut self, lookup: &MapLookup) -> QueryResult<Option<Beatmap>> {
        match lookup {
            MapLookup::Id(id) => read(self, *id).await,
            MapLookup::Checksum(checksum) => read_by_checksum(self, checksum).await,
        }
    }

    async fn insert_many(&mut self, beatmaps: &[Beatmap]) -> QueryResult<usize> {
        create_many(self, beatmaps).await
    }
}
