use crate::models::beatmaps::Beatmap;
use crate::utils::osu::reconcile::{BeatmapSetReconciler, BeatmapStore, Reconciliation};
use crate::utils::osu::upstream::{MapLookup, UpstreamSource};
use crate::{ApiError, Data};
use diesel::QueryResult;
use std::future::Future;
use tracing::info;

/// Point lookups and bulk inserts used when a set or map is first mirrored.
pub trait BeatmapCache: BeatmapStore {
    fn read_map(
        &mut self,
        lookup: &MapLookup,
    ) -> impl Future<Output = QueryResult<Option<Beatmap>>> + Send;

    /// Inserts every difficulty whose id is not stored yet, returning how many
    /// rows were written.
    fn insert_many(
        &mut self,
        beatmaps: &[Beatmap],
    ) -> impl Future<Output = QueryResult<usize>> + Send;
}

/// A single difficulty and whether this lookup stored it.
#[derive(Debug, Clone)]
pub struct CachedBeatmap {
    pub beatmap: Beatmap,
    pub created: bool,
}

/// Returns every difficulty of the set, mirroring it first when nothing is
/// stored and reconciling it when only part of it is.
pub async fn cache_beatmapset<S, U>(
    store: &mut S,
    upstream: &U,
    reconciler: &BeatmapSetReconciler,
    set_id: i64,
) -> Result<Reconciliation, ApiError>
where
    S: BeatmapCache,
    U: UpstreamSource,
{
    let local = store.read_set(set_id).await?;
    if !local.is_empty() {
        return reconciler.reconcile(store, upstream, local, set_id).await;
    }

    let mut beatmaps = upstream.fetch_set(set_id).await?;
    if beatmaps.is_empty() {
        return Err(ApiError::NotFound(format!("beatmap set {set_id}")));
    }
    beatmaps.sort_by(|a, b| a.stars.total_cmp(&b.stars));

    let saved = store.insert_many(&beatmaps).await?;
    // A single difficulty looked up meanwhile is stored unflagged.
    store.mark_full_set(set_id).await?;

    info!(
        "Saved {} of {} beatmaps in set {}.",
        saved,
        beatmaps.len(),
        set_id
    );

    Ok(Reconciliation {
        inserted: beatmaps.iter().map(|beatmap| beatmap.map_id).collect(),
        maps: beatmaps,
        fetched: true,
        ..Default::default()
    })
}

/// Returns one difficulty, mirroring it alone when it is not stored. The rest
/// of its set is left for [`cache_beatmapset`].
pub async fn cache_beatmap<S, U>(
    store: &mut S,
    upstream: &U,
    lookup: &MapLookup,
) -> Result<CachedBeatmap, ApiError>
where
    S: BeatmapCache,
    U: UpstreamSource,
{
    if let Some(beatmap) = store.read_map(lookup).await? {
        return Ok(CachedBeatmap {
            beatmap,
            created: false,
        });
    }

    let Some(beatmap) = upstream.fetch_map(lookup).await? else {
        return Err(ApiError::NotFound(lookup.to_string()));
    };

    let created = store.insert(&beatmap).await?;
    if created {
        info!(
            "Saved beatmap {} of set {}.",
            beatmap.map_id, beatmap.set_id
        );
    }

    Ok(CachedBeatmap { beatmap, created })
}

pub async fn get_beatmapset(data: &Data, set_id: i64) -> Result<Reconciliation, ApiError> {
    let mut connection = data.db_pool.get().await?;

    let result =
        cache_beatmapset(&mut *connection, &data.upstream, &data.reconciler, set_id).await?;

    data.osu_files
        .spawn_save(result.inserted.clone(), result.replaced.clone())
        .await;

    Ok(result)
}

pub async fn get_beatmap(data: &Data, lookup: &MapLookup) -> Result<Beatmap, ApiError> {
    let mut connection = data.db_pool.get().await?;

    let cached = cache_beatmap(&mut *connection, &data.upstream, lookup).await?;
    if cached.created {
        data.osu_files
            .spawn_save(vec![cached.beatmap.map_id], Vec::new())
            .await;
    }

    Ok(cached.beatmap)
}
