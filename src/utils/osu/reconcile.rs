//! Bringing a partially mirrored beatmap set up to date with the osu!api.
//!
//! A set is mirrored difficulty by difficulty, so local storage can hold only
//! some of its difficulties (for example after a single map was looked up by
//! id). Every stored difficulty of a set carries the same `full_set_present`
//! flag; once the set has been reconciled against upstream the flag is set for
//! all of them and never cleared again.

use crate::models::beatmaps::Beatmap;
use crate::utils::osu::upstream::UpstreamSource;
use crate::ApiError;
use dashmap::DashMap;
use diesel::QueryResult;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

/// The writes reconciliation performs against stored difficulties.
pub trait BeatmapStore {
    /// Stored difficulties of a set, easiest first.
    fn read_set(&mut self, set_id: i64) -> impl Future<Output = QueryResult<Vec<Beatmap>>> + Send;

    /// Inserts a difficulty. `false` means a row with that id already existed.
    fn insert(&mut self, beatmap: &Beatmap) -> impl Future<Output = QueryResult<bool>> + Send;

    /// Deletes the stored row with the same id and inserts `beatmap`, atomically.
    fn replace(&mut self, beatmap: &Beatmap) -> impl Future<Output = QueryResult<bool>> + Send;

    /// Sets `full_set_present` on every difficulty of the set still missing it.
    fn mark_full_set(&mut self, set_id: i64) -> impl Future<Output = QueryResult<usize>> + Send;
}

/// What a reconciliation returned and wrote.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Reconciliation {
    /// Local difficulties (stale ones swapped for their replacement) followed
    /// by the ones that were missing.
    pub maps: Vec<Beatmap>,
    /// Ids of difficulties that were not stored before.
    pub inserted: Vec<i64>,
    /// Ids of difficulties whose checksum changed upstream.
    pub replaced: Vec<i64>,
    /// Whether upstream was contacted at all.
    pub fetched: bool,
}

impl Reconciliation {
    fn unchanged(maps: Vec<Beatmap>) -> Self {
        Self {
            maps,
            ..Default::default()
        }
    }
}

/// Serialises reconciliation per set id; different sets run concurrently.
#[derive(Default)]
pub struct BeatmapSetReconciler {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl BeatmapSetReconciler {
    pub async fn reconcile<S, U>(
        &self,
        store: &mut S,
        upstream: &U,
        local: Vec<Beatmap>,
        set_id: i64,
    ) -> Result<Reconciliation, ApiError>
    where
        S: BeatmapStore,
        U: UpstreamSource,
    {
        check_local(&local, set_id)?;

        if is_complete(&local) {
            return Ok(Reconciliation::unchanged(local));
        }

        let entry = SetLock::new(&self.locks, set_id);
        let _guard = entry.lock().await;

        self.reconcile_locked(store, upstream, set_id).await
    }

    async fn reconcile_locked<S, U>(
        &self,
        store: &mut S,
        upstream: &U,
        set_id: i64,
    ) -> Result<Reconciliation, ApiError>
    where
        S: BeatmapStore,
        U: UpstreamSource,
    {
        // Another request may have finished this set while we waited.
        let local = store.read_set(set_id).await?;
        check_local(&local, set_id)?;

        if is_complete(&local) {
            return Ok(Reconciliation::unchanged(local));
        }

        if local.iter().any(|beatmap| beatmap.full_set_present) {
            warn!(
                "Beatmap set {} has difficulties with differing full_set_present flags, repairing.",
                set_id
            );
        }

        let mut fetched = upstream.fetch_set(set_id).await?;
        if fetched.is_empty() {
            return Err(ApiError::UpstreamUnavailable(format!("beatmap set {set_id}")));
        }
        fetched.sort_by(|a, b| a.stars.total_cmp(&b.stars));

        let mut replaced: HashMap<i64, Beatmap> = HashMap::new();
        let mut added = Vec::new();

        for beatmap in fetched {
            if beatmap.set_id != set_id {
                warn!(
                    "osu!api listed beatmap {} of set {} under set {}, skipping.",
                    beatmap.map_id, beatmap.set_id, set_id
                );
                continue;
            }

            match local.iter().find(|stored| stored.map_id == beatmap.map_id) {
                Some(stored) if stored.map_md5 == beatmap.map_md5 => continue,
                Some(stored) => {
                    if store.replace(&beatmap).await? {
                        info!(
                            "Replaced beatmap {} ({} -> {}).",
                            beatmap.map_id, stored.map_md5, beatmap.map_md5
                        );
                    } else {
                        info!(
                            "Beatmap {} was already replaced by another request.",
                            beatmap.map_id
                        );
                    }
                    replaced.insert(beatmap.map_id, beatmap);
                }
                None => {
                    if !store.insert(&beatmap).await? {
                        info!(
                            "Beatmap {} was already inserted by another request.",
                            beatmap.map_id
                        );
                    }
                    added.push(beatmap);
                }
            }
        }

        let flagged = store.mark_full_set(set_id).await?;

        let mut result = Reconciliation {
            inserted: added.iter().map(|beatmap| beatmap.map_id).collect(),
            replaced: replaced.keys().copied().sorted_unstable().collect(),
            fetched: true,
            ..Default::default()
        };

        info!(
            "Saved {} beatmaps and replaced {} in set {}, flagged {} as a full set.",
            result.inserted.len(),
            result.replaced.len(),
            set_id,
            flagged
        );

        result.maps = local
            .into_iter()
            .map(|stored| replaced.remove(&stored.map_id).unwrap_or(stored))
            .chain(added)
            .map(|mut beatmap| {
                beatmap.full_set_present = true;
                beatmap
            })
            .collect();

        Ok(result)
    }
}

/// A handle on the per-set mutex. The map entry is removed by whichever handle
/// is dropped last, including handles of requests cancelled while waiting.
struct SetLock<'a> {
    locks: &'a DashMap<i64, Arc<Mutex<()>>>,
    set_id: i64,
    lock: Arc<Mutex<()>>,
}

impl<'a> SetLock<'a> {
    fn new(locks: &'a DashMap<i64, Arc<Mutex<()>>>, set_id: i64) -> Self {
        let lock = Arc::clone(&locks.entry(set_id).or_default());

        Self {
            locks,
            set_id,
            lock,
        }
    }

    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for SetLock<'_> {
    fn drop(&mut self) {
        // Our handle has to be gone before counting the others.
        drop(std::mem::take(&mut self.lock));
        self.locks
            .remove_if(&self.set_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

fn is_complete(local: &[Beatmap]) -> bool {
    local.iter().all(|beatmap| beatmap.full_set_present)
}

fn check_local(local: &[Beatmap], set_id: i64) -> Result<(), ApiError> {
    if local.is_empty() {
        return Err(ApiError::NotFound(format!("beatmap set {set_id}")));
    }

    if let Some(foreign) = local.iter().find(|beatmap| beatmap.set_id != set_id) {
        return Err(ApiError::Inconsistent {
            set_id,
            reason: format!(
                "beatmap {} belongs to set {}",
                foreign.map_id, foreign.set_id
            ),
        });
    }

    Ok(())
}
