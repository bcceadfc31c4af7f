//! In-memory stand-ins for the database and the osu!api.

use crate::models::beatmaps::Beatmap;
use crate::utils::osu::caching::BeatmapCache;
use crate::utils::osu::reconcile::BeatmapStore;
use crate::utils::osu::upstream::{MapLookup, UpstreamSource};
use crate::ApiError;
use chrono::DateTime;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::QueryResult;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn beatmap(set_id: i64, map_id: i64, md5: &str, full_set_present: bool) -> Beatmap {
    Beatmap {
        server: String::from("bancho"),
        set_id,
        map_id,
        map_md5: md5.to_string(),
        title: String::from("Blue Zenith"),
        title_unicode: String::from("Blue Zenith"),
        version: format!("Difficulty {map_id}"),
        artist: String::from("xi"),
        artist_unicode: String::from("xi"),
        creator: String::from("Asphyxia"),
        creator_id: 2,
        stars: map_id as f32,
        od: 8.0,
        ar: 9.0,
        hp: 6.0,
        cs: 4.0,
        mode: 0,
        bpm: 200.0,
        max_combo: 1000,
        submit_date: None,
        approved_date: None,
        latest_update: DateTime::from_timestamp(1_500_000_000, 0).unwrap_or_default(),
        length: 300,
        drain: 280,
        plays: 0,
        passes: 0,
        favorites: 0,
        rating: 9.5,
        approved: 2,
        full_set_present,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Insert(i64),
    Replace(i64),
    MarkFullSet(i64),
}

#[derive(Default)]
pub struct FakeStore {
    pub rows: BTreeMap<i64, Beatmap>,
    pub writes: Vec<Write>,
    /// Ids another request "inserted" first; inserting them reports a conflict.
    pub taken: HashSet<i64>,
}

impl FakeStore {
    pub fn with(beatmaps: Vec<Beatmap>) -> Self {
        Self {
            rows: beatmaps.into_iter().map(|b| (b.map_id, b)).collect(),
            ..Default::default()
        }
    }

    /// Mirrors the unique index on `map_md5`.
    fn check_checksum(&self, beatmap: &Beatmap) -> QueryResult<()> {
        let taken = self
            .rows
            .values()
            .any(|stored| stored.map_md5 == beatmap.map_md5 && stored.map_id != beatmap.map_id);
        if taken {
            return Err(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new(format!(
                    "duplicate key value violates unique constraint \"beatmaps_map_md5_idx\" ({})",
                    beatmap.map_md5
                )),
            ));
        }

        Ok(())
    }
}

impl BeatmapStore for FakeStore {
    async fn read_set(&mut self, set_id: i64) -> QueryResult<Vec<Beatmap>> {
        let mut beatmaps: Vec<Beatmap> = self
            .rows
            .values()
            .filter(|beatmap| beatmap.set_id == set_id)
            .cloned()
            .collect();
        beatmaps.sort_by(|a, b| a.stars.total_cmp(&b.stars));

        Ok(beatmaps)
    }

    async fn insert(&mut self, beatmap: &Beatmap) -> QueryResult<bool> {
        self.writes.push(Write::Insert(beatmap.map_id));
        if self.taken.contains(&beatmap.map_id) || self.rows.contains_key(&beatmap.map_id) {
            return Ok(false);
        }
        self.check_checksum(beatmap)?;
        self.rows.insert(beatmap.map_id, beatmap.clone());

        Ok(true)
    }

    async fn replace(&mut self, beatmap: &Beatmap) -> QueryResult<bool> {
        self.writes.push(Write::Replace(beatmap.map_id));
        self.check_checksum(beatmap)?;
        self.rows.insert(beatmap.map_id, beatmap.clone());

        Ok(true)
    }

    async fn mark_full_set(&mut self, set_id: i64) -> QueryResult<usize> {
        self.writes.push(Write::MarkFullSet(set_id));
        let mut flagged = 0;
        for beatmap in self.rows.values_mut() {
            if beatmap.set_id == set_id && !beatmap.full_set_present {
                beatmap.full_set_present = true;
                flagged += 1;
            }
        }

        Ok(flagged)
    }
}

impl BeatmapCache for FakeStore {
    async fn read_map(&mut self, lookup: &MapLookup) -> QueryResult<Option<Beatmap>> {
        Ok(self
            .rows
            .values()
            .find(|beatmap| match lookup {
                MapLookup::Id(id) => beatmap.map_id == *id,
                MapLookup::Checksum(checksum) => beatmap.map_md5 == *checksum,
            })
            .cloned())
    }

    async fn insert_many(&mut self, beatmaps: &[Beatmap]) -> QueryResult<usize> {
        for beatmap in beatmaps {
            self.check_checksum(beatmap)?;
        }

        let mut inserted = 0;
        for beatmap in beatmaps {
            if !self.rows.contains_key(&beatmap.map_id) {
                self.rows.insert(beatmap.map_id, beatmap.clone());
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}

/// One [`FakeStore`] behind several connections, for concurrent requests.
#[derive(Clone, Default)]
pub struct SharedStore(pub Arc<Mutex<FakeStore>>);

impl SharedStore {
    pub fn with(beatmaps: Vec<Beatmap>) -> Self {
        Self(Arc::new(Mutex::new(FakeStore::with(beatmaps))))
    }
}

impl BeatmapStore for SharedStore {
    async fn read_set(&mut self, set_id: i64) -> QueryResult<Vec<Beatmap>> {
        self.0.lock().await.read_set(set_id).await
    }

    async fn insert(&mut self, beatmap: &Beatmap) -> QueryResult<bool> {
        self.0.lock().await.insert(beatmap).await
    }

    async fn replace(&mut self, beatmap: &Beatmap) -> QueryResult<bool> {
        self.0.lock().await.replace(beatmap).await
    }

    async fn mark_full_set(&mut self, set_id: i64) -> QueryResult<usize> {
        self.0.lock().await.mark_full_set(set_id).await
    }
}

#[derive(Default)]
pub struct FakeUpstream {
    pub beatmaps: Vec<Beatmap>,
    calls: AtomicUsize,
}

impl FakeUpstream {
    pub fn with(beatmaps: Vec<Beatmap>) -> Self {
        Self {
            beatmaps,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UpstreamSource for FakeUpstream {
    async fn fetch_set(&self, set_id: i64) -> Result<Vec<Beatmap>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Lets a concurrent request run while this one is "on the network".
        tokio::task::yield_now().await;

        Ok(self
            .beatmaps
            .iter()
            .filter(|beatmap| beatmap.set_id == set_id)
            .cloned()
            .collect())
    }

    async fn fetch_map(&self, lookup: &MapLookup) -> Result<Option<Beatmap>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        Ok(self
            .beatmaps
            .iter()
            .find(|beatmap| match lookup {
                MapLookup::Id(id) => beatmap.map_id == *id,
                MapLookup::Checksum(checksum) => beatmap.map_md5 == *checksum,
            })
            .map(|beatmap| Beatmap {
                full_set_present: false,
                ..beatmap.clone()
            }))
    }
}
