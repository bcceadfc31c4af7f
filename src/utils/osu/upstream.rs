use crate::constants::approved::Approved;
use crate::constants::modes::Mode;
use crate::models::beatmaps::Beatmap;
use crate::{ApiError, Error};
use chrono::{DateTime, Utc};
use rosu_v2::prelude::{BeatmapExtended, BeatmapsetExtended, Osu, OsuError};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::{sleep, timeout};
use tracing::warn;

/// How a single difficulty is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapLookup {
    Id(i64),
    Checksum(String),
}

impl std::fmt::Display for MapLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "beatmap {id}"),
            Self::Checksum(checksum) => write!(f, "beatmap with checksum {checksum}"),
        }
    }
}

/// The authoritative beatmap catalog that local storage mirrors.
pub trait UpstreamSource {
    /// Every difficulty of the set. An empty list means upstream has no
    /// such set.
    fn fetch_set(
        &self,
        set_id: i64,
    ) -> impl Future<Output = Result<Vec<Beatmap>, ApiError>> + Send;

    fn fetch_map(
        &self,
        lookup: &MapLookup,
    ) -> impl Future<Output = Result<Option<Beatmap>, ApiError>> + Send;
}

/// Deadline and retry budget for a single osu!api request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, retries: u32) -> Self {
        Self {
            timeout,
            retries,
            backoff: Duration::from_millis(250),
        }
    }

    /// Runs `request` under the deadline, retrying transient failures with
    /// exponential backoff. A 404 from the osu!api is returned as `None`
    /// straight away.
    pub async fn run<T, F, R>(&self, what: &str, mut request: F) -> Result<Option<T>, ApiError>
    where
        F: FnMut() -> R,
        R: IntoFuture<Output = Result<T, OsuError>>,
    {
        let mut attempt = 0;

        loop {
            match timeout(self.timeout, request()).await {
                Ok(Ok(value)) => return Ok(Some(value)),
                Ok(Err(OsuError::NotFound)) => return Ok(None),
                Ok(Err(why)) => warn!("osu!api request for {} failed: {}", what, why),
                Err(_) => warn!(
                    "osu!api request for {} timed out after {:?}",
                    what, self.timeout
                ),
            }

            if attempt >= self.retries {
                return Err(ApiError::UpstreamUnavailable(what.to_string()));
            }

            sleep(self.backoff.saturating_mul(2u32.saturating_pow(attempt))).await;
            attempt += 1;
        }
    }
}

pub struct OsuUpstream {
    client: Arc<Osu>,
    retry: RetryPolicy,
}

impl OsuUpstream {
    pub fn new(client: Arc<Osu>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }
}

impl UpstreamSource for OsuUpstream {
    async fn fetch_set(&self, set_id: i64) -> Result<Vec<Beatmap>, ApiError> {
        let what = format!("beatmap set {set_id}");
        let mapset_id = u32::try_from(set_id).map_err(|_| ApiError::NotFound(what.clone()))?;

        let Some(beatmapset) = self
            .retry
            .run(&what, || self.client.beatmapset(mapset_id))
            .await?
        else {
            return Ok(Vec::new());
        };

        let mut beatmaps = Vec::new();
        for beatmap in beatmapset.maps.iter().flatten() {
            if usable_checksum(beatmap.checksum.as_deref()).is_none() {
                warn!(
                    "osu!api returned beatmap {} of set {} without a checksum, skipping.",
                    beatmap.map_id, set_id
                );
                continue;
            }
            beatmaps.push(to_insert_beatmap(&beatmapset, beatmap, true)?);
        }

        Ok(beatmaps)
    }

    async fn fetch_map(&self, lookup: &MapLookup) -> Result<Option<Beatmap>, ApiError> {
        let what = lookup.to_string();

        let beatmap = match lookup {
            MapLookup::Id(id) => {
                let map_id = u32::try_from(*id).map_err(|_| ApiError::NotFound(what.clone()))?;
                self.retry
                    .run(&what, || self.client.beatmap().map_id(map_id))
                    .await?
            }
            MapLookup::Checksum(checksum) => {
                self.retry
                    .run(&what, || self.client.beatmap().checksum(checksum.as_str()))
                    .await?
            }
        };

        let Some(beatmap) = beatmap else {
            return Ok(None);
        };

        let Some(beatmapset) = beatmap.mapset.as_ref() else {
            warn!("osu!api returned {} without its beatmap set", what);
            return Err(ApiError::UpstreamUnavailable(what));
        };

        if usable_checksum(beatmap.checksum.as_deref()).is_none() {
            warn!("osu!api returned {} without a checksum", what);
            return Err(ApiError::UpstreamUnavailable(what));
        }

        Ok(Some(to_insert_beatmap(beatmapset, &beatmap, false)?))
    }
}

/// Checksums are unique across stored difficulties, so a blank one can't be
/// stored.
fn usable_checksum(checksum: Option<&str>) -> Option<&str> {
    checksum.map(str::trim).filter(|checksum| !checksum.is_empty())
}

/// Converts an osu!api difficulty into a storable row.
pub fn to_insert_beatmap(
    beatmapset: &BeatmapsetExtended,
    beatmap: &BeatmapExtended,
    full_set_present: bool,
) -> Result<Beatmap, Error> {
    let Some(map_md5) = usable_checksum(beatmap.checksum.as_deref()) else {
        return Err(format!("beatmap {} has no checksum", beatmap.map_id).into());
    };

    Ok(Beatmap {
        server: String::from("bancho"),
        set_id: i64::from(beatmap.mapset_id),
        map_id: i64::from(beatmap.map_id),
        map_md5: map_md5.to_string(),
        title: beatmapset.title.clone(),
        title_unicode: beatmapset
            .title_unicode
            .clone()
            .unwrap_or_else(|| beatmapset.title.clone()),
        version: beatmap.version.clone(),
        artist: beatmapset.artist.clone(),
        artist_unicode: beatmapset
            .artist_unicode
            .clone()
            .unwrap_or_else(|| beatmapset.artist.clone()),
        creator: beatmapset.creator_name.to_string(),
        creator_id: i64::from(beatmap.creator_id),
        stars: beatmap.stars,
        od: beatmap.od,
        ar: beatmap.ar,
        hp: beatmap.hp,
        cs: beatmap.cs,
        mode: Mode::from(beatmap.mode).as_db(),
        bpm: beatmap.bpm,
        max_combo: i32::try_from(beatmap.max_combo.unwrap_or(0))?,
        submit_date: beatmapset.submitted_date.and_then(to_utc),
        approved_date: beatmapset.ranked_date.and_then(to_utc),
        latest_update: to_utc(beatmap.last_updated).unwrap_or_default(),
        length: i32::try_from(beatmap.seconds_total)?,
        drain: i32::try_from(beatmap.seconds_drain)?,
        plays: 0,
        passes: 0,
        favorites: i32::try_from(beatmapset.favourite_count)?,
        rating: average_rating(beatmapset.ratings.as_deref().unwrap_or_default()),
        approved: Approved::from(beatmap.status).as_db(),
        full_set_present,
    })
}

fn to_utc(datetime: OffsetDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(datetime.unix_timestamp(), datetime.nanosecond())
}

/// Mean user rating from the osu!api histogram, where index `i` holds the
/// number of votes for a rating of `i`. Index 0 is unused.
pub fn average_rating(histogram: &[u32]) -> f32 {
    let (votes, total) = histogram
        .iter()
        .enumerate()
        .skip(1)
        .fold((0u64, 0u64), |(votes, total), (rating, count)| {
            (
                votes + u64::from(*count),
                total + rating as u64 * u64::from(*count),
            )
        });

    if votes == 0 {
        0.0
    } else {
        (total as f64 / votes as f64) as f32
    }
}
