pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod schema;
pub mod utils;

use crate::config::Config;
use crate::utils::osu::osu_file::OsuFileMirror;
use crate::utils::osu::reconcile::BeatmapSetReconciler;
use crate::utils::osu::upstream::{OsuUpstream, RetryPolicy};
use crate::utils::replay::storage::FsReplayStore;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use rosu_v2::prelude::Osu;
use std::sync::Arc;

pub use error::ApiError;
pub use mobc::Pool;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub type DbPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Everything a request handler needs, built once at startup.
pub struct Data {
    pub db_pool: DbPool,
    pub upstream: OsuUpstream,
    pub reconciler: BeatmapSetReconciler,
    pub osu_files: OsuFileMirror,
    pub replays: FsReplayStore,
}

impl Data {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let osu_client = Osu::new(config.osu_client_id, config.osu_client_secret.clone()).await?;

        Ok(Self {
            db_pool: utils::db::establish_connection::build_pool(
                &config.database_url,
                config.pool_size,
            ),
            upstream: OsuUpstream::new(
                Arc::new(osu_client),
                RetryPolicy::new(config.upstream_timeout, config.upstream_retries),
            ),
            reconciler: BeatmapSetReconciler::default(),
            osu_files: OsuFileMirror::new(config.beatmap_path.clone())?,
            replays: FsReplayStore::new(config.replay_path.clone()),
        })
    }
}
