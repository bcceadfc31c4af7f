use crate::Error;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{error, info};

const OSU_FILE_URL: &str = "https://osu.ppy.sh/web/osu-getosufile.php";

/// Keeps a local copy of the `.osu` file of every stored difficulty.
#[derive(Clone)]
pub struct OsuFileMirror {
    http: reqwest::Client,
    url: String,
    dir: PathBuf,
    pending: Arc<Mutex<JoinSet<()>>>,
}

impl OsuFileMirror {
    pub fn new(dir: PathBuf) -> Result<Self, Error> {
        let http = reqwest::Client::builder().user_agent("osu!").build()?;

        Ok(Self {
            http,
            url: OSU_FILE_URL.to_string(),
            dir,
            pending: Arc::default(),
        })
    }

    pub fn path(&self, map_id: i64) -> PathBuf {
        self.dir.join(format!("{map_id}.osu"))
    }

    /// Downloads the file unless it is already on disk. With `replace` the file
    /// on disk belongs to an outdated version of the difficulty and is removed
    /// before downloading, so a failed download never leaves it paired with the
    /// new row. Returns whether a file was written.
    pub async fn save(&self, map_id: i64, replace: bool) -> Result<bool, Error> {
        let path = self.path(map_id);
        if replace {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => info!("Removed outdated .osu file for beatmap {}.", map_id),
                Err(why) if why.kind() == ErrorKind::NotFound => {}
                Err(why) => return Err(why.into()),
            }
        } else if tokio::fs::try_exists(&path).await? {
            return Ok(false);
        }

        let body = self
            .http
            .get(format!("{}?q={map_id}", self.url))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        if body.is_empty() {
            error!("osu! returned an empty .osu file for beatmap {}.", map_id);
            return Ok(false);
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &body).await?;
        info!("Saved .osu file for beatmap {}.", map_id);

        Ok(true)
    }

    /// Mirrors new difficulties in `inserted` and re-downloads the ones in
    /// `replaced` in the background. Failures are logged, never returned.
    pub async fn spawn_save(&self, inserted: Vec<i64>, replaced: Vec<i64>) {
        let mut pending = self.pending.lock().await;
        while let Some(result) = pending.try_join_next() {
            if let Err(why) = result {
                error!(".osu download task failed: {}", why);
            }
        }

        if inserted.is_empty() && replaced.is_empty() {
            return;
        }

        let mirror = self.clone();
        pending.spawn(async move {
            let downloads = inserted
                .into_iter()
                .map(|map_id| (map_id, false))
                .chain(replaced.into_iter().map(|map_id| (map_id, true)));

            for (map_id, replace) in downloads {
                if let Err(why) = mirror.save(map_id, replace).await {
                    error!("Failed to save .osu file for beatmap {}: {}", map_id, why);
                }
            }
        });
    }

    /// Waits for every background download started so far.
    pub async fn finish(&self) {
        let mut pending = self.pending.lock().await;
        while let Some(result) = pending.join_next().await {
            if let Err(why) = result {
                error!(".osu download task failed: {}", why);
            }
        }
    }
}
