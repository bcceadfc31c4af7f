use std::future::Future;
use std::io;
use std::path::PathBuf;

/// Raw replay frames as uploaded by the client, keyed by score id.
pub trait ReplayStore {
    /// `None` when no replay was stored for the score.
    fn read(&self, score_id: i64) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;
}

#[derive(Debug, Clone)]
pub struct FsReplayStore {
    dir: PathBuf,
}

impl FsReplayStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self, score_id: i64) -> PathBuf {
        self.dir.join(format!("{score_id}.osr"))
    }
}

impl ReplayStore for FsReplayStore {
    async fn read(&self, score_id: i64) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(score_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(why) if why.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(why) => Err(why),
        }
    }
}
