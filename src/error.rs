use crate::Error;
use diesel_async::pooled_connection::PoolError;
use thiserror::Error;

/// Outcomes surfaced to callers of the replay and beatmap operations.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("osu!api unavailable for {0}")]
    UpstreamUnavailable(String),
    #[error("beatmap set {set_id} is inconsistent: {reason}")]
    Inconsistent { set_id: i64, reason: String },
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] mobc::Error<PoolError>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] Error),
}

impl ApiError {
    /// Status a web frontend should answer with. Missing data and an
    /// unreachable upstream are both reported as not found.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::UpstreamUnavailable(_) => 404,
            Self::Inconsistent { .. } => 409,
            _ => 500,
        }
    }

    pub fn is_client_facing(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_is_never_a_server_fault() {
        assert_eq!(ApiError::NotFound("score 1".into()).status_code(), 404);
        assert_eq!(
            ApiError::UpstreamUnavailable("beatmap set 1".into()).status_code(),
            404
        );
        assert!(
            ApiError::Inconsistent {
                set_id: 1,
                reason: String::from("mixed"),
            }
            .is_client_facing()
        );
        assert!(!ApiError::Database(diesel::result::Error::NotFound).is_client_facing());
    }
}
