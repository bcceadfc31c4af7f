use crate::Error;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime settings, read from the environment (and `./.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub osu_client_id: u64,
    pub osu_client_secret: String,
    pub replay_path: PathBuf,
    pub beatmap_path: PathBuf,
    pub upstream_timeout: Duration,
    pub upstream_retries: u32,
    pub pool_size: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            osu_client_id: required("OSU_CLIENT_ID")?
                .parse::<u64>()
                .map_err(|why| format!("Failed to parse OSU_CLIENT_ID: {why}"))?,
            osu_client_secret: required("OSU_CLIENT_SECRET")?,
            replay_path: PathBuf::from(
                env::var("REPLAY_PATH").unwrap_or_else(|_| String::from("replays")),
            ),
            beatmap_path: PathBuf::from(
                env::var("BEATMAP_PATH").unwrap_or_else(|_| String::from("beatmaps")),
            ),
            upstream_timeout: Duration::from_secs(parse_or("UPSTREAM_TIMEOUT", 5)?),
            upstream_retries: parse_or("UPSTREAM_RETRIES", 2)?,
            pool_size: parse_or("DB_POOL_SIZE", 10)?,
        })
    }
}

fn required(name: &str) -> Result<String, Error> {
    env::var(name).map_err(|_| format!("env variable \"{name}\" has not been set.").into())
}

fn parse_or<T>(name: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|why| format!("Failed to parse {name}: {why}").into()),
        Err(_) => Ok(default),
    }
}
