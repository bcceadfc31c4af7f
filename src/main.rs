use clap::{Parser, Subcommand};
use rina_api::config::Config;
use rina_api::constants::modes::{Gamemode, Mode, ModeAndGamemode};
use rina_api::utils::db::establish_connection::run_migrations;
use rina_api::utils::osu::upstream::MapLookup;
use rina_api::utils::osu::{caching, leaderboard, profile};
use rina_api::utils::replay::{replay_file_name, write_replay};
use rina_api::{ApiError, Data, Error};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tikv_jemallocator::Jemalloc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Beatmap mirroring and replay downloads for a rina server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Every difficulty of a beatmap set, mirroring missing ones.
    Set { set_id: i64 },
    /// A single difficulty by id.
    Map { map_id: i64 },
    /// A single difficulty by checksum.
    Checksum { md5: String },
    /// Writes the downloadable replay of a score.
    Replay {
        score_id: i64,
        /// Defaults to `<score_id>.osr` in the working directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Best scores on a difficulty.
    Leaderboard {
        map_id: i64,
        #[arg(long, default_value = "osu", value_parser = parse_mode)]
        mode: Mode,
        #[arg(long, default_value = "vanilla", value_parser = parse_gamemode)]
        gamemode: Gamemode,
    },
    /// A user's stats in one mode.
    Stats {
        user_id: i64,
        #[arg(long, default_value = "osu", value_parser = parse_mode)]
        mode: Mode,
        #[arg(long, default_value = "vanilla", value_parser = parse_gamemode)]
        gamemode: Gamemode,
    },
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    match value.parse::<i32>() {
        Ok(number) => Mode::try_from(number).map_err(|mode| format!("unknown mode {mode}")),
        Err(_) => Mode::from_name(value).ok_or_else(|| format!("unknown mode \"{value}\"")),
    }
}

fn parse_gamemode(value: &str) -> Result<Gamemode, String> {
    match value.parse::<i32>() {
        Ok(number) => {
            Gamemode::try_from(number).map_err(|gamemode| format!("unknown gamemode {gamemode}"))
        }
        Err(_) => {
            Gamemode::from_name(value).ok_or_else(|| format!("unknown gamemode \"{value}\""))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

async fn run(data: &Data, command: Command) -> Result<(), ApiError> {
    match command {
        Command::Set { set_id } => {
            print_json(&caching::get_beatmapset(data, set_id).await?)?;
        }
        Command::Map { map_id } => {
            print_json(&caching::get_beatmap(data, &MapLookup::Id(map_id)).await?)?;
        }
        Command::Checksum { md5 } => {
            print_json(&caching::get_beatmap(data, &MapLookup::Checksum(md5)).await?)?;
        }
        Command::Replay { score_id, out } => {
            let replay = write_replay(data, score_id).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(replay_file_name(score_id)));
            tokio::fs::write(&path, &replay).await?;
            info!("Wrote replay of score {} to {}.", score_id, path.display());
        }
        Command::Leaderboard {
            map_id,
            mode,
            gamemode,
        } => {
            let info = ModeAndGamemode::normalize(mode, gamemode);
            print_json(&leaderboard::map_leaderboard(data, map_id, info).await?)?;
        }
        Command::Stats {
            user_id,
            mode,
            gamemode,
        } => {
            let info = ModeAndGamemode::normalize(mode, gamemode);
            print_json(&profile::user_stats(data, user_id, info).await?)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, Error> {
    let args = Args::parse();

    // Loads `./.env` relative to the CWD when it exists.
    if let Err(why) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {why}");
    }

    let file_appender = tracing_appender::rolling::daily("logs", "info.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    run_migrations(config.database_url.clone()).await?;

    let data = Data::new(&config).await?;

    let result = run(&data, args.command).await;
    data.osu_files.finish().await;

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(why) => {
            if why.is_client_facing() {
                info!("{}", why);
            } else {
                error!("{}", why);
            }
            eprintln!("{why}");

            Ok(ExitCode::FAILURE)
        }
    }
}
