pub mod db;
pub mod osu;
pub mod replay;
