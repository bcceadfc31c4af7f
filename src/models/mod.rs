pub mod beatmaps;
pub mod scores;
pub mod users;
