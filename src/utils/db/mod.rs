pub mod beatmaps;
pub mod establish_connection;
pub mod scores;
pub mod users;
