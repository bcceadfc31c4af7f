pub mod caching;
pub mod leaderboard;
pub mod osu_file;
pub mod profile;
pub mod reconcile;
#[cfg(test)]
pub mod test_support;
pub mod upstream;
