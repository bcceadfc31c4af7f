//! User privilege bits as stored in `users.privileges`.

pub const USER: i32 = 1 << 1;
pub const VERIFIED: i32 = 1 << 2;

/// Scores of users without this bit are hidden from leaderboards.
pub const LEADERBOARD_VISIBLE: i32 = VERIFIED;

pub fn has(privileges: i32, bit: i32) -> bool {
    privileges & bit != 0
}
