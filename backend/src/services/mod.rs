pub mod activity;
pub mod streak;
pub mod token;
pub mod xp;
