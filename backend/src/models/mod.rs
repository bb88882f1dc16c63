pub mod flashcard;
pub mod progress;
pub mod refresh_credential;
pub mod streak;
pub mod study_session;
pub mod user;
pub mod xp_event;
