pub mod auth;
pub mod flashcards;
pub mod health;
pub mod progress;
pub mod study_sessions;
pub mod tasks;
