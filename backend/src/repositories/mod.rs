pub mod common;
pub mod flashcard;
pub mod refresh_credential;
pub mod streak;
pub mod study_session;
pub mod transaction;
pub mod user;
pub mod xp_event;

pub use refresh_credential::{CredentialStore, PgCredentialStore};
pub use transaction::{begin_transaction, commit_transaction};
