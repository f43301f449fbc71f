pub mod derived;
pub mod engine;
pub mod error;
pub mod filter;
pub mod group;
pub mod journal;
pub mod prefs;
pub mod record_store;
pub mod score;
pub mod spotlight;
pub mod suggestion;
pub mod types;
