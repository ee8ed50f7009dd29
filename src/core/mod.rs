//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod log;
pub mod messenger;
pub mod session;

// Re-export main types for cleaner imports
pub use currency::{Currency, CurrencySet, RateSnapshot, RateSource};
pub use messenger::{Menu, MenuAction, MenuOption, MessageId, Messenger};
pub use session::{ChatId, Peer, Session, SessionState, SessionStore, UserId};
