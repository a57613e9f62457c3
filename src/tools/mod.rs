//! # Companion Tools
//!
//! Small standalone utilities shipped alongside the composer: an age filter
//! over a JSON user database and a whitespace word counter.

pub mod users;
pub mod words;

pub use users::{filter_underage, load_users, User, UserDatabase, ADULT_AGE};
pub use words::{count_words, count_words_in_file};
