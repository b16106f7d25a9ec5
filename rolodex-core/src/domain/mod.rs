//! Domain types

pub mod result;
mod user;

pub use user::{User, UserDraft};
