//! Port definitions (trait seams for external dependencies)

mod user_service;

pub use user_service::UserService;
