//! Adapter implementations of the ports
//!
//! - `http`: the real user-record API client (reqwest)
//! - `mock`: in-process and HTTP mocks for testing

pub mod http;
pub mod mock;

pub use http::HttpUserService;
pub use mock::{MockConfig, MockUserServer, MockUserService, RecordedCall};
