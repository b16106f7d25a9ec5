//! Flow services - the create and update data flows
//!
//! Each flow owns one interaction pattern with the user-record service and
//! absorbs service errors at its boundary.

mod create;
mod update;

pub use create::CreateFlow;
pub use update::UpdateFlow;
