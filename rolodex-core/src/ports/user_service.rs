//! User-record service port
//!
//! Defines the interface for the remote collaborator that persists user
//! records. The flow services depend on this trait only, so tests can swap
//! in an in-process mock and the CLI can wire in the HTTP adapter.

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{User, UserDraft};

/// Remote user-record service trait
///
/// Each call resolves to exactly one terminal outcome: the affected record
/// or an error. Implementations hold no per-call state and are safe to share
/// across flows behind an `Arc`.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a new record from a draft (no identifier in the payload).
    ///
    /// Returns the persisted record with its server-assigned identifier.
    async fn create(&self, draft: &UserDraft) -> Result<User>;

    /// Fetch a record by its identifier.
    async fn get_by_id(&self, id: &str) -> Result<User>;

    /// Replace the field set of an existing record.
    ///
    /// # Arguments
    /// * `id` - Target identifier, travels separately from the payload
    /// * `draft` - Full replacement field set, without the identifier
    async fn update(&self, id: &str, draft: &UserDraft) -> Result<User>;
}
