//! Create flow - submit a new user record

use std::sync::Arc;

use crate::domain::{User, UserDraft};
use crate::ports::UserService;

/// Create flow for new user records
///
/// Packages a draft produced by the form collaborator into exactly one
/// create call against the service. The outcome is reported to the log sink;
/// a service failure is absorbed here and never propagates. No retries, no
/// validation (the form collaborator owns input validation).
pub struct CreateFlow {
    service: Arc<dyn UserService>,
}

impl CreateFlow {
    pub fn new(service: Arc<dyn UserService>) -> Self {
        Self { service }
    }

    /// Submit a draft for creation.
    ///
    /// Returns the persisted record (with its server-assigned id) on
    /// success, or `None` if the service reported an error. The error itself
    /// is logged, not returned.
    pub async fn submit(&self, draft: UserDraft) -> Option<User> {
        tracing::debug!(name = %draft.name, email = %draft.email, "submitting user for creation");
        match self.service.create(&draft).await {
            Ok(user) => {
                tracing::info!(id = %user.id, name = %user.name, "user created");
                Some(user)
            }
            Err(error) => {
                tracing::error!(%error, "error creating user");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::adapters::mock::{MockUserService, RecordedCall};
    use crate::services::testing::ErrorCounter;

    #[tokio::test]
    async fn test_submit_calls_create_exactly_once() {
        let mock = Arc::new(MockUserService::new());
        let flow = CreateFlow::new(mock.clone());

        let created = flow
            .submit(UserDraft::new("Alice", "alice@example.com"))
            .await;

        assert!(created.is_some());
        let calls = mock.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            RecordedCall::Create(UserDraft::new("Alice", "alice@example.com"))
        );
    }

    #[tokio::test]
    async fn test_created_record_carries_server_assigned_id() {
        let mock = Arc::new(MockUserService::new());
        let flow = CreateFlow::new(mock.clone());

        let created = flow
            .submit(UserDraft::new("Alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.name, "Alice");
        // No further calls beyond the single create
        assert_eq!(mock.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_service_failure_is_absorbed() {
        let mock = Arc::new(MockUserService::new().failing_create());
        let flow = CreateFlow::new(mock.clone());

        let created = flow.submit(UserDraft::new("Bob", "bob@example.com")).await;

        assert!(created.is_none());
        // The call was still issued exactly once; no retry
        assert_eq!(mock.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_emits_exactly_one_error_log_event() {
        let (subscriber, errors) = ErrorCounter::new();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mock = Arc::new(MockUserService::new().failing_create());
        let flow = CreateFlow::new(mock);

        let created = flow.submit(UserDraft::new("Bob", "bob@example.com")).await;

        assert!(created.is_none());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_emits_no_error_log_event() {
        let (subscriber, errors) = ErrorCounter::new();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mock = Arc::new(MockUserService::new());
        let flow = CreateFlow::new(mock);

        let created = flow
            .submit(UserDraft::new("Alice", "alice@example.com"))
            .await;

        assert!(created.is_some());
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }
}
