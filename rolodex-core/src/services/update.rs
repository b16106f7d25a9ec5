//! Update flow - pre-populate from and submit changes to an existing record

use std::sync::Arc;

use crate::domain::{User, UserDraft};
use crate::ports::UserService;

/// Update flow for an existing user record
///
/// Bound to one record identifier for its whole lifetime. `load` issues a
/// single read to pre-populate the form state; `submit` issues a single
/// full-record update. The two calls are independent and uncoordinated: the
/// last one to complete owns the form state (a late read after a submit is
/// not reconciled). `None` state means "not yet loaded", never "empty
/// record".
pub struct UpdateFlow {
    service: Arc<dyn UserService>,
    user_id: String,
    current: Option<User>,
}

impl UpdateFlow {
    pub fn new(service: Arc<dyn UserService>, user_id: impl Into<String>) -> Self {
        Self {
            service,
            user_id: user_id.into(),
            current: None,
        }
    }

    /// The identifier this flow targets
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The form-population state: the record last seen from the service
    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Fetch the record to pre-populate the form.
    ///
    /// Issues exactly one read. On failure the error is logged and the form
    /// state stays untouched; the flow remains usable for submission.
    pub async fn load(&mut self) -> Option<&User> {
        match self.service.get_by_id(&self.user_id).await {
            Ok(user) => {
                tracing::info!(id = %user.id, "user record loaded");
                self.current = Some(user);
            }
            Err(error) => {
                tracing::error!(id = %self.user_id, %error, "error getting user");
            }
        }
        self.current.as_ref()
    }

    /// Submit the full replacement field set for this record.
    ///
    /// The identifier travels as a parameter, never in the payload. Returns
    /// the updated record on success (which also becomes the new form
    /// state), or `None` on a logged, absorbed failure.
    pub async fn submit(&mut self, draft: UserDraft) -> Option<User> {
        tracing::debug!(id = %self.user_id, name = %draft.name, "submitting user update");
        match self.service.update(&self.user_id, &draft).await {
            Ok(user) => {
                tracing::info!(id = %user.id, "user updated");
                self.current = Some(user.clone());
                Some(user)
            }
            Err(error) => {
                tracing::error!(id = %self.user_id, %error, "error updating user");
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

    fn seeded_mock() -> Arc<MockUserService> {
        let mock = MockUserService::new();
        mock.seed(User::new("7", "Alice", "alice@example.com"));
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_load_calls_get_by_id_exactly_once() {
        let mock = seeded_mock();
        let mut flow = UpdateFlow::new(mock.clone(), "7");

        let loaded = flow.load().await;

        assert_eq!(loaded.unwrap().name, "Alice");
        assert_eq!(
            mock.recorded_calls(),
            vec![RecordedCall::GetById("7".to_string())]
        );
    }

    #[tokio::test]
    async fn test_load_success_populates_form_state() {
        let mock = seeded_mock();
        let mut flow = UpdateFlow::new(mock, "7");

        assert!(flow.current().is_none());
        flow.load().await;
        assert_eq!(flow.current().unwrap().id, "7");
    }

    #[tokio::test]
    async fn test_load_failure_leaves_state_absent() {
        let mock = Arc::new(MockUserService::new().failing_get());
        let mut flow = UpdateFlow::new(mock.clone(), "7");

        let loaded = flow.load().await;

        assert!(loaded.is_none());
        assert!(flow.current().is_none());
        assert_eq!(mock.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_targets_flow_identifier() {
        let mock = seeded_mock();
        let mut flow = UpdateFlow::new(mock.clone(), "7");

        let draft = UserDraft::new("Alice Updated", "alice@example.com");
        let updated = flow.submit(draft.clone()).await;

        assert_eq!(updated.unwrap().name, "Alice Updated");
        assert_eq!(
            mock.recorded_calls(),
            vec![RecordedCall::Update("7".to_string(), draft)]
        );
    }

    #[tokio::test]
    async fn test_submit_works_without_prior_load() {
        // A failed (or never-issued) read must not block submission
        let mock = Arc::new(MockUserService::new().failing_get());
        mock.seed(User::new("7", "Alice", "alice@example.com"));
        let mut flow = UpdateFlow::new(mock.clone(), "7");

        flow.load().await;
        assert!(flow.current().is_none());

        let updated = flow.submit(UserDraft::new("Fresh", "fresh@example.com")).await;

        assert!(updated.is_some());
        let calls = mock.recorded_calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[1], RecordedCall::Update(ref id, _) if id == "7"));
    }

    #[tokio::test]
    async fn test_submit_failure_is_absorbed_and_state_kept() {
        let mock = Arc::new(MockUserService::new().failing_update());
        mock.seed(User::new("7", "Alice", "alice@example.com"));
        let mut flow = UpdateFlow::new(mock.clone(), "7");
        flow.load().await;

        let updated = flow.submit(UserDraft::new("Ghost", "ghost@example.com")).await;

        assert!(updated.is_none());
        // Failed submit does not clobber the loaded state
        assert_eq!(flow.current().unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_successful_submit_becomes_form_state() {
        let mock = seeded_mock();
        let mut flow = UpdateFlow::new(mock, "7");
        flow.load().await;

        flow.submit(UserDraft::new("Renamed", "alice@example.com")).await;

        // Last writer wins: the update result replaced the loaded record
        assert_eq!(flow.current().unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_load_failure_emits_exactly_one_error_log_event() {
        let (subscriber, errors) = ErrorCounter::new();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mock = Arc::new(MockUserService::new().failing_get());
        let mut flow = UpdateFlow::new(mock, "7");

        assert!(flow.load().await.is_none());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_emits_exactly_one_error_log_event() {
        let (subscriber, errors) = ErrorCounter::new();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mock = Arc::new(MockUserService::new().failing_update());
        let mut flow = UpdateFlow::new(mock, "7");

        let updated = flow.submit(UserDraft::new("Ghost", "ghost@example.com")).await;

        assert!(updated.is_none());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }
}
