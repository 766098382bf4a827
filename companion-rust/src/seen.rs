use crate::CompanionStore;
use clover_sdk::{ApiResult, CompanionContext, ContextSeenResponse};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Progress of the one-shot "mark seen" call of a mounted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeenState {
    NotSent,
    Sending,
    Sent,
    Failed,
}

impl SeenState {
    /// Whether a new call may start from this state.
    #[must_use]
    pub fn can_send(self) -> bool {
        matches!(self, Self::NotSent | Self::Failed)
    }
}

/// Marks a context as seen at most once per instance.
///
/// Create one per mounted view. `ensure_marked` may be called on every
/// render; only the first call from `NotSent` (or the first after a failure)
/// reaches the backend.
#[derive(Debug)]
pub struct MarkSeenOnce {
    context: CompanionContext,
    state: Mutex<SeenState>,
}

impl MarkSeenOnce {
    #[must_use]
    pub fn new(context: CompanionContext) -> Self {
        Self {
            context,
            state: Mutex::new(SeenState::NotSent),
        }
    }

    #[must_use]
    pub fn context(&self) -> CompanionContext {
        self.context
    }

    #[must_use]
    pub fn state(&self) -> SeenState {
        *self.lock()
    }

    /// Send the "context seen" call unless it is in progress or done.
    ///
    /// Returns `None` when nothing was sent. A failed call, or a response
    /// with `ok: false`, moves to `Failed` so a later call retries.
    pub async fn ensure_marked(
        &self,
        store: &CompanionStore,
    ) -> Option<ApiResult<ContextSeenResponse>> {
        {
            let mut state = self.lock();
            if !state.can_send() {
                return None;
            }
            *state = SeenState::Sending;
        }

        let mut sending = SendingGuard { owner: self };
        let result = store.mark_seen(self.context).await;
        let next = match &result {
            Ok(response) if response.ok => SeenState::Sent,
            _ => SeenState::Failed,
        };
        sending.finish(next);
        Some(result)
    }

    fn lock(&self) -> MutexGuard<'_, SeenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Moves the latch out of `Sending` even when `ensure_marked` is dropped
/// before the call resolves.
struct SendingGuard<'a> {
    owner: &'a MarkSeenOnce,
}

impl SendingGuard<'_> {
    fn finish(&mut self, next: SeenState) {
        *self.owner.lock() = next;
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.owner.lock();
        if *state == SeenState::Sending {
            *state = SeenState::NotSent;
        }
    }
}
