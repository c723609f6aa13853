//! Submission controller: owns the form, drives generation requests, and is
//! the only writer of [`ViewState`].

use std::{
    future::IntoFuture,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use futures::{future::BoxFuture, FutureExt};
use shared::{
    domain::{FormField, FormInput},
    error::MissingFields,
    protocol::GenerationResult,
};
use tracing::{debug, info, warn};

use crate::{
    error::{GenerationError, SubmitError},
    generation::GenerationBackend,
    view_state::{ViewState, ViewStateReader, ViewStateStore},
};

/// Sequence number handed to each accepted submission.
pub type RequestToken = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Succeeded,
    Failed(String),
    /// A newer submission was issued before this one settled; its outcome was dropped.
    Superseded,
}

struct Shared {
    state: ViewStateStore,
    latest_token: AtomicU64,
}

impl Shared {
    fn is_latest(&self, token: RequestToken) -> bool {
        self.latest_token.load(Ordering::SeqCst) == token
    }
}

pub struct SubmissionController {
    backend: Arc<dyn GenerationBackend>,
    form: FormInput,
    shared: Arc<Shared>,
}

impl SubmissionController {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            form: FormInput::default(),
            shared: Arc::new(Shared {
                state: ViewStateStore::new(),
                latest_token: AtomicU64::new(0),
            }),
        }
    }

    pub fn view_state(&self) -> ViewStateReader {
        self.shared.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.shared.state.snapshot()
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    /// Direct binding for text inputs; same semantics as [`Self::update_field`].
    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        self.form.get_mut(field)
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.form.get_mut(field) = value.into();
    }

    /// Clears every field and any surfaced error. Result and pending flag stay.
    pub fn reset(&mut self) {
        self.form = FormInput::default();
        self.shared.state.replace_with(|current| {
            current.error.as_ref()?;
            Some(ViewState {
                error: None,
                ..current.clone()
            })
        });
    }

    /// Validates the form and, if complete, marks the view pending and returns
    /// the in-flight request. Nothing is sent until the returned value is awaited
    /// or spawned; dropping it unsettled still clears the pending flag.
    pub fn submit(&self) -> Result<PendingSubmission, SubmitError> {
        let missing = self.form.missing_required();
        if !missing.is_empty() {
            debug!(?missing, "submission blocked by empty required fields");
            return Err(MissingFields {
                fields: missing.into_iter().map(FormField::key).collect(),
            }
            .into());
        }

        let token = self.shared.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.state.replace_with(|current| {
            Some(ViewState {
                result: current.result.clone(),
                is_pending: true,
                error: None,
            })
        });
        info!(request_token = token, "generation request issued");

        let guard = PendingGuard {
            shared: Arc::clone(&self.shared),
            token,
        };
        let backend = Arc::clone(&self.backend);
        let input = self.form.clone();
        let future = async move {
            let outcome = backend.generate_email(&input).await;
            guard.settle(outcome)
        }
        .boxed();

        Ok(PendingSubmission { token, future })
    }
}

/// An accepted submission awaiting settlement.
pub struct PendingSubmission {
    token: RequestToken,
    future: BoxFuture<'static, Settlement>,
}

impl PendingSubmission {
    pub fn token(&self) -> RequestToken {
        self.token
    }
}

impl IntoFuture for PendingSubmission {
    type Output = Settlement;
    type IntoFuture = BoxFuture<'static, Settlement>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

/// Clears the pending flag on every exit path of a submission, including
/// panics and cancellation, unless a newer submission now owns it.
struct PendingGuard {
    shared: Arc<Shared>,
    token: RequestToken,
}

impl PendingGuard {
    fn settle(&self, outcome: Result<GenerationResult, GenerationError>) -> Settlement {
        let token = self.token;
        let mut settlement = Settlement::Superseded;
        let mut failure = None;
        self.shared.state.replace_with(|current| {
            if !self.shared.is_latest(token) {
                return None;
            }
            Some(match outcome {
                Ok(result) => {
                    settlement = Settlement::Succeeded;
                    ViewState {
                        result: Some(Arc::new(result)),
                        is_pending: false,
                        error: None,
                    }
                }
                Err(err) => {
                    let message = err.user_message();
                    failure = Some(err.to_string());
                    settlement = Settlement::Failed(message.clone());
                    ViewState {
                        result: current.result.clone(),
                        is_pending: false,
                        error: Some(message),
                    }
                }
            })
        });

        match &settlement {
            Settlement::Succeeded => info!(request_token = token, "generation result applied"),
            Settlement::Superseded => {
                debug!(request_token = token, "discarding settlement of superseded request")
            }
            Settlement::Failed(_) => {
                if let Some(error) = failure {
                    warn!(request_token = token, %error, "generation request failed");
                }
            }
        }
        settlement
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let token = self.token;
        self.shared.state.replace_with(|current| {
            if !current.is_pending || !self.shared.is_latest(token) {
                return None;
            }
            Some(ViewState {
                is_pending: false,
                ..current.clone()
            })
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
