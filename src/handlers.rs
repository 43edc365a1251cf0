use crate::dom::{Element, NodeId};
use crate::errors::TransportError;
use crate::like;
use crate::models::StatusResponse;
use crate::state::PageState;
use crate::subscription;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server confirmed and the view was updated.
    Applied,
    /// The server answered without `status == "ok"`.
    Rejected { status: Option<String> },
    TransportFailed,
    /// A request for the same control was still outstanding.
    Suppressed,
    /// The control's data attributes could not be read, either when sending or
    /// when applying a confirmed answer.
    Invalid,
    Unbound,
    Aborted,
}

#[derive(Debug)]
enum Dispatch {
    Sent(JoinHandle<ToggleOutcome>),
    Skipped(ToggleOutcome),
}

/// Result of delivering a click. The request, if any, runs in the background.
#[derive(Debug)]
pub struct ClickEvent {
    pub default_prevented: bool,
    dispatch: Dispatch,
}

impl ClickEvent {
    pub(crate) fn unbound() -> Self {
        Self {
            default_prevented: false,
            dispatch: Dispatch::Skipped(ToggleOutcome::Unbound),
        }
    }

    fn skipped(outcome: ToggleOutcome) -> Self {
        Self {
            default_prevented: true,
            dispatch: Dispatch::Skipped(outcome),
        }
    }

    fn sent(handle: JoinHandle<ToggleOutcome>) -> Self {
        Self {
            default_prevented: true,
            dispatch: Dispatch::Sent(handle),
        }
    }

    pub fn request_sent(&self) -> bool {
        matches!(self.dispatch, Dispatch::Sent(_))
    }

    /// Waits for the response to be applied (or absorbed).
    pub async fn settled(self) -> ToggleOutcome {
        match self.dispatch {
            Dispatch::Sent(handle) => handle.await.unwrap_or(ToggleOutcome::Aborted),
            Dispatch::Skipped(outcome) => outcome,
        }
    }
}

pub async fn like_click(state: PageState, control: NodeId) -> ClickEvent {
    let request = {
        let mut doc = state.document.lock().await;
        if state.config.guard_in_flight && doc.get(control).is_some_and(Element::is_pending) {
            debug!(?control, "like request still outstanding");
            return ClickEvent::skipped(ToggleOutcome::Suppressed);
        }
        let request = match like::read_request(&doc, control) {
            Ok(request) => request,
            Err(err) => {
                warn!("like control is malformed: {err}");
                return ClickEvent::skipped(ToggleOutcome::Invalid);
            }
        };
        doc.set_pending(control, true);
        request
    };

    debug!(article_id = %request.article_id, action = %request.action, "sending like");
    let handle = tokio::spawn(async move {
        let response = state
            .transport
            .post_form(&state.config.like_path, like::form(&request))
            .await;

        let mut doc = state.document.lock().await;
        doc.set_pending(control, false);
        if let Some(outcome) = absorb_failure(&state.config.like_path, response) {
            return outcome;
        }

        let count = like::apply_success(&mut doc, control, request.action, &state.config);
        info!(
            article_id = %request.article_id,
            action = %request.action,
            count = ?count,
            "like toggled"
        );
        ToggleOutcome::Applied
    });

    ClickEvent::sent(handle)
}

pub async fn subscription_click(state: PageState, control: NodeId) -> ClickEvent {
    let request = {
        let mut doc = state.document.lock().await;
        if state.config.guard_in_flight && doc.get(control).is_some_and(Element::is_pending) {
            debug!(?control, "subscription request still outstanding");
            return ClickEvent::skipped(ToggleOutcome::Suppressed);
        }
        let request = match subscription::read_request(&doc, control) {
            Ok(request) => request,
            Err(err) => {
                warn!("subscription control is malformed: {err}");
                return ClickEvent::skipped(ToggleOutcome::Invalid);
            }
        };
        doc.set_pending(control, true);
        request
    };

    debug!(username = %request.username, action = %request.action, "sending subscription");
    let handle = tokio::spawn(async move {
        let response = state
            .transport
            .post_form(&state.config.subscribe_path, subscription::form(&request))
            .await;

        let mut doc = state.document.lock().await;
        doc.set_pending(control, false);
        if let Some(outcome) = absorb_failure(&state.config.subscribe_path, response) {
            return outcome;
        }

        let applied =
            subscription::apply_success(&mut doc, control, &request.username, &state.config);
        match applied {
            Some(previous) => {
                info!(
                    username = %request.username,
                    previous = %previous,
                    "subscription toggled"
                );
                ToggleOutcome::Applied
            }
            None => {
                warn!(username = %request.username, "no subscription control holds an action");
                ToggleOutcome::Invalid
            }
        }
    });

    ClickEvent::sent(handle)
}

/// `None` when the answer is a confirmed `ok`.
fn absorb_failure(
    path: &str,
    response: Result<StatusResponse, TransportError>,
) -> Option<ToggleOutcome> {
    match response {
        Ok(body) => {
            debug!(path, status = ?body.status, "response");
            if body.is_ok() {
                None
            } else {
                Some(ToggleOutcome::Rejected {
                    status: body.status,
                })
            }
        }
        Err(err) => {
            warn!("{err}");
            Some(ToggleOutcome::TransportFailed)
        }
    }
}
