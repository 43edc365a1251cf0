use crate::config::Config;
use crate::dom::{Document, NodeId};
use crate::handlers::{self, ClickEvent};
use crate::like;
use crate::state::PageState;
use crate::subscription;
use crate::transport::Transport;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Like,
    Subscription,
}

/// Page-lifetime owner of the document and the click bindings made at ready time.
pub struct PageController {
    state: PageState,
    bindings: BTreeMap<NodeId, ControlKind>,
}

impl PageController {
    /// Binds every like and subscription control present in `document`.
    /// Controls are never re-bound afterwards.
    pub fn ready(document: Document, transport: Arc<dyn Transport>, config: Config) -> Self {
        let mut bindings = BTreeMap::new();
        for id in document.find_all(like::is_control) {
            bindings.insert(id, ControlKind::Like);
        }
        for id in document.find_all(subscription::is_control) {
            bindings.insert(id, ControlKind::Subscription);
        }
        info!(controls = bindings.len(), "page ready");

        Self {
            state: PageState::new(document, transport, config),
            bindings,
        }
    }

    pub fn binding(&self, target: NodeId) -> Option<ControlKind> {
        self.bindings.get(&target).copied()
    }

    pub fn controls(&self, kind: ControlKind) -> impl Iterator<Item = NodeId> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, bound)| **bound == kind)
            .map(|(id, _)| *id)
    }

    /// Delivers a click to `target`. Returns once the request is dispatched.
    pub async fn click(&self, target: NodeId) -> ClickEvent {
        match self.binding(target) {
            Some(ControlKind::Like) => handlers::like_click(self.state.clone(), target).await,
            Some(ControlKind::Subscription) => {
                handlers::subscription_click(self.state.clone(), target).await
            }
            None => ClickEvent::unbound(),
        }
    }

    /// First bound like control whose `data-article_id` equals `article_id`.
    pub async fn find_like(&self, article_id: &str) -> Option<NodeId> {
        let doc = self.state.document.lock().await;
        self.controls(ControlKind::Like)
            .find(|id| doc.data(*id, "article_id") == Some(article_id))
    }

    /// First bound subscription control for `username`.
    pub async fn find_subscription(&self, username: &str) -> Option<NodeId> {
        let doc = self.state.document.lock().await;
        self.controls(ControlKind::Subscription)
            .find(|id| doc.data(*id, "name") == Some(username))
    }

    pub async fn snapshot(&self) -> Document {
        self.state.document.lock().await.clone()
    }
}
