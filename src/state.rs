use crate::config::Config;
use crate::dom::Document;
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything a click handler needs, shared with its response task.
#[derive(Clone)]
pub struct PageState {
    pub document: Arc<Mutex<Document>>,
    pub transport: Arc<dyn Transport>,
    pub config: Arc<Config>,
}

impl PageState {
    pub fn new(document: Document, transport: Arc<dyn Transport>, config: Config) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            transport,
            config: Arc::new(config),
        }
    }
}
