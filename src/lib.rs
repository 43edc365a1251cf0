pub mod app;
pub mod cli;
pub mod config;
pub mod dom;
pub mod errors;
pub mod handlers;
pub mod like;
pub mod models;
pub mod state;
pub mod storage;
pub mod subscription;
pub mod transport;

pub use app::{ControlKind, PageController};
pub use config::{Config, resolve_page_path};
pub use handlers::{ClickEvent, ToggleOutcome};
pub use storage::{load_page, persist_page};
pub use transport::{ReqwestTransport, Transport};
