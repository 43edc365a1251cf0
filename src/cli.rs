use crate::app::ControlKind;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "blog_toggles")]
#[command(about = "Click like and subscription toggles on a saved blog page", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Toggle the like control of an article
    Like {
        /// Value of the control's data-article_id
        article_id: String,
    },
    /// Toggle the subscription control of a user
    Subscribe {
        /// Value of the control's data-name
        username: String,
    },
}

impl Commands {
    /// Which control the command clicks, and the key it is looked up by.
    pub fn target(&self) -> (ControlKind, &str) {
        match self {
            Self::Like { article_id } => (ControlKind::Like, article_id),
            Self::Subscribe { username } => (ControlKind::Subscription, username),
        }
    }
}
