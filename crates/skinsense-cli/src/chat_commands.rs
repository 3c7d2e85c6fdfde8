use clap::Subcommand;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum ChatCommands {
    /// List chat sessions, newest first
    List {
        /// Maximum number to show
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Show one session's transcript
    Show {
        /// Session id (UUID)
        id: Uuid,
    },

    /// Start a new chat session
    New {
        /// Session title
        #[arg(long)]
        title: Option<String>,
    },

    /// Send a message and print the advisor's reply
    Send {
        /// Session id (UUID)
        id: Uuid,

        /// Message text
        message: String,
    },

    /// Delete a session and its transcript
    Delete {
        /// Session id (UUID)
        id: Uuid,
    },
}
