use crate::{
    analysis_commands::AnalysisCommands, chat_commands::ChatCommands,
    memory_commands::MemoryCommands, profile_commands::ProfileCommands,
};

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Sign in with email and password
    Login {
        /// Email to sign in with (prompted if omitted)
        email: Option<String>,
    },

    /// Create a new account and sign in
    Register,

    /// Sign out of the current session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Show server reachability and session status
    Status,

    /// Permanently delete the signed-in account
    DeleteAccount,

    /// Skin profile and assessment
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },

    /// Product analyses
    Analyses {
        #[command(subcommand)]
        action: AnalysisCommands,
    },

    /// Advisor chat sessions
    Chat {
        #[command(subcommand)]
        action: ChatCommands,
    },

    /// Long-term skin memory: allergens, issues, and history
    Memory {
        #[command(subcommand)]
        action: MemoryCommands,
    },
}
