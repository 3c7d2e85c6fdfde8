//! skinsense - SkinSense skincare advisor CLI
//!
//! A command-line client for the SkinSense backend: account management,
//! skin assessments, AI product analyses, advisor chat, and the skin
//! memory that tracks allergens and issues over time.
//!
//! # Examples
//!
//! ```bash
//! # Sign in and check the session
//! skinsense login
//! skinsense whoami
//!
//! # Analyze a product by its ingredient list
//! skinsense analyses analyze --name "Daily SPF 50" --ingredients "aqua, homosalate, octocrylene"
//!
//! # Record a reaction so future analyses warn about it
//! skinsense memory report-reaction --ingredient fragrance --description "redness within an hour"
//! ```

mod analysis_commands;
mod app;
mod chat_commands;
mod cli;
mod commands;
mod memory_commands;
mod profile_commands;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    analysis_commands::AnalysisCommands, app::App, chat_commands::ChatCommands, cli::Cli,
    commands::Commands, memory_commands::MemoryCommands, profile_commands::ProfileCommands,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut app = App::bootstrap(cli.api_url).await?;

    match cli.command {
        // Account commands
        Commands::Login { email } => app.login(email).await,
        Commands::Register => app.register().await,
        Commands::Logout => app.logout().await,
        Commands::Whoami => app.whoami(),
        Commands::Status => app.status().await,
        Commands::DeleteAccount => app.delete_account().await,

        // Skin profile commands
        Commands::Profile { action } => match action {
            ProfileCommands::Show => app.show_profile().await,
            ProfileCommands::Assess { answers, concerns } => app.assess(&answers, concerns).await,
            ProfileCommands::Update {
                username,
                full_name,
            } => app.update_account(username, full_name).await,
            ProfileCommands::ChangePassword => app.change_password().await,
        },

        // Product analysis commands
        Commands::Analyses { action } => match action {
            AnalysisCommands::List { limit } => app.list_analyses(limit).await,
            AnalysisCommands::Analyze {
                name,
                ingredients,
                image,
            } => app.analyze(name, ingredients, image).await,
            AnalysisCommands::Delete { id } => app.delete_analysis(id).await,
            AnalysisCommands::Clear => app.clear_analyses().await,
        },

        // Advisor chat commands
        Commands::Chat { action } => match action {
            ChatCommands::List { limit } => app.list_chats(limit).await,
            ChatCommands::Show { id } => app.show_chat(id).await,
            ChatCommands::New { title } => app.new_chat(title).await,
            ChatCommands::Send { id, message } => app.send_chat(id, &message).await,
            ChatCommands::Delete { id } => app.delete_chat(id).await,
        },

        // Skin memory commands
        Commands::Memory { action } => match action {
            MemoryCommands::Summary => app.memory_summary().await,
            MemoryCommands::Allergens => app.list_allergens().await,
            MemoryCommands::AddAllergen {
                ingredient,
                severity,
                confirmed,
                notes,
            } => app.add_allergen(ingredient, &severity, confirmed, notes).await,
            MemoryCommands::UpdateAllergen {
                id,
                severity,
                confirmed,
                notes,
            } => app.update_allergen(id, severity, confirmed, notes).await,
            MemoryCommands::RemoveAllergen { id } => app.remove_allergen(id).await,
            MemoryCommands::Issues => app.list_issues().await,
            MemoryCommands::AddIssue {
                issue_type,
                description,
                severity,
                triggers,
            } => app.add_issue(issue_type, description, severity, triggers).await,
            MemoryCommands::UpdateIssue {
                id,
                description,
                severity,
                triggers,
            } => app.update_issue(id, description, severity, triggers).await,
            MemoryCommands::IssueStatus { id, status } => app.set_issue_status(id, &status).await,
            MemoryCommands::RemoveIssue { id } => app.remove_issue(id).await,
            MemoryCommands::ReportReaction {
                ingredient,
                product,
                description,
                severity,
            } => {
                app.report_reaction(ingredient, product, description, &severity)
                    .await
            }
            MemoryCommands::ReportIssue {
                issue_type,
                description,
                severity,
                triggers,
                areas,
            } => {
                app.report_issue(issue_type, description, severity, triggers, areas)
                    .await
            }
            MemoryCommands::Entries { limit, entry_type } => {
                app.list_entries(entry_type.as_deref(), limit).await
            }
            MemoryCommands::Forget { id } => app.forget_entry(id).await,
            MemoryCommands::ClearEntries { entry_type } => {
                app.clear_entries(entry_type.as_deref()).await
            }
        },
    }
}
