//! Interactive command handlers.
//!
//! `App` owns the loaded config and the session state machine. Every
//! command runs through here: sign-in and sign-up drive the session
//! directly, data commands borrow an authorized client from it, and API
//! failures are translated into guidance the user can act on.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::warn;
use uuid::Uuid;

use skinsense_core::models::{
    AllergenUpdate, IssueReport, IssueStatus, NewAccount, NewAllergen, NewSkinIssue,
    ProductAnalysis, ProductImage, ProductSubmission, ProfileUpdate, ReactionReport, Severity,
    SkinAssessment, SkinIssueUpdate, SkinProfile,
};
use skinsense_core::{
    ApiClient, ApiError, AuthSession, Config, CredentialStore, SessionError, SessionState,
    TokenStore,
};

pub struct App {
    config: Config,
    session: AuthSession,
    api_url: String,
}

impl App {
    /// Load config, build the client, and resolve any stored credential
    /// to a definite session state before the command runs.
    pub async fn bootstrap(api_url: Option<String>) -> Result<Self> {
        let config = Config::load().context("Failed to load config")?;
        let api_url = api_url.unwrap_or_else(|| config.api_url());
        let api = ApiClient::new(&api_url).context("Failed to build HTTP client")?;
        let store = TokenStore::new(config.data_dir()?);

        let mut session = AuthSession::new(api, store);
        session.validate().await;

        Ok(Self {
            config,
            session,
            api_url,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(&mut self, email_arg: Option<String>) -> Result<()> {
        if self.session.state().is_authenticated() {
            bail!("Already signed in. Run 'skinsense logout' to switch accounts.");
        }

        println!("\n=== SkinSense Login ===\n");

        let email = match email_arg {
            Some(email) => email,
            None => match self.config.last_email.clone() {
                Some(last) if CredentialStore::has_credentials(&last) => {
                    prompt_with_default("Email", &last)?
                }
                _ => prompt("Email")?,
            },
        };
        if email.is_empty() {
            bail!("Email is required");
        }

        let password = if CredentialStore::has_credentials(&email) {
            if confirm("Use stored password?", true)? {
                CredentialStore::get_password(&email)?
            } else {
                prompt_password()?
            }
        } else {
            prompt_password()?
        };

        println!("\nAuthenticating...");

        let user = match self.session.login(&email, &password).await {
            Ok(user) => user,
            Err(SessionError::Api(ApiError::Unauthorized)) => {
                bail!("Incorrect email or password");
            }
            Err(e) => return Err(self.describe(e)),
        };

        if let Err(e) = CredentialStore::store(&email, &password) {
            warn!(error = %e, "Failed to store credentials");
        }

        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        println!("Signed in as {}.", user.display_name());
        if user.needs_assessment() {
            println!("Run 'skinsense profile assess' to set up your skin profile.");
        }
        Ok(())
    }

    pub async fn register(&mut self) -> Result<()> {
        if self.session.state().is_authenticated() {
            bail!("Already signed in. Run 'skinsense logout' first.");
        }

        println!("\n=== Create a SkinSense account ===\n");

        let email = prompt("Email")?;
        let username = prompt("Username")?;
        let full_name = prompt("Full name (optional)")?;
        if email.is_empty() || username.is_empty() {
            bail!("Email and username are required");
        }

        let password = rpassword::prompt_password("Password: ")?;
        let repeat = rpassword::prompt_password("Repeat password: ")?;
        if password != repeat {
            bail!("Passwords do not match");
        }

        println!("\nCreating account...");

        let account = NewAccount {
            email: email.clone(),
            username,
            full_name: (!full_name.is_empty()).then_some(full_name),
            password: password.clone(),
        };
        let user = match self.session.register(&account).await {
            Ok(user) => user,
            Err(e) => return Err(self.describe(e)),
        };

        if let Err(e) = CredentialStore::store(&email, &password) {
            warn!(error = %e, "Failed to store credentials");
        }

        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        println!("Welcome, {}!", user.display_name());
        println!("Run 'skinsense profile assess' to set up your skin profile.");
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<()> {
        if !self.session.state().is_authenticated() {
            println!("Not signed in.");
            return Ok(());
        }
        self.session.logout().await;
        println!("Signed out.");
        Ok(())
    }

    pub fn whoami(&self) -> Result<()> {
        let state = self.session.state();
        let Some(user) = state.user() else {
            bail!("Not signed in. Run 'skinsense login' first.");
        };

        println!("{} <{}>", user.display_name(), user.email);
        println!("  username:  {}", user.username);
        println!(
            "  skin type: {}",
            user.skin_type.as_deref().unwrap_or("not assessed yet")
        );
        if let Some(ref concerns) = user.skin_concerns {
            println!("  concerns:  {}", concerns);
        }
        println!("  verified:  {}", if user.is_verified { "yes" } else { "no" });
        println!("  member since {}", user.created_at.format("%Y-%m-%d"));
        Ok(())
    }

    pub async fn status(&self) -> Result<()> {
        // Anonymous probe; the health route needs no credential
        let api = ApiClient::new(&self.api_url)?;
        print!("Server {} ... ", self.api_url);
        io::stdout().flush()?;
        match api.health().await {
            Ok(banner) => println!("up ({})", banner),
            Err(e) if e.is_connect() => println!("unreachable"),
            Err(e) => println!("error: {}", e),
        }

        if let SessionState::Authenticated { user, .. } = self.session.state() {
            println!("Signed in as {} <{}>", user.username, user.email);
            if let Ok(dir) = self.config.data_dir() {
                if let Some(saved_at) = TokenStore::new(dir).saved_at() {
                    println!("Credential saved {}", saved_at.format("%Y-%m-%d %H:%M UTC"));
                }
            }
        } else {
            println!("Not signed in");
        }
        Ok(())
    }

    pub async fn delete_account(&mut self) -> Result<()> {
        let state = self.session.state();
        let Some(user) = state.user() else {
            bail!("Not signed in.");
        };
        let email = user.email.clone();

        println!(
            "This permanently deletes the account {} and all of its data.",
            email
        );
        print!("Type DELETE to confirm: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim() != "DELETE" {
            println!("Aborted.");
            return Ok(());
        }

        match self.session.delete_account().await {
            Ok(()) => {
                if CredentialStore::has_credentials(&email) {
                    if let Err(e) = CredentialStore::delete(&email) {
                        warn!(error = %e, "Failed to remove stored credentials");
                    }
                }
                if self.config.last_email.as_deref() == Some(email.as_str()) {
                    self.config.last_email = None;
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save config");
                    }
                }
                println!("Account deleted.");
                Ok(())
            }
            Err(e) => Err(self.describe(e)),
        }
    }

    // =========================================================================
    // Skin profile
    // =========================================================================

    pub async fn show_profile(&mut self) -> Result<()> {
        let api = self.data_client()?;
        let profile = match api.skin_profile().await {
            Ok(profile) => profile,
            Err(ApiError::NotFound(_)) => {
                println!("No skin profile yet. Run 'skinsense profile assess' first.");
                return Ok(());
            }
            Err(e) => return Err(self.data_error(e)),
        };
        print_skin_profile(&profile);
        Ok(())
    }

    pub async fn assess(&mut self, raw_answers: &[String], concerns: Option<String>) -> Result<()> {
        let mut answers = HashMap::new();
        for raw in raw_answers {
            let (id, text) = raw
                .split_once('=')
                .ok_or_else(|| anyhow!("Answer '{}' is not in id=text form", raw))?;
            let id: u32 = id
                .trim()
                .parse()
                .with_context(|| format!("Answer '{}' does not start with a question number", raw))?;
            answers.insert(id, text.trim().to_string());
        }

        let api = self.data_client()?;
        let assessment = SkinAssessment {
            answers,
            additional_concerns: concerns,
        };
        let profile = api
            .submit_assessment(&assessment)
            .await
            .map_err(|e| self.data_error(e))?;

        // First assessment ends onboarding for accounts created this run
        self.session.complete_onboarding();

        println!("Assessment saved.\n");
        print_skin_profile(&profile);
        Ok(())
    }

    pub async fn update_account(
        &mut self,
        username: Option<String>,
        full_name: Option<String>,
    ) -> Result<()> {
        if username.is_none() && full_name.is_none() {
            bail!("Nothing to update - pass --username or --full-name");
        }
        let api = self.data_client()?;
        let update = ProfileUpdate {
            full_name,
            username,
        };
        let user = api
            .update_profile(&update)
            .await
            .map_err(|e| self.data_error(e))?;
        println!("Profile updated for {} <{}>.", user.display_name(), user.email);
        Ok(())
    }

    pub async fn change_password(&mut self) -> Result<()> {
        let state = self.session.state();
        let Some(user) = state.user() else {
            bail!("Not signed in. Run 'skinsense login' first.");
        };
        let email = user.email.clone();

        let current = rpassword::prompt_password("Current password: ")?;
        let new = rpassword::prompt_password("New password: ")?;
        let repeat = rpassword::prompt_password("Repeat new password: ")?;
        if new != repeat {
            bail!("Passwords do not match");
        }

        let api = self.data_client()?;
        match api.change_password(&current, &new).await {
            Ok(()) => {}
            Err(ApiError::Rejected { detail, .. }) => bail!("{}", detail),
            Err(e) => return Err(self.data_error(e)),
        }

        if CredentialStore::has_credentials(&email) {
            if let Err(e) = CredentialStore::store(&email, &new) {
                warn!(error = %e, "Failed to update stored credentials");
            }
        }
        println!("Password changed.");
        Ok(())
    }

    // =========================================================================
    // Product analyses
    // =========================================================================

    pub async fn list_analyses(&mut self, limit: u32) -> Result<()> {
        let api = self.data_client()?;
        let analyses = api.analyses(0, limit).await.map_err(|e| self.data_error(e))?;
        if analyses.is_empty() {
            println!("No analyses yet. Run 'skinsense analyses analyze' to check a product.");
            return Ok(());
        }
        for analysis in &analyses {
            let score = analysis
                .suitability_score
                .map(|s| format!("{}/10", s))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "#{:<5} {}  {:<5} {}",
                analysis.id,
                analysis.created_at.format("%Y-%m-%d"),
                score,
                analysis.product_name.as_deref().unwrap_or("(unnamed product)")
            );
        }
        Ok(())
    }

    pub async fn analyze(
        &mut self,
        name: Option<String>,
        ingredients: Option<String>,
        image: Option<PathBuf>,
    ) -> Result<()> {
        let image = match image {
            Some(path) => {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "product.jpg".to_string());
                let content_type = content_type_for(&file_name).to_string();
                Some(ProductImage {
                    file_name,
                    content_type,
                    bytes,
                })
            }
            None => None,
        };

        let submission = ProductSubmission {
            product_name: name,
            ingredients,
            image,
        };
        if submission.is_empty() {
            bail!("Provide at least one of --name, --ingredients, or --image");
        }

        let api = self.data_client()?;
        println!("Analyzing...");
        let analysis = api
            .analyze_product(&submission)
            .await
            .map_err(|e| self.data_error(e))?;
        print_analysis(&analysis);
        Ok(())
    }

    pub async fn delete_analysis(&mut self, id: i64) -> Result<()> {
        let api = self.data_client()?;
        match api.delete_analysis(id).await {
            Ok(()) => {
                println!("Deleted analysis #{}.", id);
                Ok(())
            }
            Err(ApiError::NotFound(_)) => bail!("No analysis with id {}", id),
            Err(e) => Err(self.data_error(e)),
        }
    }

    pub async fn clear_analyses(&mut self) -> Result<()> {
        if !confirm("Delete ALL stored analyses?", false)? {
            println!("Aborted.");
            return Ok(());
        }
        let api = self.data_client()?;
        api.delete_all_analyses()
            .await
            .map_err(|e| self.data_error(e))?;
        println!("All analyses deleted.");
        Ok(())
    }

    // =========================================================================
    // Advisor chat
    // =========================================================================

    pub async fn list_chats(&mut self, limit: u32) -> Result<()> {
        let api = self.data_client()?;
        let sessions = api
            .chat_sessions(0, limit)
            .await
            .map_err(|e| self.data_error(e))?;
        if sessions.is_empty() {
            println!("No chat sessions yet. Run 'skinsense chat new' to start one.");
            return Ok(());
        }
        for session in &sessions {
            println!(
                "{}  {}  {} ({} messages)",
                session.id,
                session.updated_at.format("%Y-%m-%d %H:%M"),
                session.display_title(),
                session.message_count
            );
            if let Some(ref last) = session.last_message {
                println!("    {}", last);
            }
        }
        Ok(())
    }

    pub async fn show_chat(&mut self, id: Uuid) -> Result<()> {
        let api = self.data_client()?;
        let session = match api.chat_session(id).await {
            Ok(session) => session,
            Err(ApiError::NotFound(_)) => bail!("No chat session {}", id),
            Err(e) => return Err(self.data_error(e)),
        };

        println!("{} ({})\n", session.display_title(), session.id);
        for message in &session.messages {
            let speaker = if message.is_user { "You" } else { "Advisor" };
            println!(
                "[{}] {}: {}",
                message.created_at.format("%H:%M"),
                speaker,
                message.message
            );
        }
        Ok(())
    }

    pub async fn new_chat(&mut self, title: Option<String>) -> Result<()> {
        let api = self.data_client()?;
        let session = api
            .create_chat_session(title.as_deref())
            .await
            .map_err(|e| self.data_error(e))?;
        println!("Started chat {} ({}).", session.display_title(), session.id);
        println!("Send a message with 'skinsense chat send {} \"...\"'.", session.id);
        Ok(())
    }

    pub async fn send_chat(&mut self, id: Uuid, message: &str) -> Result<()> {
        let api = self.data_client()?;
        let reply = match api.send_chat_message(id, message).await {
            Ok(reply) => reply,
            Err(ApiError::NotFound(_)) => bail!("No chat session {}", id),
            Err(e) => return Err(self.data_error(e)),
        };
        println!("Advisor: {}", reply.message);
        Ok(())
    }

    pub async fn delete_chat(&mut self, id: Uuid) -> Result<()> {
        let api = self.data_client()?;
        match api.delete_chat_session(id).await {
            Ok(()) => {
                println!("Deleted chat session {}.", id);
                Ok(())
            }
            Err(ApiError::NotFound(_)) => bail!("No chat session {}", id),
            Err(e) => Err(self.data_error(e)),
        }
    }

    // =========================================================================
    // Skin memory
    // =========================================================================

    pub async fn memory_summary(&mut self) -> Result<()> {
        let api = self.data_client()?;
        let summary = api.memory_summary().await.map_err(|e| self.data_error(e))?;
        println!(
            "Allergens: {} tracked, {} confirmed, {} severe",
            summary.allergens["total"], summary.allergens["confirmed"], summary.allergens["severe"]
        );
        println!(
            "Issues:    {} active, {} improving, {} resolved",
            summary.skin_issues["active"],
            summary.skin_issues["improving"],
            summary.skin_issues["resolved"]
        );
        if !summary.recommendations.is_empty() {
            println!("\nRecommendations:");
            for rec in &summary.recommendations {
                println!("  - {}", rec);
            }
        }
        Ok(())
    }

    pub async fn list_allergens(&mut self) -> Result<()> {
        let api = self.data_client()?;
        let allergens = api.allergens().await.map_err(|e| self.data_error(e))?;
        if allergens.is_empty() {
            println!("No tracked allergens.");
            return Ok(());
        }
        for allergen in &allergens {
            let confirmed = if allergen.confirmed { "confirmed" } else { "suspected" };
            println!(
                "#{:<5} {:<9} {:<9} {}",
                allergen.id, allergen.severity, confirmed, allergen.ingredient_name
            );
            if let Some(ref notes) = allergen.notes {
                println!("    {}", notes);
            }
        }
        Ok(())
    }

    pub async fn add_allergen(
        &mut self,
        ingredient: String,
        severity: &str,
        confirmed: bool,
        notes: Option<String>,
    ) -> Result<()> {
        let allergen = NewAllergen {
            ingredient_name: ingredient,
            severity: parse_severity(severity),
            confirmed,
            notes,
        };
        let api = self.data_client()?;
        let created = api.add_allergen(&allergen).await.map_err(|e| self.data_error(e))?;
        println!(
            "Tracking allergen #{}: {} ({}).",
            created.id, created.ingredient_name, created.severity
        );
        Ok(())
    }

    pub async fn update_allergen(
        &mut self,
        id: i64,
        severity: Option<String>,
        confirmed: Option<bool>,
        notes: Option<String>,
    ) -> Result<()> {
        if severity.is_none() && confirmed.is_none() && notes.is_none() {
            bail!("Nothing to update - pass --severity, --confirmed, or --notes");
        }
        let update = AllergenUpdate {
            ingredient_name: None,
            severity: severity.as_deref().map(parse_severity),
            confirmed,
            notes,
        };
        let api = self.data_client()?;
        let updated = match api.update_allergen(id, &update).await {
            Ok(allergen) => allergen,
            Err(ApiError::NotFound(_)) => bail!("No allergen with id {}", id),
            Err(e) => return Err(self.data_error(e)),
        };
        println!(
            "Updated allergen #{}: {} ({}).",
            updated.id, updated.ingredient_name, updated.severity
        );
        Ok(())
    }

    pub async fn remove_allergen(&mut self, id: i64) -> Result<()> {
        let api = self.data_client()?;
        match api.delete_allergen(id).await {
            Ok(()) => {
                println!("Stopped tracking allergen #{}.", id);
                Ok(())
            }
            Err(ApiError::NotFound(_)) => bail!("No allergen with id {}", id),
            Err(e) => Err(self.data_error(e)),
        }
    }

    pub async fn list_issues(&mut self) -> Result<()> {
        let api = self.data_client()?;
        let issues = api.skin_issues().await.map_err(|e| self.data_error(e))?;
        if issues.is_empty() {
            println!("No tracked skin issues.");
            return Ok(());
        }
        for issue in &issues {
            println!(
                "#{:<5} {:<10} severity {}/10  {}",
                issue.id, issue.status, issue.severity, issue.issue_type
            );
            if let Some(ref description) = issue.description {
                println!("    {}", description);
            }
            if let Some(ref triggers) = issue.triggers {
                println!("    triggers: {}", triggers.join(", "));
            }
        }
        Ok(())
    }

    pub async fn add_issue(
        &mut self,
        issue_type: String,
        description: Option<String>,
        severity: i32,
        triggers: Option<String>,
    ) -> Result<()> {
        check_severity_range(severity)?;
        let issue = NewSkinIssue {
            issue_type,
            description,
            severity,
            status: IssueStatus::Active,
            triggers: triggers.map(split_list),
        };
        let api = self.data_client()?;
        let created = api.add_skin_issue(&issue).await.map_err(|e| self.data_error(e))?;
        println!(
            "Tracking issue #{}: {} (severity {}/10).",
            created.id, created.issue_type, created.severity
        );
        Ok(())
    }

    pub async fn update_issue(
        &mut self,
        id: i64,
        description: Option<String>,
        severity: Option<i32>,
        triggers: Option<String>,
    ) -> Result<()> {
        if description.is_none() && severity.is_none() && triggers.is_none() {
            bail!("Nothing to update - pass --description, --severity, or --triggers");
        }
        if let Some(severity) = severity {
            check_severity_range(severity)?;
        }
        let update = SkinIssueUpdate {
            issue_type: None,
            description,
            severity,
            status: None,
            triggers: triggers.map(split_list),
        };
        let api = self.data_client()?;
        let updated = match api.update_skin_issue(id, &update).await {
            Ok(issue) => issue,
            Err(ApiError::NotFound(_)) => bail!("No skin issue with id {}", id),
            Err(e) => return Err(self.data_error(e)),
        };
        println!(
            "Updated issue #{}: {} (severity {}/10, {}).",
            updated.id, updated.issue_type, updated.severity, updated.status
        );
        Ok(())
    }

    pub async fn set_issue_status(&mut self, id: i64, status: &str) -> Result<()> {
        let api = self.data_client()?;
        let updated = match api.update_issue_status(id, parse_status(status)).await {
            Ok(issue) => issue,
            Err(ApiError::NotFound(_)) => bail!("No skin issue with id {}", id),
            Err(e) => return Err(self.data_error(e)),
        };
        println!("Issue #{} ({}) is now {}.", updated.id, updated.issue_type, updated.status);
        Ok(())
    }

    pub async fn remove_issue(&mut self, id: i64) -> Result<()> {
        let api = self.data_client()?;
        match api.delete_skin_issue(id).await {
            Ok(()) => {
                println!("Stopped tracking issue #{}.", id);
                Ok(())
            }
            Err(ApiError::NotFound(_)) => bail!("No skin issue with id {}", id),
            Err(e) => Err(self.data_error(e)),
        }
    }

    pub async fn report_reaction(
        &mut self,
        ingredient: String,
        product: Option<String>,
        description: String,
        severity: &str,
    ) -> Result<()> {
        let report = ReactionReport {
            ingredient_name: ingredient,
            product_name: product,
            reaction_description: description,
            severity: parse_severity(severity),
        };
        let api = self.data_client()?;
        let allergen = api.report_reaction(&report).await.map_err(|e| self.data_error(e))?;
        let confirmed = if allergen.confirmed { "confirmed" } else { "suspected" };
        println!(
            "Recorded reaction to {} ({}, {}).",
            allergen.ingredient_name, allergen.severity, confirmed
        );
        Ok(())
    }

    pub async fn report_issue(
        &mut self,
        issue_type: String,
        description: String,
        severity: i32,
        triggers: Option<String>,
        areas: Option<String>,
    ) -> Result<()> {
        check_severity_range(severity)?;
        let report = IssueReport {
            issue_type,
            description,
            severity,
            triggers: triggers.map(split_list),
            affected_areas: areas.map(split_list),
        };
        let api = self.data_client()?;
        let issue = api.report_issue(&report).await.map_err(|e| self.data_error(e))?;
        println!(
            "Tracking issue #{}: {} (severity {}/10).",
            issue.id, issue.issue_type, issue.severity
        );
        Ok(())
    }

    pub async fn list_entries(&mut self, entry_type: Option<&str>, limit: u32) -> Result<()> {
        let api = self.data_client()?;
        let entries = api
            .memories(entry_type, limit)
            .await
            .map_err(|e| self.data_error(e))?;
        if entries.is_empty() {
            println!("No memory entries.");
            return Ok(());
        }
        for entry in &entries {
            println!(
                "#{:<5} {}  [{}] {}",
                entry.id,
                entry.created_at.format("%Y-%m-%d"),
                entry.entry_type,
                entry.content
            );
        }
        Ok(())
    }

    pub async fn forget_entry(&mut self, id: i64) -> Result<()> {
        let api = self.data_client()?;
        match api.delete_memory(id).await {
            Ok(()) => {
                println!("Deleted memory entry #{}.", id);
                Ok(())
            }
            Err(ApiError::NotFound(_)) => bail!("No memory entry with id {}", id),
            Err(e) => Err(self.data_error(e)),
        }
    }

    pub async fn clear_entries(&mut self, entry_type: Option<&str>) -> Result<()> {
        let scope = entry_type
            .map(|t| format!("all {} entries", t))
            .unwrap_or_else(|| "ALL memory entries".to_string());
        if !confirm(&format!("Delete {}?", scope), false)? {
            println!("Aborted.");
            return Ok(());
        }
        let api = self.data_client()?;
        let deleted = api
            .delete_all_memories(entry_type)
            .await
            .map_err(|e| self.data_error(e))?;
        println!("Deleted {} entries.", deleted);
        Ok(())
    }

    // =========================================================================
    // Error translation
    // =========================================================================

    /// An authorized client, or guidance when there is no session
    fn data_client(&self) -> Result<ApiClient> {
        self.session
            .api()
            .ok_or_else(|| anyhow!("Not signed in. Run 'skinsense login' first."))
    }

    /// A 401 on a data call means the credential died mid-session; end
    /// the session locally so the next command starts signed out.
    fn data_error(&mut self, e: ApiError) -> anyhow::Error {
        if matches!(e, ApiError::Unauthorized) {
            self.session.invalidate();
            anyhow!("Session expired. Run 'skinsense login' again.")
        } else {
            self.describe_api(e)
        }
    }

    fn describe(&self, e: SessionError) -> anyhow::Error {
        match e {
            SessionError::Api(api) => self.describe_api(api),
            other => anyhow!("{}", other),
        }
    }

    fn describe_api(&self, e: ApiError) -> anyhow::Error {
        if e.is_connect() {
            anyhow!("Cannot reach the server at {}. Is the backend running?", self.api_url)
        } else if e.is_timeout() {
            anyhow!("The server took too long to respond. Try again in a moment.")
        } else {
            anyhow!("{}", e)
        }
    }
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_skin_profile(profile: &SkinProfile) {
    println!("Skin type: {}", profile.skin_type);
    if let Some(ref concerns) = profile.skin_concerns {
        println!("Concerns:  {}", concerns);
    }
    if !profile.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &profile.recommendations {
            println!("  - {}", rec);
        }
    }

    let morning = profile.morning_steps();
    if !morning.is_empty() {
        println!("\nMorning routine:");
        for step in morning {
            println!("  {}. {} - {}", step.step_order, step.title, step.description);
        }
    }
    let evening = profile.evening_steps();
    if !evening.is_empty() {
        println!("\nEvening routine:");
        for step in evening {
            println!("  {}. {} - {}", step.step_order, step.title, step.description);
        }
    }
}

fn print_analysis(analysis: &ProductAnalysis) {
    println!(
        "Analysis #{} ({})",
        analysis.id,
        analysis.created_at.format("%Y-%m-%d %H:%M")
    );
    if let Some(ref name) = analysis.product_name {
        println!("Product: {}", name);
    }
    if let Some(score) = analysis.suitability_score {
        println!("Suitability: {}/10", score);
    }
    if let Some(ref recommendation) = analysis.recommendation {
        println!("Recommendation: {}", recommendation);
    }
    if let Some(ref warnings) = analysis.warnings {
        println!("Warnings: {}", warnings);
    }

    // Model output carries ingredient lists worth surfacing when present
    for (label, key) in [
        ("Beneficial ingredients", "beneficial_ingredients"),
        ("Watch ingredients", "watch_ingredients"),
    ] {
        if let Some(items) = analysis.analysis_result.get(key).and_then(|v| v.as_array()) {
            let names: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            if !names.is_empty() {
                println!("{}: {}", label, names.join(", "));
            }
        }
    }
}

// ============================================================================
// Prompt helpers
// ============================================================================

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(label: &str, default: &str) -> Result<String> {
    print!("{} [{}]: ", label, default);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.to_string())
    }
}

fn confirm(question: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
    print!("{} {}: ", question, hint);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();

    if default_yes {
        Ok(input != "n")
    } else {
        Ok(input == "y")
    }
}

fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}

// ============================================================================
// Input parsing
// ============================================================================

/// Clap has already limited the value, so unknown strings cannot occur
fn parse_severity(value: &str) -> Severity {
    match value {
        "mild" => Severity::Mild,
        "moderate" => Severity::Moderate,
        _ => Severity::Severe,
    }
}

fn parse_status(value: &str) -> IssueStatus {
    match value {
        "active" => IssueStatus::Active,
        "improving" => IssueStatus::Improving,
        _ => IssueStatus::Resolved,
    }
}

fn split_list(raw: String) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_severity_range(severity: i32) -> Result<()> {
    if !(1..=10).contains(&severity) {
        bail!("Severity must be between 1 and 10");
    }
    Ok(())
}

fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
