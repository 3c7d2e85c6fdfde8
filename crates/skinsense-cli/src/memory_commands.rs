use clap::Subcommand;

#[derive(Subcommand)]
pub enum MemoryCommands {
    /// Show the aggregated skin memory overview
    Summary,

    /// List tracked allergens
    Allergens,

    /// Track a new allergen
    AddAllergen {
        /// Ingredient name
        ingredient: String,

        /// Reaction severity
        #[arg(long, value_parser = ["mild", "moderate", "severe"], default_value = "mild")]
        severity: String,

        /// Mark as confirmed by an actual reaction
        #[arg(long)]
        confirmed: bool,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Update a tracked allergen
    UpdateAllergen {
        /// Allergen id
        id: i64,

        /// New reaction severity
        #[arg(long, value_parser = ["mild", "moderate", "severe"])]
        severity: Option<String>,

        /// Set the confirmed flag
        #[arg(long)]
        confirmed: Option<bool>,

        /// Replace the notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Stop tracking an allergen
    RemoveAllergen {
        /// Allergen id
        id: i64,
    },

    /// List tracked skin issues
    Issues,

    /// Track a new skin issue
    AddIssue {
        /// Issue type such as acne or eczema
        issue_type: String,

        /// What it looks like and where
        #[arg(long)]
        description: Option<String>,

        /// 1 (minor) through 10 (severe)
        #[arg(long, default_value_t = 1)]
        severity: i32,

        /// Comma-separated suspected triggers
        #[arg(long)]
        triggers: Option<String>,
    },

    /// Update a tracked skin issue
    UpdateIssue {
        /// Issue id
        id: i64,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New severity, 1 through 10
        #[arg(long)]
        severity: Option<i32>,

        /// Replace the comma-separated trigger list
        #[arg(long)]
        triggers: Option<String>,
    },

    /// Move an issue through its lifecycle
    IssueStatus {
        /// Issue id
        id: i64,

        /// New status
        #[arg(value_parser = ["active", "improving", "resolved"])]
        status: String,
    },

    /// Stop tracking an issue
    RemoveIssue {
        /// Issue id
        id: i64,
    },

    /// Report an allergic reaction to an ingredient
    ReportReaction {
        /// Ingredient that caused the reaction
        ingredient: String,

        /// Product it was in
        #[arg(long)]
        product: Option<String>,

        /// What happened
        #[arg(long)]
        description: String,

        /// Reaction severity
        #[arg(long, value_parser = ["mild", "moderate", "severe"], default_value = "moderate")]
        severity: String,
    },

    /// Report a new skin issue with details
    ReportIssue {
        /// Issue type such as acne or eczema
        issue_type: String,

        /// What it looks like and where
        #[arg(long)]
        description: String,

        /// 1 (minor) through 10 (severe)
        #[arg(long, default_value_t = 5)]
        severity: i32,

        /// Comma-separated suspected triggers
        #[arg(long)]
        triggers: Option<String>,

        /// Comma-separated affected areas
        #[arg(long)]
        areas: Option<String>,
    },

    /// List memory entries, newest first
    Entries {
        /// Maximum number to show
        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Filter by entry type (e.g. reaction_report)
        #[arg(long = "type")]
        entry_type: Option<String>,
    },

    /// Delete one memory entry
    Forget {
        /// Entry id
        id: i64,
    },

    /// Delete memory entries, optionally only one type
    ClearEntries {
        /// Only entries of this type
        #[arg(long = "type")]
        entry_type: Option<String>,
    },
}
