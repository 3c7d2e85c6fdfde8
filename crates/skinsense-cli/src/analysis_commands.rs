use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum AnalysisCommands {
    /// List stored analyses, newest first
    List {
        /// Maximum number to show
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Analyze a product by name, ingredient list, or photo
    Analyze {
        /// Product name
        #[arg(long)]
        name: Option<String>,

        /// Ingredient list as printed on the packaging
        #[arg(long)]
        ingredients: Option<String>,

        /// Path to a product photo (jpeg or png)
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete one stored analysis
    Delete {
        /// Analysis id
        id: i64,
    },

    /// Delete all stored analyses
    Clear,
}
