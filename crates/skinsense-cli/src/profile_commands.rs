use clap::Subcommand;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the derived skin profile and care routine
    Show,

    /// Submit assessment answers and derive a skin profile
    Assess {
        /// Answer as id=text, repeatable (e.g. -a '1=Tight and flaky')
        #[arg(short = 'a', long = "answer", required = true)]
        answers: Vec<String>,

        /// Free-text concerns to include with the assessment
        #[arg(long)]
        concerns: Option<String>,
    },

    /// Update account details
    Update {
        /// New username
        #[arg(long)]
        username: Option<String>,

        /// New full name
        #[arg(long)]
        full_name: Option<String>,
    },

    /// Change the account password
    ChangePassword,
}
