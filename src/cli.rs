use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::{
    commands::{LoginCommand, LogoutCommand},
    settings::Settings,
};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "awsmfa",
    version,
    about = "Obtains a temporary AWS session key using the provided MFA token",
    long_about = None
)]
pub struct Cli {
    #[arg(
        short = 'p',
        long,
        global = true,
        help = "Name of the temporary profile (defaults to AWS_PROFILE, then AWS_DEFAULT_PROFILE)"
    )]
    pub profile: Option<String>,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Request session credentials and store them in the temporary profile")]
    Login(LoginCommand),
    #[command(about = "Remove session credentials from the temporary profile")]
    Logout(LogoutCommand),
}

impl Cli {
    pub async fn execute(self, settings: &Settings) -> Result<()> {
        let profile = settings.resolve_profile(self.profile.as_deref())?;

        match self.command {
            Commands::Login(cmd) => cmd.execute(&profile, settings).await,
            Commands::Logout(cmd) => cmd.execute(&profile, settings).await,
        }
    }
}
