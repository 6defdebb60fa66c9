use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::{aws::CredentialsStore, error, settings::Settings};

#[derive(Debug, Clone, Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, profile: &str, settings: &Settings) -> Result<()> {
        self.logout(profile, settings).await?;
        println!("AWS session credentials removed from {profile} profile.");
        Ok(())
    }

    /// Remove the session credentials from the temp profile section
    pub async fn logout(&self, profile: &str, settings: &Settings) -> error::Result<()> {
        info!("Starting logout for profile: {}", profile);

        let mut store = CredentialsStore::load(&settings.credentials_path)?;
        store.clear_session_credentials(profile)?;
        store.save().await
    }
}
