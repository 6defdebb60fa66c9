use std::{env, path::PathBuf};

use crate::{
    constants::{
        self, AWS_CLI_PROGRAM, AWS_CONFIG_FILE_NAME, AWS_CREDENTIALS_FILE_NAME,
        AWS_DEFAULT_PROFILE_ENV, AWS_PROFILE_ENV,
    },
    error::{Error, Result},
};

/// Startup configuration, captured once from the process environment and
/// handed to the commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Profile used when `--profile` is not given
    pub default_profile: Option<String>,
    pub config_path: PathBuf,
    pub credentials_path: PathBuf,
    /// Program run to issue the session token
    pub aws_cli: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let aws_dir = constants::get_aws_dir().ok_or(Error::HomeDirUnavailable)?;

        Ok(Self {
            default_profile: default_profile(
                env::var(AWS_PROFILE_ENV).ok(),
                env::var(AWS_DEFAULT_PROFILE_ENV).ok(),
            ),
            config_path: aws_dir.join(AWS_CONFIG_FILE_NAME),
            credentials_path: aws_dir.join(AWS_CREDENTIALS_FILE_NAME),
            aws_cli: AWS_CLI_PROGRAM.to_string(),
        })
    }

    /// Pick the explicit profile if given, otherwise the environment default.
    /// Empty names count as missing.
    pub fn resolve_profile(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .filter(|p| !p.is_empty())
            .or(self.default_profile.as_deref())
            .map(str::to_string)
            .ok_or(Error::ProfileNotSpecified)
    }
}

/// `AWS_PROFILE` wins over `AWS_DEFAULT_PROFILE`
fn default_profile(aws_profile: Option<String>, aws_default_profile: Option<String>) -> Option<String> {
    aws_profile
        .filter(|p| !p.is_empty())
        .or_else(|| aws_default_profile.filter(|p| !p.is_empty()))
}
