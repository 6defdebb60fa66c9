use std::path::Path;

use ini::{Ini, ParseOption, Properties};
use tracing::debug;

use crate::{
    constants::{CONFIG_PROFILE_PREFIX, MFA_SERIAL_KEY, SOURCE_PROFILE_KEY, USER_ARN_KEY},
    error::{Error, Result},
};

/// The validated chain from a temporary profile to the permanent profile
/// whose long-lived keys and MFA device issue the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChain {
    pub temp_profile: String,
    pub perm_profile: String,
    pub mfa_serial: String,
    pub user_arn: String,
}

impl ProfileChain {
    /// Walk temp profile -> source_profile -> perm profile -> mfa_serial/user_arn,
    /// stopping at the first missing link.
    pub fn resolve(config: &Ini, temp_profile: &str) -> Result<Self> {
        let temp_section =
            find_profile(config, temp_profile).ok_or_else(|| Error::TempProfileNotInConfig {
                profile: temp_profile.to_string(),
            })?;

        let perm_profile = get_ignore_case(temp_section, SOURCE_PROFILE_KEY).ok_or_else(|| {
            Error::MissingSourceProfile {
                profile: temp_profile.to_string(),
            }
        })?;

        let perm_section =
            find_profile(config, perm_profile).ok_or_else(|| Error::PermProfileNotInConfig {
                profile: perm_profile.to_string(),
            })?;

        let mfa_serial =
            get_ignore_case(perm_section, MFA_SERIAL_KEY).ok_or_else(|| Error::MissingMfaSerial {
                profile: perm_profile.to_string(),
            })?;

        let user_arn =
            get_ignore_case(perm_section, USER_ARN_KEY).ok_or_else(|| Error::MissingUserArn {
                profile: perm_profile.to_string(),
            })?;

        debug!("Temp profile: {}", temp_profile);
        debug!("Perm profile: {}", perm_profile);
        debug!("MFA serial: {}", mfa_serial);

        Ok(Self {
            temp_profile: temp_profile.to_string(),
            perm_profile: perm_profile.to_string(),
            mfa_serial: mfa_serial.to_string(),
            user_arn: user_arn.to_string(),
        })
    }
}

/// Load the config store and resolve the chain for `temp_profile`.
/// A missing file reads as an empty store.
pub fn load(path: &Path, temp_profile: &str) -> Result<ProfileChain> {
    let config = load_ini(path)?;
    ProfileChain::resolve(&config, temp_profile)
}

pub(crate) fn load_ini(path: &Path) -> Result<Ini> {
    if !path.exists() {
        debug!("{} does not exist, using an empty store", path.display());
        return Ok(Ini::new());
    }

    // Values are kept verbatim: no quote stripping, no backslash escapes
    let opt = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    };

    Ini::load_from_file_opt(path, opt).map_err(|source| Error::ReadStore {
        path: path.to_path_buf(),
        source,
    })
}

/// Option names match case-insensitively, section names do not.
pub(crate) fn get_ignore_case<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

/// Look up `[name]`, then the AWS CLI form `[profile name]`.
fn find_profile<'a>(config: &'a Ini, name: &str) -> Option<&'a Properties> {
    config
        .section(Some(name))
        .or_else(|| config.section(Some(format!("{CONFIG_PROFILE_PREFIX}{name}"))))
}
