use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use ini::{EscapePolicy, Ini, Properties};
use tokio::fs;
use tracing;

use super::Credentials;
use crate::{
    config,
    constants::{
        ACCESS_KEY_ID_KEY, SECRET_ACCESS_KEY_KEY, SESSION_CREDENTIAL_KEYS, SESSION_TOKEN_KEY,
    },
    error::{Error, Result},
};

/// In-memory copy of the AWS shared credentials file.
///
/// Changes only reach disk through [`CredentialsStore::save`], which rewrites
/// the whole file.
#[derive(Debug, Clone)]
pub struct CredentialsStore {
    path: PathBuf,
    ini: Ini,
}

impl CredentialsStore {
    /// Load the credentials file. A missing file reads as an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            ini: config::load_ini(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_profile(&self, profile: &str) -> bool {
        self.ini.section(Some(profile)).is_some()
    }

    pub fn get(&self, profile: &str, key: &str) -> Option<&str> {
        self.ini
            .section(Some(profile))
            .and_then(|s| config::get_ignore_case(s, key))
    }

    /// Store session credentials under `profile`, creating the section if needed
    pub fn set_session_credentials(&mut self, profile: &str, creds: &Credentials) {
        if let Some(section) = self.ini.section_mut(Some(profile)) {
            for key in SESSION_CREDENTIAL_KEYS {
                remove_ignore_case(section, key);
            }
        }

        self.ini
            .with_section(Some(profile))
            .set(ACCESS_KEY_ID_KEY, &creds.access_key_id)
            .set(SECRET_ACCESS_KEY_KEY, &creds.secret_access_key)
            .set(SESSION_TOKEN_KEY, &creds.session_token);
    }

    /// Remove the session credential keys from `profile`. Keys that are
    /// already absent are skipped; other keys in the section stay.
    pub fn clear_session_credentials(&mut self, profile: &str) -> Result<()> {
        let section = self.ini.section_mut(Some(profile)).ok_or_else(|| {
            Error::TempProfileNotInCredentials {
                profile: profile.to_string(),
            }
        })?;

        for key in SESSION_CREDENTIAL_KEYS {
            if remove_ignore_case(section, key) {
                tracing::debug!("Removed {} from profile: {}", key, profile);
            }
        }

        Ok(())
    }

    /// Rewrite the credentials file in place. The file is restricted to its
    /// owner before any secret is written to it.
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let write_err = |source| Error::WriteStore {
            path: self.path.clone(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(write_err)?;

        // `mode` only applies on creation, an existing file keeps its bits
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }

        self.ini
            .write_to_policy(&mut file, EscapePolicy::Nothing)
            .map_err(write_err)?;

        tracing::info!("Credentials file written: {}", self.path.display());
        Ok(())
    }
}

/// Remove every spelling of `key`, returning whether anything was removed
fn remove_ignore_case(section: &mut Properties, key: &str) -> bool {
    let matches: Vec<String> = section
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(k, _)| k.to_string())
        .collect();

    for k in &matches {
        while section.remove(k).is_some() {}
    }

    !matches.is_empty()
}
