use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the login/logout flow.
///
/// Every variant is reported to the user as-is and ends the run with a
/// non-zero exit status. None of them leaves a partially written store behind
/// except `WriteStore`, which happens during the final rewrite.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Profile not specified and not provided in environment variable.")]
    ProfileNotSpecified,

    #[error("Could not determine the home directory holding the AWS configuration")]
    HomeDirUnavailable,

    #[error("The temp profile [{profile}] is not present in the config file")]
    TempProfileNotInConfig { profile: String },

    #[error("The temp profile [{profile}] does not contain a source_profile setting")]
    MissingSourceProfile { profile: String },

    #[error(
        "The perm profile [{profile}] named by the source_profile setting is not present in the config file"
    )]
    PermProfileNotInConfig { profile: String },

    #[error("The perm profile [{profile}] does not contain the mfa_serial setting")]
    MissingMfaSerial { profile: String },

    #[error("The perm profile [{profile}] does not contain the user_arn setting")]
    MissingUserArn { profile: String },

    #[error("The credentials file does not contain the perm profile [{profile}] section")]
    PermProfileNotInCredentials { profile: String },

    #[error("The credentials file does not have the temp profile [{profile}]")]
    TempProfileNotInCredentials { profile: String },

    /// The issuer printed something that is not JSON, usually its own error message.
    #[error("Error from aws sts command: {output}")]
    IssuerOutput { output: String },

    /// The issuer printed JSON that lacks the expected credential fields.
    #[error("Unexpected response from aws sts command: {source}")]
    UnexpectedResponse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    ReadStore {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteStore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
