use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use super::Credentials;
use crate::{
    config::ProfileChain,
    error::{Error, Result},
};

/// Parameters of one `sts get-session-token` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSessionTokenRequest {
    pub profile: String,
    pub serial_number: String,
    pub token_code: String,
    /// Appended to the command line verbatim, joined with single spaces
    pub pass_through: Vec<String>,
}

impl GetSessionTokenRequest {
    pub fn new(chain: &ProfileChain, token_code: &str, pass_through: &[String]) -> Self {
        Self {
            profile: chain.perm_profile.clone(),
            serial_number: chain.mfa_serial.clone(),
            token_code: token_code.to_string(),
            pass_through: pass_through.to_vec(),
        }
    }

    /// Arguments following the program name. Pass-through tokens are not
    /// escaped, the shell sees them exactly as the user typed them.
    pub fn command_args(&self) -> String {
        let mut args = format!(
            "sts get-session-token --profile {} --serial-number {} --token-code {}",
            self.profile, self.serial_number, self.token_code
        );

        if !self.pass_through.is_empty() {
            args.push(' ');
            args.push_str(&self.pass_through.join(" "));
        }

        args
    }
}

/// Something that exchanges an MFA token code for session credentials and
/// returns the raw text it produced.
#[allow(async_fn_in_trait)]
pub trait SessionTokenIssuer {
    async fn get_session_token(&self, request: &GetSessionTokenRequest) -> Result<String>;
}

/// Issues session tokens by running the AWS CLI through the platform shell
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: String,
}

impl AwsCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn command_line(&self, request: &GetSessionTokenRequest) -> String {
        format!("{} {}", self.program, request.command_args())
    }
}

impl SessionTokenIssuer for AwsCli {
    async fn get_session_token(&self, request: &GetSessionTokenRequest) -> Result<String> {
        info!("Calling AWS STS GetSessionToken");
        debug!("Profile: {}", request.profile);
        debug!("Serial number: {}", request.serial_number);

        let output = shell(&self.command_line(request))
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .output()
            .await?;

        // Success is decided by the response body, not the exit status
        debug!("aws exited with {}", output.status);

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(unix)]
fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    cmd
}

#[cfg(windows)]
fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command_line);
    cmd
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetSessionTokenResponse {
    credentials: ResponseCredentials,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    #[serde(default)]
    expiration: Option<String>,
}

/// Decode the issuer's stdout.
///
/// Text that is not JSON at all is handed back unchanged in
/// [`Error::IssuerOutput`], since it is normally the CLI's own error message.
/// JSON without the credential fields is an [`Error::UnexpectedResponse`].
pub fn parse_response(output: &str) -> Result<Credentials> {
    let value: serde_json::Value =
        serde_json::from_str(output).map_err(|_| Error::IssuerOutput {
            output: output.to_string(),
        })?;

    let response: GetSessionTokenResponse =
        serde_json::from_value(value).map_err(|source| Error::UnexpectedResponse { source })?;

    let ResponseCredentials {
        access_key_id,
        secret_access_key,
        session_token,
        expiration,
    } = response.credentials;

    Ok(Credentials {
        access_key_id,
        secret_access_key,
        session_token,
        expiration,
    })
}
