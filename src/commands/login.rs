use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::{
    aws::{self, AwsCli, CredentialsStore, GetSessionTokenRequest, SessionTokenIssuer},
    config,
    error,
    settings::Settings,
};

#[derive(Debug, Clone, Args)]
pub struct LoginCommand {
    #[arg(short = 't', long = "token-code", help = "Token from the MFA device")]
    pub token_code: String,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Additional arguments passed through to `aws sts get-session-token`, e.g. `-- --duration-seconds 900`"
    )]
    pub pass_through: Vec<String>,
}

impl LoginCommand {
    pub async fn execute(self, profile: &str, settings: &Settings) -> Result<()> {
        let issuer = AwsCli::new(&settings.aws_cli);
        let credentials = self.login(profile, settings, &issuer).await?;

        println!("AWS session credentials saved to {profile} profile.");
        if let Some(expiration) = credentials.expiration {
            println!("Credentials will expire at: {expiration}");
        }

        Ok(())
    }

    /// Validate both stores, request a session token and store it under the
    /// temp profile. Nothing is written unless every step succeeds.
    pub async fn login<I: SessionTokenIssuer>(
        &self,
        profile: &str,
        settings: &Settings,
        issuer: &I,
    ) -> error::Result<aws::Credentials> {
        info!("Starting login for profile: {}", profile);

        let chain = config::load(&settings.config_path, profile)?;

        let mut store = CredentialsStore::load(&settings.credentials_path)?;
        if !store.has_profile(&chain.perm_profile) {
            return Err(error::Error::PermProfileNotInCredentials {
                profile: chain.perm_profile,
            });
        }
        if !store.has_profile(&chain.temp_profile) {
            println!("Creating temp profile section [{}]", chain.temp_profile);
        }

        let request = GetSessionTokenRequest::new(&chain, &self.token_code, &self.pass_through);
        let output = issuer.get_session_token(&request).await?;
        let credentials = aws::sts::parse_response(&output)?;

        store.set_session_credentials(&chain.temp_profile, &credentials);
        store.save().await?;

        info!("Successfully obtained AWS session credentials");
        Ok(credentials)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use std::{cell::RefCell, fs, path::Path};
    use tempfile::TempDir;

    pub(crate) const CONFIG: &str = "\
[temp]
source_profile = perm

[perm]
mfa_serial = arn:aws:iam::123456789012:mfa/alice
user_arn = arn:aws:iam::123456789012:user/alice
";

    pub(crate) const CREDENTIALS: &str = "\
[perm]
aws_access_key_id = AKIAPERMANENT
aws_secret_access_key = permanentsecret
";

    pub(crate) const STS_OUTPUT: &str =
        r#"{"Credentials":{"AccessKeyId":"AKIA1","SecretAccessKey":"s3cr3t","SessionToken":"tok123"}}"#;

    /// Returns canned output and records every request it receives
    pub(crate) struct FakeIssuer {
        output: String,
        pub(crate) requests: RefCell<Vec<GetSessionTokenRequest>>,
    }

    impl FakeIssuer {
        pub(crate) fn new(output: &str) -> Self {
            Self {
                output: output.to_string(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl SessionTokenIssuer for FakeIssuer {
        async fn get_session_token(&self, request: &GetSessionTokenRequest) -> error::Result<String> {
            self.requests.borrow_mut().push(request.clone());
            Ok(self.output.clone())
        }
    }

    pub(crate) fn workspace(config: &str, credentials: Option<&str>) -> (TempDir, Settings) {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config");
        let credentials_path = dir.path().join("credentials");

        fs::write(&config_path, config).unwrap();
        if let Some(content) = credentials {
            fs::write(&credentials_path, content).unwrap();
        }

        let settings = Settings {
            default_profile: None,
            config_path,
            credentials_path,
            aws_cli: "aws".to_string(),
        };
        (dir, settings)
    }

    pub(crate) fn command(pass_through: &[&str]) -> LoginCommand {
        LoginCommand {
            token_code: "123456".to_string(),
            pass_through: pass_through.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn read(path: &Path) -> Vec<u8> {
        fs::read(path).unwrap()
    }

    #[tokio::test]
    async fn test_login_writes_session_credentials() {
        let (_dir, settings) = workspace(CONFIG, Some(CREDENTIALS));
        let issuer = FakeIssuer::new(STS_OUTPUT);

        command(&[]).login("temp", &settings, &issuer).await.unwrap();

        let store = CredentialsStore::load(&settings.credentials_path).unwrap();
        assert_eq!(store.get("temp", "aws_access_key_id"), Some("AKIA1"));
        assert_eq!(store.get("temp", "aws_secret_access_key"), Some("s3cr3t"));
        assert_eq!(store.get("temp", "aws_session_token"), Some("tok123"));
        assert_eq!(store.get("perm", "aws_access_key_id"), Some("AKIAPERMANENT"));
    }

    #[tokio::test]
    async fn test_login_sends_chain_to_issuer() {
        let (_dir, settings) = workspace(CONFIG, Some(CREDENTIALS));
        let issuer = FakeIssuer::new(STS_OUTPUT);

        command(&["--duration-seconds", "900"])
            .login("temp", &settings, &issuer)
            .await
            .unwrap();

        let requests = issuer.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            GetSessionTokenRequest {
                profile: "perm".to_string(),
                serial_number: "arn:aws:iam::123456789012:mfa/alice".to_string(),
                token_code: "123456".to_string(),
                pass_through: vec!["--duration-seconds".to_string(), "900".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_login_overwrites_previous_session() {
        let existing = format!(
            "{CREDENTIALS}\n[temp]\naws_access_key_id = OLD\naws_secret_access_key = OLD\naws_session_token = OLD\n"
        );
        let (_dir, settings) = workspace(CONFIG, Some(&existing));
        let issuer = FakeIssuer::new(STS_OUTPUT);

        command(&[]).login("temp", &settings, &issuer).await.unwrap();

        let store = CredentialsStore::load(&settings.credentials_path).unwrap();
        assert_eq!(store.get("temp", "aws_access_key_id"), Some("AKIA1"));
        assert_eq!(store.get("temp", "aws_session_token"), Some("tok123"));
    }

    #[tokio::test]
    async fn test_login_without_source_profile_writes_nothing() {
        let (_dir, settings) = workspace("[temp]\nregion = us-east-1\n", Some(CREDENTIALS));
        let before = read(&settings.credentials_path);
        let issuer = FakeIssuer::new(STS_OUTPUT);

        let err = command(&[]).login("temp", &settings, &issuer).await.unwrap_err();

        assert!(matches!(err, Error::MissingSourceProfile { .. }));
        assert!(issuer.requests.borrow().is_empty());
        assert_eq!(read(&settings.credentials_path), before);
    }

    #[tokio::test]
    async fn test_login_without_source_profile_creates_no_file() {
        let (_dir, settings) = workspace("[temp]\n", None);
        let issuer = FakeIssuer::new(STS_OUTPUT);

        assert!(command(&[]).login("temp", &settings, &issuer).await.is_err());
        assert!(!settings.credentials_path.exists());
    }

    #[tokio::test]
    async fn test_login_requires_perm_profile_in_credentials() {
        let (_dir, settings) = workspace(CONFIG, Some("[other]\naws_access_key_id = X\n"));
        let before = read(&settings.credentials_path);
        let issuer = FakeIssuer::new(STS_OUTPUT);

        let err = command(&[]).login("temp", &settings, &issuer).await.unwrap_err();

        assert!(matches!(err, Error::PermProfileNotInCredentials { profile } if profile == "perm"));
        assert!(issuer.requests.borrow().is_empty());
        assert_eq!(read(&settings.credentials_path), before);
    }

    #[tokio::test]
    async fn test_login_with_missing_credentials_file() {
        let (_dir, settings) = workspace(CONFIG, None);
        let issuer = FakeIssuer::new(STS_OUTPUT);

        let err = command(&[]).login("temp", &settings, &issuer).await.unwrap_err();

        assert!(matches!(err, Error::PermProfileNotInCredentials { .. }));
        assert!(issuer.requests.borrow().is_empty());
        assert!(!settings.credentials_path.exists());
    }

    #[tokio::test]
    async fn test_login_with_error_text_leaves_file_unchanged() {
        let (_dir, settings) = workspace(CONFIG, Some(CREDENTIALS));
        let before = read(&settings.credentials_path);
        let issuer = FakeIssuer::new("Error: MFA token invalid");

        let err = command(&[]).login("temp", &settings, &issuer).await.unwrap_err();

        assert!(err.to_string().contains("Error: MFA token invalid"));
        assert!(matches!(err, Error::IssuerOutput { .. }));
        assert_eq!(read(&settings.credentials_path), before);
    }

    #[tokio::test]
    async fn test_login_with_wrong_shaped_json_leaves_file_unchanged() {
        let (_dir, settings) = workspace(CONFIG, Some(CREDENTIALS));
        let before = read(&settings.credentials_path);
        let issuer = FakeIssuer::new(r#"{"Credentials":{"AccessKeyId":"AKIA1"}}"#);

        let err = command(&[]).login("temp", &settings, &issuer).await.unwrap_err();

        assert!(matches!(err, Error::UnexpectedResponse { .. }));
        assert_eq!(read(&settings.credentials_path), before);
    }

    #[tokio::test]
    async fn test_login_returns_expiration() {
        let (_dir, settings) = workspace(CONFIG, Some(CREDENTIALS));
        let issuer = FakeIssuer::new(
            r#"{"Credentials":{"AccessKeyId":"A","SecretAccessKey":"S","SessionToken":"T","Expiration":"2026-10-17T08:00:00+00:00"}}"#,
        );

        let creds = command(&[]).login("temp", &settings, &issuer).await.unwrap();
        assert_eq!(creds.expiration.as_deref(), Some("2026-10-17T08:00:00+00:00"));
    }
}
