pub mod credentials;
pub mod sts;

/// AWS temporary credentials structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    /// Reported by STS for display only, never persisted
    pub expiration: Option<String>,
}

// Re-export commonly used types (functions should be accessed via module path)
pub use credentials::CredentialsStore;
pub use sts::{AwsCli, GetSessionTokenRequest, SessionTokenIssuer};
