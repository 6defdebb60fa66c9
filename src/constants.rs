use std::path::PathBuf;

use dirs;

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS configuration file name
pub const AWS_CONFIG_FILE_NAME: &str = "config";

/// AWS shared credentials file name
pub const AWS_CREDENTIALS_FILE_NAME: &str = "credentials";

/// Environment variable holding the active profile
pub const AWS_PROFILE_ENV: &str = "AWS_PROFILE";

/// Environment variable consulted when `AWS_PROFILE` is unset
pub const AWS_DEFAULT_PROFILE_ENV: &str = "AWS_DEFAULT_PROFILE";

/// Program invoked to issue session tokens
pub const AWS_CLI_PROGRAM: &str = "aws";

/// Prefix the AWS CLI uses for named profile sections in the config file
pub const CONFIG_PROFILE_PREFIX: &str = "profile ";

// Config store keys
pub const SOURCE_PROFILE_KEY: &str = "source_profile";
pub const MFA_SERIAL_KEY: &str = "mfa_serial";
pub const USER_ARN_KEY: &str = "user_arn";

// Credentials store keys
pub const ACCESS_KEY_ID_KEY: &str = "aws_access_key_id";
pub const SECRET_ACCESS_KEY_KEY: &str = "aws_secret_access_key";
pub const SESSION_TOKEN_KEY: &str = "aws_session_token";

/// Keys written by `login` and removed by `logout`
pub const SESSION_CREDENTIAL_KEYS: [&str; 3] =
    [ACCESS_KEY_ID_KEY, SECRET_ACCESS_KEY_KEY, SESSION_TOKEN_KEY];

/// Get the AWS directory under the user's home (`~/.aws`)
pub fn get_aws_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(AWS_CONFIG_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_aws_dir() {
        let Some(home) = dirs::home_dir() else {
            eprintln!("skipping: no home directory in this environment");
            return;
        };
        assert_eq!(get_aws_dir(), Some(home.join(AWS_CONFIG_DIR_NAME)));
    }

    #[test]
    fn test_session_credential_keys() {
        assert_eq!(
            SESSION_CREDENTIAL_KEYS,
            [
                "aws_access_key_id",
                "aws_secret_access_key",
                "aws_session_token"
            ]
        );
    }
}
