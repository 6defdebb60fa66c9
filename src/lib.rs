//! Manage temporary AWS session credentials derived from a permanent,
//! MFA-protected profile.
//!
//! `login` follows the temporary profile's `source_profile` in `~/.aws/config`
//! to the permanent profile, exchanges an MFA token code for a session token
//! with `aws sts get-session-token`, and stores the result under the temporary
//! profile in `~/.aws/credentials`. `logout` removes it again.

pub mod aws;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod settings;

pub use error::Error;
