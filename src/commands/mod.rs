pub mod login;
pub mod logout;

pub use login::LoginCommand;
pub use logout::LogoutCommand;
