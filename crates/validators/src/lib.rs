// validators crate

mod email;
mod password;
mod username;
mod validator;

pub use email::{email_domain, validate_email};
pub use password::validate_password;
pub use username::validate_username;
pub use validator::Validator;
