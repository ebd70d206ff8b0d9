//! Authentication HTTP handlers

pub mod login;
pub mod me;
pub mod password;
pub mod register;
pub mod types;
pub mod verify;

pub use login::login;
pub use me::get_me;
pub use password::{change_password, forgot_password, reset_password};
pub use register::register;
pub use verify::{verify_email, verify_email_link};
