pub mod admin;
pub mod password;
