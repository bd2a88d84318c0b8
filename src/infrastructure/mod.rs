pub mod basic_auth;
pub mod config;
pub mod logging;
pub mod security;
