pub mod config;
pub mod login;
pub mod push;
pub mod serve;
