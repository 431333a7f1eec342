//! Integration tests for the repo-sync binary and library pipeline

mod cli;
mod common;
mod flow;
mod push;
