//! Command-line front end for the todo list.
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
