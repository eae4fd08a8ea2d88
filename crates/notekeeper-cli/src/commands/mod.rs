pub mod add;
pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod hello;
pub mod list;
pub mod show;
pub mod tags;
