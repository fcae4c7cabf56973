#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod groups;
pub mod placeholders;
pub mod platform;
pub mod server;
pub mod sound;
