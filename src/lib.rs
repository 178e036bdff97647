//! This is the library of the labelbot chatops bot.
pub mod bot;
pub mod config;
pub mod github;
pub mod permissions;
pub mod utils;

#[cfg(test)]
mod tests;
