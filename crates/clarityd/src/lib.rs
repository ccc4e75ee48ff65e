//! Clarity daemon library: HTTP surface, generator client, and config.

pub mod commands;
pub mod config;
pub mod errors;
pub mod generator;
pub mod routes;
pub mod server;
