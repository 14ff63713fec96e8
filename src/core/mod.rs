//! Core translation components

pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod registry;
pub mod resolver;
pub mod validator;
