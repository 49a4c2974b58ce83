//! tubescope - fetch, sort and export the uploaded videos of a YouTube channel.

pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod youtube;
