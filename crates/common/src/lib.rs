//! Shared configuration for convo services
//!
//! Configuration management following 12-factor principles: everything
//! comes from the environment, loaded once at process start.

pub mod config;

pub use config::Config;
