//! Configuration module
//!
//! The config file is a YAML document with a fixed set of top-level keys;
//! see [`settings::REQUIRED_KEYS`].

pub mod settings;

pub use settings::Settings;
