//! Configuration — `.keyseal.toml` plus `KEYSEAL_*` environment overrides.

pub mod settings;

pub use settings::Settings;
