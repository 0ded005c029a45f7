//! Project configuration (Foundry.toml)

mod foundry_toml;

pub use foundry_toml::FoundryConfig;
