//! Lorekeep Engine library.
//!
//! Server-side combat, loot and narrative pacing for the lorekeep RPG.
//!
//! ## Structure
//!
//! - `use_cases/` - Combat engine, enemy AI, loot engine, narrative manager
//! - `infrastructure/` - Clock and random ports with their implementations
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use config::EngineConfig;
