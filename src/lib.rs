//! docombine
//!
//! Combines uploaded PDF and Office documents into a single PDF, delegating
//! conversion and merging to an external converter service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use startup::{build_router, Application};
