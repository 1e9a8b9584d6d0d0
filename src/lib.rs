// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod events;
pub mod models;
pub mod seed;
pub mod services;

pub use common::error::{AppError, ErrorKind};
pub use config::{AppConfig, AppState};
