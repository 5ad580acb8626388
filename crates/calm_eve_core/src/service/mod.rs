//! Journal use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and key-value calls into user-level operations.
//! - Keep pure rules (streaks, merges, palettes) callable without storage.

pub mod backup_service;
pub mod entry_store;
pub mod install_service;
pub mod mood;
pub mod theme_service;
