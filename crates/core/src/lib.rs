//! `clientdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod client;
pub mod entity;
pub mod error;
pub mod id;

pub use client::{Address, Client, ClientDraft, ClientPatch, Contact};
pub use entity::Entity;
pub use error::{AppError, AppResult};
pub use id::ClientId;
