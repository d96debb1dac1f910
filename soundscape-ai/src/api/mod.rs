//! HTTP API handlers for soundscape-ai
//!
//! JSON in, JSON out. Every response carries `success`; failures add a
//! `message` (see [`crate::error::ApiError`]).

pub mod chat;
pub mod description;
pub mod health;
pub mod image;
pub mod soundscape;
pub mod sounds;

pub use chat::chat_routes;
pub use description::description_routes;
pub use health::health_routes;
pub use image::image_routes;
pub use soundscape::soundscape_routes;
pub use sounds::sound_routes;
