pub mod app;
pub mod bounds;
pub mod config;
pub mod crop;
pub mod drag;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod image_utils;
pub mod render;
