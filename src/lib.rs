pub mod animation;
pub mod args;
pub mod config;
pub mod constants;
pub mod editor;
pub mod effects;
pub mod models;
pub mod render;
pub mod services;
pub mod utilities;
pub mod views;
