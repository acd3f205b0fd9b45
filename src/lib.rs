pub mod config;
pub mod gateway;
pub mod normalize;
pub mod render;
pub mod scoring;
pub mod server;
pub mod session;
pub mod theme;
pub mod types;
