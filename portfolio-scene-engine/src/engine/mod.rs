pub mod camera;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod frame;
pub mod input;
pub mod items;
pub mod loading;
pub mod picking;
pub mod scene;
pub mod systems;
