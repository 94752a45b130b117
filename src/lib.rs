//! Space Shooter: dodge and shoot falling meteors until the score runs out.
//!
//! The library holds the whole game; `main.rs` only wires a terminal, the
//! input thread and the frame clock around [`world::GameWorld`].

pub mod assets;
pub mod audio;
pub mod collision;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod registry;
pub mod rotation;
pub mod sprite;
pub mod surface;
pub mod timer;
pub mod world;
