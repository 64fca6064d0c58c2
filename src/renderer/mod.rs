//! Rendering seam
//!
//! The host owns the window and the GPU. This module decides what to draw
//! each frame and in which order, and packs particles for instanced drawing.

pub mod draw;
pub mod vertex;

pub use draw::{Renderer, draw_frame};
pub use vertex::{ParticleInstance, particle_instances};
