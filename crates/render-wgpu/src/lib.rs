//! wgpu render backend for the showcase.
//!
//! Draws a grid at floor height and one instanced box per visible scene node,
//! coloured from its material.
//!
//! # Invariants
//! - The renderer reads the scene; it never mutates it.
//! - Hidden nodes produce no instances.

mod gpu;
mod shaders;

pub use gpu::{GpuFrame, WgpuRenderer};
