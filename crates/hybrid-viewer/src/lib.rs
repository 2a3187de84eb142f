// src/lib.rs
//! Hybrid compute + render viewer library.
//!
//! Every frame, a compute kernel paints the presentable surface directly,
//! then a render pass loads that surface (instead of clearing it) and draws
//! a textured, indexed mesh on top. Both passes share one frame state:
//! elapsed time, pointer position and device orientation.

pub mod app;
pub mod data;
pub mod error;
pub mod input;
pub mod renderer;
pub mod scene;
