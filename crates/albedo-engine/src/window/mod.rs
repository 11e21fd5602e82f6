//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, publishes the window's GPU context,
//! and drives [`SurfaceCallbacks`](crate::core::SurfaceCallbacks).

mod lifecycle;
mod runtime;

pub use runtime::{RenderRequester, Runtime, RuntimeConfig};
