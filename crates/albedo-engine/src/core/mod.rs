//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the platform driver, the
//! surface host and the rendering core. Control flows one way per event:
//! driver → [`SurfaceCallbacks`] → [`RenderingCore`].

mod app;
mod config;

pub use app::{RenderingCore, SurfaceCallbacks};
pub use config::{HostConfig, RenderMode, ResizePolicy, SurfaceConfig};
