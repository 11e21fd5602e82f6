use std::fmt;

/// What the renderer should do after acquiring a surface texture failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured at its current size; draw again next frame.
    Reconfigured,
    /// Timeout or a busy swapchain; this frame is dropped.
    SkipFrame,
    /// The surface cannot recover (out of memory). Ends the session.
    Fatal,
}

/// The surface is gone for good.
///
/// Rendering cores return this from `step` so the driver can tell a lost
/// surface apart from a single bad frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SurfaceLost {
    pub reason: String,
}

impl SurfaceLost {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns true when `err`, or anything it wraps, is a [`SurfaceLost`].
    pub fn is_cause_of(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| cause.is::<SurfaceLost>())
    }
}

impl fmt::Display for SurfaceLost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface lost beyond recovery: {}", self.reason)
    }
}

impl std::error::Error for SurfaceLost {}
