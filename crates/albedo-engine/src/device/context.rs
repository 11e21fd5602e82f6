use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use super::Gpu;

/// Slot holding the GPU context that is current on the render thread.
///
/// The platform driver attaches the window's [`Gpu`] before the surface is
/// reported as created and detaches it when the surface goes away. A rendering
/// core keeps a clone and reaches the device through [`with`](Self::with), the
/// way a GLES renderer relies on the current EGL context.
///
/// Clones share the same slot. The type is `!Send`: it lives on the render thread.
#[derive(Clone, Default)]
pub struct GpuContext {
    slot: Rc<RefCell<Option<Gpu>>>,
}

impl GpuContext {
    /// Creates an empty (detached) context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `gpu` current, returning the previously attached context.
    pub fn attach(&self, gpu: Gpu) -> Option<Gpu> {
        self.slot.borrow_mut().replace(gpu)
    }

    /// Releases the current context.
    pub fn detach(&self) -> Option<Gpu> {
        self.slot.borrow_mut().take()
    }

    pub fn is_current(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Runs `f` with the current GPU.
    ///
    /// Fails when no context is attached. Must not be called re-entrantly from
    /// inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut Gpu) -> R) -> Result<R> {
        let mut slot = self.slot.borrow_mut();
        let gpu = slot
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("no GPU context is current"))?;
        Ok(f(gpu))
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("current", &self.is_current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_context_reports_error() {
        let ctx = GpuContext::new();
        assert!(!ctx.is_current());
        let err = ctx.with(|_| ()).unwrap_err();
        assert!(err.to_string().contains("no GPU context"));
    }

    #[test]
    fn clones_share_the_slot() {
        let a = GpuContext::new();
        let b = a.clone();
        assert!(b.detach().is_none());
        assert!(!a.is_current());
    }
}
