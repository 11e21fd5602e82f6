use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::core::SurfaceCallbacks;
use crate::device::SurfaceLost;

/// Returns true when `size` should reach `on_surface_changed`.
///
/// Empty sizes (minimized windows) and the size already reported are dropped.
fn should_forward(reported: Option<PhysicalSize<u32>>, size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0 && reported != Some(size)
}

/// Surface lifecycle bookkeeping, independent of any window.
///
/// Decides which platform events reach the callbacks and which callback
/// errors end the session.
pub(crate) struct SurfaceLifecycle<H> {
    host: H,
    live: bool,
    /// Last size forwarded to `on_surface_changed` for the live surface.
    reported: Option<PhysicalSize<u32>>,
}

impl<H> SurfaceLifecycle<H>
where
    H: SurfaceCallbacks,
{
    pub(crate) fn new(host: H) -> Self {
        Self {
            host,
            live: false,
            reported: None,
        }
    }

    pub(crate) fn host(&self) -> &H {
        &self.host
    }

    pub(crate) fn into_host(self) -> H {
        self.host
    }

    /// A new surface exists at `size`: fires `created`, then `changed`.
    ///
    /// Errors are session-fatal.
    pub(crate) fn created(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        self.live = true;
        self.reported = None;

        self.host.on_surface_created()?;
        self.changed(size)
    }

    /// Forwards `size` unless it is empty, unchanged, or there is no surface.
    ///
    /// Errors are session-fatal.
    pub(crate) fn changed(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        if !self.live || !should_forward(self.reported, size) {
            return Ok(());
        }
        self.reported = Some(size);

        self.host.on_surface_changed(size.width, size.height)
    }

    /// The surface is gone. The next surface starts from a clean slate.
    pub(crate) fn destroyed(&mut self) {
        self.live = false;
        self.reported = None;
    }

    /// Fires `draw` on a live surface.
    ///
    /// A failed frame is logged and dropped. Only a [`SurfaceLost`] cause is
    /// returned, which ends the session.
    pub(crate) fn draw(&mut self) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        match self.host.on_draw_frame() {
            Ok(()) => Ok(()),
            Err(e) if SurfaceLost::is_cause_of(&e) => Err(e),
            Err(e) => {
                log::error!("frame failed: {e:#}");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;
    use crate::core::{RenderMode, SurfaceConfig};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Created,
        Changed(u32, u32),
        Draw,
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        fail_created: bool,
        fail_draw: Option<fn() -> anyhow::Error>,
    }

    impl SurfaceCallbacks for Recorder {
        fn surface_config(&self) -> SurfaceConfig {
            SurfaceConfig::default()
        }

        fn render_mode(&self) -> RenderMode {
            RenderMode::WhenDirty
        }

        fn on_surface_created(&mut self) -> Result<()> {
            self.events.push(Event::Created);
            anyhow::ensure!(!self.fail_created, "init failed");
            Ok(())
        }

        fn on_surface_changed(&mut self, width: u32, height: u32) -> Result<()> {
            self.events.push(Event::Changed(width, height));
            Ok(())
        }

        fn on_draw_frame(&mut self) -> Result<()> {
            self.events.push(Event::Draw);
            match self.fail_draw {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }
    }

    fn size(w: u32, h: u32) -> PhysicalSize<u32> {
        PhysicalSize::new(w, h)
    }

    fn events(l: &SurfaceLifecycle<Recorder>) -> &[Event] {
        &l.host().events
    }

    #[test]
    fn forwarding_rules() {
        assert!(should_forward(None, size(800, 600)));
        assert!(!should_forward(None, size(0, 600)));
        assert!(!should_forward(None, size(800, 0)));
        assert!(!should_forward(Some(size(800, 600)), size(800, 600)));
        assert!(should_forward(Some(size(800, 600)), size(600, 800)));
    }

    #[test]
    fn created_fires_before_changed() {
        let mut l = SurfaceLifecycle::new(Recorder::default());
        l.created(size(800, 600)).unwrap();
        assert_eq!(
            events(&l),
            &[Event::Created, Event::Changed(800, 600)]
        );
    }

    #[test]
    fn zero_and_repeated_sizes_are_dropped() {
        let mut l = SurfaceLifecycle::new(Recorder::default());
        l.created(size(800, 600)).unwrap();

        l.changed(size(800, 600)).unwrap();
        l.changed(size(0, 0)).unwrap();
        l.changed(size(1024, 768)).unwrap();
        l.changed(size(1024, 768)).unwrap();

        assert_eq!(
            events(&l),
            &[
                Event::Created,
                Event::Changed(800, 600),
                Event::Changed(1024, 768)
            ]
        );
    }

    #[test]
    fn zero_initial_size_defers_changed() {
        let mut l = SurfaceLifecycle::new(Recorder::default());
        l.created(size(0, 0)).unwrap();
        l.changed(size(640, 480)).unwrap();
        assert_eq!(
            events(&l),
            &[Event::Created, Event::Changed(640, 480)]
        );
    }

    #[test]
    fn recreate_after_destroy_reports_size_again() {
        let mut l = SurfaceLifecycle::new(Recorder::default());
        l.created(size(800, 600)).unwrap();
        l.destroyed();

        // Nothing reaches the host while there is no surface.
        l.changed(size(1024, 768)).unwrap();
        l.draw().unwrap();

        l.created(size(800, 600)).unwrap();
        assert_eq!(
            events(&l),
            &[
                Event::Created,
                Event::Changed(800, 600),
                Event::Created,
                Event::Changed(800, 600)
            ]
        );
    }

    #[test]
    fn created_failure_is_returned_and_skips_changed() {
        let mut l = SurfaceLifecycle::new(Recorder {
            fail_created: true,
            ..Recorder::default()
        });
        let err = l.created(size(800, 600)).unwrap_err();
        assert!(err.to_string().contains("init failed"));
        assert_eq!(events(&l), &[Event::Created]);
    }

    #[test]
    fn failed_frame_is_dropped() {
        let mut l = SurfaceLifecycle::new(Recorder {
            fail_draw: Some(|| anyhow::anyhow!("pipeline missing")),
            ..Recorder::default()
        });
        l.created(size(800, 600)).unwrap();

        l.draw().unwrap();
        l.draw().unwrap();
        assert_eq!(events(&l).iter().filter(|e| **e == Event::Draw).count(), 2);
    }

    #[test]
    fn lost_surface_ends_the_session() {
        let mut l = SurfaceLifecycle::new(Recorder {
            fail_draw: Some(|| {
                Err::<(), _>(SurfaceLost::new("out of memory"))
                    .context("rendering core step failed")
                    .unwrap_err()
            }),
            ..Recorder::default()
        });
        l.created(size(800, 600)).unwrap();

        let err = l.draw().unwrap_err();
        assert!(SurfaceLost::is_cause_of(&err));
    }
}
