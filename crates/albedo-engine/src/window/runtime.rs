use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{RenderMode, SurfaceCallbacks};
use crate::device::{Gpu, GpuContext, GpuInit};

use super::lifecycle::SurfaceLifecycle;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "albedo".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Events injected into the loop from outside the platform.
#[derive(Debug, Copy, Clone)]
enum UserEvent {
    RequestRender,
}

/// Marks the surface dirty from application code.
///
/// Cloneable and `Send`; the render itself still happens on the event-loop thread.
#[derive(Clone)]
pub struct RenderRequester {
    proxy: EventLoopProxy<UserEvent>,
}

impl RenderRequester {
    /// Requests one frame.
    ///
    /// Returns `false` when the event loop has already exited.
    pub fn request_render(&self) -> bool {
        self.proxy.send_event(UserEvent::RequestRender).is_ok()
    }
}

/// Platform driver: translates window lifecycle into surface callbacks.
pub struct Runtime<H> {
    event_loop: EventLoop<UserEvent>,
    state: DriverState<H>,
}

impl<H> Runtime<H>
where
    H: SurfaceCallbacks + 'static,
{
    /// Creates the event loop. `gpu` is the slot the rendering core reads from.
    pub fn new(config: RuntimeConfig, gpu: GpuContext, host: H) -> Result<Self> {
        let event_loop = EventLoop::<UserEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;

        let gpu_init = GpuInit::from_surface_config(&host.surface_config());

        Ok(Self {
            event_loop,
            state: DriverState::new(config, gpu_init, gpu, host),
        })
    }

    /// Returns a handle for requesting frames from application code.
    pub fn render_requester(&self) -> RenderRequester {
        RenderRequester {
            proxy: self.event_loop.create_proxy(),
        }
    }

    /// Runs until the window closes or a lifecycle callback fails.
    ///
    /// Returns the host so callers can inspect it after shutdown.
    pub fn run(self) -> Result<H> {
        let Self { event_loop, mut state } = self;

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.destroy_surface();

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(state.lifecycle.into_host()),
        }
    }
}

struct DriverState<H> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    gpu: GpuContext,
    lifecycle: SurfaceLifecycle<H>,

    window: Option<Arc<Window>>,
    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<H> DriverState<H>
where
    H: SurfaceCallbacks,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, gpu: GpuContext, host: H) -> Self {
        Self {
            config,
            gpu_init,
            gpu,
            lifecycle: SurfaceLifecycle::new(host),
            window: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Records a session-fatal error and stops the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        self.request_exit(event_loop);
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = match &self.window {
            // Surface lost while the window stayed alive (e.g. app backgrounded).
            Some(window) => Arc::clone(window),
            None => {
                let attrs = Window::default_attributes()
                    .with_title(self.config.title.clone())
                    .with_inner_size(self.config.initial_size);

                Arc::new(
                    event_loop
                        .create_window(attrs)
                        .context("failed to create window")?,
                )
            }
        };
        self.window = Some(Arc::clone(&window));

        let gpu = pollster::block_on(Gpu::new(Arc::clone(&window), self.gpu_init.clone()))
            .context("GPU initialization failed for window")?;
        let size = gpu.size();

        if self.gpu.attach(gpu).is_some() {
            log::warn!("replaced a GPU context that was still attached");
        }

        self.lifecycle.created(size)?;

        window.request_redraw();
        Ok(())
    }

    /// Drops the GPU context; the window, if any, survives.
    fn destroy_surface(&mut self) {
        if self.gpu.detach().is_some() {
            log::debug!("surface destroyed");
        }
        self.lifecycle.destroyed();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        // `with` fails only when the surface is gone; nothing to resize then.
        if self.gpu.with(|gpu| gpu.resize(size)).is_err() {
            return Ok(());
        }
        self.lifecycle.changed(size)?;
        self.request_redraw();
        Ok(())
    }
}

impl<H> ApplicationHandler<UserEvent> for DriverState<H>
where
    H: SurfaceCallbacks,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_current() {
            return;
        }

        if let Err(e) = self.create_surface(event_loop) {
            self.fail(event_loop, e.context("failed to create surface"));
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.destroy_surface();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::RequestRender => self.request_redraw(),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if self.lifecycle.host().render_mode() == RenderMode::Continuously {
            self.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::debug!("close requested");
                self.destroy_surface();
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Err(e) = self.handle_resize(new_size) {
                    self.fail(event_loop, e);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(size) = self.window.as_ref().map(|w| w.inner_size()) else {
                    return;
                };
                if let Err(e) = self.handle_resize(size) {
                    self.fail(event_loop, e);
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.gpu.is_current() {
                    return;
                }
                if let Err(e) = self.lifecycle.draw() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }
}
