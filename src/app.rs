use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    window::{Fullscreen, WindowAttributes, WindowLevel},
};

use self::viewport::{renderer::Renderer, Viewport};
use crate::{settings::Settings, wgpu_context::WgpuContext};
pub mod viewport;

/// Frame delay while the effect is switched off.
const IDLE_FRAME_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct App {
    pub ctx: WgpuContext,
    pub settings: Arc<Mutex<Settings>>,
    pub shutdown: Arc<AtomicBool>,

    pub viewport: Option<Viewport>,
}

impl ApplicationHandler for App {
    fn resumed(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
    ) {
        let window: Arc<_> = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("snow overlay")
                    .with_transparent(true)
                    .with_decorations(false)
                    .with_window_level(WindowLevel::AlwaysOnTop)
                    .with_fullscreen(Some(Fullscreen::Borderless(None))),
            )
            .expect("failed to create window")
            .into();

        // clicks must reach whatever is underneath the overlay
        if let Err(err) = window.set_cursor_hittest(false) {
            error!("failed to disable cursor hit test: {err}");
        }

        self.viewport = Some(
            Viewport::new(window.clone(), &self.ctx, |ctx, surface| {
                Renderer::new(ctx, surface, self.settings.clone())
            })
            .expect("failed to create viewport"),
        );

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("WindowEvent::CloseRequested");
                self.viewport = None;
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(viewport) = self.viewport.as_mut() {
                    viewport.resize(&self.ctx.device, new_size);
                    viewport.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if self.shutdown.load(Ordering::Relaxed) {
                    info!("menu ended, exiting");
                    self.viewport = None;
                    event_loop.exit();
                    return;
                }

                if let Some(viewport) = self.viewport.as_mut() {
                    let width = viewport.config.width as f32;
                    let height = viewport.config.height as f32;
                    let active =
                        viewport.renderer.update(width, height);

                    if let Err(err) = viewport.render(&self.ctx) {
                        error!("failed to render frame: {err:#}");
                    }

                    if !active {
                        thread::sleep(IDLE_FRAME_DELAY);
                    }
                    viewport.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
