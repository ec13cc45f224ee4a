use std::sync::Arc;

use anyhow::{anyhow, Context};
use wgpu::{
    CompositeAlphaMode, Device, Surface, SurfaceCapabilities,
    SurfaceConfiguration, TextureViewDescriptor,
};
use winit::{dpi::PhysicalSize, window::Window};

use self::renderer::Renderer;
use crate::wgpu_context::WgpuContext;

pub mod renderer;

#[derive(Debug)]
pub struct Viewport {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
    pub renderer: Renderer,
}

impl Viewport {
    pub fn new(
        window: Arc<Window>,
        ctx: &WgpuContext,
        build_renderer: impl FnOnce(&WgpuContext, &Surface) -> Renderer,
    ) -> anyhow::Result<Self> {
        let surface = ctx
            .instance
            .create_surface(window.clone())
            .context("failed to create render surface")?;
        let size = window.inner_size();
        let mut config = surface
            .get_default_config(
                &ctx.adapter,
                size.width.max(1),
                size.height.max(1),
            )
            .ok_or(anyhow!("failed to get default surface config"))?;
        config.alpha_mode =
            pick_alpha_mode(&surface.get_capabilities(&ctx.adapter));

        surface.configure(&ctx.device, &config);

        let renderer = build_renderer(ctx, &surface);

        Ok(Self {
            window,
            surface,
            config,
            renderer,
        })
    }

    pub fn resize(&mut self, device: &Device, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);

        self.surface.configure(device, &self.config);
    }

    pub fn render(&self, ctx: &WgpuContext) -> anyhow::Result<()> {
        let frame = self
            .surface
            .get_current_texture()
            .context("failed to get next swapchain texture")?;
        let view =
            frame.texture.create_view(&TextureViewDescriptor::default());

        self.renderer.render(
            ctx,
            &view,
            self.config.width as f32,
            self.config.height as f32,
        );
        frame.present();

        Ok(())
    }
}

/// The overlay only works when the compositor blends the surface with what
/// is behind it; opaque is the last resort.
fn pick_alpha_mode(capabilities: &SurfaceCapabilities) -> CompositeAlphaMode {
    [
        CompositeAlphaMode::PreMultiplied,
        CompositeAlphaMode::PostMultiplied,
        CompositeAlphaMode::Inherit,
    ]
    .into_iter()
    .find(|mode| capabilities.alpha_modes.contains(mode))
    .unwrap_or(CompositeAlphaMode::Auto)
}
