use std::{
    mem::size_of,
    sync::{Arc, Mutex},
};

use bytemuck::cast_slice;
use wgpu::{
    include_wgsl, Buffer, BufferAddress, BufferDescriptor, BufferUsages,
    Color, ColorTargetState, ColorWrites, CommandEncoderDescriptor, LoadOp,
    Operations, PipelineLayoutDescriptor, PushConstantRange,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline,
    ShaderStages, StoreOp, Surface, TextureView, VertexAttribute,
    VertexBufferLayout, VertexFormat, VertexStepMode,
};

use self::{flake::Snowflake, snowfield::Snowfield};
use crate::{settings::Settings, wgpu_context::WgpuContext};

pub mod flake;
pub mod snowfield;

/// Instance buffer capacity; spawning stops while the field is full.
pub const MAX_FLAKES: usize = 4096;

#[derive(Debug)]
pub struct Renderer {
    pub settings: Arc<Mutex<Settings>>,
    pub snowfield: Snowfield,

    pub flake_buffer: Buffer,
    pub render_pipeline: RenderPipeline,
}

impl Renderer {
    pub fn new(
        ctx: &WgpuContext,
        surface: &Surface,
        settings: Arc<Mutex<Settings>>,
    ) -> Self {
        let WgpuContext {
            adapter, device, ..
        } = &ctx;

        // data
        let flake_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("flake_buffer"),
            size: (MAX_FLAKES * size_of::<Snowflake>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // pipeline
        let shader =
            device.create_shader_module(include_wgsl!("../../../shader.wgsl"));

        let swapchain_capabilities = surface.get_capabilities(adapter);
        let swapchain_format = swapchain_capabilities.formats[0];

        let instance_buffer_layout = VertexBufferLayout {
            array_stride: size_of::<Snowflake>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            // fall_speed and fade_rate are simulation-only, the shader
            // reads around them
            attributes: &[
                VertexAttribute {
                    format: VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                },
                VertexAttribute {
                    format: VertexFormat::Float32,
                    offset: 16,
                    shader_location: 1,
                },
                VertexAttribute {
                    format: VertexFormat::Float32,
                    offset: 20,
                    shader_location: 2,
                },
            ],
        };

        let render_pipeline_layout =
            device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("render layout"),
                bind_group_layouts: &[],
                push_constant_ranges: &[PushConstantRange {
                    stages: ShaderStages::VERTEX,
                    range: 0..8,
                }],
            });

        let render_pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("render pipeline"),
                layout: Some(&render_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[instance_buffer_layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    compilation_options: Default::default(),
                    targets: &[Some(ColorTargetState {
                        format: swapchain_format,
                        blend: Some(
                            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
                        ),
                        write_mask: ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            });

        Self {
            settings,
            snowfield: Snowfield::new(),

            flake_buffer,
            render_pipeline,
        }
    }

    /// One simulation step from the current settings snapshot. Returns
    /// whether the effect is active so the caller can idle.
    pub fn update(&mut self, width: f32, height: f32) -> bool {
        let snapshot = *self.settings.lock().unwrap();
        self.snowfield.advance(&snapshot, width, height);
        snapshot.active
    }

    /// Clears the frame to fully transparent and draws every flake as a
    /// soft-edged disc with its own opacity.
    pub fn render(
        &self,
        ctx: &WgpuContext,
        view: &TextureView,
        width: f32,
        height: f32,
    ) {
        let flakes = self.snowfield.flakes();
        if !flakes.is_empty() {
            ctx.queue
                .write_buffer(&self.flake_buffer, 0, cast_slice(flakes));
        }

        let mut encoder = ctx
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });

        {
            let mut rpass =
                encoder.begin_render_pass(&RenderPassDescriptor {
                    label: None,
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Clear(Color::TRANSPARENT),
                            store: StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            if !flakes.is_empty() {
                rpass.set_pipeline(&self.render_pipeline);
                rpass.set_push_constants(
                    ShaderStages::VERTEX,
                    0,
                    cast_slice(&[width, height]),
                );
                rpass.set_vertex_buffer(0, self.flake_buffer.slice(..));

                rpass.draw(0..6, 0..flakes.len() as u32);
            }
        }

        ctx.queue.submit(Some(encoder.finish()));
    }
}
