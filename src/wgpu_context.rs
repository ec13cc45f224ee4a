use anyhow::{anyhow, Context};
use tracing::info;
use wgpu::{
    Adapter, Device, Features, Instance, Limits, PowerPreference, Queue,
    RequestAdapterOptions,
};

#[derive(Debug)]
pub struct WgpuContext {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl WgpuContext {
    pub async fn new() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::default();

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                // background effect, no need to spin up a discrete GPU
                power_preference: PowerPreference::LowPower,
                ..Default::default()
            })
            .await
            .ok_or(anyhow!("no adapter available"))?;

        info!("adapter selected: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: Features::PUSH_CONSTANTS,
                    required_limits: Limits {
                        max_push_constant_size: 8,
                        ..Limits::downlevel_defaults()
                    },
                    ..Default::default()
                },
                None,
            )
            .await
            .context("failed to request device")?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}
