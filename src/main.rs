#![warn(missing_debug_implementations)]

use std::sync::{atomic::AtomicBool, Arc, Mutex};

use anyhow::Context;
use settings::Settings;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use wgpu_context::WgpuContext;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;

#[tokio::main]
async fn main() {
    run().await.expect("failed to run");
}

mod app;
mod menu;
mod settings;
mod wgpu_context;

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let settings = Arc::new(Mutex::new(Settings::default()));
    let shutdown = Arc::new(AtomicBool::new(false));

    {
        let settings = settings.clone();
        let shutdown = shutdown.clone();
        std::thread::spawn(move || menu::run(&settings, &shutdown));
    }

    let mut app = App {
        ctx: WgpuContext::new()
            .await
            .context("failed to initialize wgpu context")?,
        settings,
        shutdown,

        viewport: None,
    };

    let event_loop =
        EventLoop::new().context("failed to initialize event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop
        .run_app(&mut app)
        .context("failed to run event loop")?;

    Ok(())
}
