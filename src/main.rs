// =============================================================================
// VULKAN BOOTSTRAP - instance, debug messenger, adapter selection
// =============================================================================
//
// Brings Vulkan from nothing to a device-selected state and parks in the
// event loop. No swapchain, no pipelines, no frames yet - the sequence ends
// where device-level work begins.
//
// BOOT FLOW:
// 1. Load config, init logging
// 2. Create window (winit drives the lifecycle)
// 3. Create instance, with validation layers + debug messenger in debug builds
// 4. Select the first adapter with a graphics-capable queue family
// 5. Pump events until close, then tear down in reverse order
//
// =============================================================================

mod backend;
mod config;

use anyhow::{Context, Result};
use backend::VulkanContext;
use config::Config;
use raw_window_handle::HasDisplayHandle;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let config = Config::load();

    init_logging(&config);
    log::info!("Starting Vulkan bootstrap");
    log::info!(
        "Window: {}x{} ({})",
        config.window.width,
        config.window.height,
        config.window.title
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    // A bootstrap failure exits the loop with the error stashed; surface it
    // as the process result so the exit status and stderr message carry it.
    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Initialize logging from the environment, defaulting to debug level when
/// validation is enabled so relayed messages are visible. Release builds
/// default to info, matching the absence of a messenger there.
fn init_logging(config: &Config) {
    use env_logger::Builder;
    use log::LevelFilter;

    let mut builder = Builder::from_default_env();
    builder.filter_level(if config.debug.validation_enabled() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    builder.init();
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Owns everything the bootstrap acquires.
///
/// Field order matters for Drop! The Vulkan context must go before the
/// window it was created against.
struct App {
    config: Config,
    vulkan: Option<VulkanContext>,
    window: Option<Window>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            vulkan: None,
            window: None,
            error: None,
        }
    }

    /// Create the window, then run the bootstrap sequence against it.
    fn init_vulkan(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = WindowAttributes::default()
            .with_title(&self.config.window.title)
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(false);

        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;

        let display_handle = window
            .display_handle()
            .context("Failed to get display handle")?
            .as_raw();

        let vulkan = VulkanContext::new(display_handle, &self.config)?;

        log::info!("Vulkan initialized successfully!");
        log::debug!(
            "Instance {:?}, adapter: {}",
            vulkan.instance.handle(),
            vulkan.adapter.name()
        );

        self.window = Some(window);
        self.vulkan = Some(vulkan);
        Ok(())
    }

    fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    /// Stop the loop and remember why.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        event_loop.exit();
    }
}

// =============================================================================
// EVENT HANDLING
// =============================================================================

impl ApplicationHandler for App {
    /// The first resume creates the window and boots Vulkan; later resumes
    /// are ignored.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Keep pumping instead of parking; no iteration blocks on events.
        event_loop.set_control_flow(ControlFlow::Poll);

        if let Err(e) = self.init_vulkan(event_loop) {
            self.fail(event_loop, e);
        }
    }

    /// Handle window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::{KeyCode, PhysicalKey};

                if event.state.is_pressed() {
                    if let PhysicalKey::Code(KeyCode::Escape) = event.physical_key {
                        log::info!("ESC pressed, exiting...");
                        event_loop.exit();
                    }
                }
            }

            _ => {}
        }
    }
}

// =============================================================================
// CLEANUP
// =============================================================================

impl Drop for App {
    fn drop(&mut self) {
        // Destroy in reverse order of creation!
        self.vulkan.take();
        self.window.take();
        log::info!("Cleanup complete");
    }
}
