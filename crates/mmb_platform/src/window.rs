use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Mini Mario Bros".to_string(),
            width: 1200,
            height: 700,
        }
    }
}

/// Open the game window at its declared canvas size.
pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::debug!(
        "Window '{}' scale factor {:.2}",
        config.title,
        window.scale_factor()
    );
    Arc::new(window)
}

/// Inner size of `window` in logical pixels, the unit the game simulates in.
pub fn logical_size(window: &Window) -> (f32, f32) {
    let size: LogicalSize<f32> = window.inner_size().to_logical(window.scale_factor());
    (size.width, size.height)
}
