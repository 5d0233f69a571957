pub mod hud;
pub mod overlay;

pub use hud::{FloatingLabel, GameOverPanel, HudFrame};
pub use overlay::{DebugStats, Overlay, OverlayActions};
