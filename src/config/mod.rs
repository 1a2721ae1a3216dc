//! Application Configuration
//!
//! Overlay settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overlay presentation settings
    pub overlay: OverlaySettings,
    /// Render failure capture settings
    pub capture: CaptureSettings,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Corner anchor for the minimized badge and static indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl OverlayAnchor {
    pub fn align(&self) -> egui::Align2 {
        match self {
            OverlayAnchor::TopLeft => egui::Align2::LEFT_TOP,
            OverlayAnchor::TopRight => egui::Align2::RIGHT_TOP,
            OverlayAnchor::BottomLeft => egui::Align2::LEFT_BOTTOM,
            OverlayAnchor::BottomRight => egui::Align2::RIGHT_BOTTOM,
        }
    }

    /// Offset pointing inward from the anchored corner
    pub fn inset(&self, offset: (i32, i32)) -> egui::Vec2 {
        let (x, y) = (offset.0 as f32, offset.1 as f32);
        match self {
            OverlayAnchor::TopLeft => egui::vec2(x, y),
            OverlayAnchor::TopRight => egui::vec2(-x, y),
            OverlayAnchor::BottomLeft => egui::vec2(x, -y),
            OverlayAnchor::BottomRight => egui::vec2(-x, -y),
        }
    }
}

/// Overlay presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Draw overlay views at all
    pub enabled: bool,
    /// Backdrop opacity for fullscreen views (0.0 - 1.0)
    pub opacity: f32,
    /// Frames listed per error before "show more"
    pub max_frames: usize,
    /// Corner for the minimized badge and static indicator
    pub anchor: OverlayAnchor,
    /// Distance from the anchored corner in points
    pub offset: (i32, i32),
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 0.85,
            max_frames: 12,
            anchor: OverlayAnchor::BottomLeft,
            offset: (16, 16),
        }
    }
}

/// Render failure capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Record a backtrace for panics so they surface as located errors
    pub install_panic_hook: bool,
    /// Hide toolchain and dependency frames in the frame list
    pub hide_internal_frames: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            install_panic_hook: true,
            hide_internal_frames: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
