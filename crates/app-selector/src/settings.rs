//! Session configuration and the launcher that assembles a session.

use std::time::Duration;

use app_selector_ui::ScreenSize;

use crate::services::Services;
use crate::session::SelectorSession;

/// Tag under which launches from the selector are recorded in the usage
/// statistics.
pub const USAGE_STAT_TAG: &str = "app-selector";

/// Configuration for a selector session.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectorSettings {
    /// Screen size in the natural orientation.
    pub screen: ScreenSize,
    /// Toolkit scale factor applied to every panel dimension.
    pub scale: f64,
    /// Window rotation in degrees when the list is first shown.
    pub rotation: i32,
    /// How long the "no application" notice stays up.
    pub info_timeout: Duration,
    /// Grace period after a launch before the selector recycles itself.
    pub lower_timeout: Duration,
    /// Usage-statistics tag for ranking and launches.
    pub usage_tag: String,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            screen: ScreenSize::default(),
            scale: 1.0,
            rotation: 0,
            info_timeout: Duration::from_secs(2),
            lower_timeout: Duration::from_secs(5),
            usage_tag: USAGE_STAT_TAG.into(),
        }
    }
}

/// Builder for a [`SelectorSession`].
///
/// # Example
///
/// ```rust,ignore
/// let session = SelectorLauncher::new()
///     .with_screen_size(1080, 1920)
///     .with_scale(1.5)
///     .with_rotation(90)
///     .build(services);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SelectorLauncher {
    settings: SelectorSettings,
}

impl SelectorLauncher {
    /// Create a new launcher with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SelectorSettings) -> Self {
        Self { settings }
    }

    /// Set the screen size in the natural orientation.
    pub fn with_screen_size(mut self, width: i32, height: i32) -> Self {
        self.settings.screen = ScreenSize::new(width, height);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.settings.scale = scale;
        self
    }

    /// Set the initial window rotation in degrees.
    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.settings.rotation = degrees;
        self
    }

    pub fn with_info_timeout(mut self, timeout: Duration) -> Self {
        self.settings.info_timeout = timeout;
        self
    }

    pub fn with_lower_timeout(mut self, timeout: Duration) -> Self {
        self.settings.lower_timeout = timeout;
        self
    }

    pub fn with_usage_tag(mut self, tag: impl Into<String>) -> Self {
        self.settings.usage_tag = tag.into();
        self
    }

    pub fn settings(&self) -> &SelectorSettings {
        &self.settings
    }

    /// Assemble an idle session using `services`.
    pub fn build(self, services: Services) -> SelectorSession {
        SelectorSession::new(self.settings, services)
    }
}
