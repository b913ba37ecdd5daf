//! Modal application chooser.
//!
//! When an intent matches several installed applications, a
//! [`SelectorSession`] ranks them, shows them on swipeable pages and
//! forwards the request to the one the user picks, optionally registering
//! it as the default handler.
//!
//! ```rust,ignore
//! let mut session = SelectorLauncher::new()
//!     .with_screen_size(720, 1280)
//!     .with_rotation(0)
//!     .build(services);
//! session.handle_request(LaunchRequest::new("http://tizen.org/appcontrol/operation/view"))?;
//! ```

pub mod default_app;
pub mod request;
pub mod services;
pub mod session;
pub mod settings;
pub mod timer;

pub use app_selector_core::{
    AppInfo, Candidate, EventBus, EventKind, PageId, Result, ScrollerEvent, SelectorError,
};
pub use app_selector_foundation::{MemoryApplier, SharedApplier, WidgetId, WidgetKind};
pub use app_selector_ui::{
    CapacityPolicy, Orientation, RotationOutcome, ScreenSize, Selection, SelectorLayout,
    TapOutcome,
};

pub use default_app::DefaultRegistration;
pub use request::LaunchRequest;
pub use services::*;
pub use session::{Actions, SelectorSession, SessionOutcome, SessionPhase};
pub use settings::{SelectorLauncher, SelectorSettings};
pub use timer::OneShotTimer;

pub mod prelude {
    pub use crate::request::LaunchRequest;
    pub use crate::services::Services;
    pub use crate::session::{SelectorSession, SessionOutcome, SessionPhase};
    pub use crate::settings::{SelectorLauncher, SelectorSettings};
    pub use app_selector_core::{AppInfo, Result, SelectorError};
    pub use app_selector_ui::{Orientation, TapOutcome};
}
