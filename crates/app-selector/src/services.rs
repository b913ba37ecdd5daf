//! Platform collaborators of a selector session.
//!
//! Everything outside the selector itself (package metadata, usage
//! statistics, launching, default-handler storage, result delivery and the
//! window) is reached through these traits.

use std::rc::Rc;

use app_selector_core::{AppInfo, Result};
use app_selector_foundation::SharedApplier;
use web_time::Instant;

use crate::default_app::DefaultRegistration;
use crate::request::LaunchRequest;

/// Finds the applications able to handle a request.
pub trait CandidateResolver {
    /// Applications matching the request's intent.
    fn resolve(&self, request: &LaunchRequest) -> Result<Vec<AppInfo>>;

    /// Package metadata of one installed application.
    fn lookup(&self, appid: &str) -> Option<AppInfo>;
}

/// Recently-used statistics.
pub trait UsageStats {
    /// Application ids recorded under `tag`, most relevant first.
    fn stat_tags(&self, tag: &str) -> Vec<String>;
}

/// Starts the chosen application with the original request.
pub trait Launcher {
    fn launch(&self, appid: &str, request: &LaunchRequest) -> Result<()>;
}

/// Persistent storage of default handlers.
pub trait DefaultHandlerRegistry {
    fn set_default(&self, registration: &DefaultRegistration) -> Result<()>;
}

/// Delivers the selector's result to the calling process.
pub trait ResultSink {
    fn send_cancel(&self, caller_pid: &str) -> Result<()>;
}

/// Determines the MIME type of a local file.
pub trait MimeResolver {
    fn mime_from_file(&self, path: &str) -> Option<String>;
}

/// The selector's own window.
pub trait WindowHost {
    /// Moves the window behind other applications.
    fn lower(&self);

    /// Ends the selector process.
    fn exit(&self);
}

/// Time source for the session's timers.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Guesses MIME types from file extensions.
#[derive(Clone, Copy, Debug, Default)]
pub struct GuessMimeResolver;

impl MimeResolver for GuessMimeResolver {
    fn mime_from_file(&self, path: &str) -> Option<String> {
        mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_owned())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Every collaborator a session needs.
#[derive(Clone)]
pub struct Services {
    pub applier: SharedApplier,
    pub resolver: Rc<dyn CandidateResolver>,
    pub usage: Rc<dyn UsageStats>,
    pub launcher: Rc<dyn Launcher>,
    pub defaults: Rc<dyn DefaultHandlerRegistry>,
    pub results: Rc<dyn ResultSink>,
    pub mime: Rc<dyn MimeResolver>,
    pub window: Rc<dyn WindowHost>,
    pub clock: Rc<dyn Clock>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
