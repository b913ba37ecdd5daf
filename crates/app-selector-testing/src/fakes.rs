//! In-memory implementations of the session's collaborators.
//!
//! Every fake records what it was asked to do so tests can assert on it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use app_selector::{
    AppInfo, CandidateResolver, Clock, DefaultHandlerRegistry, DefaultRegistration,
    GuessMimeResolver, LaunchRequest, Launcher, Result, ResultSink, SelectorError, Services,
    UsageStats, WindowHost,
};
use app_selector_foundation::MemoryApplier;
use web_time::Instant;

/// Installed packages and the subset matching the current intent.
#[derive(Debug, Default)]
pub struct FakeResolver {
    installed: RefCell<Vec<AppInfo>>,
    matches: RefCell<Vec<String>>,
    fail: Cell<bool>,
}

impl FakeResolver {
    pub fn install(&self, info: AppInfo) {
        let mut installed = self.installed.borrow_mut();
        installed.retain(|app| app.appid != info.appid);
        installed.push(info);
    }

    pub fn uninstall(&self, appid: &str) {
        self.installed.borrow_mut().retain(|app| app.appid != appid);
    }

    /// Makes `appid` one of the intent matches.
    pub fn match_intent(&self, appid: &str) {
        self.matches.borrow_mut().push(appid.to_owned());
    }

    /// Changes the label `lookup` reports, as a locale switch would.
    pub fn rename(&self, appid: &str, name: &str) {
        if let Some(app) = self
            .installed
            .borrow_mut()
            .iter_mut()
            .find(|app| app.appid == appid)
        {
            app.name = name.to_owned();
        }
    }

    pub fn fail_resolve(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl CandidateResolver for FakeResolver {
    fn resolve(&self, _request: &LaunchRequest) -> Result<Vec<AppInfo>> {
        if self.fail.get() {
            return Err(SelectorError::service("resolve", "package manager unavailable"));
        }
        Ok(self
            .matches
            .borrow()
            .iter()
            .filter_map(|appid| self.lookup(appid))
            .collect())
    }

    fn lookup(&self, appid: &str) -> Option<AppInfo> {
        self.installed
            .borrow()
            .iter()
            .find(|app| app.appid == appid)
            .cloned()
    }
}

#[derive(Debug, Default)]
pub struct FakeUsageStats {
    tags: RefCell<Vec<String>>,
    queries: RefCell<Vec<String>>,
}

impl FakeUsageStats {
    /// Appends `appid` to the usage history; earlier records weigh more.
    pub fn record(&self, appid: &str) {
        self.tags.borrow_mut().push(appid.to_owned());
    }

    /// Tags the statistics were queried with.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl UsageStats for FakeUsageStats {
    fn stat_tags(&self, tag: &str) -> Vec<String> {
        self.queries.borrow_mut().push(tag.to_owned());
        self.tags.borrow().clone()
    }
}

#[derive(Debug, Default)]
pub struct FakeLauncher {
    launches: RefCell<Vec<(String, LaunchRequest)>>,
    fail: Cell<bool>,
}

impl FakeLauncher {
    pub fn fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Application ids in launch order, failed attempts included.
    pub fn launched(&self) -> Vec<String> {
        self.launches
            .borrow()
            .iter()
            .map(|(appid, _)| appid.clone())
            .collect()
    }

    /// The request as it was forwarded by the last launch.
    pub fn last_request(&self) -> Option<LaunchRequest> {
        self.launches
            .borrow()
            .last()
            .map(|(_, request)| request.clone())
    }
}

impl Launcher for FakeLauncher {
    fn launch(&self, appid: &str, request: &LaunchRequest) -> Result<()> {
        self.launches
            .borrow_mut()
            .push((appid.to_owned(), request.clone()));
        if self.fail.get() {
            return Err(SelectorError::service("launch", format!("{appid} refused")));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeDefaults {
    registrations: RefCell<Vec<DefaultRegistration>>,
    fail: Cell<bool>,
}

impl FakeDefaults {
    pub fn fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn registrations(&self) -> Vec<DefaultRegistration> {
        self.registrations.borrow().clone()
    }
}

impl DefaultHandlerRegistry for FakeDefaults {
    fn set_default(&self, registration: &DefaultRegistration) -> Result<()> {
        if self.fail.get() {
            return Err(SelectorError::service("default handler", "storage is read-only"));
        }
        self.registrations.borrow_mut().push(registration.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeResults {
    cancels: RefCell<Vec<String>>,
}

impl FakeResults {
    /// Caller pids that received a cancel result.
    pub fn cancels(&self) -> Vec<String> {
        self.cancels.borrow().clone()
    }
}

impl ResultSink for FakeResults {
    fn send_cancel(&self, caller_pid: &str) -> Result<()> {
        self.cancels.borrow_mut().push(caller_pid.to_owned());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeWindow {
    lowered: Cell<usize>,
    exited: Cell<usize>,
}

impl FakeWindow {
    pub fn lowered(&self) -> usize {
        self.lowered.get()
    }

    pub fn exited(&self) -> usize {
        self.exited.get()
    }
}

impl WindowHost for FakeWindow {
    fn lower(&self) {
        self.lowered.set(self.lowered.get() + 1);
    }

    fn exit(&self) {
        self.exited.set(self.exited.get() + 1);
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) -> Instant {
        let now = self.now.get() + by;
        self.now.set(now);
        now
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// One set of fakes wired into [`Services`].
#[derive(Clone, Debug)]
pub struct Fakes {
    pub applier: Rc<RefCell<MemoryApplier>>,
    pub resolver: Rc<FakeResolver>,
    pub usage: Rc<FakeUsageStats>,
    pub launcher: Rc<FakeLauncher>,
    pub defaults: Rc<FakeDefaults>,
    pub results: Rc<FakeResults>,
    pub window: Rc<FakeWindow>,
    pub clock: Rc<ManualClock>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            applier: MemoryApplier::shared(),
            resolver: Rc::default(),
            usage: Rc::default(),
            launcher: Rc::default(),
            defaults: Rc::default(),
            results: Rc::default(),
            window: Rc::default(),
            clock: Rc::default(),
        }
    }

    pub fn services(&self) -> Services {
        Services {
            applier: self.applier.clone(),
            resolver: self.resolver.clone(),
            usage: self.usage.clone(),
            launcher: self.launcher.clone(),
            defaults: self.defaults.clone(),
            results: self.results.clone(),
            mime: Rc::new(GuessMimeResolver),
            window: self.window.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl Default for Fakes {
    fn default() -> Self {
        Self::new()
    }
}
