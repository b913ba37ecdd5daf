use std::time::Duration;

use app_selector::{
    AppInfo, Candidate, LaunchRequest, Result, Selection, SelectorLauncher, SelectorSession,
    SessionOutcome, TapOutcome, WidgetKind,
};

use crate::fakes::Fakes;

pub struct CandidateMatcher {
    description: String,
    matcher: Box<dyn Fn(&Candidate) -> bool>,
}

impl CandidateMatcher {
    pub fn new(
        description: impl Into<String>,
        matcher: impl Fn(&Candidate) -> bool + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            matcher: Box::new(matcher),
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        (self.matcher)(candidate)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

pub fn has_name(name: impl Into<String>) -> CandidateMatcher {
    let name = name.into();
    CandidateMatcher::new(format!("has_name({:?})", name), move |candidate| {
        candidate.name() == name
    })
}

pub fn has_appid(appid: impl Into<String>) -> CandidateMatcher {
    let appid = appid.into();
    CandidateMatcher::new(format!("has_appid({:?})", appid), move |candidate| {
        candidate.appid() == appid
    })
}

/// A candidate found in the shown list.
pub struct TestCandidate<'a> {
    rule: &'a mut SelectorTestRule,
    position: usize,
}

impl<'a> TestCandidate<'a> {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn perform_click(&mut self) -> TapOutcome {
        let position = self.position;
        self.rule
            .session
            .tap(position)
            .unwrap_or_else(|err| panic!("tap on candidate {} failed: {}", position, err))
    }

    pub fn assert_exists(&self) {
        let cell = self
            .rule
            .session
            .layout()
            .and_then(|layout| layout.partitioner())
            .and_then(|partitioner| partitioner.cell_for(self.position));
        let exists = cell.is_some_and(|cell| self.rule.fakes.applier.borrow().is_live(cell));
        assert!(exists, "Candidate {} has no cell", self.position);
    }

    pub fn assert_selected(&self) {
        let selection = self.rule.session.selection();
        assert_eq!(
            selection.position(),
            Some(self.position),
            "Candidate {} is not selected ({:?})",
            self.position,
            selection
        );
    }
}

/// Drives a [`SelectorSession`] wired to [`Fakes`].
pub struct SelectorTestRule {
    fakes: Fakes,
    session: SelectorSession,
}

impl SelectorTestRule {
    pub fn new() -> Self {
        Self::with_launcher(SelectorLauncher::new())
    }

    pub fn with_launcher(launcher: SelectorLauncher) -> Self {
        let fakes = Fakes::new();
        let session = launcher.build(fakes.services());
        Self { fakes, session }
    }

    pub fn fakes(&self) -> &Fakes {
        &self.fakes
    }

    pub fn session(&self) -> &SelectorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SelectorSession {
        &mut self.session
    }

    /// Installs an application that matches the intent.
    pub fn install(&mut self, appid: &str, name: &str) -> &mut Self {
        self.fakes.resolver.install(AppInfo::new(appid, name));
        self.fakes.resolver.match_intent(appid);
        self
    }

    /// Installs a preloaded application that matches the intent.
    pub fn install_preloaded(&mut self, appid: &str, name: &str) -> &mut Self {
        self.fakes
            .resolver
            .install(AppInfo::new(appid, name).preloaded(true));
        self.fakes.resolver.match_intent(appid);
        self
    }

    /// Installs an application that only an extra list can reach.
    pub fn install_hidden(&mut self, appid: &str, name: &str) -> &mut Self {
        self.fakes.resolver.install(AppInfo::new(appid, name));
        self
    }

    /// Adds a usage-history record for `appid`.
    pub fn usage(&mut self, appid: &str) -> &mut Self {
        self.fakes.usage.record(appid);
        self
    }

    pub fn request(&mut self, request: LaunchRequest) -> Result<SessionOutcome> {
        self.session.handle_request(request)
    }

    /// Moves the clock and fires whatever timers became due.
    pub fn advance(&mut self, by: Duration) {
        let now = self.fakes.clock.advance(by);
        self.session.tick(now);
    }

    pub fn on_candidate(&mut self, matcher: CandidateMatcher) -> TestCandidate<'_> {
        let position = self
            .session
            .candidates()
            .iter()
            .position(|candidate| matcher.matches(candidate))
            .unwrap_or_else(|| panic!("No candidate found matching {}", matcher.description));
        TestCandidate {
            rule: self,
            position,
        }
    }

    /// Application ids in display order.
    pub fn displayed(&self) -> Vec<String> {
        self.session
            .candidates()
            .iter()
            .map(|candidate| candidate.appid().to_owned())
            .collect()
    }

    pub fn selection(&self) -> Selection {
        self.session.selection()
    }

    pub fn launched(&self) -> Vec<String> {
        self.fakes.launcher.launched()
    }

    pub fn cancels(&self) -> Vec<String> {
        self.fakes.results.cancels()
    }

    pub fn live_widgets(&self, kind: WidgetKind) -> usize {
        self.fakes.applier.borrow().live_count(kind)
    }

    pub fn assert_no_widgets(&self) {
        let applier = self.fakes.applier.borrow();
        assert!(applier.is_empty(), "Widgets left behind: {:?}", *applier);
    }
}

impl Default for SelectorTestRule {
    fn default() -> Self {
        Self::new()
    }
}
