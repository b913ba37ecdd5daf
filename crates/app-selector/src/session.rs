//! One run of the selector, from request intake to launch or cancellation.
//!
//! A session moves through [`SessionPhase`]s:
//!
//! ```text
//! Idle ──handle_request──▶ Info ──tick/back──▶ Finished / Recycled
//!                      ├─▶ Choosing ──tap/once/always──▶ Launched ──pause/tick──▶ Recycled
//!                      └─▶ Finished (single candidate)
//! ```
//!
//! The host drives it with user input (`tap`, `just_once`, `always`,
//! `back`), window lifecycle (`pause`, `resume`, `rotate`, `terminate`) and
//! a periodic `tick` for the two timers.

use app_selector_core::{
    app_id_set, apply_usage_scores, rank, AppInfo, Candidate, Result, SelectorError,
};
use app_selector_foundation::{WidgetId, WidgetKind};
use app_selector_ui::{Orientation, RotationOutcome, Selection, SelectorLayout, TapOutcome};
use web_time::Instant;

use crate::default_app::registration_for;
use crate::request::LaunchRequest;
use crate::services::Services;
use crate::settings::SelectorSettings;
use crate::timer::OneShotTimer;

const NO_APPLICATION_LABEL: &str = "No application can perform this action";
const CLEAR_DEFAULTS_LABEL: &str = "Clear defaults in Settings to change the application later";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// The "no application" notice is up.
    Info,
    /// The candidate list is shown.
    Choosing,
    /// A launch was requested; waiting for the window to go away.
    Launched,
    Recycled,
    /// The selector process is done. Terminal.
    Finished,
}

/// Immediate result of [`SelectorSession::handle_request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Nothing can handle the request.
    InfoShown,
    /// Exactly one candidate existed and was launched directly.
    Launched(String),
    /// The list is up with `count` candidates.
    Choosing { count: usize },
}

/// Enabled state of the "Always" and "Just once" buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Actions {
    pub always: bool,
    pub once: bool,
}

/// A selector session.
pub struct SelectorSession {
    settings: SelectorSettings,
    services: Services,
    request: Option<LaunchRequest>,
    candidates: Vec<Candidate>,
    extra: bool,
    orientation: Orientation,
    popup: Option<WidgetId>,
    layout: Option<SelectorLayout>,
    actions: Option<Actions>,
    notice: Option<WidgetId>,
    info: Option<WidgetId>,
    info_timer: OneShotTimer,
    lower_timer: OneShotTimer,
    lower_on_pause: bool,
    phase: SessionPhase,
}

impl SelectorSession {
    pub fn new(settings: SelectorSettings, services: Services) -> Self {
        let orientation = Orientation::from_rotation(settings.rotation);
        Self {
            settings,
            services,
            request: None,
            candidates: Vec::new(),
            extra: false,
            orientation,
            popup: None,
            layout: None,
            actions: None,
            notice: None,
            info: None,
            info_timer: OneShotTimer::new(),
            lower_timer: OneShotTimer::new(),
            lower_on_pause: false,
            phase: SessionPhase::Idle,
        }
    }

    /// Takes a new request, replacing any active one.
    ///
    /// # Errors
    ///
    /// The launch error when the single candidate could not be started, or
    /// a widget construction error. The session is recycled in the latter
    /// case.
    pub fn handle_request(&mut self, request: LaunchRequest) -> Result<SessionOutcome> {
        if self.phase == SessionPhase::Finished {
            return Err(SelectorError::invalid_argument("session already finished"));
        }
        if self.is_active() {
            log::debug!("new request replaces the active session");
            self.recycle();
        }

        let extra = request.is_extra();
        let infos = if request.operation().is_some() {
            self.collect_candidates(&request)
        } else {
            log::warn!("request has no operation");
            Vec::new()
        };
        self.request = Some(request);
        self.extra = extra;

        if infos.is_empty() {
            return self.show_info().map(|()| SessionOutcome::InfoShown);
        }

        let mut candidates: Vec<Candidate> = infos
            .into_iter()
            .map(|info| Candidate::new(info, extra))
            .collect();

        if candidates.len() == 1 {
            self.candidates = rank(candidates);
            let launched = self.launch(0);
            self.finish();
            return launched.map(SessionOutcome::Launched);
        }

        let tags = self.services.usage.stat_tags(&self.settings.usage_tag);
        let credited = apply_usage_scores(&mut candidates, tags);
        self.candidates = rank(candidates);
        log::debug!(
            "{} candidates ranked, {} with usage history",
            self.candidates.len(),
            credited
        );

        if let Err(err) = self.show_list() {
            log::error!("cannot show the selector: {}", err);
            self.recycle();
            return Err(err);
        }
        Ok(SessionOutcome::Choosing {
            count: self.candidates.len(),
        })
    }

    /// Handles a tap on the cell of candidate `position`.
    ///
    /// # Errors
    ///
    /// [`SelectorError::LayoutDestroyed`] without a list,
    /// [`SelectorError::InvalidArgument`] for an unknown position, or the
    /// launch error of a confirming tap.
    pub fn tap(&mut self, position: usize) -> Result<TapOutcome> {
        if self.notice.is_some() {
            log::debug!("tap on {} ignored under the notice", position);
            return Ok(TapOutcome::Ignored);
        }
        let extra = self.extra;
        let layout = self.layout.as_mut().ok_or(SelectorError::LayoutDestroyed)?;
        let outcome = layout.tap(position, extra)?;

        match outcome {
            TapOutcome::Selected { first: true, .. } => {
                if let Some(actions) = self.actions.as_mut() {
                    actions.always = true;
                    actions.once = true;
                }
            }
            TapOutcome::Confirmed { position } => {
                if let Some(actions) = self.actions.as_mut() {
                    *actions = Actions::default();
                }
                self.launch(position)?;
            }
            TapOutcome::Selected { .. } | TapOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// "Just once": launches the selected candidate without remembering it.
    pub fn just_once(&mut self) -> Result<String> {
        if !self.actions.is_some_and(|actions| actions.once) {
            return Err(SelectorError::invalid_argument("\"just once\" is not available"));
        }
        let position = self.confirm_selection()?;
        self.actions = Some(Actions::default());
        self.launch(position)
    }

    /// "Always": opens the clear-defaults notice. The launch happens on
    /// [`confirm_default`](Self::confirm_default).
    pub fn always(&mut self) -> Result<()> {
        if !self.actions.is_some_and(|actions| actions.always) {
            return Err(SelectorError::invalid_argument("\"always\" is not available"));
        }
        if self.notice.is_some() {
            return Ok(());
        }
        let mut applier = self.services.applier.borrow_mut();
        let notice = applier.create(WidgetKind::Popup, None)?;
        applier.set_label(notice, CLEAR_DEFAULTS_LABEL);
        drop(applier);

        if let Some(actions) = self.actions.as_mut() {
            actions.once = false;
        }
        self.notice = Some(notice);
        log::debug!("clear-defaults notice shown");
        Ok(())
    }

    /// OK on the clear-defaults notice: registers the selected candidate as
    /// the default handler, then launches it.
    ///
    /// A failed registration is logged and does not prevent the launch.
    pub fn confirm_default(&mut self) -> Result<String> {
        let notice = self
            .notice
            .take()
            .ok_or_else(|| SelectorError::invalid_argument("no notice to confirm"))?;
        self.services.applier.borrow_mut().destroy(notice);

        let position = self.confirm_selection()?;
        self.actions = Some(Actions::default());
        let appid = self
            .candidates
            .get(position)
            .map(|candidate| candidate.appid().to_owned())
            .ok_or_else(|| SelectorError::not_found(format!("candidate {position}")))?;

        if let Some(request) = self.request.as_mut() {
            match registration_for(request, &appid, self.services.mime.as_ref()) {
                Some(registration) => {
                    if let Err(err) = self.services.defaults.set_default(&registration) {
                        log::error!("cannot make {} the default: {}", appid, err);
                    }
                }
                None => log::warn!("request of {} cannot be registered", appid),
            }
        }
        self.launch(position)
    }

    /// Back key on the list, the notice or the info popup.
    pub fn back(&mut self) {
        log::debug!("back in {:?}", self.phase);
        self.recycle();
    }

    /// Window rotation changed to `degrees`.
    ///
    /// Returns `None` when no list is shown or the orientation is unchanged.
    ///
    /// # Errors
    ///
    /// When neither the new nor the previous layout could be built. The
    /// session is recycled in that case.
    pub fn rotate(&mut self, degrees: i32) -> Result<Option<RotationOutcome>> {
        let orientation = Orientation::from_rotation(degrees);
        if orientation == self.orientation {
            return Ok(None);
        }
        self.orientation = orientation;

        let Some(layout) = self.layout.as_mut() else {
            return Ok(None);
        };
        match layout.rotate(self.candidates.as_slice(), orientation) {
            Ok(outcome) => {
                if outcome == RotationOutcome::Reverted {
                    self.orientation = layout.policy().orientation;
                }
                Ok(Some(outcome))
            }
            Err(err) => {
                log::error!("rotation to {} degrees failed: {}", degrees, err);
                self.recycle();
                Err(err)
            }
        }
    }

    /// The window lost focus.
    pub fn pause(&mut self) {
        if self.lower_on_pause {
            self.lower_on_pause = false;
            self.lower_timer.cancel();
            self.recycle();
        }
    }

    /// The window regained focus.
    pub fn resume(&mut self) {
        if self.lower_on_pause {
            log::debug!("resumed after launch, lower timer cancelled");
            self.lower_on_pause = false;
            self.lower_timer.cancel();
        }
    }

    /// Fires the timers due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.info_timer.poll(now) {
            log::debug!("info popup timed out");
            self.finish();
            return;
        }
        if self.lower_timer.poll(now) && self.lower_on_pause {
            log::debug!("lower timer expired");
            self.recycle();
        }
    }

    /// Display language changed; refreshes every label.
    pub fn language_changed(&mut self) -> Result<()> {
        for candidate in &mut self.candidates {
            match self.services.resolver.lookup(candidate.appid()) {
                Some(AppInfo { name, .. }) => candidate.relabel(name),
                None => log::warn!("no package info for {}, label kept", candidate.appid()),
            }
        }
        match self.layout.as_ref() {
            Some(layout) => layout.relabel(self.candidates.as_slice()),
            None => Ok(()),
        }
    }

    /// Tears the visible session down and lowers the window, sending the
    /// cancel result unless something was launched.
    pub fn recycle(&mut self) {
        if !self.is_active() {
            return;
        }
        self.lower_on_pause = false;
        self.lower_timer.cancel();
        self.info_timer.cancel();
        self.release_widgets();
        self.candidates.clear();

        if let Some(request) = self.request.take() {
            if !request.is_launched() {
                self.send_cancel(&request);
            }
        }
        self.actions = None;
        self.extra = false;
        self.services.window.lower();
        self.phase = SessionPhase::Recycled;
        log::debug!("session recycled");
    }

    /// The selector process is terminating.
    pub fn terminate(&mut self) {
        if self.phase == SessionPhase::Finished {
            return;
        }
        self.lower_on_pause = false;
        self.lower_timer.cancel();
        self.info_timer.cancel();
        self.release_widgets();
        self.candidates.clear();
        if let Some(request) = self.request.take() {
            if !request.is_launched() {
                self.send_cancel(&request);
            }
        }
        self.actions = None;
        self.phase = SessionPhase::Finished;
        log::debug!("session terminated");
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn layout(&self) -> Option<&SelectorLayout> {
        self.layout.as_ref()
    }

    /// Button state, `None` for extra sessions and when no list is shown.
    pub fn actions(&self) -> Option<Actions> {
        self.actions
    }

    pub fn request(&self) -> Option<&LaunchRequest> {
        self.request.as_ref()
    }

    pub fn settings(&self) -> &SelectorSettings {
        &self.settings
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_extra(&self) -> bool {
        self.extra
    }

    pub fn has_notice(&self) -> bool {
        self.notice.is_some()
    }

    pub fn has_info(&self) -> bool {
        self.info.is_some()
    }

    pub fn lower_on_pause(&self) -> bool {
        self.lower_on_pause
    }

    pub fn selection(&self) -> Selection {
        self.layout
            .as_ref()
            .map_or(Selection::None, SelectorLayout::selection)
    }

    fn is_active(&self) -> bool {
        self.request.is_some()
            || self.layout.is_some()
            || self.popup.is_some()
            || self.info.is_some()
    }

    fn collect_candidates(&self, request: &LaunchRequest) -> Vec<AppInfo> {
        let resolver = &self.services.resolver;
        let mut infos = Vec::new();

        if let Some(appids) = request.extra_list() {
            for appid in appids {
                match resolver.lookup(appid) {
                    Some(info) => infos.push(info),
                    None => log::warn!("extra application {} not found", appid),
                }
            }
        }
        match resolver.resolve(request) {
            Ok(matches) => infos.extend(matches),
            Err(err) => log::error!("cannot resolve the request: {}", err),
        }

        let mut seen = app_id_set(infos.len());
        infos.retain(|info| {
            let fresh = seen.insert(info.appid.clone());
            if !fresh {
                log::debug!("duplicate candidate {} dropped", info.appid);
            }
            fresh
        });
        infos
    }

    fn show_info(&mut self) -> Result<()> {
        let info = {
            let mut applier = self.services.applier.borrow_mut();
            let info = applier.create(WidgetKind::Popup, None)?;
            applier.set_label(info, NO_APPLICATION_LABEL);
            info
        };
        self.info = Some(info);
        self.info_timer
            .arm(self.services.clock.now(), self.settings.info_timeout);
        self.phase = SessionPhase::Info;
        log::debug!("no application for the request, info shown");
        Ok(())
    }

    fn show_list(&mut self) -> Result<()> {
        let popup = self
            .services
            .applier
            .borrow_mut()
            .create(WidgetKind::Popup, None)?;
        self.popup = Some(popup);

        let layout = SelectorLayout::build(
            self.services.applier.clone(),
            Some(popup),
            self.candidates.as_slice(),
            self.orientation,
            self.settings.screen,
            self.settings.scale,
        )?;
        self.layout = Some(layout);
        self.actions = (!self.extra).then(Actions::default);
        self.phase = SessionPhase::Choosing;
        Ok(())
    }

    fn confirm_selection(&mut self) -> Result<usize> {
        let layout = self.layout.as_mut().ok_or(SelectorError::LayoutDestroyed)?;
        layout
            .confirm()
            .ok_or_else(|| SelectorError::invalid_argument("nothing selected"))
    }

    fn launch(&mut self, position: usize) -> Result<String> {
        let appid = self
            .candidates
            .get(position)
            .map(|candidate| candidate.appid().to_owned())
            .ok_or_else(|| SelectorError::not_found(format!("candidate {position}")))?;
        let request = self
            .request
            .as_mut()
            .ok_or_else(|| SelectorError::invalid_argument("no request to forward"))?;

        request.tag_usage(&self.settings.usage_tag, &appid);
        let launched = self.services.launcher.launch(&appid, request);
        match &launched {
            Ok(()) => {
                request.mark_launched(&appid);
                log::debug!("launched {}", appid);
            }
            Err(err) => log::error!("cannot launch {}: {}", appid, err),
        }

        self.lower_on_pause = true;
        self.lower_timer
            .arm(self.services.clock.now(), self.settings.lower_timeout);
        self.phase = SessionPhase::Launched;
        launched.map(|()| appid)
    }

    fn finish(&mut self) {
        self.services.window.exit();
        self.terminate();
    }

    fn release_widgets(&mut self) {
        if let Some(mut layout) = self.layout.take() {
            layout.destroy();
        }
        let mut applier = self.services.applier.borrow_mut();
        for widget in [self.popup.take(), self.notice.take(), self.info.take()]
            .into_iter()
            .flatten()
        {
            applier.destroy(widget);
        }
    }

    fn send_cancel(&self, request: &LaunchRequest) {
        let Some(caller_pid) = request.caller_pid() else {
            log::error!("caller pid is missing, cancel not sent");
            return;
        };
        match self.services.results.send_cancel(caller_pid) {
            Ok(()) => log::debug!("cancel sent to {}", caller_pid),
            Err(err) => log::error!("cannot send cancel to {}: {}", caller_pid, err),
        }
    }
}

impl Drop for SelectorSession {
    fn drop(&mut self) {
        self.release_widgets();
    }
}

impl std::fmt::Debug for SelectorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorSession")
            .field("phase", &self.phase)
            .field("candidates", &self.candidates.len())
            .field("extra", &self.extra)
            .field("orientation", &self.orientation)
            .field("actions", &self.actions)
            .field("lower_on_pause", &self.lower_on_pause)
            .finish_non_exhaustive()
    }
}
