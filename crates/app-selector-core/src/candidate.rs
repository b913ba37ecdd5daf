//! Candidate applications offered by the selector.

/// Package metadata for one installed application, as supplied by the
/// candidate resolution service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInfo {
    /// Stable application identifier.
    pub appid: String,
    /// Display label.
    pub name: String,
    /// Icon path, if the package declares one.
    pub icon: Option<String>,
    /// Whether the application ships with the system image.
    pub is_preloaded: bool,
}

impl AppInfo {
    pub fn new(appid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            appid: appid.into(),
            name: name.into(),
            icon: None,
            is_preloaded: false,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn preloaded(mut self, is_preloaded: bool) -> Self {
        self.is_preloaded = is_preloaded;
        self
    }
}

/// One selectable application inside a selector session.
///
/// Identity fields are fixed at construction. `score` is raised once by the
/// usage lookup and `position` is assigned once by [`crate::ranking::rank`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    appid: String,
    name: String,
    icon: Option<String>,
    is_preloaded: bool,
    extra: bool,
    score: i32,
    position: Option<usize>,
}

impl Candidate {
    /// Creates an unranked candidate with a zero score.
    ///
    /// `extra` marks candidates of a session that was given an explicit
    /// extra list.
    pub fn new(info: AppInfo, extra: bool) -> Self {
        Self {
            appid: info.appid,
            name: info.name,
            icon: info.icon,
            is_preloaded: info.is_preloaded,
            extra,
            score: 0,
            position: None,
        }
    }

    /// Sets the initial score. Used by tests and fixtures that bypass the
    /// usage lookup.
    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    pub fn appid(&self) -> &str {
        &self.appid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn is_preloaded(&self) -> bool {
        self.is_preloaded
    }

    pub fn is_extra(&self) -> bool {
        self.extra
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Rank assigned after sorting, `None` before ranking.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Replaces the display label after a locale change.
    pub fn relabel(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn add_score(&mut self, delta: i32) {
        self.score = self.score.saturating_add(delta);
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = Some(position);
    }
}
