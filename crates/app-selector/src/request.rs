//! The intent the selector was started for.

/// Request forwarded to the chosen application.
///
/// Besides the intent fields it carries the bookkeeping the selector adds
/// on its way through: the usage-statistics tag of the launch and the id of
/// the application that was started.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    operation: Option<String>,
    mime: Option<String>,
    uri: Option<String>,
    caller_pid: Option<String>,
    extra_list: Option<Vec<String>>,
    uri_r_info: Option<String>,
    stat_caller: Option<String>,
    stat_tag: Option<String>,
    start_info: Option<String>,
}

impl LaunchRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    /// A request without an operation. The selector can only report that
    /// nothing handles it.
    pub fn without_operation() -> Self {
        Self::default()
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_caller_pid(mut self, pid: impl Into<String>) -> Self {
        self.caller_pid = Some(pid.into());
        self
    }

    /// Restricts the chooser to an explicit list of application ids, shown
    /// before any intent matches.
    pub fn with_extra_list<I, S>(mut self, appids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_list = Some(appids.into_iter().map(Into::into).collect());
        self
    }

    /// Scheme to register when this request's handler becomes the default.
    pub fn with_uri_r_info(mut self, scheme: impl Into<String>) -> Self {
        self.uri_r_info = Some(scheme.into());
        self
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref().filter(|op| !op.is_empty())
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn caller_pid(&self) -> Option<&str> {
        self.caller_pid.as_deref()
    }

    pub fn extra_list(&self) -> Option<&[String]> {
        self.extra_list.as_deref()
    }

    pub fn is_extra(&self) -> bool {
        self.extra_list.is_some()
    }

    pub fn uri_r_info(&self) -> Option<&str> {
        self.uri_r_info.as_deref()
    }

    pub(crate) fn set_mime(&mut self, mime: Option<String>) {
        self.mime = mime;
    }

    pub(crate) fn drop_uri(&mut self) {
        self.uri = None;
    }

    pub(crate) fn take_uri_r_info(&mut self) -> Option<String> {
        self.uri_r_info.take()
    }

    /// Usage-statistics caller and tag recorded with the launch.
    pub fn usage_stat(&self) -> Option<(&str, &str)> {
        Some((self.stat_caller.as_deref()?, self.stat_tag.as_deref()?))
    }

    pub(crate) fn tag_usage(&mut self, caller: &str, appid: &str) {
        self.stat_caller = Some(caller.to_owned());
        self.stat_tag = Some(appid.to_owned());
    }

    /// Application the request was forwarded to, once the launch succeeded.
    pub fn launched_app(&self) -> Option<&str> {
        self.start_info.as_deref()
    }

    pub fn is_launched(&self) -> bool {
        self.start_info.is_some()
    }

    pub(crate) fn mark_launched(&mut self, appid: &str) {
        self.start_info = Some(appid.to_owned());
    }
}
