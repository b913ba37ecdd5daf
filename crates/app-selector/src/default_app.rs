//! Default-handler registration for the "Always" action.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::request::LaunchRequest;
use crate::services::MimeResolver;

/// What gets stored as the default handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultRegistration {
    pub operation: String,
    pub mime: Option<String>,
    /// Explicit scheme of the request, else the scheme of its URI.
    pub uri_or_scheme: Option<String>,
    pub appid: String,
}

/// Local path named by `uri`, for plain paths and `file:` URIs.
pub fn file_path_of(uri: &str) -> Option<&str> {
    if uri.starts_with('/') {
        return Some(uri);
    }
    uri.strip_prefix("file://")
        .filter(|path| path.starts_with('/'))
        .or_else(|| uri.strip_prefix("file:").filter(|path| path.starts_with('/')))
}

fn scheme_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(([^:/?#]+):)?").ok())
        .as_ref()
}

/// Scheme of `uri` as matched by `^(([^:/?#]+):)?`.
pub fn uri_scheme(uri: &str) -> Option<String> {
    let captures = scheme_regex()?.captures(uri)?;
    captures.get(2).map(|scheme| scheme.as_str().to_owned())
}

/// Derives the registration for making `appid` the default handler of
/// `request`.
///
/// A file URI contributes its MIME type, when the request has none, and is
/// then dropped. An explicit `uri_r_info` scheme is consumed from the
/// request and wins over the URI's own scheme. Returns `None` for a request
/// without an operation, and when neither a `uri_r_info` nor a URI is left
/// to match the scheme against.
pub fn registration_for(
    request: &mut LaunchRequest,
    appid: &str,
    mime: &dyn MimeResolver,
) -> Option<DefaultRegistration> {
    let operation = request.operation()?.to_owned();

    let file_path = request.uri().and_then(file_path_of).map(str::to_owned);
    if let Some(path) = file_path {
        if request.mime().is_none() {
            let guessed = mime.mime_from_file(&path);
            log::debug!("mime of {} is {:?}", path, guessed);
            request.set_mime(guessed);
        }
        request.drop_uri();
    }

    let uri_or_scheme = match request.take_uri_r_info() {
        Some(scheme) => Some(scheme),
        None => {
            let Some(uri) = request.uri() else {
                log::debug!("no uri to match, {} is not registered for {}", appid, operation);
                return None;
            };
            uri_scheme(uri)
        }
    };

    Some(DefaultRegistration {
        operation,
        mime: request.mime().map(str::to_owned),
        uri_or_scheme,
        appid: appid.to_owned(),
    })
}
