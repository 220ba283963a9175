use std::path::PathBuf;

/// Read access to the server environment of the current request.
pub trait ServerInfo {
    /// Host name of the current request, if one is available.
    fn host(&self) -> Option<String>;

    /// Raw TLS indicator (the `HTTPS`-style server variable).
    ///
    /// `None` means the host never supplies such a signal, which is treated
    /// as secure. An empty value or the literal `"off"` (case-insensitive)
    /// means the request is not secure.
    fn secure_indicator(&self) -> Option<String>;
}

/// Capabilities the embedding framework supplies for a single request.
///
/// The router only consumes this interface; the concrete adapter lives in
/// the embedding application. All methods are synchronous and the router
/// calls them within one resolution pass.
pub trait RequestContext: ServerInfo {
    /// Whether this is the primary content query of the incoming request.
    fn is_main_query(&self) -> bool;

    /// Reads a query variable by name.
    fn query_var(&self, name: &str) -> Option<String>;

    /// Overrides the template the host would otherwise render.
    fn override_render_target(&mut self, template: PathBuf);

    /// The host's computed body class list.
    fn body_classes(&self) -> Vec<String>;

    /// Replaces the host's body class list.
    fn set_body_classes(&mut self, classes: Vec<String>);
}

/// A URL pattern a route context asks the host to route back into query
/// variables.
///
/// When a request path matches `regex`, the host is expected to set the
/// `folder_flag` query variable to `"1"` and to copy the first capture group
/// (the page name) into the `page_param` query variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    /// Anchored regex matching `{folder_segment}/{page}` request paths.
    pub regex: String,
    /// Query variable the host sets when the pattern matches.
    pub folder_flag: String,
    /// Query variable receiving the captured page name.
    pub page_param: String,
}

/// Startup-time registration surface of the embedding framework.
pub trait UrlPatternRegistrar {
    /// Declares a query variable name so the host will parse and expose it.
    fn register_query_var(&mut self, name: &str);

    /// Registers a rewrite pattern for a context's magic folder.
    fn register_url_pattern(&mut self, pattern: &UrlPattern);
}
