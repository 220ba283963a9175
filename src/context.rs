use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};
use url::form_urlencoded;

use crate::constants::{
    DEFAULT_PAGE_PARAM, DEFAULT_TEMPLATE_SUBFOLDER, FOOTER_OVERRIDE_PAGE, HEADER_OVERRIDE_PAGE,
    MAGIC_FOLDER_FLAG, TEMPLATE_EXTENSION,
};
use crate::error::{Error, Result};
use crate::host::{RequestContext, ServerInfo, UrlPattern};

/// A named, independently configured routing target.
///
/// Each context owns one magic folder segment, a filesystem lookup path and a
/// default-page convention. Contexts are cheap to clone; the registry stores
/// them by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteContext {
    name: String,
    folder_segment: String,
    page_param: String,
    base_path: PathBuf,
    template_subfolder: String,
    default_page: Option<String>,
}

/// Outcome of header/footer delegation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delegation {
    /// Render this override template instead of the host's own chrome.
    Template(PathBuf),
    /// Fall back to the host's default rendering.
    Host,
}

impl RouteContext {
    /// Creates a context with the default page parameter (`page`) and the
    /// default template subfolder (`templates`).
    ///
    /// Trailing separators are stripped from `base_path` before storage.
    pub fn new(
        name: impl Into<String>,
        folder_segment: impl Into<String>,
        base_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            folder_segment: folder_segment.into(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            base_path: untrail(base_path.into()),
            template_subfolder: DEFAULT_TEMPLATE_SUBFOLDER.to_string(),
            default_page: None,
        }
    }

    /// Sets the query parameter carrying the requested page name.
    pub fn with_page_param(mut self, page_param: impl Into<String>) -> Self {
        self.page_param = page_param.into();
        self
    }

    /// Sets the subfolder under the base path that holds template files.
    ///
    /// Leading and trailing separators are stripped before storage.
    pub fn with_template_subfolder(mut self, subfolder: &str) -> Self {
        self.template_subfolder =
            subfolder.trim_matches(|c| c == '/' || c == '\\').to_string();
        self
    }

    /// Sets the page used when a URL is built without an explicit page.
    ///
    /// A context registered with a non-empty default page also becomes the
    /// process default context. An empty value is treated as no default.
    pub fn with_default_page(mut self, page: impl Into<String>) -> Self {
        let page = page.into();
        self.default_page = if page.is_empty() { None } else { Some(page) };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn folder_segment(&self) -> &str {
        &self.folder_segment
    }

    pub fn page_param(&self) -> &str {
        &self.page_param
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn template_subfolder(&self) -> &str {
        &self.template_subfolder
    }

    pub fn default_page(&self) -> Option<&str> {
        self.default_page.as_deref()
    }

    /// Directory holding this context's template files.
    pub fn template_dir(&self) -> PathBuf {
        self.base_path.join(&self.template_subfolder)
    }

    /// Full path of the template file backing `page`.
    pub fn template_file(&self, page: &str) -> PathBuf {
        self.template_dir().join(format!("{page}.{TEMPLATE_EXTENSION}"))
    }

    /// Rewrite pattern the host should install for this context's magic folder.
    pub fn url_pattern(&self) -> UrlPattern {
        UrlPattern {
            regex: format!(r"^{}/([a-zA-Z\-0-9_]+)$", self.folder_segment),
            folder_flag: self.folder_segment.clone(),
            page_param: self.page_param.clone(),
        }
    }

    /// Builds a URL for `page` under this context's magic folder.
    ///
    /// `page` falls back to the context's default page; when neither is
    /// available a `NoPageName` error is returned. Query arguments are
    /// percent-encoded in the mapping's iteration order.
    ///
    /// Passing `server` requests a fully qualified URL derived from the
    /// current request's host and TLS indicator. When the server reports no
    /// host, the prefix is silently left empty.
    pub fn build_url(
        &self,
        page: Option<&str>,
        args: &IndexMap<String, String>,
        server: Option<&dyn ServerInfo>,
    ) -> Result<String> {
        let page = match page {
            Some(page) => page,
            None => self.default_page.as_deref().ok_or_else(|| Error::NoPageName {
                context: self.name.clone(),
            })?,
        };

        let mut url = String::new();
        if let Some(server) = server {
            if let Some(host) = server.host() {
                let secure = match server.secure_indicator() {
                    Some(value) => {
                        let value = value.to_ascii_lowercase();
                        !value.is_empty() && value != "off"
                    }
                    None => true,
                };
                url = format!(
                    "http{}://{}",
                    if secure { "s" } else { "" },
                    host.to_ascii_lowercase()
                );
            }
        }

        url.push('/');
        url.push_str(&self.folder_segment);
        url.push('/');
        url.push_str(page);
        url.push('/');

        if !args.is_empty() {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (key, value) in args {
                serializer.append_pair(key, value);
            }
            url.push('?');
            url.push_str(&serializer.finish());
        }

        Ok(url)
    }

    /// Steps a request through folder matching, page extraction, the
    /// reserved-name guard and the template existence check.
    ///
    /// Returns `Ok(None)` when the request does not belong to this context's
    /// magic folder. Reserved pages and missing template files are hard
    /// errors the host must turn into aborted responses.
    pub fn match_request(&self, request: &dyn RequestContext) -> Result<Option<String>> {
        let Some(flag) = request.query_var(&self.folder_segment) else {
            return Ok(None);
        };
        if flag != MAGIC_FOLDER_FLAG {
            return Ok(None);
        }

        let raw = request.query_var(&self.page_param).unwrap_or_default();
        // Final path component only, so traversal in the parameter value
        // cannot escape the template subfolder.
        let page = final_path_component(&raw);

        if page == HEADER_OVERRIDE_PAGE || page == FOOTER_OVERRIDE_PAGE {
            return Err(Error::DirectAccess);
        }

        let template = self.template_file(page);
        if !template.is_file() {
            debug!("No template file at '{}' for page '{}'", template.display(), page);
            return Err(Error::UnknownPage { page: escape_html(page) });
        }

        Ok(Some(page.to_string()))
    }

    /// Header delegation: the `wp_header.php` override wins when it exists.
    pub fn header(&self) -> Delegation {
        self.delegate(HEADER_OVERRIDE_PAGE)
    }

    /// Footer delegation: the `wp_footer.php` override wins when it exists.
    pub fn footer(&self) -> Delegation {
        self.delegate(FOOTER_OVERRIDE_PAGE)
    }

    fn delegate(&self, page: &str) -> Delegation {
        let file = self.template_file(page);
        if file.is_file() {
            Delegation::Template(file)
        } else {
            Delegation::Host
        }
    }
}

/// Strips trailing separators from a path.
fn untrail(path: PathBuf) -> PathBuf {
    path.components().as_path().to_path_buf()
}

/// Reduces an untrusted parameter value to its final path component.
pub(crate) fn final_path_component(value: &str) -> &str {
    let trimmed = value.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

/// Escapes a string for safe inclusion in an HTML response body.
pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
