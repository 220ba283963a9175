//! Constants used throughout the template router

/// Default name of the query parameter carrying the requested page
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Default subfolder under a context's base path that holds template files
pub const DEFAULT_TEMPLATE_SUBFOLDER: &str = "templates";

/// File extension of resolvable template files
pub const TEMPLATE_EXTENSION: &str = "php";

/// Query value marking a request as belonging to a magic folder
pub const MAGIC_FOLDER_FLAG: &str = "1";

/// Header override template name, reserved against direct page access
pub const HEADER_OVERRIDE_PAGE: &str = "wp_header";

/// Footer override template name, reserved against direct page access
pub const FOOTER_OVERRIDE_PAGE: &str = "wp_footer";

/// Base name of the notifications fired before the render target is installed
pub const PRE_INCLUDE_TEMPLATE: &str = "pre_include_template";

/// Base name of the notifications fired after the render target is installed
pub const POST_INCLUDE_TEMPLATE: &str = "post_include_template";

/// Body class appended to every resolved magic-folder page
pub const BODY_CLASS_PAGE: &str = "page";

/// Body classes removed from the host's computed list on magic-folder pages
pub const REMOVED_BODY_CLASSES: &[&str] = &["home", "blog"];
