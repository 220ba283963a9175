use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use template_router::events::{TemplateEvent, TemplateListener};
use template_router::host::{RequestContext, ServerInfo, UrlPattern, UrlPatternRegistrar};

/// In-memory stand-in for the embedding framework's request surface.
///
/// Side effects the router installs (render target, body classes) are
/// recorded on the struct; when a journal is attached, the render target
/// override is also logged so tests can assert ordering against events.
pub struct MockRequest {
    pub main_query: bool,
    pub query_vars: HashMap<String, String>,
    pub server_host: Option<String>,
    pub secure: Option<String>,
    pub render_target: Option<PathBuf>,
    pub classes: Vec<String>,
    pub journal: Option<Rc<RefCell<Vec<String>>>>,
}

impl MockRequest {
    pub fn new() -> Self {
        Self {
            main_query: true,
            query_vars: HashMap::new(),
            server_host: None,
            secure: None,
            render_target: None,
            classes: vec!["home".to_string(), "blog".to_string(), "logged-in".to_string()],
            journal: None,
        }
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query_vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_journal(mut self, journal: Rc<RefCell<Vec<String>>>) -> Self {
        self.journal = Some(journal);
        self
    }
}

impl ServerInfo for MockRequest {
    fn host(&self) -> Option<String> {
        self.server_host.clone()
    }

    fn secure_indicator(&self) -> Option<String> {
        self.secure.clone()
    }
}

impl RequestContext for MockRequest {
    fn is_main_query(&self) -> bool {
        self.main_query
    }

    fn query_var(&self, name: &str) -> Option<String> {
        self.query_vars.get(name).cloned()
    }

    fn override_render_target(&mut self, template: PathBuf) {
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push("override_render_target".to_string());
        }
        self.render_target = Some(template);
    }

    fn body_classes(&self) -> Vec<String> {
        self.classes.clone()
    }

    fn set_body_classes(&mut self, classes: Vec<String>) {
        self.classes = classes;
    }
}

/// Listener that writes every event name into a shared journal.
pub struct JournalListener {
    pub journal: Rc<RefCell<Vec<String>>>,
}

impl TemplateListener for JournalListener {
    fn handle(&mut self, event: &TemplateEvent) {
        self.journal.borrow_mut().push(event.name.clone());
    }
}

/// Registrar recording everything the router installs at startup.
#[derive(Default)]
pub struct MockRegistrar {
    pub query_vars: Vec<String>,
    pub patterns: Vec<UrlPattern>,
}

impl UrlPatternRegistrar for MockRegistrar {
    fn register_query_var(&mut self, name: &str) {
        self.query_vars.push(name.to_string());
    }

    fn register_url_pattern(&mut self, pattern: &UrlPattern) {
        self.patterns.push(pattern.clone());
    }
}

/// Creates `{base}/{subfolder}/{page}.php` files for a test context.
pub fn write_templates(base: &Path, subfolder: &str, pages: &[&str]) {
    let dir = base.join(subfolder);
    fs::create_dir_all(&dir).unwrap();
    for page in pages {
        fs::write(dir.join(format!("{page}.php")), "<?php // test template\n").unwrap();
    }
}
