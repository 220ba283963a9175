use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;

use crate::constants::{BODY_CLASS_PAGE, REMOVED_BODY_CLASSES};
use crate::context::RouteContext;
use crate::error::{Error, Result};
use crate::events::{EventBus, TemplateListener};
use crate::host::{RequestContext, UrlPatternRegistrar};

/// One successfully resolved request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedItem {
    /// Name of the context that resolved the request.
    pub context: String,
    /// Template subfolder the page was found in.
    pub subfolder: String,
    /// Resolved page name.
    pub page: String,
}

/// Owns the registered route contexts, the process default selection and the
/// resolved-items log.
///
/// The registry is plain owned state: construct one at startup, register
/// contexts, then pass it by `&mut` to whatever drives request resolution.
/// Hosts that handle requests on multiple threads must wrap it in a lock
/// themselves; the core performs no locking.
#[derive(Default)]
pub struct RouteRegistry {
    contexts: IndexMap<String, RouteContext>,
    default_name: Option<String>,
    resolved: Vec<ResolvedItem>,
    events: EventBus,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a context under its name, replacing any prior entry.
    ///
    /// A context carrying a default page also becomes the process default;
    /// when several do, the last registration wins.
    pub fn register(&mut self, context: RouteContext) {
        debug!(
            "Registering route context '{}' for folder '{}'",
            context.name(),
            context.folder_segment()
        );
        if context.default_page().is_some() {
            self.default_name = Some(context.name().to_string());
        }
        self.contexts.insert(context.name().to_string(), context);
    }

    /// Explicitly marks `name` as the default context.
    ///
    /// Existence is not checked here. A default pointing at nothing is
    /// reported by [`get`](Self::get) as `ContextNotFound`, which keeps
    /// "no default configured" and "misconfigured default" distinguishable.
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default_name = Some(name.into());
    }

    /// Looks up a context by name, or the process default when `name` is `None`.
    pub fn get(&self, name: Option<&str>) -> Result<&RouteContext> {
        let name = match name {
            Some(name) => name,
            None => self.default_name.as_deref().ok_or(Error::NoDefaultContext)?,
        };
        self.contexts
            .get(name)
            .ok_or_else(|| Error::ContextNotFound { name: name.to_string() })
    }

    /// Appends a listener invoked at the pre/post render points.
    pub fn subscribe(&mut self, listener: Box<dyn TemplateListener>) {
        self.events.subscribe(listener);
    }

    /// Snapshot of every route resolved so far in this process.
    ///
    /// Further routes may resolve after this call returns; callers must not
    /// assume the snapshot covers all requests of a session.
    pub fn resolved_items(&self) -> Vec<ResolvedItem> {
        self.resolved.clone()
    }

    /// Serializable rendering of the registered contexts, for diagnostics.
    ///
    /// Fails when a context cannot be serialized, e.g. a base path that is
    /// not valid Unicode.
    pub fn config_for_debug(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.contexts)?)
    }

    /// Registers every context's query variables and rewrite pattern with
    /// the host's startup registration surface.
    pub fn install(&self, registrar: &mut dyn UrlPatternRegistrar) {
        for context in self.contexts.values() {
            registrar.register_query_var(context.folder_segment());
            registrar.register_query_var(context.page_param());
            registrar.register_url_pattern(&context.url_pattern());
        }
    }

    /// Resolves one incoming request against every registered context.
    ///
    /// Requests that are not the primary content query, or that carry no
    /// magic folder flag, resolve to an empty list with no side effects.
    /// Each matching context runs to completion independently, in
    /// registration order: the resolved page is appended to the log, the
    /// pre-render events fire (scoped, then global), the render target
    /// override is installed on the request, the body class transform is
    /// applied, and the post-render events fire. All of this happens
    /// synchronously within this call.
    ///
    /// Reserved pages and missing template files surface as hard-abort
    /// errors the host must turn into terminated responses. Contexts that
    /// already resolved keep their log entries and side effects when a
    /// later context aborts.
    pub fn resolve_request(
        &mut self,
        request: &mut dyn RequestContext,
    ) -> Result<Vec<ResolvedItem>> {
        if !request.is_main_query() {
            return Ok(Vec::new());
        }

        let contexts: Vec<RouteContext> = self.contexts.values().cloned().collect();
        let mut items = Vec::new();
        for context in contexts {
            let Some(page) = context.match_request(request)? else {
                continue;
            };
            info!("Resolved page '{}' in context '{}'", page, context.name());
            let item = ResolvedItem {
                context: context.name().to_string(),
                subfolder: context.template_subfolder().to_string(),
                page: page.clone(),
            };
            self.resolved.push(item.clone());

            self.events.emit_pre(&context, &page);
            request.override_render_target(context.template_file(&page));
            request.set_body_classes(page_body_classes(request.body_classes()));
            self.events.emit_post(&context, &page);

            items.push(item);
        }

        Ok(items)
    }
}

/// Body class transform applied to every resolved magic-folder page: the
/// host's `home` and `blog` classes are dropped and `page` is appended.
pub fn page_body_classes(classes: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = classes
        .into_iter()
        .filter(|class| !REMOVED_BODY_CLASSES.contains(&class.as_str()))
        .collect();
    result.push(BODY_CLASS_PAGE.to_string());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(name: &str, folder: &str) -> RouteContext {
        RouteContext::new(name, folder, "/var/www/site")
    }

    #[test]
    fn test_get_returns_registered_context() {
        let mut registry = RouteRegistry::new();
        registry.register(context("shop", "shop"));

        let found = registry.get(Some("shop")).unwrap();
        assert_eq!(found.folder_segment(), "shop");
    }

    #[test]
    fn test_get_unknown_name_fails() {
        let registry = RouteRegistry::new();
        assert!(matches!(
            registry.get(Some("shop")),
            Err(Error::ContextNotFound { .. })
        ));
    }

    #[test]
    fn test_reregistration_last_writer_wins() {
        let mut registry = RouteRegistry::new();
        registry.register(context("shop", "shop"));
        registry.register(context("shop", "store"));

        assert_eq!(registry.get(Some("shop")).unwrap().folder_segment(), "store");
        assert_eq!(registry.config_for_debug().unwrap().as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_get_without_default_fails() {
        let mut registry = RouteRegistry::new();
        registry.register(context("shop", "shop"));

        assert!(matches!(registry.get(None), Err(Error::NoDefaultContext)));
    }

    #[test]
    fn test_context_with_default_page_becomes_process_default() {
        let mut registry = RouteRegistry::new();
        registry.register(context("shop", "shop").with_default_page("home"));
        registry.register(context("docs", "docs").with_default_page("index"));

        assert_eq!(registry.get(None).unwrap().name(), "docs");
    }

    #[test]
    fn test_set_default_overrides_registration_order() {
        let mut registry = RouteRegistry::new();
        registry.register(context("shop", "shop").with_default_page("home"));
        registry.register(context("docs", "docs"));
        registry.set_default("docs");

        assert_eq!(registry.get(None).unwrap().name(), "docs");
    }

    #[test]
    fn test_dangling_default_is_reported_as_not_found() {
        let mut registry = RouteRegistry::new();
        registry.set_default("gone");

        assert!(matches!(
            registry.get(None),
            Err(Error::ContextNotFound { .. })
        ));
    }

    #[test]
    fn test_page_body_classes_transform() {
        let classes = vec![
            "home".to_string(),
            "blog".to_string(),
            "logged-in".to_string(),
        ];
        assert_eq!(page_body_classes(classes), vec!["logged-in", "page"]);
    }

    #[test]
    fn test_config_for_debug_lists_contexts() {
        let mut registry = RouteRegistry::new();
        registry.register(context("shop", "shop").with_template_subfolder("/pages/"));

        let config = registry.config_for_debug().unwrap();
        assert_eq!(config["shop"]["folder_segment"], "shop");
        assert_eq!(config["shop"]["template_subfolder"], "pages");
    }
}
