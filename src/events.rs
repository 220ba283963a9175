use log::debug;
use serde::Serialize;

use crate::constants::{POST_INCLUDE_TEMPLATE, PRE_INCLUDE_TEMPLATE};
use crate::context::RouteContext;

/// Immutable record delivered to template listeners.
///
/// Event names are part of the integration contract:
/// `pre_include_template/{context}` and `pre_include_template` fire before
/// the render target is installed, `post_include_template/{context}` and
/// `post_include_template` after. The scoped event always precedes the
/// global one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEvent {
    /// Full event name, e.g. `pre_include_template/shop`.
    pub name: String,
    /// Name of the context that resolved the request.
    pub context: String,
    /// Magic folder segment of the resolving context.
    pub folder_segment: String,
    /// Query parameter the page name was read from.
    pub page_param: String,
    /// Resolved page name, already reduced to its final path component.
    pub page: String,
}

/// Synchronous observer of template resolution.
pub trait TemplateListener {
    fn handle(&mut self, event: &TemplateEvent);
}

/// Ordered list of listeners, invoked synchronously by the resolver.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn TemplateListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener; listeners run in subscription order.
    pub fn subscribe(&mut self, listener: Box<dyn TemplateListener>) {
        self.listeners.push(listener);
    }

    /// Fires the pre-render pair for a resolved page.
    pub(crate) fn emit_pre(&mut self, context: &RouteContext, page: &str) {
        self.emit(PRE_INCLUDE_TEMPLATE, context, page);
    }

    /// Fires the post-render pair for a resolved page.
    pub(crate) fn emit_post(&mut self, context: &RouteContext, page: &str) {
        self.emit(POST_INCLUDE_TEMPLATE, context, page);
    }

    /// Emits the scoped event followed by the global one.
    fn emit(&mut self, base: &str, context: &RouteContext, page: &str) {
        let scoped = format!("{}/{}", base, context.name());
        self.dispatch(event(scoped, context, page));
        self.dispatch(event(base.to_string(), context, page));
    }

    fn dispatch(&mut self, event: TemplateEvent) {
        debug!("Dispatching '{}' for page '{}'", event.name, event.page);
        for listener in &mut self.listeners {
            listener.handle(&event);
        }
    }
}

fn event(name: String, context: &RouteContext, page: &str) -> TemplateEvent {
    TemplateEvent {
        name,
        context: context.name().to_string(),
        folder_segment: context.folder_segment().to_string(),
        page_param: context.page_param().to_string(),
        page: page.to_string(),
    }
}
