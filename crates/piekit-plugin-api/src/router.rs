//! Routing of plugin events to handlers keyed by source and event name.

use piekit_core::PieResult;
use std::fmt;

type Handler = Box<dyn Fn() -> PieResult<()>>;

struct Route {
    source: String,
    event: Option<String>,
    handler: Handler,
}

/// Handler table a plugin consults from `Plugin::on_plugin_event`.
///
/// A route with no event matches the bare readiness notification only.
#[derive(Default)]
pub struct EventRouter {
    routes: Vec<Route>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `handler` when `source` becomes ready.
    pub fn on_ready<F>(&mut self, source: impl Into<String>, handler: F)
    where
        F: Fn() -> PieResult<()> + 'static,
    {
        self.routes.push(Route {
            source: source.into(),
            event: None,
            handler: Box::new(handler),
        });
    }

    /// Runs `handler` when `source` delivers `event`.
    pub fn on_event<F>(&mut self, source: impl Into<String>, event: impl Into<String>, handler: F)
    where
        F: Fn() -> PieResult<()> + 'static,
    {
        self.routes.push(Route {
            source: source.into(),
            event: Some(event.into()),
            handler: Box::new(handler),
        });
    }

    /// Runs every matching handler in registration order.
    ///
    /// Returns how many ran.
    pub fn route(&self, source: &str, event: Option<&str>) -> PieResult<usize> {
        let mut ran = 0;
        for route in &self.routes {
            if route.source == source && route.event.as_deref() == event {
                (route.handler)()?;
                ran += 1;
            }
        }
        Ok(ran)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self
            .routes
            .iter()
            .map(|r| format!("{}:{}", r.source, r.event.as_deref().unwrap_or("ready")))
            .collect();
        f.debug_struct("EventRouter").field("routes", &routes).finish()
    }
}
