//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::rc::Rc;

use crate::core::params::Params;
use crate::core::route::{Route, RouteComponent, RouteConfig};
use crate::router::{RouteDefinition, RouteTable, Router};

/// A screen that only has a name and an optional static config.
pub struct TestScreen {
    name: String,
    config: Option<RouteConfig>,
}

impl RouteComponent for TestScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn route_config(&self) -> Option<RouteConfig> {
        self.config.clone()
    }
}

fn screen(name: &'static str, title: &'static str) -> RouteDefinition {
    RouteDefinition::component(move || {
        Rc::new(TestScreen {
            name: name.to_string(),
            config: Some(RouteConfig::default().with_title(title)),
        })
    })
}

/// Routes: home, detail, settings, inbox, feed, messages, profile.
pub fn fixture_router() -> Router {
    Router::new(|| {
        let mut routes = RouteTable::new();
        for (name, title) in [
            ("home", "Home"),
            ("detail", "Detail"),
            ("settings", "Settings"),
            ("inbox", "Inbox"),
            ("feed", "Feed"),
            ("messages", "Messages"),
            ("profile", "Profile"),
        ] {
            routes.insert(name.to_string(), screen(name, title));
        }
        routes
    })
}

/// Three tabs keyed by their route name.
pub fn tab_items(router: &Router) -> Vec<Route> {
    ["feed", "messages", "profile"]
        .iter()
        .filter_map(|name| router.get_route_with_key(*name, name, Params::new()).ok())
        .collect()
}
