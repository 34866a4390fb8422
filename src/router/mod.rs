//! # Router
//!
//! Maps route names to route definitions and builds `Route` values from them.
//!
//! The route table comes from a creator closure that runs exactly once, on
//! first access. Screens can therefore refer to each other's routes before
//! every module that defines them has been set up.
//!
//! ```text
//! get_route("profile", params)
//!   ├── lookup definition           → RouteNotFound if missing
//!   ├── warn on opaque params       (non-fatal)
//!   ├── new key + new event emitter
//!   └── config = component static config
//!                  over descriptor config (static or f(base, params))
//! ```
//!
//! The navigator's `default_route_config` is layered in later, by the reducer.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use crate::core::error::{NavigationError, Result};
use crate::core::params::Params;
use crate::core::route::{Renderer, Route, RouteComponent, RouteConfig, generate_key};

pub type ComponentFactory = Rc<dyn Fn() -> Rc<dyn RouteComponent>>;
pub type RouteTable = HashMap<String, RouteDefinition>;

/// Router-supplied config for a descriptor route.
#[derive(Clone)]
pub enum DescriptorConfig {
    Static(RouteConfig),
    /// Called with the base config and the route params.
    Computed(Rc<dyn Fn(&RouteConfig, &Params) -> RouteConfig>),
}

#[derive(Clone)]
pub struct RouteDescriptor {
    pub render: Renderer,
    pub config: Option<DescriptorConfig>,
}

impl RouteDescriptor {
    pub fn new(render: impl Fn(&Route) -> Rc<dyn RouteComponent> + 'static) -> Self {
        Self {
            render: Rc::new(render),
            config: None,
        }
    }

    pub fn with_config(mut self, config: RouteConfig) -> Self {
        self.config = Some(DescriptorConfig::Static(config));
        self
    }

    pub fn with_computed_config(
        mut self,
        config: impl Fn(&RouteConfig, &Params) -> RouteConfig + 'static,
    ) -> Self {
        self.config = Some(DescriptorConfig::Computed(Rc::new(config)));
        self
    }
}

#[derive(Clone)]
pub enum RouteDefinition {
    /// A zero-argument factory for the screen component.
    Component(ComponentFactory),
    /// A render function plus optional router-level config.
    Descriptor(RouteDescriptor),
}

impl RouteDefinition {
    pub fn component(factory: impl Fn() -> Rc<dyn RouteComponent> + 'static) -> Self {
        RouteDefinition::Component(Rc::new(factory))
    }
}

type RoutesCreator = Box<dyn FnOnce() -> RouteTable>;

pub struct Router {
    creator: RefCell<Option<RoutesCreator>>,
    routes: OnceCell<RouteTable>,
}

impl Router {
    pub fn new(routes_creator: impl FnOnce() -> RouteTable + 'static) -> Self {
        Self {
            creator: RefCell::new(Some(Box::new(routes_creator))),
            routes: OnceCell::new(),
        }
    }

    fn routes(&self) -> &RouteTable {
        self.routes.get_or_init(|| {
            let creator = self.creator.borrow_mut().take();
            let table = creator.map(|create| create()).unwrap_or_default();
            debug!("Router created {} routes", table.len());
            table
        })
    }

    pub fn contains(&self, route_name: &str) -> bool {
        self.routes().contains_key(route_name)
    }

    /// Known route names, sorted.
    pub fn route_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes().keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds a new route instance for `route_name`.
    pub fn get_route(&self, route_name: &str, params: Params) -> Result<Route> {
        self.get_route_with_key(generate_key(), route_name, params)
    }

    /// Like `get_route`, with a caller-chosen key. Tab and drawer items use
    /// their item key so that jumps can find them.
    pub fn get_route_with_key(
        &self,
        key: impl Into<String>,
        route_name: &str,
        params: Params,
    ) -> Result<Route> {
        let key = key.into();
        let definition =
            self.routes()
                .get(route_name)
                .ok_or_else(|| NavigationError::RouteNotFound {
                    route_name: route_name.to_string(),
                })?;
        warn_non_serializable(route_name, &params);

        let route = match definition {
            RouteDefinition::Component(factory) => {
                let component = factory();
                let config = component.route_config().unwrap_or_default();
                let renderer: Renderer = Rc::new(move |_| Rc::clone(&component));
                Route::with_key(key, route_name, params)
                    .with_renderer(renderer)
                    .with_config(config)
            }
            RouteDefinition::Descriptor(descriptor) => {
                let base = RouteConfig::default();
                let router_config = match &descriptor.config {
                    Some(DescriptorConfig::Static(config)) => config.clone(),
                    Some(DescriptorConfig::Computed(compute)) => compute(&base, &params),
                    None => base,
                };
                let route = Route::with_key(key, route_name, params)
                    .with_renderer(Rc::clone(&descriptor.render))
                    .with_config(router_config.clone());
                // The rendered component's own static config wins.
                match route.render().and_then(|component| component.route_config()) {
                    Some(component_config) => {
                        route.with_config(component_config.merged_over(&router_config))
                    }
                    None => route,
                }
            }
        };
        debug!("Built route {} ({})", route.key(), route_name);
        Ok(route)
    }

    /// Returns `route` with `params` merged into its params. Key, config and
    /// event emitter carry over.
    pub fn update_route_with_params(&self, route: &Route, params: &Params) -> Route {
        let merged = route.params().merged_with(params);
        warn_non_serializable(route.route_name(), &merged);
        route.with_params(merged)
    }
}

fn warn_non_serializable(route_name: &str, params: &Params) {
    let keys = params.non_serializable_keys();
    if !keys.is_empty() {
        warn!(
            "Route '{route_name}' has params that cannot be serialized: {keys:?}. \
             Navigation continues, but state persistence will drop them."
        );
    }
}
