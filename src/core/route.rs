//! # Routes
//!
//! A `Route` is one instance of a screen: a generated key, the name it was
//! built from, its params, its resolved config, and an event emitter scoped
//! to the screen's lifetime.
//!
//! Routes are cheap to clone. Clones share params, config and the emitter
//! until one of them is explicitly replaced (`with_params`, `with_config`),
//! which keeps reducer updates free of mutation.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::core::params::{ParamValue, Params};

/// Generates a fresh route key.
pub fn generate_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// Route Config
// ============================================================================

/// A navigation bar title, either fixed or computed from the route.
#[derive(Clone)]
pub enum Title {
    Text(String),
    Computed(Rc<dyn Fn(&Params, &RouteConfig) -> String>),
}

impl Title {
    pub fn computed(f: impl Fn(&Params, &RouteConfig) -> String + 'static) -> Self {
        Title::Computed(Rc::new(f))
    }
}

impl fmt::Debug for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Title::Text(text) => write!(f, "{text:?}"),
            Title::Computed(_) => write!(f, "<computed>"),
        }
    }
}

impl Serialize for Title {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Title::Text(text) => serializer.serialize_str(text),
            Title::Computed(_) => serializer.serialize_none(),
        }
    }
}

impl From<&str> for Title {
    fn from(value: &str) -> Self {
        Title::Text(value.to_string())
    }
}

impl From<String> for Title {
    fn from(value: String) -> Self {
        Title::Text(value)
    }
}

/// Which transition the navigator plays when this route is pushed or popped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    FloatHorizontal,
    FloatVertical,
    Fade,
    None,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NavigationBarConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint_color: Option<String>,
}

/// Per-route configuration. Every field is optional so that configs from
/// several sources can be layered with `merged_over`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RouteConfig {
    pub navigation_bar: NavigationBarConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionStyle>,
    /// Marks components that are themselves navigators, for focus tracking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_navigator: Option<bool>,
}

impl RouteConfig {
    /// Returns `self` layered over `base`: any field set here wins.
    pub fn merged_over(&self, base: &RouteConfig) -> RouteConfig {
        RouteConfig {
            navigation_bar: NavigationBarConfig {
                title: self
                    .navigation_bar
                    .title
                    .clone()
                    .or_else(|| base.navigation_bar.title.clone()),
                visible: self.navigation_bar.visible.or(base.navigation_bar.visible),
                background_color: self
                    .navigation_bar
                    .background_color
                    .clone()
                    .or_else(|| base.navigation_bar.background_color.clone()),
                tint_color: self
                    .navigation_bar
                    .tint_color
                    .clone()
                    .or_else(|| base.navigation_bar.tint_color.clone()),
            },
            transition: self.transition.or(base.transition),
            is_navigator: self.is_navigator.or(base.is_navigator),
        }
    }

    pub fn with_title(mut self, title: impl Into<Title>) -> Self {
        self.navigation_bar.title = Some(title.into());
        self
    }

    pub fn with_navigation_bar_visible(mut self, visible: bool) -> Self {
        self.navigation_bar.visible = Some(visible);
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.navigation_bar.background_color = Some(color.into());
        self
    }

    pub fn with_transition(mut self, transition: TransitionStyle) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn navigator(mut self) -> Self {
        self.is_navigator = Some(true);
        self
    }
}

// ============================================================================
// Rendering contract
// ============================================================================

/// A component usable as a route. Rendering itself belongs to the host; the
/// core only reads the component's static route config.
pub trait RouteComponent {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Static configuration declared by the component. Overrides router config.
    fn route_config(&self) -> Option<RouteConfig> {
        None
    }
}

pub type Renderer = Rc<dyn Fn(&Route) -> Rc<dyn RouteComponent>>;

// ============================================================================
// Route event emitter
// ============================================================================

type Listener = Rc<dyn Fn(&ParamValue)>;

struct EmitterInner {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, String, Listener)>>,
}

/// App-level pub/sub scoped to one screen. Created once per route and shared
/// by every clone of it.
#[derive(Clone)]
pub struct RouteEvents {
    inner: Rc<EmitterInner>,
}

impl Default for RouteEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteEvents {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(EmitterInner {
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Registers a listener for `event`. Dropping the returned handle does
    /// not unsubscribe; call `EventSubscription::remove`.
    pub fn add_listener(
        &self,
        event: impl Into<String>,
        listener: impl Fn(&ParamValue) + 'static,
    ) -> EventSubscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, event.into(), Rc::new(listener)));
        EventSubscription {
            id,
            events: Rc::downgrade(&self.inner),
        }
    }

    /// Calls every listener registered for `event`. Returns how many ran.
    pub fn emit(&self, event: &str, payload: &ParamValue) -> usize {
        // Snapshot so listeners may subscribe or unsubscribe while running.
        let matching: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();
        for listener in &matching {
            listener(payload);
        }
        matching.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn ptr_eq(&self, other: &RouteEvents) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

pub struct EventSubscription {
    id: u64,
    events: std::rc::Weak<EmitterInner>,
}

impl EventSubscription {
    pub fn remove(self) {
        if let Some(inner) = self.events.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _, _)| *id != self.id);
        }
    }
}

// ============================================================================
// Route
// ============================================================================

#[derive(Clone)]
pub struct Route {
    key: String,
    route_name: String,
    params: Rc<Params>,
    config: Rc<RouteConfig>,
    events: RouteEvents,
    renderer: Option<Renderer>,
}

impl Route {
    /// Creates a route with a freshly generated key.
    pub fn new(route_name: impl Into<String>, params: Params) -> Self {
        Self::with_key(generate_key(), route_name, params)
    }

    /// Creates a route with an explicit key. Tab and drawer items use their
    /// tab key here so that jumps can locate them.
    pub fn with_key(key: impl Into<String>, route_name: impl Into<String>, params: Params) -> Self {
        Self {
            key: key.into(),
            route_name: route_name.into(),
            params: Rc::new(params),
            config: Rc::new(RouteConfig::default()),
            events: RouteEvents::new(),
            renderer: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    pub fn events(&self) -> &RouteEvents {
        &self.events
    }

    /// Returns a clone carrying `params` in place of the current ones.
    pub fn with_params(&self, params: Params) -> Route {
        Route {
            params: Rc::new(params),
            ..self.clone()
        }
    }

    /// Returns a clone carrying `config` in place of the current one.
    pub fn with_config(&self, config: RouteConfig) -> Route {
        Route {
            config: Rc::new(config),
            ..self.clone()
        }
    }

    pub(crate) fn with_renderer(mut self, renderer: Renderer) -> Route {
        self.renderer = Some(renderer);
        self
    }

    /// Lays `default` under this route's own config.
    pub fn with_default_config(&self, default: &RouteConfig) -> Route {
        self.with_config(self.config.merged_over(default))
    }

    /// Asks the host renderer for this route's component, if one was attached.
    pub fn render(&self) -> Option<Rc<dyn RouteComponent>> {
        self.renderer.as_ref().map(|render| render(self))
    }

    /// Resolves the navigation bar title against this route's params.
    pub fn title(&self) -> Option<String> {
        match &self.config.navigation_bar.title {
            Some(Title::Text(text)) => Some(text.clone()),
            Some(Title::Computed(f)) => Some(f(&self.params, &self.config)),
            None => None,
        }
    }

    /// True if both values are the same route instance state: same key and
    /// the same shared params, config, and emitter.
    pub fn is_same_instance(&self, other: &Route) -> bool {
        self.key == other.key
            && Rc::ptr_eq(&self.params, &other.params)
            && Rc::ptr_eq(&self.config, &other.config)
            && self.events.ptr_eq(&other.events)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("key", &self.key)
            .field("route_name", &self.route_name)
            .field("params", &self.params)
            .field("config", &self.config)
            .finish()
    }
}

/// Routes compare by key, name, and params content.
impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.route_name == other.route_name && self.params == other.params
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Route", 4)?;
        s.serialize_field("key", &self.key)?;
        s.serialize_field("route_name", &self.route_name)?;
        s.serialize_field("params", &*self.params)?;
        s.serialize_field("config", &*self.config)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_params_and_config() {
        let route = Route::new("home", Params::new().with("id", 1i64));
        let clone = route.clone();
        assert!(route.is_same_instance(&clone));

        let updated = route.with_params(Params::new().with("id", 2i64));
        assert_eq!(updated.key(), route.key());
        assert!(!route.is_same_instance(&updated));
        assert_eq!(route.params().get("id"), Some(&ParamValue::Number(1.0)));
    }

    #[test]
    fn test_config_precedence_route_over_default() {
        let default = RouteConfig::default()
            .with_title("Default")
            .with_background_color("#fff");
        let route = Route::new("home", Params::new())
            .with_config(RouteConfig::default().with_title("Home"))
            .with_default_config(&default);

        assert_eq!(route.title().as_deref(), Some("Home"));
        assert_eq!(
            route.config().navigation_bar.background_color.as_deref(),
            Some("#fff")
        );
    }

    #[test]
    fn test_owned_string_title() {
        let name = format!("Inbox ({})", 3);
        let route = Route::new("inbox", Params::new()).with_config(RouteConfig::default().with_title(name));
        assert_eq!(route.title().as_deref(), Some("Inbox (3)"));
    }

    #[test]
    fn test_computed_title_reads_params() {
        let config = RouteConfig::default().with_title(Title::computed(|params, _| {
            format!("User {}", params.get("name").and_then(ParamValue::as_str).unwrap_or("?"))
        }));
        let route = Route::new("profile", Params::new().with("name", "ada")).with_config(config);
        assert_eq!(route.title().as_deref(), Some("User ada"));
    }

    #[test]
    fn test_events_shared_between_clones() {
        let route = Route::new("home", Params::new());
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let sub = route
            .clone()
            .events()
            .add_listener("refresh", move |_| counter.set(counter.get() + 1));

        assert_eq!(route.events().emit("refresh", &ParamValue::Null), 1);
        assert_eq!(route.events().emit("other", &ParamValue::Null), 0);
        sub.remove();
        assert_eq!(route.events().emit("refresh", &ParamValue::Null), 0);
        assert_eq!(hits.get(), 1);
    }
}
