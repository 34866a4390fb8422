use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use navkit::context::NavigatorMount;
use navkit::core::config::NavigationSettings;
use navkit::core::state::Alert;
use navkit::replay::{RouteSpec, script_router};
use navkit::scheduler::{FrameScheduler, ManualClock};
use navkit::shared_element::{ElementMetrics, GroupStyle};
use navkit::{NavigationError, NavigationProvider, NavigatorType, Params, Route, Router};

// ============================================================================
// Helper Functions
// ============================================================================

fn router() -> Router {
    let specs: Vec<RouteSpec> = ["home", "detail", "settings", "feed", "messages", "profile", "inbox", "thread"]
        .iter()
        .map(|name| RouteSpec {
            name: name.to_string(),
            title: Some(name.to_uppercase()),
        })
        .collect();
    script_router(&specs)
}

fn provider() -> (NavigationProvider, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new());
    let provider = NavigationProvider::with_runtime(
        router(),
        NavigationSettings {
            debounce_window: Duration::from_millis(500),
        },
        FrameScheduler::new(),
        clock.clone(),
    );
    (provider, clock)
}

fn keyed(provider: &NavigationProvider, names: &[&str]) -> Vec<Route> {
    names
        .iter()
        .map(|name| {
            provider
                .context()
                .router()
                .get_route_with_key(*name, name, Params::new())
                .unwrap()
        })
        .collect()
}

fn route_names(routes: &[Route]) -> Vec<String> {
    routes.iter().map(|r| r.route_name().to_string()).collect()
}

// ============================================================================
// Stack
// ============================================================================

#[test]
fn test_basic_stack_flow() {
    let (provider, clock) = provider();
    let context = provider.context();
    let home = context.get_route("home", Params::new()).unwrap();
    let stack = context
        .mount(NavigatorMount::stack(vec![home]).with_id("main"))
        .unwrap()
        .as_stack()
        .unwrap();

    assert!(stack.push_route("detail", Params::new().with("id", 1i64)).unwrap());
    clock.advance(Duration::from_secs(1));
    assert!(stack.push_route("settings", Params::new()).unwrap());
    assert_eq!(route_names(&stack.routes().unwrap()), vec!["home", "detail", "settings"]);

    clock.advance(Duration::from_secs(1));
    assert!(stack.pop().unwrap());
    assert_eq!(context.focused_route().unwrap().route_name(), "detail");
    assert_eq!(
        context.focused_route().unwrap().params().get("id").and_then(|v| v.as_f64()),
        Some(1.0)
    );

    assert!(stack.pop_to_top().unwrap());
    assert_eq!(stack.current_index().unwrap(), 0);
    assert!(!stack.pop_to_top().unwrap());
}

#[test]
fn test_route_params_update_and_noop() {
    let (provider, _) = provider();
    let context = provider.context();
    let home = context.get_route("home", Params::new().with("q", "a")).unwrap();
    let stack = context
        .mount(NavigatorMount::stack(vec![home]))
        .unwrap()
        .as_stack()
        .unwrap();

    let notified = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&notified);
    context.subscribe(move |_| *counter.borrow_mut() += 1);

    assert!(!stack.update_current_route_params(Params::new().with("q", "a")).unwrap());
    assert!(stack.update_current_route_params(Params::new().with("page", 2i64)).unwrap());
    assert_eq!(*notified.borrow(), 1);

    let route = stack.current_route().unwrap().unwrap();
    assert_eq!(route.params().len(), 2);
    assert_eq!(route.title().as_deref(), Some("HOME"));
}

#[test]
fn test_alerts_follow_navigator_lifetime() {
    let (provider, _) = provider();
    let context = provider.context();
    let home = context.get_route("home", Params::new()).unwrap();
    let stack = context
        .mount(NavigatorMount::stack(vec![home]))
        .unwrap()
        .as_stack()
        .unwrap();

    stack.show_local_alert(Alert::new("Saved")).unwrap();
    assert_eq!(
        context.state().alerts.get(stack.navigator_uid()).map(|a| a.message.as_str()),
        Some("Saved")
    );
    assert!(stack.hide_local_alert().unwrap());
    assert!(!stack.hide_local_alert().unwrap());

    stack.show_local_alert(Alert::new("Again")).unwrap();
    context.unmount(stack.navigator_uid()).unwrap();
    assert!(context.state().alerts.is_empty());
    assert!(matches!(
        stack.show_local_alert(Alert::new("Gone")),
        Err(NavigationError::NavigatorNotFound { .. })
    ));
}

// ============================================================================
// Tabs, drawers, sliding tabs
// ============================================================================

#[test]
fn test_tab_jump_reorders_most_recent_last() {
    let (provider, _) = provider();
    let context = provider.context();
    let tabs = context
        .mount(NavigatorMount::tabs(keyed(&provider, &["feed", "messages", "profile"]), "feed").unwrap())
        .unwrap()
        .as_tab()
        .unwrap();

    tabs.jump_to_tab("messages").unwrap();
    tabs.jump_to_tab("profile").unwrap();
    tabs.jump_to_tab("feed").unwrap();

    let state = tabs.core().navigator_state().unwrap();
    assert_eq!(route_names(&state.routes), vec!["messages", "profile", "feed"]);
    assert_eq!(state.index, 2);

    assert!(!tabs.jump_to_tab("feed").unwrap());
    assert!(matches!(
        tabs.jump_to_tab("nowhere"),
        Err(NavigationError::TabNotFound { .. })
    ));
}

#[test]
fn test_sliding_tabs_focus_in_place() {
    let (provider, _) = provider();
    let context = provider.context();
    let pages = context
        .mount(
            NavigatorMount::sliding_tabs(keyed(&provider, &["feed", "messages", "profile"]), "feed")
                .unwrap(),
        )
        .unwrap()
        .as_sliding_tab()
        .unwrap();

    assert!(pages.jump_to_tab("profile").unwrap());
    assert_eq!(pages.current_index().unwrap(), 2);
    assert_eq!(route_names(&pages.pages().unwrap()), vec!["feed", "messages", "profile"]);

    assert!(matches!(
        pages.jump_to_tab("nowhere"),
        Err(NavigationError::TabNotFound { .. })
    ));
}

#[test]
fn test_drawer_items_and_toggle_handler() {
    let (provider, _) = provider();
    let context = provider.context();
    let drawer = context
        .mount(NavigatorMount::drawer(keyed(&provider, &["inbox", "settings"]), "inbox").unwrap())
        .unwrap()
        .as_drawer()
        .unwrap();

    assert!(!drawer.toggle_drawer());
    let toggles = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&toggles);
    drawer.set_toggle_handler(move || *counter.borrow_mut() += 1);
    assert!(drawer.toggle_drawer());
    assert_eq!(*toggles.borrow(), 1);

    drawer.jump_to_item("settings").unwrap();
    assert_eq!(drawer.current_route().unwrap().unwrap().route_name(), "settings");
    // Navigation state is untouched by the visual toggle.
    assert_eq!(drawer.core().routes().unwrap().len(), 2);
}

#[test]
fn test_wrong_navigator_type_errors() {
    let (provider, _) = provider();
    let context = provider.context();
    let tabs = context
        .mount(
            NavigatorMount::tabs(keyed(&provider, &["feed", "messages"]), "feed")
                .unwrap()
                .with_id("tabs"),
        )
        .unwrap();

    let err = context.get_navigator("tabs").unwrap().as_stack().err().unwrap();
    assert_eq!(
        err,
        NavigationError::WrongNavigatorType {
            uid: tabs.navigator_uid().to_string(),
            expected: NavigatorType::Stack,
            actual: NavigatorType::Tab,
        }
    );
}

// ============================================================================
// Back button
// ============================================================================

#[test]
fn test_back_button_delegates_to_parent_stack() {
    let (provider, _) = provider();
    let context = provider.context();
    let outer_routes = vec![
        context.get_route("home", Params::new()).unwrap(),
        context.get_route("detail", Params::new()).unwrap(),
    ];
    let outer = context
        .mount(NavigatorMount::stack(outer_routes))
        .unwrap()
        .as_stack()
        .unwrap();
    let thread = context.get_route("thread", Params::new()).unwrap();
    let inner = context
        .mount(NavigatorMount::stack(vec![thread]).with_parent(outer.navigator_uid()))
        .unwrap();

    assert_eq!(context.current_navigator_uid().as_deref(), Some(inner.navigator_uid()));
    // The inner stack is at its root, so the parent pops.
    assert!(provider.handle_back_press().unwrap());
    assert_eq!(outer.current_index().unwrap(), 0);
    assert_eq!(inner.core().routes().unwrap().len(), 1);
}

#[test]
fn test_back_press_with_nothing_mounted() {
    let (provider, _) = provider();
    assert!(!provider.handle_back_press().unwrap());
}

// ============================================================================
// Shared elements during a push
// ============================================================================

#[test]
fn test_shared_element_transition_between_screens() {
    let (provider, _) = provider();
    let context = provider.context();
    let shared = provider.shared_elements();

    let home = context.get_route("home", Params::new()).unwrap();
    let stack = context
        .mount(NavigatorMount::stack(vec![home.clone()]))
        .unwrap()
        .as_stack()
        .unwrap();

    let screens: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&screens);
    stack.add_route_listener(move |route| sink.borrow_mut().push(route.key().to_string()));

    shared
        .register_group("list", "photo", home.key(), &["thumb", "caption"], GroupStyle::default())
        .unwrap();
    shared
        .update_metrics("list", "thumb", ElementMetrics::new(10.0, 10.0, 40.0, 40.0))
        .unwrap();
    shared
        .update_metrics("list", "caption", ElementMetrics::new(60.0, 10.0, 100.0, 20.0))
        .unwrap();

    let detail = context.get_route("detail", Params::new()).unwrap();
    stack.push(detail.clone()).unwrap();
    assert_eq!(*screens.borrow(), vec![detail.key().to_string()]);

    shared
        .register_group("hero", "photo", detail.key(), &["thumb"], GroupStyle { crossfade: true })
        .unwrap();
    shared
        .update_metrics("hero", "thumb", ElementMetrics::new(0.0, 0.0, 320.0, 240.0))
        .unwrap();

    let from = shared.find_group("photo", home.key()).unwrap();
    let to = shared.find_group("photo", detail.key()).unwrap();
    shared.start_transition(&from.uid, &to.uid, 0.0).unwrap();
    shared.set_progress(0.5).unwrap();

    let overlay = shared.overlay().unwrap().unwrap();
    assert_eq!(overlay.elements.len(), 1);
    assert_eq!(overlay.elements[0].element_id, "thumb");

    shared.end_transition().unwrap();
    shared.unregister_group("list");
    provider.run_frame();
    assert!(shared.group("list").is_none());
}
