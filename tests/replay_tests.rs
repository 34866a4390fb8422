use std::fs;
use std::path::PathBuf;

use navkit::core::config::NavigationSettings;
use navkit::replay::{ReplayError, load_script, parse_script, replay};
use navkit::{NavigationError, NavigatorType};

// ============================================================================
// Helper Functions
// ============================================================================

const TABS_SCRIPT: &str = r##"
[[routes]]
name = "feed"
title = "Feed"

[[routes]]
name = "messages"
title = "Messages"

[[routes]]
name = "inbox"
title = "Inbox"

[[routes]]
name = "thread"

[[steps]]
op = "mount"
navigator = "tabs"
kind = "tab"
routes = ["feed", "messages"]

[[steps]]
op = "jump_to_tab"
navigator = "tabs"
tab = "messages"

[[steps]]
op = "mount"
navigator = "inbox"
kind = "stack"
routes = ["inbox"]
parent = "tabs"
tab = "messages"

[[steps]]
op = "push"
navigator = "inbox"
route = "thread"
params = { id = 42, unread = true }

[[steps]]
op = "jump_to_tab"
navigator = "tabs"
tab = "feed"

[[steps]]
op = "jump_to_tab"
navigator = "tabs"
tab = "messages"

[[steps]]
op = "show_alert"
navigator = "inbox"
message = "Sent"
style = { background_color = "#0a0" }

[[steps]]
op = "go_back"

[[steps]]
op = "go_back"
"##;

fn temp_script(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("navkit-replay-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_tabs_with_nested_stack() {
    let script = parse_script(TABS_SCRIPT).unwrap();
    let outcome = replay(&script, NavigationSettings::default()).unwrap();
    let context = outcome.provider.context();

    let tabs = context.get_navigator("tabs").unwrap();
    let inbox = context.get_navigator("inbox").unwrap();
    assert_eq!(tabs.navigator_type(), NavigatorType::Tab);

    let state = context.state();
    assert_eq!(state.current_navigator_uid.as_deref(), Some(inbox.navigator_uid()));
    assert_eq!(
        state.navigator(inbox.navigator_uid()).unwrap().parent_navigator_uid.as_deref(),
        Some(tabs.navigator_uid())
    );

    // The first go_back popped the thread. The second found the inbox at its
    // root and popped the tab history instead.
    assert_eq!(state.navigator(inbox.navigator_uid()).unwrap().routes.len(), 1);
    let tab_keys: Vec<&str> = state
        .navigator(tabs.navigator_uid())
        .unwrap()
        .routes
        .iter()
        .map(|r| r.key())
        .collect();
    assert_eq!(tab_keys, vec!["feed"]);

    assert_eq!(state.alerts[inbox.navigator_uid()].message, "Sent");
    assert_eq!(
        state.alerts[inbox.navigator_uid()].style.background_color.as_deref(),
        Some("#0a0")
    );
    assert_eq!(outcome.changed_steps, (1..=9).collect::<Vec<_>>());
}

#[test]
fn test_snapshot_json_from_file() {
    let path = temp_script("stack.toml", r#"
[[routes]]
name = "home"
title = "Home"

[[routes]]
name = "detail"

[[steps]]
op = "mount"
navigator = "main"
kind = "stack"
routes = ["home"]

[[steps]]
op = "push"
navigator = "main"
route = "detail"
params = { id = 3 }

[[steps]]
op = "update_params"
navigator = "main"
params = { id = 4 }
"#);

    let script = load_script(&path).unwrap();
    let outcome = replay(&script, NavigationSettings::default()).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&outcome.provider.snapshot_json(true).unwrap()).unwrap();

    let current = json["current_navigator_uid"].as_str().unwrap();
    let navigator = &json["navigators"][current];
    assert_eq!(navigator["index"], 1);
    assert_eq!(navigator["routes"][0]["config"]["navigation_bar"]["title"], "Home");
    assert_eq!(navigator["routes"][1]["route_name"], "detail");
    assert_eq!(navigator["routes"][1]["params"]["id"], 4.0);
    assert!(json["focus_restore_stack"].as_array().unwrap().is_empty());

    fs::remove_file(&path).ok();
}

#[test]
fn test_sliding_tabs_and_drawer_script() {
    let script = parse_script(
        r#"
[[routes]]
name = "a"

[[routes]]
name = "b"

[[routes]]
name = "c"

[[steps]]
op = "mount"
navigator = "pages"
kind = "sliding_tab"
routes = ["a", "b", "c"]
initial = "b"

[[steps]]
op = "jump_to_tab"
navigator = "pages"
tab = "c"

[[steps]]
op = "mount"
navigator = "menu"
kind = "drawer"
routes = ["a", "b"]

[[steps]]
op = "jump_to_item"
navigator = "menu"
item = "b"

[[steps]]
op = "jump_to_item"
navigator = "menu"
item = "b"
"#,
    )
    .unwrap();
    let outcome = replay(&script, NavigationSettings::default()).unwrap();
    let context = outcome.provider.context();

    let pages = context.get_navigator("pages").unwrap().as_sliding_tab().unwrap();
    assert_eq!(pages.current_index().unwrap(), 2);
    let menu = context.get_navigator("menu").unwrap().as_drawer().unwrap();
    assert_eq!(menu.current_route().unwrap().unwrap().key(), "b");
    assert_eq!(outcome.changed_steps, vec![1, 2, 3, 4]);
}

#[test]
fn test_unknown_route_fails_the_step() {
    let script = parse_script(
        r#"
[[routes]]
name = "home"

[[steps]]
op = "mount"
navigator = "main"
kind = "stack"
routes = ["home"]

[[steps]]
op = "push"
navigator = "main"
route = "missing"
"#,
    )
    .unwrap();
    match replay(&script, NavigationSettings::default()) {
        Err(ReplayError::Step { step, op, source }) => {
            assert_eq!(step, 2);
            assert_eq!(op, "push");
            assert_eq!(
                source,
                NavigationError::RouteNotFound {
                    route_name: "missing".to_string()
                }
            );
        }
        Err(other) => panic!("Expected a step error, got {other}"),
        Ok(_) => panic!("Expected the push to fail"),
    }
}

#[test]
fn test_missing_script_file() {
    let err = load_script(&std::env::temp_dir().join("navkit-no-such-script.toml"))
        .err()
        .unwrap();
    assert!(matches!(err, ReplayError::Io(_)));
}
