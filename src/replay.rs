//! # Replay
//!
//! Runs a scripted navigation session and leaves the final state behind for
//! inspection. Used by `navkit replay` and by integration tests.
//!
//! ```toml
//! [[routes]]
//! name = "home"
//! title = "Home"
//!
//! [[steps]]
//! op = "mount"
//! navigator = "main"
//! kind = "stack"
//! routes = ["home"]
//!
//! [[steps]]
//! op = "push"
//! navigator = "main"
//! route = "detail"
//! params = { id = 7 }
//! ```
//!
//! Navigators are addressed by their logical id. Steps go through the same
//! controllers an app would use. The clock moves one debounce window per
//! step and a frame is flushed after each one, so scripted taps never get
//! swallowed.

use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use log::{debug, info};
use serde::Deserialize;

use crate::context::{NavigationContext, NavigatorHandle, NavigatorMount};
use crate::core::config::NavigationSettings;
use crate::core::error::NavigationError;
use crate::core::params::Params;
use crate::core::route::{Route, RouteComponent, RouteConfig};
use crate::core::state::{Alert, AlertStyle, NavigatorType};
use crate::provider::NavigationProvider;
use crate::router::{RouteDefinition, RouteDescriptor, RouteTable, Router};
use crate::scheduler::{FrameScheduler, ManualClock};

type JsonMap = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Script
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RouteSpec {
    pub name: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Mount {
        navigator: String,
        kind: NavigatorType,
        routes: Vec<String>,
        /// Initially focused tab or item. Defaults to the first one.
        initial: Option<String>,
        parent: Option<String>,
        /// Tab of `parent` this navigator is mounted in.
        tab: Option<String>,
    },
    Unmount {
        navigator: String,
    },
    Push {
        navigator: String,
        route: String,
        #[serde(default)]
        params: JsonMap,
    },
    Pop {
        navigator: String,
    },
    PopToTop {
        navigator: String,
    },
    Reset {
        navigator: String,
        routes: Vec<String>,
        index: Option<usize>,
    },
    UpdateParams {
        navigator: String,
        params: JsonMap,
    },
    JumpToTab {
        navigator: String,
        tab: String,
    },
    JumpToItem {
        navigator: String,
        item: String,
    },
    GoBack,
    ShowAlert {
        navigator: String,
        message: String,
        #[serde(default)]
        style: AlertStyle,
    },
    HideAlert {
        navigator: String,
    },
}

impl Step {
    fn op(&self) -> &'static str {
        match self {
            Step::Mount { .. } => "mount",
            Step::Unmount { .. } => "unmount",
            Step::Push { .. } => "push",
            Step::Pop { .. } => "pop",
            Step::PopToTop { .. } => "pop_to_top",
            Step::Reset { .. } => "reset",
            Step::UpdateParams { .. } => "update_params",
            Step::JumpToTab { .. } => "jump_to_tab",
            Step::JumpToItem { .. } => "jump_to_item",
            Step::GoBack => "go_back",
            Step::ShowAlert { .. } => "show_alert",
            Step::HideAlert { .. } => "hide_alert",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ReplayError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// A step failed. `step` is 1-based.
    Step {
        step: usize,
        op: &'static str,
        source: NavigationError,
    },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Io(e) => write!(f, "script I/O error: {e}"),
            ReplayError::Parse(e) => write!(f, "script parse error: {e}"),
            ReplayError::Step { step, op, source } => {
                write!(f, "step {step} ({op}) failed: {source}")
            }
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Io(e) => Some(e),
            ReplayError::Parse(e) => Some(e),
            ReplayError::Step { source, .. } => Some(source),
        }
    }
}

pub fn parse_script(contents: &str) -> Result<ReplayScript, ReplayError> {
    toml::from_str(contents).map_err(ReplayError::Parse)
}

pub fn load_script(path: &Path) -> Result<ReplayScript, ReplayError> {
    let contents = fs::read_to_string(path).map_err(ReplayError::Io)?;
    let script = parse_script(&contents)?;
    info!(
        "Loaded script {} ({} routes, {} steps)",
        path.display(),
        script.routes.len(),
        script.steps.len()
    );
    Ok(script)
}

// ============================================================================
// Router
// ============================================================================

struct ScriptScreen {
    name: String,
}

impl RouteComponent for ScriptScreen {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A router whose routes render placeholder screens titled per the script.
pub fn script_router(routes: &[RouteSpec]) -> Router {
    let routes = routes.to_vec();
    Router::new(move || {
        routes
            .into_iter()
            .map(|spec| {
                let screen_name = spec.name.clone();
                let mut descriptor = RouteDescriptor::new(move |_| {
                    Rc::new(ScriptScreen {
                        name: screen_name.clone(),
                    }) as Rc<dyn RouteComponent>
                });
                if let Some(title) = spec.title {
                    descriptor = descriptor.with_config(RouteConfig::default().with_title(title.as_str()));
                }
                (spec.name, RouteDefinition::Descriptor(descriptor))
            })
            .collect::<RouteTable>()
    })
}

// ============================================================================
// Running
// ============================================================================

pub struct ReplayOutcome {
    pub provider: NavigationProvider,
    /// 1-based indices of the steps that changed the navigation state.
    pub changed_steps: Vec<usize>,
}

pub fn replay(script: &ReplayScript, settings: NavigationSettings) -> Result<ReplayOutcome, ReplayError> {
    let clock = Rc::new(ManualClock::new());
    let window = settings.debounce_window;
    let provider = NavigationProvider::with_runtime(
        script_router(&script.routes),
        settings,
        FrameScheduler::new(),
        clock.clone(),
    );

    let mut changed_steps = Vec::new();
    for (i, step) in script.steps.iter().enumerate() {
        let number = i + 1;
        let changed = run_step(&provider, step).map_err(|source| ReplayError::Step {
            step: number,
            op: step.op(),
            source,
        })?;
        debug!("Step {number} ({}) changed = {changed}", step.op());
        if changed {
            changed_steps.push(number);
        }
        provider.run_frame();
        clock.advance(window);
    }

    info!(
        "Replayed {} steps, {} changed the state",
        script.steps.len(),
        changed_steps.len()
    );
    Ok(ReplayOutcome {
        provider,
        changed_steps,
    })
}

fn run_step(provider: &NavigationProvider, step: &Step) -> Result<bool, NavigationError> {
    let context = provider.context();
    match step {
        Step::Mount {
            navigator,
            kind,
            routes,
            initial,
            parent,
            tab,
        } => {
            let mut mount = build_mount(context, *kind, routes, initial.as_deref())?.with_id(navigator);
            if let Some(parent) = parent {
                let parent_uid = context.get_navigator(parent)?.navigator_uid().to_string();
                mount = match tab {
                    Some(tab) => mount.in_tab(parent_uid, tab),
                    None => mount.with_parent(parent_uid),
                };
            }
            context.mount(mount)?;
            Ok(true)
        }
        Step::Unmount { navigator } => {
            let uid = context.get_navigator(navigator)?.navigator_uid().to_string();
            context.unmount(&uid)
        }
        Step::Push {
            navigator,
            route,
            params,
        } => context
            .get_navigator(navigator)?
            .as_stack()?
            .push_route(route, Params::from(params.clone())),
        Step::Pop { navigator } => context.get_navigator(navigator)?.as_stack()?.pop(),
        Step::PopToTop { navigator } => context.get_navigator(navigator)?.as_stack()?.pop_to_top(),
        Step::Reset {
            navigator,
            routes,
            index,
        } => {
            let routes = routes
                .iter()
                .map(|name| context.get_route(name, Params::new()))
                .collect::<Result<Vec<_>, _>>()?;
            let index = index.unwrap_or(routes.len().saturating_sub(1));
            context
                .get_navigator(navigator)?
                .as_stack()?
                .immediately_reset_stack(routes, index)
        }
        Step::UpdateParams { navigator, params } => context
            .get_navigator(navigator)?
            .as_stack()?
            .update_current_route_params(Params::from(params.clone())),
        Step::JumpToTab { navigator, tab } => match context.get_navigator(navigator)? {
            NavigatorHandle::SlidingTab(sliding) => sliding.jump_to_tab(tab),
            other => other.as_tab()?.jump_to_tab(tab),
        },
        Step::JumpToItem { navigator, item } => {
            context.get_navigator(navigator)?.as_drawer()?.jump_to_item(item)
        }
        Step::GoBack => provider.handle_back_press(),
        Step::ShowAlert {
            navigator,
            message,
            style,
        } => {
            let alert = Alert {
                message: message.clone(),
                style: style.clone(),
            };
            context.get_navigator(navigator)?.core().show_local_alert(alert)
        }
        Step::HideAlert { navigator } => context.get_navigator(navigator)?.core().hide_local_alert(),
    }
}

fn build_mount(
    context: &NavigationContext,
    kind: NavigatorType,
    names: &[String],
    initial: Option<&str>,
) -> Result<NavigatorMount, NavigationError> {
    if kind == NavigatorType::Stack {
        let routes = names
            .iter()
            .map(|name| context.get_route(name, Params::new()))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(NavigatorMount::stack(routes));
    }

    // Tabs and items are keyed by their route name.
    let items = names
        .iter()
        .map(|name| context.router().get_route_with_key(name.as_str(), name, Params::new()))
        .collect::<Result<Vec<Route>, _>>()?;
    let initial = initial
        .map(str::to_string)
        .or_else(|| names.first().cloned())
        .unwrap_or_default();
    match kind {
        NavigatorType::Tab => NavigatorMount::tabs(items, &initial),
        NavigatorType::Drawer => NavigatorMount::drawer(items, &initial),
        NavigatorType::SlidingTab => NavigatorMount::sliding_tabs(items, &initial),
        NavigatorType::Stack => Ok(NavigatorMount::stack(items)),
    }
}
