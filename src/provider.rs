//! # Navigation Provider
//!
//! The top-level owner an app creates once. It wires the navigation context,
//! the shared-element coordinator, and the back-button manager onto one frame
//! scheduler and one clock.
//!
//! ```text
//! host event loop
//!   ├── vsync       → provider.run_frame()
//!   ├── back press  → provider.handle_back_press()  (false = exit the app)
//!   └── render      → provider.context().state(), shared_elements().overlay()
//! ```

use std::rc::Rc;

use log::info;

use crate::context::{BackButtonManager, NavigationContext};
use crate::core::config::{NavigationSettings, ResolvedConfig};
use crate::core::error::Result;
use crate::router::Router;
use crate::scheduler::{Clock, FrameScheduler, SystemClock};
use crate::shared_element::SharedElementCoordinator;

pub struct NavigationProvider {
    context: NavigationContext,
    shared_elements: SharedElementCoordinator,
    back_button: BackButtonManager,
    frames: FrameScheduler,
}

impl NavigationProvider {
    pub fn new(router: Router, settings: NavigationSettings) -> Self {
        Self::with_runtime(router, settings, FrameScheduler::new(), Rc::new(SystemClock))
    }

    pub fn from_config(router: Router, config: &ResolvedConfig) -> Self {
        Self::new(router, config.navigation.clone())
    }

    pub fn with_runtime(
        router: Router,
        settings: NavigationSettings,
        frames: FrameScheduler,
        clock: Rc<dyn Clock>,
    ) -> Self {
        info!(
            "Navigation provider starting (debounce {}ms)",
            settings.debounce_window.as_millis()
        );
        let context = NavigationContext::with_runtime(router, settings, frames.clone(), clock);
        let back_button = BackButtonManager::new(&context);
        Self {
            shared_elements: SharedElementCoordinator::new(frames.clone()),
            context,
            back_button,
            frames,
        }
    }

    pub fn context(&self) -> &NavigationContext {
        &self.context
    }

    pub fn shared_elements(&self) -> &SharedElementCoordinator {
        &self.shared_elements
    }

    pub fn back_button(&self) -> &BackButtonManager {
        &self.back_button
    }

    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    /// Flushes work deferred to the next frame.
    pub fn run_frame(&self) -> usize {
        self.frames.run_frame()
    }

    /// Returns false when nothing handled the press and the app should exit.
    pub fn handle_back_press(&self) -> Result<bool> {
        self.back_button.handle_back_press()
    }

    /// The current navigation state as JSON.
    pub fn snapshot_json(&self, pretty: bool) -> serde_json::Result<String> {
        let state = self.context.state();
        if pretty {
            serde_json::to_string_pretty(&*state)
        } else {
            serde_json::to_string(&*state)
        }
    }
}
