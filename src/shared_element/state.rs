//! Element groups and the transition session.

use std::collections::BTreeMap;
use std::fmt;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Layout of one element in window coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementMetrics {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementMetrics {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.width, self.height))
    }
}

impl From<Rect> for ElementMetrics {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStyle {
    /// Fade the outgoing elements out while the incoming ones fade in.
    #[serde(default)]
    pub crossfade: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SharedElement {
    pub id: String,
    /// `None` until the element has been laid out.
    pub metrics: Option<ElementMetrics>,
}

/// The shared elements of one screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElementGroup {
    pub uid: String,
    /// Shared between the screens that transition into each other.
    pub id: String,
    pub route_key: String,
    /// Registration order.
    pub elements: Vec<SharedElement>,
    pub style: GroupStyle,
}

impl ElementGroup {
    pub fn element(&self, element_id: &str) -> Option<&SharedElement> {
        self.elements.iter().find(|e| e.id == element_id)
    }

    pub fn metrics(&self, element_id: &str) -> Option<ElementMetrics> {
        self.element(element_id).and_then(|e| e.metrics)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionSession {
    pub from_group_uid: String,
    pub to_group_uid: String,
    /// 0.0 at the outgoing layout, 1.0 at the incoming one.
    pub progress: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SharedElementState {
    pub groups: BTreeMap<String, ElementGroup>,
    pub transition: Option<TransitionSession>,
}

impl SharedElementState {
    pub fn group(&self, uid: &str) -> Option<&ElementGroup> {
        self.groups.get(uid)
    }

    /// The group with semantic id `id` registered by route `route_key`.
    pub fn find_group(&self, id: &str, route_key: &str) -> Option<&ElementGroup> {
        self.groups
            .values()
            .find(|g| g.id == id && g.route_key == route_key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionError {
    GroupNotFound { uid: String },
    MissingMetrics { group_uid: String, element_id: String },
    NoActiveTransition,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::GroupNotFound { uid } => {
                write!(f, "No shared element group with uid {uid}")
            }
            TransitionError::MissingMetrics {
                group_uid,
                element_id,
            } => write!(
                f,
                "Element {element_id} in group {group_uid} has not been measured yet"
            ),
            TransitionError::NoActiveTransition => write!(f, "No shared element transition is running"),
        }
    }
}

impl std::error::Error for TransitionError {}
