//! # Transition Overlay
//!
//! Turns a transition session into what the renderer draws.
//!
//! Each matched element is drawn at its incoming footprint, scaled and
//! shifted so that at progress 0 it covers the outgoing footprint:
//!
//! ```text
//! scale(p)     = lerp(from.size / to.size, 1, p)
//! translate(p) = lerp(from.center - to.center, 0, p)
//! ```
//!
//! Only elements present in both groups take part, in the outgoing group's
//! order. The rest stay with their own screen.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::Serialize;

use crate::shared_element::state::{
    ElementGroup, SharedElementState, TransitionError, TransitionSession,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElementOverlay {
    pub element_id: String,
    #[serde(skip)]
    pub from: Rect,
    #[serde(skip)]
    pub to: Rect,
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub from_opacity: f64,
    pub to_opacity: f64,
}

impl ElementOverlay {
    fn at(element_id: &str, from: Rect, to: Rect, progress: f64, crossfade: bool) -> Self {
        let start_scale = Vec2::new(ratio(from.width(), to.width()), ratio(from.height(), to.height()));
        let scale = start_scale.lerp(Vec2::new(1.0, 1.0), progress);
        let translate = (from.center() - to.center()).lerp(Vec2::ZERO, progress);
        let (from_opacity, to_opacity) = if crossfade {
            (1.0 - progress, progress)
        } else {
            (0.0, 1.0)
        };
        Self {
            element_id: element_id.to_string(),
            from,
            to,
            scale_x: scale.x,
            scale_y: scale.y,
            translate_x: translate.x,
            translate_y: translate.y,
            from_opacity,
            to_opacity,
        }
    }

    /// Transform to apply to the element laid out at `to`.
    pub fn transform(&self) -> Affine {
        let center = self.to.center().to_vec2();
        Affine::translate(center + Vec2::new(self.translate_x, self.translate_y))
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate(-center)
    }

    /// Where the element currently appears on screen.
    pub fn frame(&self) -> Rect {
        let center: Point = self.to.center() + Vec2::new(self.translate_x, self.translate_y);
        Rect::from_center_size(
            center,
            (self.to.width() * self.scale_x, self.to.height() * self.scale_y),
        )
    }
}

fn ratio(from: f64, to: f64) -> f64 {
    if to == 0.0 { 1.0 } else { from / to }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionOverlay {
    pub from_group_uid: String,
    pub to_group_uid: String,
    pub progress: f64,
    pub elements: Vec<ElementOverlay>,
}

/// Element ids present in both groups, in `from`'s order.
pub fn matching_elements<'a>(from: &'a ElementGroup, to: &ElementGroup) -> Vec<&'a str> {
    from.elements
        .iter()
        .filter(|e| to.element(&e.id).is_some())
        .map(|e| e.id.as_str())
        .collect()
}

fn group<'a>(state: &'a SharedElementState, uid: &str) -> Result<&'a ElementGroup, TransitionError> {
    state
        .group(uid)
        .ok_or_else(|| TransitionError::GroupNotFound {
            uid: uid.to_string(),
        })
}

fn measured(group: &ElementGroup, element_id: &str) -> Result<Rect, TransitionError> {
    group
        .metrics(element_id)
        .map(|m| m.rect())
        .ok_or_else(|| TransitionError::MissingMetrics {
            group_uid: group.uid.clone(),
            element_id: element_id.to_string(),
        })
}

/// Builds the overlay for `session` at `progress`.
pub fn compute_overlay(
    state: &SharedElementState,
    session: &TransitionSession,
    progress: f64,
) -> Result<TransitionOverlay, TransitionError> {
    let from = group(state, &session.from_group_uid)?;
    let to = group(state, &session.to_group_uid)?;
    let progress = progress.clamp(0.0, 1.0);

    let elements = matching_elements(from, to)
        .into_iter()
        .map(|id| {
            Ok(ElementOverlay::at(
                id,
                measured(from, id)?,
                measured(to, id)?,
                progress,
                from.style.crossfade,
            ))
        })
        .collect::<Result<Vec<_>, TransitionError>>()?;

    Ok(TransitionOverlay {
        from_group_uid: from.uid.clone(),
        to_group_uid: to.uid.clone(),
        progress,
        elements,
    })
}
