//! Pointer hover handling: ribbon fading and tooltip placement.

use crate::model::{Chord, ChordDiagramLayout};
use crate::scene::{Layer, SceneOp, TOOLTIP_HIDDEN_OPACITY, Tooltip};
use flowchord_core::{ChordConfig, HoverOffset};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Smallest distance kept between the tooltip and the top of the viewport.
pub const TOOLTIP_MIN_TOP: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "lowercase")]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where the pointer is and how much room the tooltip has.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerContext {
    /// Pointer position in page coordinates (the tooltip's coordinate space).
    pub page: Point,
    pub viewport: Size,
    /// Rendered size of the tooltip element.
    pub tooltip: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub html: String,
    pub top: f64,
    pub left: f64,
}

/// Outcome of a hover transition, before it is turned into scene ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverEffect {
    pub state: HoverState,
    /// Target opacity per ribbon, in chord order.
    pub ribbon_opacity: Vec<f64>,
    /// `Some` when the tooltip is shown, `None` when it fades out.
    pub tooltip: Option<TooltipPlacement>,
}

impl HoverEffect {
    pub fn to_ops(&self, hover_class: &str) -> Vec<SceneOp> {
        let mut ops: Vec<SceneOp> = self
            .ribbon_opacity
            .iter()
            .enumerate()
            .map(|(key, &opacity)| SceneOp::SetOpacity {
                layer: Layer::Flows,
                key,
                opacity,
                transition: true,
            })
            .collect();
        match &self.tooltip {
            Some(t) => {
                ops.push(SceneOp::SetTooltip(Tooltip {
                    class: hover_class.to_string(),
                    html: t.html.clone(),
                    top: t.top,
                    left: t.left,
                    visible: true,
                    opacity: TOOLTIP_HIDDEN_OPACITY,
                }));
                ops.push(SceneOp::FadeTooltip { opacity: 1.0 });
            }
            None => ops.push(SceneOp::FadeTooltip {
                opacity: TOOLTIP_HIDDEN_OPACITY,
            }),
        }
        ops
    }
}

/// Ribbon opacities with `hovered` highlighted; every ribbon is opaque when nothing is hovered.
pub fn ribbon_opacities(chords: &[Chord], hovered: Option<usize>, faded: f64) -> Vec<f64> {
    chords
        .iter()
        .map(|c| match hovered {
            Some(i) if !c.touches(i) => faded,
            _ => 1.0,
        })
        .collect()
}

/// Tooltip HTML for a label: the configured entry, or the label itself when there is none.
pub fn tooltip_html(config: &ChordConfig, label: &str) -> String {
    match config.hover_html.get(label) {
        Some(html) if !html.is_empty() => html.clone(),
        _ => label.to_string(),
    }
}

/// Tooltip top-left corner for a pointer over a group whose midpoint is at `angle`.
///
/// Vertically the box sits `offset.top` above the pointer, kept inside
/// `[5, viewport.height - tooltip.height]`. Horizontally it goes right of the pointer on the right
/// half of the ring and left of it on the left half.
pub fn tooltip_position(
    ctx: &PointerContext,
    offset: HoverOffset,
    angle: f64,
) -> (f64, f64) {
    let max_top = (ctx.viewport.height - ctx.tooltip.height).max(TOOLTIP_MIN_TOP);
    let top = (ctx.page.y - offset.top).min(max_top).max(TOOLTIP_MIN_TOP);
    let left = if angle > PI {
        ctx.page.x - ctx.tooltip.width - offset.left
    } else {
        ctx.page.x + offset.left
    };
    (top, left)
}

/// Two-state hover machine: `Idle` and `Hovering(index)`.
#[derive(Debug, Clone, Default)]
pub struct HoverController {
    state: HoverState,
}

impl HoverController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn hovered(&self) -> Option<usize> {
        match self.state {
            HoverState::Idle => None,
            HoverState::Hovering(i) => Some(i),
        }
    }

    /// Pointer entered group `index`. Valid from either state; the result does not depend on what
    /// was hovered before.
    ///
    /// Panics if `index` is not a group of `layout`.
    pub fn enter(
        &mut self,
        index: usize,
        layout: &ChordDiagramLayout,
        config: &ChordConfig,
        ctx: &PointerContext,
    ) -> HoverEffect {
        let label = layout.label_for(index);
        let group = layout.group(index);
        let (top, left) = tooltip_position(ctx, config.hover_offset, group.angle);
        tracing::trace!(index, label, previous = ?self.state, "hover enter");

        self.state = HoverState::Hovering(index);
        HoverEffect {
            state: self.state,
            ribbon_opacity: ribbon_opacities(
                &layout.chords,
                Some(index),
                config.hover_fade_opacity,
            ),
            tooltip: Some(TooltipPlacement {
                html: tooltip_html(config, label),
                top,
                left,
            }),
        }
    }

    pub fn leave(&mut self, layout: &ChordDiagramLayout) -> HoverEffect {
        tracing::trace!(previous = ?self.state, "hover leave");
        self.state = HoverState::Idle;
        HoverEffect {
            state: self.state,
            ribbon_opacity: ribbon_opacities(&layout.chords, None, 1.0),
            tooltip: None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.state = HoverState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(x: f64, y: f64) -> PointerContext {
        PointerContext {
            page: Point::new(x, y),
            viewport: Size::new(800.0, 600.0),
            tooltip: Size::new(120.0, 40.0),
        }
    }

    #[test]
    fn tooltip_goes_right_on_the_right_half() {
        let (top, left) = tooltip_position(&ctx(300.0, 200.0), HoverOffset::default(), 1.0);
        assert_eq!((top, left), (140.0, 350.0));
    }

    #[test]
    fn tooltip_goes_left_on_the_left_half() {
        let (_, left) = tooltip_position(&ctx(300.0, 200.0), HoverOffset::default(), PI + 0.1);
        assert_eq!(left, 300.0 - 120.0 - 50.0);
    }

    #[test]
    fn angle_exactly_pi_counts_as_right_half() {
        let (_, left) = tooltip_position(&ctx(300.0, 200.0), HoverOffset::default(), PI);
        assert_eq!(left, 350.0);
    }

    #[test]
    fn tooltip_top_is_clamped_to_the_viewport() {
        let (top, _) = tooltip_position(&ctx(10.0, 20.0), HoverOffset::default(), 0.0);
        assert_eq!(top, TOOLTIP_MIN_TOP);
        let (top, _) = tooltip_position(&ctx(10.0, 2000.0), HoverOffset::default(), 0.0);
        assert_eq!(top, 560.0);
    }

    #[test]
    fn tiny_viewport_still_keeps_the_minimum_top() {
        let mut c = ctx(10.0, 300.0);
        c.viewport = Size::new(100.0, 20.0);
        let (top, _) = tooltip_position(&c, HoverOffset::default(), 0.0);
        assert_eq!(top, TOOLTIP_MIN_TOP);
    }
}
