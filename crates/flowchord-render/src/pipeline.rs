use crate::Result;
use crate::geometry::{arc_path, label_flipped, label_transform, ribbon_path};
use crate::hover::{
    HoverController, HoverState, Point, PointerContext, ribbon_opacities, tooltip_html,
};
use crate::model::ChordDiagramLayout;
use crate::scene::{
    Element, Root, Scene, SceneOp, TOOLTIP_HIDDEN_OPACITY, Tooltip, empty_scene, reconcile,
};
use crate::svg;
use flowchord_core::{ChordConfig, FlowTable};

/// A configured chord chart. Cheap to clone; rendering never mutates it.
#[derive(Debug, Clone, Default)]
pub struct ChordChart {
    config: ChordConfig,
}

impl ChordChart {
    pub fn new(config: ChordConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChordConfig {
        &self.config
    }

    pub fn layout(&self, table: &FlowTable) -> Result<ChordDiagramLayout> {
        crate::layout_chord_diagram(table, &self.config)
    }

    /// Full drawing for a layout, with every ribbon opaque.
    pub fn build_scene(&self, layout: &ChordDiagramLayout, tooltip: Tooltip) -> Scene {
        let cfg = &self.config;
        let (inner, outer) = (layout.inner_radius, layout.outer_radius);

        let rim = layout
            .groups
            .iter()
            .map(|g| {
                let color = cfg.colors.color_for(g.index);
                Element::new("path", g.index)
                    .attr("d", arc_path(inner, outer, g.start_angle, g.end_angle))
                    .style("fill", color.clone())
                    .style("stroke", color)
            })
            .collect();

        let labels: Vec<Element> = layout
            .groups
            .iter()
            .map(|g| {
                let mut el = Element::new("text", g.index)
                    .attr("class", g.role.as_str())
                    .attr("dy", ".35em");
                if label_flipped(g.angle) {
                    el = el.attr("text-anchor", "end");
                }
                let text = (g.span() > cfg.min_angle_for_label)
                    .then(|| layout.label_for(g.index).to_string());
                el.attr("transform", label_transform(g.angle, outer))
                    .text(text)
            })
            .collect();
        if !labels.is_empty() && labels.iter().all(|l| l.text.is_none()) {
            tracing::warn!(
                min_angle_for_label = cfg.min_angle_for_label,
                "every label is below the minimum angle and was suppressed"
            );
        }

        let flows = layout
            .chords
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Element::new("path", i)
                    .attr("d", ribbon_path(&c.source, &c.target, inner))
                    .style("fill", cfg.colors.color_for(c.target.index))
                    .style("opacity", "1")
            })
            .collect();

        Scene {
            root: Root {
                class: cfg.svg_class.clone(),
                width: cfg.width,
                height: cfg.height,
                translate_x: layout.center_x,
                translate_y: layout.center_y,
            },
            rim,
            labels,
            flows,
            tooltip,
        }
    }

    /// Lays out `table` and brings `surface` up to date, returning the mutations that were applied.
    ///
    /// Rendering the same data into the same surface again applies nothing. Layout errors leave the
    /// surface untouched.
    pub fn render(&self, surface: &mut Surface, table: &FlowTable) -> Result<Vec<SceneOp>> {
        let layout = self.layout(table)?;

        let mut tooltip = match &surface.scene {
            Some(scene) => scene.tooltip.clone(),
            None => Tooltip::hidden(&self.config.hover_class),
        };
        tooltip.class = self.config.hover_class.clone();
        let mut next = self.build_scene(&layout, tooltip);

        // A hover survives the render only while index `i` still names the same category on the
        // same half of the ring; otherwise the tooltip would describe something else.
        match surface.hover.hovered() {
            Some(i) if hover_survives(surface.layout.as_ref(), &layout, i) => {
                let opacity =
                    ribbon_opacities(&layout.chords, Some(i), self.config.hover_fade_opacity);
                for (el, o) in next.flows.iter_mut().zip(opacity) {
                    el.style
                        .insert("opacity".to_string(), crate::geometry::fmt(o));
                }
                next.tooltip.html = tooltip_html(&self.config, layout.label_for(i));
            }
            Some(i) => {
                tracing::trace!(index = i, "hovered group changed under re-render");
                surface.hover.reset();
                next.tooltip.opacity = TOOLTIP_HIDDEN_OPACITY;
            }
            None => {}
        }

        let ops = reconcile(surface.scene.as_ref(), &next);
        let scene = surface
            .scene
            .get_or_insert_with(|| empty_scene(next.root.clone(), next.tooltip.clone()));
        scene.apply(&ops);
        debug_assert_eq!(scene, &next);

        tracing::debug!(
            ops = ops.len(),
            groups = layout.groups.len(),
            chords = layout.chords.len(),
            "chord scene reconciled"
        );
        surface.layout = Some(layout);
        surface.config = Some(self.config.clone());
        Ok(ops)
    }
}

fn hover_survives(prev: Option<&ChordDiagramLayout>, next: &ChordDiagramLayout, i: usize) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    i < prev.groups.len()
        && i < next.groups.len()
        && prev.label_for(i) == next.label_for(i)
        && label_flipped(prev.group(i).angle) == label_flipped(next.group(i).angle)
}

/// The backing element a chart renders into: the current drawing, the overlay tooltip, and the
/// data needed to answer pointer events without recomputing the layout.
#[derive(Debug, Default)]
pub struct Surface {
    scene: Option<Scene>,
    layout: Option<ChordDiagramLayout>,
    config: Option<ChordConfig>,
    hover: HoverController,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn layout(&self) -> Option<&ChordDiagramLayout> {
        self.layout.as_ref()
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover.state()
    }

    /// Pointer entered the rim arc of group `index`. No-op before the first render.
    ///
    /// Panics if `index` is not a group of the rendered layout.
    pub fn pointer_enter(&mut self, index: usize, ctx: &PointerContext) -> Vec<SceneOp> {
        let (Some(layout), Some(config)) = (self.layout.as_ref(), self.config.as_ref()) else {
            return Vec::new();
        };
        let ops = self
            .hover
            .enter(index, layout, config, ctx)
            .to_ops(&config.hover_class);
        if let Some(scene) = self.scene.as_mut() {
            scene.apply(&ops);
        }
        ops
    }

    /// Pointer left the hovered rim arc. No-op before the first render.
    pub fn pointer_leave(&mut self) -> Vec<SceneOp> {
        let (Some(layout), Some(config)) = (self.layout.as_ref(), self.config.as_ref()) else {
            return Vec::new();
        };
        let ops = self.hover.leave(layout).to_ops(&config.hover_class);
        if let Some(scene) = self.scene.as_mut() {
            scene.apply(&ops);
        }
        ops
    }

    /// Pointer moved to `canvas` (SVG coordinates). Hit-tests the rim and emits leave/enter
    /// transitions when the group under the pointer changes.
    pub fn pointer_move(&mut self, canvas: Point, ctx: &PointerContext) -> Vec<SceneOp> {
        let Some(layout) = self.layout.as_ref() else {
            return Vec::new();
        };
        let hit = layout.group_at_canvas(canvas.x, canvas.y);
        let hovered = self.hover.hovered();
        if hit == hovered {
            return Vec::new();
        }
        let mut ops = Vec::new();
        if hovered.is_some() {
            ops.extend(self.pointer_leave());
        }
        if let Some(index) = hit {
            ops.extend(self.pointer_enter(index, ctx));
        }
        ops
    }

    pub fn to_svg(&self) -> Option<String> {
        self.scene.as_ref().map(svg::render_svg)
    }

    pub fn to_html(&self) -> Option<String> {
        self.scene.as_ref().map(svg::render_html)
    }
}
