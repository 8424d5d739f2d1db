#![forbid(unsafe_code)]

//! Headless chord diagram rendering: circular layout over a prepared flow matrix, a retained
//! [`scene::Scene`] reconciled into a [`pipeline::Surface`], hover handling and SVG output.

pub mod adapter;
pub mod geometry;
pub mod hover;
pub mod model;
pub mod pipeline;
pub mod scene;
pub mod svg;

pub use hover::{HoverController, HoverEffect, HoverState, Point, PointerContext, Size};
pub use model::{Chord, ChordDiagramLayout, ChordEnd, Group};
pub use pipeline::{ChordChart, Surface};
pub use scene::{Element, Layer, Scene, SceneOp, Tooltip, reconcile};

use flowchord_core::{ChordConfig, FlowTable};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] flowchord_core::Error),
    #[error("chord layout error: {0}")]
    Layout(#[from] flowchord_layout::Error),
    #[error("canvas {width}x{height} leaves no room for the ring inside the margins")]
    NoRoom { width: f64, height: f64 },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn layout_chord_diagram(table: &FlowTable, config: &ChordConfig) -> Result<ChordDiagramLayout> {
    let outer_radius = config.outer_radius();
    if !outer_radius.is_finite() || outer_radius <= 0.0 {
        return Err(Error::NoRoom {
            width: config.width,
            height: config.height,
        });
    }
    let inner_radius = config.inner_radius().clamp(0.0, outer_radius);

    let prepared = flowchord_core::prepare(table, config.flip)?;
    if prepared.flow.total() == 0.0 {
        tracing::warn!("flow matrix carries no weight; every group collapses to zero width");
    }
    let (groups, chords) =
        adapter::run_layout(&prepared.expanded, &prepared.labels, config.arc_padding)?;
    tracing::debug!(
        groups = groups.len(),
        chords = chords.len(),
        outer_radius,
        inner_radius,
        "chord layout ready"
    );

    let margin = config.margin;
    Ok(ChordDiagramLayout {
        width: config.width,
        height: config.height,
        center_x: (config.width + margin.left - margin.right) / 2.0,
        center_y: (config.height + margin.top - margin.bottom) / 2.0,
        outer_radius,
        inner_radius,
        labels: prepared.labels,
        groups,
        chords,
    })
}

/// Serializes a layout as JSON, the shape the CLI prints.
pub fn layout_to_json(layout: &ChordDiagramLayout, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    })
}
