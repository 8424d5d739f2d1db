#![forbid(unsafe_code)]

//! `flowchord` renders bipartite flow matrices (rows × columns of weights) as circular chord
//! diagrams, headless.
//!
//! # Features
//!
//! - `render`: layout, hover handling and SVG/HTML output (`flowchord::render`)
//! - `raster`: PNG output via pure-Rust SVG rasterization

pub use flowchord_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use flowchord_render::hover::{HoverEffect, HoverState, Point, PointerContext, Size};
    pub use flowchord_render::model::{Chord, ChordDiagramLayout, ChordEnd, Group};
    pub use flowchord_render::scene::{Layer, Scene, SceneOp, Tooltip};
    pub use flowchord_render::{
        ChordChart, Error as RenderError, Surface, layout_chord_diagram, layout_to_json,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Input(#[from] flowchord_core::Error),
        #[error(transparent)]
        Render(#[from] flowchord_render::Error),
        #[error("render produced no scene")]
        EmptySurface,
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Renders `table` into a fresh surface.
    pub fn render_surface_sync(
        table: &flowchord_core::FlowTable,
        config: &flowchord_core::ChordConfig,
    ) -> Result<Surface> {
        let mut surface = Surface::new();
        ChordChart::new(config.clone()).render(&mut surface, table)?;
        Ok(surface)
    }

    /// Synchronous SVG render helper.
    pub fn render_svg_sync(
        table: &flowchord_core::FlowTable,
        config: &flowchord_core::ChordConfig,
    ) -> Result<String> {
        render_surface_sync(table, config)?
            .to_svg()
            .ok_or(HeadlessError::EmptySurface)
    }

    /// Tooltip overlay plus SVG, ready to drop into a page.
    pub fn render_html_sync(
        table: &flowchord_core::FlowTable,
        config: &flowchord_core::ChordConfig,
    ) -> Result<String> {
        render_surface_sync(table, config)?
            .to_html()
            .ok_or(HeadlessError::EmptySurface)
    }

    /// Parses a JSON flow table and renders it as SVG.
    pub fn render_json_svg_sync(
        json: &str,
        config: &flowchord_core::ChordConfig,
    ) -> Result<String> {
        let table = flowchord_core::FlowTable::from_json_str(json)?;
        render_svg_sync(&table, config)
    }
}
