#![forbid(unsafe_code)]

//! `flowchord-core` turns a labeled rows×columns flow table into the data a circular chord layout
//! needs: row and column labels in one index space, and a symmetric (n+m)×(n+m) weight matrix.
//!
//! Rendering lives in `flowchord-render`; this crate has no geometry.

pub mod color;
pub mod config;
pub mod error;
pub mod labels;
pub mod matrix;

pub use color::{CATEGORY20B, ColorScale};
pub use config::{ChordConfig, HoverOffset, Margin, RimWidth};
pub use error::{Error, Result};
pub use labels::{LabelIndex, Role};
pub use matrix::{Cell, ExpandedMatrix, FlowMatrix, FlowTable, PreparedMatrix, prepare};
