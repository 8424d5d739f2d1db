//! Chart configuration: an immutable value rebuilt by `with_*` calls.

use crate::color::ColorScale;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Border reserved around the ring, mostly for labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(50.0)
    }
}

/// Tooltip offset from the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverOffset {
    pub top: f64,
    pub left: f64,
}

impl Default for HoverOffset {
    fn default() -> Self {
        Self {
            top: 60.0,
            left: 50.0,
        }
    }
}

type RimFn = dyn Fn(f64) -> f64 + Send + Sync;

/// Thickness of the outer ring.
#[derive(Clone)]
pub enum RimWidth {
    Fixed(f64),
    /// Fraction of the outer radius.
    Fraction(f64),
    Custom(Arc<RimFn>),
}

impl RimWidth {
    pub fn from_fn(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn resolve(&self, outer_radius: f64) -> f64 {
        match self {
            RimWidth::Fixed(px) => *px,
            RimWidth::Fraction(f) => outer_radius * f,
            RimWidth::Custom(f) => f(outer_radius),
        }
    }
}

impl Default for RimWidth {
    fn default() -> Self {
        Self::Fraction(0.1)
    }
}

impl fmt::Debug for RimWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RimWidth::Fixed(px) => f.debug_tuple("Fixed").field(px).finish(),
            RimWidth::Fraction(v) => f.debug_tuple("Fraction").field(v).finish(),
            RimWidth::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChordConfig {
    pub margin: Margin,
    pub width: f64,
    pub height: f64,
    pub arc_padding: f64,
    pub flip: bool,
    pub hover_fade_opacity: f64,
    pub colors: ColorScale,
    pub rim_width: RimWidth,
    /// Tooltip HTML keyed by label text (row and column labels share one namespace).
    pub hover_html: IndexMap<String, String>,
    pub hover_offset: HoverOffset,
    pub svg_class: String,
    pub hover_class: String,
    pub min_angle_for_label: f64,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            width: 960.0,
            height: 500.0,
            arc_padding: 0.0,
            flip: false,
            hover_fade_opacity: 0.2,
            colors: ColorScale::default(),
            rim_width: RimWidth::default(),
            hover_html: IndexMap::new(),
            hover_offset: HoverOffset::default(),
            svg_class: "chord-diagram".to_string(),
            hover_class: "chord-hover".to_string(),
            min_angle_for_label: 0.0,
        }
    }
}

impl ChordConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_arc_padding(mut self, padding: f64) -> Self {
        self.arc_padding = padding;
        self
    }

    /// Transposes the input before plotting.
    pub fn flipped(self) -> Self {
        self.with_flip(true)
    }

    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn with_hover_fade_opacity(mut self, opacity: f64) -> Self {
        self.hover_fade_opacity = opacity;
        self
    }

    pub fn with_colors(mut self, colors: ColorScale) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_rim_width(mut self, rim_width: RimWidth) -> Self {
        self.rim_width = rim_width;
        self
    }

    pub fn with_hover_html<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.hover_html = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_hover_offset(mut self, offset: HoverOffset) -> Self {
        self.hover_offset = offset;
        self
    }

    pub fn with_svg_class(mut self, class: impl Into<String>) -> Self {
        self.svg_class = class.into();
        self
    }

    pub fn with_hover_class(mut self, class: impl Into<String>) -> Self {
        self.hover_class = class.into();
        self
    }

    pub fn with_min_angle_for_label(mut self, angle: f64) -> Self {
        self.min_angle_for_label = angle;
        self
    }

    /// Outer ring radius for the configured canvas and margins.
    pub fn outer_radius(&self) -> f64 {
        let w = self.width - self.margin.left - self.margin.right;
        let h = self.height - self.margin.top - self.margin.bottom;
        w.min(h) / 2.0
    }

    pub fn inner_radius(&self) -> f64 {
        let outer = self.outer_radius();
        outer - self.rim_width.resolve(outer)
    }

    /// Applies a JSON object of camelCase options (`{"width": 600, "margin": {"top": 10}}`) on
    /// top of this configuration. Keys not present keep their current value.
    pub fn merge_json(&self, value: &Value) -> Result<Self> {
        let patch = ConfigPatch::deserialize(value).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        patch.apply(self.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SidesPatch {
    top: Option<f64>,
    right: Option<f64>,
    bottom: Option<f64>,
    left: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
struct ConfigPatch {
    margin: Option<SidesPatch>,
    width: Option<f64>,
    height: Option<f64>,
    arc_padding: Option<f64>,
    flip: Option<bool>,
    hover_fade_opacity: Option<f64>,
    colors: Option<Vec<String>>,
    rim_width: Option<f64>,
    hover_html: Option<IndexMap<String, String>>,
    hover_offset: Option<SidesPatch>,
    svg_class: Option<String>,
    hover_class: Option<String>,
    min_angle_for_label: Option<f64>,
}

fn non_negative(name: &str, v: f64) -> Result<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(Error::InvalidConfig {
            message: format!("{name} must be a finite non-negative number, got {v}"),
        })
    }
}

impl ConfigPatch {
    fn apply(self, mut cfg: ChordConfig) -> Result<ChordConfig> {
        if let Some(m) = self.margin {
            cfg.margin = Margin {
                top: m.top.unwrap_or(cfg.margin.top),
                right: m.right.unwrap_or(cfg.margin.right),
                bottom: m.bottom.unwrap_or(cfg.margin.bottom),
                left: m.left.unwrap_or(cfg.margin.left),
            };
        }
        if let Some(o) = self.hover_offset {
            if o.right.is_some() || o.bottom.is_some() {
                return Err(Error::InvalidConfig {
                    message: "hoverOffset only takes `top` and `left`".to_string(),
                });
            }
            cfg.hover_offset = HoverOffset {
                top: o.top.unwrap_or(cfg.hover_offset.top),
                left: o.left.unwrap_or(cfg.hover_offset.left),
            };
        }
        if let Some(v) = self.width {
            cfg.width = non_negative("width", v)?;
        }
        if let Some(v) = self.height {
            cfg.height = non_negative("height", v)?;
        }
        if let Some(v) = self.arc_padding {
            cfg.arc_padding = non_negative("arcPadding", v)?;
        }
        if let Some(v) = self.flip {
            cfg.flip = v;
        }
        if let Some(v) = self.hover_fade_opacity {
            cfg.hover_fade_opacity = non_negative("hoverFadeOpacity", v)?.min(1.0);
        }
        if let Some(colors) = self.colors {
            if colors.is_empty() {
                return Err(Error::InvalidConfig {
                    message: "colors must not be empty".to_string(),
                });
            }
            cfg.colors = ColorScale::palette(colors);
        }
        if let Some(v) = self.rim_width {
            let v = non_negative("rimWidth", v)?;
            cfg.rim_width = if v < 1.0 {
                RimWidth::Fraction(v)
            } else {
                RimWidth::Fixed(v)
            };
        }
        if let Some(v) = self.hover_html {
            cfg.hover_html = v;
        }
        if let Some(v) = self.svg_class {
            cfg.svg_class = v;
        }
        if let Some(v) = self.hover_class {
            cfg.hover_class = v;
        }
        if let Some(v) = self.min_angle_for_label {
            cfg.min_angle_for_label = non_negative("minAngleForLabel", v)?;
        }
        Ok(cfg)
    }
}
