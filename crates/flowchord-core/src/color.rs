use std::fmt;
use std::sync::Arc;

/// The 20-color ordinal palette (`category20b`) used for categories by default.
pub const CATEGORY20B: [&str; 20] = [
    "#393b79", "#5254a3", "#6b6ecf", "#9c9ede", "#637939", "#8ca252", "#b5cf6b", "#cedb9c",
    "#8c6d31", "#bd9e39", "#e7ba52", "#e7cb94", "#843c39", "#ad494a", "#d6616b", "#e7969c",
    "#7b4173", "#a55194", "#ce6dbd", "#de9ed6",
];

type ColorFn = dyn Fn(usize) -> String + Send + Sync;

/// Maps a category index to a CSS color.
#[derive(Clone)]
pub enum ColorScale {
    /// Cycles through the palette by index.
    Palette(Arc<[String]>),
    Custom(Arc<ColorFn>),
}

impl ColorScale {
    pub fn category20b() -> Self {
        Self::palette(CATEGORY20B.iter().map(|c| c.to_string()).collect())
    }

    pub fn palette(colors: Vec<String>) -> Self {
        Self::Palette(colors.into())
    }

    pub fn from_fn(f: impl Fn(usize) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn color_for(&self, index: usize) -> String {
        match self {
            ColorScale::Palette(colors) if colors.is_empty() => "black".to_string(),
            ColorScale::Palette(colors) => colors[index % colors.len()].clone(),
            ColorScale::Custom(f) => f(index),
        }
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::category20b()
    }
}

impl fmt::Debug for ColorScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorScale::Palette(colors) => f.debug_tuple("Palette").field(colors).finish(),
            ColorScale::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
