//! Retained drawing state and the keyed create/update/remove diff that keeps it in sync.
//!
//! A [`Scene`] is what a chart looks like after a render; [`reconcile`] computes the smallest set
//! of [`SceneOp`]s that turns one scene into another, and [`Scene::apply`] performs them. Hover
//! feedback is expressed with the same ops so a live binding only has to understand one vocabulary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Rim,
    Labels,
    Flows,
}

impl Layer {
    /// Paint order: rim, then labels, then ribbons on top.
    pub const ALL: [Layer; 3] = [Layer::Rim, Layer::Labels, Layer::Flows];

    pub fn class(self) -> &'static str {
        match self {
            Layer::Rim => "rim",
            Layer::Labels => "labels",
            Layer::Flows => "flows",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Data index the element is bound to (group index for rim/labels, chord position for flows).
    pub key: usize,
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub style: IndexMap<String, String>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: &str, key: usize) -> Self {
        Self {
            key,
            tag: tag.to_string(),
            attrs: IndexMap::new(),
            style: IndexMap::new(),
            text: None,
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.style.insert(name.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }
}

/// Attributes of the root drawing surface and its centred group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub class: String,
    pub width: f64,
    pub height: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

/// Near-zero rather than zero so the element keeps receiving layout in a browser.
pub const TOOLTIP_HIDDEN_OPACITY: f64 = 1e-6;

/// The hover overlay. Created once per surface and afterwards only changed by hover handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub class: String,
    pub html: String,
    pub top: f64,
    pub left: f64,
    pub visible: bool,
    pub opacity: f64,
}

impl Tooltip {
    pub fn hidden(class: &str) -> Self {
        Self {
            class: class.to_string(),
            html: String::new(),
            top: 0.0,
            left: 0.0,
            visible: false,
            opacity: TOOLTIP_HIDDEN_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub root: Root,
    pub rim: Vec<Element>,
    pub labels: Vec<Element>,
    pub flows: Vec<Element>,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SceneOp {
    SetRoot(Root),
    Create {
        layer: Layer,
        element: Element,
    },
    /// Only the changed pieces: `attrs`/`style` hold new or changed values, `unset_*` the names
    /// that disappeared; `text` is `None` when the text did not change.
    Update {
        layer: Layer,
        key: usize,
        attrs: IndexMap<String, String>,
        unset_attrs: Vec<String>,
        style: IndexMap<String, String>,
        unset_style: Vec<String>,
        text: Option<Option<String>>,
    },
    Remove {
        layer: Layer,
        key: usize,
    },
    /// Opacity change; `transition` asks a live binding to animate it.
    SetOpacity {
        layer: Layer,
        key: usize,
        opacity: f64,
        transition: bool,
    },
    SetTooltip(Tooltip),
    /// Animated tooltip opacity change, applied after any `SetTooltip` in the same batch.
    FadeTooltip {
        opacity: f64,
    },
}

impl Scene {
    pub fn layer(&self, layer: Layer) -> &[Element] {
        match layer {
            Layer::Rim => &self.rim,
            Layer::Labels => &self.labels,
            Layer::Flows => &self.flows,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Vec<Element> {
        match layer {
            Layer::Rim => &mut self.rim,
            Layer::Labels => &mut self.labels,
            Layer::Flows => &mut self.flows,
        }
    }

    pub fn element(&self, layer: Layer, key: usize) -> Option<&Element> {
        self.layer(layer).iter().find(|e| e.key == key)
    }

    fn element_mut(&mut self, layer: Layer, key: usize) -> Option<&mut Element> {
        self.layer_mut(layer).iter_mut().find(|e| e.key == key)
    }

    pub fn apply(&mut self, ops: &[SceneOp]) {
        for op in ops {
            self.apply_one(op);
        }
    }

    fn apply_one(&mut self, op: &SceneOp) {
        match op {
            SceneOp::SetRoot(root) => self.root = root.clone(),
            SceneOp::Create { layer, element } => {
                let elements = self.layer_mut(*layer);
                match elements.binary_search_by_key(&element.key, |e| e.key) {
                    Ok(pos) => elements[pos] = element.clone(),
                    Err(pos) => elements.insert(pos, element.clone()),
                }
            }
            SceneOp::Update {
                layer,
                key,
                attrs,
                unset_attrs,
                style,
                unset_style,
                text,
            } => {
                let Some(el) = self.element_mut(*layer, *key) else {
                    tracing::warn!(?layer, key, "update for a missing scene element");
                    return;
                };
                for name in unset_attrs {
                    el.attrs.shift_remove(name);
                }
                for (k, v) in attrs {
                    el.attrs.insert(k.clone(), v.clone());
                }
                for name in unset_style {
                    el.style.shift_remove(name);
                }
                for (k, v) in style {
                    el.style.insert(k.clone(), v.clone());
                }
                if let Some(text) = text {
                    el.text = text.clone();
                }
            }
            SceneOp::Remove { layer, key } => {
                self.layer_mut(*layer).retain(|e| e.key != *key);
            }
            SceneOp::SetOpacity {
                layer,
                key,
                opacity,
                ..
            } => {
                if let Some(el) = self.element_mut(*layer, *key) {
                    el.style
                        .insert("opacity".to_string(), crate::geometry::fmt(*opacity));
                }
            }
            SceneOp::SetTooltip(t) => self.tooltip = t.clone(),
            SceneOp::FadeTooltip { opacity } => self.tooltip.opacity = *opacity,
        }
    }
}

fn diff_map(
    prev: &IndexMap<String, String>,
    next: &IndexMap<String, String>,
) -> (IndexMap<String, String>, Vec<String>) {
    let changed = next
        .iter()
        .filter(|(k, v)| prev.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let unset = prev
        .keys()
        .filter(|k| !next.contains_key(*k))
        .cloned()
        .collect();
    (changed, unset)
}

fn diff_element(layer: Layer, prev: &Element, next: &Element) -> Option<SceneOp> {
    if prev.tag != next.tag {
        // Different primitive under the same key: replace it.
        return Some(SceneOp::Create {
            layer,
            element: next.clone(),
        });
    }
    let (attrs, unset_attrs) = diff_map(&prev.attrs, &next.attrs);
    let (style, unset_style) = diff_map(&prev.style, &next.style);
    let text = (prev.text != next.text).then(|| next.text.clone());
    if attrs.is_empty()
        && unset_attrs.is_empty()
        && style.is_empty()
        && unset_style.is_empty()
        && text.is_none()
    {
        return None;
    }
    Some(SceneOp::Update {
        layer,
        key: next.key,
        attrs,
        unset_attrs,
        style,
        unset_style,
        text,
    })
}

fn reconcile_layer(layer: Layer, prev: &[Element], next: &[Element], ops: &mut Vec<SceneOp>) {
    let prev_by_key: IndexMap<usize, &Element> = prev.iter().map(|e| (e.key, e)).collect();
    for el in next {
        match prev_by_key.get(&el.key) {
            Some(old) => ops.extend(diff_element(layer, old, el)),
            None => ops.push(SceneOp::Create {
                layer,
                element: el.clone(),
            }),
        }
    }
    for old in prev {
        if !next.iter().any(|e| e.key == old.key) {
            ops.push(SceneOp::Remove {
                layer,
                key: old.key,
            });
        }
    }
}

/// Ops that turn `prev` (or an empty surface) into `next`.
pub fn reconcile(prev: Option<&Scene>, next: &Scene) -> Vec<SceneOp> {
    let mut ops = Vec::new();
    match prev {
        None => {
            ops.push(SceneOp::SetRoot(next.root.clone()));
            ops.push(SceneOp::SetTooltip(next.tooltip.clone()));
            for layer in Layer::ALL {
                ops.extend(next.layer(layer).iter().map(|e| SceneOp::Create {
                    layer,
                    element: e.clone(),
                }));
            }
        }
        Some(prev) => {
            if prev.root != next.root {
                ops.push(SceneOp::SetRoot(next.root.clone()));
            }
            if prev.tooltip != next.tooltip {
                ops.push(SceneOp::SetTooltip(next.tooltip.clone()));
            }
            for layer in Layer::ALL {
                reconcile_layer(layer, prev.layer(layer), next.layer(layer), &mut ops);
            }
        }
    }
    ops
}

/// Scene with nothing drawn yet, used as the target of a first full reconcile.
pub(crate) fn empty_scene(root: Root, tooltip: Tooltip) -> Scene {
    Scene {
        root,
        rim: Vec::new(),
        labels: Vec::new(),
        flows: Vec::new(),
        tooltip,
    }
}
