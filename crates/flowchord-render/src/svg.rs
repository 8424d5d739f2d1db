use crate::geometry::fmt;
use crate::scene::{Element, Layer, Scene, Tooltip};
use std::fmt::Write as _;

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn style_attr(style: &indexmap::IndexMap<String, String>) -> String {
    let mut s = String::new();
    for (k, v) in style {
        if !s.is_empty() {
            s.push(' ');
        }
        let _ = write!(&mut s, "{k}: {v};");
    }
    s
}

fn write_element(out: &mut String, el: &Element) {
    let _ = write!(out, "<{}", el.tag);
    for (k, v) in &el.attrs {
        let _ = write!(out, r#" {k}="{}""#, escape_xml(v));
    }
    if !el.style.is_empty() {
        let _ = write!(out, r#" style="{}""#, escape_xml(&style_attr(&el.style)));
    }
    match el.text.as_deref() {
        Some(text) => {
            let _ = write!(out, ">{}</{}>", escape_xml(text), el.tag);
        }
        None => out.push_str("/>"),
    }
}

/// Standalone SVG document for a scene. The tooltip is not part of the SVG.
pub fn render_svg(scene: &Scene) -> String {
    let root = &scene.root;
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="{class}" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        class = escape_xml(&root.class),
        w = fmt(root.width),
        h = fmt(root.height),
    );
    let _ = write!(
        &mut out,
        r#"<g transform="translate({},{})">"#,
        fmt(root.translate_x),
        fmt(root.translate_y)
    );
    for layer in Layer::ALL {
        let _ = write!(&mut out, r#"<g class="{}">"#, layer.class());
        for el in scene.layer(layer) {
            write_element(&mut out, el);
        }
        out.push_str("</g>");
    }
    out.push_str("</g></svg>\n");
    out
}

/// Tooltip overlay as an HTML `div`. The content is inserted as markup, unescaped; hover HTML
/// comes from the chart owner's configuration.
pub fn render_tooltip_html(tooltip: &Tooltip) -> String {
    format!(
        r#"<div class="{class}" style="top: {top}px; left: {left}px; visibility: {vis}; opacity: {opacity};">{html}</div>"#,
        class = escape_xml(&tooltip.class),
        top = fmt(tooltip.top),
        left = fmt(tooltip.left),
        vis = if tooltip.visible { "visible" } else { "hidden" },
        opacity = fmt(tooltip.opacity),
        html = tooltip.html,
    )
}

/// Backing element contents: the tooltip overlay followed by the SVG.
pub fn render_html(scene: &Scene) -> String {
    let mut out = render_tooltip_html(&scene.tooltip);
    out.push('\n');
    out.push_str(&render_svg(scene));
    out
}
