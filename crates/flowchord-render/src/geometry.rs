//! SVG path strings for rim arcs and ribbons, and label placement.
//!
//! Layout angles run clockwise from 12 o'clock; SVG angles run clockwise from 3 o'clock, hence
//! the `-π/2` offset applied before converting to points.

use crate::model::ChordEnd;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

const ANGLE_OFFSET: f64 = -FRAC_PI_2;
const FULL_CIRCLE_EPSILON: f64 = 1e-6;

/// Distance between a label's anchor and the outer radius.
pub const LABEL_GAP: f64 = 6.0;

/// Path numbers keep at most 3 fractional digits, without trailing zeros or `-0`.
pub fn fmt_path(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let r = (v * 1000.0).round() / 1000.0;
    let mut s = format!("{r:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// Attribute numbers: shortest round-trippable form, snapping float noise near integers.
pub fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn point(r: f64, svg_angle: f64) -> String {
    format!(
        "{},{}",
        fmt_path(r * svg_angle.cos()),
        fmt_path(r * svg_angle.sin())
    )
}

/// Layout angle (clockwise from 12 o'clock, in `[0, 2π)`) of a point relative to the centre.
pub fn polar_angle(x: f64, y: f64) -> f64 {
    let a = x.atan2(-y);
    if a < 0.0 { a + TAU } else { a }
}

fn circle(r: f64, sweep: u8) -> String {
    let r_s = fmt_path(r);
    let neg = fmt_path(-r);
    format!("M0,{r_s}A{r_s},{r_s} 0 1,{sweep} 0,{neg}A{r_s},{r_s} 0 1,{sweep} 0,{r_s}")
}

/// Annular sector between `inner` and `outer` radius. A zero inner radius draws a pie slice.
pub fn arc_path(inner: f64, outer: f64, start_angle: f64, end_angle: f64) -> String {
    let (r0, r1) = if outer < inner {
        (outer, inner)
    } else {
        (inner, outer)
    };
    let a0 = start_angle + ANGLE_OFFSET;
    let a1 = end_angle + ANGLE_OFFSET;
    let da = (a1 - a0).abs();
    let sweep: u8 = if a1 < a0 { 0 } else { 1 };

    if da >= TAU - FULL_CIRCLE_EPSILON {
        let mut d = circle(r1, sweep);
        if r0 > 0.0 {
            d.push_str(&circle(r0, 1 - sweep));
        }
        d.push('Z');
        return d;
    }

    let large = u8::from(da > PI);
    let r1_s = fmt_path(r1);
    let mut d = format!(
        "M{p0}A{r1_s},{r1_s} 0 {large},{sweep} {p1}",
        p0 = point(r1, a0),
        p1 = point(r1, a1)
    );
    if r0 > 0.0 {
        let r0_s = fmt_path(r0);
        d.push_str(&format!(
            "L{p1}A{r0_s},{r0_s} 0 {large},{back} {p0}",
            p1 = point(r0, a1),
            p0 = point(r0, a0),
            back = 1 - sweep
        ));
    } else {
        d.push_str("L0,0");
    }
    d.push('Z');
    d
}

struct RibbonEnd {
    a0: f64,
    a1: f64,
    p0: String,
    p1: String,
}

fn ribbon_end(end: &ChordEnd, radius: f64) -> RibbonEnd {
    let a0 = end.start_angle + ANGLE_OFFSET;
    let a1 = end.end_angle + ANGLE_OFFSET;
    RibbonEnd {
        a0,
        a1,
        p0: point(radius, a0),
        p1: point(radius, a1),
    }
}

fn ribbon_arc(radius: &str, end: &RibbonEnd) -> String {
    let large = u8::from(end.a1 - end.a0 > PI);
    format!("A{radius},{radius} 0 {large},1 {}", end.p1)
}

/// Closed band joining two chord ends through the centre with quadratic curves.
pub fn ribbon_path(source: &ChordEnd, target: &ChordEnd, radius: f64) -> String {
    let r = fmt_path(radius);
    let s = ribbon_end(source, radius);
    let t = ribbon_end(target, radius);

    let mut d = format!("M{}{}", s.p0, ribbon_arc(&r, &s));
    if s.a0 == t.a0 && s.a1 == t.a1 {
        d.push_str(&format!("Q 0,0 {}", s.p0));
    } else {
        d.push_str(&format!("Q 0,0 {}", t.p0));
        d.push_str(&ribbon_arc(&r, &t));
        d.push_str(&format!("Q 0,0 {}", s.p0));
    }
    d.push('Z');
    d
}

/// Whether a label at `angle` sits on the left half and has to be turned upright.
pub fn label_flipped(angle: f64) -> bool {
    angle > PI
}

/// Rotates the label to point outward from the centre at `angle`, `LABEL_GAP` past the rim.
pub fn label_transform(angle: f64, outer_radius: f64) -> String {
    let mut t = format!(
        "rotate({})translate({})",
        fmt(angle * 180.0 / PI - 90.0),
        fmt(outer_radius + LABEL_GAP)
    );
    if label_flipped(angle) {
        t.push_str("rotate(180)");
    }
    t
}
