use flowchord_core::{ChordConfig, FlowTable, Role};
use flowchord_render::hover::TOOLTIP_MIN_TOP;
use flowchord_render::scene::TOOLTIP_HIDDEN_OPACITY;
use flowchord_render::{
    ChordChart, Error, HoverState, Layer, Point, PointerContext, SceneOp, Size, Surface,
    layout_chord_diagram,
};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> FlowTable {
    let path = workspace_root().join("fixtures").join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    FlowTable::from_json_str(&text).expect("fixture parses")
}

fn eye_config() -> ChordConfig {
    let path = workspace_root()
        .join("fixtures")
        .join("eye_colour_config.json");
    let text = std::fs::read_to_string(&path).expect("fixture");
    let value: serde_json::Value = serde_json::from_str(&text).expect("config json");
    ChordConfig::default().merge_json(&value).expect("config ok")
}

fn pointer(x: f64, y: f64) -> PointerContext {
    PointerContext {
        page: Point::new(x, y),
        viewport: Size::new(800.0, 600.0),
        tooltip: Size::new(120.0, 40.0),
    }
}

fn flow_opacities(surface: &Surface) -> Vec<String> {
    surface
        .scene()
        .expect("rendered")
        .flows
        .iter()
        .map(|e| e.style["opacity"].clone())
        .collect()
}

fn rendered(config: ChordConfig, table: &FlowTable) -> Surface {
    let mut surface = Surface::new();
    ChordChart::new(config)
        .render(&mut surface, table)
        .expect("render ok");
    surface
}

#[test]
fn eye_colour_example_has_five_groups_and_six_ribbons() {
    let layout =
        layout_chord_diagram(&fixture("eye_colour.json"), &ChordConfig::default()).expect("ok");

    assert_eq!(layout.groups.len(), 5);
    assert_eq!(layout.chords.len(), 6);
    let roles: Vec<Role> = layout.groups.iter().map(|g| g.role).collect();
    assert_eq!(
        roles,
        vec![Role::Row, Role::Row, Role::Row, Role::Column, Role::Column]
    );
    assert_eq!(layout.label_for(0), "Brown eyes");
    assert_eq!(layout.label_for(3), "Introvert");

    // Each row sums to 1 out of a doubled total of 6.
    for g in &layout.groups[..3] {
        assert!((g.span() - PI / 3.0).abs() < 1e-9);
    }
    let covered: f64 = layout.groups.iter().map(|g| g.span()).sum();
    assert!((covered - 2.0 * PI).abs() < 1e-9);
    assert!((layout.total_flow() - 3.0).abs() < 1e-9);

    assert_eq!((layout.outer_radius, layout.inner_radius), (200.0, 180.0));
    assert_eq!((layout.center_x, layout.center_y), (480.0, 250.0));
}

#[test]
fn every_ribbon_joins_a_row_to_a_column() {
    let layout =
        layout_chord_diagram(&fixture("eye_colour.json"), &ChordConfig::default()).expect("ok");
    for chord in &layout.chords {
        assert_eq!(layout.role_for(chord.source.index), Role::Row);
        assert_eq!(layout.role_for(chord.target.index), Role::Column);
    }
}

#[test]
fn flip_swaps_roles_but_keeps_the_ribbon_set() {
    let table = fixture("eye_colour.json");
    let plain = layout_chord_diagram(&table, &ChordConfig::default()).expect("ok");
    let flipped = layout_chord_diagram(&table, &ChordConfig::default().flipped()).expect("ok");

    assert_eq!(flipped.labels.row_labels(), ["Introvert", "Extrovert"]);
    assert_eq!(flipped.role_for(0), Role::Row);
    assert_eq!(flipped.role_for(2), Role::Column);
    assert_eq!(flipped.label_for(2), "Brown eyes");

    let pairs = |layout: &flowchord_render::ChordDiagramLayout| -> BTreeSet<(String, String)> {
        layout
            .chords
            .iter()
            .map(|c| {
                let a = layout.label_for(c.source.index).to_string();
                let b = layout.label_for(c.target.index).to_string();
                if a < b { (a, b) } else { (b, a) }
            })
            .collect()
    };
    assert_eq!(pairs(&plain), pairs(&flipped));
    assert!((plain.total_flow() - flipped.total_flow()).abs() < 1e-9);
}

#[test]
fn zero_weights_draw_no_ribbon() {
    let layout =
        layout_chord_diagram(&fixture("sparse_strings.json"), &ChordConfig::default()).expect("ok");
    assert_eq!(layout.groups.len(), 6);
    // North/Road, South/Air and East/Rail are empty.
    assert_eq!(layout.chords.len(), 6);
    for chord in &layout.chords {
        assert!(chord.source.value > 0.0);
    }
}

#[test]
fn first_render_creates_every_element() {
    let surface = rendered(eye_config(), &fixture("eye_colour.json"));
    let scene = surface.scene().expect("rendered");

    assert_eq!(scene.rim.len(), 5);
    assert_eq!(scene.labels.len(), 5);
    assert_eq!(scene.flows.len(), 6);
    assert_eq!(scene.root.width, 600.0);
    assert_eq!(scene.labels[0].attrs["class"], "row");
    assert_eq!(scene.labels[4].attrs["class"], "column");
    assert_eq!(scene.labels[0].text.as_deref(), Some("Brown eyes"));
    assert!(!scene.labels[0].attrs.contains_key("text-anchor"));
    assert_eq!(scene.labels[3].attrs["text-anchor"], "end");
    assert!(scene.labels[3].attrs["transform"].ends_with("rotate(180)"));
    assert!(!scene.tooltip.visible);
    assert_eq!(scene.tooltip.opacity, TOOLTIP_HIDDEN_OPACITY);
    assert!(flow_opacities(&surface).iter().all(|o| o == "1"));
}

#[test]
fn ribbons_take_the_target_color() {
    let config = eye_config();
    let surface = rendered(config.clone(), &fixture("eye_colour.json"));
    let layout = surface.layout().expect("layout");
    let scene = surface.scene().expect("rendered");
    for (chord, el) in layout.chords.iter().zip(&scene.flows) {
        assert_eq!(el.style["fill"], config.colors.color_for(chord.target.index));
    }
    assert_eq!(scene.rim[1].style["fill"], config.colors.color_for(1));
    assert_eq!(scene.rim[1].style["stroke"], config.colors.color_for(1));
}

#[test]
fn rendering_the_same_data_twice_changes_nothing() {
    let chart = ChordChart::new(eye_config());
    let table = fixture("eye_colour.json");
    let mut surface = Surface::new();

    let first = chart.render(&mut surface, &table).expect("render ok");
    assert!(!first.is_empty());
    let second = chart.render(&mut surface, &table).expect("render ok");
    assert!(second.is_empty(), "unexpected ops: {second:?}");
}

#[test]
fn hover_fades_unrelated_ribbons_and_leave_restores_them() {
    let mut surface = rendered(eye_config(), &fixture("eye_colour.json"));

    let ops = surface.pointer_enter(0, &pointer(300.0, 200.0));
    assert!(ops.contains(&SceneOp::FadeTooltip { opacity: 1.0 }));
    assert_eq!(surface.hover_state(), HoverState::Hovering(0));
    assert_eq!(
        flow_opacities(&surface),
        vec!["1", "1", "0.2", "0.2", "0.2", "0.2"]
    );

    let tooltip = &surface.scene().expect("rendered").tooltip;
    assert!(tooltip.visible);
    assert_eq!(tooltip.opacity, 1.0);
    assert_eq!(tooltip.html, "Brown eyes");
    assert_eq!((tooltip.top, tooltip.left), (140.0, 350.0));

    surface.pointer_leave();
    assert_eq!(surface.hover_state(), HoverState::Idle);
    assert!(flow_opacities(&surface).iter().all(|o| o == "1"));
    let tooltip = &surface.scene().expect("rendered").tooltip;
    assert_eq!(tooltip.opacity, TOOLTIP_HIDDEN_OPACITY);
    assert!(tooltip.visible);
}

#[test]
fn hovering_a_column_highlights_its_three_ribbons() {
    let mut surface = rendered(eye_config(), &fixture("eye_colour.json"));
    surface.pointer_enter(3, &pointer(300.0, 200.0));
    let kept = flow_opacities(&surface)
        .iter()
        .filter(|o| o.as_str() == "1")
        .count();
    assert_eq!(kept, 3);

    // Column groups sit on the left half, so the tooltip goes left of the pointer.
    let tooltip = &surface.scene().expect("rendered").tooltip;
    assert_eq!(tooltip.left, 300.0 - 120.0 - 50.0);
}

#[test]
fn tooltip_uses_configured_html_when_present() {
    let mut surface = rendered(eye_config(), &fixture("eye_colour.json"));
    surface.pointer_enter(1, &pointer(300.0, 20.0));
    let tooltip = &surface.scene().expect("rendered").tooltip;
    assert_eq!(tooltip.html, "<strong>Blue eyes</strong><br/>40% introvert");
    assert_eq!(tooltip.top, TOOLTIP_MIN_TOP);
}

#[test]
fn entering_another_group_equals_leave_then_enter() {
    let table = fixture("eye_colour.json");
    let mut direct = rendered(eye_config(), &table);
    direct.pointer_enter(0, &pointer(300.0, 200.0));
    direct.pointer_enter(4, &pointer(310.0, 220.0));

    let mut stepped = rendered(eye_config(), &table);
    stepped.pointer_enter(0, &pointer(300.0, 200.0));
    stepped.pointer_leave();
    stepped.pointer_enter(4, &pointer(310.0, 220.0));

    assert_eq!(direct.hover_state(), HoverState::Hovering(4));
    assert_eq!(direct.scene(), stepped.scene());
}

#[test]
fn rerender_while_hovering_keeps_the_highlight() {
    let chart = ChordChart::new(eye_config());
    let table = fixture("eye_colour.json");
    let mut surface = Surface::new();
    chart.render(&mut surface, &table).expect("render ok");
    surface.pointer_enter(0, &pointer(300.0, 200.0));

    let ops = chart.render(&mut surface, &table).expect("render ok");
    assert!(ops.is_empty(), "unexpected ops: {ops:?}");
    assert_eq!(surface.hover_state(), HoverState::Hovering(0));
}

#[test]
fn rerender_drops_a_hover_on_a_vanished_group() {
    let chart = ChordChart::new(ChordConfig::default());
    let mut surface = Surface::new();
    chart
        .render(&mut surface, &fixture("sparse_strings.json"))
        .expect("render ok");
    surface.pointer_enter(5, &pointer(300.0, 200.0));

    chart
        .render(&mut surface, &fixture("eye_colour.json"))
        .expect("render ok");
    assert_eq!(surface.hover_state(), HoverState::Idle);
    let scene = surface.scene().expect("rendered");
    assert_eq!(scene.tooltip.opacity, TOOLTIP_HIDDEN_OPACITY);
    assert!(flow_opacities(&surface).iter().all(|o| o == "1"));
}

#[test]
fn rerender_drops_a_hover_whose_group_changed_category() {
    let chart = ChordChart::new(ChordConfig::default());
    let mut surface = Surface::new();
    chart
        .render(&mut surface, &fixture("eye_colour.json"))
        .expect("render ok");
    surface.pointer_enter(0, &pointer(300.0, 200.0));

    chart
        .render(&mut surface, &fixture("sparse_strings.json"))
        .expect("render ok");
    assert_eq!(surface.layout().expect("layout").label_for(0), "North");
    assert_eq!(surface.hover_state(), HoverState::Idle);
    let scene = surface.scene().expect("rendered");
    assert_eq!(scene.tooltip.opacity, TOOLTIP_HIDDEN_OPACITY);
    assert!(flow_opacities(&surface).iter().all(|o| o == "1"));
}

#[test]
fn rerender_while_hovering_refreshes_the_tooltip_content() {
    let table = fixture("eye_colour.json");
    let mut surface = Surface::new();
    ChordChart::new(ChordConfig::default())
        .render(&mut surface, &table)
        .expect("render ok");
    surface.pointer_enter(1, &pointer(300.0, 200.0));
    assert_eq!(surface.scene().expect("rendered").tooltip.html, "Blue eyes");

    ChordChart::new(eye_config())
        .render(&mut surface, &table)
        .expect("render ok");
    assert_eq!(surface.hover_state(), HoverState::Hovering(1));
    let tooltip = &surface.scene().expect("rendered").tooltip;
    assert_eq!(tooltip.html, "<strong>Blue eyes</strong><br/>40% introvert");
    assert_eq!(tooltip.opacity, 1.0);
}

#[test]
fn reconcile_grows_and_shrinks_layers() {
    let chart = ChordChart::new(ChordConfig::default());
    let mut surface = Surface::new();
    chart
        .render(&mut surface, &fixture("eye_colour.json"))
        .expect("render ok");

    let grow = chart
        .render(&mut surface, &fixture("sparse_strings.json"))
        .expect("render ok");
    assert!(grow.iter().any(|op| matches!(
        op,
        SceneOp::Create { layer: Layer::Rim, element } if element.key == 5
    )));
    assert_eq!(surface.scene().expect("rendered").rim.len(), 6);

    let tiny = FlowTable::from_json_str(r#"[["", "a"], ["r", 1]]"#).expect("json");
    let shrink = chart.render(&mut surface, &tiny).expect("render ok");
    let removed_flows = shrink
        .iter()
        .filter(|op| matches!(op, SceneOp::Remove { layer: Layer::Flows, .. }))
        .count();
    assert_eq!(removed_flows, 5);
    let scene = surface.scene().expect("rendered");
    assert_eq!((scene.rim.len(), scene.labels.len(), scene.flows.len()), (2, 2, 1));
}

#[test]
fn failed_render_leaves_the_surface_untouched() {
    let chart = ChordChart::new(ChordConfig::default());
    let mut surface = Surface::new();
    chart
        .render(&mut surface, &fixture("eye_colour.json"))
        .expect("render ok");
    let before = surface.scene().cloned();

    let bad = FlowTable::from_json_str(r#"[["", "a"], ["r", "lots"]]"#).expect("json");
    let err = chart.render(&mut surface, &bad).unwrap_err();
    assert!(matches!(err, Error::Core(_)));
    assert_eq!(surface.scene().cloned(), before);
}

#[test]
fn canvas_smaller_than_margins_is_rejected() {
    let config = ChordConfig::default().with_width(80.0);
    let err = layout_chord_diagram(&fixture("eye_colour.json"), &config).unwrap_err();
    assert!(matches!(err, Error::NoRoom { .. }));
}

#[test]
fn narrow_groups_lose_their_label_text() {
    let config = eye_config().with_min_angle_for_label(1.5);
    let surface = rendered(config, &fixture("eye_colour.json"));
    let texts: Vec<Option<&str>> = surface
        .scene()
        .expect("rendered")
        .labels
        .iter()
        .map(|l| l.text.as_deref())
        .collect();
    assert_eq!(texts, vec![None, None, None, Some("Introvert"), None]);
}

#[test]
fn pointer_move_hit_tests_the_rim() {
    let mut surface = rendered(ChordConfig::default(), &fixture("eye_colour.json"));
    // Brown eyes spans [0, pi/3]; aim at its middle, halfway through the rim.
    let (a, r) = (PI / 6.0, 190.0);
    let on_rim = Point::new(480.0 + r * a.sin(), 250.0 - r * a.cos());

    let ops = surface.pointer_move(on_rim, &pointer(300.0, 200.0));
    assert!(!ops.is_empty());
    assert_eq!(surface.hover_state(), HoverState::Hovering(0));

    assert!(
        surface
            .pointer_move(on_rim, &pointer(300.0, 200.0))
            .is_empty()
    );

    surface.pointer_move(Point::new(480.0, 250.0), &pointer(300.0, 200.0));
    assert_eq!(surface.hover_state(), HoverState::Idle);
}

#[test]
fn pointer_events_before_render_do_nothing() {
    let mut surface = Surface::new();
    assert!(surface.pointer_enter(0, &pointer(0.0, 0.0)).is_empty());
    assert!(surface.pointer_leave().is_empty());
    assert!(surface.to_svg().is_none());
}

#[test]
fn svg_and_html_output() {
    let surface = rendered(eye_config(), &fixture("eye_colour.json"));
    let svg = surface.to_svg().expect("rendered");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"class="chord-diagram" width="600" height="400""#));
    assert!(svg.contains(r#"<g transform="translate(300,200)">"#));
    assert!(svg.contains(r#"<g class="rim">"#));
    assert!(svg.contains(">Brown eyes</text>"));
    assert_eq!(svg.matches("<path").count(), 5 + 6);

    let html = surface.to_html().expect("rendered");
    assert!(html.starts_with(r#"<div class="chord-hover""#));
    assert!(html.contains("visibility: hidden"));
    assert!(html.ends_with(&svg));
}
