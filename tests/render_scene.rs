use std::collections::HashSet;

use depscope::model::{DependencyGraph, GraphEdge, GraphNode, NodeKind};
use depscope::render::{ENLARGED_NODE_RADIUS, NODE_RADIUS, Palette, build_scene};
use depscope::view_state::ViewState;
use eframe::egui::{Color32, Pos2, Shape, pos2};

fn sample() -> (DependencyGraph, Vec<Pos2>) {
    let nodes = vec![
        GraphNode::new("src/a.ts", "a.ts", NodeKind::File),
        GraphNode::new("src/b.ts", "b.ts", NodeKind::File),
        GraphNode::new("src/b.ts::useThing", "useThing", NodeKind::Function),
        GraphNode::new("weird", "weird", NodeKind::Unknown),
    ];
    let edges = vec![
        GraphEdge::new("src/a.ts", "src/b.ts", "imports"),
        GraphEdge::new("src/b.ts", "src/b.ts::useThing", "contains"),
        GraphEdge::new("weird", "src/a.ts", "teleports"),
    ];
    let positions = vec![
        pos2(100.0, 100.0),
        pos2(300.0, 100.0),
        pos2(300.0, 300.0),
        pos2(100.0, 300.0),
    ];
    (DependencyGraph::new(nodes, edges), positions)
}

fn circles(shapes: &[Shape]) -> Vec<(f32, Color32)> {
    shapes
        .iter()
        .filter_map(|shape| match shape {
            Shape::Circle(circle) => Some((circle.radius, circle.fill)),
            _ => None,
        })
        .collect()
}

fn line_alphas(shapes: &[Shape]) -> Vec<u8> {
    shapes
        .iter()
        .filter_map(|shape| match shape {
            Shape::LineSegment { stroke, .. } => Some(stroke.color.a()),
            _ => None,
        })
        .collect()
}

#[test]
fn empty_input_renders_nothing() {
    let scene = build_scene(&DependencyGraph::default(), &[], &ViewState::default(), &Palette::rag());
    assert!(scene.is_empty());
}

#[test]
fn unknown_types_fall_back_to_default_colors() {
    let (graph, positions) = sample();
    let palette = Palette::dependency();
    let scene = build_scene(&graph, &positions, &ViewState::default(), &palette);

    let circles = circles(&scene.nodes);
    assert_eq!(circles.len(), 4);
    assert_eq!(circles[3].1, palette.default_node.fill);
    assert_eq!(circles[0].1, palette.node_colors(NodeKind::File).fill);
}

#[test]
fn hover_enlarges_without_dimming_others() {
    let (graph, positions) = sample();
    let state = ViewState {
        hovered: Some(2),
        ..ViewState::default()
    };
    let scene = build_scene(&graph, &positions, &state, &Palette::dependency());

    let radii = circles(&scene.nodes)
        .into_iter()
        .map(|(radius, _)| radius)
        .collect::<Vec<_>>();
    assert_eq!(radii, vec![NODE_RADIUS, NODE_RADIUS, ENLARGED_NODE_RADIUS, NODE_RADIUS]);

    let alphas = line_alphas(&scene.edges);
    assert_eq!(alphas.len(), 3);
    assert!(alphas.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn selection_dims_unrelated_edges_but_keeps_them() {
    let (graph, positions) = sample();
    let state = ViewState {
        selected: Some(1),
        highlighted: HashSet::from([1, 2]),
        ..ViewState::default()
    };
    let scene = build_scene(&graph, &positions, &state, &Palette::dependency());

    let alphas = line_alphas(&scene.edges);
    assert_eq!(alphas.len(), 3);
    assert_eq!(alphas[0], 255);
    assert_eq!(alphas[1], 255);
    assert!(alphas[2] < 255);
    assert!(alphas[2] > 0);
}

#[test]
fn labels_are_truncated() {
    let graph = DependencyGraph::new(
        vec![GraphNode::new("x", "averyveryverylongname", NodeKind::Class)],
        Vec::new(),
    );
    let scene = build_scene(&graph, &[pos2(0.0, 0.0)], &ViewState::default(), &Palette::rag());
    assert_eq!(scene.labels[0].text, "averyveryv...");
    assert_eq!(scene.labels[0].position, pos2(0.0, 0.0));
}
