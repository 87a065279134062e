use std::collections::BTreeMap;

use knot_core::rng::RngHandle;
use knot_core::{is_port_permutation, KnotError, Multigraph, NodeId, Port};
use knot_graph::{
    build_link_diagram, canonical_hash, resolve_crossing, resolve_type_a, resolve_type_b,
    LinkDiagram, MultigraphImpl, PortAssignment, Smoothing,
};
use proptest::prelude::*;

fn assert_port_permutations(diagram: &LinkDiagram) {
    for crossing in diagram.crossings() {
        let ports: Vec<Port> = diagram
            .ports_at(crossing)
            .unwrap()
            .into_iter()
            .map(|(_, port)| port)
            .collect();
        assert!(is_port_permutation(&ports), "crossing {crossing:?}: {ports:?}");
    }
}

/// Two crossings joined by four parallel strands, `tl`→`tr`, `tr`→`tl`,
/// `bl`→`br`, `br`→`bl`.
fn two_crossing_ring() -> (LinkDiagram, NodeId, NodeId) {
    let mut graph = MultigraphImpl::with_nodes(2);
    let ids: Vec<NodeId> = graph.nodes().collect();
    let (a, b) = (ids[0], ids[1]);
    for (pa, pb) in [
        (Port::TopLeft, Port::TopRight),
        (Port::TopRight, Port::TopLeft),
        (Port::BottomLeft, Port::BottomRight),
        (Port::BottomRight, Port::BottomLeft),
    ] {
        graph
            .add_edge_with_ports(a, b, PortAssignment::between(pa, pb))
            .unwrap();
    }
    let colors = BTreeMap::from([(a, true), (b, false)]);
    let diagram = LinkDiagram::try_from_parts(graph, colors, 0).unwrap();
    (diagram, a, b)
}

/// One crossing carrying the loops `tl`–`bl` and `tr`–`br`.
fn figure_eight_curl() -> (LinkDiagram, NodeId) {
    let mut graph = MultigraphImpl::with_nodes(1);
    let node = graph.nodes().next().unwrap();
    graph
        .add_edge_with_ports(node, node, PortAssignment::looped(Port::TopLeft, Port::BottomLeft))
        .unwrap();
    graph
        .add_edge_with_ports(
            node,
            node,
            PortAssignment::looped(Port::TopRight, Port::BottomRight),
        )
        .unwrap();
    let diagram = LinkDiagram::try_from_parts(graph, BTreeMap::from([(node, true)]), 0).unwrap();
    (diagram, node)
}

#[test]
fn vertical_smoothing_of_a_ring_closes_loops_at_the_survivor() {
    let (diagram, a, b) = two_crossing_ring();
    let resolved = resolve_type_a(&diagram, a).unwrap();

    assert_eq!(resolved.crossing_count(), 1);
    assert_eq!(resolved.crossings(), vec![b]);
    assert_eq!(resolved.graph().degree(b).unwrap(), 4);
    assert_eq!(resolved.color(b), Some(false));
    assert_eq!(resolved.color(a), None);
    assert_eq!(resolved.free_loops(), 0);

    // tl→tr and bl→br at `a` now meet as tr–br at `b`; tr→tl and br→bl as tl–bl.
    let mut loops: Vec<Vec<Port>> = resolved
        .graph()
        .edges()
        .map(|edge| {
            assert!(resolved.graph().is_loop(edge).unwrap());
            let mut ports = resolved.graph().ports(edge).unwrap().at_u.clone();
            ports.sort();
            ports
        })
        .collect();
    loops.sort();
    assert_eq!(
        loops,
        vec![
            vec![Port::TopLeft, Port::BottomLeft],
            vec![Port::TopRight, Port::BottomRight],
        ]
    );
    assert_port_permutations(&resolved);
}

#[test]
fn resolution_never_mutates_its_source() {
    let (diagram, a, _) = two_crossing_ring();
    let before = canonical_hash(&diagram).unwrap();
    let _ = resolve_type_a(&diagram, a).unwrap();
    let _ = resolve_type_b(&diagram, a).unwrap();
    assert_eq!(canonical_hash(&diagram).unwrap(), before);
    assert_eq!(diagram.crossing_count(), 2);
}

#[test]
fn smoothing_a_lone_crossing_counts_free_loops() {
    let (diagram, node) = figure_eight_curl();

    let vertical = resolve_type_a(&diagram, node).unwrap();
    assert_eq!(vertical.crossing_count(), 0);
    assert_eq!(vertical.graph().edge_count(), 0);
    assert_eq!(vertical.free_loops(), 2);

    let horizontal = resolve_type_b(&diagram, node).unwrap();
    assert_eq!(horizontal.crossing_count(), 0);
    assert_eq!(horizontal.free_loops(), 1);
}

#[test]
fn unknown_crossing_is_reported() {
    let (diagram, _) = figure_eight_curl();
    let err = resolve_type_a(&diagram, NodeId::from_raw(42)).unwrap_err();
    assert_eq!(err.info().code, "unknown-node");
}

#[test]
fn smoothing_labels_parse() {
    assert_eq!("vertical".parse::<Smoothing>().unwrap(), Smoothing::Vertical);
    assert_eq!("b".parse::<Smoothing>().unwrap(), Smoothing::Horizontal);
    assert!(matches!(
        "diagonal".parse::<Smoothing>(),
        Err(KnotError::Config(_))
    ));
    for smoothing in [Smoothing::Vertical, Smoothing::Horizontal] {
        for (p, q) in smoothing.pairs() {
            assert_eq!(smoothing.partner(p), q);
            assert_eq!(smoothing.partner(q), p);
        }
    }
}

#[test]
fn two_crossing_diagram_resolves_to_one_crossing_of_degree_four() {
    let mut rng = RngHandle::from_seed(17);
    let diagram = build_link_diagram(2, &mut rng).unwrap();
    let crossing = diagram.crossings()[0];
    let resolved = resolve_type_a(&diagram, crossing).unwrap();
    assert_eq!(resolved.crossing_count(), 1);
    let survivor = resolved.crossings()[0];
    assert_eq!(resolved.graph().degree(survivor).unwrap(), 4);
    assert_port_permutations(&resolved);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn resolving_drops_exactly_one_crossing(seed in any::<u64>(), crossings in 1usize..7, pick in any::<usize>()) {
        let mut rng = RngHandle::from_seed(seed);
        let diagram = build_link_diagram(crossings, &mut rng).unwrap();
        let target = diagram.crossings()[pick % crossings];
        for smoothing in [Smoothing::Vertical, Smoothing::Horizontal] {
            let resolved = resolve_crossing(&diagram, target, smoothing).unwrap();
            prop_assert_eq!(resolved.crossing_count(), crossings - 1);
            prop_assert!(resolved.check_invariants().is_ok());
            prop_assert!(resolved.free_loops() <= 2);
            for crossing in resolved.crossings() {
                prop_assert_eq!(resolved.color(crossing), diagram.color(crossing));
            }
        }
    }

    #[test]
    fn resolving_every_crossing_leaves_only_free_loops(seed in any::<u64>(), crossings in 1usize..6) {
        let mut rng = RngHandle::from_seed(seed);
        let mut diagram = build_link_diagram(crossings, &mut rng).unwrap();
        for step in 0..crossings {
            let target = diagram.crossings()[0];
            let smoothing = if step % 2 == 0 { Smoothing::Vertical } else { Smoothing::Horizontal };
            diagram = resolve_crossing(&diagram, target, smoothing).unwrap();
        }
        prop_assert_eq!(diagram.crossing_count(), 0);
        prop_assert_eq!(diagram.graph().edge_count(), 0);
        prop_assert!(diagram.free_loops() >= 1);
    }
}
