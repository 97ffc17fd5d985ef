use std::path::PathBuf;

use pn_cover::analysis::{BoundnessResult, CoverabilityBuilder, CoverabilityTree, NodeTag};
use pn_cover::net::{NetDescription, NodeId, TransitionDescription, ValidationIssue, io, parse};
use pn_cover::report::{self, AnalysisReport, RenderOptions};

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn tags(tree: &CoverabilityTree) -> Vec<NodeTag> {
    tree.nodes().map(|node| node.tag).collect()
}

#[test]
fn self_loop_pump_becomes_omega() {
    let description = parse::parse_description("P0", "1", "t1:P0=1->P0=2").unwrap();
    let net = description.build().unwrap();
    let tree = CoverabilityTree::build(&net).unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(
        tags(&tree),
        vec![NodeTag::Processed, NodeTag::Processed, NodeTag::Old]
    );
    assert_eq!(
        report::render(&tree),
        "Node 0: [1]\n  Node 1: [ω]  (← t1 from Node 0)\n    Node 2: [ω]  (← t1 from Node 1) [old]"
    );

    let properties = report::analyze(&tree);
    assert_eq!(properties.unbounded_places(), ["P0"]);
    assert_eq!(properties.dead_end_count(), 0);
    assert_eq!(properties.old_count(), 1);
    assert_eq!(
        properties.to_string(),
        "✗ Network is UNBOUNDED (unbounded places: P0)\n✓ No dead-end nodes\n✓ Old nodes found: 1"
    );
}

#[test]
fn disabled_root_is_a_dead_end() {
    let net = parse::parse_description("P0", "0", "t1:P0=1->")
        .unwrap()
        .build()
        .unwrap();
    let tree = CoverabilityTree::build(&net).unwrap();
    assert_eq!(tags(&tree), vec![NodeTag::DeadEnd]);

    let properties = report::analyze(&tree);
    assert!(properties.is_bounded());
    assert_eq!(properties.dead_end_count(), 1);
    assert_eq!(properties.old_count(), 0);
    assert_eq!(report::render(&tree), "Node 0: [0] [dead-end]");
}

#[test]
fn token_ping_pong_returns_to_root() {
    let net = parse::parse_description("P0, P1", "1, 0", "t1:P0=1->P1=1, t2:P1=1->P0=1")
        .unwrap()
        .build()
        .unwrap();
    let tree = CoverabilityTree::build(&net).unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree[NodeId::new(2)].tag, NodeTag::Old);
    let properties = report::analyze(&tree);
    assert!(properties.is_bounded());
    assert_eq!(properties.dead_end_count(), 0);
    assert_eq!(properties.old_count(), 1);
}

#[test]
fn marking_length_mismatch_never_builds() {
    let description = parse::parse_description("P0, P1", "1", "t1:P0=1->P1=1").unwrap();
    let err = description.build().unwrap_err();
    assert_eq!(
        err.issues,
        vec![ValidationIssue::MarkingLength {
            expected: 2,
            found: 1
        }]
    );
}

#[test]
fn producer_consumer_from_toml() {
    let net = io::read_description(data("producer_consumer.toml"))
        .unwrap()
        .build()
        .unwrap();
    let tree = CoverabilityTree::build(&net).unwrap();
    let properties = report::analyze(&tree);

    assert_eq!(tree.len(), 15);
    assert_eq!(
        properties.boundness,
        BoundnessResult::Unbounded {
            unbounded_places: vec!["buffer".into(), "consumed".into()],
            witness_sequence: vec!["produce".into(), "deliver".into()],
        }
    );
    assert_eq!(properties.dead_end_count(), 0);
    assert_eq!(properties.old_count(), 7);
    assert!(tree.nodes().all(|node| node.tag != NodeTag::New));
}

#[test]
fn mutex_from_json_is_bounded() {
    let net = io::read_description(data("mutex.json"))
        .unwrap()
        .build()
        .unwrap();
    let tree = CoverabilityTree::build(&net).unwrap();
    let properties = report::analyze(&tree);

    assert_eq!(tree.len(), 5);
    assert!(properties.is_bounded());
    assert_eq!(properties.old_nodes, vec![NodeId::new(3), NodeId::new(4)]);
    assert_eq!(
        tree.firing_sequence(NodeId::new(4)),
        vec!["enter2", "leave2"]
    );
}

#[test]
fn identical_input_gives_identical_tree() {
    let net = io::read_description(data("producer_consumer.toml"))
        .unwrap()
        .build()
        .unwrap();
    let first = CoverabilityTree::build(&net).unwrap();
    let second = CoverabilityBuilder::new(&net).build().unwrap();
    assert_eq!(report::render(&first), report::render(&second));
    assert_eq!(first.edges(), second.edges());
    assert_eq!(tags(&first), tags(&second));
}

#[test]
fn sibling_duplicates_expand_independently() {
    let net = NetDescription::new()
        .place("left", 1)
        .place("right", 1)
        .place("done", 0)
        .place("out", 0)
        .transition(TransitionDescription::new("l").consumes("left", 1).produces("done", 1))
        .transition(TransitionDescription::new("r").consumes("right", 1).produces("done", 1))
        .transition(TransitionDescription::new("emit").consumes("done", 2).produces("out", 1))
        .build()
        .unwrap();
    let tree = CoverabilityTree::build(&net).unwrap();

    let same: Vec<_> = tree
        .nodes()
        .filter(|node| node.marking.to_string() == "[0, 0, 2, 0]")
        .collect();
    assert_eq!(same.len(), 2);
    for node in &same {
        assert_eq!(node.tag, NodeTag::Processed);
        assert_eq!(node.children.len(), 1);
    }
    assert_eq!(report::analyze(&tree).dead_end_count(), 2);
}

#[test]
fn node_budget_reports_instead_of_growing() {
    let net = io::read_description(data("producer_consumer.toml"))
        .unwrap()
        .build()
        .unwrap();
    let err = CoverabilityBuilder::new(&net)
        .with_max_nodes(Some(10))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("node limit 10"));
}

#[test]
fn json_output_carries_tree_and_properties() {
    let net = parse::parse_description("P0", "1", "t1:P0=1->P0=2")
        .unwrap()
        .build()
        .unwrap();
    let tree = CoverabilityTree::build(&net).unwrap();
    let analysis = AnalysisReport::new(&tree);
    let json: serde_json::Value =
        serde_json::from_str(&io::to_json_string(&analysis).unwrap()).unwrap();

    assert_eq!(json["tree"]["nodes"][1]["marking"], serde_json::json!(["ω"]));
    assert_eq!(json["tree"]["nodes"][2]["tag"], "old");
    assert_eq!(json["properties"]["boundness"]["status"], "unbounded");
    assert!(
        analysis
            .to_text(&RenderOptions::ascii())
            .starts_with("=== COVERABILITY TREE ===\nNode 0: [1]\n  Node 1: [w]")
    );
}
