//! Shared fixtures for the starmap integration tests.

use std::sync::Arc;

use starmap_tree::{
    BodyHint, BodyId, BodyRecord, Engine, EngineConfig, NodeKind, Provenance, RecordingSink,
    SystemAddress, SystemRegistry,
};

pub const SOL: SystemAddress = SystemAddress(10477373803);

/// Engine with an in-memory diagnostic sink.
pub fn recording_engine() -> (Engine, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let engine = Engine::with_sink(EngineConfig::default(), sink.clone());
    (engine, sink)
}

/// A body record in Sol.
pub fn sol(name: &str, hint: BodyHint) -> BodyRecord {
    BodyRecord::new(SOL, "Sol", name, hint)
}

/// A representative mix of Sol records: stars, planets, moons, a belt
/// cluster, a ring, a barycentre group and a uniquely named body.
pub fn sol_bodies() -> Vec<BodyRecord> {
    vec![
        sol("Sol", BodyHint::Star).with_body_id(0),
        sol("Sol 1", BodyHint::Planet).with_body_id(1),
        sol("Sol 1 a", BodyHint::Planet).with_body_id(2),
        sol("Sol A Belt Cluster 1", BodyHint::Unknown).with_body_id(3),
        sol("Sol 2 A Ring", BodyHint::Ring).with_body_id(4),
        sol("Sol AB 1", BodyHint::Planet).with_body_id(5),
        sol("Earth", BodyHint::Planet).with_designation("Sol 3").with_body_id(6),
        sol("Sol B", BodyHint::Star).with_body_id(7),
    ]
}

/// One node as seen by shape comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
    pub full_name: String,
    pub own_name: String,
    pub level: usize,
    pub kind: NodeKind,
    pub body_id: Option<BodyId>,
    pub custom_name: Option<String>,
    pub provenance: Provenance,
    pub children: Vec<String>,
}

/// Pre-order listing of a registry, independent of node creation order.
pub fn shape(registry: &SystemRegistry) -> Vec<NodeShape> {
    registry
        .depth_first()
        .map(|node| NodeShape {
            full_name: node.full_name().to_owned(),
            own_name: node.own_name().to_owned(),
            level: node.level(),
            kind: node.kind(),
            body_id: node.body_id(),
            custom_name: node.custom_name().map(str::to_owned),
            provenance: node.provenance(),
            children: registry
                .children(node.id())
                .map(|child| child.own_name().to_owned())
                .collect(),
        })
        .collect()
}

/// Shape of one system in an engine, empty if the system is unknown.
pub fn engine_shape(engine: &Engine, system: SystemAddress) -> Vec<NodeShape> {
    engine
        .snapshot(system)
        .map(|handle| shape(&handle.lock()))
        .unwrap_or_default()
}

/// Check that parent and child links agree everywhere in a registry.
pub fn assert_links_consistent(registry: &SystemRegistry) {
    for node in registry.nodes() {
        match node.parent() {
            None => {
                assert!(node.is_root());
                assert_eq!(node.level(), 0, "{} is a root", node.full_name());
                let root = registry.root(node.own_name()).map(|r| r.id());
                assert_eq!(root, Some(node.id()), "{} listed as root", node.full_name());
            }
            Some(parent) => {
                let parent = registry.node(parent).expect("parent exists");
                assert_eq!(parent.level() + 1, node.level());
                assert_eq!(parent.child(node.own_name()), Some(node.id()));
            }
        }
    }
}
