//! Tree builder and matcher.
//!
//! A body record is resolved in three steps, cheapest first:
//!
//! 1. body identifier already indexed: that node;
//! 2. no distinct designation: a node already answering to the record's
//!    name (strict pass respecting root placement, then a relaxed pass);
//! 3. otherwise decompose the designator and walk the path from the roots,
//!    creating placeholders for missing segments.
//!
//! The designator is decomposed before any of these steps, so a record that
//! cannot be decomposed is rejected even when its body id is already known,
//! and never touches the tree.

use starmap_names::{custom_name, decompose, related_remainder, DecomposedPath, MAIN_STAR};
use tracing::{debug, warn};

use crate::diagnostics::Diagnostic;
use crate::error::RejectReason;
use crate::node::same_name;
use crate::records::{BodyRecord, ParentKind};
use crate::registry::SystemRegistry;
use crate::types::{BodyHint, BodyId, NodeId, NodeKind};
use crate::Context;

impl SystemRegistry {
    /// Resolve a body record to its node, creating the path as needed.
    pub(crate) fn insert_body(
        &mut self,
        record: &BodyRecord,
        ctx: &Context<'_>,
    ) -> Result<NodeId, RejectReason> {
        let path = decompose(&record.full_name, self.name(), record.designation.as_deref())?;

        if let Some(id) = record.body_id.and_then(|b| self.by_body_id.get(&b).copied()) {
            debug!(system = %self.address(), name = %record.full_name, ?id, "matched by body id");
            self.absorb(id, record, &path);
            return Ok(id);
        }

        if let Some(id) = self.match_structural(record, ctx) {
            debug!(system = %self.address(), name = %record.full_name, ?id, "matched by name");
            self.absorb(id, record, &path);
            return Ok(id);
        }

        let id = self
            .walk(&path)
            .ok_or_else(|| RejectReason::DecompositionFailed(record.full_name.clone()))?;
        self.absorb(id, record, &path);
        Ok(id)
    }

    fn match_structural(&self, record: &BodyRecord, ctx: &Context<'_>) -> Option<NodeId> {
        if record
            .designation
            .as_deref()
            .is_some_and(|d| !same_name(d, &record.full_name))
        {
            return None;
        }

        let wants_root = record.hint.is_root_class();
        let mut candidates = self.nodes.iter().filter(|n| {
            n.answers_to(&record.full_name) && ids_compatible(n.body_id, record.body_id)
        });
        let loose = candidates.clone().next().map(|n| n.id);
        let strict = candidates
            .find(|n| (n.level == 0) == wants_root)
            .map(|n| n.id);

        match (strict, loose) {
            (Some(strict), Some(loose)) if strict != loose => {
                ctx.sink.report(Diagnostic::AmbiguousMatch {
                    system: self.address(),
                    name: record.full_name.clone(),
                    strict,
                    loose,
                });
                Some(strict)
            }
            (Some(strict), _) => Some(strict),
            (None, Some(loose)) => {
                ctx.sink.report(Diagnostic::LooseMatch {
                    system: self.address(),
                    name: record.full_name.clone(),
                    node: loose,
                });
                Some(loose)
            }
            (None, None) => None,
        }
    }

    /// Find or create every node along `path`; returns the last one.
    fn walk(&mut self, path: &DecomposedPath) -> Option<NodeId> {
        let mut parent: Option<NodeId> = None;
        let mut full_name = String::new();
        // names unrelated to the system are not prefixed with it
        let unrelated = path.remainder().is_none();

        for (level, segment) in path.segments().iter().enumerate() {
            full_name = match parent {
                None if segment == MAIN_STAR => self.name().to_owned(),
                None => format!("{} {}", self.name(), segment),
                Some(_) if level == 1 && unrelated => segment.clone(),
                Some(_) => format!("{full_name} {segment}"),
            };
            let kind = path_kind(path, level, segment);

            let id = match self.child_of(parent, segment) {
                Some(id) => id,
                None => {
                    let id = self.add_node(parent, segment, full_name.clone(), kind);
                    debug!(system = %self.address(), name = %full_name, ?kind, "created node");
                    id
                }
            };

            let node = self.node_mut(id);
            if node.is_placeholder() {
                node.kind = kind;
            }
            parent = Some(id);
        }

        parent
    }

    /// Merge a record into the node it resolved to.
    fn absorb(&mut self, id: NodeId, record: &BodyRecord, path: &DecomposedPath) {
        let custom = custom_name(
            &record.full_name,
            self.name(),
            path.remainder(),
            record.hint == BodyHint::Star,
        );
        let address = self.address();

        let node = &mut self.nodes[id.index()];
        node.kind = refine(node.kind, record.hint, &node.own_name);
        if custom.is_some() {
            node.custom_name = custom;
        }
        if let Some(detail) = &record.detail {
            if node.detail.is_none() || record.provenance >= node.provenance {
                node.detail = Some(detail.clone());
            }
        }
        node.provenance = node.provenance.max(record.provenance);

        if let Some(body) = record.body_id {
            if let Some(previous) = node.body_id.replace(body) {
                if previous != body {
                    warn!(system = %address, name = %node.full_name, %previous, %body, "body id changed");
                    self.by_body_id.remove(&previous);
                }
            }
            self.by_body_id.insert(body, id);
        }

        self.apply_known_barycentres(id);
        self.attach_rings(id);
    }

    /// Fill ancestry entries of `id` from barycentres seen so far.
    pub(crate) fn apply_known_barycentres(&mut self, id: NodeId) -> usize {
        let barycentres = &self.barycentres;
        let Some(detail) = self.nodes[id.index()].detail.as_mut() else {
            return 0;
        };
        let mut applied = 0;
        for link in detail.parents.iter_mut().filter(|l| l.kind == ParentKind::Null) {
            if let Some(observation) = barycentres.get(&link.body_id) {
                link.barycentre = Some(observation.clone());
                applied += 1;
            }
        }
        applied
    }

    /// Create belt and ring children described by a body's scan detail.
    fn attach_rings(&mut self, parent: NodeId) {
        let node = &self.nodes[parent.index()];
        let Some(detail) = node.detail.as_ref().filter(|d| !d.rings.is_empty()) else {
            return;
        };
        let rings = detail.rings.clone();
        let parent_name = node.full_name.clone();
        let provenance = node.provenance;

        for ring in rings {
            let kind = if last_word_is(&ring.name, "belt") {
                NodeKind::Belt
            } else if last_word_is(&ring.name, "ring") {
                NodeKind::Ring
            } else {
                continue;
            };

            let (own_name, full_name) = match related_remainder(&ring.name, &parent_name) {
                Some(own) if !own.is_empty() => {
                    let full = format!("{parent_name} {own}");
                    (own, full)
                }
                _ => (ring.name.clone(), ring.name.clone()),
            };

            let id = match self.child_of(Some(parent), &own_name) {
                Some(id) => id,
                None => self.add_node(Some(parent), &own_name, full_name, kind),
            };
            let child = self.node_mut(id);
            child.kind = kind;
            child.ring_data = Some(ring);
            if child.is_placeholder() {
                child.provenance = provenance;
            }
        }
    }
}

fn ids_compatible(node: Option<BodyId>, record: Option<BodyId>) -> bool {
    match (node, record) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Kind a path segment takes when nothing more specific is known.
fn path_kind(path: &DecomposedPath, level: usize, segment: &str) -> NodeKind {
    match level {
        0 => NodeKind::from_root(path.root_kind()),
        1 if path.is_belt_cluster() => NodeKind::Belt,
        2 if path.is_belt_cluster() => NodeKind::BeltCluster,
        _ if last_word_is(segment, "belt") => NodeKind::Belt,
        _ if last_word_is(segment, "ring") => NodeKind::Ring,
        _ => NodeKind::PlanetMoonSubstar,
    }
}

/// Sharpen a node's kind with the record's own classification.
fn refine(kind: NodeKind, hint: BodyHint, own_name: &str) -> NodeKind {
    match hint {
        BodyHint::Ring => NodeKind::Ring,
        BodyHint::Barycentre => NodeKind::Barycentre,
        BodyHint::Unknown if last_word_is(own_name, "belt") => NodeKind::Belt,
        BodyHint::Star | BodyHint::Planet | BodyHint::Unknown => kind,
    }
}

fn last_word_is(name: &str, word: &str) -> bool {
    name.split_whitespace()
        .next_back()
        .is_some_and(|w| w.eq_ignore_ascii_case(word))
}
