//! Deferred parent links
//!
//! A child may be serialized before its parent, so no link is resolved while
//! nodes are still being materialized. Phases only queue `(child, parent id)`
//! pairs; [`PendingParents::resolve`] runs once, after every phase that can
//! create a node.

use crate::scene::{NodeHandle, Scene};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub resolved: usize,
    /// Links whose parent id matched no node, or that would have formed a cycle.
    pub dangling: usize,
}

#[derive(Debug, Default)]
pub(crate) struct PendingParents {
    links: Vec<(NodeHandle, String)>,
}

impl PendingParents {
    /// Queues a link when the payload declares a parent.
    pub fn queue(&mut self, child: NodeHandle, parent_id: Option<&str>) {
        if let Some(parent_id) = parent_id.filter(|id| !id.is_empty()) {
            self.links.push((child, parent_id.to_string()));
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Attaches every queued child to the node its parent id names.
    ///
    /// Unresolvable ids, and links that would form a cycle, leave the child
    /// parentless.
    pub fn resolve(self, scene: &mut Scene) -> LinkReport {
        let mut report = LinkReport::default();
        for (child, parent_id) in self.links {
            match scene.get_node_by_id(&parent_id) {
                Some(parent) if scene.attach(child, parent) => report.resolved += 1,
                Some(_) => {
                    scene.detach(child);
                    report.dangling += 1;
                }
                None => {
                    log::debug!("Parent '{parent_id}' not found, node moves to the scene root");
                    scene.detach(child);
                    report.dangling += 1;
                }
            }
        }
        report
    }
}
