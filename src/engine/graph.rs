//! Dependency graph and cycle search.
//!
//! Nodes are `tool:path` identities of documents that declare dependencies.
//! Edge targets are the raw identifiers from the `dependencies` lists; a
//! target does not have to be a node itself; such targets simply have no
//! outgoing edges.
//!
//! The search is a white/gray/black depth-first traversal that keeps its own
//! stack instead of recursing, so deep dependency chains cannot overflow the
//! call stack:
//!
//! ```text
//! stack (= current path)       on_path           visited
//! [(A,1) (B,1) (C,0)]          {A, B, C}         {A, B, C}
//!   C -> A: A is on the path -> cycle [A, B, C, A]
//! ```
//!
//! A node is expanded at most once across all start points, which keeps the
//! search O(nodes + edges).

use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub(crate) struct DependencyGraph {
    /// Nodes in insertion order; traversal starts are tried in this order.
    nodes: Vec<String>,
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Add `node` with its outgoing edges. Re-inserting a node replaces its
    /// edges but keeps its original position.
    pub fn insert(&mut self, node: String, targets: Vec<String>) {
        if !self.edges.contains_key(&node) {
            self.nodes.push(node.clone());
        }
        self.edges.insert(node, targets);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn targets(&self, node: &str) -> &[String] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All cycles met by the traversal.
    ///
    /// Each cycle runs from the first occurrence of the repeated node on the
    /// current path through the node that closed it, and repeats the first
    /// node at the end: `[A, B, C, A]`.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut on_path: HashSet<&str> = HashSet::new();

        for start in &self.nodes {
            if visited.contains(start.as_str()) {
                continue;
            }

            // Each frame is (node, index of the next edge to follow).
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            visited.insert(start.as_str());
            on_path.insert(start.as_str());

            while let Some(&(node, next)) = stack.last() {
                let Some(target) = self.targets(node).get(next) else {
                    stack.pop();
                    on_path.remove(node);
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                let target = target.as_str();
                if !visited.contains(target) {
                    visited.insert(target);
                    on_path.insert(target);
                    stack.push((target, 0));
                } else if on_path.contains(target) {
                    if let Some(pos) = stack.iter().position(|(n, _)| *n == target) {
                        let mut cycle: Vec<String> = stack[pos..].iter().map(|(n, _)| n.to_string()).collect();
                        cycle.push(target.to_string());
                        tracing::trace!(cycle = ?cycle, "dependency cycle closed");
                        cycles.push(cycle);
                    }
                }
            }
        }

        cycles
    }
}
