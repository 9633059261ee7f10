//! Parent-linked search tree stored as an arena.
//!
//! Nodes are addressed by [`NodeId`] handles into a growable vector, so
//! parent links never dangle and the whole tree is released at once when
//! the planning call returns.

use std::ops::Index;

use ordered_float::OrderedFloat;

use crate::common::{configuration_distance, Configuration, Plan};

/// Stable handle of a node inside one tree or roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Tree node for RRT, RRT-Connect and RRT*
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub configuration: Configuration,
    pub parent: Option<NodeId>,
    /// Number of nodes on the branch from the root, root included
    pub depth: usize,
    /// Cumulative path length from the root (RRT* only)
    pub cost: f64,
}

/// Nearest node plus every node inside a radius
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    pub nearest: NodeId,
    pub nearest_distance: f64,
    pub near: Vec<(NodeId, f64)>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(root: Configuration) -> Self {
        Tree {
            nodes: vec![TreeNode { configuration: root, parent: None, depth: 1, cost: 0.0 }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn add_child(&mut self, parent: NodeId, configuration: Configuration, cost: f64) -> NodeId {
        let depth = self[parent].depth + 1;
        self.nodes.push(TreeNode { configuration, parent: Some(parent), depth, cost });
        NodeId(self.nodes.len() - 1)
    }

    /// Attach `node` to `new_parent` with an updated cost.
    ///
    /// Costs of the descendants of `node` are not refreshed.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId, cost: f64) {
        let depth = self[new_parent].depth + 1;
        let entry = &mut self.nodes[node.0];
        entry.parent = Some(new_parent);
        entry.depth = depth;
        entry.cost = cost;
    }

    /// Closest node by linear scan
    pub fn nearest(&self, target: &Configuration) -> (NodeId, f64) {
        self.iter()
            .map(|(id, node)| (id, configuration_distance(&node.configuration, target)))
            .min_by_key(|&(_, distance)| OrderedFloat(distance))
            .unwrap_or((self.root(), f64::INFINITY))
    }

    /// Closest node and all nodes within `radius` in a single scan
    pub fn neighborhood(&self, target: &Configuration, radius: f64) -> Neighborhood {
        let mut neighborhood = Neighborhood {
            nearest: self.root(),
            nearest_distance: f64::INFINITY,
            near: Vec::new(),
        };
        for (id, node) in self.iter() {
            let distance = configuration_distance(&node.configuration, target);
            if distance < neighborhood.nearest_distance {
                neighborhood.nearest = id;
                neighborhood.nearest_distance = distance;
            }
            if distance <= radius {
                neighborhood.near.push((id, distance));
            }
        }
        neighborhood
    }

    /// Configurations from `node` back to the root
    pub fn branch_to_root(&self, node: NodeId) -> Vec<Configuration> {
        let mut branch = Vec::with_capacity(self[node].depth);
        let mut current = Some(node);
        while let Some(id) = current {
            branch.push(self[id].configuration.clone());
            current = self[id].parent;
        }
        branch
    }

    /// Plan from the root to `node`
    pub fn path_from_root(&self, node: NodeId) -> Plan {
        let mut configurations = self.branch_to_root(node);
        configurations.reverse();
        Plan::from_configurations(configurations)
    }
}

impl Index<NodeId> for Tree {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }
}
