//! Undirected roadmap for PRM, stored as an arena of nodes with adjacency
//! lists of [`NodeId`] handles.

use std::collections::VecDeque;
use std::ops::Index;

use crate::common::{configuration_distance, Configuration, Plan};
use crate::path_planning::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapNode {
    pub configuration: Configuration,
    pub neighbors: Vec<NodeId>,
    pub connected_to_start: bool,
    pub connected_to_goal: bool,
    /// Edge count from the start, set by the breadth-first query
    pub hops: Option<usize>,
    /// Previous node on the breadth-first path from the start
    pub predecessor: Option<NodeId>,
}

impl RoadmapNode {
    fn new(configuration: Configuration) -> Self {
        RoadmapNode {
            configuration,
            neighbors: Vec::new(),
            connected_to_start: false,
            connected_to_goal: false,
            hops: None,
            predecessor: None,
        }
    }

    fn flags(&self) -> (bool, bool) {
        (self.connected_to_start, self.connected_to_goal)
    }
}

#[derive(Debug, Clone)]
pub struct Roadmap {
    nodes: Vec<RoadmapNode>,
    start: NodeId,
    goal: NodeId,
}

impl Roadmap {
    /// Roadmap seeded with the start and goal nodes
    pub fn new(start: Configuration, goal: Configuration) -> Self {
        let mut start_node = RoadmapNode::new(start);
        start_node.connected_to_start = true;
        let mut goal_node = RoadmapNode::new(goal);
        goal_node.connected_to_goal = true;
        Roadmap { nodes: vec![start_node, goal_node], start: NodeId(0), goal: NodeId(1) }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn goal(&self) -> NodeId {
        self.goal
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_node(&mut self, configuration: Configuration) -> NodeId {
        self.nodes.push(RoadmapNode::new(configuration));
        NodeId(self.nodes.len() - 1)
    }

    /// Add an undirected edge
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        self.nodes[a.0].neighbors.push(b);
        self.nodes[b.0].neighbors.push(a);
    }

    /// Every node within `radius` of `target`, with its distance
    pub fn near(&self, target: &Configuration, radius: f64) -> Vec<(NodeId, f64)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| {
                let distance = configuration_distance(&node.configuration, target);
                if distance <= radius {
                    Some((NodeId(i), distance))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Spread the start/goal connectivity flags through the component of
    /// `from` and report whether start and goal are now connected.
    ///
    /// `from` first absorbs the flags of its neighbors, then a depth-first
    /// worklist ORs flags outward, continuing only through nodes whose
    /// flags changed.
    pub fn propagate_connectivity(&mut self, from: NodeId) -> bool {
        let (mut to_start, mut to_goal) = self.nodes[from.0].flags();
        for neighbor in &self.nodes[from.0].neighbors {
            let (s, g) = self.nodes[neighbor.0].flags();
            to_start |= s;
            to_goal |= g;
        }
        self.nodes[from.0].connected_to_start = to_start;
        self.nodes[from.0].connected_to_goal = to_goal;

        let mut connected = to_start && to_goal;
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            let (s, g) = self.nodes[current.0].flags();
            connected |= s && g;
            for i in 0..self.nodes[current.0].neighbors.len() {
                let neighbor = self.nodes[current.0].neighbors[i];
                let node = &mut self.nodes[neighbor.0];
                let before = node.flags();
                node.connected_to_start |= s;
                node.connected_to_goal |= g;
                if node.flags() != before {
                    stack.push(neighbor);
                }
            }
        }
        connected
    }

    /// Breadth-first search from the start; labels every visited node with
    /// its hop count and predecessor and returns the plan to the goal.
    pub fn shortest_path(&mut self) -> Option<Plan> {
        for node in &mut self.nodes {
            node.hops = None;
            node.predecessor = None;
        }
        self.nodes[self.start.0].hops = Some(0);

        let mut queue = VecDeque::new();
        queue.push_back(self.start);
        let mut reached = false;
        while let Some(current) = queue.pop_front() {
            if current == self.goal {
                reached = true;
                break;
            }
            let hops = self.nodes[current.0].hops.map_or(0, |h| h + 1);
            for i in 0..self.nodes[current.0].neighbors.len() {
                let neighbor = self.nodes[current.0].neighbors[i];
                let node = &mut self.nodes[neighbor.0];
                if node.hops.is_none() {
                    node.hops = Some(hops);
                    node.predecessor = Some(current);
                    queue.push_back(neighbor);
                }
            }
        }
        if !reached {
            return None;
        }

        let mut configurations = Vec::new();
        let mut current = Some(self.goal);
        while let Some(id) = current {
            configurations.push(self.nodes[id.0].configuration.clone());
            current = self.nodes[id.0].predecessor;
        }
        configurations.reverse();
        Some(Plan::from_configurations(configurations))
    }
}

impl Index<NodeId> for Roadmap {
    type Output = RoadmapNode;

    fn index(&self, id: NodeId) -> &RoadmapNode {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(angles: &[f64]) -> Configuration {
        Configuration::from_vec(angles.to_vec())
    }

    fn flags(roadmap: &Roadmap) -> Vec<(bool, bool)> {
        (0..roadmap.len()).map(|i| roadmap[NodeId(i)].flags()).collect()
    }

    #[test]
    fn test_seeded_flags() {
        let roadmap = Roadmap::new(q(&[0.0, 0.0]), q(&[1.0, 1.0]));
        assert_eq!(roadmap.len(), 2);
        assert!(roadmap[roadmap.start()].connected_to_start);
        assert!(!roadmap[roadmap.start()].connected_to_goal);
        assert!(roadmap[roadmap.goal()].connected_to_goal);
    }

    #[test]
    fn test_bridge_node_connects_start_and_goal() {
        let mut roadmap = Roadmap::new(q(&[0.0, 0.0]), q(&[1.0, 1.0]));
        let bridge = roadmap.add_node(q(&[0.5, 0.5]));
        roadmap.connect(bridge, roadmap.start());
        roadmap.connect(bridge, roadmap.goal());

        assert!(roadmap.propagate_connectivity(bridge));
        assert!(flags(&roadmap).iter().all(|&f| f == (true, true)));
    }

    #[test]
    fn test_isolated_chain_stays_unconnected() {
        let mut roadmap = Roadmap::new(q(&[0.0, 0.0]), q(&[1.0, 1.0]));
        let a = roadmap.add_node(q(&[0.2, 0.0]));
        roadmap.connect(a, roadmap.start());
        assert!(!roadmap.propagate_connectivity(a));
        let b = roadmap.add_node(q(&[0.3, 0.0]));
        roadmap.connect(b, a);
        assert!(!roadmap.propagate_connectivity(b));

        assert_eq!(roadmap[b].flags(), (true, false));
        assert_eq!(roadmap[roadmap.goal()].flags(), (false, true));
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let mut roadmap = Roadmap::new(q(&[0.0, 0.0]), q(&[1.0, 1.0]));
        let a = roadmap.add_node(q(&[0.2, 0.2]));
        let b = roadmap.add_node(q(&[0.8, 0.8]));
        let c = roadmap.add_node(q(&[0.5, 0.5]));
        roadmap.connect(a, roadmap.start());
        roadmap.propagate_connectivity(a);
        roadmap.connect(b, roadmap.goal());
        roadmap.propagate_connectivity(b);
        roadmap.connect(c, a);
        roadmap.connect(c, b);

        let first = roadmap.propagate_connectivity(c);
        let after_first = flags(&roadmap);
        let second = roadmap.propagate_connectivity(c);
        assert!(first && second);
        assert_eq!(flags(&roadmap), after_first);
    }

    #[test]
    fn test_shortest_path_counts_hops() {
        let mut roadmap = Roadmap::new(q(&[0.0, 0.0]), q(&[1.0, 1.0]));
        let a = roadmap.add_node(q(&[0.2, 0.2]));
        let b = roadmap.add_node(q(&[0.4, 0.4]));
        let c = roadmap.add_node(q(&[0.6, 0.6]));
        // long route start-a-b-c-goal and short route start-b-goal
        roadmap.connect(roadmap.start(), a);
        roadmap.connect(a, b);
        roadmap.connect(b, c);
        roadmap.connect(c, roadmap.goal());
        roadmap.connect(roadmap.start(), b);
        roadmap.connect(b, roadmap.goal());

        let plan = roadmap.shortest_path().unwrap();
        assert_eq!(plan.configurations, vec![q(&[0.0, 0.0]), q(&[0.4, 0.4]), q(&[1.0, 1.0])]);
        assert_eq!(roadmap[roadmap.goal()].hops, Some(2));
        assert_eq!(roadmap[b].predecessor, Some(roadmap.start()));
    }

    #[test]
    fn test_shortest_path_without_connection() {
        let mut roadmap = Roadmap::new(q(&[0.0, 0.0]), q(&[1.0, 1.0]));
        let a = roadmap.add_node(q(&[0.2, 0.2]));
        roadmap.connect(roadmap.start(), a);
        assert!(roadmap.shortest_path().is_none());
    }

    #[test]
    fn test_near() {
        let mut roadmap = Roadmap::new(q(&[0.0, 0.0]), q(&[1.0, 1.0]));
        let a = roadmap.add_node(q(&[0.1, 0.0]));
        let near = roadmap.near(&q(&[0.0, 0.0]), 0.5);
        let ids: Vec<NodeId> = near.iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![roadmap.start(), a]);
    }
}
