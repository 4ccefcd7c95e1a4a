/*
wirenano, automated scaffold routing for wireframe DNA nanostructures.
    Copyright (C) 2021  Nicolas Levy <nicolaspierrelevy@gmail.com> and Nicolas Schabanel <nicolas.schabanel@ens-lyon.fr>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! The routing graph and the routing of the scaffold along it.
//!
//! The routing graph is an arena of nodes and segments indexed by integers. Nodes are either
//! splits of mesh vertices or split placeholders inside crossover edges. Segments are either
//! pieces of duplex or zero-length links between the sibling nodes of a vertex.

use super::{EdgeId, NodeId, RoutingError, SegmentId, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Vertex {
        vertex: VertexId,
        local_index: usize,
    },
    Split {
        edge: EdgeId,
        split: usize,
    },
}

/// How the scaffold goes through a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    /// The scaffold leaves through the segment that follows the one it arrived on in the
    /// rotation of the node.
    Junction,
    /// The scaffold leaves through the segment it arrived on.
    Turnaround,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub role: NodeRole,
    /// The incident segments in cyclic order.
    pub rotation: Vec<SegmentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// The base pairs `[coordinates.0, coordinates.1)` of an edge.
    Duplex {
        edge: EdgeId,
        coordinates: (usize, usize),
    },
    /// A link between two sibling nodes of a vertex.
    Link { vertex: VertexId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedSegment {
    pub id: SegmentId,
    pub kind: SegmentKind,
    /// The two nodes joined by the segment. For a duplex, `ends.0` is at the low coordinate end.
    pub ends: (NodeId, NodeId),
    /// The rank in the scaffold circuit of the forward (`ends.0 -> ends.1`) and backward passes.
    pub ranks: [Option<usize>; 2],
}

impl RoutedSegment {
    pub fn len(&self) -> usize {
        match self.kind {
            SegmentKind::Duplex { coordinates, .. } => coordinates.1 - coordinates.0,
            SegmentKind::Link { .. } => 0,
        }
    }

    pub fn other_end(&self, node: NodeId) -> NodeId {
        if self.ends.0 == node {
            self.ends.1
        } else {
            self.ends.0
        }
    }

    pub fn edge(&self) -> Option<EdgeId> {
        match self.kind {
            SegmentKind::Duplex { edge, .. } => Some(edge),
            SegmentKind::Link { .. } => None,
        }
    }
}

/// One pass of the scaffold through a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitArc {
    pub segment: SegmentId,
    pub from: NodeId,
    pub to: NodeId,
}

impl CircuitArc {
    /// True if the arc goes from `ends.0` to `ends.1` of its segment.
    pub fn is_forward(&self, graph: &RoutingGraph) -> bool {
        graph.segments[self.segment].ends.0 == self.from
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingGraph {
    pub nodes: Vec<RoutingNode>,
    pub segments: Vec<RoutedSegment>,
}

impl RoutingGraph {
    fn arc(&self, segment: SegmentId, from: NodeId) -> CircuitArc {
        CircuitArc {
            segment,
            from,
            to: self.segments[segment].other_end(from),
        }
    }

    /// The segment through which the scaffold leaves `node` after arriving through `segment`.
    pub fn exit_segment(&self, node: NodeId, segment: SegmentId) -> Option<SegmentId> {
        let node = &self.nodes[node];
        match node.role {
            NodeRole::Turnaround => Some(segment),
            NodeRole::Junction => {
                let i = node.rotation.iter().position(|s| *s == segment)?;
                Some(node.rotation[(i + 1) % node.rotation.len()])
            }
        }
    }

    /// The nodes that were obtained by splitting `vertex`, in order of local index.
    pub fn nodes_of_vertex(&self, vertex: VertexId) -> impl Iterator<Item = &RoutingNode> {
        self.nodes.iter().filter(move |n| match n.kind {
            NodeKind::Vertex { vertex: v, .. } => v == vertex,
            NodeKind::Split { .. } => false,
        })
    }

    /// The edges of the duplex segments incident to the nodes of `vertex`.
    pub fn hosted_edges(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.nodes_of_vertex(vertex)
            .flat_map(|n| n.rotation.iter())
            .filter_map(|s| self.segments[*s].edge())
            .collect()
    }
}

/// Route the scaffold along `graph` and write the ranks of the circuit on the segments.
///
/// The walk starts at the first node of the lowest vertex, through its lowest segment. At a
/// junction node it leaves through the successor of the arrival segment in the rotation of the
/// node, at a turnaround node it leaves back through the arrival segment. It stops when it is
/// about to repeat its first arc.
pub fn route_scaffold(graph: &mut RoutingGraph) -> Result<Vec<CircuitArc>, RoutingError> {
    let nb_segments = graph.segments.len();
    let start_node = graph.nodes.first().ok_or(RoutingError::EmptyGraph)?;
    let start_segment = start_node
        .rotation
        .iter()
        .min()
        .copied()
        .ok_or(RoutingError::EmptyGraph)?;
    let expected = 2 * nb_segments;
    let first = graph.arc(start_segment, start_node.id);

    let mut arcs = Vec::with_capacity(expected);
    let mut current = first;
    loop {
        arcs.push(current);
        if arcs.len() > expected {
            return Err(RoutingError::IncompleteCircuit {
                nb_arcs: arcs.len(),
                expected,
                missing_segment: None,
            });
        }
        let next_segment = graph.exit_segment(current.to, current.segment).ok_or(
            RoutingError::IncompleteCircuit {
                nb_arcs: arcs.len(),
                expected,
                missing_segment: Some(current.segment),
            },
        )?;
        let next = graph.arc(next_segment, current.to);
        if next == first {
            break;
        }
        current = next;
    }

    let mut ranks: Vec<[Option<usize>; 2]> = vec![[None, None]; nb_segments];
    for (rank, arc) in arcs.iter().enumerate() {
        let direction = if arc.is_forward(graph) { 0 } else { 1 };
        if ranks[arc.segment][direction].is_some() {
            return Err(RoutingError::IncompleteCircuit {
                nb_arcs: arcs.len(),
                expected,
                missing_segment: Some(arc.segment),
            });
        }
        ranks[arc.segment][direction] = Some(rank);
    }
    if let Some(missing) = ranks.iter().position(|r| r[0].is_none() || r[1].is_none()) {
        return Err(RoutingError::IncompleteCircuit {
            nb_arcs: arcs.len(),
            expected,
            missing_segment: Some(missing),
        });
    }
    for (segment, ranks) in graph.segments.iter_mut().zip(ranks.into_iter()) {
        segment.ranks = ranks;
    }
    log::debug!("Scaffold circuit of {} arcs", arcs.len());
    Ok(arcs)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A path a - b - c where the inner node is a junction and the ends are turnarounds.
    fn path() -> RoutingGraph {
        let duplex = |edge| SegmentKind::Duplex {
            edge,
            coordinates: (0, 31),
        };
        RoutingGraph {
            nodes: vec![
                RoutingNode {
                    id: 0,
                    kind: NodeKind::Vertex {
                        vertex: 0,
                        local_index: 0,
                    },
                    role: NodeRole::Junction,
                    rotation: vec![0, 1],
                },
                RoutingNode {
                    id: 1,
                    kind: NodeKind::Split { edge: 0, split: 0 },
                    role: NodeRole::Turnaround,
                    rotation: vec![0],
                },
                RoutingNode {
                    id: 2,
                    kind: NodeKind::Split { edge: 1, split: 0 },
                    role: NodeRole::Turnaround,
                    rotation: vec![1],
                },
            ],
            segments: vec![
                RoutedSegment {
                    id: 0,
                    kind: duplex(0),
                    ends: (0, 1),
                    ranks: [None, None],
                },
                RoutedSegment {
                    id: 1,
                    kind: duplex(1),
                    ends: (0, 2),
                    ranks: [None, None],
                },
            ],
        }
    }

    #[test]
    fn walk_around_a_path() {
        let mut graph = path();
        let arcs = route_scaffold(&mut graph).unwrap();
        let visited: Vec<_> = arcs.iter().map(|a| (a.segment, a.from, a.to)).collect();
        assert_eq!(visited, vec![(0, 0, 1), (0, 1, 0), (1, 0, 2), (1, 2, 0)]);
        assert_eq!(graph.segments[0].ranks, [Some(0), Some(1)]);
        assert_eq!(graph.segments[1].ranks, [Some(2), Some(3)]);
    }

    #[test]
    fn cycle_of_junctions_is_not_a_circuit() {
        let mut graph = path();
        // Closing the path into a loop makes the walk miss the backward passes
        graph.nodes[1].role = NodeRole::Junction;
        graph.nodes[2].role = NodeRole::Junction;
        graph.segments.push(RoutedSegment {
            id: 2,
            kind: SegmentKind::Link { vertex: 0 },
            ends: (1, 2),
            ranks: [None, None],
        });
        graph.nodes[1].rotation.push(2);
        graph.nodes[2].rotation.push(2);
        assert!(matches!(
            route_scaffold(&mut graph),
            Err(RoutingError::IncompleteCircuit { .. })
        ));
    }

    #[test]
    fn empty_graph() {
        let mut graph = RoutingGraph::default();
        assert_eq!(route_scaffold(&mut graph), Err(RoutingError::EmptyGraph));
    }
}
