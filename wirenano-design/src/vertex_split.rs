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
//! Splitting of the mesh vertices into routing nodes of bounded degree.

use super::{
    DesignError, EdgeId, EdgeSplit, MeshGraph, NodeId, NodeKind, NodeRole, PieceEnd,
    RoutedSegment, RoutingGraph, RoutingNode, SegmentId, SegmentKind, TopologyError,
    UnsupportedGeometryError, VertexId,
};
use ahash::AHashMap;

/// The numbers of mesh edges that a routing node may host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitModel {
    node_degrees: Vec<usize>,
}

impl Default for SplitModel {
    fn default() -> Self {
        Self::new(vec![2, 3])
    }
}

impl SplitModel {
    pub fn new(mut node_degrees: Vec<usize>) -> Self {
        node_degrees.retain(|d| *d > 0);
        node_degrees.sort_unstable();
        node_degrees.dedup();
        Self { node_degrees }
    }

    /// Routing nodes hosting exactly three edges.
    pub fn strict_degree_three() -> Self {
        Self::new(vec![3])
    }

    pub fn node_degrees(&self) -> &[usize] {
        &self.node_degrees
    }

    /// The numbers of edges hosted by the routing nodes of a vertex of degree `degree`.
    ///
    /// A vertex whose degree does not exceed the largest allowed size is not split. Otherwise the
    /// degree is decomposed in the minimum number of allowed sizes, as balanced as possible, the
    /// largest sizes first. Return `None` if there is no such decomposition.
    pub fn decompose(&self, degree: usize) -> Option<Vec<usize>> {
        let largest = self.node_degrees.last().copied().unwrap_or(0);
        if degree <= largest {
            return Some(vec![degree]);
        }
        let nb_parts = self.min_nb_parts(degree)?;
        let mut parts = Vec::with_capacity(nb_parts);
        let mut remaining = degree;
        let mut cap = largest;
        for left in (1..=nb_parts).rev() {
            let lower_bound = (remaining + left - 1) / left;
            let size = self
                .node_degrees
                .iter()
                .copied()
                .filter(|s| *s >= lower_bound && *s <= cap && *s <= remaining)
                .find(|s| self.is_feasible(remaining - s, left - 1, *s))?;
            parts.push(size);
            remaining -= size;
            cap = size;
        }
        Some(parts)
    }

    fn min_nb_parts(&self, degree: usize) -> Option<usize> {
        let mut min_parts: Vec<Option<usize>> = vec![None; degree + 1];
        min_parts[0] = Some(0);
        for d in 1..=degree {
            min_parts[d] = self
                .node_degrees
                .iter()
                .filter(|s| **s <= d)
                .filter_map(|s| min_parts[d - s].map(|n| n + 1))
                .min();
        }
        min_parts[degree]
    }

    /// True if `total` is the sum of exactly `nb_parts` allowed sizes that are at most `cap`.
    fn is_feasible(&self, total: usize, nb_parts: usize, cap: usize) -> bool {
        if nb_parts == 0 {
            return total == 0;
        }
        self.node_degrees
            .iter()
            .filter(|s| **s <= cap && **s <= total)
            .any(|s| self.is_feasible(total - s, nb_parts - 1, *s))
    }
}

/// Build the routing graph of `graph`.
///
/// Every vertex is replaced by a chain of routing nodes, each hosting a run of consecutive edges
/// of the vertex rotation. Sibling nodes are joined by link segments placed so that going around
/// the chain visits the edges in the order of the rotation. Split placeholders of the crossover
/// edges become turnaround nodes.
///
/// Fails with [`UnsupportedGeometryError`] if a vertex degree cannot be decomposed, and with
/// [`TopologyError::DanglingPiece`] if a piece of edge ends outside of its edge.
pub fn split_vertices(
    graph: &MeshGraph,
    edge_splits: &[EdgeSplit],
    model: &SplitModel,
) -> Result<RoutingGraph, DesignError> {
    let mut nodes = Vec::new();
    // For each vertex, the node hosting each of its edges.
    let mut hosts: AHashMap<(VertexId, EdgeId), NodeId> = AHashMap::new();
    let mut vertex_nodes: Vec<Vec<NodeId>> = Vec::with_capacity(graph.vertices.len());

    for vertex in graph.vertices.iter() {
        let parts = model
            .decompose(vertex.degree())
            .ok_or_else(|| UnsupportedGeometryError {
                vertex: vertex.id,
                degree: vertex.degree(),
                allowed_degrees: model.node_degrees.clone(),
            })?;
        if parts.len() > 1 {
            log::debug!("Vertex {} split in {:?}", vertex.id, parts);
        }
        let mut edges = vertex.edges.iter();
        let mut ids = Vec::with_capacity(parts.len());
        for (local_index, size) in parts.iter().enumerate() {
            let id = nodes.len();
            for e in edges.by_ref().take(*size) {
                hosts.insert((vertex.id, *e), id);
            }
            nodes.push(RoutingNode {
                id,
                kind: NodeKind::Vertex {
                    vertex: vertex.id,
                    local_index,
                },
                role: NodeRole::Junction,
                rotation: Vec::new(),
            });
            ids.push(id);
        }
        vertex_nodes.push(ids);
    }

    let mut split_nodes: AHashMap<(EdgeId, usize), NodeId> = AHashMap::new();
    for split in edge_splits.iter() {
        for s in 0..split.nb_splits {
            let id = nodes.len();
            split_nodes.insert((split.edge, s), id);
            nodes.push(RoutingNode {
                id,
                kind: NodeKind::Split {
                    edge: split.edge,
                    split: s,
                },
                role: NodeRole::Turnaround,
                rotation: Vec::new(),
            });
        }
    }

    let mut segments = Vec::new();
    // The segment by which each vertex is attached to each of its edges.
    let mut attachments: AHashMap<(VertexId, EdgeId), SegmentId> = AHashMap::new();
    for split in edge_splits.iter() {
        for piece in split.pieces.iter() {
            let id = segments.len();
            let node_of = |end: PieceEnd| match end {
                PieceEnd::Vertex(v) => hosts.get(&(v, split.edge)).copied(),
                PieceEnd::Split(s) => split_nodes.get(&(split.edge, s)).copied(),
            };
            let mut ends = [0; 2];
            for (node, end) in ends.iter_mut().zip([piece.ends.0, piece.ends.1]) {
                *node = node_of(end).ok_or(TopologyError::DanglingPiece {
                    edge: split.edge,
                    end,
                })?;
            }
            for end in [piece.ends.0, piece.ends.1] {
                match end {
                    PieceEnd::Vertex(v) => {
                        attachments.insert((v, split.edge), id);
                    }
                    PieceEnd::Split(s) => {
                        if let Some(n) = split_nodes.get(&(split.edge, s)) {
                            nodes[*n].rotation.push(id);
                        }
                    }
                }
            }
            segments.push(RoutedSegment {
                id,
                kind: SegmentKind::Duplex {
                    edge: split.edge,
                    coordinates: piece.coordinates,
                },
                ends: (ends[0], ends[1]),
                ranks: [None, None],
            });
        }
    }

    for (vertex, ids) in graph.vertices.iter().zip(vertex_nodes.iter()) {
        let links: Vec<SegmentId> = ids
            .windows(2)
            .map(|w| {
                let id = segments.len();
                segments.push(RoutedSegment {
                    id,
                    kind: SegmentKind::Link { vertex: vertex.id },
                    ends: (w[0], w[1]),
                    ranks: [None, None],
                });
                id
            })
            .collect();
        for e in vertex.edges.iter() {
            if let (Some(node), Some(segment)) = (
                hosts.get(&(vertex.id, *e)),
                attachments.get(&(vertex.id, *e)),
            ) {
                nodes[*node].rotation.push(*segment);
            }
        }
        for (j, node) in ids.iter().enumerate() {
            // The link to the previous sibling comes first and the link to the next one last
            let hosted = std::mem::take(&mut nodes[*node].rotation);
            let mut rotation = Vec::with_capacity(hosted.len() + 2);
            if j > 0 {
                rotation.push(links[j - 1]);
            }
            rotation.extend(hosted);
            if let Some(link) = links.get(j) {
                rotation.push(*link);
            }
            nodes[*node].rotation = rotation;
        }
    }

    Ok(RoutingGraph { nodes, segments })
}
