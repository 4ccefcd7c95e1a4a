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
//! Subdivision of the mesh edges into the pieces along which the scaffold is routed.

use super::{EdgeId, EdgeKind, MeshGraph, TopologyError, VertexId};

/// One end of a piece of edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceEnd {
    Vertex(VertexId),
    /// A split placeholder inside the edge, identified by its index among the splits of the edge.
    Split(usize),
}

/// A piece of an edge covering the base pairs `[coordinates.0, coordinates.1)` of the edge.
///
/// `ends.0` is at the low coordinate end of the piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPiece {
    pub ends: (PieceEnd, PieceEnd),
    pub coordinates: (usize, usize),
}

impl SplitPiece {
    pub fn len(&self) -> usize {
        self.coordinates.1 - self.coordinates.0
    }

    /// The mesh vertex to which the piece is attached, if any.
    pub fn attached_vertices(&self) -> impl Iterator<Item = VertexId> {
        [self.ends.0, self.ends.1].into_iter().filter_map(|e| match e {
            PieceEnd::Vertex(v) => Some(v),
            PieceEnd::Split(_) => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSplit {
    pub edge: EdgeId,
    pub kind: EdgeKind,
    pub base_pairs: usize,
    pub nb_splits: usize,
    pub pieces: Vec<SplitPiece>,
}

impl EdgeSplit {
    /// The coordinate at which the scaffold crossover of a crossover edge is made.
    pub fn crossover_position(&self) -> Option<usize> {
        if self.kind == EdgeKind::Crossover {
            Some(self.base_pairs / 2)
        } else {
            None
        }
    }
}

/// Split every edge of `graph` into routed pieces.
///
/// Tree edges are kept whole. Crossover edges are cut in their middle, each half going from one
/// end of the edge to a split placeholder. With `single_crossovers` the two halves share one
/// placeholder, otherwise each has its own.
pub fn split_edges(
    graph: &MeshGraph,
    single_crossovers: bool,
) -> Result<Vec<EdgeSplit>, TopologyError> {
    graph
        .edges
        .iter()
        .map(|edge| {
            let (v0, v1) = edge.vertices;
            let length = edge.base_pairs;
            match edge.kind {
                EdgeKind::Unclassified => Err(TopologyError::Unclassified { edge: edge.id }),
                EdgeKind::Tree => Ok(EdgeSplit {
                    edge: edge.id,
                    kind: edge.kind,
                    base_pairs: length,
                    nb_splits: 0,
                    pieces: vec![SplitPiece {
                        ends: (PieceEnd::Vertex(v0), PieceEnd::Vertex(v1)),
                        coordinates: (0, length),
                    }],
                }),
                EdgeKind::Crossover => {
                    let middle = length / 2;
                    let (nb_splits, upper_split) = if single_crossovers { (1, 0) } else { (2, 1) };
                    Ok(EdgeSplit {
                        edge: edge.id,
                        kind: edge.kind,
                        base_pairs: length,
                        nb_splits,
                        pieces: vec![
                            SplitPiece {
                                ends: (PieceEnd::Vertex(v0), PieceEnd::Split(0)),
                                coordinates: (0, middle),
                            },
                            SplitPiece {
                                ends: (PieceEnd::Split(upper_split), PieceEnd::Vertex(v1)),
                                coordinates: (middle, length),
                            },
                        ],
                    })
                }
            }
        })
        .collect()
}
