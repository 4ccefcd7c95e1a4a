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
//! The errors that can stop a design run.
//!
//! Each stage of the pipeline reports its own family of errors, with the identifiers needed to
//! locate the problem in the input. They are all gathered in [`DesignError`].

use super::{EdgeId, FaceId, HelicalForm, PieceEnd, SegmentId, VertexId};
use std::fmt;

/// The input mesh is malformed or is not a closed 2-manifold.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    TooFewVertices {
        face: FaceId,
        nb_vertices: usize,
    },
    VertexOutOfBounds {
        face: FaceId,
        vertex: VertexId,
        nb_vertices: usize,
    },
    RepeatedVertex {
        face: FaceId,
        vertex: VertexId,
    },
    DuplicateVertex {
        first: VertexId,
        second: VertexId,
        distance: f64,
    },
    /// An edge is not shared by exactly two faces.
    NonManifoldEdge {
        edge: (VertexId, VertexId),
        faces: Vec<FaceId>,
    },
    /// The faces around a vertex do not form a single fan.
    NonManifoldVertex {
        vertex: VertexId,
    },
    DegenerateEdge {
        edge: EdgeId,
        length: f64,
    },
    InvalidScale {
        scale: f64,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewVertices { face, nb_vertices } => write!(
                f,
                "Face {} has {} vertices, at least 3 are needed",
                face, nb_vertices
            ),
            Self::VertexOutOfBounds {
                face,
                vertex,
                nb_vertices,
            } => write!(
                f,
                "Face {} refers to vertex {} but the mesh has only {} vertices",
                face, vertex, nb_vertices
            ),
            Self::RepeatedVertex { face, vertex } => {
                write!(f, "Face {} goes through vertex {} twice", face, vertex)
            }
            Self::DuplicateVertex {
                first,
                second,
                distance,
            } => write!(
                f,
                "Vertices {} and {} are duplicates (distance {:e})",
                first, second, distance
            ),
            Self::NonManifoldEdge { edge, faces } => write!(
                f,
                "Edge ({}, {}) is shared by {} faces {:?}, a closed surface needs exactly 2",
                edge.0,
                edge.1,
                faces.len(),
                faces
            ),
            Self::NonManifoldVertex { vertex } => write!(
                f,
                "The faces around vertex {} do not form a single fan",
                vertex
            ),
            Self::DegenerateEdge { edge, length } => {
                write!(f, "Edge {} has an invalid length {}", edge, length)
            }
            Self::InvalidScale { scale } => write!(f, "Invalid edge scale {}", scale),
        }
    }
}

/// The connectivity graph cannot be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    Empty,
    Disconnected {
        unreachable_vertex: VertexId,
        nb_components: usize,
    },
    Unclassified {
        edge: EdgeId,
    },
    /// An end of a piece of `edge` is neither a vertex of the edge nor one of its splits.
    DanglingPiece {
        edge: EdgeId,
        end: PieceEnd,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "The mesh has no vertex"),
            Self::Disconnected {
                unreachable_vertex,
                nb_components,
            } => write!(
                f,
                "The mesh has {} connected components, vertex {} cannot be reached from vertex 0",
                nb_components, unreachable_vertex
            ),
            Self::Unclassified { edge } => write!(
                f,
                "Edge {} was not classified by the spanning tree",
                edge
            ),
            Self::DanglingPiece { edge, end } => write!(
                f,
                "A piece of edge {} ends at {:?}, which is not on the edge",
                edge, end
            ),
        }
    }
}

/// The degree of a vertex cannot be decomposed into the degrees of routing nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedGeometryError {
    pub vertex: VertexId,
    pub degree: usize,
    pub allowed_degrees: Vec<usize>,
}

impl fmt::Display for UnsupportedGeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vertex {} has degree {} which cannot be split into routing nodes of degree {:?}",
            self.vertex, self.degree, self.allowed_degrees
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// The routing graph has no segment to route the scaffold through.
    EmptyGraph,
    /// The closed walk does not go exactly once in each direction through every segment.
    IncompleteCircuit {
        nb_arcs: usize,
        expected: usize,
        missing_segment: Option<SegmentId>,
    },
    NoLegalNick {
        circuit_length: usize,
        initial_nick: usize,
    },
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGraph => write!(f, "There is no segment to route the scaffold through"),
            Self::IncompleteCircuit {
                nb_arcs,
                expected,
                missing_segment,
            } => {
                write!(
                    f,
                    "The scaffold circuit has {} arcs, expected {}",
                    nb_arcs, expected
                )?;
                if let Some(s) = missing_segment {
                    write!(f, ", segment {} is not traversed in both directions", s)?;
                }
                Ok(())
            }
            Self::NoLegalNick {
                circuit_length,
                initial_nick,
            } => write!(
                f,
                "No legal nick position on the {} bases long circuit (started from {})",
                circuit_length, initial_nick
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldSequenceError {
    Empty,
    InvalidBase {
        position: usize,
        base: char,
    },
    LengthMismatch {
        circuit_length: usize,
        sequence_length: usize,
        tolerance: usize,
    },
}

impl fmt::Display for ScaffoldSequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "The scaffold sequence is empty"),
            Self::InvalidBase { position, base } => write!(
                f,
                "Invalid base '{}' at position {} of the scaffold sequence, expected A, C, G, T or U",
                base, position
            ),
            Self::LengthMismatch {
                circuit_length,
                sequence_length,
                tolerance,
            } => write!(
                f,
                "The scaffold sequence has {} bases but the scaffold circuit has {} (tolerance {})",
                sequence_length, circuit_length, tolerance
            ),
        }
    }
}

/// A staple violates the length constraints even after trying to merge it with its neighbours.
///
/// `start` and `end` are the bounds of the staple in scaffold coordinates (0 at the nick).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StapleConstraintError {
    ShortDomain {
        start: usize,
        end: usize,
        edge: EdgeId,
        helix: usize,
        length: usize,
        minimum: usize,
    },
    ShortEdge {
        start: usize,
        end: usize,
        edge: EdgeId,
        length: usize,
        minimum: usize,
    },
}

impl fmt::Display for StapleConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortDomain {
                start,
                end,
                edge,
                helix,
                length,
                minimum,
            } => write!(
                f,
                "Staple [{}, {}) has a {} bp domain on helix {} of edge {}, minimum is {}",
                start, end, length, helix, edge, minimum
            ),
            Self::ShortEdge {
                start,
                end,
                edge,
                length,
                minimum,
            } => write!(
                f,
                "Staple [{}, {}) goes through edge {} of {} bp, minimum is {}",
                start, end, edge, length, minimum
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DesignError {
    Geometry(GeometryError),
    Topology(TopologyError),
    UnsupportedGeometry(UnsupportedGeometryError),
    Routing(RoutingError),
    ScaffoldSequence(ScaffoldSequenceError),
    StapleConstraint(StapleConstraintError),
    HelicalParameters {
        form: HelicalForm,
        turns: usize,
        minimum: usize,
    },
}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(e) => write!(f, "Geometry error: {}", e),
            Self::Topology(e) => write!(f, "Topology error: {}", e),
            Self::UnsupportedGeometry(e) => write!(f, "Unsupported geometry: {}", e),
            Self::Routing(e) => write!(f, "Routing error: {}", e),
            Self::ScaffoldSequence(e) => write!(f, "Scaffold sequence error: {}", e),
            Self::StapleConstraint(e) => write!(f, "Staple constraint error: {}", e),
            Self::HelicalParameters {
                form,
                turns,
                minimum,
            } => write!(
                f,
                "Invalid helical parameters: {} with {} turns (minimum {} required)",
                form, turns, minimum
            ),
        }
    }
}

impl std::error::Error for DesignError {}

impl From<GeometryError> for DesignError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}
impl From<TopologyError> for DesignError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}
impl From<UnsupportedGeometryError> for DesignError {
    fn from(e: UnsupportedGeometryError) -> Self {
        Self::UnsupportedGeometry(e)
    }
}
impl From<RoutingError> for DesignError {
    fn from(e: RoutingError) -> Self {
        Self::Routing(e)
    }
}
impl From<ScaffoldSequenceError> for DesignError {
    fn from(e: ScaffoldSequenceError) -> Self {
        Self::ScaffoldSequence(e)
    }
}
impl From<StapleConstraintError> for DesignError {
    fn from(e: StapleConstraintError) -> Self {
        Self::StapleConstraint(e)
    }
}
