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
//! The connectivity graph of the input mesh.

use super::{EdgeId, FaceId, GeometryError, VertexId};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// A polyhedral mesh, as read from a mesh file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshInput {
    pub vertices: Vec<[f64; 3]>,
    /// Each face is the list of the vertices on its boundary.
    pub faces: Vec<Vec<VertexId>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub position: [f64; 3],
    /// The faces incident to the vertex, in ascending order.
    pub faces: Vec<FaceId>,
    /// The neighbours of the vertex in cyclic order around it.
    ///
    /// The rotation starts at the lowest neighbour and follows the orientation of the faces.
    pub rotation: Vec<VertexId>,
    /// The incident edges, in the same order as `rotation`.
    pub edges: Vec<EdgeId>,
}

impl Vertex {
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<VertexId>,
}

impl Face {
    /// The boundary of the face, as oriented pairs of consecutive vertices.
    pub fn sides(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// The role of an edge in the scaffold routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    Unclassified,
    /// The scaffold goes along the whole edge on both helices.
    Tree,
    /// The scaffold makes a crossover in the middle of the edge.
    Crossover,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    /// The two ends of the edge, lowest identifier first.
    pub vertices: (VertexId, VertexId),
    /// The two faces that share the edge.
    pub faces: [FaceId; 2],
    pub kind: EdgeKind,
    /// Geometric length, in units of the input mesh.
    pub length: f64,
    pub turns: usize,
    pub base_pairs: usize,
}

impl Edge {
    /// The end of the edge that is not `vertex`.
    pub fn other_end(&self, vertex: VertexId) -> VertexId {
        if self.vertices.0 == vertex {
            self.vertices.1
        } else {
            self.vertices.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshGraph {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    /// Edges sorted by ascending pair of vertices.
    pub edges: Vec<Edge>,
}

impl MeshGraph {
    /// Build the connectivity graph of `input`, checking that it describes a closed 2-manifold.
    pub fn new(input: &MeshInput, vertex_tolerance: f64) -> Result<Self, GeometryError> {
        let nb_vertices = input.vertices.len();
        for (face_id, face) in input.faces.iter().enumerate() {
            check_face(face_id, face, nb_vertices)?;
        }
        check_duplicate_vertices(&input.vertices, vertex_tolerance)?;

        let mut edge_faces: BTreeMap<(VertexId, VertexId), Vec<FaceId>> = BTreeMap::new();
        let faces: Vec<Face> = input
            .faces
            .iter()
            .map(|vertices| Face {
                vertices: vertices.clone(),
            })
            .collect();
        for (face_id, face) in faces.iter().enumerate() {
            for (a, b) in face.sides() {
                edge_faces
                    .entry((a.min(b), a.max(b)))
                    .or_default()
                    .push(face_id);
            }
        }

        let mut edges = Vec::with_capacity(edge_faces.len());
        for (id, ((v0, v1), faces)) in edge_faces.into_iter().enumerate() {
            if faces.len() != 2 {
                return Err(GeometryError::NonManifoldEdge {
                    edge: (v0, v1),
                    faces,
                });
            }
            edges.push(Edge {
                id,
                vertices: (v0, v1),
                faces: [faces[0], faces[1]],
                kind: EdgeKind::Unclassified,
                length: distance(&input.vertices[v0], &input.vertices[v1]),
                turns: 0,
                base_pairs: 0,
            });
        }

        let mut vertices: Vec<Vertex> = input
            .vertices
            .iter()
            .enumerate()
            .map(|(id, position)| Vertex {
                id,
                position: *position,
                faces: Vec::new(),
                rotation: Vec::new(),
                edges: Vec::new(),
            })
            .collect();
        for (face_id, face) in faces.iter().enumerate() {
            for v in face.vertices.iter() {
                vertices[*v].faces.push(face_id);
            }
        }

        let mut ret = Self {
            vertices,
            faces,
            edges,
        };
        for v in 0..nb_vertices {
            let rotation = ret.rotation_around(v)?;
            let edges = rotation
                .iter()
                .filter_map(|n| ret.edge_between(v, *n))
                .collect();
            ret.vertices[v].rotation = rotation;
            ret.vertices[v].edges = edges;
        }
        Ok(ret)
    }

    /// The identifier of the edge joining `a` and `b` if it exists.
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let key = (a.min(b), a.max(b));
        self.edges.binary_search_by_key(&key, |e| e.vertices).ok()
    }

    /// The lowest edge incident to `vertex`.
    pub fn first_edge_of(&self, vertex: VertexId) -> Option<EdgeId> {
        self.vertices.get(vertex)?.edges.iter().min().copied()
    }

    /// Compute the cyclic order of the neighbours of `v` from the corners of its faces.
    fn rotation_around(&self, v: VertexId) -> Result<Vec<VertexId>, GeometryError> {
        // (next, previous) vertices on the boundary of each face incident to `v`.
        let corners: Vec<(VertexId, VertexId)> = self.vertices[v]
            .faces
            .iter()
            .filter_map(|f| {
                let boundary = &self.faces[*f].vertices;
                let n = boundary.len();
                let i = boundary.iter().position(|x| *x == v)?;
                Some((boundary[(i + 1) % n], boundary[(i + n - 1) % n]))
            })
            .collect();
        if corners.is_empty() {
            return Ok(Vec::new());
        }

        let mut partners: AHashMap<VertexId, Vec<VertexId>> = AHashMap::new();
        for (next, prev) in corners.iter() {
            partners.entry(*next).or_default().push(*prev);
            partners.entry(*prev).or_default().push(*next);
        }
        if partners.values().any(|p| p.len() != 2) {
            return Err(GeometryError::NonManifoldVertex { vertex: v });
        }
        let degree = partners.len();
        let start = partners.keys().min().copied().unwrap_or_default();

        let first_step = corners
            .iter()
            .find(|(next, _)| *next == start)
            .map(|(_, prev)| *prev)
            .or_else(|| partners.get(&start).and_then(|p| p.iter().min().copied()))
            .ok_or(GeometryError::NonManifoldVertex { vertex: v })?;

        let mut rotation = vec![start];
        let mut previous = start;
        let mut current = first_step;
        while current != start {
            if rotation.len() >= degree {
                return Err(GeometryError::NonManifoldVertex { vertex: v });
            }
            rotation.push(current);
            let candidates = partners
                .get(&current)
                .ok_or(GeometryError::NonManifoldVertex { vertex: v })?;
            let next = if candidates[0] != previous {
                candidates[0]
            } else {
                candidates[1]
            };
            previous = current;
            current = next;
        }
        if rotation.len() != degree {
            // The faces around `v` form more than one fan.
            return Err(GeometryError::NonManifoldVertex { vertex: v });
        }
        Ok(rotation)
    }
}

fn check_face(face_id: FaceId, face: &[VertexId], nb_vertices: usize) -> Result<(), GeometryError> {
    if face.len() < 3 {
        return Err(GeometryError::TooFewVertices {
            face: face_id,
            nb_vertices: face.len(),
        });
    }
    for (i, v) in face.iter().enumerate() {
        if *v >= nb_vertices {
            return Err(GeometryError::VertexOutOfBounds {
                face: face_id,
                vertex: *v,
                nb_vertices,
            });
        }
        if face[..i].contains(v) {
            return Err(GeometryError::RepeatedVertex {
                face: face_id,
                vertex: *v,
            });
        }
    }
    Ok(())
}

fn check_duplicate_vertices(vertices: &[[f64; 3]], tolerance: f64) -> Result<(), GeometryError> {
    let mut order: Vec<VertexId> = (0..vertices.len()).collect();
    order.sort_by(|a, b| vertices[*a][0].total_cmp(&vertices[*b][0]));
    for (i, a) in order.iter().enumerate() {
        for b in order[i + 1..].iter() {
            if vertices[*b][0] - vertices[*a][0] >= tolerance {
                break;
            }
            let d = distance(&vertices[*a], &vertices[*b]);
            if d < tolerance {
                return Err(GeometryError::DuplicateVertex {
                    first: *a.min(b),
                    second: *a.max(b),
                    distance: d,
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{cube, octahedron, tetrahedron};

    #[test]
    fn tetrahedron_graph() {
        let graph = MeshGraph::new(&tetrahedron(), 1e-6).unwrap();
        assert_eq!(graph.edges.len(), 6);
        let pairs: Vec<_> = graph.edges.iter().map(|e| e.vertices).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        for v in graph.vertices.iter() {
            assert_eq!(v.degree(), 3);
            assert_eq!(v.faces.len(), 3);
            assert_eq!(v.rotation[0], *v.rotation.iter().min().unwrap());
        }
    }

    #[test]
    fn rotation_follows_face_winding() {
        let graph = MeshGraph::new(&cube(), 1e-6).unwrap();
        for v in graph.vertices.iter() {
            let n = v.rotation.len();
            for i in 0..n {
                let a = v.rotation[i];
                let b = v.rotation[(i + 1) % n];
                // Some face has the corner (.., a, v, b, ..) or its reverse
                let found = graph.faces.iter().any(|f| {
                    f.sides().any(|s| s == (b, v.id)) && f.sides().any(|s| s == (v.id, a))
                });
                assert!(found, "{} -> {} around {}", a, b, v.id);
            }
        }
    }

    #[test]
    fn edges_are_shared_by_two_faces() {
        let graph = MeshGraph::new(&octahedron(), 1e-6).unwrap();
        assert_eq!(graph.edges.len(), 12);
        for e in graph.edges.iter() {
            assert_ne!(e.faces[0], e.faces[1]);
            assert_eq!(graph.edge_between(e.vertices.1, e.vertices.0), Some(e.id));
        }
    }

    #[test]
    fn open_mesh_is_rejected() {
        let mut mesh = tetrahedron();
        mesh.faces.pop();
        assert!(matches!(
            MeshGraph::new(&mesh, 1e-6),
            Err(GeometryError::NonManifoldEdge { faces, .. }) if faces.len() == 1
        ));
    }

    #[test]
    fn duplicate_vertex_is_rejected() {
        let mut mesh = tetrahedron();
        let copy = mesh.vertices[2];
        mesh.vertices.push([copy[0] + 1e-9, copy[1], copy[2]]);
        assert!(matches!(
            MeshGraph::new(&mesh, 1e-6),
            Err(GeometryError::DuplicateVertex {
                first: 2,
                second: 4,
                ..
            })
        ));
    }

    #[test]
    fn invalid_faces() {
        let mut mesh = tetrahedron();
        mesh.faces.push(vec![0, 1]);
        assert!(matches!(
            MeshGraph::new(&mesh, 1e-6),
            Err(GeometryError::TooFewVertices { face: 4, .. })
        ));
        let mut mesh = tetrahedron();
        mesh.faces[0][1] = 12;
        assert!(matches!(
            MeshGraph::new(&mesh, 1e-6),
            Err(GeometryError::VertexOutOfBounds {
                face: 0,
                vertex: 12,
                ..
            })
        ));
    }

    #[test]
    fn pinched_vertex_is_rejected() {
        // Two tetrahedra sharing vertex 0
        let mut mesh = tetrahedron();
        mesh.vertices.extend([[-1., 0., 0.], [-1., -1., 0.5], [-0.5, -1., -1.]]);
        let offset = 3;
        let extra: Vec<Vec<usize>> = tetrahedron()
            .faces
            .iter()
            .map(|f| {
                f.iter()
                    .map(|v| if *v == 0 { 0 } else { v + offset })
                    .collect()
            })
            .collect();
        mesh.faces.extend(extra);
        assert!(matches!(
            MeshGraph::new(&mesh, 1e-6),
            Err(GeometryError::NonManifoldVertex { vertex: 0 })
        ));
    }
}
