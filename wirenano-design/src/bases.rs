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
//! Number of base pairs of each edge.

use super::{GeometryError, HelicalParameters, MeshGraph};

const TURN_EPSILON: f64 = 1e-9;

/// How mesh lengths are converted into numbers of base pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeScale {
    /// The shortest edge of the mesh gets exactly the minimum number of turns.
    ShortestEdge,
    /// A fixed number of base pairs per unit of length of the mesh.
    BasePairsPerUnit(f64),
}

impl Default for EdgeScale {
    fn default() -> Self {
        Self::ShortestEdge
    }
}

impl EdgeScale {
    /// The number of base pairs per unit of length for `graph`.
    pub fn resolve(
        &self,
        graph: &MeshGraph,
        helical: &HelicalParameters,
    ) -> Result<f64, GeometryError> {
        let scale = match self {
            Self::BasePairsPerUnit(scale) => *scale,
            Self::ShortestEdge => {
                let shortest = graph
                    .edges
                    .iter()
                    .map(|e| e.length)
                    .fold(f64::INFINITY, f64::min);
                helical.min_turns as f64 * helical.bp_per_turn / shortest
            }
        };
        if scale.is_finite() && scale > 0. {
            Ok(scale)
        } else {
            Err(GeometryError::InvalidScale { scale })
        }
    }
}

/// The number of turns and base pairs of an edge of length `length` once scaled.
///
/// `turns` is the smallest integer number of turns covering the scaled edge, and at least the
/// minimum number of turns. The duplex has `floor(turns * bp_per_turn)` base pairs, so it may be
/// up to one base pair shorter than the scaled edge when the number of base pairs per turn is not
/// an integer.
pub fn turns_and_base_pairs(
    length: f64,
    scale: f64,
    helical: &HelicalParameters,
) -> (usize, usize) {
    let exact_turns = length * scale / helical.bp_per_turn;
    let turns = ((exact_turns - TURN_EPSILON).ceil().max(0.) as usize).max(helical.min_turns);
    (turns, helical.length_of_turns(turns))
}

/// Set the number of turns and base pairs of every edge. Return the scale that was used.
pub fn enumerate_base_pairs(
    graph: &mut MeshGraph,
    helical: &HelicalParameters,
    edge_scale: EdgeScale,
) -> Result<f64, GeometryError> {
    for edge in graph.edges.iter() {
        if !(edge.length.is_finite() && edge.length > 0.) {
            return Err(GeometryError::DegenerateEdge {
                edge: edge.id,
                length: edge.length,
            });
        }
    }
    let scale = edge_scale.resolve(graph, helical)?;
    for edge in graph.edges.iter_mut() {
        let (turns, base_pairs) = turns_and_base_pairs(edge.length, scale, helical);
        edge.turns = turns;
        edge.base_pairs = base_pairs;
        log::debug!(
            "Edge {} {:?}: {} turns, {} bp",
            edge.id,
            edge.vertices,
            turns,
            base_pairs
        );
    }
    Ok(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{cube, octahedron, prism};

    #[test]
    fn short_edges_get_the_minimum_length() {
        let helical = HelicalParameters::BFORM;
        assert_eq!(turns_and_base_pairs(0.1, 1., &helical), (3, 31));
        assert_eq!(turns_and_base_pairs(31.5, 1., &helical), (3, 31));
        assert_eq!(turns_and_base_pairs(31.6, 1., &helical), (4, 42));
        assert_eq!(turns_and_base_pairs(100., 1., &helical), (10, 105));
        // Odd numbers of turns round the duplex down
        assert_eq!(turns_and_base_pairs(52.5, 1., &helical), (5, 52));
    }

    #[test]
    fn aform_lengths() {
        let helical = HelicalParameters::AFORM;
        assert_eq!(turns_and_base_pairs(1., 1., &helical), (4, 44));
        assert_eq!(turns_and_base_pairs(50., 1., &helical), (5, 55));
    }

    #[test]
    fn shortest_edge_has_minimum_turns() {
        let helical = HelicalParameters::BFORM;
        let mut graph = MeshGraph::new(&octahedron(), 1e-6).unwrap();
        enumerate_base_pairs(&mut graph, &helical, EdgeScale::ShortestEdge).unwrap();
        assert!(graph.edges.iter().all(|e| e.base_pairs == 31 && e.turns == 3));
    }

    #[test]
    fn longer_edges_get_more_turns() {
        let helical = HelicalParameters::BFORM;
        // The prism's side edges are twice as long as the shortest edge
        let mut graph = MeshGraph::new(&prism(6), 1e-6).unwrap();
        let scale = enumerate_base_pairs(&mut graph, &helical, EdgeScale::ShortestEdge).unwrap();
        for e in graph.edges.iter() {
            assert!(e.base_pairs >= helical.min_edge_length_bp());
            assert_eq!(e.base_pairs, helical.length_of_turns(e.turns));
            let scaled = e.length * scale;
            assert!(e.turns as f64 * helical.bp_per_turn >= scaled - 1e-6);
            assert!(e.base_pairs as f64 >= (scaled + 1e-6).floor());
        }
        assert!(graph.edges.iter().any(|e| e.turns == 6));
    }

    #[test]
    fn fixed_scale() {
        let helical = HelicalParameters::BFORM;
        let mut graph = MeshGraph::new(&cube(), 1e-6).unwrap();
        // Cube edges have length 2
        enumerate_base_pairs(&mut graph, &helical, EdgeScale::BasePairsPerUnit(21.)).unwrap();
        assert!(graph.edges.iter().all(|e| e.base_pairs == 42));
        assert!(matches!(
            enumerate_base_pairs(&mut graph, &helical, EdgeScale::BasePairsPerUnit(-1.)),
            Err(GeometryError::InvalidScale { .. })
        ));
    }
}
