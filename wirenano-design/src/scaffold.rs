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
//! Layout of the scaffold bases along the routed circuit.

use super::{
    CircuitArc, EdgeId, MeshGraph, NodeKind, RoutingError, RoutingGraph, SegmentKind, VertexId,
};

/// Where the scaffold enters a duplex run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JunctionKind {
    /// At a mesh vertex.
    Vertex(VertexId),
    /// At the scaffold crossover in the middle of a crossover edge.
    MidEdge(EdgeId),
}

/// A maximal stretch of scaffold on one helix of one edge.
///
/// Helix 0 is walked in ascending edge coordinates, helix 1 in descending ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplexRun {
    /// Position of the first base of the run in the circuit.
    pub start: usize,
    pub len: usize,
    pub edge: EdgeId,
    pub helix: usize,
    pub ascending: bool,
    /// The lowest edge coordinate covered by the run.
    pub lo: usize,
    /// The rank of the arc of the circuit on which the run is laid.
    pub arc: usize,
    /// Length of the whole edge.
    pub edge_base_pairs: usize,
    pub entry: JunctionKind,
}

impl DuplexRun {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && position < self.end()
    }

    /// The edge coordinate of the base at `offset` from the start of the run.
    pub fn edge_coordinate(&self, offset: usize) -> usize {
        if self.ascending {
            self.lo + offset
        } else {
            self.lo + self.len - 1 - offset
        }
    }
}

/// The scaffold strand, closed along the routing graph and opened at its nick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldCircuit {
    pub arcs: Vec<CircuitArc>,
    pub runs: Vec<DuplexRun>,
    /// Number of bases of the circuit.
    pub length: usize,
    /// The circuit position of the 5' end of the scaffold.
    pub nick: usize,
    /// The scaffold sequence, starting at the nick.
    pub sequence: String,
}

impl ScaffoldCircuit {
    /// The index of the run containing the circuit position `position`.
    pub fn run_at(&self, position: usize) -> Option<usize> {
        let i = self.runs.partition_point(|r| r.end() <= position);
        self.runs.get(i).filter(|r| r.contains(position)).map(|_| i)
    }

    /// The circuit position of the scaffold base at `linear` bases from the nick.
    pub fn to_circuit(&self, linear: usize) -> usize {
        (self.nick + linear) % self.length.max(1)
    }

    /// The distance from the nick of the base at circuit position `position`.
    pub fn to_linear(&self, position: usize) -> usize {
        let length = self.length.max(1);
        (position + length - self.nick % length) % length
    }

    /// The edge, helix and edge coordinate of the scaffold base at `linear` bases from the nick.
    pub fn locate(&self, linear: usize) -> Option<(EdgeId, usize, usize)> {
        let position = self.to_circuit(linear);
        let run = &self.runs[self.run_at(position)?];
        Some((run.edge, run.helix, run.edge_coordinate(position - run.start)))
    }
}

/// Lay the scaffold bases along `arcs`.
///
/// An arc going towards the higher coordinates of its edge puts bases on helix 0, the other on
/// helix 1. Links carry no base. The initial nick is put in the middle of the first run.
pub fn assign_bases(
    routing: &RoutingGraph,
    graph: &MeshGraph,
    arcs: Vec<CircuitArc>,
) -> Result<ScaffoldCircuit, RoutingError> {
    let mut runs = Vec::new();
    let mut position = 0;
    for (rank, arc) in arcs.iter().enumerate() {
        let segment = &routing.segments[arc.segment];
        let (edge, (lo, hi)) = match segment.kind {
            SegmentKind::Duplex { edge, coordinates } => (edge, coordinates),
            SegmentKind::Link { .. } => continue,
        };
        if hi <= lo {
            continue;
        }
        let ascending = arc.is_forward(routing);
        let entry = match routing.nodes[arc.from].kind {
            NodeKind::Vertex { vertex, .. } => JunctionKind::Vertex(vertex),
            NodeKind::Split { edge, .. } => JunctionKind::MidEdge(edge),
        };
        runs.push(DuplexRun {
            start: position,
            len: hi - lo,
            edge,
            helix: if ascending { 0 } else { 1 },
            ascending,
            lo,
            arc: rank,
            edge_base_pairs: graph.edges[edge].base_pairs,
            entry,
        });
        position += hi - lo;
    }
    let first = runs.first().ok_or(RoutingError::EmptyGraph)?;
    let nick = first.start + first.len / 2;
    Ok(ScaffoldCircuit {
        arcs,
        runs,
        length: position,
        nick,
        sequence: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(start: usize, len: usize, edge: EdgeId, helix: usize) -> DuplexRun {
        DuplexRun {
            start,
            len,
            edge,
            helix,
            ascending: helix == 0,
            lo: 0,
            arc: 0,
            edge_base_pairs: len,
            entry: JunctionKind::Vertex(0),
        }
    }

    #[test]
    fn positions_and_runs() {
        let circuit = ScaffoldCircuit {
            runs: vec![run(0, 31, 0, 0), run(31, 31, 0, 1), run(62, 40, 1, 0)],
            length: 102,
            nick: 15,
            ..Default::default()
        };
        assert_eq!(circuit.run_at(0), Some(0));
        assert_eq!(circuit.run_at(31), Some(1));
        assert_eq!(circuit.run_at(101), Some(2));
        assert_eq!(circuit.run_at(102), None);
        assert_eq!(circuit.to_circuit(0), 15);
        assert_eq!(circuit.to_circuit(90), 3);
        assert_eq!(circuit.to_linear(3), 90);
        // Helix 1 is walked backward
        assert_eq!(circuit.locate(16), Some((0, 1, 30)));
        assert_eq!(circuit.locate(0), Some((0, 0, 15)));
    }
}
