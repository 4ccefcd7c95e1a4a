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
//! Classification of the mesh edges into tree and crossover edges.

use super::{EdgeKind, MeshGraph, TopologyError};

/// Compute a spanning tree of the mesh graph and tag every edge accordingly.
///
/// Edges are considered in ascending vertex-pair order (Kruskal), so the result only depends on
/// the numbering of the vertices. Return the number of crossover edges.
pub fn classify_edges(graph: &mut MeshGraph) -> Result<usize, TopologyError> {
    let nb_vertices = graph.vertices.len();
    if nb_vertices == 0 {
        return Err(TopologyError::Empty);
    }
    let mut father: Vec<usize> = (0..nb_vertices).collect();
    let mut rank: Vec<usize> = vec![0; nb_vertices];
    let mut nb_crossovers = 0;

    for edge in graph.edges.iter_mut() {
        let (a, b) = edge.vertices;
        if union(a, b, &mut father, &mut rank) {
            edge.kind = EdgeKind::Tree;
        } else {
            edge.kind = EdgeKind::Crossover;
            nb_crossovers += 1;
        }
    }

    let root = find(0, &mut father);
    let mut unreachable_vertex = None;
    let mut nb_components = 0;
    for v in 0..nb_vertices {
        if find(v, &mut father) == v {
            nb_components += 1;
        }
        if unreachable_vertex.is_none() && find(v, &mut father) != root {
            unreachable_vertex = Some(v);
        }
    }
    if let Some(unreachable_vertex) = unreachable_vertex {
        return Err(TopologyError::Disconnected {
            unreachable_vertex,
            nb_components,
        });
    }
    log::debug!(
        "Spanning tree of {} vertices, {} crossover edges",
        nb_vertices,
        nb_crossovers
    );
    Ok(nb_crossovers)
}

/// Merge the classes of `i` and `j`. Return false if they were already in the same class.
fn union(i: usize, j: usize, father: &mut Vec<usize>, rank: &mut Vec<usize>) -> bool {
    let i_root = find(i, father);
    let j_root = find(j, father);
    if i_root == j_root {
        return false;
    }
    if rank[i_root] < rank[j_root] {
        father[i_root] = j_root;
    } else {
        father[j_root] = i_root;
        if rank[j_root] == rank[i_root] {
            rank[i_root] += 1;
        }
    }
    true
}

fn find(i: usize, father: &mut Vec<usize>) -> usize {
    if father[i] != i {
        father[i] = find(father[i], father);
    }
    father[i]
}
