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
//! This crate turns a polyhedral mesh into a wireframe DNA origami design.
//!
//! The design is obtained by a pipeline of graph transformations:
//! the mesh graph is built and validated ([`MeshGraph`]), a spanning tree classifies its edges,
//! edges are split in routed pieces, vertices are split in routing nodes of bounded degree, the
//! scaffold is routed along a single closed circuit, bases and a nick are assigned to it and the
//! complementary positions are partitioned into staples.
//!
//! The entry point is [`design_origami`].

#[macro_use]
extern crate serde_derive;
extern crate serde;
pub use ultraviolet;

mod bases;
pub use bases::*;
mod config;
pub use config::*;
mod edge_split;
pub use edge_split::*;
mod error;
pub use error::*;
pub mod geometry;
pub use geometry::BasePlacement;
mod mesh;
pub use mesh::*;
mod nick;
pub use nick::adjust_nick;
mod parameters;
pub use parameters::*;
mod routing;
pub use routing::*;
mod scaffold;
pub use scaffold::*;
pub mod sequences;
mod spanning_tree;
pub use spanning_tree::classify_edges;
mod staples;
pub use staples::*;
mod vertex_split;
pub use vertex_split::*;

#[cfg(test)]
mod tests;

pub type VertexId = usize;
pub type FaceId = usize;
pub type EdgeId = usize;
pub type NodeId = usize;
pub type SegmentId = usize;

/// The result of a design run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireframeDesign {
    pub helical_parameters: HelicalParameters,
    /// Geometric parameters used to place the bases in space.
    pub dna_parameters: Parameters,
    /// Number of base pairs per unit of length of the input mesh.
    pub scale: f64,
    pub mesh: MeshGraph,
    pub edge_splits: Vec<EdgeSplit>,
    pub routing: RoutingGraph,
    pub scaffold: ScaffoldCircuit,
    pub staples: Staples,
    /// The position of every scaffold base and of its partner, indexed by scaffold coordinates
    /// (0 at the nick).
    pub placements: Vec<BasePlacement>,
    pub single_crossovers: bool,
}

impl WireframeDesign {
    pub fn scaffold_sequence(&self) -> &str {
        &self.scaffold.sequence
    }

    pub fn scaffold_length(&self) -> usize {
        self.scaffold.length
    }

    /// Number of nucleotides in the design, scaffold and staples included.
    pub fn nb_nucleotides(&self) -> usize {
        self.scaffold.length + self.staples.iter().map(|s| s.len()).sum::<usize>()
    }
}

/// Run the whole pipeline on `mesh`.
///
/// Each stage validates its input and the first failure is returned.
pub fn design_origami(
    mesh: &MeshInput,
    config: &DesignConfig,
) -> Result<WireframeDesign, DesignError> {
    let helical_parameters = config.helical_parameters()?;
    log::info!(
        "Designing a wireframe origami\n{}",
        helical_parameters.formated_string()
    );

    let mut graph = MeshGraph::new(mesh, config.vertex_tolerance)?;
    log::info!(
        "Mesh graph: {} vertices, {} edges, {} faces",
        graph.vertices.len(),
        graph.edges.len(),
        graph.faces.len()
    );

    let nb_crossover_edges = classify_edges(&mut graph)?;
    log::info!(
        "Spanning tree: {} tree edges, {} crossover edges",
        graph.edges.len() - nb_crossover_edges,
        nb_crossover_edges
    );

    let scale = enumerate_base_pairs(&mut graph, &helical_parameters, config.edge_scale)?;
    log::info!(
        "Base enumeration: {:.3} bp per unit of length, {} bp in total",
        scale,
        graph.edges.iter().map(|e| e.base_pairs).sum::<usize>()
    );

    let edge_splits = split_edges(&graph, config.single_crossovers)?;
    let mut routing = split_vertices(&graph, &edge_splits, &config.split_model)?;
    log::info!(
        "Routing graph: {} nodes, {} segments",
        routing.nodes.len(),
        routing.segments.len()
    );

    let arcs = route_scaffold(&mut routing)?;
    let mut scaffold = assign_bases(&routing, &graph, arcs)?;
    log::info!(
        "Scaffold circuit: {} arcs, {} duplex runs, {} nt",
        scaffold.arcs.len(),
        scaffold.runs.len(),
        scaffold.length
    );

    adjust_nick(&mut scaffold, &helical_parameters)?;
    scaffold.sequence = sequences::prepare_scaffold_sequence(
        config.scaffold_sequence.as_deref(),
        scaffold.length,
        config.sequence_tolerance,
    )?;

    let rules = config.staple_rules(&helical_parameters);
    let mut staples = assign_staples(&scaffold, &rules)?;
    sequences::fill_staple_sequences(&mut staples, &scaffold.sequence);
    log::info!("Staples: {} strands", staples.len());

    let dna_parameters = Parameters::for_helical_form(&helical_parameters);
    let placements = geometry::place_bases(&graph, &scaffold, &dna_parameters, scale);

    Ok(WireframeDesign {
        helical_parameters,
        dna_parameters,
        scale,
        mesh: graph,
        edge_splits,
        routing,
        scaffold,
        staples,
        placements,
        single_crossovers: config.single_crossovers,
    })
}
