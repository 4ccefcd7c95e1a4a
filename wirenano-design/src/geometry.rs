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
//! Position of the bases in space.
//!
//! Each edge of the mesh carries two parallel helices whose axes go from the lowest to the highest
//! vertex of the edge. The duplex is centered on the edge and the two helices are side by side in
//! the plane tangent to the surface.

use super::{EdgeId, Face, MeshGraph, Parameters, ScaffoldCircuit};
use std::f32::consts::{FRAC_PI_2, PI};
use ultraviolet::Vec3;

/// The position of a scaffold base and of the staple base paired with it, in nanometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasePlacement {
    pub axis: Vec3,
    pub backbone: Vec3,
    pub paired_backbone: Vec3,
    /// The 5' to 3' direction of the scaffold along the helix axis.
    pub direction: Vec3,
}

impl BasePlacement {
    /// Unit vector going from the backbone of the scaffold base to the helix axis.
    pub fn base_vector(&self) -> Vec3 {
        (self.axis - self.backbone).normalized()
    }

    pub fn paired_base_vector(&self) -> Vec3 {
        (self.axis - self.paired_backbone).normalized()
    }
}

/// One of the two helices of an edge.
#[derive(Debug, Clone, Copy)]
struct EdgeHelix {
    /// Position of the axis at base 0.
    origin: Vec3,
    direction: Vec3,
    normal: Vec3,
    binormal: Vec3,
}

impl EdgeHelix {
    fn theta(&self, n: usize, forward: bool, p: &Parameters) -> f32 {
        // The groove_angle goes from the backward strand to the forward strand
        let shift = if forward { p.groove_angle } else { 0. };
        let beta = 2. * PI / p.bases_per_turn;
        -(n as f32) * beta + shift + FRAC_PI_2
    }

    fn axis_position(&self, p: &Parameters, n: usize) -> Vec3 {
        self.origin + self.direction * (n as f32 * p.z_step)
    }

    fn space_pos(&self, p: &Parameters, n: usize, forward: bool) -> Vec3 {
        let theta = self.theta(n, forward, p);
        self.axis_position(p, n)
            + self.normal * (theta.sin() * p.helix_radius)
            + self.binormal * (theta.cos() * p.helix_radius)
    }
}

fn to_vec3(position: &[f64; 3], scale: f64) -> Vec3 {
    Vec3::new(
        (position[0] * scale) as f32,
        (position[1] * scale) as f32,
        (position[2] * scale) as f32,
    )
}

/// Normal of a polygon, with Newell's method.
fn face_normal(face: &Face, graph: &MeshGraph) -> Vec3 {
    let mut ret = [0f64; 3];
    for (a, b) in face.sides() {
        let a = &graph.vertices[a].position;
        let b = &graph.vertices[b].position;
        ret[0] += (a[1] - b[1]) * (a[2] + b[2]);
        ret[1] += (a[2] - b[2]) * (a[0] + b[0]);
        ret[2] += (a[0] - b[0]) * (a[1] + b[1]);
    }
    to_vec3(&ret, 1.).normalized()
}

/// The two helices of `edge`.
fn edge_helices(graph: &MeshGraph, edge: EdgeId, p: &Parameters, scale: f64) -> [EdgeHelix; 2] {
    let edge = &graph.edges[edge];
    let nm_per_unit = scale * p.z_step as f64;
    let a = to_vec3(&graph.vertices[edge.vertices.0].position, nm_per_unit);
    let b = to_vec3(&graph.vertices[edge.vertices.1].position, nm_per_unit);
    let direction = (b - a).normalized();

    let mut normal = edge
        .faces
        .iter()
        .map(|f| face_normal(&graph.faces[*f], graph))
        .fold(Vec3::zero(), |acc, n| acc + n);
    normal -= direction * normal.dot(direction);
    if normal.mag() < 1e-4 {
        // Any vector orthogonal to the edge
        normal = direction.cross(Vec3::unit_x());
        if normal.mag() < 1e-4 {
            normal = direction.cross(Vec3::unit_y());
        }
    }
    normal.normalize();
    let binormal = direction.cross(normal);

    let duplex_length = edge.base_pairs.saturating_sub(1) as f32 * p.z_step;
    let start = (a + b) / 2. - direction * (duplex_length / 2.);
    let offset = binormal * (p.inter_axis_distance() / 2.);
    [
        EdgeHelix {
            origin: start + offset,
            direction,
            normal,
            binormal,
        },
        EdgeHelix {
            origin: start - offset,
            direction,
            normal,
            binormal,
        },
    ]
}

/// The placement of every scaffold base, indexed by distance from the nick.
pub fn place_bases(
    graph: &MeshGraph,
    circuit: &ScaffoldCircuit,
    p: &Parameters,
    scale: f64,
) -> Vec<BasePlacement> {
    let helices: Vec<[EdgeHelix; 2]> = (0..graph.edges.len())
        .map(|e| edge_helices(graph, e, p, scale))
        .collect();
    let mut ret = Vec::with_capacity(circuit.length);
    for linear in 0..circuit.length {
        let position = circuit.to_circuit(linear);
        let Some(run) = circuit.run_at(position).map(|r| &circuit.runs[r]) else {
            continue;
        };
        let n = run.edge_coordinate(position - run.start);
        let helix = &helices[run.edge][run.helix.min(1)];
        let forward = run.ascending;
        ret.push(BasePlacement {
            axis: helix.axis_position(p, n),
            backbone: helix.space_pos(p, n, forward),
            paired_backbone: helix.space_pos(p, n, !forward),
            direction: if forward {
                helix.direction
            } else {
                -helix.direction
            },
        });
    }
    ret
}
