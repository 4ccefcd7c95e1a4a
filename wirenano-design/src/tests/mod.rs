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
use super::*;
use std::collections::BTreeMap;
use std::f64::consts::PI;

pub(crate) fn tetrahedron() -> MeshInput {
    MeshInput {
        vertices: vec![[1., 1., 1.], [1., -1., -1.], [-1., 1., -1.], [-1., -1., 1.]],
        faces: vec![vec![0, 1, 2], vec![0, 3, 1], vec![0, 2, 3], vec![1, 3, 2]],
    }
}

pub(crate) fn octahedron() -> MeshInput {
    MeshInput {
        vertices: vec![
            [1., 0., 0.],
            [-1., 0., 0.],
            [0., 1., 0.],
            [0., -1., 0.],
            [0., 0., 1.],
            [0., 0., -1.],
        ],
        faces: vec![
            vec![0, 2, 4],
            vec![1, 4, 2],
            vec![0, 4, 3],
            vec![0, 5, 2],
            vec![1, 3, 4],
            vec![1, 2, 5],
            vec![0, 3, 5],
            vec![1, 5, 3],
        ],
    }
}

pub(crate) fn cube() -> MeshInput {
    let vertices = (0..8)
        .map(|i| {
            let coord = |bit| if i & bit != 0 { 1. } else { -1. };
            [coord(1), coord(2), coord(4)]
        })
        .collect();
    MeshInput {
        vertices,
        faces: vec![
            vec![0, 2, 3, 1],
            vec![4, 5, 7, 6],
            vec![0, 1, 5, 4],
            vec![2, 6, 7, 3],
            vec![0, 4, 6, 2],
            vec![1, 3, 7, 5],
        ],
    }
}

fn ring(n: usize, z: f64) -> impl Iterator<Item = [f64; 3]> {
    (0..n).map(move |i| {
        let theta = 2. * PI * i as f64 / n as f64;
        [theta.cos(), theta.sin(), z]
    })
}

/// A prism over a regular `n`-gon inscribed in the unit circle, of height 2.
pub(crate) fn prism(n: usize) -> MeshInput {
    let vertices = ring(n, -1.).chain(ring(n, 1.)).collect();
    let mut faces = vec![(0..n).rev().collect(), (n..2 * n).collect()];
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push(vec![i, j, n + j, n + i]);
    }
    MeshInput { vertices, faces }
}

/// Two pyramids glued on a regular `n`-gon. The apexes are vertices 0 and 1.
pub(crate) fn bipyramid(n: usize) -> MeshInput {
    let vertices = [[0., 0., 1.5], [0., 0., -1.5]]
        .into_iter()
        .chain(ring(n, 0.))
        .collect();
    let mut faces = Vec::new();
    for i in 0..n {
        let a = 2 + i;
        let b = 2 + (i + 1) % n;
        faces.push(vec![a, b, 0]);
        faces.push(vec![b, a, 1]);
    }
    MeshInput { vertices, faces }
}

/// A pyramid over a regular `n`-gon. The apex is vertex 0.
pub(crate) fn pyramid(n: usize) -> MeshInput {
    let vertices = [[0., 0., 1.]].into_iter().chain(ring(n, 0.)).collect();
    let mut faces = vec![(1..=n).rev().collect::<Vec<_>>()];
    for i in 0..n {
        faces.push(vec![1 + i, 1 + (i + 1) % n, 0]);
    }
    MeshInput { vertices, faces }
}

pub(crate) fn two_tetrahedra() -> MeshInput {
    let mut ret = tetrahedron();
    let copy = tetrahedron();
    ret.vertices
        .extend(copy.vertices.iter().map(|[x, y, z]| [x + 10., *y, *z]));
    ret.faces
        .extend(copy.faces.iter().map(|f| f.iter().map(|v| v + 4).collect()));
    ret
}

fn short_scaffold() -> String {
    "ACGTTGCA".repeat(16)
}

/// Check the invariants that every design must satisfy.
fn assert_valid_design(design: &WireframeDesign, rules: &StapleRules) {
    let routing = &design.routing;
    let scaffold = &design.scaffold;

    // The circuit is a single closed walk going through every segment once in each direction
    assert_eq!(scaffold.arcs.len(), 2 * routing.segments.len());
    for (i, arc) in scaffold.arcs.iter().enumerate() {
        let next = &scaffold.arcs[(i + 1) % scaffold.arcs.len()];
        assert_eq!(arc.to, next.from);
    }
    for segment in routing.segments.iter() {
        assert!(segment.ranks[0].is_some() && segment.ranks[1].is_some());
        assert_ne!(segment.ranks[0], segment.ranks[1]);
    }

    let mut balance: BTreeMap<NodeId, isize> = BTreeMap::new();
    for arc in scaffold.arcs.iter() {
        *balance.entry(arc.from).or_default() += 1;
        *balance.entry(arc.to).or_default() -= 1;
    }
    assert!(balance.values().all(|b| *b == 0));

    // The routing nodes of a vertex host each of its edges once
    for v in design.mesh.vertices.iter() {
        let mut hosted = routing.hosted_edges(v.id);
        hosted.sort_unstable();
        let mut edges = v.edges.clone();
        edges.sort_unstable();
        assert_eq!(hosted, edges);
    }

    let helical = &design.helical_parameters;
    for edge in design.mesh.edges.iter() {
        assert!(edge.turns >= helical.min_turns);
        assert_eq!(edge.base_pairs, helical.length_of_turns(edge.turns));
        assert!(edge.base_pairs >= helical.min_edge_length_bp());
    }

    // Every base of every helix is covered once by the scaffold
    let expected: usize = design.mesh.edges.iter().map(|e| 2 * e.base_pairs).sum();
    assert_eq!(scaffold.length, expected);
    assert_eq!(scaffold.sequence.len(), scaffold.length);
    assert!(nick::is_legal_nick(
        scaffold,
        scaffold.nick,
        helical.min_edge_length_bp(),
        helical.min_staple_domain()
    ));

    // Staples are contiguous and cover each scaffold base once
    let mut expected_start = 0;
    for staple in design.staples.iter() {
        assert_eq!(staple.start, expected_start);
        expected_start = staple.end;
        assert!(staple.len() <= rules.max_staple_length);
        assert!(staple.crossovers() <= rules.max_crossovers);
        for d in staple.domains.iter() {
            assert!(d.len >= rules.min_staple_domain);
            assert!(design.mesh.edges[d.edge].base_pairs >= rules.min_edge_length);
        }
        assert_eq!(
            staple.sequence,
            sequences::reverse_complement(
                &scaffold.sequence[staple.start..staple.end],
                sequences::is_rna(&scaffold.sequence)
            )
        );
    }
    assert_eq!(expected_start, scaffold.length);
}

fn design_and_check(mesh: &MeshInput, config: &DesignConfig) -> WireframeDesign {
    let design = design_origami(mesh, config).unwrap();
    let helical = config.helical_parameters().unwrap();
    assert_valid_design(&design, &config.staple_rules(&helical));
    design
}

#[test]
fn tetrahedron_with_short_scaffold() {
    let config = DesignConfig {
        helical_turns: Some(3),
        scaffold_sequence: Some(short_scaffold()),
        ..Default::default()
    };
    let design = design_and_check(&tetrahedron(), &config);
    assert!(!design.staples.is_empty());
    for staple in design.staples.iter() {
        for e in staple.edges() {
            assert!(design.mesh.edges[e].base_pairs >= 31);
        }
    }
    // The short sequence is repeated along the scaffold
    assert_eq!(design.scaffold.length, 6 * 62);
    assert!(design.scaffold.sequence.starts_with(&short_scaffold()));
}

#[test]
fn routing_graph_of_tetrahedron() {
    let design = design_and_check(&tetrahedron(), &DesignConfig::default());
    // 3 tree edges, 3 crossover edges with two split nodes each
    assert_eq!(design.routing.nodes.len(), 4 + 6);
    assert_eq!(design.routing.segments.len(), 3 + 6);
    let turnarounds = design
        .routing
        .nodes
        .iter()
        .filter(|n| n.role == NodeRole::Turnaround)
        .count();
    assert_eq!(turnarounds, 6);
}

#[test]
fn routing_graph_of_octahedron() {
    let design = design_and_check(&octahedron(), &DesignConfig::default());
    // Degree 4 vertices are split in two nodes joined by a link
    assert_eq!(design.routing.nodes.len(), 6 * 2 + 7 * 2);
    assert_eq!(design.routing.segments.len(), 5 + 7 * 2 + 6);
    for v in 0..6 {
        let sizes: Vec<usize> = design
            .routing
            .nodes_of_vertex(v)
            .map(|n| n.rotation.len())
            .collect();
        assert_eq!(sizes, vec![3, 3]);
    }
}

#[test]
fn octahedron_with_single_crossovers() {
    let config = DesignConfig {
        single_crossovers: true,
        ..Default::default()
    };
    let design = design_and_check(&octahedron(), &config);
    assert!(!design.staples.is_empty());
    for staple in design.staples.iter() {
        assert_eq!(staple.crossovers(), 1, "{}", staple);
    }
    // Both halves of a crossover edge end at the same placeholder
    assert_eq!(design.routing.nodes.len(), 6 * 2 + 7);
}

#[test]
fn single_crossovers_on_long_edges() {
    let config = DesignConfig {
        single_crossovers: true,
        edge_scale: EdgeScale::BasePairsPerUnit(60.),
        ..Default::default()
    };
    let design = design_and_check(&octahedron(), &config);
    assert!(design
        .mesh
        .edges
        .iter()
        .all(|e| e.base_pairs > config.max_staple_length));
    // The length limit closes some staples inside a single duplex run
    assert!(design.staples.iter().all(|s| s.crossovers() <= 1));
    assert!(design.staples.iter().any(|s| s.crossovers() == 0));
    assert!(design.staples.iter().any(|s| s.crossovers() == 1));
}

#[test]
fn cube_design() {
    let design = design_and_check(&cube(), &DesignConfig::default());
    assert_eq!(design.mesh.edges.len(), 12);
    assert!(design.staples.iter().any(|s| s.crossovers() == 2));
}

#[test]
fn aform_design_with_rna_scaffold() {
    let config = DesignConfig {
        helical_form: HelicalForm::Aform,
        scaffold_sequence: Some("ACGU".repeat(100)),
        ..Default::default()
    };
    let design = design_and_check(&tetrahedron(), &config);
    assert!(design.mesh.edges.iter().all(|e| e.base_pairs == 44));
    assert!(design.staples.iter().all(|s| !s.sequence.contains('T')));
}

#[test]
fn pipeline_is_deterministic() {
    for mesh in [octahedron(), prism(5), bipyramid(6)] {
        let config = DesignConfig::default();
        let first = design_origami(&mesh, &config).unwrap();
        let second = design_origami(&mesh, &config).unwrap();
        assert_eq!(first.scaffold, second.scaffold);
        assert_eq!(first.staples, second.staples);
    }
}

#[test]
fn disconnected_mesh_fails_before_routing() {
    assert!(matches!(
        design_origami(&two_tetrahedra(), &DesignConfig::default()),
        Err(DesignError::Topology(TopologyError::Disconnected { .. }))
    ));
}

#[test]
fn degree_seven_under_strict_model() {
    let config = DesignConfig {
        split_model: SplitModel::strict_degree_three(),
        ..Default::default()
    };
    let err = design_origami(&pyramid(7), &config).unwrap_err();
    assert_eq!(
        err,
        DesignError::UnsupportedGeometry(UnsupportedGeometryError {
            vertex: 0,
            degree: 7,
            allowed_degrees: vec![3],
        })
    );
    // The default model splits it in 3 + 2 + 2
    let design = design_and_check(&pyramid(7), &DesignConfig::default());
    let sizes: Vec<usize> = design
        .routing
        .nodes_of_vertex(0)
        .map(|n| {
            n.rotation
                .iter()
                .filter(|s| design.routing.segments[**s].edge().is_some())
                .count()
        })
        .collect();
    assert_eq!(sizes, vec![3, 2, 2]);
}

#[test]
fn sequence_length_tolerance() {
    let config = DesignConfig {
        scaffold_sequence: Some(short_scaffold()),
        sequence_tolerance: Some(10),
        ..Default::default()
    };
    assert!(matches!(
        design_origami(&tetrahedron(), &config),
        Err(DesignError::ScaffoldSequence(
            ScaffoldSequenceError::LengthMismatch { .. }
        ))
    ));
}

#[test]
fn invalid_scaffold_base() {
    let config = DesignConfig {
        scaffold_sequence: Some(String::from("ACGTN")),
        ..Default::default()
    };
    assert_eq!(
        design_origami(&tetrahedron(), &config).unwrap_err(),
        DesignError::ScaffoldSequence(ScaffoldSequenceError::InvalidBase {
            position: 4,
            base: 'N'
        })
    );
}

#[test]
fn design_serialization() {
    let design = design_origami(&tetrahedron(), &DesignConfig::default()).unwrap();
    let json = serde_json::to_string(&design).unwrap();
    let read: WireframeDesign = serde_json::from_str(&json).unwrap();
    assert_eq!(read.scaffold, design.scaffold);
    assert_eq!(read.staples, design.staples);
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prisms_are_routed(n in 3usize..=12, single_crossovers in any::<bool>()) {
            let config = DesignConfig { single_crossovers, ..Default::default() };
            design_and_check(&prism(n), &config);
        }

        #[test]
        fn bipyramids_are_routed(n in 3usize..=10, scaffold in "[ACGT]{100,300}") {
            let config = DesignConfig {
                scaffold_sequence: Some(scaffold),
                ..Default::default()
            };
            let design = design_and_check(&bipyramid(n), &config);
            prop_assert_eq!(design.mesh.vertices[0].degree(), n);
        }

        #[test]
        fn helical_turns_raise_edge_lengths(turns in 3usize..=6) {
            let config = DesignConfig { helical_turns: Some(turns), ..Default::default() };
            let design = design_and_check(&octahedron(), &config);
            let expected = HelicalParameters::BFORM.length_of_turns(turns);
            prop_assert!(design.mesh.edges.iter().all(|e| e.base_pairs == expected));
        }
    }
}
