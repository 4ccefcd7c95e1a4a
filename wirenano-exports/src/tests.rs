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
use wirenano_design::{design_origami, DesignConfig, MeshInput};

fn tetrahedron() -> MeshInput {
    MeshInput {
        vertices: vec![[1., 1., 1.], [1., -1., -1.], [-1., 1., -1.], [-1., -1., 1.]],
        faces: vec![vec![0, 1, 2], vec![0, 3, 1], vec![0, 2, 3], vec![1, 3, 2]],
    }
}

fn tetrahedron_design() -> WireframeDesign {
    design_origami(&tetrahedron(), &DesignConfig::default()).unwrap()
}

#[test]
fn staples_csv() {
    let design = tetrahedron_design();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ExportType::StaplesCsv.file_name("tetra"));
    let success = export(&design, ExportType::StaplesCsv, &path).unwrap();
    assert!(success.message().starts_with(SUCCESSFUL_EXPORT_MSG_PREFIX));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines[0], "Name,Start,End,Length,Crossovers,Edges,Sequence");
    assert_eq!(lines.len(), design.staples.len() + 1);
    let first = &design.staples[0];
    let fields: Vec<_> = lines[1].split(',').collect();
    assert_eq!(fields[0], "staple_000");
    assert_eq!(fields[3], first.len().to_string());
    assert_eq!(fields[6], first.sequence);
}

#[test]
fn staples_xlsx() {
    let design = tetrahedron_design();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staples_tetra.xlsx");
    export(&design, ExportType::StaplesXlsx, &path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn oxdna_strands() {
    let design = tetrahedron_design();
    let (config, topology) = oxdna::to_oxdna(&design);
    assert_eq!(topology.nb_strand(), design.staples.len() + 1);
    assert_eq!(topology.nb_nucl(), design.nb_nucleotides());
    assert_eq!(config.nucls().len(), design.nb_nucleotides());
    for nucl in config.nucls() {
        assert!((nucl.a1().mag() - 1.).abs() < 1e-3);
    }
}

#[test]
fn oxdna_files() {
    let design = tetrahedron_design();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tetra.oxdna");
    let success = export(&design, ExportType::Oxdna, &path).unwrap();
    let ExportSuccess::Oxdna {
        topology,
        configuration,
    } = success
    else {
        panic!("unexpected export result")
    };
    assert_eq!(topology, dir.path().join("tetra.top"));

    let topology = std::fs::read_to_string(topology).unwrap();
    let mut lines = topology.lines();
    assert_eq!(
        lines.next().unwrap(),
        format!("{} {}", design.nb_nucleotides(), design.staples.len() + 1)
    );
    // The scaffold is the first strand and is not circular
    let first: Vec<_> = lines.next().unwrap().split(' ').collect();
    assert_eq!(first[0], "1");
    assert_eq!(first[2], "-1");
    assert_eq!(first[3], "1");

    let configuration = std::fs::read_to_string(configuration).unwrap();
    assert_eq!(configuration.lines().count(), design.nb_nucleotides() + 3);
}

#[test]
fn cando_file() {
    let design = tetrahedron_design();
    let formater = cando::to_cando(&design).unwrap();
    assert_eq!(formater.nb_nucl(), design.nb_nucleotides());
    // Every scaffold base is paired with a staple base
    assert_eq!(formater.nb_base_pairs(), design.scaffold_length());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ExportType::Cando.file_name("tetra"));
    let success = export(&design, ExportType::Cando, &path).unwrap();
    assert!(matches!(success, ExportSuccess::Cando(_)));

    let content = std::fs::read_to_string(&path).unwrap();
    let sections: Vec<_> = content.split("\n\n").collect();
    assert_eq!(sections.len(), 5);
    assert!(sections[0].starts_with("\"CanDo (.cndo) file format version 1.0"));
    let topology: Vec<_> = sections[1].lines().collect();
    assert_eq!(topology[0], "dnaTop,id,up,down,across,seq");
    assert_eq!(topology.len(), design.nb_nucleotides() + 1);
    // The first scaffold base is at the nick
    assert!(topology[1].starts_with("1,1,-1,2,"));
    assert_eq!(sections[2].lines().count(), design.scaffold_length() + 1);
    assert_eq!(sections[3].lines().count(), design.scaffold_length() + 1);
    assert!(sections[4].starts_with("id_nt,id1,id2"));
}

#[test]
fn pdb_file() {
    let design = tetrahedron_design();
    let model = pdb::to_pdb(&design);
    assert_eq!(model.nb_chains(), design.staples.len() + 1);
    assert_eq!(model.nb_atoms(), 2 * design.nb_nucleotides());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ExportType::Pdb.file_name("tetra"));
    export(&design, ExportType::Pdb, &path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let atoms = content.lines().filter(|l| l.starts_with("ATOM")).count();
    assert_eq!(atoms, 2 * design.nb_nucleotides());
    assert_eq!(
        content.lines().filter(|l| *l == "TER").count(),
        design.staples.len() + 1
    );
    assert_eq!(content.lines().last(), Some("END"));
}

#[test]
fn json_dump() {
    let design = tetrahedron_design();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tetra.json");
    export(&design, ExportType::Json, &path).unwrap();
    let read: WireframeDesign =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(read.scaffold, design.scaffold);
    assert_eq!(read.staples, design.staples);
}

#[test]
fn file_names() {
    let names: Vec<_> = ExportType::ALL.iter().map(|e| e.file_name("cube")).collect();
    assert_eq!(
        names,
        vec![
            "staples_cube.csv",
            "staples_cube.xlsx",
            "cube.oxdna",
            "cube.cndo",
            "cube.pdb",
            "cube.json"
        ]
    );
    assert_eq!(ExportType::Oxdna.to_string(), "Oxdna");
}
