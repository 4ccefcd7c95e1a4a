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
//! Export to the pdb file format.
//!
//! The model is coarse grained: each nucleotide is represented by its phosphorus atom and by the
//! nitrogen atom that binds its base to the sugar. Positions are in ångströms. The scaffold is
//! chain `A`, staples take the next chain identifiers in turn.

use std::fmt::Write as _;
use std::path::Path;
use wirenano_design::ultraviolet::Vec3;
use wirenano_design::{sequences, BasePlacement, WireframeDesign};

const OCCUPENCY: f32 = 1.0;
const TEMPERATURE_FACTOR: f32 = 1.0;

const NM_TO_ANGSTROM: f32 = 10.;
/// Distance between the phosphorus atom and the glycosidic nitrogen, in nanometers.
const BACKBONE_TO_BASE: f32 = 0.45;

const CHAIN_IDS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const MAX_SERIAL_NUMBER: usize = 99_999;
const MAX_RESIDUE_IDX: usize = 9_999;

struct PdbAtom {
    serial_number: usize,
    name: String,
    residue_name: String,
    chain_id: char,
    residue_idx: usize,
    position: Vec3,
}

impl PdbAtom {
    fn pdb_repr(&self) -> Result<String, std::fmt::Error> {
        // https://www.cgl.ucsf.edu/chimera/docs/UsersGuide/tutorials/framepdbintro.html
        let mut ret = String::with_capacity(80);
        write!(&mut ret, "ATOM")?; // 1-4
        ret.push_str("  "); // 5-6
        write!(&mut ret, "{:>5}", self.serial_number)?; // 7-11
        ret.push(' '); //12
        if self.name.len() < 4 {
            // all the atoms that we write have a one letter symbol
            write!(&mut ret, " {:<3}", self.name)?; //13-16
        } else {
            write!(&mut ret, "{:<4}", self.name)?; //13-16
        }
        ret.push(' '); // 17
        write!(&mut ret, "{:>3}", self.residue_name)?; // 18-20
        write!(&mut ret, " {}", self.chain_id)?; //21-22
        write!(&mut ret, "{:>4}", self.residue_idx)?; // 23-26
        ret.push_str(&" ".repeat(4)); // 27-30
        write!(&mut ret, "{:>8.3}", self.position.x)?; // 31-38
        write!(&mut ret, "{:>8.3}", self.position.y)?; // 39-46
        write!(&mut ret, "{:>8.3}", self.position.z)?; // 47-54
        write!(&mut ret, "{:>6.2}", OCCUPENCY)?; // 55-60
        write!(&mut ret, "{:>6.2}", TEMPERATURE_FACTOR)?; // 61-66
        ret.push_str(&" ".repeat(14)); // 67-80
        Ok(ret)
    }
}

fn residue_name(base: char, rna: bool) -> String {
    if rna {
        base.to_string()
    } else {
        format!("D{base}")
    }
}

/// N9 for purines, N1 for pyrimidines
fn glycosidic_nitrogen(base: char) -> &'static str {
    match base {
        'A' | 'G' => "N9",
        _ => "N1",
    }
}

struct PdbChain {
    id: char,
    atoms: Vec<PdbAtom>,
}

pub struct PdbModel {
    chains: Vec<PdbChain>,
    nb_atoms: usize,
    rna: bool,
}

impl PdbModel {
    fn new(rna: bool) -> Self {
        Self {
            chains: Vec::new(),
            nb_atoms: 0,
            rna,
        }
    }

    pub fn nb_atoms(&self) -> usize {
        self.nb_atoms
    }

    pub fn nb_chains(&self) -> usize {
        self.chains.len()
    }

    fn new_chain(&mut self) {
        let id = CHAIN_IDS
            .chars()
            .nth(self.chains.len() % CHAIN_IDS.len())
            .unwrap_or('A');
        self.chains.push(PdbChain {
            id,
            atoms: Vec::new(),
        });
    }

    /// Add a nucleotide to the last chain. `backbone` is the position of its phosphorus atom and
    /// `base_vector` goes towards the helix axis.
    fn add_nucleotide(&mut self, base: char, backbone: Vec3, base_vector: Vec3) {
        let residue_name = residue_name(base, self.rna);
        let Some(chain) = self.chains.last_mut() else {
            return;
        };
        let residue_idx = chain.atoms.len() / 2 % MAX_RESIDUE_IDX + 1;
        let atoms = [
            ("P", backbone),
            (
                glycosidic_nitrogen(base),
                backbone + base_vector * BACKBONE_TO_BASE,
            ),
        ];
        for (name, position) in atoms {
            self.nb_atoms += 1;
            chain.atoms.push(PdbAtom {
                serial_number: (self.nb_atoms - 1) % MAX_SERIAL_NUMBER + 1,
                name: name.to_string(),
                residue_name: residue_name.clone(),
                chain_id: chain.id,
                residue_idx,
                position: position * NM_TO_ANGSTROM,
            });
        }
    }

    fn add_scaffold_nucleotide(&mut self, base: char, placement: &BasePlacement) {
        self.add_nucleotide(base, placement.backbone, placement.base_vector())
    }

    fn add_staple_nucleotide(&mut self, base: char, placement: &BasePlacement) {
        self.add_nucleotide(
            base,
            placement.paired_backbone,
            placement.paired_base_vector(),
        )
    }

    pub fn to_pdb_string(&self) -> Result<String, std::fmt::Error> {
        let mut ret = String::with_capacity(81 * (self.nb_atoms + self.chains.len() + 1));
        for chain in self.chains.iter() {
            for atom in chain.atoms.iter() {
                writeln!(&mut ret, "{}", atom.pdb_repr()?)?;
            }
            writeln!(&mut ret, "TER")?;
        }
        writeln!(&mut ret, "END")?;
        Ok(ret)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let content = self
            .to_pdb_string()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, content)
    }
}

pub fn to_pdb(design: &WireframeDesign) -> PdbModel {
    let mut model = PdbModel::new(sequences::is_rna(design.scaffold_sequence()));

    model.new_chain();
    for (placement, base) in design
        .placements
        .iter()
        .zip(design.scaffold_sequence().chars())
    {
        model.add_scaffold_nucleotide(base, placement);
    }

    for staple in design.staples.iter() {
        model.new_chain();
        let placements = design
            .placements
            .get(staple.start..staple.end)
            .unwrap_or_default()
            .iter()
            .rev();
        for (placement, base) in placements.zip(staple.sequence.chars()) {
            model.add_staple_nucleotide(base, placement);
        }
    }

    log::debug!(
        "pdb conversion: {} atoms in {} chains",
        model.nb_atoms(),
        model.nb_chains()
    );
    model
}
