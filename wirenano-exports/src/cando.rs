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
//! Export to the CanDo (.cndo) format, read by the CanDo finite element solver.
//!
//! Nucleotides are numbered from 1, the scaffold first. Every base pair gives one node, with a
//! triad whose second vector goes across the pair and whose third vector follows the helix axis.
//! Positions are in ångströms.

const FILE_HEADER: &str =
"\"CanDo (.cndo) file format version 1.0, Keyao Pan, Laboratory for Computational Biology and Biophysics, Massachusetts Institute of Technology, November 2015\"";

const DNATOP_HEADER: &str = "dnaTop,id,up,down,across,seq";

const DNODE_HEADER: &str = "dNode,\"e0(1)\",\"e0(2)\",\"e0(3)\"";

const TRIAD_HEADER: &str =
    r#"triad,"e1(1)","e1(2)","e1(3)","e2(1)","e2(2)","e2(3)","e3(1)","e3(2)","e3(3)"#;
const BP_LIST_HEADER: &str = "id_nt,id1,id2";

const NM_TO_ANGSTROM: f32 = 10.;

use ahash::AHashMap;
use std::fmt;
use std::io::Write;
use std::path::Path;
use wirenano_design::ultraviolet::{Mat3, Vec3};
use wirenano_design::{BasePlacement, WireframeDesign};

/// A nucleotide of the design: the scaffold base at `position`, or the staple base paired with
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nucl {
    pub position: usize,
    pub scaffold: bool,
}

impl Nucl {
    fn compl(&self) -> Self {
        Self {
            position: self.position,
            scaffold: !self.scaffold,
        }
    }
}

struct NodeEntry {
    id: usize,
    position: Vec3,
}

struct TriadEntry {
    id: usize,
    // e2 = base_pair, e3 = axis of the helix
    orientation: Mat3,
}

struct BpEntry {
    node_id: usize,
    nt_1: usize,
    nt_2: usize,
}

pub struct CanDoStrand<'a> {
    previous_nucl: Option<Nucl>,
    first_nucl: Option<Nucl>,
    formatter: &'a mut CanDoFormater,
}

#[derive(Debug, Clone)]
struct CanDoNucl {
    nucl: Nucl,
    base: char,
    position: Vec3,
    axis: Vec3,
    /// 5' to 3' direction of the scaffold
    direction: Vec3,
    id: usize,
    prime5_id: Option<usize>,
    prime3_id: Option<usize>,
    paired_id: Option<usize>,
}

impl CanDoNucl {
    fn make_pair_with(&self, paired: &CanDoNucl) -> Result<(Vec3, Mat3), CanDoError> {
        if self.nucl.compl() != paired.nucl {
            return Err(CanDoError::NotPaired(paired.nucl, self.nucl));
        }

        let mut across = (paired.position - self.position).normalized();
        if !self.nucl.scaffold {
            across *= -1.;
        }

        let e3 = self.direction.normalized();
        let e1 = across.cross(e3).normalized();
        let e2 = e3.cross(e1).normalized();

        Ok((self.axis, Mat3::new(e1, e2, e3)))
    }
}

#[derive(Default)]
pub struct CanDoFormater {
    known_nucls: AHashMap<Nucl, CanDoNucl>,
    node_entries: Vec<NodeEntry>,
    triad_entries: Vec<TriadEntry>,
    bp_entries: Vec<BpEntry>,
}

impl CanDoFormater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nb_nucl(&self) -> usize {
        self.known_nucls.len()
    }

    pub fn nb_base_pairs(&self) -> usize {
        self.bp_entries.len()
    }

    pub fn add_strand(&mut self) -> CanDoStrand<'_> {
        CanDoStrand {
            previous_nucl: None,
            first_nucl: None,
            formatter: self,
        }
    }

    fn add_nucl(
        &mut self,
        nucl: Nucl,
        base: char,
        placement: &BasePlacement,
    ) -> Result<(), CanDoError> {
        let id = self.known_nucls.len() + 1;

        let paired_id = self.known_nucls.get(&nucl.compl()).map(|n| n.id);

        let position = if nucl.scaffold {
            placement.backbone
        } else {
            placement.paired_backbone
        };
        let cando_nucl = CanDoNucl {
            nucl,
            base,
            position: position * NM_TO_ANGSTROM,
            axis: placement.axis * NM_TO_ANGSTROM,
            direction: placement.direction,
            id,
            paired_id,
            prime3_id: None,
            prime5_id: None,
        };

        if let Some(paired) = self.known_nucls.get_mut(&nucl.compl()) {
            let (bp_position, orientation) = paired.make_pair_with(&cando_nucl)?;

            paired.paired_id = Some(id);

            let bp_id = self.bp_entries.len() + 1;
            self.bp_entries.push(BpEntry {
                node_id: bp_id,
                nt_1: paired.id,
                nt_2: id,
            });
            self.triad_entries.push(TriadEntry {
                id: bp_id,
                orientation,
            });
            self.node_entries.push(NodeEntry {
                id: bp_id,
                position: bp_position,
            });
        }

        if self.known_nucls.insert(nucl, cando_nucl).is_some() {
            return Err(CanDoError::DuplicateNucleotide(nucl));
        }

        Ok(())
    }

    fn make_bound(&mut self, prime5_end: Nucl, prime3_end: Nucl) -> Result<(), CanDoError> {
        let prime5_id = self
            .known_nucls
            .get(&prime5_end)
            .map(|n| n.id)
            .ok_or(CanDoError::CannotFindNucl(prime5_end))?;
        let prime3_id = self
            .known_nucls
            .get(&prime3_end)
            .map(|n| n.id)
            .ok_or(CanDoError::CannotFindNucl(prime3_end))?;

        self.known_nucls
            .get_mut(&prime5_end)
            .ok_or(CanDoError::CannotFindNucl(prime5_end))?
            .prime3_id = Some(prime3_id);
        self.known_nucls
            .get_mut(&prime3_end)
            .ok_or(CanDoError::CannotFindNucl(prime3_end))?
            .prime5_id = Some(prime5_id);

        Ok(())
    }

    pub fn write_to<P: AsRef<Path>>(self, path: P) -> Result<(), std::io::Error> {
        let mut out_file = std::fs::File::create(path)?;
        let id_or_none = |id: Option<usize>| id.map(|id| id as isize).unwrap_or(-1);

        writeln!(&mut out_file, "{FILE_HEADER}")?;
        writeln!(&mut out_file)?;

        writeln!(&mut out_file, "{DNATOP_HEADER}")?;
        let mut known_nucls = self.known_nucls.values().collect::<Vec<_>>();
        known_nucls.sort_by_key(|n| n.id);
        for (serial_number, n) in known_nucls.iter().enumerate() {
            writeln!(
                &mut out_file,
                "{},{},{},{},{},{}",
                serial_number + 1,
                n.id,
                id_or_none(n.prime5_id),
                id_or_none(n.prime3_id),
                id_or_none(n.paired_id),
                n.base
            )?;
        }
        writeln!(&mut out_file)?;

        writeln!(&mut out_file, "{DNODE_HEADER}")?;
        for node in self.node_entries.iter() {
            let p = node.position;
            writeln!(&mut out_file, "{},{},{},{}", node.id, p.x, p.y, p.z)?;
        }
        writeln!(&mut out_file)?;

        writeln!(&mut out_file, "{TRIAD_HEADER}")?;
        for triad in self.triad_entries.iter() {
            let [e1, e2, e3] = triad.orientation.cols;
            writeln!(
                &mut out_file,
                "{},{},{},{},{},{},{},{},{},{}",
                triad.id, e1.x, e1.y, e1.z, e2.x, e2.y, e2.z, e3.x, e3.y, e3.z
            )?;
        }
        writeln!(&mut out_file)?;

        writeln!(&mut out_file, "{BP_LIST_HEADER}")?;
        for bp in self.bp_entries.iter() {
            writeln!(&mut out_file, "{},{},{}", bp.node_id, bp.nt_1, bp.nt_2)?;
        }

        Ok(())
    }
}

impl CanDoStrand<'_> {
    pub fn add_nucl(
        &mut self,
        nucl: Nucl,
        base: char,
        placement: &BasePlacement,
    ) -> Result<(), CanDoError> {
        self.formatter.add_nucl(nucl, base, placement)?;

        if let Some(prime5) = self.previous_nucl.take() {
            self.formatter.make_bound(prime5, nucl)?;
        }

        self.previous_nucl = Some(nucl);
        self.first_nucl = self.first_nucl.or(Some(nucl));

        Ok(())
    }

    pub fn end(mut self, cyclic: bool) -> Result<(), CanDoError> {
        if cyclic {
            if let Some((prime5, prime3)) = self
                .previous_nucl
                .take()
                .zip(self.first_nucl.take())
                .filter(|(a, b)| a != b)
            {
                self.formatter.make_bound(prime5, prime3)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum CanDoError {
    DuplicateNucleotide(Nucl),
    NotPaired(Nucl, Nucl),
    CannotFindNucl(Nucl),
}

impl fmt::Display for CanDoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNucleotide(n) => write!(f, "Nucleotide {:?} is used twice", n),
            Self::NotPaired(a, b) => write!(f, "Nucleotides {:?} and {:?} are not paired", a, b),
            Self::CannotFindNucl(n) => write!(f, "Could not find nucleotide {:?}", n),
        }
    }
}

/// Build the CanDo model of `design`. The scaffold is cut at its nick.
pub fn to_cando(design: &WireframeDesign) -> Result<CanDoFormater, CanDoError> {
    let mut formater = CanDoFormater::new();

    let mut scaffold = formater.add_strand();
    for (position, (placement, base)) in design
        .placements
        .iter()
        .zip(design.scaffold_sequence().chars())
        .enumerate()
    {
        let nucl = Nucl {
            position,
            scaffold: true,
        };
        scaffold.add_nucl(nucl, base, placement)?;
    }
    scaffold.end(false)?;

    for staple in design.staples.iter() {
        let mut strand = formater.add_strand();
        for (position, base) in (staple.start..staple.end).rev().zip(staple.sequence.chars()) {
            if let Some(placement) = design.placements.get(position) {
                let nucl = Nucl {
                    position,
                    scaffold: false,
                };
                strand.add_nucl(nucl, base, placement)?;
            }
        }
        strand.end(false)?;
    }

    log::debug!(
        "CanDo conversion: {} nucleotides, {} base pairs",
        formater.nb_nucl(),
        formater.nb_base_pairs()
    );
    Ok(formater)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(x: f32) -> BasePlacement {
        BasePlacement {
            axis: Vec3::new(x, 0., 0.),
            backbone: Vec3::new(x, 1., 0.),
            paired_backbone: Vec3::new(x, -1., 0.),
            direction: Vec3::unit_x(),
        }
    }

    #[test]
    fn pairs_make_nodes() {
        let mut formater = CanDoFormater::new();
        let placements = [placement(0.), placement(0.34)];
        let mut scaffold = formater.add_strand();
        for (position, p) in placements.iter().enumerate() {
            let nucl = Nucl {
                position,
                scaffold: true,
            };
            scaffold.add_nucl(nucl, 'A', p).unwrap();
        }
        scaffold.end(false).unwrap();
        assert_eq!(formater.nb_base_pairs(), 0);

        let mut staple = formater.add_strand();
        for position in [1, 0] {
            let nucl = Nucl {
                position,
                scaffold: false,
            };
            staple.add_nucl(nucl, 'T', &placements[position]).unwrap();
        }
        staple.end(false).unwrap();
        assert_eq!(formater.nb_base_pairs(), 2);

        let node = &formater.node_entries[0];
        assert!((node.position - Vec3::new(3.4, 0., 0.)).mag() < 1e-4);
        let [e1, e2, e3] = formater.triad_entries[0].orientation.cols;
        assert!((e3 - Vec3::unit_x()).mag() < 1e-4);
        assert!((e2 - Vec3::new(0., -1., 0.)).mag() < 1e-4);
        assert!(e1.dot(e2).abs() < 1e-4);

        // Scaffold 1 -> 2, staple 3 -> 4
        let first = &formater.known_nucls[&Nucl {
            position: 0,
            scaffold: true,
        }];
        assert_eq!(first.prime3_id, Some(2));
        assert_eq!(first.paired_id, Some(4));
    }

    #[test]
    fn nucleotides_are_used_once() {
        let mut formater = CanDoFormater::new();
        let mut strand = formater.add_strand();
        let nucl = Nucl {
            position: 0,
            scaffold: true,
        };
        strand.add_nucl(nucl, 'A', &placement(0.)).unwrap();
        assert!(matches!(
            strand.add_nucl(nucl, 'A', &placement(0.)),
            Err(CanDoError::DuplicateNucleotide(_))
        ));
    }
}
