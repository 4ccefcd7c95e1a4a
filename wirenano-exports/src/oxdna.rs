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
//! Configuration and topology files of the oxDNA simulator.
//!
//! The scaffold is the first strand, followed by one strand per staple. Positions are converted
//! from nanometers to oxDNA length units.

use std::io::Write;
use std::path::Path;
use wirenano_design::ultraviolet::Vec3;
use wirenano_design::{BasePlacement, WireframeDesign};

pub const OXDNA_LEN_FACTOR: f32 = 1. / 0.8518;
pub const BACKBONE_TO_CM: f32 = 0.34 * OXDNA_LEN_FACTOR;

pub struct OxDnaNucl {
    pub position: Vec3,
    backbone_base: Vec3,
    pub normal: Vec3,
    velocity: Vec3,
    angular_velocity: Vec3,
}

impl OxDnaNucl {
    /// The nucleotide paired with the scaffold base placed at `placement`, or the scaffold base
    /// itself if `scaffold` is true.
    fn from_placement(placement: &BasePlacement, scaffold: bool) -> Self {
        let (backbone_position, a1, normal) = if scaffold {
            (
                placement.backbone,
                placement.base_vector(),
                placement.direction,
            )
        } else {
            (
                placement.paired_backbone,
                placement.paired_base_vector(),
                -placement.direction,
            )
        };
        Self {
            position: backbone_position * OXDNA_LEN_FACTOR + a1 * BACKBONE_TO_CM,
            backbone_base: a1,
            normal: normal.normalized(),
            velocity: Vec3::zero(),
            angular_velocity: Vec3::zero(),
        }
    }

    /// Unit vector from the backbone to the base.
    pub fn a1(&self) -> Vec3 {
        self.backbone_base
    }
}

pub struct OxDnaConfig {
    time: f32,
    boundaries: [f32; 3],
    /// Etot, U and K
    kinetic_energies: [f32; 3],
    nucls: Vec<OxDnaNucl>,
}

impl OxDnaConfig {
    pub fn nucls(&self) -> &[OxDnaNucl] {
        &self.nucls
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let mut file = std::fs::File::create(path)?;
        let max = self.boundaries[0].max(self.boundaries[1].max(self.boundaries[2]));
        writeln!(&mut file, "t = {}", self.time)?;
        writeln!(&mut file, "b = {} {} {}", max, max, max)?;
        writeln!(
            &mut file,
            "E = {} {} {}",
            self.kinetic_energies[0], self.kinetic_energies[1], self.kinetic_energies[2]
        )?;
        for n in self.nucls.iter() {
            writeln!(
                &mut file,
                "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
                n.position.x,
                n.position.y,
                n.position.z,
                n.backbone_base.x,
                n.backbone_base.y,
                n.backbone_base.z,
                n.normal.x,
                n.normal.y,
                n.normal.z,
                n.velocity.x,
                n.velocity.y,
                n.velocity.z,
                n.angular_velocity.x,
                n.angular_velocity.y,
                n.angular_velocity.z,
            )?;
        }
        Ok(())
    }
}

pub struct OxDnaTopology {
    nb_nucl: usize,
    nb_strand: usize,
    bounds: Vec<OxDnaBound>,
}

impl OxDnaTopology {
    pub fn nb_nucl(&self) -> usize {
        self.nb_nucl
    }

    pub fn nb_strand(&self) -> usize {
        self.nb_strand
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let mut file = std::fs::File::create(path)?;
        writeln!(&mut file, "{} {}", self.nb_nucl, self.nb_strand)?;
        for bound in self.bounds.iter() {
            writeln!(
                &mut file,
                "{} {} {} {}",
                bound.strand_id, bound.base, bound.prime5, bound.prime3
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OxDnaBound {
    strand_id: usize,
    base: char,
    prime5: isize,
    prime3: isize,
}

#[derive(Default)]
struct OxDnaMaker {
    nucl_id: isize,
    boundaries: [f32; 3],
    bounds: Vec<OxDnaBound>,
    nucls: Vec<OxDnaNucl>,
    nb_strand: usize,
}

impl OxDnaMaker {
    /// Start a new strand. Strands are numbered from 1.
    fn new_strand(&mut self) -> StrandMaker<'_> {
        self.nb_strand += 1;
        StrandMaker {
            strand_id: self.nb_strand,
            context: self,
            prev_nucl: None,
        }
    }

    fn end(self) -> (OxDnaConfig, OxDnaTopology) {
        log::debug!(
            "oxDNA conversion: {} nucleotides in {} strands",
            self.nucl_id,
            self.nb_strand
        );
        let topo = OxDnaTopology {
            bounds: self.bounds,
            nb_strand: self.nb_strand,
            nb_nucl: self.nucl_id as usize,
        };
        let config = OxDnaConfig {
            time: 0f32,
            kinetic_energies: [0f32, 0f32, 0f32],
            boundaries: self.boundaries,
            nucls: self.nucls,
        };
        (config, topo)
    }
}

struct StrandMaker<'a> {
    context: &'a mut OxDnaMaker,
    strand_id: usize,
    prev_nucl: Option<isize>,
}

impl StrandMaker<'_> {
    fn add_ox_nucl(&mut self, ox_nucl: OxDnaNucl, base: char) {
        self.context.boundaries[0] = self.context.boundaries[0].max(4. * ox_nucl.position.x.abs());
        self.context.boundaries[1] = self.context.boundaries[1].max(4. * ox_nucl.position.y.abs());
        self.context.boundaries[2] = self.context.boundaries[2].max(4. * ox_nucl.position.z.abs());
        self.context.nucls.push(ox_nucl);

        self.context.bounds.push(OxDnaBound {
            base,
            strand_id: self.strand_id,
            prime3: -1,
            prime5: self.prev_nucl.unwrap_or(-1),
        });
        let nucl_id = self.context.nucl_id;
        if let Some(prev) = self.prev_nucl.and_then(|p| self.context.bounds.get_mut(p as usize)) {
            prev.prime3 = nucl_id;
        }

        self.prev_nucl = Some(nucl_id);
        self.context.nucl_id += 1;
    }
}

pub fn to_oxdna(design: &WireframeDesign) -> (OxDnaConfig, OxDnaTopology) {
    let mut maker = OxDnaMaker::default();

    let mut scaffold = maker.new_strand();
    for (placement, base) in design
        .placements
        .iter()
        .zip(design.scaffold_sequence().chars())
    {
        scaffold.add_ox_nucl(OxDnaNucl::from_placement(placement, true), base);
    }

    for staple in design.staples.iter() {
        let mut strand = maker.new_strand();
        // The 5' end of the staple is paired with the last scaffold base of its range
        let placements = design
            .placements
            .get(staple.start..staple.end)
            .unwrap_or_default()
            .iter()
            .rev();
        for (placement, base) in placements.zip(staple.sequence.chars()) {
            strand.add_ox_nucl(OxDnaNucl::from_placement(placement, false), base);
        }
    }

    maker.end()
}
