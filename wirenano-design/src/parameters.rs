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
//! Helical forms and DNA geometric parmeters.

use super::DesignError;
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Small tolerance used when converting a number of turns into a number of base pairs, so that
/// exact multiples are not pushed to the next turn by floating point noise.
const TURN_EPSILON: f64 = 1e-9;

/// The double-helix geometry model used for the edges of a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelicalForm {
    /// DNA.
    Bform,
    /// RNA.
    Aform,
    /// A-form variant with a hybrid twist.
    Hybrid,
    /// Wound A-form variant.
    Twisted,
}

impl Default for HelicalForm {
    fn default() -> Self {
        Self::Bform
    }
}

impl HelicalForm {
    pub const ALL: [HelicalForm; 4] = [Self::Bform, Self::Aform, Self::Hybrid, Self::Twisted];

    pub fn parameters(self) -> HelicalParameters {
        match self {
            Self::Bform => HelicalParameters::BFORM,
            Self::Aform => HelicalParameters::AFORM,
            Self::Hybrid => HelicalParameters::HYBRID,
            Self::Twisted => HelicalParameters::TWISTED,
        }
    }
}

impl fmt::Display for HelicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bform => "Bform",
            Self::Aform => "Aform",
            Self::Hybrid => "Hybrid",
            Self::Twisted => "Twisted",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for HelicalForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|form| form.to_string().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                format!(
                    "Invalid helical form '{}', expected one of Aform, Bform, Hybrid, Twisted",
                    s
                )
            })
    }
}

/// The constants attached to a helical form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelicalParameters {
    pub form: HelicalForm,
    /// Number of base pairs per helical turn.
    pub bp_per_turn: f64,
    /// Minimum number of turns of an edge.
    pub min_turns: usize,
    pub twist: usize,
    /// Distance between two consecutive base pairs along the helix axis, in nanometers.
    pub rise: f32,
}

impl HelicalParameters {
    pub const BFORM: Self = Self {
        form: HelicalForm::Bform,
        bp_per_turn: 10.5,
        min_turns: 3,
        twist: 1,
        rise: 0.332,
    };

    pub const AFORM: Self = Self {
        form: HelicalForm::Aform,
        bp_per_turn: 11.,
        min_turns: 4,
        twist: 1,
        rise: 0.26,
    };

    pub const HYBRID: Self = Self {
        form: HelicalForm::Hybrid,
        twist: 2,
        ..Self::AFORM
    };

    pub const TWISTED: Self = Self {
        form: HelicalForm::Twisted,
        twist: 3,
        ..Self::AFORM
    };

    /// Return a copy of self whose minimum number of turns is `turns`.
    ///
    /// The minimum number of turns can only be raised above the one of the helical form.
    pub fn with_min_turns(self, turns: usize) -> Result<Self, DesignError> {
        let minimum = self.form.parameters().min_turns;
        if turns < minimum {
            Err(DesignError::HelicalParameters {
                form: self.form,
                turns,
                minimum,
            })
        } else {
            Ok(Self {
                min_turns: turns,
                ..self
            })
        }
    }

    /// Number of base pairs of a duplex made of `turns` helical turns.
    pub fn length_of_turns(&self, turns: usize) -> usize {
        (turns as f64 * self.bp_per_turn + TURN_EPSILON).floor() as usize
    }

    pub fn min_edge_length_bp(&self) -> usize {
        self.length_of_turns(self.min_turns)
    }

    /// The shortest staple domain that is allowed, half a helical turn.
    pub fn min_staple_domain(&self) -> usize {
        (self.bp_per_turn / 2.).ceil() as usize
    }

    pub fn formated_string(&self) -> String {
        use std::fmt::Write;
        let mut ret = String::new();
        writeln!(&mut ret, "  Helical form: {}", self.form).unwrap_or_default();
        writeln!(&mut ret, "  #Base pairs per turn: {:.2}", self.bp_per_turn).unwrap_or_default();
        writeln!(&mut ret, "  Minimum #turns: {}", self.min_turns).unwrap_or_default();
        writeln!(
            &mut ret,
            "  Minimum edge length: {} bp",
            self.min_edge_length_bp()
        )
        .unwrap_or_default();
        writeln!(&mut ret, "  Rise: {:.3} nm", self.rise).unwrap_or_default();
        ret
    }
}

/// DNA geometric parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Distance between two consecutive bases along the axis of a
    /// helix, in nanometers.
    pub z_step: f32,
    /// Radius of a helix, in nanometers.
    pub helix_radius: f32,
    /// Number of bases per turn in nanometers.
    pub bases_per_turn: f32,
    /// Minor groove angle. DNA helices have a "minor groove" and a
    /// "major groove", meaning that two paired nucleotides are not at
    /// opposite positions around a double helix (i.e. at an angle of
    /// 180°), but instead have a different angle.
    ///
    /// Strands are directed. The "normal" direction is called "5' to
    /// 3'" (named after parts of the nucleotides). This parameter is
    /// the small angle, which is clockwise from the normal strand to
    /// the reverse strand.
    pub groove_angle: f32,

    /// Gap between two neighbouring helices.
    pub inter_helix_gap: f32,
}

impl Parameters {
    /// Default values for the parameters of DNA, taken from the litterature (Wikipedia, Cargo
    /// sorting paper, Woo 2011).
    pub const DEFAULT: Parameters = Parameters {
        // z-step and helix radius from: Wikipedia
        z_step: 0.332,
        helix_radius: 1.,
        // bases per turn from Woo Rothemund (Nature Chemistry).
        bases_per_turn: 10.44,
        // minor groove 12 Å, major groove 22 Å total 34 Å
        groove_angle: 2. * PI * 12. / 34.,
        // From Paul's paper.
        inter_helix_gap: 0.65,
    };

    /// The geometric parameters of the edges of a design made with the given helical form.
    pub fn for_helical_form(helical: &HelicalParameters) -> Self {
        let helix_radius = match helical.form {
            HelicalForm::Bform => Self::DEFAULT.helix_radius,
            // A-form helices are wider and shorter
            _ => 1.15,
        };
        Self {
            z_step: helical.rise,
            bases_per_turn: helical.bp_per_turn as f32,
            helix_radius,
            ..Self::DEFAULT
        }
    }

    /// Distance between the axes of the two helices of an edge.
    pub fn inter_axis_distance(&self) -> f32 {
        2. * self.helix_radius + self.inter_helix_gap
    }

    pub fn formated_string(&self) -> String {
        use std::fmt::Write;
        let mut ret = String::new();
        writeln!(&mut ret, "  Z step: {:.3} nm", self.z_step).unwrap_or_default();
        writeln!(&mut ret, "  Helix radius: {:.2} nm", self.helix_radius).unwrap_or_default();
        writeln!(&mut ret, "  #Bases per turn: {:.2}", self.bases_per_turn).unwrap_or_default();
        writeln!(
            &mut ret,
            "  Minor groove angle: {:.1}°",
            self.groove_angle.to_degrees()
        )
        .unwrap_or_default();
        writeln!(
            &mut ret,
            "  Inter helix gap: {:.2} nm",
            self.inter_helix_gap
        )
        .unwrap_or_default();
        ret
    }
}

impl std::default::Default for Parameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}
