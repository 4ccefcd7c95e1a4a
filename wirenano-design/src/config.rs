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
//! Options of a design run.

use super::{DesignError, EdgeScale, HelicalForm, HelicalParameters, SplitModel, StapleRules};

pub const DEFAULT_MAX_STAPLE_LENGTH: usize = 80;
pub const DEFAULT_VERTEX_TOLERANCE: f64 = 1e-6;

/// The configuration of a design run.
///
/// Every field has a default value so that a configuration file only needs to mention the options
/// that differ from the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub helical_form: HelicalForm,
    /// Raises the minimum number of turns of every edge above the one of the helical form.
    pub helical_turns: Option<usize>,
    /// Restrict staples to a single crossover.
    pub single_crossovers: bool,
    /// The scaffold sequence. The built-in default scaffold is used when it is `None`.
    pub scaffold_sequence: Option<String>,
    /// The maximum difference between the length of the scaffold sequence and the length of the
    /// scaffold circuit. Any difference is accepted when it is `None`.
    pub sequence_tolerance: Option<usize>,
    pub edge_scale: EdgeScale,
    pub split_model: SplitModel,
    pub max_staple_length: usize,
    /// Two vertices closer than this distance are considered duplicates.
    pub vertex_tolerance: f64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            helical_form: HelicalForm::default(),
            helical_turns: None,
            single_crossovers: false,
            scaffold_sequence: None,
            sequence_tolerance: None,
            edge_scale: EdgeScale::default(),
            split_model: SplitModel::default(),
            max_staple_length: DEFAULT_MAX_STAPLE_LENGTH,
            vertex_tolerance: DEFAULT_VERTEX_TOLERANCE,
        }
    }
}

impl DesignConfig {
    pub fn with_helical_form(helical_form: HelicalForm) -> Self {
        Self {
            helical_form,
            ..Default::default()
        }
    }

    /// The helical parameters of the run, with the minimum number of turns raised to
    /// `helical_turns` if it was given.
    pub fn helical_parameters(&self) -> Result<HelicalParameters, DesignError> {
        let parameters = self.helical_form.parameters();
        if let Some(turns) = self.helical_turns {
            parameters.with_min_turns(turns)
        } else {
            Ok(parameters)
        }
    }

    pub fn staple_rules(&self, helical: &HelicalParameters) -> StapleRules {
        StapleRules {
            max_staple_length: self.max_staple_length,
            max_crossovers: if self.single_crossovers { 1 } else { 2 },
            min_staple_domain: helical.min_staple_domain(),
            min_edge_length: helical.min_edge_length_bp(),
        }
    }
}
