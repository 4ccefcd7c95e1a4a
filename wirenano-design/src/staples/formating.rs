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

use std::fmt;
use std::fmt::Write;

impl Staple {
    pub fn formated_domains(&self) -> String {
        let mut ret = String::new();
        for d in self.domains.iter() {
            writeln!(&mut ret, "{}", d).unwrap_or_default();
        }
        ret
    }

    /// The edges of the staple, as written in staple tables.
    pub fn formated_edges(&self) -> String {
        self.edges()
            .iter()
            .map(|e| format!("E{}", e))
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for StapleDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[E{}/H{}: {} -> {}]",
            self.edge,
            self.helix,
            self.start,
            self.end() - 1
        )
    }
}

impl fmt::Debug for StapleDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Staple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}) {} nt, {} crossover(s)",
            self.name(),
            self.start,
            self.end,
            self.len(),
            self.crossovers()
        )
    }
}
