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
//! Choice of the position of the scaffold nick.

use super::{HelicalParameters, RoutingError, ScaffoldCircuit};

/// True if the scaffold can be opened at circuit position `position`.
///
/// The nick must lie on a run that covers a whole edge, at least one staple domain away from
/// both ends of the run.
pub fn is_legal_nick(
    circuit: &ScaffoldCircuit,
    position: usize,
    min_run_length: usize,
    min_domain: usize,
) -> bool {
    circuit
        .run_at(position)
        .map(|i| &circuit.runs[i])
        .map(|run| {
            run.len >= min_run_length
                && position - run.start >= min_domain
                && run.end() - position >= min_domain
        })
        .unwrap_or(false)
}

/// Move the nick of `circuit` forward to the first legal position, going at most once around
/// the circuit.
pub fn adjust_nick(
    circuit: &mut ScaffoldCircuit,
    helical: &HelicalParameters,
) -> Result<(), RoutingError> {
    let min_run_length = helical.min_edge_length_bp();
    let min_domain = helical.min_staple_domain();
    let initial_nick = circuit.nick;
    for shift in 0..circuit.length {
        let position = (initial_nick + shift) % circuit.length;
        if is_legal_nick(circuit, position, min_run_length, min_domain) {
            if shift > 0 {
                log::info!(
                    "Nick moved from {} to {} ({} bases)",
                    initial_nick,
                    position,
                    shift
                );
            }
            circuit.nick = position;
            return Ok(());
        }
    }
    Err(RoutingError::NoLegalNick {
        circuit_length: circuit.length,
        initial_nick,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DuplexRun, JunctionKind};

    fn circuit(lengths: &[usize], nick: usize) -> ScaffoldCircuit {
        let mut start = 0;
        let runs = lengths
            .iter()
            .enumerate()
            .map(|(i, len)| {
                let run = DuplexRun {
                    start,
                    len: *len,
                    edge: i / 2,
                    helix: i % 2,
                    ascending: i % 2 == 0,
                    lo: 0,
                    arc: i,
                    edge_base_pairs: 31,
                    entry: JunctionKind::Vertex(0),
                };
                start += len;
                run
            })
            .collect();
        ScaffoldCircuit {
            runs,
            length: start,
            nick,
            ..Default::default()
        }
    }

    #[test]
    fn legal_nick_is_kept() {
        let mut c = circuit(&[31, 31], 15);
        adjust_nick(&mut c, &HelicalParameters::BFORM).unwrap();
        assert_eq!(c.nick, 15);
    }

    #[test]
    fn nick_leaves_short_runs() {
        // Half edges of a crossover edge are too short to carry the nick
        let mut c = circuit(&[15, 15, 31, 31], 7);
        adjust_nick(&mut c, &HelicalParameters::BFORM).unwrap();
        assert_eq!(c.nick, 36);
    }

    #[test]
    fn nick_keeps_away_from_run_ends() {
        let mut c = circuit(&[31, 31], 28);
        adjust_nick(&mut c, &HelicalParameters::BFORM).unwrap();
        // 28..31 are too close to the end of the first run, 31..37 to the start of the second
        assert_eq!(c.nick, 37);
    }

    #[test]
    fn no_legal_nick() {
        let mut c = circuit(&[15, 15, 16, 16], 0);
        assert_eq!(
            adjust_nick(&mut c, &HelicalParameters::BFORM),
            Err(RoutingError::NoLegalNick {
                circuit_length: 62,
                initial_nick: 0
            })
        );
    }
}
