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
//! Partition of the positions complementary to the scaffold into staples.
//!
//! The assignment works in scaffold coordinates, 0 being the base right after the nick. The duplex
//! runs of the circuit, cut at the nick, are split into parts. Staples are then grown part by part
//! by a state machine, checked, and short domains are fixed by merging neighbouring staples.

use super::{EdgeId, ScaffoldCircuit, StapleConstraintError};

mod formating;

/// The maximum number of merges that can be made to fix one staple.
pub const MAX_MERGE_ATTEMPTS: usize = 2;

/// The constraints that the staples must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StapleRules {
    pub max_staple_length: usize,
    /// Maximum number of crossovers in a staple.
    ///
    /// This is an upper bound only. The length limit is checked first, so a staple on a duplex
    /// run longer than `max_staple_length` may be closed before reaching its first crossover.
    pub max_crossovers: usize,
    /// Minimum length of a domain.
    pub min_staple_domain: usize,
    /// Minimum length of an edge on which a staple lies.
    pub min_edge_length: usize,
}

/// The part of a staple that is paired with one duplex run.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StapleDomain {
    /// The index of the run in the scaffold circuit.
    pub run: usize,
    pub edge: EdgeId,
    pub helix: usize,
    /// Scaffold coordinate of the first paired base.
    pub start: usize,
    pub len: usize,
    pub edge_base_pairs: usize,
}

impl StapleDomain {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A staple strand, complementary to the scaffold bases `[start, end)`.
///
/// Domains are listed in scaffold order, so from the 3' end to the 5' end of the staple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staple {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    pub domains: Vec<StapleDomain>,
    /// 5' to 3' sequence of the staple.
    pub sequence: String,
}

impl Staple {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn crossovers(&self) -> usize {
        self.domains.len().saturating_sub(1)
    }

    /// The edges on which the staple lies, without repetition.
    pub fn edges(&self) -> Vec<EdgeId> {
        let mut ret: Vec<EdgeId> = Vec::with_capacity(self.domains.len());
        for d in self.domains.iter() {
            if !ret.contains(&d.edge) {
                ret.push(d.edge)
            }
        }
        ret
    }

    pub fn name(&self) -> String {
        format!("staple_{:03}", self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staples(pub(super) Vec<Staple>);

impl Staples {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Staple> {
        self.0.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Staple> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Staple> {
        self.0.iter_mut()
    }

    /// The staple paired with the scaffold base at `position` (scaffold coordinates).
    pub fn staple_at(&self, position: usize) -> Option<&Staple> {
        let i = self.0.partition_point(|s| s.end <= position);
        self.0.get(i).filter(|s| s.start <= position)
    }

    pub fn nb_crossovers(&self) -> usize {
        self.0.iter().map(|s| s.crossovers()).sum()
    }
}

impl std::ops::Index<usize> for Staples {
    type Output = Staple;

    fn index(&self, id: usize) -> &Staple {
        &self.0[id]
    }
}

/// A duplex run, or the part of the nick run on one side of the nick.
#[derive(Debug, Clone, Copy)]
struct Piece {
    run: usize,
    start: usize,
    len: usize,
}

/// A stretch of a piece that is never split between two staples.
#[derive(Debug, Clone, Copy)]
struct Part {
    piece: usize,
    start: usize,
    len: usize,
}

impl Part {
    fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AssignmentState {
    /// The staple made of parts `first..=last` may grow.
    Extending { first: usize, last: usize },
    /// The staple made of parts `first..=last` has reached the crossover limit.
    ClosingAtCrossover { first: usize, last: usize },
    /// The staples from `index` on must be checked.
    Checking { index: usize },
    MergingShortSpan { index: usize, attempts: usize },
    Failed(StapleConstraintError),
    Done,
}

struct StapleAssigner<'a> {
    circuit: &'a ScaffoldCircuit,
    rules: &'a StapleRules,
    pieces: Vec<Piece>,
    parts: Vec<Part>,
    /// Closed staples, as ranges of parts.
    spans: Vec<(usize, usize)>,
}

impl<'a> StapleAssigner<'a> {
    fn new(circuit: &'a ScaffoldCircuit, rules: &'a StapleRules) -> Self {
        let pieces = Self::pieces(circuit);
        let parts = Self::parts(&pieces, rules);
        Self {
            circuit,
            rules,
            pieces,
            parts,
            spans: Vec::new(),
        }
    }

    /// The runs in scaffold order, the nick run being cut in a tail at the start and a head at
    /// the end.
    fn pieces(circuit: &ScaffoldCircuit) -> Vec<Piece> {
        let Some(nick_run) = circuit.run_at(circuit.nick) else {
            return Vec::new();
        };
        let nb_runs = circuit.runs.len();
        let run = &circuit.runs[nick_run];
        let mut ret = Vec::with_capacity(nb_runs + 1);
        ret.push(Piece {
            run: nick_run,
            start: 0,
            len: run.end() - circuit.nick,
        });
        for k in 1..nb_runs {
            let r = (nick_run + k) % nb_runs;
            ret.push(Piece {
                run: r,
                start: circuit.to_linear(circuit.runs[r].start),
                len: circuit.runs[r].len,
            });
        }
        let head = circuit.nick - run.start;
        if head > 0 {
            ret.push(Piece {
                run: nick_run,
                start: circuit.length - head,
                len: head,
            });
        }
        ret
    }

    /// Cut every piece in balanced parts of at most half a staple. Pieces other than the first
    /// and the last are cut in at least two parts.
    fn parts(pieces: &[Piece], rules: &StapleRules) -> Vec<Part> {
        let half = (rules.max_staple_length / 2).max(1);
        let mut ret = Vec::new();
        for (i, piece) in pieces.iter().enumerate() {
            let min_parts = if i == 0 || i == pieces.len() - 1 { 1 } else { 2 };
            let nb_parts = min_parts
                .max((piece.len + half - 1) / half)
                .min(piece.len)
                .max(1);
            let base = piece.len / nb_parts;
            let extra = piece.len % nb_parts;
            let mut start = piece.start;
            for j in 0..nb_parts {
                let len = base + usize::from(j >= nb_parts - extra);
                ret.push(Part {
                    piece: i,
                    start,
                    len,
                });
                start += len;
            }
        }
        ret
    }

    fn span_length(&self, first: usize, last: usize) -> usize {
        self.parts[last].end() - self.parts[first].start
    }

    fn span_crossovers(&self, first: usize, last: usize) -> usize {
        self.parts[last].piece - self.parts[first].piece
    }

    fn domains(&self, first: usize, last: usize) -> Vec<StapleDomain> {
        let mut ret: Vec<StapleDomain> = Vec::new();
        for part in self.parts[first..=last].iter() {
            let piece = &self.pieces[part.piece];
            match ret.last_mut() {
                Some(d) if d.end() == part.start && d.run == piece.run => d.len += part.len,
                _ => {
                    let run = &self.circuit.runs[piece.run];
                    ret.push(StapleDomain {
                        run: piece.run,
                        edge: run.edge,
                        helix: run.helix,
                        start: part.start,
                        len: part.len,
                        edge_base_pairs: run.edge_base_pairs,
                    })
                }
            }
        }
        ret
    }

    /// The first constraint violated by the staple `index`, if any.
    fn violation(&self, index: usize) -> Option<StapleConstraintError> {
        let (first, last) = self.spans[index];
        let start = self.parts[first].start;
        let end = self.parts[last].end();
        let domains = self.domains(first, last);
        if let Some(d) = domains
            .iter()
            .find(|d| d.edge_base_pairs < self.rules.min_edge_length)
        {
            return Some(StapleConstraintError::ShortEdge {
                start,
                end,
                edge: d.edge,
                length: d.edge_base_pairs,
                minimum: self.rules.min_edge_length,
            });
        }
        domains
            .iter()
            .find(|d| d.len < self.rules.min_staple_domain)
            .map(|d| StapleConstraintError::ShortDomain {
                start,
                end,
                edge: d.edge,
                helix: d.helix,
                length: d.len,
                minimum: self.rules.min_staple_domain,
            })
    }

    fn close(&mut self, first: usize, last: usize) -> AssignmentState {
        self.spans.push((first, last));
        if last + 1 < self.parts.len() {
            AssignmentState::Extending {
                first: last + 1,
                last: last + 1,
            }
        } else {
            AssignmentState::Checking { index: 0 }
        }
    }

    /// Add the next part to the staple `first..=last`, or close it when the part would break the
    /// length or crossover limit.
    fn extend(&mut self, first: usize, last: usize) -> AssignmentState {
        let next = last + 1;
        if next >= self.parts.len() {
            return self.close(first, last);
        }
        let length = self.span_length(first, next);
        let crossovers = self.span_crossovers(first, next);
        if length > self.rules.max_staple_length || crossovers > self.rules.max_crossovers {
            self.close(first, last)
        } else if crossovers == self.rules.max_crossovers
            && self.parts[next].piece != self.parts[last].piece
        {
            AssignmentState::ClosingAtCrossover { first, last: next }
        } else {
            AssignmentState::Extending { first, last: next }
        }
    }

    fn check(&self, index: usize) -> AssignmentState {
        if index >= self.spans.len() {
            return AssignmentState::Done;
        }
        match self.violation(index) {
            None => AssignmentState::Checking { index: index + 1 },
            Some(StapleConstraintError::ShortDomain { .. }) => {
                AssignmentState::MergingShortSpan { index, attempts: 0 }
            }
            Some(error) => AssignmentState::Failed(error),
        }
    }

    /// Merge the staple `index` with the next one if its short domain is its last one, or with
    /// the previous one if it is its first one.
    fn merge(&mut self, index: usize, attempts: usize) -> AssignmentState {
        let Some(error) = self.violation(index) else {
            return AssignmentState::Checking { index: index + 1 };
        };
        if attempts >= MAX_MERGE_ATTEMPTS {
            return AssignmentState::Failed(error);
        }
        let (first, last) = self.spans[index];
        let domains = self.domains(first, last);
        let short = domains
            .iter()
            .position(|d| d.len < self.rules.min_staple_domain);
        let is_trailing = short == Some(domains.len() - 1);
        let is_leading = short == Some(0);

        let candidates = [
            (is_trailing && index + 1 < self.spans.len()).then(|| (index, index + 1)),
            (is_leading && index > 0).then(|| (index - 1, index)),
        ];
        for (a, b) in candidates.into_iter().flatten() {
            let merged = (self.spans[a].0, self.spans[b].1);
            if self.span_length(merged.0, merged.1) <= self.rules.max_staple_length
                && self.span_crossovers(merged.0, merged.1) <= self.rules.max_crossovers
            {
                log::debug!(
                    "Merging staples [{}, {}) and [{}, {})",
                    self.parts[self.spans[a].0].start,
                    self.parts[self.spans[a].1].end(),
                    self.parts[self.spans[b].0].start,
                    self.parts[self.spans[b].1].end()
                );
                self.spans[a] = merged;
                self.spans.remove(b);
                return AssignmentState::MergingShortSpan {
                    index: a,
                    attempts: attempts + 1,
                };
            }
        }
        AssignmentState::Failed(error)
    }

    fn run(mut self) -> Result<Staples, StapleConstraintError> {
        let mut state = if self.parts.is_empty() {
            AssignmentState::Done
        } else {
            AssignmentState::Extending { first: 0, last: 0 }
        };
        loop {
            state = match state {
                AssignmentState::Extending { first, last } => self.extend(first, last),
                AssignmentState::ClosingAtCrossover { first, last } => self.close(first, last),
                AssignmentState::Checking { index } => self.check(index),
                AssignmentState::MergingShortSpan { index, attempts } => {
                    self.merge(index, attempts)
                }
                AssignmentState::Failed(error) => return Err(error),
                AssignmentState::Done => break,
            }
        }
        let staples = self
            .spans
            .iter()
            .enumerate()
            .map(|(id, (first, last))| Staple {
                id,
                start: self.parts[*first].start,
                end: self.parts[*last].end(),
                domains: self.domains(*first, *last),
                sequence: String::new(),
            })
            .collect();
        Ok(Staples(staples))
    }
}

/// Partition the bases of the scaffold into staples satisfying `rules`.
pub fn assign_staples(
    circuit: &ScaffoldCircuit,
    rules: &StapleRules,
) -> Result<Staples, StapleConstraintError> {
    StapleAssigner::new(circuit, rules).run()
}
