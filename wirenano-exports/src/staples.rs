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
//! Staple tables, for ordering.

use super::ExportError;
use itertools::Itertools;
use std::io::Write;
use std::path::Path;
use wirenano_design::{Staple, WireframeDesign};

pub const WELLS_PER_PLATE: usize = 96;
const WELLS_PER_ROW: usize = 12;

const CSV_HEADER: [&str; 7] = [
    "Name",
    "Start",
    "End",
    "Length",
    "Crossovers",
    "Edges",
    "Sequence",
];

/// The plate (starting at 1) and well in which the `index`-th staple is ordered.
///
/// Wells are filled row by row: A1, A2, ..., A12, B1, ...
pub fn plate_and_well(index: usize) -> (usize, String) {
    let plate = index / WELLS_PER_PLATE + 1;
    let well = index % WELLS_PER_PLATE;
    let row = (b'A' + (well / WELLS_PER_ROW) as u8) as char;
    (plate, format!("{}{}", row, well % WELLS_PER_ROW + 1))
}

#[derive(Debug, Serialize)]
struct DomainInterval {
    edge: usize,
    helix: usize,
    start: usize,
    end: usize,
}

fn domain_intervals(staple: &Staple) -> String {
    let intervals: Vec<_> = staple
        .domains
        .iter()
        .map(|d| DomainInterval {
            edge: d.edge,
            helix: d.helix,
            start: d.start,
            end: d.end(),
        })
        .collect();
    if let Ok(s) = serde_json::to_string(&intervals) {
        s
    } else {
        String::from("error getting domains")
    }
}

fn csv_line(staple: &Staple) -> String {
    [
        staple.name(),
        staple.start.to_string(),
        staple.end.to_string(),
        staple.len().to_string(),
        staple.crossovers().to_string(),
        staple.formated_edges(),
        staple.sequence.clone(),
    ]
    .iter()
    .join(",")
}

pub(super) fn write_staples_csv(design: &WireframeDesign, path: &Path) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(&mut file, "{}", CSV_HEADER.iter().join(","))?;
    for staple in design.staples.iter() {
        writeln!(&mut file, "{}", csv_line(staple))?;
    }
    log::info!("Wrote {} staples to {}", design.staples.len(), path.display());
    Ok(())
}

pub(super) fn write_staples_xlsx(design: &WireframeDesign, path: &Path) -> Result<(), ExportError> {
    use simple_excel_writer::{row, Row, Workbook};
    let path_str = path
        .to_str()
        .ok_or_else(|| ExportError::NonUtf8Path(path.to_path_buf()))?;
    let mut wb = Workbook::create(path_str);

    let plates = design
        .staples
        .iter()
        .enumerate()
        .group_by(|(i, _)| plate_and_well(*i).0);
    for (plate, staples) in &plates {
        let rows: Vec<_> = staples
            .map(|(i, staple)| {
                (
                    plate_and_well(i).1,
                    staple.name(),
                    staple.sequence.clone(),
                    domain_intervals(staple),
                    staple.len() as f64,
                    staple.formated_edges(),
                )
            })
            .collect();
        let mut sheet = wb.create_sheet(&format!("Plate {}", plate));
        wb.write_sheet(&mut sheet, |sw| {
            sw.append_row(row![
                "Well Position",
                "Name",
                "Sequence",
                "Domains",
                "Length",
                "Edges"
            ])?;
            for (well, name, sequence, domains, length, edges) in rows.iter() {
                sw.append_row(row![
                    well.as_str(),
                    name.as_str(),
                    sequence.as_str(),
                    domains.as_str(),
                    *length,
                    edges.as_str()
                ])?;
            }
            Ok(())
        })?;
    }
    wb.close()?;
    Ok(())
}
