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
//! Exports of wireframe designs to file formats used in DNA nanotechnologies

#[macro_use]
extern crate serde_derive;
extern crate serde;

use std::fmt;
use std::path::{Path, PathBuf};
use strum::Display;
use wirenano_design::WireframeDesign;

pub mod cando;
pub mod oxdna;
pub mod pdb;
mod staples;
pub use staples::{plate_and_well, WELLS_PER_PLATE};

#[cfg(test)]
mod tests;

/// The file formats to which an export is implemented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExportType {
    StaplesCsv,
    StaplesXlsx,
    Oxdna,
    Cando,
    Pdb,
    Json,
}

impl ExportType {
    pub const ALL: [Self; 6] = [
        Self::StaplesCsv,
        Self::StaplesXlsx,
        Self::Oxdna,
        Self::Cando,
        Self::Pdb,
        Self::Json,
    ];

    /// The name of the file to which the export is written, for a project named `name`
    pub fn file_name(&self, name: &str) -> String {
        match self {
            Self::StaplesCsv => format!("staples_{name}.csv"),
            Self::StaplesXlsx => format!("staples_{name}.xlsx"),
            Self::Oxdna => format!("{name}.oxdna"),
            Self::Cando => format!("{name}.cndo"),
            Self::Pdb => format!("{name}.pdb"),
            Self::Json => format!("{name}.json"),
        }
    }
}

/// A value returned by the export functions when exports was successfull.
///
/// This means that both the format conversion and the write to the output file were successful.
#[derive(Debug)]
pub enum ExportSuccess {
    StaplesCsv(PathBuf),
    StaplesXlsx(PathBuf),
    Oxdna {
        topology: PathBuf,
        configuration: PathBuf,
    },
    Cando(PathBuf),
    Pdb(PathBuf),
    Json(PathBuf),
}

const SUCCESSFUL_EXPORT_MSG_PREFIX: &str = "Successfully exported to";

impl ExportSuccess {
    /// A message telling that the export operation was successfull and giving the path to which
    /// the export was made
    pub fn message(&self) -> String {
        match self {
            Self::StaplesCsv(p)
            | Self::StaplesXlsx(p)
            | Self::Cando(p)
            | Self::Pdb(p)
            | Self::Json(p) => {
                format!("{SUCCESSFUL_EXPORT_MSG_PREFIX}\n{}", p.to_string_lossy())
            }
            Self::Oxdna {
                topology,
                configuration,
            } => format!(
                "{SUCCESSFUL_EXPORT_MSG_PREFIX}\n{}\n{}",
                configuration.to_string_lossy(),
                topology.to_string_lossy()
            ),
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    IOError(std::io::Error),
    Serialization(serde_json::Error),
    Cando(cando::CanDoError),
    /// The xlsx writer only accepts utf-8 paths
    NonUtf8Path(PathBuf),
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<cando::CanDoError> for ExportError {
    fn from(e: cando::CanDoError) -> Self {
        Self::Cando(e)
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IOError(e) => write!(f, "IO error: {e}"),
            Self::Serialization(e) => write!(f, "Serialization error: {e}"),
            Self::Cando(e) => write!(f, "CanDo conversion error: {e}"),
            Self::NonUtf8Path(p) => write!(f, "Path is not valid utf-8: {}", p.to_string_lossy()),
        }
    }
}

impl std::error::Error for ExportError {}

pub type ExportResult = Result<ExportSuccess, ExportError>;

pub fn export(
    design: &WireframeDesign,
    export_type: ExportType,
    export_path: &Path,
) -> ExportResult {
    let path = export_path.to_path_buf();
    match export_type {
        ExportType::StaplesCsv => {
            staples::write_staples_csv(design, &path)?;
            Ok(ExportSuccess::StaplesCsv(path))
        }
        ExportType::StaplesXlsx => {
            staples::write_staples_xlsx(design, &path)?;
            Ok(ExportSuccess::StaplesXlsx(path))
        }
        ExportType::Oxdna => {
            let configuration = path;
            let mut topology = configuration.clone();
            topology.set_extension("top");
            let (config, topo) = oxdna::to_oxdna(design);
            config.write(&configuration)?;
            topo.write(&topology)?;
            Ok(ExportSuccess::Oxdna {
                topology,
                configuration,
            })
        }
        ExportType::Cando => {
            cando::to_cando(design)?.write_to(&path)?;
            Ok(ExportSuccess::Cando(path))
        }
        ExportType::Pdb => {
            pdb::to_pdb(design).write(&path)?;
            Ok(ExportSuccess::Pdb(path))
        }
        ExportType::Json => {
            let file = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(file, design)?;
            Ok(ExportSuccess::Json(path))
        }
    }
}
