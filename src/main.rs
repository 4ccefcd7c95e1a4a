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
//! wirenano command line tool.
//!
//! Usage: wirenano <MESH> [OPTIONS]
//!
//! Reads a polyhedral mesh in the PLY format, routes a scaffold through its wireframe, assigns
//! the staples and writes the exports of the design in `<OUTPUT>/<NAME>/`.

use clap::Parser;
use std::fmt;
use std::path::{Path, PathBuf};
use wirenano_design::{design_origami, DesignConfig, DesignError, HelicalForm, WireframeDesign};
use wirenano_exports::{export, ExportError, ExportType};

mod ply_loading;
use ply_loading::{load_ply, PlyError};

#[derive(Parser, Debug)]
#[command(name = "wirenano")]
#[command(author, version, about = "Scaffold routing for wireframe DNA origami", long_about = None)]
struct Cli {
    /// Input mesh, in the PLY format
    mesh: PathBuf,

    /// JSON configuration file. Command line options override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Helical form of the duplexes (Bform, Aform, Hybrid or Twisted)
    #[arg(short, long)]
    form: Option<HelicalForm>,

    /// Minimum number of helical turns per edge
    #[arg(short, long)]
    turns: Option<usize>,

    /// Restrict staples to a single crossover
    #[arg(long)]
    single_crossovers: bool,

    /// Scaffold sequence, or file containing it (raw or FASTA)
    #[arg(short, long)]
    scaffold: Option<String>,

    /// Directory in which the project directory is created
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Name of the project. Defaults to the name of the mesh file
    #[arg(short, long)]
    name: Option<String>,
}

#[derive(Debug)]
enum AppError {
    Ply(PlyError),
    Config { path: PathBuf, message: String },
    Io(std::io::Error),
    Design(DesignError),
    Export(ExportError),
}

impl From<PlyError> for AppError {
    fn from(e: PlyError) -> Self {
        Self::Ply(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<DesignError> for AppError {
    fn from(e: DesignError) -> Self {
        Self::Design(e)
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ply(e) => write!(f, "{e}"),
            Self::Config { path, message } => write!(
                f,
                "Invalid configuration file {}: {}",
                path.to_string_lossy(),
                message
            ),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Design(e) => write!(f, "Design failed: {e}"),
            Self::Export(e) => write!(f, "Export failed: {e}"),
        }
    }
}

impl Cli {
    fn design_config(&self) -> Result<DesignConfig, AppError> {
        let mut config = if let Some(path) = self.config.as_ref() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| AppError::Config {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            DesignConfig::default()
        };
        if let Some(form) = self.form {
            config.helical_form = form;
        }
        if let Some(turns) = self.turns {
            config.helical_turns = Some(turns);
        }
        if self.single_crossovers {
            config.single_crossovers = true;
        }
        if let Some(scaffold) = self.scaffold.as_ref() {
            config.scaffold_sequence = Some(read_scaffold_argument(scaffold)?);
        }
        Ok(config)
    }

    /// The directory in which the exports are written
    fn project_dir(&self) -> PathBuf {
        self.output.join(self.project_name())
    }

    fn project_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.mesh
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| String::from("design"))
        })
    }
}

/// The sequence in the file `argument` if it exists, or `argument` itself otherwise.
fn read_scaffold_argument(argument: &str) -> Result<String, std::io::Error> {
    let path = Path::new(argument);
    if path.is_file() {
        read_sequence_file(path)
    } else {
        log::info!("No file named {argument}, reading it as a sequence");
        Ok(argument.to_string())
    }
}

/// Read a sequence file, skipping FASTA header lines.
fn read_sequence_file(path: &Path) -> Result<String, std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter(|l| !l.starts_with('>') && !l.starts_with(';'))
        .collect())
}

fn write_outputs(
    design: &WireframeDesign,
    output: &Path,
    name: &str,
) -> Result<Vec<String>, AppError> {
    std::fs::create_dir_all(output)?;
    let mut messages = Vec::with_capacity(ExportType::ALL.len());
    for export_type in ExportType::ALL {
        let path = output.join(export_type.file_name(name));
        let success = export(design, export_type, &path)?;
        log::info!("{} export done", export_type);
        messages.push(success.message());
    }
    Ok(messages)
}

fn run(cli: &Cli) -> Result<Vec<String>, AppError> {
    let config = cli.design_config()?;
    let mesh = load_ply(&cli.mesh)?;
    let design = design_origami(&mesh, &config)?;
    log::info!(
        "Design done: {} nt of scaffold, {} staples",
        design.scaffold_length(),
        design.staples.len()
    );
    write_outputs(&design, &cli.project_dir(), &cli.project_name())
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(messages) => {
            for message in messages {
                println!("{message}");
            }
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
