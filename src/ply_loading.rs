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
//! Reading of polyhedral meshes from PLY files.

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use wirenano_design::MeshInput;

#[derive(Debug)]
pub struct PlyError {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for PlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not read mesh from {}: {}",
            self.path.to_string_lossy(),
            self.message
        )
    }
}

impl std::error::Error for PlyError {}

pub fn load_ply<P: AsRef<Path>>(path: P) -> Result<MeshInput, PlyError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PlyError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    read_ply(&mut BufReader::new(file), path)
}

/// Read a mesh from `reader`. `path` is only used in error messages.
pub fn read_ply<R: BufRead>(reader: &mut R, path: &Path) -> Result<MeshInput, PlyError> {
    let error = |message: &str| PlyError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(reader)
        .map_err(|e| error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| error("PLY file has no vertex element"))?;
    let mut vertices = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let mut position = [0f64; 3];
        for (coordinate, name) in position.iter_mut().zip(["x", "y", "z"]) {
            *coordinate = get_float_property(vertex, name)
                .ok_or_else(|| error(&format!("vertex missing {} coordinate", name)))?;
        }
        vertices.push(position);
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| error("PLY file has no face element"))?;
    let mut faces = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| error("face missing vertex_indices property"))?;
        faces.push(indices);
    }
    if faces.is_empty() {
        return Err(error("PLY file contains no faces"));
    }

    log::info!(
        "Read {} vertices and {} faces from {}",
        vertices.len(),
        faces.len(),
        path.to_string_lossy()
    );
    Ok(MeshInput { vertices, faces })
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) const TETRAHEDRON_PLY: &str = "ply
format ascii 1.0
comment regular tetrahedron
element vertex 4
property float x
property float y
property float z
element face 4
property list uchar int vertex_indices
end_header
1 1 1
1 -1 -1
-1 1 -1
-1 -1 1
3 0 1 2
3 0 3 1
3 0 2 3
3 1 3 2
";
