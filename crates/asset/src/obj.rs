//! OBJ subset loader: `v`, `vt`, `vn` and triangular `f p/t/n` faces.
//!
//! Loading runs in three passes over owned data:
//! 1. parse every line into raw attribute tables and face index triples,
//! 2. resolve each triple into a [`Vertex`] (1-based indices, checked),
//! 3. weld the resolved stream into an indexed [`Mesh`].
//!
//! Faces are resolved only after the whole file is read, so a face may
//! reference attributes declared further down.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::{
    error::{Attribute, ParseError, ParseResult},
    mesh::{Mesh, Vertex},
    weld::{Weld, weld},
};

/// Loader configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub weld: Weld,
}

impl LoadOptions {
    pub fn with_weld(mut self, weld: Weld) -> Self {
        self.weld = weld;
        self
    }
}

/// Load an OBJ mesh from a file path with default options.
pub fn load_mesh(path: impl AsRef<Path>) -> ParseResult<Mesh> {
    load_mesh_with(path, &LoadOptions::default())
}

/// Load an OBJ mesh from a file path.
pub fn load_mesh_with(path: impl AsRef<Path>, options: &LoadOptions) -> ParseResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParseError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = load_mesh_from_reader(BufReader::new(file), options)?;
    log::debug!(
        "Loaded OBJ {}: {} vertices, {} indices ({:?})",
        path.display(),
        mesh.vertices.len(),
        mesh.indices.len(),
        options.weld
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_mesh_from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> ParseResult<Mesh> {
    let tables = RawTables::parse(reader)?;
    let stream = tables.resolve()?;
    Ok(weld(stream, options.weld))
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_mesh_from_str(contents: &str, options: &LoadOptions) -> ParseResult<Mesh> {
    load_mesh_from_reader(io::Cursor::new(contents), options)
}

/// One face corner as written in the file (still 1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FaceTriple {
    line: usize,
    position: i64,
    texcoord: i64,
    normal: i64,
}

/// Attribute tables gathered while reading. Dropped once faces are resolved.
#[derive(Debug, Default)]
struct RawTables {
    positions: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    faces: Vec<FaceTriple>,
}

impl RawTables {
    fn parse<R: BufRead>(reader: R) -> ParseResult<Self> {
        let mut tables = RawTables::default();

        for (line_idx, line) in reader.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = line.map_err(|source| ParseError::Io {
                line: line_no,
                source,
            })?;
            let content = match line.split_once('#') {
                Some((before, _)) => before,
                None => line.as_str(),
            };

            let mut parts = content.split_whitespace();
            let Some(tag) = parts.next() else {
                continue;
            };

            match tag {
                "v" => {
                    let position = parse_vec3(&mut parts, line_no, "v")?;
                    tables.positions.push(position);
                }
                "vt" => {
                    let u = parse_f32(parts.next(), line_no, "vt")?;
                    let v = parse_f32(parts.next(), line_no, "vt")?;
                    let w = match parts.next() {
                        Some(token) => parse_f32(Some(token), line_no, "vt")?,
                        None => 0.0,
                    };
                    tables.texcoords.push([u, v, w]);
                }
                "vn" => {
                    let normal = parse_vec3(&mut parts, line_no, "vn")?;
                    tables.normals.push(normal);
                }
                "f" => {
                    let corners = parse_face(parts, line_no)?;
                    tables.faces.extend(corners);
                }
                _ => {
                    // o/g/s/mtllib/usemtl/...: the rest of the line is dropped.
                }
            }
        }

        Ok(tables)
    }

    /// Turn every face corner into a concrete vertex, in face order.
    fn resolve(&self) -> ParseResult<Vec<Vertex>> {
        self.faces
            .iter()
            .map(|corner| {
                let line = corner.line;
                let position = lookup(&self.positions, corner.position, Attribute::Position, line)?;
                let texcoord = lookup(&self.texcoords, corner.texcoord, Attribute::Texcoord, line)?;
                let normal = lookup(&self.normals, corner.normal, Attribute::Normal, line)?;
                Ok(Vertex::new(position, texcoord, normal))
            })
            .collect()
    }
}

fn parse_f32(token: Option<&str>, line_no: usize, directive: &'static str) -> ParseResult<f32> {
    token
        .and_then(|t| t.parse::<f32>().ok())
        .ok_or(ParseError::MalformedAttribute {
            line: line_no,
            directive,
        })
}

fn parse_vec3<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    directive: &'static str,
) -> ParseResult<[f32; 3]> {
    let x = parse_f32(parts.next(), line_no, directive)?;
    let y = parse_f32(parts.next(), line_no, directive)?;
    let z = parse_f32(parts.next(), line_no, directive)?;
    Ok([x, y, z])
}

/// A face must be exactly three `p/t/n` groups, nine integers in total.
fn parse_face<'a>(
    parts: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> ParseResult<[FaceTriple; 3]> {
    let malformed = || ParseError::MalformedFace { line: line_no };

    let mut corners = [FaceTriple {
        line: line_no,
        position: 0,
        texcoord: 0,
        normal: 0,
    }; 3];
    let mut count = 0;

    for group in parts {
        let corner = corners.get_mut(count).ok_or_else(malformed)?;
        let mut fields = group.split('/').map(|field| field.parse::<i64>());
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(Ok(p)), Some(Ok(t)), Some(Ok(n)), None) => {
                corner.position = p;
                corner.texcoord = t;
                corner.normal = n;
            }
            _ => return Err(malformed()),
        }
        count += 1;
    }

    if count != 3 {
        return Err(malformed());
    }
    Ok(corners)
}

fn lookup(
    table: &[[f32; 3]],
    raw: i64,
    attribute: Attribute,
    line: usize,
) -> ParseResult<[f32; 3]> {
    raw.checked_sub(1)
        .and_then(|adjusted| usize::try_from(adjusted).ok())
        .and_then(|idx| table.get(idx).copied())
        .ok_or(ParseError::IndexOutOfRange {
            line,
            attribute,
            index: raw,
            len: table.len(),
        })
}
