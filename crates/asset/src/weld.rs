//! Vertex deduplication: turns a face-ordered vertex stream into an indexed mesh.

use std::collections::HashMap;

use crate::mesh::{Mesh, Vertex};

/// How resolved vertices are welded into the final mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Weld {
    /// Every face corner becomes its own vertex; indices are `0..n`.
    Off,
    /// Scan stored vertices in insertion order. O(n²).
    LinearScan,
    /// Hash lookup keyed on float bit patterns. Same output as `LinearScan`.
    #[default]
    Hashed,
}

/// Weld `stream` (one vertex per face corner, in face order) into a mesh.
pub fn weld(stream: Vec<Vertex>, mode: Weld) -> Mesh {
    match mode {
        Weld::Off => {
            let indices = (0..stream.len() as u32).collect();
            Mesh::new(stream, indices)
        }
        Weld::LinearScan => weld_linear(&stream),
        Weld::Hashed => weld_hashed(&stream),
    }
}

fn weld_linear(stream: &[Vertex]) -> Mesh {
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices = Vec::with_capacity(stream.len());

    for vertex in stream {
        let index = match vertices.iter().position(|v| v == vertex) {
            Some(existing) => existing,
            None => {
                vertices.push(*vertex);
                vertices.len() - 1
            }
        };
        indices.push(index as u32);
    }

    Mesh::new(vertices, indices)
}

/// Bit pattern key matching `Vertex` equality: `-0.0` folds onto `0.0`.
/// NaN vertices never get a key since they equal nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Key([u32; 9]);

impl Key {
    fn of(vertex: &Vertex) -> Option<Self> {
        let mut bits = [0u32; 9];
        let floats = vertex
            .position
            .iter()
            .chain(&vertex.texcoord)
            .chain(&vertex.normal);
        for (slot, &f) in bits.iter_mut().zip(floats) {
            if f.is_nan() {
                return None;
            }
            *slot = if f == 0.0 { 0 } else { f.to_bits() };
        }
        Some(Key(bits))
    }
}

fn weld_hashed(stream: &[Vertex]) -> Mesh {
    let mut unique: HashMap<Key, u32> = HashMap::with_capacity(stream.len());
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices = Vec::with_capacity(stream.len());

    for vertex in stream {
        let next = vertices.len() as u32;
        let index = match Key::of(vertex) {
            Some(key) => *unique.entry(key).or_insert(next),
            None => next,
        };
        if index == next {
            vertices.push(*vertex);
        }
        indices.push(index);
    }

    Mesh::new(vertices, indices)
}
