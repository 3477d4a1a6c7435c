//! CPU-side mesh representation handed to the renderer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex with position/uvw/normal. Values are in object space.
///
/// Equality is exact on all nine floats, so `-0.0 == 0.0` and a NaN component
/// never compares equal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// `w` is 0 when the file only provides `u v`.
    pub texcoord: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Byte stride of one vertex in a GPU vertex buffer.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    pub fn new(position: [f32; 3], texcoord: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// Width of the index buffer the renderer should create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    /// Smallest format able to address `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count <= usize::from(u16::MAX) + 1 {
            IndexFormat::U16
        } else {
            IndexFormat::U32
        }
    }

    pub fn size_bytes(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// Index data narrowed to its upload format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    pub fn format(&self) -> IndexFormat {
        match self {
            IndexBuffer::U16(_) => IndexFormat::U16,
            IndexBuffer::U32(_) => IndexFormat::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexBuffer::U16(v) => bytemuck::cast_slice(v),
            IndexBuffer::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Axis-aligned bounds of a mesh's positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Indexed triangle mesh. Every index is `< vertices.len()` and there are
/// three indices per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// `true` if the file had no faces.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn index_format(&self) -> IndexFormat {
        IndexFormat::for_vertex_count(self.vertices.len())
    }

    /// Copy of the indices in the narrowest format that fits.
    pub fn index_buffer(&self) -> IndexBuffer {
        match self.index_format() {
            // Every index is < vertices.len() <= 65536, so the cast is lossless.
            IndexFormat::U16 => IndexBuffer::U16(self.indices.iter().map(|&i| i as u16).collect()),
            IndexFormat::U32 => IndexBuffer::U32(self.indices.clone()),
        }
    }

    /// Vertex data as raw bytes, `Vertex::STRIDE` bytes per vertex.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Aabb { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let n = [0.0, 0.0, 1.0];
        Mesh::new(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], n),
                Vertex::new([2.0, 0.0, 0.0], [1.0, 0.0, 0.0], n),
                Vertex::new([2.0, 1.0, -1.0], [1.0, 1.0, 0.0], n),
                Vertex::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], n),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn vertex_stride_is_nine_floats() {
        assert_eq!(Vertex::STRIDE, 36);
        let mesh = quad();
        assert_eq!(mesh.vertex_bytes().len(), 4 * Vertex::STRIDE);
    }

    #[test]
    fn vertex_equality_is_exact() {
        let a = Vertex::new([0.0; 3], [0.0; 3], [0.0, 0.0, 1.0]);
        let mut b = a;
        assert_eq!(a, b);
        b.normal[2] = 1.0 + f32::EPSILON;
        assert_ne!(a, b);

        let mut signed = a;
        signed.position[0] = -0.0;
        assert_eq!(a, signed);

        let mut nan = a;
        nan.texcoord[1] = f32::NAN;
        assert_ne!(nan, nan);
    }

    #[test]
    fn small_meshes_use_u16_indices() {
        let mesh = quad();
        assert_eq!(mesh.triangle_count(), 2);
        let buf = mesh.index_buffer();
        assert_eq!(buf, IndexBuffer::U16(vec![0, 1, 2, 0, 2, 3]));
        assert_eq!(buf.as_bytes().len(), 12);
    }

    #[test]
    fn index_format_threshold() {
        assert_eq!(IndexFormat::for_vertex_count(0), IndexFormat::U16);
        assert_eq!(IndexFormat::for_vertex_count(65_536), IndexFormat::U16);
        assert_eq!(IndexFormat::for_vertex_count(65_537), IndexFormat::U32);
        assert_eq!(IndexFormat::U32.size_bytes(), 4);
    }

    #[test]
    fn large_meshes_keep_u32_indices() {
        let mesh = Mesh::new(vec![Vertex::default(); 70_000], vec![0, 69_999, 1]);
        let buf = mesh.index_buffer();
        assert_eq!(buf.format(), IndexFormat::U32);
        assert_eq!(buf, IndexBuffer::U32(vec![0, 69_999, 1]));
    }

    #[test]
    fn bounds_cover_all_positions() {
        let bounds = quad().bounds().expect("non-empty mesh");
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, 0.5, -0.5));
        assert!(Mesh::default().bounds().is_none());
    }
}
