//! Asset loading: OBJ meshes welded into indexed, upload-ready vertex data.
//! Tangent frames are a separate pass over a loaded [`Mesh`].

pub mod error;
pub mod mesh;
pub mod obj;
pub mod tangent;
pub mod weld;

pub use error::{Attribute, ParseError, ParseResult};
pub use mesh::{Aabb, IndexBuffer, IndexFormat, Mesh, Vertex};
pub use obj::{LoadOptions, load_mesh, load_mesh_from_reader, load_mesh_from_str, load_mesh_with};
pub use tangent::compute_tangents;
pub use weld::Weld;
