//! Core shared types (renderer-agnostic): math re-exports, transforms and
//! the scene-object list.

use thiserror::Error;

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod scene;
pub mod transform;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Entity {0} is not alive")]
    DeadEntity(scene::Entity),
}

pub type CoreResult<T> = Result<T, CoreError>;
