//! Explicit scene-object list: each object owns its name, transform and an
//! optional handle to mesh data held by the caller.

use crate::{CoreError, CoreResult, transform::Transform};

/// Object id (dense, index into the parallel arrays).
pub type Entity = u32;

/// Index into the caller's mesh storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Marks an object as drawable with the given mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renderable {
    pub mesh: MeshId,
}

/// Objects stored in dense parallel arrays. Despawned slots are not reused.
#[derive(Default)]
pub struct Scene {
    names: Vec<String>,
    transforms: Vec<Transform>,
    renderables: Vec<Option<Renderable>>,
    alive: Vec<bool>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        renderable: Option<Renderable>,
    ) -> Entity {
        let id = self.alive.len() as Entity;
        self.names.push(name.into());
        self.transforms.push(transform);
        self.renderables.push(renderable);
        self.alive.push(true);
        id
    }

    pub fn despawn(&mut self, e: Entity) -> CoreResult<()> {
        if !self.is_alive(e) {
            return Err(CoreError::DeadEntity(e));
        }
        let i = e as usize;
        self.alive[i] = false;
        self.renderables[i] = None;
        Ok(())
    }

    #[inline]
    pub fn is_alive(&self, e: Entity) -> bool {
        self.alive.get(e as usize).copied().unwrap_or(false)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn name(&self, e: Entity) -> Option<&str> {
        self.is_alive(e).then(|| self.names[e as usize].as_str())
    }

    #[inline]
    pub fn transform(&self, e: Entity) -> Option<&Transform> {
        self.is_alive(e).then(|| &self.transforms[e as usize])
    }

    #[inline]
    pub fn transform_mut(&mut self, e: Entity) -> Option<&mut Transform> {
        if self.is_alive(e) {
            Some(&mut self.transforms[e as usize])
        } else {
            None
        }
    }

    /// Live drawable objects in spawn order.
    pub fn iter_renderables(&self) -> impl Iterator<Item = (Entity, &Transform, &Renderable)> {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .filter_map(move |(i, _)| {
                self.renderables[i]
                    .as_ref()
                    .map(|r| (i as Entity, &self.transforms[i], r))
            })
    }

    /// Spin every live object about Y at `speed` rad/s.
    pub fn system_spin_y(&mut self, dt: f32, speed: f32) {
        for (t, _) in self
            .transforms
            .iter_mut()
            .zip(&self.alive)
            .filter(|(_, alive)| **alive)
        {
            t.rotate_y(speed * dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    #[test]
    fn spawn_and_iterate_renderables() {
        let mut scene = Scene::new();
        let tower = scene.spawn(
            "tower",
            Transform::from_translation(Vec3::new(0.0, 0.0, -5.0)),
            Some(Renderable { mesh: MeshId(0) }),
        );
        let marker = scene.spawn("marker", Transform::IDENTITY, None);
        let spyro = scene.spawn(
            "spyro",
            Transform::IDENTITY.with_uniform_scale(0.1),
            Some(Renderable { mesh: MeshId(1) }),
        );

        assert_eq!(scene.len(), 3);
        assert_eq!(scene.name(marker), Some("marker"));
        let drawn: Vec<_> = scene.iter_renderables().map(|(e, _, r)| (e, r.mesh)).collect();
        assert_eq!(drawn, vec![(tower, MeshId(0)), (spyro, MeshId(1))]);
    }

    #[test]
    fn despawn_hides_object() {
        let mut scene = Scene::new();
        let a = scene.spawn("a", Transform::IDENTITY, Some(Renderable { mesh: MeshId(0) }));
        scene.despawn(a).expect("first despawn");
        assert!(!scene.is_alive(a));
        assert!(scene.is_empty());
        assert!(scene.transform_mut(a).is_none());
        assert_eq!(scene.iter_renderables().count(), 0);
        assert!(matches!(scene.despawn(a), Err(CoreError::DeadEntity(id)) if id == a));
        assert!(matches!(scene.despawn(42), Err(CoreError::DeadEntity(42))));
    }

    #[test]
    fn spin_rotates_live_objects_only() {
        let mut scene = Scene::new();
        let a = scene.spawn("a", Transform::IDENTITY, None);
        let b = scene.spawn("b", Transform::IDENTITY, None);
        scene.despawn(b).expect("despawn");

        scene.system_spin_y(0.5, std::f32::consts::PI);
        let turned = scene.transform(a).expect("alive").matrix().transform_vector3(Vec3::X);
        assert!((turned - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert_eq!(scene.transforms[b as usize], Transform::IDENTITY);
    }
}
