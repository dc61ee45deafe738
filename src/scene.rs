//! A flat list of objects.
//!
//! There is no hierarchy: every [`Object`] carries its own world transform.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::depth_sort::sort_back_to_front;
use crate::math::{Mat4, Vec3, Vec4};
use crate::object::Object;
use crate::resources::{MaterialId, MeshId};

#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Object>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: Object) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Adds the six faces of a 2×2×2 cube centered on `center`, built from a
    /// unit quad facing +Z. Opposite faces share a color: red for ±Z, green
    /// for ±X, blue for ±Y. `alpha` applies to all six.
    pub fn add_cube_faces(&mut self, mesh: MeshId, center: Vec3, alpha: f32) -> &mut Self {
        self.add_cube_faces_with(mesh, None, center, alpha)
    }

    /// Like [`add_cube_faces`](Self::add_cube_faces), with every face
    /// textured by `material`.
    pub fn add_cube_faces_with(
        &mut self,
        mesh: MeshId,
        material: Option<MaterialId>,
        center: Vec3,
        alpha: f32,
    ) -> &mut Self {
        let red = Vec4::new(1.0, 0.0, 0.0, alpha);
        let green = Vec4::new(0.0, 1.0, 0.0, alpha);
        let blue = Vec4::new(0.0, 0.0, 1.0, alpha);

        let faces = [
            (Vec3::UNIT_Z, Vec3::ZERO, red),
            (-Vec3::UNIT_Z, Vec3::new(0.0, PI, 0.0), red),
            (-Vec3::UNIT_X, Vec3::new(0.0, -FRAC_PI_2, 0.0), green),
            (Vec3::UNIT_X, Vec3::new(0.0, FRAC_PI_2, 0.0), green),
            (Vec3::UNIT_Y, Vec3::new(-FRAC_PI_2, 0.0, 0.0), blue),
            (-Vec3::UNIT_Y, Vec3::new(FRAC_PI_2, 0.0, 0.0), blue),
        ];

        for (offset, rotation, color) in faces {
            let mut face = Object::new(mesh)
                .at(center + offset)
                .rotated(rotation)
                .with_albedo(color);
            face.material = material;
            self.objects.push(face);
        }
        self
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// References to every object, farthest from the camera first.
    pub fn sorted(&self, view: &Mat4) -> Vec<&Object> {
        let mut refs: Vec<&Object> = self.objects.iter().collect();
        sort_back_to_front(view, &mut refs);
        refs
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
