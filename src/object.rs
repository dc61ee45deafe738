//! Placed, drawable things.
//!
//! [`Renderable`] is the seam between the scene and the renderer: anything
//! that can name its mesh, color and model matrix can be depth-sorted and
//! drawn. [`Object`] is the standard implementation, a mesh handle plus an
//! Euler transform.

use crate::math::{Mat4, Vec3, Vec4};
use crate::resources::{MaterialId, MeshId};

/// Something the scene pass can draw.
pub trait Renderable {
    /// Geometry to draw.
    fn mesh(&self) -> MeshId;

    /// Flat RGBA color multiplied into the shaded result.
    fn albedo(&self) -> Vec4 {
        Vec4::ONE
    }

    /// Local-to-world transform.
    fn model(&self) -> Mat4;

    /// Texture to sample; `None` draws with a plain white texture.
    fn material(&self) -> Option<MaterialId> {
        None
    }
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn mesh(&self) -> MeshId {
        (**self).mesh()
    }

    fn albedo(&self) -> Vec4 {
        (**self).albedo()
    }

    fn model(&self) -> Mat4 {
        (**self).model()
    }

    fn material(&self) -> Option<MaterialId> {
        (**self).material()
    }
}

/// A mesh placed in the world.
///
/// Rotation is stored as Euler angles in radians and applied X, then Y,
/// then Z in matrix order (`Rx · Ry · Rz`).
///
/// ```
/// use vitrail::math::{Vec3, Vec4};
/// use vitrail::{Mesh, Object, ResourceManager};
///
/// let mut resources = ResourceManager::new();
/// let quad = resources.meshes.insert(Mesh::quad());
///
/// let backdrop = Object::new(quad)
///     .at(Vec3::new(0.0, 0.0, -10.0))
///     .uniform_scale(5.0)
///     .with_albedo(Vec4::new(1.0, 1.0, 1.0, 0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object {
    pub mesh: MeshId,
    pub material: Option<MaterialId>,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub albedo: Vec4,
}

impl Object {
    /// At the origin, unrotated, unit scale, opaque white.
    pub fn new(mesh: MeshId) -> Self {
        Self {
            mesh,
            material: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            albedo: Vec4::ONE,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn with_albedo(mut self, albedo: Vec4) -> Self {
        self.albedo = albedo;
        self
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// `T(position) · Rx · Ry · Rz · S(scale)`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::translation(self.position) * Mat4::euler(self.rotation) * Mat4::scale(self.scale)
    }
}

impl Renderable for Object {
    fn mesh(&self) -> MeshId {
        self.mesh
    }

    fn albedo(&self) -> Vec4 {
        self.albedo
    }

    fn model(&self) -> Mat4 {
        self.model_matrix()
    }

    fn material(&self) -> Option<MaterialId> {
        self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::resources::Arena;
    use std::f32::consts::FRAC_PI_2;

    fn mesh_id() -> MeshId {
        Arena::<Mesh>::new().insert(Mesh::quad())
    }

    #[test]
    fn defaults() {
        let o = Object::new(mesh_id());
        assert_eq!(o.model(), Mat4::IDENTITY);
        assert_eq!(Renderable::albedo(&o), Vec4::ONE);
        assert_eq!(Renderable::material(&o), None);
    }

    #[test]
    fn model_scales_then_rotates_then_translates() {
        let o = Object::new(mesh_id())
            .at(Vec3::new(10.0, 0.0, 0.0))
            .rotated(Vec3::new(0.0, 0.0, FRAC_PI_2))
            .scaled(Vec3::new(2.0, 1.0, 1.0));
        let p = o.model() * Vec3::UNIT_X;
        // scale to (2, 0, 0), rotate to (0, 2, 0), translate.
        assert!((p - Vec3::new(10.0, 2.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn model_matches_glam_composition() {
        let o = Object::new(mesh_id())
            .at(Vec3::new(1.0, 2.0, 3.0))
            .rotated(Vec3::new(0.3, -0.7, 1.1))
            .uniform_scale(1.5);
        let g = glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0))
            * glam::Mat4::from_rotation_x(0.3)
            * glam::Mat4::from_rotation_y(-0.7)
            * glam::Mat4::from_rotation_z(1.1)
            * glam::Mat4::from_scale(glam::Vec3::splat(1.5));
        let expected = Mat4::from(g);
        for (a, b) in o.model().data().iter().zip(expected.data()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn references_are_renderable() {
        let o = Object::new(mesh_id()).with_albedo(Vec4::new(1.0, 0.0, 0.0, 0.5));
        let r: &dyn Renderable = &o;
        assert_eq!(r.albedo().w, 0.5);
        assert_eq!((&o).mesh(), o.mesh);
    }
}
