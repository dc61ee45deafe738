//! Back-to-front ordering for alpha blending.
//!
//! Translucent surfaces only composite correctly when drawn farthest first
//! (the painter's algorithm). Each object is reduced to a single point, the
//! origin of its local space, and ordered by that point's depth in view
//! space. This is exact for convex, non-overlapping objects and an
//! approximation otherwise: large or intersecting surfaces can still be
//! drawn in the wrong order.

use crate::math::{Mat4, Vec4};
use crate::object::Renderable;

/// View-space z of the item's local origin, after the perspective divide.
///
/// The camera looks down −Z, so farther objects have more negative depth.
pub fn view_depth<R: Renderable + ?Sized>(view: &Mat4, item: &R) -> f32 {
    let p = *view * item.model() * Vec4::UNIT_W;
    p.z / p.w
}

/// Sorts `items` so the farthest is first.
///
/// The sort is stable (ties keep their input order) and total: NaN depths,
/// e.g. from a degenerate model matrix, end up last instead of poisoning the
/// comparison.
pub fn sort_back_to_front<R: Renderable>(view: &Mat4, items: &mut [R]) {
    items.sort_by_cached_key(|item| DepthKey(view_depth(view, item)));
}

#[derive(PartialEq)]
struct DepthKey(f32);

impl Eq for DepthKey {}

impl PartialOrd for DepthKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DepthKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.0.is_nan(), other.0.is_nan()) {
            (false, false) => self.0.total_cmp(&other.0),
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::mesh::Mesh;
    use crate::object::Object;
    use crate::resources::{Arena, MeshId};

    fn mesh_id() -> MeshId {
        Arena::<Mesh>::new().insert(Mesh::quad())
    }

    fn at_z(z: f32) -> Object {
        Object::new(mesh_id()).at(Vec3::new(0.0, 0.0, z))
    }

    fn depths(view: &Mat4, items: &[Object]) -> Vec<f32> {
        items.iter().map(|o| view_depth(view, o)).collect()
    }

    #[test]
    fn farthest_first() {
        let view = Mat4::IDENTITY;
        let mut items = vec![at_z(-1.0), at_z(-5.0), at_z(-2.0)];
        sort_back_to_front(&view, &mut items);
        assert_eq!(depths(&view, &items), vec![-5.0, -2.0, -1.0]);
    }

    #[test]
    fn depth_uses_the_view_matrix() {
        // Camera at z = +10 looking down -Z: world z = 0 is 10 units away.
        let view = Mat4::translation(Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(view_depth(&view, &at_z(0.0)), -10.0);

        // Turning around reverses the order.
        let behind = Mat4::rotation_y(std::f32::consts::PI);
        let mut items = vec![at_z(-1.0), at_z(-5.0), at_z(3.0)];
        sort_back_to_front(&behind, &mut items);
        let zs: Vec<f32> = items.iter().map(|o| o.position.z).collect();
        assert_eq!(zs, vec![3.0, -1.0, -5.0]);
    }

    #[test]
    fn ties_keep_input_order() {
        let view = Mat4::IDENTITY;
        let a = at_z(-3.0).at(Vec3::new(1.0, 0.0, -3.0));
        let b = at_z(-3.0).at(Vec3::new(-1.0, 0.0, -3.0));
        let mut items = vec![a, b];
        sort_back_to_front(&view, &mut items);
        assert_eq!(items, vec![a, b]);
    }

    #[test]
    fn nan_depth_sorts_last() {
        let view = Mat4::IDENTITY;
        let broken = at_z(f32::NAN);
        let mut items = vec![broken, at_z(-1.0), at_z(-4.0)];
        sort_back_to_front(&view, &mut items);
        assert_eq!(items[0].position.z, -4.0);
        assert_eq!(items[1].position.z, -1.0);
        assert!(items[2].position.z.is_nan());
    }

    #[test]
    fn sorts_references() {
        let view = Mat4::IDENTITY;
        let objects = [at_z(-1.0), at_z(-3.0)];
        let mut refs: Vec<&Object> = objects.iter().collect();
        sort_back_to_front(&view, &mut refs);
        assert_eq!(refs[0].position.z, -3.0);
    }
}
