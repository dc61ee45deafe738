//! Resource ownership and teardown.
//!
//! Every GPU-backed or file-backed resource (textures, meshes, materials,
//! shaders) lives in an [`Arena`] owned by the [`ResourceManager`]. Scene
//! objects refer to them through typed [`Handle`]s, so a mesh handle can
//! never be passed where a material is expected.
//!
//! Teardown is explicit: [`ResourceManager::shutdown`] releases everything
//! in a fixed order (shaders, meshes, materials, textures) before the GPU
//! context goes away. Releasing a handle individually through
//! [`Arena::destroy`] is also supported and is safe to repeat.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::material::Material;
use crate::mesh::Mesh;
use crate::shader::Shader;
use crate::texture::Texture;

/// Something that owns releasable memory or GPU objects.
pub trait Resource {
    /// Human-readable name for logs.
    fn label(&self) -> String;

    /// Frees the underlying memory. Called exactly once by the arena.
    fn release(&mut self);
}

/// Typed index into an [`Arena`].
pub struct Handle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Position in the owning arena.
    pub fn index(self) -> usize {
        self.index
    }
}

// Manual impls: derives would require `T: Clone` etc.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = std::any::type_name::<T>().rsplit("::").next().unwrap_or("?");
        write!(f, "Handle<{}>({})", name, self.index)
    }
}

/// Handle to a [`Mesh`].
pub type MeshId = Handle<Mesh>;
/// Handle to a [`Texture`].
pub type TextureId = Handle<Texture>;
/// Handle to a [`Material`].
pub type MaterialId = Handle<Material>;
/// Handle to a [`Shader`].
pub type ShaderId = Handle<Shader>;

/// Append-only storage with per-slot release.
///
/// Slots are never reused, so a stale handle can only ever observe `None`.
pub struct Arena<T: Resource> {
    slots: Vec<Option<T>>,
}

impl<T: Resource> Default for Arena<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Resource> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> Handle<T> {
        self.slots.push(Some(value));
        Handle::new(self.slots.len() - 1)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots.get(handle.index)?.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots.get_mut(handle.index)?.as_mut()
    }

    /// Releases one entry. Returns `false` if it was already gone.
    pub fn destroy(&mut self, handle: Handle<T>) -> bool {
        match self.slots.get_mut(handle.index).and_then(Option::take) {
            Some(mut value) => {
                log::debug!("Destroying {}", value.label());
                value.release();
                true
            }
            None => false,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entries with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (Handle::new(i), v)))
    }

    /// Releases every live entry, newest first. Returns how many were freed.
    pub fn shutdown(&mut self) -> usize {
        let mut released = 0;
        for slot in self.slots.iter_mut().rev() {
            if let Some(mut value) = slot.take() {
                log::debug!("Destroying {}", value.label());
                value.release();
                released += 1;
            }
        }
        released
    }
}

/// Owner of every resource the renderer uses.
#[derive(Default)]
pub struct ResourceManager {
    pub textures: Arena<Texture>,
    pub meshes: Arena<Mesh>,
    pub materials: Arena<Material>,
    pub shaders: Arena<Shader>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases shaders, then meshes, then materials, then textures.
    ///
    /// Safe to call more than once; later calls find nothing to release.
    pub fn shutdown(&mut self) -> usize {
        let shaders = self.shaders.shutdown();
        let meshes = self.meshes.shutdown();
        let materials = self.materials.shutdown();
        let textures = self.textures.shutdown();
        let total = shaders + meshes + materials + textures;
        if total > 0 {
            log::info!(
                "Released {} shaders, {} meshes, {} materials, {} textures",
                shaders,
                meshes,
                materials,
                textures
            );
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tracked {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Resource for Tracked {
        fn label(&self) -> String {
            self.name.to_string()
        }

        fn release(&mut self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    fn arena_with(names: &[&'static str]) -> (Arena<Tracked>, Vec<Handle<Tracked>>, Rc<RefCell<Vec<&'static str>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut arena = Arena::new();
        let handles = names
            .iter()
            .map(|&name| {
                arena.insert(Tracked {
                    name,
                    log: Rc::clone(&log),
                })
            })
            .collect();
        (arena, handles, log)
    }

    #[test]
    fn destroy_releases_once() {
        let (mut arena, handles, log) = arena_with(&["a", "b"]);
        assert!(arena.destroy(handles[0]));
        assert!(!arena.destroy(handles[0]));
        assert!(arena.get(handles[0]).is_none());
        assert!(arena.get(handles[1]).is_some());
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn shutdown_releases_newest_first() {
        let (mut arena, handles, log) = arena_with(&["a", "b", "c"]);
        arena.destroy(handles[1]);
        assert_eq!(arena.shutdown(), 2);
        assert_eq!(*log.borrow(), vec!["b", "c", "a"]);
        assert!(arena.is_empty());
        assert_eq!(arena.shutdown(), 0);
    }

    #[test]
    fn handles_are_typed_and_stable() {
        let (mut arena, handles, _log) = arena_with(&["a"]);
        let copy = handles[0];
        assert_eq!(copy, handles[0]);
        assert_eq!(copy.index(), 0);
        assert_eq!(arena.get_mut(copy).map(|t| t.name), Some("a"));
        assert_eq!(arena.iter().count(), 1);
    }

    #[test]
    fn manager_shutdown_empties_every_arena() {
        let mut resources = ResourceManager::new();
        resources
            .textures
            .insert(Texture::from_pixels("t", 1, 1, 4, vec![0; 4]));
        resources.meshes.insert(Mesh::quad());
        assert_eq!(resources.shutdown(), 2);
        assert!(resources.textures.is_empty());
        assert!(resources.meshes.is_empty());
        assert_eq!(resources.shutdown(), 0);
    }
}
