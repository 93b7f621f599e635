//! The scene store: everything a render reads, frozen at construction.
//!
//! Spheres, the three per-kind material tables and the BVH arena are plain
//! vectors addressed by index. A `Scene` is immutable once built and can be
//! shared by reference across any number of concurrent readers.

use orb_math::{Aabb, Vec3};

use crate::bvh::{build_bvh, BvhChild, BvhNode, PrimitiveRef};
use crate::error::{SceneError, SceneResult};
use crate::material::{Dielectric, Lambertian, MaterialDesc, MaterialRef, Metallic};
use crate::sphere::Sphere;

/// Immutable scene store.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<BvhNode>,
    spheres: Vec<Sphere>,
    lambertians: Vec<Lambertian>,
    metallics: Vec<Metallic>,
    dielectrics: Vec<Dielectric>,
}

impl Scene {
    /// Scene with nothing in it. Every ray misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a scene from pre-built tables, e.g. a hand-written BVH.
    ///
    /// The tables are checked with [`Scene::validate`] so a malformed store
    /// is rejected here rather than panicking mid-render.
    pub fn from_parts(
        nodes: Vec<BvhNode>,
        spheres: Vec<Sphere>,
        lambertians: Vec<Lambertian>,
        metallics: Vec<Metallic>,
        dielectrics: Vec<Dielectric>,
    ) -> SceneResult<Self> {
        let scene = Self {
            nodes,
            spheres,
            lambertians,
            metallics,
            dielectrics,
        };
        scene.validate()?;
        Ok(scene)
    }

    /// BVH nodes, root first. Empty for an empty scene.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn node(&self, index: u32) -> &BvhNode {
        &self.nodes[index as usize]
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn sphere(&self, index: u32) -> &Sphere {
        &self.spheres[index as usize]
    }

    pub fn lambertian(&self, index: u32) -> &Lambertian {
        &self.lambertians[index as usize]
    }

    pub fn metallic(&self, index: u32) -> &Metallic {
        &self.metallics[index as usize]
    }

    pub fn dielectric(&self, index: u32) -> &Dielectric {
        &self.dielectrics[index as usize]
    }

    /// Total entries across the three material tables.
    pub fn material_count(&self) -> usize {
        self.lambertians.len() + self.metallics.len() + self.dielectrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounds of the whole scene (the root node's box).
    pub fn bounds(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, |root| root.bounds)
    }

    /// Check the structural invariants traversal relies on.
    ///
    /// - every child node index is in range and greater than its parent's,
    ///   so the arena is a tree rooted at node 0
    /// - every leaf and every sphere reference resolves
    /// - every node's box encloses its children's boxes
    pub fn validate(&self) -> SceneResult<()> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !self.material_exists(sphere.material) {
                return Err(SceneError::Malformed(format!(
                    "sphere {index} references missing material {:?}",
                    sphere.material
                )));
            }
            if !sphere.radius.is_finite() || sphere.radius <= 0.0 {
                return Err(SceneError::InvalidRadius(sphere.radius));
            }
        }

        for (index, node) in self.nodes.iter().enumerate() {
            for child in [node.left, node.right].into_iter().flatten() {
                let child_bounds = match child {
                    BvhChild::Node(c) => {
                        if c as usize >= self.nodes.len() || c as usize <= index {
                            return Err(SceneError::Malformed(format!(
                                "node {index} has invalid child node {c}"
                            )));
                        }
                        self.nodes[c as usize].bounds
                    }
                    BvhChild::Leaf(PrimitiveRef::Sphere(s)) => match self.spheres.get(s as usize) {
                        Some(sphere) => sphere.bounding_box(),
                        None => {
                            return Err(SceneError::Malformed(format!(
                                "node {index} references missing sphere {s}"
                            )))
                        }
                    },
                };
                if !node.bounds.encloses(&child_bounds) {
                    return Err(SceneError::Malformed(format!(
                        "node {index} bounds do not enclose child {child:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn material_exists(&self, material: MaterialRef) -> bool {
        match material {
            MaterialRef::Lambertian(i) => (i as usize) < self.lambertians.len(),
            MaterialRef::Metallic(i) => (i as usize) < self.metallics.len(),
            MaterialRef::Dielectric(i) => (i as usize) < self.dielectrics.len(),
        }
    }
}

/// Collects spheres and materials, then freezes them into a [`Scene`].
///
/// Materials with identical parameters share one table slot.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    spheres: Vec<Sphere>,
    lambertians: Vec<Lambertian>,
    metallics: Vec<Metallic>,
    dielectrics: Vec<Dielectric>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere made of `material`.
    pub fn add_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        material: MaterialDesc,
    ) -> SceneResult<PrimitiveRef> {
        if !center.is_finite() {
            return Err(SceneError::InvalidCenter(center));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SceneError::InvalidRadius(radius));
        }
        let material = self.intern_material(material)?;

        let index = self.spheres.len() as u32;
        self.spheres.push(Sphere::new(center, radius, material));
        Ok(PrimitiveRef::Sphere(index))
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    /// Find or insert `material` in its kind's table.
    pub fn intern_material(&mut self, material: MaterialDesc) -> SceneResult<MaterialRef> {
        material.validate()?;
        let material = match material {
            MaterialDesc::Lambertian(m) => MaterialRef::Lambertian(intern(&mut self.lambertians, m)),
            MaterialDesc::Metallic(m) => MaterialRef::Metallic(intern(&mut self.metallics, m)),
            MaterialDesc::Dielectric(m) => MaterialRef::Dielectric(intern(&mut self.dielectrics, m)),
        };
        Ok(material)
    }

    /// Build the BVH and freeze everything into a scene.
    pub fn build(self) -> SceneResult<Scene> {
        let nodes = build_bvh(&self.spheres);
        Scene::from_parts(
            nodes,
            self.spheres,
            self.lambertians,
            self.metallics,
            self.dielectrics,
        )
    }
}

fn intern<T: PartialEq>(table: &mut Vec<T>, value: T) -> u32 {
    match table.iter().position(|existing| *existing == value) {
        Some(index) => index as u32,
        None => {
            table.push(value);
            (table.len() - 1) as u32
        }
    }
}
