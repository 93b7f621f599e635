//! Nearest-hit BVH traversal with an explicit stack.
//!
//! The walk descends left children first, remembering each internal node on
//! the stack, and resumes at the right child of the most recently pushed
//! node whenever a subtree is exhausted or culled. The search window
//! `[t_min, closest]` shrinks every time a nearer hit is found, so boxes
//! further away than the current best are rejected by the slab test.

use orb_core::{BvhChild, PrimitiveRef, Scene};
use orb_math::{Interval, Ray};

use crate::hittable::{hit_sphere, HitRecord};

/// Scratch stack of node indices for one traversal at a time.
///
/// Cleared at the start of every query. Each worker that traces rays needs
/// its own; the scene itself is shared read-only.
#[derive(Debug, Default, Clone)]
pub struct TraversalStack {
    nodes: Vec<u32>,
}

impl TraversalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack pre-sized so traversing `scene` never reallocates.
    pub fn for_scene(scene: &Scene) -> Self {
        Self {
            nodes: Vec::with_capacity(scene.nodes().len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Running best hit while the window shrinks.
struct Nearest<'s> {
    scene: &'s Scene,
    ray: &'s Ray,
    t_min: f32,
    closest: f32,
    hit: Option<HitRecord>,
}

impl<'s> Nearest<'s> {
    fn window(&self) -> Interval {
        Interval::new(self.t_min, self.closest)
    }

    fn test(&mut self, primitive: PrimitiveRef) {
        let PrimitiveRef::Sphere(index) = primitive;
        let sphere = self.scene.sphere(index);
        // hit_sphere only accepts t < closest, so equal-t hits keep the first
        if let Some(rec) = hit_sphere(self.ray, self.t_min, self.closest, sphere) {
            self.closest = rec.t;
            self.hit = Some(rec);
        }
    }

    /// Test a leaf child in place, or hand back a node child to descend into.
    fn visit(&mut self, child: Option<BvhChild>) -> Option<u32> {
        match child? {
            BvhChild::Node(index) => Some(index),
            BvhChild::Leaf(primitive) => {
                self.test(primitive);
                None
            }
        }
    }
}

/// Closest intersection of `ray` with the scene strictly inside
/// `(t_min, t_max)`, or `None` when nothing is hit.
pub fn find_closest_hit(
    scene: &Scene,
    ray: &Ray,
    t_min: f32,
    t_max: f32,
    stack: &mut TraversalStack,
) -> Option<HitRecord> {
    stack.nodes.clear();
    if scene.is_empty() {
        return None;
    }

    let mut nearest = Nearest {
        scene,
        ray,
        t_min,
        closest: t_max,
        hit: None,
    };
    let mut current = Some(0u32);

    loop {
        while let Some(index) = current {
            let node = scene.node(index);
            if !node.bounds.hit(ray, nearest.window()) {
                break;
            }
            current = match node.left {
                Some(BvhChild::Node(left)) => {
                    stack.nodes.push(index);
                    Some(left)
                }
                left => {
                    nearest.visit(left);
                    nearest.visit(node.right)
                }
            };
        }

        match stack.nodes.pop() {
            Some(parent) => current = nearest.visit(scene.node(parent).right),
            None => break,
        }
    }

    nearest.hit
}

/// Brute-force nearest hit over every sphere, ignoring the BVH.
///
/// Same window-shrinking rule as the BVH walk; used as ground truth.
pub fn find_closest_hit_linear(scene: &Scene, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
    let mut closest = t_max;
    let mut best = None;
    for sphere in scene.spheres() {
        if let Some(rec) = hit_sphere(ray, t_min, closest, sphere) {
            closest = rec.t;
            best = Some(rec);
        }
    }
    best
}
