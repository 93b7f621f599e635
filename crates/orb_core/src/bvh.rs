//! Bounding Volume Hierarchy stored as a flat arena.
//!
//! Nodes live in one contiguous `Vec` and refer to each other by index;
//! node 0 is the root. Leaves point at primitives in the scene's sphere
//! table. Traversal lives in the renderer, this module only describes and
//! builds the tree.

use orb_math::Aabb;

use crate::sphere::Sphere;

/// Reference to a leaf primitive. Spheres are the only supported kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveRef {
    Sphere(u32),
}

/// One side of a BVH node: another node, or a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvhChild {
    Node(u32),
    Leaf(PrimitiveRef),
}

/// A BVH node. `None` marks an absent child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    pub bounds: Aabb,
    pub left: Option<BvhChild>,
    pub right: Option<BvhChild>,
}

impl BvhNode {
    /// Node holding a single primitive on its left side.
    pub fn leaf(bounds: Aabb, primitive: PrimitiveRef) -> Self {
        Self {
            bounds,
            left: Some(BvhChild::Leaf(primitive)),
            right: None,
        }
    }

    /// Node with two child nodes.
    pub fn internal(bounds: Aabb, left: u32, right: u32) -> Self {
        Self {
            bounds,
            left: Some(BvhChild::Node(left)),
            right: Some(BvhChild::Node(right)),
        }
    }

    fn placeholder() -> Self {
        Self {
            bounds: Aabb::EMPTY,
            left: None,
            right: None,
        }
    }
}

/// Build a BVH over `spheres`, one sphere per leaf node.
///
/// Simple median-split approach: sort the spheres by centroid along the
/// longest axis of their centroid bounds, split in half, recurse. Nodes are
/// emitted in pre-order so the root lands at index 0 and every child index
/// is greater than its parent's. An empty input yields an empty arena.
pub fn build_bvh(spheres: &[Sphere]) -> Vec<BvhNode> {
    let mut nodes = Vec::with_capacity(spheres.len().saturating_mul(2));
    if spheres.is_empty() {
        return nodes;
    }

    let mut order: Vec<u32> = (0..spheres.len() as u32).collect();
    build_recursive(spheres, &mut order, &mut nodes);

    log::debug!(
        "Built BVH: {} nodes over {} spheres, depth {}",
        nodes.len(),
        spheres.len(),
        depth(&nodes)
    );
    nodes
}

fn build_recursive(spheres: &[Sphere], order: &mut [u32], nodes: &mut Vec<BvhNode>) -> u32 {
    let slot = nodes.len() as u32;
    nodes.push(BvhNode::placeholder());

    if let [only] = order {
        let sphere = &spheres[*only as usize];
        nodes[slot as usize] = BvhNode::leaf(sphere.bounding_box(), PrimitiveRef::Sphere(*only));
        return slot;
    }

    // Split axis from centroid spread rather than box extent
    let centroid_bounds = order.iter().fold(Aabb::EMPTY, |acc, &i| {
        let c = spheres[i as usize].center;
        Aabb::surrounding(&acc, &Aabb::from_points(c, c))
    });
    let axis = centroid_bounds.longest_axis();

    // Stable sort keeps insertion order among equal centroids
    order.sort_by(|&a, &b| {
        let a_val = spheres[a as usize].center[axis];
        let b_val = spheres[b as usize].center[axis];
        a_val.partial_cmp(&b_val).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = order.len() / 2;
    let (left_order, right_order) = order.split_at_mut(mid);
    let left = build_recursive(spheres, left_order, nodes);
    let right = build_recursive(spheres, right_order, nodes);

    let bounds = Aabb::surrounding(&nodes[left as usize].bounds, &nodes[right as usize].bounds);
    nodes[slot as usize] = BvhNode::internal(bounds, left, right);
    slot
}

/// Number of nodes on the longest root-to-leaf path (0 for an empty arena).
pub fn depth(nodes: &[BvhNode]) -> usize {
    fn visit(nodes: &[BvhNode], index: u32) -> usize {
        let node = &nodes[index as usize];
        let child_depth = |child: Option<BvhChild>| match child {
            Some(BvhChild::Node(i)) => visit(nodes, i),
            _ => 0,
        };
        1 + child_depth(node.left).max(child_depth(node.right))
    }

    if nodes.is_empty() {
        0
    } else {
        visit(nodes, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialRef;
    use orb_math::Vec3;

    fn row_of_spheres(n: usize) -> Vec<Sphere> {
        (0..n)
            .map(|i| Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, MaterialRef::Lambertian(0)))
            .collect()
    }

    fn leaf_spheres(nodes: &[BvhNode]) -> Vec<u32> {
        let mut found: Vec<u32> = nodes
            .iter()
            .flat_map(|n| [n.left, n.right])
            .filter_map(|c| match c {
                Some(BvhChild::Leaf(PrimitiveRef::Sphere(i))) => Some(i),
                _ => None,
            })
            .collect();
        found.sort_unstable();
        found
    }

    #[test]
    fn test_bvh_empty() {
        assert!(build_bvh(&[]).is_empty());
        assert_eq!(depth(&[]), 0);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let spheres = row_of_spheres(1);
        let nodes = build_bvh(&spheres);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].left, Some(BvhChild::Leaf(PrimitiveRef::Sphere(0))));
        assert_eq!(nodes[0].right, None);
        assert_eq!(nodes[0].bounds, spheres[0].bounding_box());
    }

    #[test]
    fn test_bvh_every_sphere_in_exactly_one_leaf() {
        let spheres = row_of_spheres(10);
        let nodes = build_bvh(&spheres);

        // A full binary tree over n leaves has 2n - 1 nodes.
        assert_eq!(nodes.len(), 19);
        assert_eq!(leaf_spheres(&nodes), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_bvh_bounds_enclose_children_and_children_follow_parents() {
        let spheres = row_of_spheres(7);
        let nodes = build_bvh(&spheres);

        for (index, node) in nodes.iter().enumerate() {
            for child in [node.left, node.right].into_iter().flatten() {
                let child_bounds = match child {
                    BvhChild::Node(i) => {
                        assert!(i as usize > index);
                        nodes[i as usize].bounds
                    }
                    BvhChild::Leaf(PrimitiveRef::Sphere(i)) => spheres[i as usize].bounding_box(),
                };
                assert!(node.bounds.encloses(&child_bounds));
            }
        }
    }

    #[test]
    fn test_bvh_is_balanced() {
        let nodes = build_bvh(&row_of_spheres(16));
        assert_eq!(depth(&nodes), 5);
    }
}
