//! Bounding Volume Hierarchy

use engine::base::*;
use engine::geometry::*;
use std::cmp::Ordering;

/// Maximum number of primitives stored in a leaf.
pub const MAX_PRIMS_IN_NODE: usize = 4;

/// Depth of the traversal stack.
const MAX_TRAVERSAL_DEPTH: usize = 64;

/// Bounds and centroid of one primitive used while building.
#[derive(Copy, Clone, Debug)]
struct PrimitiveInfo {
    /// Index into the primitive list.
    index: usize,

    /// Bounding box.
    bounds: Bounds3f,

    /// Center of the bounding box.
    centroid: Point3f,
}

/// Result of visiting one primitive during traversal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Visit {
    /// The primitive was not hit.
    Miss,

    /// The primitive was hit at the given parametric distance.
    Hit(Float),

    /// Stop the traversal.
    Stop,
}

/// Flattened BVH node stored in depth first order.
#[derive(Copy, Clone, Debug)]
pub struct LinearBVHNode {
    /// Bounding box for the node.
    pub bounds: Bounds3f,

    /// For leaf nodes, offset for the primitives in the node. For interior
    /// nodes, offset to the second child.
    pub offset: usize,

    /// For leaf nodes, the number of primitives in the node. For interior
    /// nodes, 0.
    pub n_primitives: usize,

    /// For interior nodes, which coordinate axis was used for partitioning.
    pub axis: usize,
}

impl LinearBVHNode {
    fn leaf(bounds: Bounds3f, offset: usize, n_primitives: usize) -> Self {
        Self {
            bounds,
            offset,
            n_primitives,
            axis: 0,
        }
    }

    fn interior(bounds: Bounds3f, offset: usize, axis: usize) -> Self {
        Self {
            bounds,
            offset,
            n_primitives: 0,
            axis,
        }
    }
}

/// A BVH over primitive bounding boxes. It only stores indices so the
/// owner keeps the primitives themselves.
#[derive(Clone, Debug, Default)]
pub struct BVH {
    /// Flattened nodes; the root is at index 0.
    nodes: Vec<LinearBVHNode>,

    /// Primitive indices in leaf order.
    ordered: Vec<usize>,
}

impl BVH {
    /// Build a BVH using equal count splits along the widest centroid axis.
    ///
    /// * `bounds` - Bounding box of every primitive.
    pub fn new(bounds: &[Bounds3f]) -> Self {
        let mut info: Vec<PrimitiveInfo> = bounds
            .iter()
            .enumerate()
            .map(|(index, b)| PrimitiveInfo {
                index,
                bounds: *b,
                centroid: b.centroid(),
            })
            .collect();

        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * info.len()),
            ordered: Vec::with_capacity(info.len()),
        };
        if !info.is_empty() {
            bvh.build(&mut info);
        }

        debug!(
            "BVH created with {} nodes for {} primitives",
            bvh.nodes.len(),
            bvh.ordered.len()
        );
        bvh
    }

    /// Recursively build the subtree for `info` and return its node index.
    ///
    /// * `info` - Primitives in this subtree.
    fn build(&mut self, info: &mut [PrimitiveInfo]) -> usize {
        let node_index = self.nodes.len();
        let bounds = info.iter().fold(Bounds3f::EMPTY, |b, p| b.union(&p.bounds));
        self.nodes.push(LinearBVHNode::leaf(bounds, 0, 0));

        let centroid_bounds = info
            .iter()
            .fold(Bounds3f::EMPTY, |b, p| b.union(&Bounds3f::new(p.centroid, p.centroid)));
        let axis = centroid_bounds.maximum_extent();

        // Create a leaf when few primitives remain or all centroids coincide.
        if info.len() <= MAX_PRIMS_IN_NODE || centroid_bounds.p_max[axis] == centroid_bounds.p_min[axis] {
            let offset = self.ordered.len();
            self.ordered.extend(info.iter().map(|p| p.index));
            self.nodes[node_index] = LinearBVHNode::leaf(bounds, offset, info.len());
            return node_index;
        }

        // Partition primitives into equally sized subsets.
        let mid = info.len() / 2;
        info.select_nth_unstable_by(mid, |a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(Ordering::Equal)
        });
        let (left, right) = info.split_at_mut(mid);

        self.build(left);
        let second_child = self.build(right);
        self.nodes[node_index] = LinearBVHNode::interior(bounds, second_child, axis);
        node_index
    }

    /// Returns the bounds of all primitives.
    pub fn world_bound(&self) -> Bounds3f {
        self.nodes.first().map_or(Bounds3f::EMPTY, |n| n.bounds)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Visit the primitives in every leaf whose bounds overlap the ray.
    /// The visitor receives the primitive index and the current ray. A hit
    /// shortens the ray so boxes behind it are culled.
    ///
    /// * `ray`   - The ray.
    /// * `visit` - Called for each candidate primitive.
    pub fn traverse<F>(&self, ray: &Ray, mut visit: F)
    where
        F: FnMut(usize, &Ray) -> Visit,
    {
        if self.nodes.is_empty() {
            return;
        }

        let mut r = *ray;
        let dir_is_neg = [r.d.x < 0.0, r.d.y < 0.0, r.d.z < 0.0];

        // Follow ray through BVH nodes to find primitive intersections.
        let mut nodes_to_visit = [0_usize; MAX_TRAVERSAL_DEPTH];
        let (mut to_visit_offset, mut current_node_index) = (0, 0);

        loop {
            let node = &self.nodes[current_node_index];
            if node.bounds.intersect_p(&r) {
                if node.n_primitives > 0 {
                    for &idx in &self.ordered[node.offset..node.offset + node.n_primitives] {
                        match visit(idx, &r) {
                            Visit::Miss => {}
                            Visit::Hit(t) => r.t_max = t,
                            Visit::Stop => return,
                        }
                    }
                    if to_visit_offset == 0 {
                        break;
                    }
                    to_visit_offset -= 1;
                    current_node_index = nodes_to_visit[to_visit_offset];
                } else if dir_is_neg[node.axis] {
                    // Put far BVH node on nodes_to_visit stack, advance to near node.
                    nodes_to_visit[to_visit_offset] = current_node_index + 1;
                    to_visit_offset += 1;
                    current_node_index = node.offset;
                } else {
                    nodes_to_visit[to_visit_offset] = node.offset;
                    to_visit_offset += 1;
                    current_node_index += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }
                to_visit_offset -= 1;
                current_node_index = nodes_to_visit[to_visit_offset];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: Float) -> Bounds3f {
        Bounds3f::new(Point3f::new(x - 0.5, -0.5, -0.5), Point3f::new(x + 0.5, 0.5, 0.5))
    }

    #[test]
    fn empty_bvh_has_empty_bound() {
        let bvh = BVH::new(&[]);
        assert_eq!(bvh.node_count(), 0);
        assert_eq!(bvh.world_bound(), Bounds3f::EMPTY);
    }

    #[test]
    fn every_primitive_lands_in_one_leaf() {
        let boxes: Vec<Bounds3f> = (0..37).map(|i| unit_box_at(2.0 * i as Float)).collect();
        let bvh = BVH::new(&boxes);
        let mut seen = bvh.ordered.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..37).collect::<Vec<_>>());
        assert!(bvh.node_count() > 1);
        assert_eq!(bvh.world_bound().p_max.x, 72.5);
    }

    #[test]
    fn traversal_only_visits_boxes_on_the_ray() {
        let boxes: Vec<Bounds3f> = (0..20).map(|i| unit_box_at(2.0 * i as Float)).collect();
        let bvh = BVH::new(&boxes);

        // Vertical ray through the box centered at x = 10.
        let ray = Ray::new(Point3f::new(10.0, -5.0, 0.0), Vector3f::new(0.0, 1.0, 0.0), 0.0, INFINITY);
        let mut visited = 0;
        let mut hits = vec![];
        bvh.traverse(&ray, |i, r| {
            visited += 1;
            if boxes[i].intersect_p(r) {
                hits.push(i);
            }
            Visit::Miss
        });
        assert_eq!(hits, vec![5]);
        assert!(visited <= MAX_PRIMS_IN_NODE);
    }

    #[test]
    fn stop_ends_traversal() {
        let boxes: Vec<Bounds3f> = (0..20).map(|_| unit_box_at(0.0)).collect();
        let bvh = BVH::new(&boxes);
        let ray = Ray::new(Point3f::new(0.0, -5.0, 0.0), Vector3f::new(0.0, 1.0, 0.0), 0.0, INFINITY);
        let mut visited = 0;
        bvh.traverse(&ray, |_, _| {
            visited += 1;
            Visit::Stop
        });
        assert_eq!(visited, 1);
    }
}
