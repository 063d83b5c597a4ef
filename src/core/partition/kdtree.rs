use crate::core::base::*;

const MAX_POINTS_PER_LEAF: usize = 4;

#[derive(Clone, Debug)]
enum KdNode {
    Leaf {
        point_indices_offset: usize,
        n_points: usize,
    },
    Interior {
        axis: u8,
        split: i32,
        above_child: usize,
    },
}

impl KdNode {
    fn init_leaf(point_nums: &[usize], point_indices: &mut Vec<usize>) -> Self {
        let point_indices_offset = point_indices.len();
        let mut sorted = point_nums.to_vec();
        sorted.sort_unstable();
        point_indices.extend_from_slice(&sorted);
        KdNode::Leaf {
            point_indices_offset,
            n_points: point_nums.len(),
        }
    }
}

/// Static 2D kd-tree over integer positions, answering nearest-neighbour
/// queries by index into the slice it was built from.
///
/// Among equidistant points the first one met during traversal wins.
/// Traversal order depends only on the positions and their order, so
/// repeated queries and rebuilds from the same input agree.
#[derive(Clone, Debug, Default)]
pub struct PointKdTree {
    points: Vec<Point2i>,
    nodes: Vec<KdNode>,
    point_indices: Vec<usize>,
}

impl PointKdTree {
    pub fn new(points: &[Point2i]) -> Self {
        let mut tree = PointKdTree {
            points: points.to_vec(),
            nodes: Vec::new(),
            point_indices: Vec::with_capacity(points.len()),
        };
        if !points.is_empty() {
            let point_nums: Vec<usize> = (0..points.len()).collect();
            let mut nodes = Vec::new();
            let mut point_indices = Vec::with_capacity(points.len());
            tree.build_tree(&point_nums, &mut nodes, &mut point_indices);
            tree.nodes = nodes;
            tree.point_indices = point_indices;
        }
        return tree;
    }

    pub fn len(&self) -> usize {
        return self.points.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.points.is_empty();
    }

    fn choose_split(&self, point_nums: &[usize]) -> Option<(usize, i32, Vec<usize>, Vec<usize>)> {
        let mut lo = self.points[point_nums[0]];
        let mut hi = lo;
        for i in point_nums.iter() {
            let p = self.points[*i];
            lo = Point2i::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point2i::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        let extent = hi - lo;
        let first_axis = if extent.x >= extent.y { 0 } else { 1 };
        for axis in [first_axis, 1 - first_axis] {
            let mut coords: Vec<i32> = point_nums.iter().map(|i| self.points[*i][axis]).collect();
            coords.sort_unstable();
            let split = coords[coords.len() / 2];
            // points on the median go above; if that leaves nothing below,
            // split at the next larger coordinate instead
            let split = if coords[0] < split {
                split
            } else {
                match coords.iter().find(|c| **c > split) {
                    Some(c) => *c,
                    None => continue,
                }
            };
            let (below, above): (Vec<usize>, Vec<usize>) = point_nums
                .iter()
                .copied()
                .partition(|i| self.points[*i][axis] < split);
            return Some((axis, split, below, above));
        }
        return None;
    }

    fn build_tree(
        &self,
        point_nums: &[usize],
        nodes: &mut Vec<KdNode>,
        point_indices: &mut Vec<usize>,
    ) -> usize {
        let node_num = nodes.len();
        if point_nums.len() <= MAX_POINTS_PER_LEAF {
            nodes.push(KdNode::init_leaf(point_nums, point_indices));
            return node_num;
        }
        if let Some((axis, split, below, above)) = self.choose_split(point_nums) {
            nodes.push(KdNode::Interior {
                axis: axis as u8,
                split,
                above_child: 0,
            }); // patched below
            let below_index = self.build_tree(&below, nodes, point_indices);
            debug_assert_eq!(node_num + 1, below_index);
            let above_child = self.build_tree(&above, nodes, point_indices);
            nodes[node_num] = KdNode::Interior {
                axis: axis as u8,
                split,
                above_child,
            };
        } else {
            // coincident points
            nodes.push(KdNode::init_leaf(point_nums, point_indices));
        }
        return node_num;
    }

    /// Index of the point closest to `(x, y)`, `None` for an empty tree.
    pub fn nearest(&self, x: i32, y: i32) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        let q = Point2i::new(x, y);
        let mut best: Option<(usize, i64)> = None;
        let mut todo: Vec<usize> = vec![0];
        while let Some(node_num) = todo.pop() {
            match &self.nodes[node_num] {
                KdNode::Leaf {
                    point_indices_offset,
                    n_points,
                } => {
                    let range = *point_indices_offset..(*point_indices_offset + *n_points);
                    for index in self.point_indices[range].iter() {
                        let d = Point2i::distance_squared(&q, &self.points[*index]);
                        let better = match best {
                            Some((_, best_d)) => d < best_d,
                            None => true,
                        };
                        if better {
                            best = Some((*index, d));
                        }
                    }
                }
                KdNode::Interior {
                    axis,
                    split,
                    above_child,
                } => {
                    let diff = (q[*axis as usize] - *split) as i64;
                    let (near, far) = if diff < 0 {
                        (node_num + 1, *above_child)
                    } else {
                        (*above_child, node_num + 1)
                    };
                    // the far side is at least |diff| (or |diff + 1|) away
                    let far_distance = if diff < 0 { diff * diff } else { (diff + 1) * (diff + 1) };
                    let visit_far = match best {
                        Some((_, best_d)) => far_distance <= best_d,
                        None => true,
                    };
                    // far is pushed first so near is searched first
                    if visit_far {
                        todo.push(far);
                    }
                    todo.push(near);
                }
            }
        }
        return best.map(|(index, _)| index);
    }
}
