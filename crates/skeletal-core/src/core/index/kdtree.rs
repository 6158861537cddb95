use nalgebra::Point2;

/// Inputs smaller than this skip tree construction entirely; a linear scan
/// beats the tree at this size.
pub const BRUTE_FORCE_CUTOFF: usize = 24;

const LEAF_SIZE: usize = 8;

#[derive(Debug, Clone, Copy)]
enum Node {
    /// A contiguous range of the point permutation, scanned linearly.
    Leaf { start: usize, len: usize },
    /// An axis-aligned split; left holds coordinates `<=` the split value,
    /// right holds `>=`.
    Split {
        axis: usize,
        value: f64,
        left: usize,
        right: usize,
    },
}

/// A static 2D KD-tree over a set of points, supporting inclusive
/// radius queries.
///
/// The tree is built once by median splits on alternating axes and never
/// rebalanced; callers rebuild it when the underlying positions move.
/// Query results are point indices into the original input order, sorted
/// ascending, so equal inputs always produce equal outputs regardless of
/// whether the tree or the brute-force path answered.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    points: Vec<Point2<f64>>,
    order: Vec<usize>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl SpatialIndex {
    /// Builds an index over the given points.
    pub fn build(points: Vec<Point2<f64>>) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        if points.len() < BRUTE_FORCE_CUTOFF {
            return Self {
                points,
                order,
                nodes: Vec::new(),
                root: None,
            };
        }

        let mut nodes: Vec<Node> = Vec::new();
        let mut root = 0;
        // (start, end, depth, parent, is_left_child)
        let mut stack = vec![(0usize, points.len(), 0usize, usize::MAX, false)];

        while let Some((start, end, depth, parent, is_left)) = stack.pop() {
            let node_index = nodes.len();

            if end - start <= LEAF_SIZE {
                nodes.push(Node::Leaf {
                    start,
                    len: end - start,
                });
            } else {
                let axis = depth % 2;
                let mid = (start + end) / 2;
                order[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
                    axis_value(&points, a, axis)
                        .total_cmp(&axis_value(&points, b, axis))
                        .then(a.cmp(&b))
                });
                let value = axis_value(&points, order[mid], axis);
                nodes.push(Node::Split {
                    axis,
                    value,
                    left: 0,
                    right: 0,
                });
                stack.push((start, mid, depth + 1, node_index, true));
                stack.push((mid, end, depth + 1, node_index, false));
            }

            if parent == usize::MAX {
                root = node_index;
            } else if let Node::Split { left, right, .. } = &mut nodes[parent] {
                if is_left {
                    *left = node_index;
                } else {
                    *right = node_index;
                }
            }
        }

        Self {
            points,
            order,
            nodes,
            root: Some(root),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Finds every point within `radius` of `center`, boundary inclusive.
    ///
    /// # Return
    ///
    /// Indices into the input point order, ascending. Negative radii match
    /// nothing.
    pub fn query_radius(&self, center: &Point2<f64>, radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        if radius < 0.0 || self.points.is_empty() {
            return found;
        }
        let radius_squared = radius * radius;

        let Some(root) = self.root else {
            for (index, point) in self.points.iter().enumerate() {
                if (point - center).norm_squared() <= radius_squared {
                    found.push(index);
                }
            }
            return found;
        };

        let mut stack = vec![root];
        while let Some(node_index) = stack.pop() {
            match self.nodes[node_index] {
                Node::Leaf { start, len } => {
                    for &point_index in &self.order[start..start + len] {
                        if (self.points[point_index] - center).norm_squared() <= radius_squared {
                            found.push(point_index);
                        }
                    }
                }
                Node::Split {
                    axis,
                    value,
                    left,
                    right,
                } => {
                    let coordinate = if axis == 0 { center.x } else { center.y };
                    if coordinate - radius <= value {
                        stack.push(left);
                    }
                    if coordinate + radius >= value {
                        stack.push(right);
                    }
                }
            }
        }
        found.sort_unstable();
        found
    }

    /// Finds every unordered pair of distinct points within `radius` of
    /// each other, boundary inclusive.
    ///
    /// # Return
    ///
    /// Pairs `(i, j)` with `i < j`, sorted lexicographically.
    pub fn query_pairs(&self, radius: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.points.len() {
            for j in self.query_radius(&self.points[i], radius) {
                if j > i {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

fn axis_value(points: &[Point2<f64>], index: usize, axis: usize) -> f64 {
    if axis == 0 {
        points[index].x
    } else {
        points[index].y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn brute_force_radius(points: &[Point2<f64>], center: &Point2<f64>, radius: f64) -> Vec<usize> {
        points
            .iter()
            .enumerate()
            .filter(|(_, p)| (*p - center).norm_squared() <= radius * radius)
            .map(|(i, _)| i)
            .collect()
    }

    fn random_points(count: usize, seed: u64) -> Vec<Point2<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| Point2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)))
            .collect()
    }

    #[test]
    fn empty_index_matches_nothing() {
        let index = SpatialIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.query_radius(&Point2::origin(), 5.0).is_empty());
        assert!(index.query_pairs(5.0).is_empty());
    }

    #[test]
    fn negative_radius_matches_nothing() {
        let index = SpatialIndex::build(vec![Point2::origin()]);
        assert!(index.query_radius(&Point2::origin(), -1.0).is_empty());
    }

    #[test]
    fn boundary_distance_is_included() {
        let index = SpatialIndex::build(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        let hits = index.query_radius(&Point2::origin(), 1.0);
        assert_eq!(hits, vec![0, 1]);
        assert_eq!(index.query_pairs(1.0), vec![(0, 1)]);
    }

    #[test]
    fn zero_radius_finds_coincident_points_only() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.0),
        ];
        let index = SpatialIndex::build(points);
        assert_eq!(index.query_radius(&Point2::origin(), 0.0), vec![0, 1]);
        assert_eq!(index.query_pairs(0.0), vec![(0, 1)]);
    }

    #[test]
    fn chain_pairs_skip_distant_neighbors() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        let index = SpatialIndex::build(points);
        assert_eq!(index.query_pairs(1.0), vec![(0, 1), (1, 2)]);
        assert_eq!(index.query_pairs(2.0), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn small_inputs_stay_on_the_brute_force_path() {
        let points = random_points(BRUTE_FORCE_CUTOFF - 1, 11);
        let index = SpatialIndex::build(points.clone());
        for radius in [0.5, 2.0, 7.5] {
            for center in &points {
                assert_eq!(
                    index.query_radius(center, radius),
                    brute_force_radius(&points, center, radius)
                );
            }
        }
    }

    #[test]
    fn tree_queries_agree_with_brute_force() {
        let points = random_points(200, 0x5EED);
        let index = SpatialIndex::build(points.clone());
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..50 {
            let center = Point2::new(rng.gen_range(-12.0..12.0), rng.gen_range(-12.0..12.0));
            let radius = rng.gen_range(0.0..8.0);
            assert_eq!(
                index.query_radius(&center, radius),
                brute_force_radius(&points, &center, radius),
                "divergence at center {center:?} radius {radius}"
            );
        }
    }

    #[test]
    fn tree_pairs_agree_with_brute_force() {
        let points = random_points(120, 7);
        let index = SpatialIndex::build(points.clone());

        let mut expected = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if (points[j] - points[i]).norm_squared() <= 1.5 * 1.5 {
                    expected.push((i, j));
                }
            }
        }
        assert_eq!(index.query_pairs(1.5), expected);
    }

    #[test]
    fn duplicate_points_are_all_reported() {
        let mut points = vec![Point2::new(3.0, 3.0); 30];
        points.push(Point2::new(-5.0, -5.0));
        let index = SpatialIndex::build(points);

        let hits = index.query_radius(&Point2::new(3.0, 3.0), 0.1);
        assert_eq!(hits, (0..30).collect::<Vec<_>>());
    }
}
