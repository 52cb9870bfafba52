use fxhash::{FxHashMap, FxHashSet};

/// Density based clustering (DBSCAN) over point indices `0..num_points`.
///
/// `neighborhood` returns the indices within epsilon of a point, the point itself included.
/// Points with fewer than `min_points` neighbors that are not reachable from a core point are
/// treated as noise and never appear in a cluster.
pub fn dbscan<F>(num_points: usize, min_points: usize, neighborhood: F) -> Vec<Vec<usize>>
where
    F: Fn(usize) -> Vec<usize>,
{
    let mut point_types = FxHashMap::<usize, PointType>::default();
    let mut clusters = Vec::new();

    for point in 0..num_points {
        if point_types.contains_key(&point) {
            continue;
        }

        let mut neighbors = neighborhood(point);
        if neighbors.len() < min_points {
            point_types.insert(point, PointType::Noise);
            continue;
        }

        let mut seen: FxHashSet<usize> = neighbors.iter().copied().collect();
        let mut cluster = vec![point];
        point_types.insert(point, PointType::Clustered);

        let mut index = 0;
        while index < neighbors.len() {
            let candidate = neighbors[index];
            index += 1;

            match point_types.get(&candidate) {
                Some(PointType::Clustered) => continue,
                Some(PointType::Noise) => {}
                None => {
                    let expansion = neighborhood(candidate);
                    if expansion.len() >= min_points {
                        for other in expansion {
                            if seen.insert(other) {
                                neighbors.push(other);
                            }
                        }
                    }
                }
            }

            point_types.insert(candidate, PointType::Clustered);
            cluster.push(candidate);
        }

        clusters.push(cluster);
    }

    clusters
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PointType {
    Noise,
    Clustered,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_neighborhood(points: &[f64], epsilon: f64) -> impl Fn(usize) -> Vec<usize> + '_ {
        move |index| {
            points
                .iter()
                .enumerate()
                .filter(|(_, other)| (points[index] - **other).abs() <= epsilon)
                .map(|(other_index, _)| other_index)
                .collect()
        }
    }

    #[test]
    fn test_dbscan_two_groups() {
        let points = [0.0, 0.5, 1.0, 10.0, 10.5, 11.0];
        let mut clusters = dbscan(points.len(), 2, line_neighborhood(&points, 0.6));

        for cluster in clusters.iter_mut() {
            cluster.sort_unstable();
        }
        clusters.sort();

        assert_eq!(clusters, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn test_dbscan_noise_is_left_out() {
        let points = [0.0, 0.5, 50.0];
        let clusters = dbscan(points.len(), 2, line_neighborhood(&points, 0.6));

        assert_eq!(clusters.len(), 1);
        assert!(!clusters[0].contains(&2));
    }

    #[test]
    fn test_dbscan_single_point_clusters() {
        let points = [0.0, 5.0, 10.0];
        let clusters = dbscan(points.len(), 1, line_neighborhood(&points, 0.1));

        assert_eq!(clusters.len(), 3);
    }
}
