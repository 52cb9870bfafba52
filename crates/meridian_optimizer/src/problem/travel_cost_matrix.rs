use crate::problem::{costs::TransportCosts, location::LocationIdx, vehicle::Vehicle};

use super::location::Location;

pub type Distance = f64;
pub type Time = f64;
pub type Cost = f64;

/// Flat matrices of distances, times and costs between locations.
/// The value for a pair of locations lives at `from * num_locations + to`.
pub struct TravelMatrices {
    distances: Vec<Distance>,
    times: Vec<Time>,
    costs: Vec<Cost>,
    num_locations: usize,
}

impl TravelMatrices {
    pub fn new(distances: Vec<Vec<Distance>>, times: Vec<Vec<Time>>, costs: Vec<Vec<Cost>>) -> Self {
        let num_locations = distances.len();

        TravelMatrices {
            distances: distances.into_iter().flatten().collect(),
            times: times.into_iter().flatten().collect(),
            costs: costs.into_iter().flatten().collect(),
            num_locations,
        }
    }

    /// Euclidean distances, with time and cost equal to the distance.
    pub fn from_euclidean(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                distances[i * num_locations + j] = from.euclidean_distance(to);
            }
        }

        TravelMatrices {
            times: distances.clone(),
            costs: distances.clone(),
            distances,
            num_locations,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> Time {
        if from == to {
            return 0.0;
        }

        self.times[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_cost(&self, from: LocationIdx, to: LocationIdx) -> Cost {
        if from == to {
            return 0.0;
        }

        self.costs[self.index(from, to)]
    }

    pub fn max_cost(&self) -> Cost {
        self.costs.iter().copied().fold(0.0, f64::max)
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}

impl TransportCosts for TravelMatrices {
    fn transport_cost(&self, from: LocationIdx, to: LocationIdx, _: f64, _: Option<&Vehicle>) -> f64 {
        self.travel_cost(from, to)
    }

    fn transport_time(&self, from: LocationIdx, to: LocationIdx, _: f64, _: Option<&Vehicle>) -> f64 {
        self.travel_time(from, to)
    }

    fn distance(&self, from: LocationIdx, to: LocationIdx) -> f64 {
        self.travel_distance(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_euclidean() {
        let locations = vec![
            Location::from_cartesian(0.0, 0.0),
            Location::from_cartesian(3.0, 4.0),
        ];
        let matrices = TravelMatrices::from_euclidean(&locations);

        assert_eq!(matrices.travel_distance(0.into(), 1.into()), 5.0);
        assert_eq!(matrices.travel_time(1.into(), 0.into()), 5.0);
        assert_eq!(matrices.travel_cost(1.into(), 1.into()), 0.0);
        assert_eq!(matrices.max_cost(), 5.0);
    }

    #[test]
    fn test_new_from_nested_rows() {
        let matrices = TravelMatrices::new(
            vec![vec![0.0, 1.0], vec![2.0, 0.0]],
            vec![vec![0.0, 10.0], vec![20.0, 0.0]],
            vec![vec![0.0, 100.0], vec![200.0, 0.0]],
        );

        assert_eq!(matrices.num_locations(), 2);
        assert_eq!(matrices.transport_time(1.into(), 0.into(), 0.0, None), 20.0);
        assert_eq!(matrices.transport_cost(0.into(), 1.into(), 0.0, None), 100.0);
    }
}
