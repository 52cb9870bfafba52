use fxhash::FxHashMap;

use crate::{
    error::StateError,
    solver::state::{StateId, StateValue, StateValueType},
};

/// Cached states of one route. They are marked stale by any change of the route and must be
/// recomputed by the `StateManager` before being read again.
#[derive(Debug, Clone, Default)]
pub struct RouteStates {
    route: FxHashMap<StateId, StateValue>,
    activities: FxHashMap<StateId, Vec<Option<StateValue>>>,
    num_activities: usize,
    stale: bool,
}

impl RouteStates {
    pub(crate) fn new(num_activities: usize) -> Self {
        RouteStates {
            route: FxHashMap::default(),
            activities: FxHashMap::default(),
            num_activities,
            stale: false,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn put_route<T: StateValueType>(&mut self, id: StateId, value: T) -> Result<(), StateError> {
        check_shape::<T>(id)?;
        self.route.insert(id, value.into_value());
        Ok(())
    }

    pub fn put_activity<T: StateValueType>(
        &mut self,
        id: StateId,
        index: usize,
        value: T,
    ) -> Result<(), StateError> {
        check_shape::<T>(id)?;
        let num_activities = self.num_activities;
        let values = self
            .activities
            .entry(id)
            .or_insert_with(|| vec![None; num_activities]);

        if values.len() <= index {
            values.resize(index + 1, None);
        }
        values[index] = Some(value.into_value());
        Ok(())
    }

    pub fn route_state<T: StateValueType>(&self, id: StateId) -> Result<&T, StateError> {
        check_shape::<T>(id)?;
        if self.stale {
            return Err(StateError::Stale(id));
        }

        self.route
            .get(&id)
            .and_then(T::from_value)
            .ok_or(StateError::Missing(id))
    }

    pub fn activity_state<T: StateValueType>(
        &self,
        id: StateId,
        index: usize,
    ) -> Result<&T, StateError> {
        check_shape::<T>(id)?;
        if self.stale {
            return Err(StateError::Stale(id));
        }

        self.activities
            .get(&id)
            .and_then(|values| values.get(index))
            .and_then(Option::as_ref)
            .and_then(T::from_value)
            .ok_or(StateError::Missing(id))
    }
}

fn check_shape<T: StateValueType>(id: StateId) -> Result<(), StateError> {
    if id.shape() != T::SHAPE {
        return Err(StateError::ShapeMismatch {
            state: id,
            expected: id.shape(),
            requested: T::SHAPE,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::capacity::Capacity,
        solver::state::{SkillSet, StateShape},
    };

    use super::*;

    #[test]
    fn test_typed_round_trip() {
        let mut states = RouteStates::new(2);
        states
            .put_activity(StateId::Load, 1, Capacity::from_vec(vec![3.0]))
            .unwrap();
        states.put_route(StateId::Costs, 12.5).unwrap();

        assert_eq!(
            states.activity_state::<Capacity>(StateId::Load, 1),
            Ok(&Capacity::from_vec(vec![3.0]))
        );
        assert_eq!(states.route_state::<f64>(StateId::Costs), Ok(&12.5));
        assert_eq!(
            states.activity_state::<Capacity>(StateId::Load, 0),
            Err(StateError::Missing(StateId::Load))
        );
    }

    #[test]
    fn test_shape_mismatch_is_rejected_on_write_and_read() {
        let mut states = RouteStates::new(1);

        assert_eq!(
            states.put_route(StateId::Load, 1.0),
            Err(StateError::ShapeMismatch {
                state: StateId::Load,
                expected: StateShape::Capacity,
                requested: StateShape::Scalar,
            })
        );
        assert!(matches!(
            states.route_state::<SkillSet>(StateId::Costs),
            Err(StateError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_custom_state_declares_its_shape() {
        let id = StateId::Custom {
            name: "visits",
            shape: StateShape::Scalar,
        };
        let mut states = RouteStates::new(0);
        states.put_route(id, 4.0).unwrap();

        assert_eq!(states.route_state::<f64>(id), Ok(&4.0));
    }

    #[test]
    fn test_stale_states_are_not_readable() {
        let mut states = RouteStates::new(0);
        states.put_route(StateId::Costs, 1.0).unwrap();
        states.mark_stale();

        assert_eq!(
            states.route_state::<f64>(StateId::Costs),
            Err(StateError::Stale(StateId::Costs))
        );
    }
}
