use std::sync::Arc;

use parking_lot::Mutex;

use crate::problem::{job::JobIdx, vehicle::VehicleIdx};

#[derive(Debug, Clone, PartialEq)]
pub enum AlgorithmEvent {
    Started {
        pool_size: usize,
    },
    IterationStarted {
        iteration: usize,
    },
    StrategySelected {
        iteration: usize,
        strategy_id: String,
        accepted: bool,
        cost: f64,
    },
    IterationEnded {
        iteration: usize,
        best_cost: f64,
    },
    Ended {
        iterations: usize,
        best_cost: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertionEvent {
    Started {
        unassigned: usize,
    },
    JobInserted {
        job_id: JobIdx,
        vehicle_id: VehicleIdx,
        cost: f64,
    },
    /// Emitted once empty routes were dropped and their vehicles released.
    Ended {
        unassigned: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuinEvent {
    Started { jobs: usize },
    JobRemoved { job_id: JobIdx, route_index: usize },
    Ended { removed: usize },
}

pub type Listener<E> = Arc<Mutex<dyn FnMut(&E) + Send>>;

/// Typed channel, every listener receives every event in subscription order.
pub struct EventChannel<E> {
    listeners: Vec<Listener<E>>,
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        EventChannel {
            listeners: Vec::new(),
        }
    }
}

impl<E> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        EventChannel {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E> EventChannel<E> {
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&E) + Send + 'static,
    {
        self.listeners.push(Arc::new(Mutex::new(listener)));
    }

    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let mut listener = listener.lock();
            (*listener)(event);
        }
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }
}

#[derive(Default, Clone)]
pub struct EventHub {
    pub algorithm: EventChannel<AlgorithmEvent>,
    pub insertion: EventChannel<InsertionEvent>,
    pub ruin: EventChannel<RuinEvent>,
}
