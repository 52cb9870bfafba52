/// Outcome of an activity level hard constraint for one insertion position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintsStatus {
    Fulfilled,
    NotFulfilled,
    /// Neither this position nor any later position of the same route can be fulfilled.
    NotFulfilledBreak,
}

impl ConstraintsStatus {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, ConstraintsStatus::Fulfilled)
    }

    pub fn is_break(&self) -> bool {
        matches!(self, ConstraintsStatus::NotFulfilledBreak)
    }
}

/// Evaluation tier of an activity level hard constraint, tiers run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Critical,
    High,
    Low,
}
