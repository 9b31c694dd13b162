use rust_decimal::Decimal;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{AddAssign, Sub, SubAssign};
use tracing::error;

/// Money moved along one or more edges: the summed amount and the number of
/// raw transactions behind it.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Flow {
    pub amount: Decimal,
    pub count: i64
}

impl Flow {
    pub fn new(amount: Decimal, count: i64) -> Self {
        Self { amount, count }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// A single raw transaction of the given amount.
    pub fn single(amount: Decimal) -> Self {
        Self::new(amount, 1)
    }

    /// True when either component went below zero.
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO || self.count < 0
    }
}

impl AddAssign<Flow> for Flow {
    //NOTE: Components are summed independently, an amount overflow must not lose the transaction count
    fn add_assign(&mut self, rhs: Flow) {
        match self.amount.checked_add(rhs.amount) {
            Some(amount) => self.amount = amount,
            None => error!("Flow AddAssign error: amount overflow, [{}] not added", rhs.amount)
        }
        match self.count.checked_add(rhs.count) {
            Some(count) => self.count = count,
            None => error!("Flow AddAssign error: count overflow, [{}] not added", rhs.count)
        }
    }
}

impl SubAssign<Flow> for Flow {
    fn sub_assign(&mut self, rhs: Flow) {
        match self.amount.checked_sub(rhs.amount) {
            Some(amount) => self.amount = amount,
            None => error!("Flow SubAssign error: amount overflow, [{}] not subtracted", rhs.amount)
        }
        match self.count.checked_sub(rhs.count) {
            Some(count) => self.count = count,
            None => error!("Flow SubAssign error: count overflow, [{}] not subtracted", rhs.count)
        }
    }
}

impl Sub<Flow> for Flow {
    type Output = Flow;

    fn sub(mut self, rhs: Flow) -> Flow {
        self -= rhs;
        self
    }
}

impl Display for Flow {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} over {} txn(s)", self.amount, self.count)
    }
}
