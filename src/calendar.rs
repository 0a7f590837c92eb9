use core::fmt::{
    self,
    Display,
};

/// A day of the teaching week, counted from zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Day(u8);

impl Day {
    /// Creates the day with the given zero based number.
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the zero based number of the day.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A teaching period within a day, counted from one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Period(u8);

impl Period {
    /// Creates the period with the given one based number.
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the one based number of the period.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The shape of a teaching week: days `0..days` with periods `1..=periods` each.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Calendar {
    days: u8,
    periods: u8,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

impl Calendar {
    /// Creates a calendar with the given number of days and periods per day.
    pub fn new(days: u8, periods: u8) -> Self {
        Self { days, periods }
    }

    /// Returns the number of days in the week.
    pub fn len_days(&self) -> usize {
        usize::from(self.days)
    }

    /// Returns the number of periods per day.
    pub fn len_periods(&self) -> usize {
        usize::from(self.periods)
    }

    /// Returns the number of (day, period) slots in the week.
    pub fn len_slots(&self) -> usize {
        self.len_days() * self.len_periods()
    }

    /// Returns `true` if the day belongs to the week.
    pub fn contains_day(&self, day: Day) -> bool {
        day.0 < self.days
    }

    /// Returns `true` if the period belongs to every day of the week.
    pub fn contains_period(&self, period: Period) -> bool {
        (1..=self.periods).contains(&period.0)
    }

    /// Returns an iterator over the days of the week in order.
    pub fn days(&self) -> impl Iterator<Item = Day> + Clone {
        (0..self.days).map(Day)
    }

    /// Returns an iterator over the periods of a day in order.
    pub fn periods(&self) -> impl Iterator<Item = Period> + Clone {
        (1..=self.periods).map(Period)
    }

    /// Returns an iterator over all (day, period) slots in day major order.
    pub fn slots(&self) -> impl Iterator<Item = (Day, Period)> + '_ {
        self.days()
            .flat_map(move |day| self.periods().map(move |period| (day, period)))
    }
}

/// Objective weight of every period of a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodWeights {
    /// Weight of period `n` is stored at `n - 1`.
    weights: Vec<i64>,
}

impl Default for PeriodWeights {
    /// Early periods are favored, late periods are penalized.
    fn default() -> Self {
        Self {
            weights: vec![3, 3, -1, -2, -3],
        }
    }
}

impl PeriodWeights {
    /// Creates the weights where the first element belongs to period 1.
    pub fn new<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        Self {
            weights: weights.into_iter().collect(),
        }
    }

    /// Returns the number of weighted periods.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if no period carries a weight.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Returns the weight of the period if any.
    pub fn get(&self, period: Period) -> Option<i64> {
        usize::from(period.0)
            .checked_sub(1)
            .and_then(|index| self.weights.get(index))
            .copied()
    }
}
