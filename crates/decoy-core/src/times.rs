// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Call-count ranges.

use std::fmt;

/// Closed call-count interval `[min, max]`; `max == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Times {
    min: usize,
    max: Option<usize>,
}

impl Times {
    /// `[0, 0]`.
    pub const fn never() -> Self {
        Self::exactly(0)
    }

    /// `[1, 1]`.
    pub const fn once() -> Self {
        Self::exactly(1)
    }

    /// `[count, count]`.
    pub const fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    /// `[count, ∞)` (the "Min" range).
    pub const fn at_least(count: usize) -> Self {
        Self {
            min: count,
            max: None,
        }
    }

    /// `[0, count]` (the "Max" range).
    pub const fn at_most(count: usize) -> Self {
        Self {
            min: 0,
            max: Some(count),
        }
    }

    /// `[min, max]`. With `min > max` the range is empty and accepts no count.
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Lower bound.
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Upper bound, `None` when unbounded.
    pub const fn max(&self) -> Option<usize> {
        self.max
    }

    /// Whether `count` lies inside the range.
    pub const fn is_in_range(&self, count: usize) -> bool {
        if count < self.min {
            return false;
        }
        match self.max {
            Some(max) => count <= max,
            None => true,
        }
    }
}

impl Default for Times {
    /// Any number of calls.
    fn default() -> Self {
        Self::at_least(0)
    }
}

const fn plural(count: usize) -> &'static str {
    if count == 1 {
        "time"
    } else {
        "times"
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (min, Some(max)) if min == max => write!(f, "exactly {min} {}", plural(min)),
            (0, Some(max)) => write!(f, "at most {max} {}", plural(max)),
            (min, Some(max)) => write!(f, "between {min} and {max} times"),
            (min, None) => write!(f, "at least {min} {}", plural(min)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_ranges_have_expected_bounds() {
        assert_eq!((Times::never().min(), Times::never().max()), (0, Some(0)));
        assert_eq!((Times::once().min(), Times::once().max()), (1, Some(1)));
        assert_eq!(Times::at_least(3).max(), None);
        assert_eq!(Times::at_most(3).min(), 0);
    }

    #[test]
    fn reversed_between_accepts_nothing() {
        let empty = Times::between(5, 2);
        assert_ne!(empty, Times::between(2, 5));
        for count in 0..8 {
            assert!(!empty.is_in_range(count), "{count}");
        }
    }

    #[test]
    fn unbounded_range_accepts_large_counts() {
        assert!(Times::at_least(2).is_in_range(usize::MAX));
        assert!(!Times::at_least(2).is_in_range(1));
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Times::once().to_string(), "exactly 1 time");
        assert_eq!(Times::never().to_string(), "exactly 0 times");
        assert_eq!(Times::at_least(2).to_string(), "at least 2 times");
        assert_eq!(Times::at_most(1).to_string(), "at most 1 time");
        assert_eq!(Times::between(1, 4).to_string(), "between 1 and 4 times");
    }
}
