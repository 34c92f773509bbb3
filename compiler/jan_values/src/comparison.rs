//! Three-valued comparison outcome.

use std::cmp::Ordering;

/// Result of an ordered comparison between two values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonResult {
    Less,
    Equals,
    Greater,
}

impl ComparisonResult {
    #[inline]
    pub const fn is_lt(self) -> bool {
        matches!(self, ComparisonResult::Less)
    }

    #[inline]
    pub const fn is_le(self) -> bool {
        !matches!(self, ComparisonResult::Greater)
    }

    #[inline]
    pub const fn is_gt(self) -> bool {
        matches!(self, ComparisonResult::Greater)
    }

    #[inline]
    pub const fn is_ge(self) -> bool {
        !matches!(self, ComparisonResult::Less)
    }

    pub const fn to_ordering(self) -> Ordering {
        match self {
            ComparisonResult::Less => Ordering::Less,
            ComparisonResult::Equals => Ordering::Equal,
            ComparisonResult::Greater => Ordering::Greater,
        }
    }
}

impl From<Ordering> for ComparisonResult {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => ComparisonResult::Less,
            Ordering::Equal => ComparisonResult::Equals,
            Ordering::Greater => ComparisonResult::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(ComparisonResult::Less.is_lt());
        assert!(ComparisonResult::Less.is_le());
        assert!(!ComparisonResult::Less.is_ge());
        assert!(ComparisonResult::Equals.is_le());
        assert!(ComparisonResult::Equals.is_ge());
        assert!(!ComparisonResult::Equals.is_gt());
        assert!(ComparisonResult::Greater.is_gt());
    }

    #[test]
    fn ordering_round_trip() {
        for ordering in [Ordering::Less, Ordering::Equal, Ordering::Greater] {
            assert_eq!(ComparisonResult::from(ordering).to_ordering(), ordering);
        }
    }
}
