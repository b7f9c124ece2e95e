//! Source location tracking.
//!
//! A resource is parsed as a single unit, so locations need no file
//! identifier: just a 1-based line/column pair and a range between two
//! of them.
//!
//! # Examples
//!
//! ```
//! use egg_util::span::{SourceLocation, SourceRange};
//!
//! let begin = SourceLocation::new(1, 1);
//! let end = SourceLocation::new(1, 6);
//! let range = SourceRange::new(begin, end);
//! assert!(range.begin <= range.end);
//! ```

use std::fmt;

/// A single point in source text: a 1-based line and column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    /// 1-based row.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl SourceLocation {
    /// A location before any real source position; only used as a placeholder.
    pub const ZERO: SourceLocation = SourceLocation { line: 0, column: 0 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text, inclusive-begin and exclusive-end.
///
/// `end` is exclusive on the same line as `begin` unless the range
/// crosses a line break, in which case `end` names the first location
/// past the range on its own line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub begin: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub const ZERO: SourceRange = SourceRange {
        begin: SourceLocation::ZERO,
        end: SourceLocation::ZERO,
    };

    #[inline]
    pub const fn new(begin: SourceLocation, end: SourceLocation) -> Self {
        Self { begin, end }
    }

    /// A zero-width range at a single point.
    #[inline]
    pub const fn point(location: SourceLocation) -> Self {
        Self {
            begin: location,
            end: location,
        }
    }

    /// The smallest range enclosing both `self` and `other`.
    #[inline]
    pub fn merge(self, other: SourceRange) -> SourceRange {
        SourceRange {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// Extend `self.end` to cover `other`, leaving `begin` untouched.
    ///
    /// Used by the parser when wrapping a node with a suffix (a call's
    /// argument list, a property access, …): the wrapper keeps the
    /// original `begin` but grows to the end of what it just consumed.
    #[inline]
    pub fn extend_to(mut self, other: SourceRange) -> SourceRange {
        if other.end > self.end {
            self.end = other.end;
        }
        self
    }

    #[inline]
    pub fn contains(&self, other: SourceRange) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}-{}", self.begin, self.end)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use quickcheck::Arbitrary;
    use quickcheck_macros::quickcheck;

    impl Arbitrary for SourceLocation {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            SourceLocation::new(u32::arbitrary(g) % 10_000, u32::arbitrary(g) % 10_000)
        }
    }

    impl Arbitrary for SourceRange {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let a = SourceLocation::arbitrary(g);
            let b = SourceLocation::arbitrary(g);
            SourceRange::new(a.min(b), a.max(b))
        }
    }

    #[quickcheck]
    fn merge_always_contains_both_inputs(a: SourceRange, b: SourceRange) -> bool {
        let merged = a.merge(b);
        merged.contains(a) && merged.contains(b)
    }

    #[quickcheck]
    fn merge_is_commutative(a: SourceRange, b: SourceRange) -> bool {
        a.merge(b) == b.merge(a)
    }

    #[quickcheck]
    fn extend_to_never_moves_begin(a: SourceRange, b: SourceRange) -> bool {
        a.extend_to(b).begin == a.begin
    }

    #[quickcheck]
    fn extend_to_end_is_the_max_of_both_ends(a: SourceRange, b: SourceRange) -> bool {
        a.extend_to(b).end == a.end.max(b.end)
    }

    #[quickcheck]
    fn a_range_always_contains_itself(r: SourceRange) -> bool {
        r.contains(r)
    }
}
