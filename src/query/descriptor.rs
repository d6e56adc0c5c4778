//! Filter descriptors for flight searches

use chrono::NaiveDate;

/// Format used for date range bounds on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A filter over the flight index, independent of the engine's wire format
#[derive(Debug, Clone, PartialEq)]
pub enum QueryDescriptor {
    /// Matches every document
    MatchAll,
    /// Exact match on a keyword field
    Term { field: String, value: String },
    /// Analyzed full-text match
    Match { field: String, text: String },
    /// Bounded range on a numeric or date field
    Range(RangeQuery),
    /// Every clause must match
    BoolAnd(Conjunction),
}

impl QueryDescriptor {
    /// Exact-value filter. Use on keyword fields only.
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Full-text filter for analyzed fields
    pub fn matching(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Match {
            field: field.into(),
            text: text.into(),
        }
    }

    /// Number of top-level clauses this descriptor contributes
    pub fn clause_count(&self) -> usize {
        match self {
            Self::BoolAnd(conj) => conj.len(),
            _ => 1,
        }
    }
}

impl From<RangeQuery> for QueryDescriptor {
    fn from(range: RangeQuery) -> Self {
        Self::Range(range)
    }
}

impl From<Conjunction> for QueryDescriptor {
    fn from(conj: Conjunction) -> Self {
        Self::BoolAnd(conj)
    }
}

/// Value carried by a range bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeValue {
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

impl From<i64> for RangeValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for RangeValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<NaiveDate> for RangeValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

/// One side of a range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: RangeValue,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: impl Into<RangeValue>) -> Self {
        Self {
            value: value.into(),
            inclusive: true,
        }
    }

    pub fn exclusive(value: impl Into<RangeValue>) -> Self {
        Self {
            value: value.into(),
            inclusive: false,
        }
    }
}

/// Range filter on a single field.
///
/// At least one bound is always set; the constructors are the only way to
/// build one, so an unbounded range cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    field: String,
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl RangeQuery {
    /// `field > value`
    pub fn greater_than(field: impl Into<String>, value: impl Into<RangeValue>) -> Self {
        Self {
            field: field.into(),
            lower: Some(Bound::exclusive(value)),
            upper: None,
        }
    }

    /// `field >= value`
    pub fn at_least(field: impl Into<String>, value: impl Into<RangeValue>) -> Self {
        Self {
            field: field.into(),
            lower: Some(Bound::inclusive(value)),
            upper: None,
        }
    }

    /// `field < value`
    pub fn less_than(field: impl Into<String>, value: impl Into<RangeValue>) -> Self {
        Self {
            field: field.into(),
            lower: None,
            upper: Some(Bound::exclusive(value)),
        }
    }

    /// `field <= value`
    pub fn at_most(field: impl Into<String>, value: impl Into<RangeValue>) -> Self {
        Self {
            field: field.into(),
            lower: None,
            upper: Some(Bound::inclusive(value)),
        }
    }

    /// `lo <= field <= hi`
    pub fn between(
        field: impl Into<String>,
        lo: impl Into<RangeValue>,
        hi: impl Into<RangeValue>,
    ) -> Self {
        Self::bounded(field, Bound::inclusive(lo), Bound::inclusive(hi))
    }

    /// Range with explicit bounds on both sides
    pub fn bounded(field: impl Into<String>, lower: Bound, upper: Bound) -> Self {
        Self {
            field: field.into(),
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn lower(&self) -> Option<&Bound> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Option<&Bound> {
        self.upper.as_ref()
    }
}

/// Ordered, non-empty list of clauses that must all match
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunction {
    clauses: Vec<QueryDescriptor>,
}

impl Conjunction {
    /// Start a conjunction with its first clause
    pub fn new(first: QueryDescriptor) -> Self {
        Self {
            clauses: vec![first],
        }
    }

    /// Append a clause
    pub fn and(mut self, clause: QueryDescriptor) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[QueryDescriptor] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Never true for a constructed conjunction
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
