//! The success/failure partition produced by the aggregator.

use indexmap::IndexSet;

use crate::models::{series::Series, symbol::Symbol};

/// Symbols whose series could not be retrieved, in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureSet {
    symbols: IndexSet<Symbol>,
}

impl FailureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failed symbol. Returns `false` if it was already recorded.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        self.symbols.insert(symbol)
    }

    /// Removes a symbol, keeping the order of the rest.
    pub fn remove(&mut self, symbol: &Symbol) -> bool {
        self.symbols.shift_remove(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

impl FromIterator<Symbol> for FailureSet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FailureSet {
    type Item = &'a Symbol;
    type IntoIter = indexmap::set::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}

/// Result of fanning out one fetch per requested symbol.
///
/// Invariants (maintained by [`crate::aggregator::Aggregator`]):
/// - every requested symbol is either in `series` or in `failed`;
/// - no symbol is in both;
/// - `series` keeps the relative order of the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    /// Successfully fetched series, in request order.
    pub series: Vec<Series>,
    /// Symbols whose fetch failed.
    pub failed: FailureSet,
}

impl AggregationResult {
    /// Symbols that produced a series, in request order.
    pub fn succeeded(&self) -> impl Iterator<Item = &Symbol> {
        self.series.iter().map(|s| &s.symbol)
    }

    /// True when at least one symbol was requested and none succeeded.
    pub fn is_total_failure(&self) -> bool {
        self.series.is_empty() && !self.failed.is_empty()
    }
}
