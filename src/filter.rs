use std::collections::BTreeSet;

use polars::prelude::*;

use crate::schema::order;

/// Distinct values available per filterable dimension, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub channels: Vec<String>,
}

/// Allowed values per dimension.
///
/// A row passes when its year, category, region and channel are each a
/// member of the corresponding set. An empty set admits nothing: clearing a
/// dimension empties the result instead of disabling that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub years: BTreeSet<i32>,
    pub categories: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub channels: BTreeSet<String>,
}

impl FilterSpec {
    /// Everything selected, the state a fresh dashboard starts in.
    pub fn all(options: &FilterOptions) -> Self {
        Self {
            years: options.years.iter().copied().collect(),
            categories: options.categories.iter().cloned().collect(),
            regions: options.regions.iter().cloned().collect(),
            channels: options.channels.iter().cloned().collect(),
        }
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    pub fn with_categories<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.categories = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_regions<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.regions = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_channels<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.channels = values.into_iter().map(Into::into).collect();
        self
    }

    /// True when some dimension has nothing selected.
    pub fn selects_nothing(&self) -> bool {
        self.years.is_empty()
            || self.categories.is_empty()
            || self.regions.is_empty()
            || self.channels.is_empty()
    }

    /// Conjunction of per-dimension membership tests.
    pub fn predicate(&self) -> Expr {
        let years = Series::new(
            order::YEAR.into(),
            self.years.iter().map(|&y| i64::from(y)).collect::<Vec<i64>>(),
        );

        col(order::YEAR)
            .is_in(lit(years).implode(), false)
            .and(membership(order::CATEGORY, &self.categories))
            .and(membership(order::REGION, &self.regions))
            .and(membership(order::CHANNEL, &self.channels))
    }
}

fn membership(column: &str, allowed: &BTreeSet<String>) -> Expr {
    let values = Series::new(
        column.into(),
        allowed.iter().map(String::as_str).collect::<Vec<&str>>(),
    );
    col(column).is_in(lit(values).implode(), false)
}
