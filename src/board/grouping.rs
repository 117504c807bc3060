//! Derived views over the working copy: stage columns and totals.
//!
//! Nothing here is stored; columns and totals are rebuilt from the deal list
//! on every call so they cannot drift from it.

use std::collections::HashMap;

use crate::models::{ClientType, Deal, Stage};

/// Deal count and summed price.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub count: usize,
    pub value: f64,
}

impl Totals {
    pub fn of<'a>(deals: impl IntoIterator<Item = &'a Deal>) -> Self {
        deals.into_iter().fold(Totals::default(), |acc, deal| Totals {
            count: acc.count + 1,
            value: acc.value + deal.price.unwrap_or(0.0),
        })
    }
}

/// A stage together with the deals currently grouped under it.
#[derive(Debug)]
pub struct StageColumn<'a> {
    pub stage: &'a Stage,
    pub deals: Vec<&'a Deal>,
}

impl StageColumn<'_> {
    pub fn totals(&self) -> Totals {
        Totals::of(self.deals.iter().copied())
    }
}

/// Partition `deals` into the columns of `stages`.
///
/// `stages` must already be in display order. A deal lands in the column
/// whose id equals its stage reference; deals without a stage, or whose stage
/// is not in `stages`, appear nowhere. Within a column, deals keep their
/// order in `deals`.
pub fn group_by_stage<'a>(stages: &'a [Stage], deals: &'a [Deal]) -> Vec<StageColumn<'a>> {
    let mut columns: Vec<StageColumn<'a>> = stages
        .iter()
        .map(|stage| StageColumn {
            stage,
            deals: Vec::new(),
        })
        .collect();

    let index: HashMap<&str, usize> = stages
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();

    for deal in deals {
        let Some(stage_id) = deal.stage.as_deref() else {
            continue;
        };
        if let Some(&i) = index.get(stage_id) {
            columns[i].deals.push(deal);
        }
    }

    columns
}

/// Columns for one pipeline view.
pub fn columns_for_view<'a>(
    stages: &'a [Stage],
    deals: &'a [Deal],
    view: ClientType,
) -> Vec<StageColumn<'a>> {
    group_by_stage(stages, deals)
        .into_iter()
        .filter(|column| column.stage.client_type == view)
        .collect()
}
