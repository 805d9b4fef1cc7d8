//! Groups flat line items into the agency → bureau → line item tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::trace;

use crate::error::{AppError, AppResult};
use crate::models::{AggregateNode, Ledger, LineItem, TreeDepth, ROOT_NAME};
use crate::sort_utils::{sort_by_size, SortDirection};

/// Builds the summation tree of `ledger` for `year`.
///
/// Children are sorted ascending by size at every level. Nothing is
/// filtered: agencies and bureaus summing to zero stay in the tree.
pub fn build_tree(ledger: &Ledger, year: i32, depth: TreeDepth) -> AppResult<AggregateNode> {
    let mut agencies: Vec<(&str, Vec<(&str, Vec<&LineItem>)>)> = Vec::new();
    let mut agency_index: HashMap<&str, usize> = HashMap::new();

    for item in &ledger.items {
        let agency_pos = *agency_index
            .entry(item.agency_name.as_str())
            .or_insert_with(|| {
                agencies.push((item.agency_name.as_str(), Vec::new()));
                agencies.len() - 1
            });

        let bureaus = &mut agencies[agency_pos].1;
        match bureaus
            .iter_mut()
            .find(|(name, _)| *name == item.bureau_name)
        {
            Some((_, items)) => items.push(item),
            None => bureaus.push((item.bureau_name.as_str(), vec![item])),
        }
    }

    let mut children = Vec::with_capacity(agencies.len());
    for (agency_name, bureaus) in agencies {
        let mut bureau_nodes = Vec::with_capacity(bureaus.len());
        for (bureau_name, items) in bureaus {
            let mut leaves = items
                .into_iter()
                .map(|item| line_item_node(item, year))
                .collect::<AppResult<Vec<_>>>()?;
            sort_by_size(&mut leaves, SortDirection::Asc);
            bureau_nodes.push(AggregateNode::branch(bureau_name, leaves).with_parent(agency_name));
        }
        sort_by_size(&mut bureau_nodes, SortDirection::Asc);

        let agency = AggregateNode::branch(agency_name, bureau_nodes).with_parent(ROOT_NAME);
        children.push(match depth {
            TreeDepth::AgencyAndBureau => agency,
            TreeDepth::AgencyOnly => AggregateNode::leaf(agency.name, agency.size),
        });
    }
    sort_by_size(&mut children, SortDirection::Asc);

    trace!(
        year,
        domain = %ledger.domain,
        agency_count = children.len(),
        "Built aggregate tree"
    );

    Ok(AggregateNode::branch(ROOT_NAME, children))
}

fn line_item_node(item: &LineItem, year: i32) -> AppResult<AggregateNode> {
    let size = item.amount(year).ok_or_else(|| {
        AppError::Configuration(format!(
            "Line item '{}' (row {}) has no amount for year {}",
            item.account_name, item.row_number, year
        ))
    })?;
    Ok(AggregateNode {
        name: item.account_name.clone(),
        size,
        children: None,
        parent_name: Some(item.bureau_name.clone()),
        unique_key: Some(item.unique_key.clone()),
    })
}

/// Looks up an agency; its bureau children are reduced to name and size.
pub fn get_agency(tree: &AggregateNode, name: &str) -> AppResult<AggregateNode> {
    tree.child(name)
        .map(AggregateNode::shallow)
        .ok_or_else(|| AppError::NotFound(format!("Agency '{}' not found", name)))
}

/// Looks up a bureau within an agency, line items included.
///
/// `tree` must have been built with `TreeDepth::AgencyAndBureau`.
pub fn get_bureau(tree: &AggregateNode, agency: &str, bureau: &str) -> AppResult<AggregateNode> {
    let agency_node = tree
        .child(agency)
        .ok_or_else(|| AppError::NotFound(format!("Agency '{}' not found", agency)))?;
    agency_node.child(bureau).cloned().ok_or_else(|| {
        AppError::NotFound(format!(
            "Bureau '{}' not found in agency '{}'",
            bureau, agency
        ))
    })
}

/// Sum of the root's direct children.
pub fn grand_total(tree: &AggregateNode) -> Decimal {
    tree.children().iter().map(|c| c.size).sum()
}
