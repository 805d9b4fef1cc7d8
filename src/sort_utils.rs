use crate::models::AggregateNode;

/// Sort direction for node lists.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

/// Stable sort by size; nodes of equal size keep their relative order.
///
/// Treemap layout wants ascending order, tabular lists descending.
pub fn sort_by_size(nodes: &mut [AggregateNode], direction: SortDirection) {
    match direction {
        SortDirection::Asc => nodes.sort_by(|a, b| a.size.cmp(&b.size)),
        SortDirection::Desc => nodes.sort_by(|a, b| b.size.cmp(&a.size)),
    }
}
