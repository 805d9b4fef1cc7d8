//! Drill-down navigation over the aggregate tree.
//!
//! Every transition consumes a `ViewState` and returns the next one; callers
//! hold the current state and thread it through requests.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{
    AggregateNode, Domain, Level, Normalization, QueryMode, Scaling, TreeDepth, ViewState,
};
use crate::services::aggregator::{build_tree, get_agency, get_bureau};
use crate::services::dataset::Dataset;
use crate::services::historical::HistoryTarget;

impl ViewState {
    /// Moves one level down, wrapping from bureau back to root.
    pub fn navigate(self, item: &str) -> Self {
        let level = match self.level {
            Level::Root => Level::Agency {
                agency: item.to_string(),
            },
            Level::Agency { agency } => Level::Bureau {
                agency,
                bureau: item.to_string(),
            },
            Level::Bureau { .. } => Level::Root,
        };
        Self {
            level,
            last_drilled: Some(item.to_string()),
            ..self
        }
    }

    pub fn with_year(self, year: i32) -> Self {
        Self { year, ..self }
    }

    pub fn with_domain(self, domain: Domain) -> Self {
        Self { domain, ..self }
    }

    pub fn with_scaling(self, scaling: Scaling) -> Self {
        Self { scaling, ..self }
    }

    pub fn with_normalization(self, normalization: Normalization) -> Self {
        Self {
            normalization,
            ..self
        }
    }

    /// Back to the budget level; year, domain and variant are kept.
    pub fn at_root_level(self) -> Self {
        Self {
            level: Level::Root,
            last_drilled: None,
            ..self
        }
    }

    /// Which rows a historical chart opened from `item` should sum.
    pub fn history_target(&self, item: &str) -> HistoryTarget {
        match &self.level {
            Level::Root => HistoryTarget::agency(item),
            Level::Agency { agency } => HistoryTarget::bureau(agency, item),
            Level::Bureau { agency, bureau } => HistoryTarget::account(agency, bureau, item),
        }
    }
}

/// Result of a data query: the state to show and the node to render.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub state: ViewState,
    pub tree: AggregateNode,
    /// Set when the requested agency or bureau was absent and the view
    /// dropped back to the budget level.
    pub fell_back_to_root: bool,
}

/// Forces the root level and returns the agencies for the current variant.
pub fn reset(state: ViewState, dataset: &Dataset) -> AppResult<QueryOutcome> {
    let state = state.at_root_level();
    check_year(&state, dataset)?;
    let tree = build_tree(dataset.ledger_for(&state), state.year, TreeDepth::AgencyOnly)?;
    Ok(QueryOutcome {
        state,
        tree,
        fell_back_to_root: false,
    })
}

/// Returns the node for the state's level.
///
/// With `QueryMode::Advance` the state first navigates into `item`;
/// advancing without an item resets. With `QueryMode::Refresh` the level is
/// kept and only the figures change. A target that no longer exists or sums
/// to zero or less in the selected year and variant falls back to the root level.
pub fn current_data(
    state: ViewState,
    dataset: &Dataset,
    item: Option<&str>,
    mode: QueryMode,
) -> AppResult<QueryOutcome> {
    let state = match (mode, item) {
        (QueryMode::Advance, Some(name)) => state.navigate(name),
        (QueryMode::Advance, None) => return reset(state, dataset),
        (QueryMode::Refresh, _) => state,
    };
    check_year(&state, dataset)?;

    debug!(
        level = state.level.as_str(),
        year = state.year,
        domain = %state.domain,
        "Querying view data"
    );

    let lookup = match &state.level {
        Level::Root => None,
        Level::Agency { agency } => Some(get_agency(&full_tree(&state, dataset)?, agency)),
        Level::Bureau { agency, bureau } => {
            Some(get_bureau(&full_tree(&state, dataset)?, agency, bureau))
        }
    };
    let Some(lookup) = lookup else {
        return reset(state, dataset);
    };

    match lookup {
        Ok(node) if node.size > Decimal::ZERO => Ok(QueryOutcome {
            state,
            tree: node,
            fell_back_to_root: false,
        }),
        Ok(node) => {
            warn!(
                name = %node.name,
                size = %node.size,
                year = state.year,
                "Drill-down target is not positive, falling back to root"
            );
            fall_back(state, dataset)
        }
        Err(AppError::NotFound(msg)) => {
            warn!(year = state.year, "{}, falling back to root", msg);
            fall_back(state, dataset)
        }
        Err(e) => Err(e),
    }
}

fn fall_back(state: ViewState, dataset: &Dataset) -> AppResult<QueryOutcome> {
    let mut outcome = reset(state, dataset)?;
    outcome.fell_back_to_root = true;
    Ok(outcome)
}

fn full_tree(state: &ViewState, dataset: &Dataset) -> AppResult<AggregateNode> {
    build_tree(
        dataset.ledger_for(state),
        state.year,
        TreeDepth::AgencyAndBureau,
    )
}

fn check_year(state: &ViewState, dataset: &Dataset) -> AppResult<()> {
    if dataset.years().contains(&state.year) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Year {} is not available",
            state.year
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPENSES: &str = "Agency Name,Bureau Name,Account Name,Unique,2012,2013,2014,2015\n\
        A,B1,X,a-b1-x,100,200,0,10\n\
        A,B2,Y,a-b2-y,50,50,50,10\n\
        C,B3,Z,c-b3-z,5,5,5,0";
    const INCOME: &str = "Agency Name,Bureau Name,Account Name,Unique,2012,2013,2014,2015\n\
        Belastingen,Inkomsten,BTW,b-i-btw,500,600,700,800";

    fn dataset() -> Dataset {
        Dataset::from_csv(EXPENSES.as_bytes(), INCOME.as_bytes()).unwrap()
    }

    fn at_2012() -> ViewState {
        ViewState::default().with_year(2012)
    }

    #[test]
    fn test_navigate_walks_levels_and_wraps() {
        let state = ViewState::default().navigate("A");
        assert_eq!(state.level, Level::Agency { agency: "A".into() });

        let state = state.navigate("B1");
        assert_eq!(
            state.level,
            Level::Bureau {
                agency: "A".into(),
                bureau: "B1".into()
            }
        );
        assert_eq!(state.last_drilled.as_deref(), Some("B1"));

        let state = state.navigate("anything");
        assert_eq!(state.level, Level::Root);
    }

    #[test]
    fn test_setters_keep_level() {
        let state = ViewState::default().navigate("A").navigate("B1");
        let changed = state
            .clone()
            .with_year(2013)
            .with_domain(Domain::Income)
            .with_scaling(Scaling::InflationAdjusted)
            .with_normalization(Normalization::PerCapita);
        assert_eq!(changed.level, state.level);
        assert_eq!(changed.year, 2013);
        assert_eq!(changed.domain, Domain::Income);
        assert_eq!(changed.scaling, Scaling::InflationAdjusted);
        assert_eq!(changed.normalization, Normalization::PerCapita);
    }

    #[test]
    fn test_reset_returns_root_agencies() {
        let data = dataset();
        let state = at_2012().navigate("A").navigate("B1");
        let outcome = reset(state, &data).unwrap();
        assert!(outcome.state.at_root());
        assert_eq!(outcome.state.last_drilled, None);
        assert_eq!(outcome.tree.size, Decimal::from(155));
        assert!(outcome.tree.children().iter().all(|a| a.is_leaf()));
    }

    #[test]
    fn test_advance_into_agency_and_bureau() {
        let data = dataset();
        let outcome = current_data(at_2012(), &data, Some("A"), QueryMode::Advance).unwrap();
        assert_eq!(outcome.state.selected_agency(), Some("A"));
        assert_eq!(outcome.tree.name, "A");
        assert_eq!(outcome.tree.size, Decimal::from(150));
        assert!(!outcome.fell_back_to_root);

        let outcome = current_data(outcome.state, &data, Some("B1"), QueryMode::Advance).unwrap();
        assert_eq!(outcome.state.selected_bureau(), Some("B1"));
        assert_eq!(outcome.tree.size, Decimal::from(100));
        assert_eq!(outcome.tree.children()[0].name, "X");

        let outcome = current_data(outcome.state, &data, Some("X"), QueryMode::Advance).unwrap();
        assert!(outcome.state.at_root());
        assert!(!outcome.fell_back_to_root);
    }

    #[test]
    fn test_advance_without_item_resets() {
        let data = dataset();
        let state = at_2012().navigate("A");
        let outcome = current_data(state, &data, None, QueryMode::Advance).unwrap();
        assert!(outcome.state.at_root());
    }

    #[test]
    fn test_refresh_keeps_level_with_new_year() {
        let data = dataset();
        let state = at_2012().navigate("A").navigate("B1").with_year(2013);
        let outcome = current_data(state, &data, None, QueryMode::Refresh).unwrap();
        assert_eq!(outcome.state.selected_bureau(), Some("B1"));
        assert_eq!(outcome.tree.size, Decimal::from(200));
    }

    #[test]
    fn test_refresh_falls_back_when_bureau_empty() {
        let data = dataset();
        // B1 sums to zero in 2014.
        let state = at_2012().navigate("A").navigate("B1").with_year(2014);
        let outcome = current_data(state, &data, None, QueryMode::Refresh).unwrap();
        assert!(outcome.fell_back_to_root);
        assert!(outcome.state.at_root());
        assert_eq!(outcome.state.year, 2014);
    }

    #[test]
    fn test_refresh_falls_back_when_agency_empty() {
        let data = dataset();
        let state = at_2012().navigate("C").with_year(2015);
        let outcome = current_data(state, &data, None, QueryMode::Refresh).unwrap();
        assert!(outcome.fell_back_to_root);
    }

    #[test]
    fn test_negative_totals_fall_back() {
        let income = "Agency Name,Bureau Name,Account Name,Unique,2012,2013,2014,2015\n\
            Belastingen,Inkomsten,BTW,b-i-btw,500,600,700,800\n\
            Belastingen,Correcties,Teruggaaf,b-c-t,-5,-5,-5,-5\n\
            Restituties,Teruggaaf,Heffingen,r-t-h,-20,-20,-20,-20";
        let data = Dataset::from_csv(EXPENSES.as_bytes(), income.as_bytes()).unwrap();
        let state = at_2012().with_domain(Domain::Income);

        let outcome =
            current_data(state.clone(), &data, Some("Restituties"), QueryMode::Advance).unwrap();
        assert!(outcome.fell_back_to_root);
        assert!(outcome.state.at_root());

        let outcome =
            current_data(state.clone(), &data, Some("Belastingen"), QueryMode::Advance).unwrap();
        assert!(!outcome.fell_back_to_root);
        assert_eq!(outcome.tree.size, Decimal::from(495));

        let outcome =
            current_data(outcome.state, &data, Some("Correcties"), QueryMode::Advance).unwrap();
        assert!(outcome.fell_back_to_root);
        assert!(outcome.state.at_root());
        assert_eq!(outcome.state.domain, Domain::Income);

        let bureau = state.navigate("Belastingen").navigate("Correcties");
        let outcome = current_data(bureau, &data, None, QueryMode::Refresh).unwrap();
        assert!(outcome.fell_back_to_root);
    }

    #[test]
    fn test_domain_switch_falls_back_when_agency_missing() {
        let data = dataset();
        let state = at_2012().navigate("A").with_domain(Domain::Income);
        let outcome = current_data(state, &data, None, QueryMode::Refresh).unwrap();
        assert!(outcome.fell_back_to_root);
        assert_eq!(outcome.tree.children()[0].name, "Belastingen");
    }

    #[test]
    fn test_unknown_agency_falls_back() {
        let data = dataset();
        let outcome = current_data(at_2012(), &data, Some("Nope"), QueryMode::Advance).unwrap();
        assert!(outcome.fell_back_to_root);
        assert!(outcome.state.at_root());
    }

    #[test]
    fn test_per_capita_variant_used() {
        let data = dataset();
        let state = at_2012().with_normalization(Normalization::PerCapita);
        let outcome = reset(state, &data).unwrap();
        assert!(outcome.tree.size < Decimal::ONE);
    }

    #[test]
    fn test_unsupported_year_rejected() {
        let data = dataset();
        let state = ViewState::default().with_year(1999);
        assert!(matches!(
            reset(state, &data),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_history_target_per_level() {
        let root = ViewState::default();
        assert_eq!(root.history_target("A"), HistoryTarget::agency("A"));

        let agency = root.navigate("A");
        assert_eq!(agency.history_target("B1"), HistoryTarget::bureau("A", "B1"));

        let bureau = agency.navigate("B1");
        assert_eq!(
            bureau.history_target("X"),
            HistoryTarget::account("A", "B1", "X")
        );
    }
}
