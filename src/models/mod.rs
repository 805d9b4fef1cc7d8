pub mod aggregate;
pub mod ledger;
pub mod presentation;
pub mod view_state;

pub use aggregate::{AggregateNode, TreeDepth, ROOT_NAME};
pub use ledger::{Domain, Ledger, LineItem, Scaling};
pub use presentation::{
    AreaChart, AreaPoint, HistoricalPoint, ListRow, ListTable, Treemap, TreemapCell,
    YearlySummary,
};
pub use view_state::{Level, Normalization, QueryMode, ViewState};
