pub mod engine;
pub mod itp;
pub mod panels;
pub mod recommendations;
pub mod reference;
pub mod summary;
pub mod trends;
pub mod types;

pub use engine::*;
pub use reference::{IndicatorCatalog, IndicatorDefinition, BLOOD_COUNT_CATALOG};
pub use summary::{comparison_summary, latest_report, select_history};
pub use trends::analyze_trends;
pub use types::*;
