pub mod role_aggregator;
pub mod role_fetch;
pub mod role_filter;
pub mod subject_management;
pub mod subject_parser;
pub mod subject_suggestions;

pub use role_aggregator::*;
pub use role_fetch::*;
pub use role_filter::*;
pub use subject_management::*;
pub use subject_parser::*;
pub use subject_suggestions::*;
