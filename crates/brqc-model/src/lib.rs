pub mod config;
pub mod datetime;
pub mod error;
pub mod lookup;
pub mod period;
pub mod resolver;
pub mod status;

pub use config::{
    ClientRules, ColumnMappings, FileRules, OverlapRules, ProgramCategoryRules, ProjectRules,
    QcConfig, QcRules, RoleMap,
};
pub use datetime::{
    combine_date_time, duration_field_minutes, end_timestamp, parse_date, parse_datetime,
    parse_time,
};
pub use error::{QcError, Result};
pub use lookup::CaseInsensitiveSet;
pub use period::MonitoringPeriod;
pub use resolver::ColumnResolver;
pub use status::{CheckStatus, parse_status};
