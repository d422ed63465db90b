pub mod snapshot;
pub mod table;

pub use snapshot::{CpuRecord, StatsSnapshot};
pub use table::{CpuContext, PerCpuStatsTable};
