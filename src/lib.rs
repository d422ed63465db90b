//! Userspace side of xdpstat
//!
//! Hosts the per-CPU statistics table as explicit process state and runs the
//! same per-packet routine the XDP probe runs, so classification and counting
//! can be exercised without a kernel.

pub mod config;
pub mod error;
pub mod stats;

pub use config::{StatsConfig, MAX_CPUS};
pub use error::{Result, XdpstatError};
pub use stats::{CpuContext, CpuRecord, PerCpuStatsTable, StatsSnapshot};
pub use xdpstat_common::{Bucket, Outcome, PacketStatsRecord, Verdict};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
