use crate::Result;
use serde::{Deserialize, Serialize};
use xdpstat_common::PacketStatsRecord;

/// One CPU's record at snapshot time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuRecord {
    pub cpu: usize,
    #[serde(flatten)]
    pub record: PacketStatsRecord,
}

/// Per-CPU records and their sum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub per_cpu: Vec<CpuRecord>,
    pub total: PacketStatsRecord,
}

impl StatsSnapshot {
    /// Bucket counters add up to the packet total on every CPU
    pub fn is_consistent(&self) -> bool {
        self.per_cpu.iter().all(|entry| entry.record.is_consistent())
            && self.total.is_consistent()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
