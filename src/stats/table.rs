//! In-process per-CPU statistics table
//!
//! Userspace counterpart of the probe's per-CPU array map: one
//! [`AtomicPacketStats`] per CPU, allocated and zeroed once at construction,
//! never resized, dropped as a whole. Packets are fed through the same
//! `inspect` routine the XDP program runs.

use super::snapshot::{CpuRecord, StatsSnapshot};
use crate::config::StatsConfig;
use crate::{Result, XdpstatError};
use tracing::{debug, info, trace, warn};
use xdpstat_common::{inspect, AtomicPacketStats, Outcome, PacketStatsRecord, ShardLocator};

pub struct PerCpuStatsTable {
    shards: Box<[AtomicPacketStats]>,
}

impl PerCpuStatsTable {
    /// Allocate one zeroed record per configured CPU
    pub fn new(config: &StatsConfig) -> Result<Self> {
        config.validate()?;

        let shards = (0..config.cpus)
            .map(|_| AtomicPacketStats::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        info!(cpus = config.cpus, "Initialized per-CPU packet statistics table");
        Ok(Self { shards })
    }

    pub fn with_cpus(cpus: usize) -> Result<Self> {
        Self::new(&StatsConfig::with_cpus(cpus))
    }

    pub fn cpus(&self) -> usize {
        self.shards.len()
    }

    /// Execution context for `cpu`. Lookups for a CPU without a record fail
    /// softly inside `inspect`.
    pub fn on_cpu(&self, cpu: usize) -> CpuContext<'_> {
        CpuContext { table: self, cpu }
    }

    /// Run one packet through the inspection routine as if received on `cpu`
    pub fn observe(&self, cpu: usize, frame: &[u8]) -> Outcome {
        let outcome = inspect(frame, &self.on_cpu(cpu));

        match outcome {
            Outcome::Counted(bucket) => {
                trace!(cpu, len = frame.len(), %bucket, "Packet counted");
            }
            Outcome::NoRecord => {
                warn!(cpu, cpus = self.cpus(), "No statistics record for CPU, packet passed uncounted");
            }
            Outcome::Truncated | Outcome::NotIpv4 => {
                trace!(cpu, len = frame.len(), ?outcome, "Packet passed uncounted");
            }
        }

        outcome
    }

    /// Snapshot of a single CPU's record
    pub fn record(&self, cpu: usize) -> Result<PacketStatsRecord> {
        self.shards
            .get(cpu)
            .map(AtomicPacketStats::load)
            .ok_or(XdpstatError::CpuOutOfRange {
                cpu,
                cpus: self.cpus(),
            })
    }

    /// Per-CPU snapshot plus the sum across CPUs
    ///
    /// Records are read without synchronizing with writers; a record caught
    /// mid-update may be briefly inconsistent.
    pub fn snapshot(&self) -> StatsSnapshot {
        let per_cpu: Vec<CpuRecord> = self
            .shards
            .iter()
            .enumerate()
            .map(|(cpu, shard)| CpuRecord {
                cpu,
                record: shard.load(),
            })
            .collect();

        let total = per_cpu.iter().map(|entry| &entry.record).sum();

        debug!(cpus = per_cpu.len(), "Took statistics snapshot");
        StatsSnapshot { per_cpu, total }
    }
}

/// The executing CPU as seen by the inspection routine
#[derive(Clone, Copy)]
pub struct CpuContext<'a> {
    table: &'a PerCpuStatsTable,
    cpu: usize,
}

impl CpuContext<'_> {
    pub fn cpu(&self) -> usize {
        self.cpu
    }
}

impl ShardLocator for CpuContext<'_> {
    fn current_shard(&self) -> Option<&AtomicPacketStats> {
        self.table.shards.get(self.cpu)
    }
}
