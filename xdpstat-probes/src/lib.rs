//! eBPF side of xdpstat
//!
//! Adapters that let the shared inspection routine in `xdpstat-common` run
//! against aya's XDP context and per-CPU array map. The XDP program itself
//! lives in `src/bin/xdp_packet_monitor.rs`.
//!
//! Note: the program must be built for the bpfel-unknown-none target. The
//! build script handles cross-compilation on Linux hosts.

#![no_std]

use aya_ebpf::{bindings::xdp_action, maps::PerCpuArray, programs::XdpContext};
use xdpstat_common::{AtomicPacketStats, PacketBuffer, PacketStatsRecord, ShardLocator, STATS_KEY};

const _: () = assert!(
    xdpstat_common::XDP_PASS == xdp_action::XDP_PASS,
    "Verdict::Pass must map to XDP_PASS"
);

/// Packet buffer bounded by the XDP context's data / data_end
pub struct XdpFrame<'a> {
    ctx: &'a XdpContext,
}

impl<'a> XdpFrame<'a> {
    #[inline(always)]
    pub fn new(ctx: &'a XdpContext) -> Self {
        Self { ctx }
    }
}

// SAFETY: the kernel guarantees data..data_end is the readable packet for
// the duration of the program invocation, which outlives the borrow.
unsafe impl PacketBuffer for XdpFrame<'_> {
    #[inline(always)]
    fn data(&self) -> usize {
        self.ctx.data()
    }

    #[inline(always)]
    fn data_end(&self) -> usize {
        self.ctx.data_end()
    }
}

/// The executing CPU's slot in a per-CPU statistics map
pub struct PerCpuStats {
    map: &'static PerCpuArray<PacketStatsRecord>,
}

impl PerCpuStats {
    #[inline(always)]
    pub fn new(map: &'static PerCpuArray<PacketStatsRecord>) -> Self {
        Self { map }
    }
}

impl ShardLocator for PerCpuStats {
    #[inline(always)]
    fn current_shard(&self) -> Option<&AtomicPacketStats> {
        let ptr = self.map.get_ptr_mut(STATS_KEY)?;
        // SAFETY: the kernel returns an 8-byte aligned slot owned by this CPU
        // that lives as long as the map; the program only touches it through
        // atomic adds.
        Some(unsafe { AtomicPacketStats::from_ptr(ptr) })
    }
}
