//! XDP packet statistics probe
//!
//! This probe:
//! - Attaches at XDP on a network interface (attachment is done by the loader)
//! - Classifies IPv4 frames as TCP, UDP or other
//! - Counts packets and bytes into a per-CPU array map, one slot per CPU
//! - Always returns XDP_PASS; traffic is never modified or dropped
//!
//! Note: This binary must be built for the bpfel-unknown-none target.

#![no_std]
#![no_main]

use aya_ebpf::{
    bindings::xdp_action,
    macros::{map, xdp},
    maps::PerCpuArray,
    programs::XdpContext,
};
use aya_log_ebpf::warn;
use xdpstat_common::{inspect, Outcome, PacketStatsRecord, STATS_KEY};
use xdpstat_probes::{PerCpuStats, XdpFrame};

/// One record per CPU under a single key. Zeroed by the kernel at load.
#[map(name = "packet_stats_map")]
static PACKET_STATS: PerCpuArray<PacketStatsRecord> = PerCpuArray::with_max_entries(1, 0);

#[xdp]
pub fn xdp_packet_monitor(ctx: XdpContext) -> u32 {
    match try_xdp_packet_monitor(&ctx) {
        Ok(ret) => ret,
        Err(_) => xdp_action::XDP_PASS,
    }
}

fn try_xdp_packet_monitor(ctx: &XdpContext) -> Result<u32, ()> {
    let outcome = inspect(&XdpFrame::new(ctx), &PerCpuStats::new(&PACKET_STATS));

    if outcome == Outcome::NoRecord {
        warn!(ctx, "no stats record at key {}", STATS_KEY);
    }

    Ok(outcome.verdict().into())
}

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 4] = *b"GPL\0";

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}
