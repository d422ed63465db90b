//! Shared types and per-packet inspection logic for xdpstat
//!
//! Everything in this crate is compiled twice:
//! - into the XDP program (`xdpstat-probes`, `no_std`, BPF target)
//! - into the userspace library, where the same routine runs against byte
//!   slices and an in-process per-CPU table
//!
//! Types shared with the kernel are `#[repr(C)]` and their layout is asserted
//! at compile time.

#![cfg_attr(not(feature = "userspace"), no_std)]

pub mod classify;
pub mod inspect;
pub mod stats;
pub mod view;

pub use classify::{classify, Bucket};
pub use inspect::{inspect, Outcome, ShardLocator, Verdict};
pub use stats::{AtomicPacketStats, PacketStatsRecord};
pub use view::{fits, EthernetFrameView, Ipv4HeaderView, PacketBuffer};

/// Name of the XDP program inside the compiled object
pub const PROGRAM_NAME: &str = "xdp_packet_monitor";

/// Name of the per-CPU statistics map inside the compiled object
pub const STATS_MAP_NAME: &str = "packet_stats_map";

/// The statistics map holds exactly one slot per CPU, always at this key
pub const STATS_KEY: u32 = 0;

/// XDP verdict value for "continue normal processing"
pub const XDP_PASS: u32 = 2;

/// EtherType constants (host byte order)
pub mod ether_type {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const QINQ: u16 = 0x88A8;
    pub const IPV6: u16 = 0x86DD;
}

/// IP protocol constants
pub mod protocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}
