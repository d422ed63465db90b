//! Per-CPU packet statistics record

use crate::classify::Bucket;
use core::sync::atomic::{AtomicU64, Ordering};

/// Running counters owned by one CPU
///
/// Layout (40 bytes total, 8-byte aligned) matches the value type of the
/// per-CPU statistics map. After every completed update
/// `tcp_packets + udp_packets + other_packets == total_packets`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "userspace", derive(PartialEq, Eq, serde::Serialize, serde::Deserialize))]
pub struct PacketStatsRecord {
    pub total_packets: u64,
    pub total_bytes: u64,
    pub tcp_packets: u64,
    pub udp_packets: u64,
    pub other_packets: u64,
}

impl PacketStatsRecord {
    pub const fn zeroed() -> Self {
        Self {
            total_packets: 0,
            total_bytes: 0,
            tcp_packets: 0,
            udp_packets: 0,
            other_packets: 0,
        }
    }

    /// Counter for a single bucket
    pub const fn bucket(&self, bucket: Bucket) -> u64 {
        match bucket {
            Bucket::Tcp => self.tcp_packets,
            Bucket::Udp => self.udp_packets,
            Bucket::Other => self.other_packets,
        }
    }

    pub const fn bucket_sum(&self) -> u64 {
        self.tcp_packets
            .wrapping_add(self.udp_packets)
            .wrapping_add(self.other_packets)
    }

    /// Buckets add up to the packet total
    pub const fn is_consistent(&self) -> bool {
        self.bucket_sum() == self.total_packets
    }

    /// Add another CPU's counters into this one
    pub fn merge(&mut self, other: &Self) {
        self.total_packets = self.total_packets.wrapping_add(other.total_packets);
        self.total_bytes = self.total_bytes.wrapping_add(other.total_bytes);
        self.tcp_packets = self.tcp_packets.wrapping_add(other.tcp_packets);
        self.udp_packets = self.udp_packets.wrapping_add(other.udp_packets);
        self.other_packets = self.other_packets.wrapping_add(other.other_packets);
    }
}

impl<'a> core::iter::Sum<&'a PacketStatsRecord> for PacketStatsRecord {
    fn sum<I: Iterator<Item = &'a PacketStatsRecord>>(iter: I) -> Self {
        iter.fold(Self::zeroed(), |mut acc, record| {
            acc.merge(record);
            acc
        })
    }
}

/// Atomic view of a [`PacketStatsRecord`]
///
/// Same layout as the plain record, so a map slot can be updated in place
/// with atomic adds. Each add is atomic with respect to reentrant updates on
/// the owning CPU; readers on other CPUs may observe a record mid-update.
#[repr(C)]
#[derive(Debug, Default)]
pub struct AtomicPacketStats {
    pub total_packets: AtomicU64,
    pub total_bytes: AtomicU64,
    pub tcp_packets: AtomicU64,
    pub udp_packets: AtomicU64,
    pub other_packets: AtomicU64,
}

impl AtomicPacketStats {
    pub const fn new() -> Self {
        Self {
            total_packets: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            tcp_packets: AtomicU64::new(0),
            udp_packets: AtomicU64::new(0),
            other_packets: AtomicU64::new(0),
        }
    }

    /// Reinterpret a record slot as atomics
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, 8-byte aligned and valid for reads and writes
    /// for `'a`, and every access to the slot during `'a` must go through
    /// atomic operations.
    #[inline(always)]
    pub unsafe fn from_ptr<'a>(ptr: *mut PacketStatsRecord) -> &'a Self {
        &*(ptr as *const Self)
    }

    /// Count one packet of `len` bytes into `bucket`
    #[inline(always)]
    pub fn record(&self, len: u64, bucket: Bucket) {
        self.total_packets.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(len, Ordering::Relaxed);

        let counter = match bucket {
            Bucket::Tcp => &self.tcp_packets,
            Bucket::Udp => &self.udp_packets,
            Bucket::Other => &self.other_packets,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Relaxed snapshot; fields may come from different points of a
    /// concurrent update.
    pub fn load(&self) -> PacketStatsRecord {
        PacketStatsRecord {
            total_packets: self.total_packets.load(Ordering::Relaxed),
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            tcp_packets: self.tcp_packets.load(Ordering::Relaxed),
            udp_packets: self.udp_packets.load(Ordering::Relaxed),
            other_packets: self.other_packets.load(Ordering::Relaxed),
        }
    }
}

const _: () = {
    assert!(
        core::mem::size_of::<PacketStatsRecord>() == 40,
        "PacketStatsRecord must be exactly 40 bytes"
    );
    assert!(
        core::mem::align_of::<PacketStatsRecord>() == 8,
        "PacketStatsRecord must be 8-byte aligned"
    );
    assert!(
        core::mem::size_of::<AtomicPacketStats>() == core::mem::size_of::<PacketStatsRecord>(),
        "AtomicPacketStats must match PacketStatsRecord size"
    );
    assert!(
        core::mem::align_of::<AtomicPacketStats>() == core::mem::align_of::<PacketStatsRecord>(),
        "AtomicPacketStats must match PacketStatsRecord alignment"
    );
};
