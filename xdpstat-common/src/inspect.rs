//! Per-packet inspection routine
//!
//! validate Ethernet -> EtherType is IPv4 -> validate IPv4 -> classify ->
//! locate this CPU's record -> count -> pass.
//!
//! Every path ends in [`Verdict::Pass`]. The routine has no loops, does not
//! allocate and reads a fixed number of header bytes, so it is safe to inline
//! into an XDP program.

use crate::classify::{classify, Bucket};
use crate::stats::AtomicPacketStats;
use crate::view::PacketBuffer;
use crate::XDP_PASS;

/// Locates the statistics record owned by the executing CPU
pub trait ShardLocator {
    /// `None` when no record exists for this CPU; the packet then passes
    /// uncounted.
    fn current_shard(&self) -> Option<&AtomicPacketStats>;
}

/// Action returned for a packet. Observation only: there is no drop,
/// redirect or transmit.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass = XDP_PASS,
}

impl Verdict {
    #[inline(always)]
    pub const fn as_xdp_action(self) -> u32 {
        self as u32
    }
}

impl From<Verdict> for u32 {
    #[inline(always)]
    fn from(verdict: Verdict) -> Self {
        verdict.as_xdp_action()
    }
}

/// Exit point taken by [`inspect`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Counted into the CPU's record
    Counted(Bucket),
    /// Too short for the Ethernet or IPv4 header
    Truncated,
    /// EtherType other than IPv4 (ARP, IPv6, VLAN-tagged, ...)
    NotIpv4,
    /// No statistics record for the executing CPU
    NoRecord,
}

impl Outcome {
    #[inline(always)]
    pub const fn verdict(&self) -> Verdict {
        Verdict::Pass
    }

    pub const fn is_counted(&self) -> bool {
        matches!(self, Outcome::Counted(_))
    }
}

/// Inspect one packet and count it into the executing CPU's record
#[inline(always)]
pub fn inspect<B, L>(buf: &B, stats: &L) -> Outcome
where
    B: PacketBuffer + ?Sized,
    L: ShardLocator + ?Sized,
{
    let bucket = match classify(buf) {
        Ok(bucket) => bucket,
        Err(outcome) => return outcome,
    };

    let Some(shard) = stats.current_shard() else {
        return Outcome::NoRecord;
    };

    shard.record(buf.frame_len() as u64, bucket);
    Outcome::Counted(bucket)
}

#[cfg(all(test, feature = "userspace"))]
mod tests {
    use super::*;
    use crate::{ether_type, protocol, PacketStatsRecord};

    struct Single(AtomicPacketStats);

    impl ShardLocator for Single {
        fn current_shard(&self) -> Option<&AtomicPacketStats> {
            Some(&self.0)
        }
    }

    struct Missing;

    impl ShardLocator for Missing {
        fn current_shard(&self) -> Option<&AtomicPacketStats> {
            None
        }
    }

    fn ipv4(proto: u8, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        buf[12..14].copy_from_slice(&ether_type::IPV4.to_be_bytes());
        buf[14] = 0x45;
        buf[23] = proto;
        buf
    }

    #[test]
    fn test_verdict_is_xdp_pass() {
        assert_eq!(Verdict::Pass.as_xdp_action(), 2);
        assert_eq!(u32::from(Verdict::Pass), XDP_PASS);
    }

    #[test]
    fn test_every_outcome_passes() {
        for outcome in [
            Outcome::Counted(Bucket::Tcp),
            Outcome::Truncated,
            Outcome::NotIpv4,
            Outcome::NoRecord,
        ] {
            assert_eq!(outcome.verdict(), Verdict::Pass);
        }
    }

    #[test]
    fn test_inspect_counts_tcp() {
        let stats = Single(AtomicPacketStats::new());
        let frame = ipv4(protocol::TCP, 54);

        assert_eq!(inspect(&frame[..], &stats), Outcome::Counted(Bucket::Tcp));
        assert_eq!(
            stats.0.load(),
            PacketStatsRecord {
                total_packets: 1,
                total_bytes: 54,
                tcp_packets: 1,
                udp_packets: 0,
                other_packets: 0,
            }
        );
    }

    #[test]
    fn test_inspect_missing_record_is_not_fatal() {
        let frame = ipv4(protocol::UDP, 70);
        let outcome = inspect(&frame[..], &Missing);
        assert_eq!(outcome, Outcome::NoRecord);
        assert!(!outcome.is_counted());
    }

    #[test]
    fn test_inspect_early_exit_leaves_record_untouched() {
        let stats = Single(AtomicPacketStats::new());

        let mut arp = ipv4(protocol::TCP, 60);
        arp[12..14].copy_from_slice(&ether_type::ARP.to_be_bytes());

        assert_eq!(inspect(&arp[..], &stats), Outcome::NotIpv4);
        assert_eq!(inspect(&[0u8; 10][..], &stats), Outcome::Truncated);
        assert_eq!(stats.0.load(), PacketStatsRecord::zeroed());
    }
}
