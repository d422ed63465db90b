//! Protocol classification of IPv4 frames
//!
//! Classification looks at exactly two fields: the Ethernet EtherType and the
//! IPv4 protocol number. VLAN tags, IPv6, IP options and fragments are not
//! parsed; anything whose EtherType is not IPv4 passes through uncounted.

use crate::inspect::Outcome;
use crate::view::{EthernetFrameView, Ipv4HeaderView, PacketBuffer};
use crate::{ether_type, protocol};

/// Statistics bucket a counted packet falls into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    Tcp,
    Udp,
    Other,
}

impl Bucket {
    #[inline(always)]
    pub const fn from_ip_protocol(proto: u8) -> Self {
        match proto {
            protocol::TCP => Bucket::Tcp,
            protocol::UDP => Bucket::Udp,
            _ => Bucket::Other,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Bucket::Tcp => "tcp",
            Bucket::Udp => "udp",
            Bucket::Other => "other",
        }
    }
}

impl core::fmt::Display for Bucket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a frame, or return the early-exit outcome that ends inspection
///
/// Order matters: the EtherType is consulted before the IPv4 bounds check, so
/// a short ARP frame reports `NotIpv4` rather than `Truncated`.
#[inline(always)]
pub fn classify<B: PacketBuffer + ?Sized>(buf: &B) -> Result<Bucket, Outcome> {
    let eth = EthernetFrameView::new(buf).ok_or(Outcome::Truncated)?;

    if eth.ether_type() != ether_type::IPV4 {
        return Err(Outcome::NotIpv4);
    }

    let ip = Ipv4HeaderView::new(buf, eth.payload_offset()).ok_or(Outcome::Truncated)?;

    Ok(Bucket::from_ip_protocol(ip.protocol()))
}
