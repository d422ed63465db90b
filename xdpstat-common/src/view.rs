//! Bounds-checked, read-only views over a packet buffer
//!
//! Raw address arithmetic over packet memory happens in this module only.
//! A view can be constructed only after a successful boundary check that
//! covers its full extent, so field accessors never need to re-check.
//!
//! Checks are written as `data + offset + len <= data_end` on the buffer's
//! own addresses: that is the shape the BPF verifier tracks for packet
//! pointers.

use core::marker::PhantomData;

/// A contiguous packet buffer described by its start and end addresses
///
/// # Safety
///
/// `data()..data_end()` must be a readable byte range for as long as the
/// implementor is borrowed, and `data() <= data_end()`. Views built over the
/// buffer read any address inside that range without further checks.
///
/// A safe impl does not compile:
///
/// ```compile_fail
/// use xdpstat_common::PacketBuffer;
///
/// struct Anywhere;
///
/// impl PacketBuffer for Anywhere {
///     fn data(&self) -> usize {
///         0x10
///     }
///
///     fn data_end(&self) -> usize {
///         0x1000
///     }
/// }
/// ```
pub unsafe trait PacketBuffer {
    /// Address of the first byte
    fn data(&self) -> usize;

    /// Address one past the last byte
    fn data_end(&self) -> usize;

    /// Total number of bytes in the buffer
    #[inline(always)]
    fn frame_len(&self) -> usize {
        self.data_end().saturating_sub(self.data())
    }
}

// SAFETY: a slice's bytes are readable for the lifetime of the borrow.
unsafe impl PacketBuffer for [u8] {
    #[inline(always)]
    fn data(&self) -> usize {
        self.as_ptr() as usize
    }

    #[inline(always)]
    fn data_end(&self) -> usize {
        self.as_ptr() as usize + self.len()
    }
}

#[inline(always)]
fn span_fits(start: usize, end: usize, offset: usize, len: usize) -> bool {
    offset
        .checked_add(len)
        .and_then(|span| start.checked_add(span))
        .is_some_and(|span_end| span_end <= end)
}

/// True iff `len` bytes starting at `offset` lie entirely inside `buf`
#[inline(always)]
pub fn fits<B: PacketBuffer + ?Sized>(buf: &B, offset: usize, len: usize) -> bool {
    span_fits(buf.data(), buf.data_end(), offset, len)
}

/// View over the 14-byte Ethernet II header at the start of a frame
#[derive(Clone, Copy, Debug)]
pub struct EthernetFrameView<'a> {
    base: usize,
    _buf: PhantomData<&'a [u8]>,
}

impl<'a> EthernetFrameView<'a> {
    pub const LEN: usize = 14;

    const ETHER_TYPE: usize = 12;

    /// Returns `None` when the buffer is shorter than an Ethernet header
    #[inline(always)]
    pub fn new<B: PacketBuffer + ?Sized>(buf: &'a B) -> Option<Self> {
        let start = buf.data();
        if !span_fits(start, buf.data_end(), 0, Self::LEN) {
            return None;
        }
        Some(Self {
            base: start,
            _buf: PhantomData,
        })
    }

    /// EtherType in host byte order
    #[inline(always)]
    pub fn ether_type(&self) -> u16 {
        u16::from_be_bytes([self.byte(Self::ETHER_TYPE), self.byte(Self::ETHER_TYPE + 1)])
    }

    /// Offset of the encapsulated payload (the L3 header)
    #[inline(always)]
    pub const fn payload_offset(&self) -> usize {
        Self::LEN
    }

    #[inline(always)]
    fn byte(&self, at: usize) -> u8 {
        debug_assert!(at < Self::LEN);
        // SAFETY: `new` proved base..base + LEN lies inside the buffer,
        // which outlives 'a, and `at` is a constant below LEN.
        unsafe { *((self.base + at) as *const u8) }
    }
}

/// View over the fixed 20-byte part of an IPv4 header
///
/// Options and the IHL field are not interpreted.
#[derive(Clone, Copy, Debug)]
pub struct Ipv4HeaderView<'a> {
    base: usize,
    _buf: PhantomData<&'a [u8]>,
}

impl<'a> Ipv4HeaderView<'a> {
    pub const LEN: usize = 20;

    const PROTOCOL: usize = 9;

    /// Returns `None` when fewer than 20 bytes remain at `offset`
    #[inline(always)]
    pub fn new<B: PacketBuffer + ?Sized>(buf: &'a B, offset: usize) -> Option<Self> {
        let start = buf.data();
        if !span_fits(start, buf.data_end(), offset, Self::LEN) {
            return None;
        }
        Some(Self {
            base: start + offset,
            _buf: PhantomData,
        })
    }

    /// Transport protocol number
    #[inline(always)]
    pub fn protocol(&self) -> u8 {
        self.byte(Self::PROTOCOL)
    }

    #[inline(always)]
    fn byte(&self, at: usize) -> u8 {
        debug_assert!(at < Self::LEN);
        // SAFETY: `new` proved base..base + LEN lies inside the buffer.
        unsafe { *((self.base + at) as *const u8) }
    }
}

#[cfg(all(test, feature = "userspace"))]
mod tests {
    use super::*;

    #[test]
    fn test_fits_exact_and_short() {
        let buf = [0u8; 14];
        assert!(fits(&buf[..], 0, 14));
        assert!(!fits(&buf[..], 0, 15));
        assert!(fits(&buf[..], 14, 0));
        assert!(!fits(&buf[..], 1, 14));
    }

    #[test]
    fn test_fits_rejects_overflowing_span() {
        let buf = [0u8; 64];
        assert!(!fits(&buf[..], usize::MAX, 1));
        assert!(!fits(&buf[..], 0, usize::MAX));
    }

    #[test]
    fn test_fits_beyond_64k() {
        let buf = vec![0u8; 100_000];
        assert!(fits(&buf[..], 0, 65_536));
        assert!(fits(&buf[..], 70_000, 20));
        assert!(fits(&buf[..], 0, 100_000));
        assert!(!fits(&buf[..], 99_990, 20));
    }

    struct Shifted<'a> {
        bytes: &'a [u8],
        skip: usize,
    }

    // SAFETY: the range is a sub-slice of `bytes`.
    unsafe impl PacketBuffer for Shifted<'_> {
        fn data(&self) -> usize {
            self.bytes[self.skip..].as_ptr() as usize
        }

        fn data_end(&self) -> usize {
            self.bytes.as_ptr() as usize + self.bytes.len()
        }
    }

    #[test]
    fn test_views_over_custom_buffer_stay_in_range() {
        let mut bytes = [0u8; 40];
        bytes[4 + 12..4 + 14].copy_from_slice(&crate::ether_type::IPV4.to_be_bytes());
        bytes[4 + 14 + 9] = crate::protocol::TCP;

        let buf = Shifted { bytes: &bytes, skip: 4 };
        assert_eq!(buf.frame_len(), 36);

        let eth = EthernetFrameView::new(&buf).expect("36 bytes hold an ethernet header");
        assert_eq!(eth.ether_type(), crate::ether_type::IPV4);

        let ip = Ipv4HeaderView::new(&buf, eth.payload_offset()).expect("ipv4 header fits");
        assert_eq!(ip.protocol(), crate::protocol::TCP);

        let short = Shifted { bytes: &bytes, skip: 7 };
        assert!(Ipv4HeaderView::new(&short, 14).is_none());
    }

    #[test]
    fn test_empty_buffer() {
        let buf: [u8; 0] = [];
        assert_eq!(buf[..].frame_len(), 0);
        assert!(fits(&buf[..], 0, 0));
        assert!(EthernetFrameView::new(&buf[..]).is_none());
    }

    #[test]
    fn test_ethernet_view_reads_ether_type() {
        let mut buf = [0u8; 14];
        buf[12] = 0x08;
        buf[13] = 0x06;

        let eth = EthernetFrameView::new(&buf[..]).expect("14 bytes is a full header");
        assert_eq!(eth.ether_type(), crate::ether_type::ARP);
        assert_eq!(eth.payload_offset(), 14);
    }

    #[test]
    fn test_ethernet_view_refuses_short_buffer() {
        let buf = [0xffu8; 13];
        assert!(EthernetFrameView::new(&buf[..]).is_none());
    }

    #[test]
    fn test_ipv4_view_at_offset() {
        let mut buf = [0u8; 34];
        buf[14 + 9] = crate::protocol::UDP;

        let ip = Ipv4HeaderView::new(&buf[..], 14).expect("20 bytes after ethernet");
        assert_eq!(ip.protocol(), crate::protocol::UDP);

        assert!(Ipv4HeaderView::new(&buf[..33], 14).is_none());
        assert!(Ipv4HeaderView::new(&buf[..], 15).is_none());
    }

    #[test]
    fn test_frame_len_matches_slice_len() {
        let buf = vec![0u8; 1500];
        assert_eq!(buf[..].frame_len(), 1500);
        assert_eq!(buf[..100].frame_len(), 100);
    }
}
