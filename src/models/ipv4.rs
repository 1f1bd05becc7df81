//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`] struct for representing IPv4 networks as an address plus
//! prefix length, with integer range arithmetic for overlap checks.

use std::net::Ipv4Addr;

use crate::BoxError;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use vpc_overlap::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, BoxError> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        Ok(prefix_mask(len))
    }
}

/// Mask for a prefix length already known to be within `0..=MAX_LENGTH`.
fn prefix_mask(len: u8) -> u32 {
    let right_len = MAX_LENGTH - len;
    let all_bits = u32::MAX as u64;

    ((all_bits >> right_len) << right_len) as u32
}

/// IPv4 network in CIDR notation.
///
/// The mask is always within `0..=MAX_LENGTH`; every constructor checks it.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    ///
    /// Host bits below the prefix are accepted, see [`Ipv4::new_strict`].
    /// Surrounding whitespace is not.
    pub fn new(addr_cidr: &str) -> Result<Ipv4, BoxError> {
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| format!("Invalid address/mask '{addr_cidr}'"))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| format!("Invalid address {addr}"))?;
        // u8::from_str accepts a leading '+', CIDR notation does not
        if mask.is_empty() || !mask.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Invalid subnet mask {mask}").into());
        }
        let mask: u8 = mask
            .parse()
            .map_err(|_| format!("Invalid subnet mask {mask}"))?;
        get_cidr_mask(mask)?;
        Ok(Ipv4 { addr, mask })
    }

    /// Create a new [`Ipv4`] network, rejecting addresses with host bits set.
    ///
    /// `10.0.0.0/16` parses, `10.0.0.1/16` does not.
    pub fn new_strict(addr_cidr: &str) -> Result<Ipv4, BoxError> {
        let ipv4 = Ipv4::new(addr_cidr)?;
        if ipv4.addr != ipv4.lo() {
            return Err(format!("{ipv4} has host bits set").into());
        }
        Ok(ipv4)
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & prefix_mask(self.mask))
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.lo()) | !prefix_mask(self.mask))
    }

    /// True when the two blocks share at least one address.
    pub fn overlaps(&self, other: &Ipv4) -> bool {
        u32::from(self.lo()) <= u32::from(other.hi()) && u32::from(other.lo()) <= u32::from(self.hi())
    }

    /// True when every address of `other` lies inside this block.
    pub fn contains(&self, other: &Ipv4) -> bool {
        u32::from(self.lo()) <= u32::from(other.lo()) && u32::from(other.hi()) <= u32::from(self.hi())
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
