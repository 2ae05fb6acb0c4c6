//! Console memory address wrapper type with hex parsing

use super::error::ExecutorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An absolute address in the console's 64-bit address space.
///
/// Addresses are remote: they index the target device's memory and are only
/// ever dereferenced through the debug channel, never locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a u64 value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    ///
    /// Null is the sentinel for "unresolved" — a pointer chain that failed to
    /// resolve yields a null address, which must never be dereferenced.
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Adds an unsigned offset to the address
    pub const fn add(&self, offset: u64) -> Self {
        Address(self.0.wrapping_add(offset))
    }

    /// Adds a signed offset to the address
    pub const fn offset(&self, offset: i64) -> Self {
        Address(self.0.wrapping_add_signed(offset))
    }

    /// Returns the raw u64 value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for Address {
    type Err = ExecutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        // Handle hex prefix variations; bare tokens are treated as hex,
        // matching the pointer-chain notation.
        let value = if s.starts_with("0x") || s.starts_with("0X") {
            u64::from_str_radix(&s[2..], 16)
        } else {
            u64::from_str_radix(s, 16)
        };

        value
            .map(Address::new)
            .map_err(|_| ExecutorError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Address::new(value as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parsing() {
        assert_eq!(Address::from_str("0x1000").unwrap(), Address::new(0x1000));
        assert_eq!(Address::from_str("0X1000").unwrap(), Address::new(0x1000));
        assert_eq!(
            Address::from_str("DEADBEEF").unwrap(),
            Address::new(0xDEADBEEF)
        );
        assert_eq!(
            Address::from_str(" 26365B8 ").unwrap(),
            Address::new(0x26365B8)
        );
        assert!(Address::from_str("not hex").is_err());
    }

    #[test]
    fn test_address_offset() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.add(0x10), Address::new(0x1010));
        assert_eq!(addr.offset(-0x10), Address::new(0x0FF0));
    }

    #[test]
    fn test_null_sentinel() {
        assert!(Address::null().is_null());
        assert!(!Address::new(0x45075880).is_null());
    }

    #[test]
    fn test_address_display() {
        let addr = Address::new(0xDEADBEEF);
        assert_eq!(format!("{}", addr), "0x00000000DEADBEEF");
        assert_eq!(format!("{:x}", addr), "0x00000000deadbeef");
    }
}
