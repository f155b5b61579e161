//! Primitive domain types shared across the crate.
//!
//! Contains the `u64` newtypes used by the beacon API (`Epoch`,
//! `ValidatorIndex`, `Gwei`), the fixed-length byte arrays (`BlsPubKey`,
//! `Version`, `ExecutionAddress`), and the `NodeIdentity` handle.

use std::sync::Arc;

// ==============================================================================
// Integer Newtypes
// ==============================================================================

macro_rules! u64_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }

        impl From<$name> for u64 {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

u64_newtype!(
    /// A consensus-layer epoch number.
    Epoch
);
u64_newtype!(
    /// Position of a validator in the beacon state registry.
    ValidatorIndex
);
u64_newtype!(
    /// An amount of the chain's base unit (1 Gwei = 10^-9 ETH).
    Gwei
);

// ==============================================================================
// Fixed-Length Byte Arrays
// ==============================================================================

/// A byte array whose length is part of its type.
///
/// The wire form is always `0x` followed by exactly `2 * N` lowercase hex
/// digits; see [`crate::codec`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedBytes<const N: usize>(pub [u8; N]);

impl<const N: usize> FixedBytes<N> {
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> From<[u8; N]> for FixedBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> std::fmt::Display for FixedBytes<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl<const N: usize> std::fmt::Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

/// A compressed BLS12-381 public key.
pub type BlsPubKey = FixedBytes<48>;
/// A fork version.
pub type Version = FixedBytes<4>;
/// An execution-layer account address.
pub type ExecutionAddress = FixedBytes<20>;

// ==============================================================================
// Node Identity
// ==============================================================================

/// Handle naming one configured beacon node.
///
/// Cheap to clone and safe to share between concurrent dispatches; it is
/// fixed when the node is configured and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdentity {
    label: Arc<str>,
    address: Arc<str>,
}

impl NodeIdentity {
    pub fn new(label: &str, address: &str) -> Self {
        Self {
            label: Arc::from(label),
            address: Arc::from(address),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl std::fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}
