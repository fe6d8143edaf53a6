#![cfg_attr(not(test), no_std)]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Implements FIPS 203: Module-Lattice-Based Key-Encapsulation Mechanism (ML-KEM).
//! See <https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.203.pdf>
//!
//! Unlike earlier drafts of this crate, the three parameter sets (ML-KEM-512/768/1024)
//! are not separate compile-time feature-gated modules: a single [`Key`] object carries
//! a runtime [`Variant`] selector and dispatches internally to const-generic
//! monomorphized code paths for `K = 2, 3, 4`. This lets a host application hold keys
//! of different variants behind one concrete type.

mod byte_codec;
mod error;
mod field;
mod k_pke;
mod key;
mod ml_kem;
mod ntt;
mod oracles;
mod params;
mod sampling;
mod vector;


pub use error::Error;
pub use key::{DuplicateScope, Key};
pub use oracles::{Oracles, Sha3Oracles, XofSqueeze};
pub use params::ParamSet;

use zeroize::{Zeroize, ZeroizeOnDrop};

const Q: u32 = 3329;
const ZETA: u32 = 17;

/// Shared secret key length for all ML-KEM variants, in bytes.
pub const SSK_LEN: usize = 32;
/// Length of the seed consumed by [`Key::generate_from_seed`] (`d || z`).
pub const SEED_LEN: usize = 64;

/// Which of the three standardized parameter sets a [`Key`] is bound to.
///
/// Selecting a variant fixes the module rank `K`, the compression widths
/// `du`/`dv`, the noise parameter `eta1`, and every derived wire length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Category 1 security, `K = 2`.
    MlKem512,
    /// Category 3 security, `K = 3`.
    MlKem768,
    /// Category 5 security, `K = 4`.
    MlKem1024,
}

impl Variant {
    /// The parameter table for this variant.
    #[must_use]
    pub fn param_set(self) -> ParamSet {
        match self {
            Variant::MlKem512 => params::ML_KEM_512,
            Variant::MlKem768 => params::ML_KEM_768,
            Variant::MlKem1024 => params::ML_KEM_1024,
        }
    }
}

/// The shared secret agreed by encapsulation and decapsulation.
///
/// Compared in constant time; zeroized on drop.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);

impl SharedSecretKey {
    #[must_use]
    pub(crate) fn new(bytes: [u8; SSK_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the shared secret's bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SSK_LEN] {
        &self.0
    }
}

impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SharedSecretKey {}
