//! Hash and XOF oracle abstraction (component K).
//!
//! `spec.md` §9 asks for the five named oracles (`H`, `G`, `J`, `PRF`, `XOF`)
//! to be reachable as externally injectable handles rather than hard calls
//! into one hash crate, so that a caller can substitute instrumented or
//! hardware-backed primitives without touching the lattice math. Since this
//! crate is `no_std` and allocation-free, the substitution point is a trait
//! with a default type parameter rather than `dyn Oracles` behind a `Box`:
//! every call site is still monomorphized, but `Key<O>` is generic over `O`.

/// A streaming extendable-output reader, squeezed in caller-chosen chunks.
///
/// Mirrors `sha3::digest::XofReader` in shape so `Sha3Oracles` can hand out
/// the crate's own reader types directly.
pub trait XofSqueeze {
    /// Write the next `out.len()` bytes of the XOF's output stream into `out`.
    fn squeeze(&mut self, out: &mut [u8]);
}

impl<T: sha3::digest::XofReader> XofSqueeze for T {
    fn squeeze(&mut self, out: &mut [u8]) {
        self.read(out);
    }
}

/// The five named functions `spec.md` §9 calls `H`, `G`, `J`, `PRF`, `XOF`.
///
/// Implementors are expected to be zero-sized (the default `Sha3Oracles`
/// is); the trait exists to fix an interchangeable set of primitives, not to
/// carry per-call state.
pub trait Oracles {
    /// XOF reader type returned by `xof_absorb`.
    type Xof: XofSqueeze;

    /// `H`: SHA3-256, fixed 32-byte output.
    fn h(data: &[u8]) -> [u8; 32];

    /// `G`: SHA3-512, fixed 64-byte output split as `(first 32, last 32)`.
    fn g(data: &[u8]) -> ([u8; 32], [u8; 32]);

    /// `J`: SHAKE256 used as a fixed-length (32-byte) hash, for implicit
    /// rejection's pseudorandom shared-secret substitute.
    fn j(data: &[u8]) -> [u8; 32];

    /// `PRF_eta`: SHAKE256(seed || counter) squeezed to `64 * eta` bytes.
    ///
    /// `eta` is 2 or 3 per `spec.md` §3; the caller sizes `out` accordingly.
    fn prf(eta: u32, seed: &[u8; 32], counter: u8, out: &mut [u8]);

    /// `XOF`: SHAKE128 absorbing `rho || i || j`, returned as a streaming reader
    /// so the rejection sampler in `sampling.rs` can squeeze in small chunks.
    fn xof_absorb(rho: &[u8; 32], i: u8, j: u8) -> Self::Xof;
}

/// The default oracle set: SHA3-256/512 and SHAKE128/256 from the `sha3` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha3Oracles;

impl Oracles for Sha3Oracles {
    type Xof = sha3::Shake128Reader;

    fn h(data: &[u8]) -> [u8; 32] {
        use sha3::Digest;
        let digest = sha3::Sha3_256::digest(data);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }

    fn g(data: &[u8]) -> ([u8; 32], [u8; 32]) {
        use sha3::Digest;
        let digest = sha3::Sha3_512::digest(data);
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        first.copy_from_slice(&digest[..32]);
        second.copy_from_slice(&digest[32..]);
        (first, second)
    }

    fn j(data: &[u8]) -> [u8; 32] {
        use sha3::digest::{ExtendableOutput, Update, XofReader};
        let mut hasher = sha3::Shake256::default();
        hasher.update(data);
        let mut reader = hasher.finalize_xof();
        let mut out = [0u8; 32];
        reader.read(&mut out);
        out
    }

    fn prf(eta: u32, seed: &[u8; 32], counter: u8, out: &mut [u8]) {
        use sha3::digest::{ExtendableOutput, Update, XofReader};
        debug_assert_eq!(out.len(), 64 * eta as usize);
        let mut hasher = sha3::Shake256::default();
        hasher.update(seed);
        hasher.update(&[counter]);
        let mut reader = hasher.finalize_xof();
        reader.read(out);
    }

    fn xof_absorb(rho: &[u8; 32], i: u8, j: u8) -> Self::Xof {
        use sha3::digest::{ExtendableOutput, Update};
        let mut hasher = sha3::Shake128::default();
        hasher.update(rho);
        hasher.update(&[i, j]);
        hasher.finalize_xof()
    }
}

#[cfg(test)]
mod tests {
    use super::{Oracles, Sha3Oracles, XofSqueeze};

    #[test]
    fn h_is_32_bytes_and_deterministic() {
        let a = Sha3Oracles::h(b"abc");
        let b = Sha3Oracles::h(b"abc");
        assert_eq!(a, b);
        let c = Sha3Oracles::h(b"abd");
        assert_ne!(a, c);
    }

    #[test]
    fn g_splits_64_bytes_into_two_distinct_halves() {
        let (first, second) = Sha3Oracles::g(b"seed");
        assert_ne!(first, second);
    }

    #[test]
    fn prf_produces_requested_length() {
        let seed = [7u8; 32];
        let mut out2 = [0u8; 128];
        Sha3Oracles::prf(2, &seed, 0, &mut out2);
        let mut out3 = [0u8; 192];
        Sha3Oracles::prf(3, &seed, 0, &mut out3);
        assert_ne!(out2[..128], out3[..128]);
    }

    #[test]
    fn xof_absorb_squeezes_deterministically() {
        let rho = [1u8; 32];
        let mut r1 = Sha3Oracles::xof_absorb(&rho, 0, 1);
        let mut r2 = Sha3Oracles::xof_absorb(&rho, 0, 1);
        let mut b1 = [0u8; 64];
        let mut b2 = [0u8; 64];
        r1.squeeze(&mut b1);
        r2.squeeze(&mut b2);
        assert_eq!(b1, b2);

        let mut r3 = Sha3Oracles::xof_absorb(&rho, 0, 2);
        let mut b3 = [0u8; 64];
        r3.squeeze(&mut b3);
        assert_ne!(b1, b3);
    }
}
