//! Bit-packing and lossy compression (component D).
//!
//! `ByteEncode_d`/`ByteDecode_d` pack/unpack 256 `d`-bit values into
//! `32 * d` bytes for `d` in `1..=12`; `Compress_d`/`Decompress_d` round
//! coefficients to and from a `d`-bit lossy representation. Every routine
//! here is written for runtime-variable `d` rather than one function per
//! bit width, since the variant (and therefore `du`/`dv`) is a runtime
//! selector on `Key`, not a compile-time feature.

use crate::error::{ensure, Error};
use crate::field::{zeta_from_raw, Poly, Z};
use crate::Q;

/// `ByteEncode_d`: pack 256 coefficients into `32 * d` little-endian-bit bytes.
///
/// For `d == 12` every coefficient must already be `< q`; for `d < 12` the
/// coefficients are taken to already be in `[0, 2^d)` (the output of
/// `Compress_d`), so no range check is applied in that case.
pub(crate) fn byte_encode(d: u32, poly: &Poly, out: &mut [u8]) -> Result<(), Error> {
    ensure!(out.len() == 32 * d as usize, Error::InvalidLength);
    out.iter_mut().for_each(|b| *b = 0);

    let mut bit_pos = 0usize;
    for coeff in poly {
        let value = coeff.get_u32();
        if d == 12 {
            ensure!(value < Q, Error::InvalidEncoding);
        }
        for bit in 0..d {
            let b = (value >> bit) & 1;
            out[bit_pos / 8] |= (b as u8) << (bit_pos % 8);
            bit_pos += 1;
        }
    }
    Ok(())
}

/// `ByteDecode_d`: inverse of `byte_encode`.
///
/// For `d == 12`, rejects any 12-bit group that decodes to `>= q`
/// (`spec.md` §4.D modulus check, required for `ek`/`dk` validation).
pub(crate) fn byte_decode(d: u32, bytes: &[u8]) -> Result<Poly, Error> {
    ensure!(bytes.len() == 32 * d as usize, Error::InvalidLength);
    let mut poly = [Z::zero(); 256];

    let mut bit_pos = 0usize;
    for slot in &mut poly {
        let mut value = 0u32;
        for bit in 0..d {
            let b = (bytes[bit_pos / 8] >> (bit_pos % 8)) & 1;
            value |= u32::from(b) << bit;
            bit_pos += 1;
        }
        if d == 12 {
            ensure!(value < Q, Error::InvalidEncoding);
        }
        *slot = zeta_from_raw(value as u16);
    }
    Ok(poly)
}

/// `Compress_d(x) = round((2^d / q) * x) mod 2^d`, computed without floats via
/// a fixed-point multiply-and-shift followed by a single conditional fixup
/// for the rounding boundary.
#[must_use]
pub(crate) fn compress(d: u32, x: Z) -> u32 {
    let numerator = (x.get_u32() << d) as u64 * 2 + Q as u64;
    let doubled_q = 2 * Q as u64;
    let rounded = numerator / doubled_q;
    (rounded as u32) & ((1u32 << d) - 1)
}

/// `Decompress_d(y) = round((q / 2^d) * y)`, the inverse (lossy) map back
/// into `[0, q)`.
#[must_use]
pub(crate) fn decompress(d: u32, y: u32) -> Z {
    let numerator = 2 * Q as u64 * u64::from(y) + (1u64 << d);
    let denom = 1u64 << (d + 1);
    let value = (numerator / denom) as u32 % Q;
    zeta_from_raw(value as u16)
}

/// Apply `compress` across a polynomial's coefficients.
#[must_use]
pub(crate) fn compress_poly(d: u32, poly: &Poly) -> [u32; 256] {
    let mut out = [0u32; 256];
    for i in 0..256 {
        out[i] = compress(d, poly[i]);
    }
    out
}

/// Apply `decompress` across a coefficient array, yielding a `Poly`.
#[must_use]
pub(crate) fn decompress_poly(d: u32, values: &[u32; 256]) -> Poly {
    let mut out = [Z::zero(); 256];
    for i in 0..256 {
        out[i] = decompress(d, values[i]);
    }
    out
}
