//! Pseudorandom sampling (component C): uniform rejection sampling of NTT-domain
//! polynomials from an XOF stream, and centered binomial sampling from a PRF
//! output buffer.

use crate::field::{zeta_from_raw, Poly, Z};
use crate::oracles::XofSqueeze;
use crate::Q;

/// `SampleNTT`: rejection-sample 256 coefficients in `[0, q)` from a stream of
/// XOF output, three bytes producing two 12-bit candidates at a time.
///
/// Never terminates early on "not enough output": the caller's `xof` is an
/// infinite stream (SHAKE128 squeeze has no fixed length), so the loop simply
/// keeps squeezing a fixed chunk size until 256 coefficients are accepted.
#[must_use]
pub(crate) fn sample_ntt_from_xof(xof: &mut impl XofSqueeze) -> Poly {
    let mut coeffs = [Z::zero(); 256];
    let mut accepted = 0usize;
    let mut chunk = [0u8; 3 * 168]; // 168 triples per squeeze, arbitrary batch size

    while accepted < 256 {
        xof.squeeze(&mut chunk);
        for triple in chunk.chunks_exact(3) {
            if accepted >= 256 {
                break;
            }
            let b0 = u16::from(triple[0]);
            let b1 = u16::from(triple[1]);
            let b2 = u16::from(triple[2]);
            let d1 = b0 | ((b1 & 0x0f) << 8);
            let d2 = (b1 >> 4) | (b2 << 4);
            if u32::from(d1) < Q {
                coeffs[accepted] = zeta_from_raw(d1);
                accepted += 1;
            }
            if accepted < 256 && u32::from(d2) < Q {
                coeffs[accepted] = zeta_from_raw(d2);
                accepted += 1;
            }
        }
    }
    coeffs
}

/// `SamplePolyCBD_eta`: centered binomial distribution with parameter `eta`,
/// consuming exactly `64 * eta` bytes of PRF output (`spec.md` §4.C).
///
/// For each coefficient, sums `eta` pseudorandom bits minus `eta` more
/// pseudorandom bits, taken from consecutive bit positions of the PRF stream.
#[must_use]
pub(crate) fn sample_cbd(eta: u32, bytes: &[u8]) -> Poly {
    debug_assert_eq!(bytes.len(), 64 * eta as usize);
    let mut coeffs = [Z::zero(); 256];

    let bit = |i: usize| -> u32 {
        let byte = bytes[i / 8];
        u32::from((byte >> (i % 8)) & 1)
    };

    for i in 0..256 {
        let mut x = 0u32;
        let mut y = 0u32;
        for j in 0..eta as usize {
            x += bit(2 * i * eta as usize + j);
            y += bit(2 * i * eta as usize + eta as usize + j);
        }
        let diff = (x as i32) - (y as i32);
        let reduced = diff.rem_euclid(Q as i32) as u16;
        coeffs[i] = zeta_from_raw(reduced);
    }
    coeffs
}
