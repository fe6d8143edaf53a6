//! Number Theoretic Transform (component B of the core).
//!
//! `q = 3329` has no 512th root of unity, so the final FFT layer is omitted:
//! the NTT stops at 128 degree-two irreducible factors instead of 256 linear
//! ones. `multiply_ntt` therefore multiplies pairs of coefficients modulo
//! `X^2 - gamma` rather than coefficient-by-coefficient.

use crate::field::{zeta_from_raw, Poly, Z};
use crate::params::{ZETA_MUL, ZETA_NTT};

/// Forward NTT, 7 layers, decimation-in-time.
///
/// Input: natural-domain coefficients. Output: bit-reversed NTT-domain
/// coefficients representing the polynomial modulo the 128 quadratic factors
/// `X^2 - ZETA^{2*brv7(i)+1}`.
#[must_use]
pub(crate) fn ntt(f: &Poly) -> Poly {
    let mut f_hat = *f;
    let mut i = 1usize;

    for len in [128, 64, 32, 16, 8, 4, 2] {
        for start in (0..256).step_by(2 * len) {
            let zeta = zeta_from_raw(ZETA_NTT[i]);
            i += 1;

            for j in start..start + len {
                let t = f_hat[j + len].mul(zeta);
                f_hat[j + len] = f_hat[j].sub(t);
                f_hat[j] = f_hat[j].add(t);
            }
        }
    }
    f_hat
}

/// Inverse NTT, 7 layers, decimation-in-frequency, final per-coefficient
/// multiplication by `128^{-1} mod q = 3303`.
///
/// Walks the same twiddle table as `ntt` but with a descending index, since
/// `spec.md` §4.J's "inverse NTT twiddles" table is the forward table read
/// backwards (see the comment on `ZETA_NTT` in `params.rs`).
#[must_use]
pub(crate) fn inverse_ntt(f_hat: &Poly) -> Poly {
    let mut f = *f_hat;
    let mut i = 127usize;
    let n_inv = zeta_from_raw(3303);

    for len in [2, 4, 8, 16, 32, 64, 128] {
        for start in (0..256).step_by(2 * len) {
            let zeta = zeta_from_raw(ZETA_NTT[i]);
            i -= 1;

            for j in start..start + len {
                let t = f[j];
                f[j] = t.add(f[j + len]);
                f[j + len] = zeta.mul(f[j + len].sub(t));
            }
        }
    }
    for coeff in &mut f {
        *coeff = coeff.mul(n_inv);
    }
    f
}

/// `BaseCaseMultiply(a0, a1, b0, b1, gamma)`: multiplies `a0 + a1*X` by
/// `b0 + b1*X` modulo `X^2 - gamma`.
#[must_use]
fn base_case_multiply(a0: Z, a1: Z, b0: Z, b1: Z, gamma: Z) -> (Z, Z) {
    let c0 = a0.mul(b0).add(a1.mul(b1).mul(gamma));
    let c1 = a0.mul(b1).add(a1.mul(b0));
    (c0, c1)
}

/// `MultiplyNTTs(f_hat, g_hat)`: pointwise multiplication of the 128
/// quadratic components, each requiring a base-case product.
#[must_use]
pub(crate) fn multiply_ntt(f_hat: &Poly, g_hat: &Poly) -> Poly {
    let mut h_hat = [Z::zero(); 256];
    for i in 0..128 {
        let gamma = zeta_from_raw(ZETA_MUL[i]);
        let (c0, c1) =
            base_case_multiply(f_hat[2 * i], f_hat[2 * i + 1], g_hat[2 * i], g_hat[2 * i + 1], gamma);
        h_hat[2 * i] = c0;
        h_hat[2 * i + 1] = c1;
    }
    h_hat
}

/// `acc += f_hat * g_hat` in the NTT domain.
pub(crate) fn multiply_add_ntt(acc: &mut Poly, f_hat: &Poly, g_hat: &Poly) {
    let prod = multiply_ntt(f_hat, g_hat);
    for i in 0..256 {
        acc[i] = acc[i].add(prod[i]);
    }
}
