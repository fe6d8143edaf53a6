//! K-PKE: the CPA-secure public-key encryption core (component G).
//!
//! `ml_kem.rs` wraps `encrypt_cpa`/`decrypt_cpa`/`keygen_cpa` with the
//! Fujisaki-Okamoto transform to get IND-CCA2 security; this module only
//! ever sees public randomness, never the FO re-encryption check.

use crate::byte_codec::{byte_decode, byte_encode};
use crate::error::Error;
use crate::field::{zeta_from_raw, Poly, Z};
use crate::ntt::inverse_ntt;
use crate::oracles::Oracles;
use crate::vector::{
    dot_product_ntt, expand_matrix, mul_matrix_t_vector_ntt, mul_matrix_vector_ntt, vector_add,
    vector_byte_decode, vector_byte_encode, vector_ntt,
};
use crate::Q;

/// Largest `64 * eta` PRF output needed by any variant (`eta <= 3`).
const MAX_PRF_LEN: usize = 64 * 3;
/// Largest `32 * du * K` ciphertext-u length needed by any variant (`du <= 11`, `K <= 4`).
const MAX_C1_LEN: usize = 32 * 11 * 4;
/// Largest `32 * dv` ciphertext-v length needed by any variant (`dv <= 5`).
const MAX_C2_LEN: usize = 32 * 5;

/// `K-PKE.KeyGen(d)`: derive `(ek_pke, dk_pke)` from a 32-byte seed.
///
/// `ek_out` must be `384*K + 32` bytes; `dk_out` must be `384*K` bytes.
///
/// `d` is augmented with a trailing byte equal to the rank `K` before being
/// passed to `G`, so that two variants sharing the same `d` derive distinct
/// `(rho, sigma)` pairs rather than colliding on the underlying FIPS 203
/// `K-PKE.KeyGen`, which hashes the bare seed.
pub(crate) fn keygen_cpa<const K: usize, O: Oracles>(
    d: &[u8; 32],
    eta1: u32,
    ek_out: &mut [u8],
    dk_out: &mut [u8],
) -> Result<(), Error> {
    let mut d_augmented = [0u8; 33];
    d_augmented[..32].copy_from_slice(d);
    d_augmented[32] = K as u8;
    let (rho, sigma) = O::g(&d_augmented);
    let a_hat_t = expand_matrix::<K, O>(&rho);

    let mut n = 0u8;
    let mut buf = [0u8; MAX_PRF_LEN];
    let mut s = [[Z::zero(); 256]; K];
    for slot in &mut s {
        let len = 64 * eta1 as usize;
        O::prf(eta1, &sigma, n, &mut buf[..len]);
        *slot = crate::sampling::sample_cbd(eta1, &buf[..len]);
        n += 1;
    }
    let mut e = [[Z::zero(); 256]; K];
    for slot in &mut e {
        let len = 64 * eta1 as usize;
        O::prf(eta1, &sigma, n, &mut buf[..len]);
        *slot = crate::sampling::sample_cbd(eta1, &buf[..len]);
        n += 1;
    }

    let s_hat = vector_ntt(&s);
    let e_hat = vector_ntt(&e);
    let t_hat = vector_add(&mul_matrix_vector_ntt(&a_hat_t, &s_hat), &e_hat);

    let chunk = 384 * K;
    vector_byte_encode(12, &t_hat, &mut ek_out[..chunk])?;
    ek_out[chunk..chunk + 32].copy_from_slice(&rho);
    vector_byte_encode(12, &s_hat, dk_out)?;
    Ok(())
}

/// `K-PKE.Encrypt(ek_pke, m, r)`: encrypt a 32-byte message under randomness `r`.
///
/// `ct_out` must be `32*(du*K + dv)` bytes.
pub(crate) fn encrypt_cpa<const K: usize, O: Oracles>(
    ek_pke: &[u8],
    m: &[u8; 32],
    r: &[u8; 32],
    eta1: u32,
    eta2: u32,
    du: u32,
    dv: u32,
    ct_out: &mut [u8],
) -> Result<(), Error> {
    let chunk = 384 * K;
    ensure_len(ek_pke.len() == chunk + 32)?;
    let t_hat: [Poly; K] = vector_byte_decode(12, &ek_pke[..chunk])?;
    let mut rho = [0u8; 32];
    rho.copy_from_slice(&ek_pke[chunk..chunk + 32]);
    let a_hat_t = expand_matrix::<K, O>(&rho);

    let mut n = 0u8;
    let mut buf = [0u8; MAX_PRF_LEN];
    let mut y = [[Z::zero(); 256]; K];
    for slot in &mut y {
        let len = 64 * eta1 as usize;
        O::prf(eta1, r, n, &mut buf[..len]);
        *slot = crate::sampling::sample_cbd(eta1, &buf[..len]);
        n += 1;
    }
    let mut e1 = [[Z::zero(); 256]; K];
    for slot in &mut e1 {
        let len = 64 * eta2 as usize;
        O::prf(eta2, r, n, &mut buf[..len]);
        *slot = crate::sampling::sample_cbd(eta2, &buf[..len]);
        n += 1;
    }
    let len = 64 * eta2 as usize;
    O::prf(eta2, r, n, &mut buf[..len]);
    let e2 = crate::sampling::sample_cbd(eta2, &buf[..len]);

    let y_hat = vector_ntt(&y);
    let mut u = crate::vector::vector_inverse_ntt(&mul_matrix_t_vector_ntt(&a_hat_t, &y_hat));
    u = vector_add(&u, &e1);

    let mu = decode_message(m);
    let mut v_poly = inverse_ntt(&dot_product_ntt(&t_hat, &y_hat));
    v_poly = add_poly(&v_poly, &e2);
    v_poly = add_poly(&v_poly, &mu);

    let u_compressed = crate::vector::vector_compress(du, &u);
    let v_compressed = crate::byte_codec::compress_poly(dv, &v_poly);

    let c1_len = 32 * du as usize * K;
    let c2_len = 32 * dv as usize;
    let mut c1_buf = [0u8; MAX_C1_LEN];
    encode_compressed_vector::<K>(du, &u_compressed, &mut c1_buf[..c1_len])?;
    let mut c2_buf = [0u8; MAX_C2_LEN];
    encode_compressed_poly(dv, &v_compressed, &mut c2_buf[..c2_len])?;

    ct_out[..c1_len].copy_from_slice(&c1_buf[..c1_len]);
    ct_out[c1_len..c1_len + c2_len].copy_from_slice(&c2_buf[..c2_len]);
    Ok(())
}

/// `K-PKE.Decrypt(dk_pke, c)`: recover the 32-byte message.
pub(crate) fn decrypt_cpa<const K: usize>(
    dk_pke: &[u8],
    ciphertext: &[u8],
    du: u32,
    dv: u32,
) -> Result<[u8; 32], Error> {
    let c1_len = 32 * du as usize * K;
    ensure_len(ciphertext.len() >= c1_len + 32 * dv as usize)?;
    let c1 = &ciphertext[..c1_len];
    let c2 = &ciphertext[c1_len..c1_len + 32 * dv as usize];

    let u_compressed = decode_compressed_vector::<K>(du, c1)?;
    let v_compressed = decode_compressed_poly(dv, c2)?;

    let u = crate::vector::vector_decompress(du, &u_compressed);
    let v = crate::byte_codec::decompress_poly(dv, &v_compressed);

    let s_hat: [Poly; K] = vector_byte_decode(12, dk_pke)?;
    let u_hat = vector_ntt(&u);
    let w = sub_poly(&v, &inverse_ntt(&dot_product_ntt(&s_hat, &u_hat)));

    Ok(encode_message(&w))
}

fn ensure_len(cond: bool) -> Result<(), Error> {
    if cond {
        Ok(())
    } else {
        Err(Error::InvalidLength)
    }
}

fn add_poly(a: &Poly, b: &Poly) -> Poly {
    let mut out = [Z::zero(); 256];
    for i in 0..256 {
        out[i] = a[i].add(b[i]);
    }
    out
}

fn sub_poly(a: &Poly, b: &Poly) -> Poly {
    let mut out = [Z::zero(); 256];
    for i in 0..256 {
        out[i] = a[i].sub(b[i]);
    }
    out
}

/// Decode a 32-byte message into `Decompress_1(ByteDecode_1(m))`.
fn decode_message(m: &[u8; 32]) -> Poly {
    let mut out = [Z::zero(); 256];
    for bit_idx in 0..256 {
        let b = (m[bit_idx / 8] >> (bit_idx % 8)) & 1;
        out[bit_idx] = if b == 1 {
            zeta_from_raw(((Q + 1) / 2) as u16)
        } else {
            Z::zero()
        };
    }
    out
}

/// Encode `ByteEncode_1(Compress_1(w))` into a 32-byte message.
fn encode_message(w: &Poly) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..256 {
        let bit = crate::byte_codec::compress(1, w[i]);
        out[i / 8] |= (bit as u8) << (i % 8);
    }
    out
}

fn encode_compressed_vector<const K: usize>(
    d: u32,
    v: &[[u32; 256]; K],
    out: &mut [u8],
) -> Result<(), Error> {
    let chunk = 32 * d as usize;
    for i in 0..K {
        encode_compressed_poly(d, &v[i], &mut out[i * chunk..(i + 1) * chunk])?;
    }
    Ok(())
}

fn decode_compressed_vector<const K: usize>(d: u32, bytes: &[u8]) -> Result<[[u32; 256]; K], Error> {
    let chunk = 32 * d as usize;
    let mut out = [[0u32; 256]; K];
    for i in 0..K {
        out[i] = decode_compressed_poly(d, &bytes[i * chunk..(i + 1) * chunk])?;
    }
    Ok(out)
}

fn encode_compressed_poly(d: u32, values: &[u32; 256], out: &mut [u8]) -> Result<(), Error> {
    let mut poly = [Z::zero(); 256];
    for i in 0..256 {
        poly[i] = zeta_from_raw(values[i] as u16);
    }
    byte_encode(d, &poly, out)
}

fn decode_compressed_poly(d: u32, bytes: &[u8]) -> Result<[u32; 256], Error> {
    let poly = byte_decode(d, bytes)?;
    let mut out = [0u32; 256];
    for i in 0..256 {
        out[i] = poly[i].get_u32();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{decrypt_cpa, encrypt_cpa, keygen_cpa};
    use crate::oracles::Sha3Oracles;

    #[test]
    fn k_pke_round_trip_k2() {
        const K: usize = 2;
        let d = [1u8; 32];
        let mut ek = [0u8; 384 * K + 32];
        let mut dk = [0u8; 384 * K];
        keygen_cpa::<K, Sha3Oracles>(&d, 3, &mut ek, &mut dk).unwrap();

        let m = [0x42u8; 32];
        let r = [2u8; 32];
        let mut ct = [0u8; 32 * (10 * K + 4)];
        encrypt_cpa::<K, Sha3Oracles>(&ek, &m, &r, 3, 2, 10, 4, &mut ct).unwrap();

        let decrypted = decrypt_cpa::<K>(&dk, &ct, 10, 4).unwrap();
        assert_eq!(decrypted, m);
    }

    #[test]
    fn k_pke_round_trip_k3_different_message() {
        const K: usize = 3;
        let d = [9u8; 32];
        let mut ek = [0u8; 384 * K + 32];
        let mut dk = [0u8; 384 * K];
        keygen_cpa::<K, Sha3Oracles>(&d, 2, &mut ek, &mut dk).unwrap();

        let mut m = [0u8; 32];
        for (i, b) in m.iter_mut().enumerate() {
            *b = i as u8;
        }
        let r = [5u8; 32];
        let mut ct = [0u8; 32 * (10 * K + 4)];
        encrypt_cpa::<K, Sha3Oracles>(&ek, &m, &r, 2, 2, 10, 4, &mut ct).unwrap();

        let decrypted = decrypt_cpa::<K>(&dk, &ct, 10, 4).unwrap();
        assert_eq!(decrypted, m);
    }
}
