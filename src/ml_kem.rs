//! ML-KEM: the Fujisaki-Okamoto wrapper around K-PKE (component H).
//!
//! `keygen_internal`/`encaps_internal`/`decaps_internal` take already-drawn
//! randomness (`d`, `z`, `m`) so the RNG boundary lives entirely in
//! `key.rs`, matching `spec.md` §6's separation of "internal" (deterministic,
//! testable) from "external" (RNG-drawing) operations.

use crate::error::{ensure, Error};
use crate::k_pke::{decrypt_cpa, encrypt_cpa, keygen_cpa};
use crate::oracles::Oracles;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// `ML-KEM.KeyGen_internal(d, z)`.
///
/// `ek_out` must be `384*K + 32` bytes; `dk_out` must be `768*K + 96` bytes
/// (`dk_pke || ek || H(ek) || z`, `spec.md` §3's `dk` layout).
pub(crate) fn keygen_internal<const K: usize, O: Oracles>(
    d: &[u8; 32],
    z: &[u8; 32],
    eta1: u32,
    ek_out: &mut [u8],
    dk_out: &mut [u8],
) -> Result<(), Error> {
    let ek_len = 384 * K + 32;
    let dk_pke_len = 384 * K;
    ensure!(ek_out.len() == ek_len, Error::InvalidLength);
    ensure!(dk_out.len() == 768 * K + 96, Error::InvalidLength);

    keygen_cpa::<K, O>(d, eta1, ek_out, &mut dk_out[..dk_pke_len])?;

    let ek_hash = O::h(ek_out);
    dk_out[dk_pke_len..dk_pke_len + ek_len].copy_from_slice(ek_out);
    dk_out[dk_pke_len + ek_len..dk_pke_len + ek_len + 32].copy_from_slice(&ek_hash);
    dk_out[dk_pke_len + ek_len + 32..].copy_from_slice(z);
    Ok(())
}

/// `ML-KEM.Encaps_internal(ek, m)`, returning the 32-byte shared secret.
///
/// `ct_out` must be `32*(du*K + dv)` bytes.
pub(crate) fn encaps_internal<const K: usize, O: Oracles>(
    ek: &[u8],
    m: &[u8; 32],
    eta1: u32,
    eta2: u32,
    du: u32,
    dv: u32,
    ct_out: &mut [u8],
) -> Result<[u8; 32], Error> {
    ensure!(ek.len() == 384 * K + 32, Error::InvalidLength);

    let ek_hash = O::h(ek);
    let mut g_input = [0u8; 64];
    g_input[..32].copy_from_slice(m);
    g_input[32..].copy_from_slice(&ek_hash);
    let (shared_secret, r) = O::g(&g_input);

    encrypt_cpa::<K, O>(ek, m, &r, eta1, eta2, du, dv, ct_out)?;
    Ok(shared_secret)
}

/// `ML-KEM.Decaps_internal(dk, c)`, returning the 32-byte shared secret with
/// implicit rejection (`spec.md` §4.H): on re-encryption mismatch, the
/// returned value is `J(z || c)` instead of the decrypted secret, and the
/// choice between the two is made without a data-dependent branch.
pub(crate) fn decaps_internal<const K: usize, O: Oracles>(
    dk: &[u8],
    ciphertext: &[u8],
    eta1: u32,
    eta2: u32,
    du: u32,
    dv: u32,
) -> Result<[u8; 32], Error> {
    let dk_pke_len = 384 * K;
    let ek_len = 384 * K + 32;
    ensure!(dk.len() == 768 * K + 96, Error::InvalidLength);

    let dk_pke = &dk[..dk_pke_len];
    let ek_pke = &dk[dk_pke_len..dk_pke_len + ek_len];
    let h = &dk[dk_pke_len + ek_len..dk_pke_len + ek_len + 32];
    let z = &dk[dk_pke_len + ek_len + 32..];

    let m_prime = decrypt_cpa::<K>(dk_pke, ciphertext, du, dv)?;

    let mut g_input = [0u8; 64];
    g_input[..32].copy_from_slice(&m_prime);
    g_input[32..].copy_from_slice(h);
    let (k_prime, r_prime) = O::g(&g_input);

    let mut j_input = [0u8; 32 + crate::params::MAX_CT_LEN];
    let j_input = &mut j_input[..32 + ciphertext.len()];
    j_input[..32].copy_from_slice(z);
    j_input[32..].copy_from_slice(ciphertext);
    let k_bar = O::j(j_input);

    let mut reencrypted = [0u8; crate::params::MAX_CT_LEN];
    let reencrypted = &mut reencrypted[..ciphertext.len()];
    encrypt_cpa::<K, O>(ek_pke, &m_prime, &r_prime, eta1, eta2, du, dv, reencrypted)?;

    let matches: Choice = ciphertext.ct_eq(reencrypted);
    let mut result = [0u8; 32];
    for i in 0..32 {
        result[i] = u8::conditional_select(&k_bar[i], &k_prime[i], matches);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::{decaps_internal, encaps_internal, keygen_internal};
    use crate::oracles::Sha3Oracles;

    #[test]
    fn keygen_encaps_decaps_round_trip_k2() {
        const K: usize = 2;
        let d = [11u8; 32];
        let z = [22u8; 32];
        let mut ek = [0u8; 384 * K + 32];
        let mut dk = [0u8; 768 * K + 96];
        keygen_internal::<K, Sha3Oracles>(&d, &z, 3, &mut ek, &mut dk).unwrap();

        let m = [33u8; 32];
        let mut ct = [0u8; 32 * (10 * K + 4)];
        let shared_a = encaps_internal::<K, Sha3Oracles>(&ek, &m, 3, 2, 10, 4, &mut ct).unwrap();

        let shared_b = decaps_internal::<K, Sha3Oracles>(&dk, &ct, 3, 2, 10, 4).unwrap();
        assert_eq!(shared_a, shared_b);
    }

    #[test]
    fn decaps_rejects_corrupted_ciphertext_without_erroring() {
        const K: usize = 2;
        let d = [44u8; 32];
        let z = [55u8; 32];
        let mut ek = [0u8; 384 * K + 32];
        let mut dk = [0u8; 768 * K + 96];
        keygen_internal::<K, Sha3Oracles>(&d, &z, 3, &mut ek, &mut dk).unwrap();

        let m = [66u8; 32];
        let mut ct = [0u8; 32 * (10 * K + 4)];
        let shared_a = encaps_internal::<K, Sha3Oracles>(&ek, &m, 3, 2, 10, 4, &mut ct).unwrap();

        ct[0] ^= 0xff;
        let shared_b = decaps_internal::<K, Sha3Oracles>(&dk, &ct, 3, 2, 10, 4).unwrap();
        assert_ne!(shared_a, shared_b);
    }
}
