//! The runtime-polymorphic key object and its external interface (component I).

use core::marker::PhantomData;

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::error::{ensure, Error};
use crate::ml_kem::{decaps_internal, encaps_internal, keygen_internal};
use crate::oracles::Oracles;
use crate::params::ML_KEM_1024;
use crate::{Sha3Oracles, SharedSecretKey, Variant, SEED_LEN, SSK_LEN};

const MAX_EK_LEN: usize = ML_KEM_1024.ek_len;
const MAX_DK_LEN: usize = ML_KEM_1024.dk_len;

/// What a [`Key::duplicate`] call should carry over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicateScope {
    /// Copy only the public material, if any is installed.
    PublicOnly,
    /// Copy whatever material (public or private) is installed.
    Full,
}

#[derive(Clone)]
enum KeyMaterial {
    Empty,
    Public { ek: [u8; MAX_EK_LEN] },
    Private { dk: [u8; MAX_DK_LEN] },
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        if let KeyMaterial::Private { dk } = self {
            dk.zeroize();
        }
    }
}

/// An ML-KEM key bound to one [`Variant`], generic over the oracle set `O`
/// that supplies its hash and XOF primitives (`Sha3Oracles` by default).
///
/// A freshly constructed `Key` carries no material (`Key::new`); exactly one
/// of `parse_public_key`, `parse_private_key`, `generate_from_seed`, or
/// `generate_from_entropy` installs it, after which further install attempts
/// return `Error::ImmutableKey`.
pub struct Key<O: Oracles = Sha3Oracles> {
    variant: Variant,
    material: KeyMaterial,
    _oracles: PhantomData<O>,
}

impl<O: Oracles> Key<O> {
    /// Construct an empty key bound to `variant`.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self { variant, material: KeyMaterial::Empty, _oracles: PhantomData }
    }

    /// The variant this key is bound to.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Copy this key's material according to `scope`.
    #[must_use]
    pub fn duplicate(&self, scope: DuplicateScope) -> Self {
        let material = match (&self.material, scope) {
            (KeyMaterial::Empty, _) => KeyMaterial::Empty,
            (KeyMaterial::Public { ek }, _) => KeyMaterial::Public { ek: *ek },
            (KeyMaterial::Private { .. }, DuplicateScope::PublicOnly) => {
                let mut ek = [0u8; MAX_EK_LEN];
                let _ = self.encode_public_key_into(&mut ek);
                KeyMaterial::Public { ek }
            }
            (KeyMaterial::Private { dk }, DuplicateScope::Full) => {
                KeyMaterial::Private { dk: *dk }
            }
        };
        Self { variant: self.variant, material, _oracles: PhantomData }
    }

    fn ek_len(&self) -> usize {
        self.variant.param_set().ek_len
    }

    fn dk_len(&self) -> usize {
        self.variant.param_set().dk_len
    }

    fn ct_len(&self) -> usize {
        self.variant.param_set().ct_len
    }

    /// Install public material parsed from `bytes`.
    ///
    /// `bytes` must be exactly `ek_len` for this key's variant.
    pub fn parse_public_key(&mut self, bytes: &[u8]) -> Result<(), Error> {
        ensure!(matches!(self.material, KeyMaterial::Empty), Error::ImmutableKey);
        ensure!(bytes.len() == self.ek_len(), Error::InvalidLength);
        // Validate the embedded polynomial vector decodes cleanly (spec.md §4.D modulus check).
        dispatch_validate_ek(self.variant, bytes)?;
        let mut ek = [0u8; MAX_EK_LEN];
        ek[..bytes.len()].copy_from_slice(bytes);
        self.material = KeyMaterial::Public { ek };
        Ok(())
    }

    /// Install private material parsed from `bytes`.
    ///
    /// `bytes` must be exactly `dk_len` for this key's variant. The embedded
    /// `s` vector must decode cleanly (every 12-bit field `< q`) and the
    /// embedded `pkhash` must match `H` of the embedded `ek` bytes, or this
    /// returns `Error::InvalidEncoding` without installing anything.
    pub fn parse_private_key(&mut self, bytes: &[u8]) -> Result<(), Error> {
        ensure!(matches!(self.material, KeyMaterial::Empty), Error::ImmutableKey);
        ensure!(bytes.len() == self.dk_len(), Error::InvalidLength);
        dispatch_validate_dk::<O>(self.variant, bytes)?;
        let mut dk = [0u8; MAX_DK_LEN];
        dk[..bytes.len()].copy_from_slice(bytes);
        self.material = KeyMaterial::Private { dk };
        Ok(())
    }

    /// Serialize the public key into `out` (must be exactly `ek_len` bytes).
    pub fn encode_public_key(&self, out: &mut [u8]) -> Result<(), Error> {
        ensure!(out.len() == self.ek_len(), Error::InvalidLength);
        let len = self.encode_public_key_into(out)?;
        debug_assert_eq!(len, out.len());
        Ok(())
    }

    fn encode_public_key_into(&self, out: &mut [u8]) -> Result<usize, Error> {
        let ek_len = self.ek_len();
        ensure!(out.len() >= ek_len, Error::InvalidLength);
        match &self.material {
            KeyMaterial::Public { ek } => out[..ek_len].copy_from_slice(&ek[..ek_len]),
            KeyMaterial::Private { dk } => {
                let dk_pke_len = 384 * self.variant.param_set().k;
                out[..ek_len].copy_from_slice(&dk[dk_pke_len..dk_pke_len + ek_len]);
            }
            KeyMaterial::Empty => return Err(Error::InvalidLength),
        }
        Ok(ek_len)
    }

    /// Serialize the private key into `out` (must be exactly `dk_len` bytes).
    pub fn encode_private_key(&self, out: &mut [u8]) -> Result<(), Error> {
        let dk_len = self.dk_len();
        ensure!(out.len() == dk_len, Error::InvalidLength);
        match &self.material {
            KeyMaterial::Private { dk } => out.copy_from_slice(&dk[..dk_len]),
            _ => return Err(Error::InvalidLength),
        }
        Ok(())
    }

    /// Deterministically derive a key pair from a 64-byte seed (`d || z`)
    /// and install the private material on this key.
    pub fn generate_from_seed(&mut self, seed: &[u8; SEED_LEN]) -> Result<(), Error> {
        ensure!(matches!(self.material, KeyMaterial::Empty), Error::ImmutableKey);
        let mut d = [0u8; 32];
        let mut z = [0u8; 32];
        d.copy_from_slice(&seed[..32]);
        z.copy_from_slice(&seed[32..]);

        let ek_len = self.ek_len();
        let dk_len = self.dk_len();
        let mut ek = [0u8; MAX_EK_LEN];
        let mut dk = [0u8; MAX_DK_LEN];
        dispatch_keygen::<O>(self.variant, &d, &z, &mut ek[..ek_len], &mut dk[..dk_len])?;
        self.material = KeyMaterial::Private { dk };
        Ok(())
    }

    /// Draw fresh randomness from `rng` and generate a key pair.
    pub fn generate_from_entropy(&mut self, rng: &mut impl CryptoRngCore) -> Result<(), Error> {
        let mut seed = [0u8; SEED_LEN];
        rng.try_fill_bytes(&mut seed).map_err(|_| Error::AllocationFailure)?;
        self.generate_from_seed(&seed)
    }

    /// Encapsulate against this key's public material using caller-supplied
    /// entropy, writing the ciphertext into `out_ct` (must be exactly `ct_len`).
    pub fn encapsulate(
        &self,
        entropy: &[u8; 32],
        out_ct: &mut [u8],
    ) -> Result<SharedSecretKey, Error> {
        ensure!(out_ct.len() == self.ct_len(), Error::InvalidLength);
        let ek = self.public_bytes()?;
        let shared = dispatch_encaps::<O>(self.variant, ek, entropy, out_ct)?;
        Ok(SharedSecretKey::new(shared))
    }

    /// Draw entropy from `rng` and encapsulate.
    pub fn encapsulate_random(
        &self,
        rng: &mut impl CryptoRngCore,
        out_ct: &mut [u8],
    ) -> Result<SharedSecretKey, Error> {
        let mut entropy = [0u8; 32];
        rng.try_fill_bytes(&mut entropy).map_err(|_| Error::AllocationFailure)?;
        self.encapsulate(&entropy, out_ct)
    }

    /// Decapsulate `ct` using this key's private material.
    ///
    /// Always returns a populated [`SharedSecretKey`]: on a length or
    /// structural error the returned secret is independent pseudorandom
    /// output (never the caller's data), paired with `Err`. On a successful
    /// parse but a failed re-encryption check, implicit rejection already
    /// handles substituting a pseudorandom secret and this returns `Ok`.
    pub fn decapsulate(&self, ct: &[u8]) -> (SharedSecretKey, Result<(), Error>) {
        let dk = match &self.material {
            KeyMaterial::Private { dk } => &dk[..self.dk_len()],
            _ => {
                let fallback = O::h(ct);
                return (SharedSecretKey::new(fallback), Err(Error::InvalidLength));
            }
        };
        if ct.len() != self.ct_len() {
            let fallback = O::h(ct);
            return (SharedSecretKey::new(fallback), Err(Error::InvalidLength));
        }
        match dispatch_decaps::<O>(self.variant, dk, ct) {
            Ok(shared) => (SharedSecretKey::new(shared), Ok(())),
            Err(e) => (SharedSecretKey::new(O::h(ct)), Err(e)),
        }
    }

    /// Constant-time comparison of the public material of two keys of the
    /// same variant. Returns `false` for any length mismatch or missing material.
    #[must_use]
    pub fn compare_public_keys(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        if self.variant != other.variant {
            return false;
        }
        let mut a = [0u8; MAX_EK_LEN];
        let mut b = [0u8; MAX_EK_LEN];
        let ek_len = self.ek_len();
        let (Ok(_), Ok(_)) = (
            self.encode_public_key_into(&mut a),
            other.encode_public_key_into(&mut b),
        ) else {
            return false;
        };
        a[..ek_len].ct_eq(&b[..ek_len]).into()
    }

    fn public_bytes(&self) -> Result<&[u8], Error> {
        match &self.material {
            KeyMaterial::Public { ek } => Ok(&ek[..self.ek_len()]),
            KeyMaterial::Private { dk } => {
                let dk_pke_len = 384 * self.variant.param_set().k;
                let ek_len = self.ek_len();
                Ok(&dk[dk_pke_len..dk_pke_len + ek_len])
            }
            KeyMaterial::Empty => Err(Error::InvalidLength),
        }
    }
}

fn dispatch_validate_ek(variant: Variant, bytes: &[u8]) -> Result<(), Error> {
    // Decoding through vector_byte_decode already performs the d=12 modulus
    // check; run it once here so parse_public_key rejects bad input eagerly.
    // `bytes` is the full ek (t_hat encoding || rho); only the t_hat prefix
    // is a ByteDecode_12 input.
    let k = variant.param_set().k;
    let prefix = &bytes[..384 * k];
    match variant {
        Variant::MlKem512 => crate::vector::vector_byte_decode::<2>(12, prefix).map(|_| ()),
        Variant::MlKem768 => crate::vector::vector_byte_decode::<3>(12, prefix).map(|_| ()),
        Variant::MlKem1024 => crate::vector::vector_byte_decode::<4>(12, prefix).map(|_| ()),
    }
}

/// Validate a `dk` buffer before it is installed: the embedded `s` vector
/// must decode cleanly, and `H` of the embedded `ek` bytes must match the
/// embedded pkhash field byte-for-byte.
fn dispatch_validate_dk<O: Oracles>(variant: Variant, bytes: &[u8]) -> Result<(), Error> {
    let k = variant.param_set().k;
    let dk_pke_len = 384 * k;
    let ek_len = 384 * k + 32;
    let s_prefix = &bytes[..dk_pke_len];
    match variant {
        Variant::MlKem512 => crate::vector::vector_byte_decode::<2>(12, s_prefix).map(|_| ())?,
        Variant::MlKem768 => crate::vector::vector_byte_decode::<3>(12, s_prefix).map(|_| ())?,
        Variant::MlKem1024 => crate::vector::vector_byte_decode::<4>(12, s_prefix).map(|_| ())?,
    }
    let ek_bytes = &bytes[dk_pke_len..dk_pke_len + ek_len];
    let stored_hash = &bytes[dk_pke_len + ek_len..dk_pke_len + ek_len + 32];
    let computed_hash = O::h(ek_bytes);
    ensure!(&computed_hash[..] == stored_hash, Error::InvalidEncoding);
    Ok(())
}

fn dispatch_keygen<O: Oracles>(
    variant: Variant,
    d: &[u8; 32],
    z: &[u8; 32],
    ek: &mut [u8],
    dk: &mut [u8],
) -> Result<(), Error> {
    let p = variant.param_set();
    match variant {
        Variant::MlKem512 => keygen_internal::<2, O>(d, z, p.eta1, ek, dk),
        Variant::MlKem768 => keygen_internal::<3, O>(d, z, p.eta1, ek, dk),
        Variant::MlKem1024 => keygen_internal::<4, O>(d, z, p.eta1, ek, dk),
    }
}

fn dispatch_encaps<O: Oracles>(
    variant: Variant,
    ek: &[u8],
    m: &[u8; 32],
    ct: &mut [u8],
) -> Result<[u8; SSK_LEN], Error> {
    let p = variant.param_set();
    match variant {
        Variant::MlKem512 => encaps_internal::<2, O>(ek, m, p.eta1, crate::params::ETA2, p.du, p.dv, ct),
        Variant::MlKem768 => encaps_internal::<3, O>(ek, m, p.eta1, crate::params::ETA2, p.du, p.dv, ct),
        Variant::MlKem1024 => encaps_internal::<4, O>(ek, m, p.eta1, crate::params::ETA2, p.du, p.dv, ct),
    }
}

fn dispatch_decaps<O: Oracles>(variant: Variant, dk: &[u8], ct: &[u8]) -> Result<[u8; SSK_LEN], Error> {
    let p = variant.param_set();
    match variant {
        Variant::MlKem512 => decaps_internal::<2, O>(dk, ct, p.eta1, crate::params::ETA2, p.du, p.dv),
        Variant::MlKem768 => decaps_internal::<3, O>(dk, ct, p.eta1, crate::params::ETA2, p.du, p.dv),
        Variant::MlKem1024 => decaps_internal::<4, O>(dk, ct, p.eta1, crate::params::ETA2, p.du, p.dv),
    }
}
