//! A thin `extern "C"` facade over `ml-kem-core`, one set of entry points
//! per variant, using fixed-size byte-array output parameters and `u8`
//! status codes rather than `Result` so the ABI is stable across languages.
//!
//! Status codes: `0` success, `1` invalid length, `2` invalid encoding,
//! `3` immutable key, `4` allocation failure, `5` oracle failure.

use ml_kem_core::{Error, Key, Sha3Oracles, Variant};
use rand_core::OsRng;

fn status_of(err: Error) -> u8 {
    match err {
        Error::InvalidLength => 1,
        Error::InvalidEncoding => 2,
        Error::ImmutableKey => 3,
        Error::AllocationFailure => 4,
        Error::OracleFailure => 5,
    }
}

macro_rules! variant_ffi {
    ($module:ident, $keygen_fn:ident, $encaps_fn:ident, $decaps_fn:ident, $variant:expr, $ek_len:expr, $dk_len:expr, $ct_len:expr) => {
        /// cbindgen:ignore
        pub mod $module {
            use super::{status_of, Key, Sha3Oracles, Variant, OsRng};

            /// Length in bytes of an encapsulation key for this variant.
            pub const EK_LEN: usize = $ek_len;
            /// Length in bytes of a decapsulation key for this variant.
            pub const DK_LEN: usize = $dk_len;
            /// Length in bytes of a ciphertext for this variant.
            pub const CT_LEN: usize = $ct_len;
            /// Length in bytes of a shared secret.
            pub const SSK_LEN: usize = 32;

            /// Generate a fresh key pair from OS entropy.
            ///
            /// # Safety
            /// `ek_out` must point to `EK_LEN` writable bytes and `dk_out`
            /// to `DK_LEN` writable bytes.
            #[no_mangle]
            pub unsafe extern "C" fn $keygen_fn(ek_out: *mut u8, dk_out: *mut u8) -> u8 {
                let mut key = Key::<Sha3Oracles>::new($variant);
                let mut rng = OsRng;
                if let Err(e) = key.generate_from_entropy(&mut rng) {
                    return status_of(e);
                }
                let ek = core::slice::from_raw_parts_mut(ek_out, EK_LEN);
                let dk = core::slice::from_raw_parts_mut(dk_out, DK_LEN);
                if let Err(e) = key.encode_public_key(ek) {
                    return status_of(e);
                }
                if let Err(e) = key.encode_private_key(dk) {
                    return status_of(e);
                }
                0
            }

            /// Encapsulate against `ek_in`, writing the ciphertext to `ct_out`
            /// and the shared secret to `ssk_out`.
            ///
            /// # Safety
            /// `ek_in` must point to `EK_LEN` readable bytes; `ct_out` to
            /// `CT_LEN` writable bytes; `ssk_out` to `SSK_LEN` writable bytes.
            #[no_mangle]
            pub unsafe extern "C" fn $encaps_fn(
                ek_in: *const u8,
                ct_out: *mut u8,
                ssk_out: *mut u8,
            ) -> u8 {
                let ek = core::slice::from_raw_parts(ek_in, EK_LEN);
                let mut key = Key::<Sha3Oracles>::new($variant);
                if let Err(e) = key.parse_public_key(ek) {
                    return status_of(e);
                }
                let ct = core::slice::from_raw_parts_mut(ct_out, CT_LEN);
                let mut rng = OsRng;
                match key.encapsulate_random(&mut rng, ct) {
                    Ok(ssk) => {
                        let out = core::slice::from_raw_parts_mut(ssk_out, SSK_LEN);
                        out.copy_from_slice(ssk.as_bytes());
                        0
                    }
                    Err(e) => status_of(e),
                }
            }

            /// Decapsulate `ct_in` using `dk_in`, writing the shared secret to
            /// `ssk_out`. The secret is always populated, even on a non-zero
            /// return, matching the core crate's implicit-rejection contract.
            ///
            /// # Safety
            /// `dk_in` must point to `DK_LEN` readable bytes; `ct_in` to
            /// `CT_LEN` readable bytes; `ssk_out` to `SSK_LEN` writable bytes.
            #[no_mangle]
            pub unsafe extern "C" fn $decaps_fn(
                dk_in: *const u8,
                ct_in: *const u8,
                ssk_out: *mut u8,
            ) -> u8 {
                let dk = core::slice::from_raw_parts(dk_in, DK_LEN);
                let ct = core::slice::from_raw_parts(ct_in, CT_LEN);
                let mut key = Key::<Sha3Oracles>::new($variant);
                if let Err(e) = key.parse_private_key(dk) {
                    let out = core::slice::from_raw_parts_mut(ssk_out, SSK_LEN);
                    out.fill(0);
                    return status_of(e);
                }
                let (ssk, result) = key.decapsulate(ct);
                let out = core::slice::from_raw_parts_mut(ssk_out, SSK_LEN);
                out.copy_from_slice(ssk.as_bytes());
                result.err().map_or(0, status_of)
            }
        }
    };
}

variant_ffi!(
    ml_kem_512,
    ml_kem_512_keygen,
    ml_kem_512_encapsulate,
    ml_kem_512_decapsulate,
    Variant::MlKem512,
    800,
    1632,
    768
);
variant_ffi!(
    ml_kem_768,
    ml_kem_768_keygen,
    ml_kem_768_encapsulate,
    ml_kem_768_decapsulate,
    Variant::MlKem768,
    1184,
    2400,
    1088
);
variant_ffi!(
    ml_kem_1024,
    ml_kem_1024_keygen,
    ml_kem_1024_encapsulate,
    ml_kem_1024_decapsulate,
    Variant::MlKem1024,
    1568,
    3168,
    1568
);
