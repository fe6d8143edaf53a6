// C2SP CCTV known-answer vectors for ML-KEM.
// https://github.com/C2SP/CCTV/tree/main/ML-KEM
//
// Vector files are not bundled with this crate; these tests are skipped
// if the corpus is not present on disk at the documented relative path.

use std::fs;
use std::io::Read;

use flate2::read::GzDecoder;
use hex::decode;
use ml_kem_core::{Key, Sha3Oracles, Variant};
use regex::Regex;

fn variant_info(variant: Variant) -> (usize, usize, usize) {
    match variant {
        Variant::MlKem512 => (800, 1632, 768),
        Variant::MlKem768 => (1184, 2400, 1088),
        Variant::MlKem1024 => (1568, 3168, 1568),
    }
}

fn capture_hex(data: &str, field: &str) -> Option<Vec<u8>> {
    let re = Regex::new(&format!(r"{field} = ([0-9a-fA-F]+)")).unwrap();
    Some(decode(re.captures(data)?.get(1)?.as_str()).unwrap())
}

#[allow(clippy::type_complexity)]
fn get_intermediate_vec(
    filename: &str,
) -> Option<(Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>)> {
    let data = fs::read_to_string(filename).ok()?;
    Some((
        capture_hex(&data, "d")?,
        capture_hex(&data, "z")?,
        capture_hex(&data, "ek")?,
        capture_hex(&data, "dk")?,
        capture_hex(&data, "m")?,
        capture_hex(&data, "K")?,
        capture_hex(&data, "c")?,
    ))
}

fn get_strcmp_vec(filename: &str) -> Option<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    let data = fs::read_to_string(filename).ok()?;
    Some((capture_hex(&data, "dk")?, capture_hex(&data, "K")?, capture_hex(&data, "c")?))
}

fn run_intermediate(variant: Variant, filename: &str) {
    let Some((d, z, ek_exp, dk_exp, m, k_exp, c_exp)) = get_intermediate_vec(filename) else {
        eprintln!("skipping {filename}: CCTV vector file not present");
        return;
    };
    let (ek_len, dk_len, ct_len) = variant_info(variant);

    let mut seed = [0u8; 64];
    seed[..32].copy_from_slice(&d);
    seed[32..].copy_from_slice(&z);
    let mut key = Key::<Sha3Oracles>::new(variant);
    key.generate_from_seed(&seed).unwrap();

    let mut ek_act = vec![0u8; ek_len];
    key.encode_public_key(&mut ek_act).unwrap();
    let mut dk_act = vec![0u8; dk_len];
    key.encode_private_key(&mut dk_act).unwrap();
    assert_eq!(ek_exp, ek_act);
    assert_eq!(dk_exp, dk_act);

    let mut m_arr = [0u8; 32];
    m_arr.copy_from_slice(&m);
    let mut c_act = vec![0u8; ct_len];
    let k1_act = key.encapsulate(&m_arr, &mut c_act).unwrap();
    assert_eq!(k_exp, k1_act.as_bytes());
    assert_eq!(c_exp, c_act);

    let (k2_act, result) = key.decapsulate(&c_act);
    result.unwrap();
    assert_eq!(k1_act, k2_act);
}

fn run_strcmp(variant: Variant, filename: &str) {
    let Some((dk_exp, k_exp, c_exp)) = get_strcmp_vec(filename) else {
        eprintln!("skipping {filename}: CCTV vector file not present");
        return;
    };
    let mut key = Key::<Sha3Oracles>::new(variant);
    key.parse_private_key(&dk_exp).unwrap();
    let (k_act, result) = key.decapsulate(&c_exp);
    result.unwrap();
    assert_eq!(k_exp, k_act.as_bytes());
}

fn run_modulus(variant: Variant, filename: &str) {
    let Ok(gz) = fs::read(filename) else {
        eprintln!("skipping {filename}: CCTV vector file not present");
        return;
    };
    let mut decoder = GzDecoder::new(&gz[..]);
    let mut s = String::new();
    decoder.read_to_string(&mut s).unwrap();
    for line in s.lines() {
        let ek_bytes = decode(line).unwrap();
        let mut key = Key::<Sha3Oracles>::new(variant);
        assert!(key.parse_public_key(&ek_bytes).is_err());
    }
}

#[test]
fn test_intermediate_512() {
    run_intermediate(Variant::MlKem512, "./tests/cctv_vectors/ML-KEM/intermediate/ML-KEM-512.txt");
}

#[test]
fn test_intermediate_768() {
    run_intermediate(Variant::MlKem768, "./tests/cctv_vectors/ML-KEM/intermediate/ML-KEM-768.txt");
}

#[test]
fn test_intermediate_1024() {
    run_intermediate(Variant::MlKem1024, "./tests/cctv_vectors/ML-KEM/intermediate/ML-KEM-1024.txt");
}

#[test]
fn test_strcmp_512() {
    run_strcmp(Variant::MlKem512, "./tests/cctv_vectors/ML-KEM/strcmp/ML-KEM-512.txt");
}

#[test]
fn test_strcmp_768() {
    run_strcmp(Variant::MlKem768, "./tests/cctv_vectors/ML-KEM/strcmp/ML-KEM-768.txt");
}

#[test]
fn test_strcmp_1024() {
    run_strcmp(Variant::MlKem1024, "./tests/cctv_vectors/ML-KEM/strcmp/ML-KEM-1024.txt");
}

#[test]
fn test_unlucky_512() {
    run_intermediate(Variant::MlKem512, "./tests/cctv_vectors/ML-KEM/unluckysample/ML-KEM-512.txt");
}

#[test]
fn test_unlucky_768() {
    run_intermediate(Variant::MlKem768, "./tests/cctv_vectors/ML-KEM/unluckysample/ML-KEM-768.txt");
}

#[test]
fn test_unlucky_1024() {
    run_intermediate(Variant::MlKem1024, "./tests/cctv_vectors/ML-KEM/unluckysample/ML-KEM-1024.txt");
}

#[test]
fn test_modulus_512() {
    run_modulus(Variant::MlKem512, "./tests/cctv_vectors/ML-KEM/modulus/ML-KEM-512.txt.gz");
}

#[test]
fn test_modulus_768() {
    run_modulus(Variant::MlKem768, "./tests/cctv_vectors/ML-KEM/modulus/ML-KEM-768.txt.gz");
}

#[test]
fn test_modulus_1024() {
    run_modulus(Variant::MlKem1024, "./tests/cctv_vectors/ML-KEM/modulus/ML-KEM-1024.txt.gz");
}
