use ml_kem_core::{Key, Sha3Oracles, Variant};
use rand_chacha::rand_core::SeedableRng;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn run(seed: &str) -> String {
    let seed = seed.parse();
    if seed.is_err() { return "Unable to parse number".to_string(); };
    let seed: u64 = seed.unwrap();

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);

    // Alice runs keygen and then serializes the encaps key `ek` for Bob (to bytes).
    let mut alice = Key::<Sha3Oracles>::new(Variant::MlKem512);
    if alice.generate_from_entropy(&mut rng).is_err() { return "keygen failed".to_string(); };
    let mut alice_ek_bytes = [0u8; 800];
    alice.encode_public_key(&mut alice_ek_bytes).expect("ek ser failed");

    // Alice sends the encaps key `ek_bytes` to Bob.
    let bob_ek_bytes = alice_ek_bytes;

    // Bob deserializes the encaps `ek_bytes` and then encapsulates to get the shared
    // secret `ssk` and ciphertext `ct`. He serializes the ciphertext `ct` for Alice (to bytes).
    let mut bob = Key::<Sha3Oracles>::new(Variant::MlKem512);
    bob.parse_public_key(&bob_ek_bytes).expect("ek deser failed");
    let mut bob_ct_bytes = [0u8; 768];
    let bob_ssk = bob.encapsulate_random(&mut rng, &mut bob_ct_bytes).expect("encaps failed");

    // Bob sends the ciphertext `ct_bytes` to Alice.
    let alice_ct_bytes = bob_ct_bytes;

    // Alice decapsulates the ciphertext with her private material.
    let mut alice_dk_bytes = [0u8; 1632];
    alice.encode_private_key(&mut alice_dk_bytes).expect("dk ser failed");
    let (alice_ssk, result) = alice.decapsulate(&alice_ct_bytes);
    result.expect("decaps failed");

    // Alice and Bob will now have the same secret key.
    assert_eq!(bob_ssk.as_bytes(), alice_ssk.as_bytes(), "shared secret not identical");

    let ek_hex = hex::encode(bob_ek_bytes);
    let ct_hex = hex::encode(alice_ct_bytes);
    let dk_hex = hex::encode(alice_dk_bytes);
    let ssk_hex = hex::encode(alice_ssk.as_bytes());

    let s0 = format!("The seed used to generate the keys is: {}\n\n", seed);
    let s1 = format!("The generated encaps key is: {}\n", ek_hex);
    let s2 = format!("The generated decaps key is: {}\n\n", dk_hex);
    let s3 = format!("The generated ciphertext is: {}\n", ct_hex);
    let s4 = format!("The shared secret is: {}\n", ssk_hex);
    let s5 = "Alice and Bob have an identical shared secret.";  // because the above assert! passed

    (s0 + &s1 + &s2 + &s3 + &s4 + &s5).into()
}
