#![no_main]

use libfuzzer_sys::fuzz_target;
use ml_kem_core::{Key, Sha3Oracles, Variant};
use rand_core::{CryptoRng, RngCore};

const SEED_SIZE: usize = 64;
const ENTROPY_SIZE: usize = 32;
const EK_LEN: usize = 800;
const DK_LEN: usize = 1632;
const CT_LEN: usize = 768;

struct TestRng {
    data: Vec<Vec<u8>>,
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, out: &mut [u8]) {
        let x = self.data.pop().expect("TestRng problem");
        out.copy_from_slice(&x)
    }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(out);
        Ok(()) // panic on probs is OK
    }
}

impl CryptoRng for TestRng {}

impl TestRng {
    fn new() -> Self { TestRng { data: Vec::new() } }

    fn push(&mut self, new_data: &[u8]) {
        let x = new_data.to_vec();
        self.data.push(x);
    }
}

fuzz_target!(|data: [u8; 3328]| {
    let mut rng = TestRng::new();
    let mut start = 0;
    rng.push(&data[start..start + SEED_SIZE]);
    start += SEED_SIZE;

    let mut key1 = Key::<Sha3Oracles>::new(Variant::MlKem512);
    key1.generate_from_entropy(&mut rng).unwrap(); // only rng can fail, which it won't

    let ek2_bytes = &data[start..start + EK_LEN];
    start += EK_LEN;
    let mut key2 = Key::<Sha3Oracles>::new(Variant::MlKem512);
    let ek2_ok = key2.parse_public_key(ek2_bytes).is_ok();

    rng.push(&data[start..start + ENTROPY_SIZE]);
    start += ENTROPY_SIZE;
    rng.push(&data[start..start + ENTROPY_SIZE]);
    start += ENTROPY_SIZE;

    let mut ct_scratch = [0u8; CT_LEN];
    if ek2_ok {
        let _res = key2.encapsulate_random(&mut rng, &mut ct_scratch);
    }
    let _res = key1.encapsulate_random(&mut rng, &mut ct_scratch);

    let dk2_bytes = &data[start..start + DK_LEN];
    start += DK_LEN;
    let mut key3 = Key::<Sha3Oracles>::new(Variant::MlKem512);
    let dk2_ok = key3.parse_private_key(dk2_bytes).is_ok();

    let ct_bytes = &data[start..start + CT_LEN];
    start += CT_LEN;

    if dk2_ok {
        let _res = key3.decapsulate(ct_bytes);
    }
    let _res = key1.decapsulate(ct_bytes);

    assert_eq!(start, data.len()); // this doesn't appear to trigger (even when wrong)
});
