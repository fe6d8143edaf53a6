// Note that this package does not provide any constant-time assurances.
// However, this code fragment lays the groundwork should that change.

use dudect_bencher::{ctbench_main, BenchRng, Class, CtRunner};
use ml_kem_core::{Key, Sha3Oracles, Variant};
use rand_core::{CryptoRng, RngCore};

struct FixedRng(u8);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }
    fn next_u64(&mut self) -> u64 { unimplemented!() }
    fn fill_bytes(&mut self, out: &mut [u8]) { out.fill(self.0); }
    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(out);
        Ok(())
    }
}

impl CryptoRng for FixedRng {}

fn encaps(runner: &mut CtRunner, _rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let mut ek1 = Key::<Sha3Oracles>::new(Variant::MlKem512);
    ek1.generate_from_entropy(&mut FixedRng(1)).unwrap();
    let mut ek2 = Key::<Sha3Oracles>::new(Variant::MlKem512);
    ek2.generate_from_entropy(&mut FixedRng(2)).unwrap();

    let mut inputs = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(&ek1);
        classes.push(Class::Left);
    }
    for _ in 0..ITERATIONS_OUTER {
        inputs.push(&ek2);
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            let mut rng = FixedRng(3);
            let mut ct = [0u8; 768];
            for _ in 0..ITERATIONS_INNER {
                let _ = input.encapsulate_random(&mut rng, &mut ct);
            }
        })
    }
}

/// Compares decapsulation of a legitimate ciphertext against a tampered one,
/// which takes the implicit-rejection branch: both should run in the same time.
fn decaps(runner: &mut CtRunner, _rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let mut dk = Key::<Sha3Oracles>::new(Variant::MlKem512);
    dk.generate_from_entropy(&mut FixedRng(4)).unwrap();
    let mut ek_bytes = [0u8; 800];
    dk.encode_public_key(&mut ek_bytes).unwrap();
    let mut ek = Key::<Sha3Oracles>::new(Variant::MlKem512);
    ek.parse_public_key(&ek_bytes).unwrap();

    let mut good_ct = [0u8; 768];
    ek.encapsulate_random(&mut FixedRng(5), &mut good_ct).unwrap();
    let mut bad_ct = good_ct;
    bad_ct[0] ^= 0xff;

    let mut inputs = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(good_ct);
        classes.push(Class::Left);
    }
    for _ in 0..ITERATIONS_OUTER {
        inputs.push(bad_ct);
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ = dk.decapsulate(&input);
            }
        })
    }
}

ctbench_main!(encaps, decaps);

/*
See https://docs.rs/dudect-bencher/latest/dudect_bencher/

$ cargo run --release -- --continuous decaps
running 1 benchmark continuously
bench decaps seeded with 0x0cd3626e7d56f68c
bench decaps ... : n == +0.002M, max t = +7.38286, max tau = +0.18856, (5/tau)^2 = 703
bench decaps ... : n == +0.003M, max t = +11.21373, max tau = +0.19150, (5/tau)^2 = 681
bench decaps ... : n == +0.006M, max t = +38.99984, max tau = +0.50765, (5/tau)^2 = 97
bench decaps ... : n == +0.008M, max t = +29.45174, max tau = +0.33622, (5/tau)^2 = 221

*/
