//! Statistical properties of the fuzzy extractor: noise tolerance,
//! false-accept rate, and helper-data integrity.
//!
//! These run many randomized trials with a seeded RNG so failures are
//! reproducible. The configs use a small Hamming budget to keep slot
//! counts (and runtime) moderate.

use facekey_core::BinaryTemplate;
use facekey_extractor::{
    ExtractorConfig, ExtractorError, ExtractorOptions, FuzzyExtractor, HelperBundle,
};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const TRIALS: usize = 1000;

fn random_template(rng: &mut StdRng, len: usize) -> BinaryTemplate {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    BinaryTemplate::from_bytes(bytes)
}

/// Flip exactly `flips` distinct bit positions.
fn perturb(template: &BinaryTemplate, flips: usize, rng: &mut StdRng) -> BinaryTemplate {
    let bits = template.len() * 8;
    let mut noisy = template.clone();
    let mut chosen = Vec::with_capacity(flips);
    while chosen.len() < flips {
        let bit = rng.gen_range(0..bits);
        if !chosen.contains(&bit) {
            chosen.push(bit);
            noisy.flip_bit(bit);
        }
    }
    noisy
}

fn statistics_config() -> ExtractorConfig {
    // 56 slots; per-trial failure odds for 2 flips are (3/4)^56 ≈ 1e-7
    ExtractorConfig::with_options(
        16,
        2,
        ExtractorOptions {
            rep_err: 1e-2,
            ..Default::default()
        },
    )
    .unwrap()
}

#[test]
fn test_noise_tolerance_meets_rep_err() {
    let config = statistics_config();
    let extractor = FuzzyExtractor::new(config);
    let mut rng = StdRng::seed_from_u64(0xFACE);

    let mut successes = 0usize;
    for _ in 0..TRIALS {
        let template = random_template(&mut rng, config.len());
        let (key, bundle) = extractor.generate(&template, &mut rng).unwrap();

        let noisy = perturb(&template, config.ham_err(), &mut rng);
        if let Ok(recovered) = extractor.reproduce(&noisy, &bundle) {
            if recovered == key {
                successes += 1;
            }
        }
    }

    // Target is ≥ 1 - rep_err; leave a small statistical margin on top
    let required = ((1.0 - config.rep_err() - 0.005) * TRIALS as f64) as usize;
    assert!(
        successes >= required,
        "only {}/{} noisy probes recovered the key (need ≥ {})",
        successes,
        TRIALS,
        required
    );
}

#[test]
fn test_false_accept_rate_bounded() {
    let config = statistics_config();
    let extractor = FuzzyExtractor::new(config);
    let mut rng = StdRng::seed_from_u64(0xDEAD);

    let mut accepts = 0usize;
    for _ in 0..TRIALS {
        let enrolled = random_template(&mut rng, config.len());
        let (_, bundle) = extractor.generate(&enrolled, &mut rng).unwrap();

        let stranger = random_template(&mut rng, config.len());
        if extractor.reproduce(&stranger, &bundle).is_ok() {
            accepts += 1;
        }
    }

    // Union bound: num_helpers * 2^-(8 * sec_len) per trial. With 56
    // slots and a 2-byte checksum that is ~8.5e-4, under one expected
    // accept per 1000 trials. Ten is far outside any plausible noise.
    let expected = config.num_helpers() as f64 / f64::from(1u32 << (8 * config.sec_len() as u32))
        * TRIALS as f64;
    assert!(expected < 1.0, "test parameters drifted: expected {}", expected);
    assert!(
        accepts <= 10,
        "{} false accepts in {} trials (expected ~{:.2})",
        accepts,
        TRIALS,
        expected
    );
}

#[test]
fn test_reproduce_deterministic_across_calls() {
    let config = statistics_config();
    let extractor = FuzzyExtractor::new(config);
    let mut rng = StdRng::seed_from_u64(0xBEEF);

    let template = random_template(&mut rng, config.len());
    let (_, bundle) = extractor.generate(&template, &mut rng).unwrap();
    let noisy = perturb(&template, config.ham_err(), &mut rng);

    let first = extractor.reproduce(&noisy, &bundle);
    for _ in 0..5 {
        let again = extractor.reproduce(&noisy, &bundle);
        match (&first, &again) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => panic!("reproduce flip-flopped between success and failure"),
        }
    }
}

/// Negative control: the helper bundle is load-bearing. A single
/// corrupted cipher byte in the checksum region must turn a working
/// single-slot bundle into a reproduction failure.
#[test]
fn test_corrupted_helper_byte_breaks_reproduction() {
    let config = ExtractorConfig::new(16, 1).unwrap();
    let extractor = FuzzyExtractor::new(config);
    let mut rng = StdRng::seed_from_u64(0xC0DE);

    let template = random_template(&mut rng, config.len());
    let (_, bundle) = extractor.generate(&template, &mut rng).unwrap();

    // Cut the stored bundle down to one slot — with an identical
    // probe, every slot unlocks, so one is enough for success.
    let mut value: serde_json::Value = serde_json::from_str(&bundle.to_json()).unwrap();
    for field in ["ciphers", "masks", "nonces"] {
        let arr = value[field].as_array_mut().unwrap();
        arr.truncate(1);
    }
    let single = HelperBundle::from_json(&value.to_string(), &config).unwrap();
    assert!(extractor.reproduce(&template, &single).is_ok());

    // Flip the last cipher byte (inside the checksum tail)
    let mut cipher = hex::decode(value["ciphers"][0].as_str().unwrap()).unwrap();
    let last = cipher.len() - 1;
    cipher[last] ^= 0xFF;
    value["ciphers"][0] = serde_json::Value::String(hex::encode(&cipher));

    let corrupted = HelperBundle::from_json(&value.to_string(), &config).unwrap();
    assert!(matches!(
        extractor.reproduce(&template, &corrupted),
        Err(ExtractorError::ReproductionFailed)
    ));
}

/// Corrupting a mask byte changes the masked input to the KDF, which
/// scrambles the digest and misses the checksum with overwhelming
/// probability.
#[test]
fn test_corrupted_mask_byte_breaks_reproduction() {
    let config = ExtractorConfig::new(16, 1).unwrap();
    let extractor = FuzzyExtractor::new(config);
    let mut rng = StdRng::seed_from_u64(0xC0DE + 1);

    // All-ones template so any mask change alters the masked value
    let template = BinaryTemplate::from_bytes(vec![0xFF; config.len()]);
    let (_, bundle) = extractor.generate(&template, &mut rng).unwrap();

    let mut value: serde_json::Value = serde_json::from_str(&bundle.to_json()).unwrap();
    for field in ["ciphers", "masks", "nonces"] {
        value[field].as_array_mut().unwrap().truncate(1);
    }

    let mut mask = hex::decode(value["masks"][0].as_str().unwrap()).unwrap();
    mask[0] ^= 0xFF;
    value["masks"][0] = serde_json::Value::String(hex::encode(&mask));

    let corrupted = HelperBundle::from_json(&value.to_string(), &config).unwrap();
    assert!(extractor.reproduce(&template, &corrupted).is_err());
}
