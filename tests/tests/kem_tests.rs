//! Integration tests for the instrumented KEM core

use kemscope::prelude::*;
use kemscope_tests::seeded_instances;

#[test]
fn test_round_trip_every_set_and_setting() {
    for countermeasures in Countermeasures::ALL {
        for mut kem in seeded_instances(countermeasures, 7) {
            let keypair = kem.keygen();
            let (ct, ss_sender) = kem.encapsulate(&keypair.public_key);
            let ss_recipient = kem.decapsulate(&keypair.secret_key, &ct);

            assert_eq!(
                ss_sender,
                ss_recipient,
                "{} {} failed to agree",
                kem.parameters().name,
                countermeasures
            );
            assert_eq!(ct.len(), kem.parameters().ciphertext_size);
            assert_eq!(ss_sender.len(), 32);
        }
    }
}

#[test]
fn test_invalid_ciphertext_yields_unrelated_secret() {
    for countermeasures in Countermeasures::ALL {
        let mut kem = KemCore::from_name("ML-KEM-768", countermeasures).unwrap();
        let keypair = kem.keygen();
        let (ct, ss) = kem.encapsulate(&keypair.public_key);

        let mut tampered = ct.clone();
        tampered.as_mut()[ct.len() - 1] ^= 0x80;
        let substitute = kem.decapsulate(&keypair.secret_key, &tampered);
        assert_ne!(ss, substitute);
        assert_eq!(substitute.len(), 32);

        let random = Ciphertext::new(vec![0x5A; ct.len()]);
        assert_ne!(ss, kem.decapsulate(&keypair.secret_key, &random));
    }
}

#[test]
fn test_keys_from_other_pair_do_not_agree() {
    let mut kem = KemCore::with_seed(ParameterSet::smallest(), Countermeasures::Enabled, 3);
    let alice = kem.keygen();
    let bob = kem.keygen();
    assert_ne!(alice.public_key, bob.public_key);

    let (ct, ss) = kem.encapsulate(&alice.public_key);
    assert_ne!(ss, kem.decapsulate(&bob.secret_key, &ct));
}

#[test]
fn test_generic_trait_usage() {
    fn exchange<K: Kem>(kem: &mut K) -> bool
    where
        K::SharedSecret: PartialEq,
    {
        let keypair = kem.keypair().unwrap();
        let pk = K::public_key(&keypair);
        let sk = K::secret_key(&keypair);
        let (ct, a) = kem.encapsulate(&pk).unwrap();
        let b = kem.decapsulate(&sk, &ct).unwrap();
        a == b
    }

    for countermeasures in Countermeasures::ALL {
        let mut kem = KemCore::with_seed(ParameterSet::smallest(), countermeasures, 11);
        assert_eq!(Kem::name(&kem), "ML-KEM-512");
        assert!(exchange(&mut kem));
    }
}

#[test]
fn test_counters_describe_last_operation_only() {
    for mut kem in seeded_instances(Countermeasures::Disabled, 5) {
        let len = kem.parameters().transform_len() as u64;

        let keypair = kem.keygen();
        let after_keygen = kem.counters().snapshot();
        assert_eq!(after_keygen.conditional_branches, len);
        assert!(after_keygen.memory_accesses > 0);
        assert_eq!(after_keygen.timing_samples, 3);

        let (ct, _) = kem.encapsulate(&keypair.public_key);
        let after_encaps = kem.counters().snapshot();
        assert_eq!(after_encaps.memory_accesses, 0);
        assert_eq!(after_encaps.conditional_branches, 0);
        assert_eq!(after_encaps.timing_samples, 1);

        kem.decapsulate(&keypair.secret_key, &ct);
        assert_eq!(kem.counters().snapshot(), after_encaps);
    }
}

#[test]
fn test_unknown_parameter_set_is_rejected() {
    let err = KemCore::from_name("ML-KEM-2048", Countermeasures::Enabled).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("ML-KEM-2048"));
}
