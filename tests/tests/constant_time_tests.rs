// tests/constant_time_tests.rs
// Timing comparisons between two input classes. Thresholds are generous:
// these runs share the machine with the rest of the test suite.

use kemscope::prelude::*;
use kemscope_internal::constant_time::compare_equal;
use kemscope_tests::constant_time::{generate_test_insights, TestConfig, TimingTester};
use std::hint::black_box;

const BUFFER_LEN: usize = 4096;

fn print_analysis(name: &str, analysis: &kemscope_tests::constant_time::TimingAnalysis) {
    println!("{} Timing Analysis:", name);
    println!(
        "  Mean times: {:.2} ns vs {:.2} ns",
        analysis.mean_a, analysis.mean_b
    );
    println!("  Mean ratio: {:.3}", analysis.mean_ratio);
    println!("  t-statistic: {:.3}", analysis.t_statistic);
    println!("  p-value: {:.4}", analysis.p_value);
    println!(
        "  Effect size (Cohen's d): {:.3} - {}",
        analysis.cohens_d, analysis.effect_size_interpretation
    );
    println!(
        "  95% CI for mean difference: ({:.2}, {:.2}) ns",
        analysis.confidence_interval.0, analysis.confidence_interval.1
    );
    println!("  Combined score: {:.3}", analysis.combined_score);
    println!("\n{}", generate_test_insights(analysis, name));
}

#[test]
fn test_compare_equal_early_vs_late_mismatch() {
    let config = TestConfig::for_comparison();
    let reference = vec![0xA5u8; BUFFER_LEN];
    let mut early = reference.clone();
    early[0] ^= 1;
    let mut late = reference.clone();
    late[BUFFER_LEN - 1] ^= 1;

    for _ in 0..config.num_warmup {
        black_box(compare_equal(&reference, &early));
        black_box(compare_equal(&reference, &late));
    }

    let tester = TimingTester::from_config(&config);
    let t_early = tester.measure(|| {
        black_box(compare_equal(black_box(&reference), black_box(&early)));
    });
    let t_late = tester.measure(|| {
        black_box(compare_equal(black_box(&reference), black_box(&late)));
    });

    let analysis = tester
        .analyze_constant_time(&t_early, &t_late, &config)
        .unwrap_or_else(|e| panic!("Analysis error: {}", e));
    print_analysis("compare_equal", &analysis);

    // An early exit would make the late mismatch scan the whole buffer
    assert!(
        analysis.mean_ratio < 2.0,
        "compare_equal timing depends on mismatch position: ratio {:.2}",
        analysis.mean_ratio
    );
}

#[test]
fn test_hardened_decapsulation_valid_vs_invalid() {
    let config = TestConfig::for_decapsulation();
    let mut kem = KemCore::with_seed(ParameterSet::smallest(), Countermeasures::Enabled, 21);
    let keypair = kem.keygen();
    let (valid, _) = kem.encapsulate(&keypair.public_key);
    let invalid = Ciphertext::new(vec![0x3C; valid.len()]);

    for _ in 0..config.num_warmup {
        black_box(kem.decapsulate(&keypair.secret_key, &valid));
        black_box(kem.decapsulate(&keypair.secret_key, &invalid));
    }

    let tester = TimingTester::from_config(&config);
    let t_valid = tester.measure(|| {
        black_box(kem.decapsulate(&keypair.secret_key, &valid));
    });
    let t_invalid = tester.measure(|| {
        black_box(kem.decapsulate(&keypair.secret_key, &invalid));
    });

    let analysis = tester
        .analyze_constant_time(&t_valid, &t_invalid, &config)
        .unwrap_or_else(|e| panic!("Analysis error: {}", e));
    print_analysis("hardened decapsulation", &analysis);

    assert!(analysis.mean_ratio < 3.0);
}

#[test]
fn test_welch_separates_artificial_leak() {
    let config = TestConfig::default().with_samples_and_iterations(30, 50);
    let tester = TimingTester::from_config(&config);
    let short = vec![0u8; 64];
    let long = vec![0u8; 64 * 1024];

    let t_short = tester.measure(|| {
        black_box(compare_equal(black_box(&short), black_box(&short)));
    });
    let t_long = tester.measure(|| {
        black_box(compare_equal(black_box(&long), black_box(&long)));
    });

    let analysis = tester
        .analyze_constant_time(&t_short, &t_long, &config)
        .unwrap_or_else(|e| panic!("Analysis error: {}", e));
    print_analysis("length-dependent comparison", &analysis);

    assert!(!analysis.is_constant_time);
    assert!(analysis.mean_b > analysis.mean_a);
}
