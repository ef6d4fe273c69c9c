//! End-to-end runs of the timing analyzer

use kemscope::prelude::*;
use kemscope::timing::{Differential, NormalityResult};
use std::sync::atomic::Ordering;

#[test]
fn test_thousand_trial_run() {
    let mut kem = KemCore::with_seed(ParameterSet::smallest(), Countermeasures::Enabled, 1);
    let config = AnalyzerConfig::default()
        .with_samples(1000)
        .with_warmup(10)
        .with_progress_interval(0)
        .with_seed(1);
    let mut analyzer = TimingAnalyzer::new(config).unwrap();
    let report = analyzer.run(&mut kem);

    assert_eq!(report.parameter_set.name, "ML-KEM-512");
    assert_eq!(report.countermeasures, Countermeasures::Enabled);
    assert_eq!(report.completed_trials, 1000);
    assert!(!report.is_partial());

    for op in Operation::ALL {
        let stats = report.operation(op).unwrap();
        assert_eq!(stats.summary.count, 1000, "{}", op);
        assert!(stats.summary.mean > 0.0);
        assert!(stats.summary.min <= stats.summary.mean);
        assert!(stats.summary.mean <= stats.summary.max);

        let cv = stats.coefficient_of_variation.unwrap();
        assert!((0.0..=100.0).contains(&cv), "{}: cv {}", op, cv);
        assert!((0.0..=100.0).contains(&stats.outliers.percentage));

        match &stats.normality {
            NormalityResult::Computed { p_value, .. } => {
                assert!((0.0..=1.0).contains(p_value))
            }
            NormalityResult::NotComputed { reason } => panic!("{}: {}", op, reason),
        }
    }

    match &report.differential {
        Differential::Computed(welch) => {
            assert!(welch.t_statistic >= 0.0);
            assert!((0.0..=1.0).contains(&welch.p_value));
        }
        Differential::NotComputed { reason } => panic!("differential: {}", reason),
    }

    assert!(report.verdict.max_cv_percent.is_some());
    assert_ne!(report.verdict.level, LeakageLevel::Undetermined);

    let text = render_text(&report);
    assert!(text.contains("ML-KEM-512"));
    assert!(text.contains("KEYGEN"));
}

#[test]
fn test_comparative_run() {
    let config = AnalyzerConfig::quick().with_samples(200).with_seed(9);

    let mut reports = Vec::new();
    for countermeasures in Countermeasures::ALL {
        let mut kem = KemCore::with_seed(ParameterSet::smallest(), countermeasures, 9);
        let mut analyzer = TimingAnalyzer::new(config.clone()).unwrap();
        reports.push(analyzer.run(&mut kem));
    }
    let (hardened, unhardened) = (&reports[0], &reports[1]);
    assert_eq!(hardened.countermeasures, Countermeasures::Enabled);
    assert_eq!(unhardened.countermeasures, Countermeasures::Disabled);

    let cmp = compare_runs(hardened, unhardened);
    assert_eq!(cmp.hardened_max_cv, hardened.verdict.max_cv_percent);
    assert_eq!(cmp.unhardened_max_cv, unhardened.verdict.max_cv_percent);

    let (h, u) = (cmp.hardened_max_cv.unwrap(), cmp.unhardened_max_cv.unwrap());
    let improvement = cmp.improvement_percent.unwrap();
    assert!((improvement - (u - h) / u * 100.0).abs() < 1e-9);

    let rendered = render_comparison(&cmp, config.verdict.low_cv_percent);
    assert!(rendered.contains("Improvement"));
}

#[test]
fn test_zero_samples_rejected_before_any_trial() {
    let mut kem = KemCore::with_seed(ParameterSet::smallest(), Countermeasures::Disabled, 2);
    let mut analyzer = TimingAnalyzer::new(AnalyzerConfig::quick()).unwrap();
    let err = analyzer.run_analysis(&mut kem, 0).unwrap_err();
    assert!(err.is_configuration());

    assert!(TimingAnalyzer::new(AnalyzerConfig::default().with_samples(0)).is_err());
}

#[test]
fn test_stop_flag_yields_partial_report() {
    let mut kem = KemCore::with_seed(ParameterSet::smallest(), Countermeasures::Disabled, 4);
    let mut analyzer = TimingAnalyzer::new(AnalyzerConfig::quick().with_samples(50)).unwrap();
    analyzer.stop_handle().store(true, Ordering::Relaxed);

    let report = analyzer.run(&mut kem);
    assert!(report.is_partial());
    assert_eq!(report.completed_trials, 0);
    assert!(report.verdict.max_cv_percent.is_none());
    assert_eq!(report.verdict.level, LeakageLevel::Undetermined);
}

#[test]
fn test_report_serializes_to_json() {
    let mut kem = KemCore::with_seed(ParameterSet::smallest(), Countermeasures::Enabled, 6);
    let mut analyzer = TimingAnalyzer::new(AnalyzerConfig::quick().with_samples(20)).unwrap();
    let report = analyzer.run(&mut kem).without_samples();

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["parameter_set"]["name"], "ML-KEM-512");
    assert_eq!(value["countermeasures"], "enabled");

    let back: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.completed_trials, 20);
}
