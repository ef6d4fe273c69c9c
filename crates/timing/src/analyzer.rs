//! Trial loop and per-run statistics
//!
//! Each trial times keygen, encapsulation under the fresh public key,
//! decapsulation of that ciphertext, and decapsulation of a random ciphertext
//! of the same length. Trials run sequentially on the calling thread.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use kemscope_api::{error::ConfigResult, Ciphertext, Error};
use kemscope_common::SideChannelCounters;
use kemscope_kem::{Countermeasures, KemCore};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::normality::NormalityResult;
use crate::report::{
    AnalysisReport, CounterSummary, Differential, Operation, ParameterSummary, StatisticalReport,
    TimingSampleSet,
};
use crate::stats::welch_t_test;

/// ChaCha stream for invalid ciphertexts, disjoint from the KEM's stream 0
const INVALID_CIPHERTEXT_STREAM: u64 = 1;

/// Running sums of the counters seen after each call
#[derive(Debug, Default, Clone, Copy)]
struct CounterTotals {
    memory_accesses: u64,
    conditional_branches: u64,
    calls: u64,
}

impl CounterTotals {
    fn add(&mut self, counters: &SideChannelCounters) {
        self.memory_accesses += counters.memory_accesses;
        self.conditional_branches += counters.conditional_branches;
        self.calls += 1;
    }

    fn mean(&self) -> CounterSummary {
        if self.calls == 0 {
            return CounterSummary::default();
        }
        CounterSummary {
            mean_memory_accesses: self.memory_accesses as f64 / self.calls as f64,
            mean_conditional_branches: self.conditional_branches as f64 / self.calls as f64,
        }
    }
}

#[derive(Debug, Default)]
struct Recording {
    samples: BTreeMap<Operation, TimingSampleSet>,
    counters: BTreeMap<Operation, CounterTotals>,
}

impl Recording {
    fn with_capacity(capacity: usize) -> Self {
        let mut recording = Self::default();
        for op in Operation::ALL {
            recording
                .samples
                .insert(op, TimingSampleSet::with_capacity(capacity));
            recording.counters.insert(op, CounterTotals::default());
        }
        recording
    }

    fn record(&mut self, op: Operation, start: Instant, counters: &SideChannelCounters) {
        let elapsed = start.elapsed().as_secs_f64();
        self.samples.entry(op).or_default().push(elapsed);
        self.counters.entry(op).or_default().add(counters);
    }
}

/// Statistical timing analyzer
pub struct TimingAnalyzer {
    config: AnalyzerConfig,
    rng: ChaCha20Rng,
    stop: Arc<AtomicBool>,
}

impl TimingAnalyzer {
    /// Analyzer for a validated configuration
    pub fn new(config: AnalyzerConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        // A KEM seeded with the same value draws from stream 0
        rng.set_stream(INVALID_CIPHERTEXT_STREAM);
        Ok(Self {
            config,
            rng,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Share an externally owned stop flag, e.g. one set by a signal handler
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Flag that stops the run before the next trial once set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Run `config.num_samples` trials
    pub fn run<R: RngCore + CryptoRng>(&mut self, kem: &mut KemCore<R>) -> AnalysisReport {
        let num_samples = self.config.num_samples;
        self.collect(kem, num_samples)
    }

    /// Run `num_samples` trials against `kem`.
    ///
    /// Zero samples is a configuration error. A stop request ends the run
    /// between trials and the report covers the trials completed so far.
    pub fn run_analysis<R: RngCore + CryptoRng>(
        &mut self,
        kem: &mut KemCore<R>,
        num_samples: usize,
    ) -> ConfigResult<AnalysisReport> {
        if num_samples == 0 {
            return Err(Error::config("num_samples must be at least 1"));
        }
        Ok(self.collect(kem, num_samples))
    }

    fn collect<R: RngCore + CryptoRng>(
        &mut self,
        kem: &mut KemCore<R>,
        num_samples: usize,
    ) -> AnalysisReport {
        let params = kem.parameters();
        let countermeasures = kem.countermeasures();
        info!(
            params = params.name,
            countermeasures = %countermeasures,
            samples = num_samples,
            warmup = self.config.num_warmup,
            "starting timing analysis"
        );

        let mut discard = Recording::default();
        for _ in 0..self.config.num_warmup {
            if self.stop_requested() {
                break;
            }
            self.trial(kem, &mut discard);
        }
        debug!("warm-up finished");

        let mut recording = Recording::with_capacity(num_samples);
        let mut completed = 0;
        for trial in 0..num_samples {
            if self.stop_requested() {
                warn!(
                    completed = trial,
                    requested = num_samples,
                    "stop requested, keeping partial samples"
                );
                break;
            }
            let interval = self.config.progress_interval;
            if interval > 0 && trial % interval == 0 {
                info!("progress: {}/{}", trial, num_samples);
            }
            self.trial(kem, &mut recording);
            completed += 1;
        }

        let report = self.build_report(
            ParameterSummary::from(params),
            countermeasures,
            num_samples,
            completed,
            recording,
        );
        info!(
            params = params.name,
            countermeasures = %countermeasures,
            completed = report.completed_trials,
            max_cv = ?report.verdict.max_cv_percent,
            level = %report.verdict.level,
            "timing analysis finished"
        );
        report
    }

    fn trial<R: RngCore + CryptoRng>(&mut self, kem: &mut KemCore<R>, recording: &mut Recording) {
        let start = Instant::now();
        let kp = kem.keygen();
        recording.record(Operation::Keygen, start, kem.counters());

        let start = Instant::now();
        let (ct, _) = kem.encapsulate(&kp.public_key);
        recording.record(Operation::Encaps, start, kem.counters());

        let start = Instant::now();
        let _ = kem.decapsulate(&kp.secret_key, &ct);
        recording.record(Operation::Decaps, start, kem.counters());

        let mut invalid = vec![0u8; ct.len()];
        self.rng.fill_bytes(&mut invalid);
        let invalid = Ciphertext::new(invalid);
        let start = Instant::now();
        let _ = kem.decapsulate(&kp.secret_key, &invalid);
        recording.record(Operation::DecapsInvalid, start, kem.counters());
    }

    fn build_report(
        &self,
        parameter_set: ParameterSummary,
        countermeasures: Countermeasures,
        requested_trials: usize,
        completed_trials: usize,
        mut recording: Recording,
    ) -> AnalysisReport {
        let mut operations = BTreeMap::new();
        for op in Operation::ALL {
            let samples = recording.samples.remove(&op).unwrap_or_default();
            let counters = recording
                .counters
                .get(&op)
                .map(CounterTotals::mean)
                .unwrap_or_default();
            let report = StatisticalReport::from_samples(samples, counters, &self.config);
            if let NormalityResult::NotComputed { reason } = &report.normality {
                warn!(operation = %op, %reason, "normality test not computed");
            }
            operations.insert(op, report);
        }

        let differential = match (
            operations.get(&Operation::Decaps).and_then(|r| r.samples.as_ref()),
            operations.get(&Operation::DecapsInvalid).and_then(|r| r.samples.as_ref()),
        ) {
            (Some(valid), Some(invalid)) => {
                match welch_t_test(valid.as_slice(), invalid.as_slice()) {
                    Ok(test) => Differential::Computed(test),
                    Err(reason) => Differential::NotComputed { reason },
                }
            }
            _ => Differential::NotComputed {
                reason: "decapsulation samples missing".to_string(),
            },
        };

        let verdict = self.config.verdict.classify(
            Operation::VERDICT
                .iter()
                .map(|op| operations.get(op).and_then(|r| r.coefficient_of_variation)),
        );

        AnalysisReport {
            parameter_set,
            countermeasures,
            requested_trials,
            completed_trials,
            operations,
            differential,
            verdict,
        }
    }
}
