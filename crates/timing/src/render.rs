//! Plain-text rendering of reports

use crate::normality::NormalityResult;
use crate::report::{AnalysisReport, Differential, Operation, RunComparison};
use crate::verdict::LeakageLevel;

const RULE_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 40;

fn cv_text(cv: Option<f64>) -> String {
    match cv {
        Some(cv) => format!("{:.2}%", cv),
        None => "n/a".to_string(),
    }
}

/// Human-readable report with parameters, timing results, statistical tests,
/// the security analysis and recommendations
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);
    let section = "-".repeat(SECTION_WIDTH);
    let params = &report.parameter_set;
    let hardened = report.countermeasures.is_enabled();

    out.push_str(&format!("{}\n", rule));
    out.push_str("KEM SIDE-CHANNEL RESISTANCE ANALYSIS REPORT\n");
    out.push_str(&format!("{}\n\n", rule));
    out.push_str(&format!("Parameter Set: {}\n", params.name));
    out.push_str(&format!("Countermeasures Enabled: {}\n", hardened));
    out.push_str(&format!(
        "Trials: {} of {}{}\n\n",
        report.completed_trials,
        report.requested_trials,
        if report.is_partial() { " (stopped early)" } else { "" }
    ));

    out.push_str("PARAMETERS:\n");
    out.push_str(&format!("{}\n", section));
    out.push_str(&format!("n (module dimension): {}\n", params.n));
    out.push_str(&format!("k (module rank): {}\n", params.k));
    out.push_str(&format!("q (modulus): {}\n", params.q));
    out.push_str(&format!("eta1 (secret noise): {}\n", params.eta1));
    out.push_str(&format!("eta2 (encaps noise): {}\n\n", params.eta2));

    out.push_str("TIMING ANALYSIS RESULTS:\n");
    out.push_str(&section);
    out.push('\n');
    for (op, stats) in &report.operations {
        let s = &stats.summary;
        out.push_str(&format!("\n{}:\n", heading(*op)));
        out.push_str(&format!("  Mean time: {:.6} seconds\n", s.mean));
        out.push_str(&format!("  Std deviation: {:.6} seconds\n", s.stdev));
        out.push_str(&format!("  Min time: {:.6} seconds\n", s.min));
        out.push_str(&format!("  Max time: {:.6} seconds\n", s.max));
        out.push_str(&format!(
            "  Coefficient of Variation: {}\n",
            cv_text(stats.coefficient_of_variation)
        ));
        out.push_str(&format!(
            "  Outliers: {} ({:.2}%)\n",
            stats.outliers.count, stats.outliers.percentage
        ));
        out.push_str(&format!(
            "  Mean memory accesses: {:.1}, mean branches: {:.1}\n",
            stats.counters.mean_memory_accesses, stats.counters.mean_conditional_branches
        ));
    }

    out.push_str("\nSTATISTICAL TESTS:\n");
    out.push_str(&section);
    out.push('\n');
    for (op, stats) in &report.operations {
        out.push_str(&format!(
            "\n{} Normality Test (Shapiro-Wilk):\n",
            heading(*op)
        ));
        match &stats.normality {
            NormalityResult::Computed {
                statistic,
                p_value,
                is_normal,
            } => {
                out.push_str(&format!("  Statistic: {:.6}\n", statistic));
                out.push_str(&format!("  P-value: {:.6}\n", p_value));
                out.push_str(&format!("  Is Normal: {}\n", is_normal));
            }
            NormalityResult::NotComputed { reason } => {
                out.push_str(&format!("  Not computed: {}\n", reason));
            }
        }
    }

    out.push_str("\nValid vs invalid decapsulation (Welch t-test):\n");
    match &report.differential {
        Differential::Computed(test) => {
            out.push_str(&format!(
                "  Mean: {:.6} s vs {:.6} s\n",
                test.mean_a, test.mean_b
            ));
            out.push_str(&format!(
                "  t={:.3}, df={:.1}, p={:.4e}, d={:.3} ({})\n",
                test.t_statistic,
                test.degrees_of_freedom,
                test.p_value,
                test.cohens_d,
                test.effect_size
            ));
        }
        Differential::NotComputed { reason } => {
            out.push_str(&format!("  Not computed: {}\n", reason));
        }
    }

    out.push_str("\nSECURITY ANALYSIS:\n");
    out.push_str(&section);
    out.push('\n');
    if hardened {
        out.push_str("[+] Countermeasures ENABLED\n");
        out.push_str("[+] Constant-time operations implemented\n");
        out.push_str("[+] Algebraic masking applied\n");
        out.push_str("[+] Execution randomization active\n");
        let marker = match report.verdict.level {
            LeakageLevel::Low => "[+]",
            LeakageLevel::Moderate | LeakageLevel::Undetermined => "[!]",
            LeakageLevel::High => "[-]",
        };
        out.push_str(&format!("{} {}\n", marker, report.verdict.summary()));
    } else {
        out.push_str("[-] Countermeasures DISABLED\n");
        out.push_str("[-] Vulnerable to timing attacks\n");
        out.push_str("[-] Vulnerable to power analysis\n");
        out.push_str("[-] Branch-based side channels possible\n");
    }
    out.push_str(&format!(
        "\nMax Coefficient of Variation: {}\n",
        cv_text(report.verdict.max_cv_percent)
    ));

    out.push_str("\nRECOMMENDATIONS:\n");
    out.push_str(&section);
    out.push('\n');
    if !hardened || report.verdict.level != LeakageLevel::Low {
        out.push_str("1. Enable all countermeasures for production use\n");
        out.push_str("2. Implement higher-order masking if needed\n");
        out.push_str("3. Use hardware countermeasures when available\n");
        out.push_str("4. Regular side-channel testing in target environment\n");
        out.push_str("5. Consider FIPS 203 certified implementations\n");
    } else {
        out.push_str("1. Current implementation shows good side-channel resistance\n");
        out.push_str("2. Continue monitoring in production environment\n");
        out.push_str("3. Regular security audits recommended\n");
    }

    out.push_str(&format!("\n{}\n", rule));
    out
}

/// Summary of a hardened vs unhardened comparison
pub fn render_comparison(cmp: &RunComparison, low_cv_percent: f64) -> String {
    let mut out = String::from("Maximum coefficient of variation:\n");
    out.push_str(&format!("  With countermeasures: {}\n", cv_text(cmp.hardened_max_cv)));
    out.push_str(&format!(
        "  Without countermeasures: {}\n",
        cv_text(cmp.unhardened_max_cv)
    ));
    match cmp.improvement_percent {
        Some(improvement) => out.push_str(&format!("  Improvement: {:.1}%\n", improvement)),
        None => out.push_str("  Improvement: n/a\n"),
    }
    match cmp.hardened_max_cv {
        Some(cv) if cv < low_cv_percent => {
            out.push_str("Hardened implementation shows low timing variation\n")
        }
        _ => out.push_str("Hardened implementation still shows significant variation\n"),
    }
    out
}

/// Label of an operation as used in section headings
pub fn heading(op: Operation) -> String {
    op.as_str().to_uppercase()
}
