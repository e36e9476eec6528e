//! `doctools doctor`: report what the tutorial environment is missing.

use anyhow::{Result, bail};

use crate::{
    config::DoctorConfig,
    doctor::{Finding, Severity, check_all},
    log,
    utils::plural_count,
};

pub fn run_doctor(config: &DoctorConfig) -> Result<()> {
    let results = check_all(&config.requirements);
    print_findings(&results);

    for note in &config.notes {
        println!("{note}");
    }

    let failures = count(&results, Severity::Failure);
    if failures > 0 {
        bail!("{} not satisfied", plural_count(failures, "requirement"));
    }
    Ok(())
}

fn print_findings(results: &[(String, Vec<Finding>)]) {
    for (name, findings) in results {
        for finding in findings {
            match finding.severity {
                Severity::Ok => log!("doctor"; "{}", finding.message),
                Severity::Advice => log!("warning"; "{}", finding.message),
                Severity::Failure => log!("error"; "{}", finding.message),
            }
        }
        crate::debug!("doctor"; "checked {}", name);
    }
}

/// Requirements with at least one finding at `severity`.
fn count(results: &[(String, Vec<Finding>)], severity: Severity) -> usize {
    results
        .iter()
        .filter(|(_, findings)| findings.iter().any(|f| f.severity == severity))
        .count()
}
