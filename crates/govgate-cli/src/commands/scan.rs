//! `govgate scan` command implementation

use super::{load_policy, read_text};
use crate::output::{OutputFormat, print_json, print_list};
use colored::Colorize;
use govgate_foundation::governance::{KeywordSafetyScanner, RegexPiiDetector, RegexPromptGuard};
use govgate_kernel::governance::{KeywordScan, PiiDetector, PiiScan, PromptGuard, SafetyScanner};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ScanReport {
    pii: PiiScan,
    keywords: KeywordScan,
    injection_patterns: Vec<String>,
    safety_score: f64,
}

/// Execute `govgate scan`
pub fn run(config: Option<&Path>, text: &str, format: OutputFormat) -> anyhow::Result<()> {
    let policy = load_policy(config)?;
    let detector = RegexPiiDetector::from_policy(&policy.pii)?;
    let scanner = KeywordSafetyScanner::new(&policy.safety);
    let guard = RegexPromptGuard::new(&policy.safety)?;

    let text = read_text(text)?;
    let report = ScanReport {
        pii: detector.detect(&text),
        keywords: scanner.scan(&text),
        injection_patterns: guard.matched_patterns(&text),
        safety_score: scanner.safety_score(&text),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    println!(
        "{} {}    {} {:.2}",
        "PII entities:".bold(),
        report.pii.count.to_string().yellow(),
        "Safety score:".bold(),
        report.safety_score
    );

    let entities: Vec<String> = report
        .pii
        .entities
        .iter()
        .map(|e| format!("{} {:?} at {}..{}", e.kind, e.matched_value, e.start, e.end))
        .collect();
    print_list("Entities:", &entities);

    let keywords: Vec<String> = report
        .keywords
        .flags
        .iter()
        .map(|f| format!("{} ({}, {})", f.keyword, f.category, f.severity))
        .collect();
    print_list("Unsafe keywords:", &keywords);

    print_list("Injection patterns:", &report.injection_patterns);
}
