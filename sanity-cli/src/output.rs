use std::path::Path;

use chrono::{DateTime, Utc};
use colored::*;
use sanity_core::serde_utils::to_pretty_json;
use sanity_core::CoreResult;
use sanity_rules::{DocumentReport, PaperReport, RuleEngine, ValidationReport};
use serde::Serialize;

pub const ALL_PASSED: &str = "All sanity checks passed.";

/// Where the active rules came from, for reporting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesSource {
    BuiltIn,
    File(String),
}

impl RulesSource {
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) => RulesSource::File(path.display().to_string()),
            None => RulesSource::BuiltIn,
        }
    }

    fn label(&self) -> String {
        match self {
            RulesSource::BuiltIn => "built-in rules".to_string(),
            RulesSource::File(path) => path.clone(),
        }
    }
}

/// Prints violations one per line, in rule order.
pub fn print_text_report(report: &DocumentReport) {
    match report {
        DocumentReport::Record(report) => print_record_report(report, ""),
        DocumentReport::Papers(papers) => {
            for paper in papers {
                print_paper_report(paper);
            }
            if papers.len() > 1 {
                let failing = papers.iter().filter(|paper| !paper.is_clean()).count();
                println!(
                    "{} violation(s) in {} of {} paper(s)",
                    report.violation_count(),
                    failing,
                    papers.len()
                );
            }
        }
    }
}

fn print_record_report(report: &ValidationReport, indent: &str) {
    if report.is_clean() {
        println!("{}{}", indent, ALL_PASSED.green());
        return;
    }
    for message in report.messages() {
        println!("{}{}", indent, message);
    }
}

fn print_paper_report(paper: &PaperReport) {
    let heading = match &paper.title {
        Some(title) => format!("{} ({})", paper.key, title),
        None => paper.key.clone(),
    };
    println!("{}", heading.bold());
    if paper.excluded {
        println!("  {}", "excluded from full text review, not checked".dimmed());
    } else {
        print_record_report(&paper.report, "  ");
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    checked_at: DateTime<Utc>,
    record: &'a str,
    rules: &'a RulesSource,
    clean: bool,
    violation_count: usize,
    #[serde(flatten)]
    body: JsonBody<'a>,
}

#[derive(Serialize)]
enum JsonBody<'a> {
    #[serde(rename = "report")]
    Record(&'a ValidationReport),
    #[serde(rename = "papers")]
    Papers(&'a [PaperReport]),
}

pub fn print_json_report(
    report: &DocumentReport,
    record: &str,
    rules: &RulesSource,
) -> CoreResult<()> {
    let body = match report {
        DocumentReport::Record(report) => JsonBody::Record(report),
        DocumentReport::Papers(papers) => JsonBody::Papers(papers),
    };
    let json = to_pretty_json(&JsonReport {
        checked_at: Utc::now(),
        record,
        rules,
        clean: report.is_clean(),
        violation_count: report.violation_count(),
        body,
    })?;
    println!("{json}");
    Ok(())
}

pub fn print_rule_list(engine: &RuleEngine, source: &RulesSource) {
    println!(
        "{} {} ({})",
        "Active rules:".bold(),
        engine.rules().len(),
        source.label()
    );
    for rule in engine.rules() {
        let status = if rule.is_enabled() { "" } else { " [disabled]" };
        match &rule.description {
            Some(description) => println!("  {}{}: {}", rule.id, status, description),
            None => println!("  {}{}", rule.id, status),
        }
    }
}
