//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the project result wrapped with run metadata

use colored::*;
use serde::Serialize;

use crate::aggregate::{ComplexityDistribution, ProjectAnalysisResult};

/// Longest dependency list printed in pretty mode before eliding.
const MAX_LISTED_DEPENDENCIES: usize = 10;

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a str>,
    pub result: &'a ProjectAnalysisResult,
}

/// Write a result in JSON format.
pub fn write_json(
    path: &str,
    config_path: Option<&str>,
    result: &ProjectAnalysisResult,
) -> anyhow::Result<()> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        path,
        config: config_path,
        result,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a result in pretty (human-readable) format.
pub fn write_pretty(path: &str, config_path: Option<&str>, result: &ProjectAnalysisResult) {
    println!();
    print!("  ");
    print!("{}", "visualdocs".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Project:  ".dimmed());
    println!("{}", path);
    if let Some(config) = config_path {
        print!("  {}", "Config:   ".dimmed());
        println!("{}", config);
    }
    print!("  {}", "Analyzed: ".dimmed());
    println!("{}", result.completed_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();

    write_totals(result);
    println!();

    write_complexity(result.complexity.average, &result.complexity.distribution);
    println!();

    if !result.language_distribution.is_empty() {
        write_languages(result);
        println!();
    }

    write_dependencies("Internal dependencies", &result.dependencies.internal);
    write_dependencies("External dependencies", &result.dependencies.external);
    println!();

    write_recommendations(&result.recommendations);
    println!();
}

fn write_totals(result: &ProjectAnalysisResult) {
    println!("  {}", "Summary:".bold());
    println!("    {:<16} {}", "Files", result.total_files);
    println!("    {:<16} {}", "Lines of code", result.total_lines_of_code);
    println!("    {:<16} {}", "Functions", result.function_count);
    println!("    {:<16} {}", "Classes", result.class_count);
    println!("    {:<16} {}", "Interfaces", result.interface_count);
}

fn write_complexity(average: f64, distribution: &ComplexityDistribution) {
    print!("  {}  average ", "Complexity:".bold());
    write_colored_average(average);
    println!();

    println!("    {:<16} {}", "low", distribution.low.to_string().green());
    println!("    {:<16} {}", "medium", distribution.medium.to_string().yellow());
    println!(
        "    {:<16} {}",
        "high",
        distribution.high.to_string().yellow().bold()
    );
    println!("    {:<16} {}", "critical", distribution.critical.to_string().red());
}

fn write_colored_average(average: f64) {
    let text = format!("{:.1}", average);
    match average {
        a if a <= 5.0 => print!("{}", text.green().bold()),
        a if a <= 10.0 => print!("{}", text.yellow()),
        a if a <= 15.0 => print!("{}", text.yellow().bold()),
        _ => print!("{}", text.red()),
    }
}

fn write_languages(result: &ProjectAnalysisResult) {
    println!("  {}", "Languages:".bold());

    let mut languages: Vec<(&String, &usize)> = result.language_distribution.iter().collect();
    languages.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (language, count) in languages {
        let plural = if *count != 1 { "s" } else { "" };
        println!("    {:<16} {} file{}", language, count, plural);
    }
}

fn write_dependencies(title: &str, deps: &[String]) {
    println!("  {} ({}):", title.bold(), deps.len());
    for dep in deps.iter().take(MAX_LISTED_DEPENDENCIES) {
        println!("    {}", dep.blue());
    }
    if deps.len() > MAX_LISTED_DEPENDENCIES {
        println!(
            "    {}",
            format!("... and {} more", deps.len() - MAX_LISTED_DEPENDENCIES).dimmed()
        );
    }
}

fn write_recommendations(recommendations: &[String]) {
    println!("  {}", "Recommendations:".bold());
    for rec in recommendations {
        println!("    {} {}", "→".cyan(), rec);
    }
}
