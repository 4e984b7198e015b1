// Colored terminal output for scan results and vocabulary checks.

use colored::Colorize;

use crate::keywords::categories::CategorySets;
use crate::keywords::vocabulary::Vocabulary;
use crate::models::{KeywordCounts, RelevantFirmRecord};

/// Display the relevant firm table.
pub fn display_relevant_firms(firms: &[RelevantFirmRecord]) {
    if firms.is_empty() {
        println!("No relevant firms found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Relevant Firms ({} filings) ===", firms.len()).bold()
    );
    println!();

    println!(
        "  {:>10}  {:<36} {:<10}  {}",
        "CIK".dimmed(),
        "Company".dimmed(),
        "Filed".dimmed(),
        "Top keywords".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    for firm in firms {
        let filed = firm
            .filing
            .file_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".to_string());
        let totals = total_counts(firm);
        let mut top: Vec<(&String, &u32)> = totals.iter().collect();
        top.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        let top_str = top
            .iter()
            .take(4)
            .map(|(k, v)| format!("{k} ({v})"))
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "  {:>10}  {:<36} {:<10}  {}",
            firm.filing.cik,
            super::truncate_chars(&firm.filing.company_name, 33),
            filed,
            top_str.dimmed(),
        );
    }

    let mut ciks: Vec<&str> = firms.iter().map(|f| f.filing.cik.as_str()).collect();
    ciks.dedup();
    println!();
    println!("  {} {} distinct firms", "*".green().bold(), ciks.len());
}

/// Display how well the vocabulary covers the three category sets.
pub fn display_vocabulary_report(vocabulary: &Vocabulary, categories: &CategorySets) {
    println!(
        "\n{}",
        format!("=== Keyword Vocabulary ({} keywords) ===", vocabulary.len()).bold()
    );

    for (name, terms) in [
        ("Tariff", &categories.tariff),
        ("Policy", &categories.policy),
        ("Exemption", &categories.exemption),
    ] {
        let rendered: Vec<String> = terms
            .iter()
            .map(|t| {
                if vocabulary.contains(t) {
                    t.green().to_string()
                } else {
                    t.red().to_string()
                }
            })
            .collect();
        println!("  {:<10} {}", name, rendered.join(", "));
    }

    let missing = vocabulary.missing(categories.all_terms());
    if missing.is_empty() {
        println!("\n  {}", "Vocabulary covers every category term.".green());
    } else {
        println!(
            "\n  {} {} category terms are not scanned: {}",
            "Warning:".yellow(),
            missing.len(),
            missing.join(", ")
        );
        println!(
            "  {}",
            "They are added at scan time unless FILINGSCAN_STRICT_VOCABULARY is set.".dimmed()
        );
    }
}

/// Sum a firm's keyword counts across all items.
fn total_counts(firm: &RelevantFirmRecord) -> KeywordCounts {
    let mut totals = KeywordCounts::new();
    for (_, counts) in &firm.item_counts {
        for (keyword, n) in counts {
            *totals.entry(keyword.clone()).or_insert(0) += n;
        }
    }
    totals
}
