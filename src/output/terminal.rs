// Colored terminal output for analyses, history and stats.
//
// The main.rs command handlers delegate all formatting here.

use colored::Colorize;

use crate::history::{AnalysisRecord, HistoryStats, NoveltyKind};
use crate::pipeline::Analysis;
use crate::scoring::NoveltyLevel;

/// Display the verdict for a single analysis.
pub fn display_analysis(analysis: &Analysis) {
    let verdict = &analysis.verdict;

    if verdict.is_novel {
        println!("\n{}", "=== Novel content detected ===".green().bold());
        println!("  This text departs from everything in the reference corpus.");
    } else {
        println!("\n{}", "=== Similar content found ===".yellow().bold());
        println!("  This text resembles existing reference content.");
    }
    println!();

    println!("  Novelty level:   {}", colorize_level(verdict.level));
    println!("  Max similarity:  {:.3}", verdict.similarity);
    println!("  Confidence:      {:.1}%", verdict.confidence * 100.0);
    println!(
        "  Words:           {} ({} after preprocessing)",
        analysis.original_words, analysis.processed_words
    );
    println!(
        "  {}",
        format!(
            "Compared against {} reference vectors ({}-dim)",
            analysis.comparison_base_size, analysis.embedding_dim
        )
        .dimmed()
    );
}

/// Display aggregate history statistics.
pub fn display_stats(stats: &HistoryStats) {
    println!("\n{}", "=== Analysis Statistics ===".bold());
    if stats.total == 0 {
        println!("  No analyses recorded yet.");
        return;
    }
    println!("  Total analyses:  {}", stats.total);
    println!(
        "  Novel:           {} ({:.0}%)",
        stats.new,
        stats.novelty_rate * 100.0
    );
    println!("  Similar:         {}", stats.similar);
    println!("  Avg similarity:  {:.3}", stats.avg_similarity);
    println!("  Avg confidence:  {:.3}", stats.avg_confidence);
}

/// Display recent history entries, newest first.
pub fn display_history(records: &[AnalysisRecord]) {
    if records.is_empty() {
        return;
    }

    println!(
        "\n{}",
        format!("=== Recent Analyses ({}) ===", records.len()).bold()
    );
    for record in records {
        let tag = match record.kind {
            NoveltyKind::New => "new".green(),
            NoveltyKind::Similar => "similar".yellow(),
        };
        println!(
            "  {}  {:<8} {:.2}  {}",
            record.timestamp.dimmed(),
            tag,
            record.similarity_score,
            super::truncate_chars(&record.text, 60)
        );
    }
}

fn colorize_level(level: NoveltyLevel) -> colored::ColoredString {
    match level {
        NoveltyLevel::High => level.as_str().green().bold(),
        NoveltyLevel::Moderate => level.as_str().cyan(),
        NoveltyLevel::Low => level.as_str().yellow(),
    }
}
