// System status display: model files, reference vectors, history file.

use anyhow::Result;

use crate::config::Config;
use crate::embedding::download::model_files_present;
use crate::history::{store, HistoryStats};
use crate::output::terminal;

/// Display system status to the terminal.
///
/// Only inspects files; does not load the model or the reference vectors.
pub fn show(config: &Config) -> Result<()> {
    if model_files_present(&config.model_dir) {
        println!("Model: {}", config.model_dir.display());
    } else {
        println!("Model: not downloaded ({})", config.model_dir.display());
        println!("  Run `neuroscan download-model` to fetch it");
    }

    match std::fs::metadata(&config.reference_path) {
        Ok(m) => println!(
            "Reference vectors: {} ({}, sampled to {} rows)",
            config.reference_path.display(),
            format_bytes(m.len()),
            config.reference_sample_size
        ),
        Err(_) => println!(
            "Reference vectors: missing ({})",
            config.reference_path.display()
        ),
    }

    println!(
        "Thresholds: novel below {:.2} similarity, high novelty above {:.2} confidence",
        config.thresholds.novelty_threshold, config.thresholds.high_novelty_confidence
    );

    let history_path = &config.history_path;
    if !history_path.exists() {
        println!("History: none yet ({})", history_path.display());
        return Ok(());
    }

    let file_size = std::fs::metadata(history_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    let records = store::load(history_path);
    println!(
        "History: {} ({}, {} entries)",
        history_path.display(),
        file_size,
        records.len()
    );

    terminal::display_stats(&HistoryStats::from_records(&records));
    terminal::display_history(&records[..records.len().min(5)]);

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
