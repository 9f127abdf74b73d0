// Composition tests: reference loading, the analyzer and the history store
// working together, without the HTTP layer or the ONNX model.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use neuroscan::embedding::Embedder;
use neuroscan::history::{HistoryStore, NoveltyKind, RecordStatus};
use neuroscan::pipeline::{AnalyzeError, Engine};
use neuroscan::reference::{metadata, npy, ReferenceStore};
use neuroscan::scoring::NoveltyThresholds;

/// Embeds by keyword: texts mentioning "galaxy" land on the first axis,
/// everything else on the second.
struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("galaxy") {
                    vec![1.0, 0.0, 0.0]
                } else {
                    vec![0.0, 1.0, 0.0]
                }
            })
            .collect())
    }
    fn dimension(&self) -> usize {
        3
    }
    fn model_name(&self) -> &str {
        "keyword"
    }
}

fn write_npy(dir: &tempfile::TempDir, rows: &[[f32; 3]]) -> std::path::PathBuf {
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    let path = dir.path().join("embeddings.npy");
    std::fs::write(&path, npy::encode_f32(rows.len(), 3, &flat)).unwrap();
    path
}

fn engine_over(reference: ReferenceStore) -> Engine {
    Engine::from_parts(
        Ok(Arc::new(KeywordEmbedder)),
        Ok(reference),
        NoveltyThresholds::default(),
    )
}

// ============================================================
// Reference loading
// ============================================================

#[test]
fn npy_reference_loads_all_rows_under_cap() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_npy(&dir, &[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);

    let store = ReferenceStore::load(&path, 30_000, None).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.dimension(), 3);
    assert_eq!(store.row(1), &[0.0, 0.0, 1.0]);
}

#[test]
fn npy_reference_is_sampled_down_to_cap() {
    let dir = tempfile::tempdir().unwrap();
    let rows: Vec<[f32; 3]> = (0..100).map(|i| [i as f32, 1.0, 0.0]).collect();
    let path = write_npy(&dir, &rows);

    let a = ReferenceStore::load(&path, 10, Some(7)).unwrap();
    let b = ReferenceStore::load(&path, 10, Some(7)).unwrap();
    assert_eq!(a.len(), 10);

    // Same seed, same sample; and no row picked twice
    let firsts: Vec<f32> = a.iter_rows().map(|r| r[0]).collect();
    let again: Vec<f32> = b.iter_rows().map(|r| r[0]).collect();
    assert_eq!(firsts, again);
    let mut dedup = firsts.clone();
    dedup.sort_by(|x, y| x.partial_cmp(y).unwrap());
    dedup.dedup();
    assert_eq!(dedup.len(), 10);
}

#[test]
fn metadata_is_checked_against_unsampled_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let rows: Vec<[f32; 3]> = (0..20).map(|i| [i as f32, 0.0, 1.0]).collect();
    let path = write_npy(&dir, &rows);
    let store = ReferenceStore::load(&path, 5, Some(1)).unwrap();
    assert_eq!(store.len(), 5);
    assert_eq!(store.source_rows(), 20);

    let csv_path = dir.path().join("metadata.csv");
    let body: String = (0..20).map(|i| format!("{i},\"text {i}\"\n")).collect();
    std::fs::write(&csv_path, format!("id,text\n{body}")).unwrap();
    assert!(metadata::check(&csv_path, store.source_rows()).unwrap().is_consistent());

    let short_body: String = (0..19).map(|i| format!("{i},text\n")).collect();
    std::fs::write(&csv_path, format!("id,text\n{short_body}")).unwrap();
    let check = metadata::check(&csv_path, store.source_rows()).unwrap();
    assert!(!check.is_consistent());
    assert_eq!(check.records, 19);
    assert_eq!(check.reference_rows, 20);
}

#[test]
fn json_reference_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("embeddings.json");
    std::fs::write(&path, "[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]").unwrap();

    let store = ReferenceStore::load(&path, 30_000, None).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.dimension(), 3);
}

#[test]
fn missing_reference_degrades_engine() {
    let dir = tempfile::tempdir().unwrap();
    let reference = ReferenceStore::load(&dir.path().join("absent.npy"), 30_000, None);
    assert!(reference.is_err());

    let engine = Engine::from_parts(
        Ok(Arc::new(KeywordEmbedder)),
        reference,
        NoveltyThresholds::default(),
    );
    assert!(engine.analyzer().is_none());
    assert!(engine.status().model_loaded);
    assert!(!engine.status().reference_loaded);
}

// ============================================================
// Analyzer + history
// ============================================================

#[tokio::test]
async fn matching_text_is_similar_and_unrelated_text_is_novel() {
    let reference = ReferenceStore::from_rows(vec![vec![1.0, 0.0, 0.0]]).unwrap();
    let engine = engine_over(reference);
    let analyzer = engine.analyzer().unwrap();

    let similar = analyzer
        .analyze("Astronomers mapped another spiral galaxy overnight")
        .await
        .unwrap();
    assert!(!similar.verdict.is_novel);
    assert_eq!(similar.record.kind, NoveltyKind::Similar);
    assert_eq!(similar.record.status, RecordStatus::Similar);
    assert_eq!(similar.comparison_base_size, 1);
    assert_eq!(similar.embedding_dim, 3);

    let novel = analyzer
        .analyze("Zebras and giraffes crossed the savanna river")
        .await
        .unwrap();
    assert!(novel.verdict.is_novel);
    assert_eq!(novel.record.kind, NoveltyKind::New);
    assert!((novel.verdict.similarity + novel.verdict.confidence - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn analysis_records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("analysis_history.json");

    let reference = ReferenceStore::from_rows(vec![vec![0.0, 0.0, 1.0]]).unwrap();
    let engine = engine_over(reference);
    let analyzer = engine.analyzer().unwrap();

    {
        let history = HistoryStore::open(&history_path);
        for text in [
            "Zebras graze quietly near the river",
            "Telescopes photograph a distant galaxy cluster",
        ] {
            let analysis = analyzer.analyze(text).await.unwrap();
            history.insert_at_front(analysis.record).await;
        }
    }

    let reopened = HistoryStore::open(&history_path);
    let recent = reopened.recent(10).await;
    assert_eq!(recent.len(), 2);
    assert!(recent[0].text.starts_with("Telescopes"));
    assert!(recent[1].text.starts_with("Zebras"));

    let stats = reopened.stats().await;
    assert_eq!(stats.total, 2);
    assert_eq!(stats.new, 2);
}

#[tokio::test]
async fn long_text_is_truncated_in_record_only() {
    let reference = ReferenceStore::from_rows(vec![vec![1.0, 0.0, 0.0]]).unwrap();
    let engine = engine_over(reference);
    let analyzer = engine.analyzer().unwrap();

    let text = "zebra giraffe telescope quantum ".repeat(20);
    let analysis = analyzer.analyze(&text).await.unwrap();

    assert_eq!(analysis.original_words, 80);
    assert_eq!(analysis.record.word_count, 80);
    assert!(analysis.record.text.ends_with("..."));
    assert_eq!(analysis.record.text.chars().count(), 153);
}

#[tokio::test]
async fn rejected_text_never_reaches_embedder() {
    let reference = ReferenceStore::from_rows(vec![vec![1.0, 0.0, 0.0]]).unwrap();
    let engine = engine_over(reference);
    let analyzer = engine.analyzer().unwrap();

    assert!(matches!(
        analyzer.analyze("only three words").await,
        Err(AnalyzeError::TooShort { words: 3 })
    ));
    assert!(matches!(
        analyzer.analyze("").await,
        Err(AnalyzeError::EmptyText)
    ));
}

#[tokio::test]
async fn corrupt_history_is_replaced_on_next_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis_history.json");
    std::fs::write(&path, "[{\"broken\": ").unwrap();

    let history = HistoryStore::open(&path);
    assert!(history.is_empty().await);

    let reference = ReferenceStore::from_rows(vec![vec![1.0, 0.0, 0.0]]).unwrap();
    let engine = engine_over(reference);
    let analysis = engine
        .analyzer()
        .unwrap()
        .analyze("Telescopes photograph a distant galaxy")
        .await
        .unwrap();
    history.insert_at_front(analysis.record).await;

    let reopened = HistoryStore::open(&path);
    assert_eq!(reopened.len().await, 1);
}
