// tests/pipeline_run.rs
use std::fs;
use std::path::Path;
use wordscore::config::ScorerConfig;
use wordscore::pipeline::score_directory;
use wordscore::{DictionaryParseError, Ratio, ScoreError};

fn config_for(root: &Path) -> ScorerConfig {
    let mut cfg = ScorerConfig::default();
    cfg.dictionary.path = root.join("wordlist.csv");
    cfg.documents.dir = root.join("Textfiles");
    cfg.documents.extensions = vec!["txt".into()];
    cfg.workers.documents = 2;
    cfg
}

#[tokio::test]
async fn malformed_dictionary_fails_before_any_document_is_touched() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("wordlist.csv"),
        "growth,1.0,0.0\nrisk management,zero,2.0\n",
    )
    .unwrap();
    // documents dir deliberately missing: listing it would be a different error
    let cfg = config_for(tmp.path());

    let err = score_directory(&cfg).await.err().expect("dictionary error");
    match err.downcast_ref::<DictionaryParseError>() {
        Some(DictionaryParseError::InvalidWeight { line, value, .. }) => {
            assert_eq!(*line, 2);
            assert_eq!(value, "zero");
        }
        other => panic!("expected InvalidWeight, got {other:?} ({err:#})"),
    }
    assert!(format!("{err:#}").contains("loading dictionary"));
}

#[tokio::test]
async fn missing_documents_dir_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("wordlist.csv"), "growth,1.0,0.0\n").unwrap();
    let cfg = config_for(tmp.path());

    let err = score_directory(&cfg).await.err().expect("discovery error");
    assert!(format!("{err:#}").contains("listing documents"), "{err:#}");
}

#[tokio::test]
async fn scores_directory_in_name_order_and_isolates_bad_files() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("wordlist.csv"),
        "growth,1.0,0.0\nrisk management,0.0,2.0\n",
    )
    .unwrap();
    let docs = tmp.path().join("Textfiles");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("b.txt"), "Growth risk management growth").unwrap();
    fs::write(docs.join("a.txt"), "Risk management, again: risk management.").unwrap();
    fs::write(docs.join("c.txt"), [0xffu8, 0xfe, 0x00]).unwrap();
    fs::write(docs.join("notes.md"), "growth growth growth").unwrap();
    fs::create_dir(docs.join("nested.txt")).unwrap();

    let run = score_directory(&config_for(tmp.path())).await.unwrap();
    assert_eq!(run.dictionary.len(), 2);

    let ids: Vec<&str> = run.outcome.reports.iter().map(|r| r.document_id()).collect();
    assert_eq!(ids, vec!["a.txt", "b.txt"]);

    let a = &run.outcome.reports[0];
    assert_eq!(a.count("risk management"), Some(2));
    assert_eq!(a.ratio(), Ratio::Undefined);

    let b = &run.outcome.reports[1];
    assert_eq!(b.total_tokens(), 4);
    assert_eq!(b.ratio(), Ratio::Defined(1.0));

    assert_eq!(run.outcome.failures.len(), 1);
    assert_eq!(run.outcome.failures[0].document_id, "c.txt");
    assert!(matches!(run.outcome.failures[0].error, ScoreError::Read(_)));
}

#[tokio::test]
async fn header_only_dictionary_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("wordlist.csv"), "phrase,explore,exploit\n").unwrap();
    let mut cfg = config_for(tmp.path());
    cfg.dictionary.has_header = true;

    let err = score_directory(&cfg).await.err().expect("dictionary error");
    assert!(matches!(
        err.downcast_ref::<DictionaryParseError>(),
        Some(DictionaryParseError::Empty)
    ));
}
