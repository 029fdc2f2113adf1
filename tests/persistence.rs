use booldex::{analyze, BooldexErrorKind, BooleanIndex, DocId};
use proptest::prelude::*;
use tempfile::TempDir;

const CORPUS: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "Foxes are running; the dogs were sleeping!",
    "Привет, мир! Señor Ñandú's $5 cat-food.",
    "",
    "quick QUICK quick",
];

fn build(table_size: usize) -> BooleanIndex {
    let mut index = BooleanIndex::with_table_size(table_size);
    for (doc_id, text) in CORPUS.iter().enumerate() {
        index.add_document(doc_id as DocId, &analyze(text.as_bytes(), true));
    }
    index
}

fn queries() -> Vec<Vec<&'static str>> {
    vec![
        vec!["quick"],
        vec!["fox"],
        vec!["мир"],
        vec!["not", "quick"],
        vec!["quick", "and", "fox"],
        vec!["dog", "or", "cat-food"],
        vec!["nothing", "or", "quick"],
        vec!["quick", "nand", "fox"],
    ]
}

#[test]
fn save_then_load_answers_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.dat");

    let index = build(101);
    index.save(&path).unwrap();

    let mut loaded = BooleanIndex::with_table_size(3);
    loaded.add_document(0, &["stale"]);
    loaded.load(&path).unwrap();

    assert_eq!(loaded.table_size(), 101);
    assert_eq!(loaded.total_docs(), CORPUS.len() as u32);
    assert_eq!(loaded.get_postings("stale"), None);
    for entry in index.terms() {
        assert_eq!(loaded.get_postings(entry.term()), Some(entry.postings()));
        assert_eq!(
            loaded.get_collection_term_frequency(entry.term()),
            entry.collection_term_frequency()
        );
    }
    for q in queries() {
        assert_eq!(loaded.evaluate_query(&q), index.evaluate_query(&q), "{q:?}");
    }
    assert_eq!(loaded.evaluate_query(&["quick"]), vec![0, 4]);
    assert_eq!(loaded.get_collection_term_frequency("quick"), 4);
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = TempDir::new().unwrap();
    let mut index = build(11);
    let err = index.load(dir.path().join("nope.dat")).unwrap_err();
    assert!(matches!(err.into_inner(), BooldexErrorKind::OpenIndex { .. }));
    // A failed load leaves the index alone.
    assert_eq!(index.evaluate_query(&["quick"]), vec![0, 4]);
}

#[test]
fn unwritable_path_is_an_open_error() {
    let dir = TempDir::new().unwrap();
    let err = build(11).save(dir.path().join("no/such/dir/index.dat")).unwrap_err();
    assert!(matches!(err.into_inner(), BooldexErrorKind::OpenIndex { .. }));
}

#[test]
fn truncated_file_is_a_decoding_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.dat");
    build(5).save(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
    let err = BooleanIndex::open(&path).unwrap_err();
    assert!(err.is_corrupt_data(), "{err}");
}

fn word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-e]{1,3}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn round_trip_preserves_every_lookup(
        docs in proptest::collection::vec(proptest::collection::vec(word(), 0..8), 1..8),
        table_size in 1usize..17,
    ) {
        let mut index = BooleanIndex::with_table_size(table_size);
        for (doc_id, tokens) in docs.iter().enumerate() {
            index.add_document(doc_id as DocId, tokens);
        }

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.dat");
        index.save(&path).unwrap();
        let loaded = BooleanIndex::open(&path).unwrap();

        prop_assert_eq!(loaded.total_docs(), index.total_docs());
        prop_assert_eq!(loaded.term_count(), index.term_count());
        for entry in index.terms() {
            let t = entry.term();
            prop_assert_eq!(loaded.get_postings(t), index.get_postings(t));
            prop_assert_eq!(loaded.get_collection_term_frequency(t), index.get_collection_term_frequency(t));
            prop_assert_eq!(loaded.evaluate_query(&["not", t]), index.evaluate_query(&["not", t]));
            prop_assert!(entry.collection_term_frequency() as usize >= entry.postings().len());
        }
    }
}
