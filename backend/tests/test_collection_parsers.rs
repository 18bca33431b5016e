use std::collections::BTreeSet;

use latin_library_backend::aggregator::{parse_all, parse_all_with, CollectionOutcome};
use latin_library_backend::collections::{all_collections, cassiodorus, silius, statius, vergil};
use latin_library_backend::parser::parse_collection;
use latin_library_backend::types::{Chapter, CollectionError, Record};
use latin_library_backend::validation::check_records;

mod helpers;
use helpers::*;

fn books_of(records: &[Record]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for r in records {
        if seen.last() != Some(&r.book) {
            seen.push(r.book.clone());
        }
    }
    seen
}

fn book_records<'a>(records: &'a [Record], book: &str) -> Vec<&'a Record> {
    records.iter().filter(|r| r.book == book).collect()
}

fn verses(records: &[&Record]) -> Vec<(String, u32, String)> {
    records
        .iter()
        .map(|r| (r.chapter.to_string(), r.verse, r.passage.clone()))
        .collect()
}

#[test]
fn test_aggregate_book_and_title_counts() {
    let source = synthetic_corpus();
    let aggregate = parse_all(&source, &all_collections());

    assert!(aggregate.is_complete(), "failures: {:?}", aggregate.failures);

    let books: BTreeSet<&str> = aggregate.records.iter().map(|r| r.book.as_str()).collect();
    assert_eq!(books.len(), CASSIODORUS_BOOKS + STATIUS_BOOKS + VERGIL_BOOKS + SILIUS_BOOKS);
    assert_eq!(books.len(), 79);

    let titles: BTreeSet<&str> = aggregate.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles.into_iter().collect::<Vec<&str>>(), vec!["Cassiodorus", "Silius", "Statius", "Vergil"]);

    assert_eq!(aggregate.records.len(), 79 + 71 + 78 + 68);
}

#[test]
fn test_aggregate_keeps_collection_order() {
    let source = synthetic_corpus();
    let aggregate = parse_all(&source, &all_collections());

    let mut titles: Vec<&str> = Vec::new();
    for r in aggregate.records.iter() {
        if titles.last() != Some(&r.title.as_str()) {
            titles.push(&r.title);
        }
    }
    assert_eq!(titles, vec!["Cassiodorus", "Statius", "Vergil", "Silius"]);
}

#[test]
fn test_records_hold_invariants() {
    let source = synthetic_corpus();
    let aggregate = parse_all(&source, &all_collections());

    let violations = check_records(&aggregate.records, Some(aggregate.walked_links.as_slice()));
    assert!(violations.is_empty(), "{:?}", violations);

    for r in aggregate.records.iter() {
        assert!(r.verse > 0);
        assert!(!r.passage.is_empty());
        assert_eq!(r.language, "Latin");
        for field in [&r.title, &r.book, &r.author, &r.dates, &r.passage, &r.link] {
            assert!(!field.contains('\n'), "line break in {:?}", r);
        }
    }
}

#[test]
fn test_parsing_is_idempotent() {
    let source = synthetic_corpus();
    let first = parse_all(&source, &all_collections());
    let second = parse_all(&source, &all_collections());
    assert_eq!(first.records, second.records);
}

#[test]
fn test_cassiodorus() {
    let records = parse_collection(&cassiodorus(), &synthetic_corpus()).unwrap();

    assert_eq!(books_of(&records), cassiodorus_book_names());

    let r = &records[0];
    assert_eq!(r.author, "MAGNVS AVRELIVS CASSIODORVS");
    assert_eq!(r.dates, "c. 485 - c. 585");
    assert_eq!(r.link, "www.thelatinlibrary.com/cassiodorus/book1.shtml");

    assert_eq!(
        verses(&book_records(&records, "Variae 1")),
        vec![
            ("I. Universis".to_string(), 1, "Prima sententia".to_string()),
            ("I. Universis".to_string(), 2, "secunda sententia".to_string()),
            ("I. Universis".to_string(), 3, "tertia sententia".to_string()),
            ("I. Universis".to_string(), 4, "quarta sententia longior".to_string()),
            ("II. Regi".to_string(), 1, "quinta sententia".to_string()),
        ]
    );

    // Counted book without chapter headings, the near-empty paragraph is skipped.
    assert_eq!(
        verses(&book_records(&records, "Orationum Reliquiae")),
        vec![
            ("null".to_string(), 1, "ORATIO fragmentum primum".to_string()),
            ("null".to_string(), 2, "fragmentum secundum".to_string()),
        ]
    );

    // Dotted numbering, the text before the first number is dropped.
    assert_eq!(
        verses(&book_records(&records, "De Musica")),
        vec![
            ("De Musica".to_string(), 1, "Musica est scientia".to_string()),
            ("De Musica".to_string(), 2, "bene modulandi".to_string()),
        ]
    );
}

#[test]
fn test_statius() {
    let records = parse_collection(&statius(), &synthetic_corpus()).unwrap();

    assert_eq!(books_of(&records), statius_book_names());
    assert_eq!(records[0].author, "P. PAPINIVS STATIVS");
    assert_eq!(records[0].dates, "c. 45 - c. 96 A.D.");

    assert_eq!(
        verses(&book_records(&records, "Thebaid 1")),
        vec![
            ("null".to_string(), 1, "Fraternas acies alternaque regna profanis".to_string()),
            ("null".to_string(), 2, "decertata odiis sontesque evolvere Thebas,".to_string()),
            ("null".to_string(), 3, "Pierius menti calor incidit. unde iubetis".to_string()),
            ("null".to_string(), 4, "ire, deae?".to_string()),
        ]
    );

    let silvae = vec![
        ("PRAEFATIO".to_string(), 1, "Statius Stellae suo salutem. Diu multumque dubitavi".to_string()),
        ("I. ECLOGA".to_string(), 1, "Summa deum, Arcadii fecunda sententia".to_string()),
        ("I. ECLOGA".to_string(), 2, "Hic nitor et versus".to_string()),
    ];
    // Silvae 2 and 5 only carry <br> line breaks.
    for book in ["Silvae 1", "Silvae 2", "Silvae 5"] {
        assert_eq!(verses(&book_records(&records, book)), silvae, "{}", book);
    }
}

#[test]
fn test_vergil() {
    let records = parse_collection(&vergil(), &synthetic_corpus()).unwrap();

    assert_eq!(books_of(&records), vergil_book_names());
    assert_eq!(records[0].author, "P. VERGILIVS MARO");
    assert_eq!(records[0].dates, "70 - 19 B.C.");

    let expected = vec![
        ("null".to_string(), 1, "Tityre, tu patulae recubans sub tegmine fagi".to_string()),
        ("null".to_string(), 2, "silvestrem tenui Musam meditaris avena;".to_string()),
        ("null".to_string(), 3, "nos patriae finis et dulcia linquimus arva.".to_string()),
    ];
    // Aeneid 3 is a <br> only page.
    for book in ["Ecloga 1", "Georgicon 2", "Aeneid 3", "Aeneid 12"] {
        assert_eq!(verses(&book_records(&records, book)), expected, "{}", book);
    }
}

#[test]
fn test_silius() {
    let records = parse_collection(&silius(), &synthetic_corpus()).unwrap();

    let names: Vec<String> = (1..=17).map(|n| format!("Punica {}", n)).collect();
    assert_eq!(books_of(&records), names);
    assert!(records.iter().all(|r| r.title == "Silius"));
    assert_eq!(records[0].dates, "c. 26 - c. 102 A.D.");

    let expected = vec![
        ("null".to_string(), 1, "Ordior arma, quibus caelo se gloria tollit".to_string()),
        ("null".to_string(), 2, "Aeneadum, patiturque ferox Oenotria iura".to_string()),
        ("null".to_string(), 10, "Carthago.".to_string()),
        ("null".to_string(), 11, "da, Musa, decus memorare laborum".to_string()),
    ];
    // Punica 16 has its verse number on a line of its own.
    for book in ["Punica 1", "Punica 16", "Punica 17"] {
        assert_eq!(verses(&book_records(&records, book)), expected, "{}", book);
    }
}

#[test]
fn test_failed_collection_is_reported_and_others_kept() {
    let mut source = synthetic_corpus();
    source.insert(
        "www.thelatinlibrary.com/verg.html",
        page("Vergil", "<h1>P. VERGILIVS MARO</h1><a href=\"vergil/book1.shtml\">Ecloga 1</a><a href=\"a.html\">a</a><a href=\"b.html\">b</a>"),
    );

    let mut observed: Vec<(String, bool)> = Vec::new();
    let aggregate = parse_all_with(&source, &all_collections(), |config, outcome| {
        observed.push((config.slug.to_string(), matches!(outcome, CollectionOutcome::Parsed(_))));
    });

    assert_eq!(
        observed,
        vec![
            ("cassiodorus".to_string(), true),
            ("statius".to_string(), true),
            ("verg".to_string(), false),
            ("silius".to_string(), true),
        ]
    );

    assert_eq!(aggregate.failures.len(), 1);
    assert_eq!(aggregate.failures[0].slug, "verg");
    assert!(matches!(aggregate.failures[0].error, CollectionError::MissingElement { .. }));
    assert!(aggregate.records.iter().all(|r| r.title != "Vergil"));
    assert_eq!(aggregate.records.len(), 79 + 71 + 68);
}

#[test]
fn test_missing_book_page_aborts_only_that_collection() {
    let mut source = synthetic_corpus();
    source.remove("www.thelatinlibrary.com/silius/book9.shtml");

    let aggregate = parse_all(&source, &all_collections());
    assert_eq!(aggregate.failures.len(), 1);
    assert!(matches!(aggregate.failures[0].error, CollectionError::Source { .. }));
    assert!(aggregate.records.iter().all(|r| r.title != "Silius"));
}

#[test]
fn test_chapters_never_empty() {
    let aggregate = parse_all(&synthetic_corpus(), &all_collections());
    for r in aggregate.records.iter() {
        match &r.chapter {
            Chapter::Named(label) => assert!(!label.trim().is_empty()),
            Chapter::None => assert_eq!(r.chapter.as_str(), "null"),
        }
    }
}
