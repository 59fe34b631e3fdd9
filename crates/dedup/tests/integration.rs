use std::collections::BTreeSet;
use std::path::PathBuf;

use notcore_dedup::builder::{find_against_persisted, find_in_file, find_in_file_par};
use notcore_dedup::registry::DeduplicationTypeName::{self, FullName, Ids, Names};
use notcore_dedup::{
    run, Catalog, DedupSettings, DeduplicationConfig, DuplicateSets, Entity, LogicalOperator,
    StoredRecord, Table,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_rows(file: &str) -> Vec<Vec<String>> {
    let path = fixtures_dir().join(file);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn individuals() -> Table {
    Table::load(&read_rows("individuals.csv")).unwrap()
}

fn persisted() -> Vec<StoredRecord> {
    let rows = read_rows("persisted.csv");
    let (header, data) = rows.split_first().unwrap();
    data.iter()
        .map(|row| {
            let fields = header.iter().map(String::as_str).zip(row.iter().map(String::as_str));
            StoredRecord::new(&row[0], fields).unwrap()
        })
        .collect()
}

fn dupes(operator: LogicalOperator, names: &[DeduplicationTypeName]) -> DuplicateSets {
    find_in_file(&individuals(), &DeduplicationConfig::new(operator, names)).unwrap()
}

fn set(items: &[usize]) -> BTreeSet<usize> {
    items.iter().copied().collect()
}

// -------------------------------------------------------------------------
// Documented fixture scenarios
// -------------------------------------------------------------------------

#[test]
fn ids_match_across_id_columns() {
    let s = dupes(LogicalOperator::Or, &[Ids]);
    assert_eq!(s.get(0), Some(&set(&[2, 3, 4, 6, 7])));
    assert_eq!(s.get(9), Some(&set(&[])));
}

#[test]
fn names_require_all_four_columns() {
    let s = dupes(LogicalOperator::Or, &[Names]);
    assert_eq!(s.get(0), Some(&set(&[6, 7, 8])));
    assert_eq!(s.get(3), Some(&set(&[4])));
}

#[test]
fn names_and_ids_combined() {
    // Both types must agree for rows 6 and 7 only.
    assert_eq!(dupes(LogicalOperator::And, &[Names, Ids]).get(0), Some(&set(&[6, 7])));
    // Either type is enough.
    assert_eq!(
        dupes(LogicalOperator::Or, &[Names, Ids]).get(0),
        Some(&set(&[2, 3, 4, 6, 7, 8]))
    );
}

#[test]
fn identical_full_names_pair_up() {
    let s = dupes(LogicalOperator::Or, &[FullName]);
    assert_eq!(s.get(0), Some(&set(&[5])));
    assert_eq!(s.get(5), Some(&set(&[0])));
    assert_eq!(s.pairs(), vec![(0, 5)]);
}

#[test]
fn names_ids_and_full_name_regression() {
    // No row agrees with row 0 on names, ids and full name at once.
    let s = dupes(LogicalOperator::And, &[Names, Ids, FullName]);
    assert_eq!(s.get(0), Some(&set(&[])));
    assert!(s.is_empty());

    let s = dupes(LogicalOperator::Or, &[Names, Ids, FullName]);
    assert_eq!(s.get(0), Some(&set(&[2, 3, 4, 5, 6, 7, 8])));
    assert_eq!(s.get(5), Some(&set(&[0, 1, 8])));
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

#[test]
fn symmetric_self_free_and_repeatable() {
    let t = individuals();
    let combos: [&[DeduplicationTypeName]; 4] =
        [&[Ids], &[Names], &[Names, Ids], &[Names, Ids, FullName]];
    for op in [LogicalOperator::Or, LogicalOperator::And] {
        for names in combos {
            let config = DeduplicationConfig::new(op, names);
            let first = find_in_file(&t, &config).unwrap();
            assert!(first.is_symmetric(), "{op} {names:?}");
            for (row, others) in first.iter() {
                assert!(!others.contains(&row));
            }
            assert_eq!(first, find_in_file(&t, &config).unwrap());
            assert_eq!(first, find_in_file_par(&t, &config).unwrap());
        }
    }
}

#[test]
fn no_types_no_duplicates_for_either_operator() {
    for op in [LogicalOperator::Or, LogicalOperator::And] {
        let s = dupes(op, &[]);
        assert_eq!(s.len(), 10);
        assert!(s.is_empty());
    }
}

#[test]
fn config_from_identifiers_rejects_unknown_types() {
    let err = DeduplicationConfig::from_names(&["Ids", "Nickname"], "OR").unwrap_err();
    assert_eq!(err.to_string(), "invalid deduplication type: Nickname");
}

// -------------------------------------------------------------------------
// Persisted records
// -------------------------------------------------------------------------

#[test]
fn rows_matching_persisted_records() {
    let t = individuals();
    let stored = persisted();
    let config = DeduplicationConfig::new(LogicalOperator::Or, &[Ids, Names]);
    let found = find_against_persisted(&t, &config, &stored).unwrap();

    let ids: Vec<(usize, Vec<&str>)> = found
        .iter()
        .map(|(row, es)| (*row, es.iter().map(|e| e.id()).collect()))
        .collect();
    assert_eq!(ids, vec![(1, vec!["db-2"]), (9, vec!["db-1"])]);
}

// -------------------------------------------------------------------------
// Full pass
// -------------------------------------------------------------------------

#[test]
fn full_pass_from_settings_file() {
    let toml = std::fs::read_to_string(fixtures_dir().join("registration.dedup.toml")).unwrap();
    let settings = DedupSettings::from_toml(&toml).unwrap();
    let catalog = Catalog::for_locale(&settings.report.locale);
    let report = run(&individuals(), &settings, &persisted(), &catalog).unwrap();

    assert_eq!(report.meta.config_name, "Registration batch");
    assert_eq!(report.summary.rows, 10);
    assert_eq!(report.summary.identity_collisions, 0);
    assert_eq!(report.summary.rows_with_persisted_matches, 2);
    assert_eq!(report.summary.duplicate_pairs, report.file_duplicates.pairs().len());
    assert_eq!(
        report.diagnostics.len(),
        report.summary.duplicate_pairs + report.summary.rows_with_persisted_matches
    );

    let first = &report.diagnostics[0];
    assert_eq!(
        first.message,
        "Last name: C - Row 2 and Last name: C - Row 4 in your file are duplicates"
    );
    // Rows 0 and 2 share id "1" and the first three names; row 2 leaves the
    // other ids and the native name blank.
    assert_eq!(
        first.details,
        vec![
            ":: identification_number_1 :: Row 2: 1 | Row 4: 1",
            ":: identification_number_2 :: Row 2: 2 | Row 4: ",
            ":: identification_number_3 :: Row 2: 3 | Row 4: ",
            ":: first_name :: Row 2: A | Row 4: A",
            ":: middle_name :: Row 2: B | Row 4: B",
            ":: last_name :: Row 2: C | Row 4: C",
            ":: native_name :: Row 2: D | Row 4: ",
        ]
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["meta"]["operator"], "OR");
    assert_eq!(json["file_duplicates"][0], serde_json::json!([2, 3, 4, 6, 7, 8]));
    assert_eq!(json["persisted_duplicates"]["9"], serde_json::json!(["db-1"]));
}

#[test]
fn jagged_batch_is_rejected_before_scoring() {
    let mut rows = read_rows("individuals.csv");
    rows[4].pop();
    let err = Table::load(&rows).unwrap_err();
    assert!(err.to_string().contains("row 5"));
}
