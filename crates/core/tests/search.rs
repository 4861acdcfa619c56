use racksearch_core::{
    search, BookRecord, ColumnMap, Config, ConfigStore, LogicalField, SearchEngine,
};
use racksearch_sheet::Table;
use tempfile::tempdir;

fn atlas_and_map() -> Table {
    Table::from_data(vec![
        vec!["Number", "Name"],
        vec!["101", "Atlas"],
        vec!["12", "Map"],
    ])
    .unwrap()
}

fn number_only() -> ColumnMap {
    ColumnMap::new("Number", "", "")
}

#[test]
fn test_query_one_matches_both_rows() {
    let table = atlas_and_map();
    let rows = search(&table, &number_only(), LogicalField::Number, "1");
    let records: Vec<_> = rows.iter().map(|r| table.record(r)).collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["Number"], "101");
    assert_eq!(records[0]["Name"], "Atlas");
    assert_eq!(records[1]["Number"], "12");
}

#[test]
fn test_query_101_matches_atlas_only() {
    let table = atlas_and_map();
    let rows = search(&table, &number_only(), LogicalField::Number, "101");

    assert_eq!(rows.len(), 1);
    assert_eq!(table.record(rows[0])["Name"], "Atlas");
}

#[test]
fn test_included_iff_value_contains_query() {
    let table = Table::from_data(vec![
        vec!["No", "Title", "Rack"],
        vec!["1", "Pride and Prejudice", "R1"],
        vec!["2", "PRIDE", "R2"],
        vec!["3", "Sense and Sensibility", "R3"],
        vec!["4", "", "R4"],
    ])
    .unwrap();
    let map = ColumnMap::new("No", "Title", "Rack");

    for query in ["pride", "and", "e", "sense and", "zzz", "R", "prejudice "] {
        let hits = search(&table, &map, LogicalField::Name, query);
        for row in table.rows() {
            let value = table.record(row)["Title"].to_lowercase();
            let included = hits.iter().any(|hit| std::ptr::eq(*hit, row));
            assert_eq!(
                included,
                value.contains(&query.to_lowercase()),
                "query {query:?} on {value:?}"
            );
        }
    }
}

#[test]
fn test_end_to_end_with_saved_config() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join("config.json"));

    let mut config = Config::with_url("https://example.com/books.csv");
    config.column_map = ColumnMap::new("BK No", "Book Name", "Rack");
    store.save(&config).unwrap();

    let loaded = store.load();
    assert_eq!(loaded, config);

    let table =
        Table::from_csv_str("BK No,Book Name,Rack,Price\n5,Godaan,C4,120\n6,Gaban,C5,90").unwrap();
    let engine = SearchEngine::new(&table, &loaded.column_map);
    let rows = engine.search(LogicalField::Location, "c5");

    assert_eq!(
        engine.project_all(&rows),
        vec![BookRecord {
            number: "6".to_string(),
            name: "Gaban".to_string(),
            location: "C5".to_string(),
        }]
    );
}

#[test]
fn test_placeholder_map_resolves_against_logical_headers() {
    // A sheet whose headers already use the logical names works with the
    // first-run default map.
    let table = Table::from_csv_str("BK_Number,BK_name,BK_row\n1,Atlas,A1").unwrap();
    let config = Config::default();
    let rows = search(&table, &config.column_map, LogicalField::Name, "atl");
    assert_eq!(rows.len(), 1);
}
