use super::*;
use tempfile::TempDir;

fn write_migration(dir: &Path, version: &str, name: &str, up: &str) {
    std::fs::write(
        dir.join(format!("{version}_{name}.migration")),
        format!("SQL_UP = '''{up}'''\nSQL_DOWN = '''drop table {name};'''\n"),
    )
    .unwrap();
}

#[test]
fn test_scan_sorts_and_ignores_other_files() {
    let dir = TempDir::new().unwrap();
    write_migration(dir.path(), "20090212112105", "second", "create table second (id int);");
    write_migration(dir.path(), "20090212112104", "first", "create table first (id int);");
    std::fs::write(dir.path().join("README.md"), "notes").unwrap();
    std::fs::write(dir.path().join("bad-name.migration"), "SQL_UP='x'\nSQL_DOWN='y'").unwrap();
    std::fs::create_dir(dir.path().join("20090212112106_nested.migration")).unwrap();

    let catalog = MigrationCatalog::scan(&[dir.path().to_path_buf()], FileEncoding::Utf8).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.all_versions(), vec!["20090212112104", "20090212112105"]);
    assert_eq!(catalog.latest().unwrap(), "20090212112105");
}

#[test]
fn test_scan_merges_directories() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    write_migration(a.path(), "20090212112104", "first", "create table first (id int);");
    write_migration(b.path(), "20090212112103", "zero", "create table zero (id int);");

    let catalog = MigrationCatalog::scan(
        &[a.path().to_path_buf(), b.path().to_path_buf()],
        FileEncoding::Utf8,
    )
    .unwrap();
    assert_eq!(catalog.all_versions(), vec!["20090212112103", "20090212112104"]);
}

#[test]
fn test_duplicate_version_last_scanned_wins() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    write_migration(a.path(), "20090212112104", "from_a", "select 1;");
    write_migration(b.path(), "20090212112104", "from_b", "select 2;");

    let catalog = MigrationCatalog::scan(
        &[a.path().to_path_buf(), b.path().to_path_buf()],
        FileEncoding::Utf8,
    )
    .unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.migrations()[0].title, "from_b");
}

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        MigrationCatalog::scan(&[missing], FileEncoding::Utf8),
        Err(CoreError::DirectoryNotFound { .. })
    ));
}

#[test]
fn test_empty_directory_has_no_migrations() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        MigrationCatalog::scan(&[dir.path().to_path_buf()], FileEncoding::Utf8),
        Err(CoreError::NoMigrationsFound { .. })
    ));
}

#[test]
fn test_malformed_file_fails_the_scan() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("20090212112104_broken.migration"), "SQL_UP = 'x'").unwrap();
    assert!(matches!(
        MigrationCatalog::scan(&[dir.path().to_path_buf()], FileEncoding::Utf8),
        Err(CoreError::MalformedMigration { .. })
    ));
}

#[test]
fn test_lookups() {
    let dir = TempDir::new().unwrap();
    for (version, name) in [
        ("20090212112104", "a"),
        ("20090212112105", "b"),
        ("20090212112106", "c"),
    ] {
        write_migration(dir.path(), version, name, "select 1;");
    }
    let catalog = MigrationCatalog::scan(&[dir.path().to_path_buf()], FileEncoding::Utf8).unwrap();

    assert!(catalog.exists("20090212112105"));
    assert!(!catalog.exists("2009021211210"));
    assert!(!catalog.exists("0"));
    assert_eq!(catalog.get("20090212112106").unwrap().title, "c");
    assert_eq!(
        catalog.versions_before("20090212112106"),
        vec!["20090212112104", "20090212112105"]
    );
    assert!(catalog.versions_before("1").is_empty());
}

#[test]
fn test_from_migrations_sorts_and_dedups() {
    let m = |v: &str, f: &str| {
        crate::migration::Migration::from_history(1, Version::try_new(v).unwrap(), None, f, "u", "d")
    };
    let catalog = MigrationCatalog::from_migrations(vec![
        m("20090212112105", "b.migration"),
        m("20090212112104", "a.migration"),
        m("20090212112105", "c.migration"),
    ]);
    assert_eq!(catalog.all_versions(), vec!["20090212112104", "20090212112105"]);
    assert_eq!(catalog.migrations()[1].file_name, "c.migration");
}

#[test]
fn test_shuffled_input_sorts_back_to_catalog_order() {
    let m = |v: &str, f: &str| {
        crate::migration::Migration::from_history(1, Version::try_new(v).unwrap(), None, f, "u", "d")
    };
    let ordered = vec![
        m("20090212112104", "20090212112104_a.migration"),
        m("20090212112105", "20090212112105_a.migration"),
        m("20090212112105", "20090212112105_b.migration"),
        m("20090212112200", "20090212112200_a.migration"),
        m("20090301000000", "20090301000000_a.migration"),
        m("20100101000000", "20100101000000_a.migration"),
        m("20100101000001", "20100101000001_a.migration"),
    ];

    // Every rotation and the reversal of the ordered list, each interleaved.
    let mut shuffles: Vec<Vec<_>> = (0..ordered.len())
        .map(|k| {
            let mut rotated = ordered.clone();
            rotated.rotate_left(k);
            let (evens, odds): (Vec<_>, Vec<_>) =
                rotated.into_iter().enumerate().partition(|(i, _)| i % 2 == 0);
            odds.into_iter().chain(evens).map(|(_, m)| m).collect()
        })
        .collect();
    shuffles.push(ordered.iter().rev().cloned().collect());

    for mut shuffled in shuffles {
        shuffled.sort_by(crate::migration::Migration::compare);
        let names: Vec<&str> = shuffled.iter().map(|m| m.file_name.as_str()).collect();
        let expected: Vec<&str> = ordered.iter().map(|m| m.file_name.as_str()).collect();
        assert_eq!(names, expected);
    }

    let unique: Vec<_> = ordered
        .iter()
        .filter(|m| m.file_name != "20090212112105_b.migration")
        .cloned()
        .collect();
    let mut reversed = unique.clone();
    reversed.reverse();
    assert_eq!(
        MigrationCatalog::from_migrations(reversed).all_versions(),
        MigrationCatalog::from_migrations(unique).all_versions()
    );
}
