use lendkeep_core::transfer::{import_items, import_students, ImportReport};
use lendkeep_core::{EntityStore, Item, Student};

#[test]
fn first_occurrence_wins_within_one_batch() {
    let mut store = EntityStore::new();

    let report = import_students(
        &mut store,
        "Name,NetID,Phone\nBob,bob1,555-0101\nBob,bob1,555-9999",
    );

    assert_eq!(
        report,
        ImportReport {
            added: 1,
            duplicates: 1,
            malformed: 0
        }
    );
    assert_eq!(store.student_count(), 1);
    assert_eq!(store.find_student("bob1").unwrap().phone, "555-0101");
}

#[test]
fn existing_students_are_never_overwritten() {
    let mut store = EntityStore::new();
    store
        .add_student(Student::new("Ann Lee", "alee1", "555-0100"))
        .unwrap();

    let report = import_students(
        &mut store,
        "Name,NetID,Phone\nImpostor,alee1,000\nCara Diaz,cdiaz,555-0102\n",
    );

    assert_eq!(report.added, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(store.student_count(), 2);
    assert_eq!(store.find_student("alee1").unwrap().name, "Ann Lee");
    assert_eq!(store.list_students("")[0].net_id, "cdiaz");
}

#[test]
fn short_and_blank_rows_are_skipped_without_aborting() {
    let mut store = EntityStore::new();

    let report = import_students(
        &mut store,
        "Name,NetID,Phone\n\nOnly Name\nTwo,cols\n  \nGood,g1,1\n",
    );

    assert_eq!(report.added, 1);
    assert_eq!(report.malformed, 2);
    assert!(store.find_student("g1").is_some());
}

#[test]
fn fields_are_trimmed_and_name_quotes_removed() {
    let mut store = EntityStore::new();

    import_students(&mut store, "h\r\n  \"Ann Lee\" , alee1 , 555-0100 ,extra\r\n");

    let student = store.find_student("alee1").unwrap();
    assert_eq!(student.name, "Ann Lee");
    assert_eq!(student.phone, "555-0100");
}

#[test]
fn header_only_or_empty_input_adds_nothing() {
    let mut store = EntityStore::new();

    assert_eq!(import_students(&mut store, ""), ImportReport::default());
    assert_eq!(
        import_items(&mut store, "ItemName,ItemNumber,CheckedOutTo"),
        ImportReport::default()
    );
}

#[test]
fn quoted_name_with_comma_is_split_on_import() {
    let mut store = EntityStore::new();

    import_students(&mut store, "Name,NetID,Phone\n\"Lee, Ann\",alee1,555\n");

    // The comma inside quotes is still a separator; the stray quote stays
    // on the second column.
    let student = store.find_student("Ann\"").unwrap();
    assert_eq!(student.name, "Lee");
    assert_eq!(student.phone, "alee1");
    assert!(store.find_student("alee1").is_none());
}

#[test]
fn item_holder_column_is_optional_and_blank_means_available() {
    let mut store = EntityStore::new();

    let report = import_items(
        &mut store,
        "ItemName,ItemNumber,CheckedOutTo\nCalculator,C-01\nRuler,R-1,\nCompass,K-2, alee1 \nBad\n",
    );

    assert_eq!(report.added, 3);
    assert_eq!(report.malformed, 1);
    assert!(store.find_item("C-01").unwrap().is_available());
    assert!(store.find_item("R-1").unwrap().is_available());
    assert_eq!(
        store.find_item("K-2").unwrap().checked_out_to.as_deref(),
        Some("alee1")
    );
}

#[test]
fn item_import_dedups_on_number_and_tolerates_orphans() {
    let mut store = EntityStore::new();
    store.add_item(Item::new("Calculator", "C-01")).unwrap();

    let report = import_items(
        &mut store,
        "ItemName,ItemNumber,CheckedOutTo\nOther,C-01,\nStapler,S-3,nobody\n",
    );

    assert_eq!(report.added, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(store.find_item("C-01").unwrap().name, "Calculator");
    assert_eq!(
        lendkeep_core::relation::orphaned_items(&store)[0].number,
        "S-3"
    );
}

#[test]
fn imported_records_are_stamped_and_placed_newest_first() {
    let mut store = EntityStore::new();

    import_items(&mut store, "h\nFirst,F-1\nSecond,F-2\n");

    let items = store.list_items("");
    assert_eq!(items[0].number, "F-2");
    assert_eq!(items[1].number, "F-1");
    assert!(items[0].timestamp > items[1].timestamp);
}
