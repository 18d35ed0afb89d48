use dynamic_form::errors::FormError;
use dynamic_form::records::{Record, RecordTable};

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().copied().collect()
}

#[test]
fn append_returns_positions_in_order() {
    let mut table = RecordTable::new();
    assert_eq!(table.append(record(&[("firstName", "A")])), 0);
    assert_eq!(table.append(record(&[("firstName", "B")])), 1);
    assert_eq!(table.len(), 2);
    assert_eq!(table.row_at(1).unwrap().values.get("firstName"), Some("B"));
}

#[test]
fn update_merges_and_keeps_other_columns() {
    let mut table = RecordTable::new();
    table.append(record(&[("firstName", "Ann"), ("city", "Austin")]));
    let created = table.row_at(0).unwrap().created_at;

    table
        .update_at(0, &record(&[("firstName", "Bea"), ("age", "41")]))
        .unwrap();

    let row = table.row_at(0).unwrap();
    assert_eq!(row.values.get("firstName"), Some("Bea"));
    assert_eq!(row.values.get("city"), Some("Austin"));
    assert_eq!(row.values.get("age"), Some("41"));
    assert_eq!(row.created_at, created);
    assert!(row.updated_at >= created);
}

#[test]
fn out_of_range_access_reports_length() {
    let mut table = RecordTable::new();
    table.append(record(&[("firstName", "A")]));

    let expected = FormError::IndexOutOfRange { index: 1, len: 1 };
    assert_eq!(table.row_at(1).unwrap_err(), expected);
    assert_eq!(table.update_at(1, &Record::new()).unwrap_err(), expected);
    assert_eq!(table.remove_at(1).unwrap_err(), expected);
    assert_eq!(table.len(), 1);
}

#[test]
fn remove_shifts_rows_and_ids_follow() {
    let mut table = RecordTable::new();
    for name in ["A", "B", "C"] {
        table.append(record(&[("firstName", name)]));
    }
    let c_id = table.row_at(2).unwrap().id;

    let removed = table.remove_at(1).unwrap();
    assert_eq!(removed.values.get("firstName"), Some("B"));
    assert_eq!(table.position_of(c_id), Some(1));
    assert_eq!(table.position_of(removed.id), None);
}
