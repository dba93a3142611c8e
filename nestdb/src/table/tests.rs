use super::*;
use crate::record::{CREATED_AT_FIELD, UPDATED_AT_FIELD};
use crate::schema::{ColumnSpec, ColumnType};
use crate::value::Value;
use pretty_assertions::assert_eq;

fn users_schema() -> TableSchema {
    TableSchema::new()
        .column("username", ColumnSpec::of(ColumnType::String).unique())
        .column("email", ColumnSpec::of(ColumnType::String))
        .column("age", ColumnSpec::of(ColumnType::Number))
        .column("handle", ColumnSpec::of(ColumnType::String).readonly())
}

fn users_table() -> Table {
    Table::new(
        "users".to_string(),
        users_schema(),
        TableOptions::default(),
    )
}

fn fields(pairs: &[(&str, Value)]) -> FieldMap {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn test_insert_and_find_round_trip() {
    let mut table = users_table();
    let row_id = table
        .insert_one(fields(&[("username", Value::from("marek"))]))
        .unwrap()
        .row_id()
        .to_string();

    let found = table.find_one(&row_id).unwrap();
    assert_eq!(found.get("username"), Some(&Value::from("marek")));
    // Timestamp tracking is on by default, so the mirrored fields are there.
    assert!(found.contains_key(CREATED_AT_FIELD));
    assert!(found.contains_key(UPDATED_AT_FIELD));
}

#[test]
fn test_insert_without_timestamp_data() {
    let mut table = Table::new(
        "users".to_string(),
        users_schema(),
        TableOptions {
            timestamp_data: false,
            ..TableOptions::default()
        },
    );
    let record = table
        .insert_one(fields(&[("username", Value::from("marek"))]))
        .unwrap();
    assert!(!record.fields().contains_key(CREATED_AT_FIELD));
}

#[test]
fn test_inserts_get_distinct_ids() {
    let mut table = users_table();
    let first = table
        .insert_one(fields(&[("username", Value::from("a"))]))
        .unwrap()
        .row_id()
        .to_string();
    let second = table
        .insert_one(fields(&[("username", Value::from("b"))]))
        .unwrap()
        .row_id()
        .to_string();
    assert_ne!(first, second);
}

#[test]
fn test_insert_unknown_column_leaves_table_unchanged() {
    let mut table = users_table();
    let err = table
        .insert_one(fields(&[("nope", Value::from("x"))]))
        .unwrap_err();
    assert!(matches!(err, NestDbError::UnknownColumn { .. }));
    assert_eq!(table.len(), 0);
}

#[test]
fn test_insert_type_mismatch_leaves_table_unchanged() {
    let mut table = users_table();
    let err = table
        .insert_one(fields(&[("username", Value::from(42.0))]))
        .unwrap_err();
    assert!(matches!(err, NestDbError::TypeMismatch { .. }));
    assert_eq!(table.len(), 0);
}

#[test]
fn test_unique_constraint_on_insert() {
    let mut table = users_table();
    table
        .insert_one(fields(&[("username", Value::from("x"))]))
        .unwrap();
    let err = table
        .insert_one(fields(&[("username", Value::from("x"))]))
        .unwrap_err();
    assert!(matches!(err, NestDbError::UniqueConstraint { .. }));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_unique_constraint_can_be_disabled() {
    let mut table = Table::new(
        "users".to_string(),
        users_schema(),
        TableOptions {
            unique_constraints: false,
            ..TableOptions::default()
        },
    );
    table
        .insert_one(fields(&[("username", Value::from("x"))]))
        .unwrap();
    table
        .insert_one(fields(&[("username", Value::from("x"))]))
        .unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_update_one_merges_fields() {
    let mut table = users_table();
    let row_id = table
        .insert_one(fields(&[
            ("username", Value::from("marek")),
            ("email", Value::from("marek@example.com")),
        ]))
        .unwrap()
        .row_id()
        .to_string();

    let updated = table
        .update_one(&row_id, fields(&[("email", Value::from("new@example.com"))]))
        .unwrap();

    assert_eq!(
        updated.fields().get("email"),
        Some(&Value::from("new@example.com"))
    );
    // Keys absent from the update are untouched.
    assert_eq!(updated.fields().get("username"), Some(&Value::from("marek")));
    assert!(updated.updated_at() >= updated.created_at());
}

#[test]
fn test_update_one_unknown_record() {
    let mut table = users_table();
    let err = table
        .update_one("missing", fields(&[("email", Value::from("x"))]))
        .unwrap_err();
    assert!(matches!(err, NestDbError::RecordNotFound(_)));
}

#[test]
fn test_update_rejects_non_editable_column() {
    let mut table = users_table();
    let row_id = table
        .insert_one(fields(&[("handle", Value::from("fixed"))]))
        .unwrap()
        .row_id()
        .to_string();

    let err = table
        .update_one(&row_id, fields(&[("handle", Value::from("changed"))]))
        .unwrap_err();
    assert!(matches!(err, NestDbError::NotEditable { .. }));

    // Field unchanged.
    let found = table.find_one(&row_id).unwrap();
    assert_eq!(found.get("handle"), Some(&Value::from("fixed")));
}

#[test]
fn test_update_rejects_resubmitted_unique_value() {
    // The uniqueness scan does not exclude the record being updated, so a
    // record's own unchanged unique value collides with itself.
    let mut table = users_table();
    let row_id = table
        .insert_one(fields(&[("username", Value::from("marek"))]))
        .unwrap()
        .row_id()
        .to_string();

    let err = table
        .update_one(&row_id, fields(&[("username", Value::from("marek"))]))
        .unwrap_err();
    assert!(matches!(err, NestDbError::UniqueConstraint { .. }));

    // A different value for the unique column goes through.
    table
        .update_one(&row_id, fields(&[("username", Value::from("other"))]))
        .unwrap();
}

#[test]
fn test_delete_returns_record() {
    let mut table = users_table();
    let row_id = table
        .insert_one(fields(&[("username", Value::from("marek"))]))
        .unwrap()
        .row_id()
        .to_string();

    let removed = table.delete(&row_id).unwrap();
    assert_eq!(removed.row_id(), row_id);
    assert_eq!(table.len(), 0);
}

#[test]
fn test_delete_unknown_id_is_a_no_op() {
    let mut table = users_table();
    table
        .insert_one(fields(&[("username", Value::from("marek"))]))
        .unwrap();

    assert!(table.delete("missing").is_none());
    assert_eq!(table.len(), 1);
}

#[test]
fn test_find_where_matches_first_inserted() {
    let mut table = users_table();
    let first = table
        .insert_one(fields(&[
            ("username", Value::from("a")),
            ("email", Value::from("shared@example.com")),
        ]))
        .unwrap()
        .row_id()
        .to_string();
    table
        .insert_one(fields(&[
            ("username", Value::from("b")),
            ("email", Value::from("shared@example.com")),
        ]))
        .unwrap();

    let query = Query::new("email", "shared@example.com");
    let found = table.find_where(&query).unwrap().unwrap();
    assert_eq!(found.row_id(), first);
}

#[test]
fn test_find_where_miss_is_lenient_by_default() {
    let table = users_table();
    let query = Query::new("email", "missing@example.com");
    assert!(table.find_where(&query).unwrap().is_none());

    let err = table.find_where(&query.or_fail()).unwrap_err();
    assert!(matches!(err, NestDbError::RecordNotFound(_)));
}

#[test]
fn test_update_where_miss_honors_throw_on_miss() {
    let mut table = users_table();
    let query = Query::new("email", "missing@example.com");
    let data = fields(&[("email", Value::from("x"))]);

    // Lenient by default, an error once the query opts in.
    table.update_where(&query, &data, true).unwrap();
    let err = table
        .update_where(&query.or_fail(), &data, true)
        .unwrap_err();
    assert!(matches!(err, NestDbError::RecordNotFound(_)));
}

#[test]
fn test_delete_where_miss_honors_throw_on_miss() {
    let mut table = users_table();
    let query = Query::new("email", "missing@example.com");

    table.delete_where(&query, true).unwrap();
    let err = table.delete_where(&query.or_fail(), true).unwrap_err();
    assert!(matches!(err, NestDbError::RecordNotFound(_)));
}

#[test]
fn test_delete_where_single_removes_first_match_only() {
    let mut table = Table::new(
        "users".to_string(),
        users_schema(),
        TableOptions {
            unique_constraints: false,
            ..TableOptions::default()
        },
    );
    let first = table
        .insert_one(fields(&[("email", Value::from("e"))]))
        .unwrap()
        .row_id()
        .to_string();
    let second = table
        .insert_one(fields(&[("email", Value::from("e"))]))
        .unwrap()
        .row_id()
        .to_string();

    table
        .delete_where(&Query::new("email", "e"), false)
        .unwrap();

    assert_eq!(table.len(), 1);
    assert!(table.find_one(&first).is_none());
    assert!(table.find_one(&second).is_some());
}

#[test]
fn test_delete_where_multiple_removes_all_matches() {
    let mut table = Table::new(
        "users".to_string(),
        users_schema(),
        TableOptions {
            unique_constraints: false,
            ..TableOptions::default()
        },
    );
    table
        .insert_one(fields(&[("email", Value::from("e"))]))
        .unwrap();
    table
        .insert_one(fields(&[("email", Value::from("e"))]))
        .unwrap();
    let kept = table
        .insert_one(fields(&[("email", Value::from("other"))]))
        .unwrap()
        .row_id()
        .to_string();

    table.delete_where(&Query::new("email", "e"), true).unwrap();

    assert_eq!(table.len(), 1);
    assert!(table.find_one(&kept).is_some());
}

#[test]
fn test_update_where_all_matches() {
    let mut table = Table::new(
        "users".to_string(),
        users_schema(),
        TableOptions {
            unique_constraints: false,
            timestamp_data: false,
        },
    );
    table
        .insert_one(fields(&[
            ("username", Value::from("a")),
            ("email", Value::from("e")),
        ]))
        .unwrap();
    table
        .insert_one(fields(&[
            ("username", Value::from("b")),
            ("email", Value::from("e")),
        ]))
        .unwrap();

    table
        .update_where(
            &Query::new("email", "e"),
            &fields(&[("email", Value::from("moved"))]),
            true,
        )
        .unwrap();

    let moved: Vec<_> = table
        .snapshot()
        .filter(|(_, record)| record.fields().get("email") == Some(&Value::from("moved")))
        .collect();
    assert_eq!(moved.len(), 2);
}

#[test]
fn test_update_where_first_match_only() {
    let mut table = Table::new(
        "users".to_string(),
        users_schema(),
        TableOptions {
            unique_constraints: false,
            timestamp_data: false,
        },
    );
    let first = table
        .insert_one(fields(&[("email", Value::from("e"))]))
        .unwrap()
        .row_id()
        .to_string();
    let second = table
        .insert_one(fields(&[("email", Value::from("e"))]))
        .unwrap()
        .row_id()
        .to_string();

    table
        .update_where(
            &Query::new("email", "e"),
            &fields(&[("email", Value::from("moved"))]),
            false,
        )
        .unwrap();

    assert_eq!(
        table.find_one(&first).unwrap().get("email"),
        Some(&Value::from("moved"))
    );
    assert_eq!(
        table.find_one(&second).unwrap().get("email"),
        Some(&Value::from("e"))
    );
}

#[test]
fn test_snapshot_preserves_insertion_order() {
    let mut table = users_table();
    let mut inserted = Vec::new();
    for name in ["a", "b", "c"] {
        inserted.push(
            table
                .insert_one(fields(&[("username", Value::from(name))]))
                .unwrap()
                .row_id()
                .to_string(),
        );
    }

    let scanned: Vec<String> = table
        .snapshot()
        .map(|(row_id, _)| row_id.to_string())
        .collect();
    assert_eq!(scanned, inserted);
}

#[test]
fn test_order_survives_deletion() {
    let mut table = users_table();
    let ids: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|name| {
            table
                .insert_one(fields(&[("username", Value::from(*name))]))
                .unwrap()
                .row_id()
                .to_string()
        })
        .collect();

    table.delete(&ids[1]);

    let scanned: Vec<&str> = table.snapshot().map(|(row_id, _)| row_id).collect();
    assert_eq!(scanned, vec![ids[0].as_str(), ids[2].as_str()]);
}

#[test]
fn test_mirror_overwrites_supplied_timestamp_fields() {
    // With timestamp tracking on, `created_at`/`updated_at` are reserved:
    // even a schema-declared column under those names ends up holding the
    // mirrored value, not what the caller supplied.
    let mut table = Table::new(
        "events".to_string(),
        TableSchema::new()
            .column("name", ColumnSpec::of(ColumnType::String))
            .column(CREATED_AT_FIELD, ColumnSpec::of(ColumnType::Timestamp)),
        TableOptions::default(),
    );

    let supplied = Value::Timestamp(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH);
    let record = table
        .insert_one(fields(&[
            ("name", Value::from("launch")),
            (CREATED_AT_FIELD, supplied.clone()),
        ]))
        .unwrap();

    assert_ne!(record.fields().get(CREATED_AT_FIELD), Some(&supplied));
    assert_eq!(
        record.fields().get(CREATED_AT_FIELD),
        Some(&Value::Timestamp(record.created_at()))
    );
}

#[test]
fn test_record_mut_allows_full_replace() {
    let mut table = users_table();
    let row_id = table
        .insert_one(fields(&[("username", Value::from("marek"))]))
        .unwrap()
        .row_id()
        .to_string();

    let record = table.record_mut(&row_id).unwrap();
    record.set_fields(fields(&[("username", Value::from("replaced"))]));

    let found = table.find_one(&row_id).unwrap();
    assert_eq!(found.get("username"), Some(&Value::from("replaced")));
    // set_fields re-stamps the mirrored timestamps.
    assert!(found.contains_key(CREATED_AT_FIELD));
}
