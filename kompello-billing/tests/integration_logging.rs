//! Integration tests for activity log entries

mod common;

use common::{input, Fixture};
use kompello_billing::{
    field::{DeleteField, GetField},
    item::{AddItem, GetItem},
    Execute, ExecutionResult, FieldDataType, OperationProcessor,
};
use serde_json::json;

#[test_log::test(tokio::test)]
async fn test_mutations_are_logged_and_reads_are_not() {
    let fx = Fixture::new();
    let company = fx.company("Acme").await;
    let field = fx.field(company, "skill_level", FieldDataType::Text).await;

    let add = AddItem::new(company, "Consulting", 120.0)
        .with_custom_fields(input(json!({"skill_level": "Senior"})));
    let (value, entry) = add.execute(&fx.member).await.split();
    let value = value.unwrap();
    let entry = entry.expect("mutations carry a log entry");
    assert_eq!(entry.op, "add item");
    assert_eq!(entry.output, value);
    assert_eq!(entry.input["name"], "Consulting");
    assert!(!entry.is_failure());
    let id = value["id"].as_str().unwrap().to_string();
    assert_eq!(add.affected_resource_ids(&value), vec![id]);

    let item = common::parse_id(&value);
    let read = GetItem::new(item).execute(&fx.member).await;
    assert!(!read.should_log());

    let read = GetField::new(field).execute(&fx.member).await;
    assert!(matches!(read, ExecutionResult::Unlogged { .. }));
}

#[test_log::test(tokio::test)]
async fn test_failed_mutations_record_the_error() {
    let fx = Fixture::new();
    let company = fx.company("Acme").await;
    let field = fx.field(company, "skill_level", FieldDataType::Text).await;
    fx.item(company, json!({"skill_level": "Senior"})).await;

    let result = DeleteField::new(field).execute(&fx.member).await;
    assert!(result.should_log());
    let (outcome, entry) = result.split();
    assert!(outcome.is_err());
    let entry = entry.unwrap();
    assert!(entry.is_failure());
    let error = entry.output["error"].as_str().unwrap();
    assert!(error.contains("data loss"));

    // the processor still surfaces the error to the caller
    let err = fx
        .processor
        .process(&DeleteField::new(field), &fx.member)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("data loss"));
}
