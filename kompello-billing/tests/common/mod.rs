//! Shared fixtures for billing integration tests

#![allow(dead_code)]

use kompello_billing::{
    company::AddCompany, field::AddField, item::AddItem, Actor, BillingContext,
    BillingOperationProcessor, CompanyId, CustomFieldInput, FieldDataType, FieldId, ItemId,
    OperationProcessor,
};
use serde_json::Value;

pub const MEMBER: &str = "alice";

pub struct Fixture {
    /// Administrator context
    pub admin: BillingContext,
    /// Context acting as [`MEMBER`], who belongs to every company created here
    pub member: BillingContext,
    pub processor: BillingOperationProcessor,
}

impl Fixture {
    pub fn new() -> Self {
        let admin = BillingContext::open_in_memory().unwrap();
        let member = admin.for_actor(Actor::user(MEMBER));
        Self {
            admin,
            member,
            processor: BillingOperationProcessor::new(),
        }
    }

    pub fn as_user(&self, user: &str) -> BillingContext {
        self.admin.for_actor(Actor::user(user))
    }

    pub async fn company(&self, name: &str) -> CompanyId {
        let result = self
            .processor
            .process(&AddCompany::new(name).with_member(MEMBER), &self.admin)
            .await
            .unwrap();
        parse_id(&result)
    }

    pub async fn field(&self, company: CompanyId, key: &str, data_type: FieldDataType) -> FieldId {
        let result = self
            .processor
            .process(
                &AddField::new(company, "item", key, key, data_type),
                &self.member,
            )
            .await
            .unwrap();
        parse_id(&result)
    }

    /// Company with the three item fields used throughout the scenarios
    pub async fn company_with_fields(&self) -> (CompanyId, [FieldId; 3]) {
        let company = self.company("Acme").await;
        let skill = self
            .field(company, "skill_level", FieldDataType::Text)
            .await;
        let hours = self
            .field(company, "max_hours", FieldDataType::Number)
            .await;
        let certified = self
            .field(company, "requires_certification", FieldDataType::Boolean)
            .await;
        (company, [skill, hours, certified])
    }

    pub async fn item(&self, company: CompanyId, fields: Value) -> ItemId {
        let result = self
            .processor
            .process(
                &AddItem::new(company, "Consulting", 120.0).with_custom_fields(input(fields)),
                &self.member,
            )
            .await
            .unwrap();
        parse_id(&result)
    }
}

pub fn input(fields: Value) -> CustomFieldInput {
    serde_json::from_value(fields).unwrap()
}

pub fn parse_id<T: std::str::FromStr>(result: &Value) -> T
where
    T::Err: std::fmt::Debug,
{
    result["id"].as_str().unwrap().parse().unwrap()
}
