use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema;

/// A stored result.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schema::scores)]
pub(super) struct Score {
    pub id: i32,
    pub name: String,
    pub millis: i64,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::scores)]
pub(super) struct NewScore<'a> {
    pub category: &'a str,
    pub name: &'a str,
    pub millis: i64,
}
