//! Bind values sent to PostgreSQL. Every slot travels as TEXT; SQL casts give it a type.

use crate::marshal::FieldValue;
use crate::sql::RowId;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

#[derive(Clone, Debug, PartialEq)]
pub struct BindValue(String);

impl BindValue {
    pub fn text(s: impl Into<String>) -> Self {
        BindValue(s.into())
    }
}

impl From<&RowId> for BindValue {
    fn from(id: &RowId) -> Self {
        BindValue(id.as_str().to_string())
    }
}

impl From<&FieldValue> for BindValue {
    fn from(v: &FieldValue) -> Self {
        BindValue(v.to_json_text())
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.0.as_str(), buf)
    }
}

impl sqlx::Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}
