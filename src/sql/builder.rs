//! Builds parameterized statements for the resource operations.
//! Only validated identifiers are interpolated; everything else goes through bind slots.

use crate::marshal::FieldValue;
use crate::sql::{BindValue, Identifier, RowId};

// Internal aliases contain `$`, which `Identifier` rejects, so they never equal a table or column name.
const ROW_ALIAS: &str = "\"row$\"";
const PATCH_ALIAS: &str = "\"patch$\"";
const FIELD_ALIAS: &str = "\"field$\"";

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// Tables visible to the connection with their live-row estimate.
pub fn catalog() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = "SELECT relname::text AS resource, n_live_tup AS count FROM pg_stat_user_tables ORDER BY relname".into();
    q
}

/// Whole table as one JSON array; NULL when the table is empty.
pub fn select_all(table: &Identifier) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT jsonb_agg({row}.*)::text AS data FROM (SELECT * FROM {t}) AS {row}",
        row = ROW_ALIAS,
        t = table.quoted()
    );
    q
}

/// One row as a JSON object. Yields no row when the id does not match.
pub fn select_by_id(table: &Identifier, id: &RowId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id.into());
    q.sql = format!(
        "SELECT to_jsonb({row}.*)::text AS data FROM (SELECT * FROM {t} WHERE \"id\"::text = ${n}) AS {row}",
        row = ROW_ALIAS,
        t = table.quoted(),
        n = n
    );
    q
}

/// INSERT from the whole document bound as one JSON parameter.
/// Only the document's columns are listed so the rest fall back to their defaults.
pub fn insert(table: &Identifier, columns: &[Identifier], document: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let t = table.quoted();
    if columns.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES", t);
        return q;
    }
    let n = q.push_param(BindValue::text(document));
    let cols = columns.iter().map(Identifier::quoted).collect::<Vec<_>>().join(", ");
    q.sql = format!(
        "INSERT INTO {t} ({cols}) SELECT {cols} FROM json_populate_record(NULL::{t}, ${n}::json)",
        t = t,
        cols = cols,
        n = n
    );
    q
}

/// UPDATE by id: `$1` is the id, then one slot per field in the order given.
/// Each slot holds the field's JSON text; the table's row type converts it to the column type.
/// Names and values are zipped from two ARRAY constructors, so the field count is not bound by
/// the 100-argument limit on function calls.
pub fn update(table: &Identifier, id: &RowId, fields: &[(Identifier, FieldValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let t = table.quoted();
    let id_param = q.push_param(id.into());
    let mut sets = Vec::with_capacity(fields.len());
    let mut names = Vec::with_capacity(fields.len());
    let mut slots = Vec::with_capacity(fields.len());
    for (column, value) in fields {
        let n = q.push_param(value.into());
        let c = column.quoted();
        sets.push(format!("{} = {}.{}", c, PATCH_ALIAS, c));
        names.push(format!("'{}'", column.as_str()));
        slots.push(format!("${}::json", n));
    }
    q.sql = format!(
        "UPDATE {t} SET {sets} FROM json_populate_record(NULL::{t}, \
         (SELECT json_object_agg(k, v) FROM unnest(ARRAY[{names}]::text[], ARRAY[{slots}]) AS {field}(k, v))) \
         AS {patch} WHERE {t}.\"id\"::text = ${id}",
        t = t,
        sets = sets.join(", "),
        names = names.join(", "),
        slots = slots.join(", "),
        field = FIELD_ALIAS,
        patch = PATCH_ALIAS,
        id = id_param
    );
    q
}

/// DELETE by id. The affected count comes from the execution result.
pub fn delete(table: &Identifier, id: &RowId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id.into());
    q.sql = format!("DELETE FROM {} WHERE \"id\"::text = ${}", table.quoted(), n);
    q
}
