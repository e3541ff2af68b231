//! Builds the partial UPDATE statement from an explicit change set.

use super::params::SqlValue;
use crate::error::StoreError;

/// Quote identifier for PostgreSQL (safe: only from code).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Comma-separated quoted column list.
pub fn column_list(columns: &[&str]) -> String {
    columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// How an assigned value is written into the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Plain,
    /// One-way salted hash through pgcrypto.
    Crypt,
}

#[derive(Debug, Clone, PartialEq)]
struct Assignment {
    column: &'static str,
    value: SqlValue,
    encoding: Encoding,
}

/// Columns an update should write, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    assignments: Vec<Assignment>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `column` as changed when `value` is present.
    pub fn set<T: Into<SqlValue>>(&mut self, column: &'static str, value: Option<T>) -> &mut Self {
        if let Some(v) = value {
            self.assignments.push(Assignment {
                column,
                value: v.into(),
                encoding: Encoding::Plain,
            });
        }
        self
    }

    /// Like [`set`](Self::set), but the value is stored as `crypt(value, gen_salt('bf', 8))`.
    pub fn set_hashed(&mut self, column: &'static str, value: Option<String>) -> &mut Self {
        if let Some(v) = value {
            self.assignments.push(Assignment {
                column,
                value: SqlValue::Text(Some(v)),
                encoding: Encoding::Crypt,
            });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|a| a.column).collect()
    }
}

/// UPDATE by id writing only the columns in `changes`, returning `returning` columns.
///
/// One column renders as `SET col = $1`; several as `SET (a, b) = ($1, $2)`, since
/// assignment to a one-element row is not valid PostgreSQL. Every value is a bound
/// parameter. Fails when `id` is missing or nothing changed.
pub fn update(
    table: &str,
    id: Option<i32>,
    changes: &ChangeSet,
    returning: &[&str],
) -> Result<QueryBuf, StoreError> {
    let id = id.ok_or_else(|| StoreError::QueryCompilation("no id specified".into()))?;
    if changes.is_empty() {
        return Err(StoreError::QueryCompilation(format!(
            "no changed columns for {} id {}",
            table, id
        )));
    }

    let mut q = QueryBuf::new();
    let mut columns = Vec::with_capacity(changes.len());
    let mut values = Vec::with_capacity(changes.len());
    for a in &changes.assignments {
        let n = q.push_param(a.value.clone());
        let rhs = match a.encoding {
            Encoding::Plain => format!("${}", n),
            Encoding::Crypt => format!("crypt(${}, gen_salt('bf', 8))", n),
        };
        columns.push(quoted(a.column));
        values.push(rhs);
    }
    let set_clause = if columns.len() == 1 {
        format!("{} = {}", columns[0], values[0])
    } else {
        format!("({}) = ({})", columns.join(", "), values.join(", "))
    };
    let id_param = q.push_param(SqlValue::Int(Some(id)));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(table),
        set_clause,
        quoted("id"),
        id_param,
        column_list(returning)
    );
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const POST_COLUMNS: &[&str] = &["id", "title", "body", "user_id"];

    #[test]
    fn single_column_uses_scalar_assignment() {
        let mut changes = ChangeSet::new();
        changes.set("title", Some("new title"));
        let q = update("posts", Some(5), &changes, POST_COLUMNS).unwrap();
        assert_eq!(
            q.sql,
            r#"UPDATE "posts" SET "title" = $1 WHERE "id" = $2 RETURNING "id", "title", "body", "user_id""#
        );
        assert_eq!(
            q.params,
            vec![SqlValue::Text(Some("new title".into())), SqlValue::Int(Some(5))]
        );
    }

    #[test]
    fn several_columns_use_row_assignment_in_insertion_order() {
        let mut changes = ChangeSet::new();
        changes
            .set("username", Some("bob".to_string()))
            .set::<String>("first_name", None)
            .set("is_active", Some(false));
        let q = update("users", Some(3), &changes, &["id"]).unwrap();
        assert_eq!(
            q.sql,
            r#"UPDATE "users" SET ("username", "is_active") = ($1, $2) WHERE "id" = $3 RETURNING "id""#
        );
        assert_eq!(q.params[1], SqlValue::Bool(Some(false)));
    }

    #[test]
    fn explicit_null_is_a_change() {
        let mut changes = ChangeSet::new();
        changes.set("user_id", Some(None::<i32>));
        let q = update("posts", Some(1), &changes, &["id"]).unwrap();
        assert_eq!(q.params[0], SqlValue::Int(None));
        assert!(q.sql.contains(r#"SET "user_id" = $1"#));
    }

    #[test]
    fn quote_characters_stay_in_parameters() {
        let mut changes = ChangeSet::new();
        changes.set("body", Some("it's'; DROP TABLE posts; --"));
        let q = update("posts", Some(1), &changes, &["id"]).unwrap();
        assert!(!q.sql.contains("DROP"));
        assert_eq!(q.params[0], SqlValue::Text(Some("it's'; DROP TABLE posts; --".into())));
    }

    #[test]
    fn hashed_column_wraps_placeholder_in_crypt() {
        let mut changes = ChangeSet::new();
        changes.set_hashed("password", Some("secret".into()));
        let q = update("users", Some(1), &changes, &["id"]).unwrap();
        assert!(q.sql.contains(r#"SET "password" = crypt($1, gen_salt('bf', 8))"#));
    }

    #[test]
    fn missing_id_fails_compilation() {
        let mut changes = ChangeSet::new();
        changes.set("title", Some("x"));
        let err = update("posts", None, &changes, &["id"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryCompilation);
        assert_eq!(err.to_string(), "cannot compile query: no id specified");
    }

    #[test]
    fn empty_change_set_fails_compilation() {
        let err = update("comments", Some(9), &ChangeSet::new(), &["id"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryCompilation);
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quoted("users"), "\"users\"");
        assert_eq!(quoted("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(column_list(&["a", "b"]), "\"a\", \"b\"");
    }
}
