//! Dynamic `UPDATE` assembly for edit endpoints.
//!
//! Only the fields present in a request become assignments. Placeholders are
//! numbered in the order fields were declared, counting present fields only,
//! and the key is always the final parameter.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::{db::DbPool, error::AppError, models::Role};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.trim().is_empty())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Role> for FieldValue {
    fn from(value: Role) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

#[derive(Debug)]
pub struct PartialUpdate {
    table: &'static str,
    assignments: Vec<(&'static str, FieldValue)>,
}

impl PartialUpdate {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
        }
    }

    /// Adds `column = <value>` when `value` is present. Blank text counts as absent.
    pub fn set<V: Into<FieldValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value.map(Into::into) {
            if !value.is_blank() {
                self.assignments.push((column, value));
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    pub fn into_query(self, id: i32) -> Result<QueryBuilder<'static, Postgres>, AppError> {
        if self.assignments.is_empty() {
            return Err(AppError::NoFieldsProvided);
        }

        let mut query = QueryBuilder::new(format!("UPDATE {} SET ", self.table));
        let mut separated = query.separated(", ");
        for (column, value) in self.assignments {
            separated.push(format!("{column} = "));
            match value {
                FieldValue::Text(text) => separated.push_bind_unseparated(text),
                FieldValue::Timestamp(at) => separated.push_bind_unseparated(at),
            };
        }
        query.push(" WHERE id = ");
        query.push_bind(id);
        Ok(query)
    }

    /// Executes the statement and returns the number of rows it touched.
    pub async fn execute(self, pool: &DbPool, id: i32) -> Result<u64, AppError> {
        let mut query = self.into_query(id)?;
        let result = query.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient_update(
        name: Option<&str>,
        contact: Option<&str>,
        history: Option<&str>,
    ) -> PartialUpdate {
        PartialUpdate::table("patients")
            .set("name", name)
            .set("contact", contact)
            .set("medical_history", history)
    }

    #[test]
    fn no_present_fields_is_rejected() {
        let Err(err) = patient_update(None, None, None).into_query(1) else {
            panic!("expected NoFieldsProvided");
        };
        assert!(matches!(err, AppError::NoFieldsProvided));
    }

    #[test]
    fn blank_text_counts_as_absent() {
        let update = patient_update(Some("  "), Some(""), None);
        assert!(update.is_empty());
        assert!(matches!(
            update.into_query(1).err(),
            Some(AppError::NoFieldsProvided)
        ));
    }

    #[test]
    fn one_field_binds_key_second() {
        let query = patient_update(None, Some("555-0101"), None)
            .into_query(9)
            .unwrap();
        assert_eq!(query.sql(), "UPDATE patients SET contact = $1 WHERE id = $2");
    }

    #[test]
    fn placeholders_follow_present_fields_only() {
        // The middle field is absent; the last field must still take $2.
        let update = patient_update(Some("Jane Doe"), None, Some("Penicillin allergy"));
        assert_eq!(update.columns(), vec!["name", "medical_history"]);
        let query = update.into_query(3).unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE patients SET name = $1, medical_history = $2 WHERE id = $3"
        );
    }

    #[test]
    fn assignment_count_matches_present_fields() {
        let cases = [
            (patient_update(Some("a"), None, None), 1),
            (patient_update(None, Some("b"), Some("c")), 2),
            (patient_update(Some("a"), Some("b"), Some("c")), 3),
        ];
        for (update, expected) in cases {
            assert_eq!(update.len(), expected);
            let sql = update.into_query(1).unwrap().sql().to_string();
            assert_eq!(sql.matches(" = $").count(), expected + 1);
            assert!(sql.ends_with(&format!("WHERE id = ${}", expected + 1)));
        }
    }

    #[test]
    fn roles_and_timestamps_are_bound_as_values() {
        let update = PartialUpdate::table("users")
            .set("email", None::<String>)
            .set("role", Some(Role::Doctor));
        assert_eq!(update.columns(), vec!["role"]);

        let at = DateTime::parse_from_rfc3339("2025-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let query = PartialUpdate::table("appointments")
            .set("date", Some(at))
            .set("description", Some("Cleaning"))
            .into_query(4)
            .unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE appointments SET date = $1, description = $2 WHERE id = $3"
        );
    }
}
