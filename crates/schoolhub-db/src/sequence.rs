//! Sequential human-readable identifiers.
//!
//! Identifiers are a fixed prefix followed by a zero-padded counter:
//! `"001"`, `"002"` for classes and levels, `"INV-001"` for invoices.
//! The next value is one more than the numeric maximum of the stored ids that
//! match the pattern. Ids that do not match are ignored.
//!
//! [`Sequence::next_id`] must run inside the transaction that inserts the row.
//! It takes a transaction-scoped advisory lock keyed by the sequence name, so
//! two concurrent allocate-then-insert transactions are serialized and never
//! receive the same id.

use sqlx::{PgConnection, PgExecutor, PgPool};
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    /// Advisory lock key.
    pub name: &'static str,
    pub table: &'static str,
    pub column: &'static str,
    pub prefix: &'static str,
    /// Minimum number of digits. Larger counters are not truncated.
    pub width: usize,
}

impl Sequence {
    pub const INVOICES: Sequence = Sequence {
        name: "registrations.id",
        table: "registrations",
        column: "id",
        prefix: "INV-",
        width: 3,
    };

    pub const CLASSES: Sequence = Sequence {
        name: "classes.id",
        table: "classes",
        column: "id",
        prefix: "",
        width: 3,
    };

    pub const LEVELS: Sequence = Sequence {
        name: "levels.id",
        table: "levels",
        column: "id",
        prefix: "",
        width: 3,
    };

    pub const STUDENTS: Sequence = Sequence {
        name: "students.student_id",
        table: "students",
        column: "student_id",
        prefix: "",
        width: 3,
    };

    /// Allocates the next id under a transaction-scoped lock.
    ///
    /// The lock is released on commit or rollback of the surrounding
    /// transaction, so the caller must insert the row before committing.
    #[instrument(skip(conn), fields(sequence = self.name))]
    pub async fn next_id(&self, conn: &mut PgConnection) -> Result<String, sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(self.name)
            .execute(&mut *conn)
            .await?;

        let current = self.current_max(&mut *conn).await?;
        Ok(self.format(next_value(current)))
    }

    /// Previews the next id without reserving it.
    #[instrument(skip(pool), fields(sequence = self.name))]
    pub async fn peek_id(&self, pool: &PgPool) -> Result<String, sqlx::Error> {
        let current = self.current_max(pool).await?;
        Ok(self.format(next_value(current)))
    }

    pub fn format(&self, n: u64) -> String {
        format_id(self.prefix, self.width, n)
    }

    pub fn parse(&self, id: &str) -> Option<u64> {
        parse_suffix(self.prefix, id)
    }

    async fn current_max<'e, E>(&self, executor: E) -> Result<Option<i64>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        // table and column are compile-time constants, never user input
        let sql = format!(
            "SELECT MAX(CAST(SUBSTRING({col} FROM $1) AS BIGINT)) FROM {table} WHERE {col} ~ $2",
            col = self.column,
            table = self.table,
        );
        sqlx::query_scalar::<_, Option<i64>>(&sql)
            .bind((self.prefix.chars().count() + 1) as i32)
            .bind(self.pattern())
            .fetch_one(executor)
            .await
    }

    fn pattern(&self) -> String {
        let mut pattern = String::from("^");
        for c in self.prefix.chars() {
            if !c.is_ascii_alphanumeric() {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        // 18 digits always fit a BIGINT
        pattern.push_str("[0-9]{1,18}$");
        pattern
    }
}

fn next_value(current: Option<i64>) -> u64 {
    current.map(|n| n.max(0) as u64).unwrap_or(0) + 1
}

/// `format_id("INV-", 3, 7) == "INV-007"`
pub fn format_id(prefix: &str, width: usize, n: u64) -> String {
    format!("{prefix}{n:0width$}")
}

/// Numeric suffix of `id`, or `None` when the id does not follow the pattern.
pub fn parse_suffix(prefix: &str, id: &str) -> Option<u64> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id_pads() {
        assert_eq!(format_id("", 3, 1), "001");
        assert_eq!(format_id("INV-", 3, 42), "INV-042");
    }

    #[test]
    fn test_format_id_does_not_truncate() {
        assert_eq!(format_id("INV-", 3, 1000), "INV-1000");
        assert_eq!(Sequence::CLASSES.format(12345), "12345");
    }

    #[test]
    fn test_parse_suffix() {
        assert_eq!(parse_suffix("INV-", "INV-009"), Some(9));
        assert_eq!(parse_suffix("", "010"), Some(10));
        assert_eq!(parse_suffix("INV-", "INV-"), None);
        assert_eq!(parse_suffix("INV-", "INV-12a"), None);
        assert_eq!(parse_suffix("INV-", "REC-001"), None);
        assert_eq!(parse_suffix("", "A01"), None);
    }

    #[test]
    fn test_next_value_starts_at_one() {
        assert_eq!(next_value(None), 1);
        assert_eq!(next_value(Some(9)), 10);
        assert_eq!(Sequence::INVOICES.format(next_value(None)), "INV-001");
    }

    #[test]
    fn test_pattern_escapes_prefix() {
        assert_eq!(Sequence::INVOICES.pattern(), "^INV\\-[0-9]{1,18}$");
        assert_eq!(Sequence::LEVELS.pattern(), "^[0-9]{1,18}$");
    }

    #[test]
    fn test_numeric_max_not_lexical() {
        let ids = ["INV-009", "INV-010", "INV-x", "INV-2"];
        let max = ids
            .iter()
            .filter_map(|id| Sequence::INVOICES.parse(id))
            .max();
        assert_eq!(max, Some(10));
    }
}
