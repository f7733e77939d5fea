//! Optional `WHERE` clauses for list and report queries.
//!
//! A [`FilterSet`] collects `(expression, value)` pairs and renders them onto a
//! [`QueryBuilder`]. Expressions are static SQL fragments chosen by the
//! service; values always go through `push_bind`. The set is rendered by
//! reference so the same filters can drive a `COUNT(*)` and the page query.
//!
//! ```ignore
//! let filters = FilterSet::new()
//!     .eq("r.school_year", query.school_year.clone())
//!     .search(&["r.id", "s.student_name_lao"], query.search.clone());
//!
//! let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM registrations r");
//! filters.push_where(&mut qb);
//! ```

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i32),
    BigInt(i64),
    Bool(bool),
    Date(NaiveDate),
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::BigInt(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        FilterValue::Date(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    /// `expr = $n`
    Eq(&'static str, FilterValue),
    /// `(a ILIKE $n OR b ILIKE $m ...)` with `%term%`
    Search(Vec<&'static str>, String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    clauses: Vec<Clause>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `expr = value` when `value` is present.
    pub fn eq<V: Into<FilterValue>>(mut self, expr: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.clauses.push(Clause::Eq(expr, value.into()));
        }
        self
    }

    /// Adds a case-insensitive substring match over `exprs` when `term` is
    /// present and not blank.
    pub fn search(mut self, exprs: &[&'static str], term: Option<String>) -> Self {
        if let Some(term) = term {
            let term = term.trim();
            if !term.is_empty() && !exprs.is_empty() {
                self.clauses.push(Clause::Search(exprs.to_vec(), term.to_string()));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Renders ` WHERE a AND b ...`, or nothing when the set is empty.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.is_empty() {
            return;
        }
        qb.push(" WHERE ");
        self.push_clauses(qb);
    }

    /// Renders ` AND a AND b ...` for queries that already have a `WHERE`.
    pub fn push_and(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.is_empty() {
            return;
        }
        qb.push(" AND ");
        self.push_clauses(qb);
    }

    fn push_clauses(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            match clause {
                Clause::Eq(expr, value) => {
                    qb.push(*expr).push(" = ");
                    push_value(qb, value);
                }
                Clause::Search(exprs, term) => {
                    let pattern = format!("%{term}%");
                    qb.push("(");
                    for (j, expr) in exprs.iter().enumerate() {
                        if j > 0 {
                            qb.push(" OR ");
                        }
                        qb.push(*expr).push(" ILIKE ").push_bind(pattern.clone());
                    }
                    qb.push(")");
                }
            }
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(v) => qb.push_bind(v.clone()),
        FilterValue::Int(v) => qb.push_bind(*v),
        FilterValue::BigInt(v) => qb.push_bind(*v),
        FilterValue::Bool(v) => qb.push_bind(*v),
        FilterValue::Date(v) => qb.push_bind(*v),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(filters: &FilterSet) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM registrations r");
        filters.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_empty_set_renders_nothing() {
        let filters = FilterSet::new().eq::<String>("r.level", None);
        assert!(filters.is_empty());
        assert_eq!(render(&filters), "SELECT * FROM registrations r");
    }

    #[test]
    fn test_eq_clauses_are_bound_in_order() {
        let filters = FilterSet::new()
            .eq("r.school_year", Some("2024"))
            .eq("r.paid", Some(true));
        assert_eq!(
            render(&filters),
            "SELECT * FROM registrations r WHERE r.school_year = $1 AND r.paid = $2"
        );
    }

    #[test]
    fn test_search_expands_to_or_group() {
        let filters = FilterSet::new()
            .search(&["s.student_id", "s.student_name_lao"], Some(" ann ".to_string()))
            .eq("r.level", Some("1"));
        assert_eq!(
            render(&filters),
            "SELECT * FROM registrations r WHERE (s.student_id ILIKE $1 OR s.student_name_lao ILIKE $2) AND r.level = $3"
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filters = FilterSet::new().search(&["s.student_id"], Some("   ".to_string()));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_push_and_appends_to_existing_where() {
        let filters = FilterSet::new().eq("EXTRACT(MONTH FROM p.payment_date)::int", Some(3));
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM payments p WHERE p.amount > 0");
        filters.push_and(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM payments p WHERE p.amount > 0 AND EXTRACT(MONTH FROM p.payment_date)::int = $1"
        );
    }

    #[test]
    fn test_same_set_renders_twice() {
        let filters = FilterSet::new().eq("r.level", Some("2"));
        assert_eq!(render(&filters), render(&filters));
    }
}
