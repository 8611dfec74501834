//! Optional text search parameters turned into column predicates.
//!
//! Every supplied parameter becomes one [`Predicate`]; predicates are AND-ed.
//! A predicate over several columns matches when any of them matches.

use sqlx::{Postgres, QueryBuilder};

/// Message for a query string that does not deserialize (duplicate or malformed keys).
pub const INVALID_QUERY: &str = "Invalid search parameters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    /// Case-insensitive "contains"; the needle is matched literally.
    Contains(String),
    /// Exact, case-sensitive equality.
    Equals(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub columns: &'static [&'static str],
    pub matcher: TextMatch,
}

impl Predicate {
    pub fn contains(columns: &'static [&'static str], raw: Option<&str>) -> Option<Self> {
        normalize(raw).map(|v| Self {
            columns,
            matcher: TextMatch::Contains(v),
        })
    }

    pub fn equals(columns: &'static [&'static str], raw: Option<&str>) -> Option<Self> {
        normalize(raw).map(|v| Self {
            columns,
            matcher: TextMatch::Equals(v),
        })
    }
}

/// Blank parameters impose no constraint.
fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Escapes LIKE metacharacters so user input never acts as a wildcard.
pub fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Appends ` WHERE ...` for the given predicates, or nothing when there are none.
pub fn push_where(qb: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    for (i, p) in predicates.iter().enumerate() {
        qb.push(if i == 0 { " WHERE (" } else { " AND (" });
        for (j, column) in p.columns.iter().enumerate() {
            if j > 0 {
                qb.push(" OR ");
            }
            qb.push(*column);
            match &p.matcher {
                TextMatch::Contains(needle) => {
                    qb.push(" ILIKE ");
                    qb.push_bind(like_pattern(needle));
                }
                TextMatch::Equals(value) => {
                    qb.push(" = ");
                    qb.push_bind(value.clone());
                }
            }
        }
        qb.push(")");
    }
}
