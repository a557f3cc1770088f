use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};

use crate::models::Author;

/// One `Reference` row before authors are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub citekey: String,
    pub title: String,
    pub year: Option<i64>,
    pub entry_type: String,
    pub short_title: String,
}

/// Read every reference in storage order. References without a citation key
/// cannot be cited, so they are skipped.
pub fn fetch_references(conn: &Connection) -> Result<Vec<ReferenceRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT CitationKey, Title, Year, ReferenceType, ShortTitle
             FROM Reference
             WHERE CitationKey IS NOT NULL",
        )
        .context("failed to prepare reference query")?;

    let references = stmt
        .query_map([], |row| {
            Ok(ReferenceRow {
                citekey: row.get(0)?,
                title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                year: year_from_value(row.get(2)?),
                entry_type: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                short_title: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })
        .context("failed to iterate references")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect references")?;

    Ok(references)
}

/// Every citation key known to the store.
pub fn fetch_citekeys(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT CitationKey FROM Reference WHERE CitationKey IS NOT NULL")
        .context("failed to prepare citation key query")?;

    let mut rows = stmt.query([]).context("failed to execute citation key query")?;

    let mut citekeys = Vec::new();
    while let Some(row) = rows.next().context("failed to fetch citation key row")? {
        let citekey: String = row.get(0).context("failed to read citation key")?;
        citekeys.push(citekey);
    }

    Ok(citekeys)
}

const AUTHOR_QUERY: &str = "SELECT p.FirstName, p.MiddleName, p.LastName
     FROM Reference r
     INNER JOIN ReferenceAuthor ra ON ra.ReferenceID = r.ID
     INNER JOIN Person p ON p.ID = ra.PersonID
     WHERE r.CitationKey = ?1";

/// Authors of one reference in the order they were linked.
///
/// Stores that number the links in an `Index` column are ordered by it; any
/// other `ReferenceAuthor` table is read in scan order.
pub fn fetch_authors(conn: &Connection, citekey: &str) -> Result<Vec<Author>> {
    let sql = if has_author_index(conn)? {
        format!("{AUTHOR_QUERY} ORDER BY ra.\"Index\"")
    } else {
        AUTHOR_QUERY.to_string()
    };
    let mut stmt = conn
        .prepare_cached(&sql)
        .context("failed to prepare author query")?;

    let authors = stmt
        .query_map([citekey], |row| {
            Ok(Author {
                first_name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                middle_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                last_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })
        .with_context(|| format!("failed to iterate authors of {citekey}"))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to collect authors of {citekey}"))?;

    Ok(authors)
}

fn has_author_index(conn: &Connection) -> Result<bool> {
    let columns: i64 = conn
        .prepare_cached(
            "SELECT COUNT(*) FROM pragma_table_info('ReferenceAuthor') WHERE name = 'Index'",
        )
        .context("failed to prepare author index query")?
        .query_row([], |row| row.get(0))
        .context("failed to inspect ReferenceAuthor columns")?;

    Ok(columns > 0)
}

/// Short title of one reference, `None` when the key is unknown.
pub fn fetch_short_title(conn: &Connection, citekey: &str) -> Result<Option<String>> {
    fetch_text_column(conn, "ShortTitle", citekey)
}

/// Title of one reference, `None` when the key is unknown.
pub fn fetch_title(conn: &Connection, citekey: &str) -> Result<Option<String>> {
    fetch_text_column(conn, "Title", citekey)
}

/// Title and short title of one reference in a single round trip.
pub fn fetch_title_and_short_title(
    conn: &Connection,
    citekey: &str,
) -> Result<Option<(String, String)>> {
    conn.prepare_cached("SELECT Title, ShortTitle FROM Reference WHERE CitationKey = ?1")
        .context("failed to prepare title query")?
        .query_row([citekey], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            ))
        })
        .optional()
        .with_context(|| format!("failed to read titles of {citekey}"))
}

// `column` is always one of our own literals, never user input.
fn fetch_text_column(conn: &Connection, column: &str, citekey: &str) -> Result<Option<String>> {
    let sql = format!("SELECT {column} FROM Reference WHERE CitationKey = ?1");
    let value = conn
        .prepare_cached(&sql)
        .with_context(|| format!("failed to prepare {column} query"))?
        .query_row([citekey], |row| row.get::<_, Option<String>>(0))
        .optional()
        .with_context(|| format!("failed to read {column} of {citekey}"))?;

    Ok(value.map(Option::unwrap_or_default))
}

/// The reference manager stores years as text, older stores as integers.
fn year_from_value(value: Value) -> Option<i64> {
    match value {
        Value::Integer(year) => Some(year),
        Value::Text(text) => text.trim().parse().ok(),
        Value::Real(year) if year.fract() == 0.0 => Some(year as i64),
        _ => None,
    }
}
