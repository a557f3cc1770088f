//! Shared fixture store for integration tests.

use std::path::PathBuf;

use rusqlite::{params, Connection};
use tempfile::TempDir;

/// Schema subset the reference manager writes and the crate reads.
const SCHEMA: &str = "
    CREATE TABLE Reference (
        ID INTEGER PRIMARY KEY,
        CitationKey TEXT,
        Title TEXT,
        Year TEXT,
        ReferenceType TEXT,
        ShortTitle TEXT
    );
    CREATE TABLE Person (
        ID INTEGER PRIMARY KEY,
        FirstName TEXT,
        MiddleName TEXT,
        LastName TEXT
    );
    CREATE TABLE ReferenceAuthor (
        ReferenceID INTEGER NOT NULL,
        PersonID INTEGER NOT NULL
    );
";

/// A store file living inside a temporary directory. The directory is removed
/// when the fixture drops.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    /// Path next to the store that does not exist.
    pub fn missing_path(&self) -> PathBuf {
        self.path.with_file_name("missing.ctv6")
    }
}

/// Build a store with:
///
/// - `trio2019`: three authors (Ada Lovelace, Charles Babbage, Alan Turing)
/// - `duo2020`: two authors (Grace Hopper, Edsger Dijkstra)
/// - `solo2021`: no authors, short title without an en-dash
/// - `smith2020`: one author, short title `Smith2020–A Study`
pub fn sample_store() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.ctv6");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();

    let persons = [
        (1, "Ada", "King", "Lovelace"),
        (2, "Charles", "", "Babbage"),
        (3, "Alan", "Mathison", "Turing"),
        (4, "Grace", "Brewster", "Hopper"),
        (5, "Edsger", "Wybe", "Dijkstra"),
        (6, "John", "", "Smith"),
    ];
    for (id, first, middle, last) in persons {
        conn.execute(
            "INSERT INTO Person (ID, FirstName, MiddleName, LastName) VALUES (?1, ?2, ?3, ?4)",
            params![id, first, middle, last],
        )
        .unwrap();
    }

    let references = [
        (1, "trio2019", "Computing Machinery", "2019", "Article", "Lovelace2019–Computing"),
        (2, "duo2020", "Structured Programming", "2020", "Book", "Hopper2020–Structured"),
        (3, "solo2021", "Anonymous Notes", "2021", "Unpublished", "Notes2021"),
        (4, "smith2020", "A Study of Things", "2020", "JournalArticle", "Smith2020–A Study"),
    ];
    for (id, citekey, title, year, kind, short_title) in references {
        insert_reference(&conn, id, citekey, title, year, kind, short_title);
    }

    // Linked out of ID order on purpose: storage order wins.
    let links = [(1, 1), (1, 2), (1, 3), (2, 5), (2, 4), (4, 6)];
    for (reference, person) in links {
        conn.execute(
            "INSERT INTO ReferenceAuthor (ReferenceID, PersonID) VALUES (?1, ?2)",
            params![reference, person],
        )
        .unwrap();
    }

    drop(conn);
    Fixture { _dir: dir, path }
}

fn insert_reference(
    conn: &Connection,
    id: i64,
    citekey: &str,
    title: &str,
    year: &str,
    kind: &str,
    short_title: &str,
) {
    conn.execute(
        "INSERT INTO Reference (ID, CitationKey, Title, Year, ReferenceType, ShortTitle)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, citekey, title, year, kind, short_title],
    )
    .unwrap();
}
