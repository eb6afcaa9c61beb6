use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Serialize)]
pub struct Language {
    pub id: i64,
    pub code: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub id: i64,
    pub faq_id: i64,
    pub language_id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: String,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Initialize database connection and create tables
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        // Cascade deletes on translations require foreign key enforcement
        conn.pragma_update(None, "foreign_keys", true)
            .context("Failed to enable foreign keys")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS languages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create languages table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS faqs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create faqs table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                faq_id INTEGER NOT NULL REFERENCES faqs(id) ON DELETE CASCADE,
                language_id INTEGER NOT NULL REFERENCES languages(id) ON DELETE CASCADE,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create translations table")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // ==================== Languages ====================

    /// Insert a new language. The code must not already exist.
    pub fn insert_language(&self, code: &str) -> Result<Language> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO languages (code, created_at) VALUES (?1, ?2)",
            params![code, created_at],
        )
        .context(format!("Failed to insert language '{}'", code))?;

        Ok(Language {
            id: conn.last_insert_rowid(),
            code: code.to_string(),
            created_at,
        })
    }

    pub fn get_language_by_code(&self, code: &str) -> Result<Option<Language>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, code, created_at FROM languages WHERE code = ?1")?;

        let language = stmt
            .query_row(params![code], |row| {
                Ok(Language {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .optional()?;

        Ok(language)
    }

    pub fn list_languages(&self) -> Result<Vec<Language>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, code, created_at FROM languages ORDER BY id")?;

        let languages = stmt
            .query_map([], |row| {
                Ok(Language {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(languages)
    }

    // ==================== FAQs ====================

    pub fn insert_faq(&self, question: &str, answer: &str) -> Result<Faq> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO faqs (question, answer, created_at) VALUES (?1, ?2, ?3)",
            params![question, answer, created_at],
        )
        .context("Failed to insert FAQ")?;

        Ok(Faq {
            id: conn.last_insert_rowid(),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at,
        })
    }

    /// Update an existing FAQ. Returns the updated record, or None if the id
    /// does not exist.
    pub fn update_faq(&self, id: i64, question: &str, answer: &str) -> Result<Option<Faq>> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn
            .execute(
                "UPDATE faqs SET question = ?1, answer = ?2 WHERE id = ?3",
                params![question, answer, id],
            )
            .context(format!("Failed to update FAQ {}", id))?;

        if rows_affected == 0 {
            return Ok(None);
        }

        let faq = conn
            .query_row(
                "SELECT id, question, answer, created_at FROM faqs WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Faq {
                        id: row.get(0)?,
                        question: row.get(1)?,
                        answer: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(faq)
    }

    pub fn get_faq(&self, id: i64) -> Result<Option<Faq>> {
        let conn = self.conn.lock().unwrap();
        let faq = conn
            .query_row(
                "SELECT id, question, answer, created_at FROM faqs WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Faq {
                        id: row.get(0)?,
                        question: row.get(1)?,
                        answer: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(faq)
    }

    pub fn list_faqs(&self) -> Result<Vec<Faq>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, question, answer, created_at FROM faqs ORDER BY id")?;

        let faqs = stmt
            .query_map([], |row| {
                Ok(Faq {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    answer: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(faqs)
    }

    // ==================== Translations ====================

    pub fn insert_translation(
        &self,
        faq_id: i64,
        language_id: i64,
        question: &str,
        answer: &str,
    ) -> Result<Translation> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO translations (faq_id, language_id, question, answer, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![faq_id, language_id, question, answer, created_at],
        )
        .context("Failed to insert translation")?;

        Ok(Translation {
            id: conn.last_insert_rowid(),
            faq_id,
            language_id,
            question: question.to_string(),
            answer: answer.to_string(),
            created_at,
        })
    }

    /// Find a translation for a (FAQ, language) pair. Duplicate rows can
    /// exist; this returns the oldest one.
    pub fn find_translation(&self, faq_id: i64, language_id: i64) -> Result<Option<Translation>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, faq_id, language_id, question, answer, created_at
             FROM translations
             WHERE faq_id = ?1 AND language_id = ?2
             ORDER BY id
             LIMIT 1",
        )?;

        let translation = stmt
            .query_row(params![faq_id, language_id], |row| {
                Ok(Translation {
                    id: row.get(0)?,
                    faq_id: row.get(1)?,
                    language_id: row.get(2)?,
                    question: row.get(3)?,
                    answer: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })
            .optional()?;

        Ok(translation)
    }

    /// Count translations for a (FAQ, language) pair
    pub fn translation_count(&self, faq_id: i64, language_id: i64) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT COUNT(*) FROM translations WHERE faq_id = ?1 AND language_id = ?2",
        )?;
        let count: i64 = stmt.query_row(params![faq_id, language_id], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn delete_faq(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn
            .execute("DELETE FROM faqs WHERE id = ?1", params![id])
            .context(format!("Failed to delete FAQ {}", id))?;
        Ok(rows_affected > 0)
    }
}
