//! Tantivy-backed note index.

use std::path::Path;

use chrono::{DateTime, Utc};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Schema, Value, INDEXED, STORED, STRING, TEXT};
use tantivy::{Index, IndexWriter, TantivyDocument, TantivyError, Term};
use tracing::debug;
use uuid::Uuid;

use inkvault_common::{Error, Result};

/// Writer heap size; tantivy needs at least 15 MB, this leaves headroom
/// for large notes.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Resolved schema fields for a note document.
#[derive(Clone, Copy)]
struct NoteFields {
    id: Field,
    title: Field,
    content: Field,
    tags: Field,
    created_at: Field,
    updated_at: Field,
}

/// Full-text index over note title, content and tags.
///
/// Documents are keyed by note id: `id` is stored raw for exact-match
/// lookup, `title`/`content` are tokenized, and each tag path is indexed
/// as a single whole keyword so `work/project` never matches `work`.
pub struct SearchEngine {
    index: Index,
    fields: NoteFields,
}

impl SearchEngine {
    /// Open (or create) an index in the given directory.
    ///
    /// # Errors
    /// - `IndexCorrupt` if the directory cannot be opened or its
    ///   contents do not form a usable index
    pub fn open(index_dir: impl AsRef<Path>) -> Result<Self> {
        let index_dir = index_dir.as_ref();
        std::fs::create_dir_all(index_dir).map_err(Error::Io)?;

        let mut schema_builder = Schema::builder();
        let fields = NoteFields {
            id: schema_builder.add_text_field("id", STRING | STORED),
            title: schema_builder.add_text_field("title", TEXT | STORED),
            content: schema_builder.add_text_field("content", TEXT),
            tags: schema_builder.add_text_field("tags", STRING),
            created_at: schema_builder.add_date_field("created_at", INDEXED | STORED),
            updated_at: schema_builder.add_date_field("updated_at", INDEXED | STORED),
        };
        let schema = schema_builder.build();

        let directory = MmapDirectory::open(index_dir)
            .map_err(|e| Error::IndexCorrupt(e.to_string()))?;
        let index = Index::open_or_create(directory, schema)
            .map_err(|e| Error::IndexCorrupt(e.to_string()))?;

        Ok(Self { index, fields })
    }

    /// Acquire the single index writer.
    ///
    /// # Errors
    /// - `WriterLocked` if another writer is already active
    /// - `IndexCorrupt` for other index failures
    pub fn writer(&self) -> Result<IndexWriter> {
        self.index.writer(WRITER_HEAP_BYTES).map_err(|e| match e {
            TantivyError::LockFailure(..) => Error::WriterLocked,
            other => Error::IndexCorrupt(other.to_string()),
        })
    }

    /// Upsert the document for a note.
    ///
    /// Any existing document with the same id is deleted first, so
    /// re-indexing an edited note never produces duplicate hits. The
    /// change is invisible to searches until [`commit`](Self::commit).
    pub fn index_note(
        &self,
        writer: &mut IndexWriter,
        id: Uuid,
        title: &str,
        content: &str,
        tags: &[String],
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let id_text = id.to_string();
        writer.delete_term(Term::from_field_text(self.fields.id, &id_text));

        let mut doc = TantivyDocument::new();
        doc.add_text(self.fields.id, &id_text);
        doc.add_text(self.fields.title, title);
        doc.add_text(self.fields.content, content);
        for tag in tags {
            doc.add_text(self.fields.tags, tag);
        }
        doc.add_date(
            self.fields.created_at,
            tantivy::DateTime::from_timestamp_secs(created_at.timestamp()),
        );
        doc.add_date(
            self.fields.updated_at,
            tantivy::DateTime::from_timestamp_secs(updated_at.timestamp()),
        );

        writer
            .add_document(doc)
            .map_err(|e| Error::IndexCorrupt(e.to_string()))?;

        debug!(note_id = %id_text, "Note indexed");
        Ok(())
    }

    /// Remove a note's document from the index.
    pub fn delete_note(&self, writer: &mut IndexWriter, id: Uuid) {
        writer.delete_term(Term::from_field_text(self.fields.id, &id.to_string()));
    }

    /// Durably publish pending changes so subsequent searches see them.
    pub fn commit(&self, writer: &mut IndexWriter) -> Result<()> {
        writer
            .commit()
            .map_err(|e| Error::IndexCorrupt(e.to_string()))?;
        Ok(())
    }

    /// Search title, content and tags.
    ///
    /// Returns `(score, note_id)` pairs with scores non-increasing,
    /// truncated to `limit`. An empty query matches nothing; malformed
    /// query syntax is a typed error, never a panic.
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<(f32, String)>> {
        if query_str.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let reader = self
            .index
            .reader()
            .map_err(|e| Error::IndexCorrupt(e.to_string()))?;
        let searcher = reader.searcher();

        let query_parser = QueryParser::for_index(
            &self.index,
            vec![self.fields.title, self.fields.content, self.fields.tags],
        );
        let query = query_parser
            .parse_query(query_str)
            .map_err(|e| Error::QueryParse {
                query: query_str.to_string(),
                message: e.to_string(),
            })?;

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| Error::IndexCorrupt(e.to_string()))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| Error::IndexCorrupt(e.to_string()))?;
            if let Some(id) = doc.get_first(self.fields.id).and_then(|v| v.as_str()) {
                results.push((score, id.to_string()));
            }
        }

        debug!(query = %query_str, hits = results.len(), "Search completed");
        Ok(results)
    }
}
