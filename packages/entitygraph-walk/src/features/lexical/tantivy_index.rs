//! Tantivy-backed paragraph index
//!
//! Global ordinals are assigned by walking the searcher's segments in order:
//! `ordinal = segment base + segment-local doc id`. They are stable for one
//! searcher generation, which is all a build pass needs.

use std::collections::BTreeSet;
use std::path::Path;

use parking_lot::Mutex;
use tantivy::{
    collector::TopDocs,
    query::{QueryParser, TermQuery},
    schema::{IndexRecordOption, Value},
    DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term,
};
use tracing::debug;

use super::error::IndexError;
use super::ports::ParagraphIndex;
use super::schema::{SchemaFields, FIELD_PARAGRAPH_ID};
use crate::shared::models::{DocOrdinal, StoredParagraph};

/// Writer heap budget (single indexing thread)
const WRITER_HEAP_BYTES: usize = 50_000_000;

pub struct TantivyParagraphIndex {
    index: Index,
    reader: IndexReader,
    /// `None` when opened read-only
    writer: Option<Mutex<IndexWriter>>,
    fields: SchemaFields,
}

impl TantivyParagraphIndex {
    /// New empty index held in RAM
    pub fn create_in_ram() -> Result<Self, IndexError> {
        let fields = SchemaFields::new();
        let index = Index::create_in_ram(fields.schema.clone());
        Self::with_writer(index, fields)
    }

    /// New empty index in `dir` (created if needed)
    pub fn create_in_dir(dir: impl AsRef<Path>) -> Result<Self, IndexError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let fields = SchemaFields::new();
        let index = Index::create_in_dir(dir, fields.schema.clone())?;
        Self::with_writer(index, fields)
    }

    /// Open an existing index read-only
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, IndexError> {
        let index = Index::open_in_dir(dir)?;
        let fields = SchemaFields::from_schema(index.schema())?;
        let reader = Self::manual_reader(&index)?;
        Ok(Self {
            index,
            reader,
            writer: None,
            fields,
        })
    }

    fn with_writer(index: Index, fields: SchemaFields) -> Result<Self, IndexError> {
        // One indexing thread keeps ordinals in insertion order within a commit
        let writer: IndexWriter = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        let reader = Self::manual_reader(&index)?;
        Ok(Self {
            index,
            reader,
            writer: Some(Mutex::new(writer)),
            fields,
        })
    }

    fn manual_reader(index: &Index) -> Result<IndexReader, IndexError> {
        Ok(index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?)
    }

    /// Queue one paragraph; visible after `commit`
    pub fn add_paragraph(
        &self,
        paragraph_id: &str,
        text: &str,
        entities: &[String],
    ) -> Result<(), IndexError> {
        let writer = self.writer.as_ref().ok_or(IndexError::ReadOnly)?;

        let mut doc = TantivyDocument::default();
        doc.add_text(self.fields.paragraph_id, paragraph_id);
        doc.add_text(self.fields.text, text);
        for entity in entities {
            doc.add_text(self.fields.entities, entity);
        }

        writer.lock().add_document(doc)?;
        Ok(())
    }

    /// Commit queued paragraphs and refresh the reader
    pub fn commit(&self) -> Result<(), IndexError> {
        let writer = self.writer.as_ref().ok_or(IndexError::ReadOnly)?;
        let opstamp = writer.lock().commit()?;
        self.reader.reload()?;
        debug!(opstamp, docs = self.max_ordinal(), "paragraph index committed");
        Ok(())
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    fn locate(searcher: &Searcher, ordinal: DocOrdinal) -> Option<DocAddress> {
        let mut base: DocOrdinal = 0;
        for (segment_ord, segment) in searcher.segment_readers().iter().enumerate() {
            let max_doc = segment.max_doc();
            if ordinal < base + max_doc {
                return Some(DocAddress::new(segment_ord as u32, ordinal - base));
            }
            base += max_doc;
        }
        None
    }

    fn segment_bases(searcher: &Searcher) -> Vec<DocOrdinal> {
        let mut base: DocOrdinal = 0;
        searcher
            .segment_readers()
            .iter()
            .map(|segment| {
                let this = base;
                base += segment.max_doc();
                this
            })
            .collect()
    }
}

impl ParagraphIndex for TantivyParagraphIndex {
    fn max_ordinal(&self) -> DocOrdinal {
        self.reader
            .searcher()
            .segment_readers()
            .iter()
            .map(|segment| segment.max_doc())
            .sum()
    }

    fn stored_paragraph(&self, ordinal: DocOrdinal) -> Result<Option<StoredParagraph>, IndexError> {
        let searcher = self.reader.searcher();
        let address = Self::locate(&searcher, ordinal).ok_or_else(|| {
            IndexError::OrdinalOutOfRange {
                ordinal,
                max: self.max_ordinal(),
            }
        })?;

        let segment = searcher.segment_reader(address.segment_ord);
        if segment.is_deleted(address.doc_id) {
            return Ok(None);
        }

        let doc: TantivyDocument = searcher.doc(address)?;
        let paragraph_id = doc
            .get_first(self.fields.paragraph_id)
            .and_then(|v| v.as_str())
            .ok_or(IndexError::MissingField {
                ordinal,
                field: FIELD_PARAGRAPH_ID,
            })?
            .to_string();
        let entities = doc
            .get_all(self.fields.entities)
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect();

        Ok(Some(StoredParagraph {
            paragraph_id,
            entities,
        }))
    }

    fn entity_terms(&self) -> Result<Vec<String>, IndexError> {
        let searcher = self.reader.searcher();
        let mut terms = BTreeSet::new();

        for segment in searcher.segment_readers() {
            let inverted_index = segment.inverted_index(self.fields.entities)?;
            let mut stream = inverted_index.terms().stream()?;
            while stream.advance() {
                terms.insert(String::from_utf8_lossy(stream.key()).into_owned());
            }
        }

        Ok(terms.into_iter().collect())
    }

    fn term_query(&self, entity: &str, limit: usize) -> Result<Vec<DocOrdinal>, IndexError> {
        let searcher = self.reader.searcher();
        let bases = Self::segment_bases(&searcher);

        let term = Term::from_field_text(self.fields.entities, entity);
        let query = TermQuery::new(term, IndexRecordOption::Basic);
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit.max(1)))?;

        let mut ordinals: Vec<DocOrdinal> = top_docs
            .into_iter()
            .map(|(_, address)| bases[address.segment_ord as usize] + address.doc_id)
            .collect();
        ordinals.sort_unstable();
        Ok(ordinals)
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<(DocOrdinal, f64)>, IndexError> {
        let searcher = self.reader.searcher();
        let bases = Self::segment_bases(&searcher);

        let parser = QueryParser::for_index(&self.index, vec![self.fields.text]);
        let parsed = parser.parse_query(query)?;
        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(limit.max(1)))?;

        Ok(top_docs
            .into_iter()
            .map(|(score, address)| {
                (
                    bases[address.segment_ord as usize] + address.doc_id,
                    score as f64,
                )
            })
            .collect())
    }
}
