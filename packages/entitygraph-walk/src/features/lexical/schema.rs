//! Tantivy Schema Definition
//!
//! # 3-Field Schema
//!
//! 1. `paragraphid` - Paragraph identifier (STORED, keyword)
//! 2. `text` - Paragraph body (STORED, tokenized, BM25)
//! 3. `spotlight` - Linked entity mentions (STORED, keyword, multi-valued)

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, TEXT,
};

use super::error::IndexError;

// Field name constants (for type-safe access)
pub const FIELD_PARAGRAPH_ID: &str = "paragraphid";
pub const FIELD_TEXT: &str = "text";
pub const FIELD_ENTITIES: &str = "spotlight";

/// Field handles (cached for performance)
#[derive(Debug, Clone)]
pub struct SchemaFields {
    pub schema: Schema,
    pub paragraph_id: Field,
    pub text: Field,
    pub entities: Field,
}

impl SchemaFields {
    /// Build the paragraph schema
    pub fn new() -> Self {
        let mut schema_builder = Schema::builder();

        // Keyword fields: no tokenization, one term per value (exact match)
        let keyword = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer("raw")
                    .set_index_option(IndexRecordOption::Basic),
            )
            .set_stored();

        let paragraph_id = schema_builder.add_text_field(FIELD_PARAGRAPH_ID, keyword.clone());
        let text = schema_builder.add_text_field(FIELD_TEXT, TEXT | STORED);
        let entities = schema_builder.add_text_field(FIELD_ENTITIES, keyword);

        Self {
            schema: schema_builder.build(),
            paragraph_id,
            text,
            entities,
        }
    }

    /// Resolve field handles from the schema of an existing index
    pub fn from_schema(schema: Schema) -> Result<Self, IndexError> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| IndexError::Schema(format!("missing field '{}'", name)))
        };

        Ok(Self {
            paragraph_id: field(FIELD_PARAGRAPH_ID)?,
            text: field(FIELD_TEXT)?,
            entities: field(FIELD_ENTITIES)?,
            schema,
        })
    }
}

impl Default for SchemaFields {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_three_fields() {
        let fields = SchemaFields::new();
        assert_eq!(fields.schema.fields().count(), 3);
    }

    #[test]
    fn test_fields_round_trip_through_schema() {
        let built = SchemaFields::new();
        let resolved = SchemaFields::from_schema(built.schema.clone()).unwrap();
        assert_eq!(resolved.paragraph_id, built.paragraph_id);
        assert_eq!(resolved.entities, built.entities);
    }

    #[test]
    fn test_foreign_schema_rejected() {
        let mut builder = Schema::builder();
        builder.add_text_field("content", TEXT);
        let err = SchemaFields::from_schema(builder.build()).unwrap_err();
        assert!(err.to_string().contains("paragraphid"));
    }
}
