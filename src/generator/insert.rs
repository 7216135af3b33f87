//! `insert` synthesizer: random documents for a bulk insert command.

use super::{normalize_range, GenContext, GenError, OpSynthesizer, ValueGen};
use crate::config::{InsertAdvancedConfig, OpSpec};
use rand::Rng;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Default number of documents per insert
pub const DEFAULT_DOC_COUNT: (usize, usize) = (1, 3);
/// Default number of keys per document
pub const DEFAULT_KEY_COUNT: (usize, usize) = (1, 3);

/// Synthesizes `{"op":"c","db":..,"id":..,"dc":{"insert":..,"documents":[..]}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertSynthesizer;

/// Key/value pairs in generation order. Keys may repeat.
#[derive(Debug, Clone)]
struct Document(Vec<(String, String)>);

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct InsertCommand<'a> {
    insert: &'a str,
    documents: Vec<Document>,
}

#[derive(Serialize)]
struct InsertRecord<'a> {
    op: &'static str,
    db: &'a str,
    id: u64,
    dc: InsertCommand<'a>,
}

impl InsertSynthesizer {
    fn decode_advanced(spec: &OpSpec) -> Result<InsertAdvancedConfig, GenError> {
        match &spec.advanced {
            Some(raw) => serde_json::from_str(raw.get()).map_err(|e| {
                GenError::Generation(format!("cannot decode insert settings: {e}"))
            }),
            None => Ok(InsertAdvancedConfig::default()),
        }
    }

    fn documents<R: Rng + ?Sized>(adv: InsertAdvancedConfig, rng: &mut R) -> Vec<Document> {
        let (min_docs, max_docs) =
            normalize_range(adv.min_doc_count, adv.max_doc_count, DEFAULT_DOC_COUNT);
        let (min_keys, max_keys) =
            normalize_range(adv.min_key_count, adv.max_key_count, DEFAULT_KEY_COUNT);
        let values = ValueGen::new(adv.values, adv.min_value_len, adv.max_value_len);
        let keys = ValueGen::new(adv.keys, adv.min_key_len, adv.max_key_len);

        let doc_count = rng.random_range(min_docs..=max_docs);
        let key_count = rng.random_range(min_keys..=max_keys);

        (0..doc_count)
            .map(|_| {
                let pairs = (0..key_count)
                    .map(|_| (keys.generate(rng), values.generate(rng)))
                    .collect();
                Document(pairs)
            })
            .collect()
    }
}

impl OpSynthesizer for InsertSynthesizer {
    fn synthesize(&self, spec: &OpSpec, ctx: &mut GenContext<'_>) -> Result<String, GenError> {
        let adv = Self::decode_advanced(spec)?;
        let documents = Self::documents(adv, &mut *ctx.rng);

        let record = InsertRecord {
            op: "c",
            db: &spec.db_name,
            id: ctx.seq.advance(),
            dc: InsertCommand {
                insert: &spec.collection_name,
                documents,
            },
        };

        serde_json::to_string(&record)
            .map_err(|e| GenError::Generation(format!("cannot encode insert record: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_keeps_duplicate_keys() {
        let doc = Document(vec![
            ("k".to_string(), "a".to_string()),
            ("k".to_string(), "b".to_string()),
        ]);
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"k":"a","k":"b"}"#);
    }

    #[test]
    fn test_document_escapes_strings() {
        let doc = Document(vec![("q\"k".to_string(), "line\nbreak".to_string())]);
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"q\"k":"line\nbreak"}"#
        );
    }
}
