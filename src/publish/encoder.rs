//! Avro value encoding against the registered schema
//!
//! Output uses the Confluent wire format: a zero magic byte, the big-endian
//! schema id, then the bare Avro datum. Serializing against the parsed schema
//! is the validation step - a record that does not match fails before it ever
//! reaches the broker.

use apache_avro::types::Record;
use apache_avro::{Schema, to_avro_datum};
use thiserror::Error;

use super::registry::RegisteredSchema;
use crate::record::PublishRecord;

const WIRE_FORMAT_MAGIC: u8 = 0;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("registered schema is not parseable Avro: {0}")]
    InvalidSchema(String),

    #[error("registered schema is not a record schema")]
    NotARecord,

    #[error("record does not match registered schema: {0}")]
    Mismatch(String),
}

pub type Result<T> = std::result::Result<T, EncodeError>;

/// Encoder bound to one resolved schema for the lifetime of a run.
#[derive(Debug)]
pub struct AvroEncoder {
    schema: Schema,
    schema_id: u32,
}

impl AvroEncoder {
    pub fn new(registered: &RegisteredSchema) -> Result<Self> {
        let schema = Schema::parse_str(&registered.schema)
            .map_err(|e| EncodeError::InvalidSchema(e.to_string()))?;

        if !matches!(schema, Schema::Record(_)) {
            return Err(EncodeError::NotARecord);
        }

        Ok(Self {
            schema,
            schema_id: registered.id,
        })
    }

    pub fn encode(&self, record: &PublishRecord) -> Result<Vec<u8>> {
        let mut avro_record = Record::new(&self.schema).ok_or(EncodeError::NotARecord)?;
        avro_record.put("TITLE", record.title.as_str());
        avro_record.put("VIEWS", record.views);
        avro_record.put("LIKES", record.likes);
        avro_record.put("COMMENTS", record.comments);

        let datum = to_avro_datum(&self.schema, avro_record)
            .map_err(|e| EncodeError::Mismatch(e.to_string()))?;

        let mut framed = Vec::with_capacity(datum.len() + 5);
        framed.push(WIRE_FORMAT_MAGIC);
        framed.extend_from_slice(&self.schema_id.to_be_bytes());
        framed.extend_from_slice(&datum);
        Ok(framed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apache_avro::from_avro_datum;
    use apache_avro::types::Value;

    const VALUE_SCHEMA: &str = r#"{
        "type": "record",
        "name": "youtubeVideos",
        "fields": [
            {"name": "TITLE", "type": "string"},
            {"name": "VIEWS", "type": "long"},
            {"name": "LIKES", "type": "long"},
            {"name": "COMMENTS", "type": "long"}
        ]
    }"#;

    fn registered(schema: &str, id: u32) -> RegisteredSchema {
        RegisteredSchema {
            id,
            version: 1,
            subject: "youtubeVideos-value".to_string(),
            schema: schema.to_string(),
        }
    }

    #[test]
    fn encodes_confluent_framing_and_fields() {
        let encoder = AvroEncoder::new(&registered(VALUE_SCHEMA, 42)).unwrap();
        let framed = encoder
            .encode(&PublishRecord {
                title: "Some title".to_string(),
                views: 100,
                likes: 7,
                comments: 0,
            })
            .unwrap();

        assert_eq!(framed[0], 0);
        assert_eq!(&framed[1..5], &42u32.to_be_bytes());

        let schema = Schema::parse_str(VALUE_SCHEMA).unwrap();
        let decoded = from_avro_datum(&schema, &mut &framed[5..], None).unwrap();
        let Value::Record(fields) = decoded else {
            panic!("expected record value");
        };
        assert!(
            fields
                .iter()
                .any(|(name, v)| name == "VIEWS" && *v == Value::Long(100))
        );
        assert!(
            fields
                .iter()
                .any(|(name, v)| name == "TITLE" && *v == Value::String("Some title".to_string()))
        );
    }

    #[test]
    fn rejects_non_record_schema() {
        let err = AvroEncoder::new(&registered(r#""string""#, 1)).unwrap_err();
        assert!(matches!(err, EncodeError::NotARecord));
    }

    #[test]
    fn rejects_unparseable_schema() {
        let err = AvroEncoder::new(&registered("{not avro", 1)).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidSchema(_)));
    }
}
