//! Portal records and the classification of their field values.
//!
//! Raw JSON-LD objects are classified exactly once, at ingestion, into a
//! closed set of shapes. The loader never inspects raw JSON again.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::types::Scalar;

/// Keys holding the record identifier, in lookup order.
pub const ID_KEYS: [&str; 2] = ["@id", "id"];

/// Keys holding the record type list, in lookup order.
pub const TYPE_KEYS: [&str; 2] = ["@type", "type"];

/// Field whose embedded objects become their own vertices.
pub const ATTACHMENT_FIELD: &str = "attachment";

/// Field whose embedded objects are genomic coordinates.
pub const LOCATIONS_FIELD: &str = "locations";

/// Field holding presentational page metadata.
pub const LAYOUT_FIELD: &str = "layout";

/// Synthetic type given to attachment vertices.
pub const ATTACHMENT_TYPE: &str = "Attachment";

/// Attachment property used as the attachment's identifier.
pub const ATTACHMENT_KEY: &str = "md5sum";

// ── Record ────────────────────────────────────────────────────────

/// A metadata record fetched from the portal.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Globally unique identifier (the `@id` path).
    pub id: String,
    /// Type labels, most specific first.
    pub types: Vec<String>,
    /// Every other field, classified.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Ingest a raw portal object.
    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        let map = value.as_object().ok_or(RecordError::NotAnObject)?;

        let (id_key, id) = ID_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str).map(|v| (*k, v)))
            .ok_or(RecordError::MissingId)?;
        let id = id.to_string();

        let type_key = TYPE_KEYS.iter().copied().find(|k| map.contains_key(*k));
        let types: Vec<String> = type_key
            .and_then(|k| map.get(k))
            .map(|v| match v {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect(),
                _ => Vec::new(),
            })
            .unwrap_or_default();

        if types.is_empty() {
            return Err(RecordError::MissingType { id });
        }

        let reserved = [Some(id_key), type_key];
        Ok(Self {
            id,
            types,
            fields: collect_fields(map, &reserved),
        })
    }

    /// The label used for this record's vertex.
    pub fn primary_type(&self) -> &str {
        self.types.first().map(String::as_str).unwrap_or_default()
    }

    /// Build the record for an embedded attachment object, keyed by its content hash.
    fn attachment(map: &Map<String, Value>) -> Option<Self> {
        let id = map.get(ATTACHMENT_KEY)?.as_str()?.to_string();
        Some(Self {
            id,
            types: vec![ATTACHMENT_TYPE.to_string()],
            fields: collect_fields(map, &[Some(ID_KEYS[0]), Some(TYPE_KEYS[0])]),
        })
    }
}

/// Classify every field except the reserved identity keys.
fn collect_fields(
    map: &Map<String, Value>,
    reserved: &[Option<&str>],
) -> BTreeMap<String, FieldValue> {
    map.iter()
        .filter(|(k, _)| !reserved.contains(&Some(k.as_str())))
        .filter_map(|(k, v)| FieldValue::classify(k, v).map(|fv| (k.clone(), fv)))
        .collect()
}

// ── Field values ──────────────────────────────────────────────────

/// The value of one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    List(Vec<FieldItem>),
    Embedded(Embedded),
}

/// One element of a (normalized) field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldItem {
    Scalar(Scalar),
    Embedded(Embedded),
}

/// Borrowed view of a [`FieldItem`], used when walking normalized values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemRef<'a> {
    Scalar(&'a Scalar),
    Embedded(&'a Embedded),
}

impl FieldValue {
    /// Classify a raw JSON value. `null` yields `None`.
    pub fn classify(field: &str, value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(Self::List(
                items
                    .iter()
                    .filter_map(|item| FieldItem::classify(field, item))
                    .collect(),
            )),
            Value::Object(map) => Some(Self::Embedded(Embedded::classify(field, map))),
            leaf => Scalar::from_json(leaf).map(Self::Scalar),
        }
    }

    /// Normalize to a list: a single value becomes a one-element list.
    pub fn items(&self) -> Vec<ItemRef<'_>> {
        match self {
            Self::Scalar(s) => vec![ItemRef::Scalar(s)],
            Self::Embedded(e) => vec![ItemRef::Embedded(e)],
            Self::List(items) => items.iter().map(FieldItem::as_item).collect(),
        }
    }
}

impl FieldItem {
    fn classify(field: &str, value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Array(_) => Some(Self::Embedded(Embedded::Unsupported {
                reason: "nested array".to_string(),
            })),
            Value::Object(map) => Some(Self::Embedded(Embedded::classify(field, map))),
            leaf => Scalar::from_json(leaf).map(Self::Scalar),
        }
    }

    pub fn as_item(&self) -> ItemRef<'_> {
        match self {
            Self::Scalar(s) => ItemRef::Scalar(s),
            Self::Embedded(e) => ItemRef::Embedded(e),
        }
    }
}

// ── Embedded objects ──────────────────────────────────────────────

/// The known kinds of embedded sub-object.
#[derive(Debug, Clone, PartialEq)]
pub enum Embedded {
    /// A file attachment, loaded as its own vertex.
    Attachment(Box<Record>),
    /// Genomic coordinates, flattened onto the parent vertex.
    Location(Location),
    /// Page layout metadata, never loaded.
    Layout,
    /// Any other shape; skipped by the loader.
    Unsupported { reason: String },
}

/// Genomic coordinates on one assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub assembly: String,
    pub start: Scalar,
    pub end: Scalar,
    pub chromosome: Scalar,
}

impl Location {
    fn from_map(map: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            assembly: Scalar::from_json(map.get("assembly")?)?.to_string(),
            start: Scalar::from_json(map.get("start")?)?,
            end: Scalar::from_json(map.get("end")?)?,
            chromosome: Scalar::from_json(map.get("chromosome")?)?,
        })
    }

    /// Property names and values written on the parent vertex.
    pub fn properties(&self) -> [(String, Scalar); 3] {
        [
            (format!("start_{}", self.assembly), self.start.clone()),
            (format!("end_{}", self.assembly), self.end.clone()),
            (format!("chromosome_{}", self.assembly), self.chromosome.clone()),
        ]
    }
}

impl Embedded {
    /// Classify an embedded object by the field it appears under.
    pub fn classify(field: &str, map: &Map<String, Value>) -> Self {
        match field {
            ATTACHMENT_FIELD => match Record::attachment(map) {
                Some(record) => Self::Attachment(Box::new(record)),
                None => Self::Unsupported {
                    reason: format!("attachment without a string {ATTACHMENT_KEY}"),
                },
            },
            LOCATIONS_FIELD => match Location::from_map(map) {
                Some(location) => Self::Location(location),
                None => Self::Unsupported {
                    reason: "location missing assembly, start, end or chromosome".to_string(),
                },
            },
            LAYOUT_FIELD => Self::Layout,
            _ => Self::Unsupported {
                reason: "unsupported nested object".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ingests_portal_object() {
        let raw = json!({
            "@id": "/genes/ENSG00000001/",
            "@type": ["Gene", "Item"],
            "symbol": "TP53",
            "synonyms": ["p53", "LFS1"],
            "taxa": null,
        });

        let record = Record::from_json(&raw).unwrap();
        assert_eq!(record.id, "/genes/ENSG00000001/");
        assert_eq!(record.primary_type(), "Gene");
        assert_eq!(record.fields.len(), 2);
        assert_eq!(
            record.fields["symbol"],
            FieldValue::Scalar(Scalar::from("TP53"))
        );
        assert!(!record.fields.contains_key("taxa"));
        assert!(!record.fields.contains_key("@type"));
    }

    #[test]
    fn accepts_plain_id_and_type_keys() {
        let record = Record::from_json(&json!({"id": "A1", "type": "Gene"})).unwrap();
        assert_eq!(record.id, "A1");
        assert_eq!(record.types, vec!["Gene".to_string()]);
        assert!(record.fields.is_empty());
    }

    #[test]
    fn rejects_records_without_identity() {
        assert_eq!(
            Record::from_json(&json!({"@type": ["Gene"]})),
            Err(RecordError::MissingId)
        );
        assert_eq!(
            Record::from_json(&json!({"@id": "A1", "@type": []})),
            Err(RecordError::MissingType { id: "A1".to_string() })
        );
        assert_eq!(Record::from_json(&json!([1, 2])), Err(RecordError::NotAnObject));
    }

    #[test]
    fn scalar_normalizes_to_single_item() {
        let value = FieldValue::Scalar(Scalar::from("x"));
        assert_eq!(value.items(), vec![ItemRef::Scalar(&Scalar::from("x"))]);
    }

    #[test]
    fn attachment_is_keyed_by_md5sum() {
        let raw = json!({
            "@id": "/documents/D1/",
            "@type": ["Document"],
            "attachment": {
                "download": "protocol.pdf",
                "md5sum": "abc123",
                "type": "application/pdf",
            }
        });

        let record = Record::from_json(&raw).unwrap();
        let FieldValue::Embedded(Embedded::Attachment(att)) = &record.fields["attachment"] else {
            panic!("expected attachment, got {:?}", record.fields["attachment"]);
        };
        assert_eq!(att.id, "abc123");
        assert_eq!(att.primary_type(), ATTACHMENT_TYPE);
        assert!(att.fields.contains_key("md5sum"));
        assert!(att.fields.contains_key("download"));
        // The MIME type is a plain field on attachments, not a type label.
        assert_eq!(
            att.fields["type"],
            FieldValue::Scalar(Scalar::from("application/pdf"))
        );
    }

    #[test]
    fn attachment_without_hash_is_unsupported() {
        let raw = json!({"@id": "D1", "@type": ["Document"], "attachment": {"download": "x"}});
        let record = Record::from_json(&raw).unwrap();
        assert!(matches!(
            record.fields["attachment"],
            FieldValue::Embedded(Embedded::Unsupported { .. })
        ));
    }

    #[test]
    fn locations_are_classified() {
        let raw = json!({
            "@id": "G1",
            "@type": ["Gene"],
            "locations": [
                {"assembly": "GRCh38", "start": 1, "end": 100, "chromosome": "chr1"},
                {"assembly": "GRCh38"}
            ]
        });
        let record = Record::from_json(&raw).unwrap();
        let FieldValue::List(items) = &record.fields["locations"] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);

        let FieldItem::Embedded(Embedded::Location(loc)) = &items[0] else {
            panic!("expected location");
        };
        let props = loc.properties();
        assert_eq!(props[0], ("start_GRCh38".to_string(), Scalar::Integer(1)));
        assert_eq!(props[1], ("end_GRCh38".to_string(), Scalar::Integer(100)));
        assert_eq!(props[2], ("chromosome_GRCh38".to_string(), Scalar::from("chr1")));

        assert!(matches!(
            items[1],
            FieldItem::Embedded(Embedded::Unsupported { .. })
        ));
    }

    #[test]
    fn layout_and_other_objects() {
        let raw = json!({
            "@id": "P1",
            "@type": ["Page"],
            "layout": {"blocks": []},
            "settings": {"a": 1},
            "matrix": [[1, 2]],
        });
        let record = Record::from_json(&raw).unwrap();
        assert_eq!(record.fields["layout"], FieldValue::Embedded(Embedded::Layout));
        assert!(matches!(
            record.fields["settings"],
            FieldValue::Embedded(Embedded::Unsupported { .. })
        ));
        assert!(matches!(
            record.fields["matrix"].items()[0],
            ItemRef::Embedded(Embedded::Unsupported { .. })
        ));
    }
}
