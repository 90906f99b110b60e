//! Service operations: unmarshal, marshal, and store.
//!
//! [`CsvService`] is the callable surface a transport layer would expose. It
//! holds nothing but an injected schema registry; every operation receives
//! its full configuration explicitly and shares no state with other calls,
//! so concurrent calls are independent.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::codec::{decode, encode, CsvOptions, Encoder};
use crate::error::BindError;
use crate::negotiate::CSV_CONTENT_TYPE;
use crate::record::Record;
use crate::schema::{RecordType, SchemaRegistry};
use crate::sink::{Datastore, Locator, StreamSink};
use crate::window::Window;

/// The CSV marshalling service.
#[derive(Clone)]
pub struct CsvService {
    registry: Arc<dyn SchemaRegistry>,
}

impl CsvService {
    /// Create a service resolving types through the given registry.
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve a record type by name.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<RecordType>, BindError> {
        Ok(self.registry.resolve(type_name)?)
    }

    /// Decode a CSV byte input into records of the named type.
    ///
    /// An empty `windows` slice reads every row. For lazy row-by-row
    /// consumption use [`crate::codec::Decoder`] directly.
    pub fn unmarshal(
        &self,
        type_name: &str,
        input: &[u8],
        opts: &CsvOptions,
        windows: &[Window],
    ) -> Result<Vec<Record>, BindError> {
        let record_type = self.registry.resolve(type_name)?;
        Ok(decode(input, &record_type, opts, windows)?)
    }

    /// Encode records of the named type into a CSV buffer.
    pub fn marshal(
        &self,
        type_name: &str,
        records: &[Record],
        opts: &CsvOptions,
    ) -> Result<Bytes, BindError> {
        let record_type = self.registry.resolve(type_name)?;
        Ok(encode(records, &record_type, opts)?)
    }

    /// Encode records and hand them to a datastore, returning the locator.
    ///
    /// Routing policy: a streaming handle is preferred (bounded memory,
    /// single pass); when the backend offers none, the records are encoded
    /// into memory and stored through the buffered API. Both paths produce
    /// identical bytes. The streaming handle is closed on every exit path;
    /// on failure the partial object is aborted before the error propagates.
    ///
    /// When `name` is `None` the object is named `<type name>.csv` - the
    /// extension always matches the `text/csv` content type declared to the
    /// store.
    pub async fn store(
        &self,
        type_name: &str,
        records: &[Record],
        store: &dyn Datastore,
        context: &str,
        name: Option<&str>,
        opts: &CsvOptions,
    ) -> Result<Locator, BindError> {
        let record_type = self.registry.resolve(type_name)?;
        let object_name = match name {
            Some(name) => name.to_string(),
            None => format!("{}.csv", record_type.name()),
        };

        match store
            .streamable(context, &object_name, CSV_CONTENT_TYPE)
            .await
            .map_err(BindError::Store)?
        {
            Some(mut sink) => {
                debug!(context, name = %object_name, "storing via streaming sink");
                let encoder = Encoder::new(&record_type, opts);
                match stream_into(sink.as_mut(), &encoder, records).await {
                    Ok(()) => Ok(sink.finish().await.map_err(BindError::Store)?),
                    Err(e) => {
                        sink.abort().await;
                        Err(e)
                    }
                }
            }
            None => {
                debug!(context, name = %object_name, "store not streamable, buffering");
                let data = encode(records, &record_type, opts)?;
                Ok(store
                    .store_bytes(context, data, &object_name, CSV_CONTENT_TYPE)
                    .await
                    .map_err(BindError::Store)?)
            }
        }
    }
}

impl std::fmt::Debug for CsvService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvService").finish_non_exhaustive()
    }
}

/// Write header and records into a sink, one encoded row at a time.
async fn stream_into(
    sink: &mut dyn StreamSink,
    encoder: &Encoder<'_>,
    records: &[Record],
) -> Result<(), BindError> {
    if let Some(header) = encoder.header_bytes()? {
        sink.write_all(&header).await.map_err(BindError::Store)?;
    }
    for record in records {
        let row = encoder.record_bytes(record)?;
        sink.write_all(&row).await.map_err(BindError::Store)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use crate::schema::{FieldKind, FieldSpec, InMemoryRegistry};
    use crate::sink::MemoryStore;

    fn service() -> CsvService {
        let mut registry = InMemoryRegistry::new();
        registry.register(
            RecordType::new(
                "person",
                vec![
                    FieldSpec::new("name", FieldKind::String),
                    FieldSpec::new("age", FieldKind::Integer),
                ],
            )
            .unwrap(),
        );
        CsvService::new(Arc::new(registry))
    }

    fn person(name: &str, age: i64) -> Record {
        Record::from_pairs(vec![
            ("name".to_string(), Value::String(name.to_string())),
            ("age".to_string(), Value::Integer(age)),
        ])
    }

    #[test]
    fn test_unmarshal_resolves_type() {
        let records = service()
            .unmarshal("person", b"name,age\nalice,30\n", &CsvOptions::default(), &[])
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("age"), Some(&Value::Integer(30)));
    }

    #[test]
    fn test_unknown_type_fails() {
        let err = service()
            .unmarshal("ghost", b"", &CsvOptions::default(), &[])
            .unwrap_err();
        assert!(matches!(err, BindError::Schema(_)));
    }

    #[test]
    fn test_marshal_round_trip() {
        let svc = service();
        let records = vec![person("alice", 30), person("bob", 41)];
        let opts = CsvOptions::default();

        let bytes = svc.marshal("person", &records, &opts).unwrap();
        let back = svc.unmarshal("person", &bytes, &opts, &[]).unwrap();
        assert_eq!(back, records);
    }

    #[tokio::test]
    async fn test_store_default_name_has_csv_extension() {
        let store = MemoryStore::new();
        let locator = service()
            .store(
                "person",
                &[person("alice", 30)],
                &store,
                "exports",
                None,
                &CsvOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(locator.as_str(), "memory://exports/person.csv");
        assert_eq!(
            store.content_type("exports", "person.csv").await.unwrap(),
            "text/csv"
        );
    }
}
