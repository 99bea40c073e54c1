//! Delimited-file record store
//!
//! One UTF-8 CSV file per store. The first row is a header naming the
//! columns in a fixed order:
//!
//! ```text
//! timestamp,object_id,<data fields...>
//! ```
//!
//! `timestamp` is present for time-series stores and `object_id` for object
//! stores. Empty cells are read back as absent fields.
//!
//! # Access model
//!
//! Each `write` opens the file in append mode and closes it before returning.
//! Each `fetch` re-reads the whole file. `delete` writes the surviving rows to
//! a temporary sibling file and renames it over the store file, so the file
//! is never left half-rewritten.
//!
//! The store assumes it is the only process touching the file. Concurrent
//! writers, or a writer racing a reader, are not detected.

use crate::codec::FieldCodec;
use crate::store::RecordStore;
use datapoint_core::{
    DatapointError, DatapointResult, DeleteQuery, FetchQuery, Record, RecordFilter, Schema,
    Timestamp, UnknownFieldPolicy, Value,
};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column name of the timestamp field
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Column name of the object-id field
pub const OBJECT_ID_FIELD: &str = "object_id";

/// Options for opening a [`CsvStore`]
///
/// ```ignore
/// let options = CsvStoreOptions::new()
///     .data_fields(["temperature"])
///     .codec("temperature", FieldCodec::float());
/// let store = CsvStore::open("readings.csv", options)?;
/// ```
#[derive(Debug, Clone)]
pub struct CsvStoreOptions {
    /// Add a `timestamp` column (default true)
    pub time_series: bool,
    /// Add an `object_id` column (default true)
    pub object_series: bool,
    /// Further columns, in order
    pub data_fields: Vec<String>,
    /// Per-field converters
    pub codecs: HashMap<String, FieldCodec>,
    /// Handling of fields that have no column
    pub unknown_fields: UnknownFieldPolicy,
}

impl CsvStoreOptions {
    /// Default options: an object time series with no data fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the `timestamp` column
    pub fn time_series(mut self, enabled: bool) -> Self {
        self.time_series = enabled;
        self
    }

    /// Enable or disable the `object_id` column
    pub fn object_series(mut self, enabled: bool) -> Self {
        self.object_series = enabled;
        self
    }

    /// Set the data columns
    pub fn data_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Register a converter for a column
    pub fn codec(mut self, field: impl Into<String>, codec: FieldCodec) -> Self {
        self.codecs.insert(field.into(), codec);
        self
    }

    /// Set the unknown-field policy
    pub fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Check the options and derive the schema
    ///
    /// # Errors
    ///
    /// `Config` if both series flags are off, if a data field uses a reserved
    /// column name, or if a codec names a column that does not exist.
    pub fn schema(&self) -> DatapointResult<Schema> {
        if !self.time_series && !self.object_series {
            return Err(DatapointError::config(
                "store must be a time series, an object store, or both",
            ));
        }
        for field in &self.data_fields {
            if field == TIMESTAMP_FIELD || field == OBJECT_ID_FIELD {
                return Err(DatapointError::config(format!(
                    "field name '{field}' is reserved"
                )));
            }
        }

        let schema = Schema::configure(
            self.time_series.then_some(TIMESTAMP_FIELD),
            self.object_series.then_some(OBJECT_ID_FIELD),
            Some(self.data_fields.clone()),
        )?
        .with_unknown_field_policy(self.unknown_fields);

        let columns = schema.field_names();
        if let Some(field) = self.codecs.keys().find(|f| !columns.contains(*f)) {
            return Err(DatapointError::config(format!(
                "codec registered for unknown column '{field}'"
            )));
        }

        Ok(schema)
    }
}

impl Default for CsvStoreOptions {
    fn default() -> Self {
        Self {
            time_series: true,
            object_series: true,
            data_fields: Vec::new(),
            codecs: HashMap::new(),
            unknown_fields: UnknownFieldPolicy::Drop,
        }
    }
}

/// Record store backed by a single CSV file
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
    schema: Schema,
    header: Vec<String>,
    codecs: HashMap<String, FieldCodec>,
}

impl CsvStore {
    /// Open an existing file or create a new one
    ///
    /// An existing file must have exactly the expected header. A missing file
    /// is created containing only the header row.
    ///
    /// # Errors
    ///
    /// - `Config` if the options are invalid
    /// - `SchemaMismatch` if an existing header differs
    /// - `Io` / `Csv` if the file cannot be read or created
    pub fn open(path: impl AsRef<Path>, options: CsvStoreOptions) -> DatapointResult<Self> {
        let path = path.as_ref().to_path_buf();
        let schema = options.schema()?;
        let header = schema.field_names();

        if path.exists() {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .from_path(&path)
                .map_err(|e| csv_error(&format!("opening {}", path.display()), e))?;
            let found: Vec<String> = reader
                .headers()
                .map_err(|e| csv_error(&format!("reading header of {}", path.display()), e))?
                .iter()
                .map(str::to_string)
                .collect();
            if found != header {
                return Err(DatapointError::SchemaMismatch {
                    path,
                    expected: header,
                    found,
                });
            }
            debug!(target: "datapoint::storage", path = %path.display(), "Opened CSV store");
        } else {
            let mut writer = csv::Writer::from_path(&path)
                .map_err(|e| csv_error(&format!("creating {}", path.display()), e))?;
            writer
                .write_record(&header)
                .map_err(|e| csv_error("writing header", e))?;
            writer
                .flush()
                .map_err(|e| DatapointError::io("flushing header", e))?;
            info!(
                target: "datapoint::storage",
                path = %path.display(),
                columns = header.len(),
                "Created CSV store"
            );
        }

        Ok(Self {
            path,
            schema,
            header,
            codecs: options.codecs,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names in file order
    pub fn header(&self) -> &[String] {
        &self.header
    }

    fn reader(&self) -> DatapointResult<csv::Reader<File>> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| csv_error(&format!("opening {}", self.path.display()), e))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_else(|| OsStr::new("datapoint")));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn encode_value(&self, field: &str, value: &Value) -> DatapointResult<String> {
        if let Some(codec) = self.codecs.get(field) {
            return Ok(codec.encode(value));
        }
        if self.schema.timestamp_field() == Some(field) {
            return Ok(value.to_timestamp()?.to_canonical_string());
        }
        Ok(value.to_string())
    }

    fn decode_value(&self, field: &str, text: &str) -> DatapointResult<Value> {
        if let Some(codec) = self.codecs.get(field) {
            return codec.decode(field, text);
        }
        if self.schema.timestamp_field() == Some(field) {
            return Ok(Value::Timestamp(Timestamp::parse(text)?));
        }
        Ok(Value::String(text.to_string()))
    }

    /// The value `value` reads back as after a round trip through `field`'s column
    fn stored_form(&self, field: &str, value: &Value) -> Value {
        match self.encode_value(field, value) {
            Ok(text) if !text.is_empty() => self
                .decode_value(field, &text)
                .unwrap_or_else(|_| value.clone()),
            _ => value.clone(),
        }
    }

    /// Query object IDs rewritten to match decoded rows
    fn stored_ids(&self, ids: Option<&[Value]>) -> Option<Vec<Value>> {
        let ids = ids?;
        Some(match self.schema.object_id_field() {
            Some(field) => ids.iter().map(|id| self.stored_form(field, id)).collect(),
            None => ids.to_vec(),
        })
    }

    fn encode_row(&self, record: &Record) -> DatapointResult<Vec<String>> {
        self.header
            .iter()
            .map(|field| match record.get_present(field) {
                Some(value) => self.encode_value(field, value),
                None => Ok(String::new()),
            })
            .collect()
    }

    fn decode_row(&self, row: &csv::StringRecord) -> DatapointResult<Record> {
        let mut record = Record::new();
        for (field, cell) in self.header.iter().zip(row.iter()) {
            if cell.is_empty() {
                continue;
            }
            record.insert(field.as_str(), self.decode_value(field, cell)?);
        }
        Ok(record)
    }

    fn rewrite_without(&self, tmp_path: &Path, filter: &RecordFilter) -> DatapointResult<usize> {
        let mut reader = self.reader()?;
        let mut writer = csv::Writer::from_path(tmp_path)
            .map_err(|e| csv_error(&format!("creating {}", tmp_path.display()), e))?;
        writer
            .write_record(&self.header)
            .map_err(|e| csv_error("writing header", e))?;

        let mut removed = 0usize;
        for row in reader.records() {
            let row = row.map_err(|e| csv_error("reading row", e))?;
            if filter.matches(&self.decode_row(&row)?) {
                removed += 1;
            } else {
                writer
                    .write_record(&row)
                    .map_err(|e| csv_error("writing row", e))?;
            }
        }

        let file = writer
            .into_inner()
            .map_err(|e| DatapointError::io("flushing temporary file", e.into_error()))?;
        file.sync_all()
            .map_err(|e| DatapointError::io("syncing temporary file", e))?;
        Ok(removed)
    }
}

impl RecordStore for CsvStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn write_batch(&mut self, records: Vec<Record>) -> DatapointResult<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| DatapointError::io(format!("opening {} for append", self.path.display()), e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let mut written = 0usize;
        let mut outcome = Ok(());
        for record in records {
            let row = match self
                .schema
                .validate(record)
                .and_then(|r| self.encode_row(&r))
            {
                Ok(row) => row,
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            };
            if let Err(e) = writer.write_record(&row) {
                outcome = Err(csv_error("writing row", e));
                break;
            }
            written += 1;
        }

        // Rows accepted before a failure stay written.
        writer
            .flush()
            .map_err(|e| DatapointError::io(format!("flushing {}", self.path.display()), e))?;
        debug!(target: "datapoint::storage", path = %self.path.display(), written, "CSV write");
        outcome
    }

    fn fetch(&self, query: &FetchQuery) -> DatapointResult<Vec<Record>> {
        let query = FetchQuery {
            object_ids: self.stored_ids(query.object_ids.as_deref()),
            ..query.clone()
        };
        let filter = query.resolve(&self.schema)?;
        let mut reader = self.reader()?;

        let mut scanned = 0usize;
        let mut results = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| csv_error("reading row", e))?;
            scanned += 1;
            if let Some(record) = filter.apply(self.decode_row(&row)?) {
                results.push(record);
            }
        }

        debug!(
            target: "datapoint::storage",
            path = %self.path.display(),
            scanned,
            matched = results.len(),
            "CSV fetch"
        );
        Ok(results)
    }

    fn delete(&mut self, query: &DeleteQuery) -> DatapointResult<usize> {
        let query = DeleteQuery {
            object_ids: self.stored_ids(query.object_ids.as_deref()),
            ..query.clone()
        };
        let filter = query.resolve(&self.schema)?;
        let tmp_path = self.temp_path();

        let removed = match self.rewrite_without(&tmp_path, &filter) {
            Ok(removed) => removed,
            Err(e) => {
                let _ = fs::remove_file(&tmp_path);
                return Err(e);
            }
        };

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            DatapointError::io(
                format!("replacing {} with {}", self.path.display(), tmp_path.display()),
                e,
            )
        })?;

        debug!(target: "datapoint::storage", path = %self.path.display(), removed, "CSV delete");
        Ok(removed)
    }
}

fn csv_error(context: &str, err: csv::Error) -> DatapointError {
    let message = format!("{context}: {err}");
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DatapointError::io(context, source),
        _ => DatapointError::csv(message),
    }
}
