use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::models::Record;

/// Handles reading and writing one CSV data file.
///
/// Whole-collection saves replace the file; single-row appends never
/// rewrite what is already there. Neither is atomic.
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Storage for the fixed file of record kind `T` inside `data_dir`
    pub fn for_record<T: Record>(data_dir: &Path) -> Self {
        Self::new(data_dir.join(T::FILE_NAME))
    }

    /// Returns the path to the storage file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads every row of the file.
    ///
    /// A first row whose leading column equals the first header name is
    /// taken as the header and used to map columns by name. Without it,
    /// columns are mapped by position. Any bad row fails the whole load.
    pub fn load<T: Record>(&self) -> StoreResult<Vec<T>> {
        let file = match File::open(&self.file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::FileMissing {
                    path: self.file_path.clone(),
                })
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.file_path.clone(),
                    source: e,
                })
            }
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut header: Option<StringRecord> = None;
        let mut records = Vec::new();

        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| self.row_error(e))?;

            if index == 0 && row.get(0).map(str::trim) == T::HEADERS.first().copied() {
                header = Some(row);
                continue;
            }

            let record: T = row
                .deserialize(header.as_ref())
                .map_err(|e| StoreError::parse(&self.file_path, e))?;
            records.push(record);
        }

        Ok(records)
    }

    /// I/O failures while reading rows are read errors, everything else is a parse error
    fn row_error(&self, e: csv::Error) -> StoreError {
        let io_kind = match e.kind() {
            csv::ErrorKind::Io(io_err) => io_err.kind(),
            _ => return StoreError::parse(&self.file_path, e),
        };
        StoreError::Read {
            path: self.file_path.clone(),
            source: io::Error::new(io_kind, e),
        }
    }

    /// Replaces the file with a header row followed by every record
    pub fn save<T: Record>(&self, records: &[T]) -> StoreResult<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::write(&self.file_path, e))?;
        }

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_path(&self.file_path)
            .map_err(|e| StoreError::write(&self.file_path, e))?;

        writer
            .write_record(T::HEADERS)
            .map_err(|e| StoreError::write(&self.file_path, e))?;
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| StoreError::write(&self.file_path, e))?;
        }
        writer
            .flush()
            .map_err(|e| StoreError::write(&self.file_path, e))?;

        Ok(())
    }

    /// Appends a single row, creating the file if needed. No header is written.
    ///
    /// A file whose last row lacks a line terminator gets one first, so the
    /// new row never joins onto it.
    pub fn append<T: Record>(&self, record: &T) -> StoreResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::write(&self.file_path, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.file_path)
            .map_err(|e| StoreError::write(&self.file_path, e))?;

        let terminated = ends_with_newline(&mut file)
            .map_err(|e| StoreError::write(&self.file_path, e))?;
        if !terminated {
            file.write_all(b"\r\n")
                .map_err(|e| StoreError::write(&self.file_path, e))?;
        }

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(file);
        writer
            .serialize(record)
            .map_err(|e| StoreError::write(&self.file_path, e))?;

        let mut file = writer
            .into_inner()
            .map_err(|e| StoreError::write(&self.file_path, e.into_error()))?;
        file.flush()
            .map_err(|e| StoreError::write(&self.file_path, e))?;

        Ok(())
    }
}

/// True for an empty file or one whose last byte is `\n`
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
