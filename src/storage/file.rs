//! File-based storage implementation.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{DcSearchError, Result};
use crate::storage::traits::{Storage, StorageConfig, StorageInput, StorageOutput};

/// A storage rooted at one directory of the local file system.
#[derive(Debug)]
pub struct FileStorage {
    directory: PathBuf,
    config: StorageConfig,
}

impl FileStorage {
    /// Open an existing directory.
    ///
    /// Fails with `DirectoryNotFound` if `directory` is missing or is not a
    /// directory.
    pub fn open<P: AsRef<Path>>(directory: P, config: StorageConfig) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.is_dir() {
            return Err(DcSearchError::directory_not_found(
                directory.display().to_string(),
            ));
        }
        Ok(FileStorage { directory, config })
    }

    /// Open a directory for writing, creating it if needed.
    pub fn create<P: AsRef<Path>>(directory: P, config: StorageConfig) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.exists() {
            std::fs::create_dir_all(&directory).map_err(|e| {
                DcSearchError::index_write(format!(
                    "failed to create directory {}: {e}",
                    directory.display()
                ))
            })?;
        }
        if !directory.is_dir() {
            return Err(DcSearchError::index_write(format!(
                "path is not a directory: {}",
                directory.display()
            )));
        }
        Ok(FileStorage { directory, config })
    }

    /// The root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Get the full path for a file name.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let file = File::open(self.file_path(name))?;
        Ok(Box::new(FileInput::new(file, self.config.buffer_size)?))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.file_path(name))
            .map_err(|e| DcSearchError::index_write(format!("cannot create {name}: {e}")))?;

        Ok(Box::new(FileOutput::new(
            file,
            self.config.buffer_size,
            self.config.sync_writes,
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).exists()
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        match std::fs::remove_file(self.file_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DcSearchError::storage(format!(
                "failed to delete {name}: {e}"
            ))),
        }
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.directory).map_err(|e| {
            DcSearchError::directory_not_found(format!("{}: {e}", self.directory.display()))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name() else {
                continue;
            };
            match name.to_str() {
                Some(name) => files.push(name.to_string()),
                None => {
                    return Err(DcSearchError::invalid_document_id(
                        name.to_string_lossy().into_owned(),
                    ));
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        Ok(self.file_path(name).metadata()?.len())
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        std::fs::rename(self.file_path(old_name), self.file_path(new_name)).map_err(|e| {
            DcSearchError::index_write(format!("failed to rename {old_name} to {new_name}: {e}"))
        })
    }
}

/// A buffered file input.
#[derive(Debug)]
pub struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl FileInput {
    fn new(file: File, buffer_size: usize) -> Result<Self> {
        let size = file.metadata()?.len();
        let reader = BufReader::with_capacity(buffer_size, file);
        Ok(FileInput { reader, size })
    }
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for FileInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

/// A buffered file output that tracks its write position.
#[derive(Debug)]
pub struct FileOutput {
    writer: BufWriter<File>,
    sync_writes: bool,
    position: u64,
}

impl FileOutput {
    fn new(file: File, buffer_size: usize, sync_writes: bool) -> Self {
        FileOutput {
            writer: BufWriter::with_capacity(buffer_size, file),
            sync_writes,
            position: 0,
        }
    }
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes_written = self.writer.write(buf)?;
        self.position += bytes_written as u64;

        if self.sync_writes {
            self.writer.flush()?;
        }

        Ok(bytes_written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| DcSearchError::index_write(format!("failed to flush: {e}")))?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| DcSearchError::index_write(format!("failed to sync: {e}")))?;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.position
    }
}
