//! File-backed order log storage.
//!
//! The file holds the column-oriented layout from [`crate::columnar`],
//! pretty-printed with a 4-space indent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use marketsim_core::DomainError;
use marketsim_sales::{Order, OrderLog};

use crate::columnar::{self, ColumnarError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no order data at {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Columnar(#[from] ColumnarError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Order log persisted as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonOrderStore {
    path: PathBuf,
}

impl JsonOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with the empty layout (every field, no rows).
    pub fn erase(&self) -> StoreResult<()> {
        self.write_value(&columnar::empty_columns::<Order>())?;
        tracing::info!(path = %self.path.display(), "order store erased");
        Ok(())
    }

    /// Write a frozen log, replacing any previous contents.
    pub fn save(&self, log: &OrderLog) -> StoreResult<()> {
        if !log.is_frozen() {
            return Err(DomainError::invalid_state("only a frozen order log can be saved").into());
        }
        let value = columnar::to_columns(log.as_records())?;
        self.write_value(&value)?;
        tracing::info!(path = %self.path.display(), orders = log.len(), "order log saved");
        Ok(())
    }

    /// Read the file back as a frozen log.
    pub fn load(&self) -> StoreResult<OrderLog> {
        let raw = fs::read_to_string(&self.path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => self.io_error(source),
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let orders: Vec<Order> = columnar::from_columns(&value)?;
        tracing::info!(path = %self.path.display(), orders = orders.len(), "order log loaded");
        Ok(OrderLog::frozen(orders))
    }

    fn write_value(&self, value: &Value) -> StoreResult<()> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut ser).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Write beside the target and rename so readers never see a torn file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &buf).map_err(|source| self.io_error(source))?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(source));
        }
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
