//! Logger sink contract.
//!
//! The resolver writes to the sink and never reads from it. Sinks are shared
//! between concurrently scanned entities, so they must be `Send + Sync`.

use std::sync::Mutex;

use log::{info, warn};
use serde::Serialize;

use crate::metadata::{DiagnosticLevel, PropertyIdentity};

#[cfg_attr(test, mockall::automock)]
pub trait ResolutionLogger: Send + Sync {
    fn log(&self, level: DiagnosticLevel, property: &PropertyIdentity, message: &str);
}

/// Forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ResolutionLogger for LogSink {
    fn log(&self, level: DiagnosticLevel, property: &PropertyIdentity, message: &str) {
        match level {
            DiagnosticLevel::Info => {
                info!(target: "colmeta::resolver", "{}: {}", property, message)
            }
            DiagnosticLevel::Warning => {
                warn!(target: "colmeta::resolver", "{}: {}", property, message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: DiagnosticLevel,
    pub property: PropertyIdentity,
    pub message: String,
}

/// Collects entries in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn for_property(&self, property: &PropertyIdentity) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| &entry.property == property)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResolutionLogger for MemorySink {
    fn log(&self, level: DiagnosticLevel, property: &PropertyIdentity, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(LogEntry {
                level,
                property: property.clone(),
                message: message.to_string(),
            });
    }
}

/// Fans every entry out to several sinks.
pub struct TeeSink<'a> {
    sinks: Vec<&'a dyn ResolutionLogger>,
}

impl<'a> TeeSink<'a> {
    pub fn new(sinks: Vec<&'a dyn ResolutionLogger>) -> Self {
        Self { sinks }
    }
}

impl ResolutionLogger for TeeSink<'_> {
    fn log(&self, level: DiagnosticLevel, property: &PropertyIdentity, message: &str) {
        for sink in &self.sinks {
            sink.log(level, property, message);
        }
    }
}
