//! Error types for parbench.
//! The parallel layer reports exactly one failure kind (`Aggregate`); the rest
//! cover pool construction and configuration.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Main error type for parbench operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchError {
    /// One or more worker tasks failed inside a parallel execution
    Aggregate {
        operation: String,
        failures: Vec<String>,
    },
    /// The worker pool could not be built
    Pool {
        operation: String,
        source: String,
    },
    /// Invalid configuration value
    Config {
        field: Option<String>,
        source: String,
    },
}

impl BenchError {
    /// Build an aggregate error from a caught panic payload.
    pub fn from_panic(operation: &str, payload: Box<dyn Any + Send>) -> Self {
        BenchError::Aggregate {
            operation: operation.to_string(),
            failures: vec![panic_message(payload.as_ref())],
        }
    }

    pub fn config(field: &str, source: impl Into<String>) -> Self {
        BenchError::Config {
            field: Some(field.to_string()),
            source: source.into(),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, BenchError::Aggregate { .. })
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::Aggregate { operation, failures } => {
                write!(f, "One or more errors occurred in {}", operation)?;
                if let Some(first) = failures.first() {
                    write!(f, ": first failure: {}", first)?;
                }
                Ok(())
            }
            BenchError::Pool { operation, source } => {
                write!(f, "Worker pool error in {}: {}", operation, source)
            }
            BenchError::Config { field, source } => {
                write!(f, "Configuration error: {}", source)?;
                if let Some(field) = field {
                    write!(f, " (field: {})", field)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for BenchError {}

/// Extract a readable message from a panic payload (`&str` or `String`).
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker task panicked".to_string()
    }
}
