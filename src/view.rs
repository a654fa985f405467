//! Derived views: what one answered query renders as.

use crate::error::ChurnError;
use polars::prelude::*;
use serde::ser::Serializer;
use serde::Serialize;
use serde_json::{json, Value};

/// One bar of a categorical chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Table {
        title: String,
        #[serde(serialize_with = "serialize_frame")]
        frame: DataFrame,
    },
    Message {
        text: String,
    },
    Chart {
        title: String,
        bars: Vec<Bar>,
    },
    Warning {
        text: String,
    },
}

impl View {
    pub fn table(title: impl Into<String>, frame: DataFrame) -> Self {
        View::Table {
            title: title.into(),
            frame,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        View::Message { text: text.into() }
    }

    pub fn chart(title: impl Into<String>, bars: Vec<Bar>) -> Self {
        View::Chart {
            title: title.into(),
            bars,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        View::Warning { text: text.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            View::Table { .. } => "table",
            View::Message { .. } => "message",
            View::Chart { .. } => "chart",
            View::Warning { .. } => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Status line emitted while loading data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }

    /// Waiting on an upload is a warning, not a failure.
    pub fn from_error(err: &ChurnError) -> Self {
        if err.is_informational() {
            Self::warning(err.to_string())
        } else {
            Self::error(err.to_string())
        }
    }
}

/// Column names plus row-major cell values, column order preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableJson {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TableJson {
    pub fn from_frame(frame: &DataFrame) -> Self {
        let series = frame.get_columns();
        let columns = series.iter().map(|s| s.name().to_string()).collect();
        let rows = (0..frame.height())
            .map(|idx| {
                series
                    .iter()
                    .map(|s| s.get(idx).map(any_value_to_json).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }
}

fn serialize_frame<S>(frame: &DataFrame, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    TableJson::from_frame(frame).serialize(serializer)
}

fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::Int32(v) => json!(v),
        AnyValue::Int64(v) => json!(v),
        AnyValue::UInt32(v) => json!(v),
        AnyValue::UInt64(v) => json!(v),
        // NaN serializes as null
        AnyValue::Float32(v) => json!(v),
        AnyValue::Float64(v) => json!(v),
        other => Value::String(other.to_string()),
    }
}
