//! Backend dialects: turn a backend-neutral [`QueryPlan`] into query text

pub mod influxql;
pub mod ioql;

pub use influxql::InfluxQlRenderer;
pub use ioql::IoqlRenderer;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::sample::fleet::HostName;
use crate::sample::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Max,
    Mean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every field of the measurement
    All,
    Aggregate {
        func: Aggregate,
        fields: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gt,
    Lt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Host(HostName),
    Float(f64),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predicate {
    pub field: &'static str,
    pub op: CmpOp,
    pub value: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub combinator: Combinator,
    pub predicates: Vec<Predicate>,
}

/// Time bucketing, grouped by one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucketing {
    pub every: Duration,
    pub tag: &'static str,
}

/// Structure of one query, independent of any target language.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan<'a> {
    pub measurement: &'a str,
    pub selection: Selection,
    pub window: Option<Window>,
    pub filter: Option<Filter>,
    pub bucketing: Option<Bucketing>,
    /// Keep only the most recent row per value of this tag
    pub last_per: Option<&'static str>,
}

impl<'a> QueryPlan<'a> {
    pub fn new(measurement: &'a str) -> Self {
        QueryPlan {
            measurement,
            selection: Selection::All,
            window: None,
            filter: None,
            bucketing: None,
            last_per: None,
        }
    }
}

/// Renders plans for one backend.
pub trait QueryRenderer: fmt::Debug + Send + Sync {
    /// Prefix of every human label produced with this renderer
    fn label_prefix(&self) -> &'static str;

    fn render(&self, plan: &QueryPlan<'_>, out: &mut String) -> fmt::Result;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    Ioql,
    #[value(name = "influxql")]
    InfluxQl,
}

impl Dialect {
    pub fn renderer(self) -> Arc<dyn QueryRenderer> {
        match self {
            Dialect::Ioql => Arc::new(IoqlRenderer),
            Dialect::InfluxQl => Arc::new(InfluxQlRenderer),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Ioql => f.write_str("ioql"),
            Dialect::InfluxQl => f.write_str("influxql"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Host(host) => write!(f, "{}", host),
            Literal::Float(v) => write!(f, "{:?}", v),
            Literal::Int(v) => write!(f, "{}", v),
        }
    }
}
