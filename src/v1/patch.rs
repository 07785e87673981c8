//! Patch documents
//!
//! A single JSON-patch style operation sent as the body of an update.

use crate::client::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

impl PatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Replace => "replace",
            PatchOp::Remove => "remove",
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(PatchOp::Add),
            "replace" => Ok(PatchOp::Replace),
            "remove" => Ok(PatchOp::Remove),
            other => Err(Error::InvalidArgument(format!(
                "unknown patch operation '{}', expected add, replace or remove",
                other
            ))),
        }
    }
}

/// One patch operation: `{"op": ..., "path": ..., "value": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Patch {
    pub fn add(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value.into()),
        }
    }

    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value.into()),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }

    /// Build a patch from a command-line `attribute[=value]` argument.
    ///
    /// The attribute becomes a pointer rooted at `/`; `remove` takes no value,
    /// `add` and `replace` require one. Values are sent as strings.
    pub fn from_arg(op: PatchOp, arg: &str) -> Result<Self> {
        let (attr, value) = match arg.split_once('=') {
            Some((attr, value)) => (attr, Some(value)),
            None => (arg, None),
        };

        let attr = attr.trim().trim_start_matches('/');
        if attr.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "attribute missing in '{}'",
                arg
            )));
        }
        let path = format!("/{}", attr);

        match (op, value) {
            (PatchOp::Remove, None) => Ok(Self::remove(path)),
            (PatchOp::Remove, Some(_)) => Err(Error::InvalidArgument(format!(
                "remove takes an attribute only, got '{}'",
                arg
            ))),
            (_, Some(value)) => Ok(Self {
                op,
                path,
                value: Some(Value::String(value.to_string())),
            }),
            (_, None) => Err(Error::InvalidArgument(format!(
                "{} requires attribute=value, got '{}'",
                op, arg
            ))),
        }
    }

    pub(crate) fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::Encode)
    }
}
