// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::convert::TryFrom;
use std::fmt::Formatter;
use std::io::Read;

use serde_json::Value;

use crate::engine::errors::Error;
use crate::engine::{Record, Result};

/// What happens to a field that has an entry in the [`FieldMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTarget {
    Rename(String),
    Remove,
}

impl std::fmt::Display for FieldTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldTarget::Rename(to) => write!(f, "rename to `{to}`"),
            FieldTarget::Remove => f.write_str("remove"),
        }
    }
}

/// Renaming table loaded from the field map configuration, a flat JSON
/// object of `"source field": "destination field"` pairs where an empty
/// destination removes the field.
///
/// A field map is built once and only ever read afterwards, so a single
/// instance can be shared by every record of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: BTreeMap<String, FieldTarget>,
}

impl FieldMap {
    pub fn new() -> Self {
        FieldMap::default()
    }

    pub fn from_json(content: &str) -> Result<FieldMap> {
        let value = serde_json::from_str::<Value>(content)?;
        FieldMap::try_from(value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<FieldMap> {
        let value = serde_json::from_reader::<R, Value>(reader)?;
        FieldMap::try_from(value)
    }

    pub fn from_value(value: Value) -> Result<FieldMap> {
        FieldMap::try_from(value)
    }

    pub fn rename(mut self, from: &str, to: &str) -> Self {
        let target = if to.is_empty() {
            FieldTarget::Remove
        } else {
            FieldTarget::Rename(to.to_string())
        };
        self.entries.insert(from.to_string(), target);
        self
    }

    pub fn remove(mut self, field: &str) -> Self {
        self.entries.insert(field.to_string(), FieldTarget::Remove);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldTarget> {
        self.entries.get(field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldTarget)> {
        self.entries.iter().map(|(from, target)| (from.as_str(), target))
    }

    /// Destination names that more than one source field is renamed to. Any
    /// record carrying two of those sources produces a collision.
    pub fn conflicting_targets(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut by_target: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (from, target) in self.iter() {
            if let FieldTarget::Rename(to) = target {
                by_target.entry(to.as_str()).or_default().push(from);
            }
        }
        by_target.retain(|_, sources| sources.len() > 1);
        by_target
    }
}

impl TryFrom<Value> for FieldMap {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(Error::InvalidFieldMap(format!(
                    "expected a JSON object at the top level, found {}",
                    type_name(&other)
                )))
            }
        };

        let mut field_map = FieldMap::new();
        for (from, to) in object {
            match to {
                Value::String(to) => field_map = field_map.rename(&from, &to),
                other => {
                    return Err(Error::InvalidFieldMap(format!(
                        "value for field `{from}` must be a string, found {}",
                        type_name(&other)
                    )))
                }
            }
        }
        Ok(field_map)
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Two source fields of one record ended up under the same name. The value
/// from `kept` survived, the value from `replaced` was overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub field: String,
    pub kept: String,
    pub replaced: String,
}

impl std::fmt::Display for Collision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "field `{}` written by both `{}` and `{}`, kept value from `{}`",
            self.field, self.replaced, self.kept, self.kept
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    pub record: Record,
    pub collisions: Vec<Collision>,
}

/// Renames and removes the fields of `record` according to `field_map`.
/// Fields without an entry are carried over as-is.
///
/// Fields are processed in the record's own order. When two fields land on
/// the same name the one processed last wins, and the overwrite is returned
/// as a [`Collision`]. A renamed field keeps the position of its source.
pub fn apply_field_map(record: &Record, field_map: &FieldMap) -> MappedRecord {
    let mut mapped = Record::new();
    let mut written_by: HashMap<&str, &str> = HashMap::with_capacity(record.len());
    let mut collisions = Vec::new();

    for (field, value) in record {
        let destination = match field_map.get(field) {
            Some(FieldTarget::Remove) => continue,
            Some(FieldTarget::Rename(to)) => to.as_str(),
            None => field.as_str(),
        };

        if let Some(previous) = written_by.insert(destination, field.as_str()) {
            collisions.push(Collision {
                field: destination.to_string(),
                kept: field.clone(),
                replaced: previous.to_string(),
            });
        }
        mapped.insert(destination.to_string(), value.clone());
    }

    MappedRecord {
        record: mapped,
        collisions,
    }
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod mapping_tests;
