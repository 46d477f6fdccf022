// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Rc;

use core::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Datatypes a [`Value`] can carry.
///
/// Only the types quantified expressions need to reason about are modeled.
/// The remaining XACML datatypes belong to the function library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Boolean,
    Integer,
    String,
}

impl DataType {
    /// XML Schema identifier used for this datatype in policy documents.
    pub fn uri(&self) -> &'static str {
        match self {
            DataType::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            DataType::Integer => "http://www.w3.org/2001/XMLSchema#integer",
            DataType::String => "http://www.w3.org/2001/XMLSchema#string",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::String => "string",
        })
    }
}

impl FromStr for DataType {
    type Err = anyhow::Error;

    /// Accepts the short name or the XML Schema identifier.
    fn from_str(s: &str) -> Result<Self> {
        [DataType::Boolean, DataType::Integer, DataType::String]
            .into_iter()
            .find(|t| s == t.to_string() || s == t.uri())
            .ok_or_else(|| anyhow!("unknown datatype `{s}`"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("bag of {expected} cannot hold a {found} value")]
    BagTypeMismatch { expected: DataType, found: DataType },
}

// Equality and ordering are datatype-aware: a boolean true never equals the string "true".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    String(Rc<str>),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::String(_) => DataType::String,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Value> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_str(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn as_bool(&self) -> Result<&bool> {
        match self {
            Value::Bool(b) => Ok(b),
            _ => Err(anyhow!("not a bool")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::String(s) => serializer.serialize_str(s.as_ref()),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean, integer or string")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| de::Error::custom(format!("integer {v} out of range")))
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(s))
    }

    fn visit_string<E>(self, s: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(s))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{s}"),
            Err(_e) => Err(fmt::Error),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

/// An unordered collection of values sharing one datatype. Duplicates are allowed.
///
/// Elements are kept in insertion order and iteration always follows that
/// order, so short-circuiting quantifiers behave the same way on every
/// evaluation of the same bag. An empty bag created with [`Bag::default`]
/// has no datatype until its first value is pushed.
#[derive(Debug, Clone, Default)]
pub struct Bag {
    data_type: Option<DataType>,
    values: Rc<Vec<Value>>,
}

impl Bag {
    pub fn new(data_type: DataType) -> Bag {
        Bag {
            data_type: Some(data_type),
            values: Rc::new(vec![]),
        }
    }

    pub fn from_values(data_type: DataType, values: Vec<Value>) -> Result<Bag, ValueError> {
        if let Some(v) = values.iter().find(|v| v.data_type() != data_type) {
            return Err(ValueError::BagTypeMismatch {
                expected: data_type,
                found: v.data_type(),
            });
        }
        Ok(Bag {
            data_type: Some(data_type),
            values: Rc::new(values),
        })
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn push(&mut self, value: Value) -> Result<(), ValueError> {
        match self.data_type {
            Some(expected) if expected != value.data_type() => {
                return Err(ValueError::BagTypeMismatch {
                    expected,
                    found: value.data_type(),
                })
            }
            Some(_) => (),
            None => self.data_type = Some(value.data_type()),
        }
        Rc::make_mut(&mut self.values).push(value);
        Ok(())
    }

    fn sorted(&self) -> Vec<&Value> {
        let mut values: Vec<&Value> = self.values.iter().collect();
        values.sort();
        values
    }
}

// Multiset equality: order is irrelevant, multiplicity is not.
impl PartialEq for Bag {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() && other.is_empty() {
            return true;
        }
        self.data_type == other.data_type
            && self.len() == other.len()
            && self.sorted() == other.sorted()
    }
}

impl Eq for Bag {}

impl<'a> IntoIterator for &'a Bag {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Bag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.values.serialize(serializer)
    }
}
