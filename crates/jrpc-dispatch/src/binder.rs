//! Argument binding.
//!
//! Two stages: [`split_params`] normalizes the envelope's `params` (plus the
//! `kwargs` extension) into a positional list and a keyword map, then
//! [`Signature::bind`] matches those against the slots a method declared at
//! registration.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::BindError;
use crate::request::RequestParams;

/// Positional + keyword arguments supplied by one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuppliedArgs {
    pub positional: Vec<Value>,
    pub keyword: Map<String, Value>,
}

/// Normalize `params` and the optional `kwargs` extension.
///
/// `kwargs` only adds names; a key already supplied through object `params`
/// keeps its `params` value.
pub fn split_params(
    params: Option<RequestParams>,
    kwargs: Option<Map<String, Value>>,
) -> SuppliedArgs {
    let (positional, mut keyword) = params.map(RequestParams::into_parts).unwrap_or_default();
    for (name, value) in kwargs.into_iter().flatten() {
        keyword.entry(name).or_insert(value);
    }
    SuppliedArgs { positional, keyword }
}

#[derive(Debug, Clone, PartialEq)]
struct Param {
    name: String,
    default: Option<Value>,
}

/// Ordered parameter slots of a registered method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// A method that takes no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Required parameters, in positional order.
    pub fn required<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(Self::new(), |sig, name| sig.param(name))
    }

    /// Append a required parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Append a parameter that falls back to `default` when not supplied.
    pub fn optional(mut self, name: impl Into<String>, default: Value) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Fill every slot: positionals first, then keywords by name, then defaults.
    pub fn bind(&self, supplied: SuppliedArgs) -> Result<Args, BindError> {
        let SuppliedArgs {
            positional,
            keyword,
        } = supplied;

        if positional.len() > self.params.len() {
            return Err(BindError::TooManyPositional {
                expected: self.params.len(),
                given: positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = positional.into_iter().map(Some).collect();
        slots.resize(self.params.len(), None);

        for (name, value) in keyword {
            let index = self
                .params
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| BindError::UnexpectedKeyword(name.clone()))?;
            if slots[index].is_some() {
                return Err(BindError::DuplicateArgument(name));
            }
            slots[index] = Some(value);
        }

        let values = slots
            .into_iter()
            .zip(&self.params)
            .map(|(slot, param)| {
                slot.or_else(|| param.default.clone())
                    .ok_or_else(|| BindError::Missing(param.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Args {
            names: self.params.iter().map(|p| p.name.clone()).collect(),
            values,
        })
    }
}

/// Arguments bound to a method's signature, one value per declared slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    names: Vec<String>,
    values: Vec<Value>,
}

impl Args {
    /// Raw value of a named slot.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| &self.values[index])
    }

    /// Deserialize a named slot. A type mismatch is a bind error, which the
    /// dispatcher reports as "Invalid params".
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, BindError> {
        let value = self
            .value(name)
            .ok_or_else(|| BindError::Missing(name.to_string()))?;
        convert(name, value)
    }

    /// Deserialize a slot by position.
    pub fn at<T: DeserializeOwned>(&self, index: usize) -> Result<T, BindError> {
        let name = self
            .names
            .get(index)
            .ok_or_else(|| BindError::Missing(format!("#{}", index)))?;
        convert(name, &self.values[index])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

fn convert<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T, BindError> {
    T::deserialize(value).map_err(|e| BindError::TypeMismatch {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
