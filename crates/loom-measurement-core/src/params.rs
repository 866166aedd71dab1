// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hit parameter maps and their wire encoding.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single measurement protocol parameter value.
///
/// Values keep their semantic type until they are encoded so that the
/// absent-vs-falsy distinction can be applied before anything goes on the
/// wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
	Text(String),
	Integer(i64),
	Decimal(f64),
	/// Encoded as `1` / `0`.
	Flag(bool),
}

impl ParamValue {
	/// Returns true if the value counts as supplied for conditional fields.
	///
	/// Empty strings, zero, NaN and `false` are all treated as absent.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Text(s) => !s.is_empty(),
			Self::Integer(n) => *n != 0,
			Self::Decimal(n) => *n != 0.0 && !n.is_nan(),
			Self::Flag(b) => *b,
		}
	}

	/// Returns the form-encoding representation of this value.
	pub fn to_wire(&self) -> String {
		match self {
			Self::Text(s) => s.clone(),
			Self::Integer(n) => n.to_string(),
			Self::Decimal(n) => n.to_string(),
			Self::Flag(true) => "1".to_string(),
			Self::Flag(false) => "0".to_string(),
		}
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_wire())
	}
}

impl Serialize for ParamValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_wire())
	}
}

impl From<&str> for ParamValue {
	fn from(s: &str) -> Self {
		Self::Text(s.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(s: String) -> Self {
		Self::Text(s)
	}
}

impl From<&String> for ParamValue {
	fn from(s: &String) -> Self {
		Self::Text(s.clone())
	}
}

impl From<i32> for ParamValue {
	fn from(n: i32) -> Self {
		Self::Integer(i64::from(n))
	}
}

impl From<i64> for ParamValue {
	fn from(n: i64) -> Self {
		Self::Integer(n)
	}
}

impl From<u32> for ParamValue {
	fn from(n: u32) -> Self {
		Self::Integer(i64::from(n))
	}
}

impl From<f64> for ParamValue {
	fn from(n: f64) -> Self {
		Self::Decimal(n)
	}
}

impl From<bool> for ParamValue {
	fn from(b: bool) -> Self {
		Self::Flag(b)
	}
}

/// A mapping from protocol field code (`dh`, `ec`, `ti`, ...) to value.
///
/// Serializes as a flat map of strings, which is what `reqwest`'s form
/// encoder expects.
///
/// # Example
///
/// ```
/// use loom_measurement_core::HitParams;
///
/// let mut params = HitParams::new();
/// params.insert("ec", "Video");
/// params.insert_truthy("el", Some(""));
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitParams {
	inner: BTreeMap<String, ParamValue>,
}

impl HitParams {
	pub fn new() -> Self {
		Self {
			inner: BTreeMap::new(),
		}
	}

	/// Inserts a field unconditionally, replacing any previous value.
	pub fn insert<K, V>(&mut self, key: K, value: V)
	where
		K: Into<String>,
		V: Into<ParamValue>,
	{
		self.inner.insert(key.into(), value.into());
	}

	/// Builder-style variant of [`HitParams::insert`].
	pub fn with<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<ParamValue>,
	{
		self.insert(key, value);
		self
	}

	/// Inserts a field only if the value was supplied and is truthy.
	///
	/// Returns whether the field was inserted.
	pub fn insert_truthy<K, V>(&mut self, key: K, value: Option<V>) -> bool
	where
		K: Into<String>,
		V: Into<ParamValue>,
	{
		match value.map(Into::into) {
			Some(value) if value.is_truthy() => {
				self.inner.insert(key.into(), value);
				true
			}
			_ => false,
		}
	}

	/// Merges another parameter map into this one.
	///
	/// If both contain the same key, the value from `other` takes precedence.
	pub fn merge(&mut self, other: HitParams) {
		self.inner.extend(other.inner);
	}

	pub fn get(&self, key: &str) -> Option<&ParamValue> {
		self.inner.get(key)
	}

	/// Returns the wire representation of a field, if present.
	pub fn get_wire(&self, key: &str) -> Option<String> {
		self.inner.get(key).map(ParamValue::to_wire)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Field codes in sorted order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.inner.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.inner.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl Serialize for HitParams {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.inner.len()))?;
		for (key, value) in &self.inner {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

impl<K, V> FromIterator<(K, V)> for HitParams
where
	K: Into<String>,
	V: Into<ParamValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = HitParams::new();
		for (key, value) in iter {
			params.insert(key, value);
		}
		params
	}
}
