//! TokenPrices — per-day token price map that remembers insertion order.
//!
//! The representative-price fallback picks the first priced token in the
//! order the backtest service emitted them, so a `HashMap`/`BTreeMap` would
//! silently change which token wins. Non-numeric values (null, strings) are
//! dropped while deserializing; the map only ever holds finite prices.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered `symbol -> USD price` pairs for a single timeline point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenPrices {
    entries: Vec<(String, f64)>,
}

impl TokenPrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a price. Non-finite prices are ignored.
    pub fn insert(&mut self, symbol: impl Into<String>, price: f64) {
        if !price.is_finite() {
            return;
        }
        let symbol = symbol.into();
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some(entry) => entry.1 = price,
            None => self.entries.push((symbol, price)),
        }
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, symbol: impl Into<String>, price: f64) -> Self {
        self.insert(symbol, price);
        self
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, p)| *p)
    }

    /// First price in insertion order.
    pub fn first(&self) -> Option<f64> {
        self.entries.first().map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TokenPrices {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut prices = TokenPrices::new();
        for (symbol, price) in iter {
            prices.insert(symbol, price);
        }
        prices
    }
}

impl Serialize for TokenPrices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (symbol, price) in &self.entries {
            map.serialize_entry(symbol, price)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TokenPrices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenPricesVisitor)
    }
}

struct TokenPricesVisitor;

impl<'de> Visitor<'de> for TokenPricesVisitor {
    type Value = TokenPrices;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of token symbol to USD price")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut prices = TokenPrices::new();
        while let Some((symbol, value)) = access.next_entry::<String, serde_json::Value>()? {
            if let Some(price) = value.as_f64() {
                prices.insert(symbol, price);
            }
        }
        Ok(prices)
    }

    // A null or missing price map is an empty one.
    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(TokenPrices::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(TokenPrices::new())
    }
}
