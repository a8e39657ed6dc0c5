//! Human readable byte sizes such as `90kib`, `2MiB` or `4096`.
//!
//! Decimal units (`kb`, `mb`, `gb`) are powers of 1000, binary units (`kib`, `mib`, `gib`) are
//! powers of 1024. Units are case insensitive.

// std
// crates
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
// internal

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ByteSizeError {
    #[error("Empty size")]
    Empty,
    #[error("Invalid size number `{0}`")]
    Number(String),
    #[error("Unknown size unit `{0}`")]
    Unit(String),
    #[error("Size `{0}` overflows")]
    Overflow(String),
}

const UNITS: &[(&str, usize)] = &[
    ("", 1),
    ("b", 1),
    ("kb", 1_000),
    ("mb", 1_000_000),
    ("gb", 1_000_000_000),
    ("kib", 1 << 10),
    ("mib", 1 << 20),
    ("gib", 1 << 30),
];

pub fn parse_size(input: &str) -> Result<usize, ByteSizeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ByteSizeError::Empty);
    }
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    let number: usize = number
        .parse()
        .map_err(|_| ByteSizeError::Number(input.to_string()))?;
    let unit = unit.trim().to_ascii_lowercase();
    let multiplier = UNITS
        .iter()
        .find_map(|(name, multiplier)| (*name == unit).then_some(*multiplier))
        .ok_or_else(|| ByteSizeError::Unit(unit.clone()))?;
    number
        .checked_mul(multiplier)
        .ok_or_else(|| ByteSizeError::Overflow(input.to_string()))
}

/// `serde(with = ..)` helper, accepts either a size string or a plain integer.
pub fn serialize<S: Serializer>(size: &usize, serializer: S) -> Result<S::Ok, S::Error> {
    size.serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Bytes(usize),
        Text(String),
    }
    match Size::deserialize(deserializer)? {
        Size::Bytes(size) => Ok(size),
        Size::Text(text) => parse_size(&text).map_err(serde::de::Error::custom),
    }
}
