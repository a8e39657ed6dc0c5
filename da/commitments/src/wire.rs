//! Serializer and Deserializer for certificate wire formats.

use bincode::{
    config::{
        Bounded, DefaultOptions, FixintEncoding, LittleEndian, RejectTrailing, WithOtherEndian,
        WithOtherIntEncoding, WithOtherLimit, WithOtherTrailing,
    },
    Options,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub type Error = bincode::Error;
// type composition is cool but also makes naming types a bit akward
type BincodeOptions = WithOtherTrailing<
    WithOtherIntEncoding<
        WithOtherLimit<WithOtherEndian<DefaultOptions, LittleEndian>, Bounded>,
        FixintEncoding,
    >,
    RejectTrailing,
>;

const DATA_LIMIT: u64 = 8192; // Do not serialize/deserialize more than 8Kb
static OPTIONS: Lazy<BincodeOptions> = Lazy::new(|| {
    bincode::DefaultOptions::new()
        .with_little_endian()
        .with_limit(DATA_LIMIT)
        .with_fixint_encoding()
        .reject_trailing_bytes()
});

/// Serialize an object directly into a vec
pub fn serialize<T: Serialize>(item: &T) -> Result<Vec<u8>, Error> {
    let options = *OPTIONS;
    options.serialize(item)
}

/// Deserialize an object from an in-memory slice, trailing bytes are an error
pub fn deserialize<'de, T: Deserialize<'de>>(data: &'de [u8]) -> Result<T, Error> {
    let options = *OPTIONS;
    options.deserialize(data)
}
