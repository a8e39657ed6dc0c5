//! Byte helpers that render as hex for human readable formats and as raw bytes otherwise.

pub mod bytes_array {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::borrow::Cow;

    pub fn serialize<const N: usize, S: Serializer>(
        src: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            const_hex::encode(src).serialize(serializer)
        } else {
            serializer.serialize_bytes(src)
        }
    }

    pub fn deserialize<'de, const N: usize, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let mut output = [0u8; N];
        if deserializer.is_human_readable() {
            let s: Cow<str> = Cow::deserialize(deserializer)?;
            const_hex::decode_to_slice(s.as_ref(), &mut output)
                .map(|_| output)
                .map_err(<D::Error as serde::de::Error>::custom)
        } else {
            <&[u8]>::deserialize(deserializer).and_then(|bytes| {
                if bytes.len() != N {
                    Err(<D::Error as serde::de::Error>::invalid_length(
                        bytes.len(),
                        &format!("{N}").as_str(),
                    ))
                } else {
                    output.copy_from_slice(bytes);
                    Ok(output)
                }
            })
        }
    }
}

pub mod bytes_vec {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::borrow::Cow;

    pub fn serialize<S: Serializer>(src: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            const_hex::encode(src).serialize(serializer)
        } else {
            serializer.serialize_bytes(src)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let s: Cow<str> = Cow::deserialize(deserializer)?;
            const_hex::decode(s.as_ref()).map_err(<D::Error as serde::de::Error>::custom)
        } else {
            <&[u8]>::deserialize(deserializer).map(<[u8]>::to_vec)
        }
    }
}
