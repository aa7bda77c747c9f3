//! Value <-> stored text conversion

use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::rc::Rc;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

/// Pair of conversions between a value and the string kept in the store.
pub trait Codec<T> {
    fn serialize(&self, value: &T) -> Result<String, CodecError>;
    fn deserialize(&self, text: &str) -> Result<T, CodecError>;
}

/// Structural JSON encoding, the default codec.
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec<T> {
    fn serialize(&self, value: &T) -> Result<String, CodecError> {
        serde_json::to_string(value).map_err(|e| CodecError::Serialize(e.to_string()))
    }

    fn deserialize(&self, text: &str) -> Result<T, CodecError> {
        serde_json::from_str(text).map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}

/// Plain text via `Display` / `FromStr`, e.g. `Ada` instead of `"Ada"`.
pub struct TextCodec<T>(PhantomData<fn() -> T>);

impl<T> TextCodec<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TextCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TextCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Codec<T> for TextCodec<T>
where
    T: Display + FromStr,
    T::Err: Display,
{
    fn serialize(&self, value: &T) -> Result<String, CodecError> {
        Ok(value.to_string())
    }

    fn deserialize(&self, text: &str) -> Result<T, CodecError> {
        text.parse()
            .map_err(|e: T::Err| CodecError::Deserialize(e.to_string()))
    }
}

type SerializeFn<T> = Rc<dyn Fn(&T) -> Result<String, CodecError>>;
type DeserializeFn<T> = Rc<dyn Fn(&str) -> Result<T, CodecError>>;

/// Codec assembled from a pair of closures.
pub struct FnCodec<T> {
    serialize: SerializeFn<T>,
    deserialize: DeserializeFn<T>,
}

impl<T> FnCodec<T> {
    pub fn new(
        serialize: impl Fn(&T) -> Result<String, CodecError> + 'static,
        deserialize: impl Fn(&str) -> Result<T, CodecError> + 'static,
    ) -> Self {
        Self {
            serialize: Rc::new(serialize),
            deserialize: Rc::new(deserialize),
        }
    }
}

impl<T> Clone for FnCodec<T> {
    fn clone(&self) -> Self {
        Self {
            serialize: self.serialize.clone(),
            deserialize: self.deserialize.clone(),
        }
    }
}

impl<T> Codec<T> for FnCodec<T> {
    fn serialize(&self, value: &T) -> Result<String, CodecError> {
        (self.serialize)(value)
    }

    fn deserialize(&self, text: &str) -> Result<T, CodecError> {
        (self.deserialize)(text)
    }
}
