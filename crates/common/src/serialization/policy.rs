//! Serialization policy: naming convention plus an ordered converter list.
//!
//! Converter selection is by the declared [`WireKind`] of a value. The list is
//! evaluated front to back and the first converter that handles the kind wins,
//! so the version-options converter must precede the fallback.

use conduit_domain::{ClientError, Result, VersionOptions, WireKind, WireValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::naming::NamingConvention;

/// Scalar token converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Converter {
    /// `"Latest" | "Published" | "All" | <integer>`
    VersionOptions,
    /// Enum member names, case-sensitive
    StringEnum,
    /// Strings verbatim, numbers and booleans as JSON literals
    Fallback,
}

impl Converter {
    /// Whether this converter may handle values of the declared kind.
    pub fn handles(&self, kind: WireKind) -> bool {
        match self {
            Self::VersionOptions => kind == WireKind::VersionOptions,
            Self::StringEnum => kind == WireKind::Enum,
            Self::Fallback => true,
        }
    }

    fn encode(&self, value: Value) -> Result<String> {
        match (self, value) {
            (Self::VersionOptions, Value::String(token)) => {
                token.parse::<VersionOptions>()?;
                Ok(token)
            }
            (Self::VersionOptions, other) => Err(ClientError::serialization(format!(
                "version options must encode as a string token, got {other}"
            ))),
            (Self::StringEnum, Value::String(name)) => Ok(name),
            (Self::StringEnum, other) => Err(ClientError::serialization(format!(
                "enum values must encode as their member name, got {other}"
            ))),
            (Self::Fallback, Value::String(text)) => Ok(text),
            (Self::Fallback, Value::Number(number)) => Ok(number.to_string()),
            (Self::Fallback, Value::Bool(flag)) => Ok(flag.to_string()),
            (Self::Fallback, Value::Null) => {
                Err(ClientError::serialization("null cannot be encoded as a token"))
            }
            (Self::Fallback, composite) => serde_json::to_string(&composite)
                .map_err(|e| ClientError::serialization(format!("failed to encode token: {e}"))),
        }
    }

    fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T> {
        match self {
            Self::VersionOptions => {
                let parsed: VersionOptions = token.parse()?;
                from_value(Value::String(parsed.to_string()))
            }
            Self::StringEnum => from_value(Value::String(token.to_string())),
            Self::Fallback => {
                let literal = serde_json::from_str::<Value>(token)
                    .ok()
                    .filter(|v| v.is_number() || v.is_boolean());
                match literal {
                    Some(value) => {
                        from_value(value).or_else(|_| from_value(Value::String(token.to_string())))
                    }
                    None => from_value(Value::String(token.to_string())),
                }
            }
        }
    }
}

/// Naming convention plus ordered converters; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationPolicy {
    naming: NamingConvention,
    converters: Vec<Converter>,
}

impl Default for SerializationPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl SerializationPolicy {
    /// camelCase naming; version-options, string-enum, fallback converters.
    pub fn standard() -> Self {
        Self::builder()
            .naming(NamingConvention::CamelCase)
            .converter(Converter::VersionOptions)
            .converter(Converter::StringEnum)
            .converter(Converter::Fallback)
            .build()
    }

    /// Start an empty policy.
    pub fn builder() -> SerializationPolicyBuilder {
        SerializationPolicyBuilder::default()
    }

    /// Continue building from this policy; added converters rank after the
    /// existing ones.
    pub fn to_builder(&self) -> SerializationPolicyBuilder {
        SerializationPolicyBuilder { naming: self.naming, converters: self.converters.clone() }
    }

    pub fn naming(&self) -> NamingConvention {
        self.naming
    }

    pub fn converters(&self) -> &[Converter] {
        &self.converters
    }

    /// First converter in precedence order that handles `kind`.
    pub fn converter_for(&self, kind: WireKind) -> Option<Converter> {
        self.converters.iter().copied().find(|c| c.handles(kind))
    }

    /// Wire name for a Rust field or parameter name.
    pub fn field_name(&self, name: &str) -> String {
        self.naming.apply(name)
    }

    /// Encode a scalar value as a single token (query parameter value).
    pub fn encode_token<T>(&self, value: &T) -> Result<String>
    where
        T: Serialize + WireValue + ?Sized,
    {
        let converter = self.require_converter(T::KIND)?;
        let json = serde_json::to_value(value)
            .map_err(|e| ClientError::serialization(format!("failed to encode token: {e}")))?;
        converter.encode(json)
    }

    /// Decode a single token into a scalar value.
    pub fn decode_token<T>(&self, token: &str) -> Result<T>
    where
        T: DeserializeOwned + WireValue,
    {
        self.require_converter(T::KIND)?.decode(token)
    }

    /// Encode a request body as JSON.
    pub fn encode_body<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| ClientError::serialization(format!("failed to encode body: {e}")))
    }

    /// Decode a response body; an empty body decodes as JSON `null`.
    pub fn decode_body<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return from_value(Value::Null);
        }
        serde_json::from_slice(bytes)
            .map_err(|e| ClientError::serialization(format!("failed to decode body: {e}")))
    }

    fn require_converter(&self, kind: WireKind) -> Result<Converter> {
        self.converter_for(kind).ok_or_else(|| {
            ClientError::serialization(format!("no converter registered for {kind:?} values"))
        })
    }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ClientError::serialization(format!("failed to decode value: {e}")))
}

/// Builder for [`SerializationPolicy`]
#[derive(Debug, Clone, Default)]
pub struct SerializationPolicyBuilder {
    naming: NamingConvention,
    converters: Vec<Converter>,
}

impl SerializationPolicyBuilder {
    pub fn naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    /// Append a converter. A converter already in the list keeps its earlier
    /// position; earliest registration wins.
    pub fn converter(mut self, converter: Converter) -> Self {
        if !self.converters.contains(&converter) {
            self.converters.push(converter);
        }
        self
    }

    pub fn build(self) -> SerializationPolicy {
        SerializationPolicy { naming: self.naming, converters: self.converters }
    }
}
