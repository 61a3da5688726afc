//! Version selector for versioned workflow resources.
//!
//! Wire grammar: `"Latest" | "Published" | "All" | <integer>`. Reserved tokens
//! are case-sensitive; anything else must parse as a version number.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ClientError;
use crate::wire::{WireKind, WireValue};

const LATEST: &str = "Latest";
const PUBLISHED: &str = "Published";
const ALL: &str = "All";

/// Reference to a versioned resource by relative or absolute version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VersionOptions {
    #[default]
    Latest,
    Published,
    Specific(i32),
    All,
}

impl VersionOptions {
    /// Select an exact version number.
    pub fn specific(version: i32) -> Self {
        Self::Specific(version)
    }

    /// Version number for [`VersionOptions::Specific`], `None` otherwise.
    pub fn version(&self) -> Option<i32> {
        match self {
            Self::Specific(version) => Some(*version),
            _ => None,
        }
    }
}

impl fmt::Display for VersionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST),
            Self::Published => f.write_str(PUBLISHED),
            Self::All => f.write_str(ALL),
            Self::Specific(version) => write!(f, "{version}"),
        }
    }
}

impl FromStr for VersionOptions {
    type Err = ClientError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            LATEST => Ok(Self::Latest),
            PUBLISHED => Ok(Self::Published),
            ALL => Ok(Self::All),
            other => other.parse::<i32>().map(Self::Specific).map_err(|_| {
                ClientError::serialization(format!("invalid version options token '{other}'"))
            }),
        }
    }
}

impl WireValue for VersionOptions {
    const KIND: WireKind = WireKind::VersionOptions;
}

impl Serialize for VersionOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TokenVisitor;

        impl Visitor<'_> for TokenVisitor {
            type Value = VersionOptions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a version options token (\"Latest\", \"Published\", \"All\" or a version number)")
            }

            fn visit_str<E: de::Error>(self, token: &str) -> Result<Self::Value, E> {
                token.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TokenVisitor)
    }
}
