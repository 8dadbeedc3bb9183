//! Release-channel ladder.
//!
//! Features can be gated to a minimum release channel. Channels are ordered
//! from most stable to least stable:
//!
//! ```text
//! stable < beta < dev < canary < trunk
//! ```
//!
//! A request coming from some channel may use a feature gated at a channel
//! that is *at most* as unstable as the request's. A feature gated at `beta`
//! is usable from `beta`, `dev`, `canary` and `trunk` builds, but not from
//! `stable`. A feature that declares no channel is treated as `stable` and
//! is usable from everywhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A release channel, ordered from most stable to least stable.
///
/// The derived `Ord` follows declaration order, so comparisons read as
/// "at least as unstable as":
///
/// # Example
///
/// ```
/// use featgate_types::Channel;
///
/// assert!(Channel::Dev >= Channel::Beta);
/// assert!(Channel::Stable < Channel::Trunk);
/// assert_eq!(Channel::default(), Channel::Stable);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// The release build everybody runs.
    #[default]
    Stable,
    /// Pre-release build, one step ahead of stable.
    Beta,
    /// Developer build.
    Dev,
    /// Daily build.
    Canary,
    /// Tip-of-tree build.
    Trunk,
}

/// Error for an unrecognized channel name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The supplied name is not one of the known channels.
    #[error("unknown release channel '{name}'")]
    Unknown {
        /// The name as supplied by the caller, verbatim.
        name: String,
    },
}

impl Channel {
    /// All channels, most stable first.
    pub const ALL: [Channel; 5] = [
        Channel::Stable,
        Channel::Beta,
        Channel::Dev,
        Channel::Canary,
        Channel::Trunk,
    ];

    /// Returns the lowercase channel name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Beta => "beta",
            Self::Dev => "dev",
            Self::Canary => "canary",
            Self::Trunk => "trunk",
        }
    }

    /// Returns `true` if a request from `request` may use a feature gated
    /// at `self`.
    ///
    /// # Example
    ///
    /// ```
    /// use featgate_types::Channel;
    ///
    /// assert!(Channel::Beta.admits(Channel::Dev));
    /// assert!(Channel::Beta.admits(Channel::Beta));
    /// assert!(!Channel::Beta.admits(Channel::Stable));
    /// ```
    #[must_use]
    pub fn admits(self, request: Channel) -> bool {
        request >= self
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ChannelError;

    /// Parses a lowercase channel name.
    ///
    /// Definition files spell channels in lowercase; anything else is a
    /// data-quality error the caller must see verbatim.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "stable" => Ok(Self::Stable),
            "beta" => Ok(Self::Beta),
            "dev" => Ok(Self::Dev),
            "canary" => Ok(Self::Canary),
            "trunk" => Ok(Self::Trunk),
            _ => Err(ChannelError::Unknown {
                name: name.to_string(),
            }),
        }
    }
}
