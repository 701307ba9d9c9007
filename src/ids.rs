use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Strongly typed invocation identifier backed by ULID.
///
/// Every dispatch gets one; forwarded invocations keep the id of the call
/// that started the chain so log lines correlate.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct InvocationId(pub ulid::Ulid);

impl InvocationId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    #[must_use]
    pub fn from_ulid(id: ulid::Ulid) -> Self {
        Self(id)
    }

    /// Parse a caller-supplied id; if absent or invalid, generate a new one.
    #[must_use]
    pub fn parse_or_new(value: Option<&str>) -> Self {
        value
            .and_then(|s| s.parse::<InvocationId>().ok())
            .unwrap_or_default()
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InvocationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvocationId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ulid::Ulid::from_string(s)?;
        Ok(InvocationId(id))
    }
}
