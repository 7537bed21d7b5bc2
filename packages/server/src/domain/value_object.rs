//! 値オブジェクト
//!
//! クライアントから届く文字列は、ここで定義する型に変換された時点で
//! 検証済みであることが保証されます。

use std::fmt;

use super::error::ValueObjectError;

/// Number of digits in a passcode.
pub const PASSCODE_DIGITS: usize = 8;

/// Maximum display name length (characters).
pub const DISPLAY_NAME_MAX_CHARS: usize = 32;

/// Maximum message length after trimming (characters).
pub const MESSAGE_MAX_CHARS: usize = 500;

/// Number of identity characters used in the default host name.
const HOST_NAME_ID_PREFIX: usize = 5;

// ========================================
// ConnectionId
// ========================================

/// Opaque identity the transport assigns to one live connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// Passcode
// ========================================

/// 8-digit room code, always stored without separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Passcode(String);

impl Passcode {
    /// Parse `########` or `####-####` into the canonical 8-digit form.
    pub fn normalize(input: &str) -> Result<Self, ValueObjectError> {
        let bytes = input.as_bytes();
        let digits = match bytes.len() {
            PASSCODE_DIGITS => input.to_string(),
            9 if bytes[4] == b'-' => format!("{}{}", &input[..4], &input[5..]),
            _ => return Err(ValueObjectError::InvalidPasscodeFormat),
        };

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueObjectError::InvalidPasscodeFormat);
        }
        Ok(Self(digits))
    }

    /// Render a number below 10^8 as a zero-padded passcode.
    pub(crate) fn from_number(value: u32) -> Self {
        Self(format!("{:0width$}", value % 100_000_000, width = PASSCODE_DIGITS))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// DisplayName
// ========================================

/// 参加者の表示名（前後の空白を除去済み）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        let allowed = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-');

        if len == 0 || len > DISPLAY_NAME_MAX_CHARS || !allowed {
            return Err(ValueObjectError::InvalidDisplayName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Name given to a room creator who did not choose one: `Host-<first 5 chars of id>`.
    pub fn host_default(connection_id: &ConnectionId) -> Self {
        let prefix: String = connection_id
            .as_str()
            .chars()
            .take(HOST_NAME_ID_PREFIX)
            .collect();
        Self(format!("Host-{prefix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// ========================================
// MessageText
// ========================================

/// Chat message body, trimmed and length-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len == 0 || len > MESSAGE_MAX_CHARS {
            return Err(ValueObjectError::InvalidMessage);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// HTML-entity encoded form; the only representation that leaves the server.
    pub fn escaped(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        for c in self.0.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#x27;"),
                '+' => out.push_str("&#x2B;"),
                '`' => out.push_str("&#x60;"),
                _ => out.push(c),
            }
        }
        out
    }
}

// ========================================
// Timestamp
// ========================================

/// Unix time in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `self` until `now` (negative if `now` is earlier).
    pub fn millis_until(&self, now: Timestamp) -> i64 {
        now.0 - self.0
    }
}
