use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::EllError;

/// Cardinality estimation task whose results the dashboard tracks.
///
/// The serialized form is the wire value used by the statistics endpoint's
/// `taskType` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskType {
    /// Distinct account identifiers (active users).
    #[serde(rename = "DISTINCT_ACCOUNT_ID_COUNT")]
    Account,
    /// Distinct client IP addresses.
    #[serde(rename = "DISTINCT_IP_ADDRESS_COUNT")]
    Ip,
    /// Distinct e-mail domains across account addresses.
    #[serde(rename = "DISTINCT_ACCOUNT_EMAIL_DOMAIN_COUNT")]
    EmailDomain,
}

impl TaskType {
    /// All categories in chart order.
    pub const ALL: [Self; 3] = [Self::Account, Self::Ip, Self::EmailDomain];

    /// Wire identifier sent as the `taskType` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "DISTINCT_ACCOUNT_ID_COUNT",
            Self::Ip => "DISTINCT_IP_ADDRESS_COUNT",
            Self::EmailDomain => "DISTINCT_ACCOUNT_EMAIL_DOMAIN_COUNT",
        }
    }

    /// Position of this category in [`TaskType::ALL`] and in aligned value arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Account => 0,
            Self::Ip => 1,
            Self::EmailDomain => 2,
        }
    }

    /// Human-readable chart title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Account => "Active accounts",
            Self::Ip => "Unique IPs",
            Self::EmailDomain => "Email domains",
        }
    }

    /// Unit suffix used in summary rows.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Account => "users",
            Self::Ip => "ips",
            Self::EmailDomain => "domains",
        }
    }

    /// Short key used for JSON output fields and log fields.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Ip => "ip",
            Self::EmailDomain => "domain",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = EllError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s) || t.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| EllError::InvalidArg(format!("unknown task type: {s}")))
    }
}
