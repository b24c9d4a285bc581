//! Listener set and probe models.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// PIDs currently listening on a port, ordered for stable output.
pub type ListenerSet = BTreeSet<u32>;

/// Render PIDs as a comma-separated list (`"12, 34"`).
pub fn format_pids(pids: &ListenerSet) -> String {
    pids.iter()
        .map(|pid| pid.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Probe
// ============================================================================

/// Result of asking the OS who listens on a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The query succeeded. The set may be empty.
    Listeners(ListenerSet),
    /// The query itself failed, so the port state is unknown.
    Unknown(String),
}

impl Probe {
    /// PIDs reported by the probe, empty when the state is unknown.
    pub fn pids(&self) -> ListenerSet {
        match self {
            Probe::Listeners(pids) => pids.clone(),
            Probe::Unknown(_) => ListenerSet::new(),
        }
    }
}

// ============================================================================
// ProbePolicy
// ============================================================================

/// How an unanswerable listener query is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProbePolicy {
    /// A failed query counts as "nothing listening".
    #[default]
    FailOpen,
    /// A failed query counts as "still busy" and is retried.
    FailClosed,
}

impl ProbePolicy {
    /// Whether the probe result means the port can be handed to the server.
    pub fn is_free(&self, probe: &Probe) -> bool {
        match probe {
            Probe::Listeners(pids) => pids.is_empty(),
            Probe::Unknown(_) => *self == ProbePolicy::FailOpen,
        }
    }
}

impl fmt::Display for ProbePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbePolicy::FailOpen => f.write_str("fail-open"),
            ProbePolicy::FailClosed => f.write_str("fail-closed"),
        }
    }
}

impl FromStr for ProbePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-open" | "open" => Ok(ProbePolicy::FailOpen),
            "fail-closed" | "closed" => Ok(ProbePolicy::FailClosed),
            other => Err(format!("unknown probe policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pids() {
        let pids: ListenerSet = [42, 7, 1001].into_iter().collect();
        assert_eq!(format_pids(&pids), "7, 42, 1001");
        assert_eq!(format_pids(&ListenerSet::new()), "");
    }

    #[test]
    fn test_fail_open_treats_unknown_as_free() {
        let unknown = Probe::Unknown("lsof: not found".to_string());
        assert!(ProbePolicy::FailOpen.is_free(&unknown));
        assert!(!ProbePolicy::FailClosed.is_free(&unknown));
        assert!(unknown.pids().is_empty());
    }

    #[test]
    fn test_listeners_decide_regardless_of_policy() {
        let busy = Probe::Listeners([99].into_iter().collect());
        let idle = Probe::Listeners(ListenerSet::new());
        for policy in [ProbePolicy::FailOpen, ProbePolicy::FailClosed] {
            assert!(!policy.is_free(&busy));
            assert!(policy.is_free(&idle));
        }
    }

    #[test]
    fn test_probe_policy_parse() {
        assert_eq!("fail-closed".parse::<ProbePolicy>(), Ok(ProbePolicy::FailClosed));
        assert_eq!(" Open ".parse::<ProbePolicy>(), Ok(ProbePolicy::FailOpen));
        assert!("sometimes".parse::<ProbePolicy>().is_err());
    }
}
