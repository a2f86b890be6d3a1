use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use thiserror::Error;

use crate::config::AccessRuleConfig;
use crate::engine::ResourceKind;

/// Whether an anonymous caller may see a document.
///
/// A document qualifies when it is marked downloadable and is not attached
/// exclusively to hidden items. A document attached to no item at all is
/// treated as discoverable.
pub fn document_visible_to_public(
    downloadable: bool,
    attached_items: &[i32],
    visible_items: &HashSet<i32>,
) -> bool {
    downloadable
        && (attached_items.is_empty()
            || attached_items.iter().any(|id| visible_items.contains(id)))
}

/// Error raised while building the network access policy. Fatal at startup,
/// never reported per-request.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("access rule for \"{0}\" declares both allow and deny")]
    AmbiguousRule(String),
    #[error("access rule for \"{0}\" declares neither allow nor deny")]
    EmptyRule(String),
    #[error("access rule for \"{key}\" contains an invalid network range \"{range}\"")]
    InvalidRange { key: String, range: String },
    #[error("access rules mention unknown resource kind \"{0}\"")]
    UnknownKind(String),
}

#[derive(Debug, Clone)]
enum RuleSet {
    Allow(Vec<IpNet>),
    Deny(Vec<IpNet>),
}

/// Network-level access rules, keyed by resource kind name or `*`.
///
/// The rule for a specific kind takes precedence over the wildcard; a kind
/// with no applicable rule is open. Matching is a pure predicate over the
/// caller's source address.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: HashMap<String, RuleSet>,
}

impl AccessPolicy {
    pub fn from_config(raw: &HashMap<String, AccessRuleConfig>) -> Result<Self, PolicyError> {
        let mut rules = HashMap::new();

        for (key, rule) in raw {
            if key != "*" && ResourceKind::from_name(key).is_none() {
                return Err(PolicyError::UnknownKind(key.clone()));
            }

            let parsed = match (&rule.allow, &rule.deny) {
                (Some(_), Some(_)) => return Err(PolicyError::AmbiguousRule(key.clone())),
                (None, None) => return Err(PolicyError::EmptyRule(key.clone())),
                (Some(ranges), None) => RuleSet::Allow(parse_ranges(key, ranges)?),
                (None, Some(ranges)) => RuleSet::Deny(parse_ranges(key, ranges)?),
            };
            rules.insert(key.clone(), parsed);
        }

        Ok(Self { rules })
    }

    /// Whether the policy has any rules at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether a request from `addr` may reach the given resource kind.
    pub fn permits(&self, kind: ResourceKind, addr: IpAddr) -> bool {
        let rule = self
            .rules
            .get(kind.as_str())
            .or_else(|| self.rules.get("*"));

        match rule {
            None => true,
            Some(RuleSet::Allow(ranges)) => ranges.iter().any(|net| net.contains(&addr)),
            Some(RuleSet::Deny(ranges)) => !ranges.iter().any(|net| net.contains(&addr)),
        }
    }
}

/// Parse a list of CIDR ranges; a bare address is read as a /32 (or /128).
fn parse_ranges(key: &str, ranges: &[String]) -> Result<Vec<IpNet>, PolicyError> {
    ranges
        .iter()
        .map(|range| {
            IpNet::from_str(range)
                .or_else(|_| IpAddr::from_str(range).map(IpNet::from))
                .map_err(|_| PolicyError::InvalidRange {
                    key: key.to_string(),
                    range: range.clone(),
                })
        })
        .collect()
}
