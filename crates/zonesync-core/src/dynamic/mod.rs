// # Dynamic descriptor model
//
// Canonical representation of traffic steering: named pools of weighted
// values, and an ordered list of rules mapping geo targets to pools.
//
// ## Pool naming contract
//
// Pools are named `pool-<n>`, numbered in rule order: rule 0 uses
// `pool-0`, rule 1 uses `pool-1`, and so on. The steering engines emit
// descriptors in this shape and validation rejects anything else.
//
// ## Default rule
//
// A rule without geos is the default (fallback) rule. At most one may be
// present and it must come last.

pub mod geo;

pub use geo::{GeoCode, continent_for_country};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Prefix of every pool identifier
pub const POOL_PREFIX: &str = "pool-";

/// Health status override for a pool value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolValueStatus {
    /// Follow the health check result
    #[default]
    Obey,
    /// Always considered healthy
    Up,
    /// Always considered unhealthy
    Down,
}

/// A single value inside a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolValue {
    pub value: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub status: PoolValueStatus,
}

fn default_weight() -> u32 {
    1
}

impl PoolValue {
    /// Value with weight 1 that obeys health checks
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            weight: default_weight(),
            status: PoolValueStatus::Obey,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_status(mut self, status: PoolValueStatus) -> Self {
        self.status = status;
        self
    }
}

/// A named group of values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Pool to use when every value of this one is unhealthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    pub values: Vec<PoolValue>,
}

impl Pool {
    pub fn new(values: Vec<PoolValue>) -> Self {
        Self {
            fallback: None,
            values,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// Maps a set of geo targets (or everything, for the default rule) to a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub pool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geos: Option<Vec<GeoCode>>,
}

impl Rule {
    /// Catch-all rule
    pub fn default_rule(pool: impl Into<String>) -> Self {
        Self {
            pool: pool.into(),
            geos: None,
        }
    }

    /// Rule matching `geos`
    pub fn geo(pool: impl Into<String>, geos: Vec<GeoCode>) -> Self {
        Self {
            pool: pool.into(),
            geos: Some(geos),
        }
    }

    pub fn is_default(&self) -> bool {
        self.geos.is_none()
    }
}

/// Pools plus ordered rules of one dynamic record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicDescriptor {
    pub pools: BTreeMap<String, Pool>,
    pub rules: Vec<Rule>,
}

impl DynamicDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the pool backing rule `index`
    pub fn pool_id_for(index: usize) -> String {
        format!("{}{}", POOL_PREFIX, index)
    }

    /// Insert a pool
    pub fn with_pool(mut self, id: impl Into<String>, pool: Pool) -> Self {
        self.pools.insert(id.into(), pool);
        self
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn is_default_rule(rule: &Rule) -> bool {
        rule.is_default()
    }

    /// The trailing default rule, if any
    pub fn default_rule(&self) -> Option<&Rule> {
        self.rules.last().filter(|rule| rule.is_default())
    }

    pub fn pool(&self, id: &str) -> Option<&Pool> {
        self.pools.get(id)
    }

    /// Every pool value across every pool
    pub fn values(&self) -> impl Iterator<Item = &PoolValue> {
        self.pools.values().flat_map(|pool| pool.values.iter())
    }

    /// Rule `i` must use `pool-i`
    pub fn check_pool_contiguity(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            let expected = Self::pool_id_for(index);
            if rule.pool != expected {
                return Err(Error::validation(format!(
                    "Pool `{}` does not match the expected name `{}`",
                    rule.pool, expected
                )));
            }
        }
        Ok(())
    }

    /// At most one rule without geos, and only in last position
    pub fn check_default_rule_last(&self) -> Result<()> {
        let last = self.rules.len().saturating_sub(1);
        for (index, rule) in self.rules.iter().enumerate() {
            match &rule.geos {
                None if index != last => {
                    return Err(Error::validation(format!(
                        "Rule {} has no geos and is not the last rule",
                        index
                    )));
                }
                Some(geos) if geos.is_empty() => {
                    return Err(Error::validation(format!("Rule {} has an empty geos list", index)));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Rules and fallbacks point at existing pools, every pool is used and
    /// every weight is at least 1
    pub fn check_pool_references(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(Error::validation("Dynamic record has no rules"));
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if !self.pools.contains_key(&rule.pool) {
                return Err(Error::validation(format!(
                    "Rule {} references undefined pool `{}`",
                    index, rule.pool
                )));
            }
        }

        for (id, pool) in &self.pools {
            if pool.values.is_empty() {
                return Err(Error::validation(format!("Pool `{}` has no values", id)));
            }
            if let Some(value) = pool.values.iter().find(|v| v.weight == 0) {
                return Err(Error::validation(format!(
                    "Pool `{}` value `{}` has weight 0, weights start at 1",
                    id, value.value
                )));
            }
            if let Some(fallback) = &pool.fallback
                && !self.pools.contains_key(fallback)
            {
                return Err(Error::validation(format!(
                    "Pool `{}` has undefined fallback `{}`",
                    id, fallback
                )));
            }
            if !self.rules.iter().any(|rule| &rule.pool == id) {
                return Err(Error::validation(format!("Pool `{}` is not used by any rule", id)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(code: &str) -> GeoCode {
        code.parse().unwrap()
    }

    fn sample() -> DynamicDescriptor {
        DynamicDescriptor::new()
            .with_pool("pool-0", Pool::new(vec![PoolValue::new("2.2.2.2")]).with_fallback("pool-1"))
            .with_pool("pool-1", Pool::new(vec![PoolValue::new("5.5.5.5")]))
            .with_rule(Rule::geo("pool-0", vec![geo("EU")]))
            .with_rule(Rule::default_rule("pool-1"))
    }

    #[test]
    fn test_pool_id_for() {
        assert_eq!(DynamicDescriptor::pool_id_for(0), "pool-0");
        assert_eq!(DynamicDescriptor::pool_id_for(12), "pool-12");
    }

    #[test]
    fn test_valid_descriptor_passes_checks() {
        let d = sample();
        assert_eq!(d.rule_count(), 2);
        assert!(d.check_pool_contiguity().is_ok());
        assert!(d.check_default_rule_last().is_ok());
        assert!(d.check_pool_references().is_ok());
        assert!(DynamicDescriptor::is_default_rule(d.default_rule().unwrap()));
    }

    #[test]
    fn test_contiguity_names_offender() {
        let d = DynamicDescriptor::new()
            .with_pool("pool-0", Pool::new(vec![PoolValue::new("1.1.1.1")]))
            .with_pool("eu", Pool::new(vec![PoolValue::new("2.2.2.2")]))
            .with_rule(Rule::geo("pool-0", vec![geo("EU")]))
            .with_rule(Rule::default_rule("eu"));

        let err = d.check_pool_contiguity().unwrap_err().to_string();
        assert!(err.contains("`eu`"));
        assert!(err.contains("`pool-1`"));
    }

    #[test]
    fn test_default_rule_must_be_last() {
        let d = DynamicDescriptor::new()
            .with_pool("pool-0", Pool::new(vec![PoolValue::new("1.1.1.1")]))
            .with_pool("pool-1", Pool::new(vec![PoolValue::new("2.2.2.2")]))
            .with_rule(Rule::default_rule("pool-0"))
            .with_rule(Rule::geo("pool-1", vec![geo("EU")]));

        assert!(d.check_default_rule_last().is_err());
    }

    #[test]
    fn test_undefined_pool_reference() {
        let d = DynamicDescriptor::new()
            .with_pool("pool-0", Pool::new(vec![PoolValue::new("1.1.1.1")]))
            .with_rule(Rule::geo("pool-0", vec![geo("EU")]))
            .with_rule(Rule::default_rule("pool-1"));

        let err = d.check_pool_references().unwrap_err().to_string();
        assert!(err.contains("undefined pool `pool-1`"));
    }

    #[test]
    fn test_unused_pool_rejected() {
        let d = sample().with_pool("pool-7", Pool::new(vec![PoolValue::new("9.9.9.9")]));
        assert!(d.check_pool_references().is_err());
    }

    #[test]
    fn test_zero_weight_rejected() {
        let d = DynamicDescriptor::new()
            .with_pool(
                "pool-0",
                Pool::new(vec![
                    PoolValue::new("1.1.1.1").with_weight(0),
                    PoolValue::new("2.2.2.2").with_weight(3),
                ]),
            )
            .with_rule(Rule::default_rule("pool-0"));

        let err = d.check_pool_references().unwrap_err().to_string();
        assert!(err.contains("`1.1.1.1` has weight 0"));
    }

    #[test]
    fn test_pool_value_defaults_from_json() {
        let value: PoolValue = serde_json::from_str(r#"{"value": "1.2.3.4"}"#).unwrap();
        assert_eq!(value, PoolValue::new("1.2.3.4"));
    }
}
