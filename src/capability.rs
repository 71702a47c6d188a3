//! Backend capability introspection.
//!
//! A backend describes itself with [`Capabilities`]: its name, the contracts
//! it claims to implement, and a few facts about its medium. The composition
//! root compares these claims with the contracts it wires a backend as, so a
//! backend whose claims and implementations disagree is caught before any
//! consumer is built.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::error::{StoreError, StoreResult};

/// Capabilities of a record backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Contracts this backend claims to implement.
    pub contracts: BTreeSet<Contract>,
    /// Additional features supported by this backend.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities claiming an explicit set of contracts.
    pub fn new(name: impl Into<String>, contracts: impl IntoIterator<Item = Contract>) -> Self {
        Self {
            name: name.into(),
            contracts: contracts.into_iter().collect(),
            features: vec![],
        }
    }

    /// Create capabilities for a backend that can only be read.
    pub fn read_only(name: impl Into<String>) -> Self {
        Self::new(name, [Contract::Read])
    }

    /// Create capabilities for a backend implementing every contract.
    pub fn full(name: impl Into<String>) -> Self {
        Self::new(name, Contract::ALL)
    }

    /// Add a feature tag.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Check if a contract is claimed.
    pub fn supports(&self, contract: Contract) -> bool {
        self.contracts.contains(&contract)
    }

    /// Contracts from `required` that are not claimed.
    pub fn missing(&self, required: &[Contract]) -> Vec<Contract> {
        required
            .iter()
            .copied()
            .filter(|c| !self.supports(*c))
            .collect()
    }

    /// Fail with [`StoreError::CapabilityViolation`] unless `contract` is claimed.
    pub fn ensure(&self, contract: Contract) -> StoreResult<()> {
        if self.supports(contract) {
            Ok(())
        } else {
            Err(StoreError::CapabilityViolation(format!(
                "backend '{}' does not claim the '{}' contract",
                self.name, contract
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_read_only() {
        let caps = Capabilities::read_only("fixed");
        assert!(caps.supports(Contract::Read));
        assert!(!caps.supports(Contract::Remove));
        assert_eq!(
            caps.missing(&[Contract::Read, Contract::Remove, Contract::Write]),
            vec![Contract::Remove, Contract::Write]
        );
    }

    #[test]
    fn test_capabilities_full() {
        let caps = Capabilities::full("memory").with_feature("ordered");
        assert!(Contract::ALL.iter().all(|c| caps.supports(*c)));
        assert!(caps.missing(&Contract::ALL).is_empty());
        assert_eq!(caps.features, vec!["ordered".to_string()]);
    }

    #[test]
    fn test_ensure_reports_violation() {
        let caps = Capabilities::read_only("fixed");
        assert!(caps.ensure(Contract::Read).is_ok());
        let err = caps.ensure(Contract::Remove).unwrap_err();
        assert!(matches!(err, StoreError::CapabilityViolation(_)));
        assert_eq!(
            err.to_string(),
            "Capability violation: backend 'fixed' does not claim the 'remove' contract"
        );
    }

    #[test]
    fn test_capabilities_serialize_contract_names() {
        let json = serde_json::to_value(Capabilities::read_only("fixed")).unwrap();
        assert_eq!(json["contracts"], serde_json::json!(["read"]));
        assert!(json.get("features").is_none());
    }
}
