//! Capability contract descriptors.
//!
//! Every contract is a trait in [`crate::backend`]. This module carries the
//! same contracts as data, so a composition root can reason about them at
//! runtime and conformance checks can tell a declared failure from an
//! undeclared one.
//!
//! | Contract | Trait | Operations |
//! |----------|-------|------------|
//! | `read` | [`RecordReader`](crate::RecordReader) | `list`, `get`*, `count`* |
//! | `remove` | [`RecordRemover`](crate::RecordRemover) | `remove` |
//! | `write` | [`RecordWriter`](crate::RecordWriter) | `insert` |
//!
//! `*` provided by the trait in terms of `list`.
//!
//! A published descriptor never changes. Adding an operation to a contract
//! breaks every implementer, so new operations go into a new contract.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Name of a capability contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contract {
    /// Enumerate and look up records.
    Read,
    /// Remove records by id.
    Remove,
    /// Insert new records.
    Write,
}

impl Contract {
    /// All contracts, in declaration order.
    pub const ALL: [Contract; 3] = [Contract::Read, Contract::Remove, Contract::Write];

    /// Get the contract name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Contract::Read => "read",
            Contract::Remove => "remove",
            Contract::Write => "write",
        }
    }

    /// Describe the operations of this contract.
    pub fn descriptor(self) -> ContractDescriptor {
        use FailureKind::{InvalidInput, NotFound, Timeout, Unavailable};

        let id_param = Parameter {
            name: "id",
            ty: "RecordId",
            constraint: Some("non-negative integer"),
        };

        let operations = match self {
            Contract::Read => vec![
                OperationSignature {
                    name: "list",
                    params: vec![],
                    returns: "Vec<Record>",
                    failures: vec![Unavailable, Timeout],
                    provided: false,
                },
                OperationSignature {
                    name: "get",
                    params: vec![id_param],
                    returns: "Record",
                    failures: vec![NotFound, Unavailable, Timeout],
                    provided: true,
                },
                OperationSignature {
                    name: "count",
                    params: vec![],
                    returns: "usize",
                    failures: vec![Unavailable, Timeout],
                    provided: true,
                },
            ],
            Contract::Remove => vec![OperationSignature {
                name: "remove",
                params: vec![id_param],
                returns: "Record",
                failures: vec![NotFound, Unavailable, Timeout],
                provided: false,
            }],
            Contract::Write => vec![OperationSignature {
                name: "insert",
                params: vec![Parameter {
                    name: "name",
                    ty: "&str",
                    constraint: Some("non-empty"),
                }],
                returns: "RecordId",
                failures: vec![InvalidInput, Unavailable, Timeout],
                provided: false,
            }],
        };

        ContractDescriptor {
            contract: self,
            trait_name: match self {
                Contract::Read => "RecordReader",
                Contract::Remove => "RecordRemover",
                Contract::Write => "RecordWriter",
            },
            operations,
        }
    }
}

impl std::fmt::Display for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Contract {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Contract::Read),
            "remove" => Ok(Contract::Remove),
            "write" => Ok(Contract::Write),
            _ => Err(StoreError::InvalidInput(format!("unknown contract: {s}"))),
        }
    }
}

/// Failure conditions an operation may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The target record does not exist.
    NotFound,
    /// A parameter violates its constraint.
    InvalidInput,
    /// The medium could not be reached.
    Unavailable,
    /// The operation exceeded its deadline.
    Timeout,
}

impl FailureKind {
    /// Classify an error as a declarable failure.
    ///
    /// Returns `None` for errors no contract declares (wiring and generic
    /// backend errors).
    pub fn of(err: &StoreError) -> Option<Self> {
        match err {
            StoreError::NotFound(_) => Some(Self::NotFound),
            StoreError::InvalidInput(_) => Some(Self::InvalidInput),
            StoreError::Unavailable(_) => Some(Self::Unavailable),
            StoreError::Timeout(_) => Some(Self::Timeout),
            _ => None,
        }
    }
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: &'static str,
    /// Rust type of the parameter.
    #[serde(rename = "type")]
    pub ty: &'static str,
    /// Declared constraint on accepted values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<&'static str>,
}

/// Signature of one contract operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSignature {
    /// Operation (method) name.
    pub name: &'static str,
    /// Ordered parameters, excluding the receiver.
    pub params: Vec<Parameter>,
    /// Success type.
    pub returns: &'static str,
    /// Failure conditions the operation may signal.
    pub failures: Vec<FailureKind>,
    /// Whether the trait provides a default implementation.
    pub provided: bool,
}

impl OperationSignature {
    /// Check if this operation declares a failure kind.
    pub fn declares(&self, kind: FailureKind) -> bool {
        self.failures.contains(&kind)
    }
}

/// The published operation set of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractDescriptor {
    /// Contract name.
    pub contract: Contract,
    /// Name of the trait that carries the contract.
    pub trait_name: &'static str,
    /// Operations in declaration order.
    pub operations: Vec<OperationSignature>,
}

impl ContractDescriptor {
    /// Look up an operation by name.
    pub fn operation(&self, name: &str) -> Option<&OperationSignature> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Operations an implementer must write itself.
    pub fn required(&self) -> impl Iterator<Item = &OperationSignature> {
        self.operations.iter().filter(|op| !op.provided)
    }
}
