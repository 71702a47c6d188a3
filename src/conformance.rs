//! Contract conformance checks.
//!
//! The trait system proves a backend has every method of a contract. These
//! checks prove the methods mean what the contract documents. They are
//! public so a backend living in another crate can run them from its own
//! tests:
//!
//! ```ignore
//! #[tokio::test]
//! async fn my_store_conforms() {
//!     record_contract::conformance::check_store(MyStore::from_names).await.unwrap();
//! }
//! ```
//!
//! Each check builds fresh backends through a factory that seeds the given
//! names at ids `0..n` (the `from_names` constructors fit directly), and
//! returns [`StoreError::CapabilityViolation`] describing the first
//! deviation it finds.

use std::fmt::Debug;
use std::sync::Arc;

use crate::backend::{Backend, RecordReader, RecordRemover, RecordStore, RecordWriter};
use crate::consumer::Directory;
use crate::contract::{Contract, FailureKind};
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordId};

/// Names every check seeds, at ids 0 through 3.
pub const SEED: [&str; 4] = ["Jane", "John", "Goku", "Vegeta"];

/// Ids never held by a backend seeded with [`SEED`].
const ABSENT: [RecordId; 3] = [RecordId(4), RecordId(17), RecordId(u64::MAX)];

fn violation(backend: &str, what: impl std::fmt::Display) -> StoreError {
    StoreError::CapabilityViolation(format!("backend '{backend}': {what}"))
}

fn expect_eq<T: PartialEq + Debug>(backend: &str, what: &str, got: T, want: T) -> StoreResult<()> {
    if got == want {
        Ok(())
    } else {
        Err(violation(
            backend,
            format!("{what}: expected {want:?}, got {got:?}"),
        ))
    }
}

fn must<T>(backend: &str, what: &str, result: StoreResult<T>) -> StoreResult<T> {
    result.map_err(|err| violation(backend, format!("{what} failed: '{err}'")))
}

fn expect_not_found<T: Debug>(
    backend: &str,
    what: &str,
    result: StoreResult<T>,
) -> StoreResult<()> {
    match result {
        Err(StoreError::NotFound(_)) => Ok(()),
        Ok(value) => Err(violation(
            backend,
            format!("{what}: expected not-found, but the call succeeded with {value:?}"),
        )),
        Err(err) => Err(violation(
            backend,
            format!("{what}: expected not-found, got '{err}'"),
        )),
    }
}

fn expect_claim(backend: &impl Backend, contract: Contract) -> StoreResult<()> {
    if backend.capabilities().supports(contract) {
        Ok(())
    } else {
        Err(violation(
            backend.name(),
            format!("implements '{contract}' but does not claim it"),
        ))
    }
}

fn seed() -> Vec<String> {
    SEED.iter().map(|name| name.to_string()).collect()
}

fn seeded_records() -> Vec<Record> {
    SEED.iter()
        .zip(0u64..)
        .map(|(name, id)| Record::new(id, *name))
        .collect()
}

/// Check the `read` contract.
pub async fn check_reader<B, F>(make: F) -> StoreResult<()>
where
    B: RecordReader,
    F: Fn(Vec<String>) -> B,
{
    let empty = make(Vec::new());
    let name = empty.name().to_string();
    expect_claim(&empty, Contract::Read)?;
    let listed = must(&name, "list()", empty.list().await)?;
    expect_eq(&name, "list() on empty backend", listed, vec![])?;
    let count = must(&name, "count()", empty.count().await)?;
    expect_eq(&name, "count() on empty backend", count, 0)?;

    let backend = make(seed());
    let expected = seeded_records();
    let listed = must(&name, "list()", backend.list().await)?;
    expect_eq(&name, "list()", listed, expected.clone())?;
    let count = must(&name, "count()", backend.count().await)?;
    expect_eq(&name, "count()", count, SEED.len())?;

    for record in &expected {
        let what = format!("get({})", record.id);
        let got = must(&name, &what, backend.get(record.id).await)?;
        expect_eq(&name, &what, got, record.clone())?;
    }
    for id in ABSENT {
        expect_not_found(&name, &format!("get({id})"), backend.get(id).await)?;
    }

    let listed = must(&name, "list()", backend.list().await)?;
    expect_eq(&name, "list() after reads", listed, expected)
}

/// Check the `remove` contract.
pub async fn check_remover<B, F>(make: F) -> StoreResult<()>
where
    B: RecordReader + RecordRemover,
    F: Fn(Vec<String>) -> B,
{
    let backend = make(seed());
    let name = backend.name().to_string();
    expect_claim(&backend, Contract::Remove)?;

    let removed = must(&name, "remove(2)", backend.remove(RecordId(2)).await)?;
    expect_eq(&name, "remove(2)", removed, Record::new(2, "Goku"))?;
    let remaining: Vec<String> = must(&name, "list()", backend.list().await)?
        .into_iter()
        .map(|r| r.name)
        .collect();
    expect_eq(
        &name,
        "list() after remove(2)",
        remaining,
        vec!["Jane".to_string(), "John".to_string(), "Vegeta".to_string()],
    )?;

    expect_not_found(&name, "second remove(2)", backend.remove(RecordId(2)).await)?;
    let count = must(&name, "count()", backend.count().await)?;
    expect_eq(&name, "count() after second remove(2)", count, 3)?;

    let signature = Contract::Remove.descriptor();
    let remove_op = signature.operation("remove");
    for id in ABSENT {
        let before = must(&name, "list()", backend.list().await)?;
        let result = backend.remove(id).await;
        if let Err(err) = &result {
            let declared = remove_op
                .zip(FailureKind::of(err))
                .is_some_and(|(op, kind)| op.declares(kind));
            if !declared {
                return Err(violation(
                    &name,
                    format!("remove({id}) signalled undeclared '{err}'"),
                ));
            }
        }
        expect_not_found(&name, &format!("remove({id})"), result)?;
        let after = must(&name, "list()", backend.list().await)?;
        expect_eq(&name, &format!("list() after remove({id})"), after, before)?;
    }
    Ok(())
}

/// Check the `write` contract.
pub async fn check_writer<B, F>(make: F) -> StoreResult<()>
where
    B: RecordReader + RecordWriter,
    F: Fn(Vec<String>) -> B,
{
    let backend = make(seed());
    let name = backend.name().to_string();
    expect_claim(&backend, Contract::Write)?;

    let first = must(&name, "insert(\"Bulma\")", backend.insert("Bulma").await)?;
    let second = must(&name, "insert(\"Krillin\")", backend.insert("Krillin").await)?;
    if first.0 < SEED.len() as u64 || second <= first {
        return Err(violation(
            &name,
            format!(
                "insert issued ids {first} then {second} after seeding 0..{}",
                SEED.len()
            ),
        ));
    }
    let tail: Vec<Record> = must(&name, "list()", backend.list().await)?
        .into_iter()
        .skip(SEED.len())
        .collect();
    expect_eq(
        &name,
        "list() tail after inserts",
        tail,
        vec![Record::new(first, "Bulma"), Record::new(second, "Krillin")],
    )?;

    let before = must(&name, "count()", backend.count().await)?;
    match backend.insert("").await {
        Err(StoreError::InvalidInput(_)) => {}
        Ok(id) => {
            return Err(violation(&name, format!("insert(\"\") accepted as {id}")));
        }
        Err(err) => {
            return Err(violation(
                &name,
                format!("insert(\"\"): expected invalid-input, got '{err}'"),
            ));
        }
    }
    let after = must(&name, "count()", backend.count().await)?;
    expect_eq(&name, "count() after rejected insert", after, before)
}

/// Check every contract, and the interactions between them.
pub async fn check_store<B, F>(make: F) -> StoreResult<()>
where
    B: RecordStore,
    F: Fn(Vec<String>) -> B,
{
    check_reader(&make).await?;
    check_remover(&make).await?;
    check_writer(&make).await?;

    let backend = make(seed());
    let name = backend.name().to_string();
    let last = RecordId(SEED.len() as u64 - 1);
    must(&name, &format!("remove({last})"), backend.remove(last).await)?;
    let id = must(&name, "insert(\"Gohan\")", backend.insert("Gohan").await)?;
    if id <= last {
        return Err(violation(
            &name,
            format!("insert reused id {id} after remove({last})"),
        ));
    }
    expect_not_found(
        &name,
        &format!("get({last}) after reinsert"),
        backend.get(last).await,
    )
}

/// Outcome of one step, with failures reduced to their declared kind.
type Outcome<T> = Result<T, Option<FailureKind>>;

fn outcome<T>(result: StoreResult<T>) -> Outcome<T> {
    result.map_err(|err| FailureKind::of(&err))
}

/// Check that two backends are interchangeable behind a [`Directory`].
///
/// Both factories are seeded with [`SEED`]; the same script is driven
/// through a consumer over each and every step must agree.
pub async fn check_substitutable<A, B, FA, FB>(make_a: FA, make_b: FB) -> StoreResult<()>
where
    A: RecordReader + RecordRemover + 'static,
    B: RecordReader + RecordRemover + 'static,
    FA: Fn(Vec<String>) -> A,
    FB: Fn(Vec<String>) -> B,
{
    let a = Arc::new(make_a(seed()));
    let b = Arc::new(make_b(seed()));
    let label = format!("{} vs {}", a.name(), b.name());
    let left = Directory::new(a.clone(), a);
    let right = Directory::new(b.clone(), b);

    expect_eq(&label, "list()", outcome(left.list().await), outcome(right.list().await))?;
    for id in [2, 2, 9, 0] {
        let id = RecordId(id);
        expect_eq(
            &label,
            &format!("remove({id})"),
            outcome(left.remove(id).await),
            outcome(right.remove(id).await),
        )?;
        expect_eq(
            &label,
            &format!("contains({id})"),
            outcome(left.contains(id).await),
            outcome(right.contains(id).await),
        )?;
    }
    for raw in ["3", "-1", "three"] {
        expect_eq(
            &label,
            &format!("remove_raw({raw:?})"),
            outcome(left.remove_raw(raw).await),
            outcome(right.remove_raw(raw).await),
        )?;
    }
    expect_eq(
        &label,
        "final list()",
        outcome(left.list().await),
        outcome(right.list().await),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_memory_store_conforms() {
        check_store(MemoryStore::from_names).await.unwrap();
    }

    #[test]
    fn test_violation_message() {
        let err = violation("memory", "remove(2) silently succeeded");
        assert_eq!(
            err.to_string(),
            "Capability violation: backend 'memory': remove(2) silently succeeded"
        );
    }
}
