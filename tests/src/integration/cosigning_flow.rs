//! # Cosigning Flow
//!
//! Drives a partial transaction through its lifecycle the way admission
//! logic would:
//!
//! ```text
//! validate_partial ──→ insert ──→ validate_cosigners (Missing)
//!                                    │
//!                         attach_cosignature
//!                                    │
//!                         validate_cosigners ──→ Success → remove
//!                                            └─→ Ineligible → remove
//! ```

use super::support::{init_tracing, partial, partial_for, random_key, transfer, validator, Pool, NOW};
use qc_18_partial_transactions::{
    BatchSummary, CosignerCheckResult, Failure, InMemoryStateProvider, MultisigEntry,
    PtCacheModifier, PtCacheView, PtValidator, TransactionEntry, ValidationResult,
};
use std::sync::Arc;

fn admit(pool: &Pool, validator: &dyn PtValidator, entry: &TransactionEntry) -> bool {
    if !validator.validate_partial(entry).normalized {
        return false;
    }
    pool.cache.modifier().insert(entry.clone())
}

fn check(pool: &Pool, validator: &dyn PtValidator, entry: &TransactionEntry) -> CosignerCheckResult {
    let info = pool
        .cache
        .view()
        .find(&entry.hash)
        .expect("entry is stored");
    validator.validate_cosigners(&info).normalized
}

#[test]
fn test_partial_completes_after_cosignature() {
    init_tracing();
    let pool = Pool::new();
    let validator = validator(Arc::new(InMemoryStateProvider::new()));
    let cosigner = random_key();
    let entry = partial_for(cosigner, NOW + 5_000);

    assert!(admit(&pool, &validator, &entry));
    assert_eq!(check(&pool, &validator, &entry), CosignerCheckResult::Missing);

    let parent = pool
        .cache
        .modifier()
        .attach_cosignature(&entry.hash, &cosigner, &[0x33; 64]);
    assert_eq!(parent, Some(entry.clone()));
    assert_eq!(check(&pool, &validator, &entry), CosignerCheckResult::Success);

    assert_eq!(pool.cache.modifier().remove(&entry.hash), Some(entry));
    assert_eq!(
        pool.recorder.flushes(),
        vec![
            BatchSummary::new(1, 0, 0),
            BatchSummary::new(0, 1, 0),
            BatchSummary::new(0, 0, 1),
        ]
    );
}

#[test]
fn test_ineligible_cosigner_is_reported() {
    init_tracing();
    let pool = Pool::new();
    let validator = validator(Arc::new(InMemoryStateProvider::new()));
    let entry = partial_for(random_key(), NOW + 5_000);
    assert!(admit(&pool, &validator, &entry));

    pool.cache
        .modifier()
        .attach_cosignature(&entry.hash, &random_key(), &[0x44; 64]);

    assert_eq!(check(&pool, &validator, &entry), CosignerCheckResult::Ineligible);
}

#[test]
fn test_multisig_cosignatories_complete_the_partial() {
    init_tracing();
    let multisig = random_key();
    let (first, second, third) = (random_key(), random_key(), random_key());
    let state = Arc::new(
        InMemoryStateProvider::new()
            .with_multisig(multisig, MultisigEntry::new(2, vec![first, second, third])),
    );
    let pool = Pool::new();
    let validator = validator(state);
    let entry = partial_for(multisig, NOW + 5_000);
    assert!(admit(&pool, &validator, &entry));

    pool.cache
        .modifier()
        .attach_cosignature(&entry.hash, &first, &[0x01; 64]);
    assert_eq!(check(&pool, &validator, &entry), CosignerCheckResult::Missing);

    pool.cache
        .modifier()
        .attach_cosignature(&entry.hash, &third, &[0x03; 64]);
    assert_eq!(check(&pool, &validator, &entry), CosignerCheckResult::Success);
}

#[test]
fn test_repeated_cosigner_is_rejected() {
    init_tracing();
    let pool = Pool::new();
    let validator = validator(Arc::new(InMemoryStateProvider::new()));
    let cosigner = random_key();
    let entry = partial_for(cosigner, NOW + 5_000);
    assert!(admit(&pool, &validator, &entry));

    let mut modifier = pool.cache.modifier();
    assert!(modifier
        .attach_cosignature(&entry.hash, &cosigner, &[0x01; 64])
        .is_some());
    assert!(modifier
        .attach_cosignature(&entry.hash, &cosigner, &[0x02; 64])
        .is_none());
    assert_eq!(modifier.commit(), BatchSummary::new(0, 1, 0));
}

#[test]
fn test_invalid_partials_are_not_admitted() {
    init_tracing();
    let pool = Pool::new();
    let validator = validator(Arc::new(InMemoryStateProvider::new()));

    let expired = partial_for(random_key(), NOW - 1);
    let zero_amount = partial(random_key(), NOW + 5_000, vec![transfer(random_key(), 0)]);

    assert_eq!(
        validator.validate_partial(&expired).raw,
        ValidationResult::Failure(Failure::CorePastDeadline)
    );
    assert!(!admit(&pool, &validator, &expired));
    assert!(!admit(&pool, &validator, &zero_amount));
    assert!(pool.cache.view().is_empty());
}

#[test]
fn test_expired_partials_are_pruned() {
    init_tracing();
    let pool = Pool::new();
    let validator = validator(Arc::new(InMemoryStateProvider::new()));
    let early = partial_for(random_key(), NOW + 1_000);
    let late = partial_for(random_key(), NOW + 9_000);
    assert!(admit(&pool, &validator, &early));
    assert!(admit(&pool, &validator, &late));

    let pruned = pool.cache.modifier().prune_by_time(NOW + 1_000);

    assert_eq!(pruned, vec![early]);
    assert!(pool.cache.view().contains(&late.hash));
}

#[test]
fn test_batch_admission_in_parallel() {
    init_tracing();
    let validator = validator(Arc::new(InMemoryStateProvider::new()));
    let entries: Vec<TransactionEntry> = (0..32u64)
        .map(|i| partial(random_key(), NOW + 5_000, vec![transfer(random_key(), i % 3)]))
        .collect();

    let outcomes = validator.validate_partials(&entries);

    let admitted: Vec<bool> = outcomes.iter().map(|outcome| outcome.normalized).collect();
    let expected: Vec<bool> = (0..32u64).map(|i| i % 3 != 0).collect();
    assert_eq!(admitted, expected);
}
