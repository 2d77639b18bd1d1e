//! # Partial Pool Flows
//!
//! The entry store behind the change-notifying batch guard:
//!
//! 1. Inserted partials are announced in one add batch per modifier
//! 2. Pruned partials come back to the caller and are announced as removed
//! 3. Every modifier lifetime ends in exactly one flush, even when idle
//! 4. Readers never observe half of a batch

use super::support::{init_tracing, partial_for, random_key, Pool};
use qc_18_partial_transactions::{
    BatchSummary, EnrichedTransactionInfo, PtCacheModifier, PtCacheView, PtChangeEvent,
    TransactionEntry, ZERO_HASH,
};
use std::collections::HashSet;

fn insert_all(pool: &Pool, entries: &[TransactionEntry]) {
    let mut modifier = pool.cache.modifier();
    for entry in entries {
        assert!(modifier.insert(entry.clone()));
    }
    modifier.commit();
}

#[test]
fn test_prune_everything_by_predicate() {
    init_tracing();
    let pool = Pool::new();
    let entries: Vec<TransactionEntry> = (0..5)
        .map(|i| partial_for(random_key(), 10_000 + i))
        .collect();
    insert_all(&pool, &entries);
    pool.recorder.clear();

    let pruned = {
        let mut modifier = pool.cache.modifier();
        modifier.prune_by_predicate(&mut |_| true)
    };

    assert_eq!(pruned.len(), 5);
    let expected: HashSet<_> = entries.iter().map(|e| e.hash).collect();
    let actual: HashSet<_> = pruned.iter().map(|e| e.hash).collect();
    assert_eq!(actual, expected);
    assert_eq!(pool.recorder.flushes(), vec![BatchSummary::new(0, 0, 5)]);
    assert!(pool.cache.view().is_empty());
}

#[test]
fn test_removed_infos_carry_zero_merkle_hash() {
    init_tracing();
    let pool = Pool::new();
    let entries: Vec<TransactionEntry> = (0..3)
        .map(|i| partial_for(random_key(), 10_000 + i))
        .collect();
    insert_all(&pool, &entries);

    pool.cache.modifier().prune_by_time(20_000);

    let events = pool.recorder.events();
    let infos: Vec<&EnrichedTransactionInfo> = events
        .iter()
        .flat_map(|event| match event {
            PtChangeEvent::AddPartials(infos) | PtChangeEvent::RemovePartials(infos) => {
                infos.iter().collect()
            }
            _ => Vec::new(),
        })
        .collect();
    assert_eq!(infos.len(), 6);
    assert!(infos.iter().all(|info| info.merkle_component_hash == ZERO_HASH));
}

#[test]
fn test_unknown_cosignature_on_empty_pool() {
    init_tracing();
    let pool = Pool::new();

    let parent = {
        let mut modifier = pool.cache.modifier();
        modifier.attach_cosignature(&[0x42; 32], &random_key(), &[0x11; 64])
    };

    assert!(parent.is_none());
    assert_eq!(
        pool.recorder.events(),
        vec![
            PtChangeEvent::AddPartials(vec![]),
            PtChangeEvent::RemovePartials(vec![]),
            PtChangeEvent::Flush(BatchSummary::default()),
        ]
    );
}

#[test]
fn test_idle_prunes_still_flush() {
    init_tracing();
    let pool = Pool::new();

    assert!(pool.cache.modifier().prune_by_time(u64::MAX).is_empty());
    assert!(pool.cache.modifier().prune_by_predicate(&mut |_| true).is_empty());

    assert_eq!(
        pool.recorder.flushes(),
        vec![BatchSummary::default(), BatchSummary::default()]
    );
}

#[test]
fn test_mixed_batch_notification_order() {
    init_tracing();
    let pool = Pool::new();
    let cosigner = random_key();
    let stale = partial_for(random_key(), 2_000);
    let parent = partial_for(cosigner, 10_000);
    insert_all(&pool, &[stale.clone()]);
    pool.recorder.clear();

    let summary = {
        let mut modifier = pool.cache.modifier();
        assert!(modifier.insert(parent.clone()));
        assert!(modifier
            .attach_cosignature(&parent.hash, &cosigner, &[0x22; 64])
            .is_some());
        assert_eq!(modifier.prune_by_time(5_000), vec![stale.clone()]);
        modifier.commit()
    };

    assert_eq!(summary, BatchSummary::new(1, 1, 1));
    let kinds: Vec<&str> = pool
        .recorder
        .events()
        .iter()
        .map(|event| match event {
            PtChangeEvent::AddPartials(_) => "add",
            PtChangeEvent::AddCosignature(_, _) => "cosignature",
            PtChangeEvent::RemovePartials(_) => "remove",
            PtChangeEvent::Flush(_) => "flush",
        })
        .collect();
    assert_eq!(kinds, vec!["add", "cosignature", "remove", "flush"]);
}

#[test]
fn test_readers_never_see_partial_batches() {
    init_tracing();
    let pool = Pool::new();
    let entries: Vec<TransactionEntry> = (0..20)
        .map(|i| partial_for(random_key(), 10_000 + i))
        .collect();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..200 {
                    let len = pool.cache.view().len();
                    assert!(len == 0 || len == 20, "observed {len} entries");
                }
            });
        }

        scope.spawn(|| insert_all(&pool, &entries));
    });

    assert_eq!(pool.cache.view().len(), 20);
    assert_eq!(pool.recorder.flushes(), vec![BatchSummary::new(20, 0, 0)]);
}
