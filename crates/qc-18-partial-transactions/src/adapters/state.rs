//! In-memory blockchain state snapshot.
//!
//! Backs [`StateProvider`] with hash maps behind a `parking_lot::RwLock`.
//! Used by tests and by embedders that mirror the state they validate
//! against.

use crate::domain::{Amount, MosaicId, MultisigEntry, PublicKey, StateError};
use crate::ports::StateProvider;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::error;

#[derive(Debug, Default)]
struct StateData {
    balances: HashMap<(PublicKey, MosaicId), Amount>,
    multisig: HashMap<PublicKey, MultisigEntry>,
    namespaces: HashMap<String, PublicKey>,
    unavailable: bool,
}

/// In-memory implementation of [`StateProvider`].
#[derive(Debug, Default)]
pub struct InMemoryStateProvider {
    data: RwLock<StateData>,
}

impl InMemoryStateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method to set a balance.
    pub fn with_balance(self, account: PublicKey, mosaic_id: MosaicId, amount: Amount) -> Self {
        self.set_balance(account, mosaic_id, amount);
        self
    }

    /// Builder-style method to make `account` a multisig account.
    pub fn with_multisig(self, account: PublicKey, entry: MultisigEntry) -> Self {
        self.set_multisig(account, entry);
        self
    }

    /// Builder-style method to register a namespace owner.
    pub fn with_namespace(self, name: &str, owner: PublicKey) -> Self {
        self.data.write().namespaces.insert(name.to_string(), owner);
        self
    }

    pub fn set_balance(&self, account: PublicKey, mosaic_id: MosaicId, amount: Amount) {
        self.data
            .write()
            .balances
            .insert((account, mosaic_id), amount);
    }

    pub fn set_multisig(&self, account: PublicKey, entry: MultisigEntry) {
        self.data.write().multisig.insert(account, entry);
    }

    /// Makes every lookup fail with [`StateError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.data.write().unavailable = unavailable;
    }

    fn check_available(data: &StateData) -> Result<(), StateError> {
        if data.unavailable {
            error!("[qc-18] State snapshot is unavailable");
            return Err(StateError::Unavailable("snapshot marked unavailable".into()));
        }
        Ok(())
    }
}

impl StateProvider for InMemoryStateProvider {
    fn account_balance(
        &self,
        account: &PublicKey,
        mosaic_id: MosaicId,
    ) -> Result<Option<Amount>, StateError> {
        let data = self.data.read();
        Self::check_available(&data)?;
        Ok(data.balances.get(&(*account, mosaic_id)).copied())
    }

    fn multisig_entry(&self, account: &PublicKey) -> Result<Option<MultisigEntry>, StateError> {
        let data = self.data.read();
        Self::check_available(&data)?;
        Ok(data.multisig.get(account).cloned())
    }

    fn namespace_owner(&self, name: &str) -> Result<Option<PublicKey>, StateError> {
        let data = self.data.read();
        Self::check_available(&data)?;
        Ok(data.namespaces.get(name).copied())
    }
}
