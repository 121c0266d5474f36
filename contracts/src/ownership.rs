//! Two-step ownership.
//!
//! The owner nominates a successor; ownership only moves once the
//! successor accepts. A nomination can be overwritten or cancelled by the
//! owner until it is accepted.

use odra::prelude::*;
use crate::errors::TokenError;
use crate::events::{OwnershipTransferStarted, OwnershipTransferred};
use crate::types::is_zero_address;

#[odra::module]
pub struct Ownership {
    owner: Var<Address>,
    pending_owner: Var<Option<Address>>,
}

#[odra::module]
impl Ownership {
    pub fn init(&mut self, owner: Address) {
        self.owner.set(owner);
        self.pending_owner.set(None);
        self.env().emit_event(OwnershipTransferred {
            previous_owner: crate::types::zero_address(),
            new_owner: owner,
        });
    }

    pub fn get_owner(&self) -> Address {
        self.owner.get_or_revert_with(TokenError::NotOwner)
    }

    pub fn get_pending_owner(&self) -> Option<Address> {
        self.pending_owner.get().flatten()
    }

    pub fn is_owner(&self, account: Address) -> bool {
        self.owner.get().map_or(false, |owner| owner == account)
    }

    /// Nominate `new_owner`; takes effect on [`Ownership::accept_ownership`]
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        if is_zero_address(&new_owner) {
            self.env().revert(TokenError::ZeroRecipient);
        }
        self.pending_owner.set(Some(new_owner));
        self.env().emit_event(OwnershipTransferStarted {
            previous_owner: self.get_owner(),
            new_owner,
        });
    }

    pub fn accept_ownership(&mut self) {
        let caller = self.env().caller();
        match self.get_pending_owner() {
            Some(pending) if pending == caller => {}
            _ => self.env().revert(TokenError::NotPendingOwner),
        }

        let previous_owner = self.get_owner();
        self.owner.set(caller);
        self.pending_owner.set(None);
        self.env().emit_event(OwnershipTransferred {
            previous_owner,
            new_owner: caller,
        });
    }

    pub fn cancel_ownership_transfer(&mut self) {
        self.require_owner();
        self.pending_owner.set(None);
    }

    /// Revert unless the caller is the current owner
    pub fn require_owner(&self) {
        if !self.is_owner(self.env().caller()) {
            self.env().revert(TokenError::NotOwner);
        }
    }
}
