//! Well-known platform accounts.
//!
//! User accounts share the user's id; the platform itself holds a handful of
//! fixed internal accounts that the batch builders post against.

use rentora_shared::types::AccountId;
use uuid::Uuid;

/// Account accruing platform commissions.
pub const PLATFORM_FEES: AccountId = AccountId::from_uuid(Uuid::from_u128(0x01));

/// Escrow account holding security deposits between hold and release/capture.
pub const DEPOSIT_ESCROW: AccountId = AccountId::from_uuid(Uuid::from_u128(0x02));

/// Clearing account for settled payouts.
pub const PAYOUT_CLEARING: AccountId = AccountId::from_uuid(Uuid::from_u128(0x03));

/// Returns true if the account is one of the platform's internal accounts.
#[must_use]
pub fn is_platform_account(account_id: AccountId) -> bool {
    account_id == PLATFORM_FEES || account_id == DEPOSIT_ESCROW || account_id == PAYOUT_CLEARING
}
