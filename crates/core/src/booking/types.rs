//! Booking domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use rentora_shared::types::{AccountId, BookingId, Currency, ListingId};

/// Booking status in the rental lifecycle.
///
/// Valid transitions:
/// - PendingOwnerApproval → PendingPayment (owner approves)
/// - PendingOwnerApproval → Rejected (owner rejects)
/// - PendingPayment → Confirmed (payment succeeds)
/// - PendingPayment | Confirmed → Cancelled (renter or owner cancels)
/// - Confirmed → InProgress (owner hands over the item)
/// - InProgress → PendingReturnInspection (renter requests return)
/// - PendingReturnInspection → Completed (owner approves return)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Waiting for the listing owner to approve the request.
    PendingOwnerApproval,
    /// Approved (or instant-book); waiting for the renter's payment.
    PendingPayment,
    /// Paid and confirmed; rental has not physically started.
    Confirmed,
    /// Rental is physically underway.
    InProgress,
    /// Renter returned the item; waiting for owner inspection.
    PendingReturnInspection,
    /// Rental finished and settled (terminal).
    Completed,
    /// Owner declined the request (terminal).
    Rejected,
    /// Cancelled before the rental started (terminal).
    Cancelled,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingOwnerApproval => "pending_owner_approval",
            Self::PendingPayment => "pending_payment",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::PendingReturnInspection => "pending_return_inspection",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending_owner_approval" => Some(Self::PendingOwnerApproval),
            "pending_payment" => Some(Self::PendingPayment),
            "confirmed" => Some(Self::Confirmed),
            "in_progress" => Some(Self::InProgress),
            "pending_return_inspection" => Some(Self::PendingReturnInspection),
            "completed" => Some(Self::Completed),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the status is terminal (no further transitions).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }

    /// Returns true if a booking in this status occupies the listing's
    /// calendar.
    ///
    /// Terminal and not-yet-approved bookings never block availability.
    #[must_use]
    pub fn blocks_calendar(&self) -> bool {
        matches!(
            self,
            Self::PendingPayment | Self::Confirmed | Self::InProgress | Self::PendingReturnInspection
        )
    }

    /// Returns true while monetary fields may still be amended.
    ///
    /// Once the status leaves a pending state, monetary fields are frozen.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingOwnerApproval | Self::PendingPayment)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listing facts supplied by the external listing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingInfo {
    /// The listing ID.
    pub id: ListingId,
    /// The owner's account.
    pub owner_id: AccountId,
    /// Whether the listing currently accepts bookings.
    pub is_active: bool,
    /// Instant-book listings skip owner approval and go straight to payment.
    pub instant_book: bool,
}

/// Input for creating a new booking.
///
/// Monetary fields are computed by the caller's pricing flow and become
/// immutable once the booking leaves its pending state.
#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    /// The listing to book.
    pub listing_id: ListingId,
    /// The renter requesting the booking.
    pub renter_id: AccountId,
    /// Requested start date (inclusive).
    pub start_date: NaiveDate,
    /// Requested end date (exclusive, half-open).
    pub end_date: NaiveDate,
    /// Number of guests.
    pub guest_count: u32,
    /// Rental price before fees.
    pub base_price: Decimal,
    /// Platform commission.
    pub platform_fee: Decimal,
    /// Service fee charged to the renter.
    pub service_fee: Decimal,
    /// Security deposit (tracked separately, not part of the total).
    pub deposit_amount: Decimal,
    /// Currency for all monetary fields.
    pub currency: Currency,
}

/// A booking of a listing for a date range.
///
/// Bookings are created by the state machine, mutated only through
/// state-machine transitions, and never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier.
    pub id: BookingId,
    /// The listing being rented.
    pub listing_id: ListingId,
    /// The renter's account.
    pub renter_id: AccountId,
    /// Requested start date (inclusive).
    pub start_date: NaiveDate,
    /// Requested end date (exclusive, half-open).
    pub end_date: NaiveDate,
    /// When the rental physically began (set on start).
    pub actual_start_date: Option<DateTime<Utc>>,
    /// When the rental physically ended (set on return approval).
    pub actual_end_date: Option<DateTime<Utc>>,
    /// Rental price before fees.
    pub base_price: Decimal,
    /// Platform commission.
    pub platform_fee: Decimal,
    /// Service fee charged to the renter.
    pub service_fee: Decimal,
    /// Security deposit (not included in `total_amount`).
    pub deposit_amount: Decimal,
    /// `base_price + platform_fee + service_fee`.
    pub total_amount: Decimal,
    /// Currency for all monetary fields.
    pub currency: Currency,
    /// Number of guests.
    pub guest_count: u32,
    /// Current lifecycle status.
    pub status: BookingStatus,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns true once the rental has physically started.
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.actual_start_date.is_some()
    }

    /// Returns the owner's share of the total (total minus platform fee).
    #[must_use]
    pub fn owner_share(&self) -> Decimal {
        self.total_amount - self.platform_fee
    }

    /// Returns true if the booking can still be cancelled.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        matches!(
            self.status,
            BookingStatus::PendingPayment | BookingStatus::Confirmed
        ) && !self.has_started()
    }
}
