//! Usage Tracking Contract (v0.1)
//!
//! On-chain ledger of vehicle trips. Each submission gets a sequential id and
//! stays correctable by its submitter. A single transferable owner holds
//! administrative authority, separate from per-record authorship.
//!
//! @license Apache-2.0

#![cfg_attr(not(feature = "std"), no_std, no_main)]

#[ink::contract]
mod usage_tracking {
    use ink::prelude::string::String;
    use ink::prelude::vec::Vec;
    use ink::storage::Mapping;
    use scale::{Decode, Encode};

    pub type RecordId = u64;

    /// Upper bound, in bytes, for `vehicle_id` and `route_id`.
    pub const MAX_IDENTIFIER_LEN: usize = 64;

    /// One reported vehicle trip.
    #[derive(Encode, Decode, Clone, Debug, PartialEq)]
    #[cfg_attr(
        feature = "std",
        derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
    )]
    pub struct UsageRecord {
        pub id: RecordId,

        pub vehicle_id: String,

        pub route_id: String,

        pub start_time: u64,

        /// Always `>= start_time`.
        pub end_time: u64,

        pub distance_covered: u64,

        pub passenger_count: u32,

        /// Submitter (immutable). Only the submitter can update the record.
        pub recorded_by: Address,

        pub recorded_at: u32,

        pub updated_at: u32,

        /// 1 at creation, incremented by every update.
        pub revision: u32,
    }

    /// Revision history entry (immutable, append-only)
    ///
    /// Snapshot of the mutable fields of a record as written by a single
    /// `record_usage` or `update_usage_record` call. Earlier revisions are
    /// never overwritten, so every correction stays auditable.
    #[derive(Encode, Decode, Clone, Debug, PartialEq)]
    #[cfg_attr(
        feature = "std",
        derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
    )]
    pub struct UsageRevision {
        /// Revision number (1-indexed)
        pub revision: u32,

        pub end_time: u64,

        pub distance_covered: u64,

        pub passenger_count: u32,

        /// Block number when this revision was written
        pub updated_at: u32,

        /// Account that wrote this revision
        ///
        /// Always the record's `recorded_by`, since only the submitter may
        /// update.
        pub updated_by: Address,
    }

    /// Error types
    #[derive(Debug, PartialEq, Eq, Clone)]
    #[ink::scale_derive(Encode, Decode, TypeInfo)]
    pub enum Error {
        /// Invalid input (empty identifiers, end before start, etc.)
        InvalidInput,
        /// Record ID not found
        NotFound,
        /// Caller is not the record creator, or not the contract owner
        Unauthorized,
        /// Record counter cannot advance any further
        CounterOverflow,
    }

    pub type Result<T> = core::result::Result<T, Error>;

    // Events

    /// Emitted when a usage record is created
    #[ink(event)]
    pub struct UsageRecorded {
        #[ink(topic)]
        pub id: RecordId,
        #[ink(topic)]
        pub recorded_by: Address,
        pub vehicle_id: String,
        pub route_id: String,
        pub start_time: u64,
        pub end_time: u64,
        pub distance_covered: u64,
        pub passenger_count: u32,
        pub recorded_at: u32,
    }

    /// Emitted when the creator corrects a usage record
    #[ink(event)]
    pub struct UsageRecordUpdated {
        #[ink(topic)]
        pub id: RecordId,
        #[ink(topic)]
        pub updated_by: Address,
        pub end_time: u64,
        pub distance_covered: u64,
        pub passenger_count: u32,
        pub revision: u32,
        pub updated_at: u32,
    }

    #[ink(event)]
    pub struct OwnershipTransferred {
        #[ink(topic)]
        pub previous_owner: Address,
        #[ink(topic)]
        pub new_owner: Address,
    }

    #[ink(storage)]
    pub struct UsageTracking {
        records: Mapping<RecordId, UsageRecord>,

        // Count of records ever created, equal to the last id handed out.
        record_counter: RecordId,

        revisions: Mapping<(RecordId, u32), UsageRevision>,

        owner: Address,
    }

    impl UsageTracking {
        /// Constructor. The instantiating account becomes the owner.
        #[ink(constructor)]
        pub fn new() -> Self {
            Self {
                records: Mapping::new(),
                record_counter: 0,
                revisions: Mapping::new(),
                owner: Self::env().caller(),
            }
        }

        /// Record a vehicle trip.
        ///
        /// * `vehicle_id` - Opaque vehicle identifier (1..=64 bytes)
        /// * `route_id` - Opaque route identifier (1..=64 bytes)
        /// * `start_time` / `end_time` - Trip timestamps, `end_time >= start_time`
        /// * `distance_covered` - Distance travelled
        /// * `passenger_count` - Passengers carried
        ///
        /// # Returns
        ///
        /// ID of the new record. IDs start at 1 and increase by one per call.
        ///
        /// # Errors
        ///
        /// * `InvalidInput` - Empty or oversized identifier, or end before start
        /// * `CounterOverflow` - No ids left to assign
        #[ink(message)]
        pub fn record_usage(
            &mut self,
            vehicle_id: String,
            route_id: String,
            start_time: u64,
            end_time: u64,
            distance_covered: u64,
            passenger_count: u32,
        ) -> Result<RecordId> {
            let caller = self.env().caller();
            let block_number = self.env().block_number();

            Self::check_identifier(&vehicle_id)?;
            Self::check_identifier(&route_id)?;
            if end_time < start_time {
                return Err(Error::InvalidInput);
            }

            let id = self
                .record_counter
                .checked_add(1)
                .ok_or(Error::CounterOverflow)?;

            let record = UsageRecord {
                id,
                vehicle_id: vehicle_id.clone(),
                route_id: route_id.clone(),
                start_time,
                end_time,
                distance_covered,
                passenger_count,
                recorded_by: caller,
                recorded_at: block_number,
                updated_at: block_number,
                revision: 1,
            };

            self.records.insert(id, &record);
            self.record_counter = id;

            let revision = UsageRevision {
                revision: 1,
                end_time,
                distance_covered,
                passenger_count,
                updated_at: block_number,
                updated_by: caller,
            };
            self.revisions.insert((id, 1), &revision);

            self.env().emit_event(UsageRecorded {
                id,
                recorded_by: caller,
                vehicle_id,
                route_id,
                start_time,
                end_time,
                distance_covered,
                passenger_count,
                recorded_at: block_number,
            });

            Ok(id)
        }

        /// Correct a record (creator-only). Increments `revision`.
        ///
        /// NOTE: id, vehicle, route, start time and creator are immutable.
        #[ink(message)]
        pub fn update_usage_record(
            &mut self,
            id: RecordId,
            end_time: u64,
            distance_covered: u64,
            passenger_count: u32,
        ) -> Result<()> {
            let caller = self.env().caller();
            let mut record = self.records.get(id).ok_or(Error::NotFound)?;

            if record.recorded_by != caller {
                return Err(Error::Unauthorized);
            }

            if end_time < record.start_time {
                return Err(Error::InvalidInput);
            }

            let new_revision = record
                .revision
                .checked_add(1)
                .ok_or(Error::CounterOverflow)?;
            let block_number = self.env().block_number();

            record.end_time = end_time;
            record.distance_covered = distance_covered;
            record.passenger_count = passenger_count;
            record.revision = new_revision;
            record.updated_at = block_number;

            self.records.insert(id, &record);

            let entry = UsageRevision {
                revision: new_revision,
                end_time,
                distance_covered,
                passenger_count,
                updated_at: block_number,
                updated_by: caller,
            };
            self.revisions.insert((id, new_revision), &entry);

            self.env().emit_event(UsageRecordUpdated {
                id,
                updated_by: caller,
                end_time,
                distance_covered,
                passenger_count,
                revision: new_revision,
                updated_at: block_number,
            });

            Ok(())
        }

        /// Whether `principal` created record `id`.
        ///
        /// Unknown ids yield `false` rather than an error, so callers can
        /// pre-check before attempting `update_usage_record`.
        #[ink(message)]
        pub fn is_record_creator(&self, id: RecordId, principal: Address) -> bool {
            self.records
                .get(id)
                .is_some_and(|record| record.recorded_by == principal)
        }

        /// Get the current state of a record.
        #[ink(message)]
        pub fn get_usage_record(&self, id: RecordId) -> Option<UsageRecord> {
            self.records.get(id)
        }

        /// Number of records created so far (also the last id assigned).
        #[ink(message)]
        pub fn get_record_counter(&self) -> RecordId {
            self.record_counter
        }

        // Administration.

        /// Get the current administrative owner.
        #[ink(message)]
        pub fn owner(&self) -> Address {
            self.owner
        }

        /// Hand administrative control to `new_owner` (owner-only).
        ///
        /// Existing records keep their creators; only owner-gated operations
        /// move to the new account.
        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<()> {
            let caller = self.env().caller();
            self.ensure_owner(caller)?;

            let previous_owner = self.owner;
            self.owner = new_owner;

            self.env().emit_event(OwnershipTransferred {
                previous_owner,
                new_owner,
            });

            Ok(())
        }

        // Query messages

        /// Get a specific revision of a record
        ///
        /// # Arguments
        ///
        /// * `id` - Record ID
        /// * `revision` - Revision number (1-indexed)
        ///
        /// # Example
        ///
        /// ```ignore
        /// let original = contract.get_revision(id, 1);  // As first submitted
        /// ```
        #[ink(message)]
        pub fn get_revision(&self, id: RecordId, revision: u32) -> Option<UsageRevision> {
            self.revisions.get((id, revision))
        }

        /// Get all revisions of a record in ascending order (r1, r2, r3, ...).
        ///
        /// Empty if the record doesn't exist.
        #[ink(message)]
        pub fn get_revision_history(&self, id: RecordId) -> Vec<UsageRevision> {
            let record = match self.records.get(id) {
                Some(r) => r,
                None => return Vec::new(),
            };

            (1..=record.revision)
                .filter_map(|r| self.revisions.get((id, r)))
                .collect()
        }

        /// Get the latest N revisions of a record
        ///
        /// Bounded counterpart of `get_revision_history` for records with many
        /// corrections.
        ///
        /// # Arguments
        ///
        /// * `id` - Record ID
        /// * `limit` - Maximum number of revisions to return
        ///
        /// # Returns
        ///
        /// Most recent revisions, newest first. Empty for an unknown record or
        /// a zero `limit`.
        #[ink(message)]
        pub fn get_recent_revisions(&self, id: RecordId, limit: u32) -> Vec<UsageRevision> {
            let record = match self.records.get(id) {
                Some(r) => r,
                None => return Vec::new(),
            };

            let current = record.revision;
            let oldest = current.saturating_sub(limit).saturating_add(1);

            (oldest..=current)
                .rev()
                .filter_map(|r| self.revisions.get((id, r)))
                .collect()
        }

        // Internal helpers

        fn ensure_owner(&self, caller: Address) -> Result<()> {
            if caller != self.owner {
                return Err(Error::Unauthorized);
            }
            Ok(())
        }

        fn check_identifier(value: &str) -> Result<()> {
            if value.is_empty() || value.len() > MAX_IDENTIFIER_LEN {
                return Err(Error::InvalidInput);
            }
            Ok(())
        }
    }

    // Unit tests

}
