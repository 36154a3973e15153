//! Cycle aggregate - The root entity for treatment cycles.
//!
//! A Cycle records one run of a treatment protocol for one patient: which
//! protocol, when it started, whether donor conception applies, and whether
//! it is still underway. The milestones generated for a cycle live in
//! [`super::PatientMilestone`] and are persisted separately.

use chrono::NaiveDate;

use crate::domain::foundation::{
    CycleId, CycleStatus, DomainError, ErrorCode, PatientId, Timestamp, TreatmentType,
};

/// The Cycle aggregate root.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    id: CycleId,
    patient_id: PatientId,
    treatment_type: TreatmentType,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    status: CycleStatus,
    donor_conception: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Cycle {
    /// Creates a new active cycle starting on the given date.
    pub fn new(
        patient_id: PatientId,
        treatment_type: TreatmentType,
        start_date: NaiveDate,
        donor_conception: bool,
    ) -> Self {
        Self::with_id(
            CycleId::new(),
            patient_id,
            treatment_type,
            start_date,
            donor_conception,
        )
    }

    /// Creates a new active cycle with a caller-supplied ID.
    ///
    /// Callers that retry creation pass the same ID so the operation stays
    /// idempotent.
    pub fn with_id(
        id: CycleId,
        patient_id: PatientId,
        treatment_type: TreatmentType,
        start_date: NaiveDate,
        donor_conception: bool,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            patient_id,
            treatment_type,
            start_date,
            end_date: None,
            status: CycleStatus::Active,
            donor_conception,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a cycle from persisted data.
    ///
    /// Used by repository implementations to rebuild domain objects from
    /// database records.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: CycleId,
        patient_id: PatientId,
        treatment_type: TreatmentType,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        status: CycleStatus,
        donor_conception: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            patient_id,
            treatment_type,
            start_date,
            end_date,
            status,
            donor_conception,
            created_at,
            updated_at,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    /// Returns the cycle ID.
    pub fn id(&self) -> CycleId {
        self.id
    }

    /// Returns the patient this cycle belongs to.
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    /// Returns the treatment protocol.
    pub fn treatment_type(&self) -> &TreatmentType {
        &self.treatment_type
    }

    /// Returns the first day of the cycle.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the end date, if the cycle is closed.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns the cycle status.
    pub fn status(&self) -> CycleStatus {
        self.status
    }

    /// Returns true if donor conception applies to this cycle.
    pub fn donor_conception(&self) -> bool {
        self.donor_conception
    }

    /// Returns when this cycle was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when this cycle was last updated.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the 1-based cycle day for a calendar date.
    ///
    /// The start date is day 1. Dates before the start yield zero or
    /// negative values, which is how donor preparation work scheduled
    /// ahead of the cycle is expressed.
    pub fn cycle_day_on(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.start_date).num_days() + 1
    }

    // ───────────────────────────────────────────────────────────────
    // State transitions
    // ───────────────────────────────────────────────────────────────

    /// Returns an error if the cycle can no longer be modified.
    pub fn ensure_mutable(&self) -> Result<(), DomainError> {
        if !self.status.is_mutable() {
            return Err(DomainError::new(
                ErrorCode::CycleClosed,
                format!("Cycle {} is {} and cannot be modified", self.id, self.status),
            ));
        }
        Ok(())
    }

    /// Marks the cycle completed, recording its end date.
    pub fn complete(&mut self, end_date: NaiveDate) -> Result<(), DomainError> {
        self.transition_to(CycleStatus::Completed, end_date)
    }

    /// Marks the cycle cancelled, recording its end date.
    pub fn cancel(&mut self, end_date: NaiveDate) -> Result<(), DomainError> {
        self.transition_to(CycleStatus::Cancelled, end_date)
    }

    fn transition_to(&mut self, target: CycleStatus, end_date: NaiveDate) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition cycle from {} to {}", self.status, target),
            )
            .with_detail("cycle_id", self.id.to_string()));
        }
        self.status = target;
        self.end_date = Some(end_date);
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
