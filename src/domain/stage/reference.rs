//! Stage reference rows - the lookup table behind stage detection.
//!
//! Each row maps a span of the treatment timeline onto a patient-facing
//! stage. Rows are keyed two ways: by the canonical milestone kind that
//! starts (or ends) the stage, and by the expected day range. Ambiguities
//! are resolved at build time, so lookups are deterministic.

use std::collections::HashMap;

use crate::domain::foundation::{MilestoneKind, TreatmentType, ValidationError};

/// One row of the stage reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReferenceRow {
    stage_id: String,
    treatment_type: TreatmentType,
    stage_name: String,
    start_milestone: MilestoneKind,
    end_milestone: Option<MilestoneKind>,
    expected_day_start: i32,
    expected_day_end: i32,
    ui_priority: u32,
    details: String,
}

impl StageReferenceRow {
    /// Creates a reference row, validating the expected day range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        stage_id: impl Into<String>,
        treatment_type: TreatmentType,
        stage_name: impl Into<String>,
        start_milestone: MilestoneKind,
        end_milestone: Option<MilestoneKind>,
        expected_day_start: i32,
        expected_day_end: i32,
        ui_priority: u32,
        details: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if expected_day_end < expected_day_start {
            return Err(ValidationError::out_of_range(
                "expected_day_end",
                expected_day_start,
                i32::MAX,
                expected_day_end,
            ));
        }
        Ok(Self {
            stage_id: stage_id.into(),
            treatment_type,
            stage_name: stage_name.into(),
            start_milestone,
            end_milestone,
            expected_day_start,
            expected_day_end,
            ui_priority,
            details: details.into(),
        })
    }

    /// Returns the stable row identifier.
    pub fn stage_id(&self) -> &str {
        &self.stage_id
    }

    /// Returns the treatment protocol this row belongs to.
    pub fn treatment_type(&self) -> &TreatmentType {
        &self.treatment_type
    }

    /// Returns the patient-facing stage name.
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Returns the milestone kind that opens this stage.
    pub fn start_milestone(&self) -> &MilestoneKind {
        &self.start_milestone
    }

    /// Returns the milestone kind that closes this stage, if any.
    pub fn end_milestone(&self) -> Option<&MilestoneKind> {
        self.end_milestone.as_ref()
    }

    /// Returns the first cycle day this stage is expected to cover.
    pub fn expected_day_start(&self) -> i32 {
        self.expected_day_start
    }

    /// Returns the last cycle day this stage is expected to cover.
    pub fn expected_day_end(&self) -> i32 {
        self.expected_day_end
    }

    /// Returns the display priority (lower wins when rows overlap).
    pub fn ui_priority(&self) -> u32 {
        self.ui_priority
    }

    /// Returns the stage description text.
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Returns true if the given cycle day falls in this row's range.
    pub fn covers_day(&self, cycle_day: i64) -> bool {
        i64::from(self.expected_day_start) <= cycle_day
            && cycle_day <= i64::from(self.expected_day_end)
    }
}

/// The reference rows for one treatment protocol, with lookups resolved
/// at construction.
///
/// When several rows share a start milestone or overlap on days, the row
/// with the lowest `ui_priority` wins; rows tied on priority fall back to
/// insertion order. Both rules are applied while building the indexes, so
/// every later lookup sees one deterministic answer.
#[derive(Debug, Clone)]
pub struct StageReferenceSet {
    rows: Vec<StageReferenceRow>,
    by_start: HashMap<MilestoneKind, usize>,
    by_end: HashMap<MilestoneKind, usize>,
}

impl StageReferenceSet {
    /// Builds a set from rows, preserving insertion order.
    pub fn new(rows: Vec<StageReferenceRow>) -> Self {
        let mut by_start: HashMap<MilestoneKind, usize> = HashMap::new();
        let mut by_end: HashMap<MilestoneKind, usize> = HashMap::new();

        for (idx, row) in rows.iter().enumerate() {
            index_candidate(&mut by_start, &rows, row.start_milestone.clone(), idx);
            if let Some(end) = &row.end_milestone {
                index_candidate(&mut by_end, &rows, end.clone(), idx);
            }
        }

        Self {
            rows,
            by_start,
            by_end,
        }
    }

    /// An empty set (unknown treatment types detect nothing).
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns all rows in insertion order.
    pub fn rows(&self) -> &[StageReferenceRow] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves a milestone kind to the stage it signals.
    ///
    /// A milestone opens the stage whose `start_milestone` it matches; if
    /// no stage starts with it, the stage it closes is used instead.
    pub fn row_for_kind(&self, kind: &MilestoneKind) -> Option<&StageReferenceRow> {
        self.by_start
            .get(kind)
            .or_else(|| self.by_end.get(kind))
            .map(|&idx| &self.rows[idx])
    }

    /// Finds the stage whose expected day range covers a cycle day.
    pub fn row_for_day(&self, cycle_day: i64) -> Option<&StageReferenceRow> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.covers_day(cycle_day))
            .min_by_key(|(idx, row)| (row.ui_priority, *idx))
            .map(|(_, row)| row)
    }
}

/// Records `idx` for `kind` unless an already-indexed row outranks it.
fn index_candidate(
    index: &mut HashMap<MilestoneKind, usize>,
    rows: &[StageReferenceRow],
    kind: MilestoneKind,
    idx: usize,
) {
    match index.get(&kind) {
        Some(&existing) if rank(rows, existing) <= rank(rows, idx) => {}
        _ => {
            index.insert(kind, idx);
        }
    }
}

fn rank(rows: &[StageReferenceRow], idx: usize) -> (u32, usize) {
    (rows[idx].ui_priority, idx)
}
