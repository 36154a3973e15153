//! Treatment template definitions.
//!
//! A template describes the expected shape of one treatment protocol: its
//! ordered stages, their day offsets relative to cycle start, and the
//! educational text attached to each stage. Templates are reference data,
//! loaded from seed datasets and never mutated by patient activity.

use serde::Serialize;

use crate::domain::foundation::{MilestoneKind, TreatmentType, ValidationError};

/// One stage row within a treatment template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTemplateEntry {
    treatment_type: TreatmentType,
    kind: MilestoneKind,
    stage_name: String,
    day_label: String,
    day_start: i32,
    day_end: Option<i32>,
    medical_details: Option<String>,
    monitoring_procedures: Option<String>,
    patient_insights: Option<String>,
}

impl StageTemplateEntry {
    /// Creates a stage entry, validating the day range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        treatment_type: TreatmentType,
        kind: MilestoneKind,
        stage_name: impl Into<String>,
        day_label: impl Into<String>,
        day_start: i32,
        day_end: Option<i32>,
        medical_details: Option<String>,
        monitoring_procedures: Option<String>,
        patient_insights: Option<String>,
    ) -> Result<Self, ValidationError> {
        if let Some(end) = day_end {
            if end < day_start {
                return Err(ValidationError::out_of_range(
                    "day_end",
                    day_start,
                    i32::MAX,
                    end,
                ));
            }
        }
        Ok(Self {
            treatment_type,
            kind,
            stage_name: stage_name.into(),
            day_label: day_label.into(),
            day_start,
            day_end,
            medical_details,
            monitoring_procedures,
            patient_insights,
        })
    }

    /// Returns the treatment protocol this entry belongs to.
    pub fn treatment_type(&self) -> &TreatmentType {
        &self.treatment_type
    }

    /// Returns the canonical milestone kind.
    pub fn kind(&self) -> &MilestoneKind {
        &self.kind
    }

    /// Returns the patient-facing stage name.
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Returns the authored day label (e.g. "Day 10-12").
    pub fn day_label(&self) -> &str {
        &self.day_label
    }

    /// Returns the first cycle day of this stage.
    ///
    /// Day 1 is the cycle start date; zero and negative values schedule
    /// work before the cycle begins (donor preparation).
    pub fn day_start(&self) -> i32 {
        self.day_start
    }

    /// Returns the last cycle day of this stage, if it spans a range.
    pub fn day_end(&self) -> Option<i32> {
        self.day_end
    }

    /// Returns clinical detail text for the stage.
    pub fn medical_details(&self) -> Option<&str> {
        self.medical_details.as_deref()
    }

    /// Returns monitoring procedure text for the stage.
    pub fn monitoring_procedures(&self) -> Option<&str> {
        self.monitoring_procedures.as_deref()
    }

    /// Returns patient insight text for the stage.
    pub fn patient_insights(&self) -> Option<&str> {
        self.patient_insights.as_deref()
    }
}

/// A complete treatment template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    treatment_type: TreatmentType,
    display_name: String,
    description: String,
    total_duration_days: i32,
    stages: Vec<StageTemplateEntry>,
}

impl TemplateDefinition {
    /// Creates a template, ordering stages by ascending `day_start`.
    ///
    /// The sort is stable: stages sharing a day keep their authored order.
    pub fn new(
        treatment_type: TreatmentType,
        display_name: impl Into<String>,
        description: impl Into<String>,
        total_duration_days: i32,
        mut stages: Vec<StageTemplateEntry>,
    ) -> Result<Self, ValidationError> {
        if total_duration_days < 1 {
            return Err(ValidationError::out_of_range(
                "total_duration_days",
                1,
                365,
                total_duration_days,
            ));
        }
        stages.sort_by_key(|s| s.day_start);
        Ok(Self {
            treatment_type,
            display_name: display_name.into(),
            description: description.into(),
            total_duration_days,
            stages,
        })
    }

    /// Returns the treatment protocol this template describes.
    pub fn treatment_type(&self) -> &TreatmentType {
        &self.treatment_type
    }

    /// Returns the patient-facing template name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the template description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the expected length of the protocol in days.
    pub fn total_duration_days(&self) -> i32 {
        self.total_duration_days
    }

    /// Returns the stages in ascending day order.
    pub fn stages(&self) -> &[StageTemplateEntry] {
        &self.stages
    }

    /// Returns the number of stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the first stage matching a milestone kind, in day order.
    pub fn stage_for_kind(&self, kind: &MilestoneKind) -> Option<&StageTemplateEntry> {
        self.stages.iter().find(|s| s.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, day_start: i32, day_end: Option<i32>) -> StageTemplateEntry {
        StageTemplateEntry::new(
            TreatmentType::IvfFresh,
            MilestoneKind::classify(name),
            name,
            format!("Day {}", day_start),
            day_start,
            day_end,
            None,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn entry_rejects_inverted_day_range() {
        let result = StageTemplateEntry::new(
            TreatmentType::IvfFresh,
            MilestoneKind::MonitoringScan,
            "Monitoring scans",
            "Day 8-10",
            10,
            Some(8),
            None,
            None,
            None,
        );
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn entry_accepts_single_day_and_ranges() {
        assert!(entry("Trigger shot", 11, None).day_end().is_none());
        assert_eq!(entry("Monitoring scans", 8, Some(11)).day_end(), Some(11));
    }

    #[test]
    fn definition_sorts_stages_by_day_start() {
        let template = TemplateDefinition::new(
            TreatmentType::IvfFresh,
            "IVF (fresh transfer)",
            "Fresh IVF protocol",
            28,
            vec![
                entry("Egg retrieval", 13, None),
                entry("Treatment start", 1, None),
                entry("Trigger shot", 11, None),
            ],
        )
        .unwrap();

        let days: Vec<i32> = template.stages().iter().map(|s| s.day_start()).collect();
        assert_eq!(days, vec![1, 11, 13]);
    }

    #[test]
    fn definition_sort_is_stable_for_equal_days() {
        let template = TemplateDefinition::new(
            TreatmentType::IvfFresh,
            "IVF (fresh transfer)",
            "Fresh IVF protocol",
            28,
            vec![
                entry("Fertilisation report", 14, None),
                entry("Embryo development", 14, None),
            ],
        )
        .unwrap();

        assert_eq!(template.stages()[0].stage_name(), "Fertilisation report");
        assert_eq!(template.stages()[1].stage_name(), "Embryo development");
    }

    #[test]
    fn definition_rejects_non_positive_duration() {
        let result = TemplateDefinition::new(
            TreatmentType::Iui,
            "IUI",
            "IUI protocol",
            0,
            vec![],
        );
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn stage_for_kind_returns_earliest_match() {
        let template = TemplateDefinition::new(
            TreatmentType::IvfFresh,
            "IVF (fresh transfer)",
            "Fresh IVF protocol",
            28,
            vec![
                entry("Monitoring scans", 8, Some(11)),
                entry("Lining check scan", 12, None),
            ],
        )
        .unwrap();

        let found = template.stage_for_kind(&MilestoneKind::MonitoringScan).unwrap();
        assert_eq!(found.stage_name(), "Monitoring scans");
        assert!(template.stage_for_kind(&MilestoneKind::TriggerShot).is_none());
    }
}
