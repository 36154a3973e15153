//! Educational content blocks.

use crate::domain::foundation::{MilestoneKind, TreatmentType, ValidationError};

/// One authored piece of stage-specific patient education.
///
/// Blocks are written against milestone names as the authors spelled them,
/// which rarely matches template spelling exactly; the content index is
/// responsible for bridging that gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    id: String,
    treatment_type: TreatmentType,
    milestone_name: String,
    milestone_kind: Option<MilestoneKind>,
    notification_title: Option<String>,
    medical_information: Option<String>,
    what_to_expect: Option<String>,
    todays_tips: Option<String>,
    order: u32,
    expected_day_offset: Option<i32>,
}

impl ContentBlock {
    /// Creates a content block. The milestone name must be non-empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        treatment_type: TreatmentType,
        milestone_name: impl Into<String>,
        milestone_kind: Option<MilestoneKind>,
        notification_title: Option<String>,
        medical_information: Option<String>,
        what_to_expect: Option<String>,
        todays_tips: Option<String>,
        order: u32,
        expected_day_offset: Option<i32>,
    ) -> Result<Self, ValidationError> {
        let milestone_name = milestone_name.into();
        if milestone_name.trim().is_empty() {
            return Err(ValidationError::empty_field("milestone_name"));
        }
        Ok(Self {
            id: id.into(),
            treatment_type,
            milestone_name,
            milestone_kind,
            notification_title,
            medical_information,
            what_to_expect,
            todays_tips,
            order,
            expected_day_offset,
        })
    }

    /// Returns the stable block identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the treatment protocol this block belongs to.
    pub fn treatment_type(&self) -> &TreatmentType {
        &self.treatment_type
    }

    /// Returns the milestone name as authored.
    pub fn milestone_name(&self) -> &str {
        &self.milestone_name
    }

    /// Returns the canonical milestone kind, when one was derivable.
    pub fn milestone_kind(&self) -> Option<&MilestoneKind> {
        self.milestone_kind.as_ref()
    }

    /// Returns the notification title, if authored.
    pub fn notification_title(&self) -> Option<&str> {
        self.notification_title.as_deref()
    }

    /// Returns the medical information text.
    pub fn medical_information(&self) -> Option<&str> {
        self.medical_information.as_deref()
    }

    /// Returns the "what to expect" text.
    pub fn what_to_expect(&self) -> Option<&str> {
        self.what_to_expect.as_deref()
    }

    /// Returns the "today's tips" text.
    pub fn todays_tips(&self) -> Option<&str> {
        self.todays_tips.as_deref()
    }

    /// Returns the authoring order (lower wins on matching collisions).
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Returns the day offset this block was written for, if any.
    pub fn expected_day_offset(&self) -> Option<i32> {
        self.expected_day_offset
    }
}
