//! Donor conception overlay stages.
//!
//! When a cycle uses donor eggs or sperm, a fixed set of preparation
//! milestones is generated ahead of the protocol's own stages. These sit at
//! zero or negative day offsets: counselling four weeks before cycle start,
//! screening three weeks before, clearance two weeks before.

use once_cell::sync::Lazy;

use crate::domain::foundation::{MilestoneKind, TreatmentType};

use super::StageTemplateEntry;

static DONOR_OVERLAY: Lazy<Vec<StageTemplateEntry>> = Lazy::new(|| {
    let overlay_type = TreatmentType::Other("donor_conception".to_string());
    vec![
        StageTemplateEntry::new(
            overlay_type.clone(),
            MilestoneKind::DonorCounselling,
            "Donor counselling session",
            "4 weeks before",
            -28,
            None,
            Some(
                "Implications counselling covers the legal, emotional and practical \
                 aspects of using donor eggs or sperm."
                    .to_string(),
            ),
            None,
            Some(
                "Counselling is a standard requirement before donor treatment, not a \
                 judgement of readiness. Bring questions about donor anonymity and \
                 future contact."
                    .to_string(),
            ),
        )
        .expect("donor overlay entries have valid day ranges"),
        StageTemplateEntry::new(
            overlay_type.clone(),
            MilestoneKind::DonorScreening,
            "Donor screening panel",
            "3 weeks before",
            -21,
            None,
            Some(
                "The donor completes infectious disease bloods and genetic carrier \
                 screening required by the clinic."
                    .to_string(),
            ),
            Some("Blood draw and genetic carrier panel for the donor.".to_string()),
            None,
        )
        .expect("donor overlay entries have valid day ranges"),
        StageTemplateEntry::new(
            overlay_type,
            MilestoneKind::DonorClearance,
            "Donor clearance confirmed",
            "2 weeks before",
            -14,
            None,
            Some(
                "The clinic confirms screening results and releases the donor match \
                 for treatment."
                    .to_string(),
            ),
            None,
            Some(
                "Once clearance is confirmed your own protocol dates are fixed. \
                 Delays here shift the whole cycle, which is common and not a \
                 setback."
                    .to_string(),
            ),
        )
        .expect("donor overlay entries have valid day ranges"),
    ]
});

/// Returns the donor preparation stages, in day order.
pub fn donor_overlay() -> &'static [StageTemplateEntry] {
    &DONOR_OVERLAY
}
