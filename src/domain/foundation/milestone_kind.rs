//! MilestoneKind enum: the canonical clinical milestone vocabulary.
//!
//! Template stages, stage reference rows, and content blocks are authored
//! by different teams and name the same clinical event differently
//! ("Trigger shot", "HCG trigger", "trigger_injection"). All three datasets
//! are mapped onto this enum when they are loaded, so matching elsewhere in
//! the engine is plain equality rather than repeated string heuristics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier for a clinical milestone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MilestoneKind {
    TreatmentStart,
    BaselineScan,
    MedicationStart,
    StimulationStart,
    MonitoringScan,
    TriggerShot,
    EggRetrieval,
    Insemination,
    Fertilization,
    EmbryoDevelopment,
    TransferPrep,
    EmbryoTransfer,
    FrozenTransfer,
    LutealSupport,
    PregnancyTest,
    EggFreezing,
    DonorCounselling,
    DonorScreening,
    DonorClearance,
    Custom(String),
}

impl MilestoneKind {
    /// Resolves a dataset identifier to a kind.
    ///
    /// Exact canonical tokens (e.g. "egg-retrieval") map directly; anything
    /// else goes through keyword classification. Never fails.
    pub fn resolve(identifier: &str) -> Self {
        let slug = slugify(identifier);
        for kind in Self::canonical() {
            if kind.token() == slug {
                return kind.clone();
            }
        }
        Self::classify(identifier)
    }

    /// Classifies a free-form milestone label by keyword.
    ///
    /// Rule order matters: more specific phrases are tested before the
    /// generic words they contain ("frozen transfer" before "transfer").
    pub fn classify(label: &str) -> Self {
        let text = label.to_lowercase();
        let has = |needle: &str| text.contains(needle);

        if has("trigger") {
            MilestoneKind::TriggerShot
        } else if has("retrieval") {
            MilestoneKind::EggRetrieval
        } else if has("frozen") && has("transfer") {
            MilestoneKind::FrozenTransfer
        } else if has("transfer") && (has("prep") || has("preparation")) {
            MilestoneKind::TransferPrep
        } else if has("transfer") {
            MilestoneKind::EmbryoTransfer
        } else if has("insemination") || has("iui") {
            MilestoneKind::Insemination
        } else if has("fertiliz") || has("fertilis") {
            MilestoneKind::Fertilization
        } else if has("embryo") {
            MilestoneKind::EmbryoDevelopment
        } else if has("baseline") {
            MilestoneKind::BaselineScan
        } else if has("stimulation") || has("stims") {
            MilestoneKind::StimulationStart
        } else if (has("pregnancy") && has("test")) || has("beta") || has("hcg") {
            MilestoneKind::PregnancyTest
        } else if has("luteal") || has("progesterone") {
            MilestoneKind::LutealSupport
        } else if has("counsel") {
            MilestoneKind::DonorCounselling
        } else if has("screening") {
            MilestoneKind::DonorScreening
        } else if has("clearance") || has("quarantine") {
            MilestoneKind::DonorClearance
        } else if has("freez") || has("frozen") || has("cryo") {
            MilestoneKind::EggFreezing
        } else if has("scan") || has("ultrasound") || has("monitoring") || has("bloodwork") || has("lining") {
            MilestoneKind::MonitoringScan
        } else if has("medication") || has("injection") || has("estrogen") || has("estradiol") {
            MilestoneKind::MedicationStart
        } else if (has("start") || has("begin")) && (has("cycle") || has("treatment")) {
            MilestoneKind::TreatmentStart
        } else {
            MilestoneKind::Custom(slugify(label))
        }
    }

    /// Returns the canonical token used in storage and seed datasets.
    pub fn token(&self) -> &str {
        match self {
            MilestoneKind::TreatmentStart => "treatment-start",
            MilestoneKind::BaselineScan => "baseline-scan",
            MilestoneKind::MedicationStart => "medication-start",
            MilestoneKind::StimulationStart => "stimulation-start",
            MilestoneKind::MonitoringScan => "monitoring-scan",
            MilestoneKind::TriggerShot => "trigger-shot",
            MilestoneKind::EggRetrieval => "egg-retrieval",
            MilestoneKind::Insemination => "insemination",
            MilestoneKind::Fertilization => "fertilization",
            MilestoneKind::EmbryoDevelopment => "embryo-development",
            MilestoneKind::TransferPrep => "transfer-prep",
            MilestoneKind::EmbryoTransfer => "embryo-transfer",
            MilestoneKind::FrozenTransfer => "frozen-transfer",
            MilestoneKind::LutealSupport => "luteal-support",
            MilestoneKind::PregnancyTest => "pregnancy-test",
            MilestoneKind::EggFreezing => "egg-freezing",
            MilestoneKind::DonorCounselling => "donor-counselling",
            MilestoneKind::DonorScreening => "donor-screening",
            MilestoneKind::DonorClearance => "donor-clearance",
            MilestoneKind::Custom(slug) => slug,
        }
    }

    fn canonical() -> &'static [MilestoneKind] {
        &[
            MilestoneKind::TreatmentStart,
            MilestoneKind::BaselineScan,
            MilestoneKind::MedicationStart,
            MilestoneKind::StimulationStart,
            MilestoneKind::MonitoringScan,
            MilestoneKind::TriggerShot,
            MilestoneKind::EggRetrieval,
            MilestoneKind::Insemination,
            MilestoneKind::Fertilization,
            MilestoneKind::EmbryoDevelopment,
            MilestoneKind::TransferPrep,
            MilestoneKind::EmbryoTransfer,
            MilestoneKind::FrozenTransfer,
            MilestoneKind::LutealSupport,
            MilestoneKind::PregnancyTest,
            MilestoneKind::EggFreezing,
            MilestoneKind::DonorCounselling,
            MilestoneKind::DonorScreening,
            MilestoneKind::DonorClearance,
        ]
    }
}

impl From<String> for MilestoneKind {
    fn from(raw: String) -> Self {
        MilestoneKind::resolve(&raw)
    }
}

impl From<MilestoneKind> for String {
    fn from(kind: MilestoneKind) -> Self {
        kind.token().to_string()
    }
}

impl fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Collapses a label to a lowercase kebab-case slug.
fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut last_was_sep = true;
    for ch in label.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('-');
            last_was_sep = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("unlabeled");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonymous_trigger_labels_classify_identically() {
        assert_eq!(
            MilestoneKind::classify("Trigger shot injection"),
            MilestoneKind::TriggerShot
        );
        assert_eq!(MilestoneKind::classify("HCG trigger"), MilestoneKind::TriggerShot);
        assert_eq!(MilestoneKind::classify("trigger_shot"), MilestoneKind::TriggerShot);
    }

    #[test]
    fn frozen_transfer_wins_over_plain_transfer() {
        assert_eq!(
            MilestoneKind::classify("Frozen embryo transfer"),
            MilestoneKind::FrozenTransfer
        );
        assert_eq!(
            MilestoneKind::classify("Embryo transfer"),
            MilestoneKind::EmbryoTransfer
        );
        assert_eq!(
            MilestoneKind::classify("Transfer preparation"),
            MilestoneKind::TransferPrep
        );
    }

    #[test]
    fn classify_covers_clinic_vocabulary() {
        assert_eq!(MilestoneKind::classify("Egg retrieval"), MilestoneKind::EggRetrieval);
        assert_eq!(MilestoneKind::classify("IUI procedure"), MilestoneKind::Insemination);
        assert_eq!(MilestoneKind::classify("Baseline scan"), MilestoneKind::BaselineScan);
        assert_eq!(
            MilestoneKind::classify("Stimulation begins"),
            MilestoneKind::StimulationStart
        );
        assert_eq!(
            MilestoneKind::classify("Monitoring ultrasound"),
            MilestoneKind::MonitoringScan
        );
        assert_eq!(
            MilestoneKind::classify("Beta pregnancy test"),
            MilestoneKind::PregnancyTest
        );
        assert_eq!(
            MilestoneKind::classify("Progesterone start"),
            MilestoneKind::LutealSupport
        );
        assert_eq!(
            MilestoneKind::classify("Eggs frozen"),
            MilestoneKind::EggFreezing
        );
        assert_eq!(
            MilestoneKind::classify("Fertilisation report"),
            MilestoneKind::Fertilization
        );
        assert_eq!(
            MilestoneKind::classify("Treatment start"),
            MilestoneKind::TreatmentStart
        );
    }

    #[test]
    fn classify_covers_donor_vocabulary() {
        assert_eq!(
            MilestoneKind::classify("Donor counselling session"),
            MilestoneKind::DonorCounselling
        );
        assert_eq!(
            MilestoneKind::classify("Donor screening panel"),
            MilestoneKind::DonorScreening
        );
        assert_eq!(
            MilestoneKind::classify("Donor clearance confirmed"),
            MilestoneKind::DonorClearance
        );
    }

    #[test]
    fn unrecognized_labels_become_custom_slugs() {
        assert_eq!(
            MilestoneKind::classify("Acupuncture appointment"),
            MilestoneKind::Custom("acupuncture-appointment".to_string())
        );
    }

    #[test]
    fn resolve_maps_canonical_tokens_directly() {
        assert_eq!(
            MilestoneKind::resolve("egg-retrieval"),
            MilestoneKind::EggRetrieval
        );
        assert_eq!(
            MilestoneKind::resolve("luteal-support"),
            MilestoneKind::LutealSupport
        );
    }

    #[test]
    fn resolve_falls_back_to_classification() {
        assert_eq!(
            MilestoneKind::resolve("HCG trigger"),
            MilestoneKind::TriggerShot
        );
    }

    #[test]
    fn token_round_trips_through_resolve() {
        for kind in MilestoneKind::canonical() {
            assert_eq!(&MilestoneKind::resolve(kind.token()), kind);
        }
    }

    #[test]
    fn serializes_to_token() {
        let json = serde_json::to_string(&MilestoneKind::EggRetrieval).unwrap();
        assert_eq!(json, "\"egg-retrieval\"");
    }

    #[test]
    fn deserializes_through_resolution() {
        let kind: MilestoneKind = serde_json::from_str("\"HCG Trigger\"").unwrap();
        assert_eq!(kind, MilestoneKind::TriggerShot);
    }

    #[test]
    fn empty_label_slug_is_stable() {
        assert_eq!(
            MilestoneKind::classify("   "),
            MilestoneKind::Custom("unlabeled".to_string())
        );
    }
}
