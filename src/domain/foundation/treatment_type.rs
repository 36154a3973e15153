//! TreatmentType enum for the supported fertility treatment protocols.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The treatment protocol a cycle follows.
///
/// Clinic exports and older app versions spell these inconsistently
/// ("IVF", "ivf-fresh", "Frozen Embryo Transfer"), so parsing is total:
/// recognized spellings collapse onto a canonical variant and anything
/// else is preserved as `Other` with a normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TreatmentType {
    IvfFresh,
    IvfFrozen,
    Iui,
    EggFreezing,
    Other(String),
}

impl TreatmentType {
    /// Parses a raw treatment label. Never fails.
    pub fn parse(raw: &str) -> Self {
        let key = normalize_key(raw);
        match key.as_str() {
            "ivf" | "ivf_fresh" | "fresh_ivf" | "ivf_fresh_transfer" | "in_vitro_fertilization" => {
                TreatmentType::IvfFresh
            }
            "fet" | "ivf_frozen" | "frozen_ivf" | "ivf_fet" | "frozen_transfer"
            | "frozen_embryo_transfer" => TreatmentType::IvfFrozen,
            "iui" | "intrauterine_insemination" => TreatmentType::Iui,
            "egg_freezing" | "egg_freeze" | "oocyte_freezing" | "oocyte_cryopreservation"
            | "elective_egg_freezing" => TreatmentType::EggFreezing,
            "" => TreatmentType::Other("unspecified".to_string()),
            _ => TreatmentType::Other(key),
        }
    }

    /// Returns the canonical key used in storage and seed datasets.
    pub fn key(&self) -> &str {
        match self {
            TreatmentType::IvfFresh => "ivf_fresh",
            TreatmentType::IvfFrozen => "ivf_frozen",
            TreatmentType::Iui => "iui",
            TreatmentType::EggFreezing => "egg_freezing",
            TreatmentType::Other(key) => key,
        }
    }

    /// Returns the patient-facing name.
    pub fn display_name(&self) -> String {
        match self {
            TreatmentType::IvfFresh => "IVF (fresh transfer)".to_string(),
            TreatmentType::IvfFrozen => "Frozen embryo transfer".to_string(),
            TreatmentType::Iui => "IUI".to_string(),
            TreatmentType::EggFreezing => "Egg freezing".to_string(),
            TreatmentType::Other(key) => humanize(key),
        }
    }

    /// Returns the built-in treatment types (those with shipped datasets).
    pub fn known() -> &'static [TreatmentType] {
        &[
            TreatmentType::IvfFresh,
            TreatmentType::IvfFrozen,
            TreatmentType::Iui,
            TreatmentType::EggFreezing,
        ]
    }
}

impl From<String> for TreatmentType {
    fn from(raw: String) -> Self {
        TreatmentType::parse(&raw)
    }
}

impl From<TreatmentType> for String {
    fn from(tt: TreatmentType) -> Self {
        tt.key().to_string()
    }
}

impl fmt::Display for TreatmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Collapses a raw label to lowercase with underscore-separated word runs.
fn normalize_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut last_was_sep = true;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            key.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            key.push('_');
            last_was_sep = true;
        }
    }
    while key.ends_with('_') {
        key.pop();
    }
    key
}

fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, part) in key.split('_').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = part.chars();
        if i == 0 {
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
            }
        } else if let Some(first) = chars.next() {
            out.push(first);
        }
        out.push_str(chars.as_str());
    }
    out
}
