//! Analysis section: header values and free prose before `---END_ANALYSIS---`.

use regex::Regex;
use std::sync::LazyLock;

use mp_protocol::format::{CONTROL_DIFFERENCE_LABEL, CONTROL_PREDICTION_LABEL, TARGET_LABEL};

use crate::error::{ParseError, ParseResult};

// LABEL: <digits>[.<digits>], tolerating markdown bold around the label.
static RE_HEADER_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(Target_Tonase_Ekstrak|Prediksi_Kontrol|Selisih_Kontrol)\**[ \t]*:[ \t]*\**[ \t]*(\d+(?:\.\d*)?)",
    )
    .unwrap()
});

// Any line that starts with a header label, whatever its value.
static RE_HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s*\-]*(Target_Tonase_Ekstrak|Prediksi_Kontrol|Selisih_Kontrol)\**[ \t]*:")
        .unwrap()
});

/// Values lifted from the analysis section, with explicit presence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisHeader {
    pub target_tonnage: Option<i64>,
    pub initial_prediction: Option<f64>,
    pub initial_difference: Option<f64>,
    /// Remaining prose with the labeled lines removed, trimmed.
    pub analysis_text: String,
}

/// Extract header values and prose. Never fails; see [`AnalysisHeader::validate`].
pub fn parse_header(section: &str) -> AnalysisHeader {
    let mut header = AnalysisHeader::default();

    for caps in RE_HEADER_VALUE.captures_iter(section) {
        let Ok(value) = caps[2].parse::<f64>() else {
            continue;
        };
        // First occurrence of each label wins.
        match &caps[1] {
            TARGET_LABEL if header.target_tonnage.is_none() => {
                header.target_tonnage = Some(value.trunc() as i64);
            }
            CONTROL_PREDICTION_LABEL if header.initial_prediction.is_none() => {
                header.initial_prediction = Some(value);
            }
            CONTROL_DIFFERENCE_LABEL if header.initial_difference.is_none() => {
                header.initial_difference = Some(value);
            }
            _ => {}
        }
    }

    header.analysis_text = section
        .lines()
        .filter(|line| !RE_HEADER_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    header
}

impl AnalysisHeader {
    /// Require a non-zero target tonnage and control prediction.
    ///
    /// Zero is rejected alongside absence: the agent contract never yields a
    /// legitimate zero target, and callers rely on zero meaning "not found".
    pub fn validate(&self) -> ParseResult<(i64, f64)> {
        let target = match self.target_tonnage {
            None => return Err(incomplete(TARGET_LABEL, "not found")),
            Some(0) => return Err(incomplete(TARGET_LABEL, "is zero")),
            Some(t) => t,
        };
        let prediction = match self.initial_prediction {
            None => return Err(incomplete(CONTROL_PREDICTION_LABEL, "not found")),
            Some(p) if p == 0.0 => return Err(incomplete(CONTROL_PREDICTION_LABEL, "is zero")),
            Some(p) => p,
        };
        Ok((target, prediction))
    }
}

fn incomplete(label: &str, reason: &str) -> ParseError {
    ParseError::IncompleteAnalysis(format!(
        "missing target tonnage or initial prediction ({label} {reason})"
    ))
}
