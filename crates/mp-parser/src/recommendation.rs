//! Recommendation blocks between `---START_RECOMMENDATION---` delimiters.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use mp_protocol::Recommendation;
use mp_protocol::format::{MISSING_RATIONALE, RecommendationField, UNTITLED_RECOMMENDATION};

use crate::coerce::{coerce_float, coerce_integer, coerce_weather};

// Rekomendasi <n>: <title>
static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Rekomendasi[ \t]+\d+\**[ \t]*:[ \t]*([^\r\n]*)").unwrap()
});

// <Label>: <value> at the start of a line, tolerating list markers and bold.
static RE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t*\-]*(Truk|Ekskavator|Operator|Cuaca|Prediksi|Selisih|Alasan)\**[ \t]*:[ \t]*([^\r\n]+)",
    )
    .unwrap()
});

/// Extract every labeled value in a block. A repeated label keeps its last value.
pub fn extract_fields(block: &str) -> HashMap<RecommendationField, String> {
    let mut fields = HashMap::new();
    for caps in RE_FIELD.captures_iter(block) {
        let Some(field) = RecommendationField::from_label(&caps[1]) else {
            continue;
        };
        let value = caps[2].trim().trim_matches('*').trim();
        if value.is_empty() {
            continue;
        }
        fields.insert(field, value.to_string());
    }
    fields
}

/// Title from the `Rekomendasi <n>:` line, or the untitled fallback.
pub fn extract_title(block: &str) -> String {
    RE_TITLE
        .captures(block)
        .map(|caps| caps[1].trim().trim_matches('*').trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED_RECOMMENDATION.to_string())
}

/// Parse one block. Returns `None` for blocks with no labeled fields at all
/// (stray prose around delimiters).
pub fn parse_block(block: &str) -> Option<Recommendation> {
    let mut fields = extract_fields(block);
    if fields.is_empty() {
        tracing::debug!(
            chars = block.trim().len(),
            "discarding recommendation block without fields"
        );
        return None;
    }

    let integer = |f: RecommendationField| fields.get(&f).map(|v| coerce_integer(v));
    let trucks = integer(RecommendationField::Trucks);
    let excavators = integer(RecommendationField::Excavators);
    let operators = integer(RecommendationField::Operators);

    let weather = fields
        .get(&RecommendationField::Weather)
        .map(|v| coerce_weather(v));
    let predicted_tonnage = fields
        .get(&RecommendationField::PredictedTonnage)
        .map(|v| coerce_float(v));
    let difference_from_target = fields
        .get(&RecommendationField::DifferenceFromTarget)
        .map(|v| coerce_float(v));
    let rationale = fields
        .remove(&RecommendationField::Rationale)
        .unwrap_or_else(|| MISSING_RATIONALE.to_string());

    Some(Recommendation {
        title: extract_title(block),
        trucks,
        excavators,
        operators,
        weather,
        predicted_tonnage,
        difference_from_target,
        rationale,
    })
}
