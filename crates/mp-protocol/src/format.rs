//! Strict Response Format: the delimiter-based text contract between the
//! conversation agent and the response parser.
//!
//! ```text
//! <free text analysis>
//! Target_Tonase_Ekstrak: <number>
//! Prediksi_Kontrol: <number>
//! Selisih_Kontrol: <number>
//! ---END_ANALYSIS---
//! Rekomendasi 1: <title>
//! Truk: <int>
//! Ekskavator: <int>
//! Operator: <int>
//! Cuaca: <int>
//! Prediksi: <number>
//! Selisih: <number>
//! Alasan: <free text>
//! ---START_RECOMMENDATION---
//! ```

use std::fmt::Write as _;

use crate::analysis::{AnalysisResult, NumericField, Recommendation};

/// Separates the analysis section from the recommendation blocks.
pub const ANALYSIS_DELIMITER: &str = "---END_ANALYSIS---";

/// Separates recommendation blocks.
pub const RECOMMENDATION_DELIMITER: &str = "---START_RECOMMENDATION---";

pub const TARGET_LABEL: &str = "Target_Tonase_Ekstrak";
pub const CONTROL_PREDICTION_LABEL: &str = "Prediksi_Kontrol";
pub const CONTROL_DIFFERENCE_LABEL: &str = "Selisih_Kontrol";

/// Prefix of the title line in a recommendation block (`Rekomendasi <n>: <title>`).
pub const TITLE_PREFIX: &str = "Rekomendasi";

/// Title used when a block has no `Rekomendasi <n>:` line.
pub const UNTITLED_RECOMMENDATION: &str = "Rekomendasi Tanpa Judul";

/// Rationale used when a block has no `Alasan:` line.
pub const MISSING_RATIONALE: &str = "Alasan tidak tersedia (Gagal parsing).";

/// A labeled line inside a recommendation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationField {
    Trucks,
    Excavators,
    Operators,
    Weather,
    PredictedTonnage,
    DifferenceFromTarget,
    Rationale,
}

impl RecommendationField {
    /// All fields, in emission order.
    pub const ALL: [RecommendationField; 7] = [
        RecommendationField::Trucks,
        RecommendationField::Excavators,
        RecommendationField::Operators,
        RecommendationField::Weather,
        RecommendationField::PredictedTonnage,
        RecommendationField::DifferenceFromTarget,
        RecommendationField::Rationale,
    ];

    /// Label as it appears in agent text.
    pub fn label(self) -> &'static str {
        match self {
            RecommendationField::Trucks => "Truk",
            RecommendationField::Excavators => "Ekskavator",
            RecommendationField::Operators => "Operator",
            RecommendationField::Weather => "Cuaca",
            RecommendationField::PredictedTonnage => "Prediksi",
            RecommendationField::DifferenceFromTarget => "Selisih",
            RecommendationField::Rationale => "Alasan",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

/// Render an [`AnalysisResult`] in the Strict Response Format.
///
/// Used to build few-shot examples and test fixtures; the parser accepts
/// everything this emits.
pub fn render(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let analysis = result.initial_analysis_text.trim();
    if !analysis.is_empty() {
        out.push_str(analysis);
        out.push('\n');
    }
    let _ = writeln!(out, "{TARGET_LABEL}: {}", result.target_tonnage);
    let _ = writeln!(out, "{CONTROL_PREDICTION_LABEL}: {}", result.initial_prediction);
    let _ = writeln!(out, "{CONTROL_DIFFERENCE_LABEL}: {}", result.initial_difference);
    out.push_str(ANALYSIS_DELIMITER);
    out.push('\n');

    for (i, rec) in result.recommendations.iter().enumerate() {
        out.push('\n');
        render_recommendation(&mut out, i + 1, rec);
        out.push_str(RECOMMENDATION_DELIMITER);
        out.push('\n');
    }
    out
}

fn render_recommendation(out: &mut String, rank: usize, rec: &Recommendation) {
    let _ = writeln!(out, "{TITLE_PREFIX} {rank}: {}", rec.title);
    write_field(out, RecommendationField::Trucks, rec.trucks.as_ref());
    write_field(out, RecommendationField::Excavators, rec.excavators.as_ref());
    write_field(out, RecommendationField::Operators, rec.operators.as_ref());
    write_field(out, RecommendationField::Weather, rec.weather.as_ref());
    write_field(out, RecommendationField::PredictedTonnage, rec.predicted_tonnage.as_ref());
    write_field(
        out,
        RecommendationField::DifferenceFromTarget,
        rec.difference_from_target.as_ref(),
    );
    let _ = writeln!(out, "{}: {}", RecommendationField::Rationale.label(), rec.rationale);
}

fn write_field<T: std::fmt::Display>(
    out: &mut String,
    field: RecommendationField,
    value: Option<&NumericField<T>>,
) {
    match value {
        Some(NumericField::Parsed(v)) => {
            let _ = writeln!(out, "{}: {v}", field.label());
        }
        Some(NumericField::Unparsed(raw)) => {
            let _ = writeln!(out, "{}: {raw}", field.label());
        }
        None => {}
    }
}
