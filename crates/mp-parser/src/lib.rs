//! Strict Response Format parser.
//!
//! Turns the delimiter-based text emitted by the conversation agent into a
//! validated [`AnalysisResult`]. Pure: no I/O, no shared state.
//!
//! The analysis section is validated strictly (delimiter and header fields
//! are required); recommendation blocks are parsed permissively so one sloppy
//! block never sinks the whole answer.

pub mod analysis;
pub mod coerce;
pub mod error;
pub mod recommendation;

pub use error::{ParseError, ParseResult};

use mp_protocol::AnalysisResult;
use mp_protocol::format::{ANALYSIS_DELIMITER, RECOMMENDATION_DELIMITER};

/// Parse agent output into an [`AnalysisResult`].
///
/// Fails with [`ParseError::MalformedFormat`] when the analysis delimiter is
/// missing and with [`ParseError::IncompleteAnalysis`] when the target tonnage
/// or control prediction is absent or zero.
pub fn parse(text: &str) -> ParseResult<AnalysisResult> {
    let Some((analysis_part, recs_part)) = text.split_once(ANALYSIS_DELIMITER) else {
        return Err(ParseError::MalformedFormat(
            "missing analysis delimiter".into(),
        ));
    };

    let header = analysis::parse_header(analysis_part);

    let recommendations: Vec<_> = recs_part
        .split(RECOMMENDATION_DELIMITER)
        .filter(|block| !block.trim().is_empty())
        .filter_map(recommendation::parse_block)
        .collect();

    let (target_tonnage, initial_prediction) = header.validate()?;

    tracing::debug!(
        target_tonnage,
        initial_prediction,
        recommendations = recommendations.len(),
        "agent response parsed"
    );

    Ok(AnalysisResult {
        target_tonnage,
        initial_analysis_text: header.analysis_text,
        initial_prediction,
        initial_difference: header.initial_difference.unwrap_or(0.0),
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mp_protocol::NumericField;
    use mp_protocol::format::{MISSING_RATIONALE, render};
    use mp_protocol::{Recommendation, Scenario, Weather};

    const SAMPLE: &str = "Kontrol baik.
Target_Tonase_Ekstrak: 80
Prediksi_Kontrol: 75.50
Selisih_Kontrol: 4.50
---END_ANALYSIS---
Rekomendasi 1: Tambah Truk
Truk: 14
Ekskavator: 3
Operator: 18
Cuaca: 1
Prediksi: 79.80
Selisih: 0.20
Alasan: Penambahan truk mendekati target.
---START_RECOMMENDATION---
";

    #[test]
    fn parses_concrete_scenario() {
        let result = parse(SAMPLE).unwrap();
        assert_eq!(result.target_tonnage, 80);
        assert_eq!(result.initial_prediction, 75.5);
        assert_eq!(result.initial_difference, 4.5);
        assert_eq!(result.initial_analysis_text, "Kontrol baik.");
        assert_eq!(result.recommendations.len(), 1);

        let rec = &result.recommendations[0];
        assert_eq!(rec.title, "Tambah Truk");
        assert_eq!(rec.trucks, Some(NumericField::Parsed(14)));
        assert_eq!(rec.excavators, Some(NumericField::Parsed(3)));
        assert_eq!(rec.operators, Some(NumericField::Parsed(18)));
        assert_eq!(rec.weather, Some(NumericField::Parsed(1)));
        assert_eq!(rec.predicted_tonnage, Some(NumericField::Parsed(79.8)));
        assert_eq!(rec.difference_from_target, Some(NumericField::Parsed(0.2)));
        assert_eq!(rec.rationale, "Penambahan truk mendekati target.");
        assert_eq!(rec.difference_matches(80.0, 1e-6), Some(true));
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        for text in [
            "",
            "Target_Tonase_Ekstrak: 80\nPrediksi_Kontrol: 75.5",
            "---START_RECOMMENDATION---\nRekomendasi 1: x\nTruk: 1",
            "---END_ANALYSIS",
            "--- END_ANALYSIS ---",
        ] {
            assert!(
                matches!(parse(text), Err(ParseError::MalformedFormat(_))),
                "should be malformed: {text:?}"
            );
        }
    }

    #[test]
    fn zero_or_missing_target_is_incomplete() {
        let zero = SAMPLE.replace("Target_Tonase_Ekstrak: 80", "Target_Tonase_Ekstrak: 0");
        assert!(matches!(parse(&zero), Err(ParseError::IncompleteAnalysis(_))));

        let missing = SAMPLE.replace("Target_Tonase_Ekstrak: 80\n", "");
        let err = parse(&missing).unwrap_err();
        assert!(matches!(err, ParseError::IncompleteAnalysis(_)));
        assert!(err.to_string().contains("Target_Tonase_Ekstrak"));
    }

    #[test]
    fn zero_control_prediction_is_incomplete() {
        let zero = SAMPLE.replace("Prediksi_Kontrol: 75.50", "Prediksi_Kontrol: 0.0");
        let err = parse(&zero).unwrap_err();
        assert!(matches!(err, ParseError::IncompleteAnalysis(_)));
        assert!(err.to_string().contains("Prediksi_Kontrol"));
    }

    #[test]
    fn missing_control_difference_defaults_to_zero() {
        let text = SAMPLE.replace("Selisih_Kontrol: 4.50\n", "");
        let result = parse(&text).unwrap();
        assert_eq!(result.initial_difference, 0.0);
    }

    #[test]
    fn block_without_rationale_uses_fallback() {
        let text = SAMPLE.replace("Alasan: Penambahan truk mendekati target.\n", "");
        let result = parse(&text).unwrap();
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].rationale, MISSING_RATIONALE);
        assert_eq!(result.recommendations[0].trucks, Some(NumericField::Parsed(14)));
    }

    #[test]
    fn trailing_prose_after_last_block_is_discarded() {
        let text = format!("{SAMPLE}\nSemoga membantu!\n");
        let result = parse(&text).unwrap();
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn no_recommendations_is_still_valid() {
        let text = "Target_Tonase_Ekstrak: 80\nPrediksi_Kontrol: 75\n---END_ANALYSIS---\n";
        let result = parse(text).unwrap();
        assert!(result.recommendations.is_empty());
        assert_eq!(result.initial_analysis_text, "");
    }

    #[test]
    fn render_then_parse_preserves_values_and_order() {
        let original = mp_protocol::AnalysisResult {
            target_tonnage: 120,
            initial_analysis_text: "Konfigurasi saat ini kurang.\nCuaca hujan menurunkan output.".into(),
            initial_prediction: 98.25,
            initial_difference: 21.75,
            recommendations: vec![
                Recommendation::from_scenario(
                    "Tambah Ekskavator",
                    Scenario::new(20, 5, 25, Weather::LightRain),
                    119.4,
                    0.6,
                    "Ekskavator menjadi bottleneck.",
                ),
                Recommendation::from_scenario(
                    "Tambah Truk dan Operator",
                    Scenario::new(24, 4, 30, Weather::LightRain),
                    117.1,
                    2.9,
                    "Lebih banyak siklus angkut.",
                ),
                Recommendation::from_scenario(
                    "Kontrol",
                    Scenario::new(20, 4, 25, Weather::LightRain),
                    98.25,
                    21.75,
                    "Tanpa perubahan.",
                ),
            ],
        };

        let parsed = parse(&render(&original)).unwrap();
        assert_eq!(parsed, original);
    }
}
