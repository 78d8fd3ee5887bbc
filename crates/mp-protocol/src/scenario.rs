use serde::{Deserialize, Serialize};

/// Errors building a [`Scenario`] from untyped input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    #[error("expected {expected} features, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("feature '{name}' must be a non-negative integer, got {value}")]
    InvalidCount { name: &'static str, value: f64 },

    #[error("unknown weather code {0}")]
    UnknownWeather(i64),
}

/// Weather condition on site. Encoded as a small integer feature for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub enum Weather {
    LightRain,
    Cloudy,
    Sunny,
}

/// Fixed label ↔ code table. Order is the model's encoding.
const WEATHER_TABLE: [(Weather, &str, u8); 3] = [
    (Weather::LightRain, "Light Rain", 0),
    (Weather::Cloudy, "Cloudy", 1),
    (Weather::Sunny, "Sunny", 2),
];

impl Weather {
    /// Numeric code fed to the model.
    pub fn code(self) -> u8 {
        WEATHER_TABLE
            .iter()
            .find(|(w, _, _)| *w == self)
            .map(|(_, _, code)| *code)
            .unwrap_or_default()
    }

    /// Human-readable label ("Light Rain", "Cloudy", "Sunny").
    pub fn label(self) -> &'static str {
        WEATHER_TABLE
            .iter()
            .find(|(w, _, _)| *w == self)
            .map(|(_, label, _)| *label)
            .unwrap_or_default()
    }

    pub fn from_code(code: i64) -> Option<Self> {
        WEATHER_TABLE
            .iter()
            .find(|(_, _, c)| i64::from(*c) == code)
            .map(|(w, _, _)| *w)
    }

    /// Case-insensitive label lookup; surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        WEATHER_TABLE
            .iter()
            .find(|(_, l, _)| l.eq_ignore_ascii_case(label))
            .map(|(w, _, _)| *w)
    }

    pub fn all() -> [Weather; 3] {
        [Weather::LightRain, Weather::Cloudy, Weather::Sunny]
    }
}

impl From<Weather> for u8 {
    fn from(w: Weather) -> Self {
        w.code()
    }
}

impl TryFrom<i64> for Weather {
    type Error = ScenarioError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Weather::from_code(code).ok_or(ScenarioError::UnknownWeather(code))
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One equipment/weather configuration fed to the prediction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scenario {
    pub trucks: u32,
    pub excavators: u32,
    pub operators: u32,
    pub weather: Weather,
}

/// Number of model input features per scenario.
pub const FEATURE_COUNT: usize = 4;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["trucks", "excavators", "operators", "weather"];

impl Scenario {
    pub fn new(trucks: u32, excavators: u32, operators: u32, weather: Weather) -> Self {
        Self {
            trucks,
            excavators,
            operators,
            weather,
        }
    }

    /// Feature vector in model order: `[trucks, excavators, operators, weather]`.
    pub fn features(&self) -> Vec<f64> {
        vec![
            f64::from(self.trucks),
            f64::from(self.excavators),
            f64::from(self.operators),
            f64::from(self.weather.code()),
        ]
    }

    /// Build a scenario from a raw feature vector (e.g. tool-call arguments).
    ///
    /// Counts must be whole and non-negative; the weather feature must be a
    /// known code.
    pub fn from_features(features: &[f64]) -> Result<Self, ScenarioError> {
        if features.len() != FEATURE_COUNT {
            return Err(ScenarioError::WrongLength {
                expected: FEATURE_COUNT,
                got: features.len(),
            });
        }

        let count = |idx: usize| -> Result<u32, ScenarioError> {
            let value = features[idx];
            if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
                return Err(ScenarioError::InvalidCount {
                    name: FEATURE_NAMES[idx],
                    value,
                });
            }
            Ok(value as u32)
        };

        let weather_raw = features[3];
        if weather_raw.fract() != 0.0 {
            return Err(ScenarioError::InvalidCount {
                name: "weather",
                value: weather_raw,
            });
        }

        Ok(Self {
            trucks: count(0)?,
            excavators: count(1)?,
            operators: count(2)?,
            weather: Weather::try_from(weather_raw as i64)?,
        })
    }
}

/// Output of the prediction model for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub scenario: Scenario,
    pub predicted_tonnage: f64,
}
