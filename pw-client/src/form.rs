//! Prediction form state and validation
//!
//! [`PredictionForm`] holds the raw text of the eight health metrics exactly as
//! typed. [`PredictionForm::validate`] turns it into a [`PredictionRequest`] or
//! names the first offending field.

use pw_common::api::PredictionRequest;

/// One input of the prediction form, in declared order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigree,
    Age,
}

impl Field {
    /// All fields in the order they are displayed and validated
    pub const ALL: [Field; 8] = [
        Field::Pregnancies,
        Field::Glucose,
        Field::BloodPressure,
        Field::SkinThickness,
        Field::Insulin,
        Field::Bmi,
        Field::DiabetesPedigree,
        Field::Age,
    ];

    /// JSON key used on the wire
    pub fn key(self) -> &'static str {
        match self {
            Field::Pregnancies => "pregnancies",
            Field::Glucose => "glucose",
            Field::BloodPressure => "bloodPressure",
            Field::SkinThickness => "skinThickness",
            Field::Insulin => "insulin",
            Field::Bmi => "bmi",
            Field::DiabetesPedigree => "diabetesPedigree",
            Field::Age => "age",
        }
    }

    /// Display label: the key with its first letter upper-cased
    pub fn label(self) -> &'static str {
        match self {
            Field::Pregnancies => "Pregnancies",
            Field::Glucose => "Glucose",
            Field::BloodPressure => "BloodPressure",
            Field::SkinThickness => "SkinThickness",
            Field::Insulin => "Insulin",
            Field::Bmi => "Bmi",
            Field::DiabetesPedigree => "DiabetesPedigree",
            Field::Age => "Age",
        }
    }

    /// Input granularity hint for renderers
    pub fn step(self) -> f64 {
        match self {
            Field::Bmi | Field::DiabetesPedigree => 0.1,
            _ => 1.0,
        }
    }

    /// Look a field up by wire key
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Validation failure message for `field`
pub fn invalid_number_message(field: Field) -> String {
    format!("Please enter a valid number for {}.", field.label())
}

/// Current raw values of the eight form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionForm {
    values: [String; 8],
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one field's text (called on every keystroke)
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Builder-style setter
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn clear(&mut self) {
        self.values = Default::default();
    }

    /// Check every field in declared order
    ///
    /// Pure: returns the parsed request, or the message naming the first field
    /// that is blank, unparseable or non-finite.
    pub fn validate(&self) -> Result<PredictionRequest, String> {
        let mut parsed = [0.0_f64; 8];

        for field in Field::ALL {
            parsed[field.index()] =
                parse_number(self.get(field)).ok_or_else(|| invalid_number_message(field))?;
        }

        let [pregnancies, glucose, blood_pressure, skin_thickness, insulin, bmi, diabetes_pedigree, age] =
            parsed;

        Ok(PredictionRequest {
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree,
            age,
        })
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
