//! Satisfaction surveys attached to completed requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::request::RequestId;
use super::timestamps::utc_timestamp;
use crate::error::{CommdeskError, Result};

/// Unique identifier for an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationId(pub String);

impl EvaluationId {
    pub fn new() -> Self {
        EvaluationId(Uuid::new_v4().simple().to_string())
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.chars().take(8).collect::<String>())
    }
}

/// How satisfied the requester was with the delivered work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SatisfactionLevel {
    #[serde(rename = "Não Satisfeito")]
    NotSatisfied,
    #[serde(rename = "Parcialmente Satisfeito")]
    PartiallySatisfied,
    #[serde(rename = "Satisfeito")]
    Satisfied,
}

impl SatisfactionLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SatisfactionLevel::NotSatisfied => "Não Satisfeito",
            SatisfactionLevel::PartiallySatisfied => "Parcialmente Satisfeito",
            SatisfactionLevel::Satisfied => "Satisfeito",
        }
    }
}

impl fmt::Display for SatisfactionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SatisfactionLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "Não Satisfeito" => Ok(SatisfactionLevel::NotSatisfied),
            "Parcialmente Satisfeito" => Ok(SatisfactionLevel::PartiallySatisfied),
            "Satisfeito" => Ok(SatisfactionLevel::Satisfied),
            _ => Err(format!("Invalid satisfaction level: {}", s)),
        }
    }
}

/// Characteristics a requester can ascribe to the delivered piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    #[serde(rename = "Objetiva")]
    Objective,
    #[serde(rename = "Assertiva")]
    Assertive,
    #[serde(rename = "Criativa")]
    Creative,
    #[serde(rename = "Básica")]
    Basic,
    #[serde(rename = "Nenhuma das anteriores")]
    NoneOfTheAbove,
    /// Free-text characteristics follow in `other_characteristics`
    #[serde(rename = "Outras")]
    Other,
}

impl Characteristic {
    pub const ALL: [Characteristic; 6] = [
        Characteristic::Objective,
        Characteristic::Assertive,
        Characteristic::Creative,
        Characteristic::Basic,
        Characteristic::NoneOfTheAbove,
        Characteristic::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Characteristic::Objective => "Objetiva",
            Characteristic::Assertive => "Assertiva",
            Characteristic::Creative => "Criativa",
            Characteristic::Basic => "Básica",
            Characteristic::NoneOfTheAbove => "Nenhuma das anteriores",
            Characteristic::Other => "Outras",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Survey answers as submitted by the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationInput {
    /// Delivered within the expected timeframe
    #[serde(rename = "entregaNoTempoEsperado")]
    pub on_time: bool,
    /// The piece met the requester's expectations/objectives
    #[serde(rename = "atendeuExpectativas")]
    pub met_expectations: bool,
    #[serde(rename = "grauSatisfacao")]
    pub satisfaction: SatisfactionLevel,
    #[serde(rename = "caracteristicas")]
    pub characteristics: Vec<Characteristic>,
    #[serde(
        rename = "outrasCaracteristicas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub other_characteristics: Option<String>,
}

impl EvaluationInput {
    /// Check the rules the survey form enforces before submission.
    ///
    /// At least one characteristic must be picked, and picking
    /// [`Characteristic::Other`] requires describing them.
    pub fn validate(&self) -> Result<()> {
        if self.characteristics.is_empty() {
            return Err(CommdeskError::ValidationError(
                "Select at least one characteristic".to_string(),
            ));
        }

        let needs_description = self.characteristics.contains(&Characteristic::Other);
        let described = self
            .other_characteristics
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty());
        if needs_description && !described {
            return Err(CommdeskError::ValidationError(
                "Describe the other characteristics".to_string(),
            ));
        }

        Ok(())
    }

    /// Drop repeated characteristics (keeping first occurrence order) and
    /// blank free text.
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.characteristics.len());
        self.characteristics.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(*c);
                true
            }
        });
        self.other_characteristics = self
            .other_characteristics
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        self
    }
}

/// A stored satisfaction survey.
///
/// Holds only the id of the request it rates; the request owns the survey,
/// not the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    #[serde(rename = "solicitacaoId")]
    pub request_id: RequestId,
    #[serde(rename = "entregaNoTempoEsperado")]
    pub on_time: bool,
    #[serde(rename = "atendeuExpectativas")]
    pub met_expectations: bool,
    #[serde(rename = "grauSatisfacao")]
    pub satisfaction: SatisfactionLevel,
    #[serde(rename = "caracteristicas")]
    pub characteristics: Vec<Characteristic>,
    #[serde(
        rename = "outrasCaracteristicas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub other_characteristics: Option<String>,
    #[serde(rename = "createdAt", with = "utc_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Evaluation {
    /// Stamp survey answers with a fresh id and creation time.
    pub fn from_input(request_id: RequestId, input: EvaluationInput) -> Self {
        Self {
            id: EvaluationId::new(),
            request_id,
            on_time: input.on_time,
            met_expectations: input.met_expectations,
            satisfaction: input.satisfaction,
            characteristics: input.characteristics,
            other_characteristics: input.other_characteristics,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(characteristics: Vec<Characteristic>, other: Option<&str>) -> EvaluationInput {
        EvaluationInput {
            on_time: true,
            met_expectations: true,
            satisfaction: SatisfactionLevel::Satisfied,
            characteristics,
            other_characteristics: other.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_requires_a_characteristic() {
        let err = input(vec![], None).validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_other_requires_description() {
        assert!(input(vec![Characteristic::Other], None).validate().is_err());
        assert!(
            input(vec![Characteristic::Other], Some("   "))
                .validate()
                .is_err()
        );
        assert!(
            input(vec![Characteristic::Other], Some("Didática"))
                .validate()
                .is_ok()
        );
        assert!(input(vec![Characteristic::Creative], None).validate().is_ok());
    }

    #[test]
    fn test_normalized_dedupes_and_trims() {
        let normalized = input(
            vec![
                Characteristic::Creative,
                Characteristic::Objective,
                Characteristic::Creative,
            ],
            Some("  "),
        )
        .normalized();
        assert_eq!(
            normalized.characteristics,
            vec![Characteristic::Creative, Characteristic::Objective]
        );
        assert_eq!(normalized.other_characteristics, None);
    }

    #[test]
    fn test_wire_labels() {
        let json = r#"{
            "entregaNoTempoEsperado": false,
            "atendeuExpectativas": true,
            "grauSatisfacao": "Parcialmente Satisfeito",
            "caracteristicas": ["Básica", "Outras"],
            "outrasCaracteristicas": "Poderia ser mais colorida"
        }"#;
        let parsed: EvaluationInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.satisfaction, SatisfactionLevel::PartiallySatisfied);
        assert_eq!(
            parsed.characteristics,
            vec![Characteristic::Basic, Characteristic::Other]
        );
        assert!(parsed.validate().is_ok());

        assert_eq!(
            "Não Satisfeito".parse::<SatisfactionLevel>().unwrap(),
            SatisfactionLevel::NotSatisfied
        );
        assert!("Muito Satisfeito".parse::<SatisfactionLevel>().is_err());
    }
}
