//! Range validation and risk classification of a single reading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SYSTOLIC_MIN: i32 = 70;
pub const SYSTOLIC_MAX: i32 = 250;
pub const DIASTOLIC_MIN: i32 = 40;
pub const DIASTOLIC_MAX: i32 = 150;

/// Alert threshold used by [`is_high_pressure`]. Independent of the
/// classification ladder below.
pub const SYSTOLIC_HIGH: i32 = 140;
pub const DIASTOLIC_HIGH: i32 = 90;

pub const INVALID_PRESSURE_MESSAGE: &str =
    "Valores de pressão inválidos. Verifique os valores inseridos.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", INVALID_PRESSURE_MESSAGE)]
    InvalidPressure { systolic: i32, diastolic: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PressureCategory {
    Normal,
    PreHypertension,
    #[serde(rename = "HYPERTENSION_1")]
    Hypertension1,
    #[serde(rename = "HYPERTENSION_2")]
    Hypertension2,
    Critical,
}

/// RGB color token attached to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CategoryColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl PressureCategory {
    pub const ALL: [PressureCategory; 5] = [
        PressureCategory::Normal,
        PressureCategory::PreHypertension,
        PressureCategory::Hypertension1,
        PressureCategory::Hypertension2,
        PressureCategory::Critical,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PressureCategory::Normal => "NORMAL",
            PressureCategory::PreHypertension => "PRE_HYPERTENSION",
            PressureCategory::Hypertension1 => "HYPERTENSION_1",
            PressureCategory::Hypertension2 => "HYPERTENSION_2",
            PressureCategory::Critical => "CRITICAL",
        }
    }

    /// User-facing risk message shown next to a reading.
    pub fn label(&self) -> &'static str {
        match self {
            PressureCategory::Normal => "Pressão Normal",
            PressureCategory::PreHypertension => "Pré-Hipertensão",
            PressureCategory::Hypertension1 => "Hipertensão Estágio 1",
            PressureCategory::Hypertension2 => "Hipertensão Estágio 2",
            PressureCategory::Critical => "Crise Hipertensiva - Procure atendimento médico!",
        }
    }

    pub fn color(&self) -> CategoryColor {
        match self {
            PressureCategory::Normal => CategoryColor::new(0x4C, 0xAF, 0x50),
            PressureCategory::PreHypertension => CategoryColor::new(0xFF, 0x98, 0x00),
            PressureCategory::Hypertension1 => CategoryColor::new(0xF4, 0x43, 0x36),
            PressureCategory::Hypertension2 => CategoryColor::new(0xD3, 0x2F, 0x2F),
            PressureCategory::Critical => CategoryColor::new(0xB7, 0x1C, 0x1C),
        }
    }
}

pub fn is_valid_pressure(systolic: i32, diastolic: i32) -> bool {
    (SYSTOLIC_MIN..=SYSTOLIC_MAX).contains(&systolic)
        && (DIASTOLIC_MIN..=DIASTOLIC_MAX).contains(&diastolic)
        && systolic > diastolic
}

pub fn validate(systolic: i32, diastolic: i32) -> Result<(), ValidationError> {
    if is_valid_pressure(systolic, diastolic) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPressure {
            systolic,
            diastolic,
        })
    }
}

/// First matching rung wins, so either reading alone can raise the category.
pub fn classify_pressure(systolic: i32, diastolic: i32) -> PressureCategory {
    if systolic >= 180 || diastolic >= 120 {
        PressureCategory::Critical
    } else if systolic >= 160 || diastolic >= 100 {
        PressureCategory::Hypertension2
    } else if systolic >= 140 || diastolic >= 90 {
        PressureCategory::Hypertension1
    } else if systolic >= 120 || diastolic >= 80 {
        PressureCategory::PreHypertension
    } else {
        PressureCategory::Normal
    }
}

pub fn is_high_pressure(systolic: i32, diastolic: i32) -> bool {
    systolic >= SYSTOLIC_HIGH || diastolic >= DIASTOLIC_HIGH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_matches_range_and_ordering_rule() {
        for systolic in 0..=300 {
            for diastolic in (0..=200).step_by(3) {
                let expected = (70..=250).contains(&systolic)
                    && (40..=150).contains(&diastolic)
                    && systolic > diastolic;
                assert_eq!(
                    is_valid_pressure(systolic, diastolic),
                    expected,
                    "{systolic}/{diastolic}"
                );
            }
        }
    }

    #[test]
    fn validity_edges() {
        assert!(is_valid_pressure(70, 40));
        assert!(is_valid_pressure(250, 150));
        assert!(!is_valid_pressure(69, 40));
        assert!(!is_valid_pressure(251, 100));
        assert!(!is_valid_pressure(120, 39));
        assert!(!is_valid_pressure(200, 151));
        assert!(!is_valid_pressure(100, 100));
        assert!(!is_valid_pressure(300, 60));
    }

    #[test]
    fn validate_reports_fixed_message() {
        let err = validate(300, 60).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidPressure {
                systolic: 300,
                diastolic: 60
            }
        );
        assert_eq!(err.to_string(), INVALID_PRESSURE_MESSAGE);
        assert!(validate(120, 80).is_ok());
    }

    #[test]
    fn ladder_boundaries() {
        assert_eq!(classify_pressure(119, 79), PressureCategory::Normal);
        assert_eq!(classify_pressure(120, 79), PressureCategory::PreHypertension);
        assert_eq!(classify_pressure(139, 89), PressureCategory::PreHypertension);
        assert_eq!(classify_pressure(140, 89), PressureCategory::Hypertension1);
        assert_eq!(classify_pressure(159, 99), PressureCategory::Hypertension1);
        assert_eq!(classify_pressure(160, 99), PressureCategory::Hypertension2);
        assert_eq!(classify_pressure(179, 119), PressureCategory::Hypertension2);
        assert_eq!(classify_pressure(180, 70), PressureCategory::Critical);
    }

    #[test]
    fn either_reading_alone_raises_category() {
        assert_eq!(classify_pressure(110, 121), PressureCategory::Critical);
        assert_eq!(classify_pressure(100, 80), PressureCategory::PreHypertension);
        assert_eq!(classify_pressure(115, 95), PressureCategory::Hypertension1);
        assert_eq!(classify_pressure(165, 60), PressureCategory::Hypertension2);
    }

    #[test]
    fn high_pressure_uses_its_own_threshold() {
        assert!(!is_high_pressure(130, 85));
        assert_eq!(classify_pressure(130, 85), PressureCategory::PreHypertension);
        assert!(is_high_pressure(140, 70));
        assert!(is_high_pressure(110, 90));
        assert!(!is_high_pressure(139, 89));
    }

    #[test]
    fn label_and_color_table() {
        let table = [
            (PressureCategory::Normal, "Pressão Normal", "#4CAF50"),
            (PressureCategory::PreHypertension, "Pré-Hipertensão", "#FF9800"),
            (PressureCategory::Hypertension1, "Hipertensão Estágio 1", "#F44336"),
            (PressureCategory::Hypertension2, "Hipertensão Estágio 2", "#D32F2F"),
            (
                PressureCategory::Critical,
                "Crise Hipertensiva - Procure atendimento médico!",
                "#B71C1C",
            ),
        ];
        for (category, label, hex) in table {
            assert_eq!(category.label(), label);
            assert_eq!(category.color().hex(), hex);
        }
    }

    #[test]
    fn category_serializes_as_code() {
        for category in PressureCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.code()));
        }
    }
}
