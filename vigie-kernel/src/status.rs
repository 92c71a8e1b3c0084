/**
 * VOCABULAIRE DE STATUT - Codes d'état Centreon → libellés affichables
 *
 * RÔLE :
 * Traduit le code entier d'un état de service (0..=3) en libellé humain et en
 * classe CSS Bootstrap. Deux vocabulaires coexistent :
 * - Generic : OK / WARNING / CRITICAL / UNKNOWN (page historique)
 * - Lines   : LINES AVAILABLE / SOME ISSUES / LINES DOWN / UNKNOWN (page statut)
 *
 * Les classes CSS sont communes aux deux vocabulaires.
 * Un code hors de l'ensemble connu est une erreur, jamais un libellé par défaut.
 */

use crate::error::DashboardError;
use serde::Serialize;

/// Sévérité d'un état de service (ensemble fermé)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusCode {
    Ok,
    Warning,
    Critical,
    Unknown,
}

/// Jeu de libellés à utiliser selon la page rendue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    Generic,
    Lines,
}

impl StatusCode {
    pub const ALL: [StatusCode; 4] = [
        StatusCode::Ok,
        StatusCode::Warning,
        StatusCode::Critical,
        StatusCode::Unknown,
    ];

    pub fn label(self, vocabulary: Vocabulary) -> &'static str {
        match (vocabulary, self) {
            (Vocabulary::Generic, StatusCode::Ok) => "OK",
            (Vocabulary::Generic, StatusCode::Warning) => "WARNING",
            (Vocabulary::Generic, StatusCode::Critical) => "CRITICAL",
            (Vocabulary::Lines, StatusCode::Ok) => "LINES AVAILABLE",
            (Vocabulary::Lines, StatusCode::Warning) => "SOME ISSUES",
            (Vocabulary::Lines, StatusCode::Critical) => "LINES DOWN",
            (_, StatusCode::Unknown) => "UNKNOWN",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            StatusCode::Ok => "label-success",
            StatusCode::Warning => "label-warning",
            StatusCode::Critical => "label-danger",
            StatusCode::Unknown => "label-default",
        }
    }
}

impl TryFrom<i64> for StatusCode {
    type Error = DashboardError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(StatusCode::Ok),
            1 => Ok(StatusCode::Warning),
            2 => Ok(StatusCode::Critical),
            3 => Ok(StatusCode::Unknown),
            other => Err(DashboardError::UnknownStatusCode(other)),
        }
    }
}

impl From<StatusCode> for i64 {
    fn from(code: StatusCode) -> Self {
        match code {
            StatusCode::Ok => 0,
            StatusCode::Warning => 1,
            StatusCode::Critical => 2,
            StatusCode::Unknown => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_label_and_class() {
        for code in StatusCode::ALL {
            for vocabulary in [Vocabulary::Generic, Vocabulary::Lines] {
                assert!(!code.label(vocabulary).is_empty());
            }
            assert!(!code.css_class().is_empty());
        }
    }

    #[test]
    fn test_vocabularies_differ_but_classes_shared() {
        assert_eq!(StatusCode::Ok.label(Vocabulary::Generic), "OK");
        assert_eq!(StatusCode::Ok.label(Vocabulary::Lines), "LINES AVAILABLE");
        assert_eq!(StatusCode::Critical.label(Vocabulary::Lines), "LINES DOWN");
        assert_eq!(StatusCode::Unknown.label(Vocabulary::Lines), "UNKNOWN");
        assert_eq!(StatusCode::Warning.css_class(), "label-warning");
    }

    #[test]
    fn test_code_conversion() {
        for code in StatusCode::ALL {
            assert_eq!(StatusCode::try_from(i64::from(code)).unwrap(), code);
        }
        assert!(matches!(
            StatusCode::try_from(5),
            Err(DashboardError::UnknownStatusCode(5))
        ));
        assert!(StatusCode::try_from(-1).is_err());
    }
}
