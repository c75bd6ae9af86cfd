//! Score aggregation: per-pillar averages and the overall maturity level.
//!
//! Everything here is pure: no I/O, no failure modes.

use serde::{Deserialize, Serialize};

use crate::questionnaire::AnswerSet;

/// Number of scale questions per pillar (`k.1`..`k.5`).
const SCALE_QUESTIONS_PER_PILLAR: u32 = 5;

/// One of the five thematic question groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Competence,
    Tools,
    Structure,
    Products,
    Strategy,
}

impl Pillar {
    pub const ALL: [Pillar; 5] = [
        Pillar::Competence,
        Pillar::Tools,
        Pillar::Structure,
        Pillar::Products,
        Pillar::Strategy,
    ];

    /// Catalog step that holds this pillar's questions.
    pub fn step(&self) -> u32 {
        match self {
            Self::Competence => 1,
            Self::Tools => 2,
            Self::Structure => 3,
            Self::Products => 4,
            Self::Strategy => 5,
        }
    }

    /// Short German name used in prompts and reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Competence => "Kompetenz",
            Self::Tools => "Tools",
            Self::Structure => "Struktur",
            Self::Products => "Produkte",
            Self::Strategy => "Strategie",
        }
    }

    /// Ids of the scale questions that make up this pillar's score.
    pub fn question_ids(&self) -> Vec<String> {
        let step = self.step();
        (1..=SCALE_QUESTIONS_PER_PILLAR)
            .map(|n| format!("{step}.{n}"))
            .collect()
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Competence => "competence",
            Self::Tools => "tools",
            Self::Structure => "structure",
            Self::Products => "products",
            Self::Strategy => "strategy",
        };
        write!(f, "{s}")
    }
}

/// Per-pillar averages on the 0–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PillarScores {
    pub competence: f64,
    pub tools: f64,
    pub structure: f64,
    pub products: f64,
    pub strategy: f64,
}

impl PillarScores {
    pub fn uniform(value: f64) -> Self {
        Self {
            competence: value,
            tools: value,
            structure: value,
            products: value,
            strategy: value,
        }
    }

    pub fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Competence => self.competence,
            Pillar::Tools => self.tools,
            Pillar::Structure => self.structure,
            Pillar::Products => self.products,
            Pillar::Strategy => self.strategy,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pillar, f64)> + '_ {
        Pillar::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    fn mean(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum::<f64>() / Pillar::ALL.len() as f64
    }

    /// Mean of all pillars rounded to two decimals (results payload precision).
    pub fn overall_precise(&self) -> f64 {
        round_to(self.mean(), 2)
    }

    /// Highest-scoring pillar. The earlier pillar wins a tie.
    pub fn strongest(&self) -> (Pillar, f64) {
        self.iter()
            .fold((Pillar::Competence, f64::MIN), |best, cur| {
                if cur.1 > best.1 { cur } else { best }
            })
    }

    /// Lowest-scoring pillar. The earlier pillar wins a tie.
    pub fn weakest(&self) -> (Pillar, f64) {
        self.iter()
            .fold((Pillar::Competence, f64::MAX), |worst, cur| {
                if cur.1 < worst.1 { cur } else { worst }
            })
    }
}

/// Ordinal maturity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaturityLabel {
    Beginner,
    Advanced,
    Competent,
    Expert,
    Pioneer,
}

impl MaturityLabel {
    /// Band for a rounded overall score. Lower bounds inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            Self::Pioneer
        } else if score >= 3.5 {
            Self::Expert
        } else if score >= 2.5 {
            Self::Competent
        } else if score >= 1.5 {
            Self::Advanced
        } else {
            Self::Beginner
        }
    }
}

impl std::fmt::Display for MaturityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Beginner => "Beginner",
            Self::Advanced => "Advanced",
            Self::Competent => "Competent",
            Self::Expert => "Expert",
            Self::Pioneer => "Pioneer",
        };
        write!(f, "{s}")
    }
}

/// Overall score with its band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallLevel {
    pub score: f64,
    pub label: MaturityLabel,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Mean of the numeric answers among `question_ids`, rounded to one decimal.
///
/// Ids without an answer and answers that do not parse as numbers are
/// skipped. Returns 0 when nothing is left.
pub fn average_score<S: AsRef<str>>(question_ids: &[S], answers: &AnswerSet) -> f64 {
    let values: Vec<f64> = question_ids
        .iter()
        .filter_map(|id| answers.get(id.as_ref()))
        .filter_map(|raw| parse_numeric(raw))
        .collect();

    if values.is_empty() {
        return 0.0;
    }
    round_to(values.iter().sum::<f64>() / values.len() as f64, 1)
}

/// Average score for every pillar.
pub fn pillar_scores(answers: &AnswerSet) -> PillarScores {
    let score = |p: Pillar| average_score(&p.question_ids(), answers);
    PillarScores {
        competence: score(Pillar::Competence),
        tools: score(Pillar::Tools),
        structure: score(Pillar::Structure),
        products: score(Pillar::Products),
        strategy: score(Pillar::Strategy),
    }
}

/// Overall maturity level: mean of the pillar scores, rounded to one decimal.
pub fn overall_level(scores: &PillarScores) -> OverallLevel {
    let score = round_to(scores.mean(), 1);
    OverallLevel {
        score,
        label: MaturityLabel::from_score(score),
    }
}

/// Descriptive label for an integer answer on the 1–5 scale.
pub fn scale_label(value: f64) -> Option<&'static str> {
    if value.fract() != 0.0 {
        return None;
    }
    match value as i64 {
        1 => Some("Sehr niedrig/Nicht vorhanden"),
        2 => Some("Grundlegendes Verständnis"),
        3 => Some("Fortgeschritten"),
        4 => Some("Sehr gut"),
        5 => Some("Exzellent"),
        _ => None,
    }
}

/// Label for a raw answer string, when it is a whole number on the scale.
pub fn scale_label_for(raw: &str) -> Option<&'static str> {
    parse_numeric(raw).and_then(scale_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn average_of_nothing_is_zero() {
        let a = answers(&[("1.1", "4")]);
        assert_eq!(average_score::<&str>(&[], &a), 0.0);
        assert_eq!(average_score(&["1.1", "1.2"], &AnswerSet::new()), 0.0);
    }

    #[test]
    fn average_of_numeric_answers() {
        assert_eq!(average_score(&["1.1"], &answers(&[("1.1", "3")])), 3.0);
        assert_eq!(
            average_score(&["1.1", "1.2"], &answers(&[("1.1", "2"), ("1.2", "4")])),
            3.0
        );
    }

    #[test]
    fn average_skips_non_numeric_and_missing() {
        let a = answers(&[("1.1", "2"), ("1.2", "a) Ja"), ("1.3", "")]);
        assert_eq!(average_score(&["1.1", "1.2", "1.3", "1.4"], &a), 2.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let a = answers(&[("1.1", "1"), ("1.2", "2"), ("1.3", "2")]);
        // 5 / 3 = 1.666...
        assert_eq!(average_score(&["1.1", "1.2", "1.3"], &a), 1.7);
    }

    #[test]
    fn pillar_scores_use_disjoint_groups() {
        let a = answers(&[
            ("1.1", "1"),
            ("1.2", "2"),
            ("1.3", "3"),
            ("1.4", "4"),
            ("1.5", "5"),
            ("1.6", "a) Individuelles Ausprobieren"),
            ("2.1", "5"),
            ("5.5", "2"),
        ]);
        let scores = pillar_scores(&a);
        assert_eq!(scores.competence, 3.0);
        assert_eq!(scores.tools, 5.0);
        assert_eq!(scores.structure, 0.0);
        assert_eq!(scores.products, 0.0);
        assert_eq!(scores.strategy, 2.0);
    }

    #[test]
    fn overall_level_extremes() {
        let top = overall_level(&PillarScores::uniform(5.0));
        assert_eq!(top.score, 5.0);
        assert_eq!(top.label, MaturityLabel::Pioneer);
        assert_eq!(top.label.to_string(), "Pioneer");

        let bottom = overall_level(&PillarScores::uniform(1.0));
        assert_eq!(bottom.score, 1.0);
        assert_eq!(bottom.label, MaturityLabel::Beginner);
    }

    #[test]
    fn label_boundaries() {
        assert_eq!(MaturityLabel::from_score(0.0), MaturityLabel::Beginner);
        assert_eq!(MaturityLabel::from_score(1.4), MaturityLabel::Beginner);
        assert_eq!(MaturityLabel::from_score(1.5), MaturityLabel::Advanced);
        assert_eq!(MaturityLabel::from_score(2.4), MaturityLabel::Advanced);
        assert_eq!(MaturityLabel::from_score(2.5), MaturityLabel::Competent);
        assert_eq!(MaturityLabel::from_score(3.5), MaturityLabel::Expert);
        assert_eq!(MaturityLabel::from_score(4.4), MaturityLabel::Expert);
        assert_eq!(MaturityLabel::from_score(4.5), MaturityLabel::Pioneer);
    }

    #[test]
    fn overall_level_rounds_before_banding() {
        // mean = 1.46 -> 1.5 -> Advanced
        let scores = PillarScores {
            competence: 1.5,
            tools: 1.5,
            structure: 1.4,
            products: 1.4,
            strategy: 1.5,
        };
        let level = overall_level(&scores);
        assert_eq!(level.score, 1.5);
        assert_eq!(level.label, MaturityLabel::Advanced);
    }

    #[test]
    fn strongest_and_weakest() {
        let scores = PillarScores {
            competence: 2.0,
            tools: 4.5,
            structure: 1.0,
            products: 4.5,
            strategy: 1.0,
        };
        assert_eq!(scores.strongest(), (Pillar::Tools, 4.5));
        assert_eq!(scores.weakest(), (Pillar::Structure, 1.0));
    }

    #[test]
    fn overall_precise_keeps_two_decimals() {
        let scores = PillarScores {
            competence: 3.3,
            tools: 2.1,
            structure: 4.0,
            products: 1.7,
            strategy: 2.2,
        };
        // 13.3 / 5 = 2.66
        assert_eq!(scores.overall_precise(), 2.66);
    }

    #[test]
    fn scale_labels() {
        assert_eq!(scale_label_for("1"), Some("Sehr niedrig/Nicht vorhanden"));
        assert_eq!(scale_label_for("5"), Some("Exzellent"));
        assert_eq!(scale_label_for("2.5"), None);
        assert_eq!(scale_label_for("6"), None);
        assert_eq!(scale_label_for("a) Ja"), None);
    }

    #[test]
    fn pillar_question_ids() {
        assert_eq!(
            Pillar::Products.question_ids(),
            vec!["4.1", "4.2", "4.3", "4.4", "4.5"]
        );
        assert_eq!(Pillar::Strategy.to_string(), "strategy");
    }
}
