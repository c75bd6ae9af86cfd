//! Markdown export of a finished analysis.

use std::fmt::Write;

use crate::catalog::Catalog;
use crate::narrative::{CategoryAnalysis, FocusItem};
use crate::questionnaire::{AnalysisOutcome, AnswerSet};
use crate::scoring::Pillar;

/// Render the analysis as a standalone markdown document.
pub fn render_report(catalog: &Catalog, answers: &AnswerSet, outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();
    write_report(&mut out, catalog, answers, outcome).expect("writing to a String cannot fail");
    out
}

fn write_report(
    out: &mut String,
    catalog: &Catalog,
    answers: &AnswerSet,
    outcome: &AnalysisOutcome,
) -> std::fmt::Result {
    writeln!(out, "# KI-Reifegrad Analyse")?;
    writeln!(out)?;
    writeln!(out, "Erstellt am {}", outcome.generated_at.format("%d.%m.%Y"))?;
    writeln!(out)?;
    writeln!(
        out,
        "**Gesamtreifegrad:** {:.1} / 5 ({})",
        outcome.level.score, outcome.level.label
    )?;
    writeln!(out)?;

    writeln!(out, "## Reifegrad nach Bereich")?;
    writeln!(out)?;
    writeln!(out, "| Bereich | Wert |")?;
    writeln!(out, "|---|---|")?;
    for (pillar, score) in outcome.scores.iter() {
        writeln!(out, "| {} | {:.1} |", pillar.display_name(), score)?;
    }
    writeln!(out)?;

    let (strongest, high) = outcome.scores.strongest();
    let (weakest, low) = outcome.scores.weakest();
    writeln!(out, "- Stärkster Bereich: {} ({:.1})", strongest.display_name(), high)?;
    writeln!(out, "- Größtes Potenzial: {} ({:.1})", weakest.display_name(), low)?;
    writeln!(out)?;

    writeln!(out, "## Analyse")?;
    writeln!(out)?;
    writeln!(out, "{}", outcome.narrative.trim())?;
    writeln!(out)?;

    if !outcome.category_analyses.is_empty() {
        writeln!(out, "## Analyse nach Bereich")?;
        writeln!(out)?;
        for (pillar, analysis) in &outcome.category_analyses {
            write_category(out, *pillar, outcome.scores.get(*pillar), analysis)?;
        }
    }

    write_focus(out, "Quick Wins", &outcome.focus_areas.quick_wins)?;
    write_focus(out, "Strategische Initiativen", &outcome.focus_areas.strategic_focus)?;

    writeln!(out, "## Ihre Antworten")?;
    for step in catalog.steps() {
        writeln!(out)?;
        writeln!(out, "### {}. {}", step.id, step.title)?;
        writeln!(out)?;
        for question in &step.questions {
            let answer = answers
                .get(&question.id)
                .filter(|a| !a.trim().is_empty())
                .map(|a| question.display_answer(a))
                .unwrap_or_else(|| "–".to_string());
            writeln!(out, "- **{}** {}: {}", question.id, question.text, answer)?;
        }
    }
    Ok(())
}

fn write_category(
    out: &mut String,
    pillar: Pillar,
    score: f64,
    analysis: &CategoryAnalysis,
) -> std::fmt::Result {
    writeln!(out, "### {} ({:.1})", pillar.display_name(), score)?;
    writeln!(out)?;
    for line in &analysis.summary {
        writeln!(out, "- {line}")?;
    }
    if !analysis.recommendations.is_empty() {
        writeln!(out)?;
        writeln!(out, "Empfehlungen:")?;
        writeln!(out)?;
        for line in &analysis.recommendations {
            writeln!(out, "- {line}")?;
        }
    }
    writeln!(out)
}

fn write_focus(out: &mut String, heading: &str, items: &[FocusItem]) -> std::fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "## {heading}")?;
    writeln!(out)?;
    for item in items {
        writeln!(out, "- **{}** ({}): {}", item.title, item.timeline, item.description)?;
    }
    writeln!(out)
}
