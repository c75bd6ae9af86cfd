//! Prompt builders for the analysis narrative, focus areas and per-pillar
//! analysis. All prompts are German, matching the questionnaire.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::Catalog;
use crate::questionnaire::AnswerSet;
use crate::scoring::PillarScores;

const NOT_ANSWERED: &str = "Nicht angegeben";

static OPTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[a-z]\)\s*").expect("option prefix pattern is valid"));

/// Remove `a) `-style option markers from the start of every answer line.
pub fn strip_option_prefix(answer: &str) -> String {
    OPTION_PREFIX.replace_all(answer, "").into_owned()
}

pub const NARRATIVE_SYSTEM: &str = "\
Du bist ein erfahrener KI-Berater für kleine und mittlere Unternehmen. \
Du schreibst klar, konkret und auf Deutsch.";

/// Prompt for the markdown analysis shown on the result page.
pub fn narrative_prompt(catalog: &Catalog, answers: &AnswerSet) -> String {
    let mut profile = String::new();
    for step in catalog.steps() {
        profile.push_str(&format!("\n## {}\n", step.title));
        for question in &step.questions {
            let answer = answers
                .get(&question.id)
                .filter(|a| !a.trim().is_empty())
                .map(|a| question.display_answer(&strip_option_prefix(a)))
                .unwrap_or_else(|| NOT_ANSWERED.to_string());
            profile.push_str(&format!("- {}: {}\n", question.text, answer));
        }
    }

    format!(
        "\
# KI-Reifegradanalyse und Handlungsempfehlungen

Bitte erstelle eine detaillierte Analyse basierend auf den folgenden Antworten.
{profile}
## Anweisungen für die Analyse

1. **Aktueller Status**
   - Fasse die wichtigsten Punkte aus den Antworten zusammen
   - Zeige auf, welche Aspekte besonders dringlich sind und wo die größten Potenziale liegen

2. **Empfohlene Maßnahmen**
   - Ordne die individuellen Ziele und Herausforderungen ein
   - Gib konkrete Handlungsschritte für das KI-Mentoring an

3. **Zeitplanung & Priorisierung**
   - Erkläre die optimale Aufteilung von 4-8 Stunden pro Woche:
     - 2-3 Stunden für Mentoring-Sessions
     - 1 Stunde für Tools und Community
     - 1-2 Stunden für Implementierung
   - Berücksichtige flexible Anpassungen bei weniger Kapazität

4. **Vorgehensweise im KI-Mentoring**
   - Leite konkrete nächste Schritte ab
   - Betone die Bedeutung von Konsistenz

5. **Umsetzung & Tools**
   - Empfehle passende Tools und Ressourcen
   - Gib Datenschutz-Hinweise für die Integration

Formatiere die Analyse mit Markdown und strukturiere sie klar in die genannten Abschnitte.

Beginne direkt mit der Analyse, ohne einleitende Erklärungen."
    )
}

/// Prompt asking for quick wins and strategic initiatives as JSON.
pub fn focus_areas_prompt(answers: &AnswerSet, scores: &PillarScores) -> String {
    let answer_lines = answers
        .iter()
        .map(|(id, value)| format!("{id}: {}", strip_option_prefix(value)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
Analysiere die folgenden KI-Reifegradwerte und Antworten, um konkrete Handlungsempfehlungen zu generieren:

Reifegradwerte (0-5):
- Kompetenz: {competence}
- Tools: {tools}
- Struktur: {structure}
- Produkte: {products}
- Strategie: {strategy}

Antworten des Nutzers:
{answer_lines}

Generiere zwei Arten von Empfehlungen:

1. Quick Wins (Umsetzung in 1-4 Wochen)
2. Strategische Initiativen (Umsetzung in 2-6 Monaten)

Liefere NUR ein JSON-Objekt mit folgendem Format:
{{
  "quickWins": [
    {{
      "title": "Kurzer, prägnanter Titel",
      "description": "Konkrete Beschreibung der Maßnahme",
      "baseAnswer": "Ursprüngliche Antwort des Nutzers",
      "timeline": "2-3 Wochen"
    }}
  ],
  "strategicFocus": [
    {{
      "title": "Kurzer, prägnanter Titel",
      "description": "Konkrete Beschreibung der Initiative",
      "baseAnswer": "Ursprüngliche Antwort des Nutzers",
      "timeline": "3-4 Monate"
    }}
  ]
}}

Wichtige Hinweise:
- Generiere je 3 Empfehlungen pro Kategorie
- Beziehe dich auf konkrete Antworten und Scores
- Priorisiere Bereiche mit niedrigen Scores
- Verwende realistische Zeitrahmen
- Formuliere alles auf Deutsch
- Stelle sicher, dass die Antwort ein valides JSON-Objekt ist
"#,
        competence = scores.competence,
        tools = scores.tools,
        structure = scores.structure,
        products = scores.products,
        strategy = scores.strategy,
    )
}

/// Qualitative level used in the category prompt.
pub fn score_level(score: f64) -> &'static str {
    if score <= 2.0 {
        "grundlegendes"
    } else if score <= 3.0 {
        "fortgeschrittenes"
    } else if score <= 4.0 {
        "sehr gutes"
    } else {
        "exzellentes"
    }
}

/// Prompt for the observations/recommendations of a single pillar.
pub fn category_prompt(category: &str, answers: &AnswerSet, score: f64) -> String {
    let answer_lines = answers
        .values()
        .map(|value| format!("- {}", strip_option_prefix(value)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
Analysiere den folgenden Bereich der KI-Reife: "{category}"

Quantitative Bewertung: {score}/5.0 ({level} Niveau)

Die Antworten zeigen:
{answer_lines}

Bitte erstelle:
1. 2-3 prägnante Beobachtungen zum aktuellen Stand, die direkt auf den Antworten basieren
2. 2-3 konkrete, umsetzbare Handlungsempfehlungen zur Verbesserung

Liefere NUR ein JSON-Objekt mit zwei Arrays:
{{
  "summary": ["Beobachtung 1", "Beobachtung 2"],
  "recommendations": ["Empfehlung 1", "Empfehlung 2"]
}}

Wichtige Hinweise:
- Beziehe dich DIREKT auf die konkreten Antworten, nicht auf abstrakte Konzepte
- Vermeide Referenzen auf Fragenummern oder technische IDs
- Halte jeden Punkt prägnant (max. 100 Zeichen)
- Formuliere alles auf Deutsch
"#,
        level = score_level(score),
    )
}
