//! The built-in KI-Reifegrad question catalog.
//!
//! Five steps, one per pillar. Questions `k.1`..`k.5` of step `k` are 1–5
//! ratings and feed the pillar score; the rest add qualitative context for
//! the narrative.

use super::model::{Catalog, Question, Step};

/// Build the maturity assessment catalog.
pub fn maturity_catalog() -> Catalog {
    Catalog::new(maturity_steps()).expect("built-in catalog satisfies catalog invariants")
}

fn maturity_steps() -> Vec<Step> {
    vec![
        Step {
            id: 1,
            title: "Kompetenz aufbauen".into(),
            description: "Hier bewerten wir das vorhandene Wissen und die Lernkultur bezüglich KI \
                          in Ihrem Unternehmen / Ihrer Tätigkeit."
                .into(),
            questions: vec![
                Question::scale(
                    "1.1",
                    "Grundverständnis: Wie bewerten Sie das vorhandene Grundverständnis über \
                     Funktionsweise und Einsatzmöglichkeiten generativer KI?",
                ),
                Question::scale(
                    "1.2",
                    "Bedarfsanalyse: Wie systematisch wurde der KI-Kompetenzbedarf für \
                     unterschiedliche Rollen und Aufgaben analysiert und dokumentiert?",
                ),
                Question::scale(
                    "1.3",
                    "Kontinuierliche Weiterbildung: Inwieweit ist ein strukturierter Prozess für \
                     die kontinuierliche KI-Weiterbildung etabliert?",
                ),
                Question::scale(
                    "1.4",
                    "Praktische Anwendung: Wie hoch schätzen Sie die Fähigkeit ein, KI-Tools \
                     gezielt und effektiv für konkrete Arbeitsaufgaben zu nutzen?",
                ),
                Question::scale(
                    "1.5",
                    "Interner Wissensaustausch: Wie etabliert und effektiv sind interne \
                     Mechanismen für den Austausch von KI-Wissen und -Erfahrungen?",
                ),
                Question::multi_choice(
                    "1.6",
                    "Wie wird KI-Wissen aktuell hauptsächlich erworben und geteilt?",
                    [
                        "a) Individuelles Ausprobieren und gelegentliche Internetrecherche",
                        "b) Besuch von einmaligen, unspezifischen Webinaren oder Workshops",
                        "c) Über interne \"Enthusiasten\", die ihr Wissen informell weitergeben",
                        "d) Durch strukturierte, begleitete Lernformate",
                        "e) Es gibt keinen systematischen Ansatz zum Wissenserwerb/-teilung",
                    ],
                ),
                Question::free_text(
                    "1.7",
                    "(Optional) Welche gezielten Kompetenzen wurden zum Einsatz von generativer \
                     KI im Unternehmen aufgebaut?",
                    "Beschreiben Sie die Prozesse, die am meisten von verbesserter KI-Kompetenz \
                     profitieren würden...",
                    true,
                ),
            ],
        },
        Step {
            id: 2,
            title: "Tools gezielt einsetzen".into(),
            description: "Hier geht es darum, wie KI-Tools ausgewählt und implementiert werden."
                .into(),
            questions: vec![
                Question::scale(
                    "2.1",
                    "Prozessidentifikation & -analyse: Wie systematisch werden Geschäftsprozesse \
                     auf Potenziale für KI-gestützte Automatisierung untersucht?",
                ),
                Question::scale(
                    "2.2",
                    "Bedarfsorientierte Tool-Auswahl: Inwieweit basiert die Auswahl von KI-Tools \
                     auf einer klaren Anforderungsdefinition?",
                ),
                Question::scale(
                    "2.3",
                    "Strukturierte Evaluierung & Testung: Wie strukturiert ist die Erprobung \
                     potenzieller KI-Tools vor einer breiteren Einführung?",
                ),
                Question::scale(
                    "2.4",
                    "Integration in Arbeitsabläufe: Wie gut sind die eingesetzten KI-Tools in \
                     bestehende Arbeitsabläufe und IT-Systeme integriert?",
                ),
                Question::scale(
                    "2.5",
                    "Performance-Messung & Optimierung: Wie konsequent wird der Nutzen der \
                     eingesetzten KI-Tools gemessen und optimiert?",
                ),
                Question::multi_choice(
                    "2.6",
                    "Welcher Ansatz beschreibt am besten, wie neue KI-Tools identifiziert und \
                     ausgewählt werden?",
                    [
                        "a) Zufälliges Testen von Tools, die gerade populär sind oder empfohlen werden",
                        "b) Fokus auf die KI-Funktionen bereits genutzter Standardsoftware",
                        "c) Systematische Suche basierend auf definierten Prozessanforderungen",
                        "d) Orientierung an den Tools von Wettbewerbern oder Branchenführern",
                        "e) Bisher keine aktive Identifikation oder Auswahl von KI-Tools",
                    ],
                ),
                Question::free_text(
                    "2.7",
                    "Welcher wiederkehrende, zeitaufwändige Prozess könnte am dringendsten von \
                     einem passenden KI-Tool profitieren?",
                    "Beschreiben Sie den Prozess und den erwarteten Nutzen durch KI-Unterstützung...",
                    false,
                ),
            ],
        },
        Step {
            id: 3,
            title: "Struktur und Steuerung etablieren".into(),
            description: "Eine erfolgreiche KI-Integration benötigt klare Verantwortlichkeiten, \
                          messbare Ziele und eine aktive Steuerung durch die Führungsebene."
                .into(),
            questions: vec![
                Question::scale(
                    "3.1",
                    "Verantwortlichkeiten & Rollen: Wie klar sind Rollen und Verantwortlichkeiten \
                     für KI-Initiativen definiert und kommuniziert?",
                ),
                Question::scale(
                    "3.2",
                    "Zieldefinition & Messbarkeit: Inwieweit sind messbare Ziele für \
                     KI-Initiativen definiert?",
                ),
                Question::scale(
                    "3.3",
                    "Management Commitment: Wie stark ist die aktive Unterstützung der \
                     Geschäftsführung für die strategische Integration von KI?",
                ),
                Question::scale(
                    "3.4",
                    "Reporting & Controlling: Wie etabliert ist ein regelmäßiger Prozess zur \
                     Überwachung und Anpassung von KI-Projekten?",
                ),
                Question::scale(
                    "3.5",
                    "Ressourcenallokation: Inwieweit werden die notwendigen Ressourcen für \
                     KI-Initiativen systematisch geplant und bereitgestellt?",
                ),
                Question::multi_choice(
                    "3.6",
                    "Was ist die größte Herausforderung bei der Umsetzung und Steuerung von \
                     KI-Projekten?",
                    [
                        "a) Fehlende übergreifende KI-Strategie oder unklare Prioritäten",
                        "b) Schwierigkeiten, den Nutzen oder ROI von KI-Maßnahmen zu messen",
                        "c) Unklare Zuständigkeiten oder fehlende Projektmanagement-Strukturen",
                        "d) Zu wenig aktive Unterstützung durch die Führungsebene",
                        "e) Mangelnde Ressourcen (Zeit, Budget, Fachwissen) für die Umsetzung",
                    ],
                ),
                Question::multi_choice(
                    "3.7",
                    "Wie werden Entscheidungen über neue KI-Projekte oder Tools typischerweise \
                     getroffen?",
                    [
                        "a) Ad-hoc durch einzelne motivierte Mitarbeiter oder Abteilungen",
                        "b) Basierend auf kurzfristigen Gelegenheiten",
                        "c) Im Rahmen einer definierten KI-Strategie durch die Führungsebene",
                        "d) Durch einen formalisierten Bewertungsprozess für Potenzial und Risiko",
                        "e) Es gibt bisher keinen etablierten Entscheidungsprozess",
                    ],
                ),
                Question::free_text(
                    "3.8",
                    "Wenn Sie EINE Sache zur Verbesserung der Steuerung von KI-Aktivitäten sofort \
                     ändern könnten, welche wäre das und warum?",
                    "Beschreiben Sie die wichtigste Veränderung für bessere KI-Steuerung...",
                    false,
                ),
            ],
        },
        Step {
            id: 4,
            title: "Eigene KI-Produkte entwickeln".into(),
            description: "Auf Basis eigener Daten oder Expertise lassen sich maßgeschneiderte \
                          KI-Lösungen entwickeln, intern oder als Angebot für Kunden."
                .into(),
            questions: vec![
                Question::scale(
                    "4.1",
                    "Datenpotenzial-Bewertung: Wie systematisch wurde das Potenzial eigener Daten \
                     für eigene KI-Anwendungen bewertet?",
                ),
                Question::scale(
                    "4.2",
                    "Datenqualität & -zugänglichkeit: Wie bewerten Sie Struktur, Qualität und \
                     Zugänglichkeit interner Daten für KI-Anwendungen?",
                ),
                Question::scale(
                    "4.3",
                    "Use-Case-Definition: Wie klar sind potenzielle Anwendungsfälle für eigene \
                     KI-Produkte definiert?",
                ),
                Question::scale(
                    "4.4",
                    "Entwicklungskompetenz: Inwieweit ist das technische Know-how zur Entwicklung \
                     eigener KI-Lösungen verfügbar?",
                ),
                Question::scale(
                    "4.5",
                    "Strategische Priorität: Welche Priorität hat die Entwicklung eigener \
                     KI-basierter Lösungen aktuell?",
                ),
                Question::multi_choice(
                    "4.6",
                    "Welchen primären strategischen Nutzen würde eine eigene KI-Lösung bringen?",
                    [
                        "a) Effizienzsteigerung durch Automatisierung interner Prozesse",
                        "b) Bessere Servicequalität durch personalisierte KI-Unterstützung",
                        "c) Neue Geschäftsfelder durch datenbasierte Produkte/Services",
                        "d) Differenzierung vom Wettbewerb durch einzigartige KI-Fähigkeiten",
                        "e) Aktuell ist der Nutzen noch unklar oder das Thema hat keine Priorität",
                    ],
                ),
                Question::multi_choice(
                    "4.7",
                    "Was sehen Sie als größte Hürde bei der Entwicklung einer eigenen \
                     KI-Anwendung?",
                    [
                        "a) Fehlende oder unzureichend strukturierte Daten als Grundlage",
                        "b) Mangelndes internes technisches Know-how",
                        "c) Hoher Aufwand oder unklare Kosten/Nutzen-Rechnung (ROI)",
                        "d) Bedenken hinsichtlich Datenschutz und Sicherheit",
                        "e) Fehlende klare Idee für eine konkrete Anwendung",
                    ],
                ),
                Question::free_text(
                    "4.8",
                    "Beschreiben Sie kurz eine Idee für eine eigene KI-Anwendung, die auf Ihrem \
                     Wissen oder Ihren Daten aufbaut.",
                    "Beschreiben Sie Ihre Idee für eine eigene KI-Anwendung...",
                    false,
                ),
            ],
        },
        Step {
            id: 5,
            title: "Langfristige Strategien sicherstellen".into(),
            description: "Die KI-Landschaft entwickelt sich rasant. Dauerhafte \
                          Wettbewerbsfähigkeit erfordert Trend-Monitoring und kontinuierliche \
                          Anpassung."
                .into(),
            questions: vec![
                Question::scale(
                    "5.1",
                    "Trend & Technologie-Monitoring: Wie systematisch werden KI-Trends und neue \
                     Tools beobachtet und bewertet?",
                ),
                Question::scale(
                    "5.2",
                    "Strategische Anpassungsfähigkeit: Wie flexibel ist Ihre KI-Strategie \
                     gegenüber Markt- und Technologiesprüngen?",
                ),
                Question::scale(
                    "5.3",
                    "Kontinuierliche Optimierung: Wie etabliert ist die regelmäßige Überprüfung \
                     bestehender KI-Anwendungen?",
                ),
                Question::scale(
                    "5.4",
                    "Externes Netzwerk & Lernen: Wie aktiv nutzen Sie externe Quellen für den \
                     Wissensaufbau im Bereich KI?",
                ),
                Question::scale(
                    "5.5",
                    "Zukunftsorientierung: Wie intensiv setzen Sie sich mit Entwicklungen wie \
                     KI-Agenten auseinander?",
                ),
                Question::multi_choice(
                    "5.6",
                    "Wie gehen Sie mit der hohen Geschwindigkeit der KI-Entwicklung um?",
                    [
                        "a) Wir fühlen uns eher überfordert und reagieren abwartend",
                        "b) Wir verfolgen News nebenbei, aber ohne feste Struktur",
                        "c) Wir optimieren vor allem die aktuell genutzten Tools/Prozesse",
                        "d) Wir beobachten Trends proaktiv und passen die Strategie regelmäßig an",
                        "e) Das Thema wird derzeit nicht aktiv strategisch behandelt",
                    ],
                ),
                Question::single_choice(
                    "5.7",
                    "Welche langfristige strategische Perspektive auf KI verfolgen Sie am ehesten?",
                    [
                        "a) KI als Werkzeug zur punktuellen Effizienzsteigerung",
                        "b) KI als Chance für völlig neue Angebote oder Geschäftsmodelle",
                        "c) Eine Kombination aus Optimierung und schrittweiser Innovation",
                        "d) KI als fundamentaler Treiber zukünftiger Wettbewerbsfähigkeit",
                        "e) Es gibt noch keine klar definierte langfristige Perspektive",
                    ],
                ),
                Question::free_text(
                    "5.8",
                    "Welche strategische Anpassung halten Sie für die wichtigste, um auch in \
                     3-5 Jahren von KI-Entwicklungen zu profitieren?",
                    "Beschreiben Sie die wichtigsten strategischen Anpassungen für die Zukunft...",
                    false,
                ),
            ],
        },
    ]
}
