// src/report.rs
//
// Stored report shape, deterministic report keying and the section parser
// for the semi-structured text the model returns.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A generated report as persisted at `user/{uid}/reports/{key}`.
/// Created whole at generation time; there is no field-level update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDoc {
    pub report: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Deterministic report key for an aggregation window.
/// Regenerating the same window replaces the stored report.
pub fn report_key(start_date: NaiveDate, end_date: NaiveDate) -> String {
    format!("{start_date}to{end_date}")
}

/// The closed, case-sensitive set of headings a generated report may use.
/// Anything outside this set is not recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportSection {
    SymptomsSummary,
    Duration,
    SymptomProgression,
    PossibleConditions,
    UrgencyLevel,
    AdditionalNotes,
}

impl ReportSection {
    pub const ALL: [ReportSection; 6] = [
        ReportSection::SymptomsSummary,
        ReportSection::Duration,
        ReportSection::SymptomProgression,
        ReportSection::PossibleConditions,
        ReportSection::UrgencyLevel,
        ReportSection::AdditionalNotes,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            ReportSection::SymptomsSummary => "Patient Report Symptoms Summary",
            ReportSection::Duration => "Duration",
            ReportSection::SymptomProgression => "Symptom Progression",
            ReportSection::PossibleConditions => "Possible Conditions",
            ReportSection::UrgencyLevel => "Urgency Level",
            ReportSection::AdditionalNotes => "Additional Notes",
        }
    }
}

/// Split report text into sections by scanning for `<Heading>:` markers.
///
/// A section's content runs from after its colon up to the next recognized
/// heading (or end of text), trimmed. Only headings actually present
/// appear in the result. Headings that differ in case or punctuation are
/// not recognized; their text is absorbed into the preceding section.
pub fn parse_report(text: &str) -> BTreeMap<ReportSection, String> {
    // (marker start, content start, section)
    let mut markers: Vec<(usize, usize, ReportSection)> = Vec::new();
    for section in ReportSection::ALL {
        let needle = format!("{}:", section.heading());
        for (pos, m) in text.match_indices(&needle) {
            markers.push((pos, pos + m.len(), section));
        }
    }
    markers.sort_by_key(|&(pos, _, _)| pos);

    let mut sections = BTreeMap::new();
    for (i, &(_, content_start, section)) in markers.iter().enumerate() {
        let content_end = markers
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(text.len());
        let content = text[content_start..content_end].trim().to_string();
        // Duplicate headings: the last occurrence wins.
        sections.insert(section, content);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_present_sections_only() {
        let parsed = parse_report("Duration: 3 days\n\nUrgency Level: Low\n\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[&ReportSection::Duration], "3 days");
        assert_eq!(parsed[&ReportSection::UrgencyLevel], "Low");
        assert!(!parsed.contains_key(&ReportSection::PossibleConditions));
    }

    #[test]
    fn full_report_splits_into_six_sections() {
        let text = "Patient Report Symptoms Summary: headache and sinus pressure\n\
                    Duration: 3 days\n\
                    Symptom Progression: improving steadily\n\
                    Possible Conditions: tension headache\nsinusitis\n\
                    Urgency Level: Low\n\
                    Additional Notes: rest and hydration recommended";
        let parsed = parse_report(text);
        assert_eq!(parsed.len(), 6);
        assert_eq!(
            parsed[&ReportSection::SymptomsSummary],
            "headache and sinus pressure"
        );
        assert_eq!(
            parsed[&ReportSection::PossibleConditions],
            "tension headache\nsinusitis"
        );
        assert_eq!(
            parsed[&ReportSection::AdditionalNotes],
            "rest and hydration recommended"
        );
    }

    #[test]
    fn unrecognized_heading_is_absorbed_into_previous_section() {
        let text = "Duration: 3 days\nSeverity: high\nUrgency Level: Low";
        let parsed = parse_report(text);
        assert_eq!(parsed[&ReportSection::Duration], "3 days\nSeverity: high");
        assert_eq!(parsed[&ReportSection::UrgencyLevel], "Low");
    }

    #[test]
    fn heading_match_is_case_sensitive() {
        let parsed = parse_report("duration: 3 days\nURGENCY LEVEL: Low");
        assert!(parsed.is_empty());
    }

    #[test]
    fn text_before_first_heading_is_lost() {
        let parsed = parse_report("preamble text\nDuration: 2 days");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[&ReportSection::Duration], "2 days");
    }

    #[test]
    fn duplicate_heading_last_occurrence_wins() {
        let parsed = parse_report("Duration: 1 day\nDuration: 4 days");
        assert_eq!(parsed[&ReportSection::Duration], "4 days");
    }

    #[test]
    fn report_key_is_deterministic_date_composite() {
        let start: NaiveDate = "2025-03-08".parse().unwrap();
        let end: NaiveDate = "2025-03-10".parse().unwrap();
        assert_eq!(report_key(start, end), "2025-03-08to2025-03-10");
        assert_eq!(report_key(start, end), report_key(start, end));
    }

    #[test]
    fn report_doc_uses_camel_case_field_names() {
        let doc = ReportDoc {
            report: "Duration: 1 day".into(),
            start_date: "2025-03-08".parse().unwrap(),
            end_date: "2025-03-10".parse().unwrap(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["startDate"], "2025-03-08");
        assert_eq!(json["endDate"], "2025-03-10");
    }
}
