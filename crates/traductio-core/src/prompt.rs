//! Prompt text sent to the translation service.

use std::fmt::Write as _;

use crate::config::language_name;
use crate::domain::Domain;
use crate::memory::TmMatch;
use crate::translator::TranslationRequest;

/// Returned by [`format_for_prompt`] when there are no matches.
///
/// This is a marker, not prompt content: [`build_prompt`] drops the
/// translation memory section when it sees it.
pub const NO_TM_MATCHES: &str = "No relevant translation memory segments.";

const TM_HEADER: &str = "--- TRANSLATION MEMORY SEGMENTS ---";
const TM_FOOTER: &str = "--- END OF TRANSLATION MEMORY ---";

/// Render ranked matches as a context block.
pub fn format_for_prompt(matches: &[TmMatch]) -> String {
    if matches.is_empty() {
        return NO_TM_MATCHES.to_string();
    }

    let mut block = format!("{TM_HEADER}\n");
    for m in matches {
        // Writing to a String cannot fail
        let _ = writeln!(block, "SOURCE: \"{}\"", m.entry.source_text);
        let _ = writeln!(block, "TRANSLATION: \"{}\"", m.entry.translated_text);
        let _ = writeln!(
            block,
            "(Match: {}%, Used: {} times)\n",
            m.score, m.entry.used_count
        );
    }
    block.push_str(TM_FOOTER);
    block.push('\n');
    block
}

/// System instruction for a domain.
pub const fn system_instruction(domain: Domain) -> &'static str {
    match domain {
        Domain::Juridic => {
            "You are a professional legal translator experienced in Romanian, Spanish and \
             international law. Translate the text STRICTLY respecting the official legal \
             terminology of the target country, exact legal equivalents, and the established \
             wording of notarial deeds and contracts. Keep article numbers, dates and amounts \
             of money EXACTLY as written. Do NOT paraphrase or simplify. If a term has no \
             direct equivalent, add [term without direct equivalent - kept in original]."
        }
        Domain::Medical => {
            "You are a professional medical translator experienced in international medical \
             terminology (ICD-10, anatomical nomenclature, pharmacology). Translate the text \
             STRICTLY respecting scientific and Latin names, brand names (UNCHANGED), units of \
             measurement (UNCHANGED) and standard medical abbreviations. Use a neutral, precise \
             style. If an abbreviation has no equivalent, note: [term kept in original - no \
             standardized equivalent]."
        }
        Domain::General => {
            "You are a professional translator. Translate the text as accurately as possible, \
             preserving its style and formatting."
        }
    }
}

/// Assemble the user prompt: task line, optional glossary, optional
/// translation memory context, then the source text.
pub fn build_prompt(request: &TranslationRequest) -> String {
    let mut prompt = format!(
        "Task: translate from {} ({}) into {} ({}).\n\n",
        language_name(request.source_lang.as_str()),
        request.source_lang,
        language_name(request.target_lang.as_str()),
        request.target_lang,
    );

    let glossary = request.glossary.trim();
    if !glossary.is_empty() {
        prompt.push_str(glossary);
        prompt.push_str("\n\n");
    }

    let context = request.tm_context.trim();
    if !context.is_empty() && context != NO_TM_MATCHES {
        prompt.push_str(
            "RELEVANT TRANSLATION MEMORY (use it only where it fits the context):\n",
        );
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }

    prompt.push_str("SOURCE TEXT:\n");
    prompt.push_str(&request.text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lang;
    use crate::memory::{MatchKind, TranslationMemoryEntry};
    use chrono::Utc;

    fn tm_match(source: &str, translated: &str, kind: MatchKind, used: u32) -> TmMatch {
        let now = Utc::now();
        TmMatch {
            entry: TranslationMemoryEntry {
                id: "1".to_string(),
                source_lang: Lang::new("RO"),
                target_lang: Lang::new("EN"),
                domain: Domain::Medical,
                source_text: source.to_string(),
                translated_text: translated.to_string(),
                created_at: now,
                updated_at: now,
                used_count: used,
                confirmed: true,
            },
            match_type: kind,
            score: kind.score(),
        }
    }

    fn request(glossary: &str, tm_context: &str) -> TranslationRequest {
        TranslationRequest {
            text: "Pacientul are febră.".to_string(),
            source_lang: Lang::new("RO"),
            target_lang: Lang::new("EN"),
            domain: Domain::Medical,
            glossary: glossary.to_string(),
            tm_context: tm_context.to_string(),
        }
    }

    #[test]
    fn test_no_matches_yields_sentinel() {
        assert_eq!(format_for_prompt(&[]), NO_TM_MATCHES);
    }

    #[test]
    fn test_matches_are_listed_in_order() {
        let block = format_for_prompt(&[
            tm_match("diagnostic", "diagnosis", MatchKind::Exact, 4),
            tm_match(
                "tensiune arteriala ridicata",
                "high blood pressure",
                MatchKind::PartialSourceInQuery,
                1,
            ),
        ]);

        assert!(block.starts_with(TM_HEADER));
        assert!(block.trim_end().ends_with(TM_FOOTER));
        assert!(block.contains(
            "SOURCE: \"diagnostic\"\nTRANSLATION: \"diagnosis\"\n(Match: 100%, Used: 4 times)"
        ));
        assert!(block.contains("(Match: 85%, Used: 1 times)"));
        let first = block.find("diagnostic").unwrap();
        let second = block.find("tensiune").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_prompt_omits_sentinel_context() {
        let prompt = build_prompt(&request("", NO_TM_MATCHES));

        assert!(!prompt.contains(NO_TM_MATCHES));
        assert!(!prompt.contains("RELEVANT TRANSLATION MEMORY"));
        assert!(prompt.starts_with("Task: translate from Romanian (RO) into English (EN)."));
        assert!(prompt.ends_with("SOURCE TEXT:\nPacientul are febră."));
    }

    #[test]
    fn test_prompt_includes_glossary_and_context() {
        let context = format_for_prompt(&[tm_match("febră", "fever", MatchKind::Exact, 1)]);
        let prompt = build_prompt(&request("\n--- GLOSSARY ---\nfebră = fever\n---\n", &context));

        let glossary_at = prompt.find("--- GLOSSARY ---").unwrap();
        let context_at = prompt.find("RELEVANT TRANSLATION MEMORY").unwrap();
        let source_at = prompt.find("SOURCE TEXT:").unwrap();
        assert!(glossary_at < context_at && context_at < source_at);
    }

    #[test]
    fn test_each_domain_has_its_own_instruction() {
        let general = system_instruction(Domain::General);
        let legal = system_instruction(Domain::Juridic);
        let medical = system_instruction(Domain::Medical);

        assert_ne!(general, legal);
        assert_ne!(legal, medical);
        assert!(medical.contains("ICD-10"));
    }
}
