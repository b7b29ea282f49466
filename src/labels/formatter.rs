use std::sync::Arc;

use regex::Regex;

use super::capitalize::{capitalize_words, expand_abbreviations, title_case, uppercase_acronyms};
use super::mapping::{normalize_key, LabelMap};

/// Metric codes that may trail a column name: `TOTAL`, `MES`, `SUMA` or any `Q_AT_*` code.
const METRIC_CODES: &str = r"TOTAL|Q_AT_[A-Za-z0-9_]+|MES|SUMA";

#[derive(Debug)]
struct Patterns {
    prefix: Regex,
    compound: Regex,
    underscore_suffix: Regex,
    spaced_suffix: Regex,
    unmapped_code: Regex,
}

impl Patterns {
    fn compile() -> Self {
        Self {
            prefix: pattern(r"(?i)^(?:Suma\s+de\s+|Suma\s+|MEDIDA\s+\d+\s+)"),
            compound: pattern(&format!(r"(?i)^([^_]+)_({METRIC_CODES})$")),
            underscore_suffix: pattern(&format!(r"(?i)_(?:{METRIC_CODES})$")),
            // Case-sensitive: the spaced form only strips technical uppercase codes,
            // so labels such as "Enero - Total" survive a second pass.
            spaced_suffix: pattern(r"\s+(?:TOTAL|Q\s+AT\s+\w+(?:\s+\w+)*|MES|SUMA)\s*$"),
            unmapped_code: pattern(r"(?i)^Q[\s_]AT[\s_]"),
        }
    }
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|err| panic!("invalid label pattern {source:?}: {err}"))
}

/// Turns raw column identifiers into display labels.
///
/// Never fails: unrecognized input degrades to a best-effort label or comes
/// back cleaned but otherwise unchanged. Cloning is cheap; the mapping table is
/// shared.
#[derive(Debug, Clone)]
pub struct LabelFormatter {
    labels: Arc<LabelMap>,
    patterns: Arc<Patterns>,
}

impl Default for LabelFormatter {
    fn default() -> Self {
        Self::new(Arc::new(LabelMap::builtin()))
    }
}

impl LabelFormatter {
    pub fn new(labels: Arc<LabelMap>) -> Self {
        Self {
            labels,
            patterns: Arc::new(Patterns::compile()),
        }
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Format a possibly absent identifier; `None` yields an empty label.
    pub fn format_optional(&self, raw: Option<&str>) -> String {
        raw.map(|raw| self.format(raw)).unwrap_or_default()
    }

    pub fn format_all<S: AsRef<str>>(&self, raws: &[S]) -> Vec<String> {
        raws.iter().map(|raw| self.format(raw.as_ref())).collect()
    }

    /// Format a raw identifier such as `Q_AT_MEDICO_GEN`, `ENERO_TOTAL` or
    /// `10 A 14 AÑOS (SUBSIGUIENTE)`.
    pub fn format(&self, raw: &str) -> String {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return String::new();
        }

        let cleaned = self.patterns.prefix.replace(&cleaned, "");

        if let Some(captures) = self.patterns.compound.captures(&cleaned) {
            let value = self.format_simple(&captures[1]);
            let metric = &captures[2];
            let metric = match self.labels.lookup(metric) {
                Some(label) => label.to_string(),
                None => self.format_simple(metric),
            };
            return format!("{value} - {metric}");
        }

        let stripped = self.patterns.underscore_suffix.replace(&cleaned, "");
        let stripped = self.patterns.spaced_suffix.replace(&stripped, "");
        let stripped = stripped.trim();

        if let Some(label) = self.labels.get(&normalize_key(stripped)) {
            return label.to_string();
        }

        if self.patterns.unmapped_code.is_match(stripped) {
            let description = stripped
                .split(|c: char| c.is_whitespace() || c == '_')
                .filter(|part| !part.is_empty())
                .skip(2)
                .collect::<Vec<_>>()
                .join(" ");
            return expand_abbreviations(&title_case(&description));
        }

        if is_uppercase(stripped) && stripped.chars().count() > 3 && !stripped.contains('_') {
            return capitalize_words(stripped);
        }

        if stripped.contains('_') {
            return title_case(&stripped.replace('_', " "));
        }

        uppercase_acronyms(stripped).unwrap_or_else(|| stripped.to_string())
    }

    /// Formatter for the parts of a compound identifier.
    fn format_simple(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        if let Some(label) = self.labels.lookup(text) {
            return label.to_string();
        }

        if is_uppercase(text) && !text.contains('_') {
            return capitalize_words(text);
        }

        if text.contains('_') {
            return title_case(&text.replace('_', " "));
        }

        uppercase_acronyms(text).unwrap_or_else(|| text.to_string())
    }
}

/// Control characters become spaces, whitespace runs collapse, ends are trimmed.
fn clean(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_uppercase(text: &str) -> bool {
    text.to_uppercase() == text
}
