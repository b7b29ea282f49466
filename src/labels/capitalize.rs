//! Capitalization rules for catalog text written in uppercase.

/// Short words kept lowercase anywhere but at the start of a label.
const CONNECTIVES: [&str; 11] = ["a", "de", "del", "la", "las", "los", "el", "en", "y", "o", "u"];

/// Dataset acronyms that always render uppercase.
const ACRONYMS: [&str; 5] = ["sg", "ucs", "vih", "vif", "diu"];

/// Abbreviated suffixes of unmapped `Q_AT_*` codes.
const ABBREVIATIONS: [(&str, &str); 4] = [
    ("aux", "Auxiliares"),
    ("pro", "Profesionales"),
    ("gen", "Generales"),
    ("esp", "Especialistas"),
];

pub fn is_acronym(word: &str) -> bool {
    ACRONYMS.contains(&word.to_lowercase().as_str())
}

/// Uppercase `text` when every space-separated word is a known acronym.
pub fn uppercase_acronyms(text: &str) -> Option<String> {
    let mut words = text.split(' ').filter(|word| !word.is_empty()).peekable();
    words.peek()?;
    words
        .map(|word| is_acronym(word).then(|| word.to_uppercase()))
        .collect::<Option<Vec<_>>>()
        .map(|words| words.join(" "))
}

/// Apply the catalog capitalization rules word by word.
///
/// `10A14 AÑOS (SUBSIGUIENTE)` becomes `10 a 14 Años (Subsiguiente)`.
pub fn capitalize_words(text: &str) -> String {
    text.to_lowercase()
        .split(' ')
        .enumerate()
        .map(|(index, word)| capitalize_word(index, word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(index: usize, word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if word.starts_with(|c: char| c.is_ascii_digit()) {
        return respace_numeric_range(word);
    }

    if let Some(inner) = word.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        return format!("({})", capitalize_first(inner));
    }

    if let Some(rest) = word.strip_prefix('(') {
        return format!("({}", capitalize_first(rest));
    }

    if word.ends_with(')') {
        return word.to_string();
    }

    if ACRONYMS.contains(&word) {
        return word.to_uppercase();
    }

    if index > 0 && CONNECTIVES.contains(&word) {
        return word.to_string();
    }

    capitalize_first(word)
}

/// `10a14` → `10 a 14`; only the first range in the word is re-spaced.
fn respace_numeric_range(word: &str) -> String {
    let bytes = word.as_bytes();
    for i in 1..bytes.len().saturating_sub(1) {
        if bytes[i] == b'a' && bytes[i - 1].is_ascii_digit() && bytes[i + 1].is_ascii_digit() {
            return format!("{} a {}", &word[..i], &word[i + 1..]);
        }
    }
    word.to_string()
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lowercase the text, then uppercase the first character of every word run.
/// Known acronyms come out fully uppercase.
pub fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.to_lowercase().chars() {
        if is_word_char(c) {
            if in_word {
                titled.push(c);
            } else {
                titled.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            titled.push(c);
            in_word = false;
        }
    }

    titled
        .split(' ')
        .map(|word| {
            if is_acronym(word) {
                word.to_uppercase()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Expand `Aux`, `Pro`, `Gen` and `Esp` into their full Spanish plurals.
pub fn expand_abbreviations(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            ABBREVIATIONS
                .iter()
                .find(|(short, _)| *short == lowered)
                .map(|(_, long)| (*long).to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
