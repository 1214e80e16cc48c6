use crate::models::cognitive::{CognitiveBreakdown, TextSignals};
use kuchiki::iter::NodeIterator;
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;

const HIDDEN_ELEMENTS: &str = "script, style, nav, footer, header, aside";
const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";

/// Pull readability, density, jargon and hierarchy intermediates from the
/// visible text of a page. Structural chrome is removed before anything is
/// counted, so paragraphs inside a `<header>` do not contribute.
pub fn extract_text_signals(markup: &str) -> TextSignals {
    let document = kuchiki::parse_html().one(markup);
    strip_hidden(&document);

    let text = visible_text(&document);
    let word_count = text.split_whitespace().count();
    let tokens = tokenize(&text);
    let syllables: Vec<usize> = tokens.iter().map(|t| count_syllables(t)).collect();
    let syllable_count: usize = syllables.iter().sum();
    let polysyllabic_count = syllables.iter().filter(|&&s| s >= 3).count();
    let sentence_count = count_sentences(&text, tokens.len());

    let paragraph_words: Vec<usize> = document
        .select("p")
        .map(|paras| {
            paras
                .map(|p| p.as_node().text_contents().split_whitespace().count())
                .collect()
        })
        .unwrap_or_default();
    let paragraph_count = paragraph_words.len();
    let heading_count = document.select(HEADINGS).map(|h| h.count()).unwrap_or(0);

    let avg_words_per_paragraph = if paragraph_count > 0 {
        paragraph_words.iter().sum::<usize>() as f64 / paragraph_count as f64
    } else {
        word_count as f64
    };
    let jargon_ratio = if tokens.is_empty() {
        0.0
    } else {
        polysyllabic_count as f64 / tokens.len() as f64
    };
    let hierarchy_ratio = if paragraph_count > 0 {
        heading_count as f64 / paragraph_count as f64
    } else {
        0.0
    };

    TextSignals {
        word_count,
        token_count: tokens.len(),
        polysyllabic_count,
        sentence_count,
        syllable_count,
        paragraph_count,
        heading_count,
        flesch_reading_ease: flesch_reading_ease(tokens.len(), sentence_count, syllable_count),
        avg_words_per_paragraph,
        jargon_ratio,
        hierarchy_ratio,
    }
}

/// Rescale raw intermediates onto 0–10. Values are not rounded here.
pub fn sub_scores(signals: &TextSignals) -> CognitiveBreakdown {
    CognitiveBreakdown {
        readability: clamp_score(signals.flesch_reading_ease / 10.0),
        density: clamp_score(10.0 - signals.avg_words_per_paragraph / 20.0),
        complexity: clamp_score(10.0 - signals.jargon_ratio * 20.0),
        hierarchy: clamp_score(signals.hierarchy_ratio * 5.0),
    }
}

/// Flesch reading ease. Zero denominators contribute 0 to their term, so a
/// page without text reads at the 206.835 ceiling.
pub fn flesch_reading_ease(words: usize, sentences: usize, syllables: usize) -> f64 {
    let words_per_sentence = if sentences == 0 {
        0.0
    } else {
        words as f64 / sentences as f64
    };
    let syllables_per_word = if words == 0 {
        0.0
    } else {
        syllables as f64 / words as f64
    };
    206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word
}

/// Vowel-group syllable estimate with the usual silent-`e` and `-ed`
/// corrections. Tokens without letters count as one syllable.
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        return usize::from(!word.is_empty());
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut previous_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }

    let n = letters.len();
    if count > 1 && n > 2 {
        let last = letters[n - 1];
        let before = letters[n - 2];
        let silent_e = last == 'e' && !(before == 'l' && n > 3 && !is_vowel(letters[n - 3]));
        let silent_ed = last == 'd' && before == 'e' && !matches!(letters[n - 3], 't' | 'd');
        if (silent_e && !is_vowel(before)) || silent_ed {
            count -= 1;
        }
    }

    count.max(1)
}

fn strip_hidden(document: &NodeRef) {
    let Ok(hidden) = document.select(HIDDEN_ELEMENTS) else {
        return;
    };
    let nodes: Vec<NodeRef> = hidden.map(|el| el.as_node().clone()).collect();
    for node in nodes {
        node.detach();
    }
}

fn visible_text(document: &NodeRef) -> String {
    document
        .descendants()
        .text_nodes()
        .filter_map(|text| {
            let value = text.borrow();
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Word-character runs (letters, digits, underscore).
fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect()
}

fn count_sentences(text: &str, tokens: usize) -> usize {
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|segment| segment.chars().any(char::is_alphanumeric))
        .count();
    if sentences == 0 && tokens > 0 {
        1
    } else {
        sentences
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 10.0)
}
