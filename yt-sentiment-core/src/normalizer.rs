use unicode_segmentation::UnicodeSegmentation;

const ZERO_WIDTH_JOINER: char = '\u{200D}';
const TEXT_PRESENTATION_SELECTOR: char = '\u{FE0E}';
const EMOJI_PRESENTATION_SELECTOR: char = '\u{FE0F}';
const COMBINING_ENCLOSING_KEYCAP: char = '\u{20E3}';

/// Rewrites every emoji in `comment` as its description surrounded by spaces,
/// so `"nice 👍"` becomes `"nice  thumbs up "`. Text without emoji is
/// returned unchanged.
pub fn normalize(comment: &str) -> String {
    let mut normalized = String::with_capacity(comment.len());

    for grapheme in comment.graphemes(true) {
        if grapheme.is_ascii() {
            normalized.push_str(grapheme);
        } else if let Some(emoji) = lookup(grapheme) {
            push_description(&mut normalized, emoji);
        } else {
            push_chars(&mut normalized, grapheme);
        }
    }

    normalized
}

fn lookup(grapheme: &str) -> Option<&'static emojis::Emoji> {
    emojis::get(grapheme).or_else(|| {
        let stripped: String = grapheme.chars().filter(|c| !is_presentation_selector(*c)).collect();
        if stripped.is_empty() || stripped.len() == grapheme.len() {
            None
        } else {
            emojis::get(&stripped)
        }
    })
}

// Unknown sequences (new ZWJ combinations, stray modifiers) are described
// one pictograph at a time; their glue characters are dropped.
fn push_chars(out: &mut String, grapheme: &str) {
    let mut buf = [0; 4];
    let has_emoji = grapheme.chars().any(|c| emojis::get(c.encode_utf8(&mut buf)).is_some());
    if !has_emoji {
        out.push_str(grapheme);
        return;
    }

    for c in grapheme.chars() {
        if let Some(emoji) = emojis::get(c.encode_utf8(&mut buf)) {
            push_description(out, emoji);
        } else if !is_glue(c) {
            out.push(c);
        }
    }
}

fn push_description(out: &mut String, emoji: &emojis::Emoji) {
    out.push(' ');
    out.push_str(&emoji.name().replace('_', " "));
    out.push(' ');
}

fn is_presentation_selector(c: char) -> bool {
    c == EMOJI_PRESENTATION_SELECTOR || c == TEXT_PRESENTATION_SELECTOR
}

fn is_glue(c: char) -> bool {
    c == ZERO_WIDTH_JOINER
        || c == COMBINING_ENCLOSING_KEYCAP
        || is_presentation_selector(c)
        || ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
        || ('\u{E0020}'..='\u{E007F}').contains(&c)
}
