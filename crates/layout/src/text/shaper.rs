use crate::fonts::{FaceKey, FontLibrary};
use crate::style::StyledSpan;

/// Characters of one span drawn with one face.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Index of the source span.
    pub span: usize,
    pub face: FaceKey,
    pub text: String,
    pub width: f32,
}

/// The units the line breaker works with.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Content that may not be split across lines. A word can cross span
    /// boundaries, as in `**bold**,`.
    Word { fragments: Vec<Fragment>, width: f32 },
    /// A space the line may break at.
    Glue { span: usize, face: FaceKey, width: f32 },
    /// A hard line break.
    Newline,
}

/// Ideographs, kana, hangul and full-width forms break around every character.
pub fn is_cjk(ch: char) -> bool {
    matches!(ch as u32,
        0x2E80..=0x303F
        | 0x3040..=0x30FF
        | 0x3100..=0x31FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7AF
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFFEF
        | 0x20000..=0x2FA1F)
}

/// Splits styled spans into words, glue and breaks, measuring each piece.
///
/// Runs of spaces collapse to one glue unless `preserve_spaces` is set, in
/// which case every space is kept and a tab counts as four.
pub fn shape(library: &FontLibrary, spans: &[StyledSpan], preserve_spaces: bool) -> Vec<Item> {
    let mut items = Vec::new();
    let mut word: Vec<Fragment> = Vec::new();

    for (index, span) in spans.iter().enumerate() {
        let style = &span.style;
        for ch in span.text.chars() {
            match ch {
                '\n' => {
                    flush_word(&mut word, &mut items);
                    items.push(Item::Newline);
                }
                ' ' | '\t' => {
                    flush_word(&mut word, &mut items);
                    if !preserve_spaces && matches!(items.last(), Some(Item::Glue { .. })) {
                        continue;
                    }
                    let (face, drawn) =
                        library.face_for(&style.family, style.bold, style.italic, ' ');
                    let width = library.advance(face, drawn) * style.size / 1000.0;
                    let count = if ch == '\t' && preserve_spaces { 4 } else { 1 };
                    for _ in 0..count {
                        items.push(Item::Glue {
                            span: index,
                            face,
                            width,
                        });
                    }
                }
                c if c.is_control() => {}
                c if is_cjk(c) => {
                    flush_word(&mut word, &mut items);
                    push_char(&mut word, library, index, span, c);
                    flush_word(&mut word, &mut items);
                }
                c => push_char(&mut word, library, index, span, c),
            }
        }
    }
    flush_word(&mut word, &mut items);
    items
}

fn push_char(
    word: &mut Vec<Fragment>,
    library: &FontLibrary,
    index: usize,
    span: &StyledSpan,
    ch: char,
) {
    let style = &span.style;
    let (face, drawn) = library.face_for(&style.family, style.bold, style.italic, ch);
    let width = library.advance(face, drawn) * style.size / 1000.0;
    match word.last_mut() {
        Some(last) if last.span == index && last.face == face => {
            last.text.push(drawn);
            last.width += width;
        }
        _ => word.push(Fragment {
            span: index,
            face,
            text: drawn.to_string(),
            width,
        }),
    }
}

fn flush_word(word: &mut Vec<Fragment>, items: &mut Vec<Item>) {
    if word.is_empty() {
        return;
    }
    let fragments = std::mem::take(word);
    let width = fragments.iter().map(|f| f.width).sum();
    items.push(Item::Word { fragments, width });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::TextStyle;

    fn span(text: &str) -> StyledSpan {
        StyledSpan::new(text, TextStyle::new("Helvetica", 10.0))
    }

    fn words(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| match item {
                Item::Word { fragments, .. } => {
                    Some(fragments.iter().map(|f| f.text.as_str()).collect())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_words_and_collapsed_glue() {
        let library = FontLibrary::builtin();
        let items = shape(&library, &[span("two   words")], false);
        assert_eq!(items.len(), 3);
        assert!(matches!(items[1], Item::Glue { .. }));
        assert_eq!(words(&items), vec!["two", "words"]);
    }

    #[test]
    fn test_preserved_spaces_are_kept() {
        let library = FontLibrary::builtin();
        let items = shape(&library, &[span("a  b\tc")], true);
        let glue = items
            .iter()
            .filter(|i| matches!(i, Item::Glue { .. }))
            .count();
        assert_eq!(glue, 2 + 4);
    }

    #[test]
    fn test_newline_is_a_hard_break() {
        let library = FontLibrary::builtin();
        let items = shape(&library, &[span("line one\nline two")], false);
        assert!(items.contains(&Item::Newline));
        assert_eq!(words(&items), vec!["line", "one", "line", "two"]);
    }

    #[test]
    fn test_word_spans_style_boundaries() {
        let library = FontLibrary::builtin();
        let bold = StyledSpan::new("bold", TextStyle::new("Helvetica", 10.0).bold(true));
        let items = shape(&library, &[bold, span(", then")], false);
        match &items[0] {
            Item::Word { fragments, width } => {
                assert_eq!(fragments.len(), 2);
                assert_eq!(fragments[0].text, "bold");
                assert_eq!(fragments[1].text, ",");
                let expected = library.measure("bold", "Helvetica", true, false, 10.0)
                    + library.measure(",", "Helvetica", false, false, 10.0);
                assert!((width - expected).abs() < 1e-4);
            }
            other => panic!("expected a word, got {:?}", other),
        }
    }

    #[test]
    fn test_cjk_characters_are_separate_words() {
        let library = FontLibrary::builtin();
        let items = shape(&library, &[span("\u{4e2d}\u{6587}")], false);
        assert_eq!(items.len(), 2);
        assert!(is_cjk('\u{4e2d}'));
        assert!(!is_cjk('a'));
    }
}
