//! Section identification: splits a document's lines into titled sections.

use std::sync::LazyLock;

use regex::Regex;

use super::helpers::char_len;
use super::lists::is_list_item;
use super::types::{Section, MAIN_CONTENT};

const MAX_HEADER_CHARS: usize = 80;
const MAX_UPPERCASE_WORDS: usize = 10;
const MAX_NUMBERED_WORDS: usize = 8;

static NUMBERED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)*\.?\s+\p{Lu}").expect("valid numbered header regex")
});

/// Case-insensitive regex matching a line that starts with one of `keywords`
/// at a word boundary. `None` when no usable keyword is configured.
pub(crate) fn keyword_regex(keywords: &[String]) -> Option<Regex> {
    let alternation = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    if alternation.is_empty() {
        return None;
    }
    // Escaped literals always compile.
    Regex::new(&format!(r"(?i)^[ \t]*(?:{alternation})\b")).ok()
}

/// Split `text` into sections at detected header lines.
///
/// A line is a header when it is at most 80 characters and is all-caps, a
/// numbered heading, or starts with one of `keywords`. Text before the first
/// header becomes a `"Main Content"` section when it is not blank. With no
/// headers the whole text is one `"Main Content"` section.
pub fn identify_sections(text: &str, keywords: &[String]) -> Vec<Section> {
    split_sections(text, keyword_regex(keywords).as_ref())
}

pub(crate) fn split_sections(text: &str, keywords: Option<&Regex>) -> Vec<Section> {
    let lines: Vec<&str> = text.split('\n').collect();

    let mut offsets = Vec::with_capacity(lines.len());
    let mut offset = 0usize;
    for line in &lines {
        offsets.push(offset);
        offset += char_len(line) + 1;
    }

    let headers: Vec<usize> = (0..lines.len())
        .filter(|&i| {
            let prev = i.checked_sub(1).map(|p| lines[p]);
            let next = lines.get(i + 1).copied();
            is_header(lines[i], prev, next, keywords)
        })
        .collect();

    let section = |title: &str, start: usize, end: usize| Section {
        title: title.to_string(),
        start_line: start,
        end_line: end,
        start_char: offsets[start],
        text: lines[start..end].join("\n"),
    };

    let Some(&first) = headers.first() else {
        return vec![section(MAIN_CONTENT, 0, lines.len())];
    };

    let mut sections = Vec::with_capacity(headers.len() + 1);
    if lines[..first].iter().any(|l| !l.trim().is_empty()) {
        sections.push(section(MAIN_CONTENT, 0, first));
    }
    for (n, &start) in headers.iter().enumerate() {
        let end = headers.get(n + 1).copied().unwrap_or(lines.len());
        sections.push(section(lines[start].trim(), start, end));
    }
    sections
}

fn is_header(line: &str, prev: Option<&str>, next: Option<&str>, keywords: Option<&Regex>) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || char_len(trimmed) > MAX_HEADER_CHARS {
        return false;
    }
    if keywords.is_some_and(|re| re.is_match(line)) {
        return true;
    }
    is_uppercase_header(line, trimmed) || is_numbered_header(trimmed, prev, next)
}

fn is_uppercase_header(line: &str, trimmed: &str) -> bool {
    trimmed.chars().any(char::is_alphabetic)
        && !trimmed.chars().any(char::is_lowercase)
        && trimmed.split_whitespace().count() <= MAX_UPPERCASE_WORDS
        && !trimmed.starts_with('|')
        && !is_list_item(line)
}

fn is_numbered_header(trimmed: &str, prev: Option<&str>, next: Option<&str>) -> bool {
    NUMBERED_HEADER.is_match(trimmed)
        && trimmed.split_whitespace().count() <= MAX_NUMBERED_WORDS
        && !trimmed.ends_with(['.', ',', ';', ':'])
        && !prev.is_some_and(is_list_item)
        && !next.is_some_and(is_list_item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn no_headers_is_one_main_section() {
        let text = "Just a paragraph of text.\nAnd another line.";
        let sections = identify_sections(text, &[]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, MAIN_CONTENT);
        assert_eq!(sections[0].text, text);
        assert_eq!((sections[0].start_line, sections[0].end_line), (0, 2));
    }

    #[test]
    fn uppercase_and_numbered_headers() {
        let text = "Opening remarks.\n\nINTRODUCTION\nWelcome to the course.\n\n2.1 Getting Started\nInstall the tools.";
        let sections = identify_sections(text, &[]);
        assert_eq!(
            titles(&sections),
            vec![MAIN_CONTENT, "INTRODUCTION", "2.1 Getting Started"]
        );
        assert_eq!(sections[1].text, "INTRODUCTION\nWelcome to the course.\n");
        assert_eq!(sections[2].start_line, 5);
    }

    #[test]
    fn section_start_char_points_at_header() {
        let text = "Preface text.\nSUMMARY\nBody.";
        let sections = identify_sections(text, &[]);
        let summary = &sections[1];
        let chars: Vec<char> = text.chars().collect();
        let from: String = chars[summary.start_char..].iter().collect();
        assert_eq!(from, summary.text);
    }

    #[test]
    fn blank_preamble_is_dropped() {
        let text = "\n\nOVERVIEW\nContent here.";
        let sections = identify_sections(text, &[]);
        assert_eq!(titles(&sections), vec!["OVERVIEW"]);
    }

    #[test]
    fn numbered_list_is_not_a_header_run() {
        let text = "Steps to follow:\n1. Open the File menu\n2. Choose Save\n3. Pick a Folder";
        let sections = identify_sections(text, &[]);
        assert_eq!(titles(&sections), vec![MAIN_CONTENT]);
    }

    #[test]
    fn numbered_sentence_is_not_a_header() {
        let text = "Intro.\n\n3 Reasons we test code.\nMore.";
        assert_eq!(titles(&identify_sections(text, &[])), vec![MAIN_CONTENT]);
    }

    #[test]
    fn long_uppercase_line_is_not_a_header() {
        let shout = "THIS LINE HAS FAR TOO MANY WORDS TO BE ANY KIND OF REASONABLE HEADING";
        let text = format!("Intro.\n{shout}\nBody.");
        assert_eq!(titles(&identify_sections(&text, &[])), vec![MAIN_CONTENT]);
    }

    #[test]
    fn keyword_headers_are_case_insensitive() {
        let keywords = vec!["Chapter".to_string(), "Lesson".to_string()];
        let text = "chapter one begins\nText.\nLesson 2: loops\nMore text.\nChapters are long.";
        let sections = identify_sections(text, &keywords);
        assert_eq!(titles(&sections), vec!["chapter one begins", "Lesson 2: loops"]);
        // "Chapters" fails the word boundary.
        assert!(sections[1].text.ends_with("Chapters are long."));
    }

    #[test]
    fn blank_keywords_are_ignored() {
        assert!(keyword_regex(&[" ".to_string()]).is_none());
        assert!(keyword_regex(&[]).is_none());
    }

    #[test]
    fn sections_partition_lines() {
        let text = "Intro.\nPART ONE\na\nb\nPART TWO\nc";
        let sections = identify_sections(text, &[]);
        let mut line = 0;
        for s in &sections {
            assert_eq!(s.start_line, line);
            line = s.end_line;
        }
        assert_eq!(line, text.split('\n').count());
    }
}
