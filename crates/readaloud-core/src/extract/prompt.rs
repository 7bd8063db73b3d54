//! Instructions sent to the vision model.
//!
//! The extraction policy lives entirely in these strings: story prose only,
//! no illustration text, optional translation, and a fixed sentence for
//! covers. Nothing downstream validates or reformats the model's answer.

/// System instruction that opens every conversation context.
pub const SYSTEM_INSTRUCTION: &str = "You are a precise text extractor and translator for \
children's picture books. Each user turn contains a photo of one book page and names the \
target language. The source text is in English. \
If the photo shows the cover of the book, answer with exactly one sentence of the form \
'This book is titled <title> by <author(s)>.', translated into the target language. \
Otherwise extract ONLY the story text a parent would read aloud, ignoring any words that \
appear inside illustrations, figures, speech bubbles or captions, and translate it into the \
target language while keeping the story's tone and meaning. \
Never describe the image, never add commentary, and never continue the story beyond the text \
on the page. If no target language is given, return the text in the original English. \
If the page has no story text, return an empty answer.";

/// Per-page user instruction. The page image is attached to the same turn.
pub const PAGE_INSTRUCTION: &str = "Here is the next page of the book. Return ONLY the story \
text in the image. Do not continue or extrapolate from the text you found. No commentary \
before or after the text.";

/// Build the user instruction for one page.
///
/// A blank or missing target language means "no translation".
pub fn page_instruction(target_language: Option<&str>) -> String {
    match target_language.map(str::trim).filter(|l| !l.is_empty()) {
        Some(language) => format!("{PAGE_INSTRUCTION}\nTarget language: {language}."),
        None => format!(
            "{PAGE_INSTRUCTION}\nNo target language was given: keep the original English."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_carries_cover_template() {
        assert!(SYSTEM_INSTRUCTION.contains("This book is titled <title> by <author(s)>."));
        assert!(SYSTEM_INSTRUCTION.contains("illustrations"));
    }

    #[test]
    fn test_page_instruction_with_language() {
        let text = page_instruction(Some("French"));
        assert!(text.starts_with(PAGE_INSTRUCTION));
        assert!(text.ends_with("Target language: French."));
    }

    #[test]
    fn test_page_instruction_without_language() {
        for language in [None, Some(""), Some("   ")] {
            let text = page_instruction(language);
            assert!(text.contains("No target language"));
            assert!(!text.contains("Target language:"));
        }
    }
}
