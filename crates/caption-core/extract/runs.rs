//! Maximal-run accumulation shared by the character-cell extractors

use crate::model::{RunStyle, TextRun};

/// Accumulates characters into maximal [`TextRun`]s
///
/// A new run opens only when the style changes or a line break is pending.
/// Line breaks are written as a trailing `\n` on the run they close and are
/// only emitted between lines that both carry text.
#[derive(Debug, Default)]
pub(crate) struct RunBuilder {
    runs: Vec<TextRun>,
    open: Option<TextRun>,
    pending_break: bool,
}

impl RunBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append one character with its style
    pub(crate) fn push(&mut self, ch: char, style: RunStyle) {
        if self.pending_break {
            self.close_line();
        }
        match &mut self.open {
            Some(run) if run.style == style => run.text.push(ch),
            _ => {
                self.flush();
                self.open = Some(TextRun::new(ch.to_string(), style));
            }
        }
    }

    /// Start a new line before the next character
    pub(crate) fn new_line(&mut self) {
        if self.has_content() {
            self.pending_break = true;
        }
    }

    pub(crate) fn has_content(&self) -> bool {
        self.open.is_some() || !self.runs.is_empty()
    }

    pub(crate) fn finish(mut self) -> Vec<TextRun> {
        self.flush();
        self.runs
    }

    fn close_line(&mut self) {
        self.pending_break = false;
        if let Some(mut run) = self.open.take() {
            run.text.push('\n');
            self.runs.push(run);
        } else if let Some(last) = self.runs.last_mut() {
            last.text.push('\n');
        }
    }

    fn flush(&mut self) {
        if let Some(run) = self.open.take() {
            self.runs.push(run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, TextStyle};

    fn push_str(builder: &mut RunBuilder, text: &str, style: RunStyle) {
        for ch in text.chars() {
            builder.push(ch, style);
        }
    }

    #[test]
    fn identical_styles_merge() {
        let style = RunStyle::with_font_color(Color::WHITE);
        let mut builder = RunBuilder::new();
        push_str(&mut builder, "HEL", style);
        push_str(&mut builder, "LO", style);
        let runs = builder.finish();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "HELLO");
    }

    #[test]
    fn style_change_splits() {
        let plain = RunStyle::with_font_color(Color::WHITE);
        let italic = RunStyle {
            flags: TextStyle::ITALIC,
            ..plain
        };
        let mut builder = RunBuilder::new();
        push_str(&mut builder, "ab", plain);
        push_str(&mut builder, "cd", italic);
        push_str(&mut builder, "ef", plain);
        let texts: Vec<_> = builder.finish().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, ["ab", "cd", "ef"]);
    }

    #[test]
    fn line_break_closes_run() {
        let style = RunStyle::default();
        let mut builder = RunBuilder::new();
        builder.new_line();
        push_str(&mut builder, "one", style);
        builder.new_line();
        builder.new_line();
        push_str(&mut builder, "two", style);
        builder.new_line();
        let texts: Vec<_> = builder.finish().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, ["one\n", "two"]);
    }
}
