use owo_colors::{OwoColorize, Style};

/// A byte range in the program source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }
}

/// A message attached to a span of source.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A complete error report: header, labelled source excerpts and trailing notes.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Computes the 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_text(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line.saturating_sub(1))
}

/// Renders diagnostics in a compiler-like layout:
///
/// ```text
/// error[E0202]: division by zero
///   --> main.tim:1:2
///   |
/// 1 | (10 / 0)
///   |  ^^^^^^ division by zero here
/// ```
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let severity = self.paint("error", Style::new().red().bold());
        let message = self.paint(&diagnostic.message, Style::new().bold());
        match &diagnostic.code {
            Some(code) => output.push_str(&format!("{}[{}]: {}\n", severity, code, message)),
            None => output.push_str(&format!("{}: {}\n", severity, message)),
        }

        let labels: Vec<&Label> = diagnostic
            .labels
            .iter()
            .filter(|label| !label.span.is_dummy())
            .collect();

        if let Some(first) = labels.first() {
            let (line, col) = line_col(self.source, first.span.start);
            let gutter_width = labels
                .iter()
                .map(|label| line_col(self.source, label.span.start).0)
                .max()
                .unwrap_or(line)
                .to_string()
                .len();
            let blank = " ".repeat(gutter_width + 1);
            let bar = self.paint("|", Style::new().blue());

            output.push_str(&format!(
                "{}{} {}:{}:{}\n",
                blank,
                self.paint("-->", Style::new().blue()),
                self.file_name,
                line,
                col
            ));
            output.push_str(&format!("{}{}\n", blank, bar));

            for label in &labels {
                self.render_label(&mut output, label, gutter_width);
            }
        }

        for note in &diagnostic.notes {
            output.push_str(&format!(
                "{} {} {}\n",
                " ".repeat(2),
                self.paint("=", Style::new().blue()),
                note
            ));
        }

        output
    }

    fn render_label(&self, output: &mut String, label: &Label, gutter_width: usize) {
        let (line, col) = line_col(self.source, label.span.start);
        let Some(text) = line_text(self.source, line) else {
            return;
        };
        let bar = self.paint("|", Style::new().blue());
        let line_number = format!("{:>width$}", line, width = gutter_width);

        output.push_str(&format!(
            "{} {} {}\n",
            self.paint(&line_number, Style::new().blue()),
            bar,
            text
        ));

        // Underlines never run past the end of the line they start on.
        let line_remaining = text.chars().count().saturating_sub(col - 1).max(1);
        let width = self
            .source
            .get(label.span.start..label.span.end)
            .unwrap_or_default()
            .chars()
            .count()
            .clamp(1, line_remaining);
        let underline = format!("{}{}", " ".repeat(col - 1), "^".repeat(width));
        let mut marker = self.paint(&underline, Style::new().red());
        if !label.message.is_empty() {
            marker.push(' ');
            marker.push_str(&self.paint(&label.message, Style::new().red()));
        }
        output.push_str(&format!("{} {} {}\n", " ".repeat(gutter_width), bar, marker));
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.use_color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Renders a single diagnostic followed by the abort summary line.
pub fn render_diagnostic(source: &str, file_name: &str, diagnostic: &Diagnostic, use_color: bool) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = renderer.render(diagnostic);
    output.push_str("error: aborting due to previous error\n");
    output
}
