//! Collects the errors, warnings and notes of all compiler phases and
//! renders them with a source snippet:
//!
//! ```text
//! error: mismatched types in if condition: expected 'boolean', found 'int'
//!  --> 3:13
//!    |
//!  3 |         if (5) { } else { }
//!    |             ^
//! ```
//!
//! The driver asks `errored()` to decide whether a phase failed.
//!
//! NOT thread-safe.
use asciifile::{MaybeSpanned, Message, Span, Spanned};
use std::{ascii::escape_default, cell::RefCell, collections::HashMap, fmt};
use termcolor::{Color, ColorSpec, WriteColor};

pub struct Diagnostics {
    message_count: RefCell<HashMap<MessageLevel, usize>>,
    writer: RefCell<Box<dyn WriteColor>>,
}

impl Diagnostics {
    pub fn new(writer: Box<dyn WriteColor>) -> Self {
        Self {
            writer: RefCell::new(writer),
            message_count: RefCell::new(HashMap::new()),
        }
    }

    /// True when an error message was emitted, false
    /// if only warnings were emitted.
    pub fn errored(&self) -> bool {
        self.count(MessageLevel::Error) > 0
    }

    pub fn count(&self, level: MessageLevel) -> usize {
        self.message_count
            .borrow()
            .get(&level)
            .cloned()
            .unwrap_or(0)
    }

    /// One closing line: the number of errors, or that compilation went
    /// through and with how many warnings.
    pub fn write_statistics(&self) {
        let mut writer = self.writer.borrow_mut();
        let mut painter = Painter::new(&mut **writer);

        if self.errored() {
            let errors = match self.count(MessageLevel::Error) {
                1 => "an error".to_string(),
                n => format!("{} errors", n),
            };
            painter.style(Style::Level(MessageLevel::Error));
            painter.line(format_args!("Compilation aborted due to {}", errors));
        } else {
            let warnings = match self.count(MessageLevel::Warning) {
                0 => "without warnings".to_string(),
                1 => "with a warning".to_string(),
                n => format!("with {} warnings", n),
            };
            painter.style(Style::Success);
            painter.line(format_args!("Compilation finished successfully {}", warnings));
        }
    }

    pub fn emit(&self, level: MessageLevel, message: Message<'_, '_>) {
        *self.message_count.borrow_mut().entry(level).or_insert(0) += 1;

        let mut writer = self.writer.borrow_mut();
        let mut painter = Painter::new(&mut **writer);

        painter.style(Style::Level(level));
        painter.text(format_args!("{}: ", level.name()));
        painter.style(Style::Bold);
        painter.line(format_args!("{}", *message));

        match message {
            MaybeSpanned::WithoutSpan(_) => painter.line(format_args!("")),
            MaybeSpanned::WithSpan(Spanned { span, .. }) => Snippet::new(span, level).render(&mut painter),
        }
    }

    pub fn warning<'f, 'd, T>(&self, message: T)
    where
        T: Into<Message<'f, 'd>>,
    {
        self.emit(MessageLevel::Warning, message.into())
    }

    pub fn error<'f, 'd, T>(&self, message: T)
    where
        T: Into<Message<'f, 'd>>,
    {
        self.emit(MessageLevel::Error, message.into())
    }

    pub fn info<'f, 'd, T>(&self, message: T)
    where
        T: Into<Message<'f, 'd>>,
    {
        self.emit(MessageLevel::Info, message.into())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MessageLevel {
    Error,
    Warning,
    Info,
}

impl MessageLevel {
    fn color(self) -> Color {
        match self {
            MessageLevel::Error => Color::Red,
            MessageLevel::Warning => Color::Yellow,
            MessageLevel::Info => Color::Cyan,
        }
    }

    fn name(self) -> &'static str {
        match self {
            MessageLevel::Error => "error",
            MessageLevel::Warning => "warning",
            MessageLevel::Info => "info",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Style {
    Level(MessageLevel),
    Success,
    /// Line numbers, the `-->` location and the `|` gutter.
    Gutter,
    /// Control characters in quoted source lines.
    Escaped,
    Bold,
    Plain,
}

impl Style {
    fn spec(self) -> ColorSpec {
        let (color, bold) = match self {
            Style::Level(level) => (Some(level.color()), true),
            Style::Success => (Some(Color::Green), true),
            Style::Gutter => (Some(Color::Cyan), true),
            Style::Escaped => (Some(Color::Cyan), false),
            Style::Bold => (None, true),
            Style::Plain => (None, false),
        };
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        spec
    }
}

/// Writes styled text and leaves the terminal reset when dropped. Write
/// errors are dropped: a diagnostic that cannot be printed has nowhere
/// else to go.
struct Painter<'w> {
    writer: &'w mut dyn WriteColor,
}

impl<'w> Painter<'w> {
    fn new(writer: &'w mut dyn WriteColor) -> Self {
        writer.reset().ok();
        Self { writer }
    }

    fn style(&mut self, style: Style) {
        self.writer.set_color(&style.spec()).ok();
    }

    fn text(&mut self, args: fmt::Arguments<'_>) {
        self.writer.write_fmt(args).ok();
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        self.text(args);
        self.writer.write_all(b"\n").ok();
    }
}

impl Drop for Painter<'_> {
    fn drop(&mut self) {
        self.writer.reset().ok();
    }
}

const TAB_WIDTH: usize = 4;

/// The quoted source lines below a message header. A single-line span gets
/// `^` markers under the offending characters, every line of a multiline
/// span gets a `>` marker in the gutter instead.
struct Snippet<'f> {
    span: Span<'f>,
    level: MessageLevel,
    gutter_width: usize,
}

impl<'f> Snippet<'f> {
    fn new(span: Span<'f>, level: MessageLevel) -> Self {
        let gutter_width = span.end_position().line_number().to_string().len();
        Self {
            span,
            level,
            gutter_width,
        }
    }

    fn empty_gutter(&self) -> String {
        format!(" {} | ", " ".repeat(self.gutter_width))
    }

    fn render(&self, painter: &mut Painter<'_>) {
        let start = self.span.start_position();
        let end = self.span.end_position();

        painter.style(Style::Gutter);
        painter.line(format_args!("{}--> {}", " ".repeat(self.gutter_width), start));
        painter.line(format_args!("{}", self.empty_gutter()));

        if self.span.is_multiline() {
            for line in self.span.lines() {
                let number = line.start_position().line_number().to_string();
                painter.style(Style::Gutter);
                painter.text(format_args!(" {} |", pad_left(&number, self.gutter_width)));
                painter.style(Style::Level(self.level));
                painter.text(format_args!("> "));
                SourceLine::new(line.as_str()).render(painter);
                painter.line(format_args!(""));
            }

            painter.style(Style::Gutter);
            painter.line(format_args!("{}", self.empty_gutter()));
        } else {
            let number = start.line_number().to_string();
            painter.style(Style::Gutter);
            painter.text(format_args!(" {} | ", pad_left(&number, self.gutter_width)));

            let source = SourceLine::new(start.line().as_str());
            source.render(painter);
            painter.line(format_args!(""));

            let marker_start = source.rendered_width(start.column());
            let marker_end = source.rendered_width(end.column() + 1);
            painter.style(Style::Gutter);
            painter.text(format_args!("{}", self.empty_gutter()));
            painter.style(Style::Level(self.level));
            painter.line(format_args!(
                "{}{}",
                " ".repeat(marker_start),
                "^".repeat(marker_end.saturating_sub(marker_start).max(1))
            ));
        }

        painter.line(format_args!(""));
    }
}

/// A source line as shown in a snippet. Tabs are expanded and control
/// characters escaped, so a character may take up more than one cell.
struct SourceLine<'a> {
    line: &'a str,
}

impl<'a> SourceLine<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line: line.trim_end_matches('\n'),
        }
    }

    /// Switches styles only between runs of equally styled characters.
    fn render(&self, painter: &mut Painter<'_>) {
        let mut current = None;
        for chr in self.line.chars() {
            let (text, style) = Self::cell(chr);
            if current != Some(style) {
                painter.style(style);
                current = Some(style);
            }
            painter.text(format_args!("{}", text));
        }
    }

    /// Number of cells rendered before column `col`.
    fn rendered_width(&self, col: usize) -> usize {
        let col = col.min(self.line.len());
        self.line[..col]
            .chars()
            .map(|chr| Self::cell(chr).0.len())
            .sum()
    }

    fn cell(chr: char) -> (String, Style) {
        match chr {
            '\t' => (" ".repeat(TAB_WIDTH), Style::Plain),
            '\r' => (String::new(), Style::Plain),
            chr if chr.is_control() => (
                format!("{{{}}}", u8_to_printable_representation(chr as u8)),
                Style::Escaped,
            ),
            _ => (chr.to_string(), Style::Plain),
        }
    }
}

pub fn u8_to_printable_representation(byte: u8) -> String {
    let bytes = escape_default(byte).collect::<Vec<u8>>();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn pad_left(s: &str, pad: usize) -> String {
    format!("{:>width$}", s, width = pad)
}
