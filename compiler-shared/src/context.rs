use asciifile::AsciiFile;
use diagnostics::Diagnostics;
use termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};

/// The source file being compiled and the sink for everything the phases
/// have to say about it. Borrowed by the lexer; the later phases only need
/// the diagnostics.
pub struct Context<'f> {
    pub file: &'f AsciiFile<'f>,
    pub diagnostics: Diagnostics,
}

impl<'f> Context<'f> {
    pub fn new(file: &'f AsciiFile<'f>, writer: Box<dyn WriteColor>) -> Self {
        Context {
            file,
            diagnostics: Diagnostics::new(writer),
        }
    }

    /// Diagnostics go to stderr, colored according to `color`.
    pub fn stderr(file: &'f AsciiFile<'f>, color: ColorChoice) -> Self {
        Self::new(file, Box::new(StandardStream::stderr(color)))
    }

    /// Diagnostics are discarded. For tests.
    pub fn dummy(file: &'f AsciiFile<'f>) -> Self {
        Self::new(file, Box::new(NoColor::new(std::io::sink())))
    }
}
