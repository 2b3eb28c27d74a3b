#![warn(rust_2018_idioms)]

use asciifile::AsciiFile;
use compiler_shared::{context::Context, timed_scope, timing};
use diagnostics::MessageLevel;
use failure::{Error, Fail, ResultExt};
use lexer::{lextest, Lexer, Token};
use parser::{ast, print::pretty, Parser};
use std::{
    io::{self, Write},
    path::PathBuf,
    process::exit,
};
use strtab::StringTable;
use structopt::{clap::ArgGroup, StructOpt};
use termcolor::ColorChoice;
use type_checking::{
    dump::{AnnotationDump, ClassTableDump},
    CheckMode,
};

#[derive(Debug, Fail)]
enum CliError {
    #[fail(display = "cannot decode input file {:?}", path)]
    Ascii { path: PathBuf },
    #[fail(display = "cannot write to stdout")]
    Output,
    #[fail(display = "invalid color choice {:?}", choice)]
    Color { choice: String },
}

#[derive(StructOpt)]
#[structopt(
    name = "minijavac",
    group = ArgGroup::with_name("phase").multiple(false)
)]
struct CliCommand {
    /// Copy the input file to stdout
    #[structopt(long = "echo", group = "phase")]
    echo: bool,
    /// Print one token per line
    #[structopt(long = "lextest", group = "phase")]
    lextest: bool,
    /// Only report whether the input parses
    #[structopt(long = "parsetest", group = "phase")]
    parsetest: bool,
    /// Pretty-print the syntax tree
    #[structopt(long = "print-ast", group = "phase")]
    print_ast: bool,
    /// Run semantic analysis (the default)
    #[structopt(long = "check", group = "phase")]
    check: bool,
    /// Run semantic analysis and print the class table
    #[structopt(long = "dump-class-table", group = "phase")]
    dump_class_table: bool,
    /// Run semantic analysis and print the type of every name and call
    #[structopt(long = "dump-annotations", group = "phase")]
    dump_annotations: bool,

    /// Report all semantic errors instead of stopping at the first one
    #[structopt(long = "keep-going")]
    keep_going: bool,
    /// When to use colors in diagnostics: auto, always or never
    #[structopt(long = "color", default_value = "auto", parse(try_from_str = parse_color))]
    color: ColorChoice,
    /// Log more, repeat for even more (-v, -vv, -vvv)
    #[structopt(short = "v", parse(from_occurrences))]
    verbosity: u8,

    #[structopt(name = "FILE", parse(from_os_str))]
    input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Echo,
    LexTest,
    ParseTest,
    PrintAst,
    Check,
    DumpClassTable,
    DumpAnnotations,
}

impl CliCommand {
    fn phase(&self) -> Phase {
        let flags = [
            (self.echo, Phase::Echo),
            (self.lextest, Phase::LexTest),
            (self.parsetest, Phase::ParseTest),
            (self.print_ast, Phase::PrintAst),
            (self.check, Phase::Check),
            (self.dump_class_table, Phase::DumpClassTable),
            (self.dump_annotations, Phase::DumpAnnotations),
        ];
        // at most one flag is set, see the `phase` argument group
        flags
            .iter()
            .find(|(set, _)| *set)
            .map_or(Phase::Check, |(_, phase)| *phase)
    }

    fn check_mode(&self) -> CheckMode {
        if self.keep_going {
            CheckMode::Accumulate
        } else {
            CheckMode::FailFast
        }
    }
}

fn parse_color(choice: &str) -> Result<ColorChoice, CliError> {
    match choice {
        "auto" => Ok(ColorChoice::Auto),
        "always" => Ok(ColorChoice::Always),
        "never" => Ok(ColorChoice::Never),
        _ => Err(CliError::Color {
            choice: choice.to_string(),
        }),
    }
}

fn main() {
    let cmd = CliCommand::from_args();
    setup_logging(cmd.verbosity);

    match run(&cmd) {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(err) => exit_with_error(&err),
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Returns whether the input passed the requested phase.
fn run(cmd: &CliCommand) -> Result<bool, Error> {
    let phase = cmd.phase();
    log::info!("running phase {:?} on {:?}", phase, cmd.input);

    let mapping = AsciiFile::mmap(&cmd.input)?;
    let bytes = (*mapping).as_ref();

    if phase == Phase::Echo {
        let stdout = io::stdout();
        stdout.lock().write_all(bytes).context(CliError::Output)?;
        return Ok(true);
    }

    let file = AsciiFile::new(bytes).context(CliError::Ascii {
        path: cmd.input.clone(),
    })?;
    let context = Context::stderr(&file, cmd.color);
    let mut strtab = StringTable::new();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let passed = match phase {
        Phase::LexTest => print_tokens(&context, &mut strtab, &mut out)?,
        _ => run_frontend(cmd, phase, &context, &mut strtab, &mut out)?,
    };

    if context.diagnostics.errored() || context.diagnostics.count(MessageLevel::Warning) > 0 {
        context.diagnostics.write_statistics();
    }
    timing::print()?;

    Ok(passed && !context.diagnostics.errored())
}

fn print_tokens<'f>(
    context: &'f Context<'f>,
    strtab: &mut StringTable<'f>,
    out: &mut dyn Write,
) -> Result<bool, Error> {
    timed_scope!("lexing");

    for result in Lexer::new(strtab, context) {
        match result {
            Ok(token) if token.data.is_trivia() => {}
            Ok(token) => {
                writeln!(out, "{}", lextest::Output::new(&token.data)).context(CliError::Output)?
            }
            Err(lexical_error) => {
                context.diagnostics.error(&lexical_error);
                return Ok(false);
            }
        }
    }
    writeln!(out, "EOF").context(CliError::Output)?;

    Ok(true)
}

fn run_frontend<'f>(
    cmd: &CliCommand,
    phase: Phase,
    context: &'f Context<'f>,
    strtab: &mut StringTable<'f>,
    out: &mut dyn Write,
) -> Result<bool, Error> {
    let tokens = match lex(context, strtab) {
        Some(tokens) => tokens,
        None => return Ok(false),
    };
    let program = match parse(context, tokens) {
        Some(program) => program,
        None => return Ok(false),
    };

    match phase {
        Phase::ParseTest => return Ok(true),
        Phase::PrintAst => {
            pretty::print(&program, out)?;
            return Ok(true);
        }
        _ => {}
    }

    let (class_table, type_analysis) = {
        timed_scope!("semantic analysis");
        match type_checking::check(&program, cmd.check_mode()) {
            Ok(result) => result,
            Err(errors) => {
                for error in &errors {
                    context.diagnostics.error(error);
                }
                return Ok(false);
            }
        }
    };

    match phase {
        Phase::DumpClassTable => {
            write!(out, "{}", ClassTableDump(&class_table)).context(CliError::Output)?
        }
        Phase::DumpAnnotations => write!(
            out,
            "{}",
            AnnotationDump {
                program: &program,
                analysis: &type_analysis,
            }
        )
        .context(CliError::Output)?,
        _ => {}
    }

    Ok(true)
}

/// All tokens except whitespace and comments. Stops at the first lexical
/// error.
fn lex<'f>(context: &'f Context<'f>, strtab: &mut StringTable<'f>) -> Option<Vec<Token<'f>>> {
    timed_scope!("lexing");

    let mut tokens = Vec::new();
    for result in Lexer::new(strtab, context) {
        match result {
            Ok(token) if token.data.is_trivia() => {}
            Ok(token) => tokens.push(token),
            Err(lexical_error) => {
                context.diagnostics.error(&lexical_error);
                return None;
            }
        }
    }
    Some(tokens)
}

fn parse<'f>(context: &Context<'f>, tokens: Vec<Token<'f>>) -> Option<ast::Program<'f>> {
    timed_scope!("parsing");

    match Parser::new(tokens.into_iter()).parse() {
        Ok(program) => Some(program.data),
        Err(syntax_error) => {
            context.diagnostics.error(&syntax_error);
            None
        }
    }
}

/// Print an error in a format intended for end users and terminate
/// the program.
fn exit_with_error(err: &Error) -> ! {
    let mut stderr = io::stderr();
    print_error(&mut stderr, err).expect("unable to print error");
    exit(1);
}

/// Print error objects in a format intended for end users
fn print_error(writer: &mut dyn io::Write, err: &Error) -> Result<(), Error> {
    writeln!(writer, "error: {}", err.as_fail())?;
    for cause in err.iter_causes() {
        writeln!(writer, "caused by: {}", cause)?;
    }
    Ok(())
}
