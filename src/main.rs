mod app;
mod demo;
mod help;
use crate::app::App;
use crate::demo::DataSource;
use anyhow::Context;
use heatcal::calendar::layout::period_start;
use heatcal::config::{load_config, load_days};
use heatcal::model::CalendarType;
use heatcal::options::{CalendarConfig, CalendarOptions};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Environment variable holding the log filter directives
static LOG_ENV: &str = "HEATCAL_LOG";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunArgs),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunArgs {
    calendar_type: Option<CalendarType>,
    locale: Option<String>,
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    log: Option<PathBuf>,
    date: Option<Date>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = RunArgs::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('t') | Arg::Long("type") => {
                    args.calendar_type = Some(parser.value()?.parse()?);
                }
                Arg::Short('l') | Arg::Long("locale") => {
                    args.locale = Some(parser.value()?.string()?);
                }
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('d') | Arg::Long("data") => {
                    args.data = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log") => args.log = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if args.date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => args.date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(args) => {
                if let Some(path) = &args.log {
                    init_logging(path)?;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let options = args.options(today)?;
                let source = match &args.data {
                    Some(path) => DataSource::loaded(load_days(path)?),
                    None => DataSource::demo(),
                };
                info!(
                    calendar_type = %options.calendar_type,
                    start = %options.start_date,
                    locale = %options.locale,
                    "starting heatcal"
                );
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(options, source).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: heatcal [<options>] [YYYY-MM-DD]");
                println!();
                println!("Calendar heatmap of daily counts for a week, month, or year");
                println!();
                println!("Options:");
                println!("  -t, --type <TYPE>      Calendar type: weekly, monthly, or yearly");
                println!("                         [default: yearly]");
                println!("  -l, --locale <LOCALE>  Language for month & weekday names");
                println!("  -c, --config <FILE>    Read calendar options from a JSON file");
                println!("  -d, --data <FILE>      Read days from a JSON file instead of");
                println!("                         generating random ones");
                println!("      --log <FILE>       Write logs to the given file; filter with");
                println!("                         ${LOG_ENV}");
                println!("  -h, --help             Display this help message and exit");
                println!("  -V, --version          Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl RunArgs {
    /// Combines the configuration file with the command-line overrides.  The
    /// start date is snapped to the beginning of its period and defaults to
    /// the period containing `today`.
    fn options(&self, today: Date) -> anyhow::Result<CalendarOptions> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => CalendarConfig::default(),
        };
        if let Some(calendar_type) = self.calendar_type {
            config.calendar_type = Some(calendar_type);
        }
        if let Some(locale) = &self.locale {
            config.locale = Some(locale.clone());
        }
        let calendar_type = config.calendar_type.unwrap_or_default();
        let date = self.date.or(config.start_date).unwrap_or(today);
        config.start_date = Some(period_start(calendar_type, date));
        Ok(CalendarOptions::from_config(config, today))
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
