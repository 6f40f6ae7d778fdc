mod intl;
mod locales;
mod logging;
mod reconcile;
mod session;
mod table;
mod types;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::{error, info};

use session::{Command, Session};
use types::{PointInTime, Side, StyleToken};

#[derive(Parser)]
#[command(
    name = "dtfmt",
    version,
    about = "Show one date and time formatted across many locales"
)]
struct Cli {
    /// Date to format (YYYY-MM-DD), today by default
    #[arg(short, long, value_parser = session::parse_date)]
    date: Option<NaiveDate>,

    /// Wall-clock time to format (HH:MM)
    #[arg(short, long, value_parser = session::parse_time, default_value = "16:30")]
    time: NaiveTime,

    /// IANA time zone the date and time belong to, the system zone by default
    #[arg(short = 'z', long, value_parser = session::parse_zone, value_name = "ZONE")]
    time_zone: Option<Tz>,

    /// Date format style
    #[arg(long, value_enum, default_value_t = StyleToken::Default)]
    date_style: StyleToken,

    /// Time format style; wins over --date-style when the two conflict
    #[arg(long, value_enum, default_value_t = StyleToken::Default)]
    time_style: StyleToken,

    /// Locale to show instead of the built-in list (repeatable)
    #[arg(short, long = "locale", value_name = "LOCALE")]
    locales: Vec<String>,

    /// Print rows as JSON instead of a table
    #[arg(long, conflicts_with = "interactive")]
    json: bool,

    /// Keep reading edit commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn session(&self) -> Session {
        let mut instant = PointInTime::today();
        if let Some(date) = self.date {
            instant.set_date(date);
        }
        instant.set_time(self.time);
        if let Some(zone) = self.time_zone {
            instant.set_zone(zone);
        }

        let locales = if self.locales.is_empty() {
            locales::LOCALES.iter().map(|l| l.to_string()).collect()
        } else {
            self.locales.clone()
        };

        let mut session = Session::new(instant, locales);
        // Date first, then time: the time side is the last edit.
        session.set_style(Side::Date, self.date_style);
        session.set_style(Side::Time, self.time_style);
        session
    }
}

fn show(session: &Session) -> ExitCode {
    match session.entries() {
        Ok(entries) => {
            println!(
                "{}",
                table::status_line(session.instant(), session.selection())
            );
            println!("{}", table::render_table(&entries));
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn fail(e: impl std::fmt::Display) -> ExitCode {
    error!("{e}");
    eprintln!("Error: {e}");
    ExitCode::from(1)
}

fn show_json(session: &Session) -> ExitCode {
    let rendered = session
        .entries()
        .map_err(|e| e.to_string())
        .and_then(|entries| table::render_json(session, &entries).map_err(|e| e.to_string()));
    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

const HELP: &str = "\
Commands:
  date YYYY-MM-DD       change the date
  time HH:MM            change the time
  zone AREA/CITY        change the time zone (IANA name)
  date-style STYLE      default, short, medium, long, full, numeric, 2-digit
  time-style STYLE      same choices as date-style
  show                  print the table again
  remarks               notes about the styles
  help                  this text
  quit                  leave";

fn run_repl(mut session: Session) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("dtfmt v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", table::REMARKS);
    println!();
    println!("Type `help` for commands. Press Ctrl-D to exit.");
    let mut status = show(&session);

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        let read_result = stdin.lock().read_line(&mut line);

        match read_result {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match trimmed.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Remarks) => println!("{}", table::REMARKS),
                    Ok(command) => {
                        if session.apply(command) {
                            status = show(&session);
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(e) => {
                eprintln!("Read error: {e}");
                return ExitCode::from(1);
            }
        }
    }

    println!();
    status
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let session = cli.session();
    info!(
        instant = %session.instant(),
        zone = %session.instant().zone(),
        selection = ?session.selection(),
        locales = session.locales().len(),
        "starting"
    );

    if cli.interactive {
        return run_repl(session);
    }

    if cli.json {
        return show_json(&session);
    }

    show(&session)
}
