//! CLI dashboard probe.
//!
//! Usage: `memento_cli <db-path> [--config <file.toml>] [--log-dir <dir>] [--log-level <level>]`
//!
//! Opens (and migrates) the database, reconciles the current week and prints
//! a plain-text dashboard summary. With `--log-dir`, core events are written
//! to rolling log files in that directory.

use memento_core::{init_logging, open_db, DashboardService, LifeConfig, LogLevel, PeriodKey};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str =
    "usage: memento_cli <db-path> [--config <file.toml>] [--log-dir <dir>] [--log-level <level>]";

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    db_path: PathBuf,
    config_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_level: LogLevel,
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("memento_cli: {message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("memento_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut args = args.into_iter();
    let mut db_path = None;
    let mut config_path = None;
    let mut log_dir = None;
    let mut log_level = LogLevel::build_default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = Some(PathBuf::from(flag_value(&mut args, &arg)?)),
            "--log-dir" => log_dir = Some(PathBuf::from(flag_value(&mut args, &arg)?)),
            "--log-level" => {
                log_level = flag_value(&mut args, &arg)?
                    .parse()
                    .map_err(|err: memento_core::LoggingError| err.to_string())?;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag `{flag}`")),
            _ if db_path.is_none() => db_path = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument `{arg}`")),
        }
    }

    Ok(CliArgs {
        db_path: db_path.ok_or_else(|| "missing <db-path>".to_string())?,
        config_path,
        log_dir,
        log_level,
    })
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("flag `{flag}` requires a value"))
}

/// Log directories must be absolute; relative ones resolve against `cwd`.
fn absolute_log_dir(dir: &Path, cwd: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        cwd.join(dir)
    }
}

fn run(args: &CliArgs) -> Result<(), String> {
    if let Some(dir) = &args.log_dir {
        let cwd = std::env::current_dir().map_err(|err| err.to_string())?;
        init_logging(args.log_level, &absolute_log_dir(dir, &cwd))
            .map_err(|err| err.to_string())?;
    }

    let config = match &args.config_path {
        Some(path) => LifeConfig::load(path).map_err(|err| err.to_string())?,
        None => LifeConfig::default(),
    };
    let conn = open_db(&args.db_path).map_err(|err| err.to_string())?;
    let view = DashboardService::new(&conn, &config)
        .load(PeriodKey::current())
        .map_err(|err| err.to_string())?;

    println!("memento_core version={}", memento_core::core_version());
    match &view.death_clock {
        Some(clock) => println!(
            "hours_left={} lifespan_years={} purpose={}",
            clock.hours_left, clock.lifespan_years, clock.purpose_label
        ),
        None => println!("hours_left=unset"),
    }
    println!("affirmation={}", view.affirmation);
    println!(
        "week={} state={:?} blocks={} objectives={}",
        view.period.period,
        view.period.state,
        view.period.blocks.len(),
        view.period.objectives.len()
    );
    for block in &view.period.blocks {
        let objectives = view.period.objectives_for(block);
        let done = objectives.iter().filter(|o| o.is_completed).count();
        println!("  block {} {} {done}/{}", block.name, block.color, objectives.len());
    }
    for objective in &view.objectives {
        let mark = if objective.is_completed { "x" } else { " " };
        println!("  [{mark}] {} {}", objective.scope, objective.text);
    }
    println!("allocated_hours={}", view.allocations.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{absolute_log_dir, parse_args, CliArgs};
    use memento_core::LogLevel;
    use std::path::{Path, PathBuf};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn db_path_alone_uses_defaults() {
        let parsed = parse_args(args(&["planner.db"])).unwrap();
        assert_eq!(
            parsed,
            CliArgs {
                db_path: PathBuf::from("planner.db"),
                config_path: None,
                log_dir: None,
                log_level: LogLevel::build_default(),
            }
        );
    }

    #[test]
    fn flags_are_accepted_in_any_order() {
        let parsed = parse_args(args(&[
            "--log-dir",
            "/var/log/memento",
            "planner.db",
            "--log-level",
            "warn",
            "--config",
            "life.toml",
        ]))
        .unwrap();
        assert_eq!(parsed.db_path, PathBuf::from("planner.db"));
        assert_eq!(parsed.config_path, Some(PathBuf::from("life.toml")));
        assert_eq!(parsed.log_dir, Some(PathBuf::from("/var/log/memento")));
        assert_eq!(parsed.log_level, LogLevel::Warn);
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["planner.db", "--log-dir"])).is_err());
        assert!(parse_args(args(&["planner.db", "--log-level", "loud"])).is_err());
        assert!(parse_args(args(&["planner.db", "--verbose"])).is_err());
        assert!(parse_args(args(&["a.db", "b.db"])).is_err());
    }

    #[test]
    fn relative_log_dir_resolves_against_cwd() {
        let cwd = Path::new("/home/user");
        assert_eq!(
            absolute_log_dir(Path::new("logs"), cwd),
            PathBuf::from("/home/user/logs")
        );
        assert_eq!(
            absolute_log_dir(Path::new("/tmp/logs"), cwd),
            PathBuf::from("/tmp/logs")
        );
    }
}
