// Inputman CLI
// Replays a scripted input stream against bindings and reports what fires

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;

use inputman_core::settings::default_settings_content;
use inputman_core::{Action, BindingId, InputManager, Settings};

/// Test input bindings against a scripted press/release stream
#[derive(Parser, Debug)]
#[command(name = "inputman")]
#[command(version)]
#[command(about = "Replay input events against key/mouse bindings", long_about = None)]
struct Args {
    /// Binding string to register (can be used multiple times)
    #[arg(short, long = "bind", value_name = "BINDING")]
    bindings: Vec<String>,

    /// Event script; reads stdin when omitted
    #[arg(short, long, value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate settings and bindings, then exit
    #[arg(long)]
    check_config: bool,

    /// Print a default settings file and exit
    #[arg(long)]
    print_default_config: bool,
}

/// One line of an event script
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Input { action: Action, input: String },
    Wait(Duration),
}

/// Parse script lines of the form `press KeyD`, `release KeyD` or
/// `wait 200`. Blank lines and `#` comments are skipped.
fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let arg = parts.next();
        if parts.next().is_some() {
            bail!("line {}: too many fields in '{}'", lineno + 1, line);
        }

        let step = match (verb, arg) {
            ("wait", Some(ms)) => {
                let ms: u64 = ms
                    .parse()
                    .with_context(|| format!("line {}: bad wait '{}'", lineno + 1, ms))?;
                Step::Wait(Duration::from_millis(ms))
            }
            (verb, Some(input)) => {
                let action = Action::from_str(verb)
                    .with_context(|| format!("line {}: unknown action '{}'", lineno + 1, verb))?;
                Step::Input {
                    action,
                    input: input.to_string(),
                }
            }
            (_, None) => bail!("line {}: missing argument in '{}'", lineno + 1, line),
        };
        steps.push(step);
    }
    Ok(steps)
}

fn load_settings(args: &Args) -> Result<Settings> {
    let settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load_default().context("failed to load default settings")?,
    };
    Ok(settings)
}

fn register_all(manager: &mut InputManager, bindings: &[String]) -> Result<()> {
    for binding in bindings {
        let id = manager
            .try_register(binding, || {})
            .with_context(|| format!("invalid binding '{}'", binding))?;
        log::info!("registered {} '{}'", id, binding);
    }
    Ok(())
}

fn describe(manager: &InputManager, id: BindingId) -> String {
    manager
        .registry()
        .get(id)
        .map(|b| format!("{} {}", id, b.source()))
        .unwrap_or_else(|| id.to_string())
}

/// Replay the script on a virtual clock so waits are instantaneous
fn replay(manager: &mut InputManager, steps: &[Step]) -> usize {
    let start = Instant::now();
    let mut elapsed = Duration::ZERO;
    let mut total = 0;

    for step in steps {
        let now = start + elapsed;
        let fired = match step {
            Step::Wait(d) => {
                elapsed += *d;
                continue;
            }
            Step::Input { action, input } => match action {
                Action::Press => manager.press_at(input.as_str(), now),
                Action::Release => manager.unpress_at(input.as_str(), now),
                Action::Repeat => Vec::new(),
            },
        };

        for id in &fired {
            println!("[{:>6}ms] fired {}", elapsed.as_millis(), describe(manager, *id));
        }
        total += fired.len();
    }
    total
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.print_default_config {
        print!("{}", default_settings_content());
        return Ok(());
    }

    let settings = load_settings(&args)?;
    let mut manager = InputManager::new(settings);
    register_all(&mut manager, &args.bindings)?;

    if args.check_config {
        println!(
            "Configuration is valid ({} binding(s))",
            manager.registry().len()
        );
        return Ok(());
    }

    if manager.registry().is_empty() {
        bail!("no bindings given; use --bind");
    }

    let text = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };

    let steps = parse_script(&text)?;
    let total = replay(&mut manager, &steps);
    log::debug!("{} binding firing(s) over {} step(s)", total, steps.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let steps = parse_script("# demo\npress ShiftLeft\n\nwait 20\nrelease ShiftLeft # done\n")
            .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Input {
                    action: Action::Press,
                    input: "ShiftLeft".to_string()
                },
                Step::Wait(Duration::from_millis(20)),
                Step::Input {
                    action: Action::Release,
                    input: "ShiftLeft".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_script_errors() {
        assert!(parse_script("tap KeyA").is_err());
        assert!(parse_script("press").is_err());
        assert!(parse_script("wait soon").is_err());
        assert!(parse_script("press KeyA KeyB").is_err());
    }

    #[test]
    fn test_replay_counts_firings() {
        let mut manager = InputManager::default();
        register_all(&mut manager, &["KeyG>KeyT".to_string()]).unwrap();
        let steps = parse_script("press KeyG\nrelease KeyG\nwait 100\npress KeyT\n").unwrap();
        assert_eq!(replay(&mut manager, &steps), 1);

        let mut manager = InputManager::default();
        register_all(&mut manager, &["KeyG>KeyT".to_string()]).unwrap();
        let steps = parse_script("press KeyG\nrelease KeyG\nwait 800\npress KeyT\n").unwrap();
        assert_eq!(replay(&mut manager, &steps), 0);
    }
}
