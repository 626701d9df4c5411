use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crossterm::{
    cursor::{Hide, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::ResetColor,
    terminal::{disable_raw_mode, enable_raw_mode, size, supports_keyboard_enhancement},
};
use log::{LevelFilter, error, info, warn};

use spacerift::app::SpaceRift;
use spacerift::config::GameConfig;
use spacerift::error::GameResult;
use spacerift::host::{self, INBOX_ENV, INIT_DATA_ENV, OUTBOX_ENV};
use spacerift::miniapp::MiniApp;
use spacerift::rendering::{GameGrid, OutputTarget, ScreenBuffer};
use spacerift::storage::LocalStorage;
use spacerift::terminal_io::SimulatedInput;

const USAGE: &str = "usage: spacerift [--debug [width height [frames]]] [--config <path>] [--seed <n>]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    debug: Option<DebugRun>,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
}

#[derive(Debug, PartialEq)]
struct DebugRun {
    width: u16,
    height: u16,
    max_frames: Option<u64>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--debug" => {
                let numbers: Vec<u64> = args[i + 1..]
                    .iter()
                    .take(3)
                    .map_while(|a| a.parse::<u64>().ok())
                    .collect();
                let dimension = |n: Option<&u64>, default: u16| {
                    n.and_then(|&v| u16::try_from(v).ok()).unwrap_or(default)
                };
                let (width, height) = if numbers.len() >= 2 {
                    (dimension(numbers.first(), 80), dimension(numbers.get(1), 24))
                } else {
                    (80, 24)
                };
                let max_frames = numbers.get(2).copied().or(Some(300));
                cli.debug = Some(DebugRun { width, height, max_frames });
                i += 1 + if numbers.len() >= 2 { numbers.len() } else { 0 };
            }
            "--config" => {
                let path = args.get(i + 1).ok_or("--config needs a path")?;
                cli.config_path = Some(PathBuf::from(path));
                i += 2;
            }
            "--seed" => {
                let seed = args
                    .get(i + 1)
                    .and_then(|s| s.parse().ok())
                    .ok_or("--seed needs a number")?;
                cli.seed = Some(seed);
                i += 2;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(cli)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let (config, source) = match GameConfig::load(cli.config_path.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("spacerift: {e}");
            return ExitCode::FAILURE;
        }
    };

    let level = config.log_level_filter();
    if let Err(e) = simple_logging::log_to_file(&config.log_file, level.unwrap_or(LevelFilter::Info)) {
        eprintln!("spacerift: cannot open log file {}: {e}", config.log_file.display());
        return ExitCode::FAILURE;
    }
    info!("Starting SpaceRift.");
    info!("{}", source);
    if level.is_none() {
        warn!("Unknown log level '{}', falling back to info", config.log_level);
    }

    match run(cli, config) {
        Ok(()) => {
            info!("Exiting SpaceRift.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("SpaceRift stopped: {}", e);
            eprintln!("spacerift: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: CliArgs, config: GameConfig) -> GameResult<()> {
    let init_data = env::var(INIT_DATA_ENV).ok();
    let (outbox, inbox) = if init_data.is_some() {
        let outbox_path = host_channel_path(OUTBOX_ENV, &config.data_dir, "host_outbox.jsonl");
        let inbox_path = host_channel_path(INBOX_ENV, &config.data_dir, "host_inbox.jsonl");
        info!("Host channel: outbox {}, inbox {}", outbox_path.display(), inbox_path.display());
        let outbox: Box<dyn Write> = Box::new(open_outbox(&outbox_path)?);
        let inbox: Box<dyn BufRead> = Box::new(open_inbox(&inbox_path)?);
        (outbox, Some(inbox))
    } else {
        let outbox: Box<dyn Write> = Box::new(io::sink());
        (outbox, None)
    };
    let miniapp = MiniApp::new(host::detect(init_data, outbox, inbox), LocalStorage::new(&config.data_dir));

    if let Some(debug) = cli.debug {
        info!("Debug mode enabled ({}x{}, {:?} frames).", debug.width, debug.height, debug.max_frames);
        let target = OutputTarget::ScreenBuffer(ScreenBuffer::new(debug.width, debug.height));
        let mut game = SpaceRift::new(
            config,
            miniapp,
            debug.width,
            debug.height,
            target,
            Some(SimulatedInput::demo()),
            debug.max_frames,
            cli.seed.or(Some(0)),
        );
        return game.run();
    }

    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| {
        error!("Failed to enable raw mode: {}", e);
        e
    })?;
    let (width, height) = size()?;
    info!("Terminal size: {}x{}", width, height);

    let mut stdout_target = OutputTarget::Stdout(io::stdout());
    let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
    let result = prepare_terminal(&mut stdout_target, width, height, enhanced_keys).and_then(|()| {
        let mut game = SpaceRift::new(config, miniapp, width, height, stdout_target, None, None, cli.seed);
        let result = game.run();
        restore_terminal(&mut game.stdout_target, game.terminal_width, game.terminal_height, enhanced_keys);
        result
    });
    if let Err(e) = disable_raw_mode() {
        error!("Failed to disable raw mode on exit: {}", e);
    }
    result
}

fn host_channel_path(var: &str, data_dir: &Path, file_name: &str) -> PathBuf {
    env::var(var).map(PathBuf::from).unwrap_or_else(|_| data_dir.join(file_name))
}

fn open_outbox(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Opens the host's event file positioned at its end, so lines left over from
/// an earlier session are not replayed.
fn open_inbox(path: &Path) -> io::Result<BufReader<fs::File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().read(true).append(true).create(true).open(path)?;
    file.seek(SeekFrom::End(0))?;
    Ok(BufReader::new(file))
}

fn prepare_terminal(target: &mut OutputTarget, width: u16, height: u16, enhanced_keys: bool) -> GameResult<()> {
    GameGrid::new(width, height).clear_screen_manual(target)?;
    target.execute_other_command(Hide)?;
    if enhanced_keys {
        target.execute_other_command(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
    }
    target.flush()?;
    Ok(())
}

fn restore_terminal(target: &mut OutputTarget, width: u16, height: u16, enhanced_keys: bool) {
    if let Err(e) = try_restore_terminal(target, width, height, enhanced_keys) {
        error!("Failed to restore terminal: {}", e);
    }
}

fn try_restore_terminal(target: &mut OutputTarget, width: u16, height: u16, enhanced_keys: bool) -> io::Result<()> {
    if enhanced_keys {
        target.execute_other_command(PopKeyboardEnhancementFlags)?;
    }
    target.execute_other_command(ResetColor)?;
    GameGrid::new(width, height).clear_screen_manual(target)?;
    target.execute_other_command(Show)?;
    target.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("spacerift").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn no_arguments_means_interactive() {
        assert_eq!(parse_args(&args(&[])).unwrap(), CliArgs::default());
    }

    #[test]
    fn debug_with_size_and_frames() {
        let cli = parse_args(&args(&["--debug", "100", "30", "50", "--seed", "9"])).unwrap();
        assert_eq!(cli.debug, Some(DebugRun { width: 100, height: 30, max_frames: Some(50) }));
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn bare_debug_uses_defaults() {
        let cli = parse_args(&args(&["--debug", "--config", "game.toml"])).unwrap();
        assert_eq!(cli.debug, Some(DebugRun { width: 80, height: 24, max_frames: Some(300) }));
        assert_eq!(cli.config_path, Some(PathBuf::from("game.toml")));
    }

    #[test]
    fn inbox_skips_stale_lines_and_reads_new_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host").join("inbox.jsonl");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{\"event\":\"close_requested\"}\n").unwrap();

        let outbox_path = dir.path().join("host").join("outbox.jsonl");
        let outbox: Box<dyn Write> = Box::new(open_outbox(&outbox_path).unwrap());
        let inbox: Box<dyn BufRead> = Box::new(open_inbox(&path).unwrap());
        let mut bridge = host::detect(Some("{}".to_string()), outbox, Some(inbox));
        assert!(bridge.poll_events().is_empty());

        let mut writer = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(writer, "{{\"event\":\"button_clicked\",\"button\":\"back\"}}").unwrap();
        assert_eq!(bridge.poll_events(), vec![host::HostEvent::ButtonClicked { button: host::HostButton::Back }]);

        bridge.close();
        let sent = fs::read_to_string(&outbox_path).unwrap();
        assert!(sent.contains("\"method\":\"close\""));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse_args(&args(&["--seed"])).is_err());
        assert!(parse_args(&args(&["--fast"])).is_err());
    }
}
