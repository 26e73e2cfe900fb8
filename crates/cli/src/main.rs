mod settings;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use facelock_core::command::domain::channel::ChannelId;
use facelock_core::command::domain::command_debouncer::CommandDebouncer;
use facelock_core::command::domain::dispatch_router::DispatchRouter;
use facelock_core::command::domain::transport::{shared, SharedTransport};
use facelock_core::command::infrastructure::recording_transport::RecordingTransport;
use facelock_core::command::infrastructure::serial_device_transport::SerialDeviceTransport;
use facelock_core::detection::domain::face_tracker::{FaceTracker, TrackerFactory};
use facelock_core::detection::infrastructure::iou_face_tracker::IouFaceTracker;
use facelock_core::detection::infrastructure::scripted_detector::ScriptedDetector;
use facelock_core::heartbeat::heartbeat_emitter::HeartbeatEmitter;
use facelock_core::pipeline::follow_me_config::{FollowMeConfig, SelectionMode};
use facelock_core::pipeline::follow_me_use_case::FollowMeUseCase;
use facelock_core::pipeline::infrastructure::follow_me_service::FollowMeService;
use facelock_core::pipeline::session_logger::StdoutSessionLogger;
use facelock_core::shared::constants::TRACKER_MIN_IOU;
use facelock_core::video::infrastructure::scenario::Scenario;
use facelock_core::video::infrastructure::scripted_frame_source::ScriptedFrameSource;

use settings::Settings;

/// Face-lock follow-me controller for a serial-driven robot.
#[derive(Parser)]
#[command(name = "facelock", version)]
struct Cli {
    /// Settings file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded scenario through the follow-me loop.
    Replay(ReplayArgs),
    /// Validate and send a single command to a controller.
    Send(SendArgs),
    /// Write the effective settings to the settings file.
    InitConfig,
}

#[derive(Args)]
struct DeviceArgs {
    /// Motor controller device (also carries start/stop).
    #[arg(long)]
    motor: Option<PathBuf>,

    /// Face display controller device.
    #[arg(long)]
    face: Option<PathBuf>,

    /// Record commands in memory instead of writing to devices.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct ReplayArgs {
    /// Scenario JSON file.
    scenario: PathBuf,

    #[command(flatten)]
    devices: DeviceArgs,

    /// Target selection: auto or manual.
    #[arg(long)]
    mode: Option<SelectionMode>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long)]
    confidence: Option<f64>,

    /// Dwell time before an automatic lock, in milliseconds.
    #[arg(long)]
    lock_ms: Option<u64>,

    /// Heartbeat interval in milliseconds.
    #[arg(long)]
    heartbeat_ms: Option<u64>,

    /// Selection region width in pixels.
    #[arg(long)]
    region_width: Option<i32>,

    /// Selection region height in pixels.
    #[arg(long)]
    region_height: Option<i32>,

    /// Replay at recorded speed instead of as fast as possible.
    #[arg(long)]
    realtime: bool,

    /// Do not run the heartbeat.
    #[arg(long)]
    no_heartbeat: bool,
}

#[derive(Args)]
struct SendArgs {
    /// Target channel: motor, face or control.
    #[arg(long)]
    channel: ChannelId,

    /// Client-facing command symbol.
    symbol: String,

    #[command(flatten)]
    devices: DeviceArgs,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref());

    match cli.command {
        Command::Replay(args) => run_replay(&args, &settings),
        Command::Send(args) => run_send(&args, &settings),
        Command::InitConfig => {
            let path = cli
                .config
                .or_else(Settings::default_path)
                .ok_or("No config directory available; pass --config")?;
            settings.save_to(&path)?;
            println!("Settings written to {}", path.display());
            Ok(())
        }
    }
}

fn run_replay(args: &ReplayArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(args, settings);
    validate(&config)?;

    let scenario = Arc::new(Scenario::load(&args.scenario)?);
    log::info!(
        "Replaying {} frames ({}x{}) from {}",
        scenario.frames.len(),
        scenario.width,
        scenario.height,
        args.scenario.display()
    );

    let outputs = Outputs::open(&args.devices, settings);
    let router = Arc::new(outputs.router());
    let debouncer = Arc::new(CommandDebouncer::new(router.clone()));

    let detector = ScriptedDetector::new(scenario.clone());
    let tracker_detector = detector.clone();
    let confidence_threshold = config.confidence_threshold;
    let factory: Box<dyn TrackerFactory> = Box::new(move || -> Box<dyn FaceTracker> {
        Box::new(IouFaceTracker::new(
            Box::new(tracker_detector.clone()),
            TRACKER_MIN_IOU,
            confidence_threshold,
        ))
    });
    let session = config.build_session(scenario.width, scenario.height, factory);
    let use_case = FollowMeUseCase::new(
        session,
        Box::new(detector),
        debouncer,
        Box::new(StdoutSessionLogger::new()),
    );

    let service = FollowMeService::new();
    let source = ScriptedFrameSource::new(scenario)
        .with_requests(service.requests())
        .realtime(args.realtime);
    let heartbeat = (!args.no_heartbeat)
        .then(|| HeartbeatEmitter::new(router.clone(), config.heartbeat_interval));

    let handle = service.start(use_case, Box::new(source), heartbeat)?;
    let summary = handle.wait()?;

    println!("Session: {summary}");
    outputs.print_recorded();
    Ok(())
}

fn run_send(args: &SendArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let outputs = Outputs::open(&args.devices, settings);
    let ack = outputs.router().dispatch(args.channel, &args.symbol)?;
    println!("{}: '{}' -> '{}'", ack.channel, ack.requested, ack.sent);
    outputs.print_recorded();
    Ok(())
}

/// Settings values overridden by any flag given on the command line.
fn resolve_config(args: &ReplayArgs, settings: &Settings) -> FollowMeConfig {
    let mut config = settings.to_config();
    if let Some(mode) = args.mode {
        config.selection_mode = mode;
    }
    if let Some(confidence) = args.confidence {
        config.confidence_threshold = confidence;
    }
    if let Some(ms) = args.lock_ms {
        config.lock_duration = Duration::from_millis(ms);
    }
    if let Some(ms) = args.heartbeat_ms {
        config.heartbeat_interval = Duration::from_millis(ms);
    }
    if let Some(w) = args.region_width {
        config.selection_width = w;
    }
    if let Some(h) = args.region_height {
        config.selection_height = h;
    }
    config
}

fn validate(config: &FollowMeConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&config.confidence_threshold) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            config.confidence_threshold
        )
        .into());
    }
    if config.lock_duration.is_zero() {
        return Err("Lock duration must be positive".into());
    }
    if config.heartbeat_interval.is_zero() {
        return Err("Heartbeat interval must be positive".into());
    }
    if config.selection_width <= 0 || config.selection_height <= 0 {
        return Err(format!(
            "Selection region must be positive, got {}x{}",
            config.selection_width, config.selection_height
        )
        .into());
    }
    Ok(())
}

/// Motor and face transports, plus in-memory handles when dry-running.
struct Outputs {
    motor: SharedTransport,
    face: SharedTransport,
    recorded: Option<(RecordingTransport, RecordingTransport)>,
}

impl Outputs {
    fn open(devices: &DeviceArgs, settings: &Settings) -> Self {
        if devices.dry_run {
            let motor = RecordingTransport::with_label("motor");
            let face = RecordingTransport::with_label("face");
            return Self {
                motor: shared(motor.clone()),
                face: shared(face.clone()),
                recorded: Some((motor, face)),
            };
        }

        let motor = devices.motor.as_ref().or(settings.motor_device.as_ref());
        let face = devices.face.as_ref().or(settings.face_device.as_ref());
        Self {
            motor: shared(device_or_closed(motor, "motor")),
            face: shared(device_or_closed(face, "face")),
            recorded: None,
        }
    }

    fn router(&self) -> DispatchRouter {
        DispatchRouter::standard(self.motor.clone(), self.face.clone())
    }

    fn print_recorded(&self) {
        if let Some((motor, face)) = &self.recorded {
            println!("motor/control writes: {}", motor.written().join(" "));
            println!("face writes: {}", face.written().join(" "));
        }
    }
}

fn device_or_closed(path: Option<&PathBuf>, label: &str) -> SerialDeviceTransport {
    match path {
        Some(p) => SerialDeviceTransport::connect(p),
        None => {
            log::warn!("No {label} device configured; {label} channel unavailable");
            SerialDeviceTransport::closed(label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay_args() -> ReplayArgs {
        ReplayArgs {
            scenario: PathBuf::from("scenario.json"),
            devices: DeviceArgs {
                motor: None,
                face: None,
                dry_run: true,
            },
            mode: None,
            confidence: None,
            lock_ms: None,
            heartbeat_ms: None,
            region_width: None,
            region_height: None,
            realtime: false,
            no_heartbeat: false,
        }
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings {
            confidence: 0.7,
            lock_duration_ms: 2000,
            ..Settings::default()
        };
        let args = ReplayArgs {
            confidence: Some(0.4),
            mode: Some(SelectionMode::Manual),
            ..replay_args()
        };

        let config = resolve_config(&args, &settings);
        assert!((config.confidence_threshold - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.selection_mode, SelectionMode::Manual);
        assert_eq!(config.lock_duration, Duration::from_millis(2000));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_confidence = FollowMeConfig {
            confidence_threshold: 1.5,
            ..FollowMeConfig::default()
        };
        assert!(validate(&bad_confidence).is_err());

        let zero_lock = FollowMeConfig {
            lock_duration: Duration::ZERO,
            ..FollowMeConfig::default()
        };
        assert!(validate(&zero_lock).is_err());

        let empty_region = FollowMeConfig {
            selection_width: 0,
            ..FollowMeConfig::default()
        };
        assert!(validate(&empty_region).is_err());

        assert!(validate(&FollowMeConfig::default()).is_ok());
    }

    #[test]
    fn test_dry_run_records_control_on_motor_transport() {
        let outputs = Outputs::open(&replay_args().devices, &Settings::default());
        let router = outputs.router();
        router.dispatch(ChannelId::Motor, "4").unwrap();
        router.dispatch(ChannelId::Control, "s").unwrap();
        router.dispatch(ChannelId::Face, "B").unwrap();

        let (motor, face) = outputs.recorded.as_ref().unwrap();
        assert_eq!(motor.written(), vec!["2", "s"]);
        assert_eq!(face.written(), vec!["B"]);
    }

    #[test]
    fn test_missing_devices_leave_channels_closed() {
        let devices = DeviceArgs {
            motor: None,
            face: None,
            dry_run: false,
        };
        let outputs = Outputs::open(&devices, &Settings::default());
        assert!(!outputs.router().is_open(ChannelId::Motor));
        assert!(!outputs.router().is_open(ChannelId::Face));
    }

    #[test]
    fn test_cli_parses_send() {
        let cli = Cli::try_parse_from([
            "facelock", "send", "--channel", "motor", "4", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.channel, ChannelId::Motor);
                assert_eq!(args.symbol, "4");
                assert!(args.devices.dry_run);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_channel() {
        let result = Cli::try_parse_from(["facelock", "send", "--channel", "wheels", "4"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_replay_demo_scenarios_dry_run() {
        let demos = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        for (name, mode) in [
            ("follow_then_lose.json", SelectionMode::Auto),
            ("manual_click.json", SelectionMode::Manual),
        ] {
            let args = ReplayArgs {
                scenario: demos.join(name),
                mode: Some(mode),
                no_heartbeat: true,
                ..replay_args()
            };
            run_replay(&args, &Settings::default()).unwrap();
        }
    }

    #[test]
    fn test_replay_fails_without_motor_device() {
        let demos = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let args = ReplayArgs {
            scenario: demos.join("follow_then_lose.json"),
            devices: DeviceArgs {
                motor: None,
                face: None,
                dry_run: false,
            },
            no_heartbeat: true,
            ..replay_args()
        };
        let err = run_replay(&args, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("motor"));
    }
}
