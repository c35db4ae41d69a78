//! Interactive session runner
//!
//! Single-threaded event loop over stdin commands, composer events,
//! status messages and Ctrl-C.

use std::process::ExitCode;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::application::ports::{
    AudioOutput, CaptureCapability, CaptureDevice, Clock, ConfigStore, Notice, Notifier,
};
use crate::application::{Composer, ComposerError, ComposerOptions, SessionContext, Status};
use crate::domain::audio::{InvalidPolicyError, PlaybackPolicy};
use crate::domain::composer::ComposerVariant;
use crate::domain::config::AppConfig;
use crate::domain::error::{DurationParseError, InvalidModuleError, InvalidVariantError};
use crate::domain::recording::{Duration, RecorderState};
use crate::domain::timeline::ModuleTag;
use crate::infrastructure::{create_notifier, CpalCapture, RodioOutput, SystemClock};

use super::command::{Command, HELP};
use super::demo::demo_timeline;
use super::export::timeline_json;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// A merged configuration that cannot start a session
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    MaxDuration(#[from] DurationParseError),

    #[error(transparent)]
    Module(#[from] InvalidModuleError),

    #[error(transparent)]
    Variant(#[from] InvalidVariantError),

    #[error(transparent)]
    Policy(#[from] InvalidPolicyError),
}

/// Validated settings for one interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub context: SessionContext,
    pub composer: ComposerOptions,
    pub notify: bool,
    pub demo: bool,
}

impl SessionOptions {
    /// Validate a merged configuration. Unlike the `*_or_default` getters,
    /// a present but malformed value is an error here.
    pub fn from_config(config: &AppConfig, demo: bool) -> Result<Self, SetupError> {
        let module = match config.module.as_deref() {
            Some(name) => ModuleTag::new(name)?,
            None => ModuleTag::default(),
        };
        let variant = match config.variant.as_deref() {
            Some(v) => v.parse::<ComposerVariant>()?,
            None => ComposerVariant::default(),
        };
        let max_duration = match config.max_duration.as_deref() {
            Some(d) => d.parse::<Duration>()?,
            None => Duration::default_max_duration(),
        };
        let playback_policy = match config.playback_policy.as_deref() {
            Some(p) => p.parse::<PlaybackPolicy>()?,
            None => PlaybackPolicy::default(),
        };

        Ok(Self {
            context: SessionContext::new(config.author_or_default(), module),
            composer: ComposerOptions {
                variant,
                max_duration: Some(max_duration),
                playback_policy,
            },
            notify: config.notify_or_default(),
            demo,
        })
    }
}

/// Load and merge configuration: defaults < file < environment and CLI.
///
/// Environment variables arrive through clap, so they are already part of
/// `cli_config`, below explicit flags. An unreadable file is reported on
/// the presenter, since logging is configured from the merged result.
pub async fn load_merged_config<S: ConfigStore>(
    store: &S,
    cli_config: AppConfig,
    presenter: &Presenter,
) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            presenter.warn(&format!(
                "Ignoring config file {}: {}",
                store.path().display(),
                e
            ));
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Report whether audio capture is available
pub fn run_check<G: CaptureCapability>(guard: &G, presenter: &Presenter) -> ExitCode {
    if guard.is_capture_available() {
        presenter.key_value("capture", "available");
    } else {
        presenter.key_value("capture", "unavailable");
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Run an interactive session on stdin with the native adapters
pub async fn run_interactive(options: SessionOptions) -> ExitCode {
    let presenter = Presenter::new();
    let clock = SystemClock;

    let mut composer = Composer::new(
        CpalCapture::new(),
        RodioOutput::new(),
        clock,
        options.context.clone(),
        options.composer,
    );
    if options.demo {
        composer = composer.with_timeline(demo_timeline(clock.now()));
    }

    presenter.info(&format!(
        "Writing as {} in {}. Type 'help' for commands.",
        options.context.author, options.context.module
    ));
    if !composer.is_capture_available() {
        presenter.warn("No microphone found; recording is disabled");
    }

    let notifier = create_notifier(options.notify);
    let stdin = BufReader::new(tokio::io::stdin());

    match run_session(composer, stdin, notifier.as_ref()).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&format!("Failed to read input: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Drive a composer from line-oriented input until `quit`, end of input
/// or Ctrl-C. The composer is torn down on every exit path.
pub async fn run_session<D, O, C, R>(
    mut composer: Composer<D, O, C>,
    input: R,
    notifier: &dyn Notifier,
) -> Result<(), std::io::Error>
where
    D: CaptureDevice,
    O: AudioOutput,
    C: Clock,
    R: AsyncBufRead + Unpin,
{
    let mut presenter = Presenter::new();
    let mut statuses = composer.subscribe();
    let mut lines = input.lines();

    presenter.prompt();
    let result = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match Command::parse(&line) {
                    Ok(Command::Quit) => break Ok(()),
                    Ok(command) => {
                        execute(&mut composer, command, &presenter).await;
                        sync_timer(&composer, &mut presenter);
                        presenter.prompt();
                    }
                    Err(e) => {
                        presenter.error(&e.to_string());
                        presenter.prompt();
                    }
                },
                Ok(None) => {
                    debug!("end of input");
                    break Ok(());
                }
                Err(e) => break Err(e),
            },
            event = composer.next_event() => {
                composer.handle_event(event);
                sync_timer(&composer, &mut presenter);
            }
            status = statuses.recv() => match status {
                Ok(status) => announce(&presenter, notifier, &status).await,
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "status messages dropped"),
                Err(RecvError::Closed) => {}
            },
            _ = tokio::signal::ctrl_c() => {
                presenter.warn("Interrupted");
                break Ok(());
            }
        }
    };

    composer.teardown();
    presenter.stop_recording_timer();
    while let Ok(status) = statuses.try_recv() {
        presenter.status(&status);
    }
    result
}

async fn execute<D, O, C>(composer: &mut Composer<D, O, C>, command: Command, presenter: &Presenter)
where
    D: CaptureDevice,
    O: AudioOutput,
    C: Clock,
{
    debug!(?command, "command");
    match command {
        Command::Record => {
            if let Err(e) = composer.start_recording().await {
                report(presenter, &e);
            }
        }
        Command::Stop => {
            if composer.recorder().state() != RecorderState::Recording {
                presenter.warn("Not recording");
            } else {
                composer.stop_recording();
            }
        }
        Command::Discard => {
            if !composer.discard_recording() {
                presenter.info("Nothing to discard");
            }
        }
        Command::Play(target) => {
            let result = match target {
                Some(id) => composer.play_entry(id).await,
                None => composer.play_draft().await,
            };
            match result {
                Ok(true) => {}
                Ok(false) => presenter.info("Already playing"),
                Err(e) => report(presenter, &e),
            }
        }
        Command::Halt => {
            if !composer.stop_playback() {
                presenter.info("Nothing is playing");
            }
        }
        Command::Text(text) => {
            if composer.set_text(&text) {
                presenter.warn(&format!(
                    "Text truncated to {} characters",
                    composer.draft().max_chars()
                ));
            }
        }
        Command::Clear => {
            composer.set_text("");
        }
        Command::Send => {
            if let Err(e) = composer.submit() {
                debug!(error = %e, "already announced");
            }
        }
        Command::List => presenter.timeline(composer.timeline().entries()),
        Command::Export => match timeline_json(composer.timeline()) {
            Ok(json) => presenter.output(&json),
            Err(e) => presenter.error(&format!("Export failed: {}", e)),
        },
        Command::Status => presenter.snapshot(&composer.snapshot()),
        Command::Help => presenter.output(HELP),
        Command::Quit | Command::Empty => {}
    }
}

/// Print errors the status channel has not already announced
fn report(presenter: &Presenter, error: &ComposerError) {
    match error {
        ComposerError::Recorder(_) | ComposerError::Playback(_) | ComposerError::Validation(_) => {
            debug!(error = %error, "already announced");
        }
        ComposerError::NoSuchEntry(_) | ComposerError::NotAudio(_) | ComposerError::NoDraftAudio => {
            presenter.warn(&error.to_string())
        }
    }
}

/// Keep the live timer in step with the recorder
fn sync_timer<D, O, C>(composer: &Composer<D, O, C>, presenter: &mut Presenter)
where
    D: CaptureDevice,
    O: AudioOutput,
    C: Clock,
{
    let recorder = composer.recorder();
    if recorder.state() == RecorderState::Recording {
        if !presenter.is_timer_running() {
            presenter.start_recording_timer();
        }
        presenter.update_recording_timer(recorder.elapsed());
    } else if presenter.is_timer_running() {
        presenter.stop_recording_timer();
    }
}

async fn announce(presenter: &Presenter, notifier: &dyn Notifier, status: &Status) {
    presenter.status(status);

    if let Err(e) = notifier.notify(&Notice::from(status)).await {
        warn!(error = %e, "notification failed");
    }
}
