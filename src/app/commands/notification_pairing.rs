//! Pairing check against the centralized notification bot.

use std::fs;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::app::AppContext;
use crate::app::config::write_private_file;
use crate::domain::AppError;
use crate::domain::pairing::{PairingOutcome, PairingSession, PairingStatus};
use crate::domain::server_identity::{derive_server_id, parse_server_id, render_identity_file};
use crate::ports::{Prompter, RegistrationProbe};

type ProbeResult = Result<RegistrationProbe, AppError>;

/// How long the dialog waits for a probe before handing control back.
const PROBE_WAIT: Duration = Duration::from_secs(15);

const CHECK: &str = "Check pairing";
const SKIP: &str = "Skip verification";
const CONTINUE: &str = "Continue";

/// Read the server id, deriving and persisting one on first use.
pub fn load_or_create_server_id(ctx: &AppContext) -> Result<String, AppError> {
    let path = ctx.layout().server_identity_path();
    if let Ok(content) = fs::read_to_string(&path)
        && let Some(id) = parse_server_id(&content)
    {
        return Ok(id);
    }

    let system = ctx.system();
    let machine_id = fs::read_to_string(&system.machine_id).unwrap_or_else(|err| {
        ctx.logger().warning(&format!("cannot read {}: {}", system.machine_id.display(), err));
        String::new()
    });
    let hostname = fs::read_to_string(&system.hostname).unwrap_or_else(|_| "localhost".into());

    let id = derive_server_id(&machine_id, &hostname);
    write_private_file(&path, &render_identity_file(&id), false)?;
    ctx.logger().info(&format!("server id {} stored in {}", id, path.display()));
    Ok(id)
}

fn spawn_probe(ctx: &AppContext, session: &PairingSession, tx: &Sender<ProbeResult>) {
    let bot = ctx.bot();
    let closing = session.closing_flag();
    let server_id = session.server_id().to_string();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = bot.check_registration(&server_id);
        if !closing.load(Ordering::SeqCst) {
            let _ = tx.send(result);
        }
    });
}

fn drain(session: &mut PairingSession, rx: &Receiver<ProbeResult>) {
    while let Ok(result) = rx.try_recv() {
        session.complete(result);
    }
}

/// Run the check/skip loop until the server is verified or the operator skips.
pub fn execute(ctx: &AppContext, prompter: &mut dyn Prompter) -> Result<PairingOutcome, AppError> {
    let server_id = load_or_create_server_id(ctx)?;
    prompter.note(&format!(
        "Open the notification bot, send /start and register server id {}.",
        server_id
    ));

    let mut session = PairingSession::new(server_id);
    let (tx, rx) = mpsc::channel::<ProbeResult>();

    let result = pairing_loop(ctx, prompter, &mut session, &tx, &rx);
    session.close();
    result?;

    let outcome = session.outcome();
    if outcome.skipped_verification {
        ctx.logger().warning("notification pairing not verified; run the check again later");
    }
    Ok(outcome)
}

fn pairing_loop(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
    session: &mut PairingSession,
    tx: &Sender<ProbeResult>,
    rx: &Receiver<ProbeResult>,
) -> Result<(), AppError> {
    loop {
        drain(session, rx);
        if session.status() != &PairingStatus::Idle {
            prompter.note(&session.status().describe());
        }

        if session.status() == &PairingStatus::Verified {
            prompter.choice("Pairing verified.", &[CONTINUE], 0)?;
            return Ok(());
        }

        match prompter.choice("Notification pairing", &[CHECK, SKIP], 0)? {
            0 => {
                if !session.begin_check() {
                    prompter.note("A check is already running, please wait.");
                    continue;
                }
                ctx.logger().debug(&format!("pairing probe #{}", session.attempts()));
                spawn_probe(ctx, session, tx);
                match rx.recv_timeout(PROBE_WAIT) {
                    Ok(result) => {
                        session.complete(result);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        prompter.note("The bot has not answered yet.");
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        session.complete(Err(AppError::RemotePairing {
                            message: "probe stopped unexpectedly".into(),
                            status: None,
                        }));
                    }
                }
            }
            _ => {
                session.skip();
                return Ok(());
            }
        }
    }
}
