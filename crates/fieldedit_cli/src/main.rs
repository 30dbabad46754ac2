//! Command-line probe for the field edit core.
//!
//! # Responsibility
//! - Classify a text fragment the way the `edit` filter would.
//! - Replay one transport message against a record store file.
//!
//! Usage:
//! - `fieldedit_cli` prints the core version.
//! - `fieldedit_cli check <text>`
//! - `fieldedit_cli send <db_path> <message> [config_json]`
//!
//! Set `FIELDEDIT_LOG_DIR` to an absolute directory to enable file logging.

use fieldedit_core::db::open_db;
use fieldedit_core::{
    classify, core_version, default_log_level, init_logging, parse_message, BridgeMessage,
    EditConfig, EditSession, Eligibility, RecordId, SenderContext, SqliteRecordStore,
    ViewerSurface,
};
use std::process::ExitCode;

/// Viewer stand-in that reports side effects on stdout.
struct HeadlessViewer {
    current: Option<RecordId>,
}

impl ViewerSurface for HeadlessViewer {
    fn current_record(&self) -> Option<RecordId> {
        self.current
    }

    fn suppress_auto_advance(&mut self) {
        println!("viewer: auto-advance suppressed");
    }

    fn request_rerender(&mut self, record_id: RecordId) {
        println!("viewer: rerender record {record_id}");
    }
}

const LOG_DIR_ENV: &str = "FIELDEDIT_LOG_DIR";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        None => {
            println!("fieldedit_core version={}", core_version());
            Ok(())
        }
        Some("check") if args.len() == 2 => {
            run_check(&args[1]);
            Ok(())
        }
        Some("send") if args.len() == 3 || args.len() == 4 => {
            run_send(&args[1], &args[2], args.get(3).map(String::as_str))
        }
        Some(_) => Err(
            "usage: fieldedit_cli [check <text> | send <db_path> <message> [config_json]]"
                .to_string(),
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run_check(text: &str) {
    match classify(text) {
        Eligibility::Editable => println!("editable"),
        Eligibility::Blocked(family) => println!("plain ({})", family.as_str()),
    }
}

fn run_send(db_path: &str, message: &str, config_json: Option<&str>) -> Result<(), String> {
    let config = match config_json {
        Some(raw) => EditConfig::from_json_str(raw).map_err(|err| err.to_string())?,
        None => EditConfig::default(),
    };
    let mut conn = open_db(db_path).map_err(|err| err.to_string())?;

    let parsed = parse_message(message);
    // The replayed record stands in for the one on screen.
    let current = match &parsed {
        Some(Ok(BridgeMessage::Save(request))) => request.record_id,
        _ => None,
    };
    let mut session = EditSession::new(
        SqliteRecordStore::new(&mut conn),
        HeadlessViewer { current },
    );

    if let Some(Ok(BridgeMessage::Save(request))) = parsed {
        let outcome = session
            .save(&request, &config)
            .map_err(|err| err.to_string())?;
        println!("outcome: {outcome}");
        return Ok(());
    }

    let (handled, _) =
        session.on_message((false, None), message, SenderContext::Viewer, &config);
    println!("handled: {handled}");
    Ok(())
}
