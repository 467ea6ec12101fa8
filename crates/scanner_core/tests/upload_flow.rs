use std::path::PathBuf;

use pretty_assertions::assert_eq;
use scanner_core::{
    update, AppState, CoreOptions, Effect, FlowKind, Msg, Phase, RequestError, RequestSeq,
    Severity, UPLOAD_FALLBACK_REASON, UPLOAD_SUCCESS_MESSAGE,
};

fn init_logging() {
    scanner_logging::initialize_for_tests();
}

fn submit(state: AppState, path: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::UploadSubmitted(PathBuf::from(path)))
}

fn upload_seq(effects: &[Effect]) -> RequestSeq {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Upload { seq, .. } => Some(*seq),
            _ => None,
        })
        .expect("upload effect")
}

#[test]
fn upload_moves_to_pending_and_emits_effect() {
    init_logging();
    let (mut state, effects) = submit(AppState::new(), "sources.csv");

    assert_eq!(
        effects,
        vec![Effect::Upload {
            seq: 1,
            path: PathBuf::from("sources.csv"),
        }]
    );
    assert_eq!(state.upload().phase(), Phase::Pending);
    assert_eq!(state.view().upload.in_flight, vec!["sources.csv".to_string()]);
    assert!(state.consume_dirty());
}

#[test]
fn successful_upload_notifies_success() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "sources.csv");
    let seq = upload_seq(&effects);

    let (state, effects) = update(state, Msg::UploadDone { seq, result: Ok(()) });

    assert_eq!(state.upload().phase(), Phase::Succeeded);
    assert_eq!(state.upload().data(), Some(&PathBuf::from("sources.csv")));
    assert_eq!(state.notification().severity(), Severity::Success);
    assert_eq!(state.notification().message(), UPLOAD_SUCCESS_MESSAGE);
    assert!(matches!(effects.as_slice(), [Effect::ScheduleDismiss { .. }]));

    let view = state.view();
    assert!(view.upload.in_flight.is_empty());
    assert_eq!(view.upload.last_uploaded.as_deref(), Some("sources.csv"));
}

#[test]
fn rejected_upload_reports_backend_detail() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "photo.png");
    let seq = upload_seq(&effects);

    let (state, effects) = update(
        state,
        Msg::UploadDone {
            seq,
            result: Err(RequestError::new(
                Some("Invalid file format".into()),
                "http status 400",
            )),
        },
    );

    assert_eq!(state.upload().phase(), Phase::Failed);
    assert_eq!(state.upload().error(), Some("Invalid file format"));
    assert_eq!(state.notification().severity(), Severity::Error);
    assert_eq!(state.notification().message(), "Invalid file format");
    assert!(effects.iter().any(|effect| matches!(
        effect,
        Effect::Diagnostic {
            flow: FlowKind::Upload,
            ..
        }
    )));
}

#[test]
fn transport_failure_uses_fallback_reason() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "sources.csv");
    let seq = upload_seq(&effects);

    let (state, _) = update(
        state,
        Msg::UploadDone {
            seq,
            result: Err(RequestError::new(None, "network error")),
        },
    );

    assert_eq!(state.notification().message(), UPLOAD_FALLBACK_REASON);
    assert!(!state.notification().message().is_empty());
}

#[test]
fn failure_keeps_last_uploaded_file() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "first.csv");
    let (state, _) = update(
        state,
        Msg::UploadDone {
            seq: upload_seq(&effects),
            result: Ok(()),
        },
    );
    let (state, effects) = submit(state, "second.csv");
    let (state, _) = update(
        state,
        Msg::UploadDone {
            seq: upload_seq(&effects),
            result: Err(RequestError::new(None, "http status 500")),
        },
    );

    assert_eq!(state.upload().phase(), Phase::Failed);
    assert_eq!(state.upload().data(), Some(&PathBuf::from("first.csv")));
}

#[test]
fn second_upload_is_rejected_while_pending() {
    init_logging();
    let (state, _) = submit(AppState::new(), "first.csv");
    let before = state.clone();

    let (state, effects) = submit(state, "second.csv");

    assert_eq!(state, before);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Diagnostic {
            flow: FlowKind::Upload,
            ..
        }]
    ));
}

#[test]
fn unguarded_uploads_each_get_a_notification() {
    init_logging();
    let options = CoreOptions {
        single_upload_in_flight: false,
        ..CoreOptions::default()
    };
    let (state, first_effects) = submit(AppState::with_options(options), "first.csv");
    let (state, second_effects) = submit(state, "second.csv");
    let first = upload_seq(&first_effects);
    let second = upload_seq(&second_effects);
    assert_ne!(first, second);

    let (state, _) = update(state, Msg::UploadDone { seq: first, result: Ok(()) });
    // The newer upload is still running.
    assert_eq!(state.upload().phase(), Phase::Pending);
    let first_token = state.notification().token();

    let (state, _) = update(
        state,
        Msg::UploadDone {
            seq: second,
            result: Err(RequestError::new(Some("Duplicate import".into()), "http status 409")),
        },
    );

    assert_eq!(state.upload().phase(), Phase::Failed);
    assert_eq!(state.notification().message(), "Duplicate import");
    assert!(state.notification().token() > first_token);
}
