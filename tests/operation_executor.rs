// tests/operation_executor.rs

use std::path::Path;

use tfstack::errors::{ExecutionError, OperationError, OperationErrorKind, TfstackError};
use tfstack::exec::{NoopObserver, ProcessResult};
use tfstack::operation::{OperationPayload, OperationRequest};
use tfstack::types::OperationKind;
use tfstack_test_utils::builders::{default_executor, ConfigFileBuilder};
use tfstack_test_utils::init_tracing;

// ---------------------------------------------------------------------------
// Interpretation of finished runs
// ---------------------------------------------------------------------------

#[test]
fn create_with_marker_line_yields_resource_id() {
    init_tracing();
    let output = ProcessResult::from_lines(["starting apply", r#"resource_id "123""#], 0);

    let payload = default_executor()
        .interpret(OperationKind::Create, &output)
        .unwrap();

    assert_eq!(
        payload,
        OperationPayload::Created {
            resource_id: "123".to_string()
        }
    );
    assert_eq!(payload.message(), "TFstack created successfully");
}

#[test]
fn create_conflict_surfaces_signature_verbatim() {
    init_tracing();
    let output =
        ProcessResult::from_lines(["applying", "error:ExistingWorkspaceContainsResources"], 1);

    let err = default_executor()
        .interpret(OperationKind::Create, &output)
        .unwrap_err();

    assert_eq!(err.kind(), OperationErrorKind::KnownScriptError);
    assert_eq!(err.to_string(), "error:ExistingWorkspaceContainsResources");
}

#[test]
fn create_success_without_id_is_inconsistent() {
    init_tracing();
    let output = ProcessResult::from_lines(["applied ok"], 0);

    let err = default_executor()
        .interpret(OperationKind::Create, &output)
        .unwrap_err();

    assert!(matches!(err, OperationError::InconsistentSuccess));
    assert_eq!(
        err.to_string(),
        "Provisioning script reported success but produced no identifiable resource_id"
    );
}

#[test]
fn create_with_empty_quoted_id_is_inconsistent() {
    init_tracing();
    let output = ProcessResult::from_lines(["applying", r#"resource_id """#], 0);

    let err = default_executor()
        .interpret(OperationKind::Create, &output)
        .unwrap_err();

    assert!(matches!(err, OperationError::InconsistentSuccess));
}

#[test]
fn create_does_not_recognise_read_delete_signatures() {
    init_tracing();
    let output = ProcessResult::from_lines(["error:IdNotSpecified"], 1);

    let err = default_executor()
        .interpret(OperationKind::Create, &output)
        .unwrap_err();

    assert!(matches!(err, OperationError::UnknownScriptError));
}

#[test]
fn read_success_returns_all_lines() {
    init_tracing();
    let output = ProcessResult::from_lines(["aws_instance.web", "aws_s3_bucket.logs"], 0);

    let payload = default_executor()
        .interpret(OperationKind::Read, &output)
        .unwrap();

    assert_eq!(
        payload,
        OperationPayload::Read {
            content: vec!["aws_instance.web".into(), "aws_s3_bucket.logs".into()]
        }
    );
}

#[test]
fn read_unknown_failure() {
    init_tracing();
    let output = ProcessResult::from_lines(["reading"], 1);

    let err = default_executor()
        .interpret(OperationKind::Read, &output)
        .unwrap_err();

    assert!(matches!(err, OperationError::UnknownScriptError));
    assert_eq!(
        err.to_string(),
        "Unknown error occurred during execution of provisioning script"
    );
}

#[test]
fn read_missing_workspace_is_known() {
    init_tracing();
    let output = ProcessResult::from_lines(["Workspace stack-9 not found", "error:WorkspaceNotExist"], 1);

    let err = default_executor()
        .interpret(OperationKind::Read, &output)
        .unwrap_err();

    assert_eq!(err.to_string(), "error:WorkspaceNotExist");
}

#[test]
fn delete_success_has_no_payload_fields() {
    init_tracing();
    let output = ProcessResult::from_lines(["destroying", "done"], 0);

    let payload = default_executor()
        .interpret(OperationKind::Delete, &output)
        .unwrap();

    assert_eq!(payload, OperationPayload::Deleted);
    assert_eq!(payload.message(), "TFstack deleted successfully");
}

#[test]
fn custom_known_errors_replace_the_defaults() {
    init_tracing();
    let executor = ConfigFileBuilder::new(".")
        .with_known_errors(OperationKind::Delete, &["error:Locked"])
        .executor();

    let locked = ProcessResult::from_lines(["error:Locked"], 1);
    let missing = ProcessResult::from_lines(["error:WorkspaceNotExist"], 1);

    assert_eq!(
        executor
            .interpret(OperationKind::Delete, &locked)
            .unwrap_err()
            .to_string(),
        "error:Locked"
    );
    assert!(matches!(
        executor.interpret(OperationKind::Delete, &missing),
        Err(OperationError::UnknownScriptError)
    ));
}

// ---------------------------------------------------------------------------
// Requests and invocations
// ---------------------------------------------------------------------------

#[test]
fn read_and_delete_require_a_non_empty_id() {
    for result in [
        OperationRequest::read(".", ""),
        OperationRequest::delete(".", "   "),
        OperationRequest::new(OperationKind::Read, ".", None),
    ] {
        assert!(matches!(result, Err(TfstackError::InvalidRequest(_))));
    }
}

#[test]
fn create_takes_no_id() {
    let result = OperationRequest::new(OperationKind::Create, ".", Some("abc".to_string()));
    assert!(matches!(result, Err(TfstackError::InvalidRequest(_))));
}

#[test]
fn shell_invocation_passes_script_then_id() {
    let executor = default_executor();
    let request = OperationRequest::read("/srv/tf", "abc").unwrap();

    let (program, args) = executor.invocation(&request);

    assert_eq!(program, "/bin/sh");
    assert_eq!(args, vec!["./read_tfstack.sh", "abc"]);
}

#[test]
fn direct_invocation_without_shell() {
    let executor = ConfigFileBuilder::new(".").with_shell("").executor();

    let (program, args) = executor.invocation(&OperationRequest::create("/srv/tf"));
    assert_eq!(program, "./create_tfstack.sh");
    assert!(args.is_empty());

    let request = OperationRequest::delete("/srv/tf", "xyz").unwrap();
    let (program, args) = executor.invocation(&request);
    assert_eq!(program, "./delete_tfstack.sh");
    assert_eq!(args, vec!["xyz"]);
}

#[test]
fn payload_json_shapes() {
    let created = serde_json::to_value(OperationPayload::Created {
        resource_id: "123".into(),
    })
    .unwrap();
    assert_eq!(
        created,
        serde_json::json!({ "message": "TFstack created successfully", "resource_id": "123" })
    );

    let read = serde_json::to_value(OperationPayload::Read {
        content: vec!["a".into()],
    })
    .unwrap();
    assert_eq!(
        read,
        serde_json::json!({ "message": "TFstack read successfully", "content": ["a"] })
    );

    let deleted = serde_json::to_value(OperationPayload::Deleted).unwrap();
    assert_eq!(
        deleted,
        serde_json::json!({ "message": "TFstack deleted successfully" })
    );
}

// ---------------------------------------------------------------------------
// Real scripts
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod scripts {
    use super::*;
    use tfstack_test_utils::scripts::ScriptDir;
    use tfstack_test_utils::with_timeout;

    const CREATE: &str = r#"echo "Initializing workspace"
echo "Apply complete!"
echo 'resource_id = "stack-42"'
"#;

    const READ: &str = r#"[ -z "$1" ] && { echo "error:IdNotSpecified"; exit 1; }
[ "$1" = "missing" ] && { echo "error:WorkspaceNotExist"; exit 1; }
echo "workspace $1"
echo "aws_instance.web"
"#;

    const DELETE: &str = r#"[ -z "$1" ] && { echo "error:IdNotSpecified"; exit 1; }
echo "destroying $1"
"#;

    fn fixture() -> ScriptDir {
        ScriptDir::new().with_defaults(CREATE, READ, DELETE)
    }

    #[tokio::test]
    async fn create_script_yields_id() {
        init_tracing();
        let dir = fixture();

        let payload = with_timeout(
            default_executor().execute(&OperationRequest::create(dir.path()), &NoopObserver),
        )
        .await
        .unwrap();

        assert_eq!(payload.resource_id(), Some("stack-42"));
    }

    #[tokio::test]
    async fn read_script_receives_id_as_single_argument() {
        init_tracing();
        let dir = fixture();
        let request = OperationRequest::read(dir.path(), "abc; echo pwned").unwrap();

        let payload = with_timeout(default_executor().execute(&request, &NoopObserver))
            .await
            .unwrap();

        assert_eq!(
            payload,
            OperationPayload::Read {
                content: vec!["workspace abc; echo pwned".into(), "aws_instance.web".into()]
            }
        );
    }

    #[tokio::test]
    async fn read_script_known_error() {
        init_tracing();
        let dir = fixture();
        let request = OperationRequest::read(dir.path(), "missing").unwrap();

        let err = with_timeout(default_executor().execute(&request, &NoopObserver))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "error:WorkspaceNotExist");
    }

    #[tokio::test]
    async fn delete_script_succeeds() {
        init_tracing();
        let dir = fixture();
        let request = OperationRequest::delete(dir.path(), "stack-42").unwrap();

        let payload = with_timeout(default_executor().execute(&request, &NoopObserver))
            .await
            .unwrap();

        assert_eq!(payload, OperationPayload::Deleted);
    }

    #[tokio::test]
    async fn missing_script_is_an_unknown_failure() {
        init_tracing();
        // The shell starts but cannot open the script and exits nonzero.
        let dir = ScriptDir::new();

        let err = with_timeout(
            default_executor().execute(&OperationRequest::create(dir.path()), &NoopObserver),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, OperationError::UnknownScriptError));
    }

    #[tokio::test]
    async fn undecodable_output_is_execution_unavailable() {
        init_tracing();
        let dir = ScriptDir::new().with_defaults(r"printf 'applying\n\377\n'", READ, DELETE);

        let err = with_timeout(
            default_executor().execute(&OperationRequest::create(dir.path()), &NoopObserver),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), OperationErrorKind::ExecutionUnavailable);
        assert!(matches!(
            err.execution_error(),
            Some(ExecutionError::OutputDecodingFailed { line: 2, .. })
        ));
    }

    #[tokio::test]
    async fn missing_working_directory_is_execution_unavailable() {
        init_tracing();
        let request = OperationRequest::create(Path::new("/definitely/not/a/real/dir"));

        let err = with_timeout(default_executor().execute(&request, &NoopObserver))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), OperationErrorKind::ExecutionUnavailable);
        assert!(matches!(
            err.execution_error(),
            Some(ExecutionError::LaunchFailed { .. })
        ));
        assert!(err
            .to_string()
            .starts_with("Unable to execute provisioning script"));
    }
}
