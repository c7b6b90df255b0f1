// tests/end_to_end_scripts.rs
#![cfg(unix)]

use std::sync::Arc;

use tfstack::jobs::{DispatcherOptions, JobDispatcher, JobResult, LocalDispatcher};
use tfstack::operation::{OperationExecutor, OperationPayload, OperationRequest};
use tfstack::types::{JobStatus, OperationKind};
use tfstack_test_utils::builders::ConfigFileBuilder;
use tfstack_test_utils::scripts::ScriptDir;
use tfstack_test_utils::{init_tracing, wait_for_terminal};

const CREATE: &str = r#"echo "terraform apply"
echo 'resource_id = "e2e-stack"'
"#;

const READ: &str = r#"[ -z "$1" ] && { echo "error:IdNotSpecified"; exit 1; }
[ -d "ws-$1" ] || { echo "error:WorkspaceNotExist"; exit 1; }
cat "ws-$1/resources"
"#;

const DELETE: &str = r#"[ -z "$1" ] && { echo "error:IdNotSpecified"; exit 1; }
[ -d "ws-$1" ] || { echo "error:WorkspaceNotExist"; exit 1; }
rm -r "ws-$1"
echo "Destroy complete!"
"#;

fn dispatcher_for(builder: ConfigFileBuilder) -> Arc<dyn JobDispatcher> {
    let cfg = builder.build();
    let executor = OperationExecutor::from_config(&cfg);
    Arc::new(LocalDispatcher::new(executor, DispatcherOptions::from(&cfg.jobs)))
}

#[tokio::test]
async fn create_read_delete_lifecycle() {
    init_tracing();
    let dir = ScriptDir::new().with_defaults(CREATE, READ, DELETE);
    std::fs::create_dir(dir.path().join("ws-e2e-stack")).unwrap();
    dir.write("ws-e2e-stack/resources", "aws_instance.web\naws_s3_bucket.logs\n");
    let dispatcher = dispatcher_for(ConfigFileBuilder::new(dir.path()));

    let id = dispatcher
        .enqueue(OperationRequest::create(dir.path()))
        .await
        .unwrap();
    let record = wait_for_terminal(dispatcher.as_ref(), &id).await;
    let created = match record.result() {
        Some(JobResult::Success(payload)) => payload.resource_id().unwrap().to_string(),
        other => panic!("create failed: {other:?}"),
    };
    assert_eq!(created, "e2e-stack");

    let request = OperationRequest::read(dir.path(), created.clone()).unwrap();
    let id = dispatcher.enqueue(request).await.unwrap();
    let record = wait_for_terminal(dispatcher.as_ref(), &id).await;
    assert_eq!(record.kind(), OperationKind::Read);
    assert_eq!(
        record.result(),
        Some(&JobResult::Success(OperationPayload::Read {
            content: vec!["aws_instance.web".into(), "aws_s3_bucket.logs".into()]
        }))
    );

    let request = OperationRequest::delete(dir.path(), created.clone()).unwrap();
    let id = dispatcher.enqueue(request).await.unwrap();
    let record = wait_for_terminal(dispatcher.as_ref(), &id).await;
    assert_eq!(
        record.result(),
        Some(&JobResult::Success(OperationPayload::Deleted))
    );
    assert!(!dir.path().join("ws-e2e-stack").exists());

    // Deleting again reports the script's known error.
    let request = OperationRequest::delete(dir.path(), created).unwrap();
    let id = dispatcher.enqueue(request).await.unwrap();
    let record = wait_for_terminal(dispatcher.as_ref(), &id).await;
    assert_eq!(record.status(), JobStatus::Failed);
    assert_eq!(
        record.result(),
        Some(&JobResult::Failure("error:WorkspaceNotExist".into()))
    );
}

#[tokio::test]
async fn slow_script_is_killed_at_timeout() {
    init_tracing();
    let dir = ScriptDir::new().with_defaults("sleep 5\necho 'resource_id \"late\"'\n", READ, DELETE);
    let dispatcher = dispatcher_for(ConfigFileBuilder::new(dir.path()).with_timeout("200ms"));

    let id = dispatcher
        .enqueue(OperationRequest::create(dir.path()))
        .await
        .unwrap();
    let record = wait_for_terminal(dispatcher.as_ref(), &id).await;

    assert_eq!(record.status(), JobStatus::Failed);
    match record.result() {
        Some(JobResult::Failure(msg)) => assert!(msg.starts_with("job timed out"), "{msg}"),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_scripts_dir_fails_job() {
    init_tracing();
    let dir = ScriptDir::new();
    let missing = dir.path().join("gone");
    let dispatcher = dispatcher_for(ConfigFileBuilder::new(&missing));

    let id = dispatcher
        .enqueue(OperationRequest::create(&missing))
        .await
        .unwrap();
    let record = wait_for_terminal(dispatcher.as_ref(), &id).await;

    match record.result() {
        Some(JobResult::Failure(msg)) => {
            assert!(msg.starts_with("Unable to execute provisioning script"), "{msg}")
        }
        other => panic!("expected launch failure, got {other:?}"),
    }
}
