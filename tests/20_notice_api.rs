mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{MockBackend, CREATE, DELETE, DETAIL, LIST, UPDATE};
use dutying_admin::api::{ApiClient, NoticeApi};
use dutying_admin::error::{ApiError, NoticeError};
use dutying_admin::types::{NoticeFields, NoticeListParams, Platform, PlatformFilter};

fn api(backend: &MockBackend) -> Result<NoticeApi> {
    Ok(NoticeApi::new(Arc::new(ApiClient::new(&backend.base_url)?)))
}

fn fields(title: &str) -> NoticeFields {
    NoticeFields {
        platform: Platform::Web,
        version: "2.0.0".into(),
        title: title.into(),
        content: "content".into(),
    }
}

#[tokio::test]
async fn list_sends_filter_page_and_size() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.seed(10);
    let api = api(&backend)?;

    let page = api
        .list(&NoticeListParams::new(PlatformFilter::Mobile, 1, 2))
        .await?;

    assert_eq!(page.total_elements, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.number, 1);
    assert_eq!(page.content.len(), 2);
    assert!(page.content.iter().all(|n| n.platform == Platform::Mobile));

    let all = api.list(&NoticeListParams::new(PlatformFilter::All, 0, 10)).await?;
    assert_eq!(all.total_elements, 10);
    assert_eq!(backend.calls(LIST), 2);
    Ok(())
}

#[tokio::test]
async fn crud_round_trip_against_backend() -> Result<()> {
    let backend = MockBackend::start().await?;
    let api = api(&backend)?;

    let created = api.create(&fields("First")).await?;
    assert_eq!(created.title, "First");
    assert_eq!(created.platform, Platform::Web);

    let mut changed = created.fields();
    changed.title = "Renamed".into();
    let updated = api.update(created.id, &changed).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Renamed");

    assert_eq!(api.get(created.id).await?.title, "Renamed");

    api.delete(created.id).await?;
    let err = api.get(created.id).await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(backend.calls(CREATE), 1);
    assert_eq!(backend.calls(UPDATE), 1);
    assert_eq!(backend.calls(DETAIL), 2);
    assert_eq!(backend.calls(DELETE), 1);
    Ok(())
}

#[tokio::test]
async fn server_message_is_carried_in_status_errors() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.fail_with(Some(400));
    let api = api(&backend)?;

    match api.create(&fields("x")).await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "injected failure");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_retryable_transport_error() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("free port");
    let api = NoticeApi::new(Arc::new(ApiClient::new(&format!("http://127.0.0.1:{}", port))?));

    let err = api.get(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.is_retryable());
    Ok(())
}

#[tokio::test]
async fn deleting_twice_reports_not_found() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.seed(1);
    let app = backend.app()?;

    app.notices.delete(1).await?;
    match app.notices.delete(1).await {
        Err(NoticeError::Api(e)) => assert!(e.is_not_found()),
        other => panic!("expected not found, got {:?}", other),
    }
    Ok(())
}
