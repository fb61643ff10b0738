use std::time::Duration;

use chrono::{DateTime, Utc};
use ellwatch_core::{EllError, HistoryFetcher, Measurement, TaskType};
use ellwatch_mock::{DynamicFetcher, MockBehavior, MockFetcher, fixtures};

fn since() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_099_600, 0).unwrap()
}

#[tokio::test]
async fn test_mock_history_return() {
    let (mock, controller) = DynamicFetcher::new_with_controller("P0");
    let stream = vec![Measurement::new("2024-01-01T10:00:00", 7.0)];
    controller
        .set_behavior(TaskType::Ip, MockBehavior::Return(stream.clone()))
        .await;

    let got = mock.history(TaskType::Ip, since()).await.expect("history ok");
    assert_eq!(got, stream);
}

#[tokio::test]
async fn test_mock_history_fail() {
    let (mock, controller) = DynamicFetcher::new_with_controller("P0");
    let err = EllError::status("P0", 503);
    controller
        .set_behavior(TaskType::Account, MockBehavior::Fail(err.clone()))
        .await;

    let got = mock
        .history(TaskType::Account, since())
        .await
        .expect_err("err");
    assert_eq!(got, err);
}

#[tokio::test(start_paused = true)]
async fn test_mock_history_hang() {
    let (mock, controller) = DynamicFetcher::new_with_controller("P0");
    controller
        .set_behavior(TaskType::EmailDomain, MockBehavior::Hang)
        .await;

    let res = tokio::time::timeout(
        Duration::from_secs(30),
        mock.history(TaskType::EmailDomain, since()),
    )
    .await;
    assert!(res.is_err(), "hang should never resolve");
}

#[tokio::test]
async fn test_mock_unset_category_is_empty_and_logged() {
    let (mock, controller) = DynamicFetcher::new_with_controller("P0");
    let got = mock.history(TaskType::Ip, since()).await.expect("ok");
    assert!(got.is_empty());

    assert_eq!(controller.requests().await, vec![(TaskType::Ip, since())]);
    assert_eq!(controller.request_count(TaskType::Ip).await, 1);
    assert_eq!(controller.request_count(TaskType::Account).await, 0);

    controller.clear_all_behaviors().await;
    assert!(controller.requests().await.is_empty());
}

#[tokio::test]
async fn test_static_mock_serves_fixtures() {
    let mock = MockFetcher::new();
    assert_eq!(mock.name(), "ellwatch-mock");
    for task in TaskType::ALL {
        let got = mock.history(task, since()).await.expect("ok");
        assert_eq!(got, fixtures::by_task(task));
        assert!(!got.is_empty());
    }
    assert_eq!(fixtures::streams().total_len(), 14);
}
