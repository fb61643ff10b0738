use ellwatch_core::PollHandle;

#[tokio::test(flavor = "multi_thread")]
async fn pollhandle_stop_graceful() {
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        // Wait for stop signal, then signal completion
        let _ = stop_rx.await;
        let _ = done_tx.send(());
    });

    let handle = PollHandle::new(task, stop_tx);
    handle.stop().await; // should await task completion

    // Verify the task completed due to graceful stop, not abort
    let _ = tokio::time::timeout(std::time::Duration::from_millis(100), done_rx)
        .await
        .expect("task did not complete after stop()");
}

#[tokio::test(flavor = "multi_thread")]
async fn pollhandle_drop_aborts_stuck_task() {
    let (stop_tx, _stop_rx) = tokio::sync::oneshot::channel::<()>();
    let (alive_tx, mut alive_rx) = tokio::sync::mpsc::channel::<()>(1);

    // Ignores the stop signal entirely; only abort can end it.
    let task = tokio::spawn(async move {
        let _keep = alive_tx;
        std::future::pending::<()>().await;
    });

    let handle = PollHandle::new(task, stop_tx);
    assert!(!handle.is_finished());
    drop(handle);

    // The sender is dropped once the aborted task is torn down.
    let closed = tokio::time::timeout(std::time::Duration::from_millis(200), alive_rx.recv())
        .await
        .expect("aborted task was not torn down");
    assert!(closed.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn pollhandle_drop_signals_stop_before_abort() {
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let (seen_tx, seen_rx) = tokio::sync::oneshot::channel::<bool>();

    let task = tokio::spawn(async move {
        let got_stop = stop_rx.await.is_ok();
        let _ = seen_tx.send(got_stop);
    });
    // Let the task reach the receive before the handle goes away.
    tokio::task::yield_now().await;

    drop(PollHandle::new(task, stop_tx));

    // Either the task observed the stop signal, or it was aborted first and
    // `seen_tx` was dropped; it must never observe a closed channel.
    if let Ok(got_stop) =
        tokio::time::timeout(std::time::Duration::from_millis(200), seen_rx)
            .await
            .expect("task was neither stopped nor aborted")
    {
        assert!(got_stop);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn pollhandle_abort_ends_task() {
    let (stop_tx, _stop_rx) = tokio::sync::oneshot::channel::<()>();
    let (alive_tx, mut alive_rx) = tokio::sync::mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        let _keep = alive_tx;
        std::future::pending::<()>().await;
    });

    PollHandle::new(task, stop_tx).abort();

    let closed = tokio::time::timeout(std::time::Duration::from_millis(200), alive_rx.recv())
        .await
        .expect("aborted task was not torn down");
    assert!(closed.is_none());
}
