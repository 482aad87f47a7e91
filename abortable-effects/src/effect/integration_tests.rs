//! Lifecycle scenarios exercising binders, slots and fetchers together.

#[cfg(test)]
mod tests {
    use crate::cancellation::AbortSignal;
    use crate::deps;
    use crate::effect::{ChannelFailureReporter, CollectingFailureReporter, EffectBinder, EffectOptions};
    use crate::errors::EffectError;
    use crate::fetch::{BoundFetch, Fetch, FetchBinder, RequestInit};
    use crate::lifecycle::{EffectSlot, LifecycleState};
    use crate::testing::{EventLog, FetchBehavior, RecordingFetcher};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    fn collecting_binder() -> (EffectBinder, Arc<CollectingFailureReporter>) {
        let reporter = Arc::new(CollectingFailureReporter::new());
        let binder = EffectBinder::new().unwrap().with_reporter(reporter.clone());
        (binder, reporter)
    }

    /// Binds an effect that logs its start and whether the previous signal
    /// was already aborted by then.
    fn bind_logging_effect(
        binder: &EffectBinder,
        slot: &mut EffectSlot,
        log: &EventLog,
        signals: &Arc<Mutex<Vec<AbortSignal>>>,
        run: usize,
        options: EffectOptions,
    ) {
        let log = log.clone();
        let signals = signals.clone();
        binder.bind_cancelable_effect(
            slot,
            move |signal| {
                {
                    let mut seen = signals.lock();
                    let previous_live = seen.iter().filter(|s| !s.is_aborted()).count();
                    log.push(format!("effect {run} (live before: {previous_live})"));
                    seen.push(signal);
                }
                async { Ok(()) }
            },
            options,
        );
    }

    #[tokio::test]
    async fn scenario_a_rerun_aborts_previous_before_next_effect() {
        let (binder, reporter) = collecting_binder();
        let mut slot = EffectSlot::new("a");
        let log = EventLog::new();
        let signals = Arc::new(Mutex::new(Vec::new()));

        bind_logging_effect(&binder, &mut slot, &log, &signals, 1, EffectOptions::new());
        bind_logging_effect(&binder, &mut slot, &log, &signals, 2, EffectOptions::new());

        let seen = signals.lock().clone();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_aborted());
        assert!(!seen[1].is_aborted());
        assert!(!seen[0].same_as(&seen[1]));
        assert_eq!(
            log.events(),
            vec!["effect 1 (live before: 0)", "effect 2 (live before: 0)"]
        );

        settle().await;
        assert!(reporter.is_empty());
    }

    #[tokio::test]
    async fn scenario_b_unchanged_deps_create_nothing() {
        let (binder, _reporter) = collecting_binder();
        let mut slot = EffectSlot::new("b");
        let log = EventLog::new();
        let signals = Arc::new(Mutex::new(Vec::new()));

        let teardown_log = log.clone();
        bind_logging_effect(
            &binder,
            &mut slot,
            &log,
            &signals,
            1,
            EffectOptions::new()
                .with_deps(deps![1])
                .with_teardown(move || teardown_log.push("teardown")),
        );
        let teardown_log = log.clone();
        bind_logging_effect(
            &binder,
            &mut slot,
            &log,
            &signals,
            2,
            EffectOptions::new()
                .with_deps(deps![1])
                .with_teardown(move || teardown_log.push("teardown")),
        );

        assert_eq!(signals.lock().len(), 1);
        assert!(!signals.lock()[0].is_aborted());
        assert_eq!(log.count_prefix("teardown"), 0);
        assert_eq!(slot.run_count(), 1);
    }

    #[tokio::test]
    async fn scenario_c_abort_failure_is_swallowed() {
        let (binder, reporter) = collecting_binder();
        let mut slot = EffectSlot::new("c");

        binder.bind_cancelable_effect(
            &mut slot,
            |_signal| async { Err(EffectError::aborted("gave up")) },
            EffectOptions::new(),
        );
        settle().await;

        assert!(reporter.is_empty());
    }

    #[tokio::test]
    async fn scenario_d_genuine_failure_is_reported() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let binder = EffectBinder::new()
            .unwrap()
            .with_reporter(Arc::new(ChannelFailureReporter::new(tx)));
        let mut slot = EffectSlot::new("d");

        binder.bind_cancelable_effect(
            &mut slot,
            |_signal| async { Err(EffectError::network("connection refused")) },
            EffectOptions::new(),
        );

        let failure = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(failure.name(), "NetworkError");
        assert_eq!(failure.to_string(), "Network error: connection refused");
    }

    #[tokio::test]
    async fn scenario_e_fetch_without_options_gets_active_signal() {
        let (binder, reporter) = collecting_binder();
        let (fetcher, dynamic) = RecordingFetcher::new().shared();
        let fetch_binder = FetchBinder::new(binder, dynamic);
        let mut slot = EffectSlot::new("e");
        let active = Arc::new(Mutex::new(None));

        let active_clone = active.clone();
        fetch_binder.bind_cancelable_fetch(
            &mut slot,
            move |fetch| async move {
                *active_clone.lock() = Some(fetch.signal().clone());
                fetch.fetch("/api", None).await.map(|_| ())
            },
            EffectOptions::new(),
        );
        settle().await;

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/api");
        let init = calls[0].1.clone().unwrap();
        let active = active.lock().clone().unwrap();
        assert!(init.signal.unwrap().same_as(&active));
        assert_eq!(init.method, "GET");
        assert!(reporter.is_empty());
    }

    #[tokio::test]
    async fn scenario_f_unmount_aborts_pending_work() {
        let (binder, reporter) = collecting_binder();
        let (fetcher, dynamic) =
            RecordingFetcher::with_behavior(FetchBehavior::HoldUntilAborted).shared();
        let fetch_binder = FetchBinder::new(binder, dynamic);
        let mut slot = EffectSlot::new("f");
        let log = EventLog::new();

        let effect_log = log.clone();
        fetch_binder.bind_cancelable_fetch(
            &mut slot,
            move |fetch| async move {
                effect_log.push("request sent");
                let result = fetch.fetch("/slow", None).await;
                effect_log.push("request settled");
                result.map(|_| ())
            },
            EffectOptions::new(),
        );
        settle().await;
        assert_eq!(log.events(), vec!["request sent"]);

        slot.unmount();
        assert_eq!(slot.state(), LifecycleState::Terminated);

        let signal = fetcher.calls()[0].1.clone().unwrap().signal.unwrap();
        assert!(signal.is_aborted());

        settle().await;
        assert_eq!(log.events(), vec!["request sent", "request settled"]);
        assert!(reporter.is_empty());
    }

    #[tokio::test]
    async fn property_one_live_controller_across_many_evaluations() {
        let (binder, _reporter) = collecting_binder();
        let mut slot = EffectSlot::new("p1");
        let log = EventLog::new();
        let signals = Arc::new(Mutex::new(Vec::new()));

        for run in 1..=5 {
            let deps = deps![run / 2];
            bind_logging_effect(
                &binder,
                &mut slot,
                &log,
                &signals,
                run,
                EffectOptions::new().with_deps(deps),
            );
            let live = signals.lock().iter().filter(|s| !s.is_aborted()).count();
            assert_eq!(live, 1);
        }

        // deps: [0], [1], [1], [2], [2]
        assert_eq!(signals.lock().len(), 3);
        for event in log.events() {
            assert!(event.ends_with("(live before: 0)"));
        }

        slot.unmount();
        assert!(signals.lock().iter().all(AbortSignal::is_aborted));
    }

    #[tokio::test]
    async fn property_teardown_runs_after_abort() {
        let (binder, _reporter) = collecting_binder();
        let mut slot = EffectSlot::new("p4");
        let log = EventLog::new();
        let current = Arc::new(Mutex::new(None::<AbortSignal>));

        for run in 1..=3 {
            let effect_current = current.clone();
            let teardown_current = current.clone();
            let teardown_log = log.clone();
            binder.bind_cancelable_effect(
                &mut slot,
                move |signal| {
                    *effect_current.lock() = Some(signal);
                    async { Ok(()) }
                },
                EffectOptions::new().with_teardown(move || {
                    let aborted = teardown_current
                        .lock()
                        .as_ref()
                        .is_some_and(AbortSignal::is_aborted);
                    teardown_log.push(format!("teardown {run} aborted={aborted}"));
                }),
            );
        }
        slot.unmount();

        assert_eq!(
            log.events(),
            vec![
                "teardown 1 aborted=true",
                "teardown 2 aborted=true",
                "teardown 3 aborted=true",
            ]
        );
    }

    #[tokio::test]
    async fn property_caller_signal_is_overwritten() {
        let (binder, _reporter) = collecting_binder();
        let (fetcher, dynamic) = RecordingFetcher::new().shared();
        let fetch_binder = FetchBinder::new(binder, dynamic);
        let mut slot = EffectSlot::new("p6");
        let foreign = crate::cancellation::AbortController::new();
        let foreign_signal = foreign.signal();

        fetch_binder.bind_cancelable_fetch(
            &mut slot,
            move |fetch| async move {
                let init = RequestInit::new()
                    .with_header("accept", "application/json")
                    .with_signal(foreign_signal);
                fetch.fetch("/api", Some(init)).await.map(|_| ())
            },
            EffectOptions::new(),
        );
        settle().await;

        let init = fetcher.calls()[0].1.clone().unwrap();
        let attached = init.signal.unwrap();
        assert!(!attached.same_as(&foreign.signal()));
        assert_eq!(
            init.headers.get("accept").map(String::as_str),
            Some("application/json")
        );

        slot.unmount();
        assert!(attached.is_aborted());
        assert!(!foreign.is_aborted());
    }

    #[tokio::test]
    async fn fetch_failure_propagates_to_reporter() {
        let (binder, reporter) = collecting_binder();
        let (_fetcher, dynamic) =
            RecordingFetcher::with_behavior(FetchBehavior::FailNetwork("dns".into())).shared();
        let fetch_binder = FetchBinder::new(binder, dynamic);
        let mut slot = EffectSlot::new("fetch-failure");

        fetch_binder.bind_cancelable_fetch(
            &mut slot,
            |fetch| async move {
                fetch.fetch("/api", None).await.map(|_| ())
            },
            EffectOptions::new().with_deps(deps!["user-7"]),
        );
        settle().await;

        assert_eq!(reporter.names(), vec!["NetworkError"]);
    }

    async fn load_profile(fetch: &BoundFetch) -> anyhow::Result<String> {
        let response = fetch.fetch("/profile", None).await?;
        Ok(response.text().to_string())
    }

    #[tokio::test]
    async fn abort_propagated_through_anyhow_helper_is_swallowed() {
        let (binder, reporter) = collecting_binder();
        let (fetcher, dynamic) =
            RecordingFetcher::with_behavior(FetchBehavior::HoldUntilAborted).shared();
        let fetch_binder = FetchBinder::new(binder, dynamic);
        let mut slot = EffectSlot::new("anyhow-helper");

        fetch_binder.bind_cancelable_fetch(
            &mut slot,
            |fetch| async move {
                load_profile(&fetch).await?;
                Ok::<(), EffectError>(())
            },
            EffectOptions::new(),
        );
        settle().await;
        assert_eq!(fetcher.call_count(), 1);

        slot.unmount();
        settle().await;
        assert!(reporter.is_empty(), "reported: {:?}", reporter.names());
    }

    #[tokio::test]
    async fn deps_change_aborts_in_flight_fetch_silently() {
        let (binder, reporter) = collecting_binder();
        let (fetcher, dynamic) =
            RecordingFetcher::with_behavior(FetchBehavior::HoldUntilAborted).shared();
        let fetch_binder = FetchBinder::new(binder, dynamic);
        let mut slot = EffectSlot::new("deps-change");

        for user in ["user-1", "user-2"] {
            fetch_binder.bind_cancelable_fetch(
                &mut slot,
                move |fetch| async move {
                    fetch.fetch(&format!("/users/{user}"), None).await.map(|_| ())
                },
                EffectOptions::new().with_deps(deps![user]),
            );
            settle().await;
        }

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].1.as_ref().unwrap().signal.as_ref().unwrap().is_aborted());
        assert!(!calls[1].1.as_ref().unwrap().signal.as_ref().unwrap().is_aborted());
        assert_eq!(
            calls[0].1.as_ref().unwrap().signal.as_ref().unwrap().reason(),
            Some("lifecycle cleanup".to_string())
        );

        slot.unmount();
        settle().await;
        assert!(reporter.is_empty());
    }
}
