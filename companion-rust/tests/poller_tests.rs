use clover_companion::{ConfigError, Poller};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

const INTERVAL: Duration = Duration::from_secs(15);

fn counting_poller(enabled: bool) -> (Poller, Arc<AtomicUsize>) {
    let ticks = Arc::new(AtomicUsize::new(0));
    let poller = Poller::spawn(INTERVAL, enabled, {
        let ticks = Arc::clone(&ticks);
        move || {
            let ticks = Arc::clone(&ticks);
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        }
    })
    .unwrap();
    (poller, ticks)
}

#[tokio::test(start_paused = true)]
async fn runs_once_per_interval() {
    let (poller, ticks) = counting_poller(true);

    tokio::time::sleep(Duration::from_secs(46)).await;

    assert_eq!(ticks.load(Ordering::SeqCst), 3);
    assert_eq!(poller.interval(), INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn disabled_poller_waits_until_enabled() {
    let (poller, ticks) = counting_poller(false);
    assert!(!poller.is_enabled());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);

    poller.enable();
    tokio::time::sleep(Duration::from_secs(16)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn disable_pauses_ticks() {
    let (poller, ticks) = counting_poller(true);

    tokio::time::sleep(Duration::from_secs(16)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    poller.disable();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_the_task() {
    let (poller, ticks) = counting_poller(true);

    tokio::time::sleep(Duration::from_secs(16)).await;
    poller.cancel();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(ticks.load(Ordering::SeqCst), 1);
    assert!(poller.is_finished());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_poller_stops_the_task() {
    let (poller, ticks) = counting_poller(true);
    drop(poller);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn zero_interval_is_rejected() {
    let error = Poller::spawn(Duration::ZERO, true, || async {}).err();

    assert_eq!(
        error,
        Some(ConfigError::ZeroDuration {
            name: "poll_interval"
        })
    );
}
