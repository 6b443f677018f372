#![forbid(unsafe_code)]

//! Routers driven from several threads, through queued executors and
//! through the inline one.
//!
//! Commits must run one at a time, in submission order, on the owning
//! thread, and the view, state and listeners must only ever be touched
//! there.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use scene_router::executor::{TaskQueue, UiThread, UiThreadConfig};
use scene_router::{Context, RouteChange, Router, RouterError, SlotView};

const UI_THREAD: &str = "router-ordering-ui";

fn ui_thread() -> UiThread {
    UiThread::with_config(UiThreadConfig::default().name(UI_THREAD)).unwrap()
}

#[test]
fn commits_run_on_the_ui_thread() {
    let ui = ui_thread();
    let shown_on = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&shown_on);
    let view = move |_: u32| {
        s.lock()
            .unwrap()
            .push(thread::current().name().map(str::to_owned));
    };
    let router = Router::builder(view).executor(ui.handle()).build();
    router.map("a", 1).map("b", 2);

    let caller = router.clone();
    thread::spawn(move || {
        caller.navigate("a").wait().unwrap();
        caller.navigate("b").wait().unwrap();
    })
    .join()
    .unwrap();

    assert!(router.navigate_back().wait().unwrap());
    ui.shutdown();

    let shown_on = shown_on.lock().unwrap();
    assert_eq!(shown_on.len(), 3);
    assert!(shown_on.iter().all(|name| name.as_deref() == Some(UI_THREAD)));
}

#[test]
fn concurrent_navigations_never_interleave() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 25;

    let ui = ui_thread();
    let view = SlotView::new();
    let router = Router::builder(view.clone())
        .executor(ui.handle())
        .build();
    for t in 0..THREADS {
        router.map(format!("t{t}"), t);
    }

    // Each change must start where the previous one ended.
    let chain = Arc::new(Mutex::new((None::<String>, 0_usize, true)));
    let c = Arc::clone(&chain);
    router.add_route_change_listener(move |change: &RouteChange| {
        let mut chain = c.lock().unwrap();
        let linked = chain.0.as_deref() == change.old_route.as_deref();
        chain.2 &= linked;
        chain.0 = Some(change.route.to_string());
        chain.1 += 1;
    });

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let router = router.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    router
                        .navigate_with(format!("t{t}"), Context::new(i))
                        .wait()
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    ui.shutdown();

    let chain = chain.lock().unwrap();
    assert!(chain.2, "a commit observed a stale old route");
    assert_eq!(chain.1, THREADS * PER_THREAD);
    assert_eq!(view.shown_count(), (THREADS * PER_THREAD) as u64);
    assert_eq!(router.with_history(|h| h.len()), THREADS * PER_THREAD);
}

#[test]
fn navigation_after_shutdown_reports_executor_closed() {
    let ui = ui_thread();
    let router = Router::builder(SlotView::new())
        .executor(ui.handle())
        .build();
    router.map("a", "a");
    ui.shutdown();

    let err = router.navigate("a").wait().unwrap_err();
    assert!(matches!(err, RouterError::ExecutorClosed));
    assert_eq!(router.current_route(), None);
}

#[test]
fn host_pumped_queue_defers_commits() {
    let queue = TaskQueue::new();
    let view = SlotView::new();
    let router = Router::builder(view.clone())
        .executor(queue.handle())
        .build();
    router.map("a", 'a').map("b", 'b');

    let mut first = router.navigate("a");
    let second = router.navigate("b");
    let mut back = router.navigate_back();
    assert!(first.try_take().is_none());
    assert_eq!(router.current_route(), None);

    assert_eq!(queue.run_pending(), 3);
    assert!(matches!(first.try_take(), Some(Ok(()))));
    second.wait().unwrap();
    assert!(matches!(back.try_take(), Some(Ok(true))));
    assert_eq!(view.current(), Some('a'));
}

#[test]
fn nested_navigation_runs_after_current_commit() {
    let queue = TaskQueue::new();
    let router = Router::builder(SlotView::new())
        .executor(queue.handle())
        .build();
    router.map("login", ()).map("home", ());

    let order = Arc::new(Mutex::new(Vec::new()));
    let (o, redirect) = (Arc::clone(&order), router.clone());
    router.add_route_selection_listener("login", move |_: &Context| {
        o.lock().unwrap().push("login selected");
        let _ = redirect.navigate("home");
        o.lock().unwrap().push("redirect queued");
    });
    let o = Arc::clone(&order);
    router.add_route_change_listener(move |change: &RouteChange| {
        o.lock().unwrap().push(if change.route == "home" {
            "changed to home"
        } else {
            "changed to login"
        });
    });

    let _ = router.navigate("login");
    assert_eq!(queue.run_pending(), 2);
    assert_eq!(
        *order.lock().unwrap(),
        [
            "changed to login",
            "login selected",
            "redirect queued",
            "changed to home"
        ]
    );
    assert_eq!(router.current_route().as_deref(), Some("home"));
}

#[test]
fn awaiting_a_navigation_from_another_thread() {
    let queue = TaskQueue::new();
    let router = Router::builder(SlotView::new())
        .executor(queue.handle())
        .build();
    router.map("a", 0_u8);

    let navigation = router.navigate("a");
    let waiter = thread::spawn(move || navigation.wait());
    while !queue.run_one_timeout(Duration::from_millis(50)) {}
    waiter.join().unwrap().unwrap();
    assert_eq!(router.current_route().as_deref(), Some("a"));
}

#[test]
fn inline_commits_from_many_threads_agree_with_history() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 50;

    for _ in 0..20 {
        let view = SlotView::new();
        let router = Router::new(view.clone());
        for t in 0..THREADS {
            router.map(format!("t{t}"), t);
        }

        let workers: Vec<_> = (0..THREADS)
            .map(|t| {
                let router = router.clone();
                thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        router.navigate(format!("t{t}")).wait().unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let ledger = router.with_history(|h| h.current().map(|e| e.route().to_string()));
        assert_eq!(router.current_route().map(|r| r.to_string()), ledger);
        assert_eq!(view.current().map(|t| format!("t{t}")), ledger);
        assert_eq!(router.with_history(|h| h.len()), THREADS * PER_THREAD);
    }
}
