use smpl::{Error, ErrorKind, Sim};

#[test]
fn events_fire_in_time_order_with_fifo_ties() {
    let mut sim = Sim::new("order");
    sim.schedule(1, 5.0, 'A').unwrap();
    sim.schedule(2, 3.0, 'B').unwrap();
    sim.schedule(3, 5.0, 'C').unwrap();

    assert_eq!(sim.cause(), Some((2, 'B')));
    assert_eq!(sim.time(), 3.0);
    assert_eq!(sim.cause(), Some((1, 'A')));
    assert_eq!(sim.time(), 5.0);
    assert_eq!(sim.cause(), Some((3, 'C')));
    assert_eq!(sim.time(), 5.0);
    assert_eq!(sim.cause(), None);
}

#[test]
fn cause_on_an_empty_list_is_not_an_error() {
    let mut sim: Sim<u32> = Sim::new("empty");
    assert_eq!(sim.cause(), None);
    assert_eq!(sim.time(), 0.0);
}

#[test]
fn delays_must_be_finite_and_non_negative() {
    let mut sim = Sim::new("delays");
    assert_eq!(sim.schedule(1, -1.0, 'A'), Err(Error::InvalidDelay));
    assert_eq!(sim.schedule(1, f64::NAN, 'A'), Err(Error::InvalidDelay));
    assert_eq!(sim.schedule(1, f64::INFINITY, 'A'), Err(Error::InvalidDelay));
    assert_eq!(Error::InvalidDelay.kind(), ErrorKind::InvalidArgument);

    // nothing was scheduled
    assert_eq!(sim.cause(), None);
    assert!(sim.schedule(1, 0.0, 'A').is_ok());
}

#[test]
fn trigger_times_are_exact_sums() {
    let mut sim = Sim::new("exact");
    sim.schedule(1, 3.0, 'A').unwrap();
    assert_eq!(sim.cause(), Some((1, 'A')));

    sim.schedule(2, 2.5, 'A').unwrap();
    assert_eq!(sim.cause(), Some((2, 'A')));
    assert_eq!(sim.time(), 3.0 + 2.5);
}

#[test]
fn clock_is_monotonic_across_dispatches() {
    let mut sim = Sim::new("monotonic");
    for (code, delay) in [(1, 9.0), (2, 2.0), (3, 2.0), (4, 7.5), (5, 0.0)] {
        sim.schedule(code, delay, 'T').unwrap();
    }

    let mut last = 0.0;
    while sim.cause().is_some() {
        assert!(sim.time() >= last);
        last = sim.time();
    }
}

#[test]
fn cancel_removes_the_earliest_match_by_code() {
    let mut sim = Sim::new("cancel");
    sim.schedule(1, 1.0, 'A').unwrap();
    sim.schedule(2, 2.0, 'B').unwrap();
    sim.schedule(2, 3.0, 'C').unwrap();

    assert_eq!(sim.cancel(2), Some('B'));
    assert_eq!(sim.cancel(9), None);

    assert_eq!(sim.cause(), Some((1, 'A')));
    assert_eq!(sim.cause(), Some((2, 'C')));
    assert_eq!(sim.cause(), None);
}

#[test]
fn cancelled_codes_stay_cancelled_until_rescheduled() {
    let mut sim = Sim::new("cancel-again");
    sim.schedule(7, 1.0, 'A').unwrap();
    assert_eq!(sim.cancel(7), Some('A'));

    sim.schedule(8, 2.0, 'B').unwrap();
    assert_eq!(sim.cause(), Some((8, 'B')));

    sim.schedule(7, 1.0, 'C').unwrap();
    assert_eq!(sim.cause(), Some((7, 'C')));
}

#[test]
fn unschedule_matches_code_and_token() {
    let mut sim = Sim::new("unschedule");
    sim.schedule(1, 1.0, 'A').unwrap();
    sim.schedule(1, 2.0, 'B').unwrap();

    assert!(!sim.unschedule(1, &'C'));
    assert!(!sim.unschedule(2, &'A'));
    assert!(sim.unschedule(1, &'A'));
    assert!(!sim.unschedule(1, &'A'));

    assert_eq!(sim.cause(), Some((1, 'B')));
    assert_eq!(sim.cause(), None);
}

#[test]
fn last_dispatched_tracks_cause() {
    let mut sim = Sim::new("last");
    assert_eq!(sim.last_dispatched(), None);

    sim.schedule(4, 1.0, 'A').unwrap();
    sim.cause().unwrap();
    assert_eq!(sim.last_dispatched(), Some((4, &'A')));
}

#[test]
fn init_drops_pending_events_and_renames_the_model() {
    let mut sim = Sim::new("first");
    sim.schedule(1, 5.0, 'A').unwrap();
    sim.schedule(2, 1.0, 'B').unwrap();
    assert_eq!(sim.cause(), Some((2, 'B')));
    assert_eq!(sim.time(), 1.0);

    sim.init("second");
    assert_eq!(sim.model_name(), "second");
    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.cause(), None);
}
