//! The simulation kernel: clock, pending events, facilities and measures.

use std::fmt;
use std::io::{self, Write};

use log::debug;

use crate::error::{Error, Result};
use crate::evlist::EventList;
use crate::facility::{Facility, FacilityId, RequestResult};
use crate::pool::Pool;
use crate::random::Rand;
use crate::trace::Tracer;
use crate::Token;

/// A discrete event simulation kernel.
///
/// The kernel owns the logical clock, the pending-event list, the facility
/// registry and a multi-stream random number generator. A model drives it
/// in a loop: schedule an initial event, then repeatedly [`cause`] the next
/// one and react to it with further [`schedule`], [`request`], [`preempt`]
/// and [`release`] calls until done. Independent kernels share no state and
/// can run side by side.
///
/// The type parameter is the model's token type; any cheap-to-clone value
/// with equality and a display form works, integers included.
///
/// # Examples
///
/// ```
/// use smpl::Sim;
///
/// let mut sim = Sim::new("demo");
/// sim.schedule(1, 5.0, 7_i32)?;
/// sim.schedule(2, 3.0, 8_i32)?;
///
/// assert_eq!(sim.cause(), Some((2, 8)));
/// assert_eq!(sim.time(), 3.0);
/// assert_eq!(sim.cause(), Some((1, 7)));
/// assert_eq!(sim.time(), 5.0);
/// assert_eq!(sim.cause(), None);
/// # Ok::<(), smpl::Error>(())
/// ```
///
/// [`cause`]: Sim::cause
/// [`schedule`]: Sim::schedule
/// [`request`]: Sim::request
/// [`preempt`]: Sim::preempt
/// [`release`]: Sim::release
pub struct Sim<T: Token> {
    model_name: String,

    clock: f64,
    /// Start of the current measurement interval, moved by [`Sim::reset`].
    interval_start: f64,

    evl: EventList,
    pool: Pool<T>,
    facilities: Vec<Facility<T>>,

    last_event_code: i32,
    last_token: Option<T>,

    rng: Rand,
    tracer: Tracer,
}

impl<T: Token> Sim<T> {
    /// Creates a kernel for the named model.
    ///
    /// The first initialization selects random stream 1; every later
    /// [`init`](Sim::init) moves one stream further along the fifteen
    /// predefined streams.
    pub fn new(model_name: impl Into<String>) -> Self {
        let mut sim = Sim {
            model_name: String::new(),
            clock: 0.0,
            interval_start: 0.0,
            evl: EventList::new(),
            pool: Pool::new(),
            facilities: Vec::new(),
            last_event_code: 0,
            last_token: None,
            rng: Rand::new(),
            tracer: Tracer::new(),
        };
        sim.init(model_name);
        sim
    }

    /// Reinitializes the kernel in place.
    ///
    /// Resets the clock to zero, drops every pending event, queued request
    /// and facility, turns tracing off, restores the standard output sink
    /// and selects the next random stream after the one currently in use
    /// (wrapping 15 back to 1).
    pub fn init(&mut self, model_name: impl Into<String>) {
        self.model_name = model_name.into();
        self.clock = 0.0;
        self.interval_start = 0.0;
        self.evl.clear();
        self.pool.clear();
        self.facilities.clear();
        self.last_event_code = 0;
        self.last_token = None;
        self.tracer = Tracer::new();

        let stream = match self.rng.stream_number() {
            n if n >= 15 => 1,
            n => n + 1,
        };
        self.rng.select_stream(stream);

        debug!(
            target: "smpl",
            "model {:?} initialized on random stream {stream}", self.model_name
        );
    }

    /// Clears all measurements and starts a new measurement interval at
    /// the current time. Pending events, queues and reservations are left
    /// intact.
    pub fn reset(&mut self) {
        for fac in &mut self.facilities {
            fac.reset_measures();
        }
        self.interval_start = self.clock;
        debug!(target: "smpl", "measurements reset at time {}", self.clock);
    }

    /// The model name given at initialization.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Current simulation time. Only [`cause`](Sim::cause) advances it.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.clock
    }

    /// The kernel's random number generator.
    pub fn rand(&mut self) -> &mut Rand {
        &mut self.rng
    }

    /// Code and token of the event dispatched last, if any.
    #[must_use]
    pub fn last_dispatched(&self) -> Option<(i32, &T)> {
        self.last_token
            .as_ref()
            .map(|token| (self.last_event_code, token))
    }

    // ------------------------------------------------------------------
    // Event scheduling
    // ------------------------------------------------------------------

    /// Schedules an event to fire `delay` time units from now.
    ///
    /// Events due at the same instant fire in the order they were
    /// scheduled.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDelay`] if `delay` is negative, NaN or infinite.
    pub fn schedule(&mut self, event_code: i32, delay: f64, token: T) -> Result<()> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(Error::InvalidDelay);
        }

        self.tracer.msg(
            self.clock,
            format_args!("SCHEDULE EVENT {event_code} FOR TOKEN {token}"),
        );

        let idx = self.pool.acquire();
        let rec = &mut self.pool[idx];
        rec.event_code = event_code;
        rec.token = Some(token);
        rec.trigger_time = self.clock + delay;
        rec.remaining_time = 0.0;
        self.evl.insert(&mut self.pool, idx);
        Ok(())
    }

    /// Dispatches the earliest pending event: advances the clock to its
    /// trigger time and returns its code and token. Returns `None` when no
    /// events are pending.
    ///
    /// Successive calls see non-decreasing times.
    pub fn cause(&mut self) -> Option<(i32, T)> {
        let idx = self.evl.pop_front(&mut self.pool)?;
        let rec = &mut self.pool[idx];

        self.clock = rec.trigger_time;
        self.last_event_code = rec.event_code;
        let token = rec.token.take().expect("pending events carry a token");
        self.last_token = Some(token.clone());
        self.pool.release(idx);

        self.tracer.msg(
            self.clock,
            format_args!("CAUSE EVENT {} FOR TOKEN {token}", self.last_event_code),
        );
        Some((self.last_event_code, token))
    }

    /// Removes the earliest pending event with the given code, returning
    /// its token, or `None` if no such event is pending.
    pub fn cancel(&mut self, event_code: i32) -> Option<T> {
        let idx = self
            .evl
            .remove_first(&mut self.pool, |r| r.event_code == event_code)?;
        let token = self.pool[idx].token.take().expect("pending events carry a token");
        self.pool.release(idx);

        self.tracer.msg(
            self.clock,
            format_args!("CANCEL EVENT {event_code} FOR TOKEN {token}"),
        );
        Some(token)
    }

    /// Removes the earliest pending event matching both code and token.
    /// Returns whether one was found.
    pub fn unschedule(&mut self, event_code: i32, token: &T) -> bool {
        let found = self.evl.remove_first(&mut self.pool, |r| {
            r.event_code == event_code && r.token.as_ref() == Some(token)
        });
        match found {
            Some(idx) => {
                self.pool.release(idx);
                self.tracer.msg(
                    self.clock,
                    format_args!("UNSCHEDULE EVENT {event_code} FOR TOKEN {token}"),
                );
                true
            }
            None => false,
        }
    }

    /// Unlinks the earliest pending event of `token` without recycling it,
    /// so a preemption can park it on a facility queue.
    fn suspend(&mut self, token: &T) -> Result<usize> {
        let idx = self
            .evl
            .remove_first(&mut self.pool, |r| r.token.as_ref() == Some(token))
            .ok_or(Error::NoScheduledEvent)?;
        self.tracer.msg(
            self.clock,
            format_args!(
                "SUSPEND EVENT {} FOR TOKEN {token}",
                self.pool[idx].event_code
            ),
        );
        Ok(idx)
    }

    // ------------------------------------------------------------------
    // Facilities
    // ------------------------------------------------------------------

    /// Creates a facility with the given number of servers and returns its
    /// handle. Facilities live until the next [`init`](Sim::init).
    ///
    /// # Errors
    ///
    /// [`Error::NoServers`] if `servers` is zero.
    pub fn facility(&mut self, name: impl Into<String>, servers: usize) -> Result<FacilityId> {
        if servers == 0 {
            return Err(Error::NoServers);
        }
        let name = name.into();
        let id = FacilityId(self.facilities.len());

        debug!(target: "smpl", "facility {name:?} created with {servers} servers");
        self.tracer.msg(
            self.clock,
            format_args!("CREATE FACILITY {name} WITH ID {id}"),
        );

        self.facilities.push(Facility::new(name, servers));
        Ok(id)
    }

    /// The name a facility was created with.
    pub fn facility_name(&self, f: FacilityId) -> Result<&str> {
        Ok(&self.get_facility(f)?.name)
    }

    /// Attempts to reserve a server of the facility for `token`.
    ///
    /// With an idle server available the first one in index order is
    /// reserved. Otherwise the request joins the facility queue at the
    /// given priority and the kernel will re-issue the current event for
    /// `token` once a server frees up, so the model can call `request`
    /// again.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFacility`] if `f` does not belong to this kernel.
    pub fn request(&mut self, f: FacilityId, token: T, priority: i32) -> Result<RequestResult> {
        self.check_facility(f)?;
        let fid = f.0;

        if let Some(k) = self.facilities[fid].idle_server() {
            self.tracer.msg(
                self.clock,
                format_args!(
                    "REQUEST FACILITY {} FOR TOKEN {token}:  RESERVED",
                    self.facilities[fid].name
                ),
            );

            let clock = self.clock;
            let fac = &mut self.facilities[fid];
            fac.servers[k].reserve(token, priority, clock);
            fac.busy_count += 1;
            Ok(RequestResult::Reserved)
        } else {
            let inq = self.facilities[fid].queue_len + 1;
            self.tracer.msg(
                self.clock,
                format_args!(
                    "REQUEST FACILITY {} FOR TOKEN {token}:  QUEUED  (inq = {inq})",
                    self.facilities[fid].name
                ),
            );

            let code = self.last_event_code;
            self.enqueue(fid, token, priority, code, 0.0);
            Ok(RequestResult::Queued)
        }
    }

    /// Attempts to reserve a server of the facility for `token`, evicting
    /// a lower-priority holder if it must.
    ///
    /// With an idle server this behaves like [`request`](Sim::request).
    /// Otherwise the holder with the lowest priority is considered: if the
    /// new priority is not strictly greater, the request queues; if it is,
    /// that holder's pending event is suspended, its residual time is
    /// saved, the holder re-enters the queue at the head of its priority
    /// class, and the server transfers to `token`. The evicted token gets
    /// its server back on a later release and its event resumes with the
    /// saved residual time.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFacility`] if `f` does not belong to this kernel,
    /// [`Error::NoScheduledEvent`] if the would-be victim has no pending
    /// event to suspend.
    pub fn preempt(&mut self, f: FacilityId, token: T, priority: i32) -> Result<RequestResult> {
        self.check_facility(f)?;
        let fid = f.0;

        if let Some(k) = self.facilities[fid].idle_server() {
            self.tracer.msg(
                self.clock,
                format_args!(
                    "PREEMPT FACILITY {} FOR TOKEN {token}:  RESERVED",
                    self.facilities[fid].name
                ),
            );

            let clock = self.clock;
            let fac = &mut self.facilities[fid];
            fac.servers[k].reserve(token, priority, clock);
            fac.busy_count += 1;
            return Ok(RequestResult::Reserved);
        }

        let k = self.facilities[fid].lowest_priority_server();
        if priority <= self.facilities[fid].servers[k].busy_priority {
            let inq = self.facilities[fid].queue_len + 1;
            self.tracer.msg(
                self.clock,
                format_args!(
                    "PREEMPT FACILITY {} FOR TOKEN {token}:  QUEUED  (inq = {inq})",
                    self.facilities[fid].name
                ),
            );

            let code = self.last_event_code;
            self.enqueue(fid, token, priority, code, 0.0);
            return Ok(RequestResult::Queued);
        }

        self.tracer.msg(
            self.clock,
            format_args!(
                "PREEMPT FACILITY {} FOR TOKEN {token}:  INTERRUPT",
                self.facilities[fid].name
            ),
        );

        let victim = self.facilities[fid].servers[k]
            .busy_token
            .clone()
            .expect("server chosen for preemption is busy");
        let victim_priority = self.facilities[fid].servers[k].busy_priority;

        let ev = self.suspend(&victim)?;
        let code = self.pool[ev].event_code;
        let mut remaining = self.pool[ev].trigger_time - self.clock;
        if remaining == 0.0 {
            // a strictly positive residual marks the queue record as a
            // resume, placing it at the head of its priority class
            remaining = 1.0e-99;
        }
        self.pool.release(ev);

        let inq = self.facilities[fid].queue_len + 1;
        self.tracer
            .msg(self.clock, format_args!("QUEUE FOR TOKEN {victim} (inq = {inq})"));
        self.enqueue(fid, victim, victim_priority, code, remaining);
        self.tracer.msg(
            self.clock,
            format_args!(
                "RESERVE {} FOR TOKEN {token}:  RESERVED",
                self.facilities[fid].name
            ),
        );

        let clock = self.clock;
        let fac = &mut self.facilities[fid];
        fac.servers[k].account_release(clock);
        fac.busy_count -= 1;
        fac.preempt_count += 1;

        fac.servers[k].reserve(token, priority, clock);
        fac.busy_count += 1;
        Ok(RequestResult::Reserved)
    }

    /// Releases the server of the facility held by `token`.
    ///
    /// If requests are waiting, the head of the queue is discharged: a
    /// blocked request is re-issued at the head of the pending-event list,
    /// so it retries before any other event due at this instant; a
    /// preempted holder takes the freed server over directly and its
    /// suspended event is rescheduled with its saved residual time.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFacility`] if `f` does not belong to this kernel,
    /// [`Error::NoReservation`] if no server is held by `token`.
    pub fn release(&mut self, f: FacilityId, token: &T) -> Result<()> {
        self.check_facility(f)?;
        let fid = f.0;

        let j = self.facilities[fid]
            .holder(token)
            .ok_or(Error::NoReservation)?;

        let clock = self.clock;
        {
            let fac = &mut self.facilities[fid];
            fac.servers[j].busy_token = None;
            fac.servers[j].account_release(clock);
            fac.busy_count -= 1;
        }
        self.tracer.msg(
            clock,
            format_args!(
                "RELEASE FACILITY {} FOR TOKEN {token}",
                self.facilities[fid].name
            ),
        );

        let Some(idx) = self.facilities[fid].dequeue(&mut self.pool, clock) else {
            return Ok(());
        };
        if self.tracer.enabled() {
            if let Some(t) = self.pool[idx].token.as_ref() {
                self.tracer.msg(
                    clock,
                    format_args!(
                        "DEQUEUE FOR TOKEN {t}  (inq = {})",
                        self.facilities[fid].queue_len
                    ),
                );
            }
        }

        let remaining = self.pool[idx].remaining_time;
        if remaining == 0.0 {
            // blocked request: retries ahead of anything else due now
            self.pool[idx].trigger_time = clock;
            self.evl.push_front(&mut self.pool, idx);

            if self.tracer.enabled() {
                if let Some(t) = self.pool[idx].token.as_ref() {
                    self.tracer.msg(
                        clock,
                        format_args!(
                            "RESCHEDULE EVENT {} FOR TOKEN {t}",
                            self.pool[idx].event_code
                        ),
                    );
                }
            }
        } else {
            // preempted holder: hand the server straight over and let the
            // interrupted delay play out
            let next_priority = self.pool[idx].priority;
            let next_token = self.pool[idx]
                .token
                .clone()
                .expect("queued requests carry a token");

            {
                let fac = &mut self.facilities[fid];
                fac.servers[j].reserve(next_token, next_priority, clock);
                fac.busy_count += 1;
            }
            if let Some(t) = self.pool[idx].token.as_ref() {
                self.tracer.msg(
                    clock,
                    format_args!("RESERVE {} FOR TOKEN {t}", self.facilities[fid].name),
                );
            }

            let rec = &mut self.pool[idx];
            rec.trigger_time = clock + remaining;
            rec.remaining_time = 0.0;
            self.evl.insert(&mut self.pool, idx);

            if self.tracer.enabled() {
                if let Some(t) = self.pool[idx].token.as_ref() {
                    self.tracer.msg(
                        clock,
                        format_args!(
                            "RESUME EVENT {} FOR TOKEN {t}",
                            self.pool[idx].event_code
                        ),
                    );
                }
            }
        }
        Ok(())
    }

    /// Acquires a queue record and links it into the facility's waiting
    /// queue.
    fn enqueue(&mut self, fid: usize, token: T, priority: i32, event_code: i32, remaining: f64) {
        let idx = self.pool.acquire();
        let rec = &mut self.pool[idx];
        rec.token = Some(token);
        rec.event_code = event_code;
        rec.priority = priority;
        rec.remaining_time = remaining;
        self.facilities[fid].enqueue(&mut self.pool, self.clock, idx);
    }

    // ------------------------------------------------------------------
    // Measures
    // ------------------------------------------------------------------

    /// Whether every server of the facility is reserved.
    pub fn busy(&self, f: FacilityId) -> Result<bool> {
        let fac = self.get_facility(f)?;
        Ok(fac.busy_count == fac.servers.len())
    }

    /// Current length of the facility's waiting queue.
    pub fn queue_len(&self, f: FacilityId) -> Result<usize> {
        Ok(self.get_facility(f)?.queue_len)
    }

    /// Utilization over the current measurement interval: the sum of each
    /// server's busy fraction, so an n-server facility can reach n.
    pub fn utilization(&self, f: FacilityId) -> Result<f64> {
        let fac = self.get_facility(f)?;
        Ok(fac.utilization(self.clock - self.interval_start))
    }

    /// Mean busy period per release over the current measurement interval.
    pub fn mean_busy_period(&self, f: FacilityId) -> Result<f64> {
        Ok(self.get_facility(f)?.mean_busy_period())
    }

    /// Time-averaged queue length over the current measurement interval.
    ///
    /// The interval since the last queue change is not included, so the
    /// value is exact at queue-change instants and lags in between.
    pub fn mean_queue_length(&self, f: FacilityId) -> Result<f64> {
        let fac = self.get_facility(f)?;
        Ok(fac.mean_queue_length(self.clock - self.interval_start))
    }

    /// Number of preemptions the facility has seen in the current
    /// measurement interval.
    pub fn preempt_count(&self, f: FacilityId) -> Result<usize> {
        Ok(self.get_facility(f)?.preempt_count)
    }

    /// Number of requests that left the facility's queue in the current
    /// measurement interval.
    pub fn queue_exit_count(&self, f: FacilityId) -> Result<usize> {
        Ok(self.get_facility(f)?.queue_exit_count)
    }

    fn get_facility(&self, f: FacilityId) -> Result<&Facility<T>> {
        self.facilities.get(f.0).ok_or(Error::UnknownFacility)
    }

    fn check_facility(&self, f: FacilityId) -> Result<()> {
        self.get_facility(f).map(|_| ())
    }

    // ------------------------------------------------------------------
    // Trace and report
    // ------------------------------------------------------------------

    /// Enables or disables the state-transition trace.
    pub fn set_trace(&mut self, on: bool) {
        self.tracer.set_enabled(on);
    }

    /// Whether the state-transition trace is on.
    #[must_use]
    pub fn trace(&self) -> bool {
        self.tracer.enabled()
    }

    /// Redirects trace and report output. The default sink is standard
    /// output.
    pub fn sendto(&mut self, sink: Box<dyn Write>) {
        self.tracer.set_sink(sink);
    }

    /// The current trace and report destination.
    pub fn output(&mut self) -> &mut dyn Write {
        self.tracer.sink_mut()
    }

    /// Writes the facility report to the current output sink.
    ///
    /// One row per facility in creation order; write failures are ignored,
    /// like those of the trace.
    pub fn report(&mut self) {
        let _ = self.write_report();
    }

    fn write_report(&mut self) -> io::Result<()> {
        let time = self.clock;
        let interval = self.clock - self.interval_start;

        let rows: Vec<_> = self
            .facilities
            .iter()
            .map(|fac| {
                let label = if fac.servers.len() == 1 {
                    fac.name.clone()
                } else {
                    format!("{}[{}]", fac.name, fac.servers.len())
                };
                (
                    label,
                    fac.utilization(interval),
                    fac.mean_busy_period(),
                    fac.mean_queue_length(interval),
                    fac.total_releases(),
                    fac.preempt_count,
                    fac.queue_exit_count,
                )
            })
            .collect();

        let sink = self.tracer.sink_mut();
        if rows.is_empty() {
            return writeln!(sink, "no facilities defined:  report abandoned");
        }

        writeln!(sink)?;
        writeln!(sink, "smpl SIMULATION REPORT")?;
        writeln!(sink)?;
        writeln!(sink)?;
        writeln!(sink, "MODEL {:<56}TIME: {time:11.3}", self.model_name)?;
        writeln!(sink, "{:>68}{interval:11.3}", "INTERVAL: ")?;
        writeln!(sink)?;
        writeln!(sink, "MEAN BUSY     MEAN QUEUE        OPERATION COUNTS")?;
        writeln!(
            sink,
            " FACILITY          UTIL.     PERIOD        LENGTH     RELEASE   PREEMPT   QUEUE"
        )?;
        for (label, util, period, length, releases, preempts, exits) in rows {
            writeln!(
                sink,
                " {label:<17}{util:6.4} {period:10.3} {length:13.3} {releases:11} {preempts:9} {exits:7}"
            )?;
        }
        Ok(())
    }
}

impl<T: Token> fmt::Debug for Sim<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sim {{ model: {:?}, clock: {}, pending: {}, facilities: {} }}",
            self.model_name,
            self.clock,
            if self.evl.head().is_some() { ">=1" } else { "0" },
            self.facilities.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts records across the pending list, every facility queue and
    /// the free pool; together they must account for every slot.
    fn record_conservation(sim: &Sim<u32>) {
        let mut live = 0;
        let mut cur = sim.evl.head();
        while let Some(idx) = cur {
            live += 1;
            cur = sim.pool[idx].next;
        }
        for fac in &sim.facilities {
            let mut cur = fac.queue_head();
            while let Some(idx) = cur {
                live += 1;
                cur = sim.pool[idx].next;
            }
        }
        assert_eq!(live + sim.pool.free_len(), sim.pool.len());
    }

    fn busy_count_consistent(sim: &Sim<u32>) {
        for fac in &sim.facilities {
            let busy = fac.servers.iter().filter(|s| s.busy_token.is_some()).count();
            assert_eq!(fac.busy_count, busy);
            assert!(fac.busy_count <= fac.servers.len());
        }
    }

    fn event_list_sorted(sim: &Sim<u32>) {
        let mut cur = sim.evl.head();
        let mut last = f64::NEG_INFINITY;
        while let Some(idx) = cur {
            assert!(sim.pool[idx].trigger_time >= last);
            last = sim.pool[idx].trigger_time;
            cur = sim.pool[idx].next;
        }
    }

    fn facility_queues_ordered(sim: &Sim<u32>) {
        for fac in &sim.facilities {
            let mut cur = fac.queue_head();
            let mut last_priority = i32::MAX;
            let mut resumes_allowed = true;
            while let Some(idx) = cur {
                let rec = &sim.pool[idx];
                assert!(rec.priority <= last_priority);
                if rec.priority < last_priority {
                    resumes_allowed = true;
                }
                if rec.remaining_time > 0.0 {
                    assert!(
                        resumes_allowed,
                        "a resume may not follow a blocked request of its class"
                    );
                } else {
                    resumes_allowed = false;
                }
                last_priority = rec.priority;
                cur = rec.next;
            }
        }
    }

    fn invariants(sim: &Sim<u32>) {
        record_conservation(sim);
        busy_count_consistent(sim);
        event_list_sorted(sim);
        facility_queues_ordered(sim);
    }

    #[test]
    fn request_release_storm_keeps_invariants() {
        let mut sim: Sim<u32> = Sim::new("storm");
        let fac = sim.facility("pair", 2).expect("two servers are valid");

        sim.schedule(1, 0.0, 1).expect("valid delay");
        sim.schedule(1, 0.0, 2).expect("valid delay");
        sim.schedule(1, 0.0, 3).expect("valid delay");
        sim.schedule(1, 1.0, 4).expect("valid delay");
        invariants(&sim);

        while let Some((code, tok)) = sim.cause() {
            match code {
                1 => {
                    if sim.request(fac, tok, 0).expect("known facility")
                        == RequestResult::Reserved
                    {
                        sim.schedule(2, 2.0, tok).expect("valid delay");
                    }
                }
                2 => sim.release(fac, &tok).expect("token holds a server"),
                _ => unreachable!(),
            }
            invariants(&sim);
        }
        assert_eq!(sim.queue_len(fac).expect("known facility"), 0);
        assert_eq!(sim.queue_exit_count(fac).expect("known facility"), 2);
    }

    #[test]
    fn preemption_keeps_invariants_and_queue_order() {
        let mut sim: Sim<u32> = Sim::new("preempt-order");
        let fac = sim.facility("one", 1).expect("one server is valid");

        sim.schedule(1, 0.0, 10).expect("valid delay");
        assert_eq!(sim.cause(), Some((1, 10)));
        assert_eq!(
            sim.request(fac, 10, 1).expect("known facility"),
            RequestResult::Reserved
        );
        sim.schedule(9, 50.0, 10).expect("valid delay");

        // two blocked requests at priority 1 behind the holder
        sim.schedule(1, 1.0, 11).expect("valid delay");
        sim.schedule(1, 1.0, 12).expect("valid delay");
        for _ in 0..2 {
            let (_, tok) = sim.cause().expect("events are pending");
            assert_eq!(
                sim.request(fac, tok, 1).expect("known facility"),
                RequestResult::Queued
            );
        }
        invariants(&sim);

        // the preempted holder must outrank both blocked peers
        sim.schedule(1, 3.0, 13).expect("valid delay");
        assert_eq!(sim.cause(), Some((1, 13)));
        assert_eq!(
            sim.preempt(fac, 13, 2).expect("known facility"),
            RequestResult::Reserved
        );
        invariants(&sim);

        let head = sim.facilities[fac.0].queue_head().expect("queue is non-empty");
        assert_eq!(sim.pool[head].token, Some(10));
        assert!(sim.pool[head].remaining_time > 0.0);
        assert_eq!(sim.preempt_count(fac).expect("known facility"), 1);
    }

    #[test]
    fn report_without_facilities_is_abandoned() {
        let mut sim: Sim<u32> = Sim::new("empty");
        sim.report();
    }
}
