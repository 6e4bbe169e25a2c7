use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Barrier, Condvar, Mutex, OnceLock, PoisonError};
use std::thread;

use tracing::{debug, trace};

use crate::core::{fold_slice, Executor, Infallible, Operation, Setup};
use crate::error::{Error, Result};

use super::partials::PartialResults;
use super::partition::{combine_partner, combine_strides, PartitionPlan};

/// Fork-join executor running a team of OS threads in lock step.
///
/// A call to [`exec`](Executor::exec) spawns the team, the calling
/// thread joins it as worker 0 (the leader), and all workers walk
/// through the same phases, separated by a barrier:
///
/// 1. the leader computes the [`PartitionPlan`] and allocates the
///    partial results
/// 2. every worker folds its range into its own slot
/// 3. `ceil(log2(workers))` combine rounds fold neighbouring slots
///    into the lower one, until slot 0 holds the result
///
/// No worker outlives the call.
#[derive(Clone, Debug, Default)]
pub struct Parallel {
    setup: Setup,
}

impl Parallel {
    /// Executor with a team of `workers` threads (clamped to the input
    /// length). Zero workers are rejected when the reduction runs.
    pub fn new(workers: usize) -> Self {
        Self {
            setup: Setup::default().with_workers(workers),
        }
    }

    /// Executor configured from the `TREE_REDUCE_*` environment
    /// variables, using the hardware concurrency if unset.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            setup: Setup::from_env()?,
        })
    }

    /// Give every worker at least `min_len` items.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.setup = self.setup.with_min_len(min_len);

        self
    }

    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    /// Reduce `input` with `operation`, starting every worker from
    /// `T::default()`.
    pub fn reduce<T, O>(&self, input: &[T], operation: O) -> Result<T>
    where
        T: Clone + Default + Send + Sync,
        O: Fn(T, T) -> T + Sync,
    {
        self.clone().exec(input, T::default, Infallible(operation))
    }

    fn team_size(&self, len: usize) -> Result<usize> {
        self.setup.validate()?;

        let requested = self.setup.workers.unwrap_or_else(num_cpus::get);
        let workers = self.setup.effective_workers(len, requested);

        if workers != requested {
            debug!(requested, workers, len, "clamped number of workers");
        }

        Ok(workers)
    }
}

impl<'a, T> Executor<'a, T> for Parallel
where
    T: Clone + Send + Sync + 'a,
{
    fn exec<S, O>(self, input: &'a [T], identity: S, operation: O) -> Result<T>
    where
        S: Fn() -> T + Sync,
        O: Operation<T>,
    {
        let workers = self.team_size(input.len())?;

        Team::new(input, &identity, &operation, workers).run()
    }

    fn with_setup(mut self, setup: Setup) -> Self {
        self.setup = self.setup.merge(setup);

        self
    }
}

/* Team */

enum Failure {
    Error(Error),
    Panic(Box<dyn Any + Send + 'static>),
}

struct Team<'t, T, S, O> {
    input: &'t [T],
    identity: &'t S,
    operation: &'t O,
    workers: usize,
    gate: Gate,
    barrier: Barrier,
    plan: OnceLock<PartitionPlan>,
    partials: OnceLock<PartialResults<T>>,
    aborted: AtomicBool,
}

impl<'t, T, S, O> Team<'t, T, S, O>
where
    T: Clone + Send + Sync,
    S: Fn() -> T + Sync,
    O: Operation<T>,
{
    fn new(input: &'t [T], identity: &'t S, operation: &'t O, workers: usize) -> Self {
        Self {
            input,
            identity,
            operation,
            workers,
            gate: Gate::default(),
            barrier: Barrier::new(workers),
            plan: OnceLock::new(),
            partials: OnceLock::new(),
            aborted: AtomicBool::new(false),
        }
    }

    fn run(self) -> Result<T> {
        let outcomes = thread::scope(|scope| {
            let team = &self;
            let mut handles = Vec::with_capacity(team.workers - 1);

            for worker in 1..team.workers {
                let spawned = thread::Builder::new()
                    .name(format!("tree-reduce-{}", worker))
                    .spawn_scoped(scope, move || {
                        if team.gate.wait() {
                            team.work(worker)
                        } else {
                            None
                        }
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        team.gate.release(false);

                        return Err(Error::Spawn(err));
                    }
                }
            }

            team.gate.release(true);

            let mut outcomes = Vec::with_capacity(team.workers);
            outcomes.push(team.work(0));
            outcomes.extend(handles.into_iter().map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| Some(Failure::Panic(payload)))
            }));

            Ok(outcomes)
        })?;

        let mut error = None;
        for failure in outcomes.into_iter().flatten() {
            match failure {
                Failure::Panic(payload) => panic::resume_unwind(payload),
                Failure::Error(err) => {
                    error.get_or_insert(err);
                }
            }
        }

        if let Some(err) = error {
            return Err(err);
        }

        let Team {
            partials, identity, ..
        } = self;

        Ok(partials
            .into_inner()
            .and_then(PartialResults::into_first)
            .unwrap_or_else(identity))
    }

    /// All phases of one worker. Every worker arrives at every barrier,
    /// also after the team was aborted.
    fn work(&self, worker: usize) -> Option<Failure> {
        let mut failure = None;

        if worker == 0 {
            self.guard(&mut failure, || self.setup());
        }
        self.barrier.wait();

        self.guard(&mut failure, || self.fold(worker));
        self.barrier.wait();

        for stride in combine_strides(self.workers) {
            if let Some(partner) = combine_partner(worker, stride, self.workers) {
                self.guard(&mut failure, || self.combine(worker, partner, stride));
            }
            self.barrier.wait();
        }

        failure
    }

    fn guard<F>(&self, failure: &mut Option<Failure>, f: F)
    where
        F: FnOnce() -> Result<()>,
    {
        if self.aborted.load(Ordering::Acquire) {
            return;
        }

        let outcome = match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(())) => return,
            Ok(Err(err)) => Failure::Error(err),
            Err(payload) => Failure::Panic(payload),
        };

        self.aborted.store(true, Ordering::Release);
        *failure = Some(outcome);
    }

    fn setup(&self) -> Result<()> {
        let plan = PartitionPlan::new(self.input.len(), self.workers)?;

        debug!(
            workers = plan.workers(),
            block_size = plan.block_size(),
            len = plan.len(),
            "partitioned reduction input"
        );

        let _ = self.plan.set(plan);
        let _ = self.partials.set(PartialResults::new(self.workers));

        Ok(())
    }

    fn fold(&self, worker: usize) -> Result<()> {
        // Both are published by the leader before the first barrier.
        let (plan, partials) = match (self.plan.get(), self.partials.get()) {
            (Some(plan), Some(partials)) => (plan, partials),
            _ => return Ok(()),
        };

        let range = plan.range(worker);
        let value = fold_slice(&self.input[range], (self.identity)(), self.operation)?;

        // SAFETY: during the local fold slot `worker` is only accessed by `worker`.
        unsafe { partials.put(worker, value) };

        Ok(())
    }

    fn combine(&self, worker: usize, partner: usize, stride: usize) -> Result<()> {
        let partials = match self.partials.get() {
            Some(partials) => partials,
            None => return Ok(()),
        };

        // SAFETY: in this round the slots `worker` and `partner` are only
        // accessed by `worker`, the previous round ended with a barrier.
        let (left, right) = unsafe { (partials.take(worker), partials.take(partner)) };

        let value = match (left, right) {
            (Some(left), Some(right)) => self.operation.apply(left, right)?,
            (Some(value), None) | (None, Some(value)) => value,
            (None, None) => return Ok(()),
        };

        // SAFETY: see above.
        unsafe { partials.put(worker, value) };

        trace!(worker, partner, stride, "combined partial results");

        Ok(())
    }
}

/* Gate */

/// Holds the spawned workers back until the whole team exists, so a
/// failed spawn never leaves workers waiting at a barrier.
#[derive(Default)]
struct Gate {
    state: Mutex<Option<bool>>,
    changed: Condvar,
}

impl Gate {
    fn release(&self, start: bool) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = Some(start);

        self.changed.notify_all();
    }

    fn wait(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self
            .changed
            .wait_while(state, |state| state.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        (*state).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::core::Fallible;
    use crate::executor::Sequential;

    fn sequence(len: usize) -> Vec<f32> {
        (1..=len).map(|i| i as f32).collect()
    }

    fn noisy(len: usize) -> Vec<f32> {
        (0..len).map(|i| ((i * 37) % 101) as f32 * 0.25 - 7.5).collect()
    }

    #[test]
    fn sums_one_to_1024() {
        let data = sequence(1024);

        for &workers in &[1, 2, 4, 8, 16] {
            let x = Parallel::new(workers).reduce(&data, |a, b| a + b).unwrap();

            assert_relative_eq!(524800.0, x, max_relative = 1e-4);
        }
    }

    #[test]
    fn non_power_of_two_teams_match() {
        let data = noisy(1024);
        let expected = Sequential::reduce(&data, |a, b| a + b);

        for workers in 1..=17 {
            let x = Parallel::new(workers).reduce(&data, |a, b| a + b).unwrap();

            assert_relative_eq!(expected, x, max_relative = 1e-4);
        }
    }

    #[test]
    fn empty_input_returns_zero() {
        let data: Vec<f32> = Vec::new();

        for &workers in &[1, 3, 8] {
            assert_eq!(0.0, Parallel::new(workers).reduce(&data, |a, b| a + b).unwrap());
        }
    }

    #[test]
    fn single_element() {
        let x = Parallel::new(1).reduce(&[42.5f32], |a, b| a + b).unwrap();

        assert_eq!(42.5, x);
    }

    #[test]
    fn zero_workers_is_invalid() {
        let err = Parallel::new(0)
            .reduce(&sequence(16), |a, b| a + b)
            .unwrap_err();

        assert!(err.is_invalid_argument());
    }

    #[test]
    fn more_workers_than_items() {
        let data = sequence(3);

        let x = Parallel::new(64).reduce(&data, |a, b| a + b).unwrap();

        assert_eq!(6.0, x);
        assert_eq!(3, Parallel::new(64).team_size(data.len()).unwrap());
    }

    #[test]
    fn min_len_limits_team() {
        let executor = Parallel::new(8).with_min_len(300);

        assert_eq!(3, executor.team_size(1024).unwrap());
        assert_relative_eq!(
            524800.0,
            executor.reduce(&sequence(1024), |a, b| a + b).unwrap(),
            max_relative = 1e-4
        );
    }

    #[test]
    fn keeps_sequence_order() {
        let data: Vec<Vec<u32>> = (0..100).map(|i| vec![i]).collect();

        for workers in 1..=9 {
            let x = Parallel::new(workers)
                .reduce(&data, |mut a, mut b| {
                    a.append(&mut b);
                    a
                })
                .unwrap();

            assert_eq!((0..100).collect::<Vec<u32>>(), x);
        }
    }

    #[test]
    fn applies_operation_once_per_item_and_combine() {
        let data = sequence(1000);

        for workers in 1..=12 {
            let calls = AtomicUsize::new(0);

            Parallel::new(workers)
                .reduce(&data, |a, b| {
                    calls.fetch_add(1, Ordering::Relaxed);
                    a + b
                })
                .unwrap();

            assert_eq!(1000 + workers - 1, calls.load(Ordering::Relaxed));
        }
    }

    #[test]
    fn operator_error_is_returned() {
        let data = sequence(1024);

        let err = Parallel::new(6)
            .exec(
                &data[..],
                || 0.0f32,
                Fallible(|a: f32, b: f32| {
                    if b == 777.0 {
                        Err("unlucky item")
                    } else {
                        Ok(a + b)
                    }
                }),
            )
            .unwrap_err();

        assert!(matches!(err, Error::Operator(_)));
        assert_eq!("Operator failed: unlucky item", err.to_string());
    }

    #[test]
    fn combine_error_is_returned() {
        let data = sequence(1024);

        // Every item is at most 1024, so only two partial results fail.
        let operation = Fallible(|a: f32, b: f32| {
            if a > 1024.0 && b > 1024.0 {
                Err("combine")
            } else {
                Ok(a + b)
            }
        });

        for &workers in &[2, 3, 5] {
            let err = Parallel::new(workers)
                .exec(&data[..], || 0.0f32, &operation)
                .unwrap_err();

            assert!(matches!(err, Error::Operator(_)), "workers = {}", workers);
            assert_eq!("Operator failed: combine", err.to_string());
        }

        assert_relative_eq!(
            524800.0,
            Parallel::new(1)
                .exec(&data[..], || 0.0f32, &operation)
                .unwrap(),
            max_relative = 1e-4
        );
    }

    #[test]
    fn setup_is_logged() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = {
            let buffer = buffer.clone();

            move || CaptureWriter(buffer.clone())
        };

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(writer)
            .finish();

        let x = tracing::subscriber::with_default(subscriber, || {
            Parallel::new(4).reduce(&sequence(1024), |a, b| a + b)
        })
        .unwrap();

        assert_relative_eq!(524800.0, x, max_relative = 1e-4);

        let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();

        assert!(output.contains("partitioned reduction input"), "{}", output);
        assert!(output.contains("workers=4"), "{}", output);
        assert!(output.contains("block_size=256"), "{}", output);
        assert!(output.contains("len=1024"), "{}", output);
    }

    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);

            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn operator_panic_is_propagated() {
        let data = sequence(1024);

        let result = panic::catch_unwind(|| {
            Parallel::new(5).reduce(&data, |a, b| {
                if b == 1000.0 {
                    panic!("operator exploded");
                }

                a + b
            })
        });

        let payload = result.unwrap_err();

        assert_eq!(Some(&"operator exploded"), payload.downcast_ref::<&str>());
    }

    #[test]
    fn with_setup_merges() {
        let executor = <Parallel as Executor<'_, f32>>::with_setup(
            Parallel::new(4),
            Setup::default().with_min_len(512),
        );

        assert_eq!(Some(4), executor.setup().workers);
        assert_eq!(2, executor.team_size(1024).unwrap());
    }
}
