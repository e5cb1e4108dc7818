use std::fmt;

use pretty_assertions::StrComparison;

use super::reduce::Reducer;
use crate::effect::Effect;

/// Logs every action the wrapped reducer receives and the state diff it
/// produced, at `debug` level under `tca_runtime::changes`.
pub struct PrintChanges<R> {
    inner: R,
}

impl<R> PrintChanges<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R> Reducer for PrintChanges<R>
where
    R: Reducer,
    R::State: fmt::Debug,
    R::Action: fmt::Debug,
{
    type State = R::State;
    type Action = R::Action;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action> {
        if !tracing::enabled!(target: "tca_runtime::changes", tracing::Level::DEBUG) {
            return self.inner.reduce(state, action);
        }

        let received = format!("{action:?}");
        let before = format!("{state:#?}");
        let effect = self.inner.reduce(state, action);
        let after = format!("{state:#?}");

        if before == after {
            tracing::debug!(target: "tca_runtime::changes", action = %received, "(No state changes)");
        } else {
            let diff = StrComparison::new(&before, &after);
            tracing::debug!(target: "tca_runtime::changes", action = %received, "State changed\n{diff}");
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::Reduce;

    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn logs_a_diff_only_when_state_changes() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let reducer = PrintChanges::new(Reduce::new(|count: &mut i32, delta: i32| {
            *count += delta;
            Effect::none()
        }));
        let mut count = 1;
        tracing::subscriber::with_default(subscriber, || {
            let _ = reducer.reduce(&mut count, 2);
            let _ = reducer.reduce(&mut count, 0);
        });

        let output = String::from_utf8_lossy(&captured.0.lock()).into_owned();
        assert_eq!(count, 3);
        assert!(output.contains("State changed"), "{output}");
        assert!(output.contains("(No state changes)"), "{output}");
    }

    #[test]
    fn wrapped_reducer_still_runs() {
        let reducer = PrintChanges::new(Reduce::new(|count: &mut i32, delta: i32| {
            *count += delta;
            Effect::none()
        }));
        let mut count = 1;
        let _ = reducer.reduce(&mut count, 2);
        assert_eq!(count, 3);
    }
}
