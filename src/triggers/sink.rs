//! Concrete trigger sinks.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::{Observation, TriggerSink};

/// Logs every observation as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TriggerSink for TracingSink {
    fn observe(&self, observation: Observation) {
        tracing::info!(
            target: "decoy_http::triggers",
            session = %observation.session,
            peer = ?observation.peer,
            kind = observation.kind.as_str(),
            value = %observation.value.escape_debug(),
            "Observation"
        );
    }
}

/// Forwards observations to an unbounded channel consumed elsewhere.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Observation>,
}

impl ChannelSink {
    /// Create a sink and the receiver that consumes its observations.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Observation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TriggerSink for ChannelSink {
    fn observe(&self, observation: Observation) {
        // Receiver gone means nobody is listening any more.
        let _ = self.tx.send(observation);
    }
}

/// Delivers each observation to several sinks in order.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn TriggerSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn TriggerSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn TriggerSink>) {
        self.sinks.push(sink);
    }
}

impl TriggerSink for FanoutSink {
    fn observe(&self, observation: Observation) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.observe(observation.clone());
            }
            last.observe(observation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::SessionId;
    use crate::triggers::ObservationKind;

    fn observation(value: &str) -> Observation {
        Observation {
            session: SessionId::new(),
            peer: None,
            kind: ObservationKind::PathObserved,
            value: value.into(),
        }
    }

    #[test]
    fn channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();
        sink.observe(observation("/admin"));
        assert_eq!(rx.try_recv().unwrap().value, "/admin");
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.observe(observation("/"));
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let (first, mut rx1) = ChannelSink::new();
        let (second, mut rx2) = ChannelSink::new();
        let mut fanout = FanoutSink::new(vec![Arc::new(first)]);
        fanout.push(Arc::new(second));

        fanout.observe(observation("/wp-login.php"));

        assert_eq!(rx1.try_recv().unwrap().value, "/wp-login.php");
        assert_eq!(rx2.try_recv().unwrap().value, "/wp-login.php");
    }

    #[test]
    fn empty_fanout_is_noop() {
        FanoutSink::default().observe(observation("/"));
    }
}
