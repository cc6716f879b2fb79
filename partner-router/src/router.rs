//! Per-message routing: classify, gate, clean, emit.
//!
//! One [`Router`] serves one worker. It owns its seen-message counter and
//! shares the partner registry and cleaning policy read-only through `Arc`,
//! so several routers built from the same configuration never contend.

use std::sync::Arc;

use slog::{debug, info, warn, Logger};

use crate::{
    cleaning::CleaningPolicy,
    config::RouterConfig,
    counter::{describe_metrics, MessageCounter},
    error::{Result, RouterError},
    event::Event,
    logging::{event_logger, CleanedJson},
    partner::PartnerRegistry,
    transport::{IncomingEnvelope, MessageSink, OutgoingEnvelope, SystemStream},
};

/// Why an event was not forwarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The event does not declare a recognized partner.
    NotPartner,
    /// The event carries the legacy schema version.
    LegacyVersion,
    /// The allow-list is non-empty and does not contain the event id.
    NotAllowed,
    /// The skip-list contains the event id.
    Skipped,
}

/// Result of routing one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The cleaned event was handed to the sink on `topic`.
    Forwarded { topic: String },
    /// The event failed a gate and was not sent.
    Dropped(DropReason),
}

impl Outcome {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Outcome::Forwarded { .. })
    }

    pub fn topic(&self) -> Option<&str> {
        match self {
            Outcome::Forwarded { topic } => Some(topic),
            Outcome::Dropped(_) => None,
        }
    }
}

/// Tally of a [`Router::process_batch`] run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Messages sent to the sink.
    pub forwarded: u64,
    /// Messages that failed a gate.
    pub dropped: u64,
    /// Messages that failed, in arrival order.
    pub failures: Vec<RouterError>,
}

/// Routes partner events from an input stream to per-partner topics.
pub struct Router {
    success_topic_prefix: String,
    partners: Arc<PartnerRegistry>,
    cleaner: Arc<CleaningPolicy>,
    counter: MessageCounter,
    logger: Logger,
}

impl Router {
    /// Builds a router from loaded configuration and logs its summary.
    pub fn from_config(config: &RouterConfig, logger: Logger) -> Self {
        config.log_summary(&logger);
        Self::with_parts(
            config.success_topic_prefix.clone(),
            Arc::new(config.partner_registry()),
            Arc::new(config.cleaning_policy()),
            logger,
        )
    }

    /// Builds a router around shared, already-built parts.
    pub fn with_parts(
        success_topic_prefix: impl Into<String>,
        partners: Arc<PartnerRegistry>,
        cleaner: Arc<CleaningPolicy>,
        logger: Logger,
    ) -> Self {
        describe_metrics();
        Self {
            success_topic_prefix: success_topic_prefix.into(),
            partners,
            cleaner,
            counter: MessageCounter::new(),
            logger,
        }
    }

    /// Routes one inbound message.
    ///
    /// Gate failures are `Ok(Outcome::Dropped(_))`. Malformed input and send
    /// failures are returned as errors and leave the counter untouched.
    pub fn process<S>(&mut self, envelope: IncomingEnvelope, sink: &mut S) -> Result<Outcome>
    where
        S: MessageSink + ?Sized,
    {
        let event = Event::from_payload(envelope.into_payload(), &self.partners)?;
        let outcome = self.process_event(event, sink)?;
        self.counter.increment();
        Ok(outcome)
    }

    /// Runs the gates on an already-parsed event and forwards it if they pass.
    ///
    /// Does not touch the seen-message counter.
    pub fn process_event<S>(&self, mut event: Event, sink: &mut S) -> Result<Outcome>
    where
        S: MessageSink + ?Sized,
    {
        let log = event_logger(&self.logger, &event);
        info!(log, "event received"; "ts" => event.timestamp(), "sid" => event.session_id());

        let Some(topic) = event.route_to().map(|segment| self.topic_for(segment)) else {
            return Ok(Outcome::Dropped(DropReason::NotPartner));
        };
        event.update_type();
        info!(log, "routing partner event"; "topic" => &topic);

        if event.is_legacy_version() {
            return Ok(Outcome::Dropped(DropReason::LegacyVersion));
        }
        if !self.cleaner.should_allow_event(event.event_id()) {
            return Ok(Outcome::Dropped(DropReason::NotAllowed));
        }
        if self.cleaner.should_skip_event(event.event_id()) {
            return Ok(Outcome::Dropped(DropReason::Skipped));
        }

        self.cleaner.clean(event.data_mut());
        info!(log, "cleaned event");
        debug!(log, "forwarding"; "payload" => CleanedJson::new(event.data()));

        let envelope = OutgoingEnvelope::new(SystemStream::new(topic.as_str()), event.into_data());
        sink.send(envelope)
            .map_err(|source| RouterError::SendFailure {
                topic: topic.clone(),
                source,
            })?;
        Ok(Outcome::Forwarded { topic })
    }

    /// Routes every envelope, carrying on past failed messages.
    pub fn process_batch<I, S>(&mut self, envelopes: I, sink: &mut S) -> BatchReport
    where
        I: IntoIterator<Item = IncomingEnvelope>,
        S: MessageSink + ?Sized,
    {
        let mut report = BatchReport::default();
        for envelope in envelopes {
            match self.process(envelope, sink) {
                Ok(Outcome::Forwarded { .. }) => report.forwarded += 1,
                Ok(Outcome::Dropped(_)) => report.dropped += 1,
                Err(err) => {
                    warn!(self.logger, "message not routed"; "error" => %err);
                    report.failures.push(err);
                }
            }
        }
        report
    }

    /// Window tick: zero the seen-message counter.
    pub fn window(&mut self) {
        debug!(self.logger, "window tick"; "message_count" => self.counter.get());
        self.counter.reset();
    }

    /// Messages seen since the last window tick.
    pub fn message_count(&self) -> u64 {
        self.counter.get()
    }

    /// Output topic for a partner routing segment: `<prefix>.<segment>`.
    pub fn topic_for(&self, segment: &str) -> String {
        format!("{}.{segment}", self.success_topic_prefix)
    }
}
