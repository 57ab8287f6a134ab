//! Shared test utilities used across netgauge crates.

pub mod fixtures {
    //! Edge lists with known metric values.

    /// An undirected edge between two integer node identifiers.
    pub type Edge = (i64, i64);

    /// Path `1 - 2 - ... - n`.
    #[must_use]
    pub fn path(n: i64) -> Vec<Edge> {
        (1..n).map(|node| (node, node + 1)).collect()
    }

    /// Cycle on nodes `1..=n`.
    #[must_use]
    pub fn cycle(n: i64) -> Vec<Edge> {
        let mut edges = path(n);
        if n > 2 {
            edges.push((n, 1));
        }
        edges
    }

    /// Complete graph on nodes `1..=n`.
    #[must_use]
    pub fn complete(n: i64) -> Vec<Edge> {
        (1..=n)
            .flat_map(|left| ((left + 1)..=n).map(move |right| (left, right)))
            .collect()
    }

    /// Star with centre `0` and leaves `1..=leaves`.
    #[must_use]
    pub fn star(leaves: i64) -> Vec<Edge> {
        (1..=leaves).map(|leaf| (0, leaf)).collect()
    }

    /// Two `clique`-sized cliques joined through `bridge` intermediate nodes,
    /// with one pendant node hanging off the first clique.
    ///
    /// The near-symmetric halves make eigenvector power iteration oscillate
    /// far too slowly to settle within a thousand steps.
    #[must_use]
    pub fn twin_cliques_with_pendant(clique: i64, bridge: i64) -> Vec<Edge> {
        let first: Vec<i64> = (0..clique).collect();
        let second: Vec<i64> = (clique..2 * clique).collect();
        let mut edges = Vec::new();
        for members in [&first, &second] {
            for (offset, &left) in members.iter().enumerate() {
                edges.extend(members[offset + 1..].iter().map(|&right| (left, right)));
            }
        }

        let mut next = 2 * clique;
        let mut previous = clique - 1;
        for _ in 0..bridge {
            edges.push((previous, next));
            previous = next;
            next += 1;
        }
        edges.push((previous, clique));
        edges.push((0, next));
        edges
    }

    /// Renders `edges` in edge-list text form, one `left right` pair per line.
    #[must_use]
    pub fn edge_list_text(edges: &[Edge]) -> String {
        edges
            .iter()
            .map(|(left, right)| format!("{left} {right}\n"))
            .collect()
    }

}

pub mod tracing {
    //! Captures spans and events emitted while a closure runs.
    use std::collections::BTreeMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::{Layer, Registry};

    /// Span and event log filled by a [`tracing_subscriber::Layer`].
    ///
    /// # Examples
    /// ```
    /// use netgauge_test_support::tracing::TraceLog;
    ///
    /// let ((), log) = TraceLog::capture(|| {
    ///     let _span = tracing::info_span!("demo.outer", items = 3).entered();
    ///     tracing::warn!(reason = "example", "something odd");
    /// });
    /// assert_eq!(log.span("demo.outer").expect("span closed").field("items"), Some("3"));
    /// assert_eq!(log.events_at(tracing::Level::WARN).len(), 1);
    /// ```
    #[derive(Clone, Default)]
    pub struct TraceLog {
        captured: Arc<Mutex<Captured>>,
    }

    #[derive(Default)]
    struct Captured {
        spans: Vec<ClosedSpan>,
        events: Vec<CapturedEvent>,
    }

    /// A span that has closed, with every field recorded during its life.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ClosedSpan {
        /// Span name.
        pub name: &'static str,
        /// Name of the enclosing span, if any.
        pub parent: Option<&'static str>,
        /// Field values rendered as strings.
        pub fields: BTreeMap<String, String>,
    }

    impl ClosedSpan {
        /// Rendered value of `name`, if it was recorded.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// An emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CapturedEvent {
        /// Event level.
        pub level: Level,
        /// Name of the span the event was emitted in, if any.
        pub span: Option<&'static str>,
        /// Field values rendered as strings; the message is under `message`.
        pub fields: BTreeMap<String, String>,
    }

    impl CapturedEvent {
        /// Rendered value of `name`, if present.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    impl TraceLog {
        /// Runs `body` under a subscriber that records into a fresh log.
        pub fn capture<T>(body: impl FnOnce() -> T) -> (T, Self) {
            let log = Self::default();
            let subscriber = Registry::default().with(log.clone());
            let output = tracing::subscriber::with_default(subscriber, body);
            (output, log)
        }

        fn lock(&self) -> MutexGuard<'_, Captured> {
            self.captured.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Closed spans in closing order.
        #[must_use]
        pub fn spans(&self) -> Vec<ClosedSpan> {
            self.lock().spans.clone()
        }

        /// The first closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<ClosedSpan> {
            self.lock().spans.iter().find(|span| span.name == name).cloned()
        }

        /// Every closed span called `name`.
        #[must_use]
        pub fn spans_named(&self, name: &str) -> Vec<ClosedSpan> {
            self.lock()
                .spans
                .iter()
                .filter(|span| span.name == name)
                .cloned()
                .collect()
        }

        /// Events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<CapturedEvent> {
            self.lock().events.clone()
        }

        /// Events emitted at exactly `level`.
        #[must_use]
        pub fn events_at(&self, level: Level) -> Vec<CapturedEvent> {
            self.lock()
                .events
                .iter()
                .filter(|event| event.level == level)
                .cloned()
                .collect()
        }
    }

    struct OpenSpan(ClosedSpan);

    impl<S> Layer<S> for TraceLog
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut open = ClosedSpan {
                name: attrs.metadata().name(),
                parent: span.parent().map(|parent| parent.name()),
                fields: BTreeMap::new(),
            };
            attrs.record(&mut Fields(&mut open.fields));
            span.extensions_mut().insert(OpenSpan(open));
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(id)
                && let Some(open) = span.extensions_mut().get_mut::<OpenSpan>()
            {
                values.record(&mut Fields(&mut open.0.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(&id)
                && let Some(open) = span.extensions_mut().remove::<OpenSpan>()
            {
                self.lock().spans.push(open.0);
            }
        }

        fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
            let mut fields = BTreeMap::new();
            event.record(&mut Fields(&mut fields));
            let span = ctx.event_span(event).map(|span| span.name());
            self.lock().events.push(CapturedEvent {
                level: *event.metadata().level(),
                span,
                fields,
            });
        }
    }

    struct Fields<'a>(&'a mut BTreeMap<String, String>);

    impl Fields<'_> {
        fn put(&mut self, field: &Field, value: impl ToString) {
            self.0.insert(field.name().to_owned(), value.to_string());
        }
    }

    impl Visit for Fields<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.put(field, format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.put(field, value);
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.put(field, value);
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.put(field, value);
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.put(field, value);
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            self.put(field, value);
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.put(field, value);
        }
    }
}
