//! Two alloy transport layers to instrument RPC calls. The [`LabelingLayer`]
//! "tags" every request passing through it by adding its label to the
//! request's metadata. Labeling layers can be stacked to build a hierarchy
//! of components.
//! The [`InstrumentationLayer`] reads that label for each call and emits
//! logs and metrics with it.
use {
    super::errors::TransportErrorExt,
    alloy::{
        rpc::json_rpc::{RequestPacket, ResponsePacket, SerializedRequest},
        transports::TransportError,
    },
    std::{
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
    },
    tower::{Layer, Service},
};

/// Layer that attaches a label to each request that passes through.
pub(crate) struct LabelingLayer {
    pub label: String,
}

impl<S> Layer<S> for LabelingLayer {
    type Service = LabeledProvider<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LabeledProvider {
            inner,
            // Nested layers are joined with underscores. The trailing one is
            // dropped before the composed label gets logged.
            label: format!("{}_", self.label),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LabeledProvider<S> {
    inner: S,
    label: String,
}

impl<S> LabeledProvider<S> {
    fn attach_label(&self, req: &mut SerializedRequest) {
        req.meta_mut()
            .extensions_mut()
            .get_or_insert_default::<ProviderLabel>()
            .append(&self.label);
    }
}

impl<S> Service<RequestPacket> for LabeledProvider<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
    S::Error: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        req.requests_mut()
            .iter_mut()
            .for_each(|r| self.attach_label(r));
        Box::pin(self.inner.call(req))
    }
}

/// Layer that logs and collects metrics based on the
/// [`ProviderLabel`] metadata attached to each request.
pub(crate) struct InstrumentationLayer;

impl<S> Layer<S> for InstrumentationLayer {
    type Service = InstrumentedProvider<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedProvider {
            inner,
            metrics: Metrics::instance(observe::metrics::get_storage_registry())
                .expect("unexpected error getting metrics instance"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InstrumentedProvider<S> {
    inner: S,
    metrics: &'static Metrics,
}

impl<S> Service<RequestPacket> for InstrumentedProvider<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
    S::Error: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        let calls: Vec<_> = req
            .requests_mut()
            .iter_mut()
            .map(|r| {
                let component: String = r
                    .meta_mut()
                    .extensions_mut()
                    .remove::<ProviderLabel>()
                    .map(Into::into)
                    .unwrap_or_default();
                let method = r.method().to_string();
                tracing::trace!(%component, %method, id = ?r.id(), "executing request");
                let timer = self.metrics.on_request_start(&component, &method);
                (component, method, timer)
            })
            .collect();

        let metrics = self.metrics;
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await;
            for (component, method, timer) in calls {
                drop(timer);
                if let Err(err) = &res {
                    let kind = failure_kind(err);
                    tracing::debug!(%component, %method, kind, ?err, "request failed");
                    metrics
                        .requests_failed
                        .with_label_values(&[component.as_str(), method.as_str(), kind])
                        .inc();
                }
            }
            res
        })
    }
}

fn failure_kind(err: &TransportError) -> &'static str {
    if err.is_transport_failure() {
        "transport"
    } else if err.node_error().is_some() {
        "node"
    } else {
        "other"
    }
}

/// Label that identifies which component emitted a request.
/// Each [`LabelingLayer`] a request passes through prepends its
/// own label to it so we know the entire hierarchy of components
/// a request went through.
#[derive(Debug, Clone)]
struct ProviderLabel(String);

impl Default for ProviderLabel {
    fn default() -> Self {
        // overallocate to avoid reallocations when other layers add more labels
        Self(String::with_capacity(30))
    }
}

impl ProviderLabel {
    fn append(&mut self, label: &str) {
        self.0.insert_str(0, label)
    }
}

impl From<ProviderLabel> for String {
    fn from(mut value: ProviderLabel) -> Self {
        value.0.pop();
        value.0
    }
}

#[derive(prometheus_metric_storage::MetricStorage, Clone, Debug)]
#[metric(subsystem = "alloy_rpc")]
struct Metrics {
    /// Number of inflight RPC requests for ethereum node.
    #[metric(labels("component", "method"))]
    requests_inflight: prometheus::IntGaugeVec,

    /// Number of completed RPC requests for ethereum node.
    #[metric(labels("component", "method"))]
    requests_complete: prometheus::IntCounterVec,

    /// Number of failed RPC requests by failure kind: `transport` if the node
    /// could not be reached, `node` if it answered with an error.
    #[metric(labels("component", "method", "kind"))]
    requests_failed: prometheus::IntCounterVec,

    /// Execution time for each RPC request.
    #[metric(labels("component", "method"))]
    requests_duration_seconds: prometheus::HistogramVec,
}

impl Metrics {
    #[must_use]
    fn on_request_start(&self, label: &str, method: &str) -> impl Drop + use<> {
        let requests_inflight = self.requests_inflight.with_label_values(&[label, method]);
        let requests_complete = self.requests_complete.with_label_values(&[label, method]);
        let requests_duration_seconds = self
            .requests_duration_seconds
            .with_label_values(&[label, method]);

        requests_inflight.inc();
        let timer = requests_duration_seconds.start_timer();

        scopeguard::guard(timer, move |timer| {
            requests_inflight.dec();
            requests_complete.inc();
            timer.stop_and_record();
        })
    }
}
