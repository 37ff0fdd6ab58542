use crate::filter::{FastPath, FilterEngine};
use crate::forwarding::{ResponseWriter, UpstreamForwarder};
use crate::packet::{parse_frame, parse_query_name, synthesize_nxdomain};
use crate::tunnel::context::ServiceContext;
use ferrous_shield_application::ports::QueryLogRepository;
use ferrous_shield_domain::{DnsFlow, QueryLog, Verdict};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info, trace, warn};

/// Turns captured frames into verdicts and replies.
///
/// `dispatch` runs on the tunnel thread and never waits on I/O: frames are
/// parsed and checked against the in-memory tiers inline, and anything that
/// needs the store or the upstream is handed to the runtime.
#[derive(Clone)]
pub struct PacketDispatcher {
    engine: Arc<FilterEngine>,
    forwarder: Arc<UpstreamForwarder>,
    writer: Arc<ResponseWriter>,
    ctx: Arc<ServiceContext>,
    query_log: Option<Arc<dyn QueryLogRepository>>,
    runtime: Handle,
}

impl PacketDispatcher {
    pub fn new(
        engine: Arc<FilterEngine>,
        forwarder: Arc<UpstreamForwarder>,
        writer: Arc<ResponseWriter>,
        ctx: Arc<ServiceContext>,
        runtime: Handle,
    ) -> Self {
        Self {
            engine,
            forwarder,
            writer,
            ctx,
            query_log: None,
            runtime,
        }
    }

    pub fn with_query_log(mut self, query_log: Arc<dyn QueryLogRepository>) -> Self {
        self.query_log = Some(query_log);
        self
    }

    /// Handles one frame read from the tunnel. Frames that are not a
    /// well-formed IPv4/UDP DNS query are dropped silently.
    pub fn dispatch(&self, frame: &[u8]) {
        self.ctx.record_frame();

        let packet = match parse_frame(frame) {
            Ok(packet) => packet,
            Err(e) => {
                trace!(error = %e, len = frame.len(), "Frame dropped");
                self.ctx.record_drop();
                return;
            }
        };

        let domain = match parse_query_name(packet.message) {
            Ok(domain) => domain,
            Err(e) => {
                debug!(error = %e, client = %packet.flow.client, "Undecodable query dropped");
                self.ctx.record_drop();
                return;
            }
        };

        match self.engine.check_fast(&domain) {
            FastPath::Decided(verdict) => self.apply(verdict, packet.flow, packet.message),
            FastPath::Verify { generation } => {
                let dispatcher = self.clone();
                let flow = packet.flow;
                let message = packet.message.to_vec();
                self.runtime.spawn(async move {
                    let verdict = dispatcher.engine.verify(&domain, generation).await;
                    dispatcher.apply(verdict, flow, &message);
                });
            }
        }
    }

    fn apply(&self, verdict: Verdict, flow: DnsFlow, message: &[u8]) {
        self.ctx.record_verdict(verdict.blocked);
        self.log_query(&verdict, &flow);

        if verdict.blocked {
            info!(
                domain = %verdict.domain,
                source = %verdict.source,
                client = %flow.client,
                "Query blocked"
            );
            self.answer_nxdomain(&flow, message);
        } else {
            debug!(domain = %verdict.domain, source = %verdict.source, "Query allowed");
            self.forward(flow, message.to_vec());
        }
    }

    fn answer_nxdomain(&self, flow: &DnsFlow, query: &[u8]) {
        let reply = match synthesize_nxdomain(query) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(error = %e, "Cannot synthesize NXDOMAIN");
                return;
            }
        };
        if let Err(e) = self.writer.write_reply(flow, &reply) {
            warn!(error = %e, client = %flow.client, "Failed to write NXDOMAIN");
        }
    }

    fn forward(&self, flow: DnsFlow, query: Vec<u8>) {
        let Some(ticket) = self.forwarder.try_enqueue() else {
            warn!(client = %flow.client, "Upstream queue full, dropping query");
            self.ctx.record_drop();
            return;
        };

        let forwarder = Arc::clone(&self.forwarder);
        let writer = Arc::clone(&self.writer);
        let ctx = Arc::clone(&self.ctx);
        let shutdown = ctx.shutdown_token();

        self.runtime.spawn(async move {
            let _ticket = ticket;
            let result = tokio::select! {
                _ = shutdown.cancelled() => return,
                result = forwarder.forward(&query) => result,
            };

            match result {
                Ok(reply) => {
                    ctx.record_forwarded();
                    if let Err(e) = writer.write_reply(&flow, &reply) {
                        warn!(error = %e, client = %flow.client, "Failed to write upstream reply");
                    }
                }
                Err(e) => {
                    ctx.record_upstream_failure();
                    debug!(error = %e, upstream = %forwarder.upstream(), "Upstream exchange failed");
                }
            }
        });
    }

    fn log_query(&self, verdict: &Verdict, flow: &DnsFlow) {
        let Some(ref query_log) = self.query_log else {
            return;
        };
        let entry = QueryLog::from_verdict(verdict, *flow.client.ip());
        let query_log = Arc::clone(query_log);
        self.runtime.spawn(async move {
            if let Err(e) = query_log.log_query(&entry).await {
                debug!(error = %e, "Failed to record query");
            }
        });
    }
}
