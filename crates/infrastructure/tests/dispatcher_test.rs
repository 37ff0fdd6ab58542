mod helpers;

use ferrous_shield_application::ports::{BlockStore, QueryLogRepository, TunnelDevice};
use ferrous_shield_domain::{BlockingConfig, UpstreamConfig, VerdictSource};
use ferrous_shield_infrastructure::filter::{BloomLifecycle, FilterEngine};
use ferrous_shield_infrastructure::forwarding::{
    ResponseWriter, UpstreamForwarder, QUEUE_DEPTH_PER_WORKER,
};
use ferrous_shield_infrastructure::packet::internet_checksum;
use ferrous_shield_infrastructure::repositories::SqliteQueryLogRepository;
use ferrous_shield_infrastructure::tunnel::{PacketDispatcher, ServiceContext};
use helpers::dns_server_mock::MockDnsServer;
use helpers::frames::{
    decode_reply, dns_query, frame_with_protocol, query_frame, udp_frame, CLIENT, RESOLVER,
};
use helpers::memory_tunnel::MemoryTunnel;
use helpers::stores::{memory_pool, seeded_store};
use std::collections::BTreeSet;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Handle;

const WAIT: Duration = Duration::from_secs(3);

struct Harness {
    tunnel: Arc<MemoryTunnel>,
    ctx: Arc<ServiceContext>,
    dispatcher: PacketDispatcher,
    _dir: TempDir,
}

async fn harness(upstream: SocketAddr, upstream_timeout_ms: u64) -> Harness {
    harness_with_workers(upstream, upstream_timeout_ms, 10).await
}

async fn harness_with_workers(
    upstream: SocketAddr,
    upstream_timeout_ms: u64,
    workers: usize,
) -> Harness {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn BlockStore> = seeded_store(&["ads.example.com"]).await;
    let blocking = BlockingConfig {
        bloom_snapshot_path: dir.path().join("bloom.bin").to_string_lossy().into_owned(),
        bloom_min_items: 1000,
        ..BlockingConfig::default()
    };

    let engine = Arc::new(FilterEngine::new(Arc::clone(&store), &blocking));
    BloomLifecycle::new(Arc::clone(&engine), store, &blocking)
        .start()
        .await
        .unwrap();

    let tunnel = MemoryTunnel::new();
    let device: Arc<dyn TunnelDevice> = tunnel.clone();
    let forwarder = Arc::new(UpstreamForwarder::new(&UpstreamConfig {
        address: upstream,
        timeout_ms: upstream_timeout_ms,
        workers,
        routing_mark: 0,
        ..UpstreamConfig::default()
    }));
    let ctx = Arc::new(ServiceContext::new());
    let dispatcher = PacketDispatcher::new(
        engine,
        forwarder,
        Arc::new(ResponseWriter::new(device)),
        Arc::clone(&ctx),
        Handle::current(),
    );

    Harness {
        tunnel,
        ctx,
        dispatcher,
        _dir: dir,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocked_domain_gets_nxdomain() {
    let upstream = MockDnsServer::start().await.unwrap();
    let h = harness(upstream.addr(), 2000).await;

    h.dispatcher.dispatch(&query_frame(0xBEEF, "ads.example.com"));

    let written = h.tunnel.wait_for_writes(1, WAIT).await;
    assert_eq!(written.len(), 1);

    let frame = &written[0];
    assert_eq!(internet_checksum(&frame[..20]), 0);
    assert_eq!(&frame[6..8], &[0x40, 0x00]);
    assert_eq!(frame[8], 64);

    let reply = decode_reply(frame);
    assert_eq!(reply.src, RESOLVER);
    assert_eq!(reply.dst, CLIENT);

    let query = dns_query(0xBEEF, "ads.example.com");
    assert_eq!(&reply.payload[..2], &[0xBE, 0xEF]);
    assert_eq!(reply.payload[2], query[2] | 0x80);
    assert_eq!(reply.payload[3] & 0x0F, 3);
    assert_eq!(&reply.payload[4..], &query[4..]);

    assert!(upstream.received().is_empty());
    let stats = h.ctx.stats();
    assert_eq!(stats.blocked, 1);
    assert_eq!(stats.queries, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_allowed_domain_is_relayed_unmodified() {
    let upstream = MockDnsServer::start().await.unwrap();
    let h = harness(upstream.addr(), 2000).await;
    let query = dns_query(0x1234, "example.com");

    h.dispatcher.dispatch(&udp_frame(CLIENT, RESOLVER, &query));

    let written = h.tunnel.wait_for_writes(1, WAIT).await;
    assert_eq!(written.len(), 1);
    assert_eq!(upstream.received(), vec![query.clone()]);

    let reply = decode_reply(&written[0]);
    assert_eq!(reply.src, RESOLVER);
    assert_eq!(reply.dst, CLIENT);
    assert_eq!(reply.payload, MockDnsServer::build_response(&query));
    assert_eq!(internet_checksum(&written[0][..20]), 0);

    let stats = h.ctx.stats();
    assert_eq!(stats.allowed, 1);
    assert_eq!(stats.forwarded, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_non_dns_traffic_produces_no_output() {
    let upstream = MockDnsServer::start().await.unwrap();
    let h = harness(upstream.addr(), 2000).await;
    let web = SocketAddrV4::new(Ipv4Addr::new(93, 184, 216, 34), 80);

    h.dispatcher.dispatch(&udp_frame(CLIENT, web, b"GET / HTTP/1.1\r\n\r\n"));
    h.dispatcher.dispatch(&frame_with_protocol(6));
    h.dispatcher.dispatch(&frame_with_protocol(1));
    h.dispatcher.dispatch(&[0x45, 0x00, 0x00]);

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(h.tunnel.written().is_empty());
    assert!(upstream.received().is_empty());
    let stats = h.ctx.stats();
    assert_eq!(stats.frames, 4);
    assert_eq!(stats.dropped, 4);
    assert_eq!(stats.queries, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_upstream_timeout_is_silent_drop() {
    let upstream = MockDnsServer::start_silent().await.unwrap();
    let h = harness(upstream.addr(), 100).await;

    h.dispatcher.dispatch(&query_frame(7, "example.com"));

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(h.tunnel.written().is_empty());
    assert_eq!(upstream.received().len(), 1);
    let stats = h.ctx.stats();
    assert_eq!(stats.allowed, 1);
    assert_eq!(stats.upstream_failures, 1);
    assert_eq!(stats.blocked, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_uppercase_query_is_matched() {
    let upstream = MockDnsServer::start().await.unwrap();
    let h = harness(upstream.addr(), 2000).await;

    h.dispatcher.dispatch(&query_frame(9, "ADS.Example.Com"));

    let written = h.tunnel.wait_for_writes(1, WAIT).await;
    assert_eq!(written.len(), 1);
    assert_eq!(decode_reply(&written[0]).payload[3] & 0x0F, 3);
    assert!(upstream.received().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_verdicts_are_logged() {
    let upstream = MockDnsServer::start().await.unwrap();
    let mut h = harness(upstream.addr(), 2000).await;
    let query_log = Arc::new(SqliteQueryLogRepository::new(memory_pool().await));
    h.dispatcher = h.dispatcher.clone().with_query_log(query_log.clone());

    h.dispatcher.dispatch(&query_frame(1, "ads.example.com"));
    h.tunnel.wait_for_writes(1, WAIT).await;
    tokio::time::sleep(Duration::from_millis(400)).await;

    let recent = query_log.get_recent(10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].domain.as_ref(), "ads.example.com");
    assert!(recent[0].blocked);
    assert_eq!(recent[0].source, VerdictSource::Store);
    assert_eq!(recent[0].client_ip, *CLIENT.ip());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_upstream_queue_drops_and_counts() {
    let upstream = MockDnsServer::start_silent().await.unwrap();
    let h = harness_with_workers(upstream.addr(), 2000, 1).await;
    let overflow = 5;

    for id in 0..(QUEUE_DEPTH_PER_WORKER + overflow) as u16 {
        h.dispatcher.dispatch(&query_frame(id, &format!("site{id}.example.org")));
    }
    // Bloom false positives take the store path before reaching the queue.
    tokio::time::sleep(Duration::from_millis(300)).await;

    let stats = h.ctx.stats();
    assert_eq!(stats.allowed, (QUEUE_DEPTH_PER_WORKER + overflow) as u64);
    assert_eq!(stats.dropped, overflow as u64);
    assert_eq!(stats.forwarded, 0);

    h.ctx.stop();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_replies_are_whole_datagrams() {
    let upstream = MockDnsServer::start().await.unwrap();
    let h = harness(upstream.addr(), 2000).await;
    const PER_LANE: u16 = 40;

    let senders: Vec<_> = [0u16, 1]
        .into_iter()
        .map(|lane| {
            let dispatcher = h.dispatcher.clone();
            std::thread::spawn(move || {
                for i in 0..PER_LANE {
                    let id = lane * 1000 + i;
                    let name = if lane == 0 {
                        "ads.example.com".to_string()
                    } else {
                        format!("host{i}.example.net")
                    };
                    dispatcher.dispatch(&query_frame(id, &name));
                }
            })
        })
        .collect();
    for sender in senders {
        sender.join().unwrap();
    }

    let written = h
        .tunnel
        .wait_for_writes(2 * PER_LANE as usize, Duration::from_secs(5))
        .await;
    assert_eq!(written.len(), 2 * PER_LANE as usize);

    let mut ids = BTreeSet::new();
    for frame in &written {
        assert_eq!(internet_checksum(&frame[..20]), 0);
        let total_len = u16::from_be_bytes([frame[2], frame[3]]) as usize;
        assert_eq!(total_len, frame.len());

        let reply = decode_reply(frame);
        assert_eq!(reply.dst, CLIENT);
        let id = u16::from_be_bytes([reply.payload[0], reply.payload[1]]);
        let rcode = reply.payload[3] & 0x0F;
        if id < 1000 {
            assert_eq!(rcode, 3);
        } else {
            let query = dns_query(id, &format!("host{}.example.net", id - 1000));
            assert_eq!(reply.payload, MockDnsServer::build_response(&query));
        }
        ids.insert(id);
    }
    assert_eq!(ids.len(), 2 * PER_LANE as usize);
}
