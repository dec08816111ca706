//! Tests for listener provisioning and the dispatch loop.

use std::future::pending;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use rosc::{OscBundle, OscPacket, OscTime, OscType};

use super::control::EXIT_PATH;
use super::dispatch::{Dispatcher, Outcome, flatten_packet, recv_error_backoff};
use super::error::{DispatchError, ListenError};
use super::handler::make_handler;
use super::listener::ListenerRegistry;
use super::test_fixtures::{Sender, SharedBuffer, message};
use crate::config::defaults;

const HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Finds `N` distinct, currently unused UDP ports on the loopback interface.
fn free_ports<const N: usize>() -> [u16; N] {
    let holders: Vec<_> = (0..N)
        .map(|_| std::net::UdpSocket::bind((HOST, 0)).unwrap())
        .collect();
    std::array::from_fn(|i| holders[i].local_addr().unwrap().port())
}

fn free_port() -> u16 {
    free_ports::<1>()[0]
}

fn timetag() -> OscTime {
    OscTime {
        seconds: 0,
        fractional: 1,
    }
}

fn addr(port: u16) -> SocketAddr {
    SocketAddr::new(HOST, port)
}

async fn bind(ports: &[u16]) -> ListenerRegistry {
    ListenerRegistry::bind(HOST, ports).await.unwrap()
}

fn echo_dispatcher(registry: ListenerRegistry, out: &SharedBuffer) -> Dispatcher {
    let out = out.clone();
    Dispatcher::new(registry, move |port| make_handler(port, out.clone()))
}

async fn run_until_exit(dispatcher: Dispatcher) -> Outcome {
    tokio::time::timeout(Duration::from_secs(5), dispatcher.run(pending()))
        .await
        .expect("dispatcher did not stop")
        .unwrap()
}

mod provisioning {
    use super::*;

    #[tokio::test]
    async fn binds_ports_in_order() {
        let ports = free_ports::<2>();
        let registry = bind(&ports).await;

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ports().collect::<Vec<_>>(), ports.to_vec());
        for (listener, port) in registry.listeners().iter().zip(ports) {
            assert_eq!(listener.local_addr().unwrap().port(), port);
        }
    }

    #[tokio::test]
    async fn empty_port_list_gives_empty_registry() {
        let registry = bind(&[]).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn port_in_use_fails() {
        let port = free_port();
        let _holder = std::net::UdpSocket::bind((HOST, port)).unwrap();

        let result = ListenerRegistry::bind(HOST, &[port]).await;

        match result {
            Err(ListenError::Bind { port: failed, .. }) => assert_eq!(failed, port),
            other => panic!("expected bind error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_port_fails_on_second_bind() {
        let [first, port] = free_ports::<2>();

        let result = ListenerRegistry::bind(HOST, &[first, port, port]).await;

        assert!(matches!(result, Err(ListenError::Bind { port: p, .. }) if p == port));
    }

    #[tokio::test]
    async fn bind_error_names_the_port() {
        let port = free_port();
        let _holder = std::net::UdpSocket::bind((HOST, port)).unwrap();

        let err = ListenerRegistry::bind(HOST, &[port]).await.unwrap_err();

        assert!(err.to_string().contains(&port.to_string()));
    }
}

mod dispatching {
    use super::*;

    #[tokio::test]
    async fn echoes_then_exits() {
        let port = free_port();
        let out = SharedBuffer::new();
        let dispatcher = echo_dispatcher(bind(&[port]).await, &out);

        let sender = Sender::new().await;
        sender
            .send(addr(port), "/foo/bar", vec![OscType::Int(1), OscType::Int(2)])
            .await;
        sender.send(addr(port), EXIT_PATH, vec![OscType::Int(0)]).await;
        sender.send(addr(port), EXIT_PATH, vec![OscType::Int(1)]).await;
        sender.send(addr(port), "/after/exit", vec![]).await;

        let outcome = run_until_exit(dispatcher).await;

        assert_eq!(outcome, Outcome::ExitRequested { port });
        assert_eq!(
            out.lines(),
            vec![
                format!("{port}: /foo/bar [1, 2]"),
                format!("{port}: /osclisten/exit [0]"),
            ]
        );
    }

    #[tokio::test]
    async fn each_port_uses_its_own_prefix() {
        let [first, second] = free_ports::<2>();
        let out = SharedBuffer::new();
        let dispatcher = echo_dispatcher(bind(&[first, second]).await, &out);
        assert_eq!(dispatcher.ports().collect::<Vec<_>>(), vec![first, second]);

        let task = tokio::spawn(dispatcher.run(pending()));
        let sender = Sender::new().await;

        sender.send(addr(second), "/from/second", vec![]).await;
        assert!(out.wait_for(|text| text.contains("/from/second")).await);

        sender.send(addr(first), "/from/first", vec![]).await;
        assert!(out.wait_for(|text| text.contains("/from/first")).await);

        sender.send(addr(second), EXIT_PATH, vec![OscType::Int(1)]).await;
        let outcome = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        assert_eq!(outcome, Outcome::ExitRequested { port: second });
        assert_eq!(
            out.lines(),
            vec![
                format!("{second}: /from/second []"),
                format!("{first}: /from/first []"),
            ]
        );
    }

    #[tokio::test]
    async fn bundle_messages_are_delivered_in_order() {
        let port = free_port();
        let out = SharedBuffer::new();
        let dispatcher = echo_dispatcher(bind(&[port]).await, &out);

        let bundle = OscPacket::Bundle(OscBundle {
            timetag: timetag(),
            content: vec![
                OscPacket::Message(message("/a", vec![OscType::Int(1)])),
                OscPacket::Message(message("/b", vec![OscType::Int(2)])),
                OscPacket::Message(message(EXIT_PATH, vec![OscType::Int(1)])),
            ],
        });
        Sender::new().await.send_packet(addr(port), &bundle).await;

        let outcome = run_until_exit(dispatcher).await;

        assert_eq!(outcome, Outcome::ExitRequested { port });
        assert_eq!(
            out.lines(),
            vec![format!("{port}: /a [1]"), format!("{port}: /b [2]")]
        );
    }

    #[tokio::test]
    async fn undecodable_datagram_is_dropped() {
        let port = free_port();
        let out = SharedBuffer::new();
        let dispatcher = echo_dispatcher(bind(&[port]).await, &out);

        let sender = Sender::new().await;
        sender.send_raw(addr(port), b"not an osc packet").await;
        sender.send(addr(port), "/still/alive", vec![]).await;
        sender.send(addr(port), EXIT_PATH, vec![OscType::Int(1)]).await;

        run_until_exit(dispatcher).await;

        assert_eq!(out.lines(), vec![format!("{port}: /still/alive []")]);
    }

    #[tokio::test]
    async fn burst_through_single_slot_queue_keeps_order() {
        let port = free_port();
        let out = SharedBuffer::new();
        let dispatcher = echo_dispatcher(bind(&[port]).await, &out).with_queue_capacity(1);

        let sender = Sender::new().await;
        for i in 0..32 {
            sender.send(addr(port), "/count", vec![OscType::Int(i)]).await;
        }
        sender.send(addr(port), EXIT_PATH, vec![OscType::Int(1)]).await;

        let outcome = run_until_exit(dispatcher).await;

        assert_eq!(outcome, Outcome::ExitRequested { port });
        let expected: Vec<String> = (0..32).map(|i| format!("{port}: /count [{i}]")).collect();
        assert_eq!(out.lines(), expected);
    }

    #[tokio::test]
    async fn zero_queue_capacity_still_delivers() {
        let port = free_port();
        let out = SharedBuffer::new();
        let dispatcher = echo_dispatcher(bind(&[port]).await, &out).with_queue_capacity(0);

        let sender = Sender::new().await;
        sender.send(addr(port), "/one", vec![]).await;
        sender.send(addr(port), EXIT_PATH, vec![OscType::Int(1)]).await;

        let outcome = run_until_exit(dispatcher).await;

        assert_eq!(outcome, Outcome::ExitRequested { port });
        assert_eq!(out.lines(), vec![format!("{port}: /one []")]);
    }

    #[tokio::test]
    async fn shutdown_future_interrupts() {
        let out = SharedBuffer::new();
        let dispatcher = echo_dispatcher(bind(&[free_port()]).await, &out);

        let outcome = dispatcher.run(async {}).await.unwrap();

        assert_eq!(outcome, Outcome::Interrupted);
    }

    #[tokio::test]
    async fn no_listeners_is_an_error() {
        let out = SharedBuffer::new();
        let dispatcher = echo_dispatcher(ListenerRegistry::default(), &out);

        let result = dispatcher.run(pending()).await;

        assert!(matches!(result, Err(DispatchError::ListenersClosed)));
    }

    #[tokio::test]
    async fn handler_factory_called_once_per_port_in_order() {
        let ports = free_ports::<3>();
        let mut seen = Vec::new();

        let dispatcher = Dispatcher::new(bind(&ports).await, |port| {
            seen.push(port);
            make_handler(port, SharedBuffer::new())
        });

        assert_eq!(seen, ports.to_vec());
        assert_eq!(dispatcher.ports().count(), 3);
    }
}

mod flattening {
    use super::*;

    #[test]
    fn message_flattens_to_itself() {
        let msg = message("/x", vec![]);
        assert_eq!(flatten_packet(OscPacket::Message(msg.clone())), vec![msg]);
    }

    #[test]
    fn nested_bundles_flatten_depth_first() {
        let inner = OscPacket::Bundle(OscBundle {
            timetag: timetag(),
            content: vec![OscPacket::Message(message("/b", vec![]))],
        });
        let outer = OscPacket::Bundle(OscBundle {
            timetag: timetag(),
            content: vec![
                OscPacket::Message(message("/a", vec![])),
                inner,
                OscPacket::Message(message("/c", vec![])),
            ],
        });

        let addrs: Vec<String> = flatten_packet(outer).into_iter().map(|m| m.addr).collect();

        assert_eq!(addrs, vec!["/a", "/b", "/c"]);
    }
}

mod receive_backoff {
    use super::*;

    #[test]
    fn no_errors_means_no_delay() {
        assert_eq!(recv_error_backoff(0), Duration::ZERO);
    }

    #[test]
    fn doubles_from_the_initial_delay() {
        let initial = defaults::RECV_ERROR_BACKOFF_INITIAL;
        assert_eq!(recv_error_backoff(1), initial);
        assert_eq!(recv_error_backoff(2), initial * 2);
        assert_eq!(recv_error_backoff(3), initial * 4);
    }

    #[test]
    fn is_capped() {
        assert_eq!(recv_error_backoff(20), defaults::RECV_ERROR_BACKOFF_MAX);
        assert_eq!(recv_error_backoff(u32::MAX), defaults::RECV_ERROR_BACKOFF_MAX);
    }
}
