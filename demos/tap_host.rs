//! Attach a NetworkInterface to a Linux TAP device
//!
//! The interface answers ARP for its address and logs every IPv4 datagram
//! it receives. Datagrams addressed to it are echoed back to the sender
//! with source and destination swapped.
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example tap_host -- tap0 10.0.0.100
//!
//! Then, after `ip addr add 10.0.0.1/24 dev tap0 && ip link set up dev tap0`:
//!   arping -I tap0 10.0.0.100

use std::net::Ipv4Addr;
use std::time::Instant;

use toy_netstack::{EthernetAddress, Ipv4Datagram, NetworkInterface};
use tun_tap::{Iface, Mode};

const LOCAL_MAC: EthernetAddress = EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x64]);

fn main() -> std::io::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tap_name = args.next().unwrap_or_else(|| "tap0".to_string());
    let local_ip: Ipv4Addr = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Ipv4Addr::new(10, 0, 0, 100));

    let tap = Iface::without_packet_info(&tap_name, Mode::Tap)?;
    log::info!("TAP device created: {}", tap.name());

    let mut iface = NetworkInterface::new(tap.name(), LOCAL_MAC, u32::from(local_ip));
    let mut last_tick = Instant::now();
    let mut buf = [0u8; 1518];

    loop {
        let nbytes = tap.recv(&mut buf)?;

        let now = Instant::now();
        iface.tick(now.duration_since(last_tick).as_millis() as u64);
        last_tick = now;

        if let Err(e) = iface.recv_frame_bytes(&buf[..nbytes]) {
            log::debug!("dropping {} byte frame: {}", nbytes, e);
        }

        while let Some(dgram) = iface.pop_datagram() {
            log::info!(
                "received {} byte datagram {} -> {} (proto {})",
                dgram.payload.len(),
                Ipv4Addr::from(dgram.header.src),
                Ipv4Addr::from(dgram.header.dst),
                dgram.header.protocol
            );
            if dgram.header.dst == iface.ip_address() {
                match Ipv4Datagram::new(
                    dgram.header.protocol,
                    dgram.header.dst,
                    dgram.header.src,
                    dgram.payload,
                ) {
                    Ok(echo) => iface.send_datagram(&echo, echo.header.dst),
                    Err(e) => log::warn!("cannot echo datagram: {}", e),
                }
            }
        }

        while let Some(frame) = iface.pop_frame() {
            if let Err(e) = tap.send(&frame.serialize()) {
                log::warn!("failed to send frame: {}", e);
            }
        }
    }
}
