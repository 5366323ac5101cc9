//! `lwpkt-cli`: a small async demo binary that drives a `Packet` over a
//! real serial port, opening it with `tokio-serial` and encoding/decoding
//! frames with this crate's framed protocol.
//!
//! ```text
//! lwpkt-cli --port /dev/ttyUSB0 --baud 115200 send --to 0x20 --cmd 1 --data 68656c6c6f
//! lwpkt-cli --port /dev/ttyUSB0 --baud 115200 listen
//! ```

use clap::{Parser, Subcommand};
use lwpkt::{log_error, log_info, FeatureConfig, FrameStatus, Packet, StaticRingBuffer};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::SerialPortBuilderExt;

const MAX_DATA_LEN: usize = 256;
const RING_CAPACITY: usize = 1024;

#[derive(Parser)]
#[command(name = "lwpkt-cli", about = "Send and receive lwpkt frames over a serial link")]
struct Cli {
    /// Serial device, e.g. /dev/ttyUSB0 or COM3
    #[arg(long)]
    port: String,

    /// Baud rate
    #[arg(long, default_value_t = 115200)]
    baud: u32,

    /// This instance's own address
    #[arg(long, default_value_t = 0x01)]
    own_address: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send one frame and exit.
    Send {
        #[arg(long)]
        to: u32,
        #[arg(long)]
        cmd: Option<u8>,
        #[arg(long)]
        flags: Option<u32>,
        /// Payload bytes, hex-encoded.
        #[arg(long, default_value = "")]
        data: String,
    },
    /// Listen for incoming frames until interrupted.
    Listen,
}

type LinkPacket = Packet<MAX_DATA_LEN, StaticRingBuffer<RING_CAPACITY>>;

fn new_packet(own_address: u32) -> Result<LinkPacket, lwpkt::LwPktError> {
    let mut pkt = Packet::new(
        FeatureConfig::all_dynamic(),
        StaticRingBuffer::new(),
        StaticRingBuffer::new(),
    );
    pkt.set_own_address(own_address)?;
    Ok(pkt)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lwpkt::init_logger();
    let cli = Cli::parse();

    let mut port = tokio_serial::new(&cli.port, cli.baud)
        .data_bits(tokio_serial::DataBits::Eight)
        .stop_bits(tokio_serial::StopBits::One)
        .parity(tokio_serial::Parity::None)
        .timeout(Duration::from_millis(500))
        .open_native_async()?;

    let mut pkt = new_packet(cli.own_address)?;

    match cli.command {
        Command::Send { to, cmd, flags, data } => {
            let bytes = hex::decode(&data)?;
            pkt.write(Some(to), flags, cmd, &bytes)?;
            let mut out = [0u8; RING_CAPACITY];
            let n = pkt.drain_tx(&mut out);
            port.write_all(&out[..n]).await?;
            log_info(&format!("sent {n} bytes to 0x{to:02X}"));
        }
        Command::Listen => loop {
            let mut rx_byte = [0u8; 1];
            match timeout(Duration::from_secs(5), port.read(&mut rx_byte)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(_)) => {
                    pkt.feed_rx(&rx_byte);
                    match pkt.read() {
                        Ok(FrameStatus::Valid) => {
                            log_info(&format!(
                                "frame from 0x{:02X} cmd=0x{:02X} data={:02X?}",
                                pkt.from(),
                                pkt.cmd(),
                                pkt.data()
                            ));
                        }
                        Ok(_) => {}
                        Err(e) => log_error(&format!("frame error: {e}")),
                    }
                }
                Ok(Err(e)) => {
                    log_error(&format!("serial read error: {e}"));
                    break;
                }
                Err(_) => continue, // read timeout, keep listening
            }
        },
    }

    Ok(())
}
