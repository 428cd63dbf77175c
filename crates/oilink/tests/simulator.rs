//! End-to-end tests against an in-process device simulator.
//!
//! The simulator sits on the far end of an in-memory duplex pipe, decodes
//! op codes the way the device would, and answers sensor requests with mock
//! values. Stream mode runs on its own thread, emitting checksummed frames
//! until a pause command arrives.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bytes::BytesMut;
use oilink::{Driver, DriverError, SensorCode};
use oilink_wire::{encode_frame, packet_len};

/// One end of an in-memory byte-duplex pipe.
struct PipeEnd {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
}

fn pipe() -> (PipeEnd, PipeEnd) {
    let (tx_a, rx_b) = mpsc::channel();
    let (tx_b, rx_a) = mpsc::channel();
    let a = PipeEnd {
        tx: tx_a,
        rx: rx_a,
        pending: VecDeque::new(),
    };
    let b = PipeEnd {
        tx: tx_b,
        rx: rx_b,
        pending: VecDeque::new(),
    };
    (a, b)
}

impl Read for PipeEnd {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.pending.is_empty() {
            match self.rx.recv() {
                Ok(chunk) => self.pending.extend(chunk),
                Err(_) => return Ok(0), // peer gone: EOF
            }
        }
        let mut n = 0;
        while n < buf.len() {
            let Some(byte) = self.pending.pop_front() else {
                break;
            };
            buf[n] = byte;
            n += 1;
        }
        Ok(n)
    }
}

impl Write for PipeEnd {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.tx
            .send(buf.to_vec())
            .map_err(|_| std::io::Error::from(std::io::ErrorKind::BrokenPipe))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Mock sensor values the simulator answers with.
fn mock_value(id: u8, velocity: &[u8; 2], radius: &[u8; 2]) -> Vec<u8> {
    match id {
        7 => vec![3],
        8 => vec![35],
        12 => vec![42],
        13 => vec![5],
        19 => vec![10, 20],
        23 => vec![0xFD, 0x15],  // -747 mA
        24 => vec![25],
        25 => vec![0x03, 0xE8], // 1000 mAh
        26 => vec![0x05, 0xDC], // 1500 mAh
        29 => vec![2, 25],
        35 => vec![2],
        36 => vec![1],
        39 => velocity.to_vec(),
        40 => radius.to_vec(),
        // Anything else: zeros of the registered length.
        other => vec![0; packet_len(SensorCode(other)).unwrap_or(0) as usize],
    }
}

/// Run the device side of the pipe until the driver disconnects.
fn run_simulator(mut link: PipeEnd) {
    let mut velocity = [0u8; 2];
    let mut radius = [0u8; 2];
    let streaming = Arc::new(AtomicBool::new(false));

    loop {
        let Some(op) = read_n(&mut link, 1) else {
            streaming.store(false, Ordering::SeqCst);
            return;
        };
        match op[0] {
            // Sensors
            142 => {
                let Some(id) = read_n(&mut link, 1) else { return };
                let value = mock_value(id[0], &velocity, &radius);
                let _ = link.write(&value);
            }
            // QueryList
            149 => {
                let Some(count) = read_n(&mut link, 1) else { return };
                for _ in 0..count[0] {
                    let Some(id) = read_n(&mut link, 1) else { return };
                    let value = mock_value(id[0], &velocity, &radius);
                    let _ = link.write(&value);
                }
            }
            // SensorStream: emit frames on a side thread until paused.
            148 => {
                let Some(count) = read_n(&mut link, 1) else { return };
                let Some(ids) = read_n(&mut link, count[0] as usize) else {
                    return;
                };
                let values: Vec<(SensorCode, Vec<u8>)> = ids
                    .iter()
                    .map(|&id| (SensorCode(id), mock_value(id, &velocity, &radius)))
                    .collect();
                let entries: Vec<(SensorCode, &[u8])> = values
                    .iter()
                    .map(|(code, value)| (*code, value.as_slice()))
                    .collect();
                let mut frame = BytesMut::new();
                encode_frame(&entries, &mut frame);
                let frame = frame.to_vec();

                streaming.store(true, Ordering::SeqCst);
                let flag = Arc::clone(&streaming);
                let out = link.tx.clone();
                thread::spawn(move || {
                    while flag.load(Ordering::SeqCst) {
                        if out.send(frame.clone()).is_err() {
                            return;
                        }
                        thread::sleep(Duration::from_millis(1));
                    }
                });
            }
            // PauseResumeStream
            150 => {
                let Some(flag) = read_n(&mut link, 1) else { return };
                if flag[0] == 0 {
                    streaming.store(false, Ordering::SeqCst);
                }
            }
            // Drive: remember the requested values for packets 39/40.
            137 => {
                let Some(data) = read_n(&mut link, 4) else { return };
                velocity.copy_from_slice(&data[..2]);
                radius.copy_from_slice(&data[2..]);
            }
            // DriveDirect
            145 => {
                let _ = read_n(&mut link, 4);
            }
            // Leds
            139 => {
                let _ = read_n(&mut link, 3);
            }
            // Single-byte commands and anything else: nothing to consume.
            _ => {}
        }
    }
}

fn read_n(link: &mut PipeEnd, n: usize) -> Option<Vec<u8>> {
    let mut buf = vec![0u8; n];
    let mut filled = 0;
    while filled < n {
        match link.read(&mut buf[filled..]) {
            Ok(0) => return None,
            Ok(read) => filled += read,
            Err(_) => return None,
        }
    }
    Some(buf)
}

fn connect() -> Driver<PipeEnd> {
    let (driver_end, device_end) = pipe();
    thread::spawn(move || run_simulator(device_end));
    Driver::new(driver_end)
}

#[test]
fn single_sensor_queries_return_mock_values() {
    let mut driver = connect();
    driver.start().unwrap();
    driver.safe().unwrap();

    assert_eq!(driver.sensors(SensorCode::TEMPERATURE).unwrap(), [25]);
    assert_eq!(
        driver.sensors(SensorCode::BATTERY_CHARGE).unwrap(),
        [0x03, 0xE8]
    );
    assert_eq!(driver.sensors(SensorCode::CURRENT).unwrap(), [0xFD, 0x15]);
}

#[test]
fn drive_is_echoed_by_requested_velocity_and_radius() {
    let mut driver = connect();
    driver.drive(200, -100).unwrap();

    assert_eq!(
        driver.sensors(SensorCode::REQUESTED_VELOCITY).unwrap(),
        [0x00, 0xC8]
    );
    assert_eq!(
        driver.sensors(SensorCode::REQUESTED_RADIUS).unwrap(),
        [0xFF, 0x9C]
    );
}

#[test]
fn query_list_returns_buffers_in_request_order() {
    let mut driver = connect();
    let results = driver
        .query_list(&[
            SensorCode::WALL,
            SensorCode::BATTERY_CHARGE,
            SensorCode::CLIFF_FRONT_LEFT_SIGNAL,
        ])
        .unwrap();
    assert_eq!(
        results,
        vec![vec![35], vec![0x03, 0xE8], vec![2, 25]]
    );
}

#[test]
fn unknown_sensor_is_rejected_without_desyncing_the_link() {
    let mut driver = connect();
    let err = driver.sensors(SensorCode(99)).unwrap_err();
    assert!(matches!(err, DriverError::UnknownSensor(99)));

    // Nothing was written, so the next query still lines up.
    assert_eq!(driver.sensors(SensorCode::OI_MODE).unwrap(), [2]);
}

#[test]
fn stream_delivers_frames_then_pause_reclaims_the_driver() {
    let driver = connect();
    let stream = driver
        .stream(&[SensorCode::CLIFF_RIGHT, SensorCode::BATTERY_CHARGE])
        .unwrap();

    for _ in 0..3 {
        let frame = stream.recv().expect("stream ended early");
        assert_eq!(frame.entries.len(), 2);
        assert_eq!(frame.entries[0], (SensorCode::CLIFF_RIGHT, vec![42u8].into()));
        assert_eq!(
            frame.entries[1],
            (SensorCode::BATTERY_CHARGE, vec![0x03u8, 0xE8].into())
        );
    }

    let (mut driver, outcome) = stream.pause();
    outcome.unwrap();

    // The command path still works after the transport moves back.
    driver.safe().unwrap();
}
