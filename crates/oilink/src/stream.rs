use std::io::{ErrorKind, Read, Write};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use oilink_wire::{decode_frame, frame_len, OpCode, SensorCode, StreamFrame};

use crate::driver::{request_payload, send_command, Driver};
use crate::error::StreamError;

/// Flag byte sent with [`OpCode::PauseResumeStream`] to pause delivery.
const PAUSE: u8 = 0;

impl<T: Read + Write + Send + 'static> Driver<T> {
    /// Start a continuous sensor stream for the given packet list.
    ///
    /// Every code is validated against the registry before anything is
    /// written. On success the transport moves into a background reader
    /// thread that reassembles one checksummed frame at a time and delivers
    /// it through the returned session; [`SensorStream::pause`] hands the
    /// transport back.
    pub fn stream(mut self, codes: &[SensorCode]) -> Result<SensorStream<T>, StreamError> {
        let len = frame_len(codes)?;
        self.send(OpCode::SensorStream, &request_payload(codes))?;
        info!(packets = codes.len(), frame_len = len, "sensor stream running");

        let (frame_tx, frames) = mpsc::channel();
        let (pause_tx, pause_rx) = mpsc::channel();
        let link = self.into_inner();
        let worker = thread::spawn(move || run(link, len, frame_tx, pause_rx));

        Ok(SensorStream {
            frames,
            pause: pause_tx,
            worker,
        })
    }
}

/// An active stream session.
///
/// The reader thread exclusively owns the transport and the read loop;
/// callers observe the session only through the frame channel and the pause
/// signal. The channel closing means the session ended — paused, device
/// closed the link, or failed; the terminal error travels out of band
/// through [`SensorStream::pause`].
pub struct SensorStream<T> {
    frames: Receiver<StreamFrame>,
    pause: Sender<()>,
    worker: JoinHandle<(T, Result<(), StreamError>)>,
}

impl<T> std::fmt::Debug for SensorStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorStream")
            .field("frames", &self.frames)
            .field("pause", &self.pause)
            .field("worker", &self.worker)
            .finish()
    }
}

impl<T> SensorStream<T> {
    /// The decoded frame channel, in strict delivery order.
    pub fn frames(&self) -> &Receiver<StreamFrame> {
        &self.frames
    }

    /// Receive the next frame, blocking until one arrives. Returns `None`
    /// once the session has ended.
    pub fn recv(&self) -> Option<StreamFrame> {
        self.frames.recv().ok()
    }

    /// Pause the stream and reclaim the transport.
    ///
    /// Cooperative: the signal is observed between frame reads, never
    /// mid-frame, so an in-flight frame is completed (and delivered) first.
    /// On observing it the reader writes the pause command once and exits.
    /// If the session already ended (device EOF or a frame integrity
    /// failure), this reaps it and returns the terminal outcome.
    pub fn pause(self) -> (Driver<T>, Result<(), StreamError>) {
        // A closed signal channel just means the worker already exited.
        let _ = self.pause.send(());
        let (link, outcome) = self
            .worker
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (Driver::new(link), outcome)
    }
}

/// The continuous frame-read loop.
///
/// Owns the transport for the lifetime of the session and hands it back on
/// exit. Exits on pause (writes the pause command), on device EOF (clean,
/// no error) or on the first unrecoverable read or frame-integrity error.
fn run<T: Read + Write>(
    mut link: T,
    frame_len: usize,
    out: Sender<StreamFrame>,
    pause: Receiver<()>,
) -> (T, Result<(), StreamError>) {
    let mut buf = vec![0u8; frame_len];

    'frames: loop {
        // Pause is observed only here, at a frame boundary.
        match pause.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                debug!("pause requested; stopping stream");
                let outcome = send_command(&mut link, OpCode::PauseResumeStream, &[PAUSE]);
                return (link, outcome.map_err(StreamError::from));
            }
            Err(TryRecvError::Empty) => {}
        }

        // Accumulate exactly one frame. Transient errors mid-frame retry in
        // place without discarding bytes already read.
        let mut filled = 0usize;
        while filled < frame_len {
            match link.read(&mut buf[filled..]) {
                Ok(0) => {
                    info!("stream closed by device");
                    return (link, Ok(()));
                }
                Ok(n) => filled += n,
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
                    ) =>
                {
                    // With no frame in flight, a quiet device must not
                    // starve the pause check at the frame boundary.
                    if filled == 0 {
                        continue 'frames;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "unrecoverable stream read error");
                    return (link, Err(StreamError::Io(err)));
                }
            }
        }

        let frame = match decode_frame(&buf) {
            Ok(frame) => frame,
            Err(err) => {
                // Byte-level desync cannot be safely resynchronized;
                // terminate the session instead of skipping the frame.
                warn!(error = %err, "stream frame rejected; terminating session");
                return (link, Err(StreamError::Wire(err)));
            }
        };

        if out.send(frame).is_err() {
            // Consumer dropped the session handle; quiet the device too.
            debug!("stream consumer gone; pausing");
            let outcome = send_command(&mut link, OpCode::PauseResumeStream, &[PAUSE]);
            return (link, outcome.map_err(StreamError::from));
        }
    }
}
