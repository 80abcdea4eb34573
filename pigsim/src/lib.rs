// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library providing a simulated pigpio daemon for GPIO software testing.
//!
//! The simulator listens on an ephemeral localhost port and implements the
//! subset of the daemon command set covering GPIO modes, pulls, levels and
//! bank 1 access, plus the informational commands.
//! Every command received is recorded so tests can inspect the sequence of
//! operations performed by the client.
//!
//! For simple tests [`Sim::new`] is all that is required:
//!
//! ```no_run
//! let s = pigsim::Sim::new().unwrap();
//! // connect the client under test to s.port() on localhost...
//! assert_eq!(s.level(10), pigsim::Level::Low);
//! ```

use nohash_hasher::IntMap;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// A Broadcom GPIO number.
pub type Gpio = u32;

const MSG_SIZE: usize = 16;

const NUM_GPIOS: Gpio = 54;

// command codes
pub const MODES: u32 = 0;
pub const MODEG: u32 = 1;
pub const PUD: u32 = 2;
pub const READ: u32 = 3;
pub const WRITE: u32 = 4;
pub const BR1: u32 = 10;
pub const BC1: u32 = 12;
pub const BS1: u32 = 14;
pub const TICK: u32 = 16;
pub const HWVER: u32 = 17;
pub const PIGPV: u32 = 26;

// error codes
pub const PI_BAD_GPIO: i32 = -3;
pub const PI_BAD_MODE: i32 = -4;
pub const PI_BAD_LEVEL: i32 = -5;
pub const PI_BAD_PUD: i32 = -6;
pub const PI_UNKNOWN_COMMAND: i32 = -123;

/// The mode code for an output.
pub const MODE_OUTPUT: u32 = 1;

/// The physical value of a line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Level {
    /// The line is physically low.
    #[default]
    Low,

    /// The line is physically high.
    High,
}

/// The pull applied to a line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Pull {
    #[default]
    Off,
    Down,
    Up,
}

/// The simulated state of a single GPIO.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Line {
    /// The daemon mode code.
    pub mode: u32,
    pub pull: Pull,
    pub level: Level,
}

/// A command received by the simulator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Op {
    pub cmd: u32,
    pub p1: u32,
    pub p2: u32,

    /// When the command was received.
    pub at: Instant,
}

#[derive(Debug, Default)]
struct State {
    lines: IntMap<Gpio, Line>,
    ops: Vec<Op>,
    failures: IntMap<u32, i32>,
    hardware_revision: u32,
    version: u32,
}

impl State {
    fn line(&mut self, gpio: Gpio) -> &mut Line {
        self.lines.entry(gpio).or_default()
    }

    fn execute(&mut self, cmd: u32, p1: u32, p2: u32, start: Instant) -> i32 {
        self.ops.push(Op {
            cmd,
            p1,
            p2,
            at: Instant::now(),
        });
        if let Some(code) = self.failures.get(&cmd) {
            return *code;
        }
        let gpio_cmd = matches!(cmd, MODES | MODEG | PUD | READ | WRITE);
        if gpio_cmd && p1 >= NUM_GPIOS {
            return PI_BAD_GPIO;
        }
        match cmd {
            MODES => {
                if p2 > 7 {
                    return PI_BAD_MODE;
                }
                self.line(p1).mode = p2;
                0
            }
            MODEG => self.line(p1).mode as i32,
            PUD => {
                let pull = match p2 {
                    0 => Pull::Off,
                    1 => Pull::Down,
                    2 => Pull::Up,
                    _ => return PI_BAD_PUD,
                };
                let line = self.line(p1);
                line.pull = pull;
                if line.mode != MODE_OUTPUT {
                    match pull {
                        Pull::Up => line.level = Level::High,
                        Pull::Down => line.level = Level::Low,
                        Pull::Off => (),
                    }
                }
                0
            }
            READ => (self.line(p1).level == Level::High) as i32,
            WRITE => {
                let level = match p2 {
                    0 => Level::Low,
                    1 => Level::High,
                    _ => return PI_BAD_LEVEL,
                };
                let line = self.line(p1);
                line.mode = MODE_OUTPUT;
                line.level = level;
                0
            }
            BR1 => {
                let mut bits = 0u32;
                for (gpio, line) in self.lines.iter() {
                    if *gpio < 32 && line.level == Level::High {
                        bits |= 1 << gpio;
                    }
                }
                bits as i32
            }
            BC1 | BS1 => {
                let level = if cmd == BS1 { Level::High } else { Level::Low };
                for gpio in (0..32).filter(|g| p1 & (1 << g) != 0) {
                    self.line(gpio).level = level;
                }
                0
            }
            TICK => start.elapsed().as_micros() as u32 as i32,
            HWVER => self.hardware_revision as i32,
            PIGPV => self.version as i32,
            _ => PI_UNKNOWN_COMMAND,
        }
    }
}

/// A live simulated daemon.
///
/// The daemon is shut down when the `Sim` is dropped.
#[derive(Debug)]
pub struct Sim {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
    done: Arc<AtomicBool>,
    acceptor: Option<JoinHandle<()>>,
}

impl Sim {
    /// Start a simulator listening on an ephemeral localhost port.
    pub fn new() -> Result<Sim> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(State {
            hardware_revision: 0x00c0_3111,
            version: 79,
            ..Default::default()
        }));
        let done = Arc::new(AtomicBool::new(false));
        let acceptor = {
            let state = state.clone();
            let done = done.clone();
            thread::spawn(move || accept(listener, state, done))
        };
        tracing::debug!("pigsim listening on {}", addr);
        Ok(Sim {
            addr,
            state,
            done,
            acceptor: Some(acceptor),
        })
    }

    /// The address the simulator is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The port the simulator is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current state of a line.
    pub fn line(&self, gpio: Gpio) -> Line {
        self.state().lines.get(&gpio).copied().unwrap_or_default()
    }

    /// The current level of a line.
    pub fn level(&self, gpio: Gpio) -> Level {
        self.line(gpio).level
    }

    /// Pull a line to simulate the line being externally driven.
    pub fn set_level(&self, gpio: Gpio, level: Level) {
        self.state().line(gpio).level = level;
    }

    /// All commands received so far, in order.
    pub fn ops(&self) -> Vec<Op> {
        self.state().ops.clone()
    }

    /// Forget the commands received so far.
    pub fn clear_ops(&self) {
        self.state().ops.clear()
    }

    /// The levels written to a line, in order.
    pub fn writes(&self, gpio: Gpio) -> Vec<Level> {
        self.state()
            .ops
            .iter()
            .filter(|op| op.cmd == WRITE && op.p1 == gpio)
            .map(|op| if op.p2 == 0 { Level::Low } else { Level::High })
            .collect()
    }

    /// Make all subsequent instances of `cmd` fail with `code`.
    pub fn fail(&self, cmd: u32, code: i32) {
        self.state().failures.insert(cmd, code);
    }

    /// Set the hardware revision reported by the simulator.
    pub fn set_hardware_revision(&self, rev: u32) {
        self.state().hardware_revision = rev;
    }
}

impl Drop for Sim {
    fn drop(&mut self) {
        self.done.store(true, Ordering::SeqCst);
        // wake the acceptor so it sees done
        _ = TcpStream::connect(self.addr);
        if let Some(acceptor) = self.acceptor.take() {
            _ = acceptor.join();
        }
    }
}

fn accept(listener: TcpListener, state: Arc<Mutex<State>>, done: Arc<AtomicBool>) {
    let start = Instant::now();
    for stream in listener.incoming() {
        if done.load(Ordering::SeqCst) {
            return;
        }
        match stream {
            Ok(stream) => {
                let state = state.clone();
                thread::spawn(move || {
                    if let Err(e) = serve(stream, state, start) {
                        tracing::debug!("pigsim client error: {}", e);
                    }
                });
            }
            Err(e) => tracing::debug!("pigsim accept error: {}", e),
        }
    }
}

fn serve(mut stream: TcpStream, state: Arc<Mutex<State>>, start: Instant) -> io::Result<()> {
    let mut buf = [0u8; MSG_SIZE];
    loop {
        if let Err(e) = stream.read_exact(&mut buf) {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                return Ok(());
            }
            return Err(e);
        }
        let word = |n: usize| u32::from_le_bytes([buf[n], buf[n + 1], buf[n + 2], buf[n + 3]]);
        let (cmd, p1, p2) = (word(0), word(4), word(8));
        let res = state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .execute(cmd, p1, p2, start);
        buf[12..16].copy_from_slice(&res.to_le_bytes());
        if let Err(e) = stream.write_all(&buf) {
            _ = stream.shutdown(Shutdown::Both);
            return Err(e);
        }
    }
}

/// The result for [`pigsim`] functions.
///
/// [`pigsim`]: crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`pigsim`] functions.
///
/// [`pigsim`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An IO error detected while setting up the listener.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
