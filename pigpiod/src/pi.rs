// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::common::{Error, Gpio, Level, Mode, Pull, Result};
use crate::wire::{Cmd, Command, Response, MSG_SIZE};
use std::env;
use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Mutex;
use std::time::Duration;

/// The host used when none is provided.
pub const DEFAULT_HOST: &str = "localhost";

/// The port used when none is provided.
pub const DEFAULT_PORT: u16 = 8888;

/// Environment variable overriding the daemon host.
pub const ENV_ADDR: &str = "PIGPIO_ADDR";

/// Environment variable overriding the daemon port.
pub const ENV_PORT: &str = "PIGPIO_PORT";

/// The location of a pigpio daemon.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Address {
    pub host: String,
    pub port: u16,
}

impl Address {
    pub fn new<H: Into<String>>(host: H, port: u16) -> Address {
        Address {
            host: host.into(),
            port,
        }
    }

    /// The address from the `PIGPIO_ADDR` and `PIGPIO_PORT` environment
    /// variables, falling back to `localhost:8888`.
    pub fn from_env() -> Address {
        let host = env::var(ENV_ADDR)
            .ok()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match env::var(ENV_PORT) {
            Ok(p) if !p.is_empty() => p.parse().unwrap_or_else(|_| {
                tracing::warn!("ignoring invalid {}: '{}'", ENV_PORT, p);
                DEFAULT_PORT
            }),
            _ => DEFAULT_PORT,
        };
        Address { host, port }
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A connection to a pigpio daemon.
///
/// Commands are serialized so the connection may be shared between threads,
/// typically via an `Arc<Pi>`.
///
/// If a command fails part way through, or its response does not match, the
/// connection is shut down and all subsequent commands fail.
///
/// Dropping the `Pi` closes the connection.
#[derive(Debug)]
pub struct Pi {
    addr: Address,
    stream: Mutex<TcpStream>,
}

impl Pi {
    /// Connect to the daemon at `addr`.
    pub fn connect(addr: &Address) -> Result<Pi> {
        Pi::connect_timeout(addr, None)
    }

    /// Connect to the daemon identified by the environment.
    ///
    /// See [`Address::from_env`].
    pub fn from_env() -> Result<Pi> {
        Pi::connect(&Address::from_env())
    }

    /// Connect to the daemon at `addr`, limiting the time spent on each
    /// resolved socket address to `timeout`.
    pub fn connect_timeout(addr: &Address, timeout: Option<Duration>) -> Result<Pi> {
        let connect_err = |source: io::Error| Error::Connect {
            addr: addr.to_string(),
            source,
        };
        let stream = match timeout {
            None => TcpStream::connect((addr.host.as_str(), addr.port)).map_err(connect_err)?,
            Some(t) => {
                let mut last_err = None;
                let mut stream = None;
                for sa in (addr.host.as_str(), addr.port)
                    .to_socket_addrs()
                    .map_err(connect_err)?
                {
                    match TcpStream::connect_timeout(&sa, t) {
                        Ok(s) => {
                            stream = Some(s);
                            break;
                        }
                        Err(e) => last_err = Some(e),
                    }
                }
                match stream {
                    Some(s) => s,
                    None => {
                        return Err(connect_err(last_err.unwrap_or_else(|| {
                            io::Error::new(
                                io::ErrorKind::NotFound,
                                "no addresses resolved",
                            )
                        })))
                    }
                }
            }
        };
        stream.set_nodelay(true)?;
        tracing::debug!("connected to pigpiod at {}", addr);
        Ok(Pi {
            addr: addr.clone(),
            stream: Mutex::new(stream),
        })
    }

    /// The address of the connected daemon.
    pub fn address(&self) -> &Address {
        &self.addr
    }

    fn command(&self, cmd: Cmd, p1: u32, p2: u32) -> Result<u32> {
        let c = Command::new(cmd, p1, p2);
        let mut buf = [0; MSG_SIZE];
        let mut stream = match self.stream.lock() {
            Ok(stream) => stream,
            Err(e) => {
                // a command was interrupted mid-message
                let stream = e.into_inner();
                _ = stream.shutdown(Shutdown::Both);
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "connection abandoned mid-command",
                )));
            }
        };
        if let Err(e) = stream
            .write_all(&c.encode())
            .and_then(|_| stream.read_exact(&mut buf))
        {
            _ = stream.shutdown(Shutdown::Both);
            return Err(e.into());
        }
        let resp = Response::decode(&buf);
        tracing::trace!(cmd = cmd.name(), p1, p2, res = resp.res);
        let res = resp.result(&c);
        if let Err(Error::Protocol { .. }) = res {
            tracing::warn!("lost sync with pigpiod at {}", self.addr);
            _ = stream.shutdown(Shutdown::Both);
        }
        res
    }

    /// Set the mode of a GPIO.
    pub fn set_mode(&self, gpio: Gpio, mode: Mode) -> Result<()> {
        self.command(Cmd::Modes, gpio, mode as u32).map(drop)
    }

    /// Get the mode of a GPIO.
    pub fn mode(&self, gpio: Gpio) -> Result<Mode> {
        Mode::try_from(self.command(Cmd::Modeg, gpio, 0)?)
    }

    /// Set or clear the pull resistor on a GPIO.
    pub fn set_pull(&self, gpio: Gpio, pull: Pull) -> Result<()> {
        self.command(Cmd::Pud, gpio, pull as u32).map(drop)
    }

    /// Read the level of a GPIO.
    pub fn read(&self, gpio: Gpio) -> Result<Level> {
        Ok(Level::from(self.command(Cmd::Read, gpio, 0)? != 0))
    }

    /// Set the level of a GPIO.
    ///
    /// The daemon switches the GPIO to output if it is not already.
    pub fn write(&self, gpio: Gpio, level: Level) -> Result<()> {
        self.command(Cmd::Write, gpio, level.into()).map(drop)
    }

    /// Read the levels of GPIOs 0-31 as a bitmap.
    pub fn read_bank1(&self) -> Result<u32> {
        self.command(Cmd::Br1, 0, 0)
    }

    /// Drive low the bank 1 GPIOs set in `bits`.
    pub fn clear_bank1(&self, bits: u32) -> Result<()> {
        self.command(Cmd::Bc1, bits, 0).map(drop)
    }

    /// Drive high the bank 1 GPIOs set in `bits`.
    pub fn set_bank1(&self, bits: u32) -> Result<()> {
        self.command(Cmd::Bs1, bits, 0).map(drop)
    }

    /// The daemon's microsecond tick, which wraps roughly every 72 minutes.
    pub fn tick(&self) -> Result<u32> {
        self.command(Cmd::Tick, 0, 0)
    }

    /// The hardware revision of the host.
    pub fn hardware_revision(&self) -> Result<u32> {
        self.command(Cmd::Hwver, 0, 0)
    }

    /// The pigpio version of the daemon.
    pub fn version(&self) -> Result<u32> {
        self.command(Cmd::Pigpv, 0, 0)
    }
}
