// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pigpiod socket command format.
//!
//! Commands and responses are both four little-endian 32-bit words.
//! A command carries `cmd, p1, p2, p3`, where `p3` is the length of any
//! extension bytes that follow.  The response echoes `cmd, p1, p2` and
//! replaces `p3` with the result.

use crate::common::{Error, ErrorCode, Result};

/// The size of a command or response message.
pub const MSG_SIZE: usize = 16;

/// The daemon commands supported by this crate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum Cmd {
    /// Set GPIO mode.
    Modes = 0,
    /// Get GPIO mode.
    Modeg = 1,
    /// Set GPIO pull.
    Pud = 2,
    /// Read GPIO level.
    Read = 3,
    /// Write GPIO level.
    Write = 4,
    /// Read the levels of bank 1 (GPIO 0-31).
    Br1 = 10,
    /// Clear the bank 1 GPIOs in a mask.
    Bc1 = 12,
    /// Set the bank 1 GPIOs in a mask.
    Bs1 = 14,
    /// Microseconds since boot, wrapping.
    Tick = 16,
    /// Hardware revision.
    Hwver = 17,
    /// Daemon version.
    Pigpv = 26,
}

impl Cmd {
    /// The daemon's name for the command.
    pub fn name(&self) -> &'static str {
        match self {
            Cmd::Modes => "MODES",
            Cmd::Modeg => "MODEG",
            Cmd::Pud => "PUD",
            Cmd::Read => "READ",
            Cmd::Write => "WRITE",
            Cmd::Br1 => "BR1",
            Cmd::Bc1 => "BC1",
            Cmd::Bs1 => "BS1",
            Cmd::Tick => "TICK",
            Cmd::Hwver => "HWVER",
            Cmd::Pigpv => "PIGPV",
        }
    }

    /// Commands whose result is an unsigned value rather than a status.
    ///
    /// These can never report an error.
    pub fn returns_unsigned(&self) -> bool {
        matches!(self, Cmd::Br1 | Cmd::Tick | Cmd::Hwver)
    }
}

/// A command without extension.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Command {
    pub cmd: Cmd,
    pub p1: u32,
    pub p2: u32,
}

impl Command {
    pub fn new(cmd: Cmd, p1: u32, p2: u32) -> Command {
        Command { cmd, p1, p2 }
    }

    /// Encode the command into its wire format.
    pub fn encode(&self) -> [u8; MSG_SIZE] {
        let mut buf = [0; MSG_SIZE];
        buf[0..4].copy_from_slice(&(self.cmd as u32).to_le_bytes());
        buf[4..8].copy_from_slice(&self.p1.to_le_bytes());
        buf[8..12].copy_from_slice(&self.p2.to_le_bytes());
        // p3 - no extension
        buf
    }
}

/// A response from the daemon.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Response {
    pub cmd: u32,
    pub p1: u32,
    pub p2: u32,
    pub res: i32,
}

impl Response {
    /// Decode a response from its wire format.
    pub fn decode(buf: &[u8; MSG_SIZE]) -> Response {
        let word = |n: usize| {
            let mut w = [0; 4];
            w.copy_from_slice(&buf[n * 4..n * 4 + 4]);
            w
        };
        Response {
            cmd: u32::from_le_bytes(word(0)),
            p1: u32::from_le_bytes(word(1)),
            p2: u32::from_le_bytes(word(2)),
            res: i32::from_le_bytes(word(3)),
        }
    }

    /// Check the response echoes the command and extract the result.
    ///
    /// Negative results are converted to errors, other than for commands
    /// returning unsigned values, which are reinterpreted as u32.
    pub fn result(&self, cmd: &Command) -> Result<u32> {
        let sent = (cmd.cmd as u32, cmd.p1, cmd.p2);
        let got = (self.cmd, self.p1, self.p2);
        if got != sent {
            return Err(Error::Protocol { sent, got });
        }
        if self.res < 0 && !cmd.cmd.returns_unsigned() {
            return Err(Error::Daemon {
                cmd: cmd.cmd.name(),
                code: ErrorCode(self.res),
            });
        }
        Ok(self.res as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_write() {
        let c = Command::new(Cmd::Write, 10, 1);
        assert_eq!(
            c.encode(),
            [4, 0, 0, 0, 10, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn decode() {
        let buf = [3, 0, 0, 0, 9, 0, 0, 0, 0, 0, 0, 0, 0xfd, 0xff, 0xff, 0xff];
        assert_eq!(
            Response::decode(&buf),
            Response {
                cmd: 3,
                p1: 9,
                p2: 0,
                res: -3
            }
        );
    }

    mod result {
        use super::*;

        #[test]
        fn status() {
            let c = Command::new(Cmd::Modes, 9, 1);
            let r = Response {
                cmd: 0,
                p1: 9,
                p2: 1,
                res: 0,
            };
            assert_eq!(r.result(&c).unwrap(), 0);
        }

        #[test]
        fn daemon_error() {
            let c = Command::new(Cmd::Pud, 99, 0);
            let r = Response {
                cmd: 2,
                p1: 99,
                p2: 0,
                res: -3,
            };
            match r.result(&c) {
                Err(Error::Daemon { cmd, code }) => {
                    assert_eq!(cmd, "PUD");
                    assert_eq!(code, ErrorCode::BAD_GPIO);
                }
                x => panic!("unexpected result {:?}", x),
            }
        }

        #[test]
        fn unsigned() {
            let c = Command::new(Cmd::Tick, 0, 0);
            let r = Response {
                cmd: 16,
                p1: 0,
                p2: 0,
                res: -2,
            };
            assert_eq!(r.result(&c).unwrap(), 0xffff_fffe);
        }

        #[test]
        fn mismatch() {
            let c = Command::new(Cmd::Read, 9, 0);
            let r = Response {
                cmd: 4,
                p1: 9,
                p2: 0,
                res: 0,
            };
            assert!(matches!(
                r.result(&c),
                Err(Error::Protocol {
                    sent: (3, 9, 0),
                    got: (4, 9, 0)
                })
            ));
        }

        #[test]
        fn stale_gpio() {
            let c = Command::new(Cmd::Write, 9, 1);
            let r = Response {
                cmd: 4,
                p1: 10,
                p2: 1,
                res: 0,
            };
            assert!(matches!(
                r.result(&c),
                Err(Error::Protocol {
                    sent: (4, 9, 1),
                    got: (4, 10, 1)
                })
            ));
        }

        #[test]
        fn stale_level() {
            let c = Command::new(Cmd::Write, 10, 0);
            let r = Response {
                cmd: 4,
                p1: 10,
                p2: 1,
                res: 0,
            };
            let err = r.result(&c).unwrap_err();
            assert_eq!(
                err.to_string(),
                "response (4, 10, 1) does not match command (4, 10, 0)"
            );
        }
    }
}
