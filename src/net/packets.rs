//! Wire packets
//!
//! Three variants travel over the ordered datagram channel, tag-prefixed
//! with fixed little-endian field widths:
//!
//! | tag | packet | layout |
//! |-----|--------|--------|
//! | 0   | Ping   | `id: u64` |
//! | 1   | Pong   | `id: u64` |
//! | 2   | Intent | `for_tick: u32`, `direction_bits: u8`, `flags: u8` |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::Intent;
use crate::state::geom::Direction;

const TAG_PING: u8 = 0;
const TAG_PONG: u8 = 1;
const TAG_INTENT: u8 = 2;

const FLAG_CHARGE: u8 = 1 << 0;
const FLAG_USE_CHIP: u8 = 1 << 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("unknown packet tag {0}")]
    UnknownTag(u8),

    #[error("packet truncated: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    #[error("invalid direction bits {0:#04x}")]
    InvalidDirection(u8),

    #[error("invalid intent flags {0:#04x}")]
    InvalidFlags(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Packet {
    /// Latency probe; id is the sender's microsecond timestamp
    Ping { id: u64 },
    /// Echo of a previously received Ping id
    Pong { id: u64 },
    /// One tick of local input, labeled with the tick it applies to
    Intent { for_tick: u32, intent: Intent },
}

impl Packet {
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            Packet::Ping { id } => {
                let mut buf = vec![TAG_PING];
                buf.extend_from_slice(&id.to_le_bytes());
                buf
            }
            Packet::Pong { id } => {
                let mut buf = vec![TAG_PONG];
                buf.extend_from_slice(&id.to_le_bytes());
                buf
            }
            Packet::Intent { for_tick, intent } => {
                let mut buf = vec![TAG_INTENT];
                buf.extend_from_slice(&for_tick.to_le_bytes());
                buf.push(intent.direction.bits());
                let mut flags = 0u8;
                if intent.charge_basic_weapon {
                    flags |= FLAG_CHARGE;
                }
                if intent.use_chip {
                    flags |= FLAG_USE_CHIP;
                }
                buf.push(flags);
                buf
            }
        }
    }

    pub fn decode(buf: &[u8]) -> Result<Packet, PacketError> {
        let (&tag, body) = buf.split_first().ok_or(PacketError::Truncated {
            expected: 1,
            got: 0,
        })?;

        match tag {
            TAG_PING | TAG_PONG => {
                if body.len() < 8 {
                    return Err(PacketError::Truncated {
                        expected: 9,
                        got: buf.len(),
                    });
                }
                let mut id = [0u8; 8];
                id.copy_from_slice(&body[..8]);
                let id = u64::from_le_bytes(id);
                Ok(if tag == TAG_PING {
                    Packet::Ping { id }
                } else {
                    Packet::Pong { id }
                })
            }
            TAG_INTENT => {
                if body.len() < 6 {
                    return Err(PacketError::Truncated {
                        expected: 7,
                        got: buf.len(),
                    });
                }
                let mut for_tick = [0u8; 4];
                for_tick.copy_from_slice(&body[..4]);
                let for_tick = u32::from_le_bytes(for_tick);

                let direction = Direction::from_bits(body[4])
                    .ok_or(PacketError::InvalidDirection(body[4]))?;
                let flags = body[5];
                if flags & !(FLAG_CHARGE | FLAG_USE_CHIP) != 0 {
                    return Err(PacketError::InvalidFlags(flags));
                }

                Ok(Packet::Intent {
                    for_tick,
                    intent: Intent {
                        direction,
                        charge_basic_weapon: flags & FLAG_CHARGE != 0,
                        use_chip: flags & FLAG_USE_CHIP != 0,
                    },
                })
            }
            other => Err(PacketError::UnknownTag(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_layout() {
        let p = Packet::Ping { id: 0x0102030405060708 };
        let buf = p.encode();
        assert_eq!(buf[0], TAG_PING);
        assert_eq!(&buf[1..], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(Packet::decode(&buf).unwrap(), p);
    }

    #[test]
    fn intent_layout() {
        let p = Packet::Intent {
            for_tick: 0x00010203,
            intent: Intent {
                direction: Direction::RIGHT | Direction::UP,
                charge_basic_weapon: true,
                use_chip: false,
            },
        };
        let buf = p.encode();
        assert_eq!(buf, vec![TAG_INTENT, 0x03, 0x02, 0x01, 0x00, 0b0110, 0b01]);
        assert_eq!(Packet::decode(&buf).unwrap(), p);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Packet::decode(&[]), Err(PacketError::Truncated { expected: 1, got: 0 }));
        assert_eq!(Packet::decode(&[9]), Err(PacketError::UnknownTag(9)));
        assert!(matches!(
            Packet::decode(&[TAG_PING, 1, 2]),
            Err(PacketError::Truncated { .. })
        ));
        assert_eq!(
            Packet::decode(&[TAG_INTENT, 0, 0, 0, 0, 0xFF, 0]),
            Err(PacketError::InvalidDirection(0xFF))
        );
    }
}
