use domain::color::RgbColor;
use domain::coords::PixelCoord;
use domain::result_code::ResultCode;

pub const TAG_BROADCAST: u8 = 0xFA;
pub const TAG_PAINT: u8 = 0xFE;
pub const TAG_PAINT_RESULT: u8 = 0xFF;
pub const TAG_PING: u8 = 0xFC;
pub const TAG_PONG: u8 = 0xFB;

const PAINT_PACKET_LEN: usize = 31;

/// A decoded `0xFE` paint-ingress packet, still carrying the raw uid/token
/// bytes off the wire — validation against the Token Registry happens in
/// the Paint Engine, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintPacket {
    pub coord: PixelCoord,
    pub color: RgbColor,
    pub claimed_uid: u32,
    pub token: uuid::Uuid,
    pub request_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedPacket {
    Paint(PaintPacket),
    Pong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnknownTag(u8),
    Truncated,
}

/// Decodes every packet concatenated in one binary frame, in order. Stops
/// at the first malformed or unknown-tag packet and reports it alongside
/// whatever packets decoded cleanly before it.
pub fn decode_frame(frame: &[u8]) -> (Vec<DecodedPacket>, Option<DecodeError>) {
    let mut packets = Vec::new();
    let mut offset = 0usize;

    while offset < frame.len() {
        let Some(&tag) = frame.get(offset) else {
            return (packets, Some(DecodeError::Truncated));
        };

        match tag {
            TAG_PAINT => match decode_paint_packet(frame.get(offset..)) {
                Some(packet) => {
                    packets.push(DecodedPacket::Paint(packet));
                    offset += PAINT_PACKET_LEN;
                }
                None => return (packets, Some(DecodeError::Truncated)),
            },
            TAG_PONG => {
                packets.push(DecodedPacket::Pong);
                offset += 1;
            }
            other => return (packets, Some(DecodeError::UnknownTag(other))),
        }
    }

    (packets, None)
}

fn decode_paint_packet(bytes: Option<&[u8]>) -> Option<PaintPacket> {
    let bytes = bytes?;
    if bytes.len() < PAINT_PACKET_LEN {
        return None;
    }

    let x = u16::from_le_bytes([*bytes.get(1)?, *bytes.get(2)?]);
    let y = u16::from_le_bytes([*bytes.get(3)?, *bytes.get(4)?]);
    let r = *bytes.get(5)?;
    let g = *bytes.get(6)?;
    let b = *bytes.get(7)?;
    let uid = u32::from_le_bytes([*bytes.get(8)?, *bytes.get(9)?, *bytes.get(10)?, 0]);

    let token_bytes: [u8; 16] = bytes.get(11..27)?.try_into().ok()?;
    let token = uuid::Uuid::from_bytes(token_bytes);

    let request_id = u32::from_le_bytes([
        *bytes.get(27)?,
        *bytes.get(28)?,
        *bytes.get(29)?,
        *bytes.get(30)?,
    ]);

    Some(PaintPacket {
        coord: PixelCoord::new(x, y),
        color: RgbColor::new(r, g, b),
        claimed_uid: uid,
        token,
        request_id,
    })
}

#[must_use]
pub fn encode_paint_result(request_id: u32, result: ResultCode) -> [u8; 6] {
    let id_bytes = request_id.to_le_bytes();
    [
        TAG_PAINT_RESULT,
        id_bytes[0],
        id_bytes[1],
        id_bytes[2],
        id_bytes[3],
        result.as_byte(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_paint_bytes(request_id: u32) -> Vec<u8> {
        let mut bytes = vec![TAG_PAINT];
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&[255, 0, 0]);
        bytes.extend_from_slice(&42u32.to_le_bytes()[..3]);
        bytes.extend_from_slice(uuid::Uuid::nil().as_bytes());
        bytes.extend_from_slice(&request_id.to_le_bytes());
        bytes
    }

    #[test]
    fn decodes_a_single_paint_packet() {
        let bytes = sample_paint_bytes(7);
        let (packets, err) = decode_frame(&bytes);
        assert!(err.is_none());
        assert_eq!(packets.len(), 1);
        match packets[0] {
            DecodedPacket::Paint(packet) => {
                assert_eq!(packet.coord, PixelCoord::new(1, 0));
                assert_eq!(packet.color, RgbColor::new(255, 0, 0));
                assert_eq!(packet.claimed_uid, 42);
                assert_eq!(packet.request_id, 7);
            }
            DecodedPacket::Pong => panic!("expected a paint packet"),
        }
    }

    #[test]
    fn decodes_two_concatenated_packets_in_one_frame() {
        let mut bytes = sample_paint_bytes(1);
        bytes.extend_from_slice(&sample_paint_bytes(2));
        let (packets, err) = decode_frame(&bytes);
        assert!(err.is_none());
        assert_eq!(packets.len(), 2);
    }

    #[test]
    fn unknown_tag_is_reported_after_any_valid_prefix() {
        let mut bytes = sample_paint_bytes(1);
        bytes.push(0x99);
        let (packets, err) = decode_frame(&bytes);
        assert_eq!(packets.len(), 1);
        assert_eq!(err, Some(DecodeError::UnknownTag(0x99)));
    }

    #[test]
    fn truncated_paint_packet_is_reported() {
        let bytes = vec![TAG_PAINT, 0, 0];
        let (packets, err) = decode_frame(&bytes);
        assert!(packets.is_empty());
        assert_eq!(err, Some(DecodeError::Truncated));
    }

    #[test]
    fn encodes_the_paint_result_packet_matching_the_protocol_example() {
        let encoded = encode_paint_result(7, ResultCode::Success);
        assert_eq!(encoded, [0xFF, 0x07, 0x00, 0x00, 0x00, 0xEF]);
    }
}
