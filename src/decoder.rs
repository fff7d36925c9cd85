use log::debug;

use crate::constants::{FRAME_SIZE, MAGIC_KEY, OPCODE_CO2, OPCODE_TEMPERATURE};
use crate::reading::Sample;

// Byte pairs swapped by the device before rotating the frame.
const SWAPS: [(usize, usize); 4] = [(0, 2), (1, 4), (3, 7), (5, 6)];

/// A descrambled frame whose checksum matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Identifies the quantity carried by `value`.
    pub opcode: u8,
    /// Big-endian value from bytes 1 and 2 of the descrambled frame.
    pub value: u16,
}

// Nibble-swapped magic key byte, as added by the device.
#[inline]
fn key_byte(i: usize) -> u8 {
    MAGIC_KEY[i].rotate_left(4)
}

fn permute(buf: &mut [u8; FRAME_SIZE]) {
    for (a, b) in SWAPS {
        buf.swap(a, b);
    }
}

/// Descrambles a raw frame and validates its checksum.
///
/// The device swaps four byte pairs, rotates the whole frame left by five
/// bits and adds a nibble-swapped magic key to every byte. This undoes the
/// three steps and accepts the frame only when byte 3 equals the wrapping
/// sum of bytes 0 to 2.
///
/// Returns `None` for frames failing the checksum. Unknown opcodes are still
/// returned; see [`classify`].
pub fn decode(frame: &[u8; FRAME_SIZE]) -> Option<DecodedFrame> {
    let mut permuted = *frame;
    permute(&mut permuted);

    let mut data = [0u8; FRAME_SIZE];
    for i in 0..FRAME_SIZE {
        let prev = permuted[(i + FRAME_SIZE - 1) % FRAME_SIZE];
        let rotated = (prev << 5) | (permuted[i] >> 3);
        data[i] = rotated.wrapping_sub(key_byte(i));
    }

    let checksum = data[0].wrapping_add(data[1]).wrapping_add(data[2]);
    if checksum != data[3] {
        debug!(
            "Discarding frame {:02X?}: checksum {:02X} != {:02X}",
            frame, checksum, data[3]
        );
        return None;
    }

    let decoded = DecodedFrame {
        opcode: data[0],
        value: u16::from_be_bytes([data[1], data[2]]),
    };
    debug!("Decoded frame {:02X?} into {:?}", frame, decoded);
    Some(decoded)
}

/// Maps a decoded frame to the quantity it carries.
///
/// Only temperature (`0x42`) and CO2 (`0x50`) are interpreted; every other
/// opcode yields `None`.
pub fn classify(frame: DecodedFrame) -> Option<Sample> {
    match frame.opcode {
        OPCODE_TEMPERATURE => Some(Sample::Temperature(
            f32::from(frame.value) * 0.0625 - 273.15,
        )),
        OPCODE_CO2 => Some(Sample::Co2(frame.value)),
        _ => None,
    }
}

/// Descrambles and classifies a raw frame in one step.
pub fn decode_sample(frame: &[u8; FRAME_SIZE]) -> Option<Sample> {
    decode(frame).and_then(classify)
}

/// Scrambles `opcode` and `value` the way the device does.
///
/// The checksum byte is computed and the trailing four bytes are zero. Useful
/// for simulating a device.
pub fn encode(opcode: u8, value: u16) -> [u8; FRAME_SIZE] {
    let [hi, lo] = value.to_be_bytes();
    let mut data = [0u8; FRAME_SIZE];
    data[0] = opcode;
    data[1] = hi;
    data[2] = lo;
    data[3] = opcode.wrapping_add(hi).wrapping_add(lo);

    let mut rotated = [0u8; FRAME_SIZE];
    for i in 0..FRAME_SIZE {
        rotated[i] = data[i].wrapping_add(key_byte(i));
    }

    let mut frame = [0u8; FRAME_SIZE];
    for i in 0..FRAME_SIZE {
        let next = rotated[(i + 1) % FRAME_SIZE];
        frame[i] = (rotated[i] << 3) | (next >> 5);
    }
    permute(&mut frame);
    frame
}
