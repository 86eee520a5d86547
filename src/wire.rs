//! Persisted layout.
//!
//! No canonical wire format is required beyond round-tripping through
//! this crate's own codec, so this module persists exactly the
//! bit-for-bit reproducible half of a stack: `sp`, frame headers, and
//! primitive slot words, recording only whether each reference slot
//! was occupied. `ObjRef` is opaque to this crate, so referents are
//! never serialized; a decoded stack's reference slots always come
//! back empty. [`occupied_slots`] reports which positions held a
//! reference in the encoded stack, so the host language's own
//! serializer knows which slots to re-bind.

use deku::prelude::*;

use crate::bits;
use crate::slot::ObjRef;
use crate::stack::Stack;

#[derive(Debug, DekuRead, DekuWrite)]
struct WireFrame {
    header: u64,
    #[deku(count = "bits::num_slots(header) as usize")]
    primitives: Vec<u64>,
    #[deku(count = "bits::num_slots(header) as usize")]
    occupied: Vec<u8>,
}

#[derive(Debug, DekuRead, DekuWrite)]
struct WireStack {
    #[deku(update = "self.frames.len() as u32")]
    num_frames: u32,
    #[deku(count = "num_frames")]
    frames: Vec<WireFrame>,
}

/// Serializes `stack`'s current frame sequence, bottom to top, to bytes.
pub fn encode(stack: &Stack) -> Result<Vec<u8>, DekuError> {
    let (primitives, refs, sp) = stack.raw_state();
    let mut frames = Vec::new();
    if let Some(sp) = sp {
        let top = sp - 1;
        let mut pos = 0;
        loop {
            let header = primitives[pos];
            let num_slots = bits::num_slots(header) as usize;
            let payload = primitives[pos + 1..pos + 1 + num_slots].to_vec();
            let occupied = refs[pos + 1..pos + 1 + num_slots]
                .iter()
                .map(|slot| slot.is_some() as u8)
                .collect();
            frames.push(WireFrame {
                header,
                primitives: payload,
                occupied,
            });
            if pos == top {
                break;
            }
            pos += 1 + num_slots;
        }
    }
    let wire = WireStack {
        num_frames: frames.len() as u32,
        frames,
    };
    wire.to_bytes()
}

/// Reconstructs a stack from bytes produced by [`encode`]. `context` is
/// supplied fresh by the caller, since the owning context is itself
/// opaque and out of scope for this codec.
pub fn decode(bytes: &[u8], context: Option<ObjRef>) -> Result<Stack, DekuError> {
    let (_, wire) = WireStack::from_bytes((bytes, 0))?;

    let mut primitives = Vec::new();
    let mut refs = Vec::new();
    for frame in &wire.frames {
        primitives.push(frame.header);
        primitives.extend_from_slice(&frame.primitives);
        refs.push(None);
        refs.extend(frame.occupied.iter().map(|_| None));
    }
    let sp = wire.frames.last().map(|last| {
        let num_slots = bits::num_slots(last.header) as usize;
        primitives.len() - num_slots
    });

    Ok(Stack::from_raw_state(primitives, refs, sp, context))
}

/// Reports, position by position, whether the stack encoded in `bytes`
/// held a live reference there. The result is aligned with the
/// primitive/reference arrays of the [`Stack`] [`decode`] would
/// produce from the same bytes: `false` at every header-word position,
/// and at any payload slot that held no reference.
pub fn occupied_slots(bytes: &[u8]) -> Result<Vec<bool>, DekuError> {
    let (_, wire) = WireStack::from_bytes((bytes, 0))?;
    let mut occupied = Vec::new();
    for frame in &wire.frames {
        occupied.push(false); // header word
        occupied.extend(frame.occupied.iter().map(|&flag| flag != 0));
    }
    Ok(occupied)
}
