//! `encoding_rs`-backed capability provider.

use encoding_rs::{Decoder, DecoderResult, Encoder, EncoderResult};

use super::substitute::{FamilyPolicy, transliterate};
use super::{EncodingCapability, EncodingFamily, TargetEncoding};

/// Input is fed to the encoder in chunks of this many bytes so the family
/// exclusion check and the encoder share one pass over the text.
const CHUNK_BYTES: usize = 8 * 1024;

/// Default provider: WHATWG encoders plus the family policy tables.
#[derive(Debug, Clone, Copy)]
pub struct StandardEncodings {
    substitutes: bool,
}

impl Default for StandardEncodings {
    fn default() -> Self {
        Self { substitutes: true }
    }
}

impl StandardEncodings {
    pub const fn new(substitutes: bool) -> Self {
        Self { substitutes }
    }
}

impl EncodingCapability for StandardEncodings {
    /// Whether `text` survives encoding and decoding unchanged.
    ///
    /// Some encoders accept a character but map it to bytes that decode as
    /// a different one (Shift_JIS U+2212 becomes U+FF0D), so every chunk is
    /// decoded again and compared with its input.
    fn can_represent(&self, text: &str, encoding: &TargetEncoding) -> bool {
        if encoding.family == EncodingFamily::Unicode {
            return true;
        }

        let policy = FamilyPolicy::of(encoding.family);
        let mut encoder = encoding.encoding.new_encoder();
        let mut decoder = encoding.encoding.new_decoder_without_bom_handling();
        let mut encoded = Vec::new();
        let mut decoded = String::new();
        let mut rest = text;

        loop {
            let end = chunk_end(rest);
            let (chunk, tail) = rest.split_at(end);
            let last = tail.is_empty();

            if chunk.contains(|c| policy.excludes(c)) {
                return false;
            }

            encoded.clear();
            decoded.clear();
            if !encode_chunk(&mut encoder, chunk, &mut encoded, last)
                || !decode_chunk(&mut decoder, &encoded, &mut decoded, last)
                || !policy.reads_back(chunk, &decoded)
            {
                return false;
            }

            if last {
                return true;
            }
            rest = tail;
        }
    }

    fn try_encode(&self, character: &str, encoding: &TargetEncoding) -> Option<String> {
        if !self.substitutes {
            return None;
        }

        if let Some(mapped) = FamilyPolicy::of(encoding.family).lookup(character)
            && self.can_represent(mapped, encoding)
        {
            return Some(mapped.to_string());
        }

        transliterate(character).filter(|ascii| self.can_represent(ascii, encoding))
    }
}

/// Encode `chunk` into `out`. `false` on the first unmappable character.
fn encode_chunk(encoder: &mut Encoder, mut chunk: &str, out: &mut Vec<u8>, last: bool) -> bool {
    let mut buf = [0u8; 1024];
    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(chunk, &mut buf, last);
        out.extend_from_slice(&buf[..written]);
        chunk = &chunk[read..];
        match result {
            EncoderResult::InputEmpty => return true,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => return false,
        }
    }
}

/// Decode `bytes` into `out`. `false` on malformed input.
fn decode_chunk(decoder: &mut Decoder, mut bytes: &[u8], out: &mut String, last: bool) -> bool {
    loop {
        let needed = decoder
            .max_utf8_buffer_length_without_replacement(bytes.len())
            .unwrap_or(bytes.len().saturating_mul(3).saturating_add(16));
        out.reserve(needed);

        let (result, read) = decoder.decode_to_string_without_replacement(bytes, out, last);
        bytes = &bytes[read..];
        match result {
            DecoderResult::InputEmpty => return true,
            DecoderResult::OutputFull => {}
            DecoderResult::Malformed(..) => return false,
        }
    }
}

/// Largest char boundary at or after `CHUNK_BYTES`, or the whole input.
fn chunk_end(text: &str) -> usize {
    if text.len() <= CHUNK_BYTES {
        return text.len();
    }
    let mut end = CHUNK_BYTES;
    while !text.is_char_boundary(end) {
        end += 1;
    }
    end
}
