use crate::errors::{AppError, ParseCause};
use crate::frame_line::parse_record;
use crate::model::{LCW_COLUMN, MIN_VOICE_SYMBOLS, VOICE_FRAME_MARKER, VOICE_PAYLOAD_TOKEN, VoiceRecord};
use crate::voice_bits;
use log::error;

/// Parse a `VOC:` line.
///
/// Runs the generic record grammar first, then a second pass over the same raw text:
/// - the LCW is the character at raw column [`LCW_COLUMN`], independent of tokenisation;
/// - the payload is token [`VOICE_PAYLOAD_TOKEN`], read only when the burst has at
///   least [`MIN_VOICE_SYMBOLS`] symbols.
///
/// A line whose first token is not `VOC:` is refused as a parse failure.
pub fn parse_voice_record(line: &str) -> Result<VoiceRecord, AppError> {
    let record = parse_record(line)?;

    let fail = |cause: ParseCause| {
        error!("Failed to parse line \"{}\"", line);
        AppError::parse(line, cause)
    };

    let toks: Vec<&str> = line.split_whitespace().collect();
    if toks.first().copied() != Some(VOICE_FRAME_MARKER) {
        return Err(fail(ParseCause::NotVoiceFrame));
    }

    let lcw = line
        .chars()
        .nth(LCW_COLUMN)
        .ok_or_else(|| fail(ParseCause::MissingLcwColumn(LCW_COLUMN)))?;

    let voice_payload = if record.symbols() < MIN_VOICE_SYMBOLS {
        None
    } else {
        let tok = toks
            .get(VOICE_PAYLOAD_TOKEN)
            .ok_or_else(|| fail(ParseCause::MissingToken("voice payload")))?;
        Some(tok.to_string())
    };

    Ok(VoiceRecord { record, lcw, voice_payload })
}

impl VoiceRecord {
    /// Decoded voice payload, `None` for short bursts. Recomputed on each call.
    pub fn voice_bits(&self) -> Result<Option<Vec<u8>>, AppError> {
        self.voice_payload
            .as_deref()
            .map(voice_bits::decode_payload)
            .transpose()
    }
}
