use super::{ClientMessage, Compression, ServerMessage};
use bsatn_types::codec::{BsatnReader, BsatnWriter};
use bsatn_types::{get_tag, put_tag, DecodeError, Deser, EncodeError, Ser};
use bytes::Bytes;

/// Client frames carry no compression byte.
pub fn encode_client_frame(msg: &ClientMessage) -> Result<Bytes, EncodeError> {
    Ok(Bytes::from(msg.ser_solo()?))
}

pub fn decode_client_frame(frame: &[u8]) -> Result<ClientMessage, DecodeError> {
    ClientMessage::deser_solo(frame)
}

/// Always uncompressed.
pub fn encode_server_frame(msg: &ServerMessage) -> Result<Bytes, EncodeError> {
    let mut w = BsatnWriter::new();
    put_tag(&mut w, Compression::None)?;
    msg.ser(&mut w)?;
    Ok(Bytes::from(w.into_vec()))
}

/// Reads the compression tag, then exactly one server message.
///
/// Compressed frames are rejected before anything past the tag is read.
pub fn decode_server_frame(frame: &[u8]) -> Result<ServerMessage, DecodeError> {
    let mut r = BsatnReader::new(frame);
    let compression: Compression = get_tag(&mut r)?;
    compression
        .check_supported()
        .map_err(DecodeError::Unsupported)?;

    let msg = ServerMessage::deser(&mut r)?;
    if !r.is_exhausted() {
        return Err(DecodeError::TrailingBytes {
            remaining: r.remaining(),
        });
    }
    Ok(msg)
}
