/// Streaming wire codec: encoder, decoder, markers, value packing.
pub mod codec;
/// File-backed navigation wrapper (open, edit, save).
pub mod document;
/// Common error types: tree, encoding/decoding, document, transport.
pub mod error;
/// Length-prefixed TCP transport feeding the decoder.
pub mod network;
/// Tag tree data model and the incremental cursor.
pub mod tag;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Codec entry points and wire constants.
pub use codec::{
    decode_optimized_int, decode_text, encode_forest, encode_optimized_int, encode_tag,
    encode_text, read_document, write_forest, write_tag, Decoder, MARKER_CLOSE, MARKER_NOVALUE,
    MARKER_OPEN, MARKER_VALUE, MAX_TITLE_LEN, MAX_VALUE_LEN,
};
/// File-level navigation wrapper.
pub use document::TagDocument;
/// Operation errors.
pub use error::{DecodeError, DocumentError, EncodeError, NetworkError, TagError, ValueError};
/// Tree model: detached tag, arena ids, tree, cursor.
pub use tag::{Tag, TagId, TagTree, TreeCursor, ROOT_TITLE};
