pub mod decode;
pub mod document;
pub mod encode;
pub mod network;
pub mod tag;
pub mod value;

pub use decode::DecodeError;
pub use document::DocumentError;
pub use encode::EncodeError;
pub use network::NetworkError;
pub use tag::TagError;
pub use value::ValueError;
